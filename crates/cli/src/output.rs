//! Terminal output
//!
//! Table layout is kept free of color so it can be tested; the `print_*`
//! wrappers add styling on the way out.

use colored::Colorize;
use kithab_catalog::{Branch, Catalog, Note, Regulation, Subject, User};
use kithab_client::{ArchiveReport, ItemOutcome};
use kithab_core::Role;

/// Lay out rows under a header, each column as wide as its widest cell
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(padded(headers, &widths));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(padded(&cells, &widths));
    }
    lines
}

fn padded(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Print a table, or `empty` when there are no rows
pub fn print_table(headers: &[&str], rows: &[Vec<String>], empty: &str) {
    if rows.is_empty() {
        println!("{}", empty.dimmed());
        return;
    }
    let mut lines = render_table(headers, rows).into_iter();
    if let Some(header) = lines.next() {
        println!("{}", header.bold());
    }
    for line in lines {
        println!("{}", line);
    }
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

// ============================================================================
// Rows
// ============================================================================

pub const REGULATION_HEADERS: [&str; 3] = ["ID", "NAME", "SEMESTERS"];

pub fn regulation_rows(regulations: &[Regulation]) -> Vec<Vec<String>> {
    regulations
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.number_of_semesters.to_string(),
            ]
        })
        .collect()
}

pub const BRANCH_HEADERS: [&str; 4] = ["ID", "NAME", "CODE", "REGULATION"];

pub fn branch_rows(branches: &[&Branch], catalog: &Catalog) -> Vec<Vec<String>> {
    branches
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                b.name.clone(),
                b.code.clone(),
                catalog.regulation_name(&b.regulation_id),
            ]
        })
        .collect()
}

pub const SUBJECT_HEADERS: [&str; 5] = ["ID", "NAME", "CODE", "BRANCH", "SEM"];

pub fn subject_rows(subjects: &[&Subject], catalog: &Catalog) -> Vec<Vec<String>> {
    subjects
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.name.clone(),
                s.code.clone(),
                catalog.branch_name(&s.branch_id),
                s.semester.to_string(),
            ]
        })
        .collect()
}

pub const NOTE_HEADERS: [&str; 5] = ["ID", "TITLE", "SUBJECT", "UPLOADED BY", "DATE"];

pub fn note_rows(notes: &[Note], catalog: &Catalog) -> Vec<Vec<String>> {
    notes
        .iter()
        .map(|n| {
            vec![
                n.id.to_string(),
                n.title.clone(),
                catalog.subject_name(n),
                n.uploader_name().unwrap_or("-").to_string(),
                n.created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

/// Columns shown for each managed role
pub fn user_headers(role: Role) -> [&'static str; 4] {
    match role {
        Role::Faculty => ["ID", "NAME", "EMPLOYEE ID", "DESIGNATION"],
        _ => ["ID", "NAME", "ROLL NUMBER", "EMAIL"],
    }
}

pub fn user_rows(users: &[User], role: Role) -> Vec<Vec<String>> {
    users
        .iter()
        .map(|u| {
            let (third, fourth) = match role {
                Role::Faculty => (u.employee_id.clone(), u.designation.clone()),
                _ => (u.roll_number.clone(), u.email.clone()),
            };
            vec![
                u.id.to_string(),
                u.name.clone(),
                third.unwrap_or_default(),
                fourth.unwrap_or_default(),
            ]
        })
        .collect()
}

/// One line per visible field, for `whoami`
pub fn user_details(user: &User) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", user.name, user.role_label())];
    for (key, value) in user.visible_fields() {
        if key == "name" || key == "role" || value.is_empty() {
            continue;
        }
        lines.push(format!("  {}: {}", key, value));
    }
    lines
}

/// Summary lines for a finished archive
pub fn archive_summary(report: &ArchiveReport) -> Vec<String> {
    let mut lines = vec![format!("{} file(s) in archive", report.entries().len())];
    for outcome in report.skipped() {
        if let ItemOutcome::Skipped { title, reason, .. } = outcome {
            lines.push(format!("skipped {}: {}", title, reason));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use kithab_catalog::NoteFilter;
    use kithab_core::NoteId;

    #[test]
    fn test_render_table_pads_columns() {
        let lines = render_table(
            &["ID", "NAME"],
            &[
                vec!["r1".to_string(), "R2021".to_string()],
                vec!["r22".to_string(), "R18".to_string()],
            ],
        );
        assert_eq!(lines, vec!["ID   NAME", "r1   R2021", "r22  R18"]);
    }

    #[test]
    fn test_regulation_and_subject_rows() {
        let catalog = Catalog::new(
            vec![Regulation::new("r1", "R2021", 8)],
            vec![Branch::new("b1", "Computer Science", "CSE", "r1")],
            vec![Subject::new("s1", "Data Structures", "CS201", "b1", 3)],
        );
        assert_eq!(
            regulation_rows(&catalog.regulations),
            vec![vec!["r1".to_string(), "R2021".to_string(), "8".to_string()]]
        );

        let subjects: Vec<&Subject> = catalog.subjects.iter().collect();
        assert_eq!(
            subject_rows(&subjects, &catalog)[0],
            vec!["s1", "Data Structures", "CS201", "Computer Science", "3"]
        );
    }

    #[test]
    fn test_note_rows_resolve_subject_through_catalog() {
        let catalog = Catalog::new(
            vec![Regulation::new("r1", "R2021", 8)],
            vec![Branch::new("b1", "Computer Science", "CSE", "r1")],
            vec![Subject::new("s1", "Data Structures", "CS201", "b1", 3)],
        );
        let filter = NoteFilter {
            regulation: "r1".into(),
            branch: "b1".into(),
            semester: 3,
            subject: "s1".into(),
        };
        let notes = vec![Note::new("n1", "Unit 1", &filter)];

        assert_eq!(
            note_rows(&notes, &catalog)[0],
            vec!["n1", "Unit 1", "Data Structures", "-", "-"]
        );
        assert_eq!(note_rows(&notes, &Catalog::default())[0][2], "s1");
    }

    #[test]
    fn test_user_rows_by_role() {
        let mut faculty = User::new("u1", "Dr. Rao").with_role(Role::Faculty);
        faculty.employee_id = Some("FAC001".to_string());
        let rows = user_rows(&[faculty], Role::Faculty);
        assert_eq!(rows[0], vec!["u1", "Dr. Rao", "FAC001", ""]);
        assert_eq!(user_headers(Role::Faculty)[2], "EMPLOYEE ID");
        assert_eq!(user_headers(Role::Student)[2], "ROLL NUMBER");
    }

    #[test]
    fn test_archive_summary_lists_skips() {
        let report = ArchiveReport {
            bytes: Vec::new(),
            outcomes: vec![
                ItemOutcome::Added {
                    id: NoteId::new("n1"),
                    entry: "Unit 1.pdf".to_string(),
                },
                ItemOutcome::Skipped {
                    id: NoteId::new("n2"),
                    title: "Unit 2".to_string(),
                    reason: "Not found".to_string(),
                },
            ],
        };
        assert_eq!(
            archive_summary(&report),
            vec!["1 file(s) in archive", "skipped Unit 2: Not found"]
        );
    }
}
