//! Read-only views of the regulation/branch/subject taxonomy

use anyhow::Result;
use colored::Colorize;
use kithab_catalog::{Catalog, Selection};

use crate::cli::{GlobalArgs, MetaCommand};
use crate::context::Context;
use crate::output::{self, BRANCH_HEADERS, REGULATION_HEADERS, SUBJECT_HEADERS};

pub const CATALOG_FAILED: &str = "Failed to load regulations, branches and subjects";

/// Fetch the public catalog
pub async fn load_catalog(ctx: &mut Context) -> Result<Catalog> {
    let result = ctx.api.catalog().await;
    ctx.settle(result, CATALOG_FAILED)
}

pub async fn run(global: &GlobalArgs, command: MetaCommand) -> Result<()> {
    let mut ctx = Context::load(global)?;
    let catalog = load_catalog(&mut ctx).await?;

    match command {
        MetaCommand::Regulations => {
            output::print_table(
                &REGULATION_HEADERS,
                &output::regulation_rows(&catalog.regulations),
                "No regulations",
            );
        }
        MetaCommand::Branches { regulation } => {
            let filter = crate::cli::SelectionArgs {
                regulation,
                ..Default::default()
            }
            .to_selection();
            let branches = catalog.branches_matching(&filter);
            output::print_table(
                &BRANCH_HEADERS,
                &output::branch_rows(&branches, &catalog),
                "No branches",
            );
        }
        MetaCommand::Subjects(args) => {
            let subjects = catalog.subjects_matching(&args.to_selection());
            output::print_table(
                &SUBJECT_HEADERS,
                &output::subject_rows(&subjects, &catalog),
                "No subjects",
            );
        }
        MetaCommand::Options(args) => {
            for line in option_lines(&catalog, &args.to_selection()) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// What each cascade level offers for a partial selection
fn option_lines(catalog: &Catalog, selection: &Selection) -> Vec<String> {
    let options = catalog.options(selection);
    let regulations: Vec<String> = catalog
        .regulations
        .iter()
        .map(|r| format!("{} ({})", r.name, r.id))
        .collect();
    let branches: Vec<String> = options
        .branches
        .iter()
        .map(|b| format!("{} ({})", b.label(), b.id))
        .collect();
    let semesters: Vec<String> = options.semesters.iter().map(u32::to_string).collect();
    let subjects: Vec<String> = options
        .subjects
        .iter()
        .map(|s| format!("{} ({})", s.label(), s.id))
        .collect();

    [
        ("Regulations", regulations),
        ("Branches", branches),
        ("Semesters", semesters),
        ("Subjects", subjects),
    ]
    .into_iter()
    .map(|(level, values)| {
        let values = if values.is_empty() {
            "-".dimmed().to_string()
        } else {
            values.join(", ")
        };
        format!("{:<12} {}", format!("{}:", level), values)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kithab_catalog::{Branch, Regulation, SelectionEvent, Subject};

    #[test]
    fn test_option_lines_follow_selection() {
        colored::control::set_override(false);
        let catalog = Catalog::new(
            vec![Regulation::new("r1", "R2021", 2)],
            vec![Branch::new("b1", "Computer Science", "CSE", "r1")],
            vec![Subject::new("s1", "Data Structures", "CS201", "b1", 2)],
        );
        let selection = Selection::new()
            .apply(SelectionEvent::regulation("r1"))
            .apply(SelectionEvent::branch("b1"))
            .apply(SelectionEvent::semester("2"));
        let lines = option_lines(&catalog, &selection);
        assert_eq!(lines[0], "Regulations: R2021 (r1)");
        assert_eq!(lines[2], "Semesters:   1, 2");
        assert!(lines[3].contains("(s1)"));

        let lines = option_lines(&catalog, &Selection::new());
        assert_eq!(lines[1], "Branches:    -");
    }
}
