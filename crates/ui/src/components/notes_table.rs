//! # Notes Table
//!
//! Note listing shared by the student search, the faculty upload history and
//! the admin notes manager. Names are resolved through the screen's catalog;
//! actions are optional so each screen shows only what it allows.

use dioxus::prelude::*;
use kithab_catalog::{Catalog, Note};

/// One rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRow {
    pub note: Note,
    pub subject: String,
    pub branch: String,
    pub uploader: String,
    pub uploaded_on: String,
}

impl NoteRow {
    pub fn new(note: &Note, catalog: &Catalog) -> Self {
        let uploader = match (&note.uploader, note.uploader_name()) {
            (Some(details), Some(name)) => match &details.email {
                Some(email) => format!("{} <{}>", name, email),
                None => name.to_string(),
            },
            _ => "-".to_string(),
        };
        Self {
            subject: catalog.subject_name(note),
            branch: catalog.branch_name(&note.branch_id),
            uploader,
            uploaded_on: note
                .created_at
                .map(|t| t.format("%d %b %Y").to_string())
                .unwrap_or_else(|| "-".to_string()),
            note: note.clone(),
        }
    }
}

/// Table of notes with per-row actions
#[component]
pub fn NotesTable(
    notes: Vec<Note>,
    catalog: Catalog,
    #[props(default = false)] show_uploader: bool,
    #[props(default = false)] busy: bool,
    on_download: Option<EventHandler<Note>>,
    on_delete: Option<EventHandler<Note>>,
) -> Element {
    if notes.is_empty() {
        return rsx! {
            p { class: "empty-state", "No notes found." }
        };
    }

    let rows: Vec<NoteRow> = notes.iter().map(|n| NoteRow::new(n, &catalog)).collect();

    rsx! {
        table {
            class: "data-table",
            thead {
                tr {
                    th { "Title" }
                    th { "Subject" }
                    th { "Branch" }
                    th { "Semester" }
                    if show_uploader {
                        th { "Uploaded by" }
                    }
                    th { "Uploaded on" }
                    th { class: "actions", "" }
                }
            }
            tbody {
                for row in rows {
                    tr {
                        key: "{row.note.id}",
                        td { "{row.note.title}" }
                        td { "{row.subject}" }
                        td { "{row.branch}" }
                        td { "{row.note.semester}" }
                        if show_uploader {
                            td { "{row.uploader}" }
                        }
                        td { "{row.uploaded_on}" }
                        td {
                            class: "actions",
                            if let Some(handler) = on_download {
                                button {
                                    class: "btn btn-small",
                                    disabled: busy,
                                    onclick: {
                                        let note = row.note.clone();
                                        move |_| handler.call(note.clone())
                                    },
                                    "Download"
                                }
                            }
                            if let Some(handler) = on_delete {
                                button {
                                    class: "btn btn-small btn-danger",
                                    disabled: busy,
                                    onclick: {
                                        let note = row.note.clone();
                                        move |_| handler.call(note.clone())
                                    },
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kithab_catalog::{Branch, Embedded, NoteFilter, Regulation, Subject};

    #[test]
    fn test_row_resolves_names() {
        let catalog = Catalog::new(
            vec![Regulation::new("r1", "R2021", 8)],
            vec![Branch::new("b1", "CSE", "CS", "r1")],
            vec![Subject::new("s1", "Data Structures", "CS201", "b1", 3)],
        );
        let filter = NoteFilter {
            regulation: "r1".into(),
            branch: "b1".into(),
            semester: 3,
            subject: "s1".into(),
        };
        let mut note = Note::new("n1", "Unit 1", &filter);
        let row = NoteRow::new(&note, &catalog);
        assert_eq!(row.subject, "Data Structures");
        assert_eq!(row.branch, "CSE");
        assert_eq!(row.uploader, "-");
        assert_eq!(row.uploaded_on, "-");

        note.uploader = Some(Embedded {
            name: Some("Dr. Rao".to_string()),
            email: Some("rao@college.edu".to_string()),
            ..Default::default()
        });
        assert_eq!(NoteRow::new(&note, &catalog).uploader, "Dr. Rao <rao@college.edu>");
    }
}
