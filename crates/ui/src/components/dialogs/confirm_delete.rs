//! # Confirm Delete Dialog Component
//!
//! Every delete in the portal goes through this dialog. Regulations and
//! branches list what the server will remove along with them, and deleting
//! something with dependents requires typing "delete".

use dioxus::prelude::*;
use kithab_catalog::{Catalog, DeleteImpact};

use crate::actions;
use crate::state::{APP_STATE, DeleteTarget};

// ============================================================================
// Delete Info
// ============================================================================

/// What the dialog tells the user about a target
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteInfo {
    pub title: String,
    pub message: String,
    pub item_name: String,
    pub cascading: Vec<String>,
}

impl DeleteInfo {
    pub fn new(target: &DeleteTarget, catalog: &Catalog) -> Self {
        let (item_name, impact) = match target {
            DeleteTarget::Regulation(id) => (
                catalog.regulation_name(id),
                catalog.regulation_delete_impact(id),
            ),
            DeleteTarget::Branch(id) => (
                catalog
                    .branch(id)
                    .map(|b| b.label())
                    .unwrap_or_else(|| id.to_string()),
                catalog.branch_delete_impact(id),
            ),
            DeleteTarget::Subject(id) => (
                catalog
                    .subject(id)
                    .map(|s| s.label())
                    .unwrap_or_else(|| id.to_string()),
                DeleteImpact::default(),
            ),
            DeleteTarget::Note { title, .. } => (title.clone(), DeleteImpact::default()),
            DeleteTarget::User { name, .. } => (name.clone(), DeleteImpact::default()),
        };

        let mut cascading = Vec::new();
        if impact.branches > 0 {
            cascading.push(plural(impact.branches, "branch", "branches"));
        }
        if impact.subjects > 0 {
            cascading.push(plural(impact.subjects, "subject", "subjects"));
        }
        if matches!(target, DeleteTarget::Regulation(_) | DeleteTarget::Branch(_)) {
            cascading.push("all notes filed under them".to_string());
        }
        if matches!(target, DeleteTarget::Subject(_)) {
            cascading.push("all notes filed under this subject".to_string());
        }

        Self {
            title: format!("Delete {}", target.kind()),
            message: format!(
                "Are you sure you want to delete this {}? This action cannot be undone.",
                target.kind().to_lowercase()
            ),
            item_name,
            cascading,
        }
    }

    /// Typed confirmation is needed when other records go with it
    pub fn requires_confirm_text(&self) -> bool {
        self.cascading.len() > 1
    }
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

// ============================================================================
// Main Component
// ============================================================================

/// Confirmation dialog for delete operations
#[component]
pub fn ConfirmDeleteDialog(target: DeleteTarget) -> Element {
    let mut is_deleting = use_signal(|| false);
    let mut confirm_text = use_signal(String::new);

    let info = DeleteInfo::new(&target, &APP_STATE.read().catalog);
    let requires_confirm_text = info.requires_confirm_text();
    let can_delete = !requires_confirm_text || confirm_text.read().trim().eq_ignore_ascii_case("delete");

    let handle_delete = move |_| {
        if !can_delete || *is_deleting.read() {
            return;
        }
        is_deleting.set(true);
        let target = target.clone();
        spawn(async move {
            actions::delete_record(target).await;
            is_deleting.set(false);
        });
    };

    let handle_cancel = move |_| {
        APP_STATE.write().ui.close_dialog();
    };

    let deleting = *is_deleting.read();

    rsx! {
        div {
            class: "dialog confirm-delete-dialog",

            div {
                class: "dialog-header",
                span { class: "dialog-icon danger", "⚠️" }
                div {
                    h2 { class: "dialog-title danger", "{info.title}" }
                    p { "{info.message}" }
                }
            }

            div {
                class: "delete-item",
                span { class: "muted", "Item: " }
                strong { "{info.item_name}" }
            }

            if !info.cascading.is_empty() {
                div {
                    class: "cascade-warning",
                    p { "This will also delete:" }
                    ul {
                        for line in info.cascading.iter() {
                            li { "{line}" }
                        }
                    }
                }
            }

            if requires_confirm_text {
                div {
                    class: "input-group",
                    label { class: "input-label", "Type \"delete\" to confirm:" }
                    input {
                        class: "input",
                        r#type: "text",
                        placeholder: "delete",
                        value: "{confirm_text}",
                        disabled: deleting,
                        oninput: move |e| confirm_text.set(e.value()),
                    }
                }
            }

            div {
                class: "dialog-actions",
                button {
                    r#type: "button",
                    class: "btn",
                    disabled: deleting,
                    onclick: handle_cancel,
                    "Cancel"
                }
                button {
                    r#type: "button",
                    class: "btn btn-danger",
                    disabled: deleting || !can_delete,
                    onclick: handle_delete,
                    if deleting { "Deleting..." } else { "Delete" }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kithab_catalog::{Branch, Regulation, Subject};
    use kithab_core::{NoteId, RegulationId, SubjectId};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![Regulation::new("r1", "R2021", 8)],
            vec![
                Branch::new("b1", "CSE", "CS", "r1"),
                Branch::new("b2", "ECE", "EC", "r1"),
            ],
            vec![Subject::new("s1", "Data Structures", "CS201", "b1", 3)],
        )
    }

    #[test]
    fn test_regulation_lists_cascade() {
        let info = DeleteInfo::new(&DeleteTarget::Regulation(RegulationId::new("r1")), &catalog());
        assert_eq!(info.title, "Delete Regulation");
        assert_eq!(info.item_name, "R2021");
        assert_eq!(
            info.cascading,
            vec!["2 branches", "1 subject", "all notes filed under them"]
        );
        assert!(info.requires_confirm_text());
    }

    #[test]
    fn test_leaf_targets() {
        let note = DeleteTarget::Note {
            id: NoteId::new("n1"),
            title: "Unit 1".to_string(),
        };
        let info = DeleteInfo::new(&note, &catalog());
        assert_eq!(info.item_name, "Unit 1");
        assert!(info.cascading.is_empty());
        assert!(!info.requires_confirm_text());

        let subject = DeleteInfo::new(&DeleteTarget::Subject(SubjectId::new("s1")), &catalog());
        assert_eq!(subject.item_name, "Data Structures (CS201)");
        assert!(!subject.requires_confirm_text());
    }
}
