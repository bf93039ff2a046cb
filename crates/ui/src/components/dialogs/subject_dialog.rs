//! # Subject Dialog Component
//!
//! Create and edit subjects. Regulation and branch narrow each other the
//! same way the cascade filter does; the semester list comes from the
//! regulation's semester count.

use dioxus::prelude::*;
use kithab_catalog::validation::{
    FIELD_BRANCH, FIELD_CODE, FIELD_NAME, FIELD_REGULATION, FIELD_SEMESTER,
};
use kithab_catalog::{Selection, SelectionEvent, SubjectDraft};
use kithab_core::{FieldErrors, SubjectId};

use crate::components::cascade_filter::{branch_options, regulation_options, semester_options};
use crate::components::inputs::{Banner, Select, TextInput};
use crate::state::{APP_STATE, api_client, mutation_done, settle};

/// Mode for the subject dialog
#[derive(Debug, Clone, PartialEq)]
pub enum SubjectDialogMode {
    Create,
    Edit(SubjectId),
}

/// Subject creation and editing dialog
#[component]
pub fn SubjectDialog(mode: SubjectDialogMode) -> Element {
    let initial = match &mode {
        SubjectDialogMode::Create => SubjectDraft::default(),
        SubjectDialogMode::Edit(id) => {
            let state = APP_STATE.read();
            state
                .catalog
                .subject(id)
                .map(|s| SubjectDraft::from_subject(s, &state.catalog))
                .unwrap_or_default()
        }
    };

    let mut draft = use_signal(|| initial);
    let mut errors = use_signal(FieldErrors::new);
    let mut is_saving = use_signal(|| false);

    let editing = match &mode {
        SubjectDialogMode::Create => None,
        SubjectDialogMode::Edit(id) => Some(id.clone()),
    };
    let title = if editing.is_some() { "Edit Subject" } else { "Add Subject" };

    let handle_save = move |_| {
        if *is_saving.read() {
            return;
        }
        let payload = {
            let state = APP_STATE.read();
            draft.read().check(&state.catalog, editing.as_ref())
        };
        let payload = match payload {
            Ok(payload) => payload,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::new());
        is_saving.set(true);

        let editing = editing.clone();
        spawn(async move {
            let fallback = if editing.is_some() {
                "Failed to update subject"
            } else {
                "Failed to add subject"
            };
            let result = match api_client() {
                Ok(api) => match &editing {
                    Some(id) => api.update_subject(id, &payload).await,
                    None => api.create_subject(&payload).await,
                },
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => mutation_done(if editing.is_some() {
                    "Subject updated"
                } else {
                    "Subject added"
                }),
                Err(e) => {
                    let message = e.user_message(fallback);
                    settle::<()>(Err(e), fallback);
                    errors.write().set_server(message);
                }
            }
            is_saving.set(false);
        });
    };

    let handle_cancel = move |_| {
        APP_STATE.write().ui.close_dialog();
    };

    let saving = *is_saving.read();
    let current = draft.read().clone();
    let field_errors = errors.read().clone();

    let (regulations, branches, semesters) = {
        let state = APP_STATE.read();
        let selection = Selection {
            regulation: current.regulation.clone(),
            branch: current.branch.clone(),
            semester: None,
            subject: None,
        };
        let options = state.catalog.options(&selection);
        (
            regulation_options(&state.catalog),
            branch_options(&options),
            semester_options(&options),
        )
    };
    let regulation_value = current
        .regulation
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_default();
    let branch_value = current
        .branch
        .as_ref()
        .map(|b| b.to_string())
        .unwrap_or_default();

    rsx! {
        div {
            class: "dialog",

            h2 { class: "dialog-title", "{title}" }

            Banner { message: field_errors.server().map(str::to_string) }

            Select {
                label: "Regulation".to_string(),
                placeholder: "Select regulation".to_string(),
                value: regulation_value,
                options: regulations,
                disabled: saving,
                error: field_errors.get(FIELD_REGULATION).map(str::to_string),
                on_change: move |v: String| draft.write().select(SelectionEvent::regulation(&v)),
            }

            Select {
                label: "Branch".to_string(),
                placeholder: "Select branch".to_string(),
                value: branch_value,
                options: branches,
                disabled: saving || current.regulation.is_none(),
                error: field_errors.get(FIELD_BRANCH).map(str::to_string),
                on_change: move |v: String| draft.write().select(SelectionEvent::branch(&v)),
            }

            Select {
                label: "Semester".to_string(),
                placeholder: "Select semester".to_string(),
                value: current.semester.clone(),
                options: semesters,
                disabled: saving || current.regulation.is_none(),
                error: field_errors.get(FIELD_SEMESTER).map(str::to_string),
                on_change: move |v: String| draft.write().select(SelectionEvent::semester(&v)),
            }

            TextInput {
                label: "Subject name".to_string(),
                value: current.name.clone(),
                disabled: saving,
                error: field_errors.get(FIELD_NAME).map(str::to_string),
                on_change: move |v: String| draft.write().name = v,
            }

            TextInput {
                label: "Subject code".to_string(),
                value: current.code.clone(),
                disabled: saving,
                error: field_errors.get(FIELD_CODE).map(str::to_string),
                on_change: move |v: String| draft.write().code = v,
            }

            div {
                class: "dialog-actions",
                button {
                    r#type: "button",
                    class: "btn",
                    disabled: saving,
                    onclick: handle_cancel,
                    "Cancel"
                }
                button {
                    r#type: "button",
                    class: "btn btn-primary",
                    disabled: saving,
                    onclick: handle_save,
                    if saving { "Saving..." } else { "Save" }
                }
            }
        }
    }
}
