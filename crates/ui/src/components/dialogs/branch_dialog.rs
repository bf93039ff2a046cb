//! # Branch Dialog Component
//!
//! Create and edit branches. Names and codes are unique within the chosen
//! regulation, so moving a branch to another regulation re-checks against
//! that regulation's branches.

use dioxus::prelude::*;
use kithab_catalog::validation::{FIELD_CODE, FIELD_NAME, FIELD_REGULATION};
use kithab_catalog::BranchDraft;
use kithab_core::{BranchId, FieldErrors, RegulationId};

use crate::components::cascade_filter::regulation_options;
use crate::components::inputs::{Banner, Select, TextInput};
use crate::state::{APP_STATE, api_client, mutation_done, settle};

/// Mode for the branch dialog
#[derive(Debug, Clone, PartialEq)]
pub enum BranchDialogMode {
    Create,
    Edit(BranchId),
}

/// Branch creation and editing dialog
#[component]
pub fn BranchDialog(mode: BranchDialogMode) -> Element {
    let initial = match &mode {
        BranchDialogMode::Create => BranchDraft::default(),
        BranchDialogMode::Edit(id) => APP_STATE
            .read()
            .catalog
            .branch(id)
            .map(BranchDraft::from)
            .unwrap_or_default(),
    };

    let mut draft = use_signal(|| initial);
    let mut errors = use_signal(FieldErrors::new);
    let mut is_saving = use_signal(|| false);

    let editing = match &mode {
        BranchDialogMode::Create => None,
        BranchDialogMode::Edit(id) => Some(id.clone()),
    };
    let title = if editing.is_some() { "Edit Branch" } else { "Add Branch" };
    let regulations = regulation_options(&APP_STATE.read().catalog);

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
                "Failed to update branch"
            } else {
                "Failed to add branch"
            };
            let result = match api_client() {
                Ok(api) => match &editing {
                    Some(id) => api.update_branch(id, &payload).await,
                    None => api.create_branch(&payload).await,
                },
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => mutation_done(if editing.is_some() {
                    "Branch updated"
                } else {
                    "Branch added"
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
    let regulation_value = current
        .regulation
        .as_ref()
        .map(|r| r.to_string())
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
                on_change: move |v: String| draft.write().regulation = RegulationId::parse(&v),
            }

            TextInput {
                label: "Branch name".to_string(),
                placeholder: "e.g. Computer Science".to_string(),
                value: current.name.clone(),
                disabled: saving,
                error: field_errors.get(FIELD_NAME).map(str::to_string),
                on_change: move |v: String| draft.write().name = v,
            }

            TextInput {
                label: "Branch code".to_string(),
                placeholder: "e.g. CSE".to_string(),
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
