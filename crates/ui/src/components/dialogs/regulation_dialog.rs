//! # Regulation Dialog Component
//!
//! Create and edit regulations. The draft is checked against the loaded
//! catalog before anything is sent, so duplicate names are reported inline.

use dioxus::prelude::*;
use kithab_catalog::validation::{FIELD_NAME, FIELD_SEMESTERS};
use kithab_catalog::RegulationDraft;
use kithab_core::{FieldErrors, RegulationId};

use crate::components::inputs::{Banner, TextInput};
use crate::state::{APP_STATE, api_client, mutation_done, settle};

/// Mode for the regulation dialog
#[derive(Debug, Clone, PartialEq)]
pub enum RegulationDialogMode {
    Create,
    Edit(RegulationId),
}

/// Regulation creation and editing dialog
#[component]
pub fn RegulationDialog(mode: RegulationDialogMode) -> Element {
    let initial = match &mode {
        RegulationDialogMode::Create => RegulationDraft::default(),
        RegulationDialogMode::Edit(id) => APP_STATE
            .read()
            .catalog
            .regulation(id)
            .map(RegulationDraft::from)
            .unwrap_or_default(),
    };

    let mut draft = use_signal(|| initial);
    let mut errors = use_signal(FieldErrors::new);
    let mut is_saving = use_signal(|| false);

    let editing = match &mode {
        RegulationDialogMode::Create => None,
        RegulationDialogMode::Edit(id) => Some(id.clone()),
    };
    let title = if editing.is_some() { "Edit Regulation" } else { "Add Regulation" };

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
                "Failed to update regulation"
            } else {
                "Failed to add regulation"
            };
            let result = match api_client() {
                Ok(api) => match &editing {
                    Some(id) => api.update_regulation(id, &payload).await,
                    None => api.create_regulation(&payload).await,
                },
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => mutation_done(if editing.is_some() {
                    "Regulation updated"
                } else {
                    "Regulation added"
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

    rsx! {
        div {
            class: "dialog",

            h2 { class: "dialog-title", "{title}" }

            Banner { message: field_errors.server().map(str::to_string) }

            TextInput {
                label: "Name".to_string(),
                placeholder: "e.g. R2021".to_string(),
                value: current.name.clone(),
                disabled: saving,
                error: field_errors.get(FIELD_NAME).map(str::to_string),
                on_change: move |v: String| draft.write().name = v,
            }

            TextInput {
                label: "Number of semesters".to_string(),
                input_type: "number".to_string(),
                value: current.number_of_semesters.clone(),
                disabled: saving,
                error: field_errors.get(FIELD_SEMESTERS).map(str::to_string),
                on_change: move |v: String| draft.write().number_of_semesters = v,
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
