//! # User Dialog Component
//!
//! Edits a user's field map as the server sent it. Internal keys are never
//! shown, and untouched fields go back with their original values.

use dioxus::prelude::*;
use kithab_catalog::User;
use std::collections::BTreeMap;

use crate::components::inputs::{Banner, TextInput};
use crate::state::{APP_STATE, api_client, mutation_done, settle};

/// Form label for a camelCase server key: `rollNumber` → `Roll Number`
pub fn field_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            label.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            label.push(' ');
            label.push(ch);
        } else if ch == '_' {
            label.push(' ');
        } else {
            label.push(ch);
        }
    }
    label
}

/// User editing dialog
#[component]
pub fn UserDialog(user: User) -> Element {
    let initial = user.edit_form();
    let mut form = use_signal(|| initial);
    let mut server_error = use_signal(|| None::<String>);
    let mut is_saving = use_signal(|| false);

    let handle_save = {
        let user = user.clone();
        move |_| {
            if *is_saving.read() {
                return;
            }
            is_saving.set(true);
            server_error.set(None);
            let body = user.update_payload(&form.read());
            let id = user.id.clone();
            spawn(async move {
                let result = match api_client() {
                    Ok(api) => api.update_user(&id, &body).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(()) => mutation_done("User updated"),
                    Err(e) => {
                        let message = e.user_message("Update failed");
                        settle::<()>(Err(e), "Update failed");
                        server_error.set(Some(message));
                    }
                }
                is_saving.set(false);
            });
        }
    };

    let handle_cancel = move |_| {
        APP_STATE.write().ui.close_dialog();
    };

    let saving = *is_saving.read();
    let fields: BTreeMap<String, String> = form.read().clone();
    let title = format!("Edit {} {}", user.role_label(), user.name);

    rsx! {
        div {
            class: "dialog",

            h2 { class: "dialog-title", "{title}" }

            Banner { message: server_error.read().clone() }

            div {
                class: "dialog-body scroll",
                for (key, value) in fields {
                    TextInput {
                        key: "{key}",
                        label: field_label(&key),
                        value: value,
                        disabled: saving,
                        on_change: {
                            let key = key.clone();
                            move |v: String| {
                                form.write().insert(key.clone(), v);
                            }
                        },
                    }
                }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_label() {
        assert_eq!(field_label("rollNumber"), "Roll Number");
        assert_eq!(field_label("email"), "Email");
        assert_eq!(field_label("created_at"), "Created at");
    }
}
