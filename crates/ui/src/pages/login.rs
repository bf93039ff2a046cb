//! Login Page Component
//!
//! One id field for every role. The id decides the endpoint: the configured
//! admin id logs in as admin, ids starting with `FAC` as faculty, anything
//! else as a student.

use dioxus::prelude::*;
use kithab_client::{ClientError, LoginRequest};
use kithab_core::Role;
use tracing::info;

use crate::components::inputs::{Banner, TextInput};
use crate::state::{APP_STATE, Page, api_client};

/// Hint under the id field for the role the id routes to
fn role_hint(role: Role) -> &'static str {
    match role {
        Role::Admin => "Signing in as administrator",
        Role::Faculty => "Signing in as faculty (employee id)",
        Role::Student => "Signing in as student (roll number)",
    }
}

/// Login page
#[component]
pub fn LoginPage() -> Element {
    let mut id = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_busy = use_signal(|| false);

    let mut submit = move || {
        if *is_busy.read() {
            return;
        }
        let admin_id = APP_STATE.peek().config.admin_id.clone();
        let request = match LoginRequest::new(&id.read(), &password.read(), &admin_id) {
            Ok(request) => request,
            Err(e) => {
                error.set(Some(ClientError::from(e).user_message("Login failed")));
                return;
            }
        };
        error.set(None);
        is_busy.set(true);

        spawn(async move {
            let result = match api_client() {
                Ok(api) => api.login(&request).await,
                Err(e) => Err(e),
            };
            // A rejected login is a credentials problem, not an expired
            // session, so it stays on this form.
            match result {
                Ok(response) => {
                    let name = response.user.name.clone();
                    match APP_STATE.write().establish(response) {
                        Ok(()) => {
                            info!(role = %request.role, user = %name, "logged in");
                            password.set(String::new());
                        }
                        Err(e) => error.set(Some(e.to_string())),
                    }
                }
                Err(e) => error.set(Some(e.user_message("Login failed"))),
            }
            is_busy.set(false);
        });
    };

    let busy = *is_busy.read();
    let hint = {
        let current = id.read();
        if current.trim().is_empty() {
            None
        } else {
            let admin_id = APP_STATE.read().config.admin_id.clone();
            Some(role_hint(kithab_client::route_login(&current, &admin_id)))
        }
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { class: "auth-title", "Kithab" }
                p { class: "muted", "Sign in to find and share course notes" }

                form {
                    onsubmit: move |e: FormEvent| {
                        e.prevent_default();
                        submit();
                    },

                    Banner { message: error.read().clone() }

                    TextInput {
                        label: "ID".to_string(),
                        placeholder: "Roll number, employee id or admin id".to_string(),
                        value: id.read().clone(),
                        disabled: busy,
                        on_change: move |v: String| id.set(v),
                    }
                    if let Some(hint) = hint {
                        p { class: "input-hint", "{hint}" }
                    }

                    TextInput {
                        label: "Password".to_string(),
                        input_type: "password".to_string(),
                        value: password.read().clone(),
                        disabled: busy,
                        on_change: move |v: String| password.set(v),
                    }

                    button {
                        r#type: "submit",
                        class: "btn btn-primary btn-block",
                        disabled: busy,
                        if busy { "Signing in..." } else { "Login" }
                    }
                }

                div {
                    class: "auth-links",
                    button {
                        r#type: "button",
                        class: "btn-link",
                        onclick: move |_| APP_STATE.write().navigate(Page::ForgotPassword),
                        "Forgot password?"
                    }
                    button {
                        r#type: "button",
                        class: "btn-link",
                        onclick: move |_| APP_STATE.write().navigate(Page::Register),
                        "New student? Register"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hint() {
        assert!(role_hint(Role::Faculty).contains("faculty"));
        assert!(role_hint(Role::Student).contains("roll number"));
    }
}
