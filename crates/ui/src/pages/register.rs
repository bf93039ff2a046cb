//! Student Registration Page Component

use dioxus::prelude::*;
use kithab_client::{REGISTER_BRANCHES, RegisterForm};
use kithab_core::FieldErrors;
use tracing::info;

use crate::components::inputs::{Banner, Select, SelectOption, TextInput};
use crate::state::{APP_STATE, Page, StatusLevel, api_client, notify};

/// Branch choices offered to new students
pub fn branch_choices() -> Vec<SelectOption> {
    REGISTER_BRANCHES
        .iter()
        .map(|code| SelectOption::new(*code, *code))
        .collect()
}

/// Student self-registration page
#[component]
pub fn RegisterPage() -> Element {
    let mut form = use_signal(RegisterForm::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut is_busy = use_signal(|| false);

    let handle_submit = move |_| {
        if *is_busy.read() {
            return;
        }
        let request = match form.read().to_request() {
            Ok(request) => request,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::new());
        is_busy.set(true);

        spawn(async move {
            let result = match api_client() {
                Ok(api) => api.register(&request).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    info!(roll_number = %request.roll_number, "student registered");
                    form.set(RegisterForm::default());
                    APP_STATE.write().navigate(Page::Login);
                    notify("Registration successful. Please login.", StatusLevel::Success);
                }
                Err(e) => errors.write().set_server(e.user_message("Registration failed")),
            }
            is_busy.set(false);
        });
    };

    let busy = *is_busy.read();
    let current = form.read().clone();
    let field_errors = errors.read().clone();
    let error_for = |field: &str| field_errors.get(field).map(str::to_string);

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { class: "auth-title", "Student Registration" }

                Banner { message: field_errors.server().map(str::to_string) }

                TextInput {
                    label: "Full name".to_string(),
                    value: current.name.clone(),
                    disabled: busy,
                    error: error_for("name"),
                    on_change: move |v: String| form.write().name = v,
                }
                TextInput {
                    label: "Email".to_string(),
                    input_type: "email".to_string(),
                    value: current.email.clone(),
                    disabled: busy,
                    error: error_for("email"),
                    on_change: move |v: String| form.write().email = v,
                }
                TextInput {
                    label: "Roll number".to_string(),
                    value: current.roll_number.clone(),
                    disabled: busy,
                    error: error_for("rollNumber"),
                    on_change: move |v: String| form.write().roll_number = v,
                }
                Select {
                    label: "Branch".to_string(),
                    placeholder: "Select branch".to_string(),
                    value: current.branch.clone(),
                    options: branch_choices(),
                    disabled: busy,
                    error: error_for("branch"),
                    on_change: move |v: String| form.write().branch = v,
                }
                TextInput {
                    label: "Password".to_string(),
                    input_type: "password".to_string(),
                    value: current.password.clone(),
                    disabled: busy,
                    error: error_for("password"),
                    on_change: move |v: String| form.write().password = v,
                }
                TextInput {
                    label: "Confirm password".to_string(),
                    input_type: "password".to_string(),
                    value: current.confirm_password.clone(),
                    disabled: busy,
                    error: error_for("confirmPassword"),
                    on_change: move |v: String| form.write().confirm_password = v,
                }

                button {
                    r#type: "button",
                    class: "btn btn-primary btn-block",
                    disabled: busy,
                    onclick: handle_submit,
                    if busy { "Registering..." } else { "Register" }
                }

                div {
                    class: "auth-links",
                    button {
                        r#type: "button",
                        class: "btn-link",
                        onclick: move |_| APP_STATE.write().navigate(Page::Login),
                        "Already registered? Login"
                    }
                }
            }
        }
    }
}
