//! Password Reset Page Components
//!
//! Two steps: request the reset email, then set a new password with the
//! token from the emailed link.

use dioxus::prelude::*;
use kithab_client::{ForgotPasswordForm, ResetPasswordForm, extract_reset_token};
use kithab_core::{FieldErrors, Validatable};
use tracing::info;

use crate::components::inputs::{Banner, TextInput};
use crate::state::{APP_STATE, Page, StatusLevel, api_client, notify};

// ============================================================================
// Forgot Password
// ============================================================================

/// Request a reset email
#[component]
pub fn ForgotPasswordPage() -> Element {
    let mut form = use_signal(ForgotPasswordForm::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut sent = use_signal(|| false);
    let mut is_busy = use_signal(|| false);

    let handle_submit = move |_| {
        if *is_busy.read() {
            return;
        }
        let field_errors = form.read().field_errors();
        if field_errors.has_field_errors() {
            errors.set(field_errors);
            return;
        }
        errors.set(FieldErrors::new());
        is_busy.set(true);
        let email = form.read().email.clone();

        spawn(async move {
            let result = match api_client() {
                Ok(api) => api.forgot_password(&email).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    info!("password reset requested");
                    sent.set(true);
                }
                Err(e) => errors
                    .write()
                    .set_server(e.user_message("Failed to send reset email")),
            }
            is_busy.set(false);
        });
    };

    let busy = *is_busy.read();
    let field_errors = errors.read().clone();

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { class: "auth-title", "Forgot Password" }

                if *sent.read() {
                    p { "If that email is registered, a reset link is on its way." }
                    button {
                        r#type: "button",
                        class: "btn btn-primary btn-block",
                        onclick: move |_| APP_STATE.write().navigate(Page::ResetPassword),
                        "I have a reset link"
                    }
                } else {
                    Banner { message: field_errors.server().map(str::to_string) }
                    TextInput {
                        label: "Email".to_string(),
                        input_type: "email".to_string(),
                        value: form.read().email.clone(),
                        disabled: busy,
                        error: field_errors.get("email").map(str::to_string),
                        on_change: move |v: String| form.write().email = v,
                    }
                    button {
                        r#type: "button",
                        class: "btn btn-primary btn-block",
                        disabled: busy,
                        onclick: handle_submit,
                        if busy { "Sending..." } else { "Send reset link" }
                    }
                }

                div {
                    class: "auth-links",
                    button {
                        r#type: "button",
                        class: "btn-link",
                        onclick: move |_| APP_STATE.write().navigate(Page::Login),
                        "Back to login"
                    }
                }
            }
        }
    }
}

// ============================================================================
// Reset Password
// ============================================================================

/// Set a new password with an emailed token
#[component]
pub fn ResetPasswordPage() -> Element {
    let mut token = use_signal(String::new);
    let mut form = use_signal(ResetPasswordForm::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut is_busy = use_signal(|| false);

    let handle_submit = move |_| {
        if *is_busy.read() {
            return;
        }
        let mut field_errors = form.read().field_errors();
        let reset_token = extract_reset_token(&token.read());
        if reset_token.is_empty() {
            field_errors.insert("token", "Reset link or token is required");
        }
        if field_errors.has_field_errors() {
            errors.set(field_errors);
            return;
        }
        errors.set(FieldErrors::new());
        is_busy.set(true);
        let new_password = form.read().new_password.clone();

        spawn(async move {
            let result = match api_client() {
                Ok(api) => api.reset_password(&reset_token, &new_password).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    info!("password reset");
                    form.set(ResetPasswordForm::default());
                    token.set(String::new());
                    APP_STATE.write().navigate(Page::Login);
                    notify("Password reset successful. Please login.", StatusLevel::Success);
                }
                Err(e) => errors
                    .write()
                    .set_server(e.user_message("Failed to reset password")),
            }
            is_busy.set(false);
        });
    };

    let busy = *is_busy.read();
    let current = form.read().clone();
    let field_errors = errors.read().clone();

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { class: "auth-title", "Reset Password" }

                Banner { message: field_errors.server().map(str::to_string) }

                TextInput {
                    label: "Reset link or token".to_string(),
                    value: token.read().clone(),
                    disabled: busy,
                    error: field_errors.get("token").map(str::to_string),
                    on_change: move |v: String| token.set(v),
                }
                TextInput {
                    label: "New password".to_string(),
                    input_type: "password".to_string(),
                    value: current.new_password.clone(),
                    disabled: busy,
                    error: field_errors.get("newPassword").map(str::to_string),
                    on_change: move |v: String| form.write().new_password = v,
                }
                TextInput {
                    label: "Confirm password".to_string(),
                    input_type: "password".to_string(),
                    value: current.confirm_password.clone(),
                    disabled: busy,
                    error: field_errors.get("confirmPassword").map(str::to_string),
                    on_change: move |v: String| form.write().confirm_password = v,
                }

                button {
                    r#type: "button",
                    class: "btn btn-primary btn-block",
                    disabled: busy,
                    onclick: handle_submit,
                    if busy { "Resetting..." } else { "Reset password" }
                }

                div {
                    class: "auth-links",
                    button {
                        r#type: "button",
                        class: "btn-link",
                        onclick: move |_| APP_STATE.write().navigate(Page::Login),
                        "Back to login"
                    }
                }
            }
        }
    }
}
