//! Session and account commands

use anyhow::{Result, bail};
use kithab_client::auth::REGISTER_BRANCHES;
use kithab_client::{
    ForgotPasswordForm, LoginRequest, RegisterForm, ResetPasswordForm, extract_reset_token,
};
use kithab_core::{FieldErrors, Validatable};
use tracing::info;

use super::{field_report, local};
use crate::cli::{GlobalArgs, RegisterArgs};
use crate::context::{Context, describe, read_line};
use crate::output;

pub async fn login(global: &GlobalArgs, id: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_line("Password")?,
    };
    let mut ctx = Context::load(global)?;
    let request = LoginRequest::new(id, &password, &ctx.config.admin_id).map_err(local)?;
    info!(role = %request.role, "signing in");

    // A rejected login is a credentials problem, not an expired session
    let response = ctx
        .api
        .login(&request)
        .await
        .map_err(|e| describe(&e, "Login failed"))?;
    ctx.session.establish(response)?;

    if let Some(user) = ctx.session.user() {
        output::success(&format!("Logged in as {} ({})", user.name, user.role_label()));
    }
    Ok(())
}

pub fn logout(global: &GlobalArgs) -> Result<()> {
    let mut ctx = Context::load(global)?;
    ctx.session.teardown()?;
    output::success("Logged out");
    Ok(())
}

pub fn whoami(global: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(global)?;
    let active = ctx.require_login()?;
    for line in output::user_details(&active.user) {
        println!("{}", line);
    }
    Ok(())
}

/// Check the form, including the fixed branch list the portal accepts
fn registration_errors(form: &RegisterForm) -> Option<FieldErrors> {
    let mut errors = form.field_errors();
    let branch = form.branch.trim();
    if !branch.is_empty() && !REGISTER_BRANCHES.contains(&branch) {
        errors.insert(
            "branch",
            format!("Branch must be one of {}", REGISTER_BRANCHES.join(", ")),
        );
    }
    errors.has_field_errors().then_some(errors)
}

pub async fn register(global: &GlobalArgs, args: RegisterArgs) -> Result<()> {
    let form = RegisterForm {
        name: args.name,
        email: args.email,
        roll_number: args.roll_number,
        branch: args.branch.trim().to_ascii_uppercase(),
        confirm_password: args.confirm.unwrap_or_else(|| args.password.clone()),
        password: args.password,
    };
    if let Some(errors) = registration_errors(&form) {
        return Err(field_report(&errors));
    }
    let request = form.to_request().map_err(|e| field_report(&e))?;

    let ctx = Context::load(global)?;
    ctx.api
        .register(&request)
        .await
        .map_err(|e| describe(&e, "Registration failed"))?;
    output::success("Registration successful. Please login.");
    Ok(())
}

pub async fn forgot_password(global: &GlobalArgs, email: &str) -> Result<()> {
    let form = ForgotPasswordForm {
        email: email.trim().to_string(),
    };
    form.validate().map_err(local)?;

    let ctx = Context::load(global)?;
    ctx.api
        .forgot_password(&form.email)
        .await
        .map_err(|e| describe(&e, "Failed to send reset email"))?;
    output::success("Password reset link sent to your email");
    Ok(())
}

pub async fn reset_password(
    global: &GlobalArgs,
    token: &str,
    password: String,
    confirm: Option<String>,
) -> Result<()> {
    let token = extract_reset_token(token);
    if token.is_empty() {
        bail!("Reset link or token is required");
    }
    let form = ResetPasswordForm {
        confirm_password: confirm.unwrap_or_else(|| password.clone()),
        new_password: password,
    };
    form.validate().map_err(local)?;

    let ctx = Context::load(global)?;
    ctx.api
        .reset_password(&token, &form.new_password)
        .await
        .map_err(|e| describe(&e, "Failed to reset password"))?;
    output::success("Password reset successful. Please login.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            roll_number: "21CS001".to_string(),
            branch: "CSE".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration_errors(&form()).is_none());
    }

    #[test]
    fn test_unknown_branch_rejected() {
        let form = RegisterForm {
            branch: "ARCH".to_string(),
            ..form()
        };
        let errors = registration_errors(&form).unwrap();
        assert!(errors.get("branch").unwrap().starts_with("Branch must be one of"));
    }
}
