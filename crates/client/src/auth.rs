//! Login routing and account forms

use crate::error::{ClientError, ClientResult};
use kithab_catalog::User;
use kithab_core::{FieldErrors, PortalError, PortalResult, Role, Validatable};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Login ids starting with this prefix belong to faculty
pub const FACULTY_PREFIX: &str = "FAC";

/// Branches offered on the registration form
pub const REGISTER_BRANCHES: [&str; 5] = ["CSE", "ECE", "EEE", "MECH", "CIVIL"];

const MIN_PASSWORD_LEN: usize = 6;

/// Pick the login endpoint for an id
pub fn route_login(id: &str, admin_id: &str) -> Role {
    let id = id.trim();
    if !admin_id.is_empty() && id == admin_id.trim() {
        Role::Admin
    } else if id.starts_with(FACULTY_PREFIX) {
        Role::Faculty
    } else {
        Role::Student
    }
}

// ============================================================================
// Login
// ============================================================================

/// A routed, non-empty login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub role: Role,
    pub id: String,
    pub password: String,
}

impl LoginRequest {
    /// Trim the credentials and route them; blank input is refused here
    pub fn new(id: &str, password: &str, admin_id: &str) -> PortalResult<Self> {
        let id = id.trim();
        let password = password.trim();
        if id.is_empty() || password.is_empty() {
            return Err(PortalError::validation("ID and password required"));
        }
        Ok(Self {
            role: route_login(id, admin_id),
            id: id.to_string(),
            password: password.to_string(),
        })
    }

    /// `/auth/<role>/login`
    pub fn path(&self) -> String {
        format!("/auth/{}", self.role.login_path())
    }

    /// Body with the id under the role's field name
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert(self.role.id_field().to_string(), Value::String(self.id.clone()));
        body.insert("password".to_string(), Value::String(self.password.clone()));
        Value::Object(body)
    }
}

/// Successful login: `{ token, <role>: user }`
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl LoginResponse {
    /// Decode the login body; the user sits under the role's key
    pub fn from_value(role: Role, mut value: Value) -> ClientResult<Self> {
        let token = value
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ClientError::Parse("login response has no token".to_string()))?;

        let user_value = match value.get_mut(role.as_str()).map(Value::take) {
            Some(user) if !user.is_null() => user,
            _ => value
                .get_mut("user")
                .map(Value::take)
                .ok_or_else(|| ClientError::Parse("login response has no user".to_string()))?,
        };
        let mut user: User =
            serde_json::from_value(user_value).map_err(|e| ClientError::Parse(e.to_string()))?;
        if user.role.is_none() {
            user.role = Some(role);
        }
        Ok(Self { token, user })
    }
}

// ============================================================================
// Registration and password reset
// ============================================================================

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"\S+@\S+\.\S+").ok())
        .as_ref()
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    let well_formed = email_pattern().is_none_or(|re| re.is_match(email));
    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !well_formed {
        errors.insert("email", "Invalid email format");
    }
}

/// Student self-registration form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub branch: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body for `POST /auth/student/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub password: String,
    pub branch: String,
}

impl Validatable for RegisterForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Full name is required");
        }
        check_email(&self.email, &mut errors);
        if self.roll_number.trim().is_empty() {
            errors.insert("rollNumber", "Roll number is required");
        }
        if self.branch.trim().is_empty() {
            errors.insert("branch", "Branch is required");
        }
        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert("password", "Password must be at least 6 characters");
        }
        if self.password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match");
        }
        errors
    }
}

impl RegisterForm {
    /// Validate and build the request body
    pub fn to_request(&self) -> Result<RegisterRequest, FieldErrors> {
        let errors = self.field_errors();
        if errors.has_field_errors() {
            return Err(errors);
        }
        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            roll_number: self.roll_number.trim().to_string(),
            password: self.password.clone(),
            branch: self.branch.trim().to_string(),
        })
    }
}

/// Forgot-password form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl Validatable for ForgotPasswordForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_email(&self.email, &mut errors);
        errors
    }
}

/// Reset-password form reached from the emailed link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub new_password: String,
    pub confirm_password: String,
}

impl Validatable for ResetPasswordForm {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.new_password.is_empty() || self.confirm_password.is_empty() {
            errors.insert("newPassword", "Both fields are required");
        } else if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert("newPassword", "Password must be at least 6 characters");
        } else if self.new_password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match");
        }
        errors
    }
}

/// Pull the token out of a pasted reset link, or take the input as-is
pub fn extract_reset_token(input: &str) -> String {
    let input = input.trim();
    let tail = match input.rfind("/reset-password/") {
        Some(at) => &input[at + "/reset-password/".len()..],
        None => input,
    };
    tail.split(['?', '#', '/'])
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_route_login() {
        assert_eq!(route_login(" admin ", "admin"), Role::Admin);
        assert_eq!(route_login("FAC1024", "admin"), Role::Faculty);
        assert_eq!(route_login("fac1024", "admin"), Role::Student);
        assert_eq!(route_login("21CS001", "admin"), Role::Student);
        assert_eq!(route_login("admin", ""), Role::Student);
    }

    #[test]
    fn test_blank_credentials_refused() {
        let err = LoginRequest::new("  ", "secret", "admin").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: ID and password required");
        assert!(LoginRequest::new("21CS001", "   ", "admin").is_err());
    }

    #[test]
    fn test_login_body_per_role() {
        let request = LoginRequest::new(" FAC7 ", " pw123 ", "admin").unwrap();
        assert_eq!(request.path(), "/auth/faculty/login");
        assert_eq!(request.body(), json!({ "employeeId": "FAC7", "password": "pw123" }));

        let request = LoginRequest::new("admin", "pw", "admin").unwrap();
        assert_eq!(request.body(), json!({ "adminId": "admin", "password": "pw" }));
    }

    #[test]
    fn test_login_response_user_under_role_key() {
        let response = LoginResponse::from_value(
            Role::Faculty,
            json!({
                "token": "jwt",
                "faculty": { "_id": "f1", "name": "Dr. Rao", "employeeId": "FAC7" }
            }),
        )
        .unwrap();
        assert_eq!(response.token, "jwt");
        assert_eq!(response.user.role, Some(Role::Faculty));
        assert_eq!(response.user.login_id(), Some("FAC7"));

        assert!(LoginResponse::from_value(Role::Student, json!({ "student": {} })).is_err());
    }

    #[test]
    fn test_register_validation() {
        let errors = RegisterForm {
            email: "not-an-email".to_string(),
            password: "abc".to_string(),
            confirm_password: "abd".to_string(),
            ..Default::default()
        }
        .field_errors();
        assert_eq!(errors.get("name"), Some("Full name is required"));
        assert_eq!(errors.get("email"), Some("Invalid email format"));
        assert_eq!(errors.get("rollNumber"), Some("Roll number is required"));
        assert_eq!(errors.get("branch"), Some("Branch is required"));
        assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));
    }

    #[test]
    fn test_register_request_is_trimmed() {
        let form = RegisterForm {
            name: " Asha ".to_string(),
            email: "asha@college.edu".to_string(),
            roll_number: " 21CS001".to_string(),
            branch: "CSE".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.name, "Asha");
        assert_eq!(
            serde_json::to_value(&request).unwrap()["rollNumber"],
            json!("21CS001")
        );
    }

    #[test]
    fn test_reset_password_rules() {
        let form = |a: &str, b: &str| ResetPasswordForm {
            new_password: a.to_string(),
            confirm_password: b.to_string(),
        };
        assert_eq!(
            form("", "x").validation_errors(),
            vec!["Both fields are required"]
        );
        assert_eq!(
            form("abc", "abc").validation_errors(),
            vec!["Password must be at least 6 characters"]
        );
        assert_eq!(
            form("secret1", "secret2").validation_errors(),
            vec!["Passwords do not match"]
        );
        assert!(form("secret1", "secret1").is_valid());
        assert!(!ForgotPasswordForm::default().is_valid());
    }

    #[test]
    fn test_extract_reset_token() {
        assert_eq!(extract_reset_token("  abc123 "), "abc123");
        assert_eq!(
            extract_reset_token("http://localhost:3000/reset-password/abc123"),
            "abc123"
        );
        assert_eq!(
            extract_reset_token("https://portal.example/reset-password/abc123?x=1"),
            "abc123"
        );
        assert_eq!(extract_reset_token(""), "");
    }
}
