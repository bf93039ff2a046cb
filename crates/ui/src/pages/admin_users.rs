//! Admin Users Page Component
//!
//! Students and faculty, one role at a time. Editing opens the user's full
//! field map; deleting asks for confirmation first.

use dioxus::prelude::*;
use kithab_catalog::User;
use kithab_catalog::user::display_value;
use kithab_core::Role;

use crate::components::inputs::{Select, SelectOption};
use crate::state::{APP_STATE, DeleteTarget, Dialog, api_client, settle, use_revision};

/// Roles the user manager lists
pub const MANAGED_ROLES: [Role; 2] = [Role::Student, Role::Faculty];

/// One table row
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub user: User,
    pub login_id: String,
    pub email: String,
    /// Branch for students, designation for faculty
    pub detail: String,
}

impl UserRow {
    pub fn new(user: &User, role: Role) -> Self {
        let login_id = match role {
            Role::Student => user.roll_number.clone(),
            Role::Faculty => user.employee_id.clone(),
            Role::Admin => user.admin_id.clone(),
        };
        let detail = match role {
            Role::Student => user.extra.get("branch").map(display_value),
            Role::Faculty => user.designation.clone(),
            Role::Admin => None,
        };
        Self {
            user: user.clone(),
            login_id: login_id.unwrap_or_else(|| "-".to_string()),
            email: user.email.clone().unwrap_or_else(|| "-".to_string()),
            detail: detail.filter(|d| !d.is_empty()).unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Column headers for the id and detail columns
pub fn role_columns(role: Role) -> (&'static str, &'static str) {
    match role {
        Role::Student => ("Roll Number", "Branch"),
        Role::Faculty => ("Employee ID", "Designation"),
        Role::Admin => ("Admin ID", "-"),
    }
}

/// Admin user manager
#[component]
pub fn AdminUsersPage() -> Element {
    let mut role = use_signal(|| Role::Student);

    let revision = use_revision();
    let users = use_resource(move || async move {
        revision();
        let role = role();
        let result = match api_client() {
            Ok(api) => api.users(role).await,
            Err(e) => Err(e),
        };
        settle(result, "Fetch failed").map(|users| {
            users
                .into_iter()
                .map(|u| match u.role {
                    Some(_) => u,
                    None => u.with_role(role),
                })
                .map(|u| UserRow::new(&u, role))
                .collect::<Vec<_>>()
        })
    });

    let current_role = role();
    let (id_column, detail_column) = role_columns(current_role);
    let role_options: Vec<SelectOption> = MANAGED_ROLES
        .iter()
        .map(|r| SelectOption::new(r.as_str(), r.display_name()))
        .collect();
    let rows = users.read().clone();

    rsx! {
        div {
            class: "page",

            div {
                class: "page-header",
                h1 { "Users" }
            }

            div {
                class: "table-filter",
                Select {
                    label: "Role".to_string(),
                    value: current_role.as_str().to_string(),
                    options: role_options,
                    on_change: move |v: String| {
                        if let Some(r) = MANAGED_ROLES.iter().find(|r| r.as_str() == v) {
                            role.set(*r);
                        }
                    },
                }
            }

            match rows {
                None => rsx! { p { class: "muted", "Loading users..." } },
                Some(None) => rsx! { p { class: "empty-state", "Users could not be loaded." } },
                Some(Some(rows)) if rows.is_empty() => rsx! {
                    p { class: "empty-state", "No users found." }
                },
                Some(Some(rows)) => rsx! {
                    table {
                        class: "data-table",
                        thead {
                            tr {
                                th { "Name" }
                                th { "{id_column}" }
                                th { "Email" }
                                th { "{detail_column}" }
                                th { class: "actions", "Actions" }
                            }
                        }
                        tbody {
                            for row in rows {
                                UserRowView { key: "{row.user.id}", row: row }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn UserRowView(row: UserRow) -> Element {
    let edit_user = row.user.clone();
    let delete_target = DeleteTarget::User {
        id: row.user.id.clone(),
        name: row.user.name.clone(),
    };

    rsx! {
        tr {
            td { "{row.user.name}" }
            td { "{row.login_id}" }
            td { "{row.email}" }
            td { "{row.detail}" }
            td {
                class: "actions",
                button {
                    r#type: "button",
                    class: "btn btn-small",
                    onclick: move |_| {
                        APP_STATE
                            .write()
                            .ui
                            .show_dialog(Dialog::EditUser(edit_user.clone()))
                    },
                    "Edit"
                }
                button {
                    r#type: "button",
                    class: "btn btn-small btn-danger",
                    onclick: move |_| {
                        APP_STATE
                            .write()
                            .ui
                            .show_dialog(Dialog::ConfirmDelete(delete_target.clone()))
                    },
                    "Delete"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_student_row() {
        let mut user = User::new("u1", "Asha").with_role(Role::Student);
        user.roll_number = Some("21CS001".to_string());
        user.extra.insert("branch".to_string(), json!("CSE"));
        let row = UserRow::new(&user, Role::Student);
        assert_eq!(row.login_id, "21CS001");
        assert_eq!(row.email, "-");
        assert_eq!(row.detail, "CSE");
    }

    #[test]
    fn test_faculty_row() {
        let mut user = User::new("u2", "Ravi").with_role(Role::Faculty);
        user.employee_id = Some("FAC042".to_string());
        user.email = Some("ravi@college.edu".to_string());
        let row = UserRow::new(&user, Role::Faculty);
        assert_eq!(row.login_id, "FAC042");
        assert_eq!(row.email, "ravi@college.edu");
        assert_eq!(row.detail, "-");
        assert_eq!(role_columns(Role::Faculty), ("Employee ID", "Designation"));
    }
}
