//! User accounts as the admin user manager sees them
//!
//! The backend owns the account schema. Known fields are typed; everything
//! else rides along in `extra` so editing a user never drops data the
//! client does not understand.

use kithab_core::{Identified, Role, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Keys never shown or sent back from the edit form
pub const HIDDEN_FIELDS: [&str; 3] = ["_id", "__v", "password"];

/// A portal account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,

    /// Server fields the client has no type for
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl User {
    /// Create a user with just an id and a name
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role: None,
            roll_number: None,
            employee_id: None,
            admin_id: None,
            designation: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// The identifier the user logs in with, for their role
    pub fn login_id(&self) -> Option<&str> {
        match self.role? {
            Role::Student => self.roll_number.as_deref(),
            Role::Faculty => self.employee_id.as_deref(),
            Role::Admin => self.admin_id.as_deref(),
        }
    }

    /// Every visible field rendered as text, in key order
    pub fn visible_fields(&self) -> Vec<(String, String)> {
        self.as_map()
            .into_iter()
            .filter(|(key, _)| !HIDDEN_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key, display_value(&value)))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .collect()
    }

    /// Editable copy of the visible fields
    pub fn edit_form(&self) -> BTreeMap<String, String> {
        self.visible_fields().into_iter().collect()
    }

    /// Human-readable role, empty when the server sent none
    pub fn role_label(&self) -> &'static str {
        self.role.map(|r| r.display_name()).unwrap_or("")
    }

    /// Build the update body from an edited form.
    ///
    /// Untouched fields keep their original JSON value so numbers and
    /// nested references survive a save; edited fields are sent as text.
    /// Hidden keys are never sent.
    pub fn update_payload(&self, form: &BTreeMap<String, String>) -> Value {
        let original = self.as_map();
        let mut body = Map::new();
        for (key, text) in form {
            if HIDDEN_FIELDS.contains(&key.as_str()) {
                continue;
            }
            let value = match original.get(key) {
                Some(value) if display_value(value) == *text => value.clone(),
                _ => Value::String(text.clone()),
            };
            body.insert(key.clone(), value);
        }
        Value::Object(body)
    }

    fn as_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

impl Identified for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

/// Render a loosely typed server value for a table cell
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("_id"))
            .map(display_value)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn student() -> User {
        serde_json::from_value(json!({
            "_id": "u1",
            "__v": 0,
            "name": "Asha",
            "email": "asha@college.edu",
            "role": "student",
            "rollNumber": "21CS001",
            "password": "$2b$10$hash",
            "branch": { "_id": "b1", "name": "CSE" },
            "year": 3
        }))
        .unwrap()
    }

    #[test]
    fn test_hidden_fields_never_listed() {
        let keys: Vec<String> = student().visible_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["branch", "email", "name", "role", "rollNumber", "year"]);
    }

    #[test]
    fn test_display_values() {
        let form = student().edit_form();
        assert_eq!(form["branch"], "CSE");
        assert_eq!(form["year"], "3");
        assert_eq!(form["role"], "student");
    }

    #[test]
    fn test_update_payload_keeps_untouched_values() {
        let user = student();
        let mut form = user.edit_form();
        form.insert("name".to_string(), "Asha K".to_string());

        let body = user.update_payload(&form);
        assert_eq!(body["name"], "Asha K");
        assert_eq!(body["year"], 3);
        assert_eq!(body["branch"]["_id"], "b1");
        assert!(body.get("password").is_none());
        assert!(body.get("_id").is_none());
    }

    #[test]
    fn test_login_id_follows_role() {
        let user = student();
        assert_eq!(user.login_id(), Some("21CS001"));
        assert_eq!(User::new("u2", "Nobody").login_id(), None);
    }
}
