//! User - Platform Users

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::dates::lenient_timestamp;
use super::null_as_default;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn token(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

/// A platform user, as listed for task assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub role: Role,
    pub enabled: bool,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub last_login: Option<NaiveDateTime>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            role: Role::default(),
            enabled: true,
            last_login: None,
        }
    }
}

impl User {
    /// "First Last", falling back to the email when both names are blank
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_parses_and_names() {
        let user: User = serde_json::from_str(
            r#"{
                "id": "u-1",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "role": "ADMIN"
            }"#,
        )
        .expect("parses");
        assert_eq!(user.role, Role::Admin);
        assert!(user.enabled);
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User {
            email: "ops@example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "ops@example.com");
    }
}
