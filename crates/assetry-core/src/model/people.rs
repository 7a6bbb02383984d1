//! People and the local operator profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::any::AnyRecord;
use crate::entity::{Entity, Field};
use crate::types::{EntityKind, Facet, Record};

/// A user account that assets and licenses can be assigned to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Person {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Login name
    pub username: String,
    /// Email address
    pub email: String,
    /// Department
    pub department: String,
    /// Office location
    pub location: String,
    /// Job title
    pub job_title: String,
    /// Manager's name
    pub manager: String,
    /// HR employee number
    pub employee_number: String,
    /// Phone number
    pub phone: String,
    /// Whether the account is active
    pub activated: bool,
    /// Last sign-in
    #[serde(with = "crate::json::moment")]
    pub last_login: Option<DateTime<Utc>>,
}

impl Person {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl Entity for Person {
    const KIND: EntityKind = EntityKind::Person;

    const FIELDS: &'static [Field] = &[
        Field::new("firstName", "first_name"),
        Field::new("lastName", "last_name"),
        Field::same("username"),
        Field::same("email"),
        Field::same("department"),
        Field::same("location"),
        Field::new("jobTitle", "job_title"),
        Field::same("manager"),
        Field::new("employeeNumber", "employee_number"),
        Field::same("phone"),
        Field::same("activated"),
        Field::new("lastLogin", "last_login"),
    ];

    const REQUIRED: &'static [&'static str] = &["firstName", "lastName", "username", "email"];

    fn title(&self) -> String {
        format!("{} <{}>", self.full_name(), self.email)
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.username.as_str(),
            self.email.as_str(),
            self.employee_number.as_str(),
        ]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Department => Some(&self.department),
            _ => None,
        }
    }

    fn into_any(record: Record<Self>) -> AnyRecord {
        AnyRecord::Person(record)
    }
}

/// The console operator's own profile. Kept only in the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Local profile id
    pub id: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Login name
    pub username: String,
    /// Department
    pub department: String,
    /// Job title
    pub job_title: String,
    /// Office location
    pub location: String,
    /// Granted permissions
    pub permissions: Vec<String>,
    /// Display preferences
    pub preferences: Preferences,
}

/// Display preferences of the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// `light` or `dark`
    pub theme: String,
    /// UI language
    pub language: String,
    /// IANA timezone name
    pub timezone: String,
    /// Whether notifications are shown
    pub notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            notifications: true,
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: "1".to_string(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            email: "admin@company.com".to_string(),
            username: "admin".to_string(),
            department: "IT".to_string(),
            job_title: "System Administrator".to_string(),
            location: "Main Office".to_string(),
            permissions: vec!["admin".to_string()],
            preferences: Preferences::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_person_requires_identity_fields() {
        let mut person = Person {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada".into(),
            ..Person::default()
        };
        assert_eq!(person.validate().unwrap_err().field(), Some("email"));
        person.email = "ada@example.com".into();
        assert!(person.validate().is_ok());
        assert_eq!(person.title(), "Ada Lovelace <ada@example.com>");
    }

    #[test]
    fn test_profile_defaults() {
        let profile = UserProfile::default();
        assert_eq!(profile.email, "admin@company.com");
        assert_eq!(profile.department, "IT");
        assert_eq!(profile.preferences.theme, "light");
        assert!(profile.preferences.notifications);
    }

    #[test]
    fn test_partial_profile_fills_defaults() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"firstName": "Grace", "preferences": {"theme": "dark"}}"#)
                .unwrap();
        assert_eq!(profile.first_name, "Grace");
        assert_eq!(profile.last_name, "User");
        assert_eq!(profile.preferences.theme, "dark");
        assert_eq!(profile.preferences.timezone, "UTC");
    }
}
