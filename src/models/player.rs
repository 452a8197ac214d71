//! Player record model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PlayerId;

/// Company assigned to players created without one.
pub const DEFAULT_COMPANY: &str = "Red Hat";

/// Status assigned to players created without one.
pub const DEFAULT_STATUS: &str = "Internal";

/// The free-text attributes of a player, in the order they are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerField {
    FirstName,
    LastName,
    Company,
    Status,
    Linkedin,
    Email,
    TelNumber,
}

impl PlayerField {
    /// All fields, in filter order.
    pub const ALL: [PlayerField; 7] = [
        PlayerField::FirstName,
        PlayerField::LastName,
        PlayerField::Company,
        PlayerField::Status,
        PlayerField::Linkedin,
        PlayerField::Email,
        PlayerField::TelNumber,
    ];

    /// Fields a complete player record must carry.
    pub const REQUIRED: [PlayerField; 4] = [
        PlayerField::FirstName,
        PlayerField::LastName,
        PlayerField::Company,
        PlayerField::Status,
    ];

    /// Name used for query parameters, JSON keys and document keys alike.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerField::FirstName => "firstname",
            PlayerField::LastName => "lastname",
            PlayerField::Company => "company",
            PlayerField::Status => "status",
            PlayerField::Linkedin => "linkedin",
            PlayerField::Email => "email",
            PlayerField::TelNumber => "telnumber",
        }
    }
}

impl fmt::Display for PlayerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person record.
///
/// Empty strings stand for "not set" and are left out of the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Assigned by the store on insert
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerId>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub firstname: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lastname: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub company: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub telnumber: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub linkedin: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl Player {
    /// A fresh player carrying the default company and status.
    pub fn with_defaults() -> Self {
        Self {
            company: DEFAULT_COMPANY.to_string(),
            status: DEFAULT_STATUS.to_string(),
            ..Self::default()
        }
    }

    /// Read a field by name.
    pub fn field(&self, field: PlayerField) -> &str {
        match field {
            PlayerField::FirstName => &self.firstname,
            PlayerField::LastName => &self.lastname,
            PlayerField::Company => &self.company,
            PlayerField::Status => &self.status,
            PlayerField::Linkedin => &self.linkedin,
            PlayerField::Email => &self.email,
            PlayerField::TelNumber => &self.telnumber,
        }
    }

    /// Overwrite a field by name.
    pub fn set_field(&mut self, field: PlayerField, value: impl Into<String>) {
        let slot = match field {
            PlayerField::FirstName => &mut self.firstname,
            PlayerField::LastName => &mut self.lastname,
            PlayerField::Company => &mut self.company,
            PlayerField::Status => &mut self.status,
            PlayerField::Linkedin => &mut self.linkedin,
            PlayerField::Email => &mut self.email,
            PlayerField::TelNumber => &mut self.telnumber,
        };
        *slot = value.into();
    }

    /// Required fields that are still empty.
    pub fn missing_required(&self) -> Vec<PlayerField> {
        PlayerField::REQUIRED
            .into_iter()
            .filter(|f| self.field(*f).is_empty())
            .collect()
    }

    /// Whether every required field is set.
    pub fn has_required(&self) -> bool {
        self.missing_required().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults() {
        let p = Player::with_defaults();
        assert_eq!(p.company, "Red Hat");
        assert_eq!(p.status, "Internal");
        assert!(p.id.is_none());
        assert!(p.firstname.is_empty());
        assert!(p.lastname.is_empty());
        assert!(p.telnumber.is_empty());
        assert!(p.linkedin.is_empty());
        assert!(p.email.is_empty());
    }

    #[test]
    fn test_field_names_in_filter_order() {
        let names: Vec<&str> = PlayerField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            vec!["firstname", "lastname", "company", "status", "linkedin", "email", "telnumber"]
        );
    }

    #[test]
    fn test_set_and_read_field() {
        let mut p = Player::default();
        for field in PlayerField::ALL {
            p.set_field(field, format!("v-{}", field));
        }
        for field in PlayerField::ALL {
            assert_eq!(p.field(field), format!("v-{}", field));
        }
        assert_eq!(p.telnumber, "v-telnumber");
    }

    #[test]
    fn test_missing_required() {
        let mut p = Player::with_defaults();
        assert_eq!(
            p.missing_required(),
            vec![PlayerField::FirstName, PlayerField::LastName]
        );
        assert!(!p.has_required());

        p.firstname = "Ann".to_string();
        p.lastname = "Lee".to_string();
        assert!(p.has_required());
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let mut p = Player::with_defaults();
        p.firstname = "Ann".to_string();

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"firstname": "Ann", "company": "Red Hat", "status": "Internal"})
        );
    }

    #[test]
    fn test_json_id_key_is_underscore_id() {
        let id = PlayerId::parse("5f1b2c3d4e5f60718293a4b5").unwrap();
        let p = Player {
            id: Some(id),
            ..Player::default()
        };

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json, serde_json::json!({"_id": "5f1b2c3d4e5f60718293a4b5"}));

        let back: Player = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, Some(id));
    }

    #[test]
    fn test_json_missing_fields_default_to_empty() {
        let p: Player = serde_json::from_str(r#"{"email": "ann@example.com"}"#).unwrap();
        assert_eq!(p.email, "ann@example.com");
        assert_eq!(p.firstname, "");
        assert!(p.id.is_none());
    }
}
