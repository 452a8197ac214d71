//! Partial player updates.

use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::models::{Player, PlayerField};

/// The fields a client asked to change.
///
/// Decoded straight from a JSON body. A field that is absent, null or an
/// empty string is not part of the update; the identifier is never
/// updatable and is ignored if sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telnumber: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PlayerPatch {
    fn slot(&self, field: PlayerField) -> Option<&str> {
        let value = match field {
            PlayerField::FirstName => &self.firstname,
            PlayerField::LastName => &self.lastname,
            PlayerField::Company => &self.company,
            PlayerField::Status => &self.status,
            PlayerField::Linkedin => &self.linkedin,
            PlayerField::Email => &self.email,
            PlayerField::TelNumber => &self.telnumber,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    /// Builder method to set one field.
    pub fn set(mut self, field: PlayerField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            PlayerField::FirstName => self.firstname = value,
            PlayerField::LastName => self.lastname = value,
            PlayerField::Company => self.company = value,
            PlayerField::Status => self.status = value,
            PlayerField::Linkedin => self.linkedin = value,
            PlayerField::Email => self.email = value,
            PlayerField::TelNumber => self.telnumber = value,
        }
        self
    }

    /// The fields present in this patch, in field order.
    pub fn fields(&self) -> Vec<(PlayerField, &str)> {
        PlayerField::ALL
            .into_iter()
            .filter_map(|f| self.slot(f).map(|v| (f, v)))
            .collect()
    }

    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        PlayerField::ALL.into_iter().all(|f| self.slot(f).is_none())
    }

    /// The sparse field set: `{field: value, ...}`.
    pub fn to_document(&self) -> Document {
        let mut set = Document::new();
        for (field, value) in self.fields() {
            set.insert(field.as_str(), value);
        }
        set
    }

    /// Wrap the field set as a `$set` update.
    pub fn to_set_document(&self) -> Document {
        doc! { "$set": self.to_document() }
    }

    /// Apply the field-level set to a player in memory.
    pub fn apply(&self, player: &mut Player) {
        for (field, value) in self.fields() {
            player.set_field(field, value);
        }
    }
}

impl From<&Player> for PlayerPatch {
    /// Every non-empty field of the player.
    fn from(player: &Player) -> Self {
        PlayerField::ALL
            .into_iter()
            .filter(|f| !player.field(*f).is_empty())
            .fold(Self::default(), |patch, f| patch.set(f, player.field(f)))
    }
}
