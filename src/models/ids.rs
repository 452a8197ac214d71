//! Store-assigned player identifiers.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when a path segment is not a 24-character hex object id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid player id: {0}")]
pub struct InvalidPlayerId(pub String);

/// Identifier of a stored player.
///
/// Wraps a BSON `ObjectId`. Stored natively under `_id`, rendered as a hex
/// string everywhere else.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(ObjectId);

impl PlayerId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parse a hex identifier, rejecting anything that is not a valid object id.
    pub fn parse(s: &str) -> Result<Self, InvalidPlayerId> {
        ObjectId::parse_str(s.trim())
            .map(Self)
            .map_err(|_| InvalidPlayerId(s.to_string()))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0.to_hex())
    }
}

impl From<ObjectId> for PlayerId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for PlayerId {
    type Err = InvalidPlayerId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
