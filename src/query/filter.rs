//! Search filters built from request parameters.

use std::collections::HashMap;

use mongodb::bson::{doc, Document};

use crate::models::{Player, PlayerField};

/// Conjunction of exact-equality clauses over player fields.
///
/// An empty filter selects every player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    clauses: Vec<(PlayerField, String)>,
}

impl PlayerFilter {
    /// Filter matching every player.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from submitted parameters.
    ///
    /// Only the recognized field names are considered, in field order.
    /// Absent and empty values are skipped; unknown parameters are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let clauses = PlayerField::ALL
            .into_iter()
            .filter_map(|field| {
                params
                    .get(field.as_str())
                    .filter(|v| !v.is_empty())
                    .map(|v| (field, v.clone()))
            })
            .collect();
        Self { clauses }
    }

    /// Build a filter from raw query pairs, in request order.
    ///
    /// When a parameter repeats, its first occurrence is the one used.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = HashMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            params.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Self::from_params(&params)
    }

    /// Add an equality clause. Empty values are ignored.
    pub fn with(mut self, field: PlayerField, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.clauses.retain(|(f, _)| *f != field);
            self.clauses.push((field, value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[(PlayerField, String)] {
        &self.clauses
    }

    /// Render as a query document: `{field: {"$eq": value}, ...}`.
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        for (field, value) in &self.clauses {
            filter.insert(field.as_str(), doc! { "$eq": value.as_str() });
        }
        filter
    }

    /// Evaluate the filter against a player in memory.
    pub fn matches(&self, player: &Player) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| player.field(*field) == value.as_str())
    }
}
