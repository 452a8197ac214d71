//! Player persistence.
//!
//! The service talks to storage through [`PlayerStore`]:
//! - [`MongoPlayerStore`]: a MongoDB collection (production)
//! - [`MemoryPlayerStore`]: a process-local list (local runs, tests)

mod memory;
mod mongo;

pub use memory::MemoryPlayerStore;
pub use mongo::{MongoPlayerStore, PlayerRecord};

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{Settings, StoreBackend};
use crate::models::{Player, PlayerId};
use crate::query::{PlayerFilter, PlayerPatch};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Player not found: {0}")]
    NotFound(PlayerId),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Document encoding error: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("Document decoding error: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("Unexpected store response: {0}")]
    Unexpected(String),
}

/// Result of inserting a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOutcome {
    pub inserted_id: PlayerId,
}

/// Result of deleting a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

/// CRUD access to the player collection.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &'static str;

    /// Insert a new player. Any id on the input is discarded; the store assigns one.
    async fn insert(&self, player: Player) -> Result<InsertOutcome, StoreError>;

    /// All players matching the filter.
    async fn find(&self, filter: &PlayerFilter) -> Result<Vec<Player>, StoreError>;

    /// A single player by id.
    async fn find_by_id(&self, id: &PlayerId) -> Result<Player, StoreError>;

    /// Apply a field-level set and return the player as stored afterwards.
    async fn update(&self, id: &PlayerId, patch: &PlayerPatch) -> Result<Player, StoreError>;

    /// Delete a player by id.
    async fn delete(&self, id: &PlayerId) -> Result<DeleteOutcome, StoreError>;
}

/// Open the store selected by the settings.
pub async fn connect(settings: &Settings) -> Result<Arc<dyn PlayerStore>, StoreError> {
    let store: Arc<dyn PlayerStore> = match settings.store.backend {
        StoreBackend::Mongo => Arc::new(MongoPlayerStore::connect(&settings.mongo).await?),
        StoreBackend::Memory => Arc::new(MemoryPlayerStore::new()),
    };
    info!("Using {} player store", store.name());
    Ok(store)
}
