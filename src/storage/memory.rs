//! In-process player store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{DeleteOutcome, InsertOutcome, PlayerStore, StoreError};
use crate::models::{Player, PlayerId};
use crate::query::{PlayerFilter, PlayerPatch};

/// Player store held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryPlayerStore {
    players: RwLock<Vec<Player>>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored players.
    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, mut player: Player) -> Result<InsertOutcome, StoreError> {
        let id = PlayerId::generate();
        player.id = Some(id);
        self.players.write().await.push(player);
        debug!("Inserted player {}", id);
        Ok(InsertOutcome { inserted_id: id })
    }

    async fn find(&self, filter: &PlayerFilter) -> Result<Vec<Player>, StoreError> {
        let players = self.players.read().await;
        Ok(players
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &PlayerId) -> Result<Player, StoreError> {
        let players = self.players.read().await;
        players
            .iter()
            .find(|p| p.id.as_ref() == Some(id))
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    async fn update(&self, id: &PlayerId, patch: &PlayerPatch) -> Result<Player, StoreError> {
        let mut players = self.players.write().await;
        let player = players
            .iter_mut()
            .find(|p| p.id.as_ref() == Some(id))
            .ok_or(StoreError::NotFound(*id))?;
        patch.apply(player);
        Ok(player.clone())
    }

    async fn delete(&self, id: &PlayerId) -> Result<DeleteOutcome, StoreError> {
        let mut players = self.players.write().await;
        let before = players.len();
        players.retain(|p| p.id.as_ref() != Some(id));
        Ok(DeleteOutcome {
            deleted_count: (before - players.len()) as u64,
        })
    }
}
