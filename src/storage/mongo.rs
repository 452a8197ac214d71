//! MongoDB-backed player store.

use async_trait::async_trait;
use futures::{TryStream, TryStreamExt};
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{DeleteOutcome, InsertOutcome, PlayerStore, StoreError};
use crate::config::MongoSettings;
use crate::models::{Player, PlayerId};
use crate::query::{PlayerFilter, PlayerPatch};

/// A player as stored in the collection.
///
/// Empty fields are not written, so a stored document only carries what was set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

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

impl From<Player> for PlayerRecord {
    fn from(p: Player) -> Self {
        Self {
            id: p.id.map(|id| id.object_id()),
            firstname: p.firstname,
            lastname: p.lastname,
            company: p.company,
            status: p.status,
            telnumber: p.telnumber,
            linkedin: p.linkedin,
            email: p.email,
        }
    }
}

impl From<PlayerRecord> for Player {
    fn from(r: PlayerRecord) -> Self {
        Self {
            id: r.id.map(PlayerId::from),
            firstname: r.firstname,
            lastname: r.lastname,
            company: r.company,
            status: r.status,
            telnumber: r.telnumber,
            linkedin: r.linkedin,
            email: r.email,
        }
    }
}

impl PlayerRecord {
    /// Decode a raw collection document.
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        Ok(bson::from_document(document)?)
    }

    /// Encode for insertion.
    pub fn to_document(&self) -> Result<Document, StoreError> {
        Ok(bson::to_document(self)?)
    }
}

/// Drain a document stream into players.
///
/// Documents that fail to decode are logged and skipped; a stream error ends the read.
pub async fn decode_players<S>(mut documents: S) -> Result<Vec<Player>, StoreError>
where
    S: TryStream<Ok = Document> + Unpin,
    StoreError: From<S::Error>,
{
    let mut players = Vec::new();
    let mut skipped = 0;

    while let Some(document) = documents.try_next().await? {
        match PlayerRecord::from_document(document) {
            Ok(record) => players.push(Player::from(record)),
            Err(e) => {
                skipped += 1;
                warn!("Skipping undecodable player document: {}", e);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} undecodable player documents", skipped);
    }
    Ok(players)
}

fn id_filter(id: &PlayerId) -> Document {
    doc! { "_id": id.object_id() }
}

/// Player store over a single MongoDB collection.
///
/// The driver pools connections internally, so one store is shared by all requests.
#[derive(Clone)]
pub struct MongoPlayerStore {
    collection: Collection<Document>,
}

impl MongoPlayerStore {
    /// Build a client for the configured URL and bind the named collection.
    ///
    /// The driver connects lazily; an unreachable server surfaces on first use.
    pub async fn connect(settings: &MongoSettings) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&settings.url).await?;
        let collection = client
            .database(&settings.db)
            .collection::<Document>(&settings.collection);
        info!("Bound collection {}.{}", settings.db, settings.collection);
        Ok(Self::from_collection(collection))
    }

    pub fn from_collection(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl PlayerStore for MongoPlayerStore {
    fn name(&self) -> &'static str {
        "mongo"
    }

    async fn insert(&self, player: Player) -> Result<InsertOutcome, StoreError> {
        let record = PlayerRecord {
            id: None,
            ..PlayerRecord::from(player)
        };
        let result = self.collection.insert_one(record.to_document()?).await?;

        match result.inserted_id {
            Bson::ObjectId(oid) => {
                debug!("Inserted player {}", oid);
                Ok(InsertOutcome {
                    inserted_id: PlayerId::from(oid),
                })
            }
            other => Err(StoreError::Unexpected(format!(
                "inserted id is not an object id: {}",
                other
            ))),
        }
    }

    async fn find(&self, filter: &PlayerFilter) -> Result<Vec<Player>, StoreError> {
        let query = filter.to_document();
        debug!("Finding players with filter {}", query);

        let cursor = self.collection.find(query).await?;
        let players = decode_players(cursor).await?;
        debug!("Found {} players", players.len());
        Ok(players)
    }

    async fn find_by_id(&self, id: &PlayerId) -> Result<Player, StoreError> {
        let document = self
            .collection
            .find_one(id_filter(id))
            .await?
            .ok_or(StoreError::NotFound(*id))?;
        Ok(PlayerRecord::from_document(document)?.into())
    }

    async fn update(&self, id: &PlayerId, patch: &PlayerPatch) -> Result<Player, StoreError> {
        let update = patch.to_set_document();
        debug!("Updating player {} with {}", id, update);

        let document = self
            .collection
            .find_one_and_update(id_filter(id), update)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(StoreError::NotFound(*id))?;
        Ok(PlayerRecord::from_document(document)?.into())
    }

    async fn delete(&self, id: &PlayerId) -> Result<DeleteOutcome, StoreError> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        debug!("Deleted {} document(s) for player {}", result.deleted_count, id);
        Ok(DeleteOutcome {
            deleted_count: result.deleted_count,
        })
    }
}
