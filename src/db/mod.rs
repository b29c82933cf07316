//! Persistence for player records.
//!
//! Handlers talk to the "players" collection only through [`PlayerStore`].
//! The store handle is built once at startup and shared by every request.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Player, PlayerId};

mod memory;
mod sqlite;

pub use memory::MemoryPlayerStore;
pub use sqlite::SqlitePlayerStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("a player with id {0} already exists")]
    Duplicate(PlayerId),
}

/// Primitive operations over the players collection.
///
/// None of these apply a deadline; callers bound each call themselves.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn insert_one(&self, player: &Player) -> Result<(), StoreError>;

    async fn find_one(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;

    /// Every decodable record in natural order. Records that fail to decode
    /// are logged and skipped.
    async fn find_all(&self) -> Result<Vec<Player>, StoreError>;

    /// Overwrite `name`, `region` and `position` of the record with `player.id`
    /// in one atomic step and return the stored result, or `None` when no
    /// record matched.
    async fn find_one_and_replace(&self, player: &Player) -> Result<Option<Player>, StoreError>;

    /// Returns the number of records deleted (0 or 1).
    async fn delete_one(&self, id: PlayerId) -> Result<u64, StoreError>;

    /// Short label for startup logs.
    fn describe(&self) -> String;
}
