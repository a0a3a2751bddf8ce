use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, NewEvent, RsvpStatus};
use crate::services::query::EventQuery;

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence port for events.
///
/// Implementations must make `toggle_volunteer` atomic per event: two
/// concurrent toggles on the same id observe each other's result.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event with an empty volunteer set.
    async fn insert(&self, event: NewEvent) -> Result<Event>;

    /// Matching events ordered by date then creation, restricted to the
    /// requested page, plus the total number of matches.
    async fn list(&self, query: &EventQuery) -> Result<(Vec<Event>, u64)>;

    /// Remove `user_id` from the event's volunteers if present, add it
    /// otherwise. Returns the updated event and which way the toggle went,
    /// or `None` when the event does not exist.
    async fn toggle_volunteer(
        &self,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<(Event, RsvpStatus)>>;
}
