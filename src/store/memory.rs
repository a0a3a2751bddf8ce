use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, Result};
use crate::models::{Event, NewEvent, RsvpStatus};
use crate::services::query::EventQuery;

/// Process-local event store.
///
/// Events are kept in creation order; a stable sort by date then gives the
/// creation-order tie-break for free. Toggles run under the write lock.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let event = Event::from_new(event, Uuid::new_v4(), Utc::now());
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn list(&self, query: &EventQuery) -> Result<(Vec<Event>, u64)> {
        let events = self.events.read().await;

        let mut matching: Vec<&Event> = events
            .iter()
            .filter(|e| query.filter.matches(e))
            .collect();
        matching.sort_by_key(|e| e.date);

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(query.pagination.skip()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.pagination.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn toggle_volunteer(
        &self,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<(Event, RsvpStatus)>> {
        let mut events = self.events.write().await;
        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };

        let status = event.toggle_volunteer(user_id);
        event.updated_at = Utc::now();
        Ok(Some((event.clone(), status)))
    }
}
