use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::{Access, Identity, Role};
use crate::models::{CreateEventRequest, Event};
use crate::services::query::{EventPage, EventQuery};
use crate::store::EventStore;
use crate::utils::error::AppError;

/// Event catalog operations on top of an [`EventStore`].
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: EventQuery) -> Result<EventPage, AppError> {
        let (events, total) = self.store.list(&query).await?;
        Ok(EventPage::new(events, total, query.pagination))
    }

    pub async fn create(
        &self,
        identity: &Identity,
        request: CreateEventRequest,
    ) -> Result<Event, AppError> {
        Access::Role(Role::Organizer).authorize(identity)?;
        let new_event = request.validate()?;

        let event = self.store.insert(new_event).await?;
        info!(
            event_id = %event.id,
            organizer = %identity.user_id,
            title = %event.title,
            "Event created"
        );
        Ok(event)
    }

    pub async fn toggle_rsvp(
        &self,
        identity: &Identity,
        event_id: &str,
    ) -> Result<Event, AppError> {
        Access::Authenticated.authorize(identity)?;

        let not_found = || AppError::NotFound("Event not found".to_string());
        let id = Uuid::parse_str(event_id).map_err(|_| not_found())?;

        let (event, status) = self
            .store
            .toggle_volunteer(id, &identity.user_id)
            .await?
            .ok_or_else(not_found)?;

        info!(
            event_id = %event.id,
            user_id = %identity.user_id,
            status = ?status,
            volunteers = event.volunteers.len(),
            "RSVP toggled"
        );
        Ok(event)
    }
}
