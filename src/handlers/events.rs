use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::auth::{Access, Identity, Role};
use crate::models::CreateEventRequest;
use crate::services::{EventQuery, EventService, ListParams};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// `GET /api/events`
///
/// The query string is read as raw pairs so that one unreadable parameter
/// falls back on its own instead of dropping the others.
pub async fn list_events(
    State(events): State<EventService>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params = match pairs {
        Ok(Query(pairs)) => pairs.into_iter().collect(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable query string, using defaults");
            ListParams::default()
        }
    };

    let page = events.list(EventQuery::from(params)).await?;
    Ok(success(page))
}

/// `POST /api/events`
pub async fn create_event(
    State(events): State<EventService>,
    identity: Identity,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Role gate before the body is looked at
    Access::Role(Role::Organizer).authorize(&identity)?;
    let Json(request) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let event = events.create(&identity, request).await?;
    Ok(created(event, "Event created successfully"))
}

/// `POST /api/events/:id/rsvp`
pub async fn toggle_rsvp(
    State(events): State<EventService>,
    identity: Identity,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = events.toggle_rsvp(&identity, &event_id).await?;
    Ok(success(event))
}
