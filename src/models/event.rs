use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::dates::parse_timestamp;
use crate::utils::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: Location,
    pub max_volunteers: u32,
    /// User ids with an active RSVP. Never holds duplicates.
    pub volunteers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Outcome of flipping a user's membership on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpStatus {
    Joined,
    Left,
}

impl Event {
    pub fn from_new(new: NewEvent, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            date: new.date,
            location: new.location,
            max_volunteers: new.max_volunteers,
            volunteers: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_volunteer(&self, user_id: &str) -> bool {
        self.volunteers.iter().any(|v| v == user_id)
    }

    /// Remove `user_id` if present, add it otherwise.
    pub fn toggle_volunteer(&mut self, user_id: &str) -> RsvpStatus {
        match self.volunteers.iter().position(|v| v == user_id) {
            Some(idx) => {
                self.volunteers.remove(idx);
                RsvpStatus::Left
            }
            None => {
                self.volunteers.push(user_id.to_string());
                RsvpStatus::Joined
            }
        }
    }
}

/// A validated event ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: Location,
    pub max_volunteers: u32,
}

/// Body of `POST /api/events`. Every field is optional at the wire level so
/// that missing fields surface as a validation error rather than a
/// deserialization failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<LocationInput>,
    pub max_volunteers: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LocationInput {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl CreateEventRequest {
    pub fn validate(self) -> Result<NewEvent, AppError> {
        let location = self.location.unwrap_or_default();

        let (Some(title), Some(description), Some(date), Some(address)) = (
            non_empty(self.title),
            non_empty(self.description),
            non_empty(self.date),
            non_empty(location.address),
        ) else {
            return Err(AppError::ValidationError(
                "Missing required fields".to_string(),
            ));
        };

        let date = parse_timestamp(&date)
            .ok_or_else(|| AppError::ValidationError(format!("Invalid event date '{}'", date)))?;

        Ok(NewEvent {
            title,
            description,
            date,
            location: Location {
                address,
                lat: location.lat,
                lng: location.lng,
            },
            max_volunteers: self.max_volunteers.unwrap_or(0),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
