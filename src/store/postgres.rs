use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{EventStore, Result, StoreError};
use crate::models::{Event, Location, NewEvent, RsvpStatus};
use crate::services::query::{EventFilter, EventQuery};

const EVENT_COLUMNS: &str = "id, title, description, date, location_address, location_lat, \
     location_lng, max_volunteers, volunteers, created_at, updated_at";

/// Postgres-backed event store. See `migrations/` for the schema.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    date: DateTime<Utc>,
    location_address: String,
    location_lat: Option<f64>,
    location_lng: Option<f64>,
    max_volunteers: i64,
    volunteers: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> std::result::Result<Self, Self::Error> {
        let max_volunteers = u32::try_from(row.max_volunteers).map_err(|_| StoreError::Corrupt {
            id: row.id,
            reason: format!("max_volunteers out of range: {}", row.max_volunteers),
        })?;

        Ok(Event {
            id: row.id,
            title: row.title,
            description: row.description,
            date: row.date,
            location: Location {
                address: row.location_address,
                lat: row.location_lat,
                lng: row.location_lng,
            },
            max_volunteers,
            volunteers: row.volunteers,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Escape `%`, `_` and the escape character itself for an ILIKE pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    builder.push(" WHERE TRUE");

    if let Some(text) = &filter.text {
        let pattern = format!("%{}%", escape_like(text));
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(from) = filter.from {
        builder.push(" AND date >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        builder.push(" AND date <= ").push_bind(to);
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let sql = format!(
            "INSERT INTO events (id, title, description, date, location_address, location_lat, \
             location_lng, max_volunteers) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            EVENT_COLUMNS
        );

        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location.address)
            .bind(event.location.lat)
            .bind(event.location.lng)
            .bind(i64::from(event.max_volunteers))
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn list(&self, query: &EventQuery) -> Result<(Vec<Event>, u64)> {
        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM events", EVENT_COLUMNS));
        push_filter(&mut select, &query.filter);
        select
            .push(" ORDER BY date ASC, seq ASC LIMIT ")
            .push_bind(to_i64(query.pagination.limit))
            .push(" OFFSET ")
            .push_bind(to_i64(query.pagination.skip()));

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut count, &query.filter);

        let (rows, total) = tokio::try_join!(
            select.build_query_as::<EventRow>().fetch_all(&self.pool),
            count.build_query_scalar::<i64>().fetch_one(&self.pool),
        )?;

        let events = rows
            .into_iter()
            .map(Event::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((events, u64::try_from(total).unwrap_or(0)))
    }

    async fn toggle_volunteer(
        &self,
        id: Uuid,
        user_id: &str,
    ) -> Result<Option<(Event, RsvpStatus)>> {
        // Single statement: the row lock serializes concurrent toggles.
        let sql = format!(
            "UPDATE events SET \
               volunteers = CASE WHEN $2 = ANY(volunteers) \
                 THEN array_remove(volunteers, $2) \
                 ELSE array_append(volunteers, $2) END, \
               updated_at = now() \
             WHERE id = $1 \
             RETURNING {}",
            EVENT_COLUMNS
        );

        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let event = Event::try_from(row)?;

        // The returned row is post-update, so membership tells the direction
        let status = if event.has_volunteer(user_id) {
            RsvpStatus::Joined
        } else {
            RsvpStatus::Left
        };
        tracing::debug!(
            event_id = %id,
            status = ?status,
            "Volunteer membership toggled in postgres"
        );
        Ok(Some((event, status)))
    }
}
