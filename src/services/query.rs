//! Listing query: parameter coercion, the event predicate and page arithmetic.
//!
//! Malformed paging or date input never rejects a listing request; each
//! parameter falls back to its default instead.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Event;
use crate::utils::dates::parse_timestamp;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Raw query string of `GET /api/events`.
#[derive(Debug, Default, Clone)]
pub struct ListParams {
    pub q: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Collect from query pairs. The first occurrence of a key wins and
/// unknown keys are ignored.
impl FromIterator<(String, String)> for ListParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "from" => &mut params.from,
                "to" => &mut params.to,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventFilter {
    /// Case-insensitive substring matched against title or description.
    pub text: Option<String>,
    /// Inclusive lower bound on `date`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`. A bare date means midnight UTC.
    pub to: Option<DateTime<Utc>>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let in_title = event.title.to_lowercase().contains(&needle);
            let in_description = event.description.to_lowercase().contains(&needle);
            if !in_title && !in_description {
                return false;
            }
        }
        if self.from.is_some_and(|from| event.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| event.date > to) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EventQuery {
    pub filter: EventFilter,
    pub pagination: Pagination,
}

impl From<ListParams> for EventQuery {
    fn from(params: ListParams) -> Self {
        let text = params
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        let filter = EventFilter {
            text,
            from: coerce_bound("from", params.from.as_deref(), parse_timestamp),
            to: coerce_bound("to", params.to.as_deref(), parse_timestamp),
        };

        let page = coerce_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = coerce_positive(params.limit.as_deref()).unwrap_or(DEFAULT_PAGE_LIMIT);

        Self {
            filter,
            pagination: Pagination::new(page, limit),
        }
    }
}

fn coerce_positive(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

fn coerce_bound(
    name: &str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::debug!(bound = name, value = raw, "Ignoring unparseable date bound");
    }
    parsed
}

/// One page of listing results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub events: Vec<Event>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl EventPage {
    pub fn new(events: Vec<Event>, total: u64, pagination: Pagination) -> Self {
        Self {
            events,
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: pagination.total_pages(total),
        }
    }
}
