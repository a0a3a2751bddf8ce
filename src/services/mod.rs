pub mod events;
pub mod query;

pub use events::EventService;
pub use query::{EventFilter, EventPage, EventQuery, ListParams, Pagination};
