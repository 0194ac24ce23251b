pub mod categorize;
mod client;
pub mod models;
pub mod normalize;
pub mod render;
pub mod store;
mod sync;
pub mod time;

pub use client::{GoogleCalendarClient, MAX_RESULTS};
pub use models::{CalendarEvent, EventSet, NormalizedEvent};
pub use sync::{CalendarSync, SyncReport};

use crate::error::SiteResult;
use async_trait::async_trait;

/// Anything that can produce the raw events of one calendar
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch every event, recurring ones expanded, ordered by start
    async fn fetch_events(&self) -> SiteResult<Vec<CalendarEvent>>;
}
