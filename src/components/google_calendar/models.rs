use serde::{Deserialize, Serialize};

/// Start or end of a Google Calendar event
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
}

impl EventDateTime {
    /// Timed value, or the all-day date, or an empty string
    pub fn raw(&self) -> &str {
        self.date_time
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.date.as_deref())
            .unwrap_or("")
    }
}

/// Calendar event as returned by the events listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub start: EventDateTime,
    #[serde(default)]
    pub end: EventDateTime,
    pub html_link: Option<String>,
}

/// Body of an events listing response
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EventsResponse {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

/// Display-ready event, derived from one `CalendarEvent`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub summary: String,
    pub start: String,
    pub end: String,
    pub event_time_zone: String,
    #[serde(rename = "whenEventTZ")]
    pub when_event_tz: String,
    #[serde(rename = "whenLocalTZ")]
    pub when_local_tz: String,
    pub description: String,
    pub html_link: String,
    pub location: String,
}

/// Events split around a single "now"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EventSet {
    /// Ascending by start
    pub upcoming: Vec<NormalizedEvent>,
    /// Descending by start, most recent first
    pub past: Vec<NormalizedEvent>,
}

impl EventSet {
    /// Number of events in both buckets
    pub fn len(&self) -> usize {
        self.upcoming.len() + self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty() && self.past.is_empty()
    }

    /// Consume the set, yielding every event in stored order
    pub fn into_events(self) -> Vec<NormalizedEvent> {
        let mut events = self.upcoming;
        events.extend(self.past);
        events
    }
}
