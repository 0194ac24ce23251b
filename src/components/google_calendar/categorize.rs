use super::models::{EventSet, NormalizedEvent};
use super::time::parse_instant;
use chrono::{DateTime, TimeZone, Utc};
use std::cmp::Ordering;
use tracing::warn;

/// Split events around `now` and sort both buckets
///
/// `start >= now` is upcoming. Events whose start does not parse stay
/// visible at the end of `upcoming`. Both sorts are stable.
pub fn categorize_events<Z: TimeZone>(events: Vec<NormalizedEvent>, now: &DateTime<Z>) -> EventSet {
    let now = now.with_timezone(&Utc);
    let mut upcoming: Vec<(Option<DateTime<Utc>>, NormalizedEvent)> = Vec::new();
    let mut past = Vec::new();

    for event in events {
        match parse_instant(&event.start) {
            Some(start) if start >= now => upcoming.push((Some(start), event)),
            Some(start) => past.push((start, event)),
            None => {
                warn!("Error parsing event date for '{}', keeping it upcoming", event.summary);
                upcoming.push((None, event));
            }
        }
    }

    upcoming.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    past.sort_by(|(a, _), (b, _)| b.cmp(a));

    EventSet {
        upcoming: upcoming.into_iter().map(|(_, event)| event).collect(),
        past: past.into_iter().map(|(_, event)| event).collect(),
    }
}
