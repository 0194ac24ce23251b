//! Turns raw calendar items into display-ready records.
//!
//! Every function here is total: a malformed field degrades to its raw text
//! instead of failing the record.

use super::models::{CalendarEvent, NormalizedEvent};
use super::time::{compact_range, format_event_times};
use chrono_tz::Tz;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::warn;

/// Tags kept by the description filter
pub const ALLOWED_TAGS: [&str; 8] = ["a", "br", "p", "strong", "em", "ul", "ol", "li"];

/// Google Calendar quick-add form
pub const QUICK_ADD_URL: &str = "https://www.google.com/calendar/render?action=TEMPLATE";

fn re_escaped_entity() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\\u(003c|003e|0026|0022|0027)").unwrap())
}

fn re_script_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
    })
}

fn re_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</?([a-z][a-z0-9]*)\b[^>]*>").unwrap())
}

/// Decode `<`-style escapes and reduce HTML to the allowed tags
pub fn clean_description(description: Option<&str>) -> String {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return String::new();
    };

    let decoded = re_escaped_entity().replace_all(description, |caps: &Captures| {
        match caps[1].to_ascii_lowercase().as_str() {
            "003c" => "<",
            "003e" => ">",
            "0026" => "&",
            "0022" => "\"",
            _ => "'",
        }
    });

    let without_scripts = re_script_block().replace_all(&decoded, "");

    re_tag()
        .replace_all(&without_scripts, |caps: &Captures| {
            let tag = caps[1].to_ascii_lowercase();
            if ALLOWED_TAGS.contains(&tag.as_str()) {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Link that adds the event to a visitor's own calendar
///
/// A link supplied by the API wins. Otherwise a quick-add link is built; if
/// the times do not parse it carries the title only.
pub fn make_add_to_calendar_link(event: &CalendarEvent) -> String {
    if let Some(link) = event.html_link.as_deref().filter(|l| !l.is_empty()) {
        return link.to_string();
    }

    let title = urlencoding::encode(event.summary.as_deref().unwrap_or("Event"));
    let details = urlencoding::encode(event.description.as_deref().unwrap_or(""));
    let location = urlencoding::encode(event.location.as_deref().unwrap_or(""));

    match compact_range(event.start.raw(), event.end.raw()) {
        Ok(dates) => format!(
            "{}&text={}&dates={}&details={}&location={}&sf=true&output=xml",
            QUICK_ADD_URL, title, dates, details, location
        ),
        Err(e) => {
            warn!("Error creating calendar link: {}", e);
            format!("{}&text={}", QUICK_ADD_URL, title)
        }
    }
}

/// Normalize one raw event
pub fn normalize_event(event: &CalendarEvent, reference: Tz) -> NormalizedEvent {
    let start = event.start.raw().to_string();
    let end = event.end.raw().to_string();
    let event_time_zone = event
        .start
        .time_zone
        .clone()
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| "UTC".to_string());

    let when = format_event_times(&start, &end, &event_time_zone, reference);
    if when.is_raw() {
        warn!(
            "Could not format times for '{}', showing raw values",
            event.summary.as_deref().unwrap_or("Untitled Event")
        );
    }

    NormalizedEvent {
        summary: event
            .summary
            .clone()
            .unwrap_or_else(|| "Untitled Event".to_string()),
        when_event_tz: when.event_zone().to_string(),
        when_local_tz: when.reference_zone().to_string(),
        description: clean_description(event.description.as_deref()),
        html_link: make_add_to_calendar_link(event),
        location: event.location.clone().unwrap_or_default(),
        start,
        end,
        event_time_zone,
    }
}
