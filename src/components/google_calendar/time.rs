use crate::error::{time_error, SiteResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::Display;

/// Parsed start or end of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// Date-time with an explicit offset
    Timed(DateTime<FixedOffset>),
    /// Date-only all-day marker
    AllDay(NaiveDate),
}

impl EventTime {
    /// Instant used for ordering; all-day dates count from midnight UTC
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            EventTime::Timed(dt) => dt.with_timezone(&Utc),
            EventTime::AllDay(date) => Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)),
        }
    }
}

/// Parse a Google `dateTime` or `date` value
pub fn parse_event_time(raw: &str) -> SiteResult<EventTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(time_error("empty time value"));
    }

    if raw.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(EventTime::Timed(dt));
        }
        // No offset given, read it as UTC
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| time_error(&format!("Failed to parse datetime '{}': {}", raw, e)))?;
        return Ok(EventTime::Timed(Utc.from_utc_datetime(&naive).fixed_offset()));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| time_error(&format!("Failed to parse date '{}': {}", raw, e)))?;
    Ok(EventTime::AllDay(date))
}

/// Start instant of a raw value, if it parses
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    parse_event_time(raw).ok().map(|t| t.instant())
}

/// Display strings for an event, or the raw text when the times do not parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTimes {
    Formatted {
        event_zone: String,
        reference_zone: String,
    },
    Raw(String),
}

impl EventTimes {
    /// Display string in the event's declared zone
    pub fn event_zone(&self) -> &str {
        match self {
            EventTimes::Formatted { event_zone, .. } => event_zone,
            EventTimes::Raw(raw) => raw,
        }
    }

    /// Display string in the reference zone
    pub fn reference_zone(&self) -> &str {
        match self {
            EventTimes::Formatted { reference_zone, .. } => reference_zone,
            EventTimes::Raw(raw) => raw,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, EventTimes::Raw(_))
    }
}

fn format_span<Z>(start: &DateTime<Z>, end: &DateTime<Z>, label: &str) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    format!(
        "{} - {} ({})",
        start.format("%B %-d, %Y, %-I:%M %p"),
        end.format("%-I:%M %p"),
        label
    )
}

fn format_all_day(date: &NaiveDate) -> String {
    format!("{} (All day)", date.format("%B %-d, %Y"))
}

/// Format an event's start/end for the event zone and the reference zone
///
/// "December 1, 2024, 10:00 AM - 11:00 AM (America/Toronto)". An unknown
/// event zone keeps the offset carried by the timestamps. Anything that does
/// not parse degrades to `"<start> - <end>"` verbatim.
pub fn format_event_times(start: &str, end: &str, event_timezone: &str, reference: Tz) -> EventTimes {
    let raw = || EventTimes::Raw(format!("{} - {}", start, end));

    let (Ok(start_time), Ok(end_time)) = (parse_event_time(start), parse_event_time(end)) else {
        return raw();
    };

    match (start_time, end_time) {
        (EventTime::Timed(s), EventTime::Timed(e)) => {
            let event_zone = match event_timezone.parse::<Tz>() {
                Ok(tz) => format_span(&s.with_timezone(&tz), &e.with_timezone(&tz), event_timezone),
                Err(_) => format_span(&s, &e, event_timezone),
            };
            let reference_zone = format_span(
                &s.with_timezone(&reference),
                &e.with_timezone(&reference),
                reference.name(),
            );
            EventTimes::Formatted {
                event_zone,
                reference_zone,
            }
        }
        (EventTime::AllDay(date), EventTime::AllDay(_)) => EventTimes::Formatted {
            event_zone: format_all_day(&date),
            reference_zone: format_all_day(&date),
        },
        _ => raw(),
    }
}

/// `START/END` in the quick-add `dates` format
///
/// Timed events use `YYYYMMDDTHHMMSSZ`, all-day events `YYYYMMDD`.
pub fn compact_range(start: &str, end: &str) -> SiteResult<String> {
    let start = parse_event_time(start)?;
    let end = parse_event_time(end)?;

    let range = match (start, end) {
        (EventTime::AllDay(s), EventTime::AllDay(e)) => {
            format!("{}/{}", s.format("%Y%m%d"), e.format("%Y%m%d"))
        }
        (s, e) => format!(
            "{}/{}",
            s.instant().format("%Y%m%dT%H%M%SZ"),
            e.instant().format("%Y%m%dT%H%M%SZ")
        ),
    };
    Ok(range)
}
