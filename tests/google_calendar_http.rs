use chrono::{TimeZone, Utc};
use eventsite::components::google_calendar::models::NormalizedEvent;
use eventsite::components::google_calendar::store::{load_events, save_events};
use eventsite::components::google_calendar::{CalendarSync, EventSet, GoogleCalendarClient};
use eventsite::config::Config;
use eventsite::error::Error;
use std::fs;
use std::path::Path;
use tokio::net::TcpListener;

/// Base URL of a local port nothing listens on
async fn closed_port_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn http_config(dir: &Path, api_base: &str, fallback: bool) -> Config {
    let events_json = dir.join("events.json").display().to_string();
    let includes_dir = dir.join("_includes").display().to_string();
    Config::from_lookup(|key| match key {
        "GOOGLE_CALENDAR_API_KEY" => Some("test_key".to_string()),
        "CALENDAR_ID" => Some("test_calendar@example.com".to_string()),
        "CALENDAR_API_BASE" => Some(api_base.to_string()),
        "EVENTS_JSON" => Some(events_json.clone()),
        "INCLUDES_DIR" => Some(includes_dir.clone()),
        "REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
        "FALLBACK_TO_CACHE" => Some(fallback.to_string()),
        _ => None,
    })
    .unwrap()
}

fn cached_event(summary: &str, start: &str) -> NormalizedEvent {
    NormalizedEvent {
        summary: summary.to_string(),
        start: start.to_string(),
        end: start.to_string(),
        event_time_zone: "UTC".to_string(),
        when_event_tz: String::new(),
        when_local_tz: String::new(),
        description: String::new(),
        html_link: String::new(),
        location: String::new(),
    }
}

#[tokio::test]
async fn test_unreachable_calendar_falls_back_to_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = http_config(dir.path(), &closed_port_base().await, true);

    let snapshot = EventSet {
        upcoming: vec![cached_event("Cached Meetup", "2024-06-20T18:00:00Z")],
        past: vec![],
    };
    save_events(&config.events_json, &snapshot).unwrap();
    let before = fs::read(&config.events_json).unwrap();

    let client = GoogleCalendarClient::new(&config).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let (set, report) = CalendarSync::new(client, config.clone()).run(now).await.unwrap();

    assert!(report.from_cache);
    assert_eq!(set.upcoming.len(), 1);
    assert_eq!(set.upcoming[0].summary, "Cached Meetup");
    assert_eq!(fs::read(&config.events_json).unwrap(), before);
    assert_eq!(load_events(&config.events_json).unwrap(), snapshot);
    assert!(config.upcoming_html().is_file());
}

#[tokio::test]
async fn test_unreachable_calendar_without_fallback_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = http_config(dir.path(), &closed_port_base().await, false);

    let client = GoogleCalendarClient::new(&config).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let err = CalendarSync::new(client, config.clone())
        .run(now)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
    assert!(!config.events_json.exists());
    assert!(!config.upcoming_html().exists());
}
