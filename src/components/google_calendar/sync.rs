use super::categorize::categorize_events;
use super::models::{EventSet, NormalizedEvent};
use super::normalize::normalize_event;
use super::render::{render_events, NO_PAST_EVENTS, NO_UPCOMING_EVENTS};
use super::store::{load_events, save_events};
use super::EventSource;
use crate::config::Config;
use crate::error::{Error, SiteResult};
use crate::utils::fs::write_atomic;
use chrono::{DateTime, TimeZone};
use tracing::{error, info, warn};

/// Outcome of one sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub upcoming: usize,
    pub past: usize,
    /// Events came from the previous snapshot, not the API
    pub from_cache: bool,
    /// HTML fragments were written
    pub html_written: bool,
}

/// Fetch, normalize, categorize, persist and render one calendar
pub struct CalendarSync<S: EventSource> {
    source: S,
    config: Config,
}

impl<S: EventSource> CalendarSync<S> {
    pub fn new(source: S, config: Config) -> Self {
        Self { source, config }
    }

    /// Run the whole pipeline against a single `now`
    pub async fn run<Z: TimeZone>(&self, now: DateTime<Z>) -> SiteResult<(EventSet, SyncReport)> {
        let (events, from_cache) = self.collect_events().await?;

        let set = categorize_events(events, &now);
        info!(
            "Processed {} upcoming events and {} past events",
            set.upcoming.len(),
            set.past.len()
        );

        // A fallback run never rewrites the snapshot it read
        if !from_cache {
            save_events(&self.config.events_json, &set)?;
        }

        let html_written = self.config.generate_html;
        if html_written {
            self.write_html(&set)?;
        }

        let report = SyncReport {
            upcoming: set.upcoming.len(),
            past: set.past.len(),
            from_cache,
            html_written,
        };
        Ok((set, report))
    }

    /// Normalized events from the API, or from the snapshot when allowed
    async fn collect_events(&self) -> SiteResult<(Vec<NormalizedEvent>, bool)> {
        let reference = self.config.reference_timezone;

        match self.source.fetch_events().await {
            Ok(raw) => {
                let events = raw.iter().map(|event| normalize_event(event, reference)).collect();
                Ok((events, false))
            }
            Err(Error::Transport(message)) if self.config.fallback_to_cache => {
                let path = &self.config.events_json;
                warn!(
                    "Network error fetching events ({}), falling back to {}",
                    message,
                    path.display()
                );
                match load_events(path) {
                    Ok(snapshot) => {
                        warn!("Using {} cached events; data may be stale", snapshot.len());
                        Ok((snapshot.into_events(), true))
                    }
                    Err(e) => {
                        error!("No usable snapshot at {}: {}", path.display(), e);
                        Err(Error::Transport(message))
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Write the upcoming and past fragments
    pub fn write_html(&self, set: &EventSet) -> SiteResult<()> {
        let upcoming_path = self.config.upcoming_html();
        write_atomic(
            &upcoming_path,
            render_events(&set.upcoming, NO_UPCOMING_EVENTS).as_bytes(),
        )?;
        info!(
            "Generated {} with {} events",
            upcoming_path.display(),
            set.upcoming.len()
        );

        let past_path = self.config.past_html();
        write_atomic(&past_path, render_events(&set.past, NO_PAST_EVENTS).as_bytes())?;
        info!("Generated {} with {} events", past_path.display(), set.past.len());

        Ok(())
    }
}
