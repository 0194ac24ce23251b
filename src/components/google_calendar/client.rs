use super::models::{CalendarEvent, EventsResponse};
use super::EventSource;
use crate::config::Config;
use crate::error::{config_error, Error, SiteResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};
use url::Url;

/// Upper bound the API accepts for one page
pub const MAX_RESULTS: u32 = 2500;

/// Reads one calendar through the public events listing endpoint
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    api_base: String,
    api_key: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    /// Create a client using the key, calendar and timeout from `config`
    pub fn new(config: &Config) -> SiteResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| config_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
            calendar_id: config.calendar_id.clone(),
        })
    }

    /// Events listing URL with recurrence expansion and start-time ordering
    pub fn events_url(&self) -> SiteResult<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| config_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| config_error(&format!("Not a base URL: {}", self.api_base)))?
            .pop_if_empty()
            .push("calendars")
            .push(&self.calendar_id)
            .push("events");

        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("maxResults", &MAX_RESULTS.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        Ok(url)
    }
}

#[async_trait]
impl EventSource for GoogleCalendarClient {
    async fn fetch_events(&self) -> SiteResult<Vec<CalendarEvent>> {
        let url = self.events_url()?;

        info!("Fetching events from Google Calendar API...");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            error!("Google API returned HTTP {}: {}", status, error_body);
            return Err(Error::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let data: EventsResponse = response.json().await?;
        info!("Retrieved {} events from calendar", data.items.len());

        Ok(data.items)
    }
}
