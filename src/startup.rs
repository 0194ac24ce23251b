use crate::components::google_calendar::{CalendarSync, GoogleCalendarClient, SyncReport};
use crate::components::site_builder::{build_site, BuildReport};
use crate::config::{Config, SiteConfig};
use crate::error::Error;
use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the calendar sync configuration
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Fetch the calendar and regenerate the snapshot and fragments
pub async fn run_sync(config: Config) -> miette::Result<SyncReport> {
    let client = GoogleCalendarClient::new(&config)?;

    // One cutoff for the whole batch
    let now = Utc::now().with_timezone(&config.reference_timezone);
    info!("Categorizing events against {}", now);

    let sync = CalendarSync::new(client, config);
    let (_, report) = sync.run(now).await.map_err(|e| {
        error!("Event sync failed: {}", e);
        e
    })?;

    info!(
        "Successfully processed calendar events: {} upcoming, {} past{}",
        report.upcoming,
        report.past,
        if report.from_cache { " (from cache)" } else { "" }
    );
    Ok(report)
}

/// Load the site layout for the local build
pub fn load_site_config() -> miette::Result<SiteConfig> {
    match SiteConfig::from_env() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load site layout: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the local copy of the site described by `config`
pub fn run_build(config: &SiteConfig) -> miette::Result<BuildReport> {
    let report = build_site(config)?;

    if !report.skipped.is_empty() || !report.missing.is_empty() {
        info!(
            "{} pages skipped, {} assets missing",
            report.skipped.len(),
            report.missing.len()
        );
    }
    info!(
        "To test locally, run: python3 -m http.server 8000 --directory {}",
        config.output_dir.display()
    );
    Ok(report)
}
