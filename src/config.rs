use crate::error::{config_error, env_error, SiteResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Default Google Calendar API base URL
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Name of the optional site layout override file
pub const SITE_CONFIG_FILE: &str = "site.toml";

/// Environment variable naming the site source directory
pub const SITE_SOURCE_DIR: &str = "SITE_SOURCE_DIR";

/// Configuration for the calendar sync pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Google API key
    pub api_key: String,
    /// Google Calendar ID to fetch
    pub calendar_id: String,
    /// Base URL of the Calendar API
    pub api_base: String,
    /// Where the EventSet snapshot is written
    pub events_json: PathBuf,
    /// Directory receiving the HTML fragments
    pub includes_dir: PathBuf,
    /// Zone used for the second display string and the "now" cutoff
    pub reference_timezone: Tz,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// Reuse the last snapshot when the calendar cannot be reached
    pub fallback_to_cache: bool,
    /// Render the upcoming/past HTML fragments
    pub generate_html: bool,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first
    pub fn load() -> SiteResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> SiteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Required values
        let api_key = get("GOOGLE_CALENDAR_API_KEY")
            .or_else(|| get("GOOGLE_API_KEY"))
            .ok_or_else(|| env_error("GOOGLE_CALENDAR_API_KEY"))?;
        let calendar_id = get("CALENDAR_ID")
            .or_else(|| get("GOOGLE_CALENDAR_ID"))
            .ok_or_else(|| env_error("CALENDAR_ID"))?;

        let api_base = get("CALENDAR_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let events_json = get("EVENTS_JSON")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("events.json"));
        let includes_dir = get("INCLUDES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("_includes"));

        let timezone = get("REFERENCE_TIMEZONE").unwrap_or_else(|| String::from("UTC"));
        let reference_timezone = timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid REFERENCE_TIMEZONE: {}", timezone)))?;

        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| config_error(&format!("Invalid REQUEST_TIMEOUT_SECS: {}", raw)))?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let fallback_to_cache = parse_flag("FALLBACK_TO_CACHE", get("FALLBACK_TO_CACHE"), false)?;
        let generate_html = parse_flag("GENERATE_HTML", get("GENERATE_HTML"), true)?;

        Ok(Config {
            api_key,
            calendar_id,
            api_base,
            events_json,
            includes_dir,
            reference_timezone,
            request_timeout,
            fallback_to_cache,
            generate_html,
        })
    }

    /// Path of the upcoming events fragment
    pub fn upcoming_html(&self) -> PathBuf {
        self.includes_dir.join("events-upcoming.html")
    }

    /// Path of the past events fragment
    pub fn past_html(&self) -> PathBuf {
        self.includes_dir.join("events-past.html")
    }
}

fn parse_flag(name: &str, value: Option<String>, default: bool) -> SiteResult<bool> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(config_error(&format!("Invalid {}: {}", name, raw))),
    }
}

/// Layout of the local site build
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory holding the page sources
    pub source_dir: PathBuf,
    /// Directory receiving the built site
    pub output_dir: PathBuf,
    /// Partials directory, relative to `source_dir`
    pub includes_dir: PathBuf,
    /// Pages to build, relative to `source_dir`
    pub pages: Vec<String>,
    /// Static assets copied verbatim, relative to `source_dir`
    pub assets: Vec<String>,
    /// Copy the partials directory into the output for client-side fetches
    pub copy_includes: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("_site"),
            includes_dir: PathBuf::from("_includes"),
            pages: vec!["index.html".to_string(), "pastevents.html".to_string()],
            assets: vec!["simple.css".to_string()],
            copy_includes: true,
        }
    }
}

impl SiteConfig {
    /// Load the layout for the directory named by `SITE_SOURCE_DIR`, reading `.env` first
    pub fn from_env() -> SiteResult<Self> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the source directory from `lookup` (default `.`) and load its layout
    pub fn from_lookup<F>(lookup: F) -> SiteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_dir = lookup(SITE_SOURCE_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::load(&source_dir)
    }

    /// Load the layout for `source_dir`, applying `site.toml` if present
    pub fn load(source_dir: &Path) -> SiteResult<Self> {
        let path = source_dir.join(SITE_CONFIG_FILE);
        let mut config = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<SiteConfig>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SiteConfig::default(),
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                SiteConfig::default()
            }
        };

        // Inputs must stay inside the source tree so their output paths stay
        // inside the output directory
        check_inside("includes_dir", &config.includes_dir)?;
        for page in &config.pages {
            check_inside("pages", Path::new(page))?;
        }
        for asset in &config.assets {
            check_inside("assets", Path::new(asset))?;
        }

        // Relative output paths are anchored at the source directory
        if config.source_dir == Path::new(".") {
            config.source_dir = source_dir.to_path_buf();
        } else if config.source_dir.is_relative() {
            config.source_dir = source_dir.join(&config.source_dir);
        }
        if config.output_dir.is_relative() {
            config.output_dir = source_dir.join(&config.output_dir);
        }

        Ok(config)
    }

    /// Absolute path of the partials directory
    pub fn includes_path(&self) -> PathBuf {
        self.source_dir.join(&self.includes_dir)
    }
}

/// Reject absolute paths and `..` for a path that is joined onto both the
/// source and the output directory
fn check_inside(field: &str, path: &Path) -> SiteResult<()> {
    let escapes = path.as_os_str().is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(config_error(&format!(
            "Invalid {} entry in {}: {} (must be a relative path inside the site)",
            field,
            SITE_CONFIG_FILE,
            path.display()
        )));
    }
    Ok(())
}
