use super::models::EventSet;
use crate::error::SiteResult;
use crate::utils::fs::write_atomic;
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialize an EventSet as indented, non-ASCII-preserving JSON
pub fn to_json(events: &EventSet) -> SiteResult<String> {
    let mut json = serde_json::to_string_pretty(events)?;
    json.push('\n');
    Ok(json)
}

/// Write the EventSet snapshot
pub fn save_events(path: &Path, events: &EventSet) -> SiteResult<()> {
    write_atomic(path, to_json(events)?.as_bytes())?;
    info!("Events data saved to {}", path.display());
    Ok(())
}

/// Read a snapshot written by `save_events`
pub fn load_events(path: &Path) -> SiteResult<EventSet> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
