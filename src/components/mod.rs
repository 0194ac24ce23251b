pub mod google_calendar;
pub mod site_builder;

pub use google_calendar::{CalendarSync, EventSource, GoogleCalendarClient};
pub use site_builder::build_site;
