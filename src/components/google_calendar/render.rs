use super::models::NormalizedEvent;
use crate::utils::html::escape_html;

/// Shown when there is nothing upcoming
pub const NO_UPCOMING_EVENTS: &str = "<p>No upcoming events at this time. Check back soon!</p>\n";

/// Shown when there is no history
pub const NO_PAST_EVENTS: &str = "<p>No past events recorded.</p>\n";

/// Render one event card
///
/// Summary, location, times and link are escaped here. The description has
/// already been through the tag allow-list and is emitted as is.
pub fn render_event(event: &NormalizedEvent) -> String {
    let mut html = String::from("<article class=\"event-card\">\n");
    html.push_str(&format!("    <h3>{}</h3>\n", escape_html(&event.summary)));
    html.push_str(&format!(
        "    <p class=\"event-time\"><time class=\"js-local-time\" data-start=\"{}\" data-end=\"{}\" data-timezone=\"{}\">{}</time></p>\n",
        escape_html(&event.start),
        escape_html(&event.end),
        escape_html(&event.event_time_zone),
        escape_html(&event.when_event_tz)
    ));

    if !event.location.is_empty() {
        html.push_str(&format!(
            "    <p class=\"event-location\"><strong>Location:</strong> {}</p>\n",
            escape_html(&event.location)
        ));
    }

    if !event.description.is_empty() {
        html.push_str(&format!(
            "    <div class=\"event-description\">{}</div>\n",
            event.description
        ));
    }

    if !event.html_link.is_empty() {
        html.push_str(&format!(
            "    <p class=\"event-link\"><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Add to calendar</a></p>\n",
            escape_html(&event.html_link)
        ));
    }

    html.push_str("</article>\n");
    html
}

/// Render a list of events, or `placeholder` when it is empty
pub fn render_events(events: &[NormalizedEvent], placeholder: &str) -> String {
    if events.is_empty() {
        return placeholder.to_string();
    }
    events.iter().map(render_event).collect()
}
