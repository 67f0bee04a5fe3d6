use chrono_tz::Tz;

use crate::models::{FilteredData, FilteredEvent};
use crate::pipeline::parse_timestamp;

/// Start time in the event's own timezone, e.g. `Tue Jan  2 @  5:00 AM EST`.
/// Falls back to the raw upstream string when it cannot be parsed.
pub fn local_start(event: &FilteredEvent) -> String {
    let raw = &event.event.start_time;
    let start = match parse_timestamp(raw) {
        Some(start) => start,
        None if raw.is_empty() => return "TBA".to_string(),
        None => return raw.clone(),
    };

    match event.event.timezone.parse::<Tz>() {
        Ok(tz) => start
            .with_timezone(&tz)
            .format("%a %b %e @ %l:%M %p %Z")
            .to_string(),
        Err(_) => start.format("%a %b %e @ %l:%M %p UTC").to_string(),
    }
}

pub fn render_event(event: &FilteredEvent) -> String {
    let mut lines = vec![
        event.event.title.clone(),
        format!("  Date: {}", local_start(event)),
        format!("  Location: {}", event.event.location),
    ];
    if !event.event.host_name.is_empty() {
        lines.push(format!("  Hosts: {}", event.event.host_name));
    }
    lines.push(format!("  Why: {}", event.relevance_reason));
    lines.push(format!("  Link: {}", event.event.url));
    lines.join("\n")
}

pub fn render_digest(data: &FilteredData) -> String {
    if data.events.is_empty() {
        return format!("No events selected (ranked {}).", data.filtered_at);
    }

    let mut out = format!("=== Top Events ({}) ===\n", data.filtered_at);
    let body = data
        .events
        .iter()
        .map(render_event)
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push_str(&body);
    out
}
