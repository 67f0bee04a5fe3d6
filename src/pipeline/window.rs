use chrono::{DateTime, Duration, Utc};

use super::time::parse_timestamp;
use crate::models::Event;

/// Keeps events starting within `[now, now + window_days]`, bounds inclusive.
///
/// Events whose start is empty or unparsable are kept: a formatting quirk
/// upstream must not hide an event.
pub fn filter_window(events: Vec<Event>, window_days: u32, now: DateTime<Utc>) -> Vec<Event> {
    let limit = now
        .checked_add_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    events
        .into_iter()
        .filter(|event| match parse_timestamp(&event.start_time) {
            Some(start) => start >= now && start <= limit,
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{event, instant};

    #[test]
    fn boundaries() {
        let now = instant("2024-01-01T00:00:00Z");
        let events = vec![
            event("upper", "2024-01-08T00:00:00Z"),
            event("beyond", "2024-01-08T00:00:01Z"),
            event("past", "2023-12-31T23:59:59Z"),
            event("undated", ""),
            event("now", "2024-01-01T00:00:00Z"),
        ];

        let kept: Vec<_> = filter_window(events, 7, now)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(kept, vec!["upper", "undated", "now"]);
    }

    #[test]
    fn huge_window_saturates() {
        let now = instant("2024-01-01T00:00:00Z");
        let kept = filter_window(vec![event("far", "2999-01-01T00:00:00Z")], u32::MAX, now);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn unparsable_start_passes_through() {
        let now = instant("2024-01-01T00:00:00Z");
        let kept = filter_window(vec![event("weird", "soon-ish")], 1, now);
        assert_eq!(kept.len(), 1);
    }
}
