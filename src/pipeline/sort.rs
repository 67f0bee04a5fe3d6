use chrono::{DateTime, Utc};

use super::time::parse_timestamp;
use crate::models::Event;

/// Stable ascending sort by start time. Missing or unparsable starts sort as
/// the Unix epoch, ahead of any dated event.
pub fn sort_chronological(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_cached_key(|event| {
        parse_timestamp(&event.start_time).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::event;

    fn ids(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn missing_timestamps_first_and_stable() {
        let sorted = sort_chronological(vec![
            event("1", ""),
            event("2", "2024-01-01T00:00:00Z"),
            event("3", ""),
        ]);
        assert_eq!(ids(&sorted), vec!["1", "3", "2"]);
    }

    #[test]
    fn orders_by_instant_not_by_string() {
        let sorted = sort_chronological(vec![
            event("late", "2024-01-02T10:00:00Z"),
            event("early-offset", "2024-01-02T09:00:00+05:00"),
            event("tie-a", "2024-01-03T00:00:00Z"),
            event("tie-b", "2024-01-03T00:00:00.000Z"),
            event("garbage", "not a date"),
        ]);
        assert_eq!(
            ids(&sorted),
            vec!["garbage", "early-offset", "late", "tie-a", "tie-b"]
        );
    }
}
