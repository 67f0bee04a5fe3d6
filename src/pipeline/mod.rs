//! Normalization pipeline: adapt -> dedupe -> date window -> chronological sort.
//!
//! Pure over its inputs. Fetching happens before [`run`] and persistence after
//! it; `now` is injected so the result never depends on the wall clock.

pub mod adapter;
pub mod dedupe;
pub mod sort;
pub mod time;
pub mod window;

use chrono::{DateTime, Utc};

use crate::models::Event;

pub use adapter::{adapt, RawRecord};
pub use dedupe::dedupe;
pub use sort::sort_chronological;
pub use time::parse_timestamp;
pub use window::filter_window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTag {
    Primary,
    Featured,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Primary => "primary",
            SourceTag::Featured => "featured",
        }
    }
}

/// One upstream list, tagged with where it came from.
#[derive(Debug, Clone)]
pub struct Source {
    pub tag: SourceTag,
    pub records: Vec<RawRecord>,
}

impl Source {
    pub fn new(tag: SourceTag, records: Vec<RawRecord>) -> Self {
        Self { tag, records }
    }
}

/// Runs the full pipeline over `sources` in the order given.
///
/// Callers list primary sources before featured ones; that order is what
/// turns "first occurrence wins" into "primary wins".
pub fn run(sources: &[Source], window_days: u32, now: DateTime<Utc>) -> Vec<Event> {
    let adapted: Vec<Event> = sources
        .iter()
        .flat_map(|source| source.records.iter().map(|raw| adapt(raw, None)))
        .collect();
    let total = adapted.len();

    let unique = dedupe(adapted);
    let unique_count = unique.len();

    let windowed = filter_window(unique, window_days, now);
    log::debug!(
        "pipeline: {total} adapted, {unique_count} unique, {} within {window_days} days",
        windowed.len()
    );

    sort_chronological(windowed)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};

    use crate::models::Event;

    pub fn event(id: &str, start_time: &str) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {id}"),
            description: String::new(),
            start_time: start_time.to_string(),
            end_time: String::new(),
            timezone: "America/New_York".to_string(),
            location: "TBD".to_string(),
            is_online: false,
            url: format!("https://lu.ma/{id}"),
            host_name: String::new(),
            cover_image_url: None,
        }
    }

    pub fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid test instant")
            .with_timezone(&Utc)
    }
}
