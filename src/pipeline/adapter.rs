//! Turns one upstream record into a canonical [`Event`].
//!
//! Primary-list records nest the event under `event` next to a `hosts`
//! list; featured-list records may or may not nest, and never carry hosts.
//! Every field degrades to a default, so [`adapt`] cannot fail.

use serde_json::Value;
use uuid::Uuid;

use crate::models::Event;

/// Untyped record as it appears in the page payload.
pub type RawRecord = Value;

pub const BASE_URL: &str = "https://lu.ma";
pub const DEFAULT_TITLE: &str = "Untitled Event";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const ONLINE_LOCATION: &str = "Online";
pub const UNKNOWN_LOCATION: &str = "TBD";

const ONLINE_TAG: &str = "online";

pub fn adapt(raw: &RawRecord, hosts_hint: Option<&[RawRecord]>) -> Event {
    let payload = event_payload(raw);
    let is_online = is_online(payload);

    Event {
        id: resolve_id(raw, payload),
        title: resolve_title(payload),
        description: first_non_empty([
            str_field(payload, "description"),
            str_field(payload, "description_md"),
        ])
        .unwrap_or_default()
        .to_string(),
        start_time: first_non_empty([
            str_field(payload, "start_at"),
            str_field(raw, "start_at"),
        ])
        .unwrap_or_default()
        .to_string(),
        end_time: str_field(payload, "end_at").unwrap_or_default().to_string(),
        timezone: resolve_timezone(payload),
        location: resolve_location(payload, is_online),
        is_online,
        url: build_url(str_field(payload, "url")),
        host_name: resolve_host_name(raw, hosts_hint),
        cover_image_url: str_field(payload, "cover_url").map(str::to_string),
    }
}

/// Returns the first candidate that is present and non-empty.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
}

fn event_payload(raw: &RawRecord) -> &RawRecord {
    match raw.get("event") {
        Some(nested) if nested.is_object() => nested,
        _ => raw,
    }
}

/// Non-empty string field; wrong-typed values count as absent.
fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub fn resolve_id(raw: &RawRecord, payload: &RawRecord) -> String {
    first_non_empty([str_field(raw, "api_id"), str_field(payload, "api_id")])
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub fn resolve_title(payload: &RawRecord) -> String {
    first_non_empty([str_field(payload, "name"), Some(DEFAULT_TITLE)])
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

pub fn resolve_timezone(payload: &RawRecord) -> String {
    first_non_empty([str_field(payload, "timezone"), Some(DEFAULT_TIMEZONE)])
        .unwrap_or(DEFAULT_TIMEZONE)
        .to_string()
}

pub fn is_online(payload: &RawRecord) -> bool {
    payload.get("location_type").and_then(Value::as_str) == Some(ONLINE_TAG)
}

/// full address -> short address -> city -> "Online" (online only) -> "TBD".
pub fn resolve_location(payload: &RawRecord, is_online: bool) -> String {
    let geo = payload.get("geo_address_info").unwrap_or(&Value::Null);
    first_non_empty([
        str_field(geo, "full_address"),
        str_field(geo, "address"),
        str_field(geo, "city"),
        is_online.then_some(ONLINE_LOCATION),
        Some(UNKNOWN_LOCATION),
    ])
    .unwrap_or(UNKNOWN_LOCATION)
    .to_string()
}

/// Joins host display names from the record's own `hosts` list, falling back
/// to the caller's hint. Entries without a name are skipped.
pub fn resolve_host_name(raw: &RawRecord, hosts_hint: Option<&[RawRecord]>) -> String {
    let own = raw
        .get("hosts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .filter(|hosts| !hosts.is_empty());

    own.or(hosts_hint)
        .map(|hosts| {
            hosts
                .iter()
                .filter_map(|host| str_field(host, "name"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// A missing slug leaves the bare base URL; it is not corrected further.
pub fn build_url(slug: Option<&str>) -> String {
    format!("{}/{}", BASE_URL, slug.unwrap_or_default())
}
