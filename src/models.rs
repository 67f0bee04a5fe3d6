use serde::{Deserialize, Serialize};

/// Canonical event as produced by the pipeline adapter.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String, // upstream api_id, or a v4 uuid when the record has none
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub timezone: String,
    pub location: String,
    pub is_online: bool,
    pub url: String,
    pub host_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

/// An event picked by the ranker, with the model's one-line justification.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilteredEvent {
    #[serde(flatten)]
    pub event: Event,
    pub relevance_reason: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedData {
    pub scraped_at: String,
    pub events: Vec<Event>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FilteredData {
    pub filtered_at: String,
    pub filter_text: String,
    pub events: Vec<FilteredEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Event {
        Event {
            id: "evt-1".to_string(),
            title: "Rust Meetup".to_string(),
            description: String::new(),
            start_time: "2024-01-02T10:00:00Z".to_string(),
            end_time: String::new(),
            timezone: "America/New_York".to_string(),
            location: "TBD".to_string(),
            is_online: false,
            url: "https://lu.ma/rust".to_string(),
            host_name: "Alice".to_string(),
            cover_image_url: None,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(sample()).expect("serialize event");
        assert_eq!(value["startTime"], json!("2024-01-02T10:00:00Z"));
        assert_eq!(value["isOnline"], json!(false));
        assert_eq!(value["hostName"], json!("Alice"));
        assert!(value.get("coverImageUrl").is_none());
    }

    #[test]
    fn filtered_event_flattens_the_event() {
        let filtered = FilteredEvent {
            event: sample(),
            relevance_reason: "Matches Rust interest".to_string(),
        };
        let value = serde_json::to_value(&filtered).expect("serialize filtered");
        assert_eq!(value["id"], json!("evt-1"));
        assert_eq!(value["relevanceReason"], json!("Matches Rust interest"));

        let back: FilteredEvent = serde_json::from_value(value).expect("deserialize filtered");
        assert_eq!(back, filtered);
    }
}
