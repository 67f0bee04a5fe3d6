use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{Event, FilteredEvent};
use crate::scraping::base::clean_text;
use crate::utils::truncate_chars;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:1234/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.2;
const DEFAULT_MAX_TOKENS: u32 = 1024;

pub const TOP_K: usize = 5;
const DESCRIPTION_LIMIT: usize = 500;

static JSON_ARRAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[\s\S]*\]").expect("valid json array regex"));

/// What the model sees for each candidate event.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub location: String,
    pub is_online: bool,
    pub host_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub reason: String,
}

impl Selection {
    /// Reads one `{index, reason}` entry. Whole-number floats such as `1.0`
    /// are accepted; anything else without a usable index yields `None`.
    fn from_value(value: &Value) -> Option<Self> {
        let raw = value.get("index")?;
        let index = match raw.as_u64() {
            Some(index) => index,
            None => raw
                .as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)?,
        };
        Some(Self {
            index: usize::try_from(index).ok()?,
            reason: value
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Chooses the events worth showing for a free-text interest profile.
#[allow(async_fn_in_trait)]
pub trait Ranker {
    async fn rank(&self, events: &[Event], interests: &str) -> AppResult<Vec<FilteredEvent>>;
}

/// Picks the most relevant events through an OpenAI-compatible chat endpoint.
pub struct EventRanker {
    model: String,
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
    client: Client,
}

impl EventRanker {
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("LLM_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_key = std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
        let temperature = std::env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);
        let max_tokens = std::env::var("LLM_MAX_TOKENS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);

        Self {
            model,
            base_url,
            api_key,
            temperature,
            max_tokens,
            client: Client::new(),
        }
    }

    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let base = self.base_url.trim_end_matches('/');
        let url = format!("{}/chat/completions", base);

        let payload = json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT,
                },
                {
                    "role": "user",
                    "content": prompt,
                }
            ],
        });

        let mut request = self.client.post(url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AppError::rank(err.to_string()))?;

        let status = response.status();
        let text_body = response
            .text()
            .await
            .map_err(|err| AppError::rank(err.to_string()))?;

        if !status.is_success() {
            return Err(AppError::rank(format!("HTTP {}: {}", status, text_body)));
        }

        let value: serde_json::Value =
            serde_json::from_str(&text_body).map_err(|err| AppError::rank(err.to_string()))?;

        value
            .get("choices")
            .and_then(|choices| choices.as_array())
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::rank("LLM response missing content"))
    }
}

impl Ranker for EventRanker {
    /// Asks the model for the top picks and maps them back onto `events`.
    async fn rank(&self, events: &[Event], interests: &str) -> AppResult<Vec<FilteredEvent>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let summaries = summarize(events);
        let summaries_json = serde_json::to_string_pretty(&summaries)?;
        log::info!("asking {} to rank {} events", self.model, events.len());
        let text = self
            .complete(&build_user_prompt(interests, &summaries_json))
            .await?;

        let selections = parse_selections(&text, events.len()).map_err(|err| {
            log::error!("failed to parse ranker response: {text}");
            err
        })?;
        Ok(select(events, &selections))
    }
}

const SYSTEM_PROMPT: &str =
    "You help filter tech events based on user interests. Answer with JSON only.";

pub fn summarize(events: &[Event]) -> Vec<EventSummary> {
    events
        .iter()
        .enumerate()
        .map(|(index, event)| EventSummary {
            index,
            title: event.title.clone(),
            description: truncate_chars(&clean_text(&event.description), DESCRIPTION_LIMIT)
                .to_string(),
            start_time: event.start_time.clone(),
            location: event.location.clone(),
            is_online: event.is_online,
            host_name: event.host_name.clone(),
        })
        .collect()
}

pub fn build_user_prompt(interests: &str, summaries_json: &str) -> String {
    format!(
        "USER'S INTERESTS:\n{interests}\n\nAVAILABLE EVENTS:\n{summaries_json}\n\nTASK:\nSelect the TOP {top} most relevant events based on the user's interests. Consider:\n1. How well the event topic matches the user's interests\n2. The quality and specificity of the event (prefer focused events over generic ones)\n3. Variety - try to include different types of relevant events\n\nRESPONSE FORMAT:\nReturn ONLY a JSON array with exactly {top} objects, each containing:\n- \"index\": the event index from the list above\n- \"reason\": a brief explanation (1 sentence) of why this event is relevant\n\nExample:\n[\n  {{\"index\": 0, \"reason\": \"AI agents meetup directly matches interest in LLM applications\"}},\n  {{\"index\": 3, \"reason\": \"Technical deep-dive on transformer architectures\"}}\n]\n\nReturn ONLY the JSON array, no other text.",
        interests = interests,
        summaries_json = summaries_json,
        top = TOP_K,
    )
}

/// Finds the JSON array in a model reply (surrounding prose is tolerated) and
/// keeps at most [`TOP_K`] in-range selections, in the model's order.
/// Malformed entries are skipped one by one; only an unreadable array fails.
pub fn parse_selections(text: &str, event_count: usize) -> AppResult<Vec<Selection>> {
    let array = JSON_ARRAY_RE
        .find(text)
        .ok_or_else(|| AppError::rank("no JSON array found in response"))?;
    let entries: Vec<Value> = serde_json::from_str(array.as_str())
        .map_err(|err| AppError::rank(format!("failed to parse response: {err}")))?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let selection = Selection::from_value(entry);
            if selection.is_none() {
                log::warn!("skipping malformed selection: {entry}");
            }
            selection
        })
        .filter(|s| s.index < event_count)
        .take(TOP_K)
        .collect())
}

pub fn select(events: &[Event], selections: &[Selection]) -> Vec<FilteredEvent> {
    selections
        .iter()
        .filter_map(|s| {
            events.get(s.index).map(|event| FilteredEvent {
                event: event.clone(),
                relevance_reason: s.reason.clone(),
            })
        })
        .collect()
}
