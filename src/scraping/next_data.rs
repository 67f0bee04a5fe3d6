//! Reads the Next.js `__NEXT_DATA__` payload that lu.ma embeds in calendar
//! and discover pages.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::pipeline::{Source, SourceTag};

static NEXT_DATA_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script#__NEXT_DATA__").expect("next data selector"));

const DATA_POINTER: &str = "/props/pageProps/initialData/data";
const PRIMARY_KEY: &str = "events";
const FEATURED_KEY: &str = "featured_events";

/// Pulls the primary and featured record lists out of a rendered page, primary
/// first. A page without the payload or without either list yields no sources.
pub fn extract_sources(html: &str) -> AppResult<Vec<Source>> {
    let payload = match next_data_json(html) {
        Some(text) => text,
        None => {
            log::debug!("no __NEXT_DATA__ script found");
            return Ok(Vec::new());
        }
    };

    let root: Value = serde_json::from_str(&payload)
        .map_err(|err| AppError::extract(format!("invalid __NEXT_DATA__ json: {err}")))?;
    Ok(sources_from_payload(&root))
}

pub fn sources_from_payload(root: &Value) -> Vec<Source> {
    let data = match root.pointer(DATA_POINTER) {
        Some(data) => data,
        None => return Vec::new(),
    };

    let mut sources = Vec::with_capacity(2);
    for (key, tag) in [
        (PRIMARY_KEY, SourceTag::Primary),
        (FEATURED_KEY, SourceTag::Featured),
    ] {
        if let Some(records) = data.get(key).and_then(Value::as_array) {
            log::info!("  found {} {} events", records.len(), tag.as_str());
            sources.push(Source::new(tag, records.clone()));
        }
    }
    sources
}

fn next_data_json(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&NEXT_DATA_SELECTOR)
        .next()
        .map(|script| script.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
}
