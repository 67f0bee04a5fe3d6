pub mod base;
pub mod next_data;

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};
use crate::models::Event;
use crate::pipeline::{self, Source};

pub use base::HttpFetcher;

/// Fetches the rendered HTML for a calendar URL.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> anyhow::Result<String>;
}

pub struct LumaScraper<F: PageFetcher> {
    fetcher: F,
}

impl LumaScraper<HttpFetcher> {
    pub fn http() -> Self {
        Self::new(HttpFetcher)
    }
}

impl<F: PageFetcher> LumaScraper<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Record lists for one page. A page without an embedded payload yields
    /// nothing rather than an error.
    pub fn scrape_url(&self, url: &str) -> AppResult<Vec<Source>> {
        log::info!("scraping: {url}");
        let html = self.fetcher.fetch(url)?;
        let sources = next_data::extract_sources(&html)?;
        let count: usize = sources.iter().map(|s| s.records.len()).sum();
        log::info!("found {count} records from {url}");
        Ok(sources)
    }

    /// All sources across `urls`, keeping URL order and primary-before-featured
    /// within each page. A failing URL is logged and skipped; only when every
    /// URL fails is the scrape an error.
    pub fn scrape_sources(&self, urls: &[String]) -> AppResult<Vec<Source>> {
        let mut sources = Vec::new();
        let mut errors: Vec<(&str, AppError)> = Vec::new();

        for url in urls {
            match self.scrape_url(url) {
                Ok(found) => sources.extend(found),
                Err(err) => {
                    log::warn!("error scraping {url}: {err}");
                    errors.push((url.as_str(), err));
                }
            }
        }

        if !errors.is_empty() && errors.len() == urls.len() {
            let joined = errors
                .iter()
                .map(|(url, err)| format!("{url}: {err}"))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::scrape(format!("every calendar failed: {joined}")));
        }

        Ok(sources)
    }

    pub fn scrape(
        &self,
        urls: &[String],
        window_days: u32,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Event>> {
        let sources = self.scrape_sources(urls)?;
        let events = pipeline::run(&sources, window_days, now);
        log::info!(
            "total unique events within {window_days} days: {}",
            events.len()
        );
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::instant;
    use std::collections::HashMap;

    struct FixtureFetcher {
        pages: HashMap<String, String>,
    }

    impl PageFetcher for FixtureFetcher {
        fn fetch(&self, url: &str) -> anyhow::Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 for {url}"))
        }
    }

    fn page(events: &str, featured: &str) -> String {
        format!(
            r#"<html><body><script id="__NEXT_DATA__" type="application/json">
            {{"props":{{"pageProps":{{"initialData":{{"data":{{"events":{events},"featured_events":{featured}}}}}}}}}}}
            </script></body></html>"#
        )
    }

    fn fixture() -> FixtureFetcher {
        let mut pages = HashMap::new();
        pages.insert(
            "https://lu.ma/sf".to_string(),
            page(
                r#"[{"api_id":"a","event":{"name":"Talk","start_at":"2024-01-02T10:00:00Z"},"hosts":[{"name":"Alice"}]}]"#,
                r#"[{"api_id":"b","event":{"name":"Meetup","start_at":"2024-01-03T10:00:00Z"}}]"#,
            ),
        );
        pages.insert(
            "https://lu.ma/ai".to_string(),
            page(
                r#"[{"api_id":"b","event":{"name":"Meetup (AI calendar)","start_at":"2024-01-03T10:00:00Z"},"hosts":[{"name":"Bob"}]},
                    {"api_id":"c","event":{"name":"Hack Night","start_at":"2024-01-01T18:00:00Z"}}]"#,
                "[]",
            ),
        );
        pages.insert("https://lu.ma/broken".to_string(), "<html></html>".to_string());
        FixtureFetcher { pages }
    }

    #[test]
    fn earlier_urls_win_duplicates() {
        let scraper = LumaScraper::new(fixture());
        let urls = vec!["https://lu.ma/sf".to_string(), "https://lu.ma/ai".to_string()];

        let events = scraper
            .scrape(&urls, 30, instant("2024-01-01T00:00:00Z"))
            .expect("scrape");
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(events[2].title, "Meetup");
        assert_eq!(events[2].host_name, "");
    }

    #[test]
    fn failing_urls_are_skipped() {
        let scraper = LumaScraper::new(fixture());
        let urls = vec![
            "https://lu.ma/missing".to_string(),
            "https://lu.ma/broken".to_string(),
            "https://lu.ma/sf".to_string(),
        ];

        let events = scraper
            .scrape(&urls, 30, instant("2024-01-01T00:00:00Z"))
            .expect("scrape");
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn every_url_failing_is_an_error() {
        let scraper = LumaScraper::new(fixture());
        let urls = vec![
            "https://lu.ma/missing".to_string(),
            "https://lu.ma/gone".to_string(),
        ];

        let err = scraper
            .scrape(&urls, 30, instant("2024-01-01T00:00:00Z"))
            .expect_err("all urls failed");
        assert!(matches!(err, AppError::Scrape(_)));
        let message = err.to_string();
        assert!(message.contains("https://lu.ma/missing: "));
        assert!(message.contains("https://lu.ma/gone: "));
    }

    #[test]
    fn page_without_payload_is_not_a_failure() {
        let scraper = LumaScraper::new(fixture());
        let urls = vec!["https://lu.ma/broken".to_string()];

        let events = scraper
            .scrape(&urls, 30, instant("2024-01-01T00:00:00Z"))
            .expect("scrape");
        assert!(events.is_empty());
    }

    #[test]
    fn no_urls_no_events() {
        let scraper = LumaScraper::new(fixture());
        assert!(scraper
            .scrape(&[], 30, instant("2024-01-01T00:00:00Z"))
            .expect("scrape")
            .is_empty());
    }
}
