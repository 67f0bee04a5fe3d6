use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::llm::{EventRanker, Ranker};
use crate::models::{Event, FilteredEvent};
use crate::scraping::{HttpFetcher, LumaScraper, PageFetcher};
use crate::state::StateStore;
use crate::store::Store;
use crate::utils::Paths;

/// Everything one run needs: settings, persisted files, the fetcher and the ranker.
pub struct Runner<F: PageFetcher, R: Ranker> {
    config: AppConfig,
    store: Store,
    state: StateStore,
    scraper: Arc<LumaScraper<F>>,
    ranker: R,
}

impl Runner<HttpFetcher, EventRanker> {
    /// Production wiring: config file under `paths`, HTTP fetches, env-configured LLM.
    pub fn from_paths(paths: Paths) -> AppResult<Self> {
        let config = AppConfig::load(&paths.config_path())?;
        Ok(Self::new(paths, config, HttpFetcher, EventRanker::from_env()))
    }
}

impl<F, R> Runner<F, R>
where
    F: PageFetcher + 'static,
    R: Ranker,
{
    pub fn new(paths: Paths, config: AppConfig, fetcher: F, ranker: R) -> Self {
        Self {
            config,
            state: StateStore::load(paths.state_path()),
            store: Store::new(paths),
            scraper: Arc::new(LumaScraper::new(fetcher)),
            ranker,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Scrapes every configured URL, runs the pipeline and overwrites the
    /// scraped-events file. Nothing is written when every URL failed.
    pub async fn scrape(&self, now: DateTime<Utc>) -> AppResult<Vec<Event>> {
        let scraper = Arc::clone(&self.scraper);
        let urls = self.config.urls.clone();
        let days = self.config.days_ahead;

        let events = tokio::task::spawn_blocking(move || scraper.scrape(&urls, days, now))
            .await
            .map_err(|err| AppError::Anyhow(anyhow::anyhow!("scrape task failed: {err}")))??;

        self.store.save_scraped(&events, now)?;
        Ok(events)
    }

    /// Ranks the last scrape and overwrites the filtered-events file.
    pub async fn filter(&self, now: DateTime<Utc>) -> AppResult<Vec<FilteredEvent>> {
        let scraped = self.store.load_scraped()?;
        let selected = if scraped.events.is_empty() {
            log::info!("no events to filter");
            Vec::new()
        } else {
            self.ranker
                .rank(&scraped.events, &self.config.filter_text)
                .await?
        };
        log::info!("selected {} events", selected.len());

        self.store
            .save_filtered(&self.config.filter_text, &selected, now)?;
        Ok(selected)
    }
}
