//! Scrapes lu.ma calendars, keeps the upcoming events, and asks an LLM which
//! ones match the user's interests.
//!
//! ```text
//! fetch pages -> __NEXT_DATA__ sources -> pipeline::run -> all-events.json
//!             -> Ranker -> filtered-events.json -> display
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod llm;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod runner;
pub mod scheduler;
pub mod scraping;
pub mod state;
pub mod store;
pub mod utils;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use llm::{EventRanker, Ranker};
pub use models::{Event, FilteredData, FilteredEvent, ScrapedData};
pub use pipeline::{Source, SourceTag};
pub use runner::Runner;
pub use scheduler::{run_with_catchup, should_run, RunOutcome};
pub use scraping::{HttpFetcher, LumaScraper, PageFetcher};
pub use state::{State, StateStore};
pub use store::Store;
pub use utils::Paths;
