use chrono::{DateTime, Duration, Utc};

use crate::error::AppResult;
use crate::llm::Ranker;
use crate::models::FilteredEvent;
use crate::runner::Runner;
use crate::scraping::PageFetcher;
use crate::state::State;

/// A scheduled run is skipped when the last one finished more recently than this.
pub const MIN_HOURS_BETWEEN_RUNS: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Skipped,
    Completed {
        scraped: usize,
        selected: Vec<FilteredEvent>,
    },
}

pub fn should_run(state: &State, now: DateTime<Utc>) -> bool {
    let last_run = match (&state.last_run, state.last_run_at()) {
        (None, _) => {
            log::info!("no previous run recorded, should run");
            return true;
        }
        (Some(raw), None) => {
            log::warn!("unreadable last run {raw:?}, should run");
            return true;
        }
        (Some(_), Some(at)) => at,
    };

    let elapsed = now.signed_duration_since(last_run);
    log::info!(
        "hours since last run: {:.2}",
        elapsed.num_seconds() as f64 / 3600.0
    );

    if elapsed >= Duration::hours(MIN_HOURS_BETWEEN_RUNS) {
        log::info!("more than {MIN_HOURS_BETWEEN_RUNS} hours since last run, should run");
        true
    } else {
        log::info!("recently run, skipping");
        false
    }
}

/// Scrape then rank, unless a run already happened recently. The last-run
/// timestamp only advances after both steps succeed.
pub async fn run_with_catchup<F, R>(
    runner: &Runner<F, R>,
    force: bool,
    now: DateTime<Utc>,
) -> AppResult<RunOutcome>
where
    F: PageFetcher + 'static,
    R: Ranker,
{
    log::info!("=== luma-scrape started ===");

    if !force && !should_run(&runner.state().read(), now) {
        log::info!("skipping run (use --force to override)");
        return Ok(RunOutcome::Skipped);
    }

    log::info!("starting scraper...");
    let scraped = runner.scrape(now).await?.len();
    log::info!("scraping complete");

    log::info!("starting filter...");
    let selected = runner.filter(now).await?;
    log::info!("filtering complete");

    runner.state().record_run(now)?;
    log::info!("state updated");
    log::info!("=== run completed successfully ===");

    Ok(RunOutcome::Completed { scraped, selected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::instant;

    fn state(last_run: Option<&str>) -> State {
        State {
            last_run: last_run.map(str::to_string),
        }
    }

    #[test]
    fn never_run_should_run() {
        assert!(should_run(&state(None), instant("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn garbage_last_run_should_run() {
        assert!(should_run(
            &state(Some("yesterday-ish")),
            instant("2024-01-01T00:00:00Z")
        ));
    }

    #[test]
    fn twenty_hour_gate() {
        let last = Some("2024-01-01T00:00:00Z");
        assert!(!should_run(&state(last), instant("2024-01-01T19:59:59Z")));
        assert!(should_run(&state(last), instant("2024-01-01T20:00:00Z")));
        assert!(should_run(&state(last), instant("2024-01-03T00:00:00Z")));
    }

    #[test]
    fn last_run_in_future_skips() {
        let last = Some("2024-01-02T00:00:00Z");
        assert!(!should_run(&state(last), instant("2024-01-01T00:00:00Z")));
    }
}
