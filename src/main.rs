use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use luma_scrape::utils::HOME_ENV;
use luma_scrape::{display, logging, run_with_catchup, Paths, RunOutcome, Runner, Store};

#[derive(Debug, Parser)]
#[command(name = "luma-scrape", version, about = "Daily digest of relevant lu.ma events")]
struct Cli {
    /// Application home (config/, data/, logs/).
    #[arg(long, global = true, env = HOME_ENV)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape and rank, unless a run happened in the last 20 hours (default).
    Run {
        /// Ignore the 20-hour gate.
        #[arg(long)]
        force: bool,
    },
    /// Scrape configured calendars and save all upcoming events.
    Scrape,
    /// Rank the last scrape against the configured interests.
    Filter,
    /// Print the last ranked digest.
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let paths = cli.home.clone().map(Paths::new).unwrap_or_else(Paths::from_env);
    logging::init_logging(&paths.logs_dir());

    match run(cli.command.unwrap_or(Commands::Run { force: false }), paths).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logging::log_error_with_context(&err, "luma-scrape");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, paths: Paths) -> anyhow::Result<()> {
    let now = Utc::now();

    match command {
        Commands::Show => {
            let store = Store::new(paths);
            match store.load_filtered().context("reading ranked events")? {
                Some(data) => println!("{}", display::render_digest(&data)),
                None => println!("No ranked events yet. Run `luma-scrape run` first."),
            }
        }
        Commands::Scrape => {
            let runner = Runner::from_paths(paths).context("loading configuration")?;
            let events = runner.scrape(now).await.context("scraping events")?;
            log::info!("scraped {} events", events.len());
        }
        Commands::Filter => {
            let runner = Runner::from_paths(paths).context("loading configuration")?;
            let selected = runner.filter(now).await.context("ranking events")?;
            for event in &selected {
                println!("\n{}", display::render_event(event));
            }
        }
        Commands::Run { force } => {
            let runner = Runner::from_paths(paths).context("loading configuration")?;
            match run_with_catchup(&runner, force, now).await? {
                RunOutcome::Skipped => {}
                RunOutcome::Completed { scraped, selected } => {
                    log::info!("scraped {scraped} events, selected {}", selected.len());
                    if let Some(data) = runner.store().load_filtered()? {
                        println!("{}", display::render_digest(&data));
                    }
                }
            }
        }
    }

    Ok(())
}
