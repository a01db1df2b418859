//! Courier scraper CLI
//!
//! Local execution entry point. Expects a WebDriver server (geckodriver)
//! reachable at `browser.webdriver_url`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use courier_scraper::{
    browser::WebDriverLauncher,
    config::{CONFIG_FILE, load_config},
    error::Result,
    models::Config,
    pipeline,
    services::AjaxClient,
    storage::{FailureLog, LocalStorage, StoryStorage},
};

/// Courier news scraper
#[derive(Parser, Debug)]
#[command(
    name = "courier-scraper",
    version,
    about = "Scrapes story metadata from Courier network outlets"
)]
struct Cli {
    /// Path to storage directory holding config and output files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paginate each outlet by clicking its "load more" control
    Feed {
        /// Scrape only this outlet base URL
        #[arg(long)]
        outlet: Option<String>,
    },

    /// Paginate each outlet through the admin-ajax endpoint
    Ajax {
        /// Scrape only this outlet base URL
        #[arg(long)]
        outlet: Option<String>,

        /// Use this nonce instead of discovering one
        #[arg(long)]
        nonce: Option<String>,
    },

    /// Validate configuration
    Validate,

    /// Show configuration and last snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Courier scraper starting...");

    let mut config = load_config(&cli.storage_dir);
    log::info!(
        "Loaded configuration from {}",
        cli.storage_dir.join(CONFIG_FILE).display()
    );

    let storage = LocalStorage::new(&cli.storage_dir, config.output.stories_file.clone());

    match cli.command {
        Command::Feed { outlet } => {
            config.validate()?;
            let outlets = config.select_outlets(outlet.as_deref());
            let launcher = WebDriverLauncher::new(&config.browser);
            let mut failures = open_failure_log(&cli.storage_dir, &config).await?;

            let outcome =
                pipeline::run_feed_scrape(&config, &launcher, &outlets, &mut failures).await?;
            storage.write_snapshot(&outcome).await?;
            log::info!("Feed scrape complete!");
        }

        Command::Ajax { outlet, nonce } => {
            if nonce.is_some() {
                config.ajax.nonce = nonce;
            }
            config.validate()?;
            let outlets = config.select_outlets(outlet.as_deref());
            let launcher = WebDriverLauncher::new(&config.browser);
            let client = AjaxClient::new(&config.ajax)?;
            let mut failures = open_failure_log(&cli.storage_dir, &config).await?;

            let outcome =
                pipeline::run_ajax_scrape(&config, &launcher, &client, &outlets, &mut failures)
                    .await?;
            storage.write_snapshot(&outcome).await?;
            log::info!("AJAX scrape complete!");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK ({} outlets)", config.outlets.len());
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("WebDriver: {}", config.browser.webdriver_url);
            for outlet in &config.outlets {
                log::info!("Outlet: {} ({})", outlet.name, outlet.url);
            }
            log::info!(
                "Cookie: {}, nonce: {}",
                if config.ajax.cookie.is_some() { "set" } else { "not set" },
                if config.ajax.nonce.is_some() { "set" } else { "discover" }
            );

            match storage.load_snapshot().await? {
                Some(snapshot) => {
                    log::info!(
                        "Last snapshot: {} mode, {} stories, {} failures",
                        snapshot.outcome.mode,
                        snapshot.outcome.stats.story_count,
                        snapshot.outcome.stats.failure_count
                    );
                    log::info!("Last updated: {}", snapshot.updated_at);
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}

async fn open_failure_log(storage_dir: &std::path::Path, config: &Config) -> Result<FailureLog> {
    let log = FailureLog::open(storage_dir.join(&config.output.failure_log)).await?;
    log::info!("Logging progress to {}", log.path().display());
    Ok(log)
}
