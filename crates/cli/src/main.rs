// ABOUTME: CLI entry point that turns a web page's article list into an RSS 2.0 file.
// ABOUTME: Runs with built-in defaults; flags and an optional TOML file override them.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use pagefeed_cli::{fetch_articles, generate, Config, FetchError, HttpFetcher, RunOutcome};
use pagefeed_extract::SystemClock;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Build an RSS feed from a page's article list.
#[derive(Parser, Debug)]
#[command(name = "pagefeed")]
#[command(about = "Extract articles from a web page and write them as an RSS feed", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page to read (overrides the configured target).
    #[arg(long)]
    url: Option<String>,

    /// Feed output path (overrides the configured path).
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Fetch the page directly instead of through the mirror relay.
    #[arg(long, default_value_t = false)]
    direct: bool,

    /// Print the extracted articles as JSON instead of writing a feed.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(url) = args.url {
        config.target_url = url;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let mut fetcher = HttpFetcher::new(&config.fetch)?;
    if args.direct {
        fetcher = fetcher.direct();
    }

    if args.json {
        let articles = match fetch_articles(&config, &fetcher, SystemClock) {
            Ok(articles) => articles,
            Err(err) => return report_fetch_error(err),
        };
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    match generate(&config, &fetcher, SystemClock) {
        Ok(RunOutcome::Written { .. }) => Ok(()),
        Ok(RunOutcome::Empty) => {
            println!("no articles extracted");
            Ok(())
        }
        Err(err) => report_fetch_error(err),
    }
}

/// Fetch failures end the run with a message; anything else is a real error.
fn report_fetch_error(err: anyhow::Error) -> Result<()> {
    match err.downcast_ref::<FetchError>() {
        Some(fetch_err) => {
            error!("{}", fetch_err);
            Ok(())
        }
        None => Err(err),
    }
}
