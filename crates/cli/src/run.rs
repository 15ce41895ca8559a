// ABOUTME: One feed-generation run: fetch, extract, render and write.
// ABOUTME: Fetch failures propagate; an empty extraction ends the run without writing a file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use pagefeed_extract::{Article, ArticleExtractor, Clock};
use pagefeed_feed::{render_rss, Channel};
use tracing::info;

use crate::config::Config;
use crate::fetch::PageSource;

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The feed was written.
    Written { path: PathBuf, articles: usize },
    /// No strategy found any article; no file was written.
    Empty,
}

/// Fetches the target page and extracts its articles.
pub fn fetch_articles<C>(config: &Config, source: &dyn PageSource, clock: C) -> Result<Vec<Article>>
where
    C: Clock + 'static,
{
    info!("[1/4] fetching {}", config.target_url);
    let page = source.fetch(&config.target_url)?;

    info!("[2/4] page is {} characters, extracting", page.chars().count());
    let articles = ArticleExtractor::new()
        .with_clock(clock)
        .extract(&page, &config.target_url);

    info!("[3/4] extracted {} articles", articles.len());
    Ok(articles)
}

/// Runs the whole pipeline and writes the feed to `config.output_path`.
pub fn generate<C>(config: &Config, source: &dyn PageSource, clock: C) -> Result<RunOutcome>
where
    C: Clock + Copy + 'static,
{
    let articles = fetch_articles(config, source, clock)?;
    if articles.is_empty() {
        info!("no articles extracted, feed not written");
        return Ok(RunOutcome::Empty);
    }

    let channel = Channel::new(&config.feed, config.target_url.as_str(), &clock);
    let xml = render_rss(&articles, &channel)?;
    fs::write(&config.output_path, xml)
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;

    info!("[4/4] feed written to {}", config.output_path.display());
    Ok(RunOutcome::Written {
        path: config.output_path.clone(),
        articles: articles.len(),
    })
}
