// ABOUTME: Run configuration: target page, output file, fetch settings and channel text.
// ABOUTME: Defaults reproduce the EET-China recommended-page feed; a TOML file may override any key.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use pagefeed_feed::FeedMeta;
use serde::Deserialize;

/// Everything one run needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page to turn into a feed; also the base URL for relative links.
    pub target_url: String,
    /// Where the feed is written.
    pub output_path: PathBuf,
    pub fetch: FetchConfig,
    pub feed: FeedMeta,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: "https://www.eet-china.com/mp/recommended".to_string(),
            output_path: PathBuf::from("eet_china_rss.xml"),
            fetch: FetchConfig::default(),
            feed: FeedMeta::default(),
        }
    }
}

impl Config {
    /// Loads a TOML config file. Keys not present keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses TOML text into a config.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// HTTP settings for fetching the target page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Relay URL with a `{url}` placeholder. `None` or an empty string fetches directly.
    pub mirror_template: Option<String>,
    pub user_agent: String,
    /// Extra request headers sent with every request.
    pub headers: BTreeMap<String, String>,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let headers = [
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
            ("Accept-Language", "zh-CN,zh;q=0.9"),
            ("Referer", "https://www.eet-china.com/"),
            ("Connection", "keep-alive"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            mirror_template: Some("https://api.allorigins.win/raw?url={url}".to_string()),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36".to_string(),
            headers,
            connect_timeout_secs: 6,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl FetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry behaviour for transient failures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base delay; doubled for each further retry.
    pub backoff_ms: u64,
    /// Status codes treated as transient.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_ms: 1000,
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based).
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}
