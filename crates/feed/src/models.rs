// ABOUTME: Channel-level metadata for generated RSS feeds.
// ABOUTME: FeedMeta is the configurable part; Channel adds the link and build date for one run.

use pagefeed_extract::{format_pub_date, Clock};
use serde::{Deserialize, Serialize};

/// Configurable channel text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
}

impl Default for FeedMeta {
    fn default() -> Self {
        Self {
            title: "EET-China 推荐内容".to_string(),
            description: "EET-China 推荐页面的自定义 RSS 订阅源".to_string(),
        }
    }
}

/// The `<channel>` header of an RSS 2.0 document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub last_build_date: String,
}

impl Channel {
    /// Builds a channel for `link`, stamped with the clock's current time.
    pub fn new(meta: &FeedMeta, link: impl Into<String>, clock: &dyn Clock) -> Self {
        Self {
            title: meta.title.clone(),
            link: link.into(),
            description: meta.description.clone(),
            last_build_date: format_pub_date(clock.now()),
        }
    }
}
