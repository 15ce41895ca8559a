// ABOUTME: Site profile holding the host, URL patterns and marker words the text strategies rely on.
// ABOUTME: The default profile targets the EET-China "mp" article pages.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;

static EET_ARTICLE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https://www\.eet-china\.com/mp/a\d+\.html").unwrap());
// "original" and "views", printed after each headline.
static EET_MARKERS: Lazy<AhoCorasick> = Lazy::new(|| AhoCorasick::new(["原创", "浏览"]).unwrap());

/// Errors raised while building a custom [`SiteProfile`].
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("invalid article URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid marker words: {0}")]
    Markers(#[from] aho_corasick::BuildError),
}

/// Site-specific knowledge used when a page arrives as plain text.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Substring a markdown-style link must contain, e.g. `eet-china.com/mp/`.
    pub link_marker: String,
    /// Prefix a line must contain before the article URL regex is tried.
    pub article_url_prefix: String,
    /// Matches a full article URL.
    pub article_url: Regex,
    /// Words that trail a headline in the site's list items.
    markers: AhoCorasick,
}

impl SiteProfile {
    /// Builds a profile from a URL pattern and marker words.
    pub fn new(
        link_marker: impl Into<String>,
        article_url_prefix: impl Into<String>,
        article_url: &str,
        marker_words: &[&str],
    ) -> Result<Self, ProfileError> {
        let markers = AhoCorasick::new(marker_words)?;
        Ok(Self {
            link_marker: link_marker.into(),
            article_url_prefix: article_url_prefix.into(),
            article_url: Regex::new(article_url)?,
            markers,
        })
    }

    /// Profile for www.eet-china.com.
    pub fn eet_china() -> Self {
        Self {
            link_marker: "eet-china.com/mp/".to_string(),
            article_url_prefix: "https://www.eet-china.com/mp/a".to_string(),
            article_url: EET_ARTICLE_URL.clone(),
            markers: EET_MARKERS.clone(),
        }
    }

    /// True if `line` contains one of the list-item marker words.
    pub fn has_marker(&self, line: &str) -> bool {
        self.markers.is_match(line)
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::eet_china()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_patterns() {
        let p = SiteProfile::default();
        assert!(p
            .article_url
            .is_match("see https://www.eet-china.com/mp/a429190.html now"));
        assert!(!p.article_url.is_match("https://www.eet-china.com/mp/recommended"));
        assert!(p.has_marker("2024-01-01 原创"));
        assert!(p.has_marker("1234 浏览"));
        assert!(!p.has_marker("nothing here"));
    }

    #[test]
    fn test_custom_profile() {
        let p = SiteProfile::new(
            "example.com/post/",
            "https://example.com/post/",
            r"https://example\.com/post/\d+",
            &["views"],
        )
        .unwrap();
        assert!(p.article_url.is_match("https://example.com/post/42"));
        assert!(p.has_marker("120 views"));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        assert!(SiteProfile::new("a", "b", "(", &["x"]).is_err());
    }
}
