// ABOUTME: Article record produced by the extraction strategies and its construction rule.
// ABOUTME: ArticleBuilder cleans titles, resolves links against the page URL and stamps the run date.

use serde::Serialize;
use url::Url;

use crate::clock::{format_pub_date, Clock};

/// A single entry recovered from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub pub_date: String,
}

/// Turns (title, href, summary) candidates into [`Article`]s.
///
/// One builder is created per extraction run, so every article it produces
/// carries the same `pub_date`.
#[derive(Debug, Clone)]
pub struct ArticleBuilder {
    base: Option<Url>,
    pub_date: String,
}

impl ArticleBuilder {
    pub fn new(base_url: &str, clock: &dyn Clock) -> Self {
        Self {
            base: Url::parse(base_url.trim()).ok(),
            pub_date: format_pub_date(clock.now()),
        }
    }

    /// The timestamp shared by all articles of this run.
    pub fn pub_date(&self) -> &str {
        &self.pub_date
    }

    /// Resolves `href` against the base URL. Returns `None` when no absolute
    /// URL can be produced.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        match &self.base {
            Some(base) => base.join(href).ok().map(String::from),
            None => Url::parse(href).ok().map(String::from),
        }
    }

    /// Builds an article, or `None` if the title is empty after cleaning or
    /// the link cannot be made absolute.
    pub fn build(&self, title: &str, href: &str, summary: &str) -> Option<Article> {
        let title = clean_title(title);
        if title.is_empty() {
            return None;
        }
        let link = self.resolve(href)?;
        Some(Article {
            title,
            link,
            summary: summary.trim().to_string(),
            pub_date: self.pub_date.clone(),
        })
    }
}

/// Trims whitespace and strips surrounding double quotes.
pub fn clean_title(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}
