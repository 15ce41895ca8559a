// ABOUTME: Article extraction library: recovers (title, link, summary) records from a fetched page.
// ABOUTME: Re-exports the public API: ArticleExtractor, Article, ArticleBuilder, Clock, SiteProfile.

//! Best-effort article extraction for pages without a reliable schema.
//!
//! The page is parsed as HTML. If it contains no links at all it is treated
//! as a plain-text rendering and handed to the text heuristics; otherwise the
//! DOM strategies run in priority order and the first one that finds
//! anything wins.
//!
//! # Example
//!
//! ```
//! use pagefeed_extract::ArticleExtractor;
//!
//! let page = r#"<div class="news-list"><a href="/news/1">Fab capacity grows</a></div>"#;
//! let articles = ArticleExtractor::new().extract(page, "https://example.com/");
//! assert_eq!(articles[0].link, "https://example.com/news/1");
//! ```

pub mod article;
pub mod clock;
pub mod dom;
pub mod pipeline;
pub mod profile;
pub mod strategies;

pub use crate::article::{clean_title, Article, ArticleBuilder};
pub use crate::clock::{format_pub_date, Clock, FixedClock, SystemClock, PUB_DATE_FORMAT};
pub use crate::pipeline::ArticleExtractor;
pub use crate::profile::{ProfileError, SiteProfile};
