// ABOUTME: Feed assembly library: turns extracted articles into an RSS 2.0 document.
// ABOUTME: Provides channel metadata models and the pretty-printing RSS writer.

pub mod error;
pub mod models;
pub mod rss;

pub use error::FeedError;
pub use models::{Channel, FeedMeta};
pub use rss::render_rss;
