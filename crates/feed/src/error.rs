// ABOUTME: Error types for feed assembly.
// ABOUTME: Provides FeedError with Serialize and Empty variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while assembling a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Writing the XML document failed.
    #[error("failed to serialize feed: {0}")]
    Serialize(String),

    /// There were no articles to publish.
    #[error("feed is empty: no articles to publish")]
    Empty,
}

impl FeedError {
    /// Creates a Serialize error from an underlying writer error.
    pub fn serialize(err: impl fmt::Display) -> Self {
        FeedError::Serialize(err.to_string())
    }
}
