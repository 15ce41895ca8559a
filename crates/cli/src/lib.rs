// ABOUTME: Library side of the pagefeed binary: configuration, page fetching and run orchestration.
// ABOUTME: Re-exports Config, HttpFetcher, PageSource, FetchError and the run entry points.

pub mod config;
pub mod error;
pub mod fetch;
pub mod run;

pub use crate::config::{Config, FetchConfig, RetryPolicy};
pub use crate::error::{FetchError, FetchErrorCode};
pub use crate::fetch::{HttpFetcher, PageSource};
pub use crate::run::{fetch_articles, generate, RunOutcome};
