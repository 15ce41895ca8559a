// ABOUTME: Error types for fetching the target page, with a FetchErrorCode and a FetchError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Categories of fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorCode {
    InvalidUrl,
    /// The fetcher settings could not be turned into an HTTP client.
    Config,
    Transport,
    Timeout,
    Status(u16),
}

impl fmt::Display for FetchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorCode::InvalidUrl => write!(f, "invalid URL"),
            FetchErrorCode::Config => write!(f, "invalid fetch configuration"),
            FetchErrorCode::Transport => write!(f, "transport error"),
            FetchErrorCode::Timeout => write!(f, "timeout"),
            FetchErrorCode::Status(status) => write!(f, "HTTP status {}", status),
        }
    }
}

/// A failed fetch. Terminal for a run: nothing is extracted or written.
#[derive(Debug, thiserror::Error)]
pub struct FetchError {
    pub code: FetchErrorCode,
    pub url: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_empty() {
            write!(f, "fetch: {}", self.code)?;
        } else {
            write!(f, "fetch {}: {}", self.url, self.code)?;
        }
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl FetchError {
    fn new(code: FetchErrorCode, url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code,
            url: url.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(FetchErrorCode::InvalidUrl, url, source)
    }

    /// Create a Config error. Raised before any request, so no URL is attached.
    pub fn config(source: anyhow::Error) -> Self {
        Self::new(FetchErrorCode::Config, "", Some(source))
    }

    /// Create a Transport error.
    pub fn transport(url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(FetchErrorCode::Transport, url, source)
    }

    /// Create a Timeout error.
    pub fn timeout(url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(FetchErrorCode::Timeout, url, source)
    }

    /// Create a Status error for a non-success final response.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::new(FetchErrorCode::Status(status), url, None)
    }

    pub fn is_timeout(&self) -> bool {
        self.code == FetchErrorCode::Timeout
    }

    pub fn is_config(&self) -> bool {
        self.code == FetchErrorCode::Config
    }

    pub fn is_invalid_url(&self) -> bool {
        self.code == FetchErrorCode::InvalidUrl
    }

    /// The HTTP status, if the server answered with a failure.
    pub fn status_code(&self) -> Option<u16> {
        match self.code {
            FetchErrorCode::Status(status) => Some(status),
            _ => None,
        }
    }
}
