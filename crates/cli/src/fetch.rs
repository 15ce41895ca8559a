// ABOUTME: Fetch collaborator: retrieves the target page directly or through a mirror relay.
// ABOUTME: Retries transient failures with exponential backoff and decodes the body using charset hints.

use std::thread;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::{info, warn};

use crate::config::{FetchConfig, RetryPolicy};
use crate::error::FetchError;

/// Something that can produce the text of a page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    mirror_template: Option<String>,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Builds a fetcher from `config`. Fails if a header is malformed or the
    /// HTTP client cannot be created.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                FetchError::config(anyhow::anyhow!("invalid header name {}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                FetchError::config(anyhow::anyhow!("invalid header value for {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|e| FetchError::config(e.into()))?;

        Ok(Self {
            client,
            mirror_template: config
                .mirror_template
                .clone()
                .filter(|t| !t.trim().is_empty()),
            retry: config.retry.clone(),
        })
    }

    /// Disables the mirror relay; requests go straight to the target.
    pub fn direct(mut self) -> Self {
        self.mirror_template = None;
        self
    }

    /// The URL actually requested for `target`.
    pub fn request_url(&self, target: &str) -> String {
        match &self.mirror_template {
            Some(template) => template.replace("{url}", target),
            None => target.to_string(),
        }
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, target: &str) -> Result<String, FetchError> {
        let url = self.request_url(target);
        url::Url::parse(&url).map_err(|e| {
            FetchError::invalid_url(&url, Some(anyhow::anyhow!("invalid URL: {}", e)))
        })?;
        if url != target {
            info!(mirror = %url, "fetching through mirror");
        }

        let mut retries = 0;
        loop {
            let failure = match self.client.get(&url).send() {
                Ok(response) if response.status().is_success() => return read_body(&url, response),
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !self.retry.is_retryable_status(status) {
                        return Err(FetchError::status(&url, status));
                    }
                    FetchError::status(&url, status)
                }
                Err(e) if e.is_timeout() => FetchError::timeout(&url, Some(e.into())),
                Err(e) => FetchError::transport(&url, Some(e.into())),
            };

            if retries >= self.retry.max_retries {
                return Err(failure);
            }
            retries += 1;
            let delay = self.retry.delay(retries);
            warn!(error = %failure, retry = retries, delay_ms = delay.as_millis() as u64, "retrying fetch");
            thread::sleep(delay);
        }
    }
}

fn read_body(url: &str, response: Response) -> Result<String, FetchError> {
    let declared = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(declared_encoding);
    let body = response.bytes().map_err(|e| {
        FetchError::transport(url, Some(anyhow::anyhow!("failed to read body: {}", e)))
    })?;
    Ok(decode(&body, declared))
}

/// The encoding named by the `charset` parameter of a Content-Type value, if known.
fn declared_encoding(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, label)| {
            let label = label.trim().trim_matches(|c| c == '"' || c == '\'');
            Encoding::for_label(label.as_bytes())
        })
}

/// Mirrors often drop the charset, so undeclared bodies are sniffed.
fn decode(body: &[u8], declared: Option<&'static Encoding>) -> String {
    let encoding = declared.unwrap_or_else(|| {
        let mut detector = EncodingDetector::new();
        detector.feed(body, true);
        detector.guess(None, true)
    });
    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn test_config() -> FetchConfig {
        FetchConfig {
            mirror_template: None,
            retry: RetryPolicy {
                backoff_ms: 0,
                ..RetryPolicy::default()
            },
            ..FetchConfig::default()
        }
    }

    #[test]
    fn test_fetch_ok_with_default_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/page")
                .header("accept-language", "zh-CN,zh;q=0.9")
                .header("referer", "https://www.eet-china.com/");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<p>你好</p>");
        });

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let body = fetcher.fetch(&server.url("/page")).unwrap();
        mock.assert();
        assert_eq!(body, "<p>你好</p>");
    }

    #[test]
    fn test_fetch_through_mirror() {
        let server = MockServer::start();
        let target = "https://www.eet-china.com/mp/recommended";
        let mock = server.mock(|when, then| {
            when.method(GET).path("/raw").query_param("url", target);
            then.status(200).body("mirrored");
        });

        let config = FetchConfig {
            mirror_template: Some(server.url("/raw?url={url}")),
            ..test_config()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.request_url(target), server.url(&format!("/raw?url={}", target)));
        assert_eq!(fetcher.fetch(target).unwrap(), "mirrored");
        mock.assert();
    }

    #[test]
    fn test_empty_mirror_template_means_direct() {
        let config = FetchConfig {
            mirror_template: Some("  ".to_string()),
            ..test_config()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.request_url("https://example.com/"), "https://example.com/");

        let config = FetchConfig {
            mirror_template: Some("https://relay.example/?u={url}".to_string()),
            ..test_config()
        };
        let fetcher = HttpFetcher::new(&config).unwrap().direct();
        assert_eq!(fetcher.request_url("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn test_transient_status_retried_until_exhausted() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/busy");
            then.status(503);
        });

        let config = FetchConfig {
            retry: RetryPolicy {
                max_retries: 2,
                backoff_ms: 0,
                ..RetryPolicy::default()
            },
            ..test_config()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        let err = fetcher.fetch(&server.url("/busy")).unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(mock.calls(), 3);
    }

    #[test]
    fn test_client_error_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("not found");
        });

        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let err = fetcher.fetch(&server.url("/missing")).unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let fetcher = HttpFetcher::new(&test_config()).unwrap();
        let err = fetcher.fetch("not a url").unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut config = test_config();
        config.headers.insert("bad header".to_string(), "x".to_string());
        let err = HttpFetcher::new(&config).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().starts_with("fetch: invalid fetch configuration: invalid header name bad header"));
    }

    #[test]
    fn test_decode_gbk_with_charset() {
        // "中文" in GBK
        let gbk: &[u8] = &[0xd6, 0xd0, 0xce, 0xc4];
        assert_eq!(decode(gbk, declared_encoding("text/html; charset=gbk")), "中文");
        assert_eq!(decode("中文".as_bytes(), None), "中文");
    }

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            declared_encoding("text/html; charset=utf-8"),
            Some(encoding_rs::UTF_8)
        );
        assert_eq!(
            declared_encoding("text/html; Charset=\"GB2312\""),
            Some(encoding_rs::GBK)
        );
        assert_eq!(declared_encoding("text/html"), None);
        assert_eq!(declared_encoding("text/html; charset=no-such-thing"), None);
    }
}
