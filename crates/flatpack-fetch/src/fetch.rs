//! Fetch-by-URL abstraction.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Errors from retrieving a URL.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Something that can turn a URL into bytes.
///
/// One call, one response: no retries, no caching. Implementations are
/// shared across the pipeline's branches, hence `Send + Sync`.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP(S) fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("flatpack/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|err| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
        let scheme = parsed.scheme().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme,
            });
        }

        log::info!("fetching {}", url);
        let request_err = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(parsed).send().map_err(request_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(request_err)?;
        log::debug!("{} returned {} bytes", url, body.len());
        Ok(body.to_vec())
    }
}

/// In-memory fetcher for tests.
///
/// Unknown URLs answer 404. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, Result<Vec<u8>, u16>>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), Ok(body.into()));
        self
    }

    /// Answers `url` with an HTTP error status.
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), Err(status));
        self
    }

    /// URLs requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(url.to_string());

        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_serves_registered_body() {
        let fetcher = MockFetcher::new().with_body("https://dsm.test/doc.json", "{}");
        assert_eq!(fetcher.fetch("https://dsm.test/doc.json").unwrap(), b"{}");
        assert_eq!(fetcher.requested(), vec!["https://dsm.test/doc.json"]);
    }

    #[test]
    fn test_mock_status_and_unknown_url() {
        let fetcher = MockFetcher::new().with_status("https://dsm.test/icons.zip", 500);
        assert!(matches!(
            fetcher.fetch("https://dsm.test/icons.zip"),
            Err(FetchError::Status { status: 500, .. })
        ));
        assert!(matches!(
            fetcher.fetch("https://dsm.test/other"),
            Err(FetchError::Status { status: 404, .. })
        ));
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[test]
    fn test_http_rejects_bad_urls_before_sending() {
        let fetcher = HttpFetcher::new().unwrap();
        assert!(matches!(
            fetcher.fetch("not a url"),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(matches!(
            fetcher.fetch("ftp://dsm.test/doc.json"),
            Err(FetchError::UnsupportedScheme { .. })
        ));
    }
}
