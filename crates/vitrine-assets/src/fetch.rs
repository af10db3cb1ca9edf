use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Fallback fetch errors.
#[derive(Debug, Error, Clone)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(String),

    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { status: u16, url: String },
}

pub type FetchResult<T> = Result<T, FetchError>;

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}

/// Narrow seam for retrieving placeholder bytes for entries the user never
/// customized.
#[async_trait]
pub trait FallbackFetch: Send + Sync {
    /// Fetch the full body at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on HTTP failure or a non-success status.
    async fn fetch_bytes(&self, url: &Url) -> FetchResult<Bytes>;
}

#[derive(Clone, Debug)]
pub struct FetchOptions {
    pub request_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP-backed fallback fetcher.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    inner: Client,
    options: FetchOptions,
}

impl HttpFetcher {
    /// # Panics
    ///
    /// Panics if the `reqwest::Client` builder fails to build.
    #[must_use]
    pub fn new(options: FetchOptions) -> Self {
        let inner = Client::builder()
            .build()
            .expect("failed to build reqwest client");
        Self { inner, options }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(FetchOptions::default())
    }
}

#[async_trait]
impl FallbackFetch for HttpFetcher {
    async fn fetch_bytes(&self, url: &Url) -> FetchResult<Bytes> {
        let resp = self
            .inner
            .get(url.clone())
            .timeout(self.options.request_timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.bytes().await.map_err(FetchError::from)
    }
}
