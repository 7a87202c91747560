//! # Ref Fetcher
//!
//! Fetches `info/refs?service=git-upload-pack` from a smart HTTP server and
//! parses the advertisement.

use gitcmp_git::{parse_advertisement, RefSet};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};

/// Path and query of the ref discovery endpoint, relative to the repository.
pub const ADVERTISEMENT_PATH: &str = "info/refs?service=git-upload-pack";

/// The only content type a smart upload-pack advertisement may carry.
pub const ADVERTISEMENT_CONTENT_TYPE: &str = "application/x-git-upload-pack-advertisement";

/// Builds the advertisement URL for a repository.
///
/// Trailing slashes on `repo_url` collapse to exactly one before the
/// discovery path is appended.
pub fn advertisement_url(repo_url: &str) -> String {
    format!("{}/{ADVERTISEMENT_PATH}", repo_url.trim_end_matches('/'))
}

/// Fetches ref advertisements from remote repositories.
///
/// Cheap to clone; clones share the underlying connection pool. No retries
/// are made, and timeouts are whatever the HTTP client was configured with.
///
/// # Examples
///
/// ```rust,ignore
/// use gitcmp_remote::RefFetcher;
///
/// let fetcher = RefFetcher::default();
/// let refs = fetcher.fetch("https://github.com/rust-lang/rust.git").await?;
/// println!("{} refs", refs.len());
/// ```
#[derive(Debug, Clone)]
pub struct RefFetcher {
    http: Client,
}

impl RefFetcher {
    /// Creates a fetcher with an HTTP client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the client cannot be built, for
    /// example when no TLS backend is available.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { http })
    }

    /// Creates a fetcher around an existing HTTP client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Fetches and parses the ref advertisement of `repo_url`.
    ///
    /// # Errors
    ///
    /// * [`FetchError::Transport`] - The request or body read failed
    /// * [`FetchError::UnexpectedStatus`] - The status was not `200 OK`
    /// * [`FetchError::UnexpectedContentType`] - Not an upload-pack advertisement
    /// * [`FetchError::Advertisement`] - The body did not parse
    pub async fn fetch(&self, repo_url: &str) -> Result<RefSet> {
        let url = advertisement_url(repo_url);
        tracing::info!(url = %url, "Fetching ref advertisement");

        let res = match self.http.get(&url).send().await {
            Ok(res) => res,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };

        let status = res.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
        if content_type.as_deref() != Some(ADVERTISEMENT_CONTENT_TYPE) {
            return Err(FetchError::UnexpectedContentType { url, content_type });
        }

        let body = match res.bytes().await {
            Ok(body) => body,
            Err(source) => return Err(FetchError::Transport { url, source }),
        };
        tracing::debug!(url = %url, bytes = body.len(), "Received ref advertisement");

        let refs = match parse_advertisement(&body) {
            Ok(refs) => refs,
            Err(source) => return Err(FetchError::Advertisement { url, source }),
        };
        tracing::info!(url = %url, refs = refs.len(), "Fetched refs");
        Ok(refs)
    }
}

impl Default for RefFetcher {
    /// A fetcher using [`FetchConfig::default`].
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    fn default() -> Self {
        Self::new(&FetchConfig::default()).expect("failed to create HTTP client")
    }
}
