//! Error types for fetching remote refs.

use gitcmp_git::AdvertisementError;
use thiserror::Error;

/// Errors that can occur while fetching a ref advertisement.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, DNS, TLS, timeout or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// The advertisement URL.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than `200 OK`.
    #[error("bad response status {status} from {url}")]
    UnexpectedStatus {
        /// The advertisement URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The server did not answer with an upload-pack advertisement.
    #[error("bad response Content-Type {content_type:?} from {url}")]
    UnexpectedContentType {
        /// The advertisement URL.
        url: String,
        /// The observed header, if any.
        content_type: Option<String>,
    },

    /// The body could not be parsed as a ref advertisement.
    #[error("bad ref advertisement from {url}: {source}")]
    Advertisement {
        /// The advertisement URL.
        url: String,
        /// The parse failure.
        #[source]
        source: AdvertisementError,
    },
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
