//! Remote ref fetching for gitcmp.
//!
//! Talks to smart HTTP git servers just far enough to read their ref
//! advertisement: one `GET info/refs?service=git-upload-pack` per repository,
//! with no negotiation or object transfer afterwards.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gitcmp_remote::{FetchConfig, RefFetcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = RefFetcher::new(&FetchConfig::default().with_timeout(10))?;
//!     let diff = fetcher
//!         .compare("https://example.com/a.git", "https://example.com/b.git")
//!         .await?;
//!     println!("identical: {}", diff.is_identical());
//!     Ok(())
//! }
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod fetch;

pub use compare::CompareError;
pub use config::FetchConfig;
pub use error::{FetchError, Result};
pub use fetch::{advertisement_url, RefFetcher, ADVERTISEMENT_CONTENT_TYPE, ADVERTISEMENT_PATH};
