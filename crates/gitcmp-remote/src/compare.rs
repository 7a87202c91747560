//! Comparing two remote repositories.

use gitcmp_git::{RefDiff, RefSet};

use crate::error::FetchError;
use crate::fetch::RefFetcher;

/// A fetch failure together with the repository URL as the caller gave it.
#[derive(Debug, thiserror::Error)]
#[error("fetching {repo}: {source}")]
pub struct CompareError {
    /// The repository URL, unmodified.
    pub repo: String,
    /// What went wrong.
    #[source]
    pub source: FetchError,
}

impl RefFetcher {
    /// Fetches both repositories concurrently, waiting for both to finish.
    ///
    /// A failing fetch does not cancel the other one.
    pub async fn fetch_pair(
        &self,
        left: &str,
        right: &str,
    ) -> (Result<RefSet, CompareError>, Result<RefSet, CompareError>) {
        let (left_refs, right_refs) = tokio::join!(self.fetch(left), self.fetch(right));
        let tag = |repo: &str, source: FetchError| CompareError {
            repo: repo.to_string(),
            source,
        };
        (
            left_refs.map_err(|e| tag(left, e)),
            right_refs.map_err(|e| tag(right, e)),
        )
    }

    /// Fetches both repositories and diffs their refs.
    ///
    /// # Errors
    ///
    /// Returns the left repository's failure if it failed, otherwise the
    /// right one's. Both fetches always run to completion first.
    pub async fn compare(&self, left: &str, right: &str) -> Result<RefDiff, CompareError> {
        let (left_refs, right_refs) = self.fetch_pair(left, right).await;
        let (left_refs, right_refs) = match (left_refs, right_refs) {
            (Ok(l), Ok(r)) => (l, r),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => return Err(e),
            (Err(e), Err(other)) => {
                tracing::warn!(error = %other, "Both fetches failed");
                return Err(e);
            }
        };

        Ok(RefDiff::compute(&left_refs, &right_refs))
    }
}
