// search-core/src/error.rs
//! 错误类型

use thiserror::Error;

use crate::models::ContentType;

/// Failures while mutating the indexes
#[derive(Debug, Error)]
pub enum IndexError {
    /// The underlying index rejected the write. The writer has been rolled
    /// back, so the call can be retried or left for the next rebuild.
    #[error("index storage error: {0}")]
    Storage(#[from] tantivy::TantivyError),

    #[error("failed to prepare index directory: {0}")]
    Io(#[from] std::io::Error),

    /// The record source could not enumerate records for a rebuild
    #[error("failed to load {content_type} records: {message}")]
    Source {
        content_type: ContentType,
        message: String,
    },

    /// Rebuild stopped on request, previous index content is untouched
    #[error("rebuild cancelled after {indexed} of {total} records")]
    Cancelled { indexed: usize, total: usize },
}

impl IndexError {
    pub(crate) fn source_failure(content_type: ContentType, err: anyhow::Error) -> Self {
        IndexError::Source {
            content_type,
            message: format!("{:#}", err),
        }
    }

    /// Whether repeating the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, IndexError::Storage(_) | IndexError::Io(_))
    }
}

/// Failures while searching. An empty result is not an error.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search is temporarily unavailable: {0}")]
    Unavailable(#[from] tantivy::TantivyError),
}
