//! Session-level errors

use roadmap_content::ContentError;
use roadmap_graph::GraphError;
use std::path::PathBuf;

/// Errors surfaced by a roadmap view
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Flattening or layout failed; the roadmap cannot be shown
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Content for the selected node could not be resolved
    #[error("content error: {0}")]
    Content(#[from] ContentError),

    /// Snapshot document does not match the expected shape
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
}

impl ViewError {
    /// Create I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the whole view is unusable, not just one node's content
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Graph(_) | Self::Snapshot(_))
    }

    /// Check if retrying the same call may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Content(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Result type alias for view operations
pub type ViewResult<T> = Result<T, ViewError>;
