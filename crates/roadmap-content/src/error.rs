//! Error types for content resolution
//!
//! Fetch errors are scoped to one key: they are recorded on that cache slot,
//! surfaced to the caller, and never touch other entries.

use crate::types::CacheKey;

/// Errors reported by a content generator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// The request never got an answer
    #[error("transport error: {0}")]
    Transport(String),

    /// The generator answered with an error
    #[error("generator rejected request: {0}")]
    Rejected(String),

    /// The answer could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl GenerateError {
    /// Check if the same request may succeed later
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// A fetch for one cache key failed
///
/// Cloneable: every caller waiting on the same in-flight fetch receives it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Generator returned an error
    #[error("content generation failed for {key}: {source}")]
    Generation {
        /// Key being fetched
        key: CacheKey,
        /// Generator failure
        #[source]
        source: GenerateError,
    },

    /// The fetch task stopped before producing a result
    #[error("content fetch for {key} ended without a result")]
    Abandoned {
        /// Key being fetched
        key: CacheKey,
    },
}

impl FetchError {
    /// Create generation error for key
    pub fn generation(key: CacheKey, source: GenerateError) -> Self {
        Self::Generation { key, source }
    }

    /// Key the fetch was issued for
    #[must_use]
    pub fn key(&self) -> &CacheKey {
        match self {
            Self::Generation { key, .. } | Self::Abandoned { key } => key,
        }
    }
}

/// Errors from the selection flow
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// Fetch for the active selection failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Selected id is not part of the roadmap
    #[error("unknown node: '{0}'")]
    UnknownNode(String),

    /// Operation needs a selected node
    #[error("no node selected")]
    NoSelection,
}

impl ContentError {
    /// Check if re-selecting may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }
}

/// Result type alias for content operations
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    #[test]
    fn fetch_error_names_key() {
        let key = CacheKey::new("rm1", "Intro", Mode::Story);
        let err = FetchError::generation(key.clone(), GenerateError::Transport("timeout".into()));

        assert_eq!(err.key(), &key);
        assert_eq!(
            err.to_string(),
            "content generation failed for rm1/Intro/story: transport error: timeout"
        );
    }

    #[test]
    fn error_conversions() {
        let key = CacheKey::new("rm1", "Intro", Mode::Deep);
        let err: ContentError = FetchError::Abandoned { key }.into();
        assert!(matches!(err, ContentError::Fetch(_)));
        assert!(err.is_retryable());
        assert!(!ContentError::UnknownNode("x".into()).is_retryable());
    }
}
