//! Content resolution configuration

use crate::types::Mode;
use serde::{Deserialize, Serialize};

/// Configuration for a content session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Mode active before the first explicit switch
    pub default_mode: Mode,
    /// Difficulty sent when the snapshot carries none
    pub default_difficulty: String,
    /// Language sent when the snapshot carries none
    pub default_language: String,
    /// Concurrent fetches during prefetch
    pub prefetch_limit: usize,
}

impl ContentConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With initial mode
    #[inline]
    #[must_use]
    pub fn with_default_mode(mut self, mode: Mode) -> Self {
        self.default_mode = mode;
        self
    }

    /// With fallback difficulty and language
    #[inline]
    #[must_use]
    pub fn with_defaults(mut self, difficulty: impl Into<String>, language: impl Into<String>) -> Self {
        self.default_difficulty = difficulty.into();
        self.default_language = language.into();
        self
    }

    /// With prefetch concurrency
    #[inline]
    #[must_use]
    pub fn with_prefetch_limit(mut self, limit: usize) -> Self {
        self.prefetch_limit = limit.max(1);
        self
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::Story,
            default_difficulty: "Normal".to_string(),
            default_language: "English".to_string(),
            prefetch_limit: 4,
        }
    }
}
