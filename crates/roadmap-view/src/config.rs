//! View configuration
//!
//! Every field is optional in the TOML file:
//!
//! ```toml
//! [layout]
//! node_separation = 60.0
//! direction = "lr"
//!
//! [flatten]
//! max_depth = 200
//!
//! [content]
//! default_mode = "deep"
//! ```

use crate::error::{ViewError, ViewResult};
use roadmap_content::ContentConfig;
use roadmap_graph::{FlattenConfig, LayoutConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of a roadmap view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// `[layout]` table
    pub layout: LayoutConfig,
    /// `[flatten]` table
    pub flatten: FlattenConfig,
    /// `[content]` table
    pub content: ContentConfig,
}

impl ViewConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML
    ///
    /// # Errors
    /// `ViewError::Config` if the document is not valid TOML or a field has the
    /// wrong type.
    pub fn from_toml_str(source: &str) -> ViewResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `ViewError::Io` if the file cannot be read, `ViewError::Config` if it
    /// cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> ViewResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ViewError::io(path, e))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded view configuration");
        Ok(config)
    }

    /// With layout configuration
    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// With flatten configuration
    #[inline]
    #[must_use]
    pub fn with_flatten(mut self, flatten: FlattenConfig) -> Self {
        self.flatten = flatten;
        self
    }

    /// With content configuration
    #[inline]
    #[must_use]
    pub fn with_content(mut self, content: ContentConfig) -> Self {
        self.content = content;
        self
    }
}
