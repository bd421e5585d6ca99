//! Content generation collaborator
//!
//! The coordinator treats generation as an opaque, possibly slow, possibly
//! failing remote call. Transport details live behind this trait.

use crate::error::GenerateError;
use crate::types::{GeneratedContent, GenerationRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Produces content for one node in one mode
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate content
    ///
    /// A media hint in the request is media already fetched for the same node
    /// under another mode; the generator may return it instead of fetching
    /// new media.
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, GenerateError>;
}

#[async_trait]
impl<T: ContentGenerator + ?Sized> ContentGenerator for Arc<T> {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, GenerateError> {
        (**self).generate(request).await
    }
}
