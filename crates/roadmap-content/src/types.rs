//! Content cache data model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presentation mode of generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Narrative
    #[default]
    Story,
    /// Technical deep dive
    Deep,
    /// Exam preparation
    Exam,
}

impl Mode {
    /// Every mode, in display order
    pub const ALL: [Mode; 3] = [Mode::Story, Mode::Deep, Mode::Exam];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Deep => "deep",
            Self::Exam => "exam",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised mode name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown presentation mode: '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "story" => Ok(Self::Story),
            "deep" => Ok(Self::Deep),
            "exam" => Ok(Self::Exam),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Identity of one cached piece of content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    /// Owning roadmap
    pub roadmap_id: String,
    /// Node label, not id
    pub node_label: String,
    /// Presentation mode
    pub mode: Mode,
}

impl CacheKey {
    /// Create key
    #[must_use]
    pub fn new(roadmap_id: impl Into<String>, node_label: impl Into<String>, mode: Mode) -> Self {
        Self {
            roadmap_id: roadmap_id.into(),
            node_label: node_label.into(),
            mode,
        }
    }

    /// Same node, any mode
    #[must_use]
    pub fn media_key(&self) -> MediaKey {
        MediaKey {
            roadmap_id: self.roadmap_id.clone(),
            node_label: self.node_label.clone(),
        }
    }

    /// Same node, another mode
    #[must_use]
    pub fn with_mode(&self, mode: Mode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.roadmap_id, self.node_label, self.mode)
    }
}

/// Mode-independent key of the media index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey {
    /// Owning roadmap
    pub roadmap_id: String,
    /// Node label
    pub node_label: String,
}

/// Image and video URLs attached to a node
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaSet {
    /// Image URLs
    pub images: Vec<String>,
    /// Video URLs
    pub videos: Vec<String>,
}

impl MediaSet {
    /// True when there is neither an image nor a video
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }
}

/// Lifecycle of a cache slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchState {
    /// A fetch is in flight
    Pending,
    /// Content is available
    Ready,
    /// The last fetch failed; the next resolve retries
    Failed,
}

/// Generated content for one node in one mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Rendered text
    pub content: String,
    /// Image URLs
    pub images: Vec<String>,
    /// Video URLs
    pub videos: Vec<String>,
}

impl CacheEntry {
    /// Media carried by the entry
    #[must_use]
    pub fn media(&self) -> MediaSet {
        MediaSet {
            images: self.images.clone(),
            videos: self.videos.clone(),
        }
    }
}

impl From<GeneratedContent> for CacheEntry {
    fn from(generated: GeneratedContent) -> Self {
        Self {
            content: generated.content,
            images: generated.images,
            videos: generated.videos,
        }
    }
}

/// The roadmap a request is made on behalf of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapContext {
    /// Roadmap identifier
    pub roadmap_id: String,
    /// Subject of the roadmap
    pub topic: String,
    /// Difficulty passed to the generator
    pub difficulty: String,
    /// Content language
    pub language: String,
}

impl RoadmapContext {
    /// Create context
    #[must_use]
    pub fn new(
        roadmap_id: impl Into<String>,
        topic: impl Into<String>,
        difficulty: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            roadmap_id: roadmap_id.into(),
            topic: topic.into(),
            difficulty: difficulty.into(),
            language: language.into(),
        }
    }

    /// Key for a node of this roadmap
    #[must_use]
    pub fn key(&self, node_label: impl Into<String>, mode: Mode) -> CacheKey {
        CacheKey::new(self.roadmap_id.clone(), node_label, mode)
    }
}

/// Request sent to the content generator
///
/// Serializes to the body of the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Roadmap subject
    pub topic: String,
    /// Node being explained
    #[serde(rename = "subtopic")]
    pub node_label: String,
    /// Requested mode
    pub mode: Mode,
    /// Roadmap difficulty
    pub difficulty: String,
    /// Content language
    pub language: String,
    /// Media already fetched for this node under another mode
    #[serde(rename = "images")]
    pub images_hint: Option<Vec<String>>,
    /// Companion of `images_hint`
    #[serde(rename = "videos")]
    pub videos_hint: Option<Vec<String>>,
    /// Owning roadmap
    pub roadmap_id: String,
}

impl GenerationRequest {
    /// Build a request with no media hint
    #[must_use]
    pub fn new(context: &RoadmapContext, node_label: impl Into<String>, mode: Mode) -> Self {
        Self {
            topic: context.topic.clone(),
            node_label: node_label.into(),
            mode,
            difficulty: context.difficulty.clone(),
            language: context.language.clone(),
            images_hint: None,
            videos_hint: None,
            roadmap_id: context.roadmap_id.clone(),
        }
    }

    /// Attach a media hint
    #[must_use]
    pub fn with_media_hint(mut self, media: MediaSet) -> Self {
        self.images_hint = Some(media.images);
        self.videos_hint = Some(media.videos);
        self
    }

    /// True when media from another mode is attached
    #[must_use]
    pub fn has_media_hint(&self) -> bool {
        self.images_hint.is_some() || self.videos_hint.is_some()
    }
}

/// Generator response
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedContent {
    /// Rendered text
    pub content: String,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Video URLs
    #[serde(default)]
    pub videos: Vec<String>,
}

impl GeneratedContent {
    /// Text-only content
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Replace image URLs
    #[must_use]
    pub fn with_images(mut self, images: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    /// Replace video URLs
    #[must_use]
    pub fn with_videos(mut self, videos: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.videos = videos.into_iter().map(Into::into).collect();
        self
    }
}
