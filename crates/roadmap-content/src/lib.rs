//! Roadmap Content
//!
//! Per-node, per-mode content resolution for a roadmap view.
//!
//! # Architecture
//!
//! ```text
//! SelectionController ──select_node / set_mode──► ContentCoordinator
//!        │                                           │   slots: key → Pending | Ready | Failed
//!        │ drops results for keys                    │   media: node → latest non-empty media
//!        │ no longer selected                        ▼
//!        └──────────────────────────────────── ContentGenerator (remote, slow, fallible)
//! ```
//!
//! Guarantees:
//! - at most one generator call in flight per `(roadmap, node label, mode)`
//! - a ready entry is never fetched again for the life of the coordinator
//! - a failed fetch is retried on the next resolve
//! - media fetched under one mode is offered to the generator for the others

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod coordinator;
pub mod error;
pub mod generator;
pub mod media;
pub mod selection;
pub mod types;

pub use config::ContentConfig;
pub use coordinator::{CacheStats, ContentCoordinator, FetchResult};
pub use error::{ContentError, ContentResult, FetchError, GenerateError};
pub use generator::ContentGenerator;
pub use media::MediaIndex;
pub use selection::{DisplayState, Resolution, SelectedNode, SelectionController};
pub use types::{
    CacheEntry, CacheKey, FetchState, GeneratedContent, GenerationRequest, MediaKey, MediaSet, Mode,
    RoadmapContext, UnknownMode,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
