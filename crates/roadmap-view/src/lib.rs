//! Roadmap View
//!
//! Wires the roadmap pipeline into one session:
//!
//! ```text
//! snapshot JSON ─► flatten ─► layout ─► Layout (renderer)
//!                                 │
//!                                 └─► SelectionController ─► ContentCoordinator ─► generator
//! ```
//!
//! A structural error while loading aborts the view. Content errors are scoped
//! to one node and mode.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod session;

pub use config::ViewConfig;
pub use error::{ViewError, ViewResult};
pub use session::{layout_snapshot, RoadmapView};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
