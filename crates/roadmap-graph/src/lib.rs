//! Roadmap Graph
//!
//! Converts a learning roadmap (a forest of topics with mastery metadata) into
//! a positioned directed graph.
//!
//! # Architecture
//!
//! ```text
//! RoadmapSnapshot → flatten → (NodeSeed[], GraphEdge[]) → LayoutEngine → Layout
//! ```
//!
//! Both stages are pure: the same input always yields the same output, and a
//! structural error aborts the stage with no partial result.
//!
//! # Example
//!
//! ```rust
//! use roadmap_graph::{flatten, LayoutEngine, RoadmapNode};
//!
//! let roots = vec![RoadmapNode::new("1", "Basics")
//!     .with_child(RoadmapNode::new("1.1", "Ownership"))];
//!
//! let flat = flatten(&roots)?;
//! let layout = LayoutEngine::default().layout_flattened(&flat)?;
//! assert_eq!(layout.rank_count, 2);
//! # Ok::<(), roadmap_graph::GraphError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod error;
pub mod flatten;
pub mod layout;
pub mod types;

// Re-exports for convenience
pub use config::{FlattenConfig, LayoutConfig, RankDirection, UnknownDirection};
pub use error::{GraphError, GraphResult};
pub use flatten::{flatten, flatten_with, Flattened};
pub use layout::{Layout, LayoutEngine};
pub use types::{
    Anchor, Bounds, EdgeRoute, EdgeStyle, GraphEdge, GraphNode, NodeSeed, NodeSize, NodeStatus,
    RoadmapNode, RoadmapSnapshot, DEFAULT_DIFFICULTY, DEFAULT_LANGUAGE,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
