//! Error types for roadmap flattening and layout
//!
//! Every variant here is structural: it aborts the whole roadmap load and no
//! partial layout is produced.

/// Structural errors raised while flattening or laying out a roadmap
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The same node id appears more than once
    #[error("duplicate node id: '{id}'")]
    DuplicateNode {
        /// Repeated id
        id: String,
    },

    /// Nesting is deeper than the configured limit
    #[error("malformed tree: node '{id}' at depth {depth} exceeds the depth limit of {limit}")]
    MalformedTree {
        /// First node past the limit
        id: String,
        /// Its depth, roots at one
        depth: usize,
        /// Configured `max_depth`
        limit: usize,
    },

    /// The graph has no topological order
    #[error("cyclic graph: node '{node}' lies on a cycle")]
    CyclicGraph {
        /// A node on the cycle
        node: String,
    },

    /// An edge endpoint is not part of the node set
    #[error("edge references unknown node: '{id}'")]
    UnknownNode {
        /// Missing endpoint
        id: String,
    },
}

impl GraphError {
    /// Create duplicate node error
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateNode { id: id.into() }
    }

    /// Create depth limit error
    pub fn too_deep(id: impl Into<String>, depth: usize, limit: usize) -> Self {
        Self::MalformedTree {
            id: id.into(),
            depth,
            limit,
        }
    }

    /// Create cycle error naming a node on the cycle
    pub fn cyclic(node: impl Into<String>) -> Self {
        Self::CyclicGraph { node: node.into() }
    }

    /// Node id the error is about
    #[must_use]
    pub fn node_id(&self) -> &str {
        match self {
            Self::DuplicateNode { id } | Self::MalformedTree { id, .. } | Self::UnknownNode { id } => id,
            Self::CyclicGraph { node } => node,
        }
    }
}

/// Result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
