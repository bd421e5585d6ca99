//! Tree flattener
//!
//! Turns a nested roadmap forest into a flat node list and a parent → child
//! edge list. Nodes come out in depth-first pre-order, left to right, which the
//! layout engine uses as its initial (and tie-breaking) order within a rank.

use crate::config::FlattenConfig;
use crate::error::{GraphError, GraphResult};
use crate::types::{GraphEdge, NodeSeed, RoadmapNode};
use std::collections::HashSet;

/// Flat form of a roadmap forest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    /// Pre-order traversal
    pub nodes: Vec<NodeSeed>,
    /// One per parent-child pair, in the same order
    pub edges: Vec<GraphEdge>,
}

impl Flattened {
    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Flatten a forest with default configuration
///
/// # Errors
/// See [`flatten_with`].
pub fn flatten(roots: &[RoadmapNode]) -> GraphResult<Flattened> {
    flatten_with(roots, &FlattenConfig::default())
}

/// Flatten a forest
///
/// Traversal uses an explicit stack, so depth is bounded by `max_depth` rather
/// than by the call stack.
///
/// # Errors
/// - `GraphError::DuplicateNode` on the second occurrence of an id
/// - `GraphError::MalformedTree` when nesting exceeds `config.max_depth`
pub fn flatten_with(roots: &[RoadmapNode], config: &FlattenConfig) -> GraphResult<Flattened> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Flattened::default();

    // (node, parent id, depth); roots pushed in reverse so they pop in order
    let mut stack: Vec<(&RoadmapNode, Option<&str>, usize)> =
        roots.iter().rev().map(|root| (root, None, 0)).collect();

    while let Some((node, parent, depth)) = stack.pop() {
        if depth >= config.max_depth {
            return Err(GraphError::too_deep(&node.id, depth, config.max_depth));
        }
        if !seen.insert(node.id.as_str()) {
            return Err(GraphError::duplicate(&node.id));
        }

        out.nodes.push(NodeSeed::from(node));
        if let Some(parent) = parent {
            out.edges.push(GraphEdge::new(parent, &node.id));
        }

        for child in node.children.iter().rev() {
            stack.push((child, Some(node.id.as_str()), depth + 1));
        }
    }

    tracing::debug!(
        nodes = out.nodes.len(),
        edges = out.edges.len(),
        "flattened roadmap"
    );

    Ok(out)
}
