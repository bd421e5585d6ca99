//! Rank assignment
//!
//! Longest path from the roots: a node sits one rank below its deepest
//! parent. Ranks are relaxed in topological order; a cycle has no such order
//! and is reported instead.

use crate::error::{GraphError, GraphResult};
use crate::types::{GraphEdge, NodeSeed};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::algo::toposort;
use petgraph::Direction;
use std::collections::HashMap;

/// Input graph indexed by position in the node slice
#[derive(Debug)]
pub(crate) struct IndexedGraph {
    pub(crate) graph: DiGraph<(), ()>,
}

impl IndexedGraph {
    /// Build from seeds and edges, rejecting duplicate ids and dangling edges
    pub(crate) fn build(nodes: &[NodeSeed], edges: &[GraphEdge]) -> GraphResult<Self> {
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(nodes.len());
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());

        for node in nodes {
            let idx = graph.add_node(());
            if index.insert(node.id.as_str(), idx).is_some() {
                return Err(GraphError::duplicate(&node.id));
            }
        }

        let lookup = |id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| GraphError::UnknownNode { id: id.to_string() })
        };

        for edge in edges {
            let source = lookup(&edge.source)?;
            let target = lookup(&edge.target)?;
            graph.add_edge(source, target, ());
        }

        Ok(Self { graph })
    }

    /// Node count
    pub(crate) fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Neighbour indices in one direction, sorted for determinism
    pub(crate) fn neighbours(&self, node: usize, direction: Direction) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(node), direction)
            .map(NodeIndex::index)
            .collect();
        out.sort_unstable();
        out
    }
}

/// Assign a rank to every node
///
/// `toposort` walks with an explicit stack, so long chains cost heap, not
/// call stack.
///
/// # Errors
/// `GraphError::CyclicGraph` naming a node on the cycle.
pub(crate) fn assign_ranks(graph: &IndexedGraph, nodes: &[NodeSeed]) -> GraphResult<Vec<usize>> {
    let order = toposort(&graph.graph, None)
        .map_err(|cycle| GraphError::cyclic(&nodes[cycle.node_id().index()].id))?;

    let mut ranks = vec![0usize; graph.len()];
    for node in order {
        let next = ranks[node.index()] + 1;
        for child in graph.graph.neighbors_directed(node, Direction::Outgoing) {
            let slot = &mut ranks[child.index()];
            *slot = (*slot).max(next);
        }
    }

    Ok(ranks)
}
