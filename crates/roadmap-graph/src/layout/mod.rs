//! Layered graph layout
//!
//! Three phases over a DAG of [`NodeSeed`]s and [`GraphEdge`]s:
//!
//! 1. **Rank**: longest path from the roots
//! 2. **Order**: median sweeps to reduce crossings
//! 3. **Position**: uniform spacing, centred ranks
//!
//! The whole layout is recomputed on every call; identical input always
//! produces bit-identical output.

mod order;
mod position;
mod rank;

use crate::config::{LayoutConfig, RankDirection};
use crate::error::GraphResult;
use crate::flatten::Flattened;
use crate::types::{Anchor, Bounds, EdgeRoute, EdgeStyle, GraphEdge, GraphNode, NodeSeed};
use rank::IndexedGraph;
use serde::{Deserialize, Serialize};

/// Positioned graph handed to a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// In input order
    pub nodes: Vec<GraphNode>,
    /// In input order, with routing hints
    pub edges: Vec<GraphEdge>,
    /// Number of layers
    pub rank_count: usize,
    /// Box enclosing every node
    pub bounds: Bounds,
}

impl Layout {
    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Rank of a node
    #[must_use]
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.node(id).map(|n| n.rank)
    }

    /// Nodes of one rank, in order
    #[must_use]
    pub fn rank(&self, rank: usize) -> Vec<&GraphNode> {
        let mut nodes: Vec<&GraphNode> = self.nodes.iter().filter(|n| n.rank == rank).collect();
        nodes.sort_by_key(|n| n.order);
        nodes
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Layered layout engine
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create engine with configuration
    #[inline]
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out the output of the tree flattener
    ///
    /// # Errors
    /// See [`LayoutEngine::layout`].
    pub fn layout_flattened(&self, flat: &Flattened) -> GraphResult<Layout> {
        self.layout(&flat.nodes, &flat.edges)
    }

    /// Lay out a DAG
    ///
    /// Node order in `nodes` is the initial order within each rank and the
    /// final tie-break.
    ///
    /// # Errors
    /// - `GraphError::DuplicateNode` if two seeds share an id
    /// - `GraphError::UnknownNode` if an edge endpoint is not a seed
    /// - `GraphError::CyclicGraph` if the edges contain a cycle
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
    pub fn layout(&self, nodes: &[NodeSeed], edges: &[GraphEdge]) -> GraphResult<Layout> {
        let graph = IndexedGraph::build(nodes, edges)?;
        let ranks = rank::assign_ranks(&graph, nodes)?;
        let layers = order::order_ranks(&graph, &ranks, self.config.ordering_passes);
        let orders = order::positions(&layers, nodes.len());

        let sizes: Vec<position::Extent> = nodes
            .iter()
            .map(|n| match n.size {
                Some(size) => (size.width.max(0.0), size.height.max(0.0)),
                None => (self.config.node_width, self.config.node_height),
            })
            .collect();
        let coords = position::place(&layers, &sizes, &self.config);

        let positioned: Vec<GraphNode> = nodes
            .iter()
            .enumerate()
            .map(|(i, seed)| GraphNode {
                id: seed.id.clone(),
                label: seed.label.clone(),
                status: seed.status,
                mastery_score: seed.mastery_score,
                rank: ranks[i],
                order: orders[i],
                x: coords[i].0,
                y: coords[i].1,
                width: sizes[i].0,
                height: sizes[i].1,
            })
            .collect();

        let route = self.route();
        let routed: Vec<GraphEdge> = edges
            .iter()
            .map(|edge| GraphEdge {
                route: Some(route),
                ..edge.clone()
            })
            .collect();

        let bounds = positioned
            .iter()
            .map(GraphNode::bounds)
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();

        tracing::info!(
            nodes = positioned.len(),
            ranks = layers.len(),
            width = bounds.width,
            height = bounds.height,
            "layout complete"
        );

        Ok(Layout {
            nodes: positioned,
            edges: routed,
            rank_count: layers.len(),
            bounds,
        })
    }

    fn route(&self) -> EdgeRoute {
        let (source_anchor, target_anchor) = match self.config.direction {
            RankDirection::TopToBottom => (Anchor::Bottom, Anchor::Top),
            RankDirection::LeftToRight => (Anchor::Right, Anchor::Left),
        };
        EdgeRoute {
            style: EdgeStyle::SmoothStep,
            source_anchor,
            target_anchor,
        }
    }
}
