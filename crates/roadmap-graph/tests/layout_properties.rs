//! Property tests for the layered layout
//!
//! Run with: cargo test -p roadmap-graph --test layout_properties

use proptest::prelude::*;
use roadmap_graph::{
    flatten, GraphEdge, GraphError, Layout, LayoutConfig, LayoutEngine, NodeSeed, NodeSize,
    RankDirection, RoadmapNode,
};

/// Random forest: node `i` hangs under `raw % (i + 1)`, or is a root when
/// that lands on itself.
fn forest_edges(raw: &[usize]) -> (Vec<NodeSeed>, Vec<GraphEdge>) {
    let nodes: Vec<NodeSeed> = (0..raw.len()).map(|i| NodeSeed::new(format!("n{i}"))).collect();
    let edges = raw
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let parent = r % (i + 1);
            (parent != i).then(|| GraphEdge::new(format!("n{parent}"), format!("n{i}")))
        })
        .collect();
    (nodes, edges)
}

/// Random DAG: every edge points from a lower to a higher index
fn dag_edges(count: usize, pairs: &[(usize, usize)]) -> Vec<GraphEdge> {
    let mut edges: Vec<GraphEdge> = pairs
        .iter()
        .filter_map(|&(a, b)| {
            let (a, b) = (a % count, b % count);
            (a != b).then(|| GraphEdge::new(format!("n{}", a.min(b)), format!("n{}", a.max(b))))
        })
        .collect();
    edges.sort_by(|x, y| x.id.cmp(&y.id));
    edges.dedup();
    edges
}

fn assert_ranks_increase(layout: &Layout) {
    for edge in &layout.edges {
        let source = layout.rank_of(&edge.source).unwrap();
        let target = layout.rank_of(&edge.target).unwrap();
        assert!(target > source, "edge {} is flat or reversed", edge.id);
    }
}

fn assert_no_overlap(layout: &Layout) {
    for (i, a) in layout.nodes.iter().enumerate() {
        for b in &layout.nodes[i + 1..] {
            assert!(
                !a.bounds().intersects(&b.bounds()),
                "{} overlaps {}",
                a.id,
                b.id
            );
        }
    }
}

fn assert_orders_are_permutations(layout: &Layout) {
    for rank in 0..layout.rank_count {
        let orders: Vec<usize> = layout.rank(rank).iter().map(|n| n.order).collect();
        let expected: Vec<usize> = (0..orders.len()).collect();
        assert_eq!(orders, expected);
    }
}

fn fingerprint(layout: &Layout) -> Vec<(usize, usize, u64, u64)> {
    layout
        .nodes
        .iter()
        .map(|n| (n.rank, n.order, n.x.to_bits(), n.y.to_bits()))
        .collect()
}

proptest! {
    #[test]
    fn prop_forest_layout_invariants(raw in proptest::collection::vec(0..1000usize, 1..60)) {
        let (nodes, edges) = forest_edges(&raw);
        let engine = LayoutEngine::default();

        let layout = engine.layout(&nodes, &edges).unwrap();
        assert_ranks_increase(&layout);
        assert_no_overlap(&layout);
        assert_orders_are_permutations(&layout);

        let again = engine.layout(&nodes, &edges).unwrap();
        prop_assert_eq!(fingerprint(&layout), fingerprint(&again));
    }

    #[test]
    fn prop_dag_layout_invariants(
        count in 2..30usize,
        pairs in proptest::collection::vec((0..30usize, 0..30usize), 0..80),
        lr in any::<bool>(),
    ) {
        let nodes: Vec<NodeSeed> = (0..count).map(|i| NodeSeed::new(format!("n{i}"))).collect();
        let edges = dag_edges(count, &pairs);
        let direction = if lr { RankDirection::LeftToRight } else { RankDirection::TopToBottom };
        let engine = LayoutEngine::new(LayoutConfig::default().with_direction(direction));

        let layout = engine.layout(&nodes, &edges).unwrap();
        assert_ranks_increase(&layout);
        assert_no_overlap(&layout);
        assert_orders_are_permutations(&layout);

        let again = engine.layout(&nodes, &edges).unwrap();
        prop_assert_eq!(fingerprint(&layout), fingerprint(&again));
    }

    #[test]
    fn prop_size_overrides_never_overlap(
        raw in proptest::collection::vec(0..1000usize, 1..30),
        sizes in proptest::collection::vec((1.0..400.0f64, 1.0..200.0f64), 30),
    ) {
        let (nodes, edges) = forest_edges(&raw);
        let nodes: Vec<NodeSeed> = nodes
            .into_iter()
            .zip(&sizes)
            .map(|(seed, &(w, h))| seed.with_size(NodeSize::new(w, h)))
            .collect();

        let layout = LayoutEngine::default().layout(&nodes, &edges).unwrap();
        assert_no_overlap(&layout);
    }

    #[test]
    fn prop_back_edge_is_rejected(count in 2..20usize) {
        let nodes: Vec<NodeSeed> = (0..count).map(|i| NodeSeed::new(format!("n{i}"))).collect();
        let mut edges: Vec<GraphEdge> = (1..count)
            .map(|i| GraphEdge::new(format!("n{}", i - 1), format!("n{i}")))
            .collect();
        edges.push(GraphEdge::new(format!("n{}", count - 1), "n0"));

        let result = LayoutEngine::default().layout(&nodes, &edges);
        let rejected = matches!(result, Err(GraphError::CyclicGraph { .. }));
        prop_assert!(rejected, "cycle of {} nodes was not rejected: {:?}", count, result);
    }
}

#[test]
fn seven_node_tree_scenario() {
    let roots = vec![RoadmapNode::new("root", "Root")
        .with_child(
            RoadmapNode::new("a", "A")
                .with_children([RoadmapNode::new("a1", "A1"), RoadmapNode::new("a2", "A2")]),
        )
        .with_child(
            RoadmapNode::new("b", "B")
                .with_children([RoadmapNode::new("b1", "B1"), RoadmapNode::new("b2", "B2")]),
        )];

    let flat = flatten(&roots).unwrap();
    let layout = LayoutEngine::default().layout_flattened(&flat).unwrap();

    assert_eq!(layout.node_count(), 7);
    assert_eq!(layout.edges.len(), 6);
    assert_eq!(layout.rank_count, 3);
    assert_eq!(layout.rank(0).len(), 1);
    assert_eq!(layout.rank(1).len(), 2);
    assert_eq!(layout.rank(2).len(), 4);

    // grandchildren: 4 * 180 + 3 * 100 wide, starting at the origin
    let last = layout.node("b2").unwrap();
    assert_eq!(last.x, 840.0);
    assert_eq!(last.y, 340.0);
    assert_eq!(layout.bounds.width, 1020.0);
    assert_eq!(layout.bounds.height, 410.0);

    // root centred over the widest rank
    let root = layout.node("root").unwrap();
    assert_eq!(root.x + root.width / 2.0, layout.bounds.width / 2.0);
}

#[test]
fn multiple_roots_share_rank_zero() {
    let roots = vec![
        RoadmapNode::new("1", "One").with_child(RoadmapNode::new("1.1", "Sub")),
        RoadmapNode::new("2", "Two"),
    ];

    let layout = LayoutEngine::default()
        .layout_flattened(&flatten(&roots).unwrap())
        .unwrap();

    let top: Vec<&str> = layout.rank(0).into_iter().map(|n| n.id.as_str()).collect();
    assert_eq!(top, vec!["1", "2"]);
    assert_eq!(layout.rank_of("1.1"), Some(1));
}
