//! Order within rank
//!
//! Median heuristic with alternating sweeps. Each rank starts in
//! first-appearance order; a down sweep reorders a rank by the median position
//! of each node's parents, an up sweep by its children. Nodes with no
//! neighbour on the swept side keep their slot. Ties keep the previous order.
//! The ordering with the fewest crossings seen is returned.

use super::rank::IndexedGraph;
use petgraph::Direction;

/// Nodes of every rank, left to right
pub(crate) type Layers = Vec<Vec<usize>>;

/// Compute the final order of every rank
pub(crate) fn order_ranks(graph: &IndexedGraph, ranks: &[usize], passes: usize) -> Layers {
    let rank_count = ranks.iter().max().map_or(0, |r| r + 1);

    let mut layers: Layers = vec![Vec::new(); rank_count];
    for (node, &rank) in ranks.iter().enumerate() {
        layers[rank].push(node);
    }

    let parents: Vec<Vec<usize>> = (0..graph.len())
        .map(|n| graph.neighbours(n, Direction::Incoming))
        .collect();
    let children: Vec<Vec<usize>> = (0..graph.len())
        .map(|n| graph.neighbours(n, Direction::Outgoing))
        .collect();

    let mut position = positions(&layers, graph.len());
    let mut best = layers.clone();
    let mut best_crossings = count_crossings(&layers, ranks, &children, &position);
    let mut idle_passes = 0;

    for pass in 0..passes {
        if best_crossings == 0 || idle_passes >= 2 {
            break;
        }

        let changed = if pass % 2 == 0 {
            (1..rank_count).fold(false, |acc, r| {
                sweep(&mut layers[r], &parents, &mut position) | acc
            })
        } else {
            (0..rank_count.saturating_sub(1)).rev().fold(false, |acc, r| {
                sweep(&mut layers[r], &children, &mut position) | acc
            })
        };

        idle_passes = if changed { 0 } else { idle_passes + 1 };

        let crossings = count_crossings(&layers, ranks, &children, &position);
        if crossings < best_crossings {
            best_crossings = crossings;
            best.clone_from(&layers);
        }
    }

    tracing::trace!(crossings = best_crossings, "ordering settled");
    best
}

/// Position of every node within its rank
pub(crate) fn positions(layers: &Layers, node_count: usize) -> Vec<usize> {
    let mut position = vec![0; node_count];
    for layer in layers {
        for (i, &node) in layer.iter().enumerate() {
            position[node] = i;
        }
    }
    position
}

/// Reorder one rank; returns whether anything moved
fn sweep(layer: &mut [usize], neighbours: &[Vec<usize>], position: &mut [usize]) -> bool {
    let mut movable: Vec<(f64, usize, usize)> = Vec::with_capacity(layer.len());
    let mut slots: Vec<usize> = Vec::with_capacity(layer.len());

    for (slot, &node) in layer.iter().enumerate() {
        if let Some(key) = median(neighbours[node].iter().map(|&m| position[m])) {
            movable.push((key, position[node], node));
            slots.push(slot);
        }
    }

    movable.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut changed = false;
    for (slot, (_, _, node)) in slots.into_iter().zip(movable) {
        if layer[slot] != node {
            layer[slot] = node;
            changed = true;
        }
    }

    for (i, &node) in layer.iter().enumerate() {
        position[node] = i;
    }
    changed
}

/// Median of positions; even counts average the two middle values
#[allow(clippy::cast_precision_loss)]
fn median(values: impl Iterator<Item = usize>) -> Option<f64> {
    let mut values: Vec<usize> = values.collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid] as f64)
    } else {
        Some((values[mid - 1] + values[mid]) as f64 / 2.0)
    }
}

/// Crossings between consecutive ranks
///
/// Only edges spanning exactly one rank are counted.
pub(crate) fn count_crossings(
    layers: &Layers,
    ranks: &[usize],
    children: &[Vec<usize>],
    position: &[usize],
) -> usize {
    let mut total = 0;

    for layer in layers {
        let mut segments: Vec<(usize, usize)> = Vec::new();
        for &u in layer {
            for &v in &children[u] {
                if ranks[v] == ranks[u] + 1 {
                    segments.push((position[u], position[v]));
                }
            }
        }

        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                if (a.0 < b.0 && a.1 > b.1) || (a.0 > b.0 && a.1 < b.1) {
                    total += 1;
                }
            }
        }
    }

    total
}
