//! Coordinate assignment
//!
//! Nodes of a rank are packed along the cross axis at `node_separation`
//! spacing, centred on a common axis. Ranks are stacked along the rank axis;
//! each rank is as thick as its largest node plus `rank_separation`, and nodes
//! are centred within that band. The result is translated so the drawing
//! starts at the origin.

use super::order::Layers;
use crate::config::{LayoutConfig, RankDirection};

/// Width and height of one node
pub(crate) type Extent = (f64, f64);

/// Top-left corner of every node, indexed like `sizes`
pub(crate) fn place(layers: &Layers, sizes: &[Extent], config: &LayoutConfig) -> Vec<(f64, f64)> {
    let node_sep = config.node_separation.max(0.0);
    let rank_sep = config.rank_separation.max(0.0);

    // (cross extent, rank-axis extent)
    let split = |(w, h): Extent| match config.direction {
        RankDirection::TopToBottom => (w, h),
        RankDirection::LeftToRight => (h, w),
    };

    let mut coords = vec![(0.0, 0.0); sizes.len()];
    let mut rank_offset = 0.0;
    let mut min_cross = f64::INFINITY;

    for layer in layers {
        let thickness = layer
            .iter()
            .map(|&n| split(sizes[n]).1)
            .fold(0.0_f64, f64::max);

        let span: f64 = layer.iter().map(|&n| split(sizes[n]).0).sum::<f64>()
            + node_sep * gaps(layer.len());
        let mut cursor = -span / 2.0;

        for &node in layer {
            let (cross_extent, rank_extent) = split(sizes[node]);
            coords[node] = (cursor, rank_offset + (thickness - rank_extent) / 2.0);
            min_cross = min_cross.min(cursor);
            cursor += cross_extent + node_sep;
        }

        rank_offset += thickness + rank_sep;
    }

    if min_cross.is_finite() {
        for coord in &mut coords {
            coord.0 -= min_cross;
        }
    }

    match config.direction {
        RankDirection::TopToBottom => coords,
        RankDirection::LeftToRight => coords.into_iter().map(|(c, r)| (r, c)).collect(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn gaps(count: usize) -> f64 {
    count.saturating_sub(1) as f64
}
