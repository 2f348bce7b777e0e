//! Deterministic grid placement and the overlap counter used to check it.

use crate::config::{CardSize, GridOptions};
use crate::geometry::{aabb_overlap, Position3D, Rect};
use crate::CardId;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Card id -> position. Ordered so output is reproducible.
pub type PositionMap = BTreeMap<CardId, Position3D>;

/// Boards at least this large are checked on the rayon pool.
pub const PARALLEL_OVERLAP_THRESHOLD: usize = 512;

/// Columns for `n` cards: `ceil(sqrt(n))`, at least one.
pub fn grid_columns(n: usize) -> usize {
    ((n as f64).sqrt().ceil() as usize).max(1)
}

/// Places cards row-major on a square-ish grid, in input order.
///
/// Card `i` lands at column `i % cols`, row `i / cols`. Same ids in the
/// same order with the same options always give the same map. A repeated
/// id keeps the slot of its last occurrence.
pub fn arrange_grid<S: AsRef<str>>(card_ids: &[S], opts: &GridOptions) -> PositionMap {
    let cols = grid_columns(card_ids.len());
    card_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let col = (i % cols) as f64;
            let row = (i / cols) as f64;
            let pos = Position3D::new(
                opts.offset_x + col * opts.gap_x,
                opts.offset_y + row * opts.gap_y,
                0.0,
            );
            (id.as_ref().to_string(), pos)
        })
        .collect()
}

/// Counts pairs of cards whose `size` boxes intersect. Touching edges
/// are not an overlap.
pub fn count_overlap_pairs(positions: &PositionMap, size: &CardSize) -> usize {
    let rects: Vec<Rect> = positions
        .values()
        .map(|p| Rect::new(p.x, p.y, size.card_w, size.card_h))
        .collect();

    let overlaps_after = |i: usize| {
        let a = &rects[i];
        rects[i + 1..]
            .iter()
            .filter(|b| aabb_overlap(a, b, 0.0))
            .count()
    };

    if rects.len() >= PARALLEL_OVERLAP_THRESHOLD {
        (0..rects.len()).into_par_iter().map(overlaps_after).sum()
    } else {
        (0..rects.len()).map(overlaps_after).sum()
    }
}
