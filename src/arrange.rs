//! Variable-size auto arrange backed by a spatial hash.
//!
//! Cards flow left to right in sorted-id order inside the viewport width,
//! wrapping by the tallest card of the row. A candidate slot that collides
//! with an already placed card is nudged right (wrapping downwards) up to
//! [`MAX_NUDGES`] times before falling back to a strict grid cell.

use crate::config::{CardSize, ViewportParams};
use crate::geometry::{aabb_overlap, epsilon_for_dpr, Position3D, Rect};
use crate::layout::{grid_columns, PositionMap};
use crate::CardId;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub const GAP: f64 = 40.0;
pub const CARD_DEFAULT_W: f64 = 240.0;
pub const CARD_DEFAULT_H: f64 = 280.0;
pub const MAX_NUDGES: usize = 50;

/// Zero-size cards reported individually before going quiet.
const ZERO_SIZE_WARN_LIMIT: usize = 5;

/// Card id -> measured size.
pub type SizeMap = BTreeMap<CardId, CardSize>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoArrangeResult {
    pub positions: PositionMap,
    pub zero_size_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RectOverlapReport {
    pub overlap_pairs: usize,
    pub zero_size_count: usize,
}

struct SpatialHash {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
    rects: Vec<Rect>,
}

impl SpatialHash {
    fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            rects: Vec::new(),
        }
    }

    fn cell_range(&self, rect: &Rect) -> (i64, i64, i64, i64) {
        let c = self.cell_size;
        (
            (rect.x / c).floor() as i64,
            (rect.y / c).floor() as i64,
            ((rect.x + rect.w) / c).floor() as i64,
            ((rect.y + rect.h) / c).floor() as i64,
        )
    }

    fn insert(&mut self, rect: Rect) {
        let idx = self.rects.len();
        let (min_cx, min_cy, max_cx, max_cy) = self.cell_range(&rect);
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                self.cells.entry((cx, cy)).or_default().push(idx);
            }
        }
        self.rects.push(rect);
    }

    fn collides(&self, rect: &Rect, epsilon: f64) -> bool {
        let (min_cx, min_cy, max_cx, max_cy) = self.cell_range(rect);
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    if bucket
                        .iter()
                        .any(|&i| aabb_overlap(rect, &self.rects[i], epsilon))
                    {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Deterministic non-overlapping placement for cards of varying size.
pub fn auto_arrange(sizes: &SizeMap, viewport: &ViewportParams) -> AutoArrangeResult {
    let epsilon = epsilon_for_dpr(viewport.dpr);

    let mut zero_size_count = 0;
    let mut valid: Vec<(&CardId, &CardSize)> = Vec::with_capacity(sizes.len());
    for (id, size) in sizes {
        if size.is_zero() {
            zero_size_count += 1;
            if zero_size_count <= ZERO_SIZE_WARN_LIMIT {
                warn!("card {} has zero size, excluded from layout", id);
            }
        } else {
            valid.push((id, size));
        }
    }

    if valid.is_empty() {
        return AutoArrangeResult {
            positions: PositionMap::new(),
            zero_size_count,
        };
    }

    let n = valid.len() as f64;
    let avg_w = valid.iter().map(|(_, s)| s.card_w).sum::<f64>() / n;
    let avg_h = valid.iter().map(|(_, s)| s.card_h).sum::<f64>() / n;

    let mut hash = SpatialHash::new(avg_w + GAP);
    let mut positions = PositionMap::new();

    let pad_x = GAP;
    let pad_y = GAP;
    let usable_w = (viewport.view_w - pad_x * 2.0).max(avg_w + GAP);
    let right_edge = pad_x + usable_w;

    let mut cursor_x = pad_x;
    let mut cursor_y = pad_y;
    let mut row_max_h: f64 = 0.0;
    let mut row_index = 0usize;
    let cols = grid_columns(valid.len());

    for (idx, (id, size)) in valid.iter().enumerate() {
        let (card_w, card_h) = (size.card_w, size.card_h);

        if cursor_x + card_w > right_edge && cursor_x > pad_x {
            cursor_x = pad_x;
            cursor_y += row_max_h + GAP;
            row_max_h = 0.0;
            row_index += 1;
        }

        let stagger_x = if row_index % 2 == 1 { GAP * 0.5 } else { 0.0 };
        let mut candidate = Rect::new(cursor_x + stagger_x, cursor_y, card_w, card_h);

        let mut attempts = 0;
        while attempts < MAX_NUDGES && hash.collides(&candidate, epsilon) {
            candidate.x += card_w + GAP;
            if candidate.x + card_w > right_edge + GAP {
                candidate.x = pad_x + stagger_x;
                candidate.y += avg_h + GAP;
            }
            attempts += 1;
        }

        if attempts >= MAX_NUDGES {
            debug!("card {} exhausted nudges, using grid cell", id);
            let col = (idx % cols) as f64;
            let row = (idx / cols) as f64;
            candidate = Rect::new(
                pad_x + col * (CARD_DEFAULT_W + GAP),
                pad_y + row * (CARD_DEFAULT_H + GAP),
                card_w,
                card_h,
            );
        }

        hash.insert(candidate);
        positions.insert((*id).clone(), Position3D::new(candidate.x, candidate.y, 0.0));

        cursor_x = candidate.x + card_w + GAP;
        row_max_h = row_max_h.max(card_h);
    }

    AutoArrangeResult {
        positions,
        zero_size_count,
    }
}

/// Pairwise overlap among sized cards. Cards with no size entry or a
/// zero size are skipped and counted.
pub fn count_rect_overlaps(
    positions: &PositionMap,
    sizes: &SizeMap,
    epsilon: f64,
) -> RectOverlapReport {
    let mut zero_size_count = 0;
    let mut rects = Vec::with_capacity(positions.len());
    for (id, pos) in positions {
        match sizes.get(id) {
            Some(size) if !size.is_zero() => {
                rects.push(Rect::new(pos.x, pos.y, size.card_w, size.card_h))
            }
            _ => zero_size_count += 1,
        }
    }

    let mut overlap_pairs = 0;
    for (i, a) in rects.iter().enumerate() {
        overlap_pairs += rects[i + 1..]
            .iter()
            .filter(|b| aabb_overlap(a, b, epsilon))
            .count();
    }

    RectOverlapReport {
        overlap_pairs,
        zero_size_count,
    }
}
