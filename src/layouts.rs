use crate::config::{GridOptions, ViewportParams};
use crate::geometry::Position3D;
use crate::layout::{arrange_grid, PositionMap};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TunnelLayout {
    #[default]
    Scatter,
    Grid,
    Circle,
    Cluster,
}

/// Order walked by the layout toggle.
const CYCLE_ORDER: [TunnelLayout; 3] = [
    TunnelLayout::Scatter,
    TunnelLayout::Grid,
    TunnelLayout::Circle,
];

impl TunnelLayout {
    /// Next layout in the toggle. `cluster` is not in the cycle and
    /// moves to `scatter`.
    pub fn cycle(self) -> Self {
        match CYCLE_ORDER.iter().position(|&l| l == self) {
            Some(idx) => CYCLE_ORDER[(idx + 1) % CYCLE_ORDER.len()],
            None => CYCLE_ORDER[0],
        }
    }
}

// Scatter box
const SCATTER_PAD_X: f64 = 140.0;
const SCATTER_PAD_Y: f64 = 100.0;
const SCATTER_MIN_SPAN: f64 = 200.0;

// Circle centre offsets (half a card)
const CIRCLE_CARD_HALF_W: f64 = 120.0;
const CIRCLE_CARD_HALF_H: f64 = 140.0;
const CIRCLE_RADIUS_SCALE: f64 = 0.6;

/// Maps a string to `[0, 1)` with a seeded 32-bit rolling hash.
pub fn hash_to_float(s: &str, seed: i32) -> f64 {
    let mut h = seed;
    for unit in s.encode_utf16() {
        h = (h << 5).wrapping_sub(h).wrapping_add(unit as i32);
    }
    ((h as u32) % 10_000) as f64 / 10_000.0
}

/// Stable per-card slot inside the padded viewport; z in `[-50, 50)`.
pub fn scatter_position(card_id: &str, viewport: &ViewportParams) -> Position3D {
    let span_x = (viewport.view_w - SCATTER_PAD_X * 2.0).max(SCATTER_MIN_SPAN);
    let span_y = (viewport.view_h - SCATTER_PAD_Y * 2.0).max(SCATTER_MIN_SPAN);
    Position3D::new(
        SCATTER_PAD_X + hash_to_float(card_id, 1) * span_x,
        SCATTER_PAD_Y + hash_to_float(card_id, 2) * span_y,
        hash_to_float(card_id, 3) * 100.0 - 50.0,
    )
}

pub fn scatter_positions<S: AsRef<str>>(card_ids: &[S], viewport: &ViewportParams) -> PositionMap {
    card_ids
        .iter()
        .map(|id| (id.as_ref().to_string(), scatter_position(id.as_ref(), viewport)))
        .collect()
}

/// Ring around the viewport centre, first card at twelve o'clock.
pub fn circle_positions<S: AsRef<str>>(card_ids: &[S], viewport: &ViewportParams) -> PositionMap {
    let cx = viewport.view_w / 2.0 - CIRCLE_CARD_HALF_W;
    let cy = viewport.view_h / 2.0 - CIRCLE_CARD_HALF_H;
    let radius = cx.min(cy) * CIRCLE_RADIUS_SCALE;
    let n = card_ids.len() as f64;
    card_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let angle = (2.0 * PI * i as f64) / n - PI / 2.0;
            let pos = Position3D::new(cx + angle.cos() * radius, cy + angle.sin() * radius, 0.0);
            (id.as_ref().to_string(), pos)
        })
        .collect()
}

/// Positions for `layout`. Only `grid` reads `grid`.
pub fn compute_layout<S: AsRef<str>>(
    layout: TunnelLayout,
    card_ids: &[S],
    viewport: &ViewportParams,
    grid: &GridOptions,
) -> PositionMap {
    match layout {
        TunnelLayout::Grid => arrange_grid(card_ids, grid),
        TunnelLayout::Circle => circle_positions(card_ids, viewport),
        TunnelLayout::Scatter | TunnelLayout::Cluster => scatter_positions(card_ids, viewport),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_in_unit_range() {
        for id in ["", "a", "card-001", "日本語", "a much longer identifier string"] {
            for seed in 1..=3 {
                let v = hash_to_float(id, seed);
                assert!((0.0..1.0).contains(&v), "{} {} -> {}", id, seed, v);
            }
        }
    }

    #[test]
    fn hash_of_empty_string_is_seed() {
        assert_eq!(hash_to_float("", 1), 0.0001);
        assert_eq!(hash_to_float("", 2), 0.0002);
    }

    #[test]
    fn hash_matches_rolling_formula() {
        // h = 1*31 + 'a'(97) = 128
        assert_eq!(hash_to_float("a", 1), 0.0128);
    }
}
