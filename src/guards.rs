//! Validators for persisted or restored board state.
//!
//! None of these panic or error; they only answer whether a value is safe
//! to feed into layout and rendering math.

use crate::geometry::Camera2D;
use crate::layout::PositionMap;
use crate::layouts::TunnelLayout;
use std::str::FromStr;

/// Known layout names pass through; anything else becomes `scatter`.
pub fn normalize_layout_name(name: &str) -> TunnelLayout {
    TunnelLayout::from_str(name).unwrap_or(TunnelLayout::Scatter)
}

/// True for a present camera with finite `x`, `y` and `zoom`.
pub fn has_finite_camera(camera: Option<&Camera2D>) -> bool {
    camera.is_some_and(Camera2D::is_finite)
}

/// True when every entry has finite coordinates. An empty map passes.
pub fn has_finite_positions(positions: &PositionMap) -> bool {
    positions.values().all(|p| p.is_finite())
}
