//! World/screen coordinates and axis-aligned boxes.
//!
//! Layout and collision work in world coordinates;
//! `screen = world * zoom + pan`.

use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: f64 = 0.3;
pub const ZOOM_MAX: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Pan and zoom of the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera2D {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.zoom.is_finite()
    }

    pub fn with_clamped_zoom(self) -> Self {
        Self {
            zoom: clamp_zoom(self.zoom),
            ..self
        }
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(ZOOM_MIN, ZOOM_MAX)
}

pub fn screen_to_world(screen_x: f64, screen_y: f64, cam: &Camera2D) -> (f64, f64) {
    ((screen_x - cam.x) / cam.zoom, (screen_y - cam.y) / cam.zoom)
}

pub fn world_to_screen(world_x: f64, world_y: f64, cam: &Camera2D) -> (f64, f64) {
    (world_x * cam.zoom + cam.x, world_y * cam.zoom + cam.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// Strict AABB intersection with both boxes grown by `epsilon`.
/// Touching edges do not overlap when `epsilon == 0`.
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect, epsilon: f64) -> bool {
    a.x < b.x + b.w + epsilon
        && a.x + a.w + epsilon > b.x
        && a.y < b.y + b.h + epsilon
        && a.y + a.h + epsilon > b.y
}

/// Collision slack for a device pixel ratio. Never below one world unit.
pub fn epsilon_for_dpr(dpr: f64) -> f64 {
    (0.5 / dpr).max(1.0)
}
