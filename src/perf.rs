//! Frame-time monitoring with hysteresis.
//!
//! Quality tiers, richest first: `full -> no-shadow -> no-3d -> no-anim`.
//! Three consecutive frames over 16 ms step one tier down; thirty
//! consecutive frames under 12 ms step one tier up. Anything in between
//! clears both streaks.

use crate::error::{TunnelError, TunnelResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::debug;

pub const DEGRADE_THRESHOLD_MS: f64 = 16.0;
pub const DEGRADE_COUNT: u32 = 3;
pub const RECOVER_THRESHOLD_MS: f64 = 12.0;
pub const RECOVER_COUNT: u32 = 30;
pub const RING_SIZE: usize = 10;

/// Viewport width below which a touch device counts as constrained.
pub const MOBILE_MAX_WIDTH: f64 = 768.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum QualityTier {
    #[default]
    #[strum(serialize = "full")]
    #[serde(rename = "full")]
    Full,
    #[strum(serialize = "no-shadow")]
    #[serde(rename = "no-shadow")]
    NoShadow,
    #[strum(serialize = "no-3d")]
    #[serde(rename = "no-3d")]
    No3d,
    #[strum(serialize = "no-anim")]
    #[serde(rename = "no-anim")]
    NoAnim,
}

impl QualityTier {
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Full,
        QualityTier::NoShadow,
        QualityTier::No3d,
        QualityTier::NoAnim,
    ];

    /// Position in fidelity order, 0 = richest.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn is_lowest(self) -> bool {
        self.ordinal() == Self::ALL.len() - 1
    }

    pub fn is_highest(self) -> bool {
        self.ordinal() == 0
    }

    /// One step less rich, saturating at `no-anim`.
    pub fn degraded(self) -> Self {
        Self::from_ordinal(self.ordinal() + 1).unwrap_or(self)
    }

    /// One step richer, saturating at `full`.
    pub fn upgraded(self) -> Self {
        self.ordinal()
            .checked_sub(1)
            .and_then(Self::from_ordinal)
            .unwrap_or(self)
    }

    /// CSS class toggled by the host view. Empty for `full`.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Full => "",
            Self::NoShadow => "perf-no-shadow",
            Self::No3d => "perf-no-3d",
            Self::NoAnim => "perf-no-anim",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::iter().map(|t| -> &'static str { t.into() }).collect()
    }

    /// Parses a tier name, listing the known names on failure.
    pub fn parse(name: &str) -> TunnelResult<Self> {
        Self::from_str(name).map_err(|_| TunnelError::UnknownTier {
            name: name.to_string(),
            expected: Self::names().join(", "),
        })
    }
}

/// CSS class name for a quality tier.
pub fn tier_css_class(tier: QualityTier) -> &'static str {
    tier.css_class()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameClass {
    Slow,
    Fast,
    Neutral,
}

impl FrameClass {
    pub fn classify(delta_ms: f64) -> Self {
        if delta_ms > DEGRADE_THRESHOLD_MS {
            Self::Slow
        } else if delta_ms < RECOVER_THRESHOLD_MS {
            Self::Fast
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfMonitor {
    tier: QualityTier,
    ring: [f64; RING_SIZE],
    ring_index: usize,
    slow_streak: u32,
    fast_streak: u32,
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new(QualityTier::Full)
    }
}

impl PerfMonitor {
    pub fn new(initial_tier: QualityTier) -> Self {
        Self {
            tier: initial_tier,
            ring: [0.0; RING_SIZE],
            ring_index: 0,
            slow_streak: 0,
            fast_streak: 0,
        }
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn slow_streak(&self) -> u32 {
        self.slow_streak
    }

    pub fn fast_streak(&self) -> u32 {
        self.fast_streak
    }

    /// Total frames recorded this session.
    pub fn frames_seen(&self) -> usize {
        self.ring_index
    }

    /// Returns the monitor after one more frame of `delta_ms`.
    pub fn record_frame_time(&self, delta_ms: f64) -> PerfMonitor {
        let mut ring = self.ring;
        ring[self.ring_index % RING_SIZE] = delta_ms;
        let ring_index = self.ring_index + 1;

        let (mut slow_streak, mut fast_streak) = match FrameClass::classify(delta_ms) {
            FrameClass::Slow => (self.slow_streak + 1, 0),
            FrameClass::Fast => (0, self.fast_streak + 1),
            FrameClass::Neutral => (0, 0),
        };

        let mut tier = self.tier;
        if slow_streak >= DEGRADE_COUNT && !tier.is_lowest() {
            tier = tier.degraded();
            slow_streak = 0;
            fast_streak = 0;
        } else if fast_streak >= RECOVER_COUNT && !tier.is_highest() {
            tier = tier.upgraded();
            slow_streak = 0;
            fast_streak = 0;
        }

        if tier != self.tier {
            debug!(from = %self.tier, to = %tier, delta_ms, "quality tier changed");
        }

        PerfMonitor {
            tier,
            ring,
            ring_index,
            slow_streak,
            fast_streak,
        }
    }

    /// Recorded deltas still held in the ring, oldest first.
    pub fn recent_frames(&self) -> Vec<f64> {
        let filled = self.ring_index.min(RING_SIZE);
        let start = self.ring_index - filled;
        (start..self.ring_index)
            .map(|i| self.ring[i % RING_SIZE])
            .collect()
    }

    pub fn mean_frame_ms(&self) -> Option<f64> {
        let frames = self.recent_frames();
        if frames.is_empty() {
            return None;
        }
        Some(frames.iter().sum::<f64>() / frames.len() as f64)
    }
}

/// Pure-function form of [`PerfMonitor::record_frame_time`].
pub fn record_frame_time(monitor: &PerfMonitor, delta_ms: f64) -> PerfMonitor {
    monitor.record_frame_time(delta_ms)
}

/// What the host knows about the device. `None` means no window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub max_touch_points: u32,
    pub inner_width: f64,
}

/// Advisory guess at a low-end mobile device. Not part of the tier logic.
pub fn is_low_end_mobile(device: Option<&DeviceProfile>) -> bool {
    match device {
        Some(d) => d.max_touch_points > 0 && d.inner_width < MOBILE_MAX_WIDTH,
        None => false,
    }
}

/// Loads frame deltas from CSV: the `delta_ms` column if present,
/// otherwise the first column. Rows that are not finite and
/// non-negative are skipped.
pub fn load_frame_times<P: AsRef<Path>>(path: P) -> TunnelResult<Vec<f64>> {
    let file = File::open(path)?;
    read_frame_times(file)
}

pub fn read_frame_times<R: Read>(reader: R) -> TunnelResult<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut column = 0;
    let mut deltas = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        if row == 0 {
            if let Some(idx) = record.iter().position(|h| h == "delta_ms") {
                column = idx;
                continue;
            }
        }
        let Some(raw) = record.get(column) else {
            continue;
        };
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => deltas.push(v),
            _ => debug!(row, raw, "skipping frame row"),
        }
    }
    Ok(deltas)
}
