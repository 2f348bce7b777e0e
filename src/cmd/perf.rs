use crate::reports::{self, TierChange};
use clap::Args;
use tracing::info;
use tunnel_core::perf::{
    is_low_end_mobile, load_frame_times, DeviceProfile, PerfMonitor, QualityTier,
};
use tunnel_core::{TunnelError, TunnelResult};

#[derive(Args, Debug, Clone)]
pub struct PerfArgs {
    /// CSV of frame deltas (a `delta_ms` column, or the first column).
    #[arg(long, conflicts_with = "synthetic")]
    pub frames: Option<String>,

    /// Generate this many jittered frames instead of reading a file.
    #[arg(long)]
    pub synthetic: Option<usize>,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = 14.0)]
    pub base_ms: f64,

    #[arg(long, default_value_t = 6.0)]
    pub jitter_ms: f64,

    /// full | no-shadow | no-3d | no-anim
    #[arg(long, default_value = "full")]
    pub initial_tier: String,

    #[arg(long)]
    pub touch_points: Option<u32>,

    #[arg(long)]
    pub viewport_width: Option<f64>,
}

/// Frames uniformly spread over `base ± jitter`, never negative.
pub fn synthetic_frames(count: usize, seed: u64, base_ms: f64, jitter_ms: f64) -> Vec<f64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| (base_ms + (rng.f64() * 2.0 - 1.0) * jitter_ms).max(0.0))
        .collect()
}

pub fn run(args: PerfArgs) -> TunnelResult<()> {
    let initial = QualityTier::parse(&args.initial_tier)?;

    let deltas = match (&args.frames, args.synthetic) {
        (Some(path), _) => {
            info!("📂 Loading frame times: {}", path);
            load_frame_times(path)?
        }
        (None, Some(n)) => {
            info!("🎲 Generating {} synthetic frames (seed {})", n, args.seed);
            synthetic_frames(n, args.seed, args.base_ms, args.jitter_ms)
        }
        (None, None) => {
            return Err(TunnelError::Config(
                "pass --frames <csv> or --synthetic <count>".to_string(),
            ))
        }
    };

    let mut monitor = PerfMonitor::new(initial);
    let mut changes = Vec::new();
    for (frame, &delta_ms) in deltas.iter().enumerate() {
        let next = monitor.record_frame_time(delta_ms);
        if next.tier() != monitor.tier() {
            changes.push(TierChange {
                frame,
                delta_ms,
                from: monitor.tier(),
                to: next.tier(),
            });
        }
        monitor = next;
    }

    let device = match (args.touch_points, args.viewport_width) {
        (Some(max_touch_points), Some(inner_width)) => Some(DeviceProfile {
            max_touch_points,
            inner_width,
        }),
        _ => None,
    };

    reports::print_tier_changes(&changes);
    reports::print_perf_summary(&monitor, is_low_end_mobile(device.as_ref()));
    println!("Final tier: {}", monitor.tier());
    Ok(())
}
