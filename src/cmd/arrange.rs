use crate::reports;
use clap::Args;
use tracing::{info, warn};
use tunnel_core::arrange::{auto_arrange, SizeMap};
use tunnel_core::config::Config;
use tunnel_core::geometry::epsilon_for_dpr;
use tunnel_core::guards::normalize_layout_name;
use tunnel_core::layout::{count_overlap_pairs, PositionMap};
use tunnel_core::layouts::compute_layout;
use tunnel_core::TunnelResult;

#[derive(Args, Debug, Clone)]
pub struct ArrangeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Comma-separated card ids, placed in the given order.
    #[arg(long)]
    pub cards: Option<String>,

    /// Number of generated cards when --cards is absent.
    #[arg(long, default_value_t = 12)]
    pub count: usize,

    /// scatter | grid | circle | cluster (unknown names fall back to scatter).
    #[arg(long, default_value = "grid")]
    pub layout: String,

    /// Sized flow arrange instead of a named layout.
    #[arg(long, default_value_t = false)]
    pub auto: bool,

    /// Print positions as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: ArrangeArgs, config: &Config) -> TunnelResult<()> {
    let card_ids = super::resolve_card_ids(args.cards.as_deref(), args.count);

    let positions: PositionMap = if args.auto {
        let sizes: SizeMap = card_ids
            .iter()
            .map(|id| (id.clone(), config.card))
            .collect();
        let result = auto_arrange(&sizes, &config.viewport);
        if result.zero_size_count > 0 {
            warn!("{} zero-size cards left out", result.zero_size_count);
        }
        info!(
            "Auto-arranged {} cards (epsilon {:.2})",
            result.positions.len(),
            epsilon_for_dpr(config.viewport.dpr)
        );
        result.positions
    } else {
        let layout = normalize_layout_name(&args.layout);
        if layout.to_string() != args.layout {
            warn!("Unknown layout '{}', using {}", args.layout, layout);
        }
        info!("Arranging {} cards as {}", card_ids.len(), layout);
        compute_layout(layout, &card_ids, &config.viewport, &config.grid)
    };

    if !config.grid.clears(&config.card) {
        warn!(
            "⚠️  Grid gap {}x{} is smaller than card {}x{}",
            config.grid.gap_x, config.grid.gap_y, config.card.card_w, config.card.card_h
        );
    }

    let overlaps = count_overlap_pairs(&positions, &config.card);
    if args.json {
        let report = serde_json::json!({
            "positions": positions,
            "overlapPairs": overlaps,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        reports::print_positions(&card_ids, &positions);
        println!("Overlap pairs: {}", overlaps);
    }
    Ok(())
}
