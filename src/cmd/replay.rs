use crate::reports::{self, ReplayStep};
use clap::Args;
use std::fs;
use tracing::info;
use tunnel_core::config::Config;
use tunnel_core::fsm::DragEvent;
use tunnel_core::session::TunnelSession;
use tunnel_core::TunnelResult;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    #[command(flatten)]
    pub config: Config,

    /// JSON array of events, e.g. [{"type":"DRAG_START","cardId":"card-000"}].
    #[arg(long)]
    pub script: String,

    /// Comma-separated card ids on the board.
    #[arg(long)]
    pub cards: Option<String>,

    #[arg(long, default_value_t = 12)]
    pub count: usize,
}

pub fn load_script(path: &str) -> TunnelResult<Vec<DragEvent>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn event_label(event: &DragEvent) -> String {
    match event {
        DragEvent::DragStart { card_id } => format!("DRAG_START {}", card_id),
        DragEvent::DragEnd { card_id } => format!("DRAG_END {}", card_id),
        DragEvent::SettleComplete => "SETTLE_COMPLETE".to_string(),
        DragEvent::ResetRequest => "RESET_REQUEST".to_string(),
    }
}

pub fn run(args: ReplayArgs, config: Config) -> TunnelResult<()> {
    let events = load_script(&args.script)?;
    let card_ids = super::resolve_card_ids(args.cards.as_deref(), args.count);
    info!("▶️  Replaying {} events over {} cards", events.len(), card_ids.len());

    let mut session = TunnelSession::new(card_ids, config);
    let mut steps = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        let changed = session.dispatch(event);
        steps.push(ReplayStep {
            index,
            event: event_label(event),
            changed,
            context: session.drag().clone(),
            arranges: session.arrange_count(),
        });
    }

    reports::print_replay_steps(&steps);
    println!(
        "{}",
        serde_json::to_string_pretty(&session.debug_snapshot())?
    );
    Ok(())
}
