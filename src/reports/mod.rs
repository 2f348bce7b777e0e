use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tunnel_core::fsm::DragContext;
use tunnel_core::layout::PositionMap;
use tunnel_core::perf::{PerfMonitor, QualityTier};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn align_right(table: &mut Table, cols: std::ops::Range<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Positions in input order, so the table reads like the board.
pub fn print_positions(card_ids: &[String], positions: &PositionMap) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Card").add_attribute(Attribute::Bold),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("Z"),
    ]);

    for (i, id) in card_ids.iter().enumerate() {
        let Some(p) = positions.get(id) else {
            table.add_row(vec![
                Cell::new(i),
                Cell::new(id).add_attribute(Attribute::Bold),
                Cell::new("-").fg(Color::DarkGrey),
                Cell::new("-").fg(Color::DarkGrey),
                Cell::new("-").fg(Color::DarkGrey),
            ]);
            continue;
        };
        table.add_row(vec![
            Cell::new(i),
            Cell::new(id).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", p.x)),
            Cell::new(format!("{:.1}", p.y)),
            Cell::new(format!("{:.1}", p.z)),
        ]);
    }
    align_right(&mut table, 2..5);
    println!("\n{}", table);
}

pub struct TierChange {
    pub frame: usize,
    pub delta_ms: f64,
    pub from: QualityTier,
    pub to: QualityTier,
}

pub fn print_tier_changes(changes: &[TierChange]) {
    if changes.is_empty() {
        println!("\nNo tier changes.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Frame"),
        Cell::new("Delta (ms)"),
        Cell::new("From"),
        Cell::new("To").add_attribute(Attribute::Bold),
        Cell::new("CSS class"),
    ]);

    for c in changes {
        let color = if c.to.ordinal() > c.from.ordinal() {
            Color::Red
        } else {
            Color::Green
        };
        table.add_row(vec![
            Cell::new(c.frame),
            Cell::new(format!("{:.2}", c.delta_ms)),
            Cell::new(c.from),
            Cell::new(c.to).fg(color),
            Cell::new(c.to.css_class()),
        ]);
    }
    align_right(&mut table, 0..2);
    println!("\n{}", table);
}

pub fn print_perf_summary(monitor: &PerfMonitor, low_end_mobile: bool) {
    let mut table = new_table();
    let mean = monitor
        .mean_frame_ms()
        .map(|m| format!("{:.2}", m))
        .unwrap_or_else(|| "-".to_string());
    let recent: Vec<String> = monitor
        .recent_frames()
        .iter()
        .map(|d| format!("{:.1}", d))
        .collect();

    table.add_row(vec![Cell::new("Frames"), Cell::new(monitor.frames_seen())]);
    table.add_row(vec![
        Cell::new("Final tier").add_attribute(Attribute::Bold),
        Cell::new(monitor.tier()).fg(Color::Cyan),
    ]);
    table.add_row(vec![Cell::new("Slow streak"), Cell::new(monitor.slow_streak())]);
    table.add_row(vec![Cell::new("Fast streak"), Cell::new(monitor.fast_streak())]);
    table.add_row(vec![Cell::new("Recent mean (ms)"), Cell::new(mean)]);
    table.add_row(vec![Cell::new("Recent frames"), Cell::new(recent.join(" "))]);
    table.add_row(vec![
        Cell::new("Low-end mobile"),
        Cell::new(if low_end_mobile { "yes" } else { "no" }),
    ]);
    println!("\n{}", table);
}

pub struct ReplayStep {
    pub index: usize,
    pub event: String,
    pub changed: bool,
    pub context: DragContext,
    pub arranges: usize,
}

pub fn print_replay_steps(steps: &[ReplayStep]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Event").add_attribute(Attribute::Bold),
        Cell::new("State"),
        Cell::new("Lock"),
        Cell::new("Pending"),
        Cell::new("Active"),
        Cell::new("Arranges"),
    ]);

    for s in steps {
        let event = if s.changed {
            Cell::new(&s.event)
        } else {
            Cell::new(format!("{} (no-op)", s.event)).fg(Color::DarkGrey)
        };
        table.add_row(vec![
            Cell::new(s.index),
            event,
            Cell::new(s.context.state).fg(Color::Cyan),
            Cell::new(s.context.layout_lock),
            Cell::new(s.context.pending_reset),
            Cell::new(s.context.active_card_id.as_deref().unwrap_or("-")),
            Cell::new(s.arranges),
        ]);
    }
    align_right(&mut table, 6..7);
    println!("\n{}", table);
}
