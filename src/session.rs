//! Board session: wires the drag machine, the perf monitor and the
//! layout functions together the way a hosting view drives them.
//!
//! The pure modules never call one another; this type is the only place
//! that reacts to their outputs (running a reset, logging a tier change).

use crate::config::Config;
use crate::fsm::{transition, DragContext, DragEvent, DragState};
use crate::geometry::{Camera2D, Position3D};
use crate::layout::{arrange_grid, count_overlap_pairs};
use crate::layouts::{compute_layout, TunnelLayout};
use crate::perf::{PerfMonitor, QualityTier};
use crate::store::TunnelState;
use crate::CardId;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Read-only view for debugging hooks and the `replay` report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub state: DragState,
    pub overlap_pairs: usize,
    pub queued_arrange: bool,
    pub tier: QualityTier,
    pub layout_lock: bool,
    pub active_card_id: Option<CardId>,
    pub mean_frame_ms: Option<f64>,
}

pub struct TunnelSession {
    config: Config,
    card_ids: Vec<CardId>,
    drag: DragContext,
    perf: PerfMonitor,
    board: TunnelState,
    arrange_count: usize,
}

impl TunnelSession {
    pub fn new(card_ids: Vec<CardId>, config: Config) -> Self {
        Self::with_state(card_ids, config, None, QualityTier::Full)
    }

    /// Starts from a restored board when one is given.
    pub fn with_state(
        card_ids: Vec<CardId>,
        config: Config,
        restored: Option<TunnelState>,
        initial_tier: QualityTier,
    ) -> Self {
        let board = match restored {
            Some(mut state) => {
                state.reconcile(&card_ids, &config.viewport, &config.grid);
                state
            }
            None => TunnelState::initial(&card_ids, &config.viewport),
        };
        if !config.grid.clears(&config.card) {
            warn!(
                "grid gaps {}x{} do not clear card footprint {}x{}; arranged cards may overlap",
                config.grid.gap_x, config.grid.gap_y, config.card.card_w, config.card.card_h
            );
        }
        Self {
            config,
            card_ids,
            drag: DragContext::new(),
            perf: PerfMonitor::new(initial_tier),
            board,
            arrange_count: 0,
        }
    }

    pub fn drag(&self) -> &DragContext {
        &self.drag
    }

    pub fn perf(&self) -> &PerfMonitor {
        &self.perf
    }

    pub fn board(&self) -> &TunnelState {
        &self.board
    }

    pub fn card_ids(&self) -> &[CardId] {
        &self.card_ids
    }

    /// Number of grid arranges executed so far.
    pub fn arrange_count(&self) -> usize {
        self.arrange_count
    }

    /// Feeds one interaction event. Returns whether the drag context
    /// changed. Resets are executed here: immediately in idle, or once
    /// the settle that deferred them completes.
    pub fn dispatch(&mut self, event: &DragEvent) -> bool {
        let next = match transition(&self.drag, event) {
            Cow::Borrowed(_) => {
                debug!(state = %self.drag.state, ?event, "event ignored");
                return false;
            }
            Cow::Owned(next) => next,
        };

        let was_idle = self.drag.is_idle();
        self.drag = next;

        if was_idle && *event == DragEvent::ResetRequest {
            self.arrange();
        } else if self.drag.is_idle() && self.drag.pending_reset {
            info!("settle complete, running deferred reset");
            self.drag = transition(&self.drag, &DragEvent::ResetRequest).into_owned();
            self.arrange();
        }
        true
    }

    /// Deterministic grid arrange of every card.
    pub fn arrange(&mut self) {
        self.board.positions = arrange_grid(&self.card_ids, &self.config.grid);
        self.board.layout = TunnelLayout::Grid;
        self.arrange_count += 1;
        debug!(
            cards = self.card_ids.len(),
            overlaps = self.overlap_pairs(),
            "arranged board"
        );
    }

    /// Records one frame and returns the tier to render with.
    pub fn record_frame(&mut self, delta_ms: f64) -> QualityTier {
        let before = self.perf.tier();
        self.perf = self.perf.record_frame_time(delta_ms);
        let after = self.perf.tier();
        if after != before {
            info!("quality tier {} -> {}", before, after);
        }
        after
    }

    pub fn set_card_position(&mut self, card_id: &str, pos: Position3D) -> bool {
        if !pos.is_finite() {
            warn!("ignoring non-finite position for {}", card_id);
            return false;
        }
        self.board.positions.insert(card_id.to_string(), pos);
        true
    }

    /// Applies a camera with its zoom clamped. Non-finite cameras are
    /// rejected.
    pub fn set_camera(&mut self, camera: Camera2D) -> bool {
        if !camera.is_finite() {
            warn!("ignoring non-finite camera {:?}", camera);
            return false;
        }
        self.board.camera = camera.with_clamped_zoom();
        true
    }

    pub fn cycle_layout(&mut self) -> TunnelLayout {
        let next = self.board.layout.cycle();
        self.board.positions = compute_layout(
            next,
            &self.card_ids,
            &self.config.viewport,
            &self.config.grid,
        );
        self.board.layout = next;
        next
    }

    /// Back to a scatter board with the default camera.
    pub fn reset_all(&mut self) {
        self.board = TunnelState::initial(&self.card_ids, &self.config.viewport);
    }

    /// Replaces the card set, placing any new cards.
    pub fn set_cards(&mut self, card_ids: Vec<CardId>) -> bool {
        self.card_ids = card_ids;
        self.board.reconcile(&self.card_ids, &self.config.viewport, &self.config.grid)
    }

    pub fn overlap_pairs(&self) -> usize {
        count_overlap_pairs(&self.board.positions, &self.config.card)
    }

    pub fn debug_snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            state: self.drag.state,
            overlap_pairs: self.overlap_pairs(),
            queued_arrange: self.drag.pending_reset,
            tier: self.perf.tier(),
            layout_lock: self.drag.layout_lock,
            active_card_id: self.drag.active_card_id.clone(),
            mean_frame_ms: self.perf.mean_frame_ms(),
        }
    }
}
