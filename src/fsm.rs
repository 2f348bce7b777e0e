//! Drag/settle coordination state machine.
//!
//! States: `idle | dragging | settling`.
//! Events: `DRAG_START | DRAG_END | SETTLE_COMPLETE | RESET_REQUEST`.
//!
//! [`transition`] never mutates its input. When an event has no effect in
//! the current state it hands back the very same context (`Cow::Borrowed`),
//! so callers can skip work with a pointer or variant check. The machine
//! never performs a reset itself: a reset request in `idle` must be run
//! by the caller right away, and a `pending_reset` that survives into
//! `idle` is the caller's cue to run one.

use crate::CardId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use strum_macros::{Display, EnumIter, EnumString};

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
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
    Settling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DragEvent {
    DragStart {
        #[serde(rename = "cardId")]
        card_id: CardId,
    },
    DragEnd {
        #[serde(rename = "cardId")]
        card_id: CardId,
    },
    SettleComplete,
    ResetRequest,
}

impl DragEvent {
    pub fn drag_start(card_id: impl Into<CardId>) -> Self {
        Self::DragStart {
            card_id: card_id.into(),
        }
    }

    pub fn drag_end(card_id: impl Into<CardId>) -> Self {
        Self::DragEnd {
            card_id: card_id.into(),
        }
    }
}

/// Snapshot of the interaction phase.
///
/// `layout_lock` holds exactly while dragging or settling and
/// `active_card_id` is set exactly while dragging.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragContext {
    pub state: DragState,
    pub layout_lock: bool,
    pub pending_reset: bool,
    pub active_card_id: Option<CardId>,
}

impl DragContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }
}

/// Computes the next context for `event`.
pub fn transition<'a>(ctx: &'a DragContext, event: &DragEvent) -> Cow<'a, DragContext> {
    match (ctx.state, event) {
        (DragState::Idle, DragEvent::DragStart { card_id }) => Cow::Owned(DragContext {
            state: DragState::Dragging,
            layout_lock: true,
            pending_reset: false,
            active_card_id: Some(card_id.clone()),
        }),
        // Caller runs the reset now.
        (DragState::Idle, DragEvent::ResetRequest) => Cow::Owned(DragContext {
            pending_reset: false,
            ..ctx.clone()
        }),

        // At most one reset is queued.
        (DragState::Dragging, DragEvent::ResetRequest) => Cow::Owned(DragContext {
            pending_reset: true,
            ..ctx.clone()
        }),
        (DragState::Dragging, DragEvent::DragEnd { .. }) => Cow::Owned(DragContext {
            state: DragState::Settling,
            active_card_id: None,
            ..ctx.clone()
        }),

        (DragState::Settling, DragEvent::SettleComplete) => Cow::Owned(DragContext {
            state: DragState::Idle,
            layout_lock: false,
            pending_reset: ctx.pending_reset,
            active_card_id: None,
        }),
        // A new drag cancels the settle.
        (DragState::Settling, DragEvent::DragStart { card_id }) => Cow::Owned(DragContext {
            state: DragState::Dragging,
            layout_lock: true,
            pending_reset: ctx.pending_reset,
            active_card_id: Some(card_id.clone()),
        }),

        _ => Cow::Borrowed(ctx),
    }
}

/// True when `event` leaves `ctx` untouched.
pub fn is_noop(ctx: &DragContext, event: &DragEvent) -> bool {
    matches!(transition(ctx, event), Cow::Borrowed(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_wire_shape() {
        let ev: DragEvent = serde_json::from_str(r#"{"type":"DRAG_START","cardId":"c1"}"#).unwrap();
        assert_eq!(ev, DragEvent::drag_start("c1"));

        let ev: DragEvent = serde_json::from_str(r#"{"type":"SETTLE_COMPLETE"}"#).unwrap();
        assert_eq!(ev, DragEvent::SettleComplete);

        let json = serde_json::to_string(&DragEvent::ResetRequest).unwrap();
        assert_eq!(json, r#"{"type":"RESET_REQUEST"}"#);
    }

    #[test]
    fn context_serializes_camel_case() {
        let json = serde_json::to_value(DragContext::new()).unwrap();
        assert_eq!(json["state"], "idle");
        assert_eq!(json["layoutLock"], false);
        assert!(json["activeCardId"].is_null());
    }
}
