//! Per-user persistence of the board: positions, camera and layout.

use crate::config::{GridOptions, ViewportParams};
use crate::error::{TunnelError, TunnelResult};
use crate::geometry::Camera2D;
use crate::guards::{has_finite_camera, has_finite_positions, normalize_layout_name};
use crate::layout::PositionMap;
use crate::layouts::{compute_layout, scatter_position, scatter_positions, TunnelLayout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const STORAGE_PREFIX: &str = "stillframe.tunnel.v1";

pub fn storage_key(user_id: &str) -> String {
    format!("{}:{}", STORAGE_PREFIX, user_id)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TunnelState {
    pub positions: PositionMap,
    pub camera: Camera2D,
    pub layout: TunnelLayout,
}

impl TunnelState {
    /// Fresh board: scatter layout, default camera.
    pub fn initial<S: AsRef<str>>(card_ids: &[S], viewport: &ViewportParams) -> Self {
        Self {
            positions: scatter_positions(card_ids, viewport),
            camera: Camera2D::default(),
            layout: TunnelLayout::Scatter,
        }
    }

    /// Gives every card in `card_ids` a position. In scatter only the new
    /// cards get a slot; any other layout is recomputed for the whole
    /// board, a grid with the given spacing. Returns whether anything
    /// changed.
    pub fn reconcile<S: AsRef<str>>(
        &mut self,
        card_ids: &[S],
        viewport: &ViewportParams,
        grid: &GridOptions,
    ) -> bool {
        let missing: Vec<&str> = card_ids
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| !self.positions.contains_key(*id))
            .collect();
        if missing.is_empty() {
            return false;
        }

        debug!(new_cards = missing.len(), layout = %self.layout, "placing new cards");
        if self.layout == TunnelLayout::Scatter {
            for id in missing {
                self.positions
                    .insert(id.to_string(), scatter_position(id, viewport));
            }
        } else {
            self.positions = compute_layout(self.layout, card_ids, viewport, grid);
        }
        true
    }

    pub fn is_valid(&self) -> bool {
        has_finite_camera(Some(&self.camera)) && has_finite_positions(&self.positions)
    }
}

/// Raw on-disk shape, validated before it becomes a [`TunnelState`].
#[derive(Deserialize)]
struct PersistedState {
    positions: PositionMap,
    camera: Option<Camera2D>,
    #[serde(default)]
    layout: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing saved for this user.
    Empty,
    Restored(TunnelState),
    /// Saved data could not be trusted; start fresh.
    Corrupt,
}

/// Directory-backed store, one JSON file per user.
#[derive(Debug, Clone)]
pub struct TunnelStore {
    root: PathBuf,
}

impl TunnelStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        let key = storage_key(user_id).replace([':', '/', '\\'], "_");
        self.root.join(format!("{}.json", key))
    }

    pub fn load(&self, user_id: &str) -> TunnelResult<LoadOutcome> {
        let path = self.path_for(user_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadOutcome::Empty),
            Err(e) => return Err(TunnelError::Io(e)),
        };
        if raw.trim().is_empty() {
            return Ok(LoadOutcome::Empty);
        }

        let persisted: PersistedState = match serde_json::from_str(&raw) {
            Ok(p) => p,
            Err(e) => {
                warn!("tunnel state for {} is corrupt ({}), starting fresh", user_id, e);
                return Ok(LoadOutcome::Corrupt);
            }
        };

        if !has_finite_camera(persisted.camera.as_ref())
            || !has_finite_positions(&persisted.positions)
        {
            warn!("tunnel state for {} has non-finite values, starting fresh", user_id);
            return Ok(LoadOutcome::Corrupt);
        }

        let layout = persisted
            .layout
            .as_deref()
            .map(normalize_layout_name)
            .unwrap_or_default();

        info!(
            "restored tunnel state for {} ({} cards, {})",
            user_id,
            persisted.positions.len(),
            layout
        );
        Ok(LoadOutcome::Restored(TunnelState {
            positions: persisted.positions,
            camera: persisted.camera.unwrap_or_default(),
            layout,
        }))
    }

    pub fn save(&self, user_id: &str, state: &TunnelState) -> TunnelResult<()> {
        if !state.is_valid() {
            return Err(TunnelError::NonFinite(format!(
                "refusing to persist board for {}",
                user_id
            )));
        }
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string(state)?;
        fs::write(self.path_for(user_id), json)?;
        debug!("saved tunnel state for {}", user_id);
        Ok(())
    }

    /// Loaded state reconciled against the current cards, or a fresh
    /// board when nothing usable is stored.
    pub fn load_or_initial<S: AsRef<str>>(
        &self,
        user_id: &str,
        card_ids: &[S],
        viewport: &ViewportParams,
        grid: &GridOptions,
    ) -> TunnelResult<(TunnelState, LoadOutcome)> {
        let outcome = self.load(user_id)?;
        let state = match &outcome {
            LoadOutcome::Restored(saved) => {
                let mut state = saved.clone();
                state.reconcile(card_ids, viewport, grid);
                state
            }
            LoadOutcome::Empty | LoadOutcome::Corrupt => TunnelState::initial(card_ids, viewport),
        };
        Ok((state, outcome))
    }
}
