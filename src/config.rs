use crate::error::{TunnelError, TunnelResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub grid: GridOptions,
    #[command(flatten)]
    pub card: CardSize,
    #[command(flatten)]
    pub viewport: ViewportParams,
}

/// Spacing of the deterministic grid arrange.
#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridOptions {
    #[arg(long, default_value_t = 280.0)]
    pub gap_x: f64,
    #[arg(long, default_value_t = 320.0)]
    pub gap_y: f64,
    #[arg(long, default_value_t = 80.0)]
    pub offset_x: f64,
    #[arg(long, default_value_t = 80.0)]
    pub offset_y: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            gap_x: 280.0,
            gap_y: 320.0,
            offset_x: 80.0,
            offset_y: 80.0,
        }
    }
}

impl GridOptions {
    /// Gaps sized from a card footprint plus a margin on both axes.
    pub fn for_card(card: &CardSize, margin: f64) -> Self {
        Self {
            gap_x: card.card_w + margin,
            gap_y: card.card_h + margin,
            ..Self::default()
        }
    }

    /// True when neighbouring grid cells cannot overlap for this footprint.
    pub fn clears(&self, card: &CardSize) -> bool {
        self.gap_x >= card.card_w && self.gap_y >= card.card_h
    }
}

/// Logical card footprint used by the overlap counter.
#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CardSize {
    #[arg(long, default_value_t = 240.0)]
    pub card_w: f64,
    #[arg(long, default_value_t = 320.0)]
    pub card_h: f64,
}

impl Default for CardSize {
    fn default() -> Self {
        Self {
            card_w: 240.0,
            card_h: 320.0,
        }
    }
}

impl CardSize {
    pub fn new(card_w: f64, card_h: f64) -> Self {
        Self { card_w, card_h }
    }

    pub fn is_zero(&self) -> bool {
        self.card_w == 0.0 && self.card_h == 0.0
    }
}

/// Visible board area. `view_h` excludes the app chrome.
#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportParams {
    #[arg(long, default_value_t = 1200.0)]
    pub view_w: f64,
    #[arg(long, default_value_t = 700.0)]
    pub view_h: f64,
    #[arg(long, default_value_t = 1.0)]
    pub dpr: f64,
}

impl Default for ViewportParams {
    fn default() -> Self {
        Self {
            view_w: 1200.0,
            view_h: 700.0,
            dpr: 1.0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TunnelResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TunnelError::Config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field;
                }
            };
        }

        update_if_present!(grid.gap_x);
        update_if_present!(grid.gap_y);
        update_if_present!(grid.offset_x);
        update_if_present!(grid.offset_y);

        update_if_present!(card.card_w);
        update_if_present!(card.card_h);

        update_if_present!(viewport.view_w);
        update_if_present!(viewport.view_h);
        update_if_present!(viewport.dpr);
    }
}
