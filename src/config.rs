//! Configuration: TOML file plus command-line overrides
//!
//! Everything has a default, so the program runs with no config file at
//! all; an optional `slideways.toml` next to the binary adjusts the
//! puzzles directory, display mode and animation pacing.

use crate::game::Pacing;
use crate::render::manager::DisplayMode;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "slideways.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for puzzle images
    pub puzzles_dir: String,
    /// Display mode name: auto, vdu, terminal, headless
    pub display: String,
    /// Device or file that receives the VDU stream instead of stdout
    pub serial: Option<String>,
    /// Fixed RNG seed for reproducible shuffles
    pub seed: Option<u64>,
    pub scroll_steps: u16,
    pub frame_delay_ms: u64,
    pub spin_delay_ms: u64,
    pub shuffle_pause_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let pacing = Pacing::default();
        Config {
            puzzles_dir: "puzzles".to_string(),
            display: "auto".to_string(),
            serial: None,
            seed: None,
            scroll_steps: pacing.scroll_steps,
            frame_delay_ms: pacing.frame_delay.as_millis() as u64,
            spin_delay_ms: pacing.spin_delay.as_millis() as u64,
            shuffle_pause_ms: pacing.shuffle_pause.as_millis() as u64,
        }
    }
}

impl Config {
    /// Parse a TOML config file.
    pub fn load(path: &Path) -> Result<Config, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read config '{}': {}", path.display(), e))?;
        toml::from_str(&text).map_err(|e| format!("bad config '{}': {}", path.display(), e))
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_optional(path: &Path) -> Result<Config, String> {
        if path.exists() {
            debug!("loading config from {}", path.display());
            Self::load(path)
        } else {
            debug!("no config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Resolve the display mode, routing the VDU stream to the serial
    /// target when one is configured.
    pub fn display_mode(&self) -> Result<DisplayMode, String> {
        let mode = DisplayMode::parse(&self.display)?;
        match (&mode, &self.serial) {
            (DisplayMode::Vdu, Some(path)) => Ok(DisplayMode::VduTo(path.clone())),
            _ => Ok(mode),
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            scroll_steps: self.scroll_steps.max(1),
            frame_delay: Duration::from_millis(self.frame_delay_ms),
            spin_delay: Duration::from_millis(self.spin_delay_ms),
            shuffle_pause: Duration::from_millis(self.shuffle_pause_ms),
            ..Pacing::default()
        }
    }
}
