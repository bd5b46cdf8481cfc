//! Player preferences
//!
//! Persisted separately from the leaderboard. Every field has a serde
//! default so older or partial saves still load.

use serde::{Deserialize, Serialize};

use crate::consts::SIGNAL_THRESHOLD;
use crate::error::Result;
use crate::persistence::KeyValueStore;
use crate::sim::ControlMode;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Hit sound volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence the hit sound
    pub muted: bool,

    // === Voice control ===
    /// Microphone RMS above which the dust jumps
    pub signal_threshold: f32,
    /// Show the microphone level meter while playing
    pub show_level_meter: bool,

    /// Mode picked last time, highlighted in the menu
    pub last_mode: Option<ControlMode>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx_volume: 1.0,
            muted: false,
            signal_threshold: SIGNAL_THRESHOLD,
            show_level_meter: true,
            last_mode: None,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "flappyDustSettings";

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Threshold with nonsense values (negative, NaN) replaced by the default
    pub fn effective_threshold(&self) -> f32 {
        if self.signal_threshold.is_finite() && self.signal_threshold >= 0.0 {
            self.signal_threshold
        } else {
            SIGNAL_THRESHOLD
        }
    }

    /// Load settings, defaults on a missing key or unreadable data
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Ok(Some(json)) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
