//! Flappy Dust - a falling-dust arcade game
//!
//! Core modules:
//! - `sim`: Simulation (physics, spawning, collisions, scoring)
//! - `game`: Session orchestration around the simulation
//! - `renderer`: 2D canvas drawing
//! - `platform`: Drawing/input/audio collaborator traits and browser bindings
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `highscores`: Top-5 leaderboard

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use game::{FrameOutcome, Game};
pub use highscores::Leaderboard;
pub use settings::Settings;

/// Game configuration constants
///
/// Physics values are per animation frame, matching the browser's refresh
/// cadence. Spawn timing is wall-clock.
pub mod consts {
    /// Drawing surface dimensions
    pub const SCREEN_WIDTH: f32 = 900.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Character defaults
    pub const START_Y: f32 = 300.0;
    pub const CHARACTER_X: f32 = 120.0;
    pub const CHARACTER_SIZE: f32 = 32.0;
    pub const CHARACTER_HALF: f32 = CHARACTER_SIZE / 2.0;

    /// Downward acceleration added every frame
    pub const GRAVITY: f32 = 0.25;
    /// Velocity multiplier applied after gravity (drag)
    pub const DAMPING: f32 = 0.96;
    /// Velocity override applied by a jump (negative = up)
    pub const JUMP_IMPULSE: f32 = -6.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 26.0;
    pub const OBSTACLE_SPEED: f32 = 2.0;
    pub const SPAWN_INTERVAL_MS: f64 = 2200.0;
    pub const GAP_HEIGHT: f32 = 220.0;
    pub const GAP_TOP_MIN: f32 = 60.0;
    pub const GAP_TOP_RANGE: f32 = 220.0;

    /// Microphone analyser: fftSize 256 -> 128 time-domain bins
    pub const SIGNAL_BUFFER_LEN: usize = 128;
    /// Byte sample value for silence
    pub const SIGNAL_MIDPOINT: f32 = 128.0;
    /// Default RMS level that triggers a jump
    pub const SIGNAL_THRESHOLD: f32 = 8.0;
    /// Level meter
    pub const LEVEL_METER_SCALE: f32 = 4.0;
    pub const LEVEL_METER_MAX_WIDTH: f32 = 900.0;

    /// Number of scores kept on the leaderboard
    pub const LEADERBOARD_LEN: usize = 5;
}

/// Clamp the character's vertical position to the visible area
#[inline]
pub fn clamp_to_screen(y: f32) -> f32 {
    y.clamp(0.0, consts::SCREEN_HEIGHT - consts::CHARACTER_SIZE)
}
