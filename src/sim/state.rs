//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; there are no globals.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clamp_to_screen;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Menu is showing, no frames scheduled
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended, overlay and leaderboard showing
    GameOver,
}

/// How the player makes the dust jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Pointer click on the canvas
    Click,
    /// Microphone volume above a threshold
    Signal,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Click => "click",
            ControlMode::Signal => "voice",
        }
    }
}

/// The player character (a round ball of dust)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Character {
    /// Vertical centre, screen coordinates (down is positive)
    pub y: f32,
    /// Vertical velocity per frame
    pub vel: f32,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            y: START_Y,
            vel: 0.0,
        }
    }
}

impl Character {
    /// Instantaneous velocity override
    pub fn jump(&mut self) {
        self.vel = JUMP_IMPULSE;
    }

    /// One integration step. Order is gravity, damping, position, clamp.
    pub fn integrate(&mut self) {
        self.vel += GRAVITY;
        self.vel *= DAMPING;
        self.y += self.vel;
        // Clamping keeps the velocity so the dust can press into an edge
        self.y = clamp_to_screen(self.y);
    }

    /// Tilt used when drawing: nose up while rising, down while falling
    pub fn tilt(&self) -> f32 {
        self.vel * 0.05
    }
}

/// A scrolling obstacle with a vertical gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    /// Set once the character has cleared this obstacle
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32) -> Self {
        Self {
            x,
            gap_top,
            gap_bottom: gap_top + GAP_HEIGHT,
            passed: false,
        }
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    /// Fully past the left edge of the screen
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x <= -OBSTACLE_WIDTH
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the obstacle RNG was created from
    pub seed: u64,
    pub phase: GamePhase,
    /// `None` while idle
    pub mode: Option<ControlMode>,
    pub character: Character,
    /// Spawn order, which is also left-to-right screen order
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Frame timestamp (ms) of the last spawn, or of the reset
    pub last_spawn_ms: f64,
    /// Most recent microphone RMS, for the level meter
    pub volume: f32,
    /// Final score already pushed to the leaderboard this session
    pub leaderboard_recorded: bool,
    rng: Pcg32,
}

impl GameState {
    /// Create an idle state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            mode: None,
            character: Character::default(),
            obstacles: Vec::new(),
            score: 0,
            last_spawn_ms: 0.0,
            volume: 0.0,
            leaderboard_recorded: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Put the session back to its starting layout.
    ///
    /// Does not touch `phase`, `mode` or the RNG; mode selection owns those.
    pub fn reset(&mut self, now_ms: f64) {
        self.character = Character::default();
        self.obstacles.clear();
        self.score = 0;
        self.last_spawn_ms = now_ms;
        self.volume = 0.0;
        self.leaderboard_recorded = false;
    }

    /// Append an obstacle at the right edge with a random gap
    pub fn spawn_obstacle(&mut self) {
        let gap_top = GAP_TOP_MIN + self.rng.random::<f32>() * GAP_TOP_RANGE;
        self.obstacles.push(Obstacle::new(SCREEN_WIDTH, gap_top));
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}
