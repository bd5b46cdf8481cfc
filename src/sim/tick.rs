//! Per-frame simulation step
//!
//! Processing order:
//!   1. Input (click impulse or microphone level)
//!   2. Physics integration
//!   3. Spawn on the wall-clock interval
//!   4. Advance obstacles, collision and scoring
//!   5. Prune off-screen obstacles
//!   6. Game-over transition

use super::collision::{hits_obstacle, is_cleared};
use super::signal::above_threshold;
use super::state::{ControlMode, GamePhase, GameState};
use crate::consts::*;

/// Raw input captured by event handlers between frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer click on the drawing surface
    Click,
    /// Key press, using the DOM `KeyboardEvent.key` name
    Key(String),
}

impl InputEvent {
    pub fn is_return_key(&self) -> bool {
        matches!(self, InputEvent::Key(k) if k == "Enter")
    }
}

/// Input for a single frame
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Frame timestamp in milliseconds
    pub now_ms: f64,
    /// At least one click arrived since the last frame
    pub jump: bool,
    /// Microphone RMS for this frame (signal mode)
    pub volume: Option<f32>,
    /// RMS above which the dust jumps
    pub threshold: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            jump: false,
            volume: None,
            threshold: SIGNAL_THRESHOLD,
        }
    }
}

impl TickInput {
    pub fn at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }

    /// Fold queued events into one frame of input. Any number of clicks
    /// yields a single impulse.
    pub fn with_events<'a>(mut self, events: impl IntoIterator<Item = &'a InputEvent>) -> Self {
        self.jump |= events.into_iter().any(|e| *e == InputEvent::Click);
        self
    }
}

/// Events emitted during a frame. The host consumes these for sound/logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    ObstacleSpawned,
    Scored { score: u32 },
    Collided,
}

/// Advance the session by one animation frame
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    if state.phase != GamePhase::Playing {
        return Vec::new();
    }

    let mut events = Vec::new();

    match state.mode {
        Some(ControlMode::Click) => {
            if input.jump {
                state.character.jump();
                events.push(GameEvent::Jumped);
            }
        }
        Some(ControlMode::Signal) => {
            // Level triggered: re-applied every frame the signal stays loud
            if let Some(volume) = input.volume {
                state.volume = volume;
                if above_threshold(volume, input.threshold) {
                    state.character.jump();
                    events.push(GameEvent::Jumped);
                }
            }
        }
        None => {}
    }

    state.character.integrate();

    if input.now_ms - state.last_spawn_ms > SPAWN_INTERVAL_MS {
        state.spawn_obstacle();
        state.last_spawn_ms = input.now_ms;
        events.push(GameEvent::ObstacleSpawned);
    }

    let y = state.character.y;
    let mut collided = false;
    for obstacle in &mut state.obstacles {
        obstacle.x -= OBSTACLE_SPEED;

        if hits_obstacle(y, obstacle) {
            collided = true;
        }

        if !obstacle.passed && is_cleared(obstacle) {
            obstacle.passed = true;
            state.score += 1;
            events.push(GameEvent::Scored { score: state.score });
        }
    }

    state.obstacles.retain(|o| !o.is_offscreen());

    if collided {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::Collided);
    }

    events
}
