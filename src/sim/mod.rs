//! Simulation module
//!
//! All gameplay logic lives here. This module must stay platform free:
//! - Frame timestamps come in through the input
//! - Seeded RNG only
//! - Obstacles are kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod signal;
pub mod state;
pub mod tick;

pub use collision::{hits_obstacle, is_cleared};
pub use signal::{level_meter_width, rms_volume};
pub use state::{Character, ControlMode, GamePhase, GameState, Obstacle};
pub use tick::{GameEvent, InputEvent, TickInput, tick};
