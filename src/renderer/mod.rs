//! 2D rendering module
//!
//! Draws through the [`Surface`] trait so frames can be inspected in tests.
//! Rendering never mutates game state; drawing the same state twice gives the
//! same picture.

pub mod shapes;

use crate::highscores::Leaderboard;
use crate::platform::{Surface, TextAlign};
use crate::sim::GameState;

/// Draw an in-progress frame: dust, obstacles and score
pub fn render_playing(surface: &mut dyn Surface, state: &GameState) {
    let (w, h) = (surface.width(), surface.height());
    surface.clear_rect(0.0, 0.0, w, h);

    shapes::dust(surface, &state.character);
    for obstacle in &state.obstacles {
        shapes::obstacle(surface, obstacle);
    }

    surface.set_fill_style("black");
    surface.set_font("22px Arial");
    surface.set_text_align(TextAlign::Left);
    surface.fill_text(&format!("Score: {}", state.score), 50.0, 40.0);
}

/// Draw the final frame with the dimmed game-over overlay and leaderboard.
///
/// The scene underneath is redrawn first so repeated calls don't stack the
/// translucent overlay.
pub fn render_game_over(surface: &mut dyn Surface, state: &GameState, leaderboard: &Leaderboard) {
    render_playing(surface, state);

    let (w, h) = (surface.width(), surface.height());
    let (cx, cy) = (w / 2.0, h / 2.0);

    surface.set_fill_style("rgba(0,0,0,0.6)");
    surface.fill_rect(0.0, 0.0, w, h);

    surface.set_fill_style("white");
    surface.set_text_align(TextAlign::Center);
    surface.set_font("44px Arial");
    surface.fill_text("GAME OVER", cx, cy - 60.0);

    surface.set_font("20px Arial");
    surface.fill_text("Press ENTER to Return to Menu", cx, cy - 30.0);
    surface.fill_text("🏆 Leaderboard 🏆", cx, cy + 10.0);

    surface.set_font("18px Arial");
    for (i, score) in leaderboard.scores().iter().enumerate() {
        surface.fill_text(
            &format!("{}. {} pts", i + 1, score),
            cx,
            cy + 40.0 + i as f32 * 25.0,
        );
    }
}
