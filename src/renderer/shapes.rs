//! Shape drawing for the dust character and obstacles

use std::f32::consts::PI;

use glam::Vec2;

use crate::consts::*;
use crate::platform::Surface;
use crate::sim::{Character, Obstacle};

const BODY_COLOR: &str = "#AAAAAA";
const FACE_COLOR: &str = "black";
const OBSTACLE_COLOR: &str = "green";

const EYES: [Vec2; 2] = [Vec2::new(-6.0, -4.0), Vec2::new(6.0, -4.0)];
const EYE_RADIUS: f32 = 3.0;

/// Draw the dust: grey body, two eyes, and a mouth that smiles while rising
/// and gapes while falling. Tilts with velocity.
pub fn dust(surface: &mut dyn Surface, character: &Character) {
    surface.save();
    surface.translate(CHARACTER_X, character.y);
    surface.rotate(character.tilt());

    surface.set_fill_style(BODY_COLOR);
    surface.fill_circle(0.0, 0.0, CHARACTER_HALF);

    surface.set_fill_style(FACE_COLOR);
    for eye in EYES {
        surface.fill_circle(eye.x, eye.y, EYE_RADIUS);
    }

    surface.set_stroke_style(FACE_COLOR);
    surface.set_line_width(2.0);
    if character.vel < 0.0 {
        surface.stroke_arc(0.0, 4.0, 6.0, 0.0, PI, false);
    } else {
        surface.stroke_arc(0.0, 6.0, 4.0, 0.0, PI, true);
    }

    surface.restore();
}

/// Two filled columns above and below the gap
pub fn obstacle(surface: &mut dyn Surface, obstacle: &Obstacle) {
    let height = surface.height();
    surface.set_fill_style(OBSTACLE_COLOR);
    surface.fill_rect(obstacle.x, 0.0, OBSTACLE_WIDTH, obstacle.gap_top);
    surface.fill_rect(
        obstacle.x,
        obstacle.gap_bottom,
        OBSTACLE_WIDTH,
        height - obstacle.gap_bottom,
    );
}
