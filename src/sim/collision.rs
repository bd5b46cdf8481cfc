//! Character vs obstacle geometry
//!
//! Collision and scoring use separate tests and never share results.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::*;

/// Centre of the character for a given height
#[inline]
pub fn character_center(y: f32) -> Vec2 {
    Vec2::new(CHARACTER_X, y)
}

/// Horizontal extents overlap (open intervals, touching does not count)
#[inline]
pub fn overlaps_horizontally(center: Vec2, obstacle: &Obstacle) -> bool {
    center.x + CHARACTER_HALF > obstacle.x && center.x - CHARACTER_HALF < obstacle.right_edge()
}

/// Some part of the character is above the gap top or below the gap bottom
#[inline]
pub fn outside_gap(center: Vec2, obstacle: &Obstacle) -> bool {
    center.y - CHARACTER_HALF < obstacle.gap_top || center.y + CHARACTER_HALF > obstacle.gap_bottom
}

/// Character at height `y` touches the solid part of `obstacle`
pub fn hits_obstacle(y: f32, obstacle: &Obstacle) -> bool {
    let center = character_center(y);
    overlaps_horizontally(center, obstacle) && outside_gap(center, obstacle)
}

/// Obstacle's right edge is left of the character's centre
#[inline]
pub fn is_cleared(obstacle: &Obstacle) -> bool {
    obstacle.right_edge() < CHARACTER_X
}
