//! Contact tests between the player body and ground entities
//!
//! Everything here is 2D: lane (x) and depth (z). Height gating is the
//! caller's job. Platforms and sharks are circular zones.

use glam::Vec2;

use super::state::{Enemy, Platform};

/// Whether `point` lies strictly inside the circle at `center`
#[inline]
pub fn within_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Index of the first active platform under `point`.
///
/// First match in slice order, not nearest: generation order breaks ties.
pub fn find_landing(point: Vec2, platforms: &[Platform], radius: f32) -> Option<usize> {
    platforms
        .iter()
        .position(|p| p.active && within_radius(point, p.ground_pos(), radius))
}

/// The first active enemy close enough to bite
pub fn find_hazard<'a>(point: Vec2, enemies: &'a [Enemy], radius: f32) -> Option<&'a Enemy> {
    enemies
        .iter()
        .find(|e| e.active && within_radius(point, e.ground_pos(), radius))
}
