//! Entity and body types for the simulation
//!
//! Platforms and enemies are plain data owned by the streaming world; the
//! physics engine only flips their flags and recomputes their lane position.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::phase_for_id;
use crate::tuning::Tuning;

/// Stable entity identifier, unique across platforms and enemies for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Platform surface types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Standard,
    /// Survives one landing, breaks on the second
    Cracked,
    /// Low traction, reduced bounce
    Slippery,
    /// Oscillates sideways around its spawn lane
    Moving,
    /// Large launch impulse
    SuperBounce,
}

impl PlatformKind {
    /// Strength of the one-shot impact signal sent to the presentation layer
    pub fn impact(&self) -> f32 {
        match self {
            PlatformKind::SuperBounce => 0.8,
            _ => 0.3,
        }
    }
}

/// A landing platform (ice floe)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub x: f32,
    pub z: f32,
    pub kind: PlatformKind,
    /// False once the platform can no longer be landed on
    pub active: bool,
    /// Cracked only: the first landing already happened
    pub stepped_on: bool,
    /// Oscillation anchor for moving platforms
    pub initial_x: f32,
    /// Per-entity motion phase in [0, TAU)
    pub phase: f32,
}

impl Platform {
    pub fn new(id: EntityId, x: f32, z: f32, kind: PlatformKind) -> Self {
        Self {
            id,
            x,
            z,
            kind,
            active: true,
            stepped_on: false,
            initial_x: x,
            phase: phase_for_id(id.0),
        }
    }

    /// Recompute lane position for moving platforms at elapsed time `t`
    pub fn update_motion(&mut self, t: f32, tuning: &Tuning) {
        if self.kind == PlatformKind::Moving {
            self.x = self.initial_x
                + (t * tuning.moving_frequency + self.phase).sin() * tuning.moving_range;
        }
    }

    /// Apply the cracked-ice transition for a new landing.
    /// Returns true if the platform broke.
    pub fn crack(&mut self) -> bool {
        if self.kind != PlatformKind::Cracked || !self.active {
            return false;
        }
        if self.stepped_on {
            self.active = false;
            true
        } else {
            self.stepped_on = true;
            false
        }
    }

    /// Horizontal (lane, depth) position
    #[inline]
    pub fn ground_pos(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// A patrolling shark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub x: f32,
    pub z: f32,
    pub active: bool,
    /// Center of the patrol sweep
    pub anchor_x: f32,
    pub phase: f32,
}

impl Enemy {
    pub fn new(id: EntityId, x: f32, z: f32) -> Self {
        Self {
            id,
            x,
            z,
            active: true,
            anchor_x: x,
            phase: phase_for_id(id.0),
        }
    }

    /// Recompute patrol position at elapsed time `t`
    pub fn update_patrol(&mut self, t: f32, tuning: &Tuning) {
        self.x =
            self.anchor_x + (t * tuning.patrol_frequency + self.phase).sin() * tuning.patrol_range;
    }

    #[inline]
    pub fn ground_pos(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// The single simulated actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Steering responsiveness, set by the last surface touched
    pub control_factor: f32,
    /// Platform whose landing side effects already fired for the current contact
    pub last_landed: Option<EntityId>,
    /// Cosmetic squash scale (not gameplay-affecting)
    #[serde(skip, default = "unit_scale")]
    pub squash: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl PlayerBody {
    /// Start-of-run body: above the first platform, launched upward
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: Vec3::new(0.0, tuning.start_height, 0.0),
            velocity: Vec3::new(0.0, tuning.jump_impulse, 0.0),
            control_factor: tuning.air_control,
            last_landed: None,
            squash: Vec3::ONE,
        }
    }

    /// Horizontal (lane, depth) position
    #[inline]
    pub fn ground_pos(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Distance traveled into the level
    #[inline]
    pub fn depth(&self) -> f32 {
        self.position.z
    }
}
