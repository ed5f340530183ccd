//! Floe Hop - an endless ice-floe hopper
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (level streaming, physics, collisions)
//! - `platform`: Steering input normalization
//! - `session`: Menu / playing / game-over glue and score bookkeeping
//! - `tuning`: Data-driven physics and generation constants
//! - `settings`: Player preferences

pub mod error;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SimError};
pub use session::{FrameReport, ScoreState, Session, SessionPhase};
pub use settings::Settings;
pub use tuning::Tuning;

/// Default gameplay constants (see [`Tuning`] for the runtime surface)
pub mod consts {
    /// Fixed frame step used by the headless runner
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Physics
    pub const GRAVITY: f32 = -25.0;
    pub const JUMP_IMPULSE: f32 = 13.0;
    pub const SUPER_BOUNCE_IMPULSE: f32 = 22.0;
    pub const MOVE_SPEED: f32 = 10.0;
    /// Snappy control on standard ground and in the air
    pub const AIR_CONTROL: f32 = 5.0;
    /// Drifting control after leaving slippery ice
    pub const SLIPPERY_CONTROL: f32 = 0.5;
    pub const SLIPPERY_BOOST: f32 = 1.02;
    pub const SLIPPERY_JUMP_SCALE: f32 = 0.8;
    pub const SUPER_BOUNCE_CONTROL_SCALE: f32 = 0.5;
    /// Forward drift so the player advances with neutral input
    pub const FORWARD_BIAS: f32 = 2.0;

    /// Contact thresholds
    pub const PLATFORM_RADIUS: f32 = 1.2;
    pub const HAZARD_RADIUS: f32 = 1.0;
    pub const HAZARD_HEIGHT: f32 = 1.0;
    pub const MISS_SLACK: f32 = -0.5;
    pub const AIRBORNE_THRESHOLD: f32 = 0.1;

    /// World grid
    pub const ROW_SPACING: f32 = 3.5;
    pub const LANE_COUNT: u32 = 5;
    pub const ROWS_PER_CHUNK: u32 = 10;
    pub const INITIAL_ROWS: u32 = 5;
    pub const HAZARD_ROW_CHANCE: f32 = 0.3;

    /// Streaming window
    pub const LOOKAHEAD: f32 = 40.0;
    pub const TRAILING: f32 = 25.0;

    /// Motion
    pub const PATROL_RANGE: f32 = 3.0;
    pub const PATROL_FREQUENCY: f32 = 2.0;
    pub const MOVING_RANGE: f32 = 1.5;
    pub const MOVING_FREQUENCY: f32 = 1.5;

    /// Player start
    pub const START_HEIGHT: f32 = 2.0;
}

/// Linear interpolation with the blend factor clamped to [0, 1]
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Map an entity id to a stable animation phase in [0, TAU)
#[inline]
pub fn phase_for_id(id: u32) -> f32 {
    // Golden ratio hash spreads consecutive ids across the circle
    let hash = id.wrapping_mul(2654435761) ^ (id >> 16);
    (hash % 10_000) as f32 / 10_000.0 * std::f32::consts::TAU
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps_factor() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(4.0, 10.0, -1.0), 4.0);
    }

    #[test]
    fn test_phase_in_range_and_stable() {
        for id in [0, 1, 2, 17, 999, u32::MAX] {
            let phase = phase_for_id(id);
            assert!((0.0..std::f32::consts::TAU).contains(&phase));
            assert_eq!(phase, phase_for_id(id));
        }
        assert_ne!(phase_for_id(1), phase_for_id(2));
    }
}
