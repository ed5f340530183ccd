//! Per-frame physics step
//!
//! Advances the player body one frame against the streaming world:
//! motion of moving entities, integration, shark test, then ground test.
//! Shark contact is checked before landing, and landing side effects fire
//! before the bounce impulse is assigned.

use glam::Vec3;

use super::collision::{find_hazard, find_landing};
use super::state::{EntityId, Platform, PlatformKind, PlayerBody};
use super::world::WorldAccess;
use crate::lerp;
use crate::platform::SteeringInput;
use crate::tuning::Tuning;

/// Squash scale applied on every contact frame
const CONTACT_SQUASH: Vec3 = Vec3::new(1.4, 0.6, 1.4);
/// Rate at which the squash relaxes back to unit scale
const SQUASH_RECOVERY: f32 = 15.0;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Shark(EntityId),
    /// Missed every floe and sank below the waterline slack
    Drowned,
}

/// One-shot side effects of a discrete landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingEvent {
    pub platform: EntityId,
    pub kind: PlatformKind,
    /// Camera impact strength for the presentation layer
    pub impact: f32,
    /// A cracked platform gave way under this landing
    pub broke: bool,
}

/// Presentation-facing body state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    pub position: Vec3,
    /// Point the character should face (position plus horizontal velocity)
    pub facing_target: Vec3,
    pub squash: Vec3,
}

/// Result of a single `step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// True on exactly the frame the run ends
    pub died: bool,
    pub cause: Option<DeathCause>,
    pub depth: f32,
    pub landing: Option<LandingEvent>,
    pub pose: PlayerPose,
}

/// Owns the player body and steps it against the world
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    tuning: Tuning,
    body: PlayerBody,
    /// Seconds since the run began; drives patrol and oscillation
    elapsed: f32,
    sensitivity: f32,
    dead: bool,
}

impl PhysicsEngine {
    pub fn new(tuning: Tuning, sensitivity: f32) -> Self {
        let body = PlayerBody::new(&tuning);
        Self {
            tuning,
            body,
            elapsed: 0.0,
            sensitivity,
            dead: false,
        }
    }

    /// Start-of-run body and clock
    pub fn reset(&mut self) {
        self.body = PlayerBody::new(&self.tuning);
        self.elapsed = 0.0;
        self.dead = false;
    }

    pub fn body(&self) -> &PlayerBody {
        &self.body
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn depth(&self) -> f32 {
        self.body.depth()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    pub fn pose(&self) -> PlayerPose {
        let b = &self.body;
        PlayerPose {
            position: b.position,
            facing_target: b.position + Vec3::new(b.velocity.x, 0.0, b.velocity.z),
            squash: b.squash,
        }
    }

    /// Advance the body by `dt` seconds.
    ///
    /// After a death this is a no-op until [`PhysicsEngine::reset`].
    pub fn step(&mut self, dt: f32, steering: SteeringInput, world: WorldAccess<'_>) -> StepOutcome {
        if self.dead {
            return self.outcome(None, None);
        }

        let t = &self.tuning;
        self.elapsed += dt;
        for platform in world.platforms.iter_mut() {
            platform.update_motion(self.elapsed, t);
        }
        for enemy in world.enemies.iter_mut() {
            enemy.update_patrol(self.elapsed, t);
        }

        // --- Integration ---
        let body = &mut self.body;
        body.velocity.y += t.gravity * dt;

        let target = steering.as_vec2() * self.sensitivity * t.move_speed;
        let blend = body.control_factor * dt;
        body.velocity.x = lerp(body.velocity.x, target.x, blend);
        body.velocity.z = lerp(body.velocity.z, target.y + t.forward_bias, blend);

        body.position += body.velocity * dt;
        let ground = body.ground_pos();

        // --- Sharks ---
        if body.position.y < t.hazard_height {
            if let Some(shark) = find_hazard(ground, world.enemies, t.hazard_radius) {
                let cause = DeathCause::Shark(shark.id);
                return self.die(cause);
            }
        }

        // --- Floes ---
        let mut landing = None;
        if body.position.y <= 0.0 && body.velocity.y <= 0.0 {
            match find_landing(ground, world.platforms, t.platform_radius) {
                Some(index) => {
                    landing = land(body, &mut world.platforms[index], t);
                }
                None => {
                    if body.position.y < t.miss_slack {
                        return self.die(DeathCause::Drowned);
                    }
                }
            }
        } else if body.position.y > t.airborne_threshold {
            body.last_landed = None;
        }

        body.squash = body
            .squash
            .lerp(Vec3::ONE, (SQUASH_RECOVERY * dt).clamp(0.0, 1.0));

        self.outcome(None, landing)
    }

    fn die(&mut self, cause: DeathCause) -> StepOutcome {
        self.dead = true;
        log::info!(
            "Run ended at depth {:.1} after {:.1}s: {:?}",
            self.body.depth(),
            self.elapsed,
            cause
        );
        self.outcome(Some(cause), None)
    }

    fn outcome(&self, cause: Option<DeathCause>, landing: Option<LandingEvent>) -> StepOutcome {
        StepOutcome {
            died: cause.is_some(),
            cause,
            depth: self.body.depth(),
            landing,
            pose: self.pose(),
        }
    }
}

/// Resolve contact with `platform`.
///
/// One-shot effects only fire for a platform other than the one already
/// landed on; surface physics and the bounce apply on every contact frame.
fn land(body: &mut PlayerBody, platform: &mut Platform, t: &Tuning) -> Option<LandingEvent> {
    body.position.y = 0.0;

    let mut event = None;
    if body.last_landed != Some(platform.id) {
        body.last_landed = Some(platform.id);
        let broke = platform.crack();
        log::trace!(
            "Landed on {:?} {:?} at depth {:.1}{}",
            platform.kind,
            platform.id,
            platform.z,
            if broke { " (broke)" } else { "" }
        );
        event = Some(LandingEvent {
            platform: platform.id,
            kind: platform.kind,
            impact: platform.kind.impact(),
            broke,
        });
    }

    if platform.kind == PlatformKind::Slippery {
        body.control_factor = t.slippery_control;
        body.velocity.x *= t.slippery_boost;
    } else {
        body.control_factor = t.air_control;
    }

    // Fixed impulse every time: the jump never wears out
    body.velocity.y = match platform.kind {
        PlatformKind::SuperBounce => {
            body.control_factor = t.air_control * t.super_bounce_control_scale;
            t.super_bounce_impulse
        }
        PlatformKind::Slippery => t.jump_impulse * t.slippery_jump_scale,
        _ => t.jump_impulse,
    };

    body.squash = CONTACT_SQUASH;
    event
}
