//! Frame-driven simulation module
//!
//! All gameplay logic lives here and runs headless:
//! - One `advance` + `step` pair per frame, in that order
//! - Level randomness only through the generator's injected source
//! - Stable iteration order (generation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod levelgen;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{find_hazard, find_landing, within_radius};
pub use levelgen::{Chunk, LevelGenerator};
pub use state::{Enemy, EntityId, Platform, PlatformKind, PlayerBody};
pub use tick::{DeathCause, LandingEvent, PhysicsEngine, PlayerPose, StepOutcome};
pub use world::{AdvanceReport, StreamingWorld, WorldAccess};
