//! Platform abstraction layer
//!
//! Raw device events (tilt, pointer, keys) are fed in by whatever host drives
//! the game; the simulation only ever sees a normalized [`SteeringInput`].

pub mod input;

pub use input::{
    Direction, InputNormalizer, MAX_TILT_DEGREES, Orientation, POINTER_RADIUS_FRACTION, SharedInput,
    SteeringInput,
};
