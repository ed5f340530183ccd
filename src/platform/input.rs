//! Steering input normalization
//!
//! Three raw sources feed one clamped 2-axis steering vector:
//! - Device tilt, once the device has reported a real orientation sample
//! - Pointer offset from the viewport center (non-tilt devices only)
//! - Directional keys, always added on top
//!
//! The combined vector never exceeds unit length.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tilt (degrees) that maps to full deflection
pub const MAX_TILT_DEGREES: f32 = 25.0;
/// Fraction of viewport height that maps to full pointer deflection
pub const POINTER_RADIUS_FRACTION: f32 = 0.25;

/// Normalized steering: x is lane, z is forward. Magnitude is at most 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SteeringInput {
    pub x: f32,
    pub z: f32,
}

impl SteeringInput {
    pub const NEUTRAL: Self = Self { x: 0.0, z: 0.0 };

    /// Build from raw axes, rescaling onto the unit circle if longer than 1
    pub fn new(x: f32, z: f32) -> Self {
        let v = Vec2::new(x, z);
        let len = v.length();
        if len > 1.0 {
            let v = v / len;
            Self { x: v.x, z: v.y }
        } else {
            Self { x, z }
        }
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.as_vec2().length()
    }
}

/// Device orientation sample in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Front/back tilt
    pub beta: f32,
    /// Left/right tilt
    pub gamma: f32,
}

/// Directional keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a DOM-style key code (`ArrowUp`, `KeyW`, ...)
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(Direction::Up),
            "ArrowDown" | "KeyS" => Some(Direction::Down),
            "ArrowLeft" | "KeyA" => Some(Direction::Left),
            "ArrowRight" | "KeyD" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Steering contribution of a held key.
    ///
    /// Left/right are intentionally swapped: Left steers toward +x.
    fn contribution(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, 1.0),
            Direction::Down => Vec2::new(0.0, -1.0),
            Direction::Left => Vec2::new(1.0, 0.0),
            Direction::Right => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Handle shared by the event feeder and the session
pub type SharedInput = Rc<RefCell<InputNormalizer>>;

/// Combines raw steering sources into a [`SteeringInput`]
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    viewport: Vec2,
    pointer: Vec2,
    /// Pointer moved on a non-tilt device
    use_pointer: bool,
    /// A real orientation sample has been seen this session
    tilt_capable: bool,
    orientation: Option<Orientation>,
    baseline: Orientation,
    keys: HashSet<Direction>,
}

impl InputNormalizer {
    pub fn new(width: f32, height: f32) -> Self {
        let viewport = Vec2::new(width, height);
        Self {
            viewport,
            pointer: viewport / 2.0,
            use_pointer: false,
            tilt_capable: false,
            orientation: None,
            baseline: Orientation::default(),
            keys: HashSet::with_capacity(4),
        }
    }

    pub fn shared(width: f32, height: f32) -> SharedInput {
        Rc::new(RefCell::new(Self::new(width, height)))
    }

    // === Raw events ===

    /// Orientation event. Empty samples (some laptops send them) are ignored.
    pub fn orientation(&mut self, sample: Option<Orientation>) {
        if let Some(sample) = sample {
            if !self.tilt_capable {
                log::info!("Tilt input detected, switching to device orientation");
            }
            self.tilt_capable = true;
            self.use_pointer = false;
            self.orientation = Some(sample);
        }
    }

    /// The orientation source went away; fall back to pointer and keys
    pub fn orientation_lost(&mut self) {
        if self.orientation.take().is_some() {
            log::warn!("Orientation source lost, falling back to pointer/keys");
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
        // A tilt device only hands control back once its sensor goes away
        if !self.tilt_capable || self.orientation.is_none() {
            self.use_pointer = true;
        }
    }

    /// Pointer left the window: park it at the center so it stops steering
    pub fn pointer_left(&mut self) {
        self.pointer = self.center();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn key_down(&mut self, key: Direction) {
        self.keys.insert(key);
    }

    pub fn key_up(&mut self, key: Direction) {
        self.keys.remove(&key);
    }

    // === Session hooks ===

    /// Capture the current tilt as neutral and recenter the pointer
    pub fn calibrate(&mut self) {
        if let Some(sample) = self.orientation {
            self.baseline = sample;
        }
        self.pointer = self.center();
        log::debug!("Input calibrated (baseline {:?})", self.baseline);
    }

    /// Current steering vector
    pub fn sample(&self) -> SteeringInput {
        let mut steer = match self.orientation {
            Some(sample) if self.tilt_capable => self.tilt_axes(sample),
            _ if self.use_pointer => self.pointer_axes(),
            _ => Vec2::ZERO,
        };

        for key in &self.keys {
            steer += key.contribution();
        }

        SteeringInput::new(steer.x, steer.y)
    }

    pub fn is_tilt_capable(&self) -> bool {
        self.tilt_capable
    }

    fn center(&self) -> Vec2 {
        self.viewport / 2.0
    }

    fn tilt_axes(&self, sample: Orientation) -> Vec2 {
        let x = (sample.gamma - self.baseline.gamma).clamp(-MAX_TILT_DEGREES, MAX_TILT_DEGREES);
        let z = (sample.beta - self.baseline.beta).clamp(-MAX_TILT_DEGREES, MAX_TILT_DEGREES);
        Vec2::new(x, z) / MAX_TILT_DEGREES
    }

    fn pointer_axes(&self) -> Vec2 {
        let radius = self.viewport.y * POINTER_RADIUS_FRACTION;
        if radius <= 0.0 {
            return Vec2::ZERO;
        }
        let delta = self.pointer - self.center();
        // Screen y grows downward; pointer up means forward
        Vec2::new(
            (delta.x / radius).clamp(-1.0, 1.0),
            (-delta.y / radius).clamp(-1.0, 1.0),
        )
    }
}
