//! Data-driven physics and generation constants
//!
//! Every number the engine and generator read comes from here, so balance
//! changes never touch engine logic. Defaults mirror [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::PlatformKind;

/// What a single lane cell of a generated row becomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellOutcome {
    /// Open water (no collidable platform)
    Gap,
    Platform(PlatformKind),
}

/// One band of the outcome table: draws below `upper` (and at or above the
/// previous band's bound) map to `outcome`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeBand {
    pub upper: f32,
    pub outcome: CellOutcome,
}

impl OutcomeBand {
    pub const fn new(upper: f32, outcome: CellOutcome) -> Self {
        Self { upper, outcome }
    }
}

/// Default band layout: half standard ice, a fifth open water
pub fn default_outcomes() -> Vec<OutcomeBand> {
    use CellOutcome::*;
    vec![
        OutcomeBand::new(0.50, Platform(PlatformKind::Standard)),
        OutcomeBand::new(0.60, Platform(PlatformKind::Slippery)),
        OutcomeBand::new(0.70, Platform(PlatformKind::Cracked)),
        OutcomeBand::new(0.75, Platform(PlatformKind::SuperBounce)),
        OutcomeBand::new(0.80, Platform(PlatformKind::Moving)),
        OutcomeBand::new(1.00, Gap),
    ]
}

/// Complete tuning surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    pub gravity: f32,
    pub jump_impulse: f32,
    pub super_bounce_impulse: f32,
    pub move_speed: f32,
    pub air_control: f32,
    pub slippery_control: f32,
    /// Horizontal velocity multiplier applied every slippery contact frame
    pub slippery_boost: f32,
    pub slippery_jump_scale: f32,
    pub super_bounce_control_scale: f32,
    pub forward_bias: f32,
    pub start_height: f32,

    // === Contact ===
    pub platform_radius: f32,
    pub hazard_radius: f32,
    /// Sharks can only bite below this height
    pub hazard_height: f32,
    /// How far below the waterline a missed landing may sink before death
    pub miss_slack: f32,
    pub airborne_threshold: f32,

    // === Generation ===
    pub lane_count: u32,
    pub row_spacing: f32,
    pub rows_per_chunk: u32,
    pub initial_rows: u32,
    pub hazard_row_chance: f32,
    pub outcomes: Vec<OutcomeBand>,

    // === Streaming ===
    pub lookahead: f32,
    pub trailing: f32,

    // === Motion ===
    pub patrol_range: f32,
    pub patrol_frequency: f32,
    pub moving_range: f32,
    pub moving_frequency: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            super_bounce_impulse: SUPER_BOUNCE_IMPULSE,
            move_speed: MOVE_SPEED,
            air_control: AIR_CONTROL,
            slippery_control: SLIPPERY_CONTROL,
            slippery_boost: SLIPPERY_BOOST,
            slippery_jump_scale: SLIPPERY_JUMP_SCALE,
            super_bounce_control_scale: SUPER_BOUNCE_CONTROL_SCALE,
            forward_bias: FORWARD_BIAS,
            start_height: START_HEIGHT,

            platform_radius: PLATFORM_RADIUS,
            hazard_radius: HAZARD_RADIUS,
            hazard_height: HAZARD_HEIGHT,
            miss_slack: MISS_SLACK,
            airborne_threshold: AIRBORNE_THRESHOLD,

            lane_count: LANE_COUNT,
            row_spacing: ROW_SPACING,
            rows_per_chunk: ROWS_PER_CHUNK,
            initial_rows: INITIAL_ROWS,
            hazard_row_chance: HAZARD_ROW_CHANCE,
            outcomes: default_outcomes(),

            lookahead: LOOKAHEAD,
            trailing: TRAILING,

            patrol_range: PATROL_RANGE,
            patrol_frequency: PATROL_FREQUENCY,
            moving_range: MOVING_RANGE,
            moving_frequency: MOVING_FREQUENCY,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning file (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural invariants the generator and engine rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 || self.lane_count % 2 == 0 {
            return Err(ConfigError::InvalidLaneCount(self.lane_count));
        }

        let positive = [
            ("row_spacing", self.row_spacing),
            ("rows_per_chunk", self.rows_per_chunk as f32),
            ("initial_rows", self.initial_rows as f32),
            ("platform_radius", self.platform_radius),
            ("hazard_radius", self.hazard_radius),
            ("jump_impulse", self.jump_impulse),
            ("super_bounce_impulse", self.super_bounce_impulse),
            ("move_speed", self.move_speed),
            ("air_control", self.air_control),
            ("slippery_control", self.slippery_control),
            ("lookahead", self.lookahead),
            ("trailing", self.trailing),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.hazard_row_chance) {
            return Err(ConfigError::OutOfRange {
                field: "hazard_row_chance",
                value: self.hazard_row_chance,
                min: 0.0,
                max: 1.0,
            });
        }
        // Gravity must pull down or the body never comes back
        if !(self.gravity < 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "gravity",
                value: self.gravity,
                min: f32::NEG_INFINITY,
                max: 0.0,
            });
        }

        self.validate_outcomes()
    }

    fn validate_outcomes(&self) -> Result<(), ConfigError> {
        let Some(last) = self.outcomes.last() else {
            return Err(ConfigError::EmptyOutcomes);
        };

        let mut previous = 0.0;
        for (index, band) in self.outcomes.iter().enumerate() {
            if !(band.upper > previous) {
                return Err(ConfigError::OutcomesNotAscending {
                    index,
                    bound: band.upper,
                });
            }
            previous = band.upper;
        }

        if last.upper != 1.0 {
            return Err(ConfigError::OutcomesNotExhaustive(last.upper));
        }
        Ok(())
    }

    /// Map a uniform draw in [0, 1) through the outcome table
    pub fn outcome_for(&self, draw: f32) -> CellOutcome {
        self.outcomes
            .iter()
            .find(|band| draw < band.upper)
            .or(self.outcomes.last())
            .map(|band| band.outcome)
            .unwrap_or(CellOutcome::Gap)
    }

    /// Index of the center lane
    #[inline]
    pub fn center_lane(&self) -> u32 {
        self.lane_count / 2
    }

    /// World-space x of a lane index
    #[inline]
    pub fn lane_x(&self, lane: u32) -> f32 {
        (lane as f32 - self.center_lane() as f32) * self.row_spacing
    }

    /// Depth covered by one chunk
    #[inline]
    pub fn chunk_depth(&self) -> f32 {
        self.rows_per_chunk as f32 * self.row_spacing
    }
}
