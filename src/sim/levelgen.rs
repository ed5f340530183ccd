//! Procedural level generation
//!
//! Rows of lane cells are produced a chunk at a time ahead of the player.
//! Draw order is fixed: rows outer, lanes inner (left to right), and every
//! lane draw of a row comes before that row's hazard draw. Feeding the same
//! sequence of draws always yields the same chunk.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{EntityId, Enemy, Platform, PlatformKind};
use crate::error::SimError;
use crate::tuning::{CellOutcome, Tuning};

/// Entities produced by one generation call
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
}

/// Convert the high 24 bits of a raw draw into [0, 1)
#[inline]
pub fn unit_from_bits(bits: u32) -> f32 {
    (bits >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Chunked level generator with a session-wide id counter
#[derive(Debug, Clone)]
pub struct LevelGenerator<R = Pcg32> {
    tuning: Tuning,
    rng: R,
    /// Next entity id, shared by platforms and enemies
    next_id: u32,
    /// Depth of the first row not yet generated
    next_row_depth: f32,
}

impl LevelGenerator<Pcg32> {
    /// Generator backed by a seeded PCG stream
    pub fn from_seed(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RngCore> LevelGenerator<R> {
    pub fn new(tuning: Tuning, rng: R) -> Self {
        Self {
            tuning,
            rng,
            next_id: 0,
            next_row_depth: 0.0,
        }
    }

    /// Depth of the last generated row that already has a generated successor
    pub fn frontier(&self) -> f32 {
        self.next_row_depth - 2.0 * self.tuning.row_spacing
    }

    /// Where the next chunk should start so rows neither overlap nor skip
    pub fn next_row_depth(&self) -> f32 {
        self.next_row_depth
    }

    /// Allocate a new entity id
    fn next_entity_id(&mut self) -> Result<EntityId, SimError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(SimError::IdsExhausted(id))?;
        Ok(EntityId(id))
    }

    fn draw(&mut self) -> f32 {
        unit_from_bits(self.rng.next_u32())
    }

    /// Safe start: a short run of standard platforms down the center lane
    pub fn generate_initial_segment(&mut self) -> Result<Chunk, SimError> {
        let mut chunk = Chunk::default();
        let x = self.tuning.lane_x(self.tuning.center_lane());

        for row in 0..self.tuning.initial_rows {
            let z = row as f32 * self.tuning.row_spacing;
            let id = self.next_entity_id()?;
            chunk
                .platforms
                .push(Platform::new(id, x, z, PlatformKind::Standard));
        }

        self.next_row_depth = self.tuning.initial_rows as f32 * self.tuning.row_spacing;
        log::debug!(
            "Initial segment: {} platforms, frontier {:.1}",
            chunk.platforms.len(),
            self.frontier()
        );
        Ok(chunk)
    }

    /// Generate `rows_per_chunk` rows beginning at `start_depth`
    pub fn generate_chunk(&mut self, start_depth: f32) -> Result<Chunk, SimError> {
        let mut chunk = Chunk::default();
        let spacing = self.tuning.row_spacing;
        let center = self.tuning.center_lane();
        let mut gaps: Vec<f32> = Vec::with_capacity(self.tuning.lane_count as usize);

        for row in 0..self.tuning.rows_per_chunk {
            let z = start_depth + row as f32 * spacing;
            let mut has_platform_in_row = false;
            gaps.clear();

            for lane in 0..self.tuning.lane_count {
                let x = self.tuning.lane_x(lane);
                let draw = self.draw();
                let mut outcome = self.tuning.outcome_for(draw);

                // Every row keeps at least one floe
                if lane == center && !has_platform_in_row && outcome == CellOutcome::Gap {
                    outcome = CellOutcome::Platform(PlatformKind::Standard);
                }

                match outcome {
                    CellOutcome::Platform(kind) => {
                        has_platform_in_row = true;
                        let id = self.next_entity_id()?;
                        chunk.platforms.push(Platform::new(id, x, z, kind));
                    }
                    CellOutcome::Gap => gaps.push(x),
                }
            }

            let hazard_row = self.draw() < self.tuning.hazard_row_chance;
            if hazard_row {
                for &x in &gaps {
                    if x.abs() <= spacing {
                        let id = self.next_entity_id()?;
                        chunk.enemies.push(Enemy::new(id, x, z));
                    }
                }
            }
        }

        self.next_row_depth = start_depth + self.tuning.chunk_depth();
        log::debug!(
            "Chunk at {:.1}: {} platforms, {} sharks, frontier {:.1}",
            start_depth,
            chunk.platforms.len(),
            chunk.enemies.len(),
            self.frontier()
        );
        Ok(chunk)
    }

    #[cfg(test)]
    pub(crate) fn set_next_id(&mut self, id: u32) {
        self.next_id = id;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::RngCore;
    use std::collections::{HashSet, VecDeque};

    /// Replays a fixed list of unit draws, then falls back to 0.0
    pub(crate) struct ScriptedRng(pub VecDeque<f32>);

    impl ScriptedRng {
        pub(crate) fn new(draws: &[f32]) -> Self {
            Self(draws.iter().copied().collect())
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            let unit = self.0.pop_front().unwrap_or(0.0);
            ((unit * 16_777_216.0) as u32) << 8
        }

        fn next_u64(&mut self) -> u64 {
            self.next_u32() as u64
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }

    fn small_tuning() -> Tuning {
        Tuning {
            rows_per_chunk: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_unit_from_bits_range() {
        assert_eq!(unit_from_bits(0), 0.0);
        assert!(unit_from_bits(u32::MAX) < 1.0);
    }

    #[test]
    fn test_initial_segment() {
        let mut generator = LevelGenerator::from_seed(Tuning::default(), 1);
        let chunk = generator.generate_initial_segment().unwrap();

        let depths: Vec<f32> = chunk.platforms.iter().map(|p| p.z).collect();
        assert_eq!(depths, vec![0.0, 3.5, 7.0, 10.5, 14.0]);
        assert!(chunk.enemies.is_empty());
        for platform in &chunk.platforms {
            assert_eq!(platform.x, 0.0);
            assert_eq!(platform.kind, PlatformKind::Standard);
            assert!(platform.active);
        }
        assert_eq!(generator.frontier(), 10.5);
        assert_eq!(generator.next_row_depth(), 17.5);
    }

    #[test]
    fn test_frontier_advances_by_one_chunk() {
        let mut generator = LevelGenerator::from_seed(Tuning::default(), 7);
        generator.generate_initial_segment().unwrap();
        let before = generator.frontier();
        let start = generator.next_row_depth();
        let chunk = generator.generate_chunk(start).unwrap();

        assert_eq!(generator.frontier(), before + 35.0);
        let min_z = chunk.platforms.iter().map(|p| p.z).fold(f32::MAX, f32::min);
        assert_eq!(min_z, 17.5);
    }

    #[test]
    fn test_center_lane_forced_when_row_empty() {
        // Lanes 0 and 1 are gaps, center draw is a gap too -> forced standard
        let rng = ScriptedRng::new(&[0.9, 0.9, 0.9, 0.9, 0.9, 0.99]);
        let mut generator = LevelGenerator::new(small_tuning(), rng);
        let chunk = generator.generate_chunk(20.0).unwrap();

        assert_eq!(chunk.platforms.len(), 1);
        assert_eq!(chunk.platforms[0].x, 0.0);
        assert_eq!(chunk.platforms[0].kind, PlatformKind::Standard);
        assert!(chunk.enemies.is_empty());
    }

    #[test]
    fn test_center_gap_allowed_after_earlier_platform() {
        // Lane 0 produces a floe, so the center may stay open
        let rng = ScriptedRng::new(&[0.1, 0.9, 0.9, 0.9, 0.9, 0.99]);
        let mut generator = LevelGenerator::new(small_tuning(), rng);
        let chunk = generator.generate_chunk(20.0).unwrap();

        assert_eq!(chunk.platforms.len(), 1);
        assert_eq!(chunk.platforms[0].x, -7.0);
    }

    #[test]
    fn test_hazard_row_places_sharks_near_center_gaps() {
        // Lanes: standard, gap, gap (center, but lane 0 already active), gap, gap
        // Hazard draw 0.1 < 0.3 -> hazard row
        let rng = ScriptedRng::new(&[0.1, 0.9, 0.9, 0.9, 0.9, 0.1]);
        let mut generator = LevelGenerator::new(small_tuning(), rng);
        let chunk = generator.generate_chunk(20.0).unwrap();

        let shark_lanes: Vec<f32> = chunk.enemies.iter().map(|e| e.x).collect();
        assert_eq!(shark_lanes, vec![-3.5, 0.0, 3.5]);
        for enemy in &chunk.enemies {
            assert_eq!(enemy.z, 20.0);
            assert_eq!(enemy.anchor_x, enemy.x);
        }
    }

    #[test]
    fn test_outcome_kinds_follow_table() {
        let rng = ScriptedRng::new(&[0.55, 0.65, 0.72, 0.78, 0.2, 0.5]);
        let mut generator = LevelGenerator::new(small_tuning(), rng);
        let chunk = generator.generate_chunk(0.0).unwrap();

        let kinds: Vec<PlatformKind> = chunk.platforms.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PlatformKind::Slippery,
                PlatformKind::Cracked,
                PlatformKind::SuperBounce,
                PlatformKind::Moving,
                PlatformKind::Standard,
            ]
        );
        let moving = &chunk.platforms[3];
        assert_eq!(moving.initial_x, moving.x);
    }

    #[test]
    fn test_id_exhaustion_is_reported() {
        let mut generator = LevelGenerator::from_seed(Tuning::default(), 3);
        generator.set_next_id(u32::MAX - 1);
        assert_eq!(
            generator.generate_initial_segment().unwrap_err(),
            SimError::IdsExhausted(u32::MAX)
        );
    }

    fn generate_many(seed: u64, chunks: usize) -> Vec<Chunk> {
        let mut generator = LevelGenerator::from_seed(Tuning::default(), seed);
        let mut out = vec![generator.generate_initial_segment().unwrap()];
        for _ in 0..chunks {
            let start = generator.next_row_depth();
            out.push(generator.generate_chunk(start).unwrap());
        }
        out
    }

    proptest! {
        #[test]
        fn prop_every_row_has_an_active_platform(seed in any::<u64>()) {
            let tuning = Tuning::default();
            for chunk in generate_many(seed, 4).iter().skip(1) {
                let rows: HashSet<i64> = chunk
                    .platforms
                    .iter()
                    .filter(|p| p.active)
                    .map(|p| (p.z / tuning.row_spacing).round() as i64)
                    .collect();
                prop_assert_eq!(rows.len(), tuning.rows_per_chunk as usize);
            }
        }

        #[test]
        fn prop_ids_unique_across_pools(seed in any::<u64>()) {
            let mut seen = HashSet::new();
            for chunk in generate_many(seed, 4) {
                for id in chunk.platforms.iter().map(|p| p.id).chain(chunk.enemies.iter().map(|e| e.id)) {
                    prop_assert!(seen.insert(id));
                }
            }
        }

        #[test]
        fn prop_no_shark_on_a_floe(seed in any::<u64>()) {
            for chunk in generate_many(seed, 4) {
                for enemy in &chunk.enemies {
                    let occupied = chunk
                        .platforms
                        .iter()
                        .any(|p| p.active && p.x == enemy.x && p.z == enemy.z);
                    prop_assert!(!occupied);
                    prop_assert!(enemy.x.abs() <= Tuning::default().row_spacing);
                }
            }
        }

        #[test]
        fn prop_same_seed_same_level(seed in any::<u64>()) {
            let a = generate_many(seed, 2);
            let b = generate_many(seed, 2);
            for (ca, cb) in a.iter().zip(&b) {
                prop_assert_eq!(ca.platforms.len(), cb.platforms.len());
                prop_assert_eq!(ca.enemies.len(), cb.enemies.len());
                for (pa, pb) in ca.platforms.iter().zip(&cb.platforms) {
                    prop_assert_eq!(pa.kind, pb.kind);
                    prop_assert_eq!(pa.x, pb.x);
                }
            }
        }
    }
}
