//! Streaming world state
//!
//! Owns the live platform and shark sets. Chunks are generated ahead of the
//! player and entities are retired once they fall behind. Nothing else adds
//! or removes entities; the physics engine gets field-level access only.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::levelgen::{Chunk, LevelGenerator};
use super::state::{Enemy, Platform};
use crate::error::SimError;
use crate::tuning::Tuning;

/// Field-level access to the live sets for one physics step.
///
/// Slices allow mutating entity fields but never resizing or reordering.
pub struct WorldAccess<'a> {
    pub platforms: &'a mut [Platform],
    pub enemies: &'a mut [Enemy],
}

/// What one `advance` call changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub chunk_generated: bool,
    pub retired: usize,
}

/// Windowed collection of platforms and sharks around the player
#[derive(Debug, Clone)]
pub struct StreamingWorld<R = Pcg32> {
    tuning: Tuning,
    generator: LevelGenerator<R>,
    /// Physics-facing set: active entities within range
    platforms: Vec<Platform>,
    enemies: Vec<Enemy>,
    /// Broken platforms kept for presentation until they fall out of range
    fading: Vec<Platform>,
}

impl StreamingWorld<Pcg32> {
    pub fn from_seed(tuning: Tuning, seed: u64) -> Result<Self, SimError> {
        Self::new(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RngCore> StreamingWorld<R> {
    /// Fresh world holding only the safe starting run
    pub fn new(tuning: Tuning, rng: R) -> Result<Self, SimError> {
        let mut generator = LevelGenerator::new(tuning.clone(), rng);
        let Chunk { platforms, enemies } = generator.generate_initial_segment()?;
        Ok(Self {
            tuning,
            generator,
            platforms,
            enemies,
            fading: Vec::new(),
        })
    }

    /// Generate ahead of and retire behind `player_depth`
    pub fn advance(&mut self, player_depth: f32) -> Result<AdvanceReport, SimError> {
        let mut report = AdvanceReport::default();

        if player_depth + self.tuning.lookahead > self.generator.frontier() {
            let start = self.generator.next_row_depth();
            let chunk = self.generator.generate_chunk(start)?;
            self.platforms.extend(chunk.platforms);
            self.enemies.extend(chunk.enemies);
            report.chunk_generated = true;
        }

        let cutoff = player_depth - self.tuning.trailing;
        let before = self.platforms.len() + self.enemies.len() + self.fading.len();

        // Broken but still in range: hand over to the presentation set
        let (keep, broken): (Vec<Platform>, Vec<Platform>) = self
            .platforms
            .drain(..)
            .filter(|p| p.z > cutoff)
            .partition(|p| p.active);
        self.platforms = keep;
        self.fading.extend(broken);
        self.fading.retain(|p| p.z > cutoff);
        self.enemies.retain(|e| e.z > cutoff && e.active);

        let after = self.platforms.len() + self.enemies.len() + self.fading.len();
        report.retired = before.saturating_sub(after);
        if report.retired > 0 {
            log::debug!(
                "Retired {} entities behind depth {:.1}",
                report.retired,
                cutoff
            );
        }
        Ok(report)
    }

    /// Scoped access for the physics step
    pub fn access(&mut self) -> WorldAccess<'_> {
        WorldAccess {
            platforms: &mut self.platforms,
            enemies: &mut self.enemies,
        }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Platforms that broke recently and are still within range
    pub fn fading_platforms(&self) -> &[Platform] {
        &self.fading
    }

    pub fn frontier(&self) -> f32 {
        self.generator.frontier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> StreamingWorld {
        StreamingWorld::from_seed(Tuning::default(), 2024).unwrap()
    }

    #[test]
    fn test_starts_with_safe_run() {
        let world = world();
        assert_eq!(world.platforms().len(), 5);
        assert!(world.enemies().is_empty());
        assert_eq!(world.frontier(), 10.5);
    }

    #[test]
    fn test_generates_when_frontier_within_lookahead() {
        let mut world = world();
        let report = world.advance(0.0).unwrap();
        assert!(report.chunk_generated);
        assert_eq!(world.frontier(), 45.5);

        // Frontier now beyond lookahead, nothing new
        let report = world.advance(0.0).unwrap();
        assert!(!report.chunk_generated);
        assert_eq!(world.frontier(), 45.5);

        let report = world.advance(6.0).unwrap();
        assert!(report.chunk_generated);
        assert_eq!(world.frontier(), 80.5);
    }

    #[test]
    fn test_retires_entities_behind_player() {
        let mut world = world();
        for depth in 0..=60 {
            world.advance(depth as f32).unwrap();
        }
        let cutoff = 60.0 - Tuning::default().trailing;
        assert!(world.platforms().iter().all(|p| p.z > cutoff));
        assert!(world.enemies().iter().all(|e| e.z > cutoff));
        assert!(world.frontier() >= 60.0 + Tuning::default().lookahead - 35.0);
    }

    #[test]
    fn test_broken_platforms_leave_physics_set() {
        let mut world = world();
        world.advance(0.0).unwrap();
        let broken_id = world.platforms()[1].id;
        world.access().platforms[1].active = false;

        world.advance(0.0).unwrap();
        assert!(world.platforms().iter().all(|p| p.id != broken_id));
        assert_eq!(world.fading_platforms().len(), 1);
        assert_eq!(world.fading_platforms()[0].id, broken_id);

        // Fading copy is dropped once it is far enough behind
        world.advance(40.0).unwrap();
        assert!(world.fading_platforms().is_empty());
    }

    #[test]
    fn test_access_preserves_order() {
        let mut world = world();
        world.advance(0.0).unwrap();
        let ids: Vec<_> = world.platforms().iter().map(|p| p.id).collect();
        {
            let access = world.access();
            for platform in access.platforms.iter_mut() {
                platform.stepped_on = true;
            }
        }
        let after: Vec<_> = world.platforms().iter().map(|p| p.id).collect();
        assert_eq!(ids, after);
    }
}
