//! Session controller
//!
//! Glue around the engine: menu / playing / game-over transitions, input
//! calibration at the start of each run, and score bookkeeping.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimError};
use crate::platform::SharedInput;
use crate::settings::Settings;
use crate::sim::{DeathCause, LandingEvent, PhysicsEngine, PlayerPose, StreamingWorld};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Menu,
    Playing,
    GameOver,
}

/// Current run score and session best (depth traveled)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub current: f32,
    pub best: f32,
}

impl ScoreState {
    /// Whole units for a HUD
    pub fn display(&self) -> u32 {
        self.current.max(0.0).floor() as u32
    }
}

/// What happened during one `frame`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub phase: SessionPhase,
    pub pose: Option<PlayerPose>,
    pub depth: f32,
    pub died: bool,
    pub cause: Option<DeathCause>,
    pub landing: Option<LandingEvent>,
    /// Camera impact to apply, already filtered by motion settings
    pub impact: Option<f32>,
}

/// World and body for one life
struct Run {
    world: StreamingWorld,
    engine: PhysicsEngine,
}

pub struct Session {
    tuning: Tuning,
    settings: Settings,
    input: SharedInput,
    phase: SessionPhase,
    score: ScoreState,
    run: Option<Run>,
}

impl Session {
    /// Validate configuration once; the session starts in the menu
    pub fn new(tuning: Tuning, settings: Settings, input: SharedInput) -> Result<Self, ConfigError> {
        tuning.validate()?;
        settings.validate()?;
        Ok(Self {
            tuning,
            settings,
            input,
            phase: SessionPhase::Menu,
            score: ScoreState::default(),
            run: None,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> ScoreState {
        self.score
    }

    /// Seed the best score from external storage
    pub fn set_best(&mut self, best: f32) {
        self.score.best = self.score.best.max(best);
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) -> Result<(), ConfigError> {
        let settings = Settings {
            sensitivity,
            ..self.settings.clone()
        };
        settings.validate()?;
        self.settings = settings;
        if let Some(run) = &mut self.run {
            run.engine.set_sensitivity(sensitivity);
        }
        Ok(())
    }

    pub fn world(&self) -> Option<&StreamingWorld> {
        self.run.as_ref().map(|run| &run.world)
    }

    pub fn engine(&self) -> Option<&PhysicsEngine> {
        self.run.as_ref().map(|run| &run.engine)
    }

    /// Begin a run from the menu or after game over
    pub fn start(&mut self) -> Result<(), SimError> {
        self.reset()?;
        self.input.borrow_mut().calibrate();
        self.score.current = 0.0;
        self.phase = SessionPhase::Playing;
        log::info!("Run started (best {:.0})", self.score.best);
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), SimError> {
        self.start()
    }

    /// Back to the menu, dropping the current run
    pub fn to_menu(&mut self) {
        self.run = None;
        self.phase = SessionPhase::Menu;
    }

    /// Rebuild world and body from scratch; only `start` moves the phase
    fn reset(&mut self) -> Result<(), SimError> {
        let seed = self.settings.seed.unwrap_or_else(rand::random);
        log::debug!("Building world with seed {seed}");
        let world = StreamingWorld::from_seed(self.tuning.clone(), seed)?;
        let engine = PhysicsEngine::new(self.tuning.clone(), self.settings.sensitivity);
        self.run = Some(Run { world, engine });
        Ok(())
    }

    /// One frame: sample input, stream the world, step physics.
    ///
    /// Outside the Playing phase nothing advances.
    pub fn frame(&mut self, dt: f32) -> Result<FrameReport, SimError> {
        let idle = FrameReport {
            phase: self.phase,
            pose: self.engine().map(|e| e.pose()),
            depth: self.engine().map(|e| e.depth()).unwrap_or(0.0),
            died: false,
            cause: None,
            landing: None,
            impact: None,
        };
        if self.phase != SessionPhase::Playing {
            return Ok(idle);
        }
        let Some(run) = self.run.as_mut() else {
            return Ok(idle);
        };

        let steering = self.input.borrow().sample();
        run.world.advance(run.engine.depth())?;
        let outcome = run.engine.step(dt, steering, run.world.access());

        self.score.current = outcome.depth.max(0.0);
        if outcome.died {
            self.phase = SessionPhase::GameOver;
            if self.score.current > self.score.best {
                self.score.best = self.score.current;
                log::info!("New best: {:.0}", self.score.best);
            }
        }

        let impact = outcome
            .landing
            .filter(|_| self.settings.effective_screen_shake())
            .map(|landing| landing.impact);

        Ok(FrameReport {
            phase: self.phase,
            pose: Some(outcome.pose),
            depth: outcome.depth,
            died: outcome.died,
            cause: outcome.cause,
            landing: outcome.landing,
            impact,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::platform::{Direction, InputNormalizer};

    fn session(settings: Settings) -> (Session, SharedInput) {
        session_with(Tuning::default(), settings)
    }

    fn session_with(tuning: Tuning, settings: Settings) -> (Session, SharedInput) {
        let input = InputNormalizer::shared(800.0, 600.0);
        let session = Session::new(tuning, settings, input.clone()).unwrap();
        (session, input)
    }

    fn seeded() -> Settings {
        Settings {
            seed: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        let input = InputNormalizer::shared(800.0, 600.0);
        let tuning = Tuning {
            lane_count: 2,
            ..Default::default()
        };
        assert!(Session::new(tuning, Settings::default(), input).is_err());
    }

    #[test]
    fn test_menu_frames_do_nothing() {
        let (mut session, _) = session(seeded());
        let report = session.frame(SIM_DT).unwrap();
        assert_eq!(report.phase, SessionPhase::Menu);
        assert!(report.pose.is_none());
        assert!(session.world().is_none());
    }

    #[test]
    fn test_start_calibrates_input() {
        let (mut session, input) = session(seeded());
        input.borrow_mut().pointer_moved(10.0, 10.0);
        session.start().unwrap();

        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(input.borrow().sample(), crate::platform::SteeringInput::NEUTRAL);
        assert_eq!(session.world().map(|w| w.platforms().len()), Some(5));
    }

    #[test]
    fn test_death_ends_run_and_records_best() {
        let (mut session, input) = session(seeded());
        session.start().unwrap();
        // Steer hard sideways off the safe run
        input.borrow_mut().key_down(Direction::Left);

        let mut deaths = 0;
        for _ in 0..600 {
            let report = session.frame(SIM_DT).unwrap();
            if report.died {
                deaths += 1;
            }
        }

        assert_eq!(deaths, 1);
        assert_eq!(session.phase(), SessionPhase::GameOver);
        let score = session.score();
        assert!(score.current > 0.0);
        assert_eq!(score.best, score.current);

        // Restart keeps the best and resets the run
        input.borrow_mut().key_up(Direction::Left);
        session.restart().unwrap();
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.score().current, 0.0);
        assert_eq!(session.score().best, score.best);
        assert!(!session.engine().unwrap().is_dead());

        // The rebuilt run is the one that gets stepped
        let report = session.frame(SIM_DT).unwrap();
        assert_eq!(report.phase, SessionPhase::Playing);
        assert!(session.engine().unwrap().elapsed() > 0.0);
        assert_eq!(session.world().map(|w| w.frontier()), Some(45.5));
    }

    #[test]
    fn test_best_only_increases() {
        let (mut session, _) = session(seeded());
        session.set_best(120.0);
        session.set_best(40.0);
        assert_eq!(session.score().best, 120.0);
    }

    #[test]
    fn test_sensitivity_validated() {
        let (mut session, _) = session(seeded());
        assert!(session.set_sensitivity(2.0).is_ok());
        assert_eq!(session.settings().sensitivity, 2.0);
        assert!(session.set_sensitivity(9.0).is_err());
        assert_eq!(session.settings().sensitivity, 2.0);
    }

    #[test]
    fn test_impact_suppressed_with_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..seeded()
        };
        // No forward drift so the first bounce lands on the start floe
        let tuning = Tuning {
            forward_bias: 0.0,
            ..Default::default()
        };
        let (mut session, _) = session_with(tuning, settings);
        session.start().unwrap();

        let mut landed = false;
        for _ in 0..120 {
            let report = session.frame(SIM_DT).unwrap();
            if report.landing.is_some() {
                landed = true;
                assert!(report.impact.is_none());
            }
        }
        assert!(landed);
    }

    #[test]
    fn test_score_display_floors() {
        let score = ScoreState {
            current: 17.9,
            best: 0.0,
        };
        assert_eq!(score.display(), 17);
    }
}
