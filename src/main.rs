//! Floe Hop headless runner
//!
//! Plays one run with a simple autopilot and reports the depth reached.
//!
//! Usage: `floe-hop [--seed N] [--tuning FILE] [--seconds S]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use floe_hop::consts::SIM_DT;
    use floe_hop::platform::{InputNormalizer, POINTER_RADIUS_FRACTION, SharedInput};
    use floe_hop::{Session, SessionPhase, Settings, Tuning};

    const VIEWPORT: (f32, f32) = (800.0, 600.0);

    #[derive(Parser, Debug)]
    #[command(name = "floe-hop", version, about = "Play one headless run with the autopilot")]
    struct Opts {
        /// Fixed level seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Tuning JSON file; missing fields use defaults
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Give up after this many simulated seconds
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,
    }

    /// Demo player: aims each hop at the nearest floe ahead
    struct Autopilot {
        input: SharedInput,
    }

    impl Autopilot {
        fn steer(&self, session: &Session) {
            let (Some(world), Some(engine)) = (session.world(), session.engine()) else {
                return;
            };
            let tuning = session.tuning();
            let body = engine.body();
            let pos = body.position;

            let Some(target) = world
                .platforms()
                .iter()
                .filter(|p| p.active && p.z > pos.z + 0.5)
                .min_by(|a, b| {
                    let da = (a.x - pos.x).powi(2) + (a.z - pos.z).powi(2);
                    let db = (b.x - pos.x).powi(2) + (b.z - pos.z).powi(2);
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
            else {
                self.input.borrow_mut().pointer_left();
                return;
            };

            // Time until the body is back at water level
            let g = -tuning.gravity;
            let vy = body.velocity.y;
            let airtime = ((vy + (vy * vy + 2.0 * g * pos.y.max(0.0)).sqrt()) / g).max(SIM_DT);

            let reach = tuning.move_speed * session.settings().sensitivity;
            let sx = ((target.x - pos.x) / airtime / reach).clamp(-1.0, 1.0);
            let sz = (((target.z - pos.z) / airtime - tuning.forward_bias) / reach).clamp(-1.0, 1.0);

            let (w, h) = VIEWPORT;
            let radius = h * POINTER_RADIUS_FRACTION;
            self.input
                .borrow_mut()
                .pointer_moved(w / 2.0 + sx * radius, h / 2.0 - sz * radius);
        }
    }

    pub fn run() -> Result<()> {
        let args = Opts::parse();

        let tuning = match &args.tuning {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Tuning::from_json(&json).with_context(|| format!("{}", path.display()))?
            }
            None => Tuning::default(),
        };
        let settings = Settings {
            seed: args.seed,
            ..Default::default()
        };

        let input = InputNormalizer::shared(VIEWPORT.0, VIEWPORT.1);
        let autopilot = Autopilot {
            input: input.clone(),
        };
        let mut session = Session::new(tuning, settings, input)?;
        session.start()?;

        let max_frames = (args.seconds / SIM_DT) as u32;
        let mut landings = 0u32;
        for frame in 0..max_frames {
            autopilot.steer(&session);
            let report = session.frame(SIM_DT)?;

            if let Some(landing) = report.landing {
                landings += 1;
                log::debug!("Landed on {:?} ({:?})", landing.platform, landing.kind);
            }
            if frame % 600 == 0 {
                log::info!("t={:.0}s depth {:.1}", frame as f32 * SIM_DT, report.depth);
            }
            if report.phase == SessionPhase::GameOver {
                log::info!("Run over: {:?}", report.cause);
                break;
            }
        }

        let score = session.score();
        println!("Depth: {} ({} landings)", score.display(), landings);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Floe Hop (headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive `Session` directly on this target
}
