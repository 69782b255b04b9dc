//! MAFF entry point
//!
//! Runs a short headless session: a seeded demo simulation stands in for
//! the real gameplay world and a scripted player drives the runtime
//! through the same event path a window would use.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use maff::consts::*;
use maff::persistence::JsonStore;
use maff::platform::{Command, InputEvent, Key, NullView};
use maff::runtime::{GameSession, WeaponId};
use maff::sim::{Simulation, TickReport};
use maff::{Config, Runtime, Settings};

/// How long the demo runs
const DEMO_DURATION: Duration = Duration::from_secs(4);

/// Toy world: shots hit with a fixed chance, stray bombers end the game
struct DemoSimulation {
    rng: Pcg32,
    queued_shots: Vec<(WeaponId, IVec2)>,
    targets_left: u32,
    lives: u32,
    /// Points per hit, scaled by difficulty
    hit_multiplier: u64,
}

impl DemoSimulation {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            queued_shots: Vec::new(),
            targets_left: 0,
            lives: 3,
            hit_multiplier: 1,
        }
    }
}

impl Simulation for DemoSimulation {
    fn advance(&mut self, session: &GameSession) -> TickReport {
        let mut report = TickReport::default();

        for (weapon, _target) in self.queued_shots.drain(..) {
            let hit_chance = 0.3 + 0.1 * weapon.0 as f64;
            if self.targets_left > 0 && self.rng.random_bool(hit_chance.min(0.9)) {
                self.targets_left -= 1;
                report.score_delta += 10 * session.level as u64 * self.hit_multiplier;
            }
        }

        if self.rng.random_bool(0.01) {
            self.lives = self.lives.saturating_sub(1);
            log::debug!("Bomber got through, {} lives left", self.lives);
        }

        report.game_over = self.lives == 0;
        if self.targets_left == 0 && !report.game_over {
            report.level_complete = true;
            self.targets_left = 5 + session.level * 2;
        }
        report
    }

    fn fire(&mut self, weapon: WeaponId, target: IVec2) {
        self.queued_shots.push((weapon, target));
    }

    fn empty_fire_buffer(&mut self) {
        self.queued_shots.clear();
    }

    fn reset(&mut self, level: u32, settings: &Settings) {
        self.queued_shots.clear();
        self.hit_multiplier = settings.difficulty.score_multiplier();
        self.targets_left = 5 + level * 2;
        self.lives = 3;
    }
}

/// Scripted player: one event per frame number
fn scripted_event(frame: u64, rng: &mut Pcg32) -> Option<InputEvent> {
    match frame {
        10 => Some(InputEvent::KeyDown { code: Key::Char('2') }),
        40 => Some(InputEvent::MenuCommand {
            id: Command::About.id(),
        }),
        45 => Some(InputEvent::PointerDown { x: 5, y: 5 }),
        60 => Some(InputEvent::KeyDown { code: Key::Escape }),
        70 => Some(InputEvent::KeyDown { code: Key::Escape }),
        f if f % 3 == 0 => {
            let strip_top = VIEW_HEIGHT - INTERFACE_HEIGHT;
            Some(InputEvent::PointerDown {
                x: rng.random_range(0..VIEW_WIDTH),
                y: rng.random_range(0..strip_top),
            })
        }
        _ => None,
    }
}

fn main() {
    env_logger::init();
    log::info!("MAFF (headless) starting...");

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let seed = 0x4d41_4646;
    let store = JsonStore::new(std::env::temp_dir().join("maff-demo"));
    log::info!("Storing preferences in {}", store.dir().display());

    let mut runtime = Runtime::new(config, DemoSimulation::new(seed), store, NullView);
    let mut player = Pcg32::seed_from_u64(seed ^ 0xff);

    let started = Instant::now();
    runtime.start(started);

    let mut frame = 0u64;
    while !runtime.quit_requested() && started.elapsed() < DEMO_DURATION {
        let Some(deadline) = runtime.scheduler().next_deadline() else {
            break;
        };
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }

        let ticks = runtime.on_timer(Instant::now());
        for _ in 0..ticks {
            frame += 1;
            if let Some(event) = scripted_event(frame, &mut player) {
                runtime.handle_event(event);
            }
            if frame == 90 {
                runtime.window_deactivated();
            } else if frame == 100 {
                runtime.window_activated();
                runtime.handle_event(InputEvent::KeyDown { code: Key::Enter });
            }
        }

        if runtime.session().is_game_over && runtime.dialogs().is_empty() {
            runtime.new_game();
        } else if runtime.session().is_game_over {
            // Skip name entry in the demo
            let _ = runtime.dialog_cancel();
        }
    }

    runtime.shutdown();
    let session = runtime.session();
    log::info!(
        "Demo finished: {} frames simulated, score {}, level {}",
        runtime.frames_simulated(),
        session.score,
        session.level
    );
    println!(
        "score={} level={} frames={}",
        session.score,
        session.level,
        runtime.frames_simulated()
    );
}
