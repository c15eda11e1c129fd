//! Rock Field entry point
//!
//! Headless demo: the autopilot plays the engine for a fixed number of ticks,
//! restarting after every game over, then prints the final snapshot as JSON.
//!
//! Usage: `rock-field [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;
    use std::time::{Duration, Instant};

    use rock_field::autopilot::Autopilot;
    use rock_field::consts::*;
    use rock_field::sim::GameStatus;
    use rock_field::{Engine, HighScoreStore, Settings};

    /// Demo session: engine, pilot and frame pacing state
    struct Demo {
        engine: Engine,
        pilot: Autopilot,
        accumulator: f32,
        ticks: u64,
        games: u32,
    }

    impl Demo {
        /// Run one autopilot tick
        fn step(&mut self) {
            let command = self.pilot.decide(&self.engine.snapshot());
            if command.activate {
                self.engine.activate();
                if self.engine.status() == GameStatus::Playing {
                    self.games += 1;
                }
            }
            if command.fire {
                self.engine.fire();
            }
            self.engine.tick(&command.controls);
            self.ticks += 1;
        }

        /// Run as many fixed ticks as the elapsed time allows
        fn update(&mut self, dt: f32, limit: u64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && self.ticks < limit {
                self.step();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }
    }

    pub fn run() {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load(Path::new(&path)),
            None => Settings::default(),
        }
        .sanitized();

        let store = settings.high_score_path.as_ref().map(HighScoreStore::new);
        let high_score = store.as_ref().map(HighScoreStore::load).unwrap_or(0);

        let mut demo = Demo {
            engine: Engine::new(&settings, high_score),
            pilot: Autopilot::default(),
            accumulator: 0.0,
            ticks: 0,
            games: 0,
        };

        log::info!(
            "Running {} ticks ({})",
            settings.demo_ticks,
            if settings.realtime { "realtime" } else { "flat out" }
        );

        if settings.realtime {
            let mut last = Instant::now();
            while demo.ticks < settings.demo_ticks {
                let now = Instant::now();
                let dt = now.duration_since(last).as_secs_f32();
                last = now;
                demo.update(dt, settings.demo_ticks);
                std::thread::sleep(Duration::from_millis(1));
            }
        } else {
            while demo.ticks < settings.demo_ticks {
                demo.step();
            }
        }

        let best = demo.engine.high_score().max(demo.engine.state().score);
        log::info!("Played {} game(s), best score {}", demo.games, best);
        if let Some(store) = &store {
            store.record(best);
        }

        match serde_json::to_string_pretty(&demo.engine.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rock Field (headless) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library only on wasm; a front end drives the engine directly
}
