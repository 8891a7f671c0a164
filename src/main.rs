//! Bubble Shot headless driver
//!
//! Runs the simulation without a window: an autoplayer aims at random
//! points, events are logged, and the final frame is printed as JSON.
//!
//! Usage: `bubble-shot [seed] [config.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use anyhow::{Context, Result};
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use bubble_shot::GameConfig;
    use bubble_shot::consts::*;
    use bubble_shot::sim::{GameEvent, GameState, TickInput, tick};

    /// Give up after this many simulated seconds
    const MAX_SECONDS: f32 = 600.0;
    /// Simulated render frame length (uneven on purpose to exercise substepping)
    const FRAME_DT: f32 = 1.0 / 45.0;

    /// Fixed-step driver around the simulation
    struct Game {
        state: GameState,
        accumulator: f32,
        input: TickInput,
        aim_rng: Pcg32,
    }

    impl Game {
        fn new(config: GameConfig, seed: u64) -> Self {
            Self {
                state: GameState::new(config, seed),
                accumulator: 0.0,
                input: TickInput::default(),
                aim_rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            }
        }

        /// Pick a point somewhere above the shooter
        fn choose_target(&mut self) -> Vec2 {
            let config = &self.state.config;
            let x = self.aim_rng.random_range(0.0..config.width);
            let y = self.aim_rng.random_range(config.grid.top..config.height * 0.6);
            Vec2::new(x, y)
        }

        /// Run simulation ticks for one rendered frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if !self.state.projectile.in_flight && self.input.launch.is_none() {
                    self.input.launch = Some(self.choose_target());
                }
                let frame = tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.launch = None;
                self.input.pause = false;
                self.input.restart = false;

                for event in &frame.events {
                    log_event(event);
                }
                if frame.game_over.is_some() {
                    break;
                }
            }
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::Launched { angle } => log::trace!("Launched at {:.3} rad", angle),
            GameEvent::Landed { cell, color } => {
                log::debug!("Color {} landed at ({}, {})", color, cell.col, cell.row)
            }
            GameEvent::Popped { count, points } => log::info!("Popped {} (+{})", count, points),
            GameEvent::Dropped { count, points } => log::info!("Dropped {} (+{})", count, points),
            GameEvent::LevelComplete { level, credits } => {
                log::info!("LEVEL {}! credits now {}", level, credits)
            }
            GameEvent::GameOver { reason } => log::info!("Game over: {:?}", reason),
            GameEvent::Restarted => log::info!("Restarted"),
        }
    }

    fn load_config(path: Option<&str>) -> Result<GameConfig> {
        let Some(path) = path else {
            return Ok(GameConfig::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {path}"))?;
        GameConfig::from_json(&json).with_context(|| format!("invalid config file {path}"))
    }

    pub fn run() -> Result<()> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let seed = match args.first() {
            Some(s) => s
                .parse::<u64>()
                .with_context(|| format!("seed must be an unsigned integer, got {s:?}"))?,
            None => 1,
        };
        let config = load_config(args.get(1).map(String::as_str))?;

        log::info!("Bubble Shot (headless) starting with seed {}", seed);
        let mut game = Game::new(config, seed);

        let mut elapsed = 0.0;
        while elapsed < MAX_SECONDS && !game.state.is_game_over() {
            game.update(FRAME_DT);
            elapsed += FRAME_DT;
        }

        let frame = game.state.frame();
        log::info!(
            "Finished after {:.1}s: level {}, score {}, credits {}",
            elapsed,
            frame.level,
            frame.score,
            frame.credits
        );
        println!("{}", serde_json::to_string_pretty(&frame)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // A web front end links the library directly
}
