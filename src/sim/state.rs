//! Game state and level/scoring state machine
//!
//! [`GameState`] owns everything the simulation mutates: the grid, the shot,
//! level progress and the RNG. Front ends read it through [`FrameState`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, ColorIndex, HexGrid};
use super::level::{LevelParams, level_params};
use super::projectile::Projectile;
use crate::config::{ConfigError, GameConfig};

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Shot budget spent with the score still under target
    OutOfShots,
    /// A sphere reached the bottom row
    Overflow,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Shot resting at the shooter, waiting for launch input
    Aiming,
    /// Shot moving
    InFlight,
    /// Simulation frozen
    Paused,
    /// Run ended; only restart leaves this phase
    GameOver(GameOverReason),
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { angle: f32 },
    Landed { cell: Cell, color: ColorIndex },
    Popped { count: usize, points: u64 },
    Dropped { count: usize, points: u64 },
    LevelComplete { level: u32, credits: u64 },
    GameOver { reason: GameOverReason },
    Restarted,
}

/// Uniform pick among the colors on the grid, or among the first
/// `max_colors` palette entries when the grid is empty
pub fn pick_color(grid: &HexGrid, max_colors: usize, rng: &mut impl Rng) -> ColorIndex {
    let active: Vec<ColorIndex> = grid.active_colors().into_iter().collect();
    if active.is_empty() {
        rng.random_range(0..max_colors.max(1))
    } else {
        active[rng.random_range(0..active.len())]
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Source of every random draw (grid seeding, next colors)
    pub rng: Pcg32,
    pub grid: HexGrid,
    /// Current level (1-based)
    pub level: u32,
    pub params: LevelParams,
    /// Score within the current level
    pub score: u64,
    /// Credits earned since the last restart
    pub credits: u64,
    pub shots_fired: u32,
    pub shots_remaining: u32,
    /// Seconds left on the level banner
    pub banner_timer: f32,
    /// The shot at the shooter or in flight
    pub projectile: Projectile,
    /// Color of the on-deck sphere
    pub preview: ColorIndex,
    /// Last aim angle (radians)
    pub aim_angle: f32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events of the current tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New game at level 1 with a seeded RNG.
    ///
    /// `config` must pass [`GameConfig::validate`]; a grid smaller than 2x3
    /// is not supported. Use [`GameState::try_new`] for untrusted configs.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }

    /// Validate `config`, then start a new game
    pub fn try_new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    /// New game at level 1 drawing from `rng`. Same precondition as [`GameState::new`].
    pub fn with_rng(config: GameConfig, rng: Pcg32) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid game config");
        let params = level_params(1, &config);
        let grid = HexGrid::new(config.grid.clone(), config.width);
        let projectile = Projectile::new(config.shooter(), config.grid.cell_radius, 0);
        let mut state = Self {
            config,
            rng,
            grid,
            level: 1,
            params,
            score: 0,
            credits: 0,
            shots_fired: 0,
            shots_remaining: params.shot_budget,
            banner_timer: 0.0,
            projectile,
            preview: 0,
            aim_angle: -std::f32::consts::FRAC_PI_2,
            phase: GamePhase::Aiming,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.start_level();
        state
    }

    /// Back to level 1 with zero score and credits
    pub fn restart(&mut self) {
        self.level = 1;
        self.credits = 0;
        self.params = level_params(self.level, &self.config);
        self.start_level();
        self.banner_timer = 0.0;
        self.events.push(GameEvent::Restarted);
        log::info!("Game restarted");
    }

    /// Move to the next level, awarding the level credit
    pub fn advance_level(&mut self) {
        let cleared = self.level;
        self.level += 1;
        self.credits += self.config.scoring.level_credit;
        self.params = level_params(self.level, &self.config);
        self.start_level();
        self.banner_timer = self.config.banner_time;
        self.events.push(GameEvent::LevelComplete {
            level: self.level,
            credits: self.credits,
        });
        log::info!(
            "Level {} cleared, now level {} (target {}, {} shots, {} colors)",
            cleared,
            self.level,
            self.params.target,
            self.params.shot_budget,
            self.params.max_colors
        );
    }

    /// Rebuild and reseed the grid, reset per-level counters and the shot
    fn start_level(&mut self) {
        let max_colors = self.params.max_colors.max(1);
        self.grid.clear();
        let rng = &mut self.rng;
        self.grid.fill_rows(self.params.initial_rows, || rng.random_range(0..max_colors));

        self.score = 0;
        self.shots_fired = 0;
        self.shots_remaining = self.params.shot_budget;
        let first = self.next_color();
        self.projectile = Projectile::new(
            self.config.shooter(),
            self.config.grid.cell_radius,
            first,
        );
        self.preview = self.next_color();
        self.phase = GamePhase::Aiming;
    }

    /// Draw the color for the next queued sphere
    pub fn next_color(&mut self) -> ColorIndex {
        pick_color(&self.grid, self.params.max_colors, &mut self.rng)
    }

    /// Push a fresh row in at the ceiling, shifting the grid down
    pub fn push_ceiling_row(&mut self) {
        let max_colors = self.params.max_colors.max(1);
        let rng = &mut self.rng;
        self.grid.insert_top_row(|| rng.random_range(0..max_colors));
    }

    /// Move the resting shot to the on-deck color and queue a new preview
    pub(crate) fn reload(&mut self) {
        self.projectile = Projectile::new(
            self.config.shooter(),
            self.config.grid.cell_radius,
            self.preview,
        );
        self.preview = self.next_color();
    }

    pub(crate) fn game_over(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::GameOver(reason) {
            return;
        }
        self.phase = GamePhase::GameOver(reason);
        self.events.push(GameEvent::GameOver { reason });
        log::info!(
            "Game over ({:?}) at level {}, score {}, credits {}",
            reason,
            self.level,
            self.score,
            self.credits
        );
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        match self.phase {
            GamePhase::GameOver(reason) => Some(reason),
            _ => None,
        }
    }

    /// Read-only snapshot for rendering
    pub fn frame(&self) -> FrameState {
        FrameState {
            cols: self.grid.cols(),
            rows: self.grid.rows(),
            cells: self.grid.cells().to_vec(),
            projectile_pos: self.projectile.pos,
            projectile_color: self.projectile.color,
            projectile_in_flight: self.projectile.in_flight,
            preview_color: self.preview,
            preview_pos: self.config.preview_pos(),
            aim_angle: self.aim_angle,
            score: self.score,
            level: self.level,
            credits: self.credits,
            shots_remaining: self.shots_remaining,
            target: self.params.target,
            banner_remaining: self.banner_timer,
            game_over: self.game_over_reason(),
            paused: self.phase == GamePhase::Paused,
            ticks: self.time_ticks,
            events: self.events.clone(),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    pub cols: usize,
    pub rows: usize,
    /// Row-major cell colors
    pub cells: Vec<Option<ColorIndex>>,
    pub projectile_pos: Vec2,
    pub projectile_color: ColorIndex,
    pub projectile_in_flight: bool,
    pub preview_color: ColorIndex,
    pub preview_pos: Vec2,
    pub aim_angle: f32,
    pub score: u64,
    pub level: u32,
    pub credits: u64,
    pub shots_remaining: u32,
    pub target: u64,
    pub banner_remaining: f32,
    pub game_over: Option<GameOverReason>,
    pub paused: bool,
    /// Simulated ticks since the state was created (paused and game-over ticks excluded)
    pub ticks: u64,
    pub events: Vec<GameEvent>,
}

impl FrameState {
    pub fn cell(&self, col: usize, row: usize) -> Option<ColorIndex> {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }
}
