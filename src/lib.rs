//! Bubble Shot - a hex-grid bubble shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hex grid, connectivity, projectile, level state)
//! - `config`: Immutable game configuration injected at construction
//!
//! Rendering, input polling and the event loop live outside this crate. A
//! front end calls [`sim::tick`] once per frame and draws the returned
//! [`sim::FrameState`].

pub mod config;
pub mod sim;

pub use config::{AimConfig, ConfigError, GameConfig, GridConfig, LevelTuning, ScoringConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area dimensions
    pub const SCREEN_WIDTH: f32 = 640.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Grid layout
    pub const GRID_TOP: f32 = 60.0;
    pub const CELL_RADIUS: f32 = 20.0;
    pub const COLS: usize = 10;
    pub const ROWS: usize = 12;
    /// Row spacing factor (~sqrt(3)), applied to the cell radius
    pub const ROW_SPACING_FACTOR: f32 = 1.73;

    /// Shooter sits this far above the bottom of the play area
    pub const SHOOTER_INSET: f32 = 80.0;
    pub const SHOT_BASE_SPEED: f32 = 600.0;
    pub const SHOT_SPEED_PER_LEVEL: f32 = 40.0;

    /// Smallest same-color group that pops
    pub const POP_MIN: usize = 3;

    /// Scoring
    pub const HIT_SCORE: u64 = 10;
    pub const DROP_BONUS_SCORE: u64 = 15;
    pub const LEVEL_CREDIT_REWARD: u64 = 10;
    /// Seconds the "level up" banner stays on screen
    pub const LEVEL_BANNER_TIME: f32 = 2.0;

    /// Shots land slightly before the spheres would visually overlap
    pub const COLLISION_SLACK: f32 = 2.0;
    /// Rows searched either side of the estimated row
    pub const ROW_SEARCH_WINDOW: usize = 2;

    /// Aim limits (radians, screen space: -PI/2 is straight up)
    pub const MIN_AIM_ANGLE: f32 = -std::f32::consts::PI * 0.95;
    pub const MAX_AIM_ANGLE: f32 = -0.05;
    /// Targets at or below the shooter are lifted to this vertical delta
    pub const MIN_UPWARD_DELTA: f32 = -5.0;
    /// Distance of the resting shot from the shooter while aiming
    pub const HOLD_DISTANCE: f32 = 36.0;
    /// Offset of the on-deck preview from the shooter
    pub const PREVIEW_OFFSET: (f32, f32) = (60.0, 20.0);
}

/// Clamp an angle into `[min, max]` (radians)
#[inline]
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    angle.max(min).min(max)
}

/// Unit direction for an angle in screen space
#[inline]
pub fn angle_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Sanitize a frame delta: non-finite or negative values become zero
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
