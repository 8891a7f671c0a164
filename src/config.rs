//! Game configuration
//!
//! Fixed at construction and injected into the simulation. Loadable from
//! JSON; any field left out falls back to the default tuning.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// An RGB palette entry
pub type Rgb = [u8; 3];

/// Default palette: red, green, blue, yellow, purple
pub const DEFAULT_PALETTE: [Rgb; 5] = [
    [231, 76, 60],
    [46, 204, 113],
    [52, 152, 219],
    [241, 196, 15],
    [155, 89, 182],
];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Hex grid layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cols: usize,
    pub rows: usize,
    /// Radius of one cell (and of every shot)
    pub cell_radius: f32,
    /// Y of the ceiling; row 0 centers sit on it
    pub top: f32,
    /// Vertical row spacing as a multiple of the cell radius
    pub row_spacing_factor: f32,
    /// Rows searched either side of the estimated row
    pub row_window: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: COLS,
            rows: ROWS,
            cell_radius: CELL_RADIUS,
            top: GRID_TOP,
            row_spacing_factor: ROW_SPACING_FACTOR,
            row_window: ROW_SEARCH_WINDOW,
        }
    }
}

impl GridConfig {
    #[inline]
    pub fn cell_diameter(&self) -> f32 {
        self.cell_radius * 2.0
    }

    #[inline]
    pub fn row_height(&self) -> f32 {
        self.cell_radius * self.row_spacing_factor
    }

    /// Width of the packed grid including the half-cell shift of odd rows
    #[inline]
    pub fn packed_width(&self) -> f32 {
        self.cols as f32 * self.cell_diameter() + self.cell_radius
    }
}

/// Points and credits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points per cell removed in a matched group
    pub hit: u64,
    /// Points per cell dropped after losing its ceiling link
    pub drop_bonus: u64,
    /// Credits awarded on every level completion
    pub level_credit: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            hit: HIT_SCORE,
            drop_bonus: DROP_BONUS_SCORE,
            level_credit: LEVEL_CREDIT_REWARD,
        }
    }
}

/// Coefficients of the per-level parameter curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub target_base: u64,
    pub target_per_level: u64,
    /// Extra target per level past level 2
    pub target_surcharge: u64,
    pub palette_base: usize,
    pub shots_base: u32,
    pub shots_floor: u32,
    pub rows_base: usize,
    pub speed_base: f32,
    pub speed_per_level: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            target_base: 400,
            target_per_level: 450,
            target_surcharge: 10,
            palette_base: 2,
            shots_base: 9,
            shots_floor: 4,
            rows_base: 5,
            speed_base: SHOT_BASE_SPEED,
            speed_per_level: SHOT_SPEED_PER_LEVEL,
        }
    }
}

/// Shooter aim limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    pub min_angle: f32,
    pub max_angle: f32,
    /// Vertical delta forced when the target is level with or below the shooter
    pub min_upward_delta: f32,
    pub hold_distance: f32,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            min_angle: MIN_AIM_ANGLE,
            max_angle: MAX_AIM_ANGLE,
            min_upward_delta: MIN_UPWARD_DELTA,
            hold_distance: HOLD_DISTANCE,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    pub grid: GridConfig,
    pub scoring: ScoringConfig,
    pub levels: LevelTuning,
    pub aim: AimConfig,
    pub palette: Vec<Rgb>,
    pub pop_min: usize,
    pub banner_time: f32,
    pub collision_slack: f32,
    /// Shooter distance above the bottom edge
    pub shooter_inset: f32,
    pub preview_offset: (f32, f32),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            grid: GridConfig::default(),
            scoring: ScoringConfig::default(),
            levels: LevelTuning::default(),
            aim: AimConfig::default(),
            palette: DEFAULT_PALETTE.to_vec(),
            pop_min: POP_MIN,
            banner_time: LEVEL_BANNER_TIME,
            collision_slack: COLLISION_SLACK,
            shooter_inset: SHOOTER_INSET,
            preview_offset: PREVIEW_OFFSET,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Fixed shooter origin
    pub fn shooter(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - self.shooter_inset)
    }

    /// Where the on-deck sphere is shown
    pub fn preview_pos(&self) -> Vec2 {
        self.shooter() + Vec2::new(self.preview_offset.0, self.preview_offset.1)
    }

    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.cols < 2 || grid.rows < 3 {
            return Err(ConfigError::InvalidGrid(format!(
                "need at least 2x3 cells, got {}x{}",
                grid.cols, grid.rows
            )));
        }
        positive("grid.cell_radius", grid.cell_radius)?;
        positive("grid.row_spacing_factor", grid.row_spacing_factor)?;
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("levels.speed_base", self.levels.speed_base)?;
        if grid.packed_width() > self.width {
            return Err(ConfigError::InvalidGrid(format!(
                "grid is {} px wide but the play area is {} px",
                grid.packed_width(),
                self.width
            )));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if self.pop_min < 2 {
            return Err(ConfigError::InvalidValue {
                field: "pop_min",
                reason: format!("must be at least 2, got {}", self.pop_min),
            });
        }
        if self.levels.shots_floor == 0 {
            return Err(ConfigError::InvalidValue {
                field: "levels.shots_floor",
                reason: "must be at least 1".to_string(),
            });
        }
        let aim_ordered = self.aim.min_angle < self.aim.max_angle && self.aim.max_angle < 0.0;
        if !aim_ordered {
            return Err(ConfigError::InvalidValue {
                field: "aim",
                reason: format!(
                    "angle range [{}, {}] must be ordered and point upward",
                    self.aim.min_angle, self.aim.max_angle
                ),
            });
        }
        if self.aim.min_upward_delta.is_nan() || self.aim.min_upward_delta >= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "aim.min_upward_delta",
                reason: "must be negative (upward)".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}
