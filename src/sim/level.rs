//! Per-level parameters
//!
//! Everything that changes between levels is derived from the level number
//! and the tuning in [`GameConfig`].

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Derived parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Score needed to clear the level
    pub target: u64,
    /// Number of palette colors in play
    pub max_colors: usize,
    /// Shots available for the level
    pub shot_budget: u32,
    /// Rows seeded at level start
    pub initial_rows: usize,
    /// Launch speed (px/s)
    pub shot_speed: f32,
}

/// Parameters for a 1-based `level` (0 is treated as 1)
pub fn level_params(level: u32, config: &GameConfig) -> LevelParams {
    let t = &config.levels;
    let level = level.max(1);
    let steps = (level - 1) as u64;

    let target = t.target_base
        + steps * t.target_per_level
        + (level as u64).saturating_sub(2) * t.target_surcharge;
    let max_colors = (t.palette_base + level as usize).min(config.palette_len());
    let shot_budget = t.shots_base.saturating_sub(level).max(t.shots_floor);
    let initial_rows = (t.rows_base + steps as usize).min(config.grid.rows.saturating_sub(2));
    let shot_speed = t.speed_base + steps as f32 * t.speed_per_level;

    LevelParams {
        target,
        max_colors,
        shot_budget,
        initial_rows,
        shot_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_one() {
        let p = level_params(1, &GameConfig::default());
        assert_eq!(
            p,
            LevelParams {
                target: 400,
                max_colors: 3,
                shot_budget: 8,
                initial_rows: 5,
                shot_speed: 600.0,
            }
        );
    }

    #[test]
    fn test_later_levels() {
        let config = GameConfig::default();
        let p2 = level_params(2, &config);
        assert_eq!(p2.target, 850);
        assert_eq!(p2.max_colors, 4);
        assert_eq!(p2.shot_budget, 7);
        assert_eq!(p2.initial_rows, 6);
        assert_eq!(p2.shot_speed, 640.0);

        let p3 = level_params(3, &config);
        assert_eq!(p3.target, 1310);
        assert_eq!(p3.max_colors, 5);

        let p10 = level_params(10, &config);
        assert_eq!(p10.max_colors, 5);
        assert_eq!(p10.shot_budget, 4);
        assert_eq!(p10.initial_rows, 10);
    }

    #[test]
    fn test_level_zero_is_level_one() {
        let config = GameConfig::default();
        assert_eq!(level_params(0, &config), level_params(1, &config));
    }

    proptest! {
        #[test]
        fn prop_level_params_monotonic(level in 1u32..500) {
            let config = GameConfig::default();
            let a = level_params(level, &config);
            let b = level_params(level + 1, &config);
            prop_assert!(b.target > a.target);
            prop_assert!(b.shot_speed > a.shot_speed);
            prop_assert!(b.shot_budget <= a.shot_budget);
            prop_assert!(b.shot_budget >= 4);
            prop_assert!(b.max_colors <= config.palette.len());
            prop_assert!(b.initial_rows <= config.grid.rows - 2);
        }
    }
}
