//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (row-major cells, ordered sets)
//! - No rendering or platform dependencies

pub mod connectivity;
pub mod grid;
pub mod level;
pub mod projectile;
pub mod state;
pub mod tick;

pub use connectivity::{RemovalResult, detached_cells, resolve, same_color_group};
pub use grid::{Cell, ColorIndex, HexGrid};
pub use level::{LevelParams, level_params};
pub use projectile::{Projectile, aim_angle};
pub use state::{FrameState, GameEvent, GameOverReason, GamePhase, GameState, pick_color};
pub use tick::{TickInput, has_landed, tick};
