//! Simulation tick
//!
//! Advances the game by one step: input, shot motion, landing, group
//! resolution, and level/game-over transitions.

use glam::Vec2;

use super::connectivity::resolve;
use super::grid::Cell;
use super::projectile::aim_angle;
use super::state::{FrameState, GameEvent, GameOverReason, GamePhase, GameState};
use crate::sanitize_dt;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position to aim at
    pub aim: Option<Vec2>,
    /// Fire toward this point (click/tap/space)
    pub launch: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
    /// Start over from level 1
    pub restart: bool,
}

/// Advance the game state by one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> FrameState {
    state.events.clear();
    let dt = sanitize_dt(dt);

    if input.restart {
        state.restart();
    }

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Aiming | GamePhase::InFlight => {
                state.phase = GamePhase::Paused;
            }
            GamePhase::Paused => {
                state.phase = if state.projectile.in_flight {
                    GamePhase::InFlight
                } else {
                    GamePhase::Aiming
                };
            }
            GamePhase::GameOver(_) => {}
        }
    }

    if state.phase == GamePhase::Paused {
        return state.frame();
    }

    // The level banner keeps running out behind the game-over screen
    state.banner_timer = (state.banner_timer - dt).max(0.0);
    if state.is_game_over() {
        return state.frame();
    }

    state.time_ticks += 1;

    let shooter = state.config.shooter();
    if let Some(target) = input.launch.or(input.aim) {
        state.aim_angle = aim_angle(shooter, target, &state.config.aim);
    }

    if state.phase == GamePhase::Aiming {
        let hold = state.config.aim.hold_distance;
        state.projectile.hold(shooter, state.aim_angle, hold);

        if let Some(target) = input.launch {
            let speed = state.params.shot_speed;
            state.projectile.launch(shooter, target, speed, &state.config.aim);
            state.phase = GamePhase::InFlight;
            state.events.push(GameEvent::Launched {
                angle: state.aim_angle,
            });
        }
    }

    if state.phase == GamePhase::InFlight {
        state.projectile.integrate(dt, state.config.width);
        if has_landed(state) {
            land(state);
        }
    }

    // Overflow wins over everything else, checked every tick
    if state.grid.bottom_occupied() {
        state.game_over(GameOverReason::Overflow);
    } else if state.score >= state.params.target {
        state.advance_level();
    } else if state.shots_remaining == 0 {
        state.game_over(GameOverReason::OutOfShots);
    }

    state.frame()
}

/// Whether the shot touched the ceiling or an occupied cell.
///
/// Cells are tested within a few rows of the shot, rows then columns in
/// increasing order; the first hit wins.
pub fn has_landed(state: &GameState) -> bool {
    let grid = &state.grid;
    let shot = &state.projectile;
    if shot.reached_ceiling(grid.top()) {
        return true;
    }

    let reach = shot.radius + grid.cell_radius() - state.config.collision_slack;
    let window = state.config.grid.row_window;
    let (start, end) = grid.row_window(shot.pos.y, window, window);
    for row in start..=end {
        for col in 0..grid.cols() {
            let cell = Cell::new(col, row as usize);
            if grid.is_occupied(cell) && grid.cell_center(cell).distance(shot.pos) <= reach {
                return true;
            }
        }
    }
    false
}

/// Snap the shot into the grid, resolve, score, and queue the next shot
fn land(state: &mut GameState) {
    let color = state.projectile.color;
    let nearest = state.grid.nearest_cell(state.projectile.pos);
    let cell = state.grid.place_at(nearest, color);
    state.events.push(GameEvent::Landed { cell, color });

    let result = resolve(&mut state.grid, cell, state.config.pop_min);
    let scoring = &state.config.scoring;
    if result.matched > 0 {
        let points = result.matched as u64 * scoring.hit;
        state.events.push(GameEvent::Popped {
            count: result.matched,
            points,
        });
    }
    if result.dropped > 0 {
        let points = result.dropped as u64 * scoring.drop_bonus;
        state.events.push(GameEvent::Dropped {
            count: result.dropped,
            points,
        });
    }
    state.score += result.points(scoring.hit, scoring.drop_bonus);
    log::debug!(
        "Landed color {} at ({}, {}): matched {}, dropped {}, score {}",
        color,
        cell.col,
        cell.row,
        result.matched,
        result.dropped,
        state.score
    );

    state.reload();
    state.shots_fired += 1;
    state.shots_remaining = state.shots_remaining.saturating_sub(1);
    state.phase = GamePhase::Aiming;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::SIM_DT;

    fn empty_state(seed: u64) -> GameState {
        let mut state = GameState::new(GameConfig::default(), seed);
        state.grid.clear();
        state
    }

    fn launch_at(target: Vec2) -> TickInput {
        TickInput {
            launch: Some(target),
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_aiming_to_in_flight() {
        let mut state = GameState::new(GameConfig::default(), 12345);
        assert_eq!(state.phase, GamePhase::Aiming);

        // Tick without launch - should stay aiming
        let frame = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert!(!frame.projectile_in_flight);

        let frame = tick(&mut state, &launch_at(Vec2::new(320.0, 0.0)), SIM_DT);
        assert_eq!(state.phase, GamePhase::InFlight);
        assert!(frame.projectile_in_flight);
        assert!(matches!(frame.events[0], GameEvent::Launched { .. }));
    }

    #[test]
    fn test_tick_holds_shot_along_aim() {
        let mut state = GameState::new(GameConfig::default(), 1);
        let input = TickInput {
            aim: Some(Vec2::new(320.0, 100.0)),
            ..Default::default()
        };
        let frame = tick(&mut state, &input, SIM_DT);
        assert!((frame.projectile_pos - Vec2::new(320.0, 684.0)).length() < 1e-3);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(GameConfig::default(), 12345);
        tick(&mut state, &launch_at(Vec2::new(320.0, 0.0)), SIM_DT);
        assert_eq!(state.phase, GamePhase::InFlight);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let frame = tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(frame.paused);

        // Paused ticks do not move the shot or count
        let pos = state.projectile.pos;
        let frame = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.projectile.pos, pos);
        assert_eq!(frame.ticks, 1);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::InFlight);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut state = GameState::new(GameConfig::default(), 5);
        tick(&mut state, &launch_at(Vec2::new(320.0, 0.0)), 0.0);
        let pos = state.projectile.pos;
        tick(&mut state, &TickInput::default(), f32::NAN);
        tick(&mut state, &TickInput::default(), -1.0);
        assert_eq!(state.projectile.pos, pos);
        assert_eq!(state.phase, GamePhase::InFlight);
    }

    #[test]
    fn test_shot_lands_on_ceiling() {
        let mut state = empty_state(2);
        state.shots_remaining = 5;
        let color = state.projectile.color;
        tick(&mut state, &launch_at(Vec2::new(320.0, 0.0)), SIM_DT);
        let mut landed = None;
        for _ in 0..200 {
            let frame = tick(&mut state, &TickInput::default(), SIM_DT);
            if let Some(GameEvent::Landed { cell, .. }) = frame.events.first() {
                landed = Some(*cell);
                break;
            }
        }
        let cell = landed.expect("shot should reach the ceiling");
        assert_eq!(cell.row, 0);
        assert_eq!(state.grid.get(cell), Some(color));
        assert_eq!(state.shots_fired, 1);
        assert_eq!(state.shots_remaining, 4);
        assert_eq!(state.phase, GamePhase::Aiming);
    }

    #[test]
    fn test_has_landed_near_occupied_cell() {
        let mut state = empty_state(3);
        let cell = Cell::new(4, 3);
        state.grid.set(cell, Some(0));
        let center = state.grid.cell_center(cell);
        state.projectile.in_flight = true;

        // Just inside radius + radius - slack
        state.projectile.pos = center + Vec2::new(0.0, 37.5);
        assert!(has_landed(&state));
        state.projectile.pos = center + Vec2::new(0.0, 38.5);
        assert!(!has_landed(&state));
    }

    #[test]
    fn test_landing_pops_and_scores() {
        let mut state = empty_state(4);
        state.grid.set(Cell::new(0, 0), Some(1));
        state.grid.set(Cell::new(1, 0), Some(1));
        state.projectile.color = 1;
        state.projectile.in_flight = true;
        state.phase = GamePhase::InFlight;
        // Slightly above the (0,1) center, within reach of both ceiling cells
        state.projectile.pos = state.grid.cell_center(Cell::new(0, 1)) - Vec2::new(0.0, 3.0);

        let frame = tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(frame.score, 30);
        assert!(frame.events.contains(&GameEvent::Popped { count: 3, points: 30 }));
        assert!(!state.grid.is_any_occupied());
    }

    #[test]
    fn test_out_of_shots() {
        let mut state = empty_state(5);
        state.grid.set(Cell::new(9, 0), Some(0));
        state.score = 250;
        state.shots_remaining = 1;
        state.projectile.color = 2;
        state.projectile.in_flight = true;
        state.phase = GamePhase::InFlight;
        state.projectile.pos = state.grid.cell_center(Cell::new(0, 2));
        state.projectile.vel = Vec2::new(0.0, -600.0);

        // Fly until it lands
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.is_game_over() {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::GameOver(GameOverReason::OutOfShots));
        assert_eq!(state.shots_remaining, 0);
    }

    #[test]
    fn test_overflow_checked_every_tick() {
        let mut state = GameState::new(GameConfig::default(), 6);
        assert!(state.shots_remaining > 0);
        state.grid.set(Cell::new(3, 11), Some(0));
        let frame = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(frame.game_over, Some(GameOverReason::Overflow));
        assert!(frame.events.contains(&GameEvent::GameOver {
            reason: GameOverReason::Overflow
        }));
    }

    #[test]
    fn test_game_over_ignores_launch_and_pause() {
        let mut state = GameState::new(GameConfig::default(), 6);
        state.grid.set(Cell::new(3, 11), Some(0));
        tick(&mut state, &TickInput::default(), SIM_DT);

        let input = TickInput {
            launch: Some(Vec2::new(320.0, 0.0)),
            pause: true,
            ..Default::default()
        };
        let frame = tick(&mut state, &input, SIM_DT);
        assert_eq!(frame.game_over, Some(GameOverReason::Overflow));
        assert!(!frame.paused);
        assert!(!frame.projectile_in_flight);
    }

    #[test]
    fn test_banner_runs_out_after_game_over() {
        let mut state = GameState::new(GameConfig::default(), 6);
        state.advance_level();
        state.grid.set(Cell::new(3, 11), Some(0));
        let frame = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(frame.game_over, Some(GameOverReason::Overflow));
        assert!(frame.banner_remaining > 1.9);
        let ticks = frame.ticks;

        let mut frame = state.frame();
        for _ in 0..600 {
            frame = tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(frame.banner_remaining, 0.0);
        assert_eq!(frame.ticks, ticks);
        assert_eq!(frame.game_over, Some(GameOverReason::Overflow));
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = GameState::new(GameConfig::default(), 6);
        state.grid.set(Cell::new(3, 11), Some(0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.is_game_over());

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        let frame = tick(&mut state, &restart, SIM_DT);
        assert_eq!(frame.game_over, None);
        assert_eq!(frame.level, 1);
        assert_eq!(frame.credits, 0);
        assert!(frame.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_level_complete_on_target() {
        let mut state = GameState::new(GameConfig::default(), 8);
        state.score = state.params.target;
        let frame = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(frame.level, 2);
        assert_eq!(frame.credits, 10);
        assert_eq!(frame.score, 0);
        assert_eq!(frame.banner_remaining, 2.0);
        assert_eq!(state.phase, GamePhase::Aiming);

        // Banner counts down on later ticks
        let frame = tick(&mut state, &TickInput::default(), 0.5);
        assert!((frame.banner_remaining - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(GameConfig::default(), 99999);
        let mut state2 = GameState::new(GameConfig::default(), 99999);

        let inputs = [
            TickInput {
                aim: Some(Vec2::new(200.0, 300.0)),
                ..Default::default()
            },
            launch_at(Vec2::new(100.0, 200.0)),
            TickInput::default(),
            TickInput::default(),
        ];

        for _ in 0..50 {
            for input in &inputs {
                let a = tick(&mut state1, input, SIM_DT);
                let b = tick(&mut state2, input, SIM_DT);
                assert_eq!(a, b);
            }
        }
    }
}
