//! The shot sphere: aiming, launch and wall-bounce integration

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::ColorIndex;
use crate::config::AimConfig;
use crate::{angle_to_dir, clamp_angle};

/// Launch angle from `origin` toward `target`.
///
/// Targets level with or below the origin are lifted so the shot always
/// goes up, and the result is clamped to the allowed aim range.
pub fn aim_angle(origin: Vec2, target: Vec2, aim: &AimConfig) -> f32 {
    let dx = target.x - origin.x;
    let dy = (target.y - origin.y).min(aim.min_upward_delta);
    clamp_angle(dy.atan2(dx), aim.min_angle, aim.max_angle)
}

/// A sphere that is either resting at the shooter or in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: ColorIndex,
    pub in_flight: bool,
}

impl Projectile {
    /// A resting projectile at `pos`
    pub fn new(pos: Vec2, radius: f32, color: ColorIndex) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            color,
            in_flight: false,
        }
    }

    /// Fire from `origin` toward `target` at `speed` px/s
    pub fn launch(&mut self, origin: Vec2, target: Vec2, speed: f32, aim: &AimConfig) {
        let angle = aim_angle(origin, target, aim);
        self.vel = angle_to_dir(angle) * speed;
        self.in_flight = true;
    }

    /// Park the resting shot along the aim direction
    pub fn hold(&mut self, origin: Vec2, angle: f32, distance: f32) {
        if !self.in_flight {
            self.pos = origin + angle_to_dir(angle) * distance;
        }
    }

    /// Advance by `vel * dt`, bouncing off the side walls at `0` and `width`
    pub fn integrate(&mut self, dt: f32, width: f32) {
        if !self.in_flight {
            return;
        }
        self.pos += self.vel * dt;

        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x = -self.vel.x;
        }
        if self.pos.x + self.radius > width {
            self.pos.x = width - self.radius;
            self.vel.x = -self.vel.x;
        }
    }

    /// Leading edge at or above the ceiling line
    #[inline]
    pub fn reached_ceiling(&self, top: f32) -> bool {
        self.pos.y - self.radius <= top
    }
}
