//! Globe spin: a longitude angle advanced by an angular velocity each tick.

use std::f64::consts::PI;
use std::time::Duration;

use crate::projection::normalize_longitude;
use crate::render::RenderOptions;

pub const TICK_INTERVAL: Duration = Duration::from_millis(33);

/// Velocity step for fine speed control, in radians per tick.
pub const ROTATION_INTERVAL: f64 = PI / (120.0 * (1000.0 / 33.0));

/// Velocity of a held spin, in radians per tick.
pub const ROTATION_CONSTANT: f64 = 30.5 * ROTATION_INTERVAL;

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() < ROTATION_INTERVAL / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spin {
    angle: f64,
    velocity: f64,
}

impl Spin {
    /// Spin at a constant `velocity` in radians per tick.
    pub fn with_velocity(velocity: f64) -> Self {
        Self {
            angle: 0.0,
            velocity,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn spin_left(&mut self) {
        self.velocity = ROTATION_CONSTANT;
    }

    pub fn spin_right(&mut self) {
        self.velocity = -ROTATION_CONSTANT;
    }

    pub fn nudge_left(&mut self) {
        self.velocity += ROTATION_INTERVAL;
    }

    pub fn nudge_right(&mut self) {
        self.velocity -= ROTATION_INTERVAL;
    }

    /// Stops a held spin to the left; a nudged velocity keeps going.
    pub fn release_left(&mut self) {
        if close_enough(self.velocity, ROTATION_CONSTANT) {
            self.velocity = 0.0;
        }
    }

    pub fn release_right(&mut self) {
        if close_enough(self.velocity, -ROTATION_CONSTANT) {
            self.velocity = 0.0;
        }
    }

    pub fn pause(&mut self) {
        self.velocity = 0.0;
    }

    pub fn reset(&mut self) {
        self.angle = 0.0;
    }

    /// Advances one tick and returns the new angle in `(-π, π]`.
    pub fn tick(&mut self) -> f64 {
        self.angle = normalize_longitude(self.angle + self.velocity);
        self.angle
    }

    /// Render options showing the globe at the current angle.
    pub fn render_options(&self, base: RenderOptions) -> RenderOptions {
        RenderOptions {
            rotation: self.angle,
            ..base
        }
    }
}
