//! Circular arc geometry for the circular mover
//!
//! An arc is a centre, a radius, a start angle and a signed sweep. Positive
//! sweep turns counter-clockwise in playfield coordinates.

use glam::Vec2;

use crate::{cartesian_to_polar, polar_to_cartesian};

/// A circular arc in polar space around `center`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    pub center: Vec2,
    pub radius: f32,
    /// Start angle (radians)
    pub theta_start: f32,
    /// Signed angular sweep (radians)
    pub sweep: f32,
}

impl CircularArc {
    pub fn new(center: Vec2, radius: f32, theta_start: f32, sweep: f32) -> Self {
        Self {
            center,
            radius,
            theta_start,
            sweep,
        }
    }

    /// Half circle from `from` to `to`; `invert` picks the side it bulges to
    pub fn half_circle(from: Vec2, to: Vec2, invert: bool) -> Self {
        let center = (from + to) * 0.5;
        let (radius, theta_start) = cartesian_to_polar(from - center);
        let sweep = if invert {
            std::f32::consts::PI
        } else {
            -std::f32::consts::PI
        };
        Self::new(center, radius, theta_start, sweep)
    }

    /// Arc length
    pub fn length(&self) -> f32 {
        self.radius * self.sweep.abs()
    }

    /// Point at fraction `t` of the sweep
    pub fn point_at(&self, t: f32) -> Vec2 {
        let theta = self.theta_start + self.sweep * t.clamp(0.0, 1.0);
        self.center + polar_to_cartesian(self.radius, theta)
    }

    /// Start point of the arc
    pub fn start(&self) -> Vec2 {
        self.point_at(0.0)
    }

    /// End point of the arc
    pub fn end(&self) -> Vec2 {
        self.point_at(1.0)
    }
}
