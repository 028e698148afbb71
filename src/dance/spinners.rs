//! Spin strategies: sustained motion inside a spin zone
//!
//! A [`Spin`] is bound to one zone and maps time to a point on a closed shape
//! around the zone centre. The shape is traced `rotations_per_second` times a
//! second.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::movers::Waypoint;
use crate::beatmap::{HitObject, ObjectKind};
use crate::polar_to_cartesian;
use crate::settings::SpinnerSettings;

/// Step used for heading estimates (milliseconds)
const HEADING_STEP_MS: f64 = 1.0;

/// Built-in spin strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinKind {
    #[default]
    Circle,
    Heart,
    Square,
    Triangle,
    Spiral,
}

impl SpinKind {
    pub const ALL: [SpinKind; 5] = [
        SpinKind::Circle,
        SpinKind::Heart,
        SpinKind::Square,
        SpinKind::Triangle,
        SpinKind::Spiral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpinKind::Circle => "circle",
            SpinKind::Heart => "heart",
            SpinKind::Square => "square",
            SpinKind::Triangle => "triangle",
            SpinKind::Spiral => "spiral",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "circle" => Some(SpinKind::Circle),
            "heart" => Some(SpinKind::Heart),
            "square" => Some(SpinKind::Square),
            "triangle" => Some(SpinKind::Triangle),
            "spiral" => Some(SpinKind::Spiral),
            _ => None,
        }
    }

    /// Resolve a configured name, falling back to the circle
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            let fallback = Self::default();
            log::warn!("Unknown spinner '{}', using '{}'", name, fallback.as_str());
            fallback
        })
    }

    /// Bind this strategy to a spin zone
    pub fn bind(self, zone: &HitObject, settings: &SpinnerSettings) -> Spin {
        let center = match zone.kind {
            ObjectKind::SpinZone { center } => center,
            _ => {
                debug_assert!(false, "spin bound to a non-spin object {}", zone.id);
                zone.start_pos()
            }
        };
        Spin {
            kind: self,
            center,
            radius: settings.radius,
            rotations_per_second: settings.rotations_per_second,
            start_time: zone.start_time,
            end_time: zone.end_time,
        }
    }
}

/// A spin strategy bound to one zone
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    pub kind: SpinKind,
    pub center: Vec2,
    pub radius: f32,
    pub rotations_per_second: f32,
    pub start_time: f64,
    pub end_time: f64,
}

impl Spin {
    /// Cursor position at `time` (clamped to the zone)
    pub fn position_at(&self, time: f64) -> Vec2 {
        let time = time.clamp(self.start_time, self.end_time.max(self.start_time));
        let elapsed = time - self.start_time;
        let turns = elapsed / 1000.0 * self.rotations_per_second as f64;
        let angle = (turns.fract() * TAU as f64) as f32;
        let r = self.radius;

        let offset = match self.kind {
            SpinKind::Circle => polar_to_cartesian(r, angle),
            SpinKind::Heart => {
                let s = angle.sin();
                let x = 16.0 * s * s * s;
                let y = -(13.0 * angle.cos()
                    - 5.0 * (2.0 * angle).cos()
                    - 2.0 * (3.0 * angle).cos()
                    - (4.0 * angle).cos());
                Vec2::new(x, y) * (r / 16.0)
            }
            SpinKind::Square => polygon_point(4, r, turns.fract() as f32),
            SpinKind::Triangle => polygon_point(3, r, turns.fract() as f32),
            SpinKind::Spiral => {
                let duration = self.end_time - self.start_time;
                let progress = if duration <= 0.0 {
                    1.0
                } else {
                    (elapsed / duration) as f32
                };
                polar_to_cartesian(r * progress, angle)
            }
        };
        self.center + offset
    }

    /// Unit direction of travel at `time` (central differences)
    pub fn heading_at(&self, time: f64) -> Vec2 {
        let ahead = self.position_at(time + HEADING_STEP_MS);
        let behind = self.position_at(time - HEADING_STEP_MS);
        (ahead - behind).normalize_or_zero()
    }

    pub fn entry(&self) -> Waypoint {
        Waypoint::new(self.start_time, self.position_at(self.start_time))
            .with_heading(self.heading_at(self.start_time))
    }

    pub fn exit(&self) -> Waypoint {
        Waypoint::new(self.end_time, self.position_at(self.end_time))
            .with_heading(self.heading_at(self.end_time))
    }
}

/// Point at fraction `f` along the perimeter of a regular polygon
fn polygon_point(sides: usize, radius: f32, f: f32) -> Vec2 {
    let corner = |k: usize| polar_to_cartesian(radius, k as f32 * TAU / sides as f32 - FRAC_PI_2);
    let along = f.clamp(0.0, 1.0) * sides as f32;
    let k = (along.floor() as usize).min(sides - 1);
    corner(k).lerp(corner(k + 1), along - k as f32)
}
