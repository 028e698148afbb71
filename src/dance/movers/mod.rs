//! Movers: cursor paths between consecutive objects
//!
//! A [`Mover`] belongs to one scheduler and is asked for a [`Transition`]
//! each time the scheduler reaches a new pair of objects. Transitions are
//! pure functions of time; the mover itself only remembers what the curve
//! strategies need to keep consecutive moves flowing (alternation side,
//! last control point, previous speed).
//!
//! Movers never see raw objects, only resolved [`Waypoint`]s, so spin zones
//! reach them already turned into the bound spin's entry/exit points.

pub mod curves;

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::CircularArc;
use crate::beatmap::HitObject;
use crate::settings::MoverSettings;
use crate::{angle_between, polar_to_cartesian};
use curves::{bezier_point, hermite_point, polyline_point};

/// Resolved entry or exit of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Milliseconds
    pub time: f64,
    pub pos: Vec2,
    /// Unit travel direction at this point (zero when the object is static)
    pub heading: Vec2,
}

impl Waypoint {
    pub fn new(time: f64, pos: Vec2) -> Self {
        Self {
            time,
            pos,
            heading: Vec2::ZERO,
        }
    }

    pub fn with_heading(mut self, heading: Vec2) -> Self {
        self.heading = heading.normalize_or_zero();
        self
    }

    /// Where the cursor must be when `obj` starts
    ///
    /// Spin zones are resolved through their spin, not here.
    pub fn entry(obj: &HitObject) -> Self {
        debug_assert!(!obj.is_spin_zone(), "spin zone entry must come from its spin");
        Self::new(obj.start_time, obj.start_pos()).with_heading(obj.start_heading())
    }

    /// Where the cursor is when `obj` ends
    pub fn exit(obj: &HitObject) -> Self {
        debug_assert!(!obj.is_spin_zone(), "spin zone exit must come from its spin");
        Self::new(obj.end_time, obj.end_pos()).with_heading(obj.end_heading())
    }

    #[inline]
    fn has_heading(&self) -> bool {
        self.heading != Vec2::ZERO
    }
}

/// Built-in mover strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoverKind {
    Smooth,
    Bezier,
    Circular,
    Linear,
    Axis,
    Aggressive,
    #[default]
    Flower,
}

impl MoverKind {
    pub const ALL: [MoverKind; 7] = [
        MoverKind::Smooth,
        MoverKind::Bezier,
        MoverKind::Circular,
        MoverKind::Linear,
        MoverKind::Axis,
        MoverKind::Aggressive,
        MoverKind::Flower,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoverKind::Smooth => "smooth",
            MoverKind::Bezier => "bezier",
            MoverKind::Circular => "circular",
            MoverKind::Linear => "linear",
            MoverKind::Axis => "axis",
            MoverKind::Aggressive => "aggressive",
            MoverKind::Flower => "flower",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "smooth" => Some(MoverKind::Smooth),
            "bezier" => Some(MoverKind::Bezier),
            "circular" | "halfcircle" => Some(MoverKind::Circular),
            "linear" => Some(MoverKind::Linear),
            "axis" => Some(MoverKind::Axis),
            "aggressive" => Some(MoverKind::Aggressive),
            "flower" | "angleoffset" => Some(MoverKind::Flower),
            _ => None,
        }
    }

    /// Resolve a configured name, falling back to the default strategy
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            let fallback = Self::default();
            log::warn!("Unknown mover '{}', using '{}'", name, fallback.as_str());
            fallback
        })
    }
}

/// Shape of a transition
#[derive(Debug, Clone, PartialEq)]
enum Curve {
    Line,
    Bezier(Vec<Vec2>),
    Arc(CircularArc),
    Polyline(Vec<Vec2>),
    Hermite { m0: Vec2, m1: Vec2 },
}

/// Cursor path between two waypoints
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Waypoint,
    pub to: Waypoint,
    curve: Curve,
}

impl Transition {
    fn new(from: Waypoint, to: Waypoint, curve: Curve) -> Self {
        Self { from, to, curve }
    }

    /// Fraction of the transition elapsed at `time`, clamped to [0, 1]
    pub fn progress(&self, time: f64) -> f32 {
        let duration = self.to.time - self.from.time;
        if duration <= 0.0 {
            1.0
        } else {
            ((time - self.from.time) / duration).clamp(0.0, 1.0) as f32
        }
    }

    /// Cursor position at `time`
    pub fn position_at(&self, time: f64) -> Vec2 {
        let t = self.progress(time);
        if t >= 1.0 {
            return self.to.pos;
        }
        if t <= 0.0 {
            return self.from.pos;
        }

        match &self.curve {
            Curve::Line => self.from.pos.lerp(self.to.pos, t),
            Curve::Bezier(points) => bezier_point(points, t),
            Curve::Arc(arc) => arc.point_at(t),
            Curve::Polyline(points) => polyline_point(points, t),
            Curve::Hermite { m0, m1 } => hermite_point(self.from.pos, *m0, self.to.pos, *m1, t),
        }
    }
}

/// Per-scheduler mover with cross-transition memory
#[derive(Debug, Clone)]
pub struct Mover {
    kind: MoverKind,
    settings: MoverSettings,
    /// Alternates the bulge side (circular, flower)
    invert: bool,
    /// Last Bezier control point before the previous destination
    last_control: Option<Vec2>,
    /// Pixels per millisecond of the previous move (bezier)
    previous_speed: Option<f32>,
    /// Angle from the previous destination back to its last control point
    last_angle: f32,
    /// Arrival tangent of the previous move (smooth)
    last_tangent: Option<Vec2>,
}

impl Mover {
    pub fn new(kind: MoverKind, settings: MoverSettings) -> Self {
        Self {
            kind,
            settings,
            invert: false,
            last_control: None,
            previous_speed: None,
            last_angle: 0.0,
            last_tangent: None,
        }
    }

    pub fn kind(&self) -> MoverKind {
        self.kind
    }

    /// Forget everything learned from previous moves
    pub fn reset(&mut self) {
        *self = Self::new(self.kind, self.settings.clone());
    }

    /// Build the path from `from` to `to`
    pub fn transition(&mut self, from: Waypoint, to: Waypoint) -> Transition {
        let curve = match self.kind {
            MoverKind::Linear => Curve::Line,
            MoverKind::Bezier => self.bezier(&from, &to),
            MoverKind::Circular => self.half_circle(&from, &to),
            MoverKind::Axis => axis(&from, &to),
            MoverKind::Aggressive => self.aggressive(&from, &to),
            MoverKind::Flower => self.flower(&from, &to),
            MoverKind::Smooth => self.smooth(&from, &to),
        };
        Transition::new(from, to, curve)
    }

    fn bezier(&mut self, from: &Waypoint, to: &Waypoint) -> Curve {
        let dist = from.pos.distance(to.pos);
        let duration = (to.time - from.time).max(1.0) as f32;
        let speed = self.previous_speed.unwrap_or(dist / duration);
        self.previous_speed = Some((dist + 1.0) / duration);

        if dist <= f32::EPSILON {
            self.last_control = None;
            return Curve::Line;
        }

        let hold_reach = dist * self.settings.bezier_hold_aggressiveness / 10.0;
        let out = if from.has_heading() {
            from.pos + from.heading * hold_reach
        } else {
            let dir = self
                .last_control
                .map(|c| (from.pos - c).normalize_or_zero())
                .unwrap_or(Vec2::ZERO);
            from.pos + dir * speed * self.settings.bezier_aggressiveness
        };

        let mut points = vec![from.pos, out];
        if to.has_heading() {
            points.push(to.pos - to.heading * hold_reach);
        }
        self.last_control = points.last().copied();
        points.push(to.pos);
        Curve::Bezier(points)
    }

    fn half_circle(&mut self, from: &Waypoint, to: &Waypoint) -> Curve {
        if from.pos.distance(to.pos) <= f32::EPSILON {
            return Curve::Line;
        }
        let arc = CircularArc::half_circle(from.pos, to.pos, self.invert);
        self.invert = !self.invert;
        Curve::Arc(arc)
    }

    fn aggressive(&mut self, from: &Waypoint, to: &Waypoint) -> Curve {
        let reach = (to.time - from.time).max(0.0) as f32 * self.settings.aggressive_scale;
        let angle = if from.has_heading() {
            from.heading.y.atan2(from.heading.x)
        } else {
            self.last_angle + PI
        };

        let mut points = vec![from.pos, from.pos + polar_to_cartesian(reach, angle)];
        if to.has_heading() {
            points.push(to.pos - to.heading * reach);
        }
        if reach > 1.0 {
            if let Some(last) = points.last() {
                self.last_angle = angle_between(to.pos, *last);
            }
        }
        points.push(to.pos);
        Curve::Bezier(points)
    }

    fn flower(&mut self, from: &Waypoint, to: &Waypoint) -> Curve {
        let dist = from.pos.distance(to.pos);
        if dist <= f32::EPSILON {
            return Curve::Line;
        }

        let base = angle_between(from.pos, to.pos);
        let sign = if self.invert { -1.0 } else { 1.0 };
        let offset = self.settings.flower_angle_offset.to_radians() * sign;
        let reach = dist * self.settings.flower_distance_mult;
        self.invert = !self.invert;

        let c1 = if from.has_heading() {
            from.pos + from.heading * reach
        } else {
            from.pos + polar_to_cartesian(reach, base + offset)
        };
        let c2 = if to.has_heading() {
            to.pos - to.heading * reach
        } else {
            to.pos + polar_to_cartesian(reach, base + PI - offset)
        };
        Curve::Bezier(vec![from.pos, c1, c2, to.pos])
    }

    fn smooth(&mut self, from: &Waypoint, to: &Waypoint) -> Curve {
        let chord = to.pos - from.pos;
        let len = chord.length();

        let m0 = if from.has_heading() {
            from.heading * len
        } else if let Some(prev) = self.last_tangent {
            prev.normalize_or_zero() * len
        } else {
            chord
        };
        let m1 = if to.has_heading() { to.heading * len } else { chord };
        self.last_tangent = Some(m1);

        Curve::Hermite { m0, m1 }
    }
}

/// L-shaped path, longer axis first
fn axis(from: &Waypoint, to: &Waypoint) -> Curve {
    let d = to.pos - from.pos;
    let corner = if d.x.abs() < d.y.abs() {
        Vec2::new(from.pos.x, to.pos.y)
    } else {
        Vec2::new(to.pos.x, from.pos.y)
    };
    Curve::Polyline(vec![from.pos, corner, to.pos])
}
