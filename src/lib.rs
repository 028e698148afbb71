//! Cursor Dance - autopilot cursor choreography for rhythm-game beatmaps
//!
//! Core modules:
//! - `beatmap`: Timed object model and the snapshot source the controller reads
//! - `dance`: Distribution, scheduling, movers and spinners (the motion core)
//! - `settings`: Resolved dance configuration
//! - `error`: Crate error type

pub mod beatmap;
pub mod dance;
pub mod error;
pub mod settings;

pub use beatmap::{Beatmap, HitObject, HoldPath, ObjectKind, ObjectSource};
pub use dance::{Controller, Cursor, CursorSink, Scheduler, SchedulerState};
pub use error::{DanceError, Result};
pub use settings::DanceSettings;

use glam::Vec2;

/// Playfield and timing constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep in milliseconds (120 Hz)
    pub const SIM_DT_MS: f64 = 1000.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (osu! pixels)
    pub const PLAYFIELD_WIDTH: f32 = 512.0;
    pub const PLAYFIELD_HEIGHT: f32 = 384.0;
    pub const PLAYFIELD_CENTER: Vec2 = Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT / 2.0);

    /// Smallest accepted gap between hold fragments (ms)
    pub const MIN_FRAGMENT_INTERVAL_MS: f64 = 1.0;
    /// Upper bound on fragments produced from a single hold
    pub const MAX_FRAGMENTS_PER_HOLD: usize = 8192;
    /// Upper bound on hold repeats
    pub const MAX_HOLD_SPANS: u32 = 1024;

    /// Strategy names used when the configured lists are empty
    pub const DEFAULT_MOVER: &str = "flower";
    pub const DEFAULT_SPINNER: &str = "circle";
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Angle of the direction from `from` to `to` (0 when the points coincide)
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    if d.length_squared() <= f32::EPSILON {
        0.0
    } else {
        d.y.atan2(d.x)
    }
}
