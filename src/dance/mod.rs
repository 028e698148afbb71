//! Motion core
//!
//! Everything that turns a beatmap into cursor positions lives here. This
//! module must stay deterministic:
//! - Same objects, settings and time sequence give the same positions
//! - Positions at a given time do not depend on how often `update` ran
//! - No rendering or platform dependencies

pub mod arc;
pub mod controller;
pub mod cursor;
pub mod distributor;
pub mod movers;
pub mod scheduler;
pub mod spinners;

pub use arc::CircularArc;
pub use controller::Controller;
pub use cursor::{Cursor, CursorSink, TrailPoint};
pub use distributor::{DistributorOptions, distribute, preprocess_dense};
pub use movers::{Mover, MoverKind, Transition, Waypoint};
pub use scheduler::{Scheduler, SchedulerState};
pub use spinners::{Spin, SpinKind};
