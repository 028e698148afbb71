//! Dance settings
//!
//! Already-resolved configuration values consumed by the controller. Loaded
//! from JSON; every field has a default so partial files are fine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MOVER, DEFAULT_SPINNER, MIN_FRAGMENT_INTERVAL_MS};
use crate::error::{DanceError, Result};

/// Tunables shared by the curve movers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverSettings {
    /// Bezier control point reach, in previous-speed units
    pub bezier_aggressiveness: f32,
    /// Bezier reach when leaving or entering a hold, in tenths of the chord
    pub bezier_hold_aggressiveness: f32,
    /// Aggressive mover reach, in pixels per millisecond of transition
    pub aggressive_scale: f32,
    /// Flower control point angle from the chord (degrees)
    pub flower_angle_offset: f32,
    /// Flower control point reach as a fraction of the chord length
    pub flower_distance_mult: f32,
}

impl Default for MoverSettings {
    fn default() -> Self {
        Self {
            bezier_aggressiveness: 60.0,
            bezier_hold_aggressiveness: 3.0,
            aggressive_scale: 1.0,
            flower_angle_offset: 90.0,
            flower_distance_mult: 0.666,
        }
    }
}

/// Tunables for spin strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerSettings {
    /// Distance from the zone centre (pixels)
    pub radius: f32,
    /// Full turns per second
    pub rotations_per_second: f32,
}

impl Default for SpinnerSettings {
    fn default() -> Self {
        Self {
            radius: 100.0,
            rotations_per_second: 5.0,
        }
    }
}

/// Cursor trail animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    /// Distance between laid trail points (pixels)
    pub spacing: f32,
    /// How long a trail point lives (milliseconds)
    pub lifetime_ms: f32,
    /// Hard cap on stored trail points
    pub max_points: usize,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            spacing: 2.0,
            lifetime_ms: 250.0,
            max_points: 512,
        }
    }
}

/// Dance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DanceSettings {
    /// Number of cooperating cursors (tag play when > 1)
    pub tag: usize,
    /// Mover names, cycled by cursor index
    pub movers: Vec<String>,
    /// Spinner names, cycled by cursor index
    pub spinners: Vec<String>,
    /// Duplicate every spin zone onto every cursor
    pub spinners_together: bool,
    /// Fragment holds into points before distributing (tag only)
    pub tag_slider_dance: bool,
    /// Time between hold fragments (milliseconds)
    pub slider_fragment_interval: f64,

    pub mover: MoverSettings,
    pub spinner: SpinnerSettings,
    pub trail: TrailSettings,
}

impl Default for DanceSettings {
    fn default() -> Self {
        Self {
            tag: 1,
            movers: vec![DEFAULT_MOVER.to_string()],
            spinners: vec![DEFAULT_SPINNER.to_string()],
            spinners_together: true,
            tag_slider_dance: false,
            slider_fragment_interval: 50.0,

            mover: MoverSettings::default(),
            spinner: SpinnerSettings::default(),
            trail: TrailSettings::default(),
        }
    }
}

impl DanceSettings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded dance settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Reject values the core cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tag == 0 {
            return Err(DanceError::invalid_settings("tag must be at least 1"));
        }
        let interval = self.slider_fragment_interval;
        if self.tag_slider_dance && (interval.is_nan() || interval < MIN_FRAGMENT_INTERVAL_MS) {
            return Err(DanceError::invalid_settings(format!(
                "slider_fragment_interval must be at least {MIN_FRAGMENT_INTERVAL_MS} ms"
            )));
        }
        if self.trail.spacing <= 0.0 {
            return Err(DanceError::invalid_settings("trail spacing must be positive"));
        }
        Ok(())
    }

    /// Mover name for a cursor (cycled, defaulted when the list is empty)
    pub fn mover_name(&self, cursor: usize) -> &str {
        cycled(&self.movers, cursor).unwrap_or(DEFAULT_MOVER)
    }

    /// Spinner name for a cursor (cycled, defaulted when the list is empty)
    pub fn spinner_name(&self, cursor: usize) -> &str {
        cycled(&self.spinners, cursor).unwrap_or(DEFAULT_SPINNER)
    }

    /// Whether hold fragmentation runs for this session
    pub fn dense_preprocessing(&self) -> bool {
        self.tag_slider_dance && self.tag > 1
    }
}

fn cycled(names: &[String], index: usize) -> Option<&str> {
    if names.is_empty() {
        None
    } else {
        Some(names[index % names.len()].as_str())
    }
}
