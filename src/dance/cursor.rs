//! Cursor state handed to the renderer
//!
//! Schedulers write target positions through [`CursorSink`]; the cursor then
//! animates its own trail once per frame from the distance travelled.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::TrailSettings;

/// Anything a scheduler can write positions into
pub trait CursorSink {
    fn set_pos(&mut self, pos: Vec2);
}

/// Trail point for cursor rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// Milliseconds since the point was laid
    pub age: f32,
}

/// A visible cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cursor {
    pub position: Vec2,
    /// Position at the previous `update`
    pub last_position: Vec2,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
    #[serde(skip)]
    settings: TrailSettings,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(TrailSettings::default())
    }
}

impl Cursor {
    pub fn new(settings: TrailSettings) -> Self {
        Self {
            position: Vec2::ZERO,
            last_position: Vec2::ZERO,
            trail: Vec::with_capacity(settings.max_points),
            settings,
        }
    }

    /// Distance moved since the previous `update`
    pub fn travelled(&self) -> f32 {
        self.position.distance(self.last_position)
    }

    /// Advance trail animation by `delta` milliseconds of frame time
    pub fn update(&mut self, delta: f64) {
        let delta = delta.max(0.0) as f32;
        let lifetime = self.settings.lifetime_ms;
        for point in &mut self.trail {
            point.age += delta;
        }
        self.trail.retain(|p| p.age < lifetime);

        // Lay points along the segment, newest first, ahead of the older trail
        let segment = self.position - self.last_position;
        let steps = (segment.length() / self.settings.spacing).floor() as usize;
        let steps = steps.min(self.settings.max_points);
        let mut laid: Vec<TrailPoint> = (1..=steps)
            .rev()
            .map(|i| {
                let t = i as f32 / steps as f32;
                TrailPoint {
                    pos: self.last_position + segment * t,
                    age: delta * (1.0 - t),
                }
            })
            .collect();
        laid.append(&mut self.trail);
        self.trail = laid;
        if steps == 0 && self.trail.is_empty() {
            self.trail.push(TrailPoint {
                pos: self.position,
                age: 0.0,
            });
        }

        self.trail.truncate(self.settings.max_points);
        self.last_position = self.position;
    }
}

impl CursorSink for Cursor {
    fn set_pos(&mut self, pos: Vec2) {
        self.position = pos;
    }
}

impl CursorSink for Vec2 {
    fn set_pos(&mut self, pos: Vec2) {
        *self = pos;
    }
}
