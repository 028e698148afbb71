//! Beatmap object model
//!
//! Parsing real beatmap formats lives elsewhere; this module holds the ordered
//! object list the dance core reads, its JSON form, and a seeded generator for
//! demos and tests.

pub mod object;

pub use object::{HitObject, HoldPath, ObjectKind};

use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_HOLD_SPANS, PLAYFIELD_CENTER, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::error::Result;

/// Supplies a fresh snapshot of the beatmap's objects
///
/// The returned objects must not change when the source is mutated later.
pub trait ObjectSource {
    fn objects_copy(&self) -> Vec<Rc<HitObject>>;
}

/// An ordered list of timed objects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Beatmap {
    #[serde(default)]
    pub title: String,
    pub objects: Vec<HitObject>,
}

impl Beatmap {
    /// Build a beatmap, stable-sorting objects by start time
    ///
    /// Objects ending before they start are clamped to end at their start,
    /// and hold repeats are capped, the same way the object constructors do.
    pub fn new(title: impl Into<String>, mut objects: Vec<HitObject>) -> Self {
        for obj in &mut objects {
            if obj.end_time < obj.start_time {
                log::warn!(
                    "Object {} ends before it starts ({} < {}), clamping",
                    obj.id,
                    obj.end_time,
                    obj.start_time
                );
                obj.end_time = obj.start_time;
            }
            if let ObjectKind::Hold { path } = &mut obj.kind {
                if path.spans == 0 || path.spans > MAX_HOLD_SPANS {
                    log::warn!("Object {} has {} repeats, clamping", obj.id, path.spans);
                    path.spans = path.spans.clamp(1, MAX_HOLD_SPANS);
                }
            }
        }

        let sorted = objects
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time);
        if !sorted {
            log::warn!("Beatmap objects were not time-ordered, sorting");
            objects.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        }
        Self {
            title: title.into(),
            objects,
        }
    }

    /// Parse the JSON form (`{ "title": ..., "objects": [...] }`)
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Beatmap = serde_json::from_str(json)?;
        Ok(Self::new(raw.title, raw.objects))
    }

    /// Load the JSON form from disk
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let map = Self::from_json(&json)?;
        log::info!(
            "Loaded beatmap '{}' ({} objects) from {}",
            map.title,
            map.objects.len(),
            path.as_ref().display()
        );
        Ok(map)
    }

    /// Deterministic synthetic beatmap
    ///
    /// Mostly points, with some holds and the occasional spin zone.
    pub fn generate(seed: u64, count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let margin = 32.0;
        let random_pos = |rng: &mut Pcg32| {
            Vec2::new(
                rng.random_range(margin..PLAYFIELD_WIDTH - margin),
                rng.random_range(margin..PLAYFIELD_HEIGHT - margin),
            )
        };

        let mut objects = Vec::with_capacity(count);
        let mut time = 1000.0;
        for id in 0..count as u32 {
            let roll = rng.random_range(0..20u32);
            let obj = match roll {
                0 => {
                    let duration = rng.random_range(1000.0..2000.0);
                    HitObject::spin_zone(id, time, time + duration, PLAYFIELD_CENTER)
                }
                1..=4 => {
                    let segments = rng.random_range(1..=3usize);
                    let points = (0..=segments).map(|_| random_pos(&mut rng)).collect();
                    let spans = rng.random_range(1..=2u32);
                    let duration = rng.random_range(300.0..800.0) * spans as f64;
                    HitObject::hold(id, time, time + duration, HoldPath::new(points, spans))
                }
                _ => HitObject::point(id, time, random_pos(&mut rng)),
            };
            time = obj.end_time + rng.random_range(150.0..450.0);
            objects.push(obj);
        }

        Self::new(format!("generated-{seed}"), objects)
    }

    /// First start and last end (None when empty)
    pub fn time_span(&self) -> Option<(f64, f64)> {
        let first = self.objects.first()?.start_time;
        let last = self
            .objects
            .iter()
            .map(|o| o.end_time)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((first, last))
    }
}

impl ObjectSource for Beatmap {
    fn objects_copy(&self) -> Vec<Rc<HitObject>> {
        self.objects.iter().cloned().map(Rc::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_stably() {
        let map = Beatmap::new(
            "t",
            vec![
                HitObject::point(0, 200.0, Vec2::ZERO),
                HitObject::point(1, 100.0, Vec2::ZERO),
                HitObject::point(2, 100.0, Vec2::ONE),
            ],
        );
        let ids: Vec<u32> = map.objects.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = Beatmap::generate(42, 64);
        let b = Beatmap::generate(42, 64);
        assert_eq!(a, b);
        assert_eq!(a.objects.len(), 64);
        assert!(a.objects.windows(2).all(|w| w[0].end_time < w[1].start_time));
    }

    #[test]
    fn test_objects_copy_is_a_snapshot() {
        let mut map = Beatmap::new("t", vec![HitObject::point(0, 0.0, Vec2::ZERO)]);
        let snapshot = map.objects_copy();
        map.objects[0].start_time = 500.0;
        map.objects.push(HitObject::point(1, 600.0, Vec2::ONE));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].start_time, 0.0);
    }

    #[test]
    fn test_from_json_clamps_inverted_times() {
        let json = r#"{
            "objects": [
                { "id": 0, "start_time": 0.0, "end_time": 0.0, "type": "point", "pos": [0.0, 0.0] },
                { "id": 1, "start_time": 1000.0, "end_time": 500.0, "type": "point", "pos": [100.0, 0.0] },
                { "id": 2, "start_time": 2000.0, "end_time": 2000.0, "type": "point", "pos": [200.0, 0.0] },
                { "id": 3, "start_time": 3000.0, "end_time": 3500.0, "type": "hold",
                  "path": { "points": [[0.0, 0.0], [10.0, 0.0]], "spans": 4000000000 } }
            ]
        }"#;
        let map = Beatmap::from_json(json).unwrap();
        assert_eq!(map.objects[1].end_time, 1000.0);
        match &map.objects[3].kind {
            ObjectKind::Hold { path } => assert_eq!(path.spans, MAX_HOLD_SPANS),
            other => panic!("expected hold, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "title": "two",
            "objects": [
                { "id": 0, "start_time": 0.0, "end_time": 0.0, "type": "point", "pos": [0.0, 0.0] },
                { "id": 1, "start_time": 100.0, "end_time": 500.0, "type": "spin_zone", "center": [256.0, 192.0] }
            ]
        }"#;
        let map = Beatmap::from_json(json).unwrap();
        assert_eq!(map.objects.len(), 2);
        assert!(map.objects[1].is_spin_zone());
        assert_eq!(map.time_span(), Some((0.0, 500.0)));
    }
}
