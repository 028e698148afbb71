//! Timed objects
//!
//! Points are instantaneous targets, holds are followed along a polyline for
//! their whole duration (optionally going back and forth), spin zones ask for
//! sustained rotation around a centre.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAGMENTS_PER_HOLD, MAX_HOLD_SPANS};

/// Polyline path of a hold, travelled `spans` times (back and forth)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldPath {
    pub points: Vec<Vec2>,
    #[serde(default = "one_span")]
    pub spans: u32,
}

fn one_span() -> u32 {
    1
}

impl HoldPath {
    pub fn new(points: Vec<Vec2>, spans: u32) -> Self {
        Self {
            points,
            spans: spans.clamp(1, MAX_HOLD_SPANS),
        }
    }

    /// Total polyline length (one span)
    pub fn length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Segment index and fraction for a distance along the polyline
    fn locate(&self, distance: f32) -> Option<(usize, f32)> {
        if self.points.len() < 2 {
            return None;
        }
        let mut remaining = distance.max(0.0);
        let last = self.points.len() - 2;
        for (i, w) in self.points.windows(2).enumerate() {
            let len = w[0].distance(w[1]);
            if remaining <= len || i == last {
                let frac = if len > f32::EPSILON {
                    (remaining / len).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                return Some((i, frac));
            }
            remaining -= len;
        }
        None
    }

    /// Point at a distance along one forward span
    pub fn point_at_distance(&self, distance: f32) -> Vec2 {
        match self.locate(distance) {
            Some((i, frac)) => self.points[i].lerp(self.points[i + 1], frac),
            None => self.points.first().copied().unwrap_or(Vec2::ZERO),
        }
    }

    /// Span index and forward-span fraction for overall progress in [0, 1]
    fn span_progress(&self, progress: f64) -> (u32, f32) {
        let spans = self.spans.max(1);
        let p = progress.clamp(0.0, 1.0) * spans as f64;
        let span = (p.floor() as u32).min(spans - 1);
        let local = (p - span as f64) as f32;
        if span % 2 == 1 {
            (span, 1.0 - local)
        } else {
            (span, local)
        }
    }

    /// Position for overall progress in [0, 1] across all spans
    pub fn point_at_progress(&self, progress: f64) -> Vec2 {
        let (_, local) = self.span_progress(progress);
        self.point_at_distance(local * self.length())
    }

    /// Unit travel direction for overall progress (zero for degenerate paths)
    pub fn direction_at_progress(&self, progress: f64) -> Vec2 {
        let (span, local) = self.span_progress(progress);
        let Some((i, _)) = self.locate(local * self.length()) else {
            return Vec2::ZERO;
        };
        let forward = (self.points[i + 1] - self.points[i]).normalize_or_zero();
        if span % 2 == 1 { -forward } else { forward }
    }
}

/// Kind-specific geometry of a timed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    Point { pos: Vec2 },
    Hold { path: HoldPath },
    SpinZone { center: Vec2 },
}

/// A timed target on the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitObject {
    /// Beatmap index; hold fragments keep the id of their hold
    pub id: u32,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl HitObject {
    pub fn point(id: u32, time: f64, pos: Vec2) -> Self {
        Self {
            id,
            start_time: time,
            end_time: time,
            kind: ObjectKind::Point { pos },
        }
    }

    pub fn hold(id: u32, start_time: f64, end_time: f64, path: HoldPath) -> Self {
        Self {
            id,
            start_time,
            end_time: end_time.max(start_time),
            kind: ObjectKind::Hold { path },
        }
    }

    pub fn spin_zone(id: u32, start_time: f64, end_time: f64, center: Vec2) -> Self {
        Self {
            id,
            start_time,
            end_time: end_time.max(start_time),
            kind: ObjectKind::SpinZone { center },
        }
    }

    #[inline]
    pub fn is_spin_zone(&self) -> bool {
        matches!(self.kind, ObjectKind::SpinZone { .. })
    }

    #[inline]
    pub fn is_hold(&self) -> bool {
        matches!(self.kind, ObjectKind::Hold { .. })
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    fn progress(&self, time: f64) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 {
            1.0
        } else {
            ((time - self.start_time) / duration).clamp(0.0, 1.0)
        }
    }

    /// Position the object asks for at `time`
    ///
    /// Spin zones report their centre; the actual spin motion comes from the
    /// bound spin strategy.
    pub fn position_at(&self, time: f64) -> Vec2 {
        match &self.kind {
            ObjectKind::Point { pos } => *pos,
            ObjectKind::Hold { path } => path.point_at_progress(self.progress(time)),
            ObjectKind::SpinZone { center } => *center,
        }
    }

    pub fn start_pos(&self) -> Vec2 {
        self.position_at(self.start_time)
    }

    pub fn end_pos(&self) -> Vec2 {
        self.position_at(self.end_time)
    }

    /// Travel direction when the object begins (holds only)
    pub fn start_heading(&self) -> Vec2 {
        match &self.kind {
            ObjectKind::Hold { path } => path.direction_at_progress(0.0),
            _ => Vec2::ZERO,
        }
    }

    /// Travel direction when the object ends (holds only)
    pub fn end_heading(&self) -> Vec2 {
        match &self.kind {
            ObjectKind::Hold { path } => path.direction_at_progress(1.0),
            _ => Vec2::ZERO,
        }
    }

    /// Fragment times for a hold: start, every `interval`, span turns, end
    pub fn fragment_times(&self, interval: f64) -> Vec<f64> {
        let ObjectKind::Hold { path } = &self.kind else {
            return vec![self.start_time];
        };
        if self.duration() <= 0.0 {
            return vec![self.start_time];
        }

        let duration = self.duration();
        let mut times = vec![self.start_time, self.end_time];
        if interval > 0.0 {
            // Interval slots, capped; a finer interval than the cap allows is coarsened
            let slots = (duration / interval).ceil().min(MAX_FRAGMENTS_PER_HOLD as f64) as usize;
            let step = (duration / slots.max(1) as f64).max(interval);
            times.extend(
                (1..slots)
                    .map(|k| self.start_time + step * k as f64)
                    .take_while(|t| *t < self.end_time),
            );
        }
        let spans = path.spans.clamp(1, MAX_HOLD_SPANS);
        let span_duration = duration / spans as f64;
        times.extend((1..spans).map(|k| self.start_time + span_duration * k as f64));

        times.sort_by(f64::total_cmp);
        times.dedup_by(|a, b| (*a - *b).abs() < 1e-6);
        times
    }

    /// Split a hold into point targets; other kinds come back unchanged
    pub fn fragment(&self, interval: f64) -> Vec<HitObject> {
        if !self.is_hold() {
            return vec![self.clone()];
        }
        self.fragment_times(interval)
            .into_iter()
            .map(|t| HitObject::point(self.id, t, self.position_at(t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_path(spans: u32) -> HoldPath {
        HoldPath::new(
            vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), Vec2::new(100.0, 100.0)],
            spans,
        )
    }

    #[test]
    fn test_hold_path_length_and_points() {
        let path = l_path(1);
        assert!((path.length() - 200.0).abs() < 1e-4);
        assert_eq!(path.point_at_progress(0.0), Vec2::new(0.0, 0.0));
        assert!(path.point_at_progress(0.25).distance(Vec2::new(50.0, 0.0)) < 1e-3);
        assert!(path.point_at_progress(0.75).distance(Vec2::new(100.0, 50.0)) < 1e-3);
        assert_eq!(path.point_at_progress(1.0), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_hold_repeat_returns_to_start() {
        let hold = HitObject::hold(0, 0.0, 1000.0, l_path(2));
        assert!(hold.position_at(500.0).distance(Vec2::new(100.0, 100.0)) < 1e-3);
        assert!(hold.end_pos().distance(Vec2::ZERO) < 1e-3);
        // Travelling back along the first segment
        assert!(hold.end_heading().distance(Vec2::new(-1.0, 0.0)) < 1e-4);
        assert!(hold.start_heading().distance(Vec2::new(1.0, 0.0)) < 1e-4);
    }

    #[test]
    fn test_degenerate_paths() {
        let empty = HoldPath::new(Vec::new(), 1);
        assert_eq!(empty.point_at_progress(0.5), Vec2::ZERO);
        assert_eq!(empty.direction_at_progress(0.5), Vec2::ZERO);

        let single = HoldPath::new(vec![Vec2::new(3.0, 4.0)], 0);
        assert_eq!(single.spans, 1);
        assert_eq!(single.point_at_progress(1.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_fragment_times_cover_hold() {
        let hold = HitObject::hold(7, 100.0, 400.0, l_path(2));
        let times = hold.fragment_times(100.0);
        assert_eq!(times, vec![100.0, 200.0, 250.0, 300.0, 400.0]);

        let fragments = hold.fragment(100.0);
        assert_eq!(fragments.len(), times.len());
        assert!(fragments.iter().all(|f| f.id == 7 && !f.is_hold()));
        assert_eq!(fragments.first().unwrap().start_pos(), hold.start_pos());
        assert!(fragments.last().unwrap().start_pos().distance(hold.end_pos()) < 1e-3);
    }

    #[test]
    fn test_fragment_times_tiny_interval_is_bounded() {
        let hold = HitObject::hold(0, 1e6, 1e6 + 100.0, l_path(1));
        let times = hold.fragment_times(1e-11);
        assert!(times.len() <= MAX_FRAGMENTS_PER_HOLD + 1);
        assert_eq!(times.first(), Some(&1e6));
        assert_eq!(times.last(), Some(&(1e6 + 100.0)));
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_hold_spans_capped() {
        let path = HoldPath::new(vec![Vec2::ZERO, Vec2::X], u32::MAX);
        assert_eq!(path.spans, MAX_HOLD_SPANS);

        // Deserialized paths bypass `new`; fragmenting still stays bounded
        let hold = HitObject {
            id: 0,
            start_time: 0.0,
            end_time: 1000.0,
            kind: ObjectKind::Hold {
                path: HoldPath {
                    points: vec![Vec2::ZERO, Vec2::X],
                    spans: u32::MAX,
                },
            },
        };
        let times = hold.fragment_times(500.0);
        assert_eq!(times.len(), MAX_HOLD_SPANS as usize + 1);
    }

    #[test]
    fn test_fragment_leaves_points_alone() {
        let point = HitObject::point(1, 10.0, Vec2::ONE);
        assert_eq!(point.fragment(5.0), vec![point.clone()]);
    }

    #[test]
    fn test_object_json_shape() {
        let json = r#"{ "id": 3, "start_time": 10.0, "end_time": 10.0, "type": "point", "pos": [1.0, 2.0] }"#;
        let obj: HitObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj, HitObject::point(3, 10.0, Vec2::new(1.0, 2.0)));
    }
}
