//! Curve evaluation helpers used by movers

use glam::Vec2;

/// Point on a Bezier curve of any degree (de Casteljau)
pub fn bezier_point(points: &[Vec2], t: f32) -> Vec2 {
    match points {
        [] => Vec2::ZERO,
        [only] => *only,
        _ => {
            let mut work = points.to_vec();
            let n = work.len();
            for level in 1..n {
                for i in 0..n - level {
                    work[i] = work[i].lerp(work[i + 1], t);
                }
            }
            work[0]
        }
    }
}

/// Cubic Hermite interpolation between `p0` and `p1` with tangents `m0`, `m1`
#[inline]
pub fn hermite_point(p0: Vec2, m0: Vec2, p1: Vec2, m1: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
}

/// Point at fraction `t` of a polyline's total length
pub fn polyline_point(points: &[Vec2], t: f32) -> Vec2 {
    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    if points.len() < 2 || total <= f32::EPSILON {
        return points.first().copied().unwrap_or(Vec2::ZERO);
    }

    let mut remaining = total * t.clamp(0.0, 1.0);
    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if remaining <= len {
            let frac = if len > f32::EPSILON { remaining / len } else { 0.0 };
            return w[0].lerp(w[1], frac);
        }
        remaining -= len;
    }
    points[points.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bezier_endpoints_and_midpoint() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(50.0, 100.0), Vec2::new(100.0, 0.0)];
        assert_eq!(bezier_point(&pts, 0.0), pts[0]);
        assert!(bezier_point(&pts, 1.0).distance(pts[2]) < 1e-4);
        // Quadratic midpoint sits halfway to the control point
        assert!(bezier_point(&pts, 0.5).distance(Vec2::new(50.0, 50.0)) < 1e-4);
    }

    #[test]
    fn test_bezier_degenerate() {
        assert_eq!(bezier_point(&[], 0.3), Vec2::ZERO);
        assert_eq!(bezier_point(&[Vec2::ONE], 0.3), Vec2::ONE);
    }

    #[test]
    fn test_hermite_endpoints() {
        let p0 = Vec2::new(10.0, 10.0);
        let p1 = Vec2::new(90.0, 40.0);
        let m = Vec2::new(200.0, -50.0);
        assert_eq!(hermite_point(p0, m, p1, m, 0.0), p0);
        assert!(hermite_point(p0, m, p1, m, 1.0).distance(p1) < 1e-3);
    }

    #[test]
    fn test_polyline_by_length() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0), Vec2::new(30.0, 10.0)];
        assert!(polyline_point(&pts, 0.5).distance(Vec2::new(20.0, 0.0)) < 1e-4);
        assert!(polyline_point(&pts, 1.0).distance(pts[2]) < 1e-4);
        assert_eq!(polyline_point(&[Vec2::ONE, Vec2::ONE], 0.7), Vec2::ONE);
    }
}
