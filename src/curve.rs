//! Smooth 3D centerline curves.
//!
//! A [`Centerline`] interpolates a small set of control samples with a
//! Catmull-Rom spline and answers position queries by normalized parameter
//! `t` in `[0, 1]`. The stem is built from one, and leaves and the flower
//! head are anchored to points on it.

use crate::error::BuildError;
use glam::Vec3;

/// An immutable Catmull-Rom spline through ordered control points.
///
/// The spline passes through every control point, including both endpoints.
///
/// # Example
///
/// ```
/// use glam::Vec3;
/// use lotus::curve::Centerline;
///
/// let curve = Centerline::new(vec![
///     Vec3::ZERO,
///     Vec3::new(0.1, 1.0, 0.0),
///     Vec3::new(0.0, 2.0, 0.0),
/// ]).unwrap();
///
/// assert!(curve.point_at(0.0).distance(Vec3::ZERO) < 1e-6);
/// assert!(curve.point_at(1.0).distance(Vec3::new(0.0, 2.0, 0.0)) < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Centerline {
    points: Vec<Vec3>,
}

impl Centerline {
    /// Build a centerline from at least two control points.
    pub fn new(points: Vec<Vec3>) -> Result<Self, BuildError> {
        if points.len() < 2 {
            return Err(BuildError::EmptyCenterline);
        }
        Ok(Self { points })
    }

    /// Number of control points.
    #[inline]
    pub fn control_count(&self) -> usize {
        self.points.len()
    }

    /// Position on the curve at normalized parameter `t`.
    ///
    /// `t` is clamped to `[0, 1]`; `0` is the first control point, `1` the
    /// last.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let segments = self.points.len() - 1;
        let scaled = t * segments as f32;
        let seg = (scaled as usize).min(segments - 1);
        let local = scaled - seg as f32;

        // Endpoints are duplicated so the spline interpolates them.
        let p0 = self.points[seg.saturating_sub(1)];
        let p1 = self.points[seg];
        let p2 = self.points[seg + 1];
        let p3 = self.points[(seg + 2).min(self.points.len() - 1)];

        catmull_rom(p0, p1, p2, p3, local)
    }

    /// Sample `count + 1` evenly spaced points along the curve.
    pub fn sample(&self, count: usize) -> Vec<Vec3> {
        (0..=count)
            .map(|i| self.point_at(i as f32 / count as f32))
            .collect()
    }
}

/// Uniform Catmull-Rom interpolation between `p1` and `p2`.
fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - 3.0 * p2 + p3 - p0) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bent() -> Centerline {
        Centerline::new(vec![
            Vec3::ZERO,
            Vec3::new(0.2, 1.0, 0.1),
            Vec3::new(0.0, 2.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_too_few_points_rejected() {
        assert_eq!(
            Centerline::new(vec![Vec3::ZERO]).unwrap_err(),
            BuildError::EmptyCenterline
        );
        assert_eq!(
            Centerline::new(Vec::new()).unwrap_err(),
            BuildError::EmptyCenterline
        );
    }

    #[test]
    fn test_endpoints_interpolated() {
        let c = bent();
        assert!(c.point_at(0.0).distance(Vec3::ZERO) < 1e-6);
        assert!(c.point_at(1.0).distance(Vec3::new(0.0, 2.0, 0.0)) < 1e-6);
    }

    #[test]
    fn test_passes_through_interior_control_point() {
        let c = bent();
        assert!(c.point_at(0.5).distance(Vec3::new(0.2, 1.0, 0.1)) < 1e-6);
    }

    #[test]
    fn test_parameter_clamped() {
        let c = bent();
        assert_eq!(c.point_at(-1.0), c.point_at(0.0));
        assert_eq!(c.point_at(2.0), c.point_at(1.0));
    }

    #[test]
    fn test_straight_line_stays_straight() {
        let c = Centerline::new(vec![Vec3::ZERO, Vec3::Y, Vec3::Y * 2.0]).unwrap();
        for i in 0..=20 {
            let p = c.point_at(i as f32 / 20.0);
            assert!(p.x.abs() < 1e-5 && p.z.abs() < 1e-5);
        }
    }

    #[test]
    fn test_sample_count() {
        let c = bent();
        assert_eq!(c.sample(25).len(), 26);
    }
}
