//! Flower assembly and wind sway.
//!
//! A [`Flower`] owns its stem centerline and tube mesh, its leaves, and the
//! flower head anchored at the stem tip. The root transform is the only
//! part that moves after construction: wind sway rewrites its pitch and
//! roll every frame, and everything attached rides along.

use crate::curve::Centerline;
use crate::error::BuildError;
use crate::leaf::{Leaf, LeafDescriptor};
use crate::mesh::Mesh;
use crate::petal::{FlowerHead, PetalLayerDescriptor};
use crate::transform::Transform;
use crate::wind::Wind;
use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::PI;
use std::sync::Arc;

/// The stock scene palette, linear RGB.
pub mod palette {
    use glam::Vec3;

    pub const PETAL_TIP: Vec3 = Vec3::new(1.0, 0.961, 0.973);
    pub const PETAL_MID: Vec3 = Vec3::new(1.0, 0.804, 0.851);
    pub const PETAL_BASE: Vec3 = Vec3::new(0.973, 0.647, 0.722);
    pub const PETAL_INNER: Vec3 = Vec3::new(0.910, 0.478, 0.588);
    pub const CENTER_YELLOW: Vec3 = Vec3::new(1.0, 0.843, 0.0);
    pub const CENTER_ORANGE: Vec3 = Vec3::new(1.0, 0.549, 0.0);
    pub const STEM: Vec3 = Vec3::new(0.290, 0.404, 0.255);
    pub const LEAF: Vec3 = Vec3::new(0.290, 0.404, 0.255);
    pub const LEAF_DARK: Vec3 = Vec3::new(0.239, 0.361, 0.239);
}

/// Default stem height of the stock lotus.
pub const DEFAULT_STEM_HEIGHT: f32 = 2.2;

const STEM_CONTROL_SAMPLES: usize = 25;
const STEM_TUBE_SEGMENTS: usize = 25;
const STEM_RADIUS: f32 = 0.025;
const STEM_RADIAL_SEGMENTS: usize = 8;

// Idle sway: a barely perceptible figure-eight under the wind motion.
const IDLE_PITCH_RATE: f32 = 0.15;
const IDLE_PITCH_AMPLITUDE: f32 = 0.004;
const IDLE_ROLL_RATE: f32 = 0.12;
const IDLE_ROLL_AMPLITUDE: f32 = 0.003;
const WIND_LEAN: f32 = 0.5;
const GUST_RIPPLE_RATE: f32 = 2.0;
const GUST_RIPPLE_GAIN: f32 = 0.3;

/// A complete flower: stem, leaves, and head, rooted at the origin.
#[derive(Debug, Clone)]
pub struct Flower {
    root: Transform,
    curve: Centerline,
    stem_mesh: Arc<Mesh>,
    stem_color: Vec3,
    leaves: Vec<Leaf>,
    head: FlowerHead,
}

impl Flower {
    /// Build a flower from its parts.
    ///
    /// The stem centerline rises `stem_height` with a gentle lean, each
    /// leaf attaches to it per its descriptor, and the head is anchored at
    /// the curve's tip. Fails fast on any non-positive dimension or empty
    /// layer.
    pub fn build(
        stem_height: f32,
        leaves: &[LeafDescriptor],
        layers: &[PetalLayerDescriptor],
    ) -> Result<Self, BuildError> {
        if stem_height <= 0.0 {
            return Err(BuildError::NonPositiveStemHeight(stem_height));
        }

        let curve = Centerline::new(stem_control_points(stem_height))?;
        let stem_mesh = Mesh::tube(&curve, STEM_TUBE_SEGMENTS, STEM_RADIUS, STEM_RADIAL_SEGMENTS)?;
        let leaves = leaves
            .iter()
            .map(|desc| Leaf::build(desc, &curve))
            .collect::<Result<_, _>>()?;
        let head = FlowerHead::build(layers, curve.point_at(1.0))?;

        Ok(Self {
            root: Transform::IDENTITY,
            curve,
            stem_mesh: Arc::new(stem_mesh),
            stem_color: palette::STEM,
            leaves,
            head,
        })
    }

    /// The stock lotus: 2.2 stem, two leaves, five petal layers.
    pub fn lotus() -> Result<Self, BuildError> {
        Self::build(
            DEFAULT_STEM_HEIGHT,
            &[LeafDescriptor::lower_right(), LeafDescriptor::upper_left()],
            &PetalLayerDescriptor::lotus_layers(),
        )
    }

    /// Root transform the whole flower hangs from; wind sway lives here.
    #[inline]
    pub fn root(&self) -> &Transform {
        &self.root
    }

    /// The stem centerline.
    #[inline]
    pub fn curve(&self) -> &Centerline {
        &self.curve
    }

    /// The stem tube mesh.
    #[inline]
    pub fn stem_mesh(&self) -> &Arc<Mesh> {
        &self.stem_mesh
    }

    /// Stem color, linear RGB.
    #[inline]
    pub fn stem_color(&self) -> Vec3 {
        self.stem_color
    }

    /// The leaves, in descriptor order.
    #[inline]
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// The flower head.
    #[inline]
    pub fn head(&self) -> &FlowerHead {
        &self.head
    }

    pub(crate) fn head_mut(&mut self) -> &mut FlowerHead {
        &mut self.head
    }

    /// Sway the whole flower with the wind.
    ///
    /// Pitch carries the idle sway, the directional lean, and a fast gust
    /// ripple; roll carries the idle sway and lean only. Purely additive -
    /// nothing feeds back into the wind state.
    pub(crate) fn apply_wind(&mut self, elapsed: f32, wind: &Wind) {
        let lean = wind.offset();
        let pitch = (elapsed * IDLE_PITCH_RATE).sin() * IDLE_PITCH_AMPLITUDE
            + lean.x * WIND_LEAN
            + (elapsed * GUST_RIPPLE_RATE).sin() * wind.strength() * GUST_RIPPLE_GAIN;
        let roll = (elapsed * IDLE_ROLL_RATE).cos() * IDLE_ROLL_AMPLITUDE + lean.y * WIND_LEAN;
        self.root.rotation = Quat::from_euler(EulerRot::XYZ, pitch, 0.0, roll);
    }
}

/// Control points of the stem: mostly vertical with a lean that relaxes
/// toward the tip.
fn stem_control_points(height: f32) -> Vec<Vec3> {
    (0..=STEM_CONTROL_SAMPLES)
        .map(|i| {
            let t = i as f32 / STEM_CONTROL_SAMPLES as f32;
            Vec3::new(
                (t * PI * 0.3).sin() * 0.15 * (1.0 - t * 0.5),
                t * height,
                (t * PI * 0.15).cos() * 0.06 * (1.0 - t),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededSource;

    #[test]
    fn test_lotus_builds() {
        let flower = Flower::lotus().unwrap();
        assert_eq!(flower.leaves().len(), 2);
        assert_eq!(flower.head().layers().len(), 5);
        assert_eq!(flower.head().petal_count(), 49);
    }

    #[test]
    fn test_head_sits_at_stem_tip() {
        let flower = Flower::lotus().unwrap();
        let tip = flower.curve().point_at(1.0);
        assert!((tip.y - DEFAULT_STEM_HEIGHT).abs() < 1e-4);
        assert_eq!(flower.head().transform().translation, tip);
    }

    #[test]
    fn test_bad_stem_height_rejected() {
        let err = Flower::build(0.0, &[], &PetalLayerDescriptor::lotus_layers()).unwrap_err();
        assert_eq!(err, BuildError::NonPositiveStemHeight(0.0));
    }

    #[test]
    fn test_sway_is_bounded_by_wind_ceiling() {
        let mut flower = Flower::lotus().unwrap();
        let mut wind = Wind::new(0.02, 0.15);
        let mut rng = SeededSource::with_seed(3);
        for frame in 0..2000 {
            wind.advance(0.016, &mut rng);
            flower.apply_wind(frame as f32 * 0.016, &wind);
            let (pitch, _, roll) = flower.root().rotation.to_euler(EulerRot::XYZ);
            // idle + lean + ripple, all at max strength
            let bound = 0.004 + 0.15 * 0.5 + 0.15 * 0.3 + 1e-3;
            assert!(pitch.abs() <= bound);
            assert!(roll.abs() <= 0.003 + 0.15 * 0.5 + 1e-3);
        }
    }

    #[test]
    fn test_stem_curve_leans_then_relaxes() {
        let points = stem_control_points(2.2);
        assert_eq!(points.len(), 26);
        assert_eq!(points[0], Vec3::new(0.0, 0.0, 0.06));
        // Tip returns to the axis in z and keeps a slight x lean.
        let tip = points[25];
        assert!((tip.y - 2.2).abs() < 1e-5);
        assert!(tip.z.abs() < 1e-5);
        assert!(tip.x > 0.0);
    }
}
