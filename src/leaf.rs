//! Leaf construction and placement along the stem.
//!
//! A leaf is a drooped blade mesh anchored to a point on the stem
//! centerline, offset to one side, and oriented so it points away from the
//! stem. Leaves are built once at flower-build time and only move with the
//! flower root afterwards.

use crate::curve::Centerline;
use crate::error::BuildError;
use crate::mesh::{Mesh, Outline, LEAF_EDGE_CURL, LEAF_EXTRUDE, LEAF_TIP_CURL};
use crate::transform::Transform;
use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

/// Which side of the stem a leaf grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sign convention used throughout placement math: right is `+1`,
    /// left is `-1`.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Shape and placement parameters for one leaf. Pure configuration,
/// consumed once at build time.
#[derive(Debug, Clone, Copy)]
pub struct LeafDescriptor {
    /// Blade length.
    pub length: f32,
    /// Blade width at the widest point.
    pub width: f32,
    /// Where on the stem the leaf attaches, `0` = base, `1` = tip.
    pub stem_position: f32,
    /// Lateral distance from the stem centerline.
    pub offset_distance: f32,
    /// Which side of the stem the leaf grows from.
    pub side: Side,
    /// Downward pitch of the blade, radians.
    pub tilt_angle: f32,
    /// Roll around the blade's own axis, radians.
    pub twist_angle: f32,
    /// Blade color, linear RGB.
    pub color: Vec3,
}

impl LeafDescriptor {
    /// The large lower-right leaf of the stock lotus.
    pub fn lower_right() -> Self {
        Self {
            length: 0.35,
            width: 0.15,
            stem_position: 0.7,
            offset_distance: 0.03,
            side: Side::Right,
            tilt_angle: 0.8,
            twist_angle: 1.28,
            color: crate::flower::palette::LEAF,
        }
    }

    /// The smaller upper-left leaf of the stock lotus.
    pub fn upper_left() -> Self {
        Self {
            length: 0.28,
            width: 0.12,
            stem_position: 0.6,
            offset_distance: 0.03,
            side: Side::Left,
            tilt_angle: 1.0,
            twist_angle: 0.6,
            color: crate::flower::palette::LEAF_DARK,
        }
    }
}

/// A built leaf: shared blade mesh plus its fixed placement transform.
#[derive(Debug, Clone)]
pub struct Leaf {
    mesh: Arc<Mesh>,
    color: Vec3,
    transform: Transform,
}

impl Leaf {
    /// Build a leaf from its descriptor, anchored to the stem curve.
    ///
    /// Placement: the curve point at `stem_position`, pushed sideways by
    /// `side * offset_distance`. Orientation: yaw the blade away from the
    /// stem (`-side * 90°`), then pitch down by `tilt_angle`, then roll by
    /// `side * twist_angle`.
    pub fn build(desc: &LeafDescriptor, curve: &Centerline) -> Result<Self, BuildError> {
        let mut mesh = Outline::leaf(desc.length, desc.width)?.extrude(&LEAF_EXTRUDE);
        mesh.droop(desc.length, LEAF_TIP_CURL, LEAF_EDGE_CURL);

        let sign = desc.side.sign();
        let anchor = curve.point_at(desc.stem_position);
        let translation = anchor + Vec3::X * (sign * desc.offset_distance);
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            desc.tilt_angle,
            -sign * FRAC_PI_2,
            sign * desc.twist_angle,
        );

        Ok(Self {
            mesh: Arc::new(mesh),
            color: desc.color,
            transform: Transform {
                translation,
                rotation,
                scale: Vec3::ONE,
            },
        })
    }

    /// The blade mesh.
    #[inline]
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Blade color, linear RGB.
    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Placement relative to the flower root.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_stem() -> Centerline {
        Centerline::new(vec![Vec3::ZERO, Vec3::Y, Vec3::Y * 2.0]).unwrap()
    }

    #[test]
    fn test_side_signs() {
        assert_eq!(Side::Right.sign(), 1.0);
        assert_eq!(Side::Left.sign(), -1.0);
    }

    #[test]
    fn test_leaf_anchored_with_offset() {
        let curve = straight_stem();
        let leaf = Leaf::build(&LeafDescriptor::lower_right(), &curve).unwrap();
        let t = leaf.transform().translation;
        // stem_position 0.7 on a straight 2-unit stem, offset 0.03 right.
        assert!((t.y - 1.4).abs() < 1e-4);
        assert!((t.x - 0.03).abs() < 1e-4);
    }

    #[test]
    fn test_left_leaf_offsets_left() {
        let curve = straight_stem();
        let leaf = Leaf::build(&LeafDescriptor::upper_left(), &curve).unwrap();
        assert!(leaf.transform().translation.x < 0.0);
    }

    #[test]
    fn test_opposite_sides_mirror_yaw() {
        let curve = straight_stem();
        let mut right = LeafDescriptor::lower_right();
        right.tilt_angle = 0.0;
        right.twist_angle = 0.0;
        let mut left = right;
        left.side = Side::Left;

        let r = Leaf::build(&right, &curve).unwrap();
        let l = Leaf::build(&left, &curve).unwrap();
        // Yaw is -90 deg on the right, +90 deg on the left: local +Z swings
        // to opposite world directions.
        let r_z = r.transform().rotation * Vec3::Z;
        let l_z = l.transform().rotation * Vec3::Z;
        assert!(r_z.x < -0.9);
        assert!(l_z.x > 0.9);
    }

    #[test]
    fn test_bad_dimensions_fail() {
        let curve = straight_stem();
        let mut desc = LeafDescriptor::lower_right();
        desc.width = 0.0;
        assert!(Leaf::build(&desc, &curve).is_err());
    }
}
