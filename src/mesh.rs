//! Procedural mesh generation.
//!
//! All geometry in the scene is generated here: petal and leaf surfaces come
//! from extruded 2D outlines with a curvature bend, the stem is a tube swept
//! along its centerline, and the flower center and clouds are assembled from
//! sphere and cylinder primitives.
//!
//! Generated meshes are immutable once built and shared between instances
//! via `Arc` - every petal of a layer references one mesh and differs only
//! by its [`Transform`](crate::transform::Transform).

use crate::curve::Centerline;
use crate::error::{check_positive, BuildError};
use crate::transform::Transform;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// How many points each quadratic Bezier segment contributes to the sampled
/// boundary polygon.
const OUTLINE_SAMPLES_PER_SEGMENT: usize = 8;

/// A renderer-ready vertex: position and normal, tightly packed.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// An indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// Extrusion parameters for turning a 2D outline into a thin 3D surface.
///
/// The outline lies in the XY plane and is extruded along +Z by `depth`,
/// with a beveled rim extending `bevel_thickness` beyond each face and
/// `bevel_size` outward from the boundary.
#[derive(Debug, Clone, Copy)]
pub struct ExtrudeOptions {
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
}

/// Leaf blades are thinner than petals and carry a lighter bevel.
pub const LEAF_EXTRUDE: ExtrudeOptions = ExtrudeOptions {
    depth: 0.003,
    bevel_thickness: 0.001,
    bevel_size: 0.002,
    bevel_segments: 1,
};

/// Petals are slightly thicker with a softer rim.
pub const PETAL_EXTRUDE: ExtrudeOptions = ExtrudeOptions {
    depth: 0.005,
    bevel_thickness: 0.002,
    bevel_size: 0.005,
    bevel_segments: 2,
};

/// Curvature constants for [`Mesh::droop`]: leaves curl hard at the tip and
/// fold along the midline, petals only cup gently.
pub const LEAF_TIP_CURL: f32 = 0.08;
pub const LEAF_EDGE_CURL: f32 = 0.1;
pub const PETAL_TIP_CURL: f32 = 0.04;
pub const PETAL_EDGE_CURL: f32 = 0.0;

/// One quadratic Bezier step of an outline; the start point is the previous
/// segment's end.
#[derive(Debug, Clone, Copy)]
struct QuadSegment {
    control: Vec2,
    end: Vec2,
}

/// A closed 2D boundary built from quadratic Bezier segments, running from
/// the base at the origin up to the tip at `(0, length)` and back.
#[derive(Debug, Clone)]
pub struct Outline {
    start: Vec2,
    segments: Vec<QuadSegment>,
}

impl Outline {
    /// Leaf blade outline: a slender teardrop, widest near the base.
    pub fn leaf(length: f32, width: f32) -> Result<Self, BuildError> {
        let l = check_positive("leaf length", length)?;
        let w = check_positive("leaf width", width)?;
        Ok(Self {
            start: Vec2::ZERO,
            segments: vec![
                quad(-w * 0.8, l * 0.3, -w * 0.5, l * 0.6),
                quad(-w * 0.2, l * 0.85, 0.0, l),
                quad(w * 0.2, l * 0.85, w * 0.5, l * 0.6),
                quad(w * 0.8, l * 0.3, 0.0, 0.0),
            ],
        })
    }

    /// Petal outline: rounder than a leaf, widest past the midpoint.
    pub fn petal(length: f32, width: f32) -> Result<Self, BuildError> {
        let l = check_positive("petal length", length)?;
        let w = check_positive("petal width", width)?;
        Ok(Self {
            start: Vec2::ZERO,
            segments: vec![
                quad(w * 0.9, l * 0.25, w * 0.6, l * 0.7),
                quad(w * 0.25, l * 0.95, 0.0, l),
                quad(-w * 0.25, l * 0.95, -w * 0.6, l * 0.7),
                quad(-w * 0.9, l * 0.25, 0.0, 0.0),
            ],
        })
    }

    /// Sample the boundary into a closed polygon (no duplicated end point).
    pub fn polygon(&self) -> Vec<Vec2> {
        let mut points = vec![self.start];
        let mut from = self.start;
        for seg in &self.segments {
            for k in 1..=OUTLINE_SAMPLES_PER_SEGMENT {
                let t = k as f32 / OUTLINE_SAMPLES_PER_SEGMENT as f32;
                points.push(quadratic_point(from, seg.control, seg.end, t));
            }
            from = seg.end;
        }
        // The last segment closes back onto the start point.
        if let Some(last) = points.last() {
            if last.distance(self.start) < 1e-6 {
                points.pop();
            }
        }
        points
    }

    /// Extrude this outline into a thin beveled surface.
    ///
    /// The result has caps on both faces and beveled side walls; normals are
    /// recomputed from the final vertex positions.
    pub fn extrude(&self, opts: &ExtrudeOptions) -> Mesh {
        let boundary = self.polygon();
        let n = boundary.len();
        let centroid = boundary.iter().sum::<Vec2>() / n as f32;

        // Boundary pushed outward by the bevel size.
        let outer: Vec<Vec2> = boundary
            .iter()
            .map(|&p| {
                let dir = p - centroid;
                let len = dir.length();
                if len > 1e-8 {
                    p + dir / len * opts.bevel_size
                } else {
                    p
                }
            })
            .collect();

        // Ring stack from back cap to front cap. Each ring is (profile, z).
        let bs = opts.bevel_segments.max(1);
        let mut rings: Vec<(Vec<Vec2>, f32)> = Vec::new();
        rings.push((boundary.clone(), -opts.bevel_thickness));
        for s in 1..=bs {
            let f = s as f32 / bs as f32;
            rings.push((
                lerp_profile(&boundary, &outer, f),
                -opts.bevel_thickness * (1.0 - f),
            ));
        }
        rings.push((outer.clone(), opts.depth));
        for s in 1..=bs {
            let f = s as f32 / bs as f32;
            rings.push((
                lerp_profile(&outer, &boundary, f),
                opts.depth + opts.bevel_thickness * f,
            ));
        }

        let mut mesh = Mesh::default();
        for (profile, z) in &rings {
            for p in profile {
                mesh.positions.push(Vec3::new(p.x, p.y, *z));
            }
        }

        // Side walls between consecutive rings.
        for r in 0..rings.len() - 1 {
            let a = (r * n) as u32;
            let b = ((r + 1) * n) as u32;
            for i in 0..n as u32 {
                let j = (i + 1) % n as u32;
                mesh.indices.extend([a + i, b + i, b + j]);
                mesh.indices.extend([a + i, b + j, a + j]);
            }
        }

        // Caps: triangle fans around each face centroid.
        let back_center = mesh.positions.len() as u32;
        mesh.positions
            .push(Vec3::new(centroid.x, centroid.y, -opts.bevel_thickness));
        let front_center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(
            centroid.x,
            centroid.y,
            opts.depth + opts.bevel_thickness,
        ));
        let front_base = ((rings.len() - 1) * n) as u32;
        for i in 0..n as u32 {
            let j = (i + 1) % n as u32;
            mesh.indices.extend([back_center, j, i]);
            mesh.indices.extend([front_center, front_base + i, front_base + j]);
        }

        mesh.normals = vec![Vec3::ZERO; mesh.positions.len()];
        mesh.recompute_normals();
        mesh
    }
}

impl Mesh {
    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Pack positions and normals into renderer-ready vertices.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }

    /// Bend the surface away from the viewer: the tip curls back by
    /// `t² · tip_curl` (t = normalized distance from the base) and the edges
    /// fold by `|x| · edge_curl`, producing the droop and midline ridge of a
    /// living blade.
    pub fn droop(&mut self, length: f32, tip_curl: f32, edge_curl: f32) {
        for p in &mut self.positions {
            let t = (p.y / length).max(0.0);
            p.z -= t * t * tip_curl + p.x.abs() * edge_curl;
        }
        self.recompute_normals();
    }

    /// Recompute per-vertex normals from the current positions
    /// (area-weighted face normal accumulation).
    pub fn recompute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for n in &mut self.normals {
            *n = n.normalize_or_zero();
            if *n == Vec3::ZERO {
                *n = Vec3::Z;
            }
        }
    }

    /// Append another mesh, transformed into this mesh's space.
    pub fn append(&mut self, other: &Mesh, transform: &Transform) {
        let base = self.positions.len() as u32;
        let matrix = transform.matrix();
        self.positions.extend(
            other
                .positions
                .iter()
                .map(|&p| matrix.transform_point3(p)),
        );
        self.normals.extend(
            other
                .normals
                .iter()
                .map(|&n| (transform.rotation * n).normalize_or_zero()),
        );
        self.indices.extend(other.indices.iter().map(|&i| base + i));
    }

    /// A tube swept along a centerline, open at both ends (the stem).
    pub fn tube(
        curve: &Centerline,
        segments: usize,
        radius: f32,
        radial_segments: usize,
    ) -> Result<Mesh, BuildError> {
        check_positive("tube radius", radius)?;
        let path = curve.sample(segments);
        let mut mesh = Mesh::default();

        for (i, &center) in path.iter().enumerate() {
            let tangent = path_tangent(&path, i);
            // Reference axis least parallel to the tangent keeps the frame
            // stable along a mostly-vertical stem.
            let reference = if tangent.y.abs() < 0.9 { Vec3::Y } else { Vec3::X };
            let normal = tangent.cross(reference).normalize();
            let binormal = tangent.cross(normal).normalize();
            for r in 0..radial_segments {
                let theta = r as f32 / radial_segments as f32 * TAU;
                mesh.positions
                    .push(center + (normal * theta.cos() + binormal * theta.sin()) * radius);
            }
        }

        for ring in 0..path.len() - 1 {
            let a = (ring * radial_segments) as u32;
            let b = ((ring + 1) * radial_segments) as u32;
            for i in 0..radial_segments as u32 {
                let j = (i + 1) % radial_segments as u32;
                mesh.indices.extend([a + i, b + i, b + j]);
                mesh.indices.extend([a + i, b + j, a + j]);
            }
        }

        mesh.normals = vec![Vec3::ZERO; mesh.positions.len()];
        mesh.recompute_normals();
        Ok(mesh)
    }

    /// A latitude/longitude sphere centered on the origin.
    pub fn uv_sphere(radius: f32, segments: usize, rings: usize) -> Result<Mesh, BuildError> {
        check_positive("sphere radius", radius)?;
        let mut mesh = Mesh::default();

        for ring in 0..=rings {
            let phi = ring as f32 / rings as f32 * std::f32::consts::PI;
            for seg in 0..=segments {
                let theta = seg as f32 / segments as f32 * TAU;
                mesh.positions.push(Vec3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.cos(),
                    radius * phi.sin() * theta.sin(),
                ));
            }
        }

        let stride = (segments + 1) as u32;
        for ring in 0..rings as u32 {
            for seg in 0..segments as u32 {
                let a = ring * stride + seg;
                let b = a + stride;
                mesh.indices.extend([a, b, b + 1]);
                mesh.indices.extend([a, b + 1, a + 1]);
            }
        }

        mesh.normals = vec![Vec3::ZERO; mesh.positions.len()];
        mesh.recompute_normals();
        Ok(mesh)
    }

    /// A capped cylinder along the Y axis, centered on the origin.
    ///
    /// Different top and bottom radii give the tapered stamen filaments.
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: usize,
    ) -> Result<Mesh, BuildError> {
        check_positive("cylinder top radius", radius_top)?;
        check_positive("cylinder bottom radius", radius_bottom)?;
        check_positive("cylinder height", height)?;
        let mut mesh = Mesh::default();
        let half = height / 2.0;

        for (radius, y) in [(radius_bottom, -half), (radius_top, half)] {
            for seg in 0..segments {
                let theta = seg as f32 / segments as f32 * TAU;
                mesh.positions
                    .push(Vec3::new(radius * theta.cos(), y, radius * theta.sin()));
            }
        }

        let n = segments as u32;
        for i in 0..n {
            let j = (i + 1) % n;
            mesh.indices.extend([i, n + i, n + j]);
            mesh.indices.extend([i, n + j, j]);
        }

        // End caps.
        let bottom_center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, -half, 0.0));
        let top_center = mesh.positions.len() as u32;
        mesh.positions.push(Vec3::new(0.0, half, 0.0));
        for i in 0..n {
            let j = (i + 1) % n;
            mesh.indices.extend([bottom_center, i, j]);
            mesh.indices.extend([top_center, n + j, n + i]);
        }

        mesh.normals = vec![Vec3::ZERO; mesh.positions.len()];
        mesh.recompute_normals();
        Ok(mesh)
    }
}

fn quad(cx: f32, cy: f32, ex: f32, ey: f32) -> QuadSegment {
    QuadSegment {
        control: Vec2::new(cx, cy),
        end: Vec2::new(ex, ey),
    }
}

fn quadratic_point(from: Vec2, control: Vec2, end: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    from * (u * u) + control * (2.0 * u * t) + end * (t * t)
}

fn lerp_profile(a: &[Vec2], b: &[Vec2], f: f32) -> Vec<Vec2> {
    a.iter().zip(b).map(|(&p, &q)| p.lerp(q, f)).collect()
}

fn path_tangent(path: &[Vec3], i: usize) -> Vec3 {
    let prev = path[i.saturating_sub(1)];
    let next = path[(i + 1).min(path.len() - 1)];
    (next - prev).normalize_or_zero()
}
