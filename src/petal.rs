//! Petal layers and the flower head.
//!
//! The flower head is a stack of concentric petal rings plus a center
//! ornament (dome and stamens). Each layer shares a single generated petal
//! mesh between all of its petals; what the bloom controller animates every
//! frame is the per-petal [`Transform`], never the geometry.
//!
//! Successive layers are rotated by `layer * PI / count` so petals of
//! adjacent rings fill each other's gaps instead of stacking radially.

use crate::error::BuildError;
use crate::mesh::{Mesh, Outline, PETAL_EDGE_CURL, PETAL_EXTRUDE, PETAL_TIP_CURL};
use crate::transform::Transform;
use glam::{Quat, Vec3};
use std::f32::consts::{PI, TAU};
use std::sync::Arc;

/// Per-layer bloom bound derivation: outer layers close less tightly and
/// open wider, and sit closer to the axis when open.
const CLOSED_TILT_BASE: f32 = 0.5;
const CLOSED_TILT_STEP: f32 = -0.15;
const OPEN_TILT_BASE: f32 = -0.5;
const OPEN_TILT_STEP: f32 = -0.22;
const CLOSED_RADIUS_BASE: f32 = 0.07;
const CLOSED_RADIUS_STEP: f32 = -0.017;
const OPEN_RADIUS_BASE: f32 = 0.0015;
const OPEN_RADIUS_STEP: f32 = -0.005;

/// Breathing oscillation rate shared by every petal.
const BREATHE_SPEED: f32 = 0.08;
/// Per-petal phase jitter step, so neighbors never breathe in sync.
const PHASE_STEP: f32 = 0.1;

/// Shape of one concentric petal ring. Pure configuration.
#[derive(Debug, Clone, Copy)]
pub struct PetalLayerDescriptor {
    /// Number of petals in the ring. Must be at least 1.
    pub count: u32,
    /// Petal length.
    pub length: f32,
    /// Petal width at the widest point.
    pub width: f32,
    /// Petal color, linear RGB.
    pub color: Vec3,
}

impl PetalLayerDescriptor {
    /// The five rings of the stock lotus, innermost first.
    pub fn lotus_layers() -> Vec<Self> {
        use crate::flower::palette;
        vec![
            Self { count: 5, length: 0.28, width: 0.10, color: palette::PETAL_INNER },
            Self { count: 8, length: 0.36, width: 0.12, color: palette::PETAL_BASE },
            Self { count: 10, length: 0.44, width: 0.15, color: palette::PETAL_MID },
            Self { count: 12, length: 0.52, width: 0.17, color: palette::PETAL_MID },
            Self { count: 14, length: 0.60, width: 0.19, color: palette::PETAL_TIP },
        ]
    }
}

/// One petal: immutable bloom descriptors plus the pose the bloom
/// controller rewrites every frame.
#[derive(Debug, Clone)]
pub struct PetalInstance {
    layer: usize,
    angle: f32,
    length: f32,
    closed_tilt: f32,
    open_tilt: f32,
    closed_radius: f32,
    open_radius: f32,
    phase: f32,
    speed: f32,
    transform: Transform,
}

impl PetalInstance {
    /// Index of the layer this petal belongs to.
    #[inline]
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Angular position around the head axis, radians.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Petal length.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Pitch when the flower is fully closed.
    #[inline]
    pub fn closed_tilt(&self) -> f32 {
        self.closed_tilt
    }

    /// Pitch when the flower is fully open.
    #[inline]
    pub fn open_tilt(&self) -> f32 {
        self.open_tilt
    }

    /// Distance from the axis when closed.
    #[inline]
    pub fn closed_radius(&self) -> f32 {
        self.closed_radius
    }

    /// Distance from the axis when open.
    #[inline]
    pub fn open_radius(&self) -> f32 {
        self.open_radius
    }

    /// Breathing phase offset, radians.
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Breathing oscillation rate.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current pose, relative to the flower head.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub(crate) fn set_pose(&mut self, transform: Transform) {
        self.transform = transform;
    }
}

/// One concentric ring of petals sharing a mesh and color.
#[derive(Debug, Clone)]
pub struct PetalLayer {
    mesh: Arc<Mesh>,
    color: Vec3,
    petals: Vec<PetalInstance>,
}

impl PetalLayer {
    /// Build a layer at `layer_index` (0 = innermost).
    ///
    /// Generates the shared petal mesh once and distributes `count`
    /// instances evenly around the axis, offset by `layer_index * PI /
    /// count` relative to the previous layer.
    pub fn build(layer_index: usize, desc: &PetalLayerDescriptor) -> Result<Self, BuildError> {
        if desc.count == 0 {
            return Err(BuildError::EmptyPetalLayer);
        }
        let mut mesh = Outline::petal(desc.length, desc.width)?.extrude(&PETAL_EXTRUDE);
        mesh.droop(desc.length, PETAL_TIP_CURL, PETAL_EDGE_CURL);

        let i = layer_index as f32;
        let offset = i * PI / desc.count as f32;
        let petals = (0..desc.count)
            .map(|j| PetalInstance {
                layer: layer_index,
                angle: j as f32 / desc.count as f32 * TAU + offset,
                length: desc.length,
                closed_tilt: CLOSED_TILT_BASE + CLOSED_TILT_STEP * i,
                open_tilt: OPEN_TILT_BASE + OPEN_TILT_STEP * i,
                closed_radius: CLOSED_RADIUS_BASE + CLOSED_RADIUS_STEP * i,
                open_radius: OPEN_RADIUS_BASE + OPEN_RADIUS_STEP * i,
                phase: j as f32 * PHASE_STEP,
                speed: BREATHE_SPEED,
                transform: Transform::IDENTITY,
            })
            .collect();

        Ok(Self {
            mesh: Arc::new(mesh),
            color: desc.color,
            petals,
        })
    }

    /// The mesh shared by every petal in this layer.
    #[inline]
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Layer color, linear RGB.
    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// The petals of this ring.
    #[inline]
    pub fn petals(&self) -> &[PetalInstance] {
        &self.petals
    }

    pub(crate) fn petals_mut(&mut self) -> &mut [PetalInstance] {
        &mut self.petals
    }
}

/// One stamen filament of the center ornament.
#[derive(Debug, Clone)]
pub struct Stamen {
    transform: Transform,
}

impl Stamen {
    /// Current placement relative to the flower head. Scale is zero until
    /// the bloom passes 40%.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub(crate) fn set_scale(&mut self, s: f32) {
        self.transform.set_uniform_scale(s);
    }
}

/// A ring of stamens sharing one filament mesh.
#[derive(Debug, Clone)]
pub struct StamenRing {
    mesh: Arc<Mesh>,
    stamens: Vec<Stamen>,
}

impl StamenRing {
    fn build(ring: usize, count: usize) -> Result<Self, BuildError> {
        let radius = 0.03 + ring as f32 * 0.028;
        let height = 0.08 + ring as f32 * 0.03;
        let mesh = Arc::new(Mesh::cylinder(0.003, 0.006, height, 6)?);

        let stamens = (0..count)
            .map(|i| {
                let a = i as f32 / count as f32 * TAU;
                // Filaments lean outward from the dome.
                let axis = Vec3::new(a.cos(), 0.5, a.sin()).normalize();
                let mut transform = Transform {
                    translation: Vec3::new(a.cos() * radius, 0.04, a.sin() * radius),
                    rotation: Quat::from_rotation_arc(Vec3::Y, axis),
                    scale: Vec3::ONE,
                };
                transform.set_uniform_scale(0.0);
                Stamen { transform }
            })
            .collect();

        Ok(Self { mesh, stamens })
    }

    /// The filament mesh shared by this ring.
    #[inline]
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// The stamens of this ring.
    #[inline]
    pub fn stamens(&self) -> &[Stamen] {
        &self.stamens
    }

    pub(crate) fn stamens_mut(&mut self) -> &mut [Stamen] {
        &mut self.stamens
    }
}

/// The dome and stamen rings at the heart of the flower.
#[derive(Debug, Clone)]
pub struct CenterOrnament {
    dome_mesh: Arc<Mesh>,
    dome: Transform,
    rings: Vec<StamenRing>,
}

impl CenterOrnament {
    /// Inner and outer stamen counts of the stock lotus.
    const RING_COUNTS: [usize; 2] = [10, 16];

    pub(crate) fn build() -> Result<Self, BuildError> {
        let dome_mesh = Arc::new(Mesh::uv_sphere(0.045, 16, 16)?);
        let dome = Transform {
            translation: Vec3::new(0.0, 0.02, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::new(1.0, 0.5, 1.0),
        };
        let rings = Self::RING_COUNTS
            .iter()
            .enumerate()
            .map(|(ring, &count)| StamenRing::build(ring, count))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            dome_mesh,
            dome,
            rings,
        })
    }

    /// The dome mesh.
    #[inline]
    pub fn dome_mesh(&self) -> &Arc<Mesh> {
        &self.dome_mesh
    }

    /// Current dome placement relative to the flower head.
    #[inline]
    pub fn dome(&self) -> &Transform {
        &self.dome
    }

    pub(crate) fn set_dome_scale(&mut self, s: f32) {
        self.dome.set_uniform_scale(s);
    }

    /// The stamen rings, innermost first.
    #[inline]
    pub fn rings(&self) -> &[StamenRing] {
        &self.rings
    }

    pub(crate) fn rings_mut(&mut self) -> &mut [StamenRing] {
        &mut self.rings
    }
}

/// The assembled flower head: petal layers plus center ornament, anchored
/// at the stem tip.
#[derive(Debug, Clone)]
pub struct FlowerHead {
    transform: Transform,
    layers: Vec<PetalLayer>,
    center: CenterOrnament,
}

impl FlowerHead {
    /// Build the head from its layer descriptors, innermost first.
    pub fn build(descriptors: &[PetalLayerDescriptor], anchor: Vec3) -> Result<Self, BuildError> {
        let layers = descriptors
            .iter()
            .enumerate()
            .map(|(i, desc)| PetalLayer::build(i, desc))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            transform: Transform::from_translation(anchor),
            layers,
            center: CenterOrnament::build()?,
        })
    }

    /// Placement of the head relative to the flower root (the stem tip).
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Petal layers, innermost first.
    #[inline]
    pub fn layers(&self) -> &[PetalLayer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [PetalLayer] {
        &mut self.layers
    }

    /// The center ornament.
    #[inline]
    pub fn center(&self) -> &CenterOrnament {
        &self.center
    }

    pub(crate) fn center_mut(&mut self) -> &mut CenterOrnament {
        &mut self.center
    }

    /// Total number of petals across all layers.
    pub fn petal_count(&self) -> usize {
        self.layers.iter().map(|l| l.petals.len()).sum()
    }
}
