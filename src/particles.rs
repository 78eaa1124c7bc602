//! Falling-petal and cloud particle pools.
//!
//! Both pools are fixed size for the life of the scene. Falling petals
//! respawn in place - when one drifts below the ground plane its position
//! snaps back to the spawn volume while its identity, fall velocity, and
//! spin persist. Clouds never respawn at all; they orbit the scene forever,
//! sped up and lifted by the wind.

use crate::error::BuildError;
use crate::mesh::{Mesh, Outline, PETAL_EDGE_CURL, PETAL_EXTRUDE, PETAL_TIP_CURL};
use crate::random::RandomSource;
use crate::transform::Transform;
use crate::wind::Wind;
use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::TAU;
use std::sync::Arc;

/// Stock pool sizes of the lotus scene.
pub const DEFAULT_FALLING_PETAL_COUNT: usize = 6;
pub const DEFAULT_CLOUD_COUNT: usize = 15;

// Falling-petal spawn volume: a slab above the flower.
const SPAWN_HALF_X: f32 = 3.0;
const SPAWN_HALF_Z: f32 = 2.5;
const SPAWN_Y_MIN: f32 = 3.0;
const SPAWN_Y_SPAN: f32 = 3.0;
/// Height a petal returns to after leaving the visible volume.
pub const RESPAWN_HEIGHT: f32 = 5.0;
/// Below this the petal has left the visible volume and wraps.
pub const KILL_HEIGHT: f32 = -0.1;

const FALLING_PETAL_LENGTH: f32 = 0.08;
const FALLING_PETAL_WIDTH: f32 = 0.03;
const FALLING_PETAL_SCALE: f32 = 0.4;

/// One drifting petal. Velocity and spin are fixed at spawn; only position
/// and orientation change per frame.
#[derive(Debug, Clone)]
pub struct FallingPetal {
    position: Vec3,
    rotation: Vec3,
    velocity: Vec3,
    spin: Vec3,
    phase: f32,
    transform: Transform,
}

impl FallingPetal {
    fn spawn(rng: &mut impl RandomSource) -> Self {
        let position = Vec3::new(
            rng.centered(SPAWN_HALF_X),
            SPAWN_Y_MIN + rng.sample() * SPAWN_Y_SPAN,
            rng.centered(SPAWN_HALF_Z),
        );
        let velocity = Vec3::new(
            rng.centered(0.0005),
            -0.0015 - rng.sample() * 0.001,
            rng.centered(0.0005),
        );
        let spin = Vec3::new(
            rng.centered(0.0015),
            rng.centered(0.0015),
            rng.centered(0.0015),
        );
        let mut petal = Self {
            position,
            rotation: Vec3::ZERO,
            velocity,
            spin,
            phase: rng.sample() * TAU,
            transform: Transform::IDENTITY,
        };
        petal.transform.set_uniform_scale(FALLING_PETAL_SCALE);
        petal.write_transform();
        petal
    }

    fn write_transform(&mut self) {
        self.transform.translation = self.position;
        self.transform.rotation =
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
    }

    /// Current world placement.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Fixed per-petal fall and drift vector.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

/// The falling-petal pool, sharing one small petal mesh.
#[derive(Debug, Clone)]
pub struct FallingPetals {
    mesh: Arc<Mesh>,
    petals: Vec<FallingPetal>,
}

impl FallingPetals {
    /// Spawn `count` petals scattered through the spawn volume.
    pub fn spawn(count: usize, rng: &mut impl RandomSource) -> Result<Self, BuildError> {
        let mut mesh = Outline::petal(FALLING_PETAL_LENGTH, FALLING_PETAL_WIDTH)?
            .extrude(&PETAL_EXTRUDE);
        mesh.droop(FALLING_PETAL_LENGTH, PETAL_TIP_CURL, PETAL_EDGE_CURL);
        Ok(Self {
            mesh: Arc::new(mesh),
            petals: (0..count).map(|_| FallingPetal::spawn(rng)).collect(),
        })
    }

    /// The mesh shared by every falling petal.
    #[inline]
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// The petals of the pool.
    #[inline]
    pub fn petals(&self) -> &[FallingPetal] {
        &self.petals
    }

    /// Integrate one frame: constant fall, wind drift, wind-scaled
    /// turbulence and tumbling, then the respawn wrap.
    pub fn advance(&mut self, elapsed: f32, wind: &Wind, rng: &mut impl RandomSource) {
        let strength = wind.strength();
        let direction = wind.direction();
        let drift = strength * 2.0 * 0.02;
        let turbulence = strength * 3.0;

        for p in &mut self.petals {
            p.position += p.velocity;

            p.position.x += direction.cos() * drift;
            p.position.z += direction.sin() * drift;

            // Multi-frequency flutter, silent in still air.
            p.position.x += (elapsed + p.phase).sin() * 0.0005 * (1.0 + turbulence);
            p.position.x += (elapsed * 2.0 + p.phase * 1.5).sin() * 0.0003 * turbulence;
            p.position.z += (elapsed * 1.5 + p.phase).cos() * 0.0003 * turbulence;

            p.rotation.x += p.spin.x * (1.0 + strength * 5.0);
            p.rotation.y += p.spin.y * (1.0 + strength * 3.0);
            p.rotation.z += (elapsed + p.phase).sin() * strength * 0.05;

            // Unconditional wrap back to the top of the spawn volume.
            if p.position.y < KILL_HEIGHT {
                p.position.y = RESPAWN_HEIGHT;
                p.position.x = rng.centered(SPAWN_HALF_X);
                p.position.z = rng.centered(SPAWN_HALF_Z);
            }

            p.write_transform();
        }
    }
}

// Cloud orbit and shape parameters.
const CLOUD_RADIUS_MIN: f32 = 15.0;
const CLOUD_RADIUS_SPAN: f32 = 25.0;
const CLOUD_HEIGHT_MIN: f32 = 8.0;
const CLOUD_HEIGHT_SPAN: f32 = 15.0;
const CLOUD_SPEED_MIN: f32 = 0.005;
const CLOUD_SPEED_SPAN: f32 = 0.01;
const CLOUD_ORBIT_GAIN: f32 = 0.01;
const CLOUD_WIND_ORBIT_GAIN: f32 = 0.005;
const CLOUD_BOB_RATE: f32 = 0.1;
const CLOUD_BOB_AMPLITUDE: f32 = 0.5;
const CLOUD_WIND_LIFT: f32 = 0.5;

/// One cloud on its endless orbit.
#[derive(Debug, Clone)]
pub struct Cloud {
    mesh: Arc<Mesh>,
    orbit_angle: f32,
    orbit_radius: f32,
    base_height: f32,
    angular_speed: f32,
    transform: Transform,
}

impl Cloud {
    fn spawn(rng: &mut impl RandomSource) -> Result<Self, BuildError> {
        let orbit_angle = rng.sample() * TAU;
        let orbit_radius = CLOUD_RADIUS_MIN + rng.sample() * CLOUD_RADIUS_SPAN;
        let base_height = CLOUD_HEIGHT_MIN + rng.sample() * CLOUD_HEIGHT_SPAN;
        let angular_speed = CLOUD_SPEED_MIN + rng.sample() * CLOUD_SPEED_SPAN;
        let scale = 1.5 + rng.sample() * 2.0;

        let mut cloud = Self {
            mesh: Arc::new(puff_mesh(rng)?),
            orbit_angle,
            orbit_radius,
            base_height,
            angular_speed,
            transform: Transform {
                translation: Vec3::ZERO,
                rotation: Quat::from_rotation_y(rng.sample() * TAU),
                scale: Vec3::new(scale, scale * 0.6, scale),
            },
        };
        cloud.write_transform(0.0);
        Ok(cloud)
    }

    fn write_transform(&mut self, bob: f32) {
        self.transform.translation = Vec3::new(
            self.orbit_angle.cos() * self.orbit_radius,
            self.base_height + bob,
            self.orbit_angle.sin() * self.orbit_radius,
        );
    }

    /// The puffy cloud mesh (unique per cloud).
    #[inline]
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// Current world placement.
    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Current orbit angle, radians.
    #[inline]
    pub fn orbit_angle(&self) -> f32 {
        self.orbit_angle
    }

    /// Orbit radius around the scene center.
    #[inline]
    pub fn orbit_radius(&self) -> f32 {
        self.orbit_radius
    }

    /// Resting height of the orbit.
    #[inline]
    pub fn base_height(&self) -> f32 {
        self.base_height
    }
}

/// The cloud pool.
#[derive(Debug, Clone)]
pub struct CloudField {
    clouds: Vec<Cloud>,
}

impl CloudField {
    /// Spawn `count` clouds scattered around the orbit dome.
    pub fn spawn(count: usize, rng: &mut impl RandomSource) -> Result<Self, BuildError> {
        Ok(Self {
            clouds: (0..count)
                .map(|_| Cloud::spawn(rng))
                .collect::<Result<_, _>>()?,
        })
    }

    /// The clouds of the pool.
    #[inline]
    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// Advance every orbit one frame: wind speeds the drift and lifts the
    /// bob.
    pub fn advance(&mut self, elapsed: f32, wind: &Wind) {
        let strength = wind.strength();
        for cloud in &mut self.clouds {
            cloud.orbit_angle +=
                cloud.angular_speed * CLOUD_ORBIT_GAIN + strength * CLOUD_WIND_ORBIT_GAIN;
            let bob = (elapsed * CLOUD_BOB_RATE + cloud.orbit_angle).sin() * CLOUD_BOB_AMPLITUDE
                + strength * CLOUD_WIND_LIFT;
            cloud.write_transform(bob);
        }
    }
}

/// A puffy cloud body: a handful of squashed spheres merged into one mesh.
fn puff_mesh(rng: &mut impl RandomSource) -> Result<Mesh, BuildError> {
    let puff_count = 5 + (rng.sample() * 4.0) as usize;
    let mut mesh = Mesh::default();
    for _ in 0..puff_count {
        let size = 0.8 + rng.sample() * 1.2;
        let puff = Mesh::uv_sphere(size, 8, 6)?;
        let placement = Transform {
            translation: Vec3::new(
                rng.centered(1.5),
                rng.centered(0.4),
                rng.centered(1.0),
            ),
            rotation: Quat::IDENTITY,
            scale: Vec3::new(1.0, 0.6 + rng.sample() * 0.3, 1.0),
        };
        mesh.append(&puff, &placement);
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededSource;

    #[test]
    fn test_pool_size_fixed() {
        let mut rng = SeededSource::with_seed(11);
        let mut pool = FallingPetals::spawn(6, &mut rng).unwrap();
        let wind = Wind::default();
        for frame in 0..500 {
            pool.advance(frame as f32 * 0.016, &wind, &mut rng);
        }
        assert_eq!(pool.petals().len(), 6);
    }

    #[test]
    fn test_spawn_inside_volume() {
        let mut rng = SeededSource::with_seed(21);
        let pool = FallingPetals::spawn(50, &mut rng).unwrap();
        for p in pool.petals() {
            let pos = p.position();
            assert!(pos.x.abs() <= SPAWN_HALF_X);
            assert!(pos.z.abs() <= SPAWN_HALF_Z);
            assert!((SPAWN_Y_MIN..SPAWN_Y_MIN + SPAWN_Y_SPAN).contains(&pos.y));
            assert!(p.velocity().y < 0.0);
        }
    }

    #[test]
    fn test_respawn_wraps_to_exact_height() {
        let mut rng = SeededSource::with_seed(31);
        let mut pool = FallingPetals::spawn(1, &mut rng).unwrap();
        // Force the petal below the kill plane.
        pool.petals[0].position.y = KILL_HEIGHT - 0.01;
        let wind = Wind::default();
        pool.advance(0.0, &wind, &mut rng);
        let p = &pool.petals()[0];
        assert_eq!(p.position().y, RESPAWN_HEIGHT);
        assert!(p.position().x.abs() <= SPAWN_HALF_X);
        assert!(p.position().z.abs() <= SPAWN_HALF_Z);
    }

    #[test]
    fn test_respawn_preserves_velocity_and_spin() {
        let mut rng = SeededSource::with_seed(41);
        let mut pool = FallingPetals::spawn(1, &mut rng).unwrap();
        let velocity = pool.petals()[0].velocity();
        let spin = pool.petals[0].spin;
        pool.petals[0].position.y = KILL_HEIGHT - 1.0;
        let wind = Wind::default();
        pool.advance(0.0, &wind, &mut rng);
        assert_eq!(pool.petals()[0].velocity(), velocity);
        assert_eq!(pool.petals[0].spin, spin);
    }

    #[test]
    fn test_petals_fall_in_still_air() {
        let mut rng = SeededSource::with_seed(51);
        let mut pool = FallingPetals::spawn(4, &mut rng).unwrap();
        let wind = Wind::default();
        let before: Vec<f32> = pool.petals().iter().map(|p| p.position().y).collect();
        pool.advance(0.016, &wind, &mut rng);
        for (p, y) in pool.petals().iter().zip(before) {
            assert!(p.position().y < y);
        }
    }

    #[test]
    fn test_cloud_orbit_advances_with_wind() {
        let mut rng = SeededSource::with_seed(61);
        let mut field = CloudField::spawn(3, &mut rng).unwrap();
        let angles: Vec<f32> = field.clouds().iter().map(|c| c.orbit_angle()).collect();
        let wind = Wind::default();
        field.advance(0.0, &wind);
        for (cloud, a) in field.clouds().iter().zip(angles) {
            assert!(cloud.orbit_angle() > a);
            // Position matches the polar orbit.
            let t = cloud.transform().translation;
            let radial = (t.x * t.x + t.z * t.z).sqrt();
            assert!((radial - cloud.orbit_radius()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_cloud_bob_stays_near_base_height() {
        let mut rng = SeededSource::with_seed(71);
        let mut field = CloudField::spawn(5, &mut rng).unwrap();
        let mut wind = Wind::default();
        let mut wind_rng = SeededSource::with_seed(72);
        for frame in 0..2000 {
            wind.advance(0.016, &mut wind_rng);
            field.advance(frame as f32 * 0.016, &wind);
            for cloud in field.clouds() {
                let dy = cloud.transform().translation.y - cloud.base_height();
                assert!(dy.abs() <= CLOUD_BOB_AMPLITUDE + 0.15 * CLOUD_WIND_LIFT + 1e-3);
            }
        }
    }

    #[test]
    fn test_puff_mesh_merges_spheres() {
        let mut rng = SeededSource::with_seed(81);
        let mesh = puff_mesh(&mut rng).unwrap();
        // At least five 8x6 spheres worth of vertices.
        assert!(mesh.vertex_count() >= 5 * 9 * 7);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }
}
