//! Bloom state and per-frame petal pose recomputation.
//!
//! The bloom is a single smoothed scalar: `target` is flipped between 0
//! (closed) and 1 (open) by the host's hit-test, and `progress` chases it
//! with an exponential approach every frame. The approach never quite
//! arrives - that is the intended organic easing, not a convergence bug,
//! and must not be replaced with a terminating ramp.
//!
//! From the smoothed progress, every petal's tilt and radius are
//! re-interpolated between its closed and open bounds, with a small
//! breathing oscillation that scales in as the flower opens.

use crate::petal::FlowerHead;
use crate::transform::Transform;
use glam::{Quat, Vec3};

/// Fraction of the remaining distance covered each frame.
const PROGRESS_APPROACH: f32 = 0.035;

/// Breathing amplitude at full bloom.
const BREATHE_AMPLITUDE: f32 = 0.002;

/// Stamens stay hidden until bloom passes this fraction, then ramp to full
/// size by the time the flower is fully open.
const STAMEN_REVEAL_START: f32 = 0.4;
const STAMEN_REVEAL_RATE: f32 = 1.667;

/// Linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep `x²(3 − 2x)`.
///
/// Monotonic non-decreasing on `[0, 1]` with `smoothstep(0) = 0`,
/// `smoothstep(0.5) = 0.5`, `smoothstep(1) = 1`.
#[inline]
pub fn smoothstep(x: f32) -> f32 {
    x * x * (3.0 - 2.0 * x)
}

/// Smoothed bloom progress and its toggle target.
#[derive(Debug, Clone, Copy)]
pub struct BloomState {
    progress: f32,
    target: f32,
}

impl BloomState {
    /// A closed flower.
    pub fn new() -> Self {
        Self {
            progress: 0.0,
            target: 0.0,
        }
    }

    /// Current smoothed progress in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether the flower is currently heading toward open.
    #[inline]
    pub fn is_opening(&self) -> bool {
        self.target > 0.5
    }

    /// Set the target: `true` opens, `false` closes.
    ///
    /// Re-targeting mid-animation simply reverses the decay direction;
    /// there is no separate cancellation.
    pub fn set_target(&mut self, open: bool) {
        self.target = if open { 1.0 } else { 0.0 };
    }

    /// Flip the target, as a tap on the flower head does.
    pub fn toggle(&mut self) {
        self.set_target(!self.is_opening());
    }

    /// Advance progress one frame: exponential approach toward the target.
    pub fn update(&mut self) {
        self.progress += (self.target - self.progress) * PROGRESS_APPROACH;
    }

    /// Recompute every petal pose and the center ornament scales from the
    /// current progress.
    pub fn apply(&self, head: &mut FlowerHead, elapsed: f32) {
        let t = smoothstep(self.progress);

        for layer in head.layers_mut() {
            for petal in layer.petals_mut() {
                let tilt = lerp(petal.closed_tilt(), petal.open_tilt(), t);
                let radius = lerp(petal.closed_radius(), petal.open_radius(), t);
                let breathe =
                    (elapsed * petal.speed() + petal.phase()).sin() * BREATHE_AMPLITUDE * t;

                let angle = petal.angle();
                petal.set_pose(Transform {
                    translation: Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius),
                    rotation: Quat::from_rotation_y(angle)
                        * Quat::from_rotation_x(-(tilt + breathe)),
                    scale: Vec3::ONE,
                });
            }
        }

        let stamen_scale = ((t - STAMEN_REVEAL_START) * STAMEN_REVEAL_RATE).clamp(0.0, 1.0);
        let center = head.center_mut();
        for ring in center.rings_mut() {
            for stamen in ring.stamens_mut() {
                stamen.set_scale(stamen_scale);
            }
        }
        center.set_dome_scale(0.5 + 0.5 * t);
    }
}

impl Default for BloomState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::petal::{FlowerHead, PetalLayerDescriptor};

    fn small_head() -> FlowerHead {
        let layers = [PetalLayerDescriptor {
            count: 5,
            length: 0.28,
            width: 0.1,
            color: Vec3::ONE,
        }];
        FlowerHead::build(&layers, Vec3::ZERO).unwrap()
    }

    #[test]
    fn test_smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_monotonic() {
        let mut prev = smoothstep(0.0);
        for i in 1..=1000 {
            let next = smoothstep(i as f32 / 1000.0);
            assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn test_progress_strictly_increases_without_overshoot() {
        let mut bloom = BloomState::new();
        bloom.set_target(true);
        let mut prev = bloom.progress();
        for _ in 0..1000 {
            bloom.update();
            let p = bloom.progress();
            assert!(p <= 1.0);
            // Strict increase holds until float rounding flattens the tail.
            if prev < 0.999 {
                assert!(p > prev);
            } else {
                assert!(p >= prev);
            }
            prev = p;
        }
        assert!(prev > 0.99);
    }

    #[test]
    fn test_retarget_reverses_decay() {
        let mut bloom = BloomState::new();
        bloom.set_target(true);
        for _ in 0..50 {
            bloom.update();
        }
        let high = bloom.progress();
        bloom.toggle();
        assert!(!bloom.is_opening());
        bloom.update();
        assert!(bloom.progress() < high);
    }

    #[test]
    fn test_closed_flower_uses_closed_bounds() {
        let mut head = small_head();
        let bloom = BloomState::new();
        bloom.apply(&mut head, 0.0);
        let petal = &head.layers()[0].petals()[0];
        let radial = petal.transform().translation.length();
        assert!((radial - petal.closed_radius()).abs() < 1e-5);
    }

    #[test]
    fn test_stamens_hidden_below_forty_percent() {
        let mut head = small_head();
        let mut bloom = BloomState::new();
        bloom.set_target(true);
        // Walk progress up; while smoothstep(progress) < 0.4 the stamens
        // must stay at zero scale.
        for _ in 0..2000 {
            bloom.update();
            bloom.apply(&mut head, 0.0);
            let t = smoothstep(bloom.progress());
            let scale = head.center().rings()[0].stamens()[0].transform().scale.x;
            if t <= STAMEN_REVEAL_START {
                assert_eq!(scale, 0.0);
            } else {
                assert!(scale > 0.0 && scale <= 1.0);
            }
        }
    }

    #[test]
    fn test_dome_scale_tracks_progress() {
        let mut head = small_head();
        let bloom = BloomState::new();
        bloom.apply(&mut head, 0.0);
        assert!((head.center().dome().scale.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_petal_pose_points_outward() {
        let mut head = small_head();
        let mut bloom = BloomState::new();
        bloom.set_target(true);
        for _ in 0..3000 {
            bloom.update();
        }
        bloom.apply(&mut head, 0.0);
        for petal in head.layers()[0].petals() {
            let (x, z) = (petal.transform().translation.x, petal.transform().translation.z);
            // Position azimuth matches the petal's assigned angle.
            let azimuth = z.atan2(x);
            let mut diff = (azimuth - petal.angle()).rem_euclid(std::f32::consts::TAU);
            if diff > std::f32::consts::PI {
                diff -= std::f32::consts::TAU;
            }
            // Open radius for layer 0 is positive, so azimuth is aligned.
            assert!(diff.abs() < 1e-3);
        }
    }
}
