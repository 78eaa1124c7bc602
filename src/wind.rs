//! The shared wind field.
//!
//! One stochastic process drives all wind-coupled motion in the scene:
//! flower sway, falling-petal drift, and cloud orbits all read the same
//! state. Gusts renew on a random timer; between gusts the strength chases
//! a slowly decaying target, so gusts swell and die organically instead of
//! stepping.
//!
//! Strength is never clamped directly. It stays within
//! `[0, max_strength]` because it only ever chases a target confined to
//! `[min_strength / 2, max_strength]` - a property the tests verify rather
//! than the code enforces.

use crate::random::RandomSource;
use glam::Vec2;
use std::f32::consts::TAU;

/// Seconds between gusts: `GUST_INTERVAL_MIN + uniform(0, GUST_INTERVAL_SPAN)`.
const GUST_INTERVAL_MIN: f32 = 3.0;
const GUST_INTERVAL_SPAN: f32 = 5.0;

/// Fraction of the remaining strength gap covered each frame.
const STRENGTH_APPROACH: f32 = 0.02;

/// Per-frame decay of the gust target, so every gust dies down on its own.
const TARGET_DECAY: f32 = 0.995;

/// Stock wind range of the lotus scene.
pub const DEFAULT_MIN_STRENGTH: f32 = 0.02;
pub const DEFAULT_MAX_STRENGTH: f32 = 0.15;

/// The gust process: smoothed strength, decaying target, and renewal timer.
#[derive(Debug, Clone)]
pub struct Wind {
    strength: f32,
    target_strength: f32,
    direction: f32,
    gust_timer: f32,
    gust_interval: f32,
    min_strength: f32,
    max_strength: f32,
}

impl Wind {
    /// Create a calm wind field that gusts within `[min_strength,
    /// max_strength]`.
    pub fn new(min_strength: f32, max_strength: f32) -> Self {
        Self {
            strength: 0.0,
            target_strength: 0.0,
            direction: 0.0,
            gust_timer: 0.0,
            gust_interval: GUST_INTERVAL_MIN + GUST_INTERVAL_SPAN / 2.0,
            min_strength,
            max_strength,
        }
    }

    /// Current smoothed strength.
    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Strength the process is currently chasing.
    #[inline]
    pub fn target_strength(&self) -> f32 {
        self.target_strength
    }

    /// Current direction, radians in `[0, 2π)`.
    #[inline]
    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Seconds until the next gust may fire.
    #[inline]
    pub fn gust_interval(&self) -> f32 {
        self.gust_interval
    }

    /// Configured gust floor.
    #[inline]
    pub fn min_strength(&self) -> f32 {
        self.min_strength
    }

    /// Configured gust ceiling.
    #[inline]
    pub fn max_strength(&self) -> f32 {
        self.max_strength
    }

    /// Horizontal wind vector: `(cos(direction), sin(direction)) * strength`.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.direction.cos(), self.direction.sin()) * self.strength
    }

    /// Advance the process by one frame.
    ///
    /// A `delta_time <= 0` frame is a no-op (the caller is expected to
    /// clamp oversized steps after a host pause; see
    /// [`Scene::advance`](crate::scene::Scene::advance)).
    pub fn advance(&mut self, delta_time: f32, rng: &mut impl RandomSource) {
        if delta_time <= 0.0 {
            return;
        }

        self.gust_timer += delta_time;
        if self.gust_timer >= self.gust_interval {
            self.gust_timer = 0.0;
            self.gust_interval = GUST_INTERVAL_MIN + rng.sample() * GUST_INTERVAL_SPAN;
            self.target_strength =
                self.min_strength + rng.sample() * (self.max_strength - self.min_strength);
            self.direction = rng.sample() * TAU;
        }

        self.strength += (self.target_strength - self.strength) * STRENGTH_APPROACH;

        // Each gust bleeds away until the next one fires. Dropping the
        // floor to half of min keeps a dead calm between gusts so the next
        // one reads as a genuine event.
        self.target_strength *= TARGET_DECAY;
        if self.target_strength < self.min_strength {
            self.target_strength = self.min_strength / 2.0;
        }
    }
}

impl Default for Wind {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_STRENGTH, DEFAULT_MAX_STRENGTH)
    }
}
