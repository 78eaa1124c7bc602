//! Frame timing for the host render loop.
//!
//! The core itself is clock-free - [`Scene::advance`](crate::scene::Scene::advance)
//! takes `elapsed_time` and `delta_time` as plain arguments. [`Time`] is the
//! convenience clock a host wraps around its loop to produce those values,
//! with the delta clamped so a paused-and-resumed window never feeds the
//! simulation an oversized step.
//!
//! # Example
//!
//! ```
//! use lotus::time::Time;
//!
//! let mut time = Time::new();
//! let (elapsed, delta) = time.tick();
//! // scene.advance(elapsed, delta);
//! # let _ = (elapsed, delta);
//! ```

use crate::scene::MAX_DELTA_TIME;
use std::time::Instant;

/// A per-frame clock: elapsed seconds, clamped delta, and a frame counter.
#[derive(Debug, Clone)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fixed_delta: Option<f32>,
}

impl Time {
    /// Start the clock now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fixed_delta: None,
        }
    }

    /// Advance to the next frame and return `(elapsed, delta)`, ready to
    /// hand to `Scene::advance`.
    ///
    /// The delta is clamped to [`MAX_DELTA_TIME`] unless a fixed delta is
    /// set.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        match self.fixed_delta {
            Some(fixed) => {
                // Deterministic stepping: elapsed accrues by the fixed
                // delta, wall time is ignored.
                self.delta_secs = fixed;
                self.elapsed_secs += fixed;
            }
            None => {
                self.delta_secs = raw_delta.min(MAX_DELTA_TIME);
                self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
            }
        }

        self.frame_count += 1;
        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds consumed by the last frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Force a fixed delta per tick (or `None` to return to wall time).
    /// Useful for deterministic test runs and offline rendering.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_tick_advances() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(5));
        let (elapsed, delta) = time.tick();
        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_delta_clamped() {
        let mut time = Time::new();
        // Simulate a long stall by backdating the last frame.
        time.last_frame = Instant::now() - Duration::from_secs(5);
        let (_, delta) = time.tick();
        assert!(delta <= MAX_DELTA_TIME);
    }

    #[test]
    fn test_fixed_delta_is_deterministic() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(0.016));
        for _ in 0..10 {
            let (_, delta) = time.tick();
            assert_eq!(delta, 0.016);
        }
        assert!((time.elapsed() - 0.16).abs() < 1e-6);
        assert_eq!(time.frame(), 10);
    }
}
