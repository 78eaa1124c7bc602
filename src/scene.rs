//! Scene composition and the per-frame update.
//!
//! A [`Scene`] owns one flower, the two particle pools, the shared wind
//! field, the bloom state, and the random source everything draws from.
//! The host calls [`Scene::advance`] once per display-refresh callback and
//! reads the resulting transforms back for rendering; nothing inside the
//! core blocks, spawns threads, or runs out of order.
//!
//! # Example
//!
//! ```
//! use lotus::prelude::*;
//!
//! let mut scene = Scene::builder().with_seed(7).build().unwrap();
//! scene.set_bloom_target(true);
//!
//! // Host render loop:
//! for frame in 0..60 {
//!     scene.advance(frame as f32 * 0.016, 0.016);
//! }
//!
//! assert!(scene.bloom().progress() > 0.0);
//! ```

use crate::bloom::BloomState;
use crate::error::BuildError;
use crate::flower::{Flower, DEFAULT_STEM_HEIGHT};
use crate::leaf::LeafDescriptor;
use crate::particles::{
    CloudField, FallingPetals, DEFAULT_CLOUD_COUNT, DEFAULT_FALLING_PETAL_COUNT,
};
use crate::petal::PetalLayerDescriptor;
use crate::random::{RandomSource, SeededSource};
use crate::wind::{Wind, DEFAULT_MAX_STRENGTH, DEFAULT_MIN_STRENGTH};

/// Largest delta the simulation will integrate in one frame. A host that
/// pauses and resumes hands us a huge step; clamping keeps the gust timer
/// and strength from jumping visibly.
pub const MAX_DELTA_TIME: f32 = 0.1;

/// Builder for a [`Scene`].
///
/// Defaults reproduce the stock lotus scene; override what you need:
///
/// ```
/// use lotus::prelude::*;
///
/// let scene = Scene::builder()
///     .with_stem_height(1.8)
///     .with_falling_petal_count(12)
///     .with_wind_range(0.01, 0.1)
///     .with_seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(scene.falling_petals().petals().len(), 12);
/// ```
pub struct SceneBuilder {
    stem_height: f32,
    leaves: Vec<LeafDescriptor>,
    layers: Vec<PetalLayerDescriptor>,
    falling_petal_count: usize,
    cloud_count: usize,
    min_strength: f32,
    max_strength: f32,
    rng: Box<dyn RandomSource>,
}

impl SceneBuilder {
    fn new() -> Self {
        Self {
            stem_height: DEFAULT_STEM_HEIGHT,
            leaves: vec![LeafDescriptor::lower_right(), LeafDescriptor::upper_left()],
            layers: PetalLayerDescriptor::lotus_layers(),
            falling_petal_count: DEFAULT_FALLING_PETAL_COUNT,
            cloud_count: DEFAULT_CLOUD_COUNT,
            min_strength: DEFAULT_MIN_STRENGTH,
            max_strength: DEFAULT_MAX_STRENGTH,
            rng: Box::new(SeededSource::new()),
        }
    }

    /// Set the stem height.
    pub fn with_stem_height(mut self, height: f32) -> Self {
        self.stem_height = height;
        self
    }

    /// Replace the leaf set.
    pub fn with_leaves(mut self, leaves: Vec<LeafDescriptor>) -> Self {
        self.leaves = leaves;
        self
    }

    /// Add one leaf to the current set.
    pub fn with_leaf(mut self, leaf: LeafDescriptor) -> Self {
        self.leaves.push(leaf);
        self
    }

    /// Replace the petal layer set (innermost first).
    pub fn with_petal_layers(mut self, layers: Vec<PetalLayerDescriptor>) -> Self {
        self.layers = layers;
        self
    }

    /// Set the falling-petal pool size.
    pub fn with_falling_petal_count(mut self, count: usize) -> Self {
        self.falling_petal_count = count;
        self
    }

    /// Set the cloud pool size.
    pub fn with_cloud_count(mut self, count: usize) -> Self {
        self.cloud_count = count;
        self
    }

    /// Set the wind gust strength range.
    pub fn with_wind_range(mut self, min_strength: f32, max_strength: f32) -> Self {
        self.min_strength = min_strength;
        self.max_strength = max_strength;
        self
    }

    /// Seed the default random source for a reproducible scene.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Box::new(SeededSource::with_seed(seed));
        self
    }

    /// Substitute a custom random source (e.g. a scripted mock in tests).
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    /// Build the scene, failing fast on any invalid descriptor.
    pub fn build(mut self) -> Result<Scene, BuildError> {
        let flower = Flower::build(self.stem_height, &self.leaves, &self.layers)?;
        let falling_petals = FallingPetals::spawn(self.falling_petal_count, &mut self.rng)?;
        let clouds = CloudField::spawn(self.cloud_count, &mut self.rng)?;
        Ok(Scene {
            flower,
            falling_petals,
            clouds,
            wind: Wind::new(self.min_strength, self.max_strength),
            bloom: BloomState::new(),
            rng: self.rng,
        })
    }
}

/// The whole animated scene.
pub struct Scene {
    flower: Flower,
    falling_petals: FallingPetals,
    clouds: CloudField,
    wind: Wind,
    bloom: BloomState,
    rng: Box<dyn RandomSource>,
}

impl Scene {
    /// Start configuring a scene.
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    /// Build the stock lotus scene with an entropy-seeded random source.
    pub fn lotus() -> Result<Self, BuildError> {
        Self::builder().build()
    }

    /// Set the bloom target: `true` opens the flower, `false` closes it.
    /// Called by the host when its hit-test registers a tap on the head.
    pub fn set_bloom_target(&mut self, open: bool) {
        self.bloom.set_target(open);
    }

    /// Flip the bloom target.
    pub fn toggle_bloom(&mut self) {
        self.bloom.toggle();
    }

    /// Advance the whole scene one frame.
    ///
    /// `delta_time` is clamped to [`MAX_DELTA_TIME`]; a non-positive delta
    /// still updates the bloom pose (it has no time dependence) but leaves
    /// the wind untouched.
    ///
    /// Per-frame ordering is fixed: bloom progress, petal poses, wind,
    /// flower sway, falling petals, clouds.
    pub fn advance(&mut self, elapsed_time: f32, delta_time: f32) {
        let delta_time = delta_time.min(MAX_DELTA_TIME);

        self.bloom.update();
        self.bloom.apply(self.flower.head_mut(), elapsed_time);

        self.wind.advance(delta_time, &mut self.rng);

        self.flower.apply_wind(elapsed_time, &self.wind);
        self.falling_petals
            .advance(elapsed_time, &self.wind, &mut self.rng);
        self.clouds.advance(elapsed_time, &self.wind);
    }

    /// The flower (root transform, stem, leaves, head).
    #[inline]
    pub fn flower(&self) -> &Flower {
        &self.flower
    }

    /// The falling-petal pool.
    #[inline]
    pub fn falling_petals(&self) -> &FallingPetals {
        &self.falling_petals
    }

    /// The cloud pool.
    #[inline]
    pub fn clouds(&self) -> &CloudField {
        &self.clouds
    }

    /// The shared wind field.
    #[inline]
    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    /// The bloom state.
    #[inline]
    pub fn bloom(&self) -> &BloomState {
        &self.bloom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_matches_stock_layout() {
        let scene = Scene::builder().with_seed(1).build().unwrap();
        assert_eq!(scene.flower().head().layers().len(), 5);
        assert_eq!(scene.falling_petals().petals().len(), 6);
        assert_eq!(scene.clouds().clouds().len(), 15);
    }

    #[test]
    fn test_build_fails_on_bad_layer() {
        let result = Scene::builder()
            .with_petal_layers(vec![PetalLayerDescriptor {
                count: 0,
                length: 0.3,
                width: 0.1,
                color: glam::Vec3::ONE,
            }])
            .build();
        assert_eq!(result.err(), Some(BuildError::EmptyPetalLayer));
    }

    #[test]
    fn test_oversized_delta_clamped() {
        let mut scene = Scene::builder().with_seed(9).build().unwrap();
        // A 10-minute pause must not slam the wind past its ceiling.
        scene.advance(0.0, 600.0);
        assert!(scene.wind().strength() <= scene.wind().max_strength());
    }

    #[test]
    fn test_toggle_roundtrip() {
        let mut scene = Scene::builder().with_seed(2).build().unwrap();
        scene.toggle_bloom();
        assert!(scene.bloom().is_opening());
        scene.toggle_bloom();
        assert!(!scene.bloom().is_opening());
    }

    #[test]
    fn test_seeded_scenes_are_reproducible() {
        let build = || {
            let mut s = Scene::builder().with_seed(77).build().unwrap();
            for frame in 0..200 {
                s.advance(frame as f32 * 0.016, 0.016);
            }
            s
        };
        let a = build();
        let b = build();
        assert_eq!(a.wind().strength(), b.wind().strength());
        assert_eq!(
            a.falling_petals().petals()[0].position(),
            b.falling_petals().petals()[0].position()
        );
    }
}
