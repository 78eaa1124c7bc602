//! # lotus - procedural blooming flower simulation
//!
//! A renderer-agnostic simulation core for an animated botanical scene: a
//! procedurally generated lotus that blooms and closes on demand, swaying
//! in a stochastic wind alongside falling petals and drifting clouds.
//!
//! The crate generates all geometry (petal, leaf, stem, center, clouds) and
//! owns the per-frame animation state. It draws nothing: the host reads
//! meshes once at startup and instance transforms every frame, and feeds
//! back a clock and a "the flower was tapped" signal.
//!
//! ## Quick Start
//!
//! ```
//! use lotus::prelude::*;
//!
//! let mut scene = Scene::builder().with_seed(42).build().unwrap();
//!
//! // The host's hit-test decided the flower was tapped:
//! scene.toggle_bloom();
//!
//! // Once per display-refresh callback:
//! let mut time = Time::new();
//! time.set_fixed_delta(Some(1.0 / 60.0));
//! for _ in 0..240 {
//!     let (elapsed, delta) = time.tick();
//!     scene.advance(elapsed, delta);
//! }
//!
//! // Read transforms back for rendering.
//! let root = scene.flower().root().matrix();
//! for layer in scene.flower().head().layers() {
//!     let _vertices = layer.mesh().vertices();
//!     for petal in layer.petals() {
//!         let _model = petal.transform().matrix();
//!     }
//! }
//! # let _ = root;
//! ```
//!
//! ## Architecture
//!
//! - [`mesh`] - parametric surface generation: Bezier outlines, beveled
//!   extrusion, the droop bend, tubes/spheres/cylinders.
//! - [`curve`] - the Catmull-Rom stem centerline.
//! - [`leaf`], [`petal`], [`flower`] - build-time assembly of the plant.
//! - [`bloom`] - the smoothed open/close state machine and per-frame petal
//!   pose recomputation.
//! - [`wind`] - the shared stochastic gust process.
//! - [`particles`] - falling-petal and cloud pools driven by the wind.
//! - [`scene`] - the composition root and fixed frame ordering.
//!
//! Everything is single-threaded and lock-free: each piece of shared state
//! has exactly one writing step per frame, in a fixed order.
//!
//! ## Determinism
//!
//! All randomness flows through one injectable [`random::RandomSource`].
//! Seed it ([`SceneBuilder::with_seed`](scene::SceneBuilder::with_seed)) and
//! drive the scene with a fixed delta for bit-reproducible runs.

pub mod bloom;
pub mod curve;
pub mod error;
pub mod flower;
pub mod leaf;
pub mod mesh;
pub mod particles;
pub mod petal;
pub mod random;
pub mod scene;
pub mod time;
pub mod transform;
pub mod wind;

pub use bloom::{lerp, smoothstep, BloomState};
pub use error::BuildError;
pub use scene::{Scene, SceneBuilder};

// Re-export the math types used throughout the public API.
pub use glam::{Mat4, Quat, Vec2, Vec3};

/// Convenient re-exports for common usage.
///
/// ```
/// use lotus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bloom::BloomState;
    pub use crate::curve::Centerline;
    pub use crate::error::BuildError;
    pub use crate::flower::{palette, Flower};
    pub use crate::leaf::{LeafDescriptor, Side};
    pub use crate::mesh::{Mesh, Outline, Vertex};
    pub use crate::particles::{Cloud, CloudField, FallingPetal, FallingPetals};
    pub use crate::petal::{FlowerHead, PetalInstance, PetalLayer, PetalLayerDescriptor};
    pub use crate::random::{RandomSource, SeededSource};
    pub use crate::scene::{Scene, SceneBuilder};
    pub use crate::time::Time;
    pub use crate::transform::Transform;
    pub use crate::wind::Wind;
    pub use crate::{Mat4, Quat, Vec2, Vec3};
}
