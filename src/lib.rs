//! # Garden of Memory
//!
//! Photographs dissolved into animated GPU point fields.
//!
//! An image is sampled into a few tens of thousands of coloured points laid
//! out on a plane, each lifted toward the viewer by its brightness. Every
//! frame a vertex program displaces the points: the centre of the picture
//! holds still, the edges drift, spread outward and fade, and everything
//! near the mouse is pushed away.
//!
//! ## Quick Start
//!
//! ```ignore
//! use memory_garden::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     Garden::new()
//!         .with_image("portrait.jpg")
//!         .with_config_path("garden-particles.json")
//!         .run()
//! }
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Decode a file | [`loader`] |
//! | Bitmap to points | [`sampler`] producing a [`PointSet`] |
//! | Points to vertex data | [`buffers`] |
//! | Per-frame uniforms | [`driver`] |
//! | Per-point displacement | [`deform`] (CPU reference) and [`shader`] (WGSL) |
//!
//! The sampler and deformation are plain functions with no GPU dependency,
//! so they can be tested and benchmarked headless:
//!
//! ```ignore
//! use memory_garden::deform::{deform_all, DeformParams, FrameState};
//!
//! let points = sample_image(&image, &SamplerConfig::default());
//! let frame = FrameState { time: 1.0, mouse: Vec3::splat(9999.0) };
//! let moved = deform_all(&points, &frame, &DeformParams::default());
//! ```
//!
//! ## Live configuration
//!
//! [`ParticleConfig`] holds the user-tunable values (point size, tint and a
//! few persisted extras). Changing it never rebuilds the point set; the next
//! frame simply picks up the new values.

pub mod buffers;
pub mod config;
pub mod deform;
pub mod driver;
pub mod error;
mod gpu;
pub mod input;
pub mod loader;
pub mod point_set;
pub mod sampler;
mod scene;
pub mod shader;
pub mod time;
#[cfg(feature = "egui")]
pub mod ui;

pub use bytemuck;
pub use buffers::{ParticleBuffers, PointVertex};
pub use config::{ParticleConfig, SavedState};
pub use deform::DeformParams;
pub use driver::{AnimationUniforms, UniformDriver};
pub use error::{ConfigError, GpuError, ImageLoadError, SceneError};
pub use glam::{Vec2, Vec3};
pub use point_set::{PointRecord, PointSet};
pub use sampler::{sample_image, SamplerConfig};
pub use scene::Garden;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use memory_garden::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffers::ParticleBuffers;
    pub use crate::config::{ParticleConfig, SavedState};
    pub use crate::deform::{DeformParams, FrameState};
    pub use crate::driver::{AnimationUniforms, FrameContext, UniformDriver};
    pub use crate::error::{ConfigError, GpuError, ImageLoadError, SceneError};
    pub use crate::input::{Input, KeyCode};
    pub use crate::loader::load_image;
    pub use crate::point_set::{PointRecord, PointSet};
    pub use crate::sampler::{sample_image, SamplerConfig};
    pub use crate::scene::Garden;
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3};
    #[cfg(feature = "egui")]
    pub use egui;
}
