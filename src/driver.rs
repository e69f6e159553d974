//! Per-frame uniform computation.
//!
//! The [`UniformDriver`] is called once per rendered frame with the elapsed
//! time, the camera, the pointer and a snapshot of the live configuration.
//! It produces [`AnimationUniforms`], which the renderer uploads before
//! drawing that frame.
//!
//! The pointer arrives in normalized device coordinates. It is turned into
//! a world position by casting a ray from the camera through the pointer and
//! intersecting it with the `z = 0` plane the image lies on.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::config::ParticleConfig;
use crate::deform::FrameState;

/// Pointer position used while no pointer is active.
///
/// Far enough outside any sampled image that the repulsion term is zero.
pub const POINTER_FAR_AWAY: Vec3 = Vec3::splat(9999.0);

/// Upper bound on the device pixel ratio.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Ray directions with a smaller |z| are treated as parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Camera and viewport state for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub view: Mat4,
    pub proj: Mat4,
    pub camera_position: Vec3,
    /// Render target size in physical pixels.
    pub viewport: Vec2,
    /// Window scale factor as reported by the platform.
    pub device_pixel_ratio: f32,
    /// Pointer in normalized device coordinates, `None` when inactive.
    pub pointer_ndc: Option<Vec2>,
}

/// Everything the per-point program needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationUniforms {
    /// Elapsed seconds.
    pub time: f32,
    /// Device pixel ratio after clamping.
    pub pixel_ratio: f32,
    /// Base point size.
    pub size: f32,
    /// Pointer in world space.
    pub mouse: Vec3,
    /// Colour multiplier.
    pub tint: Vec3,
    pub view: Mat4,
    pub proj: Mat4,
    pub viewport: Vec2,
}

impl AnimationUniforms {
    /// The subset used by the CPU deformation reference.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            time: self.time,
            mouse: self.mouse,
        }
    }

    /// Pack for the uniform buffer.
    pub fn to_gpu(&self) -> GpuUniforms {
        GpuUniforms {
            view: self.view.to_cols_array_2d(),
            proj: self.proj.to_cols_array_2d(),
            mouse: self.mouse.to_array(),
            time: self.time,
            tint: self.tint.to_array(),
            pixel_ratio: self.pixel_ratio,
            viewport: self.viewport.to_array(),
            size: self.size,
            _padding: 0.0,
        }
    }
}

/// Uniform block layout shared with the WGSL `Uniforms` struct.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct GpuUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub mouse: [f32; 3],
    pub time: f32,
    pub tint: [f32; 3],
    pub pixel_ratio: f32,
    pub viewport: [f32; 2],
    pub size: f32,
    pub _padding: f32,
}

/// Computes [`AnimationUniforms`] each frame.
///
/// Holds the only state that survives between frames: the last elapsed
/// time, and the last pointer world position, which is kept when the
/// pointer ray misses the image plane.
#[derive(Debug, Clone)]
pub struct UniformDriver {
    time: f32,
    mouse: Vec3,
}

impl UniformDriver {
    pub fn new() -> Self {
        Self {
            time: 0.0,
            mouse: POINTER_FAR_AWAY,
        }
    }

    /// Compute uniforms for a frame.
    ///
    /// `elapsed` never moves the clock backwards; configuration edits do
    /// not touch it.
    pub fn update(&mut self, elapsed: f32, frame: &FrameContext, config: &ParticleConfig) -> AnimationUniforms {
        self.time = self.time.max(elapsed);

        let pixel_ratio = frame.device_pixel_ratio.min(MAX_PIXEL_RATIO).max(f32::MIN_POSITIVE);

        self.mouse = match frame.pointer_ndc {
            None => POINTER_FAR_AWAY,
            Some(ndc) => {
                let inverse = (frame.proj * frame.view).inverse();
                match unproject_to_plane(ndc, inverse, frame.camera_position) {
                    Some(world) => world,
                    None => {
                        log::trace!("Pointer ray parallel to image plane; keeping {:?}", self.mouse);
                        self.mouse
                    }
                }
            }
        };

        AnimationUniforms {
            time: self.time,
            pixel_ratio,
            size: config.size,
            mouse: self.mouse,
            tint: config.tint(),
            view: frame.view,
            proj: frame.proj,
            viewport: frame.viewport,
        }
    }
}

impl Default for UniformDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Intersect the ray through `ndc` with the plane `z = 0`.
///
/// `inverse_view_proj` maps clip space back to world space. Returns `None`
/// when the ray is parallel to the plane or the result is not finite.
pub fn unproject_to_plane(ndc: Vec2, inverse_view_proj: Mat4, camera_position: Vec3) -> Option<Vec3> {
    let through = inverse_view_proj.project_point3(ndc.extend(0.5));
    let dir = (through - camera_position).normalize_or_zero();
    if dir.z.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -camera_position.z / dir.z;
    let hit = camera_position + dir * t;
    hit.is_finite().then_some(hit)
}
