//! Per-point deformation.
//!
//! Every frame each point is displaced from its fixed reference position by
//! three terms, all recomputed from scratch:
//!
//! - an oscillating drift, phase-shifted per point by its random seed,
//! - an outward push away from the origin,
//! - a repulsion bubble around the pointer.
//!
//! The first two are gated by `influence = edge_factor ^ exponent`, so the
//! middle of the image holds still while the silhouette dissolves. Nothing
//! is integrated; a frame depends only on the reference data and the
//! uniforms for that frame.
//!
//! The GPU evaluates the same function in the vertex shader generated by
//! [`crate::shader`]. The functions here are the CPU reference and share
//! their constants with it through [`DeformParams`].

use glam::Vec3;

use crate::point_set::PointSet;

/// Time multipliers for the x, y and z drift oscillators.
pub(crate) const DRIFT_RATES: [f32; 3] = [1.0, 0.8, 0.5];
/// Spatial frequency of the x and y oscillators.
pub(crate) const DRIFT_SPATIAL_FREQUENCY: f32 = 0.5;
/// Seed phase multipliers for the x and y oscillators.
pub(crate) const DRIFT_SEED_PHASE: [f32; 2] = [10.0, 12.0];

/// Named constants of the deformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformParams {
    /// Power applied to the edge factor to get influence.
    pub influence_exponent: f32,
    /// Global multiplier on elapsed time.
    pub time_scale: f32,
    /// Amplitude of the oscillating drift.
    pub drift_scale: f32,
    /// Amplitude of the outward push.
    pub expansion_scale: f32,
    /// World-space radius of the pointer bubble.
    pub repulsion_radius: f32,
    /// Maximum displacement from the pointer, at zero distance.
    pub repulsion_strength: f32,
    /// Extra point size at full influence (`1 + gain` times the base).
    pub size_gain: f32,
    /// Alpha lost at full influence.
    pub alpha_fade: f32,
    /// Numerator of the perspective size term.
    pub perspective: f32,
}

impl Default for DeformParams {
    fn default() -> Self {
        Self {
            influence_exponent: 3.5,
            time_scale: 0.3,
            drift_scale: 2.0,
            expansion_scale: 1.5,
            repulsion_radius: 4.0,
            repulsion_strength: 3.0,
            size_gain: 2.0,
            alpha_fade: 0.7,
            perspective: 50.0,
        }
    }
}

/// Inputs that change every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Elapsed seconds.
    pub time: f32,
    /// Pointer position in world space.
    pub mouse: Vec3,
}

/// Result of deforming one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deformed {
    /// Displaced world-space position.
    pub position: Vec3,
    /// Opacity before the footprint falloff.
    pub alpha: f32,
    /// Edge-driven size multiplier, `1 + size_gain * influence`.
    pub size_scale: f32,
}

/// Nonlinear remap of the edge factor.
#[inline]
pub fn influence(edge_factor: f32, params: &DeformParams) -> f32 {
    edge_factor.clamp(0.0, 1.0).powf(params.influence_exponent)
}

/// Unscaled drift vector for a point.
pub fn drift(reference: Vec3, seed: f32, time: f32, params: &DeformParams) -> Vec3 {
    let t = time * params.time_scale;
    let [rx, ry, rz] = DRIFT_RATES;
    let [sx, sy] = DRIFT_SEED_PHASE;
    Vec3::new(
        (t * rx + reference.y * DRIFT_SPATIAL_FREQUENCY + seed * sx).sin(),
        (t * ry + reference.x * DRIFT_SPATIAL_FREQUENCY + seed * sy).cos(),
        (t * rz + reference.x + reference.y).sin(),
    )
}

/// Repulsion magnitude at `distance` from the pointer.
///
/// `(1 - d / r)^2` inside the radius, zero at and beyond it.
#[inline]
pub fn repulsion_force(distance: f32, radius: f32) -> f32 {
    if distance < radius && radius > 0.0 {
        let falloff = 1.0 - distance / radius;
        falloff * falloff
    } else {
        0.0
    }
}

/// Displacement pushing `position` away from `mouse`.
///
/// Direction is undefined when the two coincide; the push is zero then.
pub fn repulsion(position: Vec3, mouse: Vec3, params: &DeformParams) -> Vec3 {
    let away = position - mouse;
    let force = repulsion_force(away.length(), params.repulsion_radius);
    away.normalize_or_zero() * force * params.repulsion_strength
}

/// Deform one point for the given frame.
pub fn deform(reference: Vec3, seed: f32, edge_factor: f32, frame: &FrameState, params: &DeformParams) -> Deformed {
    let influence = influence(edge_factor, params);

    let mut position = reference
        + drift(reference, seed, frame.time, params) * influence * params.drift_scale
        + reference.normalize_or_zero() * influence * params.expansion_scale;
    position += repulsion(position, frame.mouse, params);

    Deformed {
        position,
        alpha: 1.0 - params.alpha_fade * influence,
        size_scale: 1.0 + params.size_gain * influence,
    }
}

/// Deform every point of a set, in order.
///
/// Points are independent, so this matches the GPU result regardless of
/// evaluation order.
pub fn deform_all(points: &PointSet, frame: &FrameState, params: &DeformParams) -> Vec<Deformed> {
    points
        .iter()
        .map(|p| deform(p.reference_position, p.random_seed, p.edge_factor, frame, params))
        .collect()
}

/// On-screen point diameter in pixels.
///
/// `view_depth` is the distance in front of the camera (`-z` in view space).
pub fn point_size(base_size: f32, size_scale: f32, pixel_ratio: f32, view_depth: f32, params: &DeformParams) -> f32 {
    base_size * size_scale * pixel_ratio * (params.perspective / view_depth.max(1e-4))
}

/// Opacity of a point sprite at radius `r` from its centre in point UV.
///
/// `None` outside the circular footprint; soft edge between 0.3 and 0.5.
pub fn footprint_alpha(r: f32) -> Option<f32> {
    if r > 0.5 {
        return None;
    }
    Some(1.0 - smoothstep(0.3, 0.5, r))
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
