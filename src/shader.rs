//! WGSL for the point-field render pipeline.
//!
//! The vertex stage runs the deformation from [`crate::deform`] once per
//! point instance and expands the point into a screen-aligned quad sized in
//! pixels. The fragment stage cuts the quad down to a soft round dot.
//!
//! Constants are baked into the source from [`DeformParams`], so the shader
//! has to be regenerated if the parameters change.

use crate::deform::{DeformParams, DRIFT_RATES, DRIFT_SEED_PHASE, DRIFT_SPATIAL_FREQUENCY};

/// Vertex attribute locations, matching the pipeline's vertex layout.
pub const LOCATION_REFERENCE: u32 = 0;
pub const LOCATION_COLOR: u32 = 1;
pub const LOCATION_SEED: u32 = 2;
pub const LOCATION_EDGE: u32 = 3;

/// WGSL declaration of the uniform block written by the driver.
pub const UNIFORMS_WGSL: &str = r#"struct Uniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    mouse: vec3<f32>,
    time: f32,
    tint: vec3<f32>,
    pixel_ratio: f32,
    viewport: vec2<f32>,
    size: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;
"#;

/// Generate the complete render shader.
pub fn render_shader(params: &DeformParams) -> String {
    let [rate_x, rate_y, rate_z] = DRIFT_RATES;
    let [seed_x, seed_y] = DRIFT_SEED_PHASE;

    format!(
        r#"{uniforms}
const INFLUENCE_EXPONENT: f32 = {influence_exponent:?};
const TIME_SCALE: f32 = {time_scale:?};
const DRIFT_SCALE: f32 = {drift_scale:?};
const EXPANSION_SCALE: f32 = {expansion_scale:?};
const REPULSION_RADIUS: f32 = {repulsion_radius:?};
const REPULSION_STRENGTH: f32 = {repulsion_strength:?};
const SIZE_GAIN: f32 = {size_gain:?};
const ALPHA_FADE: f32 = {alpha_fade:?};
const PERSPECTIVE: f32 = {perspective:?};

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) alpha: f32,
}};

fn normalize_or_zero(v: vec3<f32>) -> vec3<f32> {{
    let len = length(v);
    if len > 0.0 {{
        return v / len;
    }}
    return vec3<f32>(0.0);
}}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location({loc_reference}) reference: vec3<f32>,
    @location({loc_color}) color: vec3<f32>,
    @location({loc_seed}) seed: f32,
    @location({loc_edge}) edge: f32,
) -> VertexOutput {{
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );
    let quad = quad_vertices[vertex_index];

    let t = uniforms.time * TIME_SCALE;
    let influence = pow(clamp(edge, 0.0, 1.0), INFLUENCE_EXPONENT);

    let drift = vec3<f32>(
        sin(t * {rate_x:?} + reference.y * {spatial:?} + seed * {seed_x:?}),
        cos(t * {rate_y:?} + reference.x * {spatial:?} + seed * {seed_y:?}),
        sin(t * {rate_z:?} + reference.x + reference.y),
    );
    var pos = reference
        + drift * influence * DRIFT_SCALE
        + normalize_or_zero(reference) * influence * EXPANSION_SCALE;

    // Pointer repulsion
    let away = pos - uniforms.mouse;
    let dist = length(away);
    if dist < REPULSION_RADIUS {{
        let falloff = 1.0 - dist / REPULSION_RADIUS;
        pos += normalize_or_zero(away) * falloff * falloff * REPULSION_STRENGTH;
    }}

    let view_pos = uniforms.view * vec4<f32>(pos, 1.0);
    var clip_pos = uniforms.proj * view_pos;

    let depth = max(-view_pos.z, 0.0001);
    let point_size = uniforms.size * (1.0 + influence * SIZE_GAIN) * uniforms.pixel_ratio * (PERSPECTIVE / depth);

    // quad spans [-1, 1], so half the point size in NDC is size / viewport
    clip_pos.x += quad.x * point_size / uniforms.viewport.x * clip_pos.w;
    clip_pos.y += quad.y * point_size / uniforms.viewport.y * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = color * uniforms.tint;
    out.uv = quad * 0.5;
    out.alpha = 1.0 - influence * ALPHA_FADE;
    return out;
}}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {{
    let r = length(in.uv);
    if r > 0.5 {{
        discard;
    }}
    let dot_alpha = 1.0 - smoothstep(0.3, 0.5, r);
    return vec4<f32>(in.color, dot_alpha * in.alpha);
}}
"#,
        uniforms = UNIFORMS_WGSL,
        influence_exponent = params.influence_exponent,
        time_scale = params.time_scale,
        drift_scale = params.drift_scale,
        expansion_scale = params.expansion_scale,
        repulsion_radius = params.repulsion_radius,
        repulsion_strength = params.repulsion_strength,
        size_gain = params.size_gain,
        alpha_fade = params.alpha_fade,
        perspective = params.perspective,
        loc_reference = LOCATION_REFERENCE,
        loc_color = LOCATION_COLOR,
        loc_seed = LOCATION_SEED,
        loc_edge = LOCATION_EDGE,
        spatial = DRIFT_SPATIAL_FREQUENCY,
    )
}
