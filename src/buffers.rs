//! Vertex-attribute packing for point sets.
//!
//! Each point becomes one interleaved [`PointVertex`]; the renderer reads it
//! once per instance. Packing performs no math beyond splitting vectors into
//! arrays, so the GPU sees exactly what the sampler produced.

use bytemuck::{Pod, Zeroable};

use crate::point_set::PointSet;

/// Per-point vertex attributes as laid out in the GPU buffer.
///
/// The scalars sit in the fourth lane of the preceding vec3 so the struct
/// stays 16-byte aligned without explicit padding between attributes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub random_seed: f32,
    pub reference_position: [f32; 3],
    pub edge_factor: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

impl PointVertex {
    /// Byte offset of the reference position attribute.
    pub const REFERENCE_OFFSET: u64 = std::mem::offset_of!(PointVertex, reference_position) as u64;
    /// Byte offset of the colour attribute.
    pub const COLOR_OFFSET: u64 = std::mem::offset_of!(PointVertex, color) as u64;
    /// Byte offset of the random seed attribute.
    pub const SEED_OFFSET: u64 = std::mem::offset_of!(PointVertex, random_seed) as u64;
    /// Byte offset of the edge factor attribute.
    pub const EDGE_OFFSET: u64 = std::mem::offset_of!(PointVertex, edge_factor) as u64;
    /// Size of one vertex in bytes.
    pub const STRIDE: u64 = std::mem::size_of::<PointVertex>() as u64;
}

/// CPU-side staging for one point set's vertex buffer.
///
/// Built in full for every new image; there is no incremental update.
#[derive(Debug, Clone, Default)]
pub struct ParticleBuffers {
    vertices: Vec<PointVertex>,
}

impl ParticleBuffers {
    /// Pack every point of `points`.
    pub fn from_point_set(points: &PointSet) -> Self {
        let vertices = points
            .iter()
            .map(|p| PointVertex {
                position: p.position.to_array(),
                random_seed: p.random_seed,
                reference_position: p.reference_position.to_array(),
                edge_factor: p.edge_factor,
                color: p.color.to_array(),
                _pad: 0.0,
            })
            .collect();
        Self { vertices }
    }

    /// Number of points packed.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[PointVertex] {
        &self.vertices
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
