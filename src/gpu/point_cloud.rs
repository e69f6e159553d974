//! GPU-resident point set.

use wgpu::util::DeviceExt;

use crate::buffers::ParticleBuffers;
use crate::error::GpuError;

/// A vertex buffer holding one packed point set.
pub struct PointCloud {
    buffer: wgpu::Buffer,
    count: u32,
}

impl PointCloud {
    /// Upload packed points.
    ///
    /// Returns `Ok(None)` for an empty set, which has nothing to draw. An
    /// out-of-memory failure is caught with an error scope and reported as
    /// [`GpuError::Allocation`] instead of losing the device.
    pub fn upload(device: &wgpu::Device, buffers: &ParticleBuffers) -> Result<Option<Self>, GpuError> {
        if buffers.is_empty() {
            return Ok(None);
        }
        let count = u32::try_from(buffers.len()).map_err(|_| GpuError::Allocation {
            points: buffers.len(),
            message: "point count exceeds u32".into(),
        })?;

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Cloud Buffer"),
            contents: buffers.as_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GpuError::Allocation {
                points: buffers.len(),
                message: err.to_string(),
            });
        }

        Ok(Some(Self { buffer, count }))
    }

    /// Number of point instances.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
