//! Error types for the garden.
//!
//! GPU setup, image loading, configuration persistence and the window loop
//! each get their own error type. Only GPU and window failures are fatal;
//! everything else degrades to an empty or previous state at the call site.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up or feeding the GPU.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a GPU with WebGPU/Vulkan/Metal/DX12 support is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// A point cloud buffer could not be allocated.
    #[error("failed to allocate point cloud buffer ({points} points): {message}")]
    Allocation { points: usize, message: String },
}

/// Errors that can occur while reading and decoding a source image.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// Failed to read the file from disk.
    #[error("failed to read image '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The bytes were read but could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Errors that can occur while loading or saving the particle configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    #[error("failed to access config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file contents are not a valid configuration.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can stop the garden from running.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
