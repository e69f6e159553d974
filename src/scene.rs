//! Garden builder and window loop.
//!
//! [`Garden`] collects the startup options, then [`Garden::run`] opens a
//! window and drives the frame loop until it is closed:
//!
//! 1. input is folded into the camera and the live configuration
//! 2. the [`UniformDriver`] computes this frame's uniforms
//! 3. the GPU draws the current point cloud (or only the background)
//! 4. a changed configuration is written back to disk
//!
//! Images arrive from the command line or by dropping a file on the window.
//! Each one is sampled from scratch and swapped in once its GPU buffer is
//! ready. A file that cannot be decoded leaves the current image in place.
//! The last image shown is remembered and reopened on the next run when no
//! image is given.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::buffers::ParticleBuffers;
use crate::config::{ParticleConfig, SavedState};
use crate::deform::DeformParams;
use crate::driver::{FrameContext, UniformDriver};
use crate::error::{ImageLoadError, SceneError};
use crate::gpu::GpuState;
use crate::input::{Input, KeyCode};
use crate::loader::load_image;
use crate::point_set::PointSet;
use crate::sampler::{sample_image, SamplerConfig};
use crate::shader::render_shader;
use crate::time::Time;

/// Camera spin speed while nothing is loaded.
const AUTO_ROTATE_SPEED: f32 = 0.5;

/// A particle garden builder.
///
/// Use method chaining to configure, then call `.run()` to start.
///
/// ```ignore
/// use memory_garden::Garden;
///
/// Garden::new()
///     .with_image("portrait.png")
///     .with_config_path("garden-particles.json")
///     .run()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Garden {
    image: Option<PathBuf>,
    config_path: Option<PathBuf>,
    sampler: SamplerConfig,
}

impl Garden {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image to show at startup, instead of the last one shown.
    pub fn with_image<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.image = Some(path.into());
        self
    }

    /// Where the particle configuration and last image are loaded from and
    /// saved to.
    ///
    /// Without a path everything starts at defaults and nothing is saved.
    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Run the garden. This blocks until the window is closed.
    pub fn run(self) -> Result<(), SceneError> {
        let mut app = self.into_app();

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop.run_app(&mut app)?;

        match app.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Load saved state and queue the startup image.
    fn into_app(self) -> App {
        let state = self
            .config_path
            .as_deref()
            .map(SavedState::load_or_default)
            .unwrap_or_default();
        let image = self.image.clone().or_else(|| state.last_image.clone());

        let mut app = App::new(self, state);
        if let Some(path) = image {
            // Forgotten unless it loads.
            app.state.last_image = None;
            app.open_image(&path);
        }
        app
    }
}

/// Read, decode and sample an image file.
fn load_point_set(path: &Path, sampler: &SamplerConfig) -> Result<PointSet, ImageLoadError> {
    let image = load_image(path)?;
    let points = sample_image(&image, sampler);
    log::info!(
        "Sampled {} ({}x{}) into {} points",
        path.display(),
        image.width(),
        image.height(),
        points.len()
    );
    Ok(points)
}

/// Vertex data for a newly chosen image, or `None` to keep what is shown.
///
/// An image with no visible pixels still replaces the current one.
fn incoming_points(path: &Path, sampler: &SamplerConfig) -> Option<ParticleBuffers> {
    match load_point_set(path, sampler) {
        Ok(points) => Some(ParticleBuffers::from_point_set(&points)),
        Err(e) => {
            log::warn!("Could not load {}: {e}", path.display());
            None
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    shader: String,
    sampler: SamplerConfig,
    state: SavedState,
    config_path: Option<PathBuf>,
    /// Last value written to disk.
    saved_state: SavedState,
    /// Points waiting for the GPU to exist.
    pending: Option<ParticleBuffers>,
    input: Input,
    time: Time,
    driver: UniformDriver,
    #[cfg(feature = "egui")]
    show_panel: bool,
    failure: Option<SceneError>,
}

impl App {
    fn new(garden: Garden, state: SavedState) -> Self {
        Self {
            window: None,
            gpu: None,
            shader: render_shader(&DeformParams::default()),
            sampler: garden.sampler,
            saved_state: state.clone(),
            state,
            config_path: garden.config_path,
            pending: None,
            input: Input::new(),
            time: Time::new(),
            driver: UniformDriver::new(),
            #[cfg(feature = "egui")]
            show_panel: true,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SceneError) {
        log::error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }

    /// Returns `false` if the upload failed and the previous cloud stays.
    fn show_points(&mut self, buffers: ParticleBuffers) -> bool {
        let Some(gpu) = &mut self.gpu else {
            self.pending = Some(buffers);
            return true;
        };
        match gpu.replace_point_cloud(&buffers) {
            Ok(()) => true,
            Err(e) => {
                log::error!("{e}");
                false
            }
        }
    }

    fn open_image(&mut self, path: &Path) {
        let Some(buffers) = incoming_points(path, &self.sampler) else {
            return;
        };
        if self.show_points(buffers) {
            self.state.last_image = Some(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
        }
    }

    fn handle_keys(&mut self, event_loop: &ActiveEventLoop) {
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
        }
        if self.input.key_pressed(KeyCode::Plus) {
            self.state.particle.nudge_size(1.0);
        }
        if self.input.key_pressed(KeyCode::Minus) {
            self.state.particle.nudge_size(-1.0);
        }
        if self.input.key_pressed(KeyCode::R) {
            self.state.particle = ParticleConfig::default();
        }
        #[cfg(feature = "egui")]
        if self.input.key_pressed(KeyCode::Space) {
            self.show_panel = !self.show_panel;
        }
    }

    fn persist_state(&mut self) {
        if self.state == self.saved_state {
            return;
        }
        self.saved_state = self.state.clone();
        let Some(path) = &self.config_path else {
            return;
        };
        match self.state.save(path) {
            Ok(()) => log::info!("Saved settings to {}", path.display()),
            Err(e) => log::warn!("{e}"),
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.handle_keys(event_loop);

        let (Some(gpu), Some(window)) = (self.gpu.as_mut(), self.window.as_ref()) else {
            return;
        };

        if self.time.update() {
            log::debug!(
                "frame {}: {:.1} fps, {} points",
                self.time.frame(),
                self.time.fps(),
                gpu.point_count()
            );
        }

        let drag = self.input.drag_delta();
        if drag != Vec2::ZERO {
            gpu.camera.orbit(drag.x, drag.y);
        }
        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            gpu.camera.zoom(scroll);
        }
        if !gpu.has_points() {
            gpu.camera.auto_rotate(self.time.delta(), AUTO_ROTATE_SPEED);
        }

        #[cfg(feature = "egui")]
        if self.show_panel {
            let stats = crate::ui::PanelStats {
                points: gpu.point_count(),
                fps: self.time.fps(),
            };
            gpu.egui_mut().begin_frame(window);
            let ctx = gpu.egui_mut().ctx.clone();
            crate::ui::control_panel(&ctx, &mut self.state.particle, stats);
            let output = gpu.egui_mut().end_frame(window);
            gpu.set_overlay(output);
        }

        let frame = FrameContext {
            view: gpu.camera.view_matrix(),
            proj: gpu.camera.projection(gpu.aspect()),
            camera_position: gpu.camera.position(),
            viewport: Vec2::new(gpu.config.width as f32, gpu.config.height as f32),
            device_pixel_ratio: window.scale_factor() as f32,
            pointer_ndc: self.input.mouse_ndc(),
        };
        let uniforms = self.driver.update(self.time.elapsed(), &frame, &self.state.particle);

        match gpu.render(&uniforms) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(winit::dpi::PhysicalSize {
                    width: gpu.config.width,
                    height: gpu.config.height,
                })
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory while rendering");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }

        self.input.begin_frame();
        self.persist_state();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Garden of Memory")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        let size = window.inner_size();
        self.input.set_window_size(size.width, size.height);
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window, &self.shader)) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => return self.fail(event_loop, e.into()),
        }

        if let Some(buffers) = self.pending.take() {
            if !self.show_points(buffers) {
                self.state.last_image = None;
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        let consumed = match (&mut self.gpu, &self.window) {
            (Some(gpu), Some(window)) if self.show_panel => gpu.egui_mut().on_window_event(window, &event),
            _ => false,
        };
        #[cfg(not(feature = "egui"))]
        let consumed = false;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input.set_window_size(physical_size.width, physical_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }
            WindowEvent::DroppedFile(path) => self.open_image(&path),
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            // The pointer leaving must always clear it, even over the panel.
            WindowEvent::CursorLeft { .. } => self.input.handle_event(&event),
            ref other if !consumed => self.input.handle_event(other),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, alpha: u8) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(8, 6, Rgba([200, 120, 40, alpha])).save(&path).unwrap();
        path
    }

    fn canonical(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap()
    }

    #[test]
    fn test_undecodable_file_keeps_current_points() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "not an image").unwrap();

        assert!(incoming_points(&notes, &SamplerConfig::default()).is_none());
        assert!(incoming_points(&dir.path().join("missing.png"), &SamplerConfig::default()).is_none());
    }

    #[test]
    fn test_transparent_image_replaces_with_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let clear = write_png(dir.path(), "clear.png", 0);
        let buffers = incoming_points(&clear, &SamplerConfig::default()).unwrap();
        assert!(buffers.is_empty());
    }

    #[test]
    fn test_dropping_a_bad_file_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let photo = write_png(dir.path(), "photo.png", 255);
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "not an image").unwrap();

        let mut app = App::new(Garden::new(), SavedState::default());
        app.open_image(&photo);
        let shown = app.pending.clone().unwrap();
        assert_eq!(shown.len(), 48);

        app.open_image(&notes);
        assert_eq!(app.pending.as_ref().map(|b| b.len()), Some(shown.len()));
        assert_eq!(app.state.last_image, Some(canonical(&photo)));

        let clear = write_png(dir.path(), "clear.png", 0);
        app.open_image(&clear);
        assert!(app.pending.as_ref().unwrap().is_empty());
        assert_eq!(app.state.last_image, Some(canonical(&clear)));
    }

    #[test]
    fn test_last_image_reopened_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("garden-particles.json");
        let photo = write_png(dir.path(), "photo.png", 255);

        let mut first = Garden::new().with_image(&photo).with_config_path(&config_path).into_app();
        assert!(first.pending.is_some());
        first.persist_state();

        let saved = SavedState::load(&config_path).unwrap();
        assert_eq!(saved.last_image, Some(canonical(&photo)));

        let second = Garden::new().with_config_path(&config_path).into_app();
        assert_eq!(second.pending.as_ref().map(|b| b.len()), Some(48));
        assert_eq!(second.state, saved);
    }

    #[test]
    fn test_missing_last_image_is_forgotten() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("garden-particles.json");
        let state = SavedState {
            last_image: Some(dir.path().join("gone.png")),
            ..Default::default()
        };
        state.save(&config_path).unwrap();

        let mut app = Garden::new().with_config_path(&config_path).into_app();
        assert!(app.pending.is_none());
        assert_eq!(app.state.last_image, None);

        app.persist_state();
        assert_eq!(SavedState::load(&config_path).unwrap().last_image, None);
    }

    #[test]
    fn test_config_edits_keep_last_image() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("garden-particles.json");
        let photo = write_png(dir.path(), "photo.png", 255);

        let mut app = Garden::new().with_image(&photo).with_config_path(&config_path).into_app();
        app.state.particle.nudge_size(2.0);
        app.persist_state();

        let saved = SavedState::load(&config_path).unwrap();
        assert_eq!(saved.particle.size, 4.5);
        assert_eq!(saved.last_image, Some(canonical(&photo)));
    }
}
