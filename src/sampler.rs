//! Image to point-cloud sampling.
//!
//! The sampler shrinks a bitmap to at most [`SamplerConfig::max_width`]
//! pixels across, then emits one point per pixel that is opaque enough.
//! Points are centred on the origin, flipped so +y is up, and pushed toward
//! the viewer by their brightness.
//!
//! ```ignore
//! let image = memory_garden::loader::load_image("portrait.jpg")?;
//! let points = sample_image(&image, &SamplerConfig::default());
//! println!("{} points", points.len());
//! ```

use std::borrow::Cow;

use glam::{Vec2, Vec3};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use rand::Rng;

use crate::point_set::{PointRecord, PointSet};

/// Tunables for image sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Maximum working width in pixels; wider images are downscaled.
    pub max_width: u32,
    /// Pixels with alpha below this (in `[0, 1]`) produce no point.
    pub alpha_threshold: f32,
    /// World units spanned by the working width.
    pub world_width: f32,
    /// World-space z of a fully white pixel.
    pub depth_scale: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_width: 300,
            alpha_threshold: 0.1,
            world_width: 12.0,
            depth_scale: 1.5,
        }
    }
}

impl SamplerConfig {
    /// Override the maximum working width.
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }
}

/// Working-buffer size for a source of `width` x `height`.
///
/// Aspect ratio is preserved; height never drops below one row. Returns
/// `None` when either source dimension or `max_width` is zero.
pub fn working_size(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || max_width == 0 {
        return None;
    }
    let w = max_width.min(width);
    let h = (w as u64 * height as u64 / width as u64).max(1);
    Some((w, h.min(u32::MAX as u64) as u32))
}

/// Sample a decoded image with a thread-local random source.
pub fn sample_image(image: &DynamicImage, config: &SamplerConfig) -> PointSet {
    sample_rgba(&image.to_rgba8(), config, &mut rand::thread_rng())
}

/// Sample an RGBA bitmap, drawing per-point seeds from `rng`.
///
/// Everything except the seeds is a pure function of the bitmap and
/// config. A zero-sized bitmap yields an empty set.
pub fn sample_rgba<R: Rng + ?Sized>(image: &RgbaImage, config: &SamplerConfig, rng: &mut R) -> PointSet {
    let (src_w, src_h) = image.dimensions();
    let Some((w, h)) = working_size(src_w, src_h, config.max_width) else {
        return PointSet::default();
    };

    let working: Cow<'_, RgbaImage> = if (w, h) == (src_w, src_h) {
        Cow::Borrowed(image)
    } else {
        Cow::Owned(imageops::resize(image, w, h, FilterType::Triangle))
    };

    let world_scale = config.world_width / w as f32;
    let center = Vec2::new(w as f32 / 2.0, h as f32 / 2.0);
    let max_dist = center.length();

    let mut points = PointSet::with_capacity((w as usize) * (h as usize));

    // enumerate_pixels walks rows top to bottom, left to right
    for (x, y, pixel) in working.enumerate_pixels() {
        let [r, g, b, a] = pixel.0.map(|c| c as f32 / 255.0);
        if a < config.alpha_threshold {
            continue;
        }

        let offset = Vec2::new(x as f32, y as f32) - center;
        let brightness = (r + g + b) / 3.0;
        let position = Vec3::new(
            offset.x * world_scale,
            -offset.y * world_scale,
            brightness * config.depth_scale,
        );
        let edge_factor = (offset.length() / max_dist).min(1.0);

        points.push(PointRecord::new(
            position,
            Vec3::new(r, g, b),
            rng.gen::<f32>(),
            edge_factor,
        ));
    }

    points
}
