//! Live particle configuration and its persistence.
//!
//! [`ParticleConfig`] is the user-tunable state edited by the control panel.
//! It is saved together with the last image shown as a [`SavedState`],
//! loaded once at startup and written back whenever either changes. The
//! on-disk format is camelCase JSON:
//!
//! ```json
//! { "size": 3.5, "speed": 0.8, "dispersion": 0.6, "noiseStrength": 1.0, "colorHex": "#ffffff",
//!   "lastImage": "/home/me/portrait.png" }
//! ```

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Range of the particle size control.
pub const SIZE_RANGE: RangeInclusive<f32> = 1.0..=15.0;
/// Range of the flow speed control.
pub const SPEED_RANGE: RangeInclusive<f32> = 0.0..=3.0;
/// Range of the dispersion control.
pub const DISPERSION_RANGE: RangeInclusive<f32> = 0.0..=2.0;
/// Range of the chaos (noise strength) control.
pub const NOISE_RANGE: RangeInclusive<f32> = 0.0..=5.0;
/// Increment used by keyboard size adjustments.
pub const SIZE_STEP: f32 = 0.5;

/// User-tunable particle appearance.
///
/// Shared read-mostly by the frame loop: a snapshot is handed to the
/// uniform driver every frame, and edits never rebuild the point set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticleConfig {
    /// Base point size in pixels, before perspective and edge scaling.
    pub size: f32,
    /// Flow speed multiplier.
    pub speed: f32,
    /// How spread out the particles are.
    pub dispersion: f32,
    /// Chaos factor.
    pub noise_strength: f32,
    /// Tint colour as `#rrggbb` or `#rgb`.
    pub color_hex: String,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            size: 3.5,
            speed: 0.8,
            dispersion: 0.6,
            noise_strength: 1.0,
            color_hex: "#ffffff".to_string(),
        }
    }
}

/// State remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    #[serde(flatten)]
    pub particle: ParticleConfig,
    /// Image to reopen when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_image: Option<PathBuf>,
}

impl SavedState {
    /// Read saved state from a JSON file.
    ///
    /// Particle values outside the control ranges are clamped.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut state: SavedState = serde_json::from_str(&text)?;
        state.particle = state.particle.clamped();
        Ok(state)
    }

    /// Read saved state, falling back to defaults on any failure.
    ///
    /// A missing file is expected on first run and is not reported.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("Ignoring saved state: {e}");
                Self::default()
            }
        }
    }

    /// Write the state as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ParticleConfig {
    /// Copy with every numeric field clamped to its control range.
    pub fn clamped(mut self) -> Self {
        self.size = clamp_to(self.size, &SIZE_RANGE);
        self.speed = clamp_to(self.speed, &SPEED_RANGE);
        self.dispersion = clamp_to(self.dispersion, &DISPERSION_RANGE);
        self.noise_strength = clamp_to(self.noise_strength, &NOISE_RANGE);
        self
    }

    /// Step the particle size by `steps` increments, staying in range.
    pub fn nudge_size(&mut self, steps: f32) {
        self.size = clamp_to(self.size + steps * SIZE_STEP, &SIZE_RANGE);
    }

    /// Tint as linear multipliers, white when the hex string is invalid.
    pub fn tint(&self) -> Vec3 {
        parse_hex_color(&self.color_hex).unwrap_or(Vec3::ONE)
    }
}

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

/// Parse `#rrggbb` or `#rgb` into channel values in `[0, 1]`.
pub fn parse_hex_color(hex: &str) -> Option<Vec3> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let [r, g, b] = match digits.len() {
        6 => [
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ],
        3 => {
            // #abc expands to #aabbcc
            let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            [short(0)?, short(1)?, short(2)?]
        }
        _ => return None,
    };
    Some(Vec3::new(r as f32, g as f32, b as f32) / 255.0)
}

/// Format 8-bit channels as `#rrggbb`.
pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}
