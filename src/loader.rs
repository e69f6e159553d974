//! Source image loading.
//!
//! Reads a file and decodes it into a bitmap for the sampler. PNG (with
//! alpha, for silhouette cut-outs) and JPEG are supported.

use std::path::Path;

use image::DynamicImage;

use crate::error::ImageLoadError;

/// Read and decode an image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage, ImageLoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ImageLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image(&bytes)
}

/// Decode an in-memory encoded image, guessing the format from its header.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ImageLoadError> {
    Ok(image::load_from_memory(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();

        let decoded = decode_image(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode_image(b"not an image").unwrap_err();
        assert!(matches!(err, ImageLoadError::Decode(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_image("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ImageLoadError::Io { .. }));
    }
}
