//! # Loader Module
//!
//! Turns a file path into pixel color samples.
//!
//! Decoding is behind the [`PixelLoader`] trait so the pipeline core
//! stays independent of any image format, and tests can substitute a
//! loader with known colors. The production [`ImageLoader`] uses
//! zune-jpeg for JPEG files (1.5-2x faster than the image crate) and
//! falls back to the image crate for everything else.

use crate::core::color::Rgb;
use crate::error::LoadError;
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Maps a file path to its pixel color samples.
///
/// Implement this to plug in a different decoder, or a stub for tests.
pub trait PixelLoader: Send + Sync {
    /// Load every pixel of the image at `path` as RGB samples in
    /// row-major order. A successful load returns at least one sample.
    fn load(&self, path: &Path) -> Result<Vec<Rgb>, LoadError>;
}

/// Production loader: zune-jpeg fast path for JPEGs, image crate
/// fallback for other formats.
pub struct ImageLoader;

impl ImageLoader {
    pub fn new() -> Self {
        Self
    }

    fn load_jpeg(path: &Path) -> Result<Vec<Rgb>, LoadError> {
        let file_bytes = fs::read(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let samples: Vec<Rgb> = pixels
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();

        if samples.is_empty() {
            return Err(LoadError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(samples)
    }

    fn load_fallback(path: &Path) -> Result<Vec<Rgb>, LoadError> {
        let image = image::open(path).map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let rgb = image.to_rgb8();
        let samples: Vec<Rgb> = rgb
            .pixels()
            .map(|px| Rgb::new(px.0[0], px.0[1], px.0[2]))
            .collect();

        if samples.is_empty() {
            return Err(LoadError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(samples)
    }

    fn is_jpeg(path: &Path) -> bool {
        matches!(
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .as_deref(),
            Some("jpg" | "jpeg")
        )
    }
}

impl PixelLoader for ImageLoader {
    fn load(&self, path: &Path) -> Result<Vec<Rgb>, LoadError> {
        if Self::is_jpeg(path) {
            // Fast path first; a zune failure still gets one shot at the
            // general-purpose decoder.
            Self::load_jpeg(path).or_else(|_| Self::load_fallback(path))
        } else {
            Self::load_fallback(path)
        }
    }
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb as ImageRgb};
    use tempfile::TempDir;

    fn write_solid_png(dir: &TempDir, name: &str, color: [u8; 3]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let img: ImageBuffer<ImageRgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(2, 2, ImageRgb(color));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn loads_all_pixels_of_a_png() {
        let dir = TempDir::new().unwrap();
        let path = write_solid_png(&dir, "blue.png", [0, 0, 255]);

        let samples = ImageLoader::new().load(&path).unwrap();

        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| *s == Rgb::new(0, 0, 255)));
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.png");
        std::fs::write(&path, b"not an image at all").unwrap();

        let result = ImageLoader::new().load(&path);
        assert!(matches!(result, Err(LoadError::Decode { .. })));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = ImageLoader::new().load(Path::new("/nonexistent/missing.png"));
        assert!(result.is_err());
    }

    #[test]
    fn corrupt_jpeg_falls_back_and_still_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.jpg");
        std::fs::write(&path, b"\xFF\xD8\xFF\xE0 truncated garbage").unwrap();

        let result = ImageLoader::new().load(&path);
        assert!(result.is_err());
    }
}
