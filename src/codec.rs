use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;

/// Trait for image file decoding and encoding
pub trait Codec {
    /// Decode a file into RGB channel order, whatever its stored layout
    fn decode(&self, path: &Path) -> Result<RgbImage>;

    /// Encode an image, choosing the format from the file extension
    fn encode(&self, image: &RgbImage, path: &Path) -> Result<()>;
}

/// [`Codec`] backed by the `image` crate's format detection
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, path: &Path) -> Result<RgbImage> {
        let _span = tracing::debug_span!("decode").entered();

        let decoded = image::open(path)
            .with_context(|| format!("Failed to decode image {}", path.display()))?;
        tracing::debug!(
            "Decoded {} ({}x{}, {:?})",
            path.display(),
            decoded.width(),
            decoded.height(),
            decoded.color()
        );

        Ok(decoded.to_rgb8())
    }

    fn encode(&self, image: &RgbImage, path: &Path) -> Result<()> {
        let _span = tracing::debug_span!("encode").entered();

        image
            .save(path)
            .with_context(|| format!("Failed to encode image to {}", path.display()))?;
        tracing::debug!("Encoded {}x{} to {}", image.width(), image.height(), path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};
    use tempfile::TempDir;

    #[test]
    fn test_png_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.png");
        let image = RgbImage::from_fn(6, 4, |x, y| Rgb([(x * 40) as u8, (y * 60) as u8, 9]));

        ImageCodec.encode(&image, &path).unwrap();
        assert_eq!(ImageCodec.decode(&path).unwrap(), image);
    }

    #[test]
    fn test_grayscale_decodes_to_rgb() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(3, 2, Luma([77])).save(&path).unwrap();

        let decoded = ImageCodec.decode(&path).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert!(decoded.pixels().all(|p| p.0 == [77, 77, 77]));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ImageCodec.decode(&dir.path().join("missing.png")).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn test_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let image = RgbImage::new(2, 2);
        assert!(ImageCodec.encode(&image, &dir.path().join("frame.nope")).is_err());
    }
}
