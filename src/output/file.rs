use super::PresentationSurface;
use crate::codec::Codec;
use anyhow::{ensure, Result};
use image::RgbImage;
use std::path::PathBuf;

/// Writes the display-sized image to a file through a [`Codec`]
pub struct FileSurface<C: Codec> {
    path: PathBuf,
    codec: C,
}

impl<C: Codec> FileSurface<C> {
    pub fn new<P: Into<PathBuf>>(path: P, codec: C) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }
}

impl<C: Codec> PresentationSurface for FileSurface<C> {
    fn present(&mut self, image: &RgbImage, size: (u32, u32)) -> Result<()> {
        ensure!(
            image.dimensions() == size,
            "Preview is {}x{} but {}x{} was requested",
            image.width(),
            image.height(),
            size.0,
            size.1
        );

        self.codec.encode(image, &self.path)?;
        tracing::info!("Preview written to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImageCodec;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    fn test_writes_preview() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preview.png");
        let image = RgbImage::from_pixel(5, 3, Rgb([1, 2, 3]));

        let mut surface = FileSurface::new(&path, ImageCodec);
        surface.present(&image, (5, 3)).unwrap();

        assert_eq!(image::open(&path).unwrap().to_rgb8(), image);
    }

    #[test]
    fn test_rejects_wrong_size() {
        let dir = TempDir::new().unwrap();
        let mut surface = FileSurface::new(dir.path().join("preview.png"), ImageCodec);
        assert!(surface.present(&RgbImage::new(5, 3), (3, 5)).is_err());
    }
}
