use super::types::Classifier;
use crate::compositing::ClassificationMask;
use anyhow::{ensure, Context, Result};
use image::RgbImage;
use std::path::PathBuf;

/// How the 8-bit values of a saved mask image are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskEncoding {
    /// Raw category ids (0 = background, 1 = first class, ...)
    Categories,
    /// Confidence scaled from [0, 255] to [0, 1]
    Confidence,
}

/// Classifier that reads a precomputed mask from a grayscale image file
pub struct MaskFileClassifier {
    path: PathBuf,
    encoding: MaskEncoding,
}

impl MaskFileClassifier {
    pub fn new<P: Into<PathBuf>>(path: P, encoding: MaskEncoding) -> Self {
        Self {
            path: path.into(),
            encoding,
        }
    }
}

impl Classifier for MaskFileClassifier {
    fn classify(&mut self, image: &RgbImage) -> Result<ClassificationMask> {
        let _span = tracing::debug_span!("mask_file_classify").entered();

        let mask = image::open(&self.path)
            .with_context(|| format!("Failed to read mask {}", self.path.display()))?
            .to_luma8();

        ensure!(
            mask.dimensions() == image.dimensions(),
            "Mask {} is {}x{} but the image is {}x{}",
            self.path.display(),
            mask.width(),
            mask.height(),
            image.width(),
            image.height()
        );

        let divisor = match self.encoding {
            MaskEncoding::Categories => 1.0,
            MaskEncoding::Confidence => 255.0,
        };
        let (width, height) = mask.dimensions();
        let values = mask.pixels().map(|p| f32::from(p[0]) / divisor).collect();

        Ok(ClassificationMask::from_vec(width, height, values)?)
    }
}
