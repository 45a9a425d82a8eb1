use crate::compositing::ClassificationMask;
use anyhow::Result;
use image::RgbImage;

/// Trait for per-pixel classifiers
/// Allows swapping between backends (ONNX models, precomputed masks, test stubs)
pub trait Classifier {
    /// Classify every pixel of an image
    ///
    /// # Arguments
    /// * `image` - Input RGB image
    ///
    /// # Returns
    /// * Scores or category ids with the same width and height as `image`
    fn classify(&mut self, image: &RgbImage) -> Result<ClassificationMask>;

    /// Get the model's preferred input dimensions, if it has any
    ///
    /// Returns (width, height)
    fn input_size(&self) -> Option<(u32, u32)> {
        None
    }
}
