mod mask_file;
mod onnx;
mod preprocess;
pub mod types;

pub use mask_file::{MaskEncoding, MaskFileClassifier};
pub use onnx::OnnxSegmenter;
pub use preprocess::Preprocessor;
pub use types::Classifier;

use anyhow::Result;
use std::path::Path;

/// Create the default classifier (ONNX segmenter)
pub fn create_default_model<P: AsRef<Path>>(
    model_path: P,
    input_size: (u32, u32),
) -> Result<Box<dyn Classifier>> {
    let model = OnnxSegmenter::new(model_path, input_size)?;
    Ok(Box::new(model))
}
