use super::preprocess::Preprocessor;
use super::types::Classifier;
use crate::compositing::ClassificationMask;
use anyhow::{Context, Result};
use image::RgbImage;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use std::path::Path;

/// Single-image segmentation model run through ONNX Runtime
///
/// Works with binary matting models (one score channel) and multi-class
/// segmenters (one logit channel per category, reduced by argmax).
pub struct OnnxSegmenter {
    session: Session,
    preprocessor: Preprocessor,
    width: u32,
    height: u32,
}

impl OnnxSegmenter {
    /// Load a segmentation model from an ONNX file
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `input_size` - (width, height) the model expects; frames are resized to it
    pub fn new<P: AsRef<Path>>(model_path: P, input_size: (u32, u32)) -> Result<Self> {
        let path = model_path.as_ref();
        let (width, height) = input_size;

        tracing::info!("Loading segmentation model from {}", path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        tracing::info!("Segmentation model loaded, input size {}x{}", width, height);

        Ok(Self {
            session,
            preprocessor: Preprocessor::new(width, height),
            width,
            height,
        })
    }
}

impl Classifier for OnnxSegmenter {
    fn classify(&mut self, image: &RgbImage) -> Result<ClassificationMask> {
        let _span = tracing::debug_span!("onnx_classify").entered();

        let input_tensor = self.preprocessor.preprocess(image);
        let input = Value::from_array(input_tensor).context("Failed to build input tensor")?;

        let _infer_span = tracing::debug_span!("inference").entered();
        let outputs = self
            .session
            .run(ort::inputs![input])
            .context("Failed to run inference")?;
        drop(_infer_span);

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract segmentation output")?;
        tracing::debug!("Segmentation output shape {:?}", output.shape());

        let scores = Preprocessor::decode_scores(&output)?;

        let (frame_width, frame_height) = image.dimensions();
        Ok(Preprocessor::postprocess_mask(
            &scores,
            frame_width,
            frame_height,
        ))
    }

    fn input_size(&self) -> Option<(u32, u32)> {
        Some((self.width, self.height))
    }
}
