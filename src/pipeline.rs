//! One-shot pipeline: classify, threshold, composite, resize, present

use crate::capture::CaptureSource;
use crate::compositing::{
    background_effect, matte, normalize, recolor, resize_for_display, SelectionMask,
};
use crate::config::{CompositeMode, PipelineConfig};
use crate::error::{CompositeError, Result as CompositeResult};
use crate::output::PresentationSurface;
use crate::segmentation::Classifier;
use anyhow::{Context, Result};
use image::RgbImage;
use std::time::Instant;

/// Images produced by one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Full-resolution composite
    pub composite: RgbImage,
    /// Composite resampled to the display bounds
    pub display: RgbImage,
    pub selected_pixels: usize,
}

/// Apply `mode` to an image and an already-thresholded selection
pub fn composite(
    image: &RgbImage,
    selection: &SelectionMask,
    mode: &CompositeMode,
) -> CompositeResult<RgbImage> {
    match *mode {
        CompositeMode::Recolor { tint, blend } => recolor(image, selection, tint, blend),
        CompositeMode::BackgroundEffect { kernel_size } => {
            background_effect(image, selection, kernel_size)
        }
        CompositeMode::Matte {
            foreground,
            background,
        } => {
            CompositeError::check_shape(image.dimensions(), selection.dimensions())?;
            Ok(matte(selection, foreground, background))
        }
    }
}

/// Classify `image` and composite it according to `config`
pub fn process<C>(image: &RgbImage, classifier: &mut C, config: &PipelineConfig) -> Result<PipelineOutput>
where
    C: Classifier + ?Sized,
{
    config.validate()?;

    let classify_start = Instant::now();
    let mask = {
        let _span = tracing::debug_span!("classify").entered();
        classifier
            .classify(image)
            .context("Failed to classify image")?
    };
    tracing::debug!(
        "Classification took {:.1}ms",
        classify_start.elapsed().as_secs_f64() * 1000.0
    );

    CompositeError::check_shape(image.dimensions(), mask.dimensions())?;

    let selection = normalize(&mask, config.threshold);
    let selected_pixels = selection.selected_count();
    tracing::info!(
        "Selected {} of {} pixels (threshold {})",
        selected_pixels,
        selection.as_array().len(),
        config.threshold
    );

    let composite_start = Instant::now();
    let composited = {
        let _span = tracing::debug_span!("composite", mode = config.mode.name()).entered();
        composite(image, &selection, &config.mode)?
    };
    tracing::debug!(
        "Compositing took {:.1}ms",
        composite_start.elapsed().as_secs_f64() * 1000.0
    );

    let display = resize_for_display(&composited, config.bounds)?;

    Ok(PipelineOutput {
        composite: composited,
        display,
        selected_pixels,
    })
}

/// Capture one frame, process it and hand the display image to every surface
pub fn run_pipeline<S>(
    source: &mut S,
    classifier: &mut dyn Classifier,
    surfaces: &mut [Box<dyn PresentationSurface>],
    config: &PipelineConfig,
) -> Result<PipelineOutput>
where
    S: CaptureSource + ?Sized,
{
    tracing::info!("Reading frame from {}", source.describe());
    let frame = source
        .capture_frame()
        .context("Failed to capture frame")?;
    tracing::info!("Frame: {}x{}", frame.width(), frame.height());

    let output = process(&frame, classifier, config)?;

    let size = output.display.dimensions();
    for surface in surfaces.iter_mut() {
        let _span = tracing::debug_span!("present").entered();
        surface
            .present(&output.display, size)
            .context("Failed to present image")?;
    }

    Ok(output)
}
