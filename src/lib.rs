//! Mask-driven still image effects
//!
//! A classifier labels every pixel of an image, the labels are thresholded
//! into a selection, and the selection drives one of three composites:
//! tinting the selected region, blurring everything outside it, or
//! rendering the selection as a two-color matte. The result is resized for
//! display and handed to a presentation surface.

pub mod capture;
pub mod codec;
pub mod compositing;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod segmentation;

pub use compositing::{
    background_effect, fit_to_bounds, normalize, recolor, BlendParameters, ClassificationMask,
    DisplayBounds, SelectionMask,
};
pub use config::{CompositeMode, PipelineConfig};
pub use error::{CompositeError, Result};
pub use pipeline::{process, run_pipeline, PipelineOutput};
