//! Pipeline configuration
//!
//! The compositing functions take every parameter explicitly; the defaults
//! below are only used to build a [`PipelineConfig`] for the CLI.

use crate::compositing::{BlendParameters, DisplayBounds, GaussianKernel};
use crate::error::Result;
use image::Rgb;

pub const DEFAULT_DISPLAY_BOUNDS: DisplayBounds = DisplayBounds {
    max_width: 480,
    max_height: 480,
};
pub const DEFAULT_TINT: Rgb<u8> = Rgb([255, 0, 0]);
pub const DEFAULT_ALPHA: f32 = 0.8;
pub const DEFAULT_BLUR_KERNEL: u32 = 55;
pub const DEFAULT_MATTE_FOREGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const DEFAULT_MATTE_BACKGROUND: Rgb<u8> = Rgb([192, 192, 192]);

/// Compositing policy applied after classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompositeMode {
    /// Blend selected pixels with a flat tint, unselected ones with black
    Recolor {
        tint: Rgb<u8>,
        blend: BlendParameters,
    },
    /// Keep selected pixels, replace the rest with a Gaussian blur
    BackgroundEffect { kernel_size: u32 },
    /// Two-color rendering of the selection
    Matte {
        foreground: Rgb<u8>,
        background: Rgb<u8>,
    },
}

impl CompositeMode {
    pub fn recolor() -> Self {
        Self::Recolor {
            tint: DEFAULT_TINT,
            blend: BlendParameters::new(DEFAULT_ALPHA),
        }
    }

    pub fn background_effect() -> Self {
        Self::BackgroundEffect {
            kernel_size: DEFAULT_BLUR_KERNEL,
        }
    }

    pub fn matte() -> Self {
        Self::Matte {
            foreground: DEFAULT_MATTE_FOREGROUND,
            background: DEFAULT_MATTE_BACKGROUND,
        }
    }

    /// Threshold the mode is tuned for: category ids above 0 for recolor,
    /// confidence above 0.1 for the background effect and above 0.2 for matte
    pub fn default_threshold(&self) -> f32 {
        match self {
            Self::Recolor { .. } => 0.0,
            Self::BackgroundEffect { .. } => 0.1,
            Self::Matte { .. } => 0.2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Recolor { .. } => "recolor",
            Self::BackgroundEffect { .. } => "background-effect",
            Self::Matte { .. } => "matte",
        }
    }
}

/// Everything one compositing run needs besides the image and classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub mode: CompositeMode,
    pub threshold: f32,
    pub bounds: DisplayBounds,
}

impl PipelineConfig {
    /// Config for `mode` with its default threshold and display bounds
    pub fn new(mode: CompositeMode) -> Self {
        Self {
            threshold: mode.default_threshold(),
            mode,
            bounds: DEFAULT_DISPLAY_BOUNDS,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_bounds(mut self, bounds: DisplayBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Check parameters up front, before any model is loaded
    pub fn validate(&self) -> Result<()> {
        self.bounds.validate()?;
        match self.mode {
            CompositeMode::Recolor { blend, .. } => blend.validate(),
            CompositeMode::BackgroundEffect { kernel_size } => {
                GaussianKernel::new(kernel_size).map(|_| ())
            }
            CompositeMode::Matte { .. } => Ok(()),
        }
    }
}
