use crate::error::{CompositeError, Result};
use image::ImageBuffer;
use ndarray::Array2;

/// An 8-bit image of any channel layout (RGB, BGR, RGBA, Luma...)
pub type Image<P> = ImageBuffer<P, Vec<u8>>;

/// Per-pixel classifier output: confidence scores or category ids
///
/// Stored as `(row, column)`, i.e. `[[y, x]]`, matching the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationMask {
    scores: Array2<f32>,
}

impl ClassificationMask {
    pub fn new(scores: Array2<f32>) -> Self {
        Self { scores }
    }

    /// Build a mask from integer category ids (0 = background)
    pub fn from_categories(categories: &Array2<u8>) -> Self {
        Self::new(categories.mapv(f32::from))
    }

    /// Build a mask from values flattened in row-major order
    pub fn from_vec(width: u32, height: u32, values: Vec<f32>) -> Result<Self> {
        let len = values.len();
        Array2::from_shape_vec((height as usize, width as usize), values)
            .map(Self::new)
            .map_err(|e| {
                CompositeError::invalid_input(format!(
                    "cannot shape {len} mask values into {width}x{height}: {e}"
                ))
            })
    }

    /// Returns (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        let (rows, cols) = self.scores.dim();
        (cols as u32, rows as u32)
    }

    pub fn scores(&self) -> &Array2<f32> {
        &self.scores
    }
}

/// Boolean "selected" flag per pixel, derived from a [`ClassificationMask`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMask {
    selected: Array2<bool>,
}

impl SelectionMask {
    pub fn new(selected: Array2<bool>) -> Self {
        Self { selected }
    }

    /// A mask of the given size with every pixel set to `value`
    pub fn all(width: u32, height: u32, value: bool) -> Self {
        Self::new(Array2::from_elem((height as usize, width as usize), value))
    }

    /// Returns (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        let (rows, cols) = self.selected.dim();
        (cols as u32, rows as u32)
    }

    /// Out-of-range coordinates read as unselected
    pub fn is_selected(&self, x: u32, y: u32) -> bool {
        self.selected
            .get((y as usize, x as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    pub fn as_array(&self) -> &Array2<bool> {
        &self.selected
    }
}

/// Weights for `alpha * image + beta * tint`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendParameters {
    pub alpha: f32,
    pub beta: f32,
}

impl BlendParameters {
    /// Complementary weights: `beta = 1 - alpha`
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            beta: 1.0 - alpha,
        }
    }

    /// Override the complementary `beta`
    pub fn with_beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CompositeError::invalid_parameter(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Blend one channel, rounding half to even and saturating to 8 bits
    pub fn mix(&self, source: u8, tint: u8) -> u8 {
        let value = self.alpha * f32::from(source) + self.beta * f32::from(tint);
        value.round_ties_even().clamp(0.0, 255.0) as u8
    }
}
