use super::types::Image;
use crate::error::{CompositeError, Result};
use image::imageops::{self, GaussianBlurParameters};
use image::Pixel;

/// Validated Gaussian blur settings for the background effect
///
/// Wraps [`GaussianBlurParameters`] so that an even or zero width is reported
/// as [`CompositeError::InvalidParameter`] instead of panicking inside `image`.
#[derive(Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    size: u32,
    params: GaussianBlurParameters,
}

impl GaussianKernel {
    /// Kernel of odd width `size`, with sigma derived from the width as
    /// `0.3 * ((size - 1) / 2 - 1) + 0.8`
    pub fn new(size: u32) -> Result<Self> {
        Self::validate_size(size)?;
        Ok(Self {
            size,
            params: GaussianBlurParameters::new_from_kernel_size(size as f32),
        })
    }

    /// Kernel with an explicit standard deviation; `image` picks the width
    /// from sigma, `size` is only validated and reported
    pub fn with_sigma(size: u32, sigma: f32) -> Result<Self> {
        Self::validate_size(size)?;
        if !sigma.is_normal() || sigma <= 0.0 {
            return Err(CompositeError::invalid_parameter(format!(
                "blur sigma must be a positive finite number, got {sigma}"
            )));
        }
        Ok(Self {
            size,
            params: GaussianBlurParameters::new_from_sigma(sigma),
        })
    }

    fn validate_size(size: u32) -> Result<()> {
        if size == 0 || size % 2 == 0 {
            return Err(CompositeError::invalid_parameter(format!(
                "blur kernel width must be a positive odd integer, got {size}"
            )));
        }
        Ok(())
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn params(&self) -> GaussianBlurParameters {
        self.params
    }
}

impl std::fmt::Debug for GaussianKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaussianKernel").field("size", &self.size).finish()
    }
}

/// Gaussian blur with clamped (replicated) borders, per channel
pub fn gaussian_blur<P>(image: &Image<P>, kernel: &GaussianKernel) -> Image<P>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let _span = tracing::debug_span!("gaussian_blur", size = kernel.size()).entered();

    if image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    imageops::blur_advanced(image, kernel.params())
}
