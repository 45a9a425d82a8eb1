use super::blur::{gaussian_blur, GaussianKernel};
use super::types::{Image, SelectionMask};
use crate::error::{CompositeError, Result};
use image::Pixel;

/// Keep selected pixels and replace everything else with a blurred copy
///
/// `kernel_size` is the odd width of the Gaussian used for the blur. The
/// shape is checked before the width.
pub fn background_effect<P>(
    image: &Image<P>,
    selection: &SelectionMask,
    kernel_size: u32,
) -> Result<Image<P>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    CompositeError::check_shape(image.dimensions(), selection.dimensions())?;
    let kernel = GaussianKernel::new(kernel_size)?;
    Ok(select_over_blur(image, selection, &kernel))
}

/// [`background_effect`] with a caller-built kernel
pub fn background_effect_with<P>(
    image: &Image<P>,
    selection: &SelectionMask,
    kernel: &GaussianKernel,
) -> Result<Image<P>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    CompositeError::check_shape(image.dimensions(), selection.dimensions())?;
    Ok(select_over_blur(image, selection, kernel))
}

// Callers have already matched the selection to the image
fn select_over_blur<P>(
    image: &Image<P>,
    selection: &SelectionMask,
    kernel: &GaussianKernel,
) -> Image<P>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let _span = tracing::debug_span!("background_effect", size = kernel.size()).entered();

    let mut output = gaussian_blur(image, kernel);
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        if selection.is_selected(x, y) {
            *pixel = *image.get_pixel(x, y);
        }
    }
    output
}
