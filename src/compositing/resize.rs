use super::types::Image;
use crate::error::{CompositeError, Result};
use image::{imageops, GenericImageView, Pixel};

/// Largest presentation size, as (max_width, max_height)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl DisplayBounds {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(CompositeError::invalid_parameter(format!(
                "display bounds must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

/// Aspect-preserving display size for `image`, returned as (width, height)
pub fn fit_to_bounds<I: GenericImageView>(image: &I, bounds: DisplayBounds) -> Result<(u32, u32)> {
    let (width, height) = image.dimensions();
    fit_dimensions(width, height, bounds)
}

/// Aspect-preserving display size for a `width` x `height` frame
///
/// Landscape frames (`height < width`) take the full `max_width` and scale
/// the height; everything else, squares included, takes the full
/// `max_height` and scales the width. Scaled sides are floored in exact
/// integer arithmetic and never drop below one pixel.
pub fn fit_dimensions(width: u32, height: u32, bounds: DisplayBounds) -> Result<(u32, u32)> {
    if width == 0 || height == 0 {
        return Err(CompositeError::invalid_input(format!(
            "cannot fit a {width}x{height} image for display"
        )));
    }
    bounds.validate()?;

    let (w, h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (u64::from(bounds.max_width), u64::from(bounds.max_height));

    let (target_w, target_h) = if h < w {
        (max_w, h * max_w / w)
    } else {
        (w * max_h / h, max_h)
    };

    // Both sides are bounded by the u32 limits they were scaled from
    let narrow = |side: u64| u32::try_from(side).unwrap_or(u32::MAX).max(1);
    Ok((narrow(target_w), narrow(target_h)))
}

/// Resample `image` to its display size
pub fn resize_for_display<P>(image: &Image<P>, bounds: DisplayBounds) -> Result<Image<P>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let _span = tracing::debug_span!("resize_for_display").entered();

    let (width, height) = fit_to_bounds(image, bounds)?;
    tracing::debug!(
        "Display size {}x{} -> {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );

    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    Ok(imageops::resize(
        image,
        width,
        height,
        imageops::FilterType::Lanczos3,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const BOUNDS: DisplayBounds = DisplayBounds {
        max_width: 480,
        max_height: 480,
    };

    #[test]
    fn test_landscape() {
        assert_eq!(fit_dimensions(1000, 500, BOUNDS).unwrap(), (480, 240));
        assert_eq!(fit_dimensions(1920, 1080, BOUNDS).unwrap(), (480, 270));
        assert_eq!(fit_dimensions(641, 480, BOUNDS).unwrap(), (480, 359));
    }

    #[test]
    fn test_portrait_and_square() {
        assert_eq!(fit_dimensions(500, 1000, BOUNDS).unwrap(), (240, 480));
        assert_eq!(fit_dimensions(1080, 1920, BOUNDS).unwrap(), (270, 480));
        assert_eq!(fit_dimensions(100, 100, BOUNDS).unwrap(), (480, 480));
        assert_eq!(
            fit_dimensions(300, 300, DisplayBounds::new(640, 200)).unwrap(),
            (200, 200)
        );
    }

    #[test]
    fn test_landscape_ignores_max_height() {
        assert_eq!(
            fit_dimensions(1000, 500, DisplayBounds::new(480, 100)).unwrap(),
            (480, 240)
        );
    }

    #[test]
    fn test_idempotent() {
        for (w, h) in [(1000, 500), (500, 1000), (1920, 1080), (333, 777), (7, 7), (4000, 3)] {
            for bounds in [BOUNDS, DisplayBounds::new(640, 360), DisplayBounds::new(100, 900)] {
                let once = fit_dimensions(w, h, bounds).unwrap();
                let twice = fit_dimensions(once.0, once.1, bounds).unwrap();
                assert_eq!(once, twice, "{w}x{h} into {bounds:?}");
            }
        }
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_dimensions(4000, 3, BOUNDS).unwrap(), (480, 1));
        assert_eq!(fit_dimensions(1, 5000, BOUNDS).unwrap(), (1, 480));
    }

    #[test]
    fn test_degenerate_input() {
        for (w, h) in [(0, 10), (10, 0), (0, 0)] {
            assert!(matches!(
                fit_dimensions(w, h, BOUNDS),
                Err(CompositeError::InvalidInput(_))
            ));
        }
        assert!(matches!(
            fit_dimensions(10, 10, DisplayBounds::new(0, 480)),
            Err(CompositeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_resize_for_display() {
        let image = RgbImage::from_pixel(100, 50, Rgb([10, 200, 30]));
        let display = resize_for_display(&image, DisplayBounds::new(40, 40)).unwrap();
        assert_eq!(display.dimensions(), (40, 20));

        let same = resize_for_display(&display, DisplayBounds::new(40, 40)).unwrap();
        assert_eq!(same, display);

        assert!(resize_for_display(&RgbImage::new(0, 3), BOUNDS).is_err());
    }
}
