use super::types::{BlendParameters, Image, SelectionMask};
use crate::error::{CompositeError, Result};
use image::Pixel;

/// Tint the selected pixels with a flat color
///
/// Computes `alpha * image + beta * field`, where the field is `tint` on
/// selected pixels and black everywhere else. Unselected pixels are therefore
/// darkened by `alpha` rather than left as they were.
pub fn recolor<P>(
    image: &Image<P>,
    selection: &SelectionMask,
    tint: P,
    blend: BlendParameters,
) -> Result<Image<P>>
where
    P: Pixel<Subpixel = u8>,
{
    let _span = tracing::debug_span!("recolor", alpha = blend.alpha, beta = blend.beta).entered();

    CompositeError::check_shape(image.dimensions(), selection.dimensions())?;
    blend.validate()?;

    let black = tint.map(|_| 0);
    let mut output = image.clone();
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let field = if selection.is_selected(x, y) { tint } else { black };
        *pixel = pixel.map2(&field, |source, overlay| blend.mix(source, overlay));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 40) as u8, (y * 60) as u8, ((x + y) * 25) as u8])
        })
    }

    #[test]
    fn test_identity_blend_ignores_selection() {
        let image = gradient(4, 3);
        let red = Rgb([255, 0, 0]);
        let identity = BlendParameters::new(1.0);
        assert_eq!(identity.beta, 0.0);

        for value in [true, false] {
            let selection = SelectionMask::all(4, 3, value);
            assert_eq!(recolor(&image, &selection, red, identity).unwrap(), image);
        }
    }

    #[test]
    fn test_all_selected_tint() {
        let values = [0u8, 100, 200, 255];
        let image = RgbImage::from_fn(3, 3, |x, y| {
            let v = values[((x + y) % 4) as usize];
            Rgb([v, v, v])
        });
        let selection = SelectionMask::all(3, 3, true);

        let output = recolor(&image, &selection, Rgb([255, 0, 0]), BlendParameters::new(0.8)).unwrap();

        for (x, y, pixel) in output.enumerate_pixels() {
            let expected = match image.get_pixel(x, y)[0] {
                0 => [51, 0, 0],
                100 => [131, 80, 80],
                200 => [211, 160, 160],
                _ => [255, 204, 204],
            };
            assert_eq!(pixel.0, expected, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_unselected_blends_with_black() {
        let image = RgbImage::from_pixel(2, 2, Rgb([100, 200, 50]));
        let selection = SelectionMask::all(2, 2, false);
        let output = recolor(&image, &selection, Rgb([255, 0, 0]), BlendParameters::new(0.5)).unwrap();
        assert!(output.pixels().all(|p| p.0 == [50, 100, 25]));
    }

    #[test]
    fn test_halves_round_to_even() {
        let image = RgbImage::from_pixel(1, 1, Rgb([101, 103, 1]));
        let selection = SelectionMask::all(1, 1, false);
        let output = recolor(&image, &selection, Rgb([255, 0, 0]), BlendParameters::new(0.5)).unwrap();
        // 50.5 -> 50, 51.5 -> 52, 0.5 -> 0
        assert_eq!(output.get_pixel(0, 0).0, [50, 52, 0]);
    }

    #[test]
    fn test_mixed_selection() {
        let image = RgbImage::from_pixel(2, 1, Rgb([100, 100, 100]));
        let selection = SelectionMask::new(ndarray::array![[true, false]]);
        let output = recolor(&image, &selection, Rgb([0, 0, 200]), BlendParameters::new(0.5)).unwrap();
        assert_eq!(output.get_pixel(0, 0).0, [50, 50, 150]);
        assert_eq!(output.get_pixel(1, 0).0, [50, 50, 50]);
    }

    #[test]
    fn test_saturates_at_white() {
        let image = RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]));
        let selection = SelectionMask::all(1, 1, true);
        let blend = BlendParameters::new(1.0).with_beta(1.0);
        let output = recolor(&image, &selection, Rgb([255, 255, 255]), blend).unwrap();
        assert_eq!(output.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_four_channel_images() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let selection = SelectionMask::all(2, 2, true);
        let output = recolor(&image, &selection, Rgba([0, 0, 0, 255]), BlendParameters::new(0.0)).unwrap();
        assert!(output.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_shape_mismatch() {
        let image = gradient(10, 10);
        let selection = SelectionMask::all(10, 9, true);
        let err = recolor(&image, &selection, Rgb([255, 0, 0]), BlendParameters::new(0.8)).unwrap_err();
        assert_eq!(
            err,
            CompositeError::ShapeMismatch {
                image: (10, 10),
                mask: (10, 9)
            }
        );
    }

    #[test]
    fn test_invalid_blend() {
        let image = gradient(2, 2);
        let selection = SelectionMask::all(2, 2, true);
        for blend in [
            BlendParameters::new(1.2),
            BlendParameters::new(-0.1),
            BlendParameters::new(0.5).with_beta(1.5),
        ] {
            let err = recolor(&image, &selection, Rgb([255, 0, 0]), blend).unwrap_err();
            assert!(matches!(err, CompositeError::InvalidParameter(_)));
        }
    }
}
