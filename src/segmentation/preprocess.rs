use crate::compositing::ClassificationMask;
use anyhow::{bail, Result};
use image::{imageops, RgbImage};
use ndarray::{Array2, Array4, ArrayViewD, Ix4};

/// Converts RGB images to model input tensors and model outputs back to masks
pub struct Preprocessor {
    target_width: u32,
    target_height: u32,
}

impl Preprocessor {
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
        }
    }

    /// Model input for `image`: a `[1, 3, H, W]` batch of channel planes in
    /// `0.0..=1.0`, resampled with Lanczos3 when the model size differs
    pub fn preprocess(&self, image: &RgbImage) -> Array4<f32> {
        let _span = tracing::debug_span!("preprocess").entered();

        let resized = if image.dimensions() != (self.target_width, self.target_height) {
            imageops::resize(
                image,
                self.target_width,
                self.target_height,
                imageops::FilterType::Lanczos3,
            )
        } else {
            image.clone()
        };

        let (width, height) = resized.dimensions();
        let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));

        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                tensor[[0, c, y as usize, x as usize]] = f32::from(pixel[c]) / 255.0;
            }
        }

        tensor
    }

    /// Reduce a model output tensor to a 2-D score map
    ///
    /// * `[1, 1, h, w]` or `[1, h, w]` - used as per-pixel scores
    /// * `[1, C, h, w]` with C > 1 - per-pixel argmax, giving category ids
    pub fn decode_scores(output: &ArrayViewD<'_, f32>) -> Result<Array2<f32>> {
        let _span = tracing::debug_span!("decode_scores").entered();

        match *output.shape() {
            [1, h, w] | [1, 1, h, w] => {
                let values: Vec<f32> = output.iter().copied().collect();
                Ok(Array2::from_shape_vec((h, w), values)?)
            }
            [1, classes, h, w] if classes > 1 => {
                let logits = output.view().into_dimensionality::<Ix4>()?;
                Ok(Array2::from_shape_fn((h, w), |(y, x)| {
                    let mut best = 0;
                    for c in 1..classes {
                        if logits[[0, c, y, x]] > logits[[0, best, y, x]] {
                            best = c;
                        }
                    }
                    best as f32
                }))
            }
            ref shape => bail!("Unsupported segmentation output shape {:?}", shape),
        }
    }

    /// Resample a score map to the frame size with nearest-neighbour lookup
    ///
    /// Category ids are never interpolated into values that name no class.
    pub fn postprocess_mask(
        scores: &Array2<f32>,
        target_width: u32,
        target_height: u32,
    ) -> ClassificationMask {
        let _span = tracing::debug_span!("postprocess").entered();

        let (height, width) = scores.dim();
        if (width, height) == (target_width as usize, target_height as usize) {
            return ClassificationMask::new(scores.clone());
        }

        let (tw, th) = (target_width as usize, target_height as usize);
        let resized = Array2::from_shape_fn((th, tw), |(y, x)| {
            let sy = ((2 * y + 1) * height / (2 * th)).min(height.saturating_sub(1));
            let sx = ((2 * x + 1) * width / (2 * tw)).min(width.saturating_sub(1));
            scores[[sy, sx]]
        });

        ClassificationMask::new(resized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use ndarray::{array, Array, IxDyn};

    #[test]
    fn test_preprocess_layout() {
        let image = RgbImage::from_fn(4, 2, |x, y| Rgb([(x * 50) as u8, (y * 255) as u8, 51]));
        let tensor = Preprocessor::new(4, 2).preprocess(&image);

        assert_eq!(tensor.shape(), &[1, 3, 2, 4]);
        assert_eq!(tensor[[0, 0, 0, 2]], 100.0f32 / 255.0);
        assert_eq!(tensor[[0, 1, 1, 0]], 1.0);
        assert_eq!(tensor[[0, 2, 1, 3]], 0.2f32);
    }

    #[test]
    fn test_preprocess_resizes() {
        let image = RgbImage::from_pixel(10, 7, Rgb([255, 0, 0]));
        let tensor = Preprocessor::new(8, 8).preprocess(&image);
        assert_eq!(tensor.shape(), &[1, 3, 8, 8]);
    }

    #[test]
    fn test_decode_single_channel_scores() {
        let output = Array::from_shape_vec(IxDyn(&[1, 1, 2, 2]), vec![0.1f32, 0.9, 0.4, 0.6]).unwrap();
        let scores = Preprocessor::decode_scores(&output.view()).unwrap();
        assert_eq!(scores, array![[0.1f32, 0.9], [0.4, 0.6]]);
    }

    #[test]
    fn test_decode_argmax_categories() {
        // Three classes over a 1x3 frame
        let output = Array::from_shape_vec(
            IxDyn(&[1, 3, 1, 3]),
            vec![
                5.0f32, 0.0, 1.0, // background
                1.0, 4.0, 1.0, // class 1
                0.0, 2.0, 1.0, // class 2
            ],
        )
        .unwrap();
        let scores = Preprocessor::decode_scores(&output.view()).unwrap();
        // Ties resolve to the lowest class id
        assert_eq!(scores, array![[0.0f32, 1.0, 0.0]]);
    }

    #[test]
    fn test_decode_rejects_unknown_shapes() {
        let output = Array::<f32, _>::zeros(IxDyn(&[2, 1, 2, 2]));
        assert!(Preprocessor::decode_scores(&output.view()).is_err());
        let output = Array::<f32, _>::zeros(IxDyn(&[4]));
        assert!(Preprocessor::decode_scores(&output.view()).is_err());
    }

    #[test]
    fn test_postprocess_nearest() {
        let scores = array![[0.0, 1.0], [2.0, 3.0]];
        let mask = Preprocessor::postprocess_mask(&scores, 4, 4);
        assert_eq!(mask.dimensions(), (4, 4));
        assert_eq!(
            mask.scores(),
            &array![
                [0.0f32, 0.0, 1.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [2.0, 2.0, 3.0, 3.0],
                [2.0, 2.0, 3.0, 3.0]
            ]
        );

        let same = Preprocessor::postprocess_mask(&scores, 2, 2);
        assert_eq!(same.scores(), &scores);
    }
}
