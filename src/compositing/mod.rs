//! Mask-driven compositing: thresholding, recoloring, background blur and
//! display sizing. Everything here is synchronous and allocation-only; no
//! function mutates its inputs.

mod background;
mod blur;
mod mask;
mod matte;
mod recolor;
mod resize;
pub mod types;

pub use background::{background_effect, background_effect_with};
pub use blur::{gaussian_blur, GaussianKernel};
pub use mask::normalize;
pub use matte::matte;
pub use recolor::recolor;
pub use resize::{fit_dimensions, fit_to_bounds, resize_for_display, DisplayBounds};
pub use types::{BlendParameters, ClassificationMask, Image, SelectionMask};
