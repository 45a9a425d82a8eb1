use super::types::{Image, SelectionMask};
use image::Pixel;

/// Render the selection itself: `foreground` where selected, `background` elsewhere
pub fn matte<P>(selection: &SelectionMask, foreground: P, background: P) -> Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    let _span = tracing::debug_span!("matte").entered();

    let (width, height) = selection.dimensions();
    Image::from_fn(width, height, |x, y| {
        if selection.is_selected(x, y) {
            foreground
        } else {
            background
        }
    })
}
