mod file;
mod loopback;

pub use file::FileSurface;
pub use loopback::LoopbackSurface;

use anyhow::Result;
use image::RgbImage;

/// Trait for presentation destinations
pub trait PresentationSurface {
    /// Show `image`, which has already been resized to `size` (width, height)
    fn present(&mut self, image: &RgbImage, size: (u32, u32)) -> Result<()>;
}
