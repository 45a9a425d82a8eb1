mod file_source;
mod v4l_capture;

pub use file_source::FileSource;
pub use v4l_capture::WebcamCapture;

use anyhow::Result;
use image::RgbImage;

/// Trait for still image sources
pub trait CaptureSource {
    /// Capture a single RGB frame
    fn capture_frame(&mut self) -> Result<RgbImage>;

    /// Human-readable origin of the frame, for logs
    fn describe(&self) -> String;
}
