use super::CaptureSource;
use anyhow::{Context, Result};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

/// Grabs one still from a webcam
///
/// The stream is only opened for the duration of a capture.
pub struct WebcamCapture {
    device_index: u32,
}

impl WebcamCapture {
    pub fn new(device_index: u32) -> Self {
        Self { device_index }
    }
}

impl CaptureSource for WebcamCapture {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        tracing::info!("Capturing still from webcam {}", self.device_index);

        let index = CameraIndex::Index(self.device_index);
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);

        let mut camera = Camera::new(index, requested).context("Failed to open camera")?;
        camera
            .open_stream()
            .context("Failed to open camera stream")?;

        let frame = camera.frame().context("Failed to capture frame")?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .context("Failed to decode frame")?;

        if let Err(e) = camera.stop_stream() {
            tracing::warn!("Failed to stop camera stream: {}", e);
        }

        tracing::info!("Captured {}x{} still", decoded.width(), decoded.height());
        Ok(decoded)
    }

    fn describe(&self) -> String {
        format!("webcam {}", self.device_index)
    }
}
