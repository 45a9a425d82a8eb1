use super::PresentationSurface;
use anyhow::{ensure, Context, Result};
use image::RgbImage;
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use v4l::video::Output;
use v4l::{Device, Format, FourCC};

/// Presents the image on a v4l2loopback virtual camera
///
/// The device is configured for YUYV at the display size on every
/// presentation. With `hold` set, `present` blocks until Enter is pressed.
pub struct LoopbackSurface {
    device_path: PathBuf,
    hold: bool,
}

impl LoopbackSurface {
    pub fn new<P: Into<PathBuf>>(device_path: P, hold: bool) -> Self {
        Self {
            device_path: device_path.into(),
            hold,
        }
    }

    fn configure(&self, width: u32, height: u32) -> Result<()> {
        let path = &self.device_path;
        let device = Device::with_path(path)
            .with_context(|| format!("Failed to open v4l2loopback device at {}", path.display()))?;

        let requested = Format::new(width, height, FourCC::new(b"YUYV"));
        let actual = Output::set_format(&device, &requested)
            .with_context(|| format!("Failed to set output format on {}", path.display()))?;
        tracing::debug!("Loopback format: {}", actual);

        ensure!(
            (actual.width, actual.height) == (width, height),
            "Device {} accepted {}x{} instead of {}x{}",
            path.display(),
            actual.width,
            actual.height,
            width,
            height
        );
        Ok(())
    }

    /// Pack the frame as YUYV 4:2:2, averaging chroma over each horizontal pair
    fn rgb_to_yuyv(rgb_image: &RgbImage) -> Vec<u8> {
        let (width, height) = rgb_image.dimensions();
        let mut yuyv = Vec::with_capacity((width.div_ceil(2) * 4 * height) as usize);

        for y in 0..height {
            for x in (0..width).step_by(2) {
                let pixel1 = rgb_image.get_pixel(x, y);
                let pixel2 = if x + 1 < width {
                    rgb_image.get_pixel(x + 1, y)
                } else {
                    pixel1
                };

                let (y1, u1, v1) = rgb_to_yuv(pixel1[0], pixel1[1], pixel1[2]);
                let (y2, u2, v2) = rgb_to_yuv(pixel2[0], pixel2[1], pixel2[2]);

                // Chroma is shared by the pixel pair
                let u = ((u16::from(u1) + u16::from(u2)) / 2) as u8;
                let v = ((u16::from(v1) + u16::from(v2)) / 2) as u8;

                // YUYV format: Y0 U Y1 V
                yuyv.extend_from_slice(&[y1, u, y2, v]);
            }
        }

        yuyv
    }
}

/// BT.601 limited-range coefficients in 8.8 fixed point, rows Y, Cb, Cr
const BT601: [[i32; 3]; 3] = [[66, 129, 25], [-38, -74, 112], [112, -94, -18]];

/// One RGB pixel to limited-range YCbCr (Y in 16..=235, chroma in 16..=240)
fn rgb_to_yuv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let rgb = [i32::from(r), i32::from(g), i32::from(b)];
    let weigh = |row: [i32; 3], offset: i32| {
        let sum: i32 = row.iter().zip(rgb).map(|(k, c)| k * c).sum();
        (((sum + 128) >> 8) + offset).clamp(0, 255) as u8
    };

    (weigh(BT601[0], 16), weigh(BT601[1], 128), weigh(BT601[2], 128))
}

impl PresentationSurface for LoopbackSurface {
    fn present(&mut self, image: &RgbImage, size: (u32, u32)) -> Result<()> {
        let _span = tracing::debug_span!("loopback_present").entered();

        ensure!(
            image.dimensions() == size,
            "Frame is {}x{} but {}x{} was requested",
            image.width(),
            image.height(),
            size.0,
            size.1
        );

        tracing::info!(
            "Presenting {}x{} on {}",
            size.0,
            size.1,
            self.device_path.display()
        );

        // v4l2loopback drops the format once its last opener closes, so the
        // write handle stays open across the format change
        let mut file = File::options()
            .write(true)
            .open(&self.device_path)
            .with_context(|| {
                format!("Failed to open {} for writing", self.device_path.display())
            })?;
        self.configure(size.0, size.1)?;

        file.write_all(&Self::rgb_to_yuyv(image))
            .context("Failed to write frame to v4l2loopback device")?;

        if self.hold {
            tracing::info!("Press Enter to dismiss");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to wait for dismissal")?;
        }

        Ok(())
    }
}
