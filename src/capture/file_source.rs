use super::CaptureSource;
use crate::codec::Codec;
use anyhow::Result;
use image::RgbImage;
use std::path::PathBuf;

/// Reads the frame from an image file through a [`Codec`]
pub struct FileSource<C: Codec> {
    path: PathBuf,
    codec: C,
}

impl<C: Codec> FileSource<C> {
    pub fn new<P: Into<PathBuf>>(path: P, codec: C) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }
}

impl<C: Codec> CaptureSource for FileSource<C> {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        self.codec.decode(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
