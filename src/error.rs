//! Error types for the compositing core

use thiserror::Error;

/// Result type alias for compositing operations
pub type Result<T> = std::result::Result<T, CompositeError>;

/// Failures raised by the mask normalizer, compositor and display resizer.
///
/// Every variant is detected before an output buffer is allocated, so a caller
/// never observes a partially composited image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompositeError {
    /// Selection mask and image spatial dimensions differ, as (width, height)
    #[error("shape mismatch: image is {}x{}, mask is {}x{}", .image.0, .image.1, .mask.0, .mask.1)]
    ShapeMismatch { image: (u32, u32), mask: (u32, u32) },

    /// Blend, blur or bound parameter outside its valid domain
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Degenerate input such as a zero-sized image
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CompositeError {
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Fail with `ShapeMismatch` unless both (width, height) pairs agree
    pub fn check_shape(image: (u32, u32), mask: (u32, u32)) -> Result<()> {
        if image == mask {
            Ok(())
        } else {
            Err(Self::ShapeMismatch { image, mask })
        }
    }
}
