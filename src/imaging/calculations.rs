//! Pure calculation functions for target dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! ## Rounding
//!
//! Aspect-preserving sides use [`f64::round`]: halves round away from zero,
//! so a 3x3 source scaled by 0.5 becomes 2x2.

use super::codec::Dimensions;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DimensionError {
    #[error("{axis} must be a positive integer, got {value}")]
    NotPositive { axis: &'static str, value: i64 },
    #[error("{axis} of {value} is too large")]
    TooLarge { axis: &'static str, value: f64 },
    #[error("scale must be a positive finite number, got {0}")]
    InvalidScale(f64),
    #[error("computed {axis} rounds to zero")]
    Collapsed { axis: &'static str },
    #[error("source image has an empty side ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
}

/// Width and height an output image is scaled to. Both sides are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for TargetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Calculate the target size from the requested options and the source size.
///
/// Priority, first match wins:
/// 1. width **and** height → exactly `(width, height)`, aspect ratio ignored
/// 2. width only → height follows the source aspect ratio
/// 3. height only → width follows the source aspect ratio
/// 4. neither → both sides multiplied by `scale`
///
/// `scale` is only consulted (and validated) in the last case.
///
/// # Examples
/// ```
/// # use resize_image::imaging::{Dimensions, compute_target_size};
/// let source = Dimensions { width: 300, height: 200 };
/// let target = compute_target_size(Some(150), None, 1.0, source).unwrap();
/// assert_eq!((target.width, target.height), (150, 100));
/// ```
pub fn compute_target_size(
    width: Option<i64>,
    height: Option<i64>,
    scale: f64,
    source: Dimensions,
) -> Result<TargetSize, DimensionError> {
    if source.width == 0 || source.height == 0 {
        return Err(DimensionError::EmptySource {
            width: source.width,
            height: source.height,
        });
    }
    let width = width.map(|w| requested_side("width", w)).transpose()?;
    let height = height.map(|h| requested_side("height", h)).transpose()?;

    let (src_w, src_h) = (source.width as f64, source.height as f64);

    match (width, height) {
        (Some(width), Some(height)) => Ok(TargetSize { width, height }),
        (Some(width), None) => {
            let factor = width as f64 / src_w;
            Ok(TargetSize {
                width,
                height: scaled_side("height", src_h * factor)?,
            })
        }
        (None, Some(height)) => {
            let factor = height as f64 / src_h;
            Ok(TargetSize {
                width: scaled_side("width", src_w * factor)?,
                height,
            })
        }
        (None, None) => {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(DimensionError::InvalidScale(scale));
            }
            Ok(TargetSize {
                width: scaled_side("width", src_w * scale)?,
                height: scaled_side("height", src_h * scale)?,
            })
        }
    }
}

/// Validate an explicitly requested side length.
fn requested_side(axis: &'static str, value: i64) -> Result<u32, DimensionError> {
    if value <= 0 {
        return Err(DimensionError::NotPositive { axis, value });
    }
    u32::try_from(value).map_err(|_| DimensionError::TooLarge {
        axis,
        value: value as f64,
    })
}

/// Round a computed side length and make sure it is still a usable size.
fn scaled_side(axis: &'static str, exact: f64) -> Result<u32, DimensionError> {
    let rounded = exact.round();
    if rounded < 1.0 {
        return Err(DimensionError::Collapsed { axis });
    }
    if rounded > u32::MAX as f64 {
        return Err(DimensionError::TooLarge { axis, value: exact });
    }
    Ok(rounded as u32)
}
