//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the three operations the resize pipeline
//! needs: decode bytes into a raster, redraw a raster at a new size, and encode
//! a raster into one of the [`OutputFormat`]s. Reading the raster's size is a
//! fourth, trivial accessor.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec), built on the `image` crate.
//! Tests use the recording `MockCodec` in this module, which works on tiny
//! text "images" so pipeline logic can be checked without real pixels.

use super::calculations::TargetSize;
use super::format::OutputFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("cannot decode image: {0}")]
    Decode(String),
    #[error("cannot resize image: {0}")]
    Resize(String),
    #[error("cannot encode {format}: {reason}")]
    Encode {
        format: OutputFormat,
        reason: String,
    },
}

/// Intrinsic size of a decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Capability to decode, resize and encode images.
///
/// Implementations own the raster representation; the pipeline only moves
/// rasters between calls and asks for their size. `Sync` so one codec can
/// serve a rayon pool.
pub trait ImageCodec: Sync {
    type Raster;

    /// Decode encoded image bytes into a raster.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Raster, CodecError>;

    /// Width and height of a decoded raster.
    fn dimensions(&self, raster: &Self::Raster) -> Dimensions;

    /// Redraw `raster` into a canvas of exactly `size`.
    fn resize(&self, raster: Self::Raster, size: TargetSize) -> Result<Self::Raster, CodecError>;

    /// Encode a raster into `format`.
    fn encode(&self, raster: &Self::Raster, format: OutputFormat) -> Result<Vec<u8>, CodecError>;
}
