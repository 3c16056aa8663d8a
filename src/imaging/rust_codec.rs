//! Pure Rust codec built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image::load_from_memory` (format sniffed from the bytes) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality 1-100, default 90) |
//! | Encode → GIF | `image::codecs::gif::GifEncoder` (first frame only) |
//!
//! ## Memory budget
//!
//! Lanczos resampling runs through an RGBA `f32` buffer (16 bytes per pixel)
//! sized source width × target height, then writes the target image. A
//! target that would need more than [`DEFAULT_MEMORY_LIMIT`] bytes for both
//! buffers is refused with [`CodecError::Resize`] before anything is
//! allocated, so an absurd scale fails one image instead of aborting the
//! process.
//!
//! Each encoder accepts a narrower set of pixel layouts than the decoders
//! produce, so rasters are converted before encoding: JPEG gets RGB8 (alpha
//! dropped), GIF gets RGBA8, PNG keeps integer layouts and gets RGBA8 for
//! floating-point ones.

use super::calculations::TargetSize;
use super::codec::{CodecError, Dimensions, ImageCodec};
use super::format::OutputFormat;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView};
use std::borrow::Cow;

/// Working memory a single resize may use: 4 GiB.
pub const DEFAULT_MEMORY_LIMIT: u64 = 4 << 30;

/// Bytes per pixel of the resampler's `f32` RGBA buffers.
const WORK_BYTES_PER_PIXEL: u64 = 16;

/// JPEG quality setting (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Codec backed by the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone)]
pub struct RustCodec {
    jpeg_quality: Quality,
    memory_limit: u64,
}

impl Default for RustCodec {
    fn default() -> Self {
        Self {
            jpeg_quality: Quality::default(),
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }
}

impl RustCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jpeg_quality(mut self, quality: Quality) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Cap the bytes a single resize may allocate.
    pub fn with_memory_limit(mut self, bytes: u64) -> Self {
        self.memory_limit = bytes;
        self
    }
}

/// Upper bound of the bytes `resize_exact` allocates for `source` → `target`.
fn resize_work_bytes(source_width: u32, target: TargetSize) -> u64 {
    (u64::from(source_width) + u64::from(target.width))
        .saturating_mul(u64::from(target.height))
        .saturating_mul(WORK_BYTES_PER_PIXEL)
}

/// Convert `img` into a pixel layout the target encoder accepts.
fn prepare_for(format: OutputFormat, img: &DynamicImage) -> Cow<'_, DynamicImage> {
    match (format, img.color()) {
        (OutputFormat::Jpeg, ColorType::Rgb8 | ColorType::L8) => Cow::Borrowed(img),
        (OutputFormat::Jpeg, _) => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
        (OutputFormat::Gif, ColorType::Rgba8) => Cow::Borrowed(img),
        (OutputFormat::Gif, _) => Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8())),
        (OutputFormat::Png, ColorType::Rgb32F | ColorType::Rgba32F) => {
            Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8()))
        }
        (OutputFormat::Png, _) => Cow::Borrowed(img),
    }
}

impl ImageCodec for RustCodec {
    type Raster = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        let img = image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        if img.width() == 0 || img.height() == 0 {
            return Err(CodecError::Decode(format!(
                "image has no pixels ({}x{})",
                img.width(),
                img.height()
            )));
        }
        Ok(img)
    }

    fn dimensions(&self, raster: &DynamicImage) -> Dimensions {
        let (width, height) = raster.dimensions();
        Dimensions { width, height }
    }

    fn resize(&self, raster: DynamicImage, size: TargetSize) -> Result<DynamicImage, CodecError> {
        if size.width == 0 || size.height == 0 {
            return Err(CodecError::Resize(format!("empty target {size}")));
        }
        if (raster.width(), raster.height()) == (size.width, size.height) {
            return Ok(raster);
        }
        let needed = resize_work_bytes(raster.width(), size);
        if needed > self.memory_limit {
            return Err(CodecError::Resize(format!(
                "target {size} needs {needed} bytes of working memory (limit {})",
                self.memory_limit
            )));
        }
        Ok(raster.resize_exact(size.width, size.height, FilterType::Lanczos3))
    }

    fn encode(&self, raster: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, CodecError> {
        let img = prepare_for(format, raster);
        let mut buf = Vec::new();
        let result = match format {
            OutputFormat::Png => img.write_with_encoder(PngEncoder::new(&mut buf)),
            OutputFormat::Jpeg => img.write_with_encoder(JpegEncoder::new_with_quality(
                &mut buf,
                self.jpeg_quality.value(),
            )),
            OutputFormat::Gif => {
                // Trailer is written when the encoder drops at the end of this block.
                let mut encoder = GifEncoder::new(&mut buf);
                encoder.encode(
                    img.as_bytes(),
                    img.width(),
                    img.height(),
                    image::ExtendedColorType::Rgba8,
                )
            }
        };
        result.map_err(|e| CodecError::Encode {
            format,
            reason: e.to_string(),
        })?;
        Ok(buf)
    }
}
