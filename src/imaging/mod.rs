//! Image processing in pure Rust, without system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Target size** | [`compute_target_size`] (pure math) |
//! | **Resize** | `resize_exact` + Lanczos3 |
//! | **Encode** | PNG / JPEG / GIF encoders from `image` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Format**: The closed set of output formats
//! - **Codec**: [`ImageCodec`] trait + [`RustCodec`]

mod calculations;
pub mod codec;
mod format;
pub mod rust_codec;

pub use calculations::{DimensionError, TargetSize, compute_target_size};
pub use codec::{CodecError, Dimensions, ImageCodec};
pub use format::{OutputFormat, UnsupportedFormat};
pub use rust_codec::{DEFAULT_MEMORY_LIMIT, Quality, RustCodec};
