//! Batch options shared by every input of one invocation.
//!
//! [`ResizeOptions`] is built once from the command line and handed to the
//! [`BatchRunner`](crate::batch::BatchRunner), which derives one
//! [`ResizeRequest`](crate::job::ResizeRequest) per input path from it.
//!
//! ## Defaults
//!
//! ```text
//! format  = "png"
//! output  = <input dir>/<input stem>-resized.<format>
//! scale   = 1.0     (only used when neither width nor height is given)
//! width   = none
//! height  = none
//! delete  = false
//! verbose = false
//! jobs    = 1       (sequential; capped at the number of CPU cores)
//! ```
//!
//! The format stays a plain string here. It is parsed once per batch so an
//! unknown format is reported against each input instead of aborting the run.

use crate::imaging::{OutputFormat, UnsupportedFormat};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResizeOptions {
    /// Requested output format name (`png`, `jpeg` or `gif`).
    pub format: String,
    /// Explicit output path, used verbatim for every input.
    pub output: Option<PathBuf>,
    pub scale: f64,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// Delete each source after its resized copy was written.
    pub delete: bool,
    pub verbose: bool,
    /// Requested worker threads for the batch.
    pub jobs: usize,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default().name().to_string(),
            output: None,
            scale: 1.0,
            width: None,
            height: None,
            delete: false,
            verbose: false,
            jobs: 1,
        }
    }
}

impl ResizeOptions {
    /// Validate batch-wide settings.
    ///
    /// Per-item problems (bad dimensions, unknown format) are deliberately not
    /// checked here; they become failure outcomes for each input instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == 0 {
            return Err(ConfigError::Validation("jobs must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse the requested output format.
    pub fn output_format(&self) -> Result<OutputFormat, UnsupportedFormat> {
        self.format.parse()
    }
}

/// Resolve the worker thread count.
///
/// Capped at the number of available CPU cores.
pub fn effective_threads(options: &ResizeOptions) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    options.jobs.clamp(1, cores)
}
