//! The per-item resize pipeline.
//!
//! A [`ResizeJob`] takes one [`ResizeRequest`] through these stages:
//!
//! ```text
//! exists? → read → decode → target size → resize → encode → write
//! ```
//!
//! Every stage returns a `Result`; the first error ends the item and becomes
//! a [`ResizeOutcome::Failure`]. [`ResizeJob::run`] never panics and never
//! returns an error, so a batch always gets exactly one outcome per input.
//!
//! ## Output path
//!
//! Without an override, the output goes next to the input:
//!
//! ```text
//! photos/photo.jpg  --format png  →  photos/photo-resized.png
//! archive.tar.gz    --format gif  →  archive.tar-resized.gif
//! ```

use crate::config::ResizeOptions;
use crate::imaging::{
    DimensionError, ImageCodec, OutputFormat, UnsupportedFormat, compute_target_size,
};
use crate::progress::{ProgressReporter, Stage};
use crate::store::FileStore;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, debug_span};

/// Why one input could not be resized.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ResizeFailure {
    #[error("file not found")]
    NotFound,
    #[error("cannot read file: {0}")]
    ReadError(String),
    #[error("cannot load image: {0}")]
    DecodeError(String),
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("{0}")]
    UnsupportedFormat(String),
    #[error("cannot encode image: {0}")]
    EncodeError(String),
    #[error("cannot write output: {0}")]
    WriteError(String),
    #[error("cannot delete source: {0}")]
    DeleteError(String),
}

impl From<DimensionError> for ResizeFailure {
    fn from(err: DimensionError) -> Self {
        ResizeFailure::InvalidDimension(err.to_string())
    }
}

impl From<UnsupportedFormat> for ResizeFailure {
    fn from(err: UnsupportedFormat) -> Self {
        ResizeFailure::UnsupportedFormat(err.to_string())
    }
}

/// Result of pushing one input through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResizeOutcome {
    Success { input: PathBuf, written: PathBuf },
    Failure { input: PathBuf, reason: ResizeFailure },
}

impl ResizeOutcome {
    pub fn input(&self) -> &Path {
        match self {
            ResizeOutcome::Success { input, .. } | ResizeOutcome::Failure { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResizeOutcome::Success { .. })
    }

    pub fn written(&self) -> Option<&Path> {
        match self {
            ResizeOutcome::Success { written, .. } => Some(written),
            ResizeOutcome::Failure { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&ResizeFailure> {
        match self {
            ResizeOutcome::Success { .. } => None,
            ResizeOutcome::Failure { reason, .. } => Some(reason),
        }
    }
}

/// Everything needed to resize one input. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRequest {
    pub input: PathBuf,
    pub output_format: OutputFormat,
    pub output_override: Option<PathBuf>,
    pub scale: f64,
    pub width: Option<i64>,
    pub height: Option<i64>,
    /// Delete `input` once the whole batch has run, if this item succeeded.
    pub delete_after: bool,
}

impl ResizeRequest {
    pub fn new(
        input: impl Into<PathBuf>,
        output_format: OutputFormat,
        options: &ResizeOptions,
    ) -> Self {
        Self {
            input: input.into(),
            output_format,
            output_override: options.output.clone(),
            scale: options.scale,
            width: options.width,
            height: options.height,
            delete_after: options.delete,
        }
    }

    /// Where the resized image is written.
    pub fn output_path(&self) -> PathBuf {
        match &self.output_override {
            Some(path) => path.clone(),
            None => resized_path(&self.input, self.output_format),
        }
    }
}

/// `<dir>/<stem>-resized.<format>` next to `input`.
pub fn resized_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}-resized.{}", format.name()))
}

/// Runs the pipeline for single inputs against a codec and a store.
pub struct ResizeJob<'a, C, S> {
    codec: &'a C,
    store: &'a S,
    reporter: &'a ProgressReporter,
}

impl<'a, C: ImageCodec, S: FileStore> ResizeJob<'a, C, S> {
    pub fn new(codec: &'a C, store: &'a S, reporter: &'a ProgressReporter) -> Self {
        Self {
            codec,
            store,
            reporter,
        }
    }

    /// Resize one input. Every error is captured in the returned outcome.
    pub fn run(&self, request: &ResizeRequest) -> ResizeOutcome {
        let _span = debug_span!("resize", input = %request.input.display()).entered();
        let input = request.input.clone();
        match self.execute(request) {
            Ok(written) => {
                debug!(written = %written.display(), "resize succeeded");
                ResizeOutcome::Success { input, written }
            }
            Err(reason) => {
                debug!(%reason, "resize failed");
                ResizeOutcome::Failure { input, reason }
            }
        }
    }

    fn execute(&self, request: &ResizeRequest) -> Result<PathBuf, ResizeFailure> {
        let input = request.input.as_path();

        self.reporter.emit(Stage::FileExists, input.display());
        if !self.store.exists(input) {
            return Err(ResizeFailure::NotFound);
        }

        self.reporter.emit(Stage::GettingFile, input.display());
        let bytes = self
            .store
            .read_bytes(input)
            .map_err(|e| ResizeFailure::ReadError(e.to_string()))?;

        self.reporter.emit(Stage::LoadingImage, input.display());
        let raster = self
            .codec
            .decode(&bytes)
            .map_err(|e| ResizeFailure::DecodeError(e.to_string()))?;
        drop(bytes);

        self.reporter.emit(Stage::CalculatingSize, input.display());
        let source = self.codec.dimensions(&raster);
        let target = compute_target_size(request.width, request.height, request.scale, source)?;
        debug!(%source, %target, "computed target size");

        self.reporter
            .emit(Stage::ResizingImage, format_args!("from {source} to {target}"));
        let resized = self
            .codec
            .resize(raster, target)
            .map_err(|e| ResizeFailure::InvalidDimension(e.to_string()))?;

        let output = request.output_path();
        self.reporter.emit(Stage::SavingImage, output.display());
        let encoded = self
            .codec
            .encode(&resized, request.output_format)
            .map_err(|e| ResizeFailure::EncodeError(e.to_string()))?;
        self.store
            .write_bytes(&output, &encoded)
            .map_err(|e| ResizeFailure::WriteError(e.to_string()))?;

        self.reporter.emit(Stage::Done, output.display());
        Ok(output)
    }
}
