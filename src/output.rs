//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Verbose stage messages
//!
//! ```text
//! checking if file exists: photos/photo.jpg...
//! getting data for photos/photo.jpg...
//! loading image photos/photo.jpg...
//! calculating target size for photos/photo.jpg...
//! resizing image from 300x200 to 150x100
//! saving image to photos/photo-resized.png...
//! done: photos/photo-resized.png
//! ```
//!
//! ## Per-item results (always shown)
//!
//! ```text
//! write successful to: photos/photo-resized.png
//! error: photos/missing.jpg: file not found          ← stderr
//! photos/photo.jpg was deleted
//! ```
//!
//! ## Batch summary (more than one input)
//!
//! ```text
//! Resized 2 of 3 images (1 failed)
//! Deleted 2 source files
//! ```
//!
//! # Architecture
//!
//! `format_*` functions are pure and return strings for testability; the
//! `print_*` wrappers write to stdout, or stderr for failures.

use crate::batch::BatchReport;
use crate::config::ResizeOptions;
use crate::job::ResizeOutcome;
use crate::progress::{ProgressEvent, Stage};
use serde::Serialize;

/// Render a stage message.
pub fn format_stage(stage: Stage, context: &str) -> String {
    match stage {
        Stage::FileExists => format!("checking if file exists: {context}..."),
        Stage::GettingFile => format!("getting data for {context}..."),
        Stage::LoadingImage => format!("loading image {context}..."),
        Stage::CalculatingSize => format!("calculating target size for {context}..."),
        Stage::ResizingImage => format!("resizing image {context}"),
        Stage::SavingImage => format!("saving image to {context}..."),
        Stage::Done => format!("done: {context}"),
    }
}

/// One line for a finished input.
pub fn format_outcome(outcome: &ResizeOutcome) -> String {
    match outcome {
        ResizeOutcome::Success { written, .. } => {
            format!("write successful to: {}", written.display())
        }
        ResizeOutcome::Failure { input, reason } => {
            format!("error: {}: {}", input.display(), reason)
        }
    }
}

pub fn format_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Stage { stage, context } => format_stage(*stage, context),
        ProgressEvent::ItemFinished { outcome, .. } => format_outcome(outcome),
        ProgressEvent::SourceDeleted { path } => format!("{} was deleted", path.display()),
        ProgressEvent::DeleteFailed { path, reason } => {
            format!("error: {}: {}", path.display(), reason)
        }
    }
}

/// Print an event; failures go to stderr.
pub fn print_event(event: &ProgressEvent) {
    let line = format_event(event);
    if event.is_failure() {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

/// Totals for a batch. Empty for a single input, whose result line says it all.
pub fn format_summary(report: &BatchReport) -> Vec<String> {
    let total = report.outcomes.len();
    if total <= 1 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let failed = report.failed();
    if failed == 0 {
        lines.push(format!("Resized {total} images"));
    } else {
        lines.push(format!(
            "Resized {} of {total} images ({failed} failed)",
            report.succeeded()
        ));
    }

    if !report.deletions.is_empty() {
        let deleted = report.deleted();
        let noun = if deleted == 1 { "file" } else { "files" };
        let not_deleted = report.deletions.len() - deleted;
        if not_deleted == 0 {
            lines.push(format!("Deleted {deleted} source {noun}"));
        } else {
            lines.push(format!(
                "Deleted {deleted} source {noun} ({not_deleted} could not be deleted)"
            ));
        }
    }
    lines
}

pub fn print_summary(report: &BatchReport) {
    for line in format_summary(report) {
        println!("{line}");
    }
}

#[derive(Serialize)]
struct ReportFile<'a> {
    version: &'static str,
    options: &'a ResizeOptions,
    succeeded: usize,
    failed: usize,
    #[serde(flatten)]
    report: &'a BatchReport,
}

/// JSON document written by `--report`.
pub fn format_report_json(
    options: &ResizeOptions,
    report: &BatchReport,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportFile {
        version: env!("CARGO_PKG_VERSION"),
        options,
        succeeded: report.succeeded(),
        failed: report.failed(),
        report,
    })
}
