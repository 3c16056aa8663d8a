//! Progress events for the resize pipeline.
//!
//! [`ProgressReporter`] is handed to every job. It sends [`ProgressEvent`]s
//! over an `mpsc` channel to whoever prints them (the CLI runs a printer
//! thread, tests drain the receiver).
//!
//! Two kinds of events exist:
//!
//! - **Stage** messages, one before each pipeline step. These are gated by
//!   `verbose`: when it is off, [`ProgressReporter::emit`] returns before the
//!   context is even formatted.
//! - **Batch** events (item finished, source deleted, delete failed). These
//!   are always sent; they carry the per-item result the user must see.
//!
//! Sending never fails from the caller's point of view. A missing sender or a
//! hung-up receiver simply drops the event.

use crate::job::ResizeOutcome;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// Pipeline step a stage message announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FileExists,
    GettingFile,
    LoadingImage,
    CalculatingSize,
    ResizingImage,
    SavingImage,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Stage {
        stage: Stage,
        context: String,
    },
    /// One input went through the pipeline. `index` is its position in the batch.
    ItemFinished {
        index: usize,
        outcome: ResizeOutcome,
    },
    SourceDeleted {
        path: PathBuf,
    },
    DeleteFailed {
        path: PathBuf,
        reason: String,
    },
}

impl ProgressEvent {
    /// Whether the event reports something that went wrong.
    pub fn is_failure(&self) -> bool {
        match self {
            ProgressEvent::ItemFinished { outcome, .. } => !outcome.is_success(),
            ProgressEvent::DeleteFailed { .. } => true,
            ProgressEvent::Stage { .. } | ProgressEvent::SourceDeleted { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    verbose: bool,
    tx: Option<Sender<ProgressEvent>>,
}

impl ProgressReporter {
    pub fn new(verbose: bool, tx: Option<Sender<ProgressEvent>>) -> Self {
        Self { verbose, tx }
    }

    /// A reporter that drops every event.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Announce a pipeline stage. No-op unless verbose.
    pub fn emit(&self, stage: Stage, context: impl Display) {
        if !self.verbose {
            return;
        }
        self.send(ProgressEvent::Stage {
            stage,
            context: context.to_string(),
        });
    }

    pub fn item_finished(&self, index: usize, outcome: &ResizeOutcome) {
        self.send(ProgressEvent::ItemFinished {
            index,
            outcome: outcome.clone(),
        });
    }

    pub fn source_deleted(&self, path: PathBuf) {
        self.send(ProgressEvent::SourceDeleted { path });
    }

    pub fn delete_failed(&self, path: PathBuf, reason: String) {
        self.send(ProgressEvent::DeleteFailed { path, reason });
    }

    fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            tx.send(event).ok();
        }
    }
}
