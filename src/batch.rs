//! Batch processing over a list of inputs.
//!
//! [`BatchRunner::run_all`] resizes every input path and returns a
//! [`BatchReport`] with exactly one outcome per path, in input order. A
//! failing input never stops the inputs after it.
//!
//! ## Order of work
//!
//! 1. Parse the output format once. An unknown format fails every input
//!    without touching the store or the codec.
//! 2. Run a [`ResizeJob`] per input, sequentially or on a rayon pool when more
//!    than one job is allowed.
//! 3. Emit one summary event per input, in input order.
//! 4. If deletion was requested, delete the sources of successful inputs.
//!
//! ## Deletion
//!
//! Only inputs whose own write succeeded are deleted, and only after the
//! whole batch ran. Paths are compared by [`FileStore::identity`], so every
//! spelling of a file counts as that file. An input is kept when:
//!
//! - it is any file the batch wrote (`-o` pointing at the input, or an
//!   earlier item's `-resized` output given as another input)
//! - its output was also written from a different source, as with one `-o`
//!   shared by several inputs
//!
//! A failed deletion is reported and recorded but does not turn the resize
//! into a failure.

use crate::config::{ResizeOptions, effective_threads};
use crate::imaging::ImageCodec;
use crate::job::{ResizeFailure, ResizeJob, ResizeOutcome, ResizeRequest};
use crate::progress::ProgressReporter;
use crate::store::FileStore;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A source file removal attempted after the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deletion {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResizeFailure>,
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// One entry per input, in input order.
    pub outcomes: Vec<ResizeOutcome>,
    pub deletions: Vec<Deletion>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn deleted(&self) -> usize {
        self.deletions.iter().filter(|d| d.error.is_none()).count()
    }

    /// True when every input was resized and every requested deletion worked.
    pub fn all_ok(&self) -> bool {
        self.failed() == 0 && self.deletions.iter().all(|d| d.error.is_none())
    }
}

pub struct BatchRunner<'a, C, S> {
    codec: &'a C,
    store: &'a S,
    options: &'a ResizeOptions,
    reporter: &'a ProgressReporter,
}

impl<'a, C: ImageCodec, S: FileStore> BatchRunner<'a, C, S> {
    pub fn new(
        codec: &'a C,
        store: &'a S,
        options: &'a ResizeOptions,
        reporter: &'a ProgressReporter,
    ) -> Self {
        Self {
            codec,
            store,
            options,
            reporter,
        }
    }

    /// Resize every path, then delete successful sources if requested.
    pub fn run_all(&self, paths: &[PathBuf]) -> BatchReport {
        let (outcomes, deletions) = match self.options.output_format() {
            Ok(format) => {
                let requests: Vec<ResizeRequest> = paths
                    .iter()
                    .map(|path| ResizeRequest::new(path.clone(), format, self.options))
                    .collect();
                let outcomes = self.resize_all(&requests);
                let deletions = self.delete_sources(&requests, &outcomes);
                (outcomes, deletions)
            }
            Err(err) => {
                debug!(%err, inputs = paths.len(), "rejecting batch");
                let reason = ResizeFailure::from(err);
                let outcomes: Vec<ResizeOutcome> = paths
                    .iter()
                    .map(|input| ResizeOutcome::Failure {
                        input: input.clone(),
                        reason: reason.clone(),
                    })
                    .collect();
                self.report_finished(&outcomes);
                (outcomes, Vec::new())
            }
        };

        let report = BatchReport {
            outcomes,
            deletions,
        };
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            deleted = report.deleted(),
            "batch finished"
        );
        report
    }

    fn resize_all(&self, requests: &[ResizeRequest]) -> Vec<ResizeOutcome> {
        let job = ResizeJob::new(self.codec, self.store, self.reporter);

        let threads = effective_threads(self.options).min(requests.len());
        if threads > 1 {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => {
                    debug!(threads, "resizing in parallel");
                    let outcomes: Vec<ResizeOutcome> =
                        pool.install(|| requests.par_iter().map(|r| job.run(r)).collect());
                    self.report_finished(&outcomes);
                    return outcomes;
                }
                Err(err) => warn!(%err, "cannot start worker threads, resizing sequentially"),
            }
        }

        requests
            .iter()
            .enumerate()
            .map(|(index, request)| {
                let outcome = job.run(request);
                self.reporter.item_finished(index, &outcome);
                outcome
            })
            .collect()
    }

    fn report_finished(&self, outcomes: &[ResizeOutcome]) {
        for (index, outcome) in outcomes.iter().enumerate() {
            self.reporter.item_finished(index, outcome);
        }
    }

    /// Delete the sources of successful items that asked for it.
    ///
    /// A source is kept when it is the same file as anything the batch wrote,
    /// or when its output was also written from a different source (only one
    /// of those images survived, maybe not its own).
    fn delete_sources(
        &self,
        requests: &[ResizeRequest],
        outcomes: &[ResizeOutcome],
    ) -> Vec<Deletion> {
        // Identities are resolved before anything is deleted.
        let written: Vec<(&ResizeRequest, &Path, PathBuf, PathBuf)> = requests
            .iter()
            .zip(outcomes)
            .filter_map(|(request, outcome)| match outcome {
                ResizeOutcome::Success { input, written } => Some((
                    request,
                    input.as_path(),
                    self.store.identity(input),
                    self.store.identity(written),
                )),
                ResizeOutcome::Failure { .. } => None,
            })
            .collect();

        // Output identity → identities of the sources written to it.
        let mut writers: BTreeMap<&Path, BTreeSet<&Path>> = BTreeMap::new();
        for (_, _, source, output) in &written {
            writers
                .entry(output.as_path())
                .or_default()
                .insert(source.as_path());
        }

        let mut attempted = BTreeSet::new();
        let mut deletions = Vec::new();
        for (request, input, source, output) in &written {
            if !request.delete_after {
                continue;
            }
            if writers.contains_key(source.as_path()) {
                warn!(path = %input.display(), "source was overwritten by a resized image, keeping it");
                continue;
            }
            if writers
                .get(output.as_path())
                .is_some_and(|sources| sources.len() > 1)
            {
                warn!(
                    path = %input.display(),
                    output = %output.display(),
                    "output was also written from another source, keeping it"
                );
                continue;
            }
            if !attempted.insert(source) {
                continue;
            }
            let input = *input;

            match self.store.delete(input) {
                Ok(()) => {
                    self.reporter.source_deleted(input.to_path_buf());
                    deletions.push(Deletion {
                        path: input.to_path_buf(),
                        error: None,
                    });
                }
                Err(err) => {
                    debug!(%err, "cannot delete source");
                    let reason = ResizeFailure::DeleteError(err.to_string());
                    self.reporter
                        .delete_failed(input.to_path_buf(), reason.to_string());
                    deletions.push(Deletion {
                        path: input.to_path_buf(),
                        error: Some(reason),
                    });
                }
            }
        }

        deletions
    }
}
