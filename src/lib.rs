//! # resize-image
//!
//! A small command-line batch image resizer. Give it image paths and a target
//! size; each image is decoded, resized, encoded as PNG, JPEG or GIF, and
//! written next to the original (or to an explicit output path). Sources can
//! be deleted once their resized copy is on disk.
//!
//! # Architecture: Per-Item Pipeline, Batch Isolation
//!
//! ```text
//! for each input:   exists? → read → decode → target size → resize → encode → write
//! after the batch:  delete sources of successful inputs (when asked)
//! ```
//!
//! Every input yields exactly one [`job::ResizeOutcome`]. A failure at any
//! stage ends that input only; the batch continues with the next one and the
//! process exits non-zero at the end.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Target-size math, the [`imaging::ImageCodec`] trait and its `image`-crate implementation |
//! | [`store`] | The [`store::FileStore`] trait and the local filesystem store (atomic writes) |
//! | [`job`] | One input through the pipeline: [`job::ResizeJob`], requests, outcomes, failures |
//! | [`batch`] | [`batch::BatchRunner`]: all inputs, failure isolation, optional parallelism, deletion |
//! | [`progress`] | Verbose stage messages and per-item events sent over a channel |
//! | [`config`] | [`config::ResizeOptions`] shared by every input of a batch |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Traits at the I/O Seams
//!
//! Decoding, encoding and the filesystem sit behind [`imaging::ImageCodec`]
//! and [`store::FileStore`]. The size math, the stage ordering and the batch
//! rules are tested against an in-memory codec and store; real images are
//! only needed to test the codec itself.
//!
//! ## Explicit Aspect Override
//!
//! Width and height together produce exactly that size, even if it distorts
//! the image. Only one of them keeps the aspect ratio; neither applies the
//! scale factor.
//!
//! ## Delete Only What Was Written
//!
//! `--delete` removes a source only after its own resized copy was written,
//! and only once the whole batch ran. Failed inputs are never deleted, and
//! neither is a source that is (under any spelling) a file the batch wrote.
//!
//! ## Bounded Resizes
//!
//! A resize that would need more than a fixed amount of working memory fails
//! that input with `InvalidDimension` instead of taking the process down.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod job;
pub mod output;
pub mod progress;
pub mod store;
