//! End-to-end batches against real images on a temporary filesystem.
//!
//! Uses the production codec and store, so these tests exercise decoding,
//! Lanczos resizing, each encoder and atomic writes together.

use image::{ImageEncoder, RgbImage};
use resize_image::batch::{BatchReport, BatchRunner};
use resize_image::config::ResizeOptions;
use resize_image::imaging::RustCodec;
use resize_image::job::{ResizeFailure, ResizeOutcome};
use resize_image::progress::{ProgressEvent, ProgressReporter, Stage};
use resize_image::store::LocalStore;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tempfile::TempDir;

/// Write a small gradient JPEG with the given dimensions.
fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

fn run(options: &ResizeOptions, inputs: &[PathBuf]) -> BatchReport {
    let reporter = ProgressReporter::silent();
    BatchRunner::new(&RustCodec::new(), &LocalStore::new(), options, &reporter).run_all(inputs)
}

#[test]
fn photo_resized_by_width_to_png() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 300, 200);

    let options = ResizeOptions {
        width: Some(150),
        ..Default::default()
    };
    let report = run(&options, &[photo.clone()]);

    let expected = tmp.path().join("photo-resized.png");
    assert_eq!(
        report.outcomes,
        vec![ResizeOutcome::Success {
            input: photo.clone(),
            written: expected.clone(),
        }]
    );
    assert_eq!(
        image::ImageFormat::from_path(&expected).unwrap(),
        image::ImageFormat::Png
    );
    assert_eq!(image::image_dimensions(&expected).unwrap(), (150, 100));
    assert!(photo.exists());
}

#[test]
fn every_format_round_trips_target_dimensions() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("source.jpg");
    write_jpeg(&source, 120, 90);

    for format in ["png", "jpeg", "gif"] {
        let options = ResizeOptions {
            format: format.into(),
            scale: 0.5,
            ..Default::default()
        };
        let report = run(&options, &[source.clone()]);

        let written = report.outcomes[0].written().unwrap();
        assert_eq!(written, tmp.path().join(format!("source-resized.{format}")));
        let bytes = std::fs::read(written).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (60, 45), "{format}");
    }
}

#[test]
fn explicit_size_ignores_aspect_and_honors_override() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("wide.jpg");
    write_jpeg(&source, 100, 50);
    let out = tmp.path().join("square.gif");

    let options = ResizeOptions {
        width: Some(10),
        height: Some(10),
        format: "gif".into(),
        output: Some(out.clone()),
        ..Default::default()
    };
    let report = run(&options, &[source]);

    assert_eq!(report.outcomes[0].written(), Some(out.as_path()));
    assert_eq!(image::image_dimensions(&out).unwrap(), (10, 10));
}

#[test]
fn missing_input_in_the_middle() {
    let tmp = TempDir::new().unwrap();
    let inputs: Vec<PathBuf> = ["a.jpg", "b.jpg", "c.jpg", "d.jpg"]
        .iter()
        .map(|name| tmp.path().join(name))
        .collect();
    for (i, path) in inputs.iter().enumerate() {
        if i != 2 {
            write_jpeg(path, 40, 30);
        }
    }

    let report = run(&ResizeOptions::default(), &inputs);

    assert_eq!(report.outcomes.len(), 4);
    for (i, outcome) in report.outcomes.iter().enumerate() {
        assert_eq!(outcome.input(), inputs[i]);
        if i == 2 {
            assert_eq!(outcome.failure(), Some(&ResizeFailure::NotFound));
        } else {
            assert!(outcome.is_success(), "item {i}: {outcome:?}");
        }
    }
    assert!(!report.all_ok());
}

#[test]
fn unsupported_format_leaves_disk_untouched() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("photo.jpg");
    write_jpeg(&source, 40, 30);

    let options = ResizeOptions {
        format: "bmp".into(),
        delete: true,
        ..Default::default()
    };
    let report = run(&options, &[source.clone()]);

    assert!(matches!(
        report.outcomes[0].failure(),
        Some(ResizeFailure::UnsupportedFormat(_))
    ));
    let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert!(source.exists());
}

#[test]
fn delete_removes_only_the_successful_source() {
    let tmp = TempDir::new().unwrap();
    let valid = tmp.path().join("valid.jpg");
    write_jpeg(&valid, 64, 48);
    let missing = tmp.path().join("missing.jpg");

    let options = ResizeOptions {
        delete: true,
        ..Default::default()
    };
    let report = run(&options, &[valid.clone(), missing.clone()]);

    assert!(report.outcomes[0].is_success());
    assert_eq!(report.outcomes[1].failure(), Some(&ResizeFailure::NotFound));
    assert!(!valid.exists());
    assert!(tmp.path().join("valid-resized.png").exists());
    assert_eq!(report.deleted(), 1);
}

#[test]
fn non_image_input_is_decode_error() {
    let tmp = TempDir::new().unwrap();
    let notes = tmp.path().join("notes.txt");
    std::fs::write(&notes, "not an image").unwrap();

    let options = ResizeOptions {
        delete: true,
        ..Default::default()
    };
    let report = run(&options, &[notes.clone()]);

    assert!(matches!(
        report.outcomes[0].failure(),
        Some(ResizeFailure::DecodeError(_))
    ));
    assert!(notes.exists());
    assert!(!tmp.path().join("notes-resized.png").exists());
}

#[test]
fn unwritable_destination_is_write_error() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("photo.jpg");
    write_jpeg(&source, 40, 30);

    let options = ResizeOptions {
        output: Some(tmp.path().join("no/such/dir/out.png")),
        ..Default::default()
    };
    let report = run(&options, &[source]);

    assert!(matches!(
        report.outcomes[0].failure(),
        Some(ResizeFailure::WriteError(_))
    ));
}

#[test]
fn parallel_batch_keeps_input_order() {
    let tmp = TempDir::new().unwrap();
    let inputs: Vec<PathBuf> = (0..8)
        .map(|i| {
            let path = tmp.path().join(format!("img{i}.jpg"));
            if i != 5 {
                write_jpeg(&path, 32 + i, 24);
            }
            path
        })
        .collect();

    let options = ResizeOptions {
        jobs: 4,
        scale: 0.5,
        ..Default::default()
    };
    let report = run(&options, &inputs);

    let got: Vec<&Path> = report.outcomes.iter().map(|o| o.input()).collect();
    let want: Vec<&Path> = inputs.iter().map(PathBuf::as_path).collect();
    assert_eq!(got, want);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.outcomes[5].failure(), Some(&ResizeFailure::NotFound));
}

#[test]
fn verbose_batch_streams_stages_then_summary() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("photo.jpg");
    write_jpeg(&source, 30, 20);

    let options = ResizeOptions {
        verbose: true,
        ..Default::default()
    };
    let (tx, rx) = mpsc::channel();
    {
        let reporter = ProgressReporter::new(true, Some(tx));
        BatchRunner::new(&RustCodec::new(), &LocalStore::new(), &options, &reporter)
            .run_all(&[source]);
    }

    let events: Vec<ProgressEvent> = rx.iter().collect();
    assert!(matches!(
        events.first(),
        Some(ProgressEvent::Stage {
            stage: Stage::FileExists,
            ..
        })
    ));
    assert!(matches!(
        events.last(),
        Some(ProgressEvent::ItemFinished { index: 0, .. })
    ));
    let stage_count = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Stage { .. }))
        .count();
    assert_eq!(stage_count, 7);
}

#[test]
fn huge_scale_fails_the_item_instead_of_aborting() {
    let tmp = TempDir::new().unwrap();
    let huge = tmp.path().join("huge.jpg");
    let small = tmp.path().join("small.jpg");
    write_jpeg(&huge, 100, 100);
    write_jpeg(&small, 100, 100);

    let options = ResizeOptions {
        scale: 100_000.0,
        delete: true,
        ..Default::default()
    };
    let report = run(&options, &[huge.clone()]);

    assert!(matches!(
        report.outcomes[0].failure(),
        Some(ResizeFailure::InvalidDimension(_))
    ));
    assert!(huge.exists());
    assert!(report.deletions.is_empty());

    // The same batch settings still work for a sane request.
    let sane = ResizeOptions {
        width: Some(50),
        ..Default::default()
    };
    assert!(run(&sane, &[small]).all_ok());
}

#[test]
fn override_spelled_through_parent_dir_keeps_the_source() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("sub")).unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 40, 30);

    let options = ResizeOptions {
        format: "jpeg".into(),
        output: Some(tmp.path().join("sub/../photo.jpg")),
        width: Some(20),
        delete: true,
        ..Default::default()
    };
    let report = run(&options, &[photo.clone()]);

    assert!(report.outcomes[0].is_success());
    assert!(report.deletions.is_empty());
    assert_eq!(image::image_dimensions(&photo).unwrap(), (20, 15));
}

#[cfg(unix)]
#[test]
fn override_through_symlink_keeps_the_source() {
    let tmp = TempDir::new().unwrap();
    let photo = tmp.path().join("photo.jpg");
    write_jpeg(&photo, 40, 30);
    let alias = tmp.path().join("alias");
    std::os::unix::fs::symlink(tmp.path(), &alias).unwrap();

    let options = ResizeOptions {
        format: "jpeg".into(),
        output: Some(alias.join("photo.jpg")),
        width: Some(20),
        delete: true,
        ..Default::default()
    };
    let report = run(&options, &[photo.clone()]);

    assert!(report.outcomes[0].is_success());
    assert!(report.deletions.is_empty());
    assert_eq!(image::image_dimensions(&photo).unwrap(), (20, 15));
}

#[test]
fn earlier_output_listed_as_input_survives_delete() {
    let tmp = TempDir::new().unwrap();
    let x = tmp.path().join("x.jpg");
    write_jpeg(&x, 60, 40);
    let x_resized = tmp.path().join("x-resized.png");

    let options = ResizeOptions {
        width: Some(30),
        delete: true,
        ..Default::default()
    };
    let report = run(&options, &[x.clone(), x_resized.clone()]);

    assert_eq!(report.succeeded(), 2);
    assert!(!x.exists());
    assert_eq!(report.outcomes[0].written(), Some(x_resized.as_path()));
    assert_eq!(image::image_dimensions(&x_resized).unwrap(), (30, 20));
    assert!(tmp.path().join("x-resized-resized.png").exists());
}

#[test]
fn shared_override_keeps_all_sources() {
    let tmp = TempDir::new().unwrap();
    let inputs: Vec<PathBuf> = ["a.jpg", "b.jpg"]
        .iter()
        .map(|name| tmp.path().join(name))
        .collect();
    for path in &inputs {
        write_jpeg(path, 40, 30);
    }

    let options = ResizeOptions {
        output: Some(tmp.path().join("out.png")),
        delete: true,
        ..Default::default()
    };
    let report = run(&options, &inputs);

    assert_eq!(report.succeeded(), 2);
    assert!(report.deletions.is_empty());
    assert!(inputs.iter().all(|p| p.exists()));
}
