use clap::Parser;
use resize_image::batch::BatchRunner;
use resize_image::config::ResizeOptions;
use resize_image::imaging::{Quality, RustCodec};
use resize_image::output;
use resize_image::progress::ProgressReporter;
use resize_image::store::LocalStore;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "resize-image")]
#[command(about = "A simple command-line tool to resize image(s).")]
#[command(long_about = "\
A simple command-line tool to resize image(s).

Size rules (first match wins):
  --width and --height   exact size, aspect ratio not preserved
  --width only           height follows the aspect ratio
  --height only          width follows the aspect ratio
  neither                both sides multiplied by --scale

Output goes to <input dir>/<input name>-resized.<format> unless --output is set.
A failing input is reported and skipped; the exit code is non-zero if any
input failed.")]
#[command(version)]
struct Cli {
    /// The file path to input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Delete input files after they were resized successfully
    #[arg(short, long)]
    delete: bool,

    /// Image format (png, jpeg, gif)
    #[arg(short, long, default_value = "png")]
    format: String,

    /// Output file path (full path); default: next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// The scale factor to apply when neither width nor height is given
    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,

    /// Resized image height
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    height: Option<i64>,

    /// Resized image width
    #[arg(short = 'W', long, allow_negative_numbers = true)]
    width: Option<i64>,

    /// Number of images to process in parallel (capped at CPU cores)
    #[arg(short, long, default_value_t = 1)]
    jobs: usize,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = 90)]
    quality: u32,

    /// Write a JSON report of every outcome to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Diagnostic log filter (e.g. "debug", "resize_image=trace")
    #[arg(long, default_value = "warn")]
    log: String,
}

impl Cli {
    fn resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            format: self.format.clone(),
            output: self.output.clone(),
            scale: self.scale,
            width: self.width,
            height: self.height,
            delete: self.delete,
            verbose: self.verbose,
            jobs: self.jobs,
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;

    let options = cli.resize_options();
    options.validate()?;

    let codec = RustCodec::new().with_jpeg_quality(Quality::new(cli.quality));
    let store = LocalStore::new();

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });
    let report = {
        // Dropping the reporter closes the channel and lets the printer finish.
        let reporter = ProgressReporter::new(options.verbose, Some(tx));
        BatchRunner::new(&codec, &store, &options, &reporter).run_all(&cli.input)
    };
    printer
        .join()
        .map_err(|_| "progress printer thread panicked")?;
    output::print_summary(&report);

    if let Some(path) = &cli.report {
        std::fs::write(path, output::format_report_json(&options, &report)?)?;
    }

    Ok(if report.all_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Send diagnostics to stderr, filtered by `--log`.
fn init_tracing(filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::EnvFilter;
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
    Ok(())
}
