use clap::{Parser, Subcommand};
use qr_scanner::tools::{binary_stats, grayscale_stats, load_frame, save_preprocessed};
use qr_scanner::{
    CameraCandidate, FramePipeline, JsonFileSink, Preprocessor, RqrrDecoder, ScannerConfig,
    parse_payload, scan_still,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

/// Exit status of `image` when the picture holds no readable QR code
const EXIT_NOT_FOUND: u8 = 2;

#[derive(Parser)]
#[command(name = "qrscan", version, about = "Scan one QR code and save its payload as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan from a camera until one QR code is decoded or the operator quits
    Scan {
        /// Output file (default: decoded.json, or QR_SCAN_OUTPUT)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Camera to probe, in order; repeatable (e.g. --candidate 0:v4l2)
        #[arg(long = "candidate", value_name = "IDX:BACKEND")]
        candidates: Vec<CameraCandidate>,
        /// No preview window; stop with Ctrl-C
        #[arg(long)]
        headless: bool,
    },
    /// Decode a still image and save its payload
    Image {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write the binarized image and print frame statistics
    Preprocess {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the record a payload string parses to
    Parse { text: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            output,
            candidates,
            headless,
        } => scan_cmd(output, candidates, headless),
        Command::Image { path, output } => image_cmd(&path, output),
        Command::Preprocess { path, out } => preprocess_cmd(&path, &out),
        Command::Parse { text } => parse_cmd(&text),
    }
}

fn session_config(output: Option<PathBuf>, candidates: Vec<CameraCandidate>) -> ScannerConfig {
    let mut config = ScannerConfig::from_env();
    if let Some(output) = output {
        config = config.with_output_path(output);
    }
    if !candidates.is_empty() {
        config = config.with_candidates(candidates);
    }
    config
}

fn scan_cmd(output: Option<PathBuf>, candidates: Vec<CameraCandidate>, headless: bool) -> ExitCode {
    let config = session_config(output, candidates);
    run_camera_session(config, headless)
}

#[cfg(feature = "opencv")]
fn run_camera_session(config: ScannerConfig, headless: bool) -> ExitCode {
    use qr_scanner::camera::opencv::OpenCvOpener;
    use qr_scanner::preview::opencv::OpenCvPreview;
    use qr_scanner::{HeadlessPreview, ScanError, ScanOutcome, Scanner};
    use std::sync::atomic::Ordering;

    let sink = JsonFileSink::new(&config.output_path);
    let result = if headless {
        let preview = HeadlessPreview::new();
        let cancel = preview.cancel_flag();
        if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
            log::warn!("Could not install Ctrl-C handler: {}", e);
        }
        Scanner::new(config, OpenCvOpener, preview, sink, RqrrDecoder::new()).run()
    } else {
        let preview = OpenCvPreview::new("QR Scanner", config.cancel_key);
        Scanner::new(config, OpenCvOpener, preview, sink, RqrrDecoder::new()).run()
    };

    match result {
        Ok(ScanOutcome::Decoded(record)) => {
            println!("{} field(s) decoded", record.len());
            ExitCode::SUCCESS
        }
        Ok(ScanOutcome::Cancelled | ScanOutcome::StreamError) => ExitCode::SUCCESS,
        Err(ScanError::CameraUnavailable { .. }) => {
            log::error!("No camera found. Exiting.");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "opencv"))]
fn run_camera_session(config: ScannerConfig, _headless: bool) -> ExitCode {
    log::error!(
        "Camera capture is not compiled in (rebuild with --features opencv); \
         {} candidate(s) not tried",
        config.candidates.len()
    );
    ExitCode::FAILURE
}

fn image_cmd(path: &Path, output: Option<PathBuf>) -> ExitCode {
    let config = session_config(output, Vec::new());
    let frame = match load_frame(path) {
        Ok(frame) => frame,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let preprocessor = Preprocessor::new(config.preprocess.clone());
    let pipeline = FramePipeline::new(preprocessor, RqrrDecoder::new());
    let mut sink = JsonFileSink::new(&config.output_path);
    let start = Instant::now();
    let result = scan_still(&pipeline, &frame, &mut sink);
    log::debug!("Decoded {} in {:.2?}", path.display(), start.elapsed());

    match result {
        Ok(Some(record)) => {
            println!("{} field(s) saved to {}", record.len(), config.output_path.display());
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::from(EXIT_NOT_FOUND),
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn preprocess_cmd(path: &Path, out: &Path) -> ExitCode {
    let frame = match load_frame(path) {
        Ok(frame) => frame,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let stages = Preprocessor::default().preprocess_stages(&frame);
    let elapsed = start.elapsed();

    let gray = grayscale_stats(stages.gray.as_raw());
    let enhanced = grayscale_stats(stages.enhanced.as_raw());
    let binary = binary_stats(&stages.binary);
    println!("Image: {} ({}x{})", path.display(), frame.width(), frame.height());
    println!("Gray stats: min={} max={} avg={}", gray.min, gray.max, gray.avg);
    println!("Enhanced stats: min={} max={} avg={}", enhanced.min, enhanced.max, enhanced.avg);
    println!(
        "Binary stats: black={} / {} ({:.2}%)",
        binary.black_pixels,
        binary.total_pixels,
        binary.black_ratio * 100.0
    );
    println!("Preprocess time: {:.2?}", elapsed);

    match save_preprocessed(&stages.binary, out) {
        Ok(()) => {
            println!("Binarized image saved to {}", out.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to save {}: {}", out.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn parse_cmd(text: &str) -> ExitCode {
    match parse_payload(text).to_pretty_json() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
