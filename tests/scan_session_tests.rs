//! Integration tests for complete scan sessions
//!
//! Sessions run against scripted cameras and a headless preview, with a real
//! `JsonFileSink` in a temporary directory. One camera delivers a frame with a
//! genuine QR symbol so the full preprocess, fused decode, parse and persist
//! chain is exercised end to end.

use image::{GrayImage, Rgb, RgbImage};
use qr_scanner::{
    CameraCandidate, CameraOpener, FrameSource, HeadlessPreview, JsonFileSink, Preview, QrDecoder,
    RawFrame, Resolution, RqrrDecoder, ScanError, ScanOutcome, ScanState, Scanner, ScannerConfig,
};
use qrcodegen::{QrCode, QrCodeEcc};
use std::cell::Cell;
use std::collections::VecDeque;
use std::fs;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use tempfile::tempdir;

const PAYLOAD: &str = r#"{"data":{"id":"42","name":"Alice"}}"#;
const EXPECTED_JSON: &str = "{\n    \"id\": \"42\",\n    \"name\": \"Alice\"\n}";

/// Render `text` as a QR symbol centered on a white frame.
fn qr_frame(text: &str, width: u32, height: u32, module_px: u32) -> RawFrame {
    let qr = QrCode::encode_text(text, QrCodeEcc::Low).unwrap();
    let modules = qr.size() as u32;
    let side = (modules + 8) * module_px;
    assert!(side <= width && side <= height, "symbol does not fit the frame");

    let left = (width - modules * module_px) / 2;
    let top = (height - modules * module_px) / 2;
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for my in 0..modules {
        for mx in 0..modules {
            if !qr.get_module(mx as i32, my as i32) {
                continue;
            }
            for dy in 0..module_px {
                for dx in 0..module_px {
                    let (x, y) = (left + mx * module_px + dx, top + my * module_px + dy);
                    img.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
        }
    }
    RawFrame::new(img)
}

fn blank_frame() -> RawFrame {
    RawFrame::new(RgbImage::from_pixel(64, 48, Rgb([180, 180, 180])))
}

/// Counts handles that were created but not yet released.
#[derive(Clone, Default)]
struct HandleLedger {
    live: Rc<Cell<i32>>,
    opened: Rc<Cell<u32>>,
    reads: Rc<Cell<u32>>,
}

struct ScriptedCamera {
    frames: VecDeque<RawFrame>,
    ledger: HandleLedger,
    released: bool,
}

impl FrameSource for ScriptedCamera {
    fn read_frame(&mut self) -> qr_scanner::Result<Option<RawFrame>> {
        self.ledger.reads.set(self.ledger.reads.get() + 1);
        Ok(self.frames.pop_front())
    }

    fn request_resolution(&mut self, _resolution: Resolution) -> qr_scanner::Result<()> {
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.ledger.live.set(self.ledger.live.get() - 1);
        }
    }
}

/// Opens nothing until `working_from`; earlier candidates open half-way and
/// report failure after releasing their handle.
struct ScriptedOpener {
    frames: Option<Vec<RawFrame>>,
    working_from: usize,
    attempts: usize,
    ledger: HandleLedger,
}

impl ScriptedOpener {
    fn new(frames: Vec<RawFrame>, working_from: usize) -> Self {
        Self {
            frames: Some(frames),
            working_from,
            attempts: 0,
            ledger: HandleLedger::default(),
        }
    }

    fn broken() -> Self {
        Self::new(Vec::new(), usize::MAX)
    }
}

impl CameraOpener for ScriptedOpener {
    type Source = ScriptedCamera;

    fn open(
        &mut self,
        _candidate: &CameraCandidate,
    ) -> qr_scanner::Result<Option<ScriptedCamera>> {
        let attempt = self.attempts;
        self.attempts += 1;

        let mut camera = ScriptedCamera {
            frames: VecDeque::new(),
            ledger: self.ledger.clone(),
            released: false,
        };
        self.ledger.live.set(self.ledger.live.get() + 1);

        if attempt < self.working_from {
            camera.release();
            return Ok(None);
        }
        self.ledger.opened.set(self.ledger.opened.get() + 1);
        camera.frames = self.frames.take().unwrap_or_default().into();
        Ok(Some(camera))
    }
}

fn session_config(dir: &std::path::Path) -> ScannerConfig {
    ScannerConfig::default()
        .with_output_path(dir.join("decoded.json"))
        .with_viewport(Resolution::new(64, 48))
}

#[test]
fn test_decodes_real_qr_and_replaces_stale_result() {
    let dir = tempdir().unwrap();
    let config = session_config(dir.path());
    let output = config.output_path.clone();
    fs::write(&output, "{\"stale\": true}").unwrap();

    let opener = ScriptedOpener::new(vec![qr_frame(PAYLOAD, 320, 240, 6)], 0);
    let ledger = opener.ledger.clone();
    let sink = JsonFileSink::new(&output);
    let preview = HeadlessPreview::new();
    let mut scanner = Scanner::new(config, opener, preview, sink, RqrrDecoder::new());

    let outcome = scanner.run().unwrap();
    let record = outcome.record().expect("decoded record");
    assert_eq!(record.get_str("id"), Some("42"));
    assert_eq!(record.get_str("name"), Some("Alice"));
    assert_eq!(record.len(), 2);
    assert_eq!(scanner.state(), ScanState::Decoded);

    assert_eq!(fs::read_to_string(&output).unwrap(), EXPECTED_JSON);
    assert_eq!(ledger.live.get(), 0);
    assert!(scanner.preview().is_closed());
}

#[test]
fn test_decodes_after_blank_frames_and_failed_candidates() {
    let dir = tempdir().unwrap();
    let config = session_config(dir.path());
    let output = config.output_path.clone();

    let frames = vec![blank_frame(), blank_frame(), qr_frame("id:7, name : Bob", 320, 240, 6)];
    let opener = ScriptedOpener::new(frames, 3);
    let ledger = opener.ledger.clone();
    let sink = JsonFileSink::new(&output);
    let mut scanner = Scanner::new(config, opener, HeadlessPreview::new(), sink, RqrrDecoder);

    let outcome = scanner.run().unwrap();
    assert_eq!(outcome.record().and_then(|r| r.get_str("name")), Some("Bob"));
    assert_eq!(scanner.opener().attempts, 4);
    assert_eq!(scanner.preview().frames_shown(), 2);
    assert_eq!(ledger.opened.get(), 1);
    assert_eq!(ledger.live.get(), 0);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "{\n    \"id\": \"7\",\n    \"name\": \"Bob\"\n}"
    );
}

#[test]
fn test_camera_unavailable_writes_nothing() {
    let dir = tempdir().unwrap();
    let config = session_config(dir.path());
    let output = config.output_path.clone();
    fs::write(&output, "{\"stale\": true}").unwrap();

    let opener = ScriptedOpener::broken();
    let ledger = opener.ledger.clone();
    let sink = JsonFileSink::new(&output);
    let mut scanner = Scanner::new(config, opener, HeadlessPreview::new(), sink, RqrrDecoder);

    let err = scanner.run().err().expect("acquisition must fail");
    assert!(matches!(err, ScanError::CameraUnavailable { tried: 5 }));
    assert_ne!(scanner.state(), ScanState::Scanning);
    assert_eq!(scanner.opener().attempts, 5);
    assert_eq!(ledger.reads.get(), 0);
    assert_eq!(ledger.live.get(), 0);
    assert_eq!(scanner.preview().frames_shown(), 0);
    assert!(!output.exists());
}

/// A display that cannot be opened
struct UnavailableDisplay {
    closed: bool,
}

impl Preview for UnavailableDisplay {
    fn show(&mut self, _image: &RgbImage) -> qr_scanner::Result<()> {
        Err(ScanError::Preview("cannot open display".into()))
    }

    fn poll_cancel(&mut self) -> qr_scanner::Result<bool> {
        Ok(false)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[test]
fn test_display_failure_still_clears_stale_result() {
    let dir = tempdir().unwrap();
    let config = session_config(dir.path());
    let output = config.output_path.clone();
    fs::write(&output, "{\"stale\": true}").unwrap();

    let opener = ScriptedOpener::new(vec![blank_frame(), blank_frame()], 0);
    let ledger = opener.ledger.clone();
    let preview = UnavailableDisplay { closed: false };
    let sink = JsonFileSink::new(&output);
    let mut scanner = Scanner::new(config, opener, preview, sink, RqrrDecoder);

    let err = scanner.run().err().expect("display failure is reported");
    assert!(matches!(err, ScanError::Preview(_)));
    assert_eq!(scanner.state(), ScanState::StreamError);
    assert!(scanner.preview().closed);
    assert_eq!(ledger.opened.get(), 1);
    assert_eq!(ledger.reads.get(), 1);
    assert_eq!(ledger.live.get(), 0);
    assert!(!output.exists());
}

#[test]
fn test_cancel_leaves_no_result() {
    let dir = tempdir().unwrap();
    let config = session_config(dir.path());
    let output = config.output_path.clone();
    fs::write(&output, "{\"stale\": true}").unwrap();

    let preview = HeadlessPreview::new();
    preview.cancel_flag().store(true, Ordering::SeqCst);
    let opener = ScriptedOpener::new(vec![blank_frame(), qr_frame(PAYLOAD, 320, 240, 6)], 0);
    let ledger = opener.ledger.clone();
    let sink = JsonFileSink::new(&output);
    let mut scanner = Scanner::new(config, opener, preview, sink, RqrrDecoder);

    assert_eq!(scanner.run().unwrap(), ScanOutcome::Cancelled);
    assert_eq!(ledger.reads.get(), 1);
    assert_eq!(ledger.live.get(), 0);
    assert!(!output.exists());
}

#[test]
fn test_stream_end_releases_camera() {
    let dir = tempdir().unwrap();
    let config = session_config(dir.path());
    let output = config.output_path.clone();

    let opener = ScriptedOpener::new(vec![blank_frame(), blank_frame()], 0);
    let ledger = opener.ledger.clone();
    let sink = JsonFileSink::new(&output);
    let mut scanner = Scanner::new(config, opener, HeadlessPreview::new(), sink, RqrrDecoder);

    assert_eq!(scanner.run().unwrap(), ScanOutcome::StreamError);
    assert_eq!(scanner.state(), ScanState::StreamError);
    assert_eq!(scanner.preview().frames_shown(), 2);
    assert_eq!(ledger.reads.get(), 3);
    assert_eq!(ledger.live.get(), 0);
    assert!(!output.exists());
}

/// Names the path an image came from: binarized frames of a uniform scene are
/// all white, raw luma of the test frame is mid-gray.
struct PathNamingDecoder;

impl QrDecoder for PathNamingDecoder {
    fn decode(&self, image: &GrayImage) -> Vec<Vec<u8>> {
        match image.get_pixel(0, 0)[0] {
            255 => vec![b"path:preprocessed".to_vec()],
            _ => vec![b"path:raw".to_vec()],
        }
    }
}

#[test]
fn test_preprocessed_candidate_wins() {
    let dir = tempdir().unwrap();
    let config = session_config(dir.path());
    let output = config.output_path.clone();

    let frame = RawFrame::new(RgbImage::from_pixel(40, 30, Rgb([128, 128, 128])));
    let opener = ScriptedOpener::new(vec![frame], 0);
    let mut scanner = Scanner::new(
        config,
        opener,
        HeadlessPreview::new(),
        JsonFileSink::new(&output),
        PathNamingDecoder,
    );

    let outcome = scanner.run().unwrap();
    let path = outcome.record().and_then(|r| r.get_str("path"));
    assert_eq!(path, Some("preprocessed"));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "{\n    \"path\": \"preprocessed\"\n}"
    );
}
