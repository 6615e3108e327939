//! qr_scanner - single-shot camera QR code scanner
//!
//! Captures frames from a local camera, enhances them for poor lighting,
//! decodes along a binarized and a raw path, and normalizes the first payload
//! found (JSON object or `key:value` list) into a record written to disk.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Camera acquisition over an ordered candidate list
pub mod camera;
/// Session configuration and environment overrides
pub mod config;
/// QR symbol decoding and dual-path fusion
pub mod decoder;
/// Error taxonomy
pub mod error;
/// Core data structures (frames, candidates, records)
pub mod models;
/// Payload text to key/value record
pub mod payload;
/// Per-frame preprocess and decode
pub mod pipeline;
/// Frame enhancement and binarization
pub mod preprocess;
/// Operator preview and cancellation
pub mod preview;
/// Scan session state machine
pub mod scanner;
/// Record persistence
pub mod sink;
/// Helpers for command-line tools
pub mod tools;
/// Image operations (grayscale, contrast, bilateral, threshold)
pub mod utils;

pub use camera::{Backend, CameraCandidate, CameraOpener, FrameSource, Resolution, acquire};
pub use config::ScannerConfig;
pub use decoder::{QrDecoder, RqrrDecoder, decode_fused};
pub use error::{Result, ScanError};
pub use models::{DecodeCandidate, DecodeSource, ParsedRecord, PreprocessedFrame, RawFrame};
pub use payload::parse_payload;
pub use pipeline::{FramePipeline, FrameResult};
pub use preprocess::{PreprocessConfig, Preprocessor, preprocess};
pub use preview::{HeadlessPreview, Preview, compose_preview};
pub use scanner::{ScanOutcome, ScanState, Scanner, scan_still};
pub use sink::{JsonFileSink, RecordSink};
