//! Single-shot scan session
//!
//! `Initializing -> Scanning -> {Decoded, Cancelled, StreamError}`
//!
//! The session clears the previous result, acquires a camera, then loops
//! read -> preprocess -> fused decode until the first candidate is decoded and
//! persisted, the operator cancels, or the stream fails. The capture handle and
//! the preview are released on every exit.

use crate::camera::{CameraOpener, FrameSource, acquire};
use crate::config::ScannerConfig;
use crate::decoder::{QrDecoder, RqrrDecoder};
use crate::error::Result;
use crate::models::{DecodeCandidate, ParsedRecord, RawFrame};
use crate::payload::parse_payload;
use crate::pipeline::FramePipeline;
use crate::preprocess::Preprocessor;
use crate::preview::{Preview, compose_preview};
use crate::sink::RecordSink;
use std::fmt;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Clearing the old result and probing cameras
    Initializing,
    /// Reading and decoding frames
    Scanning,
    /// A payload was decoded and persisted
    Decoded,
    /// The operator stopped the session
    Cancelled,
    /// The camera could not be acquired or stopped delivering frames
    StreamError,
}

impl ScanState {
    /// True for the three end states
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanState::Decoded | ScanState::Cancelled | ScanState::StreamError)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::Initializing => "initializing",
            ScanState::Scanning => "scanning",
            ScanState::Decoded => "decoded",
            ScanState::Cancelled => "cancelled",
            ScanState::StreamError => "stream error",
        };
        f.write_str(name)
    }
}

/// How a session that reached `Scanning` ended
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// The persisted record
    Decoded(ParsedRecord),
    /// Cancelled from the preview
    Cancelled,
    /// A frame read failed or came back empty
    StreamError,
}

impl ScanOutcome {
    /// Terminal state matching this outcome
    pub fn state(&self) -> ScanState {
        match self {
            ScanOutcome::Decoded(_) => ScanState::Decoded,
            ScanOutcome::Cancelled => ScanState::Cancelled,
            ScanOutcome::StreamError => ScanState::StreamError,
        }
    }

    /// Decoded record, if any
    pub fn record(&self) -> Option<&ParsedRecord> {
        match self {
            ScanOutcome::Decoded(record) => Some(record),
            _ => None,
        }
    }
}

/// Orchestrates one scan session over injected collaborators
pub struct Scanner<O, P, S, D = RqrrDecoder> {
    config: ScannerConfig,
    opener: O,
    preview: P,
    sink: S,
    pipeline: FramePipeline<D>,
    state: ScanState,
}

impl<O, P, S, D> Scanner<O, P, S, D>
where
    O: CameraOpener,
    P: Preview,
    S: RecordSink,
    D: QrDecoder,
{
    /// Create a session; nothing is touched until [`Scanner::run`]
    pub fn new(config: ScannerConfig, opener: O, preview: P, sink: S, decoder: D) -> Self {
        let pipeline = FramePipeline::new(Preprocessor::new(config.preprocess.clone()), decoder);
        Self {
            config,
            opener,
            preview,
            sink,
            pipeline,
            state: ScanState::Initializing,
        }
    }

    /// Current state
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Configuration in use
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Camera opener
    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Display collaborator
    pub fn preview(&self) -> &P {
        &self.preview
    }

    /// Persistence collaborator
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run the session to a terminal state.
    ///
    /// Returns `Err(ScanError::CameraUnavailable)` without scanning when no
    /// candidate opens. Sink and preview failures are returned as errors after
    /// the camera has been released.
    pub fn run(&mut self) -> Result<ScanOutcome> {
        self.state = ScanState::Initializing;
        if let Err(e) = self.sink.clear() {
            log::error!("Could not remove previous result: {}", e);
            self.state = ScanState::StreamError;
            self.preview.close();
            return Err(e);
        }

        let candidates = &self.config.candidates;
        let mut source = match acquire(&mut self.opener, candidates, self.config.resolution) {
            Ok(source) => source,
            Err(e) => {
                self.state = ScanState::StreamError;
                self.preview.close();
                return Err(e);
            }
        };

        self.state = ScanState::Scanning;
        log::info!("Scanning for QR codes, press '{}' to quit", self.config.cancel_key);

        let result = self.scan(&mut source);
        source.release();
        self.preview.close();

        self.state = match &result {
            Ok(outcome) => outcome.state(),
            Err(_) => ScanState::StreamError,
        };
        match &result {
            Ok(outcome) => log::info!("Scan finished: {}", outcome.state()),
            Err(e) => log::error!("Scan aborted: {}", e),
        }
        result
    }

    fn scan(&mut self, source: &mut O::Source) -> Result<ScanOutcome> {
        loop {
            let frame = match source.read_frame() {
                Ok(Some(frame)) if !frame.is_empty() => frame,
                Ok(_) => {
                    log::warn!("Failed to read frame");
                    return Ok(ScanOutcome::StreamError);
                }
                Err(e) => {
                    log::warn!("Failed to read frame: {}", e);
                    return Ok(ScanOutcome::StreamError);
                }
            };

            if let Some(outcome) = self.process_frame(&frame)? {
                return Ok(outcome);
            }
        }
    }

    /// One `Scanning` iteration on an already-read frame.
    ///
    /// Returns the terminal outcome when the frame decoded or the operator
    /// cancelled, `None` to keep scanning.
    pub fn process_frame(&mut self, frame: &RawFrame) -> Result<Option<ScanOutcome>> {
        let result = self.pipeline.run(frame);
        if let Some(candidate) = result.first() {
            let record = accept(candidate, &mut self.sink)?;
            return Ok(Some(ScanOutcome::Decoded(record)));
        }

        let composed = compose_preview(frame, &result.preprocessed, self.config.viewport);
        self.preview.show(&composed)?;
        if self.preview.poll_cancel()? {
            log::info!("Scan cancelled by operator");
            return Ok(Some(ScanOutcome::Cancelled));
        }
        Ok(None)
    }
}

/// Decode a still image and persist its first candidate.
///
/// The previous result is removed first, so `Ok(None)` leaves no output file.
pub fn scan_still<D: QrDecoder, S: RecordSink>(
    pipeline: &FramePipeline<D>,
    frame: &RawFrame,
    sink: &mut S,
) -> Result<Option<ParsedRecord>> {
    sink.clear()?;
    match pipeline.run(frame).into_first() {
        Some(candidate) => accept(&candidate, sink).map(Some),
        None => {
            log::info!("No QR code found");
            Ok(None)
        }
    }
}

fn accept<S: RecordSink + ?Sized>(
    candidate: &DecodeCandidate,
    sink: &mut S,
) -> Result<ParsedRecord> {
    let text = candidate.text();
    log::info!("Decoded data ({} path): {}", candidate.source, text);
    let record = parse_payload(&text);
    sink.write(&record)?;
    Ok(record)
}
