use crate::decoder::{QrDecoder, RqrrDecoder, decode_fused};
use crate::models::{DecodeCandidate, PreprocessedFrame, RawFrame};
use crate::preprocess::Preprocessor;

/// Output of one frame through the pipeline
#[derive(Debug, Clone)]
pub struct FrameResult {
    /// Binarized variant of the frame
    pub preprocessed: PreprocessedFrame,
    /// Fused decode results, preprocessed path first
    pub candidates: Vec<DecodeCandidate>,
}

impl FrameResult {
    /// Candidate a session acts on
    pub fn first(&self) -> Option<&DecodeCandidate> {
        self.candidates.first()
    }

    /// Consume the result, keeping only the accepted candidate
    pub fn into_first(self) -> Option<DecodeCandidate> {
        self.candidates.into_iter().next()
    }
}

/// Per-frame preprocess and fused decode, shared by live and still-image scans
#[derive(Debug, Clone, Default)]
pub struct FramePipeline<D = RqrrDecoder> {
    preprocessor: Preprocessor,
    decoder: D,
}

impl<D: QrDecoder> FramePipeline<D> {
    /// Create a pipeline
    pub fn new(preprocessor: Preprocessor, decoder: D) -> Self {
        Self { preprocessor, decoder }
    }

    /// Preprocessor in use
    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Run one frame
    pub fn run(&self, frame: &RawFrame) -> FrameResult {
        let preprocessed = self.preprocessor.preprocess(frame);
        let candidates = decode_fused(&self.decoder, frame, &preprocessed);
        if !candidates.is_empty() {
            log::debug!(
                "{} candidate(s) in {}x{} frame",
                candidates.len(),
                frame.width(),
                frame.height()
            );
        }
        FrameResult {
            preprocessed,
            candidates,
        }
    }
}
