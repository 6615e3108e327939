use std::borrow::Cow;
use std::fmt;

/// Which image a candidate was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeSource {
    /// The binarized output of the preprocessor
    Preprocessed,
    /// The original color frame
    Raw,
}

impl fmt::Display for DecodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeSource::Preprocessed => write!(f, "preprocessed"),
            DecodeSource::Raw => write!(f, "raw"),
        }
    }
}

/// A decoded QR payload together with the path that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeCandidate {
    /// Raw payload bytes as stored in the symbol
    pub payload: Vec<u8>,
    /// Image the symbol was found in
    pub source: DecodeSource,
}

impl DecodeCandidate {
    /// Create a candidate
    pub fn new(payload: Vec<u8>, source: DecodeSource) -> Self {
        Self { payload, source }
    }

    /// Payload as text; invalid UTF-8 sequences are replaced
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}
