//! Camera acquisition
//!
//! Device discovery is a prioritized probe over an explicit list of
//! (device index, backend) pairs. The first candidate that reports itself as
//! opened wins; no OS-level enumeration is attempted.

/// OpenCV `videoio` capture backend
#[cfg(feature = "opencv")]
pub mod opencv;

use crate::error::{Result, ScanError};
use crate::models::RawFrame;
use std::fmt;
use std::str::FromStr;

/// Capture interface used to reach a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Let the capture library pick
    Any,
    /// Video4Linux2
    V4l2,
    /// DirectShow
    DShow,
    /// Microsoft Media Foundation
    Msmf,
    /// AVFoundation
    AvFoundation,
    /// GStreamer
    GStreamer,
    /// FFmpeg
    FFmpeg,
}

impl Backend {
    /// Every backend, in declaration order
    pub const ALL: [Backend; 7] = [
        Backend::Any,
        Backend::V4l2,
        Backend::DShow,
        Backend::Msmf,
        Backend::AvFoundation,
        Backend::GStreamer,
        Backend::FFmpeg,
    ];

    /// Lowercase name used in candidate strings
    pub fn name(self) -> &'static str {
        match self {
            Backend::Any => "any",
            Backend::V4l2 => "v4l2",
            Backend::DShow => "dshow",
            Backend::Msmf => "msmf",
            Backend::AvFoundation => "avfoundation",
            Backend::GStreamer => "gstreamer",
            Backend::FFmpeg => "ffmpeg",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Backend::ALL
            .into_iter()
            .find(|b| b.name() == wanted)
            .ok_or_else(|| ScanError::InvalidCandidate(format!("unknown backend {:?}", s.trim())))
    }
}

/// One (device index, backend) pair to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraCandidate {
    /// Device index; `-1` asks the backend for its first available device
    pub index: i32,
    /// Capture interface
    pub backend: Backend,
}

impl CameraCandidate {
    /// Create a candidate
    pub const fn new(index: i32, backend: Backend) -> Self {
        Self { index, backend }
    }
}

impl fmt::Display for CameraCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.backend)
    }
}

impl FromStr for CameraCandidate {
    type Err = ScanError;

    /// Parse `index:backend`, e.g. `0:v4l2` or `-1:any`
    fn from_str(s: &str) -> Result<Self> {
        let (index, backend) = s.split_once(':').ok_or_else(|| {
            ScanError::InvalidCandidate(format!("expected index:backend, got {:?}", s))
        })?;
        let index = index.trim().parse::<i32>().map_err(|e| {
            ScanError::InvalidCandidate(format!("bad device index {:?}: {}", index.trim(), e))
        })?;
        Ok(Self::new(index, backend.parse()?))
    }
}

/// Frame size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Create a resolution
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An open, exclusively owned capture handle
pub trait FrameSource {
    /// Read the next frame; `Ok(None)` when the device returned nothing
    fn read_frame(&mut self) -> Result<Option<RawFrame>>;

    /// Ask the device for a capture size. Best effort; frames may still arrive
    /// at another size.
    fn request_resolution(&mut self, resolution: Resolution) -> Result<()>;

    /// Release the device. Calling it more than once is a no-op.
    fn release(&mut self);
}

/// Opens capture handles for individual candidates
pub trait CameraOpener {
    /// Handle type produced on success
    type Source: FrameSource;

    /// Try one candidate.
    ///
    /// Returns `Ok(None)` when the device reports itself as not opened.
    /// Implementations release any half-opened handle before returning
    /// `Ok(None)` or an error.
    fn open(&mut self, candidate: &CameraCandidate) -> Result<Option<Self::Source>>;
}

/// Probe `candidates` in order and return the first opened handle.
///
/// Open errors are logged and the next candidate is tried. After a handle is
/// acquired, `resolution` is requested; a refusal is logged and ignored.
pub fn acquire<O: CameraOpener + ?Sized>(
    opener: &mut O,
    candidates: &[CameraCandidate],
    resolution: Resolution,
) -> Result<O::Source> {
    for candidate in candidates {
        match opener.open(candidate) {
            Ok(Some(mut source)) => {
                log::info!("Camera opened at index {} ({})", candidate.index, candidate.backend);
                if let Err(e) = source.request_resolution(resolution) {
                    log::warn!("Could not request {} capture: {}", resolution, e);
                }
                return Ok(source);
            }
            Ok(None) => {
                log::warn!(
                    "Failed to open camera at index {} ({})",
                    candidate.index,
                    candidate.backend
                );
            }
            Err(e) => {
                log::warn!(
                    "Error opening camera at index {} ({}): {}",
                    candidate.index,
                    candidate.backend,
                    e
                );
            }
        }
    }

    log::error!("No camera found after trying {} candidates", candidates.len());
    Err(ScanError::CameraUnavailable {
        tried: candidates.len(),
    })
}
