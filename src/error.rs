use thiserror::Error;

/// Errors raised while acquiring a camera, scanning frames, or persisting a record.
///
/// Recoverable conditions (an unreadable frame, a malformed payload segment)
/// are not represented here: they degrade inside the scan loop and the payload
/// parser instead of aborting the session.
#[derive(Error, Debug)]
pub enum ScanError {
    /// No candidate device/backend pair could be opened.
    #[error("no camera could be opened ({tried} candidates tried)")]
    CameraUnavailable {
        /// Number of candidates probed before giving up.
        tried: usize,
    },

    /// A capture backend failed while opening, configuring, or reading a device.
    #[error("camera backend error: {0}")]
    Camera(String),

    /// The display sink failed.
    #[error("preview error: {0}")]
    Preview(String),

    /// Malformed `index:backend` candidate text.
    #[error("invalid camera candidate: {0}")]
    InvalidCandidate(String),

    /// A pixel buffer whose length does not match its dimensions.
    #[error("frame shape mismatch: {0}")]
    FrameShape(String),

    /// Filesystem error while clearing or writing the record.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image file could not be loaded or saved.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(feature = "opencv")]
impl From<opencv::Error> for ScanError {
    fn from(err: opencv::Error) -> Self {
        ScanError::Camera(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ScanError>;
