use crate::camera::{Backend, CameraCandidate, Resolution};
use crate::error::Result;
use crate::preprocess::PreprocessConfig;
use std::path::PathBuf;

/// Environment variable overriding [`ScannerConfig::output_path`]
pub const ENV_OUTPUT: &str = "QR_SCAN_OUTPUT";
/// Environment variable overriding [`ScannerConfig::candidates`] (`0:v4l2,1:any`)
pub const ENV_CANDIDATES: &str = "QR_SCAN_CANDIDATES";

/// Probe order used when nothing else is configured
pub const DEFAULT_CANDIDATES: [CameraCandidate; 5] = [
    CameraCandidate::new(0, Backend::Any),
    CameraCandidate::new(0, Backend::V4l2),
    CameraCandidate::new(0, Backend::DShow),
    CameraCandidate::new(1, Backend::V4l2),
    CameraCandidate::new(-1, Backend::Any),
];

/// Everything a scan session needs to know up front
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    /// Where the decoded record is written
    pub output_path: PathBuf,
    /// Devices to probe, in order
    pub candidates: Vec<CameraCandidate>,
    /// Capture size requested after acquisition
    pub resolution: Resolution,
    /// Size of each half of the preview
    pub viewport: Resolution,
    /// Key that cancels the session from the preview window
    pub cancel_key: char,
    /// Preprocessing parameters
    pub preprocess: PreprocessConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("decoded.json"),
            candidates: DEFAULT_CANDIDATES.to_vec(),
            resolution: Resolution::new(1280, 720),
            viewport: Resolution::new(640, 480),
            cancel_key: 'q',
            preprocess: PreprocessConfig::default(),
        }
    }
}

impl ScannerConfig {
    /// Defaults with overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults with overrides from `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = parse_env_path(&lookup, ENV_OUTPUT) {
            config.output_path = path;
        }
        if let Some(candidates) = parse_env_candidates(&lookup, ENV_CANDIDATES) {
            config.candidates = candidates;
        }
        config
    }

    /// Set the output path
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Set the probe order
    pub fn with_candidates(mut self, candidates: Vec<CameraCandidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Set the requested capture size
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the per-side preview size
    pub fn with_viewport(mut self, viewport: Resolution) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the cancel key
    pub fn with_cancel_key(mut self, key: char) -> Self {
        self.cancel_key = key;
        self
    }

    /// Set the preprocessing parameters
    pub fn with_preprocess(mut self, preprocess: PreprocessConfig) -> Self {
        self.preprocess = preprocess;
        self
    }
}

/// Parse a comma-separated `index:backend` list
pub fn parse_candidate_list(text: &str) -> Result<Vec<CameraCandidate>> {
    text.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}

fn parse_env_path<F>(lookup: &F, name: &str) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)?;
    let value = value.trim();
    if value.is_empty() {
        log::warn!("Ignoring empty {}", name);
        return None;
    }
    Some(PathBuf::from(value))
}

fn parse_env_candidates<F>(lookup: &F, name: &str) -> Option<Vec<CameraCandidate>>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)?;
    match parse_candidate_list(&value) {
        Ok(list) if !list.is_empty() => Some(list),
        Ok(_) => {
            log::warn!("Ignoring {}: no candidates listed", name);
            None
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", name, e);
            None
        }
    }
}
