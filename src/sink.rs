//! Persistence of the decoded record

use crate::error::Result;
use crate::models::ParsedRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Destination of the one record a session produces
pub trait RecordSink {
    /// Remove any result left by an earlier session
    fn clear(&mut self) -> Result<()>;

    /// Persist `record`, replacing prior content
    fn write(&mut self, record: &ParsedRecord) -> Result<()>;
}

/// Writes the record as a pretty JSON object at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for JsonFileSink {
    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Removed previous result {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, record: &ParsedRecord) -> Result<()> {
        fs::write(&self.path, record.to_pretty_json()?)?;
        log::info!("Data saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_clear_missing_file_is_ok() {
        let dir = tempdir().unwrap();
        let mut sink = JsonFileSink::new(dir.path().join("decoded.json"));
        sink.clear().unwrap();
        assert!(!sink.path().exists());
    }

    #[test]
    fn test_clear_removes_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("decoded.json");
        fs::write(&path, "{\"stale\": true}").unwrap();
        JsonFileSink::new(&path).clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_write_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("decoded.json");
        let mut sink = JsonFileSink::new(&path);
        let record: ParsedRecord = [("id", "42"), ("name", "Alice")].into_iter().collect();
        sink.write(&record).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n    \"id\": \"42\",\n    \"name\": \"Alice\"\n}");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("decoded.json");
        fs::write(&path, "previous content that is longer than the record").unwrap();
        let mut sink = JsonFileSink::new(&path);
        sink.write(&ParsedRecord::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
