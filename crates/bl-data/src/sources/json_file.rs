use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::RecordSource;
use crate::DataError;

/// A `.json` file on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source for `path`, rejecting anything that is not a JSON file
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if extension != "json" {
            return Err(DataError::UnsupportedFormat { extension });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn read_payload(&self) -> Result<String, DataError> {
        let payload = tokio::fs::read_to_string(&self.path).await?;
        tracing::debug!("Read {} bytes from {:?}", payload.len(), self.path);
        Ok(payload)
    }

    fn source_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.json")
    }
}
