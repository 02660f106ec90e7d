use async_trait::async_trait;

use super::RecordSource;
use crate::DataError;

/// A payload already held in memory, such as pasted text or a bundled sample
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    payload: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn read_payload(&self) -> Result<String, DataError> {
        Ok(self.payload.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
