//! Payload sources for the dataset store

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileSource;
pub use memory::MemorySource;

use async_trait::async_trait;

use crate::DataError;

/// Something that can produce a JSON payload to load
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Read the whole payload
    async fn read_payload(&self) -> Result<String, DataError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
