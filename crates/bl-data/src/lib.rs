//! Data loading and dimension mapping for the linked dashboard

pub mod config;
pub mod sources;
pub mod store;

use bl_core::ViewId;
use thiserror::Error;

// Re-exports
pub use config::{
    ChordDims, ChordMapping, DashboardMapping, ForceGraphDims, ForceGraphMapping, RadialBarDims,
    RadialBarMapping, ResolvedMapping, SunburstDims, SunburstMapping,
};
pub use sources::{JsonFileSource, MemorySource, RecordSource};
pub use store::{Dataset, DatasetStore, LoadOutcome, LoadTicket};

/// Errors raised while turning a payload into records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Error parsing JSON: {0}")]
    Malformed(String),

    #[error("JSON must be an array of objects")]
    NotAnArray,

    #[error("JSON array is empty")]
    Empty,

    #[error("Element {index} is not an object")]
    NotARecord { index: usize },
}

impl From<serde_json::Error> for ParseError {
    fn from(error: serde_json::Error) -> Self {
        ParseError::Malformed(error.to_string())
    }
}

/// Errors that block dashboard generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No dataset loaded")]
    NoDataset,

    #[error("{chart}: required dimension '{role}' is not selected")]
    MissingRole { chart: ViewId, role: &'static str },

    #[error("Chord diagram source and target dimensions must be different")]
    SameChordDimensions,

    #[error("{chart}: dimension '{dimension}' selected for '{role}' does not exist")]
    UnknownDimension {
        chart: ViewId,
        role: &'static str,
        dimension: String,
    },
}

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Configuration error: {0}")]
    Config(String),
}
