//! Dataset records

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// One immutable record of the loaded dataset
///
/// Cloning is cheap: the field map is shared, so filtered subsequences hold
/// the very same records as the full set.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Arc<Map<String, Value>>);

impl Record {
    /// Wrap a JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(Arc::new(fields))
    }

    /// Look up a dimension; missing keys read as absent
    pub fn get(&self, dimension: &str) -> Option<&Value> {
        self.0.get(dimension)
    }

    /// Dimension names in the record's own key order
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Access the underlying field map
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether two handles point at the same loaded record
    pub fn same_as(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
