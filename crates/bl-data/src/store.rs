//! Dataset store: the loaded record set and its dimensions

use std::sync::Arc;

use bl_core::Record;
use serde_json::Value;

use crate::sources::RecordSource;
use crate::{DataError, ParseError};

/// A successfully loaded record set
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[Record]>,
    dimensions: Vec<String>,
    generation: u64,
}

impl Dataset {
    /// Every loaded record, in payload order
    pub fn records(&self) -> &Arc<[Record]> {
        &self.records
    }

    /// Keys of the first record, in that record's order
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Which load produced this dataset
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Handle for one in-flight load
///
/// Only the most recently issued ticket may apply its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of completing a ticketed load
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// The payload replaced the current dataset
    Applied(Dataset),
    /// A newer load was started; nothing changed
    Superseded { ticket: u64, latest: u64 },
}

/// Parse a payload into records and dimensions without touching any state
pub fn parse(raw: &str) -> Result<(Vec<Record>, Vec<String>), ParseError> {
    let value: Value = serde_json::from_str(raw)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(ParseError::NotAnArray),
    };
    if items.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(fields) => records.push(Record::new(fields)),
            _ => return Err(ParseError::NotARecord { index }),
        }
    }

    let dimensions = records[0].dimensions().map(str::to_string).collect();
    Ok((records, dimensions))
}

/// Owner of the session's dataset
#[derive(Debug, Default)]
pub struct DatasetStore {
    current: Option<Dataset>,
    latest_ticket: u64,
}

impl DatasetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded dataset, if any
    pub fn current(&self) -> Option<&Dataset> {
        self.current.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Dimensions of the loaded dataset (empty when nothing is loaded)
    pub fn dimensions(&self) -> &[String] {
        self.current
            .as_ref()
            .map(|d| d.dimensions())
            .unwrap_or_default()
    }

    /// Start a load, superseding every earlier ticket
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        tracing::debug!("Issued load ticket {}", self.latest_ticket);
        LoadTicket {
            generation: self.latest_ticket,
        }
    }

    /// Apply a payload read for `ticket`
    ///
    /// Stale tickets are ignored. A parse failure leaves the current dataset
    /// untouched.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        raw: &str,
    ) -> Result<LoadOutcome, ParseError> {
        if ticket.generation != self.latest_ticket {
            tracing::warn!(
                "Discarding stale load {} (latest is {})",
                ticket.generation,
                self.latest_ticket
            );
            return Ok(LoadOutcome::Superseded {
                ticket: ticket.generation,
                latest: self.latest_ticket,
            });
        }

        self.apply(ticket.generation, raw).map(LoadOutcome::Applied)
    }

    /// Synchronous load of an in-memory payload
    pub fn load(&mut self, raw: &str) -> Result<Dataset, ParseError> {
        let ticket = self.begin_load();
        self.apply(ticket.generation, raw)
    }

    fn apply(&mut self, generation: u64, raw: &str) -> Result<Dataset, ParseError> {
        let (records, dimensions) = parse(raw).map_err(|e| {
            tracing::error!("Failed to load dataset: {}", e);
            e
        })?;

        let dataset = Dataset {
            records: records.into(),
            dimensions,
            generation,
        };
        tracing::info!(
            "Loaded {} records with {} dimensions",
            dataset.len(),
            dataset.dimensions().len()
        );
        self.current = Some(dataset.clone());
        Ok(dataset)
    }

    /// Read a source to completion and apply it
    pub async fn load_from(&mut self, source: &dyn RecordSource) -> Result<LoadOutcome, DataError> {
        let ticket = self.begin_load();
        tracing::info!("Reading {}", source.source_name());
        let payload = source.read_payload().await?;
        Ok(self.complete_load(ticket, &payload)?)
    }
}
