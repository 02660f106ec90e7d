//! Filter descriptors and the active filter set

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::Record;
use crate::value;

/// One level of a hierarchical selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub dimension: String,
    pub value: Value,
}

impl PathStep {
    pub fn new(dimension: impl Into<String>, value: Value) -> Self {
        Self {
            dimension: dimension.into(),
            value,
        }
    }
}

/// One atomic selection produced by a user gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterDescriptor {
    /// A categorical value of one dimension (bar, chord group)
    Category { dimension: String, value: Value },

    /// An entity of a graph (force-directed node)
    Node { dimension: String, value: Value },

    /// A root-to-segment path through nested dimensions
    Hierarchy { path: Vec<PathStep> },

    /// A descriptor of a kind this engine does not know
    #[serde(other)]
    Unrecognized,
}

impl FilterDescriptor {
    /// Convenience constructor for a category selection
    pub fn category(dimension: impl Into<String>, value: Value) -> Self {
        FilterDescriptor::Category {
            dimension: dimension.into(),
            value,
        }
    }

    /// Convenience constructor for a node selection
    pub fn node(dimension: impl Into<String>, value: Value) -> Self {
        FilterDescriptor::Node {
            dimension: dimension.into(),
            value,
        }
    }

    /// Convenience constructor for a hierarchy selection
    pub fn hierarchy(path: Vec<PathStep>) -> Self {
        FilterDescriptor::Hierarchy { path }
    }

    /// Composite identity used for merging and toggling
    ///
    /// `dimension|value`; hierarchy paths join their steps with `/`.
    pub fn key(&self) -> String {
        match self {
            FilterDescriptor::Category { dimension, value }
            | FilterDescriptor::Node { dimension, value } => step_key(dimension, value),
            FilterDescriptor::Hierarchy { path } => path
                .iter()
                .map(|step| step_key(&step.dimension, &step.value))
                .collect::<Vec<_>>()
                .join("/"),
            FilterDescriptor::Unrecognized => "?".to_string(),
        }
    }

    /// A null value (or an empty path) means "clear the selection"
    pub fn is_clear(&self) -> bool {
        match self {
            FilterDescriptor::Category { value, .. } | FilterDescriptor::Node { value, .. } => {
                value.is_null()
            }
            FilterDescriptor::Hierarchy { path } => path.is_empty(),
            FilterDescriptor::Unrecognized => false,
        }
    }

    /// Whether a record satisfies this descriptor
    ///
    /// Unknown kinds never hide data.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            FilterDescriptor::Category { dimension, value }
            | FilterDescriptor::Node { dimension, value } => record.get(dimension) == Some(value),
            FilterDescriptor::Hierarchy { path } => path
                .iter()
                .all(|step| record.get(&step.dimension) == Some(&step.value)),
            FilterDescriptor::Unrecognized => true,
        }
    }

    /// Every `(dimension, value)` pair this descriptor pins down
    pub fn constraints(&self) -> Vec<(&str, &Value)> {
        match self {
            FilterDescriptor::Category { dimension, value }
            | FilterDescriptor::Node { dimension, value } => vec![(dimension.as_str(), value)],
            FilterDescriptor::Hierarchy { path } => path
                .iter()
                .map(|step| (step.dimension.as_str(), &step.value))
                .collect(),
            FilterDescriptor::Unrecognized => Vec::new(),
        }
    }
}

fn step_key(dimension: &str, value: &Value) -> String {
    format!("{}|{}", dimension, value::label(value))
}

/// The AND-combined set of current selections, keyed by descriptor key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilterSet {
    entries: IndexMap<String, FilterDescriptor>,
}

impl ActiveFilterSet {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding exactly one descriptor
    pub fn single(descriptor: FilterDescriptor) -> Self {
        let mut set = Self::new();
        set.entries.insert(descriptor.key(), descriptor);
        set
    }

    /// Insert the descriptor if its key is absent, remove it otherwise
    ///
    /// Returns `true` when the descriptor ended up in the set.
    pub fn toggle(&mut self, descriptor: FilterDescriptor) -> bool {
        let key = descriptor.key();
        if self.entries.shift_remove(&key).is_some() {
            false
        } else {
            self.entries.insert(key, descriptor);
            true
        }
    }

    /// Remove every descriptor
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FilterDescriptor> {
        self.entries.get(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Descriptors in insertion order
    pub fn descriptors(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.entries.values()
    }

    /// AND across every descriptor; an empty set accepts everything
    pub fn matches(&self, record: &Record) -> bool {
        self.entries.values().all(|descriptor| descriptor.matches(record))
    }

    /// Fresh derivation of the records passing every descriptor
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        [
            json!({"Sector": "Tech", "Region": "Asia"}),
            json!({"Sector": "Tech", "Region": "EU"}),
            json!({"Sector": "Finance", "Region": "Asia"}),
        ]
        .into_iter()
        .map(|v| match v {
            Value::Object(map) => Record::new(map),
            _ => unreachable!(),
        })
        .collect()
    }

    #[test]
    fn test_descriptor_keys() {
        assert_eq!(FilterDescriptor::category("Sector", json!("Tech")).key(), "Sector|Tech");
        assert_eq!(FilterDescriptor::node("Company", json!(7)).key(), "Company|7");
        let path = FilterDescriptor::hierarchy(vec![
            PathStep::new("Region", json!("Asia")),
            PathStep::new("Sector", json!("Tech")),
        ]);
        assert_eq!(path.key(), "Region|Asia/Sector|Tech");
    }

    #[test]
    fn test_and_semantics() {
        let mut filters = ActiveFilterSet::new();
        filters.toggle(FilterDescriptor::category("Sector", json!("Tech")));
        filters.toggle(FilterDescriptor::category("Region", json!("Asia")));

        let all = records();
        let filtered = filters.apply(&all);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].same_as(&all[0]));

        for record in &all {
            let expected = filters.descriptors().all(|d| d.matches(record));
            assert_eq!(filters.matches(record), expected);
        }
    }

    #[test]
    fn test_toggle_twice_restores_set() {
        let mut filters =
            ActiveFilterSet::single(FilterDescriptor::category("Region", json!("EU")));
        let before = filters.clone();

        assert!(filters.toggle(FilterDescriptor::category("Sector", json!("Tech"))));
        assert_eq!(filters.len(), 2);
        assert!(!filters.toggle(FilterDescriptor::category("Sector", json!("Tech"))));
        assert_eq!(filters, before);
    }

    #[test]
    fn test_hierarchy_predicate_requires_every_step() {
        let all = records();
        let descriptor = FilterDescriptor::hierarchy(vec![
            PathStep::new("Region", json!("Asia")),
            PathStep::new("Sector", json!("Finance")),
        ]);
        let passing: Vec<_> = all.iter().filter(|r| descriptor.matches(r)).collect();
        assert_eq!(passing.len(), 1);
        assert!(passing[0].same_as(&all[2]));
    }

    #[test]
    fn test_unrecognized_kind_never_hides_data() {
        let descriptor: FilterDescriptor =
            serde_json::from_value(json!({"kind": "brush", "x0": 1, "x1": 3})).unwrap();
        assert_eq!(descriptor, FilterDescriptor::Unrecognized);

        let filters = ActiveFilterSet::single(descriptor);
        assert_eq!(filters.apply(&records()).len(), 3);
    }

    #[test]
    fn test_clear_gestures() {
        assert!(FilterDescriptor::category("Sector", Value::Null).is_clear());
        assert!(FilterDescriptor::hierarchy(Vec::new()).is_clear());
        assert!(!FilterDescriptor::node("Company", json!("Acme")).is_clear());
    }

    #[test]
    fn test_descriptor_serde_shape() {
        let descriptor = FilterDescriptor::category("Sector", json!("Tech"));
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({"kind": "category", "dimension": "Sector", "value": "Tech"})
        );
        let filters = ActiveFilterSet::single(descriptor);
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({"Sector|Tech": {"kind": "category", "dimension": "Sector", "value": "Tech"}})
        );
    }
}
