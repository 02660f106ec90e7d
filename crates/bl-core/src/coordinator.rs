//! Selection coordinator: the single owner of the active filter set

use std::sync::Arc;

use crate::events::Interaction;
use crate::filter::ActiveFilterSet;
use crate::record::Record;
use crate::view::ViewId;

/// Outcome of one handled interaction, ready to be broadcast
#[derive(Debug, Clone)]
pub struct Selection {
    pub origin: ViewId,
    pub filters: ActiveFilterSet,
    pub filtered: Vec<Record>,
    /// A multi-select gesture removed the originator's own selection
    pub retracted: bool,
}

/// Converts interactions into filter state and filtered records
pub struct SelectionCoordinator {
    records: Arc<[Record]>,
    filters: ActiveFilterSet,
}

impl SelectionCoordinator {
    /// Create a coordinator over a dataset, with nothing selected
    pub fn new(records: Arc<[Record]>) -> Self {
        Self {
            records,
            filters: ActiveFilterSet::new(),
        }
    }

    /// The current filter state
    pub fn filters(&self) -> &ActiveFilterSet {
        &self.filters
    }

    /// The full record set the coordinator filters
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records passing the current filter state
    pub fn filtered(&self) -> Vec<Record> {
        self.filters.apply(&self.records)
    }

    /// Forget every selection
    pub fn reset(&mut self) {
        self.filters.clear();
    }

    /// Merge an interaction into the filter state
    ///
    /// Multi-select gestures toggle the descriptor's key, plain gestures
    /// replace the whole set. A clear gesture always empties the set.
    pub fn handle_interaction(&mut self, interaction: Interaction) -> Selection {
        let Interaction {
            origin,
            descriptor,
            modifiers,
        } = interaction;
        let key = descriptor.key();
        let mut retracted = false;

        if descriptor.is_clear() {
            tracing::debug!("Clear gesture from {}", origin);
            self.filters.clear();
        } else if modifiers.is_multi_select() {
            let added = self.filters.toggle(descriptor);
            retracted = !added;
            tracing::debug!(
                "Toggled '{}' {} from {}",
                key,
                if added { "on" } else { "off" },
                origin
            );
        } else {
            tracing::debug!("Replaced selection with '{}' from {}", key, origin);
            self.filters = ActiveFilterSet::single(descriptor);
        }

        let filtered = self.filtered();
        tracing::debug!(
            "Active filters: {:?}, {} of {} records pass",
            self.filters.keys().collect::<Vec<_>>(),
            filtered.len(),
            self.records.len()
        );

        Selection {
            origin,
            filters: self.filters.clone(),
            filtered,
            retracted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Modifiers;
    use crate::filter::FilterDescriptor;
    use serde_json::{json, Value};

    fn records() -> Arc<[Record]> {
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

    fn click(view: ViewId, descriptor: FilterDescriptor, modifiers: Modifiers) -> Interaction {
        Interaction::new(view, descriptor, modifiers)
    }

    #[test]
    fn test_single_select_filters_records() {
        let all = records();
        let mut coordinator = SelectionCoordinator::new(all.clone());

        let selection = coordinator.handle_interaction(click(
            ViewId::RadialBar,
            FilterDescriptor::category("Sector", json!("Tech")),
            Modifiers::NONE,
        ));

        assert_eq!(selection.origin, ViewId::RadialBar);
        assert_eq!(selection.filters.keys().collect::<Vec<_>>(), vec!["Sector|Tech"]);
        assert_eq!(selection.filtered.len(), 2);
        assert!(selection.filtered[0].same_as(&all[0]));
        assert!(selection.filtered[1].same_as(&all[1]));
    }

    #[test]
    fn test_single_select_replaces_existing_set() {
        let mut coordinator = SelectionCoordinator::new(records());
        coordinator.handle_interaction(click(
            ViewId::RadialBar,
            FilterDescriptor::category("Sector", json!("Tech")),
            Modifiers::CTRL,
        ));
        coordinator.handle_interaction(click(
            ViewId::Chord,
            FilterDescriptor::category("Region", json!("Asia")),
            Modifiers::CTRL,
        ));
        assert_eq!(coordinator.filters().len(), 2);

        let finance = FilterDescriptor::category("Sector", json!("Finance"));
        let selection = coordinator.handle_interaction(click(
            ViewId::Sunburst,
            finance.clone(),
            Modifiers::NONE,
        ));

        assert_eq!(selection.filters, ActiveFilterSet::single(finance));
        assert_eq!(selection.filtered.len(), 1);
    }

    #[test]
    fn test_multi_select_toggle_round_trip() {
        let mut coordinator = SelectionCoordinator::new(records());
        coordinator.handle_interaction(click(
            ViewId::RadialBar,
            FilterDescriptor::category("Sector", json!("Tech")),
            Modifiers::NONE,
        ));
        let before = coordinator.filters().clone();

        let region = FilterDescriptor::category("Region", json!("Asia"));
        let on =
            coordinator.handle_interaction(click(ViewId::Chord, region.clone(), Modifiers::CTRL));
        assert_eq!(on.filters.len(), 2);
        assert_eq!(on.filtered.len(), 1);
        assert!(!on.retracted);

        let off = coordinator.handle_interaction(click(ViewId::Chord, region, Modifiers::CTRL));
        assert_eq!(off.filters, before);
        assert_eq!(off.filtered.len(), 2);
        assert!(off.retracted);
    }

    #[test]
    fn test_clear_gesture_empties_set() {
        let mut coordinator = SelectionCoordinator::new(records());
        coordinator.handle_interaction(click(
            ViewId::RadialBar,
            FilterDescriptor::category("Sector", json!("Tech")),
            Modifiers::NONE,
        ));

        let selection = coordinator.handle_interaction(click(
            ViewId::RadialBar,
            FilterDescriptor::category("Sector", Value::Null),
            Modifiers::CTRL,
        ));
        assert!(selection.filters.is_empty());
        assert_eq!(selection.filtered.len(), 3);
    }

    #[test]
    fn test_reset() {
        let mut coordinator = SelectionCoordinator::new(records());
        coordinator.handle_interaction(click(
            ViewId::ForceDirected,
            FilterDescriptor::node("Region", json!("EU")),
            Modifiers::NONE,
        ));
        assert_eq!(coordinator.filtered().len(), 1);
        coordinator.reset();
        assert!(coordinator.filters().is_empty());
        assert_eq!(coordinator.filtered().len(), 3);
    }
}
