//! Dispatch loop: pushes selection changes to every linked view

use crate::coordinator::Selection;
use crate::filter::ActiveFilterSet;
use crate::record::Record;
use crate::view::{ViewAdapter, ViewId};

/// What a broadcast did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Views whose `update` ran, in registration order
    pub updated: Vec<ViewId>,
    /// Whether every view was reset instead
    pub cleared: bool,
}

/// Registry of live views and the broadcast over them
pub struct Dispatcher<V: ?Sized + ViewAdapter = dyn ViewAdapter> {
    views: Vec<Box<V>>,
}

impl<V: ?Sized + ViewAdapter> Dispatcher<V> {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    /// Register a view, replacing any view already in the same slot
    pub fn register(&mut self, view: Box<V>) {
        let id = view.id();
        if let Some(existing) = self.views.iter_mut().find(|v| v.id() == id) {
            tracing::debug!("Replacing view {}", id);
            *existing = view;
        } else {
            self.views.push(view);
        }
    }

    pub fn get(&self, id: ViewId) -> Option<&V> {
        self.views.iter().find(|v| v.id() == id).map(|v| &**v)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut V> {
        self.views.iter_mut().find(|v| v.id() == id).map(|v| &mut **v)
    }

    /// Registered views in registration order
    pub fn views(&self) -> impl Iterator<Item = &V> {
        self.views.iter().map(|v| &**v)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Reset every view's highlighting
    pub fn clear_all(&mut self) {
        for view in self.views.iter_mut() {
            view.clear_highlight();
        }
    }

    /// Push a new filter state to the linked views
    ///
    /// The originating view already shows its own gesture and is skipped.
    /// An empty filter set resets every view, originator included, and no
    /// view is updated.
    pub fn broadcast(
        &mut self,
        origin: ViewId,
        filters: &ActiveFilterSet,
        filtered: &[Record],
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        if filters.is_empty() {
            self.clear_all();
            report.cleared = true;
            tracing::debug!("No active filters, reset {} views", self.views.len());
            return report;
        }

        for view in self.views.iter_mut().filter(|v| v.id() != origin) {
            view.update(filtered, filters);
            report.updated.push(view.id());
        }

        tracing::debug!(
            "Broadcast from {} updated {:?} with {} records",
            origin,
            report.updated,
            filtered.len()
        );
        report
    }

    /// Broadcast a coordinator outcome
    ///
    /// When the originator toggled its own selection off, its local feedback
    /// is stale, so it is updated along with the others.
    pub fn dispatch(&mut self, selection: &Selection) -> DispatchReport {
        let mut report =
            self.broadcast(selection.origin, &selection.filters, &selection.filtered);
        if selection.retracted && !report.cleared {
            if let Some(view) = self.get_mut(selection.origin) {
                view.update(&selection.filtered, &selection.filters);
                report.updated.push(selection.origin);
            }
        }
        report
    }
}

impl<V: ?Sized + ViewAdapter> Default for Dispatcher<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::SelectionCoordinator;
    use crate::events::{Interaction, Modifiers};
    use crate::filter::FilterDescriptor;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Update {
            view: ViewId,
            filters: ActiveFilterSet,
            filtered: Vec<Record>,
        },
        Clear(ViewId),
    }

    struct RecordingView {
        id: ViewId,
        log: Arc<Mutex<Vec<Call>>>,
    }

    impl ViewAdapter for RecordingView {
        fn id(&self) -> ViewId {
            self.id
        }

        fn update(&mut self, filtered: &[Record], filters: &ActiveFilterSet) {
            self.log.lock().push(Call::Update {
                view: self.id,
                filters: filters.clone(),
                filtered: filtered.to_vec(),
            });
        }

        fn clear_highlight(&mut self) {
            self.log.lock().push(Call::Clear(self.id));
        }
    }

    fn dispatcher() -> (Dispatcher, Arc<Mutex<Vec<Call>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher: Dispatcher = Dispatcher::new();
        for id in ViewId::ALL {
            dispatcher.register(Box::new(RecordingView {
                id,
                log: log.clone(),
            }));
        }
        (dispatcher, log)
    }

    #[test]
    fn test_origin_is_not_updated() {
        let (mut dispatcher, log) = dispatcher();
        let filters = ActiveFilterSet::single(FilterDescriptor::category("Sector", json!("Tech")));

        let report = dispatcher.broadcast(ViewId::RadialBar, &filters, &[]);

        assert_eq!(
            report.updated,
            vec![ViewId::Chord, ViewId::ForceDirected, ViewId::Sunburst]
        );
        assert!(!report.cleared);
        assert!(!log
            .lock()
            .iter()
            .any(|call| matches!(call, Call::Update { view: ViewId::RadialBar, .. })));
    }

    #[test]
    fn test_empty_filters_clear_every_view() {
        let (mut dispatcher, log) = dispatcher();

        let report = dispatcher.broadcast(ViewId::Chord, &ActiveFilterSet::new(), &[]);

        assert!(report.cleared);
        assert!(report.updated.is_empty());
        let calls = log.lock().clone();
        assert_eq!(calls, ViewId::ALL.iter().map(|id| Call::Clear(*id)).collect::<Vec<_>>());
    }

    #[test]
    fn test_register_replaces_slot() {
        let (mut dispatcher, _) = dispatcher();
        let log = Arc::new(Mutex::new(Vec::new()));
        dispatcher.register(Box::new(RecordingView {
            id: ViewId::Chord,
            log: log.clone(),
        }));
        assert_eq!(dispatcher.len(), 4);

        dispatcher.clear_all();
        assert_eq!(*log.lock(), vec![Call::Clear(ViewId::Chord)]);
    }

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

    #[test]
    fn test_linked_views_receive_filtered_records() {
        let all = records();
        let mut coordinator = SelectionCoordinator::new(all.clone());
        let (mut dispatcher, log) = dispatcher();
        let tech = FilterDescriptor::category("Sector", json!("Tech"));

        let selection = coordinator.handle_interaction(Interaction::new(
            ViewId::RadialBar,
            tech.clone(),
            Modifiers::NONE,
        ));
        dispatcher.dispatch(&selection);

        let calls = log.lock().clone();
        assert_eq!(calls.len(), 3);
        for (call, expected) in calls
            .iter()
            .zip([ViewId::Chord, ViewId::ForceDirected, ViewId::Sunburst])
        {
            let Call::Update {
                view,
                filters,
                filtered,
            } = call
            else {
                panic!("expected an update, got {:?}", call);
            };
            assert_eq!(*view, expected);
            assert_eq!(filters.keys().collect::<Vec<_>>(), vec!["Sector|Tech"]);
            assert_eq!(filters.get("Sector|Tech"), Some(&tech));
            assert_eq!(filtered.len(), 2);
            assert!(filtered[0].same_as(&all[0]));
            assert!(filtered[1].same_as(&all[1]));
        }
    }

    #[test]
    fn test_retracting_origin_updates_it_too() {
        let mut coordinator = SelectionCoordinator::new(records());
        let (mut dispatcher, log) = dispatcher();
        let tech = FilterDescriptor::category("Sector", json!("Tech"));
        let asia = FilterDescriptor::category("Region", json!("Asia"));

        for (origin, descriptor) in [(ViewId::RadialBar, tech.clone()), (ViewId::Chord, asia)] {
            let selection = coordinator.handle_interaction(Interaction::new(
                origin,
                descriptor,
                Modifiers::CTRL,
            ));
            dispatcher.dispatch(&selection);
        }
        log.lock().clear();

        let selection = coordinator.handle_interaction(Interaction::new(
            ViewId::RadialBar,
            tech,
            Modifiers::CTRL,
        ));
        let report = dispatcher.dispatch(&selection);

        assert_eq!(
            report.updated,
            vec![
                ViewId::Chord,
                ViewId::ForceDirected,
                ViewId::Sunburst,
                ViewId::RadialBar
            ]
        );
        assert!(log.lock().iter().any(|call| matches!(
            call,
            Call::Update { view: ViewId::RadialBar, filtered, .. } if filtered.len() == 2
        )));
    }
}
