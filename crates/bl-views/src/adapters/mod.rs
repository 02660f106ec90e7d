//! Concrete chart adapters

mod chord;
mod empty;
mod force_graph;
mod radial_bar;
mod sunburst;

pub use chord::{Chord, Ribbon};
pub use empty::EmptyAdapter;
pub use force_graph::{ForceGraph, GraphNode};
pub use radial_bar::{Bar, RadialBar};
pub use sunburst::{Segment, Sunburst};

use std::sync::Arc;

use bl_core::{
    ActiveFilterSet, FilterDescriptor, Interaction, InteractionSink, Modifiers, Record, ViewId,
};
use bl_data::ResolvedMapping;

use crate::{ChartView, InsufficientData};

/// Build the adapter for one chart
///
/// A chart that cannot be drawn from the data becomes an [`EmptyAdapter`].
pub fn build_view(
    kind: ViewId,
    records: &[Record],
    mapping: &ResolvedMapping,
    sink: Arc<dyn InteractionSink>,
) -> Box<dyn ChartView> {
    let built: Result<Box<dyn ChartView>, InsufficientData> = match kind {
        ViewId::RadialBar => RadialBar::create(records, mapping.radial_bar.clone(), sink)
            .map(|v| Box::new(v) as Box<dyn ChartView>),
        ViewId::Chord => Chord::create(records, mapping.chord.clone(), sink)
            .map(|v| Box::new(v) as Box<dyn ChartView>),
        ViewId::ForceDirected => ForceGraph::create(records, mapping.force_directed.clone(), sink)
            .map(|v| Box::new(v) as Box<dyn ChartView>),
        ViewId::Sunburst => Sunburst::create(records, mapping.sunburst.clone(), sink)
            .map(|v| Box::new(v) as Box<dyn ChartView>),
    };

    built.unwrap_or_else(|e| {
        tracing::warn!("Showing placeholder for {}", e);
        Box::new(EmptyAdapter::new(e.view, e.reason))
    })
}

/// Descriptors an adapter can reason about
///
/// Unknown kinds are skipped so they never dim anything.
pub(crate) fn understood(filters: &ActiveFilterSet) -> Vec<&FilterDescriptor> {
    filters
        .descriptors()
        .filter(|d| !matches!(d, FilterDescriptor::Unrecognized))
        .collect()
}

pub(crate) fn emit(
    sink: &Arc<dyn InteractionSink>,
    origin: ViewId,
    descriptor: FilterDescriptor,
    modifiers: Modifiers,
) {
    sink.emit(Interaction::new(origin, descriptor, modifiers));
}

#[cfg(test)]
pub(crate) mod fixtures {
    use bl_core::{InteractionQueue, Record};
    use serde_json::Value;

    /// Records from a JSON array literal
    pub fn records(value: Value) -> Vec<Record> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Record::new(map),
                    other => panic!("not an object: {}", other),
                })
                .collect(),
            other => panic!("not an array: {}", other),
        }
    }

    pub fn queue() -> InteractionQueue {
        InteractionQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_data::DashboardMapping;
    use bl_render::ElementState;
    use serde_json::json;

    #[test]
    fn test_build_view_soft_fails_to_placeholder() {
        let records = fixtures::records(json!([
            {"Company": "Acme", "Sector": "Tech", "Region": "Asia", "Revenue": 0, "ConnectedTo": []},
        ]));
        let dimensions: Vec<String> = records[0].dimensions().map(String::from).collect();
        let mapping = DashboardMapping::from_json(
            r#"{
                "radialBar": {"category": "Sector", "value": "Revenue"},
                "chord": {"source": "Sector", "target": "Region"},
                "forceDirected": {"nodes": "Company", "links": "ConnectedTo"},
                "sunburst": {"level1": "Region", "level2": "Sector", "value": "Revenue"}
            }"#,
        )
        .unwrap()
        .resolve(&dimensions)
        .unwrap();
        let queue = fixtures::queue();

        // One record gives two chord entities but the sunburst total is zero
        let sunburst = build_view(ViewId::Sunburst, &records, &mapping, queue.sink());
        let frame = sunburst.frame();
        assert_eq!(frame.view, ViewId::Sunburst);
        assert!(frame.placeholder.is_some());

        let chord = build_view(ViewId::Chord, &records, &mapping, queue.sink());
        assert!(chord.frame().placeholder.is_none());

        let graph = build_view(ViewId::ForceDirected, &records, &mapping, queue.sink());
        assert_eq!(graph.frame().labels_in(ElementState::Normal), vec!["Acme"]);
    }
}
