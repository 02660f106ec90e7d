//! Force-directed graph of entities and the links between them
//!
//! Only the graph structure lives here; layout simulation is a surface concern.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use bl_core::value::{self, identity};
use bl_core::{
    ActiveFilterSet, FilterDescriptor, InteractionSink, Modifiers, Record, ViewAdapter, ViewId,
};
use bl_data::ForceGraphDims;
use bl_render::format::escape_html;
use bl_render::{ElementId, ElementState, HighlightLayer, ViewFrame};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde_json::Value;

use super::{emit, understood};
use crate::{ChartView, InsufficientData};

/// Group reported when no group dimension is mapped
const DEFAULT_GROUP: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: Value,
    pub group: Value,
}

pub struct ForceGraph {
    dims: ForceGraphDims,
    graph: DiGraph<GraphNode, ()>,
    index: AHashMap<String, NodeIndex>,
    layer: HighlightLayer,
    sink: Arc<dyn InteractionSink>,
}

impl ForceGraph {
    pub fn create(
        records: &[Record],
        dims: ForceGraphDims,
        sink: Arc<dyn InteractionSink>,
    ) -> Result<Self, InsufficientData> {
        let (graph, index) = build_graph(records, &dims);
        if graph.node_count() == 0 {
            return Err(InsufficientData::new(
                ViewId::ForceDirected,
                "No data for force graph dimensions.",
            ));
        }

        let layer = HighlightLayer::new(
            graph
                .node_indices()
                .map(|n| ElementId::Node(n.index()))
                .chain(graph.edge_indices().map(|e| ElementId::Link(e.index()))),
        );

        tracing::debug!(
            "Force graph over '{}': {} nodes, {} links",
            dims.nodes,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(Self {
            dims,
            graph,
            index,
            layer,
            sink,
        })
    }

    pub fn graph(&self) -> &DiGraph<GraphNode, ()> {
        &self.graph
    }

    /// Node index for an entity value
    pub fn node_of(&self, id: &Value) -> Option<NodeIndex> {
        self.index.get(&identity(id)).copied()
    }

    fn node(&self, element: ElementId) -> Option<NodeIndex> {
        match element {
            ElementId::Node(i) if i < self.graph.node_count() => Some(NodeIndex::new(i)),
            _ => None,
        }
    }

    /// The node and everything adjacent to it in either direction
    fn neighbourhood(&self, node: NodeIndex) -> AHashSet<NodeIndex> {
        let mut around: AHashSet<NodeIndex> = self.graph.neighbors_undirected(node).collect();
        around.insert(node);
        around
    }

    fn incident(&self, link: EdgeIndex, node: NodeIndex) -> bool {
        self.graph
            .edge_endpoints(link)
            .map_or(false, |(a, b)| a == node || b == node)
    }

    /// Nodes in `lit` and links with both ends in `lit` are highlighted
    fn emphasise(&mut self, lit: &AHashSet<NodeIndex>) {
        let graph = &self.graph;
        self.layer.apply(|id| match id {
            ElementId::Node(i) => ElementState::emphasis(lit.contains(&NodeIndex::new(i))),
            ElementId::Link(e) => {
                let both = graph
                    .edge_endpoints(EdgeIndex::new(e))
                    .map_or(false, |(a, b)| lit.contains(&a) && lit.contains(&b));
                ElementState::emphasis(both)
            }
            _ => ElementState::Normal,
        });
    }
}

/// Nodes are the distinct non-blank `nodes` values in first-seen order;
/// each record links its node to every listed id that is also a node
fn build_graph(
    records: &[Record],
    dims: &ForceGraphDims,
) -> (DiGraph<GraphNode, ()>, AHashMap<String, NodeIndex>) {
    let mut graph = DiGraph::new();
    let mut index: AHashMap<String, NodeIndex> = AHashMap::new();

    for record in records {
        let cell = record.get(&dims.nodes);
        if value::is_blank(cell) {
            continue;
        }
        let Some(id) = cell else { continue };
        let key = identity(id);
        if index.contains_key(&key) {
            continue;
        }
        let group = match &dims.group {
            Some(dimension) => record.get(dimension).cloned().unwrap_or(Value::Null),
            None => Value::String(DEFAULT_GROUP.to_string()),
        };
        let node = graph.add_node(GraphNode {
            id: id.clone(),
            group,
        });
        index.insert(key, node);
    }

    for record in records {
        let Some(&from) = record.get(&dims.nodes).and_then(|id| index.get(&identity(id))) else {
            continue;
        };
        let Some(Value::Array(targets)) = record.get(&dims.links) else {
            continue;
        };
        for target in targets {
            if value::is_blank(Some(target)) {
                continue;
            }
            match index.get(&identity(target)) {
                Some(&to) if to != from => {
                    graph.add_edge(from, to, ());
                }
                Some(_) => {}
                None => tracing::trace!("Dropping link to unknown node {}", target),
            }
        }
    }

    (graph, index)
}

impl ViewAdapter for ForceGraph {
    fn id(&self) -> ViewId {
        ViewId::ForceDirected
    }

    fn update(&mut self, filtered: &[Record], filters: &ActiveFilterSet) {
        let known = understood(filters);
        if known.is_empty() {
            self.clear_highlight();
            return;
        }

        let mut lit: AHashSet<NodeIndex> = filtered
            .iter()
            .filter_map(|r| r.get(&self.dims.nodes))
            .filter_map(|id| self.node_of(id))
            .collect();

        for descriptor in known {
            match descriptor {
                FilterDescriptor::Node { dimension, value } if *dimension == self.dims.nodes => {
                    lit.extend(self.node_of(value));
                }
                FilterDescriptor::Category { dimension, value }
                    if Some(dimension) == self.dims.group.as_ref() =>
                {
                    lit.extend(
                        self.graph
                            .node_indices()
                            .filter(|n| self.graph[*n].group == *value),
                    );
                }
                _ => {}
            }
        }

        self.emphasise(&lit);
    }

    fn clear_highlight(&mut self) {
        self.layer.reset();
    }
}

impl ChartView for ForceGraph {
    fn click(&mut self, element: Option<ElementId>, modifiers: Modifiers) {
        let node = match element {
            None => {
                emit(
                    &self.sink,
                    ViewId::ForceDirected,
                    FilterDescriptor::node(self.dims.nodes.clone(), Value::Null),
                    modifiers,
                );
                return;
            }
            Some(element) => match self.node(element) {
                Some(node) => node,
                None => {
                    tracing::debug!("Ignoring click on {:?}", element);
                    return;
                }
            },
        };

        emit(
            &self.sink,
            ViewId::ForceDirected,
            FilterDescriptor::node(self.dims.nodes.clone(), self.graph[node].id.clone()),
            modifiers,
        );
        let around = self.neighbourhood(node);
        self.emphasise(&around);
    }

    fn hover(&mut self, element: ElementId) -> Option<String> {
        let node = self.node(element)?;
        let data = &self.graph[node];
        let html = format!(
            "<strong>{}</strong><br/>Group: {}",
            escape_html(&value::label(&data.id)),
            escape_html(&value::label(&data.group))
        );

        let around = self.neighbourhood(node);
        let overrides: Vec<(ElementId, ElementState)> = self
            .graph
            .node_indices()
            .map(|n| {
                let state = if around.contains(&n) {
                    ElementState::Normal
                } else {
                    ElementState::Dimmed
                };
                (ElementId::Node(n.index()), state)
            })
            .chain(self.graph.edge_indices().map(|e| {
                (
                    ElementId::Link(e.index()),
                    ElementState::emphasis(self.incident(e, node)),
                )
            }))
            .collect();
        self.layer.preview(element, overrides);
        Some(html)
    }

    fn hover_end(&mut self) {
        self.layer.end_preview();
    }

    fn frame(&self) -> ViewFrame {
        ViewFrame::from_layer(ViewId::ForceDirected, &self.layer, |id| match id {
            ElementId::Node(i) => {
                let node = NodeIndex::new(i);
                let degree = self.graph.neighbors_undirected(node).count();
                (value::label(&self.graph[node].id), degree as f64)
            }
            ElementId::Link(e) => match self.graph.edge_endpoints(EdgeIndex::new(e)) {
                Some((a, b)) => (
                    format!(
                        "{}>{}",
                        value::label(&self.graph[a].id),
                        value::label(&self.graph[b].id)
                    ),
                    1.0,
                ),
                None => (String::new(), 0.0),
            },
            _ => (String::new(), 0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixtures;
    use bl_core::InteractionQueue;
    use serde_json::json;

    fn dims(group: Option<&str>) -> ForceGraphDims {
        ForceGraphDims {
            nodes: "Company".into(),
            links: "ConnectedTo".into(),
            group: group.map(String::from),
        }
    }

    fn records() -> Vec<Record> {
        fixtures::records(json!([
            {"Company": "Acme", "Sector": "Tech", "ConnectedTo": ["Globex", "Ghost", "Acme"]},
            {"Company": "Globex", "Sector": "Finance", "ConnectedTo": ["Initech"]},
            {"Company": "Initech", "Sector": "Tech", "ConnectedTo": "Acme"},
            {"Company": "", "Sector": "Tech", "ConnectedTo": ["Acme"]},
            {"Company": "Acme", "Sector": "Energy", "ConnectedTo": []},
        ]))
    }

    fn graph(queue: &InteractionQueue) -> ForceGraph {
        ForceGraph::create(&records(), dims(Some("Sector")), queue.sink()).unwrap()
    }

    #[test]
    fn test_graph_structure() {
        let queue = InteractionQueue::new();
        let graph = graph(&queue);
        let g = graph.graph();

        assert_eq!(g.node_count(), 3);
        // Self-loop, dangling id and non-array links are dropped
        assert_eq!(g.edge_count(), 2);

        let acme = graph.node_of(&json!("Acme")).unwrap();
        // First record carrying the node decides its group
        assert_eq!(g[acme].group, json!("Tech"));
        let labels: Vec<String> = graph.frame().elements.iter().map(|e| e.label.clone()).collect();
        assert_eq!(labels, vec!["Acme", "Globex", "Initech", "Acme>Globex", "Globex>Initech"]);
    }

    #[test]
    fn test_default_group() {
        let graph =
            ForceGraph::create(&records(), dims(None), InteractionQueue::new().sink()).unwrap();
        let acme = graph.node_of(&json!("Acme")).unwrap();
        assert_eq!(graph.graph()[acme].group, json!("default"));
    }

    #[test]
    fn test_no_nodes_is_insufficient() {
        let records = fixtures::records(json!([{"Company": null}]));
        assert!(
            ForceGraph::create(&records, dims(None), InteractionQueue::new().sink()).is_err()
        );
    }

    #[test]
    fn test_update_from_filtered_records() {
        let queue = InteractionQueue::new();
        let mut graph = graph(&queue);
        let filters = ActiveFilterSet::single(FilterDescriptor::category("Region", json!("EU")));
        let filtered = fixtures::records(json!([
            {"Company": "Acme"},
            {"Company": "Globex"}
        ]));

        graph.update(&filtered, &filters);
        let frame = graph.frame();
        assert_eq!(
            frame.labels_in(ElementState::Highlighted),
            vec!["Acme", "Globex", "Acme>Globex"]
        );
        assert_eq!(
            frame.labels_in(ElementState::Dimmed),
            vec!["Initech", "Globex>Initech"]
        );
    }

    #[test]
    fn test_update_from_group_category() {
        let queue = InteractionQueue::new();
        let mut graph = graph(&queue);
        let filters = ActiveFilterSet::single(FilterDescriptor::category("Sector", json!("Tech")));

        graph.update(&[], &filters);
        assert_eq!(
            graph.frame().labels_in(ElementState::Highlighted),
            vec!["Acme", "Initech"]
        );
    }

    #[test]
    fn test_click_emits_node_and_lights_neighbourhood() {
        let queue = InteractionQueue::new();
        let mut graph = graph(&queue);
        let globex = graph.node_of(&json!("Globex")).unwrap();

        graph.click(Some(ElementId::Node(globex.index())), Modifiers::NONE);

        assert_eq!(
            queue.pop().unwrap().descriptor,
            FilterDescriptor::node("Company", json!("Globex"))
        );
        assert!(graph.frame().labels_in(ElementState::Dimmed).is_empty());

        graph.click(Some(ElementId::Link(0)), Modifiers::NONE);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_hover_preview() {
        let queue = InteractionQueue::new();
        let mut graph = graph(&queue);
        let acme = graph.node_of(&json!("Acme")).unwrap();

        let html = graph.hover(ElementId::Node(acme.index())).unwrap();
        assert_eq!(html, "<strong>Acme</strong><br/>Group: Tech");

        let frame = graph.frame();
        assert_eq!(frame.labels_in(ElementState::Highlighted), vec!["Acme>Globex"]);
        assert_eq!(
            frame.labels_in(ElementState::Dimmed),
            vec!["Initech", "Globex>Initech"]
        );

        graph.hover_end();
        assert!(graph.frame().labels_in(ElementState::Dimmed).is_empty());
        assert!(graph.hover(ElementId::Link(0)).is_none());
    }
}
