//! Chord diagram: flows between the values of two dimensions

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use bl_core::value::{self, identity};
use bl_core::{
    ActiveFilterSet, FilterDescriptor, InteractionSink, Modifiers, Record, ViewAdapter, ViewId,
};
use bl_data::ChordDims;
use bl_render::format::{escape_html, format_thousands};
use bl_render::{ElementId, ElementState, HighlightLayer, ViewFrame};
use serde_json::Value;

use super::{emit, understood};
use crate::{ChartView, InsufficientData};

/// Flow between two entities, drawn once per unordered pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ribbon {
    /// Entity on the heavier side of the pair
    pub source: usize,
    pub target: usize,
    /// `matrix[source][target]`
    pub value: u64,
    /// `matrix[target][source]`
    pub reverse: u64,
}

pub struct Chord {
    dims: ChordDims,
    names: Vec<Value>,
    matrix: Vec<Vec<u64>>,
    ribbons: Vec<Ribbon>,
    /// Whether each entity occurs in the source dimension
    is_source: Vec<bool>,
    layer: HighlightLayer,
    sink: Arc<dyn InteractionSink>,
}

impl Chord {
    pub fn create(
        records: &[Record],
        dims: ChordDims,
        sink: Arc<dyn InteractionSink>,
    ) -> Result<Self, InsufficientData> {
        let names = entities(records, &dims);
        if names.len() < 2 {
            return Err(InsufficientData::new(
                ViewId::Chord,
                "Not enough distinct entities for Chord Diagram (need at least 2).",
            ));
        }

        let index: AHashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (identity(name), i))
            .collect();
        let matrix = flow_matrix(records, &dims, &index);
        if matrix.iter().flatten().sum::<u64>() == 0 {
            return Err(InsufficientData::new(
                ViewId::Chord,
                "No relationships found between selected dimensions for Chord Diagram.",
            ));
        }

        let sources: AHashSet<String> = records
            .iter()
            .filter_map(|r| r.get(&dims.source))
            .map(identity)
            .collect();
        let is_source = names
            .iter()
            .map(|name| sources.contains(&identity(name)))
            .collect();

        let ribbons = ribbons(&matrix);
        let layer = HighlightLayer::new(
            (0..names.len())
                .map(ElementId::Group)
                .chain((0..ribbons.len()).map(ElementId::Ribbon)),
        );

        tracing::debug!(
            "Chord '{}' -> '{}': {} entities, {} ribbons",
            dims.source,
            dims.target,
            names.len(),
            ribbons.len()
        );
        Ok(Self {
            dims,
            names,
            matrix,
            ribbons,
            is_source,
            layer,
            sink,
        })
    }

    /// Entities in ascending order
    pub fn names(&self) -> &[Value] {
        &self.names
    }

    /// Directed counts, `matrix[i][j]` = records with source `i` and target `j`
    pub fn matrix(&self) -> &[Vec<u64>] {
        &self.matrix
    }

    pub fn ribbons(&self) -> &[Ribbon] {
        &self.ribbons
    }

    /// Outgoing total of an entity
    pub fn group_total(&self, group: usize) -> u64 {
        self.matrix.get(group).map(|row| row.iter().sum()).unwrap_or(0)
    }

    fn touches(&self, ribbon: usize, group: usize) -> bool {
        self.ribbons
            .get(ribbon)
            .map_or(false, |r| r.source == group || r.target == group)
    }

    /// Highlight `named` groups and every ribbon touching one
    fn emphasise(&mut self, named: &[bool]) {
        let ribbons = &self.ribbons;
        self.layer.apply(|id| match id {
            ElementId::Group(g) => ElementState::emphasis(named[g]),
            ElementId::Ribbon(r) => {
                let ribbon = ribbons[r];
                ElementState::emphasis(named[ribbon.source] || named[ribbon.target])
            }
            _ => ElementState::Normal,
        });
    }
}

/// Distinct non-blank values of both dimensions, ascending
pub fn entities(records: &[Record], dims: &ChordDims) -> Vec<Value> {
    let mut seen: AHashSet<String> = AHashSet::new();
    let mut names = Vec::new();
    for dimension in [&dims.source, &dims.target] {
        for record in records {
            let cell = record.get(dimension);
            if value::is_blank(cell) {
                continue;
            }
            if let Some(cell) = cell {
                if seen.insert(identity(cell)) {
                    names.push(cell.clone());
                }
            }
        }
    }
    names.sort_by(value::ascending);
    names
}

fn flow_matrix(
    records: &[Record],
    dims: &ChordDims,
    index: &AHashMap<String, usize>,
) -> Vec<Vec<u64>> {
    let n = index.len();
    let mut matrix = vec![vec![0u64; n]; n];
    for record in records {
        let lookup = |dimension: &str| record.get(dimension).and_then(|v| index.get(&identity(v)));
        if let (Some(&i), Some(&j)) = (lookup(dims.source.as_str()), lookup(dims.target.as_str())) {
            matrix[i][j] += 1;
        }
    }
    matrix
}

fn ribbons(matrix: &[Vec<u64>]) -> Vec<Ribbon> {
    let mut ribbons = Vec::new();
    for i in 0..matrix.len() {
        for j in i..matrix.len() {
            let (forward, backward) = (matrix[i][j], matrix[j][i]);
            if forward == 0 && backward == 0 {
                continue;
            }
            ribbons.push(if forward >= backward {
                Ribbon {
                    source: i,
                    target: j,
                    value: forward,
                    reverse: backward,
                }
            } else {
                Ribbon {
                    source: j,
                    target: i,
                    value: backward,
                    reverse: forward,
                }
            });
        }
    }
    ribbons
}

impl ViewAdapter for Chord {
    fn id(&self) -> ViewId {
        ViewId::Chord
    }

    fn update(&mut self, _filtered: &[Record], filters: &ActiveFilterSet) {
        let known = understood(filters);
        if known.is_empty() {
            self.clear_highlight();
            return;
        }

        let mut wanted: AHashSet<String> = AHashSet::new();
        for descriptor in known {
            match descriptor {
                FilterDescriptor::Category { value, .. } | FilterDescriptor::Node { value, .. } => {
                    wanted.insert(identity(value));
                }
                FilterDescriptor::Hierarchy { path } => {
                    wanted.extend(
                        path.iter()
                            .filter(|step| {
                                step.dimension == self.dims.source
                                    || step.dimension == self.dims.target
                            })
                            .map(|step| identity(&step.value)),
                    );
                }
                FilterDescriptor::Unrecognized => {}
            }
        }

        let named: Vec<bool> = self
            .names
            .iter()
            .map(|name| wanted.contains(&identity(name)))
            .collect();
        self.emphasise(&named);
    }

    fn clear_highlight(&mut self) {
        self.layer.reset();
    }
}

impl ChartView for Chord {
    fn click(&mut self, element: Option<ElementId>, modifiers: Modifiers) {
        let group = match element {
            None => {
                emit(
                    &self.sink,
                    ViewId::Chord,
                    FilterDescriptor::category(self.dims.source.clone(), Value::Null),
                    modifiers,
                );
                return;
            }
            Some(ElementId::Group(g)) if g < self.names.len() => g,
            Some(other) => {
                tracing::debug!("Ignoring click on {:?}", other);
                return;
            }
        };

        let dimension = if self.is_source[group] {
            &self.dims.source
        } else {
            &self.dims.target
        };
        emit(
            &self.sink,
            ViewId::Chord,
            FilterDescriptor::category(dimension.clone(), self.names[group].clone()),
            modifiers,
        );

        let mut named = vec![false; self.names.len()];
        named[group] = true;
        self.emphasise(&named);
    }

    fn hover(&mut self, element: ElementId) -> Option<String> {
        match element {
            ElementId::Group(g) if g < self.names.len() => {
                let html = format!(
                    "<strong>{}</strong><br/>Total: {}",
                    escape_html(&value::label(&self.names[g])),
                    format_thousands(self.group_total(g) as f64, 0)
                );
                let overrides: Vec<(ElementId, ElementState)> = (0..self.ribbons.len())
                    .map(|r| {
                        (
                            ElementId::Ribbon(r),
                            ElementState::emphasis(self.touches(r, g)),
                        )
                    })
                    .collect();
                self.layer.preview(element, overrides);
                Some(html)
            }
            ElementId::Ribbon(r) if r < self.ribbons.len() => {
                let ribbon = self.ribbons[r];
                let html = format!(
                    "<strong>{}</strong> \u{2192} <strong>{}</strong><br/>Value: {}",
                    escape_html(&value::label(&self.names[ribbon.source])),
                    escape_html(&value::label(&self.names[ribbon.target])),
                    format_thousands(ribbon.value as f64, 0)
                );
                self.layer.preview(element, std::iter::empty());
                Some(html)
            }
            _ => None,
        }
    }

    fn hover_end(&mut self) {
        self.layer.end_preview();
    }

    fn frame(&self) -> ViewFrame {
        ViewFrame::from_layer(ViewId::Chord, &self.layer, |id| match id {
            ElementId::Group(g) => (value::label(&self.names[g]), self.group_total(g) as f64),
            ElementId::Ribbon(r) => {
                let ribbon = self.ribbons[r];
                (
                    format!(
                        "{}>{}",
                        value::label(&self.names[ribbon.source]),
                        value::label(&self.names[ribbon.target])
                    ),
                    ribbon.value as f64,
                )
            }
            _ => (String::new(), 0.0),
        })
    }
}
