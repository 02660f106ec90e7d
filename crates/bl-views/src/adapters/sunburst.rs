//! Sunburst: nested rings grouping records level by level

use std::sync::Arc;

use ahash::AHashMap;
use bl_core::value::{self, identity};
use bl_core::{
    ActiveFilterSet, FilterDescriptor, InteractionSink, Modifiers, PathStep, Record, ViewAdapter,
    ViewId,
};
use bl_data::SunburstDims;
use bl_render::format::{escape_html, format_thousands, to_precision, truncate_label};
use bl_render::{ElementId, ElementState, HighlightLayer, ViewFrame};
use serde_json::Value;

use super::{emit, understood};
use crate::{ChartView, InsufficientData};

/// One arc of the sunburst
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: Value,
    /// Ring number, 1 for the innermost
    pub depth: usize,
    pub value: f64,
    pub parent: Option<usize>,
    /// Root-to-segment steps, one per level
    pub path: Vec<PathStep>,
}

impl Segment {
    /// Whether the segment lies at or below `prefix`
    fn descends_from(&self, prefix: &[PathStep]) -> bool {
        prefix.len() <= self.path.len() && prefix.iter().zip(&self.path).all(|(a, b)| a == b)
    }

    fn passes_through(&self, dimension: &str, value: &Value) -> bool {
        self.path
            .iter()
            .any(|step| step.dimension == dimension && step.value == *value)
    }
}

pub struct Sunburst {
    segments: Vec<Segment>,
    total: f64,
    layer: HighlightLayer,
    sink: Arc<dyn InteractionSink>,
}

struct Branch {
    name: Value,
    value: f64,
    children: Vec<Branch>,
}

impl Sunburst {
    pub fn create(
        records: &[Record],
        dims: SunburstDims,
        sink: Arc<dyn InteractionSink>,
    ) -> Result<Self, InsufficientData> {
        let all: Vec<&Record> = records.iter().collect();
        let roots = group(&all, &dims.levels, &dims.value);
        let total: f64 = roots.iter().map(|b| b.value).sum();
        if roots.is_empty() || total == 0.0 {
            return Err(InsufficientData::new(
                ViewId::Sunburst,
                "No data to display for Sunburst with selected dimensions or zero total value.",
            ));
        }

        let mut segments = Vec::new();
        flatten(roots, None, &[], &dims.levels, &mut segments);

        tracing::debug!(
            "Sunburst over {:?}: {} segments, total {}",
            dims.levels,
            segments.len(),
            total
        );
        Ok(Self {
            layer: HighlightLayer::new((0..segments.len()).map(ElementId::Segment)),
            segments,
            total,
            sink,
        })
    }

    /// Segments in pre-order, siblings largest first
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    fn segment(&self, element: ElementId) -> Option<&Segment> {
        match element {
            ElementId::Segment(i) => self.segments.get(i),
            _ => None,
        }
    }
}

/// Group `records` by the first level, recursing into the rest
///
/// A group whose records are all blank at the next level keeps the summed
/// value of its own records.
fn group(records: &[&Record], levels: &[String], value_dim: &str) -> Vec<Branch> {
    let Some((dimension, deeper)) = levels.split_first() else {
        return Vec::new();
    };

    let mut groups: Vec<(Value, Vec<&Record>)> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();
    for &record in records {
        let cell = record.get(dimension);
        if value::is_blank(cell) {
            continue;
        }
        let Some(name) = cell else { continue };
        let slot = *index.entry(identity(name)).or_insert_with(|| {
            groups.push((name.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    let mut branches: Vec<Branch> = groups
        .into_iter()
        .map(|(name, members)| {
            let children = group(&members, deeper, value_dim);
            let value = if children.is_empty() {
                value::sum(members.iter().map(|r| r.get(value_dim)))
            } else {
                children.iter().map(|c| c.value).sum()
            };
            Branch {
                name,
                value,
                children,
            }
        })
        .collect();
    branches.sort_by(|a, b| b.value.total_cmp(&a.value));
    branches
}

fn flatten(
    branches: Vec<Branch>,
    parent: Option<usize>,
    prefix: &[PathStep],
    levels: &[String],
    out: &mut Vec<Segment>,
) {
    let depth = prefix.len();
    for branch in branches {
        let mut path = prefix.to_vec();
        path.push(PathStep::new(levels[depth].clone(), branch.name.clone()));

        let id = out.len();
        out.push(Segment {
            name: branch.name,
            depth: depth + 1,
            value: branch.value,
            parent,
            path: path.clone(),
        });
        flatten(branch.children, Some(id), &path, levels, out);
    }
}

impl ViewAdapter for Sunburst {
    fn id(&self) -> ViewId {
        ViewId::Sunburst
    }

    fn update(&mut self, _filtered: &[Record], filters: &ActiveFilterSet) {
        let known = understood(filters);
        if known.is_empty() {
            self.clear_highlight();
            return;
        }

        let segments = &self.segments;
        self.layer.apply(|id| {
            let ElementId::Segment(i) = id else {
                return ElementState::Normal;
            };
            let segment = &segments[i];
            let matched = known.iter().any(|descriptor| match descriptor {
                FilterDescriptor::Hierarchy { path } => segment.descends_from(path),
                FilterDescriptor::Category { dimension, value }
                | FilterDescriptor::Node { dimension, value } => {
                    segment.passes_through(dimension, value)
                }
                FilterDescriptor::Unrecognized => false,
            });
            ElementState::emphasis(matched)
        });
    }

    fn clear_highlight(&mut self) {
        self.layer.reset();
    }
}

impl ChartView for Sunburst {
    fn click(&mut self, element: Option<ElementId>, modifiers: Modifiers) {
        let Some(element) = element else {
            emit(
                &self.sink,
                ViewId::Sunburst,
                FilterDescriptor::hierarchy(Vec::new()),
                modifiers,
            );
            return;
        };
        let Some(path) = self.segment(element).map(|s| s.path.clone()) else {
            tracing::debug!("Ignoring click on {:?}", element);
            return;
        };

        emit(
            &self.sink,
            ViewId::Sunburst,
            FilterDescriptor::hierarchy(path.clone()),
            modifiers,
        );
        let segments = &self.segments;
        self.layer.apply(|id| match id {
            ElementId::Segment(i) => ElementState::emphasis(segments[i].descends_from(&path)),
            _ => ElementState::Normal,
        });
    }

    fn hover(&mut self, element: ElementId) -> Option<String> {
        let segment = self.segment(element)?;
        let names: Vec<String> = segment
            .path
            .iter()
            .map(|step| escape_html(&value::label(&step.value)))
            .collect();
        let html = format!(
            "<strong>{}</strong><br/>Value: {} ({}%)",
            names.join(" / "),
            format_thousands(segment.value, 2),
            to_precision(100.0 * segment.value / self.total, 3)
        );
        self.layer.preview(element, std::iter::empty());
        Some(html)
    }

    fn hover_end(&mut self) {
        self.layer.end_preview();
    }

    fn frame(&self) -> ViewFrame {
        ViewFrame::from_layer(ViewId::Sunburst, &self.layer, |id| match self.segment(id) {
            Some(segment) => (
                truncate_label(&value::label(&segment.name), 15, 12),
                segment.value,
            ),
            None => (String::new(), 0.0),
        })
    }
}
