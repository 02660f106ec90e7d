//! Radial bar chart: one bar per category, length = summed value

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use bl_core::value::{self, identity};
use bl_core::{
    ActiveFilterSet, FilterDescriptor, InteractionSink, Modifiers, Record, ViewAdapter, ViewId,
};
use bl_data::RadialBarDims;
use bl_render::format::{escape_html, format_thousands};
use bl_render::{ElementId, ElementState, HighlightLayer, ViewFrame};
use serde_json::Value;

use super::{emit, understood};
use crate::{ChartView, InsufficientData};

/// One aggregated category
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: Value,
    pub value: f64,
    key: String,
}

pub struct RadialBar {
    dims: RadialBarDims,
    bars: Vec<Bar>,
    layer: HighlightLayer,
    sink: Arc<dyn InteractionSink>,
}

impl RadialBar {
    pub fn create(
        records: &[Record],
        dims: RadialBarDims,
        sink: Arc<dyn InteractionSink>,
    ) -> Result<Self, InsufficientData> {
        let bars = aggregate(records, &dims);
        if bars.is_empty() {
            return Err(InsufficientData::new(
                ViewId::RadialBar,
                "No data for selected dimensions.",
            ));
        }

        tracing::debug!(
            "Radial bar over '{}' / '{}': {} bars",
            dims.category,
            dims.value,
            bars.len()
        );
        Ok(Self {
            layer: HighlightLayer::new((0..bars.len()).map(ElementId::Bar)),
            dims,
            bars,
            sink,
        })
    }

    /// Bars in drawing order (largest first)
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    fn bar(&self, element: ElementId) -> Option<(usize, &Bar)> {
        match element {
            ElementId::Bar(i) => self.bars.get(i).map(|bar| (i, bar)),
            _ => None,
        }
    }
}

/// Group by category (blank categories dropped), sum the value dimension and
/// order bars by descending total
pub fn aggregate(records: &[Record], dims: &RadialBarDims) -> Vec<Bar> {
    let mut bars: Vec<Bar> = Vec::new();
    let mut index: AHashMap<String, usize> = AHashMap::new();

    for record in records {
        let category = record.get(&dims.category);
        if value::is_blank(category) {
            continue;
        }
        let Some(category) = category else { continue };
        let key = identity(category);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            bars.push(Bar {
                category: category.clone(),
                value: 0.0,
                key,
            });
            bars.len() - 1
        });
        bars[slot].value += value::as_number(record.get(&dims.value)).unwrap_or(0.0);
    }

    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    bars
}

impl ViewAdapter for RadialBar {
    fn id(&self) -> ViewId {
        ViewId::RadialBar
    }

    fn update(&mut self, filtered: &[Record], filters: &ActiveFilterSet) {
        let known = understood(filters);
        if known.is_empty() {
            self.clear_highlight();
            return;
        }

        // The most recent selection on our own dimension wins
        let relevant = known
            .iter()
            .flat_map(|d| d.constraints())
            .filter(|(dimension, _)| *dimension == self.dims.category)
            .last()
            .map(|(_, v)| identity(v));

        let present: AHashSet<String> = filtered
            .iter()
            .filter_map(|r| r.get(&self.dims.category))
            .map(identity)
            .collect();

        let bars = &self.bars;
        self.layer.apply(|id| {
            let key = match id {
                ElementId::Bar(i) => &bars[i].key,
                _ => return ElementState::Normal,
            };
            if relevant.as_ref() == Some(key) {
                ElementState::Highlighted
            } else if !present.contains(key) {
                ElementState::Dimmed
            } else {
                ElementState::Normal
            }
        });
    }

    fn clear_highlight(&mut self) {
        self.layer.reset();
    }
}

impl ChartView for RadialBar {
    fn click(&mut self, element: Option<ElementId>, modifiers: Modifiers) {
        let Some(element) = element else {
            emit(
                &self.sink,
                ViewId::RadialBar,
                FilterDescriptor::category(self.dims.category.clone(), Value::Null),
                modifiers,
            );
            return;
        };

        let Some((clicked, bar)) = self.bar(element) else {
            tracing::debug!("Ignoring click on {:?}", element);
            return;
        };

        emit(
            &self.sink,
            ViewId::RadialBar,
            FilterDescriptor::category(self.dims.category.clone(), bar.category.clone()),
            modifiers,
        );
        self.layer
            .apply(|id| ElementState::emphasis(id == ElementId::Bar(clicked)));
    }

    fn hover(&mut self, element: ElementId) -> Option<String> {
        let (_, bar) = self.bar(element)?;
        let html = format!(
            "<strong>{}</strong><br/>Value: {}",
            escape_html(&value::label(&bar.category)),
            format_thousands(bar.value, 0)
        );
        self.layer.preview(element, std::iter::empty());
        Some(html)
    }

    fn hover_end(&mut self) {
        self.layer.end_preview();
    }

    fn frame(&self) -> ViewFrame {
        ViewFrame::from_layer(ViewId::RadialBar, &self.layer, |id| match self.bar(id) {
            Some((_, bar)) => (value::label(&bar.category), bar.value),
            None => (String::new(), 0.0),
        })
    }
}
