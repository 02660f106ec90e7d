//! Per-element highlight state with a transient hover preview

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifies one drawable element of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum ElementId {
    /// Radial bar
    Bar(usize),
    /// Chord arc
    Group(usize),
    /// Chord ribbon
    Ribbon(usize),
    /// Force graph node
    Node(usize),
    /// Force graph link
    Link(usize),
    /// Sunburst arc
    Segment(usize),
}

/// Emphasis of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementState {
    #[default]
    Normal,
    Highlighted,
    Dimmed,
}

impl ElementState {
    /// Highlighted when `on`, dimmed otherwise
    pub fn emphasis(on: bool) -> Self {
        if on {
            ElementState::Highlighted
        } else {
            ElementState::Dimmed
        }
    }
}

#[derive(Debug, Clone)]
struct Preview {
    hovered: ElementId,
    overrides: IndexMap<ElementId, ElementState>,
}

/// Baseline states set by selections, plus an optional hover preview on top
///
/// The preview never touches the baseline, so ending it restores exactly the
/// last applied state.
#[derive(Debug, Clone, Default)]
pub struct HighlightLayer {
    baseline: IndexMap<ElementId, ElementState>,
    preview: Option<Preview>,
}

impl HighlightLayer {
    /// Create a layer with every element in the normal state
    pub fn new(ids: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            baseline: ids.into_iter().map(|id| (id, ElementState::Normal)).collect(),
            preview: None,
        }
    }

    pub fn len(&self) -> usize {
        self.baseline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty()
    }

    /// Element ids in creation order
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.baseline.keys().copied()
    }

    /// Return every element to normal
    pub fn reset(&mut self) {
        for state in self.baseline.values_mut() {
            *state = ElementState::Normal;
        }
    }

    /// Recompute the baseline state of every element
    pub fn apply(&mut self, mut state_of: impl FnMut(ElementId) -> ElementState) {
        for (id, state) in self.baseline.iter_mut() {
            *state = state_of(*id);
        }
    }

    /// Set one element's baseline state; unknown ids are ignored
    pub fn set(&mut self, id: ElementId, state: ElementState) {
        if let Some(slot) = self.baseline.get_mut(&id) {
            *slot = state;
        }
    }

    /// Show a hover preview, replacing any previous one
    pub fn preview(
        &mut self,
        hovered: ElementId,
        overrides: impl IntoIterator<Item = (ElementId, ElementState)>,
    ) {
        self.preview = Some(Preview {
            hovered,
            overrides: overrides.into_iter().collect(),
        });
    }

    /// Drop the hover preview
    pub fn end_preview(&mut self) {
        self.preview = None;
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.preview.as_ref().map(|p| p.hovered)
    }

    /// Last applied state, ignoring any preview
    pub fn baseline(&self, id: ElementId) -> ElementState {
        self.baseline.get(&id).copied().unwrap_or_default()
    }

    /// Visible state: the preview override if any, else the baseline
    pub fn state(&self, id: ElementId) -> ElementState {
        self.preview
            .as_ref()
            .and_then(|p| p.overrides.get(&id).copied())
            .unwrap_or_else(|| self.baseline(id))
    }

    /// Whether no element is emphasised and no preview is showing
    pub fn is_clear(&self) -> bool {
        self.preview.is_none() && self.baseline.values().all(|s| *s == ElementState::Normal)
    }
}
