use bl_core::{ActiveFilterSet, Modifiers, Record, ViewAdapter, ViewId};
use bl_render::{ElementId, ViewFrame};

use crate::ChartView;

/// Stand-in for a chart that could not be drawn
///
/// Shows a message and ignores every update and gesture.
#[derive(Debug, Clone)]
pub struct EmptyAdapter {
    view: ViewId,
    message: String,
}

impl EmptyAdapter {
    pub fn new(view: ViewId, message: impl Into<String>) -> Self {
        Self {
            view,
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ViewAdapter for EmptyAdapter {
    fn id(&self) -> ViewId {
        self.view
    }

    fn update(&mut self, _filtered: &[Record], _filters: &ActiveFilterSet) {}

    fn clear_highlight(&mut self) {}
}

impl ChartView for EmptyAdapter {
    fn click(&mut self, _element: Option<ElementId>, _modifiers: Modifiers) {}

    fn hover(&mut self, _element: ElementId) -> Option<String> {
        None
    }

    fn hover_end(&mut self) {}

    fn frame(&self) -> ViewFrame {
        ViewFrame::placeholder(self.view, self.message.clone())
    }
}
