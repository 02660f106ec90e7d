//! Frames: what a view wants drawn

use bl_core::ViewId;
use serde::Serialize;

use crate::highlight::{ElementId, ElementState, HighlightLayer};

/// One drawable element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementVisual {
    pub id: ElementId,
    pub label: String,
    /// Aggregate the element encodes (bar length, arc size, link weight)
    pub value: f64,
    pub state: ElementState,
    pub hovered: bool,
}

/// Snapshot of one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewFrame {
    pub view: ViewId,
    /// Message shown instead of a chart
    pub placeholder: Option<String>,
    pub elements: Vec<ElementVisual>,
}

impl ViewFrame {
    /// A frame showing only a message
    pub fn placeholder(view: ViewId, message: impl Into<String>) -> Self {
        Self {
            view,
            placeholder: Some(message.into()),
            elements: Vec::new(),
        }
    }

    /// Build a frame from a highlight layer, labelling each element
    pub fn from_layer(
        view: ViewId,
        layer: &HighlightLayer,
        mut describe: impl FnMut(ElementId) -> (String, f64),
    ) -> Self {
        let hovered = layer.hovered();
        let elements = layer
            .ids()
            .map(|id| {
                let (label, value) = describe(id);
                ElementVisual {
                    id,
                    label,
                    value,
                    state: layer.state(id),
                    hovered: hovered == Some(id),
                }
            })
            .collect();
        Self {
            view,
            placeholder: None,
            elements,
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementVisual> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Labels of elements in `state`, in frame order
    pub fn labels_in(&self, state: ElementState) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|e| e.state == state)
            .map(|e| e.label.as_str())
            .collect()
    }
}

/// Something that can draw frames
pub trait Surface {
    fn present(&mut self, frame: &ViewFrame);
}

/// Surface that renders frames as lines of text
///
/// `+` marks highlighted elements, `-` dimmed ones and `*` the hovered one.
#[derive(Debug, Default, Clone)]
pub struct TextSurface {
    lines: Vec<String>,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one frame as a single line
    pub fn render(frame: &ViewFrame) -> String {
        if let Some(message) = &frame.placeholder {
            return format!("[{}] {}", frame.view, message);
        }

        let elements: Vec<String> = frame
            .elements
            .iter()
            .map(|e| {
                let marker = match e.state {
                    ElementState::Normal => "",
                    ElementState::Highlighted => "+",
                    ElementState::Dimmed => "-",
                };
                let hover = if e.hovered { "*" } else { "" };
                format!("{}{}{}", marker, e.label, hover)
            })
            .collect();
        format!("[{}] {}", frame.view, elements.join(" "))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take every line rendered so far
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl Surface for TextSurface {
    fn present(&mut self, frame: &ViewFrame) {
        self.lines.push(Self::render(frame));
    }
}
