//! Interactive side of a linked view

use bl_core::{Modifiers, ViewAdapter};
use bl_render::{ElementId, ViewFrame};

/// A linked view that also takes pointer input
///
/// Gestures are reported through the view's interaction sink; a view never
/// touches the shared selection itself.
pub trait ChartView: ViewAdapter {
    /// Handle a click on an element, or on the background when `None`
    fn click(&mut self, element: Option<ElementId>, modifiers: Modifiers);

    /// Start a hover preview; returns tooltip HTML when the element has one
    fn hover(&mut self, element: ElementId) -> Option<String>;

    /// Drop the hover preview
    fn hover_end(&mut self);

    /// Current visual state
    fn frame(&self) -> ViewFrame;
}
