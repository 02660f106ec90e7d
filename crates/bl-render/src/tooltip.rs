//! Tooltip boundary

use std::sync::Arc;

use parking_lot::Mutex;

/// Where a tooltip is placed, in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
}

impl Anchor {
    /// Horizontal offset from the pointer
    pub const OFFSET_X: f64 = 10.0;
    /// Vertical offset from the pointer
    pub const OFFSET_Y: f64 = -28.0;

    /// Place a tooltip next to the pointer
    pub fn from_pointer(x: f64, y: f64) -> Self {
        Self {
            left: x + Self::OFFSET_X,
            top: y + Self::OFFSET_Y,
        }
    }
}

/// A single shared tooltip
pub trait Tooltip: Send {
    fn show(&mut self, anchor: Anchor, html: &str);
    fn hide(&mut self);
}

/// Tooltip that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTooltip;

impl Tooltip for NoopTooltip {
    fn show(&mut self, _anchor: Anchor, _html: &str) {}
    fn hide(&mut self) {}
}

/// Tooltip that keeps the currently shown content
#[derive(Debug, Default, Clone)]
pub struct BufferedTooltip {
    current: Option<(Anchor, String)>,
}

impl BufferedTooltip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    pub fn content(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, html)| html.as_str())
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.current.as_ref().map(|(anchor, _)| *anchor)
    }
}

impl Tooltip for BufferedTooltip {
    fn show(&mut self, anchor: Anchor, html: &str) {
        tracing::trace!("Tooltip at ({}, {}): {}", anchor.left, anchor.top, html);
        self.current = Some((anchor, html.to_string()));
    }

    fn hide(&mut self) {
        self.current = None;
    }
}

/// Lets the owner keep a handle on a tooltip handed to a dashboard
impl<T: Tooltip> Tooltip for Arc<Mutex<T>> {
    fn show(&mut self, anchor: Anchor, html: &str) {
        self.lock().show(anchor, html);
    }

    fn hide(&mut self) {
        self.lock().hide();
    }
}
