//! Rendering boundary for linked views
//!
//! Views describe what to draw as a [`ViewFrame`]; a [`Surface`] decides how.
//! Geometry, colour and animation belong to the surface.

pub mod format;
pub mod frame;
pub mod highlight;
pub mod tooltip;

pub use frame::{ElementVisual, Surface, TextSurface, ViewFrame};
pub use highlight::{ElementId, ElementState, HighlightLayer};
pub use tooltip::{Anchor, BufferedTooltip, NoopTooltip, Tooltip};
