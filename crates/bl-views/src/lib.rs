//! Linked chart views and the dashboard that coordinates them

pub mod adapters;
mod chart_view;
mod dashboard;
mod session;

pub use adapters::{build_view, Chord, EmptyAdapter, ForceGraph, RadialBar, Sunburst};
pub use chart_view::ChartView;
pub use dashboard::Dashboard;
pub use session::Session;

use bl_core::ViewId;
use thiserror::Error;

/// A chart could not be drawn from the mapped dimensions
///
/// Never fatal: the view is replaced by an [`EmptyAdapter`] showing `reason`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{view}: {reason}")]
pub struct InsufficientData {
    pub view: ViewId,
    pub reason: String,
}

impl InsufficientData {
    pub fn new(view: ViewId, reason: impl Into<String>) -> Self {
        Self {
            view,
            reason: reason.into(),
        }
    }
}
