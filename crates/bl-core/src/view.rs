//! View identity and the update contract shared by all linked views

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::filter::ActiveFilterSet;
use crate::record::Record;

/// The four linked chart slots of a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewId {
    RadialBar,
    Chord,
    ForceDirected,
    Sunburst,
}

impl ViewId {
    /// All slots in dashboard order
    pub const ALL: [ViewId; 4] = [
        ViewId::RadialBar,
        ViewId::Chord,
        ViewId::ForceDirected,
        ViewId::Sunburst,
    ];

    /// Stable name used in logs and frames
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewId::RadialBar => "radialBar",
            ViewId::Chord => "chord",
            ViewId::ForceDirected => "forceDirected",
            ViewId::Sunburst => "sunburst",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for views that take part in brushing and linking
///
/// A view derives its structure once, at construction. Afterwards the
/// dispatch loop only ever changes its highlight overlay.
pub trait ViewAdapter: Send {
    /// The slot this view occupies
    fn id(&self) -> ViewId;

    /// Re-apply highlighting for a new filter state
    ///
    /// The structure is not re-derived from `filtered`; only the
    /// highlighted/dimmed partition of the existing elements changes.
    fn update(&mut self, filtered: &[Record], filters: &ActiveFilterSet);

    /// Reset every element to the unfiltered state. Idempotent.
    fn clear_highlight(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_names() {
        let names: Vec<_> = ViewId::ALL.iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["radialBar", "chord", "forceDirected", "sunburst"]);
    }

    #[test]
    fn test_view_id_serde() {
        let json = serde_json::to_string(&ViewId::ForceDirected).unwrap();
        assert_eq!(json, "\"forceDirected\"");
        let back: ViewId = serde_json::from_str("\"radialBar\"").unwrap();
        assert_eq!(back, ViewId::RadialBar);
    }
}
