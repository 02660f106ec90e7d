//! Per-chart dimension mappings and their validation

use std::path::Path;

use bl_core::ViewId;
use serde::{Deserialize, Serialize};

use crate::{DataError, ValidationError};

/// Radial bar roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialBarMapping {
    pub category: Option<String>,
    pub value: Option<String>,
}

/// Chord diagram roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordMapping {
    pub source: Option<String>,
    pub target: Option<String>,
}

/// Force-directed graph roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceGraphMapping {
    pub nodes: Option<String>,
    /// Dimension holding an array of linked node ids
    pub links: Option<String>,
    pub group: Option<String>,
}

/// Sunburst roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunburstMapping {
    pub level1: Option<String>,
    pub level2: Option<String>,
    pub level3: Option<String>,
    pub value: Option<String>,
}

/// The user's role assignments for all four charts
///
/// Every role is optional here; [`DashboardMapping::resolve`] checks that the
/// required ones are bound. An empty string counts as unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardMapping {
    pub radial_bar: RadialBarMapping,
    pub chord: ChordMapping,
    pub force_directed: ForceGraphMapping,
    pub sunburst: SunburstMapping,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadialBarDims {
    pub category: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordDims {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceGraphDims {
    pub nodes: String,
    pub links: String,
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SunburstDims {
    /// Two or three grouping levels, outermost first
    pub levels: Vec<String>,
    pub value: String,
}

/// A mapping whose required roles are all bound to existing dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub radial_bar: RadialBarDims,
    pub chord: ChordDims,
    pub force_directed: ForceGraphDims,
    pub sunburst: SunburstDims,
}

fn bound(role: &Option<String>) -> Option<&str> {
    role.as_deref().filter(|s| !s.is_empty())
}

/// Validation state shared by every role lookup
struct Resolver<'a> {
    dimensions: &'a [String],
}

impl Resolver<'_> {
    fn required(
        &self,
        chart: ViewId,
        role: &'static str,
        value: &Option<String>,
    ) -> Result<String, ValidationError> {
        let dimension = bound(value).ok_or(ValidationError::MissingRole { chart, role })?;
        self.known(chart, role, dimension)
    }

    fn optional(
        &self,
        chart: ViewId,
        role: &'static str,
        value: &Option<String>,
    ) -> Result<Option<String>, ValidationError> {
        bound(value)
            .map(|dimension| self.known(chart, role, dimension))
            .transpose()
    }

    fn known(
        &self,
        chart: ViewId,
        role: &'static str,
        dimension: &str,
    ) -> Result<String, ValidationError> {
        if self.dimensions.iter().any(|d| d == dimension) {
            Ok(dimension.to_string())
        } else {
            Err(ValidationError::UnknownDimension {
                chart,
                role,
                dimension: dimension.to_string(),
            })
        }
    }
}

impl DashboardMapping {
    /// Parse a mapping from JSON text
    pub fn from_json(raw: &str) -> Result<Self, DataError> {
        serde_json::from_str(raw).map_err(|e| DataError::Config(e.to_string()))
    }

    /// Load a mapping from a JSON file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, DataError> {
        serde_json::to_string_pretty(self).map_err(|e| DataError::Config(e.to_string()))
    }

    /// Check every required role against the loaded dimensions
    ///
    /// Missing roles are reported before a chord self-pairing, which is
    /// reported before a dimension absent from the dataset.
    pub fn resolve(&self, dimensions: &[String]) -> Result<ResolvedMapping, ValidationError> {
        if dimensions.is_empty() {
            return Err(ValidationError::NoDataset);
        }

        let required = [
            (ViewId::RadialBar, "category", &self.radial_bar.category),
            (ViewId::RadialBar, "value", &self.radial_bar.value),
            (ViewId::Chord, "source", &self.chord.source),
            (ViewId::Chord, "target", &self.chord.target),
            (ViewId::ForceDirected, "nodes", &self.force_directed.nodes),
            (ViewId::ForceDirected, "links", &self.force_directed.links),
            (ViewId::Sunburst, "level1", &self.sunburst.level1),
            (ViewId::Sunburst, "level2", &self.sunburst.level2),
            (ViewId::Sunburst, "value", &self.sunburst.value),
        ];
        if let Some((chart, role, _)) = required.iter().find(|(_, _, v)| bound(v).is_none()) {
            return Err(ValidationError::MissingRole {
                chart: *chart,
                role: *role,
            });
        }

        if bound(&self.chord.source) == bound(&self.chord.target) {
            return Err(ValidationError::SameChordDimensions);
        }

        let r = Resolver { dimensions };
        let resolved = ResolvedMapping {
            radial_bar: RadialBarDims {
                category: r.required(ViewId::RadialBar, "category", &self.radial_bar.category)?,
                value: r.required(ViewId::RadialBar, "value", &self.radial_bar.value)?,
            },
            chord: ChordDims {
                source: r.required(ViewId::Chord, "source", &self.chord.source)?,
                target: r.required(ViewId::Chord, "target", &self.chord.target)?,
            },
            force_directed: ForceGraphDims {
                nodes: r.required(ViewId::ForceDirected, "nodes", &self.force_directed.nodes)?,
                links: r.required(ViewId::ForceDirected, "links", &self.force_directed.links)?,
                group: r.optional(ViewId::ForceDirected, "group", &self.force_directed.group)?,
            },
            sunburst: SunburstDims {
                levels: {
                    let mut levels = vec![
                        r.required(ViewId::Sunburst, "level1", &self.sunburst.level1)?,
                        r.required(ViewId::Sunburst, "level2", &self.sunburst.level2)?,
                    ];
                    levels.extend(r.optional(ViewId::Sunburst, "level3", &self.sunburst.level3)?);
                    levels
                },
                value: r.required(ViewId::Sunburst, "value", &self.sunburst.value)?,
            },
        };

        tracing::debug!("Resolved dimension mapping: {:?}", resolved);
        Ok(resolved)
    }
}
