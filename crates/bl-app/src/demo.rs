//! Bundled sample datasets

use bl_core::{Modifiers, ViewId};
use bl_render::ElementId;

/// Companies with sector, region and partner links
pub const COMPANIES: &str = r#"[
    {"Company": "Acme", "Sector": "Tech", "Region": "Asia", "Category": "Cloud", "Revenue": 1200, "ConnectedTo": ["Globex", "Initech"]},
    {"Company": "Globex", "Sector": "Finance", "Region": "EU", "Category": "Banking", "Revenue": 800, "ConnectedTo": ["Umbrella"]},
    {"Company": "Initech", "Sector": "Tech", "Region": "NA", "Category": "Software", "Revenue": 650, "ConnectedTo": ["Acme"]},
    {"Company": "Umbrella", "Sector": "Health", "Region": "EU", "Category": "Pharma", "Revenue": 940, "ConnectedTo": []},
    {"Company": "Hooli", "Sector": "Tech", "Region": "NA", "Category": "Cloud", "Revenue": 1500, "ConnectedTo": ["Initech", "Globex"]},
    {"Company": "Stark", "Sector": "Energy", "Region": "NA", "Category": "Renewables", "Revenue": 1100, "ConnectedTo": ["Hooli"]},
    {"Company": "Wayne", "Sector": "Finance", "Region": "NA", "Category": "Investment", "Revenue": 720, "ConnectedTo": ["Stark", "Acme"]},
    {"Company": "Soylent", "Sector": "Health", "Region": "Asia", "Category": "Nutrition", "Revenue": 300, "ConnectedTo": ["Umbrella"]}
]"#;

/// Artists with genre, region and collaborations
pub const MUSIC: &str = r#"[
    {"Artist": "Nova", "Genre": "Pop", "Region": "NA", "FollowersInMillions": 42.5, "CollaboratedWith": ["Echo"]},
    {"Artist": "Echo", "Genre": "Pop", "Region": "EU", "FollowersInMillions": 18.2, "CollaboratedWith": ["Nova", "Riff"]},
    {"Artist": "Riff", "Genre": "Rock", "Region": "EU", "FollowersInMillions": 9.7, "CollaboratedWith": []},
    {"Artist": "Pulse", "Genre": "Electronic", "Region": "Asia", "FollowersInMillions": 21.0, "CollaboratedWith": ["Echo"]},
    {"Artist": "Verse", "Genre": "HipHop", "Region": "NA", "FollowersInMillions": 33.1, "CollaboratedWith": ["Nova", "Pulse"]}
]"#;

/// One scripted gesture
pub struct Step {
    pub caption: &'static str,
    pub view: ViewId,
    pub element: Option<ElementId>,
    pub modifiers: Modifiers,
}

/// A short brushing session exercising every view
pub fn script() -> Vec<Step> {
    vec![
        Step {
            caption: "select the largest radial bar",
            view: ViewId::RadialBar,
            element: Some(ElementId::Bar(0)),
            modifiers: Modifiers::NONE,
        },
        Step {
            caption: "add a chord group with ctrl",
            view: ViewId::Chord,
            element: Some(ElementId::Group(0)),
            modifiers: Modifiers::CTRL,
        },
        Step {
            caption: "replace with a sunburst segment",
            view: ViewId::Sunburst,
            element: Some(ElementId::Segment(0)),
            modifiers: Modifiers::NONE,
        },
        Step {
            caption: "select a graph node",
            view: ViewId::ForceDirected,
            element: Some(ElementId::Node(0)),
            modifiers: Modifiers::NONE,
        },
        Step {
            caption: "click the radial background",
            view: ViewId::RadialBar,
            element: None,
            modifiers: Modifiers::NONE,
        },
    ]
}
