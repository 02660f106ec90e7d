//! Role suggestions for known dataset shapes

use super::mapping::DashboardMapping;

/// A role assignment applied when every required dimension is present
struct Preset {
    requires: &'static [&'static str],
    assign: fn(&mut Assigner<'_>),
}

/// Writes suggested roles, unbinding any role whose dimension is absent
struct Assigner<'a> {
    dimensions: &'a [String],
    mapping: &'a mut DashboardMapping,
}

impl Assigner<'_> {
    fn pick(&self, name: &str) -> Option<String> {
        self.dimensions
            .iter()
            .any(|d| d == name)
            .then(|| name.to_string())
    }
}

fn company_radial_bar(a: &mut Assigner<'_>) {
    a.mapping.radial_bar.category = a.pick("Sector");
    a.mapping.radial_bar.value = a.pick("Revenue");
}

fn company_chord(a: &mut Assigner<'_>) {
    a.mapping.chord.source = a.pick("Sector");
    a.mapping.chord.target = a.pick("Region");
}

fn company_network(a: &mut Assigner<'_>) {
    a.mapping.force_directed.nodes = a.pick("Company");
    a.mapping.force_directed.links = a.pick("ConnectedTo");
    a.mapping.force_directed.group = a.pick("Sector");
}

fn company_sunburst(a: &mut Assigner<'_>) {
    a.mapping.sunburst.level1 = a.pick("Region");
    a.mapping.sunburst.level2 = a.pick("Sector");
    a.mapping.sunburst.level3 = a.pick("Category");
    a.mapping.sunburst.value = a.pick("Revenue");
}

fn music_radial_bar(a: &mut Assigner<'_>) {
    a.mapping.radial_bar.category = a.pick("Genre");
    a.mapping.radial_bar.value = a.pick("FollowersInMillions");
}

fn music_chord(a: &mut Assigner<'_>) {
    a.mapping.chord.source = a.pick("Genre");
    a.mapping.chord.target = a.pick("Region");
}

fn music_network(a: &mut Assigner<'_>) {
    a.mapping.force_directed.nodes = a.pick("Artist");
    a.mapping.force_directed.links = a.pick("CollaboratedWith");
    a.mapping.force_directed.group = a.pick("Genre");
}

// level3 is left as it was
fn music_sunburst(a: &mut Assigner<'_>) {
    a.mapping.sunburst.level1 = a.pick("Region");
    a.mapping.sunburst.level2 = a.pick("Genre");
    a.mapping.sunburst.value = a.pick("FollowersInMillions");
}

const PRESETS: &[Preset] = &[
    Preset {
        requires: &["Company", "Revenue"],
        assign: company_radial_bar,
    },
    Preset {
        requires: &["Sector", "Region"],
        assign: company_chord,
    },
    Preset {
        requires: &["Company", "ConnectedTo", "Sector"],
        assign: company_network,
    },
    Preset {
        requires: &["Region", "Sector", "Category", "Revenue"],
        assign: company_sunburst,
    },
    Preset {
        requires: &["Artist", "FollowersInMillions"],
        assign: music_radial_bar,
    },
    Preset {
        requires: &["Genre", "Region"],
        assign: music_chord,
    },
    Preset {
        requires: &["Artist", "CollaboratedWith", "Genre"],
        assign: music_network,
    },
    Preset {
        requires: &["Region", "Genre", "FollowersInMillions"],
        assign: music_sunburst,
    },
];

impl DashboardMapping {
    /// Pre-fill roles for recognised dataset shapes
    ///
    /// Presets run in order and later ones override earlier ones. Roles no
    /// preset touches stay unbound.
    pub fn suggest(dimensions: &[String]) -> Self {
        let mut mapping = DashboardMapping::default();
        let mut applied = 0;

        for preset in PRESETS {
            if preset
                .requires
                .iter()
                .all(|name| dimensions.iter().any(|d| d == name))
            {
                let mut assigner = Assigner {
                    dimensions,
                    mapping: &mut mapping,
                };
                (preset.assign)(&mut assigner);
                applied += 1;
            }
        }

        tracing::debug!("Applied {} mapping presets", applied);
        mapping
    }
}
