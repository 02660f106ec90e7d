//! Scripted brushing session over a JSON dataset
//!
//! Usage: `brushlink-demo [data.json | music] [--mapping mapping.json]`

use std::sync::Arc;

use anyhow::{Context, Result};
use bl_core::ViewId;
use bl_data::{DashboardMapping, JsonFileSource, LoadOutcome, MemorySource, RecordSource};
use bl_render::{BufferedTooltip, ElementId, TextSurface};
use bl_views::Session;
use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

/// Command line arguments
#[derive(Debug, Default)]
struct Args {
    data: Option<String>,
    mapping: Option<String>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            if arg == "--mapping" {
                let path = args.next().context("--mapping needs a file path")?;
                parsed.mapping = Some(path);
            } else {
                parsed.data = Some(arg);
            }
        }
        Ok(parsed)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let source: Box<dyn RecordSource> = match args.data.as_deref() {
        Some("music") => Box::new(MemorySource::new("music sample", demo::MUSIC)),
        Some(path) => Box::new(JsonFileSource::new(path)?),
        None => Box::new(MemorySource::new("company sample", demo::COMPANIES)),
    };

    let mut session = Session::new();
    if let LoadOutcome::Superseded { .. } = session.load_from(source.as_ref()).await? {
        anyhow::bail!("load of {} was superseded", source.source_name());
    }
    info!("Dimensions: {:?}", session.dimensions());

    let mapping = match &args.mapping {
        Some(path) => DashboardMapping::from_file(path)
            .await
            .with_context(|| format!("failed to read mapping {}", path))?,
        None => session.suggest_mapping(),
    };
    info!("Mapping: {}", mapping.to_json()?);

    let dashboard = session
        .generate(&mapping)
        .context("dataset does not fit the mapping")?;
    let tooltip = Arc::new(Mutex::new(BufferedTooltip::new()));
    dashboard.set_tooltip(Box::new(tooltip.clone()));

    let mut surface = TextSurface::new();
    dashboard.present(&mut surface);
    print_lines("initial", &mut surface);

    for step in demo::script() {
        let reports = dashboard.click(step.view, step.element, step.modifiers);
        for report in &reports {
            info!("updated {:?}, cleared: {}", report.updated, report.cleared);
        }
        dashboard.present(&mut surface);
        print_lines(step.caption, &mut surface);
    }

    dashboard.hover(ViewId::Sunburst, ElementId::Segment(0), 0.0, 0.0);
    {
        let shown = tooltip.lock();
        if let (Some(html), Some(anchor)) = (shown.content(), shown.anchor()) {
            println!("tooltip at ({}, {}): {}", anchor.left, anchor.top, html);
        }
    }
    dashboard.hover_end(ViewId::Sunburst);

    Ok(())
}

fn print_lines(caption: &str, surface: &mut TextSurface) {
    println!("== {}", caption);
    for line in surface.take() {
        println!("  {}", line);
    }
}
