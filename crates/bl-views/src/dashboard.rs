//! A generated dashboard: four linked views over one dataset

use bl_core::{
    ActiveFilterSet, DispatchReport, Dispatcher, Interaction, InteractionQueue, InteractionSink,
    Modifiers, Record, SelectionCoordinator, ViewId,
};
use bl_data::{DashboardMapping, Dataset, ResolvedMapping, ValidationError};
use bl_render::{Anchor, ElementId, NoopTooltip, Surface, Tooltip, ViewFrame};

use crate::adapters::build_view;
use crate::ChartView;

/// Owns the selection state and routes gestures between views
///
/// Views report gestures into a queue; the dashboard drains it after each
/// gesture, so a broadcast never runs while a view is still handling input.
pub struct Dashboard {
    coordinator: SelectionCoordinator,
    views: Dispatcher<dyn ChartView>,
    queue: InteractionQueue,
    mapping: ResolvedMapping,
    tooltip: Box<dyn Tooltip>,
}

impl Dashboard {
    /// Validate `mapping` against the dataset and build every view
    pub fn generate(
        dataset: &Dataset,
        mapping: &DashboardMapping,
    ) -> Result<Self, ValidationError> {
        let mapping = mapping.resolve(dataset.dimensions())?;
        let queue = InteractionQueue::new();

        let mut views: Dispatcher<dyn ChartView> = Dispatcher::new();
        for kind in ViewId::ALL {
            views.register(build_view(kind, dataset.records(), &mapping, queue.sink()));
        }

        tracing::info!(
            "Generated dashboard over {} records (load {})",
            dataset.len(),
            dataset.generation()
        );
        Ok(Self {
            coordinator: SelectionCoordinator::new(dataset.records().clone()),
            views,
            queue,
            mapping,
            tooltip: Box::new(NoopTooltip),
        })
    }

    /// Route hover tooltips to `tooltip`
    pub fn set_tooltip(&mut self, tooltip: Box<dyn Tooltip>) {
        self.tooltip = tooltip;
    }

    pub fn mapping(&self) -> &ResolvedMapping {
        &self.mapping
    }

    pub fn view(&self, view: ViewId) -> Option<&dyn ChartView> {
        self.views.get(view)
    }

    pub fn frame(&self, view: ViewId) -> Option<ViewFrame> {
        self.views.get(view).map(|v| v.frame())
    }

    pub fn active_filters(&self) -> &ActiveFilterSet {
        self.coordinator.filters()
    }

    pub fn filtered_records(&self) -> Vec<Record> {
        self.coordinator.filtered()
    }

    /// Click an element of a view (`None` for its background)
    ///
    /// Returns one report per interaction the click produced.
    pub fn click(
        &mut self,
        view: ViewId,
        element: Option<ElementId>,
        modifiers: Modifiers,
    ) -> Vec<DispatchReport> {
        match self.views.get_mut(view) {
            Some(adapter) => adapter.click(element, modifiers),
            None => tracing::warn!("Click on unregistered view {}", view),
        }
        self.process_pending()
    }

    /// Handle an interaction directly, as if a view had emitted it
    pub fn submit(&mut self, interaction: Interaction) -> Vec<DispatchReport> {
        self.queue.emit(interaction);
        self.process_pending()
    }

    /// Drain queued interactions through the coordinator and dispatcher
    pub fn process_pending(&mut self) -> Vec<DispatchReport> {
        let mut reports = Vec::new();
        while let Some(interaction) = self.queue.pop() {
            let selection = self.coordinator.handle_interaction(interaction);
            reports.push(self.views.dispatch(&selection));
        }
        reports
    }

    /// Hover an element with the pointer at `(x, y)`
    pub fn hover(&mut self, view: ViewId, element: ElementId, x: f64, y: f64) -> Option<String> {
        let html = self.views.get_mut(view)?.hover(element)?;
        self.tooltip.show(Anchor::from_pointer(x, y), &html);
        Some(html)
    }

    pub fn hover_end(&mut self, view: ViewId) {
        if let Some(adapter) = self.views.get_mut(view) {
            adapter.hover_end();
        }
        self.tooltip.hide();
    }

    /// Forget the selection and return every view to normal
    pub fn reset(&mut self) {
        self.queue.clear();
        self.coordinator.reset();
        self.views.clear_all();
    }

    /// Draw every view in registration order
    pub fn present(&self, surface: &mut dyn Surface) {
        for view in self.views.views() {
            surface.present(&view.frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bl_core::FilterDescriptor;
    use bl_data::DatasetStore;
    use bl_render::{BufferedTooltip, ElementState, TextSurface};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    const COMPANIES: &str = r#"[
        {"Company": "A", "Sector": "Tech", "Region": "Asia", "Revenue": 100, "ConnectedTo": ["B"]},
        {"Company": "B", "Sector": "Tech", "Region": "EU", "Revenue": 50, "ConnectedTo": ["C"]},
        {"Company": "C", "Sector": "Finance", "Region": "Asia", "Revenue": 70, "ConnectedTo": []}
    ]"#;

    fn mapping() -> DashboardMapping {
        DashboardMapping::from_json(
            r#"{
                "radialBar": {"category": "Sector", "value": "Revenue"},
                "chord": {"source": "Sector", "target": "Region"},
                "forceDirected": {"nodes": "Company", "links": "ConnectedTo", "group": "Sector"},
                "sunburst": {"level1": "Region", "level2": "Sector", "value": "Revenue"}
            }"#,
        )
        .unwrap()
    }

    fn dashboard(raw: &str) -> Dashboard {
        let mut store = DatasetStore::new();
        let dataset = store.load(raw).unwrap();
        Dashboard::generate(&dataset, &mapping()).unwrap()
    }

    fn states(dashboard: &Dashboard, view: ViewId, state: ElementState) -> Vec<String> {
        dashboard
            .frame(view)
            .unwrap()
            .labels_in(state)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_radial_click_links_every_view() {
        let mut dashboard = dashboard(COMPANIES);

        // Bars are sorted: Tech (150), Finance (70)
        let reports = dashboard.click(ViewId::RadialBar, Some(ElementId::Bar(0)), Modifiers::NONE);

        assert_eq!(reports.len(), 1);
        assert_eq!(
            reports[0].updated,
            vec![ViewId::Chord, ViewId::ForceDirected, ViewId::Sunburst]
        );
        assert_eq!(
            dashboard.active_filters().keys().collect::<Vec<_>>(),
            vec!["Sector|Tech"]
        );
        let companies: Vec<_> = dashboard
            .filtered_records()
            .iter()
            .map(|r| r.get("Company").cloned())
            .collect();
        assert_eq!(companies, vec![Some(json!("A")), Some(json!("B"))]);

        assert_eq!(states(&dashboard, ViewId::RadialBar, ElementState::Highlighted), ["Tech"]);
        assert_eq!(
            states(&dashboard, ViewId::Chord, ElementState::Highlighted),
            ["Tech", "Tech>Asia", "Tech>EU"]
        );
        assert_eq!(
            states(&dashboard, ViewId::ForceDirected, ElementState::Dimmed),
            ["C", "B>C"]
        );
        assert_eq!(
            states(&dashboard, ViewId::Sunburst, ElementState::Highlighted),
            ["Tech", "Tech"]
        );
    }

    #[test]
    fn test_multi_select_narrows_then_restores() {
        let mut dashboard = dashboard(COMPANIES);
        dashboard.click(ViewId::RadialBar, Some(ElementId::Bar(0)), Modifiers::NONE);

        // Chord entities: Asia, EU, Finance, Tech; Asia only occurs as a Region
        let reports = dashboard.click(ViewId::Chord, Some(ElementId::Group(0)), Modifiers::CTRL);
        assert_eq!(
            reports[0].updated,
            vec![ViewId::RadialBar, ViewId::ForceDirected, ViewId::Sunburst]
        );
        assert_eq!(dashboard.active_filters().len(), 2);
        assert_eq!(dashboard.filtered_records().len(), 1);
        assert_eq!(states(&dashboard, ViewId::RadialBar, ElementState::Dimmed), ["Finance"]);

        dashboard.click(ViewId::Chord, Some(ElementId::Group(0)), Modifiers::CTRL);
        assert_eq!(
            dashboard.active_filters().keys().collect::<Vec<_>>(),
            vec!["Sector|Tech"]
        );
        assert_eq!(dashboard.filtered_records().len(), 2);
    }

    #[test]
    fn test_deselecting_own_filter_refreshes_origin() {
        let mut dashboard = dashboard(COMPANIES);
        dashboard.click(ViewId::RadialBar, Some(ElementId::Bar(0)), Modifiers::NONE);
        dashboard.click(ViewId::Chord, Some(ElementId::Group(0)), Modifiers::CTRL);

        // Ctrl-click Tech again: only Region|Asia remains
        let reports = dashboard.click(ViewId::RadialBar, Some(ElementId::Bar(0)), Modifiers::CTRL);

        assert!(reports[0].updated.contains(&ViewId::RadialBar));
        assert_eq!(
            dashboard.active_filters().keys().collect::<Vec<_>>(),
            vec!["Region|Asia"]
        );
        assert_eq!(dashboard.filtered_records().len(), 2);
        assert!(states(&dashboard, ViewId::RadialBar, ElementState::Highlighted).is_empty());
        assert!(states(&dashboard, ViewId::RadialBar, ElementState::Dimmed).is_empty());
    }

    #[test]
    fn test_toggling_off_last_filter_clears_every_view() {
        let mut dashboard = dashboard(COMPANIES);
        dashboard.click(ViewId::Sunburst, Some(ElementId::Segment(0)), Modifiers::CTRL);
        assert!(!dashboard.active_filters().is_empty());

        let reports =
            dashboard.click(ViewId::Sunburst, Some(ElementId::Segment(0)), Modifiers::CTRL);

        assert!(reports[0].cleared);
        assert!(reports[0].updated.is_empty());
        for view in ViewId::ALL {
            assert!(states(&dashboard, view, ElementState::Dimmed).is_empty());
            assert!(states(&dashboard, view, ElementState::Highlighted).is_empty());
        }
    }

    #[test]
    fn test_background_click_clears_selection() {
        let mut dashboard = dashboard(COMPANIES);
        dashboard.click(ViewId::ForceDirected, Some(ElementId::Node(0)), Modifiers::NONE);
        assert_eq!(dashboard.active_filters().keys().collect::<Vec<_>>(), vec!["Company|A"]);

        let reports = dashboard.click(ViewId::Chord, None, Modifiers::CTRL);
        assert!(reports[0].cleared);
        assert!(dashboard.active_filters().is_empty());
        assert_eq!(dashboard.filtered_records().len(), 3);
    }

    #[test]
    fn test_hover_shows_and_hides_tooltip() {
        let shown = Arc::new(Mutex::new(BufferedTooltip::new()));
        let mut dashboard = dashboard(COMPANIES);
        dashboard.set_tooltip(Box::new(shown.clone()));
        dashboard.click(ViewId::RadialBar, Some(ElementId::Bar(1)), Modifiers::NONE);
        let applied = dashboard.frame(ViewId::RadialBar);

        let html = dashboard.hover(ViewId::RadialBar, ElementId::Bar(0), 40.0, 40.0);
        assert_eq!(html.as_deref(), Some("<strong>Tech</strong><br/>Value: 150"));
        assert_eq!(shown.lock().content(), html.as_deref());
        assert_eq!(shown.lock().anchor(), Some(Anchor { left: 50.0, top: 12.0 }));

        dashboard.hover_end(ViewId::RadialBar);
        assert!(!shown.lock().is_visible());
        assert_eq!(dashboard.frame(ViewId::RadialBar), applied);
    }

    #[test]
    fn test_placeholder_views_stay_linked() {
        let raw = json!([
            {"Company": "A", "Sector": "Tech", "Region": "Asia", "Revenue": 0, "ConnectedTo": []},
            {"Company": "B", "Sector": "Energy", "Region": "Asia", "Revenue": 0, "ConnectedTo": []}
        ])
        .to_string();
        let mut dashboard = dashboard(&raw);
        assert!(dashboard.frame(ViewId::Sunburst).unwrap().placeholder.is_some());

        let reports = dashboard.click(ViewId::RadialBar, Some(ElementId::Bar(0)), Modifiers::NONE);
        assert!(reports[0].updated.contains(&ViewId::Sunburst));

        let mut surface = TextSurface::new();
        dashboard.present(&mut surface);
        let lines = surface.take();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("[sunburst] No data to display"));
    }

    #[test]
    fn test_submit_and_reset() {
        let mut dashboard = dashboard(COMPANIES);
        dashboard.submit(Interaction::new(
            ViewId::Sunburst,
            FilterDescriptor::category("Region", json!("Asia")),
            Modifiers::NONE,
        ));
        assert_eq!(dashboard.filtered_records().len(), 2);

        dashboard.reset();
        assert!(dashboard.active_filters().is_empty());
        assert!(states(&dashboard, ViewId::Chord, ElementState::Highlighted).is_empty());
    }

    #[test]
    fn test_invalid_mapping_blocks_generation() {
        let mut store = DatasetStore::new();
        let dataset = store.load(COMPANIES).unwrap();
        let mut mapping = mapping();
        mapping.chord.target = Some("Sector".into());

        assert_eq!(
            Dashboard::generate(&dataset, &mapping).err(),
            Some(ValidationError::SameChordDimensions)
        );
    }
}
