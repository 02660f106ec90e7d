use bl_data::{
    DashboardMapping, DataError, Dataset, DatasetStore, LoadOutcome, LoadTicket, RecordSource,
    ValidationError,
};

use crate::Dashboard;

/// Loaded dataset plus the dashboard generated from it
///
/// Loading a new dataset drops the dashboard; it has to be generated again
/// with a mapping that fits the new dimensions.
#[derive(Default)]
pub struct Session {
    store: DatasetStore,
    dashboard: Option<Dashboard>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.store.current()
    }

    pub fn dimensions(&self) -> &[String] {
        self.store.dimensions()
    }

    /// Load an in-memory payload
    pub fn load(&mut self, raw: &str) -> Result<Dataset, DataError> {
        let dataset = self.store.load(raw)?;
        self.dashboard = None;
        Ok(dataset)
    }

    /// Start an asynchronous load; see [`Session::finish_load`]
    pub fn begin_load(&mut self) -> LoadTicket {
        self.store.begin_load()
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, raw: &str) -> Result<LoadOutcome, DataError> {
        let outcome = self.store.complete_load(ticket, raw)?;
        self.settle(&outcome);
        Ok(outcome)
    }

    pub async fn load_from(&mut self, source: &dyn RecordSource) -> Result<LoadOutcome, DataError> {
        let outcome = self.store.load_from(source).await?;
        self.settle(&outcome);
        Ok(outcome)
    }

    fn settle(&mut self, outcome: &LoadOutcome) {
        if matches!(outcome, LoadOutcome::Applied(_)) && self.dashboard.take().is_some() {
            tracing::debug!("Dropped dashboard of the previous dataset");
        }
    }

    /// Role assignments suggested for the loaded dimensions
    pub fn suggest_mapping(&self) -> DashboardMapping {
        DashboardMapping::suggest(self.store.dimensions())
    }

    /// Validate `mapping` and replace the dashboard
    ///
    /// On error the previous dashboard stays in place.
    pub fn generate(&mut self, mapping: &DashboardMapping) -> Result<&mut Dashboard, DataError> {
        let dataset = self.store.current().ok_or(ValidationError::NoDataset)?;
        let dashboard = Dashboard::generate(dataset, mapping).map_err(|e| {
            tracing::warn!("Cannot generate dashboard: {}", e);
            e
        })?;
        Ok(self.dashboard.insert(dashboard))
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut Dashboard> {
        self.dashboard.as_mut()
    }
}
