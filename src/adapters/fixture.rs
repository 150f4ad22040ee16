use crate::core::{ContaminantId, FilterSource, Storage, WaterFilter};
use crate::domain::model::{filters_from_rows, CONTAMINANTS_FIELD};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Serves filter rows from a JSON array on disk, applying the same
/// containment predicate the backend would.
pub struct FixtureFilterSource<S: Storage> {
    storage: S,
    path: String,
    column: String,
}

impl<S: Storage> FixtureFilterSource<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
            column: CONTAMINANTS_FIELD.to_string(),
        }
    }

    /// Reads the contaminant list from `column` instead of
    /// `contaminants_filtered`.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    async fn load(&self) -> Result<Vec<WaterFilter>> {
        let bytes = self.storage.read_file(&self.path).await?;
        let rows: Vec<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_slice(&bytes)?;
        let filters = filters_from_rows(rows, &self.column)?;
        tracing::debug!("Loaded {} fixture rows from {}", filters.len(), self.path);
        Ok(filters)
    }
}

#[async_trait]
impl<S: Storage> FilterSource for FixtureFilterSource<S> {
    async fn select_containing(&self, contaminant: ContaminantId) -> Result<Vec<WaterFilter>> {
        let filters = self.load().await?;
        Ok(filters
            .into_iter()
            .filter(|filter| filter.filters(contaminant))
            .collect())
    }

    fn describe(&self) -> String {
        format!("fixture:{}", self.path)
    }
}
