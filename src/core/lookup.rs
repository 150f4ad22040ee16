use crate::core::{ContaminantId, FilterSource, WaterFilter};
use crate::utils::error::Result;

/// Looks up the filters that remove a given contaminant.
pub struct FilterLookup<S: FilterSource> {
    source: S,
}

impl<S: FilterSource> FilterLookup<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Filters whose `contaminants_filtered` set contains `contaminant`,
    /// in the order the source returns them.
    ///
    /// Any failure yields an empty vec, so an empty result can mean either
    /// "no matches" or "request failed". Use
    /// [`try_filters_by_contaminant`](Self::try_filters_by_contaminant) when
    /// the difference matters.
    pub async fn filters_by_contaminant(
        &self,
        contaminant: impl Into<ContaminantId>,
    ) -> Vec<WaterFilter> {
        let contaminant = contaminant.into();
        match self.try_filters_by_contaminant(contaminant).await {
            Ok(filters) => filters,
            Err(e) => {
                tracing::warn!(
                    "Lookup for contaminant {} failed, returning no filters: {} (Category: {:?})",
                    contaminant,
                    e,
                    e.category()
                );
                Vec::new()
            }
        }
    }

    pub async fn try_filters_by_contaminant(
        &self,
        contaminant: impl Into<ContaminantId>,
    ) -> Result<Vec<WaterFilter>> {
        let contaminant = contaminant.into();
        tracing::debug!(
            "Looking up filters for contaminant {} via {}",
            contaminant,
            self.source.describe()
        );

        let filters = self.source.select_containing(contaminant).await?;

        tracing::info!(
            "Found {} filters for contaminant {}",
            filters.len(),
            contaminant
        );
        Ok(filters)
    }
}
