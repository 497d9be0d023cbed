//! Catalog of years for which generation data is available.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::region::RegionId;
use crate::source::{ALL_FUELS, GenerationFetcher, SeriesPoint};

/// Available years, newest first, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct YearCatalog {
    years: Vec<i32>,
}

impl YearCatalog {
    /// Builds the catalog from the periods of a history series.
    pub fn from_history(points: &[SeriesPoint]) -> Self {
        Self::from_years(points.iter().map(|p| p.year))
    }

    pub fn from_years(years: impl IntoIterator<Item = i32>) -> Self {
        let mut years: Vec<i32> = years.into_iter().collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Self { years }
    }

    /// Queries the national all-fuels history once and builds the catalog.
    ///
    /// # Errors
    ///
    /// `Error::Fetch` on transport failure, `Error::NoYears` if the
    /// history is empty.
    pub async fn fetch<F: GenerationFetcher>(fetcher: &F) -> Result<Self> {
        let history = fetcher
            .generation_history(ALL_FUELS, &RegionId::national())
            .await?;
        let catalog = Self::from_history(&history);
        if catalog.years.is_empty() {
            return Err(Error::NoYears);
        }
        tracing::info!(
            latest = ?catalog.latest(),
            count = catalog.years.len(),
            "loaded year catalog"
        );
        Ok(catalog)
    }

    pub fn latest(&self) -> Option<i32> {
        self.years.first().copied()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }
}
