//! Fan-out/fan-in reconciliation of generation subsets for one selection.

use futures::future::{try_join, try_join_all};

use super::clean::CleanClassification;
use super::subset::SubsetCatalog;
use super::types::{Reconciliation, Selection, SubsetValue, SubsetValues};
use crate::error::{Error, Result};
use crate::region::{RegionCatalog, RegionId};
use crate::source::{ALL_FUELS, FetchError, GenerationFetcher, SeriesWindow, point_for_year};

/// Reconciles generation for a region and year into a total, per-subset
/// values and a clean total.
///
/// Holds only the startup-fixed subset catalog and region catalog; the
/// fetcher and classification are passed per call.
#[derive(Debug, Clone)]
pub struct GenerationAggregator {
    subsets: SubsetCatalog,
    regions: RegionCatalog,
}

impl GenerationAggregator {
    pub fn new(subsets: SubsetCatalog, regions: RegionCatalog) -> Self {
        Self { subsets, regions }
    }

    pub fn subsets(&self) -> &SubsetCatalog {
        &self.subsets
    }

    pub fn regions(&self) -> &RegionCatalog {
        &self.regions
    }

    /// Fetches every subset's fuel codes and the all-fuels total
    /// concurrently, then folds them into a [`Reconciliation`].
    ///
    /// A code with no point for the exact year, or whose point carries no
    /// value, contributes zero. The total comes from the all-fuels series,
    /// not from summing the subsets.
    ///
    /// # Errors
    ///
    /// `Error::UnknownRegion` if the region is not in the catalog, or
    /// `Error::Fetch` if any request fails. Nothing partial is returned.
    pub async fn reconcile<F: GenerationFetcher>(
        &self,
        fetcher: &F,
        selection: &Selection,
        clean: &CleanClassification,
    ) -> Result<Reconciliation> {
        if !self.regions.contains(&selection.region) {
            return Err(Error::UnknownRegion(selection.region.to_string()));
        }

        let region = &selection.region;
        let year = selection.year;
        let window = SeriesWindow::around(year);

        let total = generation_for_year(fetcher, ALL_FUELS, region, window, year);
        let subsets = try_join_all(self.subsets.iter().map(|subset| async move {
            let parts = try_join_all(
                subset
                    .fuel_codes
                    .iter()
                    .map(|code| generation_for_year(fetcher, code, region, window, year)),
            )
            .await?;
            Ok::<_, FetchError>(SubsetValue {
                key: subset.key.clone(),
                gwh: parts.into_iter().sum(),
            })
        }));

        let (total, by_subset) = try_join(total, subsets).await?;
        let by_subset = SubsetValues::new(by_subset);
        let clean = clean.total(&by_subset);

        tracing::debug!(
            %region,
            year,
            total,
            tracked = by_subset.tracked_sum(),
            clean,
            "reconciled generation"
        );

        Ok(Reconciliation {
            total,
            by_subset,
            clean,
        })
    }
}

/// Generation for `fuel` in the exact `year`, or zero when absent.
async fn generation_for_year<F: GenerationFetcher>(
    fetcher: &F,
    fuel: &str,
    region: &RegionId,
    window: SeriesWindow,
    year: i32,
) -> Result<f64, FetchError> {
    let points = fetcher.generation(fuel, region, window).await?;
    let value = point_for_year(&points, year).and_then(|p| p.value);
    if value.is_none() {
        tracing::debug!(fuel, %region, year, "no generation reported, using 0");
    }
    Ok(value.unwrap_or(0.0))
}
