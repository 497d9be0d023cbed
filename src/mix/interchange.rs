//! Net import/export resolution from the two interchange series.

use futures::future::try_join;

use super::types::{NetFlow, Selection};
use crate::source::{FetchError, FlowSeries, ImportExportFetcher, SeriesWindow, point_for_year};

/// Combines the cross-border and cross-region series into one [`NetFlow`].
///
/// Unlike generation, a missing value here is not zero: if either series
/// lacks the requested year the result is `NetFlow::Unknown`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportExportResolver;

impl ImportExportResolver {
    /// Resolves the net flow for `selection`.
    ///
    /// Both series are requested concurrently over `[year - 1, year + 1]`
    /// and filtered to the exact year. The national cross-region series is
    /// zero by upstream convention and is summed like any other.
    ///
    /// # Errors
    ///
    /// Returns the first transport failure of either request.
    pub async fn resolve<F: ImportExportFetcher>(
        &self,
        fetcher: &F,
        selection: &Selection,
    ) -> Result<NetFlow, FetchError> {
        let window = SeriesWindow::around(selection.year);
        let region = &selection.region;

        let (cross_border, cross_region) = try_join(
            fetcher.interchange(FlowSeries::CrossBorder, region, window),
            fetcher.interchange(FlowSeries::CrossRegion, region, window),
        )
        .await?;

        let year = selection.year;
        let border = point_for_year(&cross_border, year).and_then(|p| p.value);
        let interstate = point_for_year(&cross_region, year).and_then(|p| p.value);

        let flow = match (border, interstate) {
            (Some(b), Some(r)) => NetFlow::Known(b + r),
            _ => {
                tracing::debug!(
                    %region,
                    year,
                    has_cross_border = border.is_some(),
                    has_cross_region = interstate.is_some(),
                    "interchange incomplete, net flow unknown"
                );
                NetFlow::Unknown
            }
        };
        Ok(flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionId;
    use crate::source::MemorySource;

    fn ny_2022() -> Selection {
        Selection::new(RegionId::new("NY"), 2022)
    }

    #[tokio::test]
    async fn sums_both_series() {
        let source = MemorySource::new()
            .with_flow(FlowSeries::CrossBorder, "NY", 2022, 20.0)
            .with_flow(FlowSeries::CrossRegion, "NY", 2022, -50.0);
        let flow = ImportExportResolver
            .resolve(&source, &ny_2022())
            .await
            .expect("resolve should succeed");
        assert_eq!(flow, NetFlow::Known(-30.0));
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn one_missing_series_is_unknown_not_partial() {
        let source = MemorySource::new()
            .with_flow(FlowSeries::CrossBorder, "NY", 2022, 20.0)
            .with_flow(FlowSeries::CrossRegion, "NY", 2021, 5.0);
        let flow = ImportExportResolver
            .resolve(&source, &ny_2022())
            .await
            .expect("resolve should succeed");
        assert_eq!(flow, NetFlow::Unknown);
    }

    #[tokio::test]
    async fn zero_values_are_known() {
        let source = MemorySource::new()
            .with_flow(FlowSeries::CrossBorder, "US", 2022, 40.0)
            .with_flow(FlowSeries::CrossRegion, "US", 2022, 0.0);
        let flow = ImportExportResolver
            .resolve(&source, &Selection::new(RegionId::national(), 2022))
            .await
            .expect("resolve should succeed");
        assert_eq!(flow, NetFlow::Known(40.0));
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let source = MemorySource::new();
        source.set_failing(true);
        let result = ImportExportResolver.resolve(&source, &ny_2022()).await;
        assert!(result.is_err());
    }
}
