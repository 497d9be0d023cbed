//! Upstream annual series: the fetcher contracts and their implementations.
//!
//! The core only ever sees plain [`SeriesPoint`] lists. Whether a missing
//! point means "zero" or "unknown" is decided by the consumer, not here.

mod eia;
mod memory;

use std::fmt;
use std::future::Future;

use thiserror::Error;

use crate::region::RegionId;

pub use eia::EiaClient;
pub use memory::MemorySource;

/// Fuel code of the canonical all-fuels generation series.
pub const ALL_FUELS: &str = "ALL";

/// One annual observation. `value` is `None` when the row exists but the
/// measured field was not reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn new(year: i32, value: f64) -> Self {
        Self {
            year,
            value: Some(value),
        }
    }

    /// A row for `year` that carries no value.
    pub fn unreported(year: i32) -> Self {
        Self { year, value: None }
    }
}

/// Returns the first point whose year equals `year`.
pub fn point_for_year(points: &[SeriesPoint], year: i32) -> Option<&SeriesPoint> {
    points.iter().find(|p| p.year == year)
}

/// Inclusive range of years requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesWindow {
    pub start: i32,
    pub end: i32,
}

impl SeriesWindow {
    /// `[year - 1, year + 1]`; the exact year is picked out afterwards since
    /// the upstream API does not always align periods with the bounds.
    pub fn around(year: i32) -> Self {
        Self {
            start: year - 1,
            end: year + 1,
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// The two interchange series that make up a region's net flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowSeries {
    /// Net imports across the national border.
    CrossBorder,
    /// Net interstate imports. Zero by convention for the nation.
    CrossRegion,
}

impl FlowSeries {
    /// Series identifier in the upstream energy-data catalog.
    pub fn series_id(self) -> &'static str {
        match self {
            Self::CrossBorder => "ELNIP",
            Self::CrossRegion => "ELISP",
        }
    }
}

impl fmt::Display for FlowSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.series_id())
    }
}

/// Transport-level failure. Always propagated, never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Annual electricity generation by fuel code and location.
pub trait GenerationFetcher: Send + Sync {
    /// Generation points for `fuel` in `region` within `window`.
    fn generation(
        &self,
        fuel: &str,
        region: &RegionId,
        window: SeriesWindow,
    ) -> impl Future<Output = Result<Vec<SeriesPoint>, FetchError>> + Send;

    /// Every available annual point for `fuel` in `region`, newest first.
    fn generation_history(
        &self,
        fuel: &str,
        region: &RegionId,
    ) -> impl Future<Output = Result<Vec<SeriesPoint>, FetchError>> + Send;
}

/// Annual net electricity interchange by series and location.
pub trait ImportExportFetcher: Send + Sync {
    fn interchange(
        &self,
        series: FlowSeries,
        region: &RegionId,
        window: SeriesWindow,
    ) -> impl Future<Output = Result<Vec<SeriesPoint>, FetchError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_pads_one_year_each_side() {
        let w = SeriesWindow::around(2022);
        assert_eq!((w.start, w.end), (2021, 2023));
        assert!(w.contains(2021));
        assert!(w.contains(2023));
        assert!(!w.contains(2024));
    }

    #[test]
    fn point_for_year_takes_first_match() {
        let points = vec![
            SeriesPoint::new(2023, 1.0),
            SeriesPoint::new(2022, 2.0),
            SeriesPoint::new(2022, 3.0),
        ];
        assert_eq!(point_for_year(&points, 2022).and_then(|p| p.value), Some(2.0));
        assert!(point_for_year(&points, 2021).is_none());
    }

    #[test]
    fn flow_series_ids() {
        assert_eq!(FlowSeries::CrossBorder.series_id(), "ELNIP");
        assert_eq!(FlowSeries::CrossRegion.to_string(), "ELISP");
    }
}
