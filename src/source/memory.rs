//! In-memory series source for fixtures and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{
    FetchError, FlowSeries, GenerationFetcher, ImportExportFetcher, SeriesPoint, SeriesWindow,
};
use crate::region::RegionId;

/// Series held in hash maps, with a fetch counter and a failure switch.
///
/// Window queries return only the stored points inside the window, the
/// way the live API does. History queries return every stored point,
/// newest first.
#[derive(Debug, Default)]
pub struct MemorySource {
    generation: HashMap<(String, RegionId), Vec<SeriesPoint>>,
    interchange: HashMap<(FlowSeries, RegionId), Vec<SeriesPoint>>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a generation point for `fuel` in `region`.
    pub fn with_generation(mut self, fuel: &str, region: &str, year: i32, gwh: f64) -> Self {
        self.push_generation(fuel, region, SeriesPoint::new(year, gwh));
        self
    }

    /// Adds a generation row that exists but has no generation field.
    pub fn with_unreported_generation(mut self, fuel: &str, region: &str, year: i32) -> Self {
        self.push_generation(fuel, region, SeriesPoint::unreported(year));
        self
    }

    /// Adds an interchange point for `series` in `region`.
    pub fn with_flow(mut self, series: FlowSeries, region: &str, year: i32, gwh: f64) -> Self {
        self.interchange
            .entry((series, RegionId::new(region)))
            .or_default()
            .push(SeriesPoint::new(year, gwh));
        self
    }

    /// Makes every subsequent request fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of requests served or rejected so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn push_generation(&mut self, fuel: &str, region: &str, point: SeriesPoint) {
        self.generation
            .entry((fuel.to_string(), RegionId::new(region)))
            .or_default()
            .push(point);
    }

    fn record_fetch(&self) -> Result<(), FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable("memory source set to fail".to_string()));
        }
        Ok(())
    }
}

fn within(points: Option<&Vec<SeriesPoint>>, window: SeriesWindow) -> Vec<SeriesPoint> {
    points
        .map(|pts| {
            pts.iter()
                .filter(|p| window.contains(p.year))
                .copied()
                .collect()
        })
        .unwrap_or_default()
}

impl GenerationFetcher for MemorySource {
    async fn generation(
        &self,
        fuel: &str,
        region: &RegionId,
        window: SeriesWindow,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        self.record_fetch()?;
        let key = (fuel.to_string(), region.clone());
        Ok(within(self.generation.get(&key), window))
    }

    async fn generation_history(
        &self,
        fuel: &str,
        region: &RegionId,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        self.record_fetch()?;
        let key = (fuel.to_string(), region.clone());
        let mut points = self.generation.get(&key).cloned().unwrap_or_default();
        points.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(points)
    }
}

impl ImportExportFetcher for MemorySource {
    async fn interchange(
        &self,
        series: FlowSeries,
        region: &RegionId,
        window: SeriesWindow,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        self.record_fetch()?;
        let key = (series, region.clone());
        Ok(within(self.interchange.get(&key), window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn window_filters_stored_points() {
        let source = MemorySource::new()
            .with_generation("WND", "CA", 2019, 1.0)
            .with_generation("WND", "CA", 2021, 2.0)
            .with_generation("WND", "CA", 2022, 3.0);
        let points = source
            .generation("WND", &RegionId::new("CA"), SeriesWindow::around(2022))
            .await
            .expect("memory source should not fail");
        assert_eq!(points.len(), 2);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let source = MemorySource::new()
            .with_generation("ALL", "US", 2020, 1.0)
            .with_generation("ALL", "US", 2023, 2.0)
            .with_generation("ALL", "US", 2021, 3.0);
        let years: Vec<i32> = source
            .generation_history("ALL", &RegionId::national())
            .await
            .expect("memory source should not fail")
            .iter()
            .map(|p| p.year)
            .collect();
        assert_eq!(years, vec![2023, 2021, 2020]);
    }

    #[tokio::test]
    async fn failing_source_rejects_and_counts() {
        let source = MemorySource::new();
        source.set_failing(true);
        let result = source
            .interchange(
                FlowSeries::CrossBorder,
                &RegionId::national(),
                SeriesWindow::around(2022),
            )
            .await;
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
        assert_eq!(source.fetch_count(), 1);
    }
}
