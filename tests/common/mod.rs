//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;

use gridmix::config::CapacityConfig;
use gridmix::mix::{
    CapacityTable, CapacityTables, CleanClassification, Dashboard, DisplaySettings,
    GenerationAggregator, SessionState, SubsetCatalog, YearCatalog,
};
use gridmix::region::{RegionCatalog, RegionId};
use gridmix::source::{
    FetchError, FlowSeries, GenerationFetcher, ImportExportFetcher, MemorySource, SeriesPoint,
    SeriesWindow,
};

/// Capacity config pointing at `tests/fixtures/capacity`.
pub fn fixture_capacity_config() -> CapacityConfig {
    CapacityConfig {
        directory: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/capacity"),
        data_years: "2021, 2023".to_string(),
        solar_open: "solar_open.csv".to_string(),
        solar_reference: "solar_reference.csv".to_string(),
        solar_limited: "solar_limited.csv".to_string(),
        wind_open: "wind_open.csv".to_string(),
        wind_reference: "wind_reference.csv".to_string(),
        wind_limited: "wind_limited.csv".to_string(),
        offshore_wind: "offshore_wind.csv".to_string(),
    }
}

/// Capacity table loaded from the on-disk fixtures.
pub fn fixture_capacity() -> CapacityTable {
    let tables = CapacityTables::read(&fixture_capacity_config()).expect("fixtures should load");
    CapacityTable::load(&RegionCatalog::united_states(), &tables)
}

/// Two years of national data plus California and Texas for 2022.
///
/// California 2022: total 200, wind 30, solar 50, hydro (HYC 15 + HPS 5),
/// natural gas 90. Texas 2022: total 480, wind 100, coal 150, gas 220.
pub fn fixture_source() -> MemorySource {
    MemorySource::new()
        .with_generation("ALL", "US", 2021, 4000.0)
        .with_generation("ALL", "US", 2022, 4200.0)
        .with_generation("WND", "US", 2022, 430.0)
        .with_generation("SUN", "US", 2022, 200.0)
        .with_generation("NUC", "US", 2022, 770.0)
        .with_generation("COW", "US", 2022, 830.0)
        .with_generation("NG", "US", 2022, 1700.0)
        .with_generation("WND", "US", 2021, 380.0)
        .with_generation("ALL", "CA", 2022, 200.0)
        .with_generation("WND", "CA", 2022, 30.0)
        .with_generation("SUN", "CA", 2022, 50.0)
        .with_generation("HYC", "CA", 2022, 15.0)
        .with_generation("HPS", "CA", 2022, 5.0)
        .with_generation("NG", "CA", 2022, 90.0)
        .with_unreported_generation("COW", "CA", 2022)
        .with_generation("ALL", "TX", 2022, 480.0)
        .with_generation("WND", "TX", 2022, 100.0)
        .with_generation("COW", "TX", 2022, 150.0)
        .with_generation("NG", "TX", 2022, 220.0)
        .with_flow(FlowSeries::CrossBorder, "US", 2022, 45.0)
        .with_flow(FlowSeries::CrossRegion, "US", 2022, 0.0)
        .with_flow(FlowSeries::CrossBorder, "CA", 2022, 10.0)
        .with_flow(FlowSeries::CrossRegion, "CA", 2022, 60.0)
        .with_flow(FlowSeries::CrossBorder, "TX", 2022, 0.0)
}

pub fn standard_session() -> SessionState {
    SessionState::new(
        CleanClassification::new(SubsetCatalog::standard_clean_keys()),
        DisplaySettings::default(),
    )
}

/// Dashboard over `source` with nothing committed, years 2022 and 2021.
pub fn dashboard<S>(source: S) -> Dashboard<S>
where
    S: GenerationFetcher + ImportExportFetcher,
{
    Dashboard::new(
        source,
        GenerationAggregator::new(SubsetCatalog::standard(), RegionCatalog::united_states()),
        fixture_capacity(),
        YearCatalog::from_years([2022, 2021]),
        standard_session(),
    )
}

/// Wraps a [`MemorySource`] and holds every generation request for one
/// region until [`GatedSource::open`] is called.
///
/// Lets a test complete a later selection while an earlier one is still
/// in flight.
pub struct GatedSource {
    inner: MemorySource,
    gated: RegionId,
    gate: Semaphore,
    waiting: AtomicUsize,
}

impl GatedSource {
    pub fn new(inner: MemorySource, gated: &str) -> Self {
        Self {
            inner,
            gated: RegionId::new(gated),
            gate: Semaphore::new(0),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Number of requests that have reached the gate.
    pub fn waiting(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    async fn pass(&self, region: &RegionId) -> Result<(), FetchError> {
        if *region != self.gated {
            return Ok(());
        }
        self.waiting.fetch_add(1, Ordering::SeqCst);
        self.gate
            .acquire()
            .await
            .map(drop)
            .map_err(|e| FetchError::Unavailable(e.to_string()))
    }
}

impl GenerationFetcher for GatedSource {
    async fn generation(
        &self,
        fuel: &str,
        region: &RegionId,
        window: SeriesWindow,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        self.pass(region).await?;
        self.inner.generation(fuel, region, window).await
    }

    async fn generation_history(
        &self,
        fuel: &str,
        region: &RegionId,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        self.inner.generation_history(fuel, region).await
    }
}

impl ImportExportFetcher for GatedSource {
    async fn interchange(
        &self,
        series: FlowSeries,
        region: &RegionId,
        window: SeriesWindow,
    ) -> Result<Vec<SeriesPoint>, FetchError> {
        self.inner.interchange(series, region, window).await
    }
}
