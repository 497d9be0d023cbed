//! Session orchestrator: catalogs, cache and selection state behind one API.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::TryFutureExt;
use futures::future::try_join;
use serde::Serialize;

use super::aggregator::GenerationAggregator;
use super::capacity::{CapacityTable, Scenario, ScenarioCapacity};
use super::clean::CleanClassification;
use super::interchange::ImportExportResolver;
use super::session::{CommitOutcome, DisplaySettings, SessionState, Unit};
use super::subset::SubsetCatalog;
use super::types::{NetFlow, RegionMix, Selection, SubsetValues};
use super::years::YearCatalog;
use crate::error::{Error, Result};
use crate::region::{RegionCatalog, RegionId};
use crate::source::{GenerationFetcher, ImportExportFetcher};

/// One region's figures as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionReport {
    pub region: RegionId,
    pub name: String,
    pub year: i32,
    pub total_gwh: f64,
    pub clean_gwh: f64,
    pub by_subset: SubsetValues,
    pub net_flow: NetFlow,
    /// Capacity under the currently selected scenario.
    pub capacity: ScenarioCapacity,
}

/// Everything needed to render the dashboard for the committed selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub display: DisplaySettings,
    pub clean_subsets: Vec<String>,
    pub regional: RegionReport,
    pub national: RegionReport,
}

impl DashboardView {
    /// Whether the selected region is the national aggregate.
    pub fn is_national(&self) -> bool {
        self.selection.region.is_national()
    }

    /// Whether subset `key` is currently classified as clean.
    pub fn is_clean(&self, key: &str) -> bool {
        self.clean_subsets.iter().any(|k| k == key)
    }
}

/// Owns the data source, catalogs, a `(region, year)` cache and the
/// session state.
///
/// Selection changes fetch whatever is not cached, regional and national
/// concurrently, then commit through [`SessionState`] so that a slower,
/// older request can never overwrite a newer one. Classification and
/// display changes work purely on committed data.
pub struct Dashboard<S> {
    source: S,
    aggregator: GenerationAggregator,
    resolver: ImportExportResolver,
    capacity: CapacityTable,
    years: YearCatalog,
    cache: Mutex<HashMap<Selection, RegionMix>>,
    session: Mutex<SessionState>,
}

impl<S> Dashboard<S>
where
    S: GenerationFetcher + ImportExportFetcher,
{
    /// Creates a dashboard with nothing committed yet.
    pub fn new(
        source: S,
        aggregator: GenerationAggregator,
        capacity: CapacityTable,
        years: YearCatalog,
        session: SessionState,
    ) -> Self {
        Self {
            source,
            aggregator,
            resolver: ImportExportResolver,
            capacity,
            years,
            cache: Mutex::new(HashMap::new()),
            session: Mutex::new(session),
        }
    }

    /// Loads the year catalog and commits the national figures for the
    /// latest year.
    ///
    /// # Errors
    ///
    /// Any fetch failure, or `Error::NoYears` for an empty history.
    pub async fn initialize(
        source: S,
        aggregator: GenerationAggregator,
        capacity: CapacityTable,
        session: SessionState,
    ) -> Result<Self> {
        let years = YearCatalog::fetch(&source).await?;
        let latest = years.latest().ok_or(Error::NoYears)?;
        let dashboard = Self::new(source, aggregator, capacity, years, session);
        dashboard
            .select(Selection::new(RegionId::national(), latest))
            .await?;
        Ok(dashboard)
    }

    /// Reconciles `selection` and commits it unless a newer selection was
    /// issued in the meantime.
    ///
    /// # Errors
    ///
    /// `UnknownRegion`/`UnknownYear` for invalid input; `Fetch` if the
    /// source fails, in which case the committed view is left untouched.
    pub async fn select(&self, selection: Selection) -> Result<CommitOutcome> {
        if !self.aggregator.regions().contains(&selection.region) {
            return Err(Error::UnknownRegion(selection.region.to_string()));
        }
        if !self.years.contains(selection.year) {
            return Err(Error::UnknownYear(selection.year));
        }

        let tag = self.session().issue(&selection);
        let clean = self.session().clean().clone();

        let (regional, national) = if selection.region.is_national() {
            let mix = self.load_mix(&selection, &clean).await?;
            (mix.clone(), mix)
        } else {
            let national = selection.national();
            try_join(
                self.load_mix(&selection, &clean),
                self.load_mix(&national, &clean),
            )
            .await?
        };

        Ok(self.session().commit(tag, regional, national))
    }

    /// Changes the region, keeping the committed year (or the latest).
    pub async fn select_region(&self, region: RegionId) -> Result<CommitOutcome> {
        let year = self
            .current_selection()
            .map(|s| s.year)
            .or_else(|| self.years.latest())
            .ok_or(Error::NoYears)?;
        self.select(Selection::new(region, year)).await
    }

    /// Changes the year, keeping the committed region (or the nation).
    pub async fn select_year(&self, year: i32) -> Result<CommitOutcome> {
        let region = self
            .current_selection()
            .map_or_else(RegionId::national, |s| s.region);
        self.select(Selection::new(region, year)).await
    }

    /// Adds or removes a subset from the clean classification. No data is
    /// fetched.
    ///
    /// # Errors
    ///
    /// `Error::UnknownSubset` if `key` is not in the subset catalog.
    pub fn set_clean(&self, key: &str, clean: bool) -> Result<bool> {
        if !self.aggregator.subsets().contains(key) {
            return Err(Error::UnknownSubset(key.to_string()));
        }
        Ok(self.session().set_clean(key, clean))
    }

    pub fn set_unit(&self, unit: Unit) {
        self.session().set_unit(unit);
    }

    pub fn set_scenario(&self, scenario: Scenario) {
        self.session().set_scenario(scenario);
    }

    /// Snapshot of the committed state, or `None` before the first commit.
    pub fn view(&self) -> Option<DashboardView> {
        let session = self.session();
        let committed = session.committed()?;
        let display = session.display();
        Some(DashboardView {
            selection: committed.selection.clone(),
            display,
            clean_subsets: session.clean().keys().map(str::to_string).collect(),
            regional: self.report(&committed.regional, display.scenario),
            national: self.report(&committed.national, display.scenario),
        })
    }

    pub fn regions(&self) -> &RegionCatalog {
        self.aggregator.regions()
    }

    pub fn subsets(&self) -> &SubsetCatalog {
        self.aggregator.subsets()
    }

    pub fn years(&self) -> &YearCatalog {
        &self.years
    }

    pub fn capacity(&self) -> &CapacityTable {
        &self.capacity
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn current_selection(&self) -> Option<Selection> {
        self.session().committed().map(|c| c.selection.clone())
    }

    async fn load_mix(
        &self,
        selection: &Selection,
        clean: &CleanClassification,
    ) -> Result<RegionMix> {
        let cached = self.cache().get(selection).cloned();
        if let Some(mix) = cached {
            tracing::debug!(region = %selection.region, year = selection.year, "cache hit");
            return Ok(mix);
        }

        let (generation, net_flow) = try_join(
            self.aggregator.reconcile(&self.source, selection, clean),
            self.resolver
                .resolve(&self.source, selection)
                .map_err(Error::from),
        )
        .await?;

        let mix = RegionMix {
            selection: selection.clone(),
            generation,
            net_flow,
        };
        self.cache().insert(selection.clone(), mix.clone());
        Ok(mix)
    }

    fn report(&self, mix: &RegionMix, scenario: Scenario) -> RegionReport {
        let region = &mix.selection.region;
        let capacity = self
            .capacity
            .get(region)
            .map_or(ScenarioCapacity::ABSENT, |entry| *entry.scenario(scenario));
        RegionReport {
            region: region.clone(),
            name: self.regions().display_name(region).to_string(),
            year: mix.selection.year,
            total_gwh: mix.generation.total,
            clean_gwh: mix.generation.clean,
            by_subset: mix.generation.by_subset.clone(),
            net_flow: mix.net_flow,
            capacity,
        }
    }

    fn session(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<Selection, RegionMix>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
