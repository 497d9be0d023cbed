//! Session-scoped selection state with stale-result rejection.
//!
//! Every reconciliation is tagged when issued. Only the most recently
//! issued tag may commit; anything older that completes later is
//! discarded so it cannot overwrite newer results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::capacity::Scenario;
use super::clean::CleanClassification;
use super::types::{RegionMix, Selection};

/// How generation figures are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Annual energy, GWh.
    #[default]
    Energy,
    /// Average power over the year, GW.
    Power,
}

impl Unit {
    pub const ALL: [Unit; 2] = [Unit::Energy, Unit::Power];

    pub fn label(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Power => "power",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.label() == s.trim())
            .ok_or_else(|| format!("unknown unit \"{s}\", expected \"energy\" or \"power\""))
    }
}

/// Presentation-only settings; changing them never triggers a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub unit: Unit,
    pub scenario: Scenario,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            unit: Unit::Energy,
            scenario: Scenario::Limited,
        }
    }
}

/// Monotonic tag identifying one issued reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTag(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    Applied,
    /// A newer request was issued after this one; its result was dropped.
    Stale,
}

/// The last successfully committed regional and national data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommittedView {
    pub selection: Selection,
    pub regional: RegionMix,
    pub national: RegionMix,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    latest: u64,
    committed: Option<CommittedView>,
    clean: CleanClassification,
    display: DisplaySettings,
}

impl SessionState {
    pub fn new(clean: CleanClassification, display: DisplaySettings) -> Self {
        Self {
            latest: 0,
            committed: None,
            clean,
            display,
        }
    }

    /// Tags a new reconciliation for `selection`, superseding every
    /// earlier tag.
    pub fn issue(&mut self, selection: &Selection) -> RequestTag {
        self.latest += 1;
        tracing::debug!(tag = self.latest, region = %selection.region, year = selection.year, "issued reconciliation");
        RequestTag(self.latest)
    }

    pub fn is_current(&self, tag: RequestTag) -> bool {
        tag.0 == self.latest
    }

    /// Commits fetched data if `tag` is still the latest issued one.
    ///
    /// Clean totals are recomputed against the classification in force at
    /// commit time, so toggles made while the fetch was in flight apply.
    pub fn commit(
        &mut self,
        tag: RequestTag,
        mut regional: RegionMix,
        mut national: RegionMix,
    ) -> CommitOutcome {
        if !self.is_current(tag) {
            tracing::warn!(
                tag = tag.0,
                latest = self.latest,
                region = %regional.selection.region,
                year = regional.selection.year,
                "discarding stale reconciliation"
            );
            return CommitOutcome::Stale;
        }

        regional.generation.reclassify(&self.clean);
        national.generation.reclassify(&self.clean);
        tracing::info!(
            region = %regional.selection.region,
            year = regional.selection.year,
            total_gwh = regional.generation.total,
            clean_gwh = regional.generation.clean,
            "committed reconciliation"
        );
        self.committed = Some(CommittedView {
            selection: regional.selection.clone(),
            regional,
            national,
        });
        CommitOutcome::Applied
    }

    /// Adds or removes `key` from the clean classification and recomputes
    /// the committed clean totals from cached values. Returns `true` if the
    /// classification changed.
    pub fn set_clean(&mut self, key: &str, clean: bool) -> bool {
        let changed = self.clean.set(key, clean);
        if let Some(view) = self.committed.as_mut() {
            view.regional.generation.reclassify(&self.clean);
            view.national.generation.reclassify(&self.clean);
        }
        changed
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.display.unit = unit;
    }

    pub fn set_scenario(&mut self, scenario: Scenario) {
        self.display.scenario = scenario;
    }

    pub fn committed(&self) -> Option<&CommittedView> {
        self.committed.as_ref()
    }

    pub fn clean(&self) -> &CleanClassification {
        &self.clean
    }

    pub fn display(&self) -> DisplaySettings {
        self.display
    }
}
