//! Renewable-capacity reference tables by region, scenario and technology.
//!
//! The tables are pre-computed externally and already converted to GWh so
//! they compare directly with annual generation.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CapacityConfig;
use crate::error::{Error, Result};
use crate::region::{RegionCatalog, RegionId};

/// Siting-restriction level, least to most restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Open,
    Reference,
    Limited,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Open, Scenario::Reference, Scenario::Limited];

    fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Reference => "reference",
            Self::Limited => "limited",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sc| sc.label() == s.trim())
            .ok_or_else(|| format!("unknown capacity scenario \"{s}\""))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    Solar,
    Wind,
    /// Reported for the national aggregate only.
    OffshoreWind,
}

/// A capacity figure (GWh-equivalent) or an explicit "not in the source
/// table" marker. `Absent` is never coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "gwh", rename_all = "snake_case")]
pub enum Capacity {
    Present(f64),
    Absent,
}

impl Capacity {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent => None,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Capacities of every technology under one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioCapacity {
    pub solar: Capacity,
    pub wind: Capacity,
    pub offshore_wind: Capacity,
}

impl ScenarioCapacity {
    pub const ABSENT: Self = Self {
        solar: Capacity::Absent,
        wind: Capacity::Absent,
        offshore_wind: Capacity::Absent,
    };

    pub fn get(&self, technology: Technology) -> Capacity {
        match technology {
            Technology::Solar => self.solar,
            Technology::Wind => self.wind,
            Technology::OffshoreWind => self.offshore_wind,
        }
    }

    fn slot(&mut self, technology: Technology) -> &mut Capacity {
        match technology {
            Technology::Solar => &mut self.solar,
            Technology::Wind => &mut self.wind,
            Technology::OffshoreWind => &mut self.offshore_wind,
        }
    }

    /// Onshore solar plus wind, or `None` if either is absent.
    pub fn onshore_total(&self) -> Option<f64> {
        Some(self.solar.value()? + self.wind.value()?)
    }
}

/// Capacity of one region across all scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityEntry {
    scenarios: [ScenarioCapacity; 3],
}

impl CapacityEntry {
    /// Every (scenario, technology) pair absent.
    pub fn absent() -> Self {
        Self {
            scenarios: [ScenarioCapacity::ABSENT; 3],
        }
    }

    /// Onshore sums start from zero; offshore stays absent until the
    /// offshore table fills it in.
    fn national_zero() -> Self {
        let zero = ScenarioCapacity {
            solar: Capacity::Present(0.0),
            wind: Capacity::Present(0.0),
            offshore_wind: Capacity::Absent,
        };
        Self {
            scenarios: [zero; 3],
        }
    }

    pub fn scenario(&self, scenario: Scenario) -> &ScenarioCapacity {
        &self.scenarios[scenario.index()]
    }

    pub fn get(&self, scenario: Scenario, technology: Technology) -> Capacity {
        self.scenario(scenario).get(technology)
    }

    fn set(&mut self, scenario: Scenario, technology: Technology, gwh: f64) {
        *self.scenarios[scenario.index()].slot(technology) = Capacity::Present(gwh);
    }

    fn accumulate(&mut self, scenario: Scenario, technology: Technology, gwh: f64) {
        let slot = self.scenarios[scenario.index()].slot(technology);
        *slot = Capacity::Present(slot.value().unwrap_or(0.0) + gwh);
    }
}

/// Parsed rows of one regional table: `[_, region name, capacity]`.
#[derive(Debug, Clone)]
pub struct RegionalTable {
    pub scenario: Scenario,
    pub technology: Technology,
    pub rows: Vec<Vec<String>>,
}

/// The raw inputs to [`CapacityTable::load`]: six regional
/// scenario/technology tables and the national offshore-wind table, whose
/// rows are `[_, scenario label, capacity]`. Header rows are already
/// stripped.
#[derive(Debug, Clone, Default)]
pub struct CapacityTables {
    pub regional: Vec<RegionalTable>,
    pub offshore: Vec<Vec<String>>,
}

impl CapacityTables {
    /// Reads the seven configured files from the capacity directory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a file cannot be opened, or
    /// `Error::CapacityTable` if it is not valid CSV.
    pub fn read(config: &CapacityConfig) -> Result<Self> {
        let dir = config.directory.as_path();
        let mut regional = Vec::with_capacity(6);
        for (scenario, technology, name) in config.regional_files() {
            regional.push(RegionalTable {
                scenario,
                technology,
                rows: read_table(&dir.join(name))?,
            });
        }
        let offshore = read_table(&dir.join(&config.offshore_wind))?;
        tracing::debug!(dir = %dir.display(), "read capacity tables");
        Ok(Self { regional, offshore })
    }
}

fn read_table(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = File::open(path)?;
    parse_rows(file).map_err(|source| Error::CapacityTable {
        path: path.display().to_string(),
        source,
    })
}

/// Parses CSV text into rows, dropping the header row.
///
/// Rows may have differing column counts; short rows are dealt with at
/// load time.
pub fn parse_rows(reader: impl Read) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    rdr.records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}

/// Per-region capacities plus the national aggregate.
#[derive(Debug, Clone)]
pub struct CapacityTable {
    per_region: BTreeMap<RegionId, CapacityEntry>,
    national: CapacityEntry,
}

impl CapacityTable {
    /// Builds the capacity model from raw tables.
    ///
    /// Rows naming a region outside `regions` are skipped. Every regional
    /// (scenario, technology) pair without a matching row stays absent,
    /// while the national aggregate sums the present regional rows from
    /// zero. Offshore wind is populated on the national entry only.
    pub fn load(regions: &RegionCatalog, tables: &CapacityTables) -> Self {
        let mut per_region: BTreeMap<RegionId, CapacityEntry> = regions
            .states()
            .map(|r| (r.id.clone(), CapacityEntry::absent()))
            .collect();
        let mut national = CapacityEntry::national_zero();

        for table in &tables.regional {
            for row in &table.rows {
                let Some((name, gwh)) = split_row(row) else {
                    tracing::warn!(?row, scenario = %table.scenario, "skipping malformed capacity row");
                    continue;
                };
                let Some(entry) = regions
                    .by_name(name)
                    .and_then(|r| per_region.get_mut(&r.id))
                else {
                    tracing::debug!(name, "skipping capacity row for unknown region");
                    continue;
                };
                entry.set(table.scenario, table.technology, gwh);
                national.accumulate(table.scenario, table.technology, gwh);
            }
        }

        for row in &tables.offshore {
            let Some((label, gwh)) = split_row(row) else {
                tracing::warn!(?row, "skipping malformed offshore capacity row");
                continue;
            };
            match label.parse::<Scenario>() {
                Ok(scenario) => national.set(scenario, Technology::OffshoreWind, gwh),
                Err(e) => tracing::debug!("skipping offshore row: {e}"),
            }
        }

        let present = per_region
            .values()
            .flat_map(|e| e.scenarios.iter())
            .flat_map(|s| [s.solar, s.wind])
            .filter(|c| !c.is_absent())
            .count();
        tracing::info!(regions = per_region.len(), present, "loaded capacity table");

        Self {
            per_region,
            national,
        }
    }

    pub fn national(&self) -> &CapacityEntry {
        &self.national
    }

    /// Entry for `region`; the national id resolves to the aggregate.
    pub fn get(&self, region: &RegionId) -> Option<&CapacityEntry> {
        if region.is_national() {
            Some(&self.national)
        } else {
            self.per_region.get(region)
        }
    }
}

fn split_row(row: &[String]) -> Option<(&str, f64)> {
    let label = row.get(1)?.trim();
    let gwh = row.get(2)?.trim().parse().ok()?;
    Some((label, gwh))
}
