//! Value types shared by the aggregator, resolver and session.

use serde::{Deserialize, Serialize};

use super::clean::CleanClassification;
use crate::region::RegionId;

/// The (region, year) pair a reconciliation is issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub region: RegionId,
    pub year: i32,
}

impl Selection {
    pub fn new(region: RegionId, year: i32) -> Self {
        Self { region, year }
    }

    /// The same year for the national aggregate.
    pub fn national(&self) -> Self {
        Self::new(RegionId::national(), self.year)
    }
}

/// Generation of one subset (GWh).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsetValue {
    pub key: String,
    pub gwh: f64,
}

/// Per-subset generation in catalog order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SubsetValues(Vec<SubsetValue>);

impl SubsetValues {
    pub fn new(values: Vec<SubsetValue>) -> Self {
        Self(values)
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(key, gwh)| SubsetValue {
                    key: key.into(),
                    gwh,
                })
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.iter().find(|v| v.key == key).map(|v| v.gwh)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubsetValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over all tracked subsets. Not the canonical total.
    pub fn tracked_sum(&self) -> f64 {
        self.0.iter().map(|v| v.gwh).sum()
    }
}

/// Output of one reconciliation for a region and year (GWh).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    /// Canonical all-fuels total, queried independently of the subsets.
    pub total: f64,
    pub by_subset: SubsetValues,
    /// Sum over the subsets in the clean classification.
    pub clean: f64,
}

impl Reconciliation {
    /// Recomputes `clean` from the cached per-subset values.
    pub fn reclassify(&mut self, clean: &CleanClassification) {
        self.clean = clean.total(&self.by_subset);
    }

    /// Total minus clean.
    pub fn non_clean(&self) -> f64 {
        self.total - self.clean
    }
}

/// Signed net interchange (GWh): positive is net inbound.
///
/// `Unknown` is distinct from zero: it means at least one of the
/// underlying series had no value for the year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "gwh", rename_all = "snake_case")]
pub enum NetFlow {
    Known(f64),
    Unknown,
}

impl NetFlow {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown => None,
        }
    }
}

/// Everything fetched for one selection; the unit of caching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMix {
    pub selection: Selection,
    pub generation: Reconciliation,
    pub net_flow: NetFlow,
}
