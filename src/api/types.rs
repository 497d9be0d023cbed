//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::mix::{CommitOutcome, DashboardView, Scenario, SubsetCatalog, Unit};
use crate::report::{RegionSummary, Treemap};

/// Committed view plus its rendered summaries and chart hierarchy.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: DashboardView,
    /// Summary of the selected region.
    pub summary: RegionSummary,
    /// National summary, present when a state is selected.
    pub national_summary: Option<RegionSummary>,
    pub treemap: Treemap,
}

impl ViewResponse {
    pub fn new(view: DashboardView, subsets: &SubsetCatalog, capacity_years: &str) -> Self {
        let display = view.display;
        let summary = RegionSummary::new(&view.regional, display.unit, display.scenario, capacity_years);
        let national_summary = (!view.is_national()).then(|| {
            RegionSummary::new(&view.national, display.unit, display.scenario, capacity_years)
        });
        let treemap = Treemap::build(&view, subsets);
        Self {
            view,
            summary,
            national_summary,
            treemap,
        }
    }
}

/// `POST /selection` body. Omitted fields keep their committed value.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionRequest {
    pub region: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub outcome: CommitOutcome,
    pub view: ViewResponse,
}

/// `POST /clean` body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanRequest {
    pub subset: String,
    pub clean: bool,
}

#[derive(Debug, Serialize)]
pub struct CleanResponse {
    /// Whether the classification actually changed.
    pub changed: bool,
    pub view: ViewResponse,
}

/// `POST /display` body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayRequest {
    pub unit: Option<Unit>,
    pub scenario: Option<Scenario>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
