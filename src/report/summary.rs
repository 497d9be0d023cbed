//! Text summary block for one region.

use std::fmt;

use serde::Serialize;

use super::format::{format_amount, format_optional, format_percent, share, unit_label};
use super::region_label;
use crate::mix::{Capacity, NetFlow, RegionReport, Scenario, Unit};

/// Display strings for one region's generation and capacity figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSummary {
    pub heading: String,
    pub total: String,
    pub clean: String,
    pub clean_percent: String,
    /// `"imported"` or `"exported"`; unknown flows read as imported.
    pub flow_direction: &'static str,
    pub flow: String,
    pub capacity_heading: String,
    pub solar_capacity: String,
    pub wind_capacity: String,
    /// Onshore solar plus wind relative to total generation.
    pub capacity_percent: String,
    /// National aggregate only.
    pub offshore_wind_capacity: Option<String>,
    label: String,
}

impl RegionSummary {
    /// Formats `report` in `unit`. `capacity_years` labels the capacity
    /// block (e.g. `"2021, 2023"`).
    pub fn new(report: &RegionReport, unit: Unit, scenario: Scenario, capacity_years: &str) -> Self {
        let label = region_label(report).to_string();

        let (flow_direction, flow) = match report.net_flow {
            NetFlow::Known(v) if v < 0.0 => ("exported", format_amount(-v, unit)),
            NetFlow::Known(v) => ("imported", format_amount(v, unit)),
            NetFlow::Unknown => ("imported", format_optional(None, unit)),
        };

        let capacity = report.capacity;
        let capacity_percent = capacity
            .onshore_total()
            .and_then(|onshore| share(onshore, report.total_gwh));
        let offshore_wind_capacity = report
            .region
            .is_national()
            .then(|| format_optional(capacity.offshore_wind.value(), unit));

        Self {
            heading: format!("Electricity Generation in {label} in {}:", report.year),
            total: format_amount(report.total_gwh, unit),
            clean: format_amount(report.clean_gwh, unit),
            clean_percent: format_percent(share(report.clean_gwh, report.total_gwh)),
            flow_direction,
            flow,
            capacity_heading: format!(
                "NREL {capacity_years} Electricity Capacity Data ({scenario} siting, {}):",
                unit_label(unit)
            ),
            solar_capacity: format_capacity(capacity.solar, unit),
            wind_capacity: format_capacity(capacity.wind, unit),
            capacity_percent: format_percent(capacity_percent),
            offshore_wind_capacity,
            label,
        }
    }
}

fn format_capacity(capacity: Capacity, unit: Unit) -> String {
    format_optional(capacity.value(), unit)
}

impl fmt::Display for RegionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        writeln!(f, "  Total generation:  {}", self.total)?;
        writeln!(f, "  Clean generation:  {} ({})", self.clean, self.clean_percent)?;
        writeln!(f, "  ({} {}: {})", self.label, self.flow_direction, self.flow)?;
        writeln!(f, "{}", self.capacity_heading)?;
        writeln!(f, "  Solar capacity:    {}", self.solar_capacity)?;
        writeln!(f, "  Wind capacity:     {}", self.wind_capacity)?;
        write!(f, "  Solar + wind as share of generation: {}", self.capacity_percent)?;
        if let Some(offshore) = &self.offshore_wind_capacity {
            write!(f, "\n  ({} offshore wind capacity: {offshore})", self.label)?;
        }
        Ok(())
    }
}
