//! Display strings and chart hierarchy derived from a [`DashboardView`].
//!
//! [`DashboardView`]: crate::mix::DashboardView

pub mod format;
pub mod summary;
pub mod treemap;

pub use summary::RegionSummary;
pub use treemap::{LeafShares, Treemap, TreemapGroup, TreemapLeaf};

use crate::mix::RegionReport;

/// Short name used in headings: the region id, e.g. "CA" or "US".
pub fn region_label(report: &RegionReport) -> &str {
    report.region.as_str()
}
