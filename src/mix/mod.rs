//! Generation-mix reconciliation: subsets, clean classification,
//! interchange, capacity and the session that ties them together.

pub mod aggregator;
pub mod capacity;
pub mod clean;
pub mod dashboard;
pub mod interchange;
pub mod session;
pub mod subset;
pub mod types;
pub mod years;

pub use aggregator::GenerationAggregator;
pub use capacity::{
    Capacity, CapacityEntry, CapacityTable, CapacityTables, Scenario, ScenarioCapacity, Technology,
};
pub use clean::CleanClassification;
pub use dashboard::{Dashboard, DashboardView, RegionReport};
pub use interchange::ImportExportResolver;
pub use session::{CommitOutcome, DisplaySettings, SessionState, Unit};
pub use subset::{GenerationSubset, SubsetCatalog};
pub use types::{NetFlow, Reconciliation, RegionMix, Selection, SubsetValue, SubsetValues};
pub use years::YearCatalog;
