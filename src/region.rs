//! Static catalog of the regions the dashboard can report on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the national aggregate.
pub const NATIONAL_ID: &str = "US";

/// Display name of the national aggregate.
pub const NATIONAL_NAME: &str = "Entire US";

/// Region identifier: `"US"` or a two-letter state code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The national aggregate.
    pub fn national() -> Self {
        Self(NATIONAL_ID.to_string())
    }

    pub fn is_national(&self) -> bool {
        self.0 == NATIONAL_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A state (or the nation) with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
}

/// Display name and code of every state, in dropdown order.
const STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("D.C.", "DC"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Ordered lookup table of regions: the nation first, then every state.
///
/// # Examples
///
/// ```
/// use gridmix::region::{RegionCatalog, RegionId};
///
/// let catalog = RegionCatalog::united_states();
/// assert_eq!(catalog.by_name("Rhode Island").map(|r| r.id.as_str()), Some("RI"));
/// assert!(catalog.contains(&RegionId::national()));
/// ```
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<Region>,
}

impl RegionCatalog {
    /// The national aggregate plus the 50 states and D.C.
    pub fn united_states() -> Self {
        let mut regions = Vec::with_capacity(STATES.len() + 1);
        regions.push(Region {
            id: RegionId::national(),
            name: NATIONAL_NAME.to_string(),
        });
        regions.extend(STATES.iter().map(|(name, id)| Region {
            id: RegionId::new(*id),
            name: (*name).to_string(),
        }));
        Self { regions }
    }

    /// All regions, national first.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// All sub-national regions in catalog order.
    pub fn states(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| !r.id.is_national())
    }

    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }

    /// Looks up a sub-national region by its display name.
    pub fn by_name(&self, name: &str) -> Option<&Region> {
        self.states().find(|r| r.name == name)
    }

    /// Resolves user input that is either an id (`"ca"`, `"US"`) or a
    /// display name (`"California"`, `"Entire US"`).
    pub fn resolve(&self, query: &str) -> Option<&Region> {
        let query = query.trim();
        self.regions
            .iter()
            .find(|r| r.id.as_str().eq_ignore_ascii_case(query) || r.name.eq_ignore_ascii_case(query))
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.get(id).is_some()
    }

    /// Display name for `id`, falling back to the raw identifier.
    pub fn display_name<'a>(&'a self, id: &'a RegionId) -> &'a str {
        self.get(id).map_or(id.as_str(), |r| r.name.as_str())
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::united_states()
    }
}
