//! Named generation categories and their constituent fuel codes.

use serde::{Deserialize, Serialize};

/// A named slice of generation made up of one or more fuel codes whose
/// yearly values are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationSubset {
    /// Stable identifier (`"wind"`, `"natural_gas"`, ...).
    pub key: String,
    /// Human-readable name used in summaries and tooltips.
    pub label: String,
    /// Upstream fuel-type codes summed into this subset.
    pub fuel_codes: Vec<String>,
}

impl GenerationSubset {
    pub fn new(key: &str, label: &str, fuel_codes: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            fuel_codes: fuel_codes.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Ordered, startup-fixed list of subsets.
///
/// Order is load-bearing: colors are assigned by position and results are
/// reported in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetCatalog {
    subsets: Vec<GenerationSubset>,
}

impl SubsetCatalog {
    pub fn new(subsets: Vec<GenerationSubset>) -> Self {
        Self { subsets }
    }

    /// The nine default categories.
    pub fn standard() -> Self {
        Self::new(vec![
            GenerationSubset::new("wind", "wind", &["WND"]),
            GenerationSubset::new("solar", "solar (PV & thermal)", &["SUN"]),
            GenerationSubset::new("geothermal", "geothermal", &["GEO"]),
            GenerationSubset::new("nuclear", "nuclear", &["NUC"]),
            GenerationSubset::new(
                "hydro",
                "hydroelectric (conventional & pumped storage)",
                &["HYC", "HPS"],
            ),
            GenerationSubset::new("biomass", "biomass", &["BIO"]),
            GenerationSubset::new("coal", "coal", &["COW"]),
            GenerationSubset::new("natural_gas", "natural gas", &["NG"]),
            GenerationSubset::new("other", "other", &["PEL", "PC", "OOG", "OTH"]),
        ])
    }

    /// Keys of the subsets counted as clean by default.
    pub fn standard_clean_keys() -> Vec<String> {
        ["wind", "solar", "geothermal", "nuclear", "hydro", "biomass"]
            .iter()
            .map(|k| (*k).to_string())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenerationSubset> {
        self.subsets.iter()
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&GenerationSubset> {
        self.subsets.iter().find(|s| s.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Total number of fuel-code requests one reconciliation issues.
    pub fn fuel_code_count(&self) -> usize {
        self.subsets.iter().map(|s| s.fuel_codes.len()).sum()
    }
}

impl Default for SubsetCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_order_and_codes() {
        let catalog = SubsetCatalog::standard();
        let keys: Vec<&str> = catalog.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "wind",
                "solar",
                "geothermal",
                "nuclear",
                "hydro",
                "biomass",
                "coal",
                "natural_gas",
                "other"
            ]
        );
        assert_eq!(
            catalog.get("hydro").map(|s| s.fuel_codes.clone()),
            Some(vec!["HYC".to_string(), "HPS".to_string()])
        );
        assert_eq!(catalog.fuel_code_count(), 13);
    }

    #[test]
    fn default_clean_keys_exist() {
        let catalog = SubsetCatalog::standard();
        for key in SubsetCatalog::standard_clean_keys() {
            assert!(catalog.contains(&key), "{key} should be a subset");
        }
    }
}
