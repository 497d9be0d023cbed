//! TOML-based dashboard configuration.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::mix::{
    CleanClassification, DisplaySettings, GenerationSubset, Scenario, SubsetCatalog, Technology,
    Unit,
};

/// Top-level configuration parsed from TOML.
///
/// Every section has defaults, so an empty file is a valid configuration.
/// Load with [`AppConfig::from_toml_file`] or use [`AppConfig::defaults`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Upstream energy-data API.
    #[serde(default)]
    pub eia: EiaConfig,
    /// Renewable-capacity reference tables.
    #[serde(default)]
    pub capacity: CapacityConfig,
    /// Initial display settings and clean classification.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Ordered subset list; empty means the built-in nine.
    #[serde(default)]
    pub subset: Vec<GenerationSubset>,
}

/// Upstream energy-data API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EiaConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Registration key appended to every request.
    pub api_key: String,
    /// Sector facet; 98 covers all sectors.
    pub sector_id: u32,
    /// Rows requested by the history query used for the year catalog.
    pub history_length: u32,
}

impl Default for EiaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.eia.gov/v2".to_string(),
            api_key: String::new(),
            sector_id: 98,
            history_length: 5000,
        }
    }
}

/// Locations of the seven capacity tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapacityConfig {
    /// Directory the file names below are resolved against.
    pub directory: PathBuf,
    /// Years the capacity data was published, for display.
    pub data_years: String,
    pub solar_open: String,
    pub solar_reference: String,
    pub solar_limited: String,
    pub wind_open: String,
    pub wind_reference: String,
    pub wind_limited: String,
    /// National offshore-wind table, one row per scenario.
    pub offshore_wind: String,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            data_years: "2021, 2023".to_string(),
            solar_open: "solar_open_capacity_2023_NREL_condensed".to_string(),
            solar_reference: "solar_reference_capacity_2023_NREL_condensed".to_string(),
            solar_limited: "solar_limited_capacity_2023_NREL_condensed".to_string(),
            wind_open: "wind_open_capacity_2023_NREL_condensed".to_string(),
            wind_reference: "wind_reference_capacity_2023_NREL_condensed".to_string(),
            wind_limited: "wind_limited_capacity_2023_NREL_condensed".to_string(),
            offshore_wind: "offshore_wind_capacity_2021_NREL_condensed".to_string(),
        }
    }
}

impl CapacityConfig {
    /// The six regional tables with their scenario and technology.
    pub fn regional_files(&self) -> [(Scenario, Technology, &str); 6] {
        [
            (Scenario::Open, Technology::Solar, self.solar_open.as_str()),
            (Scenario::Reference, Technology::Solar, self.solar_reference.as_str()),
            (Scenario::Limited, Technology::Solar, self.solar_limited.as_str()),
            (Scenario::Open, Technology::Wind, self.wind_open.as_str()),
            (Scenario::Reference, Technology::Wind, self.wind_reference.as_str()),
            (Scenario::Limited, Technology::Wind, self.wind_limited.as_str()),
        ]
    }
}

/// Initial presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// `"energy"` (GWh) or `"power"` (average GW).
    pub unit: String,
    /// `"open"`, `"reference"` or `"limited"`.
    pub scenario: String,
    /// Subset keys counted as clean.
    pub clean: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unit: Unit::Energy.label().to_string(),
            scenario: Scenario::Limited.label().to_string(),
            clean: SubsetCatalog::standard_clean_keys(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"display.unit"`).
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl AppConfig {
    /// Built-in configuration: public API root, bundled capacity file
    /// names, GWh, "limited" scenario and the standard clean set.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// The configured subset catalog, or the built-in one.
    pub fn subsets(&self) -> SubsetCatalog {
        if self.subset.is_empty() {
            SubsetCatalog::standard()
        } else {
            SubsetCatalog::new(self.subset.clone())
        }
    }

    pub fn clean(&self) -> CleanClassification {
        CleanClassification::new(self.display.clean.iter().cloned())
    }

    /// Parses the `[display]` unit and scenario.
    ///
    /// # Errors
    ///
    /// Returns the first field that does not parse.
    pub fn display_settings(&self) -> Result<DisplaySettings, ConfigError> {
        let unit = self
            .display
            .unit
            .parse::<Unit>()
            .map_err(|e| ConfigError::new("display.unit", e))?;
        let scenario = self
            .display
            .scenario
            .parse::<Scenario>()
            .map_err(|e| ConfigError::new("display.scenario", e))?;
        Ok(DisplaySettings { unit, scenario })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.eia.base_url.trim().is_empty() {
            errors.push(ConfigError::new("eia.base_url", "must not be empty"));
        }
        if self.eia.history_length == 0 {
            errors.push(ConfigError::new("eia.history_length", "must be > 0"));
        }

        if let Err(e) = self.display.unit.parse::<Unit>() {
            errors.push(ConfigError::new("display.unit", e));
        }
        if let Err(e) = self.display.scenario.parse::<Scenario>() {
            errors.push(ConfigError::new("display.scenario", e));
        }

        let mut seen = HashSet::new();
        for (i, subset) in self.subset.iter().enumerate() {
            if subset.key.trim().is_empty() {
                errors.push(ConfigError::new(format!("subset[{i}].key"), "must not be empty"));
            }
            if subset.fuel_codes.is_empty() {
                errors.push(ConfigError::new(
                    format!("subset[{i}].fuel_codes"),
                    "must list at least one fuel code",
                ));
            }
            if !seen.insert(subset.key.as_str()) {
                errors.push(ConfigError::new(
                    format!("subset[{i}].key"),
                    format!("duplicate subset key \"{}\"", subset.key),
                ));
            }
        }

        let catalog = self.subsets();
        for key in &self.display.clean {
            if !catalog.contains(key) {
                errors.push(ConfigError::new(
                    "display.clean",
                    format!("\"{key}\" names no subset"),
                ));
            }
        }

        errors
    }
}
