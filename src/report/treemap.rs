//! Two-level hierarchy (clean / non-clean, then subset) for area charts.

use serde::Serialize;

use super::format::{format_percent, format_value, share, unit_label};
use super::region_label;
use crate::mix::{DashboardView, SubsetCatalog, Unit};

/// Colors for clean subsets, indexed by catalog position.
pub const CLEAN_PALETTE: [&str; 9] = [
    "rgb(230, 250, 240)",
    "rgb(210, 240, 220)",
    "rgb(190, 220, 200)",
    "rgb(170, 200, 180)",
    "rgb(150, 180, 160)",
    "rgb(130, 160, 140)",
    "rgb(110, 140, 120)",
    "rgb(90, 120, 100)",
    "rgb(70, 100, 80)",
];

/// Colors for non-clean subsets, indexed by catalog position.
pub const NON_CLEAN_PALETTE: [&str; 9] = [
    "rgb(200, 195, 190)",
    "rgb(180, 175, 170)",
    "rgb(160, 155, 150)",
    "rgb(140, 135, 130)",
    "rgb(120, 115, 110)",
    "rgb(100, 95, 90)",
    "rgb(80, 75, 70)",
    "rgb(60, 55, 50)",
    "rgb(40, 35, 30)",
];

pub const CLEAN_GROUP: &str = "Clean Electricity";
pub const NON_CLEAN_GROUP: &str = "Non-Clean Electricity";

/// Percentages shown in a leaf's tooltip. `None` when the denominator is
/// zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeafShares {
    pub of_total: Option<f64>,
    /// Of clean generation for clean leaves, of non-clean otherwise.
    pub of_group: Option<f64>,
    /// Of the same subset nationally; absent when the nation is selected.
    pub of_national: Option<f64>,
}

impl LeafShares {
    /// Shares for subset `key` generating `gwh` in the selected region.
    ///
    /// Shared by the chart and the CSV export.
    pub fn compute(view: &DashboardView, key: &str, gwh: f64) -> Self {
        let regional = &view.regional;
        let group_total = if view.is_clean(key) {
            regional.clean_gwh
        } else {
            regional.total_gwh - regional.clean_gwh
        };
        let of_national = if view.is_national() {
            None
        } else {
            view.national
                .by_subset
                .get(key)
                .and_then(|national| share(gwh, national))
        };
        Self {
            of_total: share(gwh, regional.total_gwh),
            of_group: share(gwh, group_total),
            of_national,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapLeaf {
    pub key: String,
    pub label: String,
    pub gwh: f64,
    pub color: &'static str,
    pub shares: LeafShares,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapGroup {
    pub name: &'static str,
    pub clean: bool,
    pub children: Vec<TreemapLeaf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Treemap {
    pub name: String,
    pub children: Vec<TreemapGroup>,
}

impl Treemap {
    /// Builds the hierarchy for the regional side of `view`.
    ///
    /// Subsets with generation `<= 0` are left out since they cannot be
    /// drawn as an area. Leaves are sorted largest first within each group.
    pub fn build(view: &DashboardView, subsets: &SubsetCatalog) -> Self {
        let regional = &view.regional;
        let mut clean = Vec::new();
        let mut non_clean = Vec::new();

        for (position, subset) in subsets.iter().enumerate() {
            let gwh = regional.by_subset.get(&subset.key).unwrap_or(0.0);
            if gwh <= 0.0 {
                continue;
            }
            let is_clean = view.is_clean(&subset.key);
            let palette = if is_clean {
                &CLEAN_PALETTE
            } else {
                &NON_CLEAN_PALETTE
            };
            let leaf = TreemapLeaf {
                key: subset.key.clone(),
                label: subset.label.clone(),
                gwh,
                color: palette[position % palette.len()],
                shares: LeafShares::compute(view, &subset.key, gwh),
            };
            if is_clean {
                clean.push(leaf);
            } else {
                non_clean.push(leaf);
            }
        }

        for group in [&mut clean, &mut non_clean] {
            group.sort_by(|a, b| b.gwh.total_cmp(&a.gwh));
        }

        Self {
            name: format!(
                "Electricity Generation In {} By Subparts",
                region_label(regional)
            ),
            children: vec![
                TreemapGroup {
                    name: CLEAN_GROUP,
                    clean: true,
                    children: clean,
                },
                TreemapGroup {
                    name: NON_CLEAN_GROUP,
                    clean: false,
                    children: non_clean,
                },
            ],
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TreemapLeaf> {
        self.children.iter().flat_map(|g| g.children.iter())
    }
}

impl TreemapLeaf {
    /// Tooltip lines: name, amount, then the percentage shares.
    pub fn tooltip(&self, clean: bool, unit: Unit) -> Vec<String> {
        let group = if clean { "clean" } else { "non-clean" };
        let mut lines = vec![
            self.label.clone(),
            format!("{} {}", format_value(self.gwh, unit), unit_label(unit)),
            format!("{} of total", format_percent(self.shares.of_total)),
            format!("{} of {group}", format_percent(self.shares.of_group)),
        ];
        if let Some(pct) = self.shares.of_national {
            lines.push(format!("{} of US {}", format_percent(Some(pct)), self.label));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mix::{
        DisplaySettings, NetFlow, RegionReport, ScenarioCapacity, Selection, SubsetValues,
    };
    use crate::region::RegionId;

    fn report(region: &str, name: &str, pairs: &[(&str, f64)], clean: f64) -> RegionReport {
        let by_subset = SubsetValues::from_pairs(pairs.iter().map(|(k, v)| (*k, *v)));
        RegionReport {
            region: RegionId::new(region),
            name: name.to_string(),
            year: 2022,
            total_gwh: by_subset.tracked_sum(),
            clean_gwh: clean,
            by_subset,
            net_flow: NetFlow::Unknown,
            capacity: ScenarioCapacity::ABSENT,
        }
    }

    fn view(regional: RegionReport, national: RegionReport) -> DashboardView {
        DashboardView {
            selection: Selection::new(regional.region.clone(), regional.year),
            display: DisplaySettings::default(),
            clean_subsets: vec!["wind".to_string(), "solar".to_string(), "nuclear".to_string()],
            regional,
            national,
        }
    }

    #[test]
    fn zero_and_negative_subsets_are_not_leaves() {
        let regional = report(
            "TX",
            "Texas",
            &[("wind", 100.0), ("solar", 0.0), ("nuclear", -5.0), ("coal", 300.0), ("other", -1.0)],
            95.0,
        );
        let national = report("US", "Entire US", &[("wind", 400.0), ("coal", 600.0)], 400.0);
        let treemap = Treemap::build(&view(regional, national), &SubsetCatalog::standard());

        let keys: Vec<&str> = treemap.leaves().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["wind", "coal"]);
        assert!(treemap.leaves().all(|l| l.gwh > 0.0));
    }

    #[test]
    fn leaves_are_grouped_sorted_and_colored_by_position() {
        let regional = report(
            "CA",
            "California",
            &[("wind", 30.0), ("solar", 50.0), ("natural_gas", 90.0), ("coal", 10.0)],
            80.0,
        );
        let national = report("US", "Entire US", &[("wind", 300.0), ("solar", 100.0)], 400.0);
        let treemap = Treemap::build(&view(regional, national), &SubsetCatalog::standard());

        assert_eq!(treemap.name, "Electricity Generation In CA By Subparts");
        let clean = &treemap.children[0];
        assert_eq!(clean.name, CLEAN_GROUP);
        let clean_keys: Vec<&str> = clean.children.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(clean_keys, ["solar", "wind"]);
        assert_eq!(clean.children[0].color, CLEAN_PALETTE[1]);
        assert_eq!(clean.children[1].color, CLEAN_PALETTE[0]);

        let dirty = &treemap.children[1];
        assert_eq!(dirty.children[0].key, "natural_gas");
        assert_eq!(dirty.children[0].color, NON_CLEAN_PALETTE[7]);
        assert_eq!(dirty.children[1].color, NON_CLEAN_PALETTE[6]);
    }

    #[test]
    fn tooltip_shares_cover_total_group_and_nation() {
        let regional = report("CA", "California", &[("wind", 30.0), ("coal", 70.0)], 30.0);
        let national = report("US", "Entire US", &[("wind", 300.0), ("coal", 700.0)], 300.0);
        let treemap = Treemap::build(&view(regional, national), &SubsetCatalog::standard());

        let wind = treemap.leaves().find(|l| l.key == "wind").expect("wind leaf");
        assert_eq!(wind.shares.of_total, Some(30.0));
        assert_eq!(wind.shares.of_group, Some(100.0));
        assert_eq!(wind.shares.of_national, Some(10.0));
        assert_eq!(
            wind.tooltip(true, Unit::Energy),
            ["wind", "30 GWh", "30.00% of total", "100.00% of clean", "10.00% of US wind"]
        );

        let coal = treemap.leaves().find(|l| l.key == "coal").expect("coal leaf");
        assert_eq!(coal.tooltip(false, Unit::Energy)[3], "100.00% of non-clean");
    }

    #[test]
    fn palette_channels_are_valid_rgb() {
        for color in CLEAN_PALETTE.iter().chain(NON_CLEAN_PALETTE.iter()) {
            let inner = color
                .strip_prefix("rgb(")
                .and_then(|c| c.strip_suffix(')'))
                .expect("rgb() notation");
            let channels: Vec<u16> = inner
                .split(',')
                .map(|c| c.trim().parse().expect("numeric channel"))
                .collect();
            assert_eq!(channels.len(), 3, "{color}");
            assert!(channels.iter().all(|&c| c <= 255), "{color} out of range");
        }
    }

    #[test]
    fn national_view_has_no_national_share() {
        let national = report("US", "Entire US", &[("wind", 300.0)], 300.0);
        let treemap = Treemap::build(&view(national.clone(), national), &SubsetCatalog::standard());
        assert_eq!(treemap.name, "Electricity Generation In US By Subparts");
        assert!(treemap.leaves().all(|l| l.shares.of_national.is_none()));
    }
}
