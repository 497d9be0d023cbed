//! Number formatting for energy, power and percentages.

use crate::mix::Unit;

/// Hours in a (non-leap) year; converts annual GWh to average GW.
pub const HOURS_PER_YEAR: f64 = 365.0 * 24.0;

/// Placeholder for values that are absent or unknown.
pub const NOT_AVAILABLE: &str = "N/A";

/// Converts an annual GWh figure into `unit`.
pub fn convert(gwh: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Energy => gwh,
        Unit::Power => gwh / HOURS_PER_YEAR,
    }
}

pub fn unit_label(unit: Unit) -> &'static str {
    match unit {
        Unit::Energy => "GWh",
        Unit::Power => "GW",
    }
}

/// Formats `gwh` in `unit` without a suffix: whole GWh, or GW to two
/// decimals, both with thousands separators.
///
/// # Examples
///
/// ```
/// use gridmix::mix::Unit;
/// use gridmix::report::format::format_value;
///
/// assert_eq!(format_value(4_178_171.4, Unit::Energy), "4,178,171");
/// assert_eq!(format_value(87_600.0, Unit::Power), "10.00");
/// ```
pub fn format_value(gwh: f64, unit: Unit) -> String {
    let decimals = match unit {
        Unit::Energy => 0,
        Unit::Power => 2,
    };
    with_commas(convert(gwh, unit), decimals)
}

/// `format_value` followed by the unit label.
pub fn format_amount(gwh: f64, unit: Unit) -> String {
    format!("{} {}", format_value(gwh, unit), unit_label(unit))
}

/// Like [`format_amount`], with `None` rendered as "N/A".
pub fn format_optional(gwh: Option<f64>, unit: Unit) -> String {
    gwh.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format_amount(v, unit))
}

/// `part / whole` as a percentage, or `None` when `whole` is zero.
pub fn share(part: f64, whole: f64) -> Option<f64> {
    let pct = 100.0 * part / whole;
    pct.is_finite().then_some(pct)
}

/// Percentage to two decimals with a `%` suffix, or "N/A".
pub fn format_percent(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{}%", with_commas(p, 2)),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Rounds to `decimals` places and groups the integer digits by three.
pub fn with_commas(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
