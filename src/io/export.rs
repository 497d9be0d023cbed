//! CSV export of the committed generation mix.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::mix::{DashboardView, SubsetCatalog};
use crate::report::treemap::LeafShares;

/// Column header for the mix export.
const HEADER: &str = "region,year,subset,label,group,generation_gwh,\
                      share_of_total_pct,share_of_group_pct,share_of_national_pct";

/// Exports the regional mix of `view` to a CSV file at the given path.
///
/// Writes a header row followed by one row per subset in catalog order.
///
/// # Arguments
///
/// * `view` - Committed dashboard view
/// * `subsets` - Subset catalog giving row order and labels
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(view: &DashboardView, subsets: &SubsetCatalog, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(view, subsets, buf)
}

/// Writes the regional mix as CSV to any writer.
///
/// Unlike the chart, every subset is listed, including zero and negative
/// values. Shares with a zero denominator are left empty, as is the
/// national share when the nation itself is selected.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(view: &DashboardView, subsets: &SubsetCatalog, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let regional = &view.regional;
    for subset in subsets.iter() {
        let gwh = regional.by_subset.get(&subset.key).unwrap_or(0.0);
        let shares = LeafShares::compute(view, &subset.key, gwh);

        wtr.write_record(&[
            regional.region.to_string(),
            regional.year.to_string(),
            subset.key.clone(),
            subset.label.clone(),
            if view.is_clean(&subset.key) { "clean" } else { "non_clean" }.to_string(),
            format!("{gwh:.3}"),
            pct(shares.of_total),
            pct(shares.of_group),
            pct(shares.of_national),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn pct(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}
