//! CSV export of budget tables.

use crate::error::PortalError;
use crate::table::BudgetTable;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Builds `apbd_{province}_{year}_{period}_{subdivision}.csv`.
///
/// Path separators inside names are replaced with `-`.
pub fn export_file_name(province: &str, year: &str, period: &str, subdivision: &str) -> String {
    format!(
        "apbd_{}_{}_{}_{}.csv",
        sanitize(province),
        sanitize(year),
        sanitize(period),
        sanitize(subdivision)
    )
}

fn sanitize(part: &str) -> String {
    part.replace(['/', '\\'], "-")
}

/// Writes a table as UTF-8 CSV into `dir`, overwriting any existing file.
///
/// A file that fails midway is removed, so no partial CSV is left behind.
pub fn write_table(
    dir: &Path,
    file_name: &str,
    table: &BudgetTable,
) -> Result<PathBuf, PortalError> {
    let path = dir.join(file_name);
    let file = File::create(&path).map_err(|source| PortalError::Io { path: path.clone(), source })?;

    if let Err(e) = write_records(file, &path, table) {
        if let Err(remove_err) = std::fs::remove_file(&path) {
            warn!("Could not remove partial file {}: {}", path.display(), remove_err);
        }
        return Err(e);
    }

    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(path)
}

fn write_records(file: File, path: &Path, table: &BudgetTable) -> Result<(), PortalError> {
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(|source| PortalError::Io { path: path.to_path_buf(), source })
}
