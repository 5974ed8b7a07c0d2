use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::model::DisplayRow;

pub const CSV_FILE_NAME: &str = "profiles.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";
pub const CSV_HEADER: &str = "Account address,Show boosts\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRow<'a> {
    pub account_address: &'a str,
}

impl<'a> From<&'a DisplayRow> for ExportRow<'a> {
    fn from(row: &'a DisplayRow) -> Self {
        Self {
            account_address: row.account_cell_text(),
        }
    }
}

/// Serializes rows into the follow-import CSV layout. Addresses are written
/// verbatim; handles never contain commas or quotes, so nothing is escaped.
pub fn export_csv(rows: &[ExportRow<'_>]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + rows.len() * 32);
    out.push_str(CSV_HEADER);

    for row in rows {
        out.push_str(row.account_address);
        out.push_str(",true\n");
    }

    out
}

pub fn export_display_rows(rows: &[DisplayRow]) -> String {
    let export_rows: Vec<ExportRow<'_>> = rows.iter().map(ExportRow::from).collect();
    export_csv(&export_rows)
}

pub fn write_csv_file(path: &Path, csv: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, csv.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        mime = CSV_MIME_TYPE,
        bytes = csv.len(),
        "csv export written"
    );
    Ok(())
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent directory {}", parent.display()))?;
    }

    Ok(())
}
