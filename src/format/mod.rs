//! Output formatting for directory listings (table, JSON, CSV) and the
//! CSV writer for exported budget tables.

pub mod export;

pub use export::{export_file_name, write_table};

use crate::config::OutputFormat;
use crate::portal::models::{PemdaKey, Province, ProvinceDirectory, Subdivision};
use serde::Serialize;

/// Formats province and subdivision listings for output.
pub struct Formatter {
    format: OutputFormat,
}

/// One `(province, year)` listing as emitted in JSON.
#[derive(Serialize)]
struct PemdaListing<'a> {
    province: &'a str,
    year: &'a str,
    subdivisions: &'a [Subdivision],
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the province directory.
    pub fn format_provinces(&self, directory: &ProvinceDirectory) -> String {
        let provinces: Vec<&Province> = directory.iter().collect();

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&provinces).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table if provinces.is_empty() => "No provinces found.".to_string(),
            OutputFormat::Table => {
                let rows: Vec<_> =
                    provinces.iter().map(|p| (p.code.as_str(), p.name.as_str())).collect();
                let mut out = Self::code_name_table(&rows);
                out.push_str(&format!("\nTotal: {} provinces", rows.len()));
                out
            }
            OutputFormat::Csv => Self::csv_rows(
                &["code", "name"],
                provinces.iter().map(|p| vec![p.code.as_str(), p.name.as_str()]),
            ),
        }
    }

    /// Formats the subdivision listing of one `(province, year)` pair.
    pub fn format_subdivisions(&self, key: &PemdaKey, subdivisions: &[Subdivision]) -> String {
        match self.format {
            OutputFormat::Json => {
                let listing =
                    PemdaListing { province: &key.province, year: &key.year, subdivisions };
                serde_json::to_string_pretty(&listing).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => {
                let mut out = format!("Provinsi {} tahun {}\n\n", key.province, key.year);
                if subdivisions.is_empty() {
                    out.push_str("No subdivisions found.");
                    return out;
                }
                let rows: Vec<_> =
                    subdivisions.iter().map(|s| (s.code.as_str(), s.name.as_str())).collect();
                out.push_str(&Self::code_name_table(&rows));
                out.push_str(&format!("\nTotal: {} subdivisions", rows.len()));
                out
            }
            OutputFormat::Csv => Self::csv_rows(
                &["province", "year", "code", "name"],
                subdivisions.iter().map(|s| {
                    vec![key.province.as_str(), key.year.as_str(), s.code.as_str(), s.name.as_str()]
                }),
            ),
        }
    }

    fn code_name_table(rows: &[(&str, &str)]) -> String {
        let code_width = rows.iter().map(|(c, _)| c.chars().count()).max().unwrap_or(0).max(4);

        let mut lines = Vec::new();
        lines.push(format!("{:<code_width$}  {}", "Code", "Name"));
        lines.push(format!("{:-<code_width$}  {:-<30}", "", ""));

        for (code, name) in rows {
            lines.push(format!("{:<code_width$}  {}", code, name));
        }

        lines.push(String::new());
        lines.join("\n")
    }

    fn csv_rows<'a>(header: &[&str], rows: impl Iterator<Item = Vec<&'a str>>) -> String {
        Self::try_csv_rows(header, rows).unwrap_or_default()
    }

    fn try_csv_rows<'a>(
        header: &[&str],
        rows: impl Iterator<Item = Vec<&'a str>>,
    ) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(&row)?;
        }

        let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
    }
}
