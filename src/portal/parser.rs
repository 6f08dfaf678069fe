//! Parsers for the landing page, the pemda listing and budget result tables.

use crate::error::SkipReason;
use crate::portal::models::{ProvinceDirectory, Subdivision};
use crate::portal::selectors;
use crate::table::BudgetTable;
use scraper::{ElementRef, Html};
use serde_json::Value;
use tracing::{debug, trace};

/// Extracts the province directory from the landing page.
///
/// Returns `None` when the province select element is missing. Labels are
/// trimmed, so they can differ from the raw option text; the trimmed label
/// is what ends up in export file names.
pub fn parse_provinces(html: &str) -> Option<ProvinceDirectory> {
    let document = Html::parse_document(html);
    let select = document.select(&selectors::PROVINCE_SELECT).next()?;

    let mut directory = ProvinceDirectory::new();
    for option in select.select(&selectors::OPTION) {
        let label = option.text().collect::<String>().trim().to_string();
        // Without a value attribute a form submits the option text.
        let code = option
            .value()
            .attr(selectors::VALUE_ATTR)
            .map(String::from)
            .unwrap_or_else(|| label.clone());

        trace!("Province option: {} = {}", code, label);
        directory.insert(code, label);
    }

    debug!("Parsed {} provinces", directory.len());
    Some(directory)
}

/// Reads a pemda listing: a JSON object mapping subdivision code to name.
pub fn parse_subdivisions(body: &str) -> Result<Vec<Subdivision>, SkipReason> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SkipReason::NotJson(e.to_string()))?;

    let Value::Object(entries) = value else {
        return Err(SkipReason::NotAnObject);
    };

    Ok(entries
        .into_iter()
        .map(|(code, name)| {
            let name = match name {
                Value::String(s) => s,
                other => other.to_string(),
            };
            Subdivision { code, name }
        })
        .collect())
}

/// Collects the text of every `td`/`th` in the first table, row by row.
///
/// Returns `None` when the document has no table.
pub fn extract_table_cells(html: &str) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let table = document.select(&selectors::TABLE).next()?;

    let cells = table
        .select(&selectors::ROW)
        .flat_map(|row| row.select(&selectors::CELL))
        .map(cell_text)
        .collect::<Vec<_>>();

    trace!("Extracted {} cells", cells.len());
    Some(cells)
}

/// Parses the first table of a budget query response.
pub fn parse_budget_table(html: &str) -> Result<BudgetTable, SkipReason> {
    let cells = extract_table_cells(html).ok_or(SkipReason::TableNotFound)?;
    BudgetTable::from_cells(cells).ok_or(SkipReason::EmptyTable)
}

/// Text fragments of a cell, each trimmed, concatenated without separator.
fn cell_text(cell: ElementRef) -> String {
    cell.text().map(str::trim).collect()
}
