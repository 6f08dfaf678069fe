//! Budget table assembly: header/record split, ragged-row policy and
//! deduplication on the account column.

pub mod rows;

pub use rows::split_rows_on_empty_cells;

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Column used to drop repeated ledger lines.
pub const ACCOUNT_COLUMN: &str = "Akun";

/// A parsed budget table. Every row has exactly `header.len()` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl BudgetTable {
    /// Builds a table from split rows: the first row is the header, the rest are records.
    ///
    /// Records shorter than the header are padded with empty values and longer
    /// ones are truncated. Returns `None` when there are no rows at all.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Option<Self> {
        let mut rows = rows.into_iter();
        let header = rows.next()?;
        let width = header.len();

        let rows = rows
            .enumerate()
            .map(|(idx, mut row)| {
                if row.len() != width {
                    debug!("Row {} has {} values, header has {}", idx + 1, row.len(), width);
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        Some(Self { header, rows })
    }

    /// Builds a table from a flat cell sequence using the empty-cell row heuristic.
    pub fn from_cells<I, S>(cells: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_rows(split_rows_on_empty_cells(cells))
    }

    /// Returns the index of a header column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Keeps only the first row for each distinct value of `column`.
    ///
    /// Rows are left untouched when the column does not exist.
    pub fn dedup_by_column(mut self, column: &str) -> Self {
        let Some(idx) = self.column_index(column) else {
            return self;
        };

        let before = self.rows.len();
        let mut seen = HashSet::new();
        self.rows.retain(|row| seen.insert(row[idx].clone()));

        if self.rows.len() != before {
            debug!("Dropped {} duplicate '{}' rows", before - self.rows.len(), column);
        }
        self
    }

    /// Drops rows with a repeated account identifier.
    pub fn dedup_accounts(self) -> Self {
        self.dedup_by_column(ACCOUNT_COLUMN)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
