//! Row boundary detection for flattened table cells.

/// Splits a flat cell sequence into rows, treating every empty cell as a row separator.
///
/// Consecutive non-empty cells accumulate into the current row; an empty cell
/// flushes the current row if it has any cells. A trailing row is flushed at the
/// end. A legitimately empty cell in the middle of a row therefore splits it in
/// two; the portal's tables pad rows with empty cells and rely on this.
pub fn split_rows_on_empty_cells<I, S>(cells: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut rows = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for cell in cells {
        let cell = cell.into();
        if cell.is_empty() {
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
        } else {
            current.push(cell);
        }
    }

    if !current.is_empty() {
        rows.push(current);
    }

    rows
}
