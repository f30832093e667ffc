use crate::model::{Grid, RawSheet};

/// Resolves every merge span covering exactly two columns by writing the
/// anchor cell's value into both the span's top-left and bottom-right
/// cells. Wider spans are left untouched and stay recorded on the sheet.
/// Resolved spans are removed, so running this twice changes nothing.
pub fn resolve_merges(sheet: &mut RawSheet) {
    let mut remaining = Vec::new();
    for span in std::mem::take(&mut sheet.merges) {
        if !span.is_two_columns() {
            remaining.push(span);
            continue;
        }
        let value = cell_at(&sheet.cells, span.first_row, span.first_col);
        write_cell(&mut sheet.cells, span.first_row, span.first_col, value.clone());
        write_cell(&mut sheet.cells, span.last_row, span.last_col, value);
    }
    sheet.merges = remaining;
}

/// Normalizes a raw sheet: resolves two-column merges, drops the nominal
/// header row, and removes columns that are empty in every remaining row.
pub fn normalize(mut sheet: RawSheet) -> Grid {
    resolve_merges(&mut sheet);

    let mut rows: Vec<Vec<Option<String>>> = if sheet.cells.is_empty() {
        Vec::new()
    } else {
        sheet.cells.split_off(1)
    };

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, None);
    }

    let keep: Vec<bool> = (0..width)
        .map(|col| rows.iter().any(|row| row[col].is_some()))
        .collect();
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&keep)
                .filter_map(|(cell, keep)| keep.then_some(cell))
                .collect()
        })
        .collect();

    Grid {
        name: sheet.name,
        rows,
    }
}

fn cell_at(cells: &[Vec<Option<String>>], row: usize, col: usize) -> Option<String> {
    cells
        .get(row)
        .and_then(|cells_row| cells_row.get(col))
        .cloned()
        .flatten()
}

fn write_cell(cells: &mut Vec<Vec<Option<String>>>, row: usize, col: usize, value: Option<String>) {
    if cells.len() <= row {
        cells.resize_with(row + 1, Vec::new);
    }
    let cells_row = &mut cells[row];
    if cells_row.len() <= col {
        cells_row.resize(col + 1, None);
    }
    cells_row[col] = value;
}
