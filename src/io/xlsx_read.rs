use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::error::Result;
use crate::model::{MergeSpan, RawSheet};

/// Loads every sheet of an `.xlsx` workbook into raw grids carrying their
/// merge spans, in workbook order.
pub fn read_workbook(path: &Path) -> Result<Vec<RawSheet>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    workbook.load_merged_regions()?;

    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let cells = range_to_cells(&workbook.worksheet_range(&name)?);
        let merges = workbook
            .merged_regions_by_sheet(&name)
            .into_iter()
            .map(|(_, _, dimensions)| MergeSpan {
                first_row: dimensions.start.0 as usize,
                first_col: dimensions.start.1 as usize,
                last_row: dimensions.end.0 as usize,
                last_col: dimensions.end.1 as usize,
            })
            .collect();
        sheets.push(RawSheet {
            name,
            cells,
            merges,
        });
    }

    Ok(sheets)
}

/// Materialises a worksheet range as a dense grid anchored at A1, so cell
/// positions line up with the sheet's merge span coordinates.
fn range_to_cells(range: &calamine::Range<Data>) -> Vec<Vec<Option<String>>> {
    let Some(end) = range.end() else {
        return Vec::new();
    };
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut cells = vec![vec![None; end.1 as usize + 1]; end.0 as usize + 1];
    for (row_offset, row) in range.rows().enumerate() {
        for (col_offset, cell) in row.iter().enumerate() {
            let value = cell_to_value(cell);
            cells[start_row as usize + row_offset][start_col as usize + col_offset] = value;
        }
    }
    cells
}

/// Stringifies a cell, treating empty and whitespace-only content as
/// absent.
fn cell_to_value(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(value) => value.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::Empty => return None,
        other => other.to_string(),
    };
    if text.trim().is_empty() { None } else { Some(text) }
}
