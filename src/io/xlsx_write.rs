use std::path::Path;

use rust_xlsxwriter::Workbook;
use serde_json::Value;

use crate::error::Result;

/// Media type of the produced workbook, for callers that serve it.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Writes JSON records to a single-sheet workbook at `path`: a header row
/// from the union of record keys in first-seen order, then one row per
/// record.
pub fn write_records(path: &Path, records: &[Value]) -> Result<()> {
    let mut workbook = build_workbook(records)?;
    workbook.save(path)?;
    Ok(())
}

/// Same as [`write_records`], returning the workbook bytes for callers
/// that stream the artifact instead of touching the filesystem.
pub fn records_to_bytes(records: &[Value]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(records)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(records: &[Value]) -> Result<Workbook> {
    let columns = collect_columns(records);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col_index, column) in columns.iter().enumerate() {
        worksheet.write_string(0, col_index as u16, column)?;
    }

    for (row_index, record) in records.iter().enumerate() {
        let Value::Object(fields) = record else {
            continue;
        };
        let row = (row_index + 1) as u32;
        for (col_index, column) in columns.iter().enumerate() {
            let col = col_index as u16;
            match fields.get(column) {
                Some(Value::String(text)) => {
                    worksheet.write_string(row, col, text)?;
                }
                Some(Value::Number(number)) => {
                    if let Some(value) = number.as_f64() {
                        worksheet.write_number(row, col, value)?;
                    }
                }
                Some(Value::Bool(flag)) => {
                    worksheet.write_boolean(row, col, *flag)?;
                }
                Some(Value::Null) | None => {}
                Some(other) => {
                    worksheet.write_string(row, col, &other.to_string())?;
                }
            }
        }
    }

    Ok(workbook)
}

/// Union of record keys in first-seen order.
fn collect_columns(records: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        let Value::Object(fields) = record else {
            continue;
        };
        for key in fields.keys() {
            if !columns.iter().any(|column| column == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}
