use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::blocks::day_blocks;
use crate::cache::{self, TableCache};
use crate::error::Result;
use crate::extract::{daily_table, weekly_table};
use crate::io::{xlsx_read, xlsx_write};
use crate::model::{DaySchedule, WeeklyTable};
use crate::normalize::normalize;

/// Extracts the weekly table for `class_pattern` from the workbook at
/// `input`. Every call re-reads the workbook and works on its own copy, so
/// concurrent queries for different patterns never share mutable state.
#[instrument(level = "info", skip_all, fields(input = %input.display(), class_pattern))]
pub fn extract_weekly_table(input: &Path, class_pattern: &str) -> Result<WeeklyTable> {
    let pattern = Regex::new(class_pattern)?;
    let sheets = xlsx_read::read_workbook(input)?;
    info!(sheet_count = sheets.len(), "workbook loaded");

    let tables = sheets
        .into_iter()
        .map(|sheet| daily_table(&normalize(sheet), &pattern))
        .collect::<Result<Vec<_>>>()?;
    let weekly = weekly_table(&tables)?;
    debug!(slot_count = weekly.slots.len(), "weekly table built");
    Ok(weekly)
}

/// Serializes the weekly table for `class_pattern` in records orientation.
#[instrument(level = "info", skip_all, fields(input = %input.display(), class_pattern))]
pub fn table_to_json(input: &Path, class_pattern: &str) -> Result<String> {
    let weekly = extract_weekly_table(input, class_pattern)?;
    Ok(serde_json::to_string_pretty(&weekly.to_records())?)
}

/// Cached variant of [`table_to_json`]: answers from `cache` under the key
/// built from the workbook file name and the pattern, recomputing on a
/// miss.
pub fn cached_table_json(
    cache: &dyn TableCache,
    input: &Path,
    class_pattern: &str,
) -> Result<String> {
    let filename = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let key = cache::cache_key(filename, class_pattern);
    cache::get_or_compute(cache, &key, || table_to_json(input, class_pattern))
}

/// Projects the weekly table for `class_pattern` as day-grouped contiguous
/// blocks.
#[instrument(level = "info", skip_all, fields(input = %input.display(), class_pattern))]
pub fn extract_day_blocks(input: &Path, class_pattern: &str) -> Result<Vec<DaySchedule>> {
    let weekly = extract_weekly_table(input, class_pattern)?;
    day_blocks(&weekly)
}

/// Serializes the day-grouped block projection.
pub fn blocks_to_json(input: &Path, class_pattern: &str) -> Result<String> {
    let schedule = extract_day_blocks(input, class_pattern)?;
    Ok(serde_json::to_string_pretty(&schedule)?)
}

/// Rebuilds a downloadable workbook from a serialized records table.
pub fn json_to_workbook(json: &str, output: &Path) -> Result<()> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    xlsx_write::write_records(output, &records)
}

/// Full download flow: extract the weekly table, serialize it, and rebuild
/// it as a workbook at `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), class_pattern, output = %output.display())
)]
pub fn workbook_to_download(input: &Path, class_pattern: &str, output: &Path) -> Result<()> {
    let json = table_to_json(input, class_pattern)?;
    json_to_workbook(&json, output)
}

/// Emits the iCalendar document for the schedule between `start` and `end`
/// inclusive, named after the workbook file.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), class_pattern, %start, %end)
)]
pub fn workbook_to_calendar(
    input: &Path,
    class_pattern: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<u8>> {
    let schedule = extract_day_blocks(input, class_pattern)?;
    let name = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("class_schedule");
    let calendar = crate::calendar::project(name, &schedule, start, end)?;
    info!(day_count = schedule.len(), "calendar projected");
    Ok(calendar.to_string().into_bytes())
}
