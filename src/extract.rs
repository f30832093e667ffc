use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, ToolError};
use crate::model::{ClassroomRow, DailyTable, Grid, WEEKDAYS, WeeklyTable, weekday_index};

/// Literal `H:MM-H:MM` shape of a time-slot label.
static TIME_SLOT_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{1,2}-\d{1,2}:\d{1,2}$").expect("time slot pattern"));

/// Returns the position of the first row whose second cell is a time-slot
/// label, never a later match.
pub fn find_time_row(grid: &Grid) -> Result<usize> {
    grid.rows
        .iter()
        .position(|row| {
            row.get(1)
                .and_then(|cell| cell.as_deref())
                .is_some_and(|text| TIME_SLOT_LABEL.is_match(text))
        })
        .ok_or_else(|| ToolError::HeaderNotFound {
            sheet: grid.name.clone(),
        })
}

/// Reduces a normalized sheet to the classroom rows offering `class_pattern`.
///
/// The time row's values become the timeslot labels and its first column
/// becomes the classroom key; only the rows strictly below it survive. A
/// cell is kept when the pattern has a match somewhere in its text (case
/// sensitive); absent cells never match, and rows left with no surviving
/// cell are dropped.
pub fn daily_table(grid: &Grid, class_pattern: &Regex) -> Result<DailyTable> {
    let header = find_time_row(grid)?;
    let slots: Vec<String> = grid.rows[header]
        .iter()
        .skip(1)
        .map(|cell| cell.clone().unwrap_or_default())
        .collect();

    let mut rooms = Vec::new();
    for row in &grid.rows[header + 1..] {
        let classroom = row.first().and_then(|cell| cell.clone()).unwrap_or_default();
        let mut cells: Vec<Option<String>> = row
            .iter()
            .skip(1)
            .map(|cell| {
                cell.as_deref()
                    .filter(|text| class_pattern.is_match(text))
                    .map(str::to_string)
            })
            .collect();
        cells.resize(slots.len(), None);
        if cells.iter().any(Option::is_some) {
            rooms.push(ClassroomRow { classroom, cells });
        }
    }

    Ok(DailyTable {
        title: grid.name.clone(),
        slots,
        rooms,
    })
}

/// Folds per-day tables into the five-weekday × timeslot matrix.
///
/// The column layout comes from the first table titled after a weekday, in
/// input order; labels other days introduce are appended after it. Tables
/// whose titles are not weekday names are skipped, and days without a table
/// keep all cells absent.
pub fn weekly_table(tables: &[DailyTable]) -> Result<WeeklyTable> {
    let layout = tables
        .iter()
        .find(|table| weekday_index(&table.title).is_some())
        .ok_or_else(|| ToolError::NoWeekdaySheet {
            tried: WEEKDAYS.iter().map(|day| (*day).to_string()).collect(),
        })?;

    let mut weekly = WeeklyTable::new(layout.slots.clone());

    for table in tables {
        let Some(day_index) = weekday_index(&table.title) else {
            continue;
        };
        for (slot_position, label) in table.slots.iter().enumerate() {
            let entries: Vec<String> = table
                .rooms
                .iter()
                .filter_map(|room| {
                    room.cells[slot_position].as_deref().map(|class| {
                        format!("{} ({})", collapse_whitespace(class), room.classroom)
                    })
                })
                .collect();
            if entries.is_empty() {
                continue;
            }
            let column = weekly.slot_index(label);
            weekly.rows[day_index][column] = Some(entries.join("\n"));
        }
    }

    Ok(weekly)
}

/// Collapses whitespace runs to single spaces and trims the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
