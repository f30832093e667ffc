use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The weekday rows of a weekly table, in fixed order.
pub const WEEKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Returns the position in [`WEEKDAYS`] matching `title`, ignoring case.
/// Sheet titles that are not weekday names yield `None`.
pub fn weekday_index(title: &str) -> Option<usize> {
    WEEKDAYS.iter().position(|day| day.eq_ignore_ascii_case(title))
}

/// A merged cell range declared by a sheet, with 0-based inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSpan {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl MergeSpan {
    /// Whether the span covers exactly two columns.
    pub fn is_two_columns(&self) -> bool {
        self.last_col == self.first_col + 1
    }
}

/// One sheet of the source workbook before normalization: a dense grid of
/// optional cell values plus the merge spans the sheet declares. Empty and
/// whitespace-only cells are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub cells: Vec<Vec<Option<String>>>,
    pub merges: Vec<MergeSpan>,
}

/// A normalized sheet: two-column merges resolved, the nominal header row
/// dropped, and columns that were empty in every remaining row removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub name: String,
    pub rows: Vec<Vec<Option<String>>>,
}

/// One classroom's row of a [`DailyTable`], holding the per-slot cells that
/// survived the class pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassroomRow {
    pub classroom: String,
    pub cells: Vec<Option<String>>,
}

/// A single day's table reduced to the classrooms offering one class.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTable {
    /// Sheet title the table was extracted from.
    pub title: String,
    /// Timeslot labels taken from the sheet's header row.
    pub slots: Vec<String>,
    /// Classroom rows in sheet order.
    pub rooms: Vec<ClassroomRow>,
}

/// The five-weekday × timeslot matrix of extracted class strings.
///
/// Rows follow [`WEEKDAYS`]; a cell is either absent or the newline-joined
/// `"<class> (<classroom>)"` entries for that day and slot.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyTable {
    pub slots: Vec<String>,
    pub rows: [Vec<Option<String>>; 5],
}

impl WeeklyTable {
    /// Creates an empty matrix over the given slot columns.
    pub fn new(slots: Vec<String>) -> Self {
        let width = slots.len();
        Self {
            slots,
            rows: std::array::from_fn(|_| vec![None; width]),
        }
    }

    /// Returns the column for `label`, appending a new all-absent column
    /// when the label has not been seen before.
    pub fn slot_index(&mut self, label: &str) -> usize {
        match self.slots.iter().position(|slot| slot == label) {
            Some(index) => index,
            None => {
                self.slots.push(label.to_string());
                for row in &mut self.rows {
                    row.push(None);
                }
                self.slots.len() - 1
            }
        }
    }

    /// Iterates one weekday row as `(slot label, cell)` pairs in column
    /// order. `day_index` is a position into [`WEEKDAYS`].
    pub fn day_row<'a>(
        &'a self,
        day_index: usize,
    ) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        self.slots
            .iter()
            .map(String::as_str)
            .zip(self.rows[day_index].iter().map(Option::as_deref))
    }

    /// Serializes the table in records orientation: one object per weekday
    /// in fixed order, a leading `"Day"` key, then one key per timeslot
    /// column in column order. Absent cells become `null`.
    pub fn to_records(&self) -> Vec<Value> {
        WEEKDAYS
            .iter()
            .enumerate()
            .map(|(day_index, day)| {
                let mut record = Map::new();
                record.insert("Day".to_string(), Value::String((*day).to_string()));
                for (label, cell) in self.day_row(day_index) {
                    let value = match cell {
                        Some(text) => Value::String(text.to_string()),
                        None => Value::Null,
                    };
                    record.insert(label.to_string(), value);
                }
                Value::Object(record)
            })
            .collect()
    }
}

/// A contiguous run of equal-valued, chronologically adjacent timeslots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBlock {
    pub start: String,
    pub end: String,
    pub value: Option<String>,
}

/// One weekday's merged blocks, as serialized in the day-block projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String,
    pub data: Vec<DayBlock>,
}
