use chrono::{NaiveDate, NaiveTime};
use icalendar::{Calendar, Component, Event, EventLike};

use crate::error::{Result, ToolError};
use crate::model::DaySchedule;

/// Expands day-grouped blocks over `start..=end` into a calendar of timed
/// events.
///
/// Each date contributes the blocks of the first schedule entry whose day
/// matches the date's weekday name. A block qualifies only when its start,
/// end, and value are all non-empty; gap placeholders are skipped rather
/// than emitted as empty events. Block endpoints are read as 24-hour `H:MM`
/// clock times on the iteration date, and summaries have embedded newlines
/// replaced by spaces.
pub fn project(
    name: &str,
    schedule: &[DaySchedule],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Calendar> {
    let mut calendar = Calendar::new();
    calendar.name(name);

    let mut date = start;
    while date <= end {
        let day_name = date.format("%A").to_string();
        if let Some(day) = schedule.iter().find(|entry| entry.day == day_name) {
            for block in &day.data {
                let Some(value) = block.value.as_deref().filter(|text| !text.is_empty()) else {
                    continue;
                };
                if block.start.is_empty() || block.end.is_empty() {
                    continue;
                }
                let starts = date.and_time(parse_clock(&block.start)?);
                let ends = date.and_time(parse_clock(&block.end)?);
                calendar.push(
                    Event::new()
                        .summary(&value.replace('\n', " "))
                        .starts(starts)
                        .ends(ends)
                        .done(),
                );
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(calendar)
}

/// Reads a 24-hour `H:MM` clock time.
fn parse_clock(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| ToolError::DateParse {
        value: value.to_string(),
    })
}
