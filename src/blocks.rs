use crate::error::{Result, ToolError};
use crate::model::{DayBlock, DaySchedule, WEEKDAYS, WeeklyTable};

/// Splits a timeslot label into its start and end endpoints.
///
/// The end is the part after the last `-`; everything before it is the
/// start, so labels with embedded hyphens keep them inside the start. An
/// empty label is the gap placeholder and yields empty endpoints; any other
/// label without a separator cannot be decomposed.
pub fn split_label(label: &str, day: &str) -> Result<(String, String)> {
    if label.is_empty() {
        return Ok((String::new(), String::new()));
    }
    match label.rsplit_once('-') {
        Some((start, end)) => Ok((start.to_string(), end.to_string())),
        None => Err(ToolError::MalformedTimeLabel {
            label: label.to_string(),
            day: day.to_string(),
        }),
    }
}

/// Collapses an ordered sequence of `(timeslot label, value)` pairs into
/// the minimal list of contiguous blocks.
///
/// A new slot extends the open block only when its value equals the block's
/// and its start label equals the block's end label, compared as strings;
/// absent values are equal to each other. Anything else closes the open
/// block and opens a new one.
pub fn merge_slots<'a, I>(slots: I, day: &str) -> Result<Vec<DayBlock>>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut blocks: Vec<DayBlock> = Vec::new();
    let mut open: Option<DayBlock> = None;

    for (label, value) in slots {
        let (start, end) = split_label(label, day)?;
        let value = value.map(str::to_string);
        match open.as_mut() {
            Some(block) if block.value == value && block.end == start => {
                block.end = end;
            }
            _ => {
                if let Some(block) = open.take() {
                    blocks.push(block);
                }
                open = Some(DayBlock { start, end, value });
            }
        }
    }
    if let Some(block) = open.take() {
        blocks.push(block);
    }

    Ok(blocks)
}

/// Merges every weekday row of the weekly table, producing one entry per
/// weekday in fixed order.
pub fn day_blocks(weekly: &WeeklyTable) -> Result<Vec<DaySchedule>> {
    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(day_index, day)| {
            let data = merge_slots(weekly.day_row(day_index), day)?;
            Ok(DaySchedule {
                day: (*day).to_string(),
                data,
            })
        })
        .collect()
}
