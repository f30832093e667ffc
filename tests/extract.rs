use regex::Regex;
use rota_tools::ToolError;
use rota_tools::blocks::{day_blocks, merge_slots, split_label};
use rota_tools::cache::{MemoryCache, TableCache, cache_key, get_or_compute};
use rota_tools::calendar::project;
use rota_tools::extract::{daily_table, find_time_row, weekly_table};
use rota_tools::model::{DayBlock, DaySchedule, MergeSpan, RawSheet, WeeklyTable};
use rota_tools::normalize::{normalize, resolve_merges};

fn cell(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn sheet(name: &str, rows: &[&[&str]]) -> RawSheet {
    RawSheet {
        name: name.to_string(),
        cells: rows
            .iter()
            .map(|row| row.iter().map(|text| cell(text)).collect())
            .collect(),
        merges: Vec::new(),
    }
}

fn block(start: &str, end: &str, value: Option<&str>) -> DayBlock {
    DayBlock {
        start: start.to_string(),
        end: end.to_string(),
        value: value.map(str::to_string),
    }
}

fn date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn time_row_is_first_match_even_with_duplicates_below() {
    let grid = normalize(sheet(
        "Monday",
        &[
            &["DEPARTMENT OF ENGINEERING", "", ""],
            &["effective", "week 2", ""],
            &["", "7:00-9:00", "9:00-11:00"],
            &["Room A", "EL 3 365", ""],
            &["", "7:00-9:00", ""],
        ],
    ));

    assert_eq!(find_time_row(&grid).expect("time row found"), 1);
}

#[test]
fn missing_time_row_is_an_explicit_error() {
    let grid = normalize(sheet("Monday", &[&["banner", ""], &["a", "b"]]));

    let error = find_time_row(&grid).expect_err("no time row");
    assert!(matches!(error, ToolError::HeaderNotFound { sheet } if sheet == "Monday"));
}

#[test]
fn two_column_merges_duplicate_the_anchor_value() {
    let mut raw = sheet(
        "Monday",
        &[
            &["banner", "", ""],
            &["", "7:00-9:00", "9:00-11:00"],
            &["Lab", "EL 3 365", ""],
        ],
    );
    raw.merges.push(MergeSpan {
        first_row: 2,
        first_col: 1,
        last_row: 2,
        last_col: 2,
    });

    resolve_merges(&mut raw);

    assert_eq!(raw.cells[2][1].as_deref(), Some("EL 3 365"));
    assert_eq!(raw.cells[2][2].as_deref(), Some("EL 3 365"));
    assert!(raw.merges.is_empty());
}

#[test]
fn resolving_merges_twice_changes_nothing() {
    let mut raw = sheet(
        "Monday",
        &[
            &["banner", "", ""],
            &["", "7:00-9:00", "9:00-11:00"],
            &["Lab", "EL 3 365", ""],
        ],
    );
    raw.merges.push(MergeSpan {
        first_row: 2,
        first_col: 1,
        last_row: 2,
        last_col: 2,
    });

    resolve_merges(&mut raw);
    let snapshot = raw.clone();
    resolve_merges(&mut raw);

    assert_eq!(raw, snapshot);
}

#[test]
fn wider_merges_are_left_untouched() {
    let mut raw = sheet(
        "Monday",
        &[&["banner", "", "", ""], &["Lab", "EL 3 365", "", ""]],
    );
    raw.merges.push(MergeSpan {
        first_row: 1,
        first_col: 1,
        last_row: 1,
        last_col: 3,
    });

    resolve_merges(&mut raw);

    assert_eq!(raw.cells[1][2], None);
    assert_eq!(raw.cells[1][3], None);
    assert_eq!(raw.merges.len(), 1);
}

#[test]
fn normalize_drops_the_banner_row_and_empty_columns() {
    let grid = normalize(sheet(
        "Monday",
        &[
            &["banner", "", "unused header"],
            &["", "7:00-9:00", ""],
            &["Lab", "EL 3 365", ""],
        ],
    ));

    assert_eq!(grid.rows.len(), 2);
    assert!(grid.rows.iter().all(|row| row.len() == 2));
}

#[test]
fn daily_table_keeps_only_cells_matching_the_pattern() {
    let pattern = Regex::new("EL 3").expect("class pattern");
    let grid = normalize(sheet(
        "Monday",
        &[
            &["banner", "", ""],
            &["", "7:00-9:00", "9:00-11:00"],
            &["Lab", "EL 3A 365", "CE 2 111"],
            &["Hall", "MATH 101", "PHYS 205"],
        ],
    ));

    let table = daily_table(&grid, &pattern).expect("daily table");

    assert_eq!(table.rooms.len(), 1);
    assert_eq!(table.rooms[0].classroom, "Lab");
    assert_eq!(table.rooms[0].cells[0].as_deref(), Some("EL 3A 365"));
    assert_eq!(table.rooms[0].cells[1], None);
    for room in &table.rooms {
        for text in room.cells.iter().flatten() {
            assert!(pattern.is_match(text));
        }
    }
}

#[test]
fn pattern_matching_is_case_sensitive() {
    let pattern = Regex::new("EL 3").expect("class pattern");
    let grid = normalize(sheet(
        "Monday",
        &[
            &["banner", ""],
            &["", "7:00-9:00"],
            &["Lab", "el 3a 365"],
        ],
    ));

    let table = daily_table(&grid, &pattern).expect("daily table");
    assert!(table.rooms.is_empty());
}

fn day_fixture(name: &str, first_slot: &str, second_slot: &str) -> RawSheet {
    sheet(
        name,
        &[
            &["banner", "", ""],
            &["", "7:00-9:00", "9:00-10:00"],
            &["R1", first_slot, second_slot],
        ],
    )
}

#[test]
fn weekly_table_is_commutative_in_sheet_order() {
    let pattern = Regex::new("EL 3").expect("class pattern");
    let monday = daily_table(&normalize(day_fixture("Monday", "EL 3 100", "")), &pattern)
        .expect("monday table");
    let thursday = daily_table(&normalize(day_fixture("Thursday", "", "EL 3 200")), &pattern)
        .expect("thursday table");

    let forward = weekly_table(&[monday.clone(), thursday.clone()]).expect("weekly table");
    let reversed = weekly_table(&[thursday, monday]).expect("weekly table");

    assert_eq!(forward.slots, reversed.slots);
    assert_eq!(forward.rows, reversed.rows);
}

#[test]
fn weekly_table_matches_titles_case_insensitively() {
    let pattern = Regex::new("EL 3").expect("class pattern");
    let monday = daily_table(&normalize(day_fixture("MONDAY", "EL 3 100", "")), &pattern)
        .expect("daily table");

    let weekly = weekly_table(&[monday]).expect("weekly table");

    assert_eq!(weekly.rows[0][0].as_deref(), Some("EL 3 100 (R1)"));
}

#[test]
fn weekly_table_collapses_whitespace_and_appends_the_classroom() {
    let pattern = Regex::new("EL 3").expect("class pattern");
    let thursday = daily_table(
        &normalize(sheet(
            "Thursday",
            &[
                &["banner", ""],
                &["", "9:00-10:00"],
                &["VLE", "EL 3A,   CE 3B\n365   KRAMPAH"],
            ],
        )),
        &pattern,
    )
    .expect("daily table");

    let weekly = weekly_table(&[thursday]).expect("weekly table");

    assert_eq!(
        weekly.rows[3][0].as_deref(),
        Some("EL 3A, CE 3B 365 KRAMPAH (VLE)")
    );
}

#[test]
fn simultaneous_classes_join_with_newlines_in_row_order() {
    let pattern = Regex::new("EL 3").expect("class pattern");
    let monday = daily_table(
        &normalize(sheet(
            "Monday",
            &[
                &["banner", ""],
                &["", "7:00-9:00"],
                &["LH 1", "EL 3A 365"],
                &["LH 2", "EL 3B 377"],
            ],
        )),
        &pattern,
    )
    .expect("daily table");

    let weekly = weekly_table(&[monday]).expect("weekly table");

    assert_eq!(
        weekly.rows[0][0].as_deref(),
        Some("EL 3A 365 (LH 1)\nEL 3B 377 (LH 2)")
    );
}

#[test]
fn weekly_table_without_weekday_titles_fails() {
    let pattern = Regex::new("EL 3").expect("class pattern");
    let notes = daily_table(&normalize(day_fixture("Notes", "EL 3 100", "")), &pattern)
        .expect("daily table");

    let error = weekly_table(&[notes]).expect_err("no weekday sheet");
    assert!(matches!(error, ToolError::NoWeekdaySheet { tried } if tried.len() == 5));
}

#[test]
fn labels_split_on_the_last_hyphen() {
    assert_eq!(
        split_label("7:00-9:00", "Monday").expect("label split"),
        ("7:00".to_string(), "9:00".to_string())
    );
    assert_eq!(
        split_label("-1:00-2:00", "Monday").expect("label split"),
        ("-1:00".to_string(), "2:00".to_string())
    );
    assert_eq!(
        split_label("", "Monday").expect("gap label"),
        (String::new(), String::new())
    );
}

#[test]
fn undecomposable_labels_are_an_error() {
    let error = split_label("LUNCH", "Monday").expect_err("malformed label");
    assert!(
        matches!(error, ToolError::MalformedTimeLabel { label, day } if label == "LUNCH" && day == "Monday")
    );
}

#[test]
fn adjacent_equal_slots_merge_into_one_block() {
    let blocks = merge_slots(
        [
            ("7:00-9:00", Some("A")),
            ("9:00-11:00", Some("A")),
            ("11:00-1:00", Some("B")),
        ],
        "Monday",
    )
    .expect("merged");

    assert_eq!(
        blocks,
        vec![block("7:00", "11:00", Some("A")), block("11:00", "1:00", Some("B"))]
    );
}

#[test]
fn gap_placeholders_break_adjacency() {
    let blocks = merge_slots(
        [
            ("7:00-9:00", None),
            ("9:00-11:00", None),
            ("", None),
            ("1:30-3:30", None),
        ],
        "Monday",
    )
    .expect("merged");

    assert_eq!(
        blocks,
        vec![
            block("7:00", "11:00", None),
            block("", "", None),
            block("1:30", "3:30", None),
        ]
    );
}

#[test]
fn merging_merged_blocks_is_a_fixed_point() {
    let first = merge_slots(
        [
            ("7:00-9:00", Some("A")),
            ("9:00-11:00", Some("A")),
            ("", None),
            ("1:30-3:30", Some("B")),
            ("3:30-5:30", Some("B")),
        ],
        "Monday",
    )
    .expect("merged");

    let labels: Vec<String> = first
        .iter()
        .map(|entry| format!("{}-{}", entry.start, entry.end))
        .collect();
    let pairs: Vec<(&str, Option<&str>)> = labels
        .iter()
        .map(String::as_str)
        .zip(first.iter().map(|entry| entry.value.as_deref()))
        .collect();
    let second = merge_slots(pairs, "Monday").expect("re-merged");

    assert_eq!(first, second);
}

#[test]
fn day_blocks_cover_all_five_days_in_order() {
    let mut weekly = WeeklyTable::new(vec!["7:00-9:00".to_string(), "9:00-10:00".to_string()]);
    weekly.rows[0][0] = Some("EL 3 (R1)".to_string());
    weekly.rows[0][1] = Some("EL 3 (R1)".to_string());

    let schedule = day_blocks(&weekly).expect("day blocks");

    assert_eq!(schedule.len(), 5);
    assert_eq!(schedule[0].day, "Monday");
    assert_eq!(schedule[0].data, vec![block("7:00", "10:00", Some("EL 3 (R1)"))]);
    assert_eq!(schedule[1].data, vec![block("7:00", "10:00", None)]);
    assert_eq!(schedule[4].day, "Friday");
}

#[test]
fn calendar_skips_gap_blocks() {
    let schedule = vec![DaySchedule {
        day: "Monday".to_string(),
        data: vec![block("", "None", None)],
    }];

    let calendar = project("test", &schedule, date(2026, 1, 5), date(2026, 1, 9))
        .expect("calendar projected");

    assert!(!calendar.to_string().contains("BEGIN:VEVENT"));
}

#[test]
fn calendar_emits_one_event_per_matching_date() {
    let schedule = vec![DaySchedule {
        day: "Thursday".to_string(),
        data: vec![block("9:00", "10:00", Some("EL 3A (VLE)\nEL 3B (LH 1)"))],
    }];

    let calendar = project("test", &schedule, date(2026, 1, 1), date(2026, 1, 14))
        .expect("calendar projected");
    let ics = calendar.to_string();

    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    assert!(ics.contains("EL 3A (VLE) EL 3B (LH 1)"));
}

#[test]
fn unparsable_clock_times_are_an_error() {
    let schedule = vec![DaySchedule {
        day: "Monday".to_string(),
        data: vec![block("9:00", "25:99", Some("EL 3 (R1)"))],
    }];

    let error = project("test", &schedule, date(2026, 1, 5), date(2026, 1, 5))
        .expect_err("invalid clock time");
    assert!(matches!(error, ToolError::DateParse { value } if value == "25:99"));
}

#[test]
fn cache_keys_strip_the_extension_and_pattern_spaces() {
    assert_eq!(cache_key("DRAFT_4.xlsx", "EL3"), "DRAFT_4-EL3");
    assert_eq!(cache_key("DRAFT_4", "EL 3"), "DRAFT_4-EL3");
    assert_eq!(cache_key("schedule.v2.xlsx", "EL 3"), "schedule-EL3");
}

#[test]
fn cache_misses_recompute_and_overwrite() {
    let cache = MemoryCache::new();

    let computed =
        get_or_compute(&cache, "DRAFT_4-EL3", || Ok("payload".to_string())).expect("computed");
    assert_eq!(computed, "payload");

    let hit = get_or_compute(&cache, "DRAFT_4-EL3", || Ok("recomputed".to_string()))
        .expect("cache hit");
    assert_eq!(hit, "payload");
    assert_eq!(cache.get("DRAFT_4-EL3").as_deref(), Some("payload"));
}
