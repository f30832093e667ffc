//! Core library for the rota-tools command line application.
//!
//! The library extracts a per-class weekly timetable from a multi-sheet
//! Excel workbook and re-projects it as a JSON records table, a day-grouped
//! list of merged contiguous time blocks, a rebuilt downloadable workbook,
//! and an iCalendar feed. The modules are structured to keep
//! responsibilities narrow and composable: IO adapters live under [`io`],
//! data representations inside [`model`], the extraction pipeline in
//! [`normalize`], [`extract`], and [`blocks`], calendar projection in
//! [`calendar`], the cache collaborator contract in [`cache`], and the
//! file-to-file orchestration under [`convert`].

pub mod blocks;
pub mod cache;
pub mod calendar;
pub mod convert;
pub mod error;
pub mod extract;
pub mod io;
pub mod model;
pub mod normalize;

pub use error::{Result, ToolError};
