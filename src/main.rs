use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rota_tools::convert;
use rota_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::Table(args) => execute_table(args),
        Command::Blocks(args) => execute_blocks(args),
        Command::Download(args) => execute_download(args),
        Command::Calendar(args) => execute_calendar(args),
    }
}

fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn execute_table(args: ExtractArgs) -> Result<()> {
    ensure_input(&args.input)?;
    let json = convert::table_to_json(&args.input, &args.pattern)?;
    std::fs::write(&args.output, json)?;
    Ok(())
}

fn execute_blocks(args: ExtractArgs) -> Result<()> {
    ensure_input(&args.input)?;
    let json = convert::blocks_to_json(&args.input, &args.pattern)?;
    std::fs::write(&args.output, json)?;
    Ok(())
}

fn execute_download(args: ExtractArgs) -> Result<()> {
    ensure_input(&args.input)?;
    convert::workbook_to_download(&args.input, &args.pattern, &args.output)
}

fn execute_calendar(args: CalendarArgs) -> Result<()> {
    ensure_input(&args.extract.input)?;
    let ics = convert::workbook_to_calendar(
        &args.extract.input,
        &args.extract.pattern,
        args.start,
        args.end,
    )?;
    std::fs::write(&args.extract.output, ics)?;
    Ok(())
}

fn ensure_input(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Extract per-class weekly timetables from Excel workbooks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the weekly table as a JSON records document.
    Table(ExtractArgs),
    /// Extract the timetable as day-grouped contiguous blocks.
    Blocks(ExtractArgs),
    /// Rebuild a downloadable workbook for one class pattern.
    Download(ExtractArgs),
    /// Produce an iCalendar feed over a date range.
    Calendar(CalendarArgs),
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Source workbook (.xlsx) with one sheet per weekday.
    #[arg(long)]
    input: PathBuf,

    /// Class pattern to extract, e.g. "EL 3".
    #[arg(long)]
    pattern: String,

    /// Output file path.
    #[arg(long)]
    output: PathBuf,
}

#[derive(clap::Args)]
struct CalendarArgs {
    #[command(flatten)]
    extract: ExtractArgs,

    /// First calendar date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    start: NaiveDate,

    /// Last calendar date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    end: NaiveDate,
}
