use std::{fs, io::Write, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use zhang_core::{PatternSize, Real};
use zhang_pipeline::{run_calibration, CalibrationConfig, CalibrationInput, CalibrationReport};

/// Planar camera calibration (Zhang's method) from point correspondences.
#[derive(Debug, Parser)]
#[command(author, version, about = "Planar homography camera calibration")]
struct Args {
    /// Path to JSON file containing a CalibrationInput.
    #[arg(long)]
    input: PathBuf,

    /// Optional path to JSON CalibrationConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the report to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the pattern grid size, e.g. `9x6`.
    #[arg(long, value_parser = parse_grid)]
    pattern: Option<(usize, usize)>,

    /// Override the pattern square size (target units).
    #[arg(long)]
    square: Option<Real>,

    /// Log per-view details.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_grid(s: &str) -> Result<(usize, usize)> {
    let Some((cols, rows)) = s.split_once(['x', 'X']) else {
        bail!("expected COLSxROWS, got '{s}'");
    };
    let cols = cols.trim().parse().with_context(|| format!("bad column count in '{s}'"))?;
    let rows = rows.trim().parse().with_context(|| format!("bad row count in '{s}'"))?;
    Ok((cols, rows))
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse {}", path.display()))
}

fn apply_pattern_overrides(
    pattern: &mut PatternSize,
    grid: Option<(usize, usize)>,
    square: Option<Real>,
) {
    if let Some((cols, rows)) = grid {
        pattern.cols = cols;
        pattern.rows = rows;
    }
    if let Some(square_size) = square {
        pattern.square_size = square_size;
    }
}

fn calibrate_from_files(args: &Args) -> Result<CalibrationReport> {
    let mut input: CalibrationInput = load_json_file(&args.input)?;
    apply_pattern_overrides(&mut input.pattern, args.pattern, args.square);

    let config = match &args.config {
        Some(path) => load_json_file::<CalibrationConfig>(path)?,
        None => CalibrationConfig::default(),
    };

    let report = run_calibration(&input, &config)?;
    Ok(report)
}

fn write_report(report: &CalibrationReport, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!("report written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let report = calibrate_from_files(&args)?;
    write_report(&report, args.output.as_deref())
}
