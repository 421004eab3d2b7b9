use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use swim_series::data::{self, TimeFormat, TimeSeries, ZeroVariancePolicy};
use swim_series::LoaderConfig;

#[derive(Parser, Debug)]
#[command(
    name = "swim-series",
    about = "Validate and load a swim training sensor spreadsheet"
)]
struct Cli {
    /// Spreadsheet to load (.xlsx, .xls, .ods or .csv)
    file: PathBuf,
    /// JSON loader config; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Clock convention of the time column: 12h or 24h
    #[arg(long)]
    time_format: Option<TimeFormat>,
    /// Zero-variance channel handling: zero, nan or error
    #[arg(long)]
    zero_variance: Option<ZeroVariancePolicy>,
    /// Only check the header block
    #[arg(long)]
    validate_only: bool,
    /// Print the whole series as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LoaderConfig::from_json_file(path)?,
        None => LoaderConfig::default(),
    };
    if let Some(format) = cli.time_format {
        config.time_format = format;
    }
    if let Some(policy) = cli.zero_variance {
        config.zero_variance = policy;
    }

    let path = config.resolve_input(&cli.file);
    info!(
        "loading {} ({} clock, zero-variance policy {})",
        path.display(),
        config.time_format,
        config.zero_variance
    );

    if cli.validate_only {
        data::validate_file(&path)
            .with_context(|| format!("validating {}", path.display()))?;
        println!("{}: header block OK", path.display());
        return Ok(());
    }

    let series =
        data::load_series(&path, &config).with_context(|| format!("loading {}", path.display()))?;

    if cli.json {
        let text = serde_json::to_string_pretty(&series).context("serializing series")?;
        println!("{text}");
    } else {
        print_summary(&series);
    }
    Ok(())
}

fn print_summary(series: &TimeSeries) {
    println!("Subject category : {}", series.subject_cat);
    println!("Samples          : {}", series.len());
    println!("Duration         : {:.3} s", series.duration());
    if let (Some(first), Some(last)) = (series.true_time.first(), series.true_time.last()) {
        println!("Clock            : {first} .. {last}");
    }
    println!("Channels         : {}", series.cols.join(", "));
    println!("Swim classes:");
    for (code, count) in series.swim_class_counts() {
        let name = series
            .swim_class_def
            .get(&code)
            .map(String::as_str)
            .unwrap_or("?");
        println!("  {code} {name:<16} {count}");
    }
    println!("Stroke events    : {}", series.stroke_event_count());
}
