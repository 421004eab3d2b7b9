use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use swim_series::data::loader::{
    CHANNEL_COLS, STROKE_PHASE_COL, SUBJECT_COL, SWIM_CLASS_COL, TIME_COL,
};
use swim_series::data::schema::{legend_block, HEADER_ROWS};
use swim_series::data::CellValue;

/// Write a synthetic swim session in the recording layout.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Output CSV path
    #[arg(default_value = "sample_session.csv")]
    output: PathBuf,
    /// Number of samples
    #[arg(long, default_value_t = 2000)]
    rows: usize,
    /// Samples per second
    #[arg(long, default_value_t = 100.0)]
    rate: f64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Sensor noise: splitmix64 uniforms, summed in twelves for an
/// approximately normal value with unit variance.
struct Noise(u64);

impl Noise {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    fn sample(&mut self, spread: f64) -> f64 {
        let sum: f64 = (0..12).map(|_| self.uniform()).sum();
        (sum - 6.0) * spread
    }
}

/// Swim class for a sample: rest, push off, a length of swimming, a turn,
/// another length, rest.
fn swim_class_at(frac: f64) -> i64 {
    match frac {
        f if f < 0.10 => 1,
        f if f < 0.13 => 3,
        f if f < 0.50 => 2,
        f if f < 0.54 => 4,
        f if f < 0.90 => 2,
        _ => 1,
    }
}

/// 12-hour clock text as stored in recordings, e.g. `'09:41:07.250000'`.
fn clock_text(seconds_of_day: f64) -> String {
    let micros = (seconds_of_day * 1e6).round() as u64;
    let total_secs = micros / 1_000_000;
    let hour = (total_secs / 3600) % 12;
    let hour = if hour == 0 { 12 } else { hour };
    format!(
        "'{:02}:{:02}:{:02}.{:06}'",
        hour,
        (total_secs / 60) % 60,
        total_secs % 60,
        micros % 1_000_000
    )
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut noise = Noise(args.seed);

    let mut sheet = legend_block();
    sheet.set(0, 1, CellValue::String("Elite".into()));
    sheet.set(HEADER_ROWS, SUBJECT_COL, CellValue::String("Elite".into()));

    // Session starts at 09:30:00; one stroke cycle every 1.2 s while swimming
    let start = 9.5 * 3600.0;
    let stroke_period = 1.2;
    let mut last_phase_slot = None;

    for i in 0..args.rows {
        let row = HEADER_ROWS + i;
        let t = i as f64 / args.rate;
        let class = swim_class_at(i as f64 / args.rows.max(1) as f64);
        let swimming = class == 2;

        sheet.set(row, TIME_COL, CellValue::String(clock_text(start + t)));

        let phase = 2.0 * std::f64::consts::PI * t / stroke_period;
        for (c, &col) in CHANNEL_COLS.iter().enumerate() {
            let amplitude = if swimming { 150.0 } else { 10.0 };
            let offset = (c as f64) * 0.3;
            let value = amplitude * (phase + offset).sin() + noise.sample(4.0);
            sheet.set(row, col, CellValue::Float((value * 1000.0).round() / 1000.0));
        }
        sheet.set(row, SWIM_CLASS_COL, CellValue::Integer(class));

        // Eight events per cycle: R entry, R down sweep, R catch, R recovery, then left
        let slot = ((t / stroke_period).fract() * 8.0) as i64;
        if swimming && last_phase_slot != Some(slot) {
            sheet.set(row, STROKE_PHASE_COL, CellValue::Integer(slot + 1));
        }
        last_phase_slot = Some(slot);
    }

    sheet
        .write_csv(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {} samples to {}", args.rows, args.output.display());
    println!("Wrote {} samples to {}", args.rows, args.output.display());
    Ok(())
}
