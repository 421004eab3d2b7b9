use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveTime;
use ndarray::{Array2, ArrayView1, Axis};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Fixed tables
// ---------------------------------------------------------------------------

/// The twelve sensor channels, in the order they appear in the sheet and in
/// the columns of [`TimeSeries::sensor_vals`].
pub const GYRO_COLS: [&str; 12] = [
    "R Wrist X Gyro",
    "R Wrist Y Gyro",
    "R Wrist Z Gyro",
    "R Wrist X Accel",
    "R Wrist Y Accel",
    "R Wrist Z Accel",
    "Back X Gyro",
    "Back Y Gyro",
    "Back Z Gyro",
    "Back X Accel",
    "Back Y Accel",
    "Back Z Accel",
];

/// Swim class code → description.
pub const SWIM_CLASS_DEF: [(u8, &str); 4] = [
    (1, "Not swimming"),
    (2, "Swimming"),
    (3, "Push off event"),
    (4, "Turn event"),
];

/// Stroke phase code → description. Code 0 marks a time step with no event.
pub const STROKE_PHASE_DEF: [(u8, &str); 9] = [
    (0, "No event"),
    (1, "R Hand Entry"),
    (2, "R Start of Down Sweep"),
    (3, "R Catch"),
    (4, "R Recovery"),
    (5, "L Hand Entry"),
    (6, "L Start of Down Sweep"),
    (7, "L Catch"),
    (8, "L Recovery"),
];

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    /// Numeric interpretation of the cell. Text holding a number counts,
    /// since spreadsheets frequently store readings as text. NaN and
    /// infinities are not readings and give `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Short description used in diagnostics: `text "abc"`, `number 3`, `empty cell`.
    pub fn describe(&self) -> String {
        match self {
            CellValue::String(s) => format!("text {s:?}"),
            CellValue::Integer(i) => format!("number {i}"),
            CellValue::Float(v) => format!("number {v}"),
            CellValue::Bool(b) => format!("boolean {b}"),
            CellValue::Empty => "empty cell".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// TimeSeries – the loaded recording
// ---------------------------------------------------------------------------

/// A loaded swim recording: time axis, raw and normalized sensor channels,
/// and the ground-truth labels for every time step.
///
/// `sensor_vals` and `sensor_vals_normed` are laid out time-step × channel,
/// so row `t` holds the twelve readings at `true_time[t]` and column `c`
/// is the channel named `cols[c]`.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    /// Clock time of each sample (the date is not recorded).
    pub true_time: Vec<NaiveTime>,
    /// Seconds since the first sample; `elapsed_time[0] == 0.0`.
    pub elapsed_time: Vec<f64>,
    /// Channel names, one per column of the sensor matrices.
    pub cols: Vec<String>,
    /// Raw readings, shape `(T, 12)`.
    pub sensor_vals: Array2<f64>,
    /// Readings rescaled per channel to zero mean and unit standard deviation.
    pub sensor_vals_normed: Array2<f64>,
    /// Swim class code per time step, 1..=4.
    pub swim_class: Vec<u8>,
    pub swim_class_def: BTreeMap<u8, String>,
    /// Stroke phase code per time step, 0..=8 (0 = no event).
    pub stroke_phase: Vec<u8>,
    pub stroke_phase_def: BTreeMap<u8, String>,
    /// Subject category from the first data row (e.g. "Elite").
    pub subject_cat: String,
}

pub(crate) fn definition_map(table: &[(u8, &str)]) -> BTreeMap<u8, String> {
    table
        .iter()
        .map(|&(code, name)| (code, name.to_string()))
        .collect()
}

impl TimeSeries {
    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.true_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.true_time.is_empty()
    }

    /// Column index of a channel by name.
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.cols.iter().position(|c| c == name)
    }

    /// Raw readings of one channel.
    pub fn channel(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.channel_index(name)
            .map(|idx| self.sensor_vals.index_axis(Axis(1), idx))
    }

    /// Normalized readings of one channel.
    pub fn channel_normed(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.channel_index(name)
            .map(|idx| self.sensor_vals_normed.index_axis(Axis(1), idx))
    }

    /// Elapsed time of the last sample, in seconds.
    pub fn duration(&self) -> f64 {
        self.elapsed_time.last().copied().unwrap_or(0.0)
    }

    /// Number of time steps per swim class code. Every defined class is
    /// present in the result, with zero when it never occurs.
    pub fn swim_class_counts(&self) -> BTreeMap<u8, usize> {
        let mut counts: BTreeMap<u8, usize> =
            self.swim_class_def.keys().map(|&code| (code, 0)).collect();
        for &code in &self.swim_class {
            *counts.entry(code).or_default() += 1;
        }
        counts
    }

    /// Number of time steps carrying a stroke event (non-zero phase).
    pub fn stroke_event_count(&self) -> usize {
        self.stroke_phase.iter().filter(|&&p| p != 0).count()
    }
}
