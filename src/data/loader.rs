use std::ops::{Range, RangeInclusive};
use std::path::Path;

use chrono::NaiveTime;
use log::{debug, info, warn};
use ndarray::Array2;

use super::error::{DataQualityError, LoadError};
use super::model::{
    definition_map, CellValue, TimeSeries, GYRO_COLS, STROKE_PHASE_DEF, SWIM_CLASS_DEF,
};
use super::normalize::zscore_columns;
use super::schema::{validate_header, HEADER_ROWS};
use super::sheet::{read_sheet, Sheet};
use super::time::{seconds_between, TimeFormat};
use crate::config::LoaderConfig;

// ---------------------------------------------------------------------------
// Data region layout
// ---------------------------------------------------------------------------

/// Quoted clock time of the sample.
pub const TIME_COL: usize = 0;
/// Subject category; only the first data row is read.
pub const SUBJECT_COL: usize = 1;
/// Sheet columns of the channels in [`GYRO_COLS`], in the same order.
/// Column 9 sits between the wrist and back sensors and is not a channel.
pub const CHANNEL_COLS: [usize; 12] = [2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 13, 14];
pub const SWIM_CLASS_COL: usize = 16;
pub const STROKE_PHASE_COL: usize = 17;

const SWIM_CLASS_CODES: RangeInclusive<u8> = 1..=4;
const STROKE_PHASE_CODES: RangeInclusive<u8> = 0..=8;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a recording from a spreadsheet file.
///
/// The header block is validated first; any failure (header, time, cell
/// content, normalization) aborts the load and nothing is returned.
pub fn load_series(path: &Path, config: &LoaderConfig) -> Result<TimeSeries, LoadError> {
    let sheet = read_sheet(path)?;
    let series = load_sheet(&sheet, config)?;
    info!(
        "loaded {}: {} samples over {:.2} s, subject category {:?}",
        path.display(),
        series.len(),
        series.duration(),
        series.subject_cat
    );
    Ok(series)
}

/// Build a [`TimeSeries`] from an already-read sheet.
pub fn load_sheet(sheet: &Sheet, config: &LoaderConfig) -> Result<TimeSeries, LoadError> {
    validate_header(sheet)?;

    let rows = data_rows(sheet);
    if rows.is_empty() {
        return Err(DataQualityError::NoDataRows.into());
    }
    debug!("data region: sheet rows {}..{}", rows.start, rows.end);

    let true_time = parse_times(sheet, rows.clone(), config.time_format)?;
    let elapsed_time = elapsed_seconds(&true_time);
    let sensor_vals = read_channels(sheet, rows.clone())?;
    let swim_class = read_codes(
        sheet,
        rows.clone(),
        SWIM_CLASS_COL,
        "swim class",
        SWIM_CLASS_CODES,
        None,
    )?;
    let stroke_phase = read_codes(
        sheet,
        rows,
        STROKE_PHASE_COL,
        "stroke phase",
        STROKE_PHASE_CODES,
        Some(0),
    )?;
    let subject_cat = read_subject(sheet)?;

    let cols: Vec<String> = GYRO_COLS.iter().map(|c| c.to_string()).collect();
    let sensor_vals_normed = zscore_columns(&sensor_vals, &cols, config.zero_variance)?;

    Ok(TimeSeries {
        true_time,
        elapsed_time,
        cols,
        sensor_vals,
        sensor_vals_normed,
        swim_class,
        swim_class_def: definition_map(&SWIM_CLASS_DEF),
        stroke_phase,
        stroke_phase_def: definition_map(&STROKE_PHASE_DEF),
        subject_cat,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rows from the end of the header block to the last row holding anything
/// in a column the loader reads. Blank rows trailing the recording are not
/// samples.
fn data_rows(sheet: &Sheet) -> Range<usize> {
    let used = |row: usize| {
        [TIME_COL, SUBJECT_COL, SWIM_CLASS_COL, STROKE_PHASE_COL]
            .iter()
            .chain(CHANNEL_COLS.iter())
            .any(|&col| !sheet.cell(row, col).is_empty())
    };
    let end = (HEADER_ROWS..sheet.height())
        .rev()
        .find(|&row| used(row))
        .map_or(HEADER_ROWS, |row| row + 1);
    HEADER_ROWS..end
}

fn parse_times(
    sheet: &Sheet,
    rows: Range<usize>,
    format: TimeFormat,
) -> Result<Vec<NaiveTime>, LoadError> {
    rows.map(|row| {
        let cell = sheet.cell(row, TIME_COL);
        cell.as_str()
            .and_then(|raw| format.parse(raw))
            .ok_or_else(|| LoadError::TimeParse {
                row,
                raw: cell.to_string(),
                format,
            })
    })
    .collect()
}

/// Seconds since the first sample. The clock has no date, so a recording
/// that runs across noon (12-hour) or midnight goes backwards; that is
/// logged rather than corrected.
fn elapsed_seconds(times: &[NaiveTime]) -> Vec<f64> {
    let Some(&start) = times.first() else {
        return Vec::new();
    };
    let elapsed: Vec<f64> = times.iter().map(|&t| seconds_between(start, t)).collect();
    if let Some(i) = elapsed.windows(2).position(|w| w[1] < w[0]) {
        warn!(
            "elapsed time decreases at sample {} ({:.3} s -> {:.3} s); \
             the recording may cross a clock boundary",
            i + 1,
            elapsed[i],
            elapsed[i + 1]
        );
    }
    elapsed
}

fn read_channels(sheet: &Sheet, rows: Range<usize>) -> Result<Array2<f64>, DataQualityError> {
    let mut vals = Array2::<f64>::zeros((rows.len(), CHANNEL_COLS.len()));
    for (t, row) in rows.enumerate() {
        for (c, (&col, &name)) in CHANNEL_COLS.iter().zip(GYRO_COLS.iter()).enumerate() {
            let cell = sheet.cell(row, col);
            vals[[t, c]] = match cell {
                CellValue::Empty => {
                    return Err(DataQualityError::MissingCell {
                        row,
                        col,
                        field: name.to_string(),
                    })
                }
                // NaN and infinities are rejected by as_f64 as well
                _ => cell.as_f64().ok_or_else(|| DataQualityError::NotNumeric {
                    row,
                    col,
                    field: name.to_string(),
                    value: cell.to_string(),
                })?,
            };
        }
    }
    Ok(vals)
}

/// Read a label column. Codes must be whole numbers inside `codes`; an
/// empty cell becomes `if_empty`, or is an error when that is `None`.
fn read_codes(
    sheet: &Sheet,
    rows: Range<usize>,
    col: usize,
    field: &str,
    codes: RangeInclusive<u8>,
    if_empty: Option<u8>,
) -> Result<Vec<u8>, DataQualityError> {
    rows.map(|row| {
        let cell = sheet.cell(row, col);
        if cell.is_empty() {
            return if_empty.ok_or_else(|| DataQualityError::MissingCell {
                row,
                col,
                field: field.to_string(),
            });
        }
        let value = cell.as_f64().ok_or_else(|| DataQualityError::NotNumeric {
            row,
            col,
            field: field.to_string(),
            value: cell.to_string(),
        })?;
        let in_domain = value.fract() == 0.0
            && value >= f64::from(*codes.start())
            && value <= f64::from(*codes.end());
        if !in_domain {
            return Err(DataQualityError::OutOfDomain {
                row,
                col,
                field: field.to_string(),
                value: cell.to_string(),
            });
        }
        Ok(value as u8)
    })
    .collect()
}

fn read_subject(sheet: &Sheet) -> Result<String, DataQualityError> {
    let cell = sheet.cell(HEADER_ROWS, SUBJECT_COL);
    if cell.is_empty() {
        return Err(DataQualityError::MissingCell {
            row: HEADER_ROWS,
            col: SUBJECT_COL,
            field: "subject category".to_string(),
        });
    }
    Ok(cell.to_string().trim().to_string())
}
