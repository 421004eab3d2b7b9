//! Workbook reading through calamine.
//!
//! Each test writes a real `.xlsx` file with `rust_xlsxwriter` into a
//! [`tempfile::TempDir`] and reads it back through the public entry points.

use std::path::PathBuf;

use rust_xlsxwriter::Workbook;
use swim_series::data::loader::{
    CHANNEL_COLS, STROKE_PHASE_COL, SUBJECT_COL, SWIM_CLASS_COL, TIME_COL,
};
use swim_series::data::schema::{legend_block, Expected, HEADER_ROWS};
use swim_series::data::{
    load_series, read_sheet, validate_file, CellValue, LoadError, Sheet, GYRO_COLS,
};
use swim_series::LoaderConfig;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn text(s: &str) -> CellValue {
    CellValue::String(s.to_string())
}

/// Write every non-empty cell of `sheet` at the same position of the first
/// worksheet. Integers are stored as numbers, as spreadsheet tools do.
fn write_xlsx(dir: &TempDir, name: &str, sheet: &Sheet) -> PathBuf {
    let path = dir.path().join(name);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, cells) in sheet.rows().iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            let (row, col) = (r as u32, c as u16);
            match cell {
                CellValue::String(s) => worksheet.write_string(row, col, s.as_str()),
                CellValue::Integer(i) => worksheet.write_number(row, col, *i as f64),
                CellValue::Float(v) => worksheet.write_number(row, col, *v),
                CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
                CellValue::Empty => continue,
            }
            .expect("cell must be writable");
        }
    }
    workbook.save(&path).expect("workbook must be writable");
    path
}

/// A valid session of `n` samples, 50 ms apart from 11:02:00.
fn session(n: usize) -> Sheet {
    let mut sheet = legend_block();
    sheet.set(HEADER_ROWS, SUBJECT_COL, text("Elite"));
    for i in 0..n {
        let row = HEADER_ROWS + i;
        let millis = i * 50;
        sheet.set(
            row,
            TIME_COL,
            text(&format!(
                "'11:02:{:02}.{:06}'",
                millis / 1000,
                (millis % 1000) * 1000
            )),
        );
        for (c, &col) in CHANNEL_COLS.iter().enumerate() {
            sheet.set(row, col, CellValue::Float((i + c) as f64 * 0.75 - 3.0));
        }
        sheet.set(row, SWIM_CLASS_COL, CellValue::Integer(2));
        if i % 3 == 0 {
            sheet.set(row, STROKE_PHASE_COL, CellValue::Integer(5));
        }
    }
    sheet
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn valid_workbook_loads() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(&dir, "session.xlsx", &session(12));

    let series = load_series(&path, &LoaderConfig::default()).unwrap();
    assert_eq!(series.len(), 12);
    assert_eq!(series.sensor_vals.dim(), (12, 12));
    assert_eq!(series.subject_cat, "Elite");
    assert_eq!(series.elapsed_time[0], 0.0);
    assert!((series.duration() - 0.55).abs() < 1e-9);
    assert_eq!(series.swim_class, vec![2; 12]);
    assert_eq!(
        series.stroke_phase,
        vec![5, 0, 0, 5, 0, 0, 5, 0, 0, 5, 0, 0]
    );
    let wrist = series.channel(GYRO_COLS[0]).unwrap();
    assert_eq!(wrist[1], -2.25);
}

#[test]
fn trailing_space_in_legend_text_survives_the_workbook() {
    let dir = TempDir::new().unwrap();
    let path = write_xlsx(&dir, "session.xlsx", &session(4));

    let sheet = read_sheet(&path).unwrap();
    assert_eq!(sheet.cell(3, 10).as_str(), Some("Turn event "));
    assert!(validate_file(&path).is_ok());
}

// ---------------------------------------------------------------------------
// Used range not starting at A1
// ---------------------------------------------------------------------------

#[test]
fn positions_stay_absolute_when_a1_is_empty() {
    let dir = TempDir::new().unwrap();
    let mut sheet = session(4);
    sheet.set(0, 0, CellValue::Empty);
    let path = write_xlsx(&dir, "no_a1.xlsx", &sheet);

    let back = read_sheet(&path).unwrap();
    assert!(back.cell(0, 0).is_empty());
    assert_eq!(back.cell(0, 7).as_str(), Some("Swimming Classification"));
    assert_eq!(back.cell(HEADER_ROWS, SUBJECT_COL).as_str(), Some("Elite"));

    let err = load_series(&path, &LoaderConfig::default()).unwrap_err();
    match err {
        LoadError::Schema(mismatch) => {
            assert_eq!((mismatch.row, mismatch.col), (0, 0));
            assert_eq!(mismatch.expected, Expected::Text("Category"));
            assert_eq!(mismatch.actual, CellValue::Empty);
        }
        other => panic!("expected a schema mismatch, got {other:?}"),
    }
}

#[test]
fn range_starting_below_and_right_of_a1_is_offset() {
    let dir = TempDir::new().unwrap();
    let mut sheet = Sheet::default();
    sheet.set(2, 2, text("first"));
    sheet.set(4, 5, CellValue::Float(1.5));
    let path = write_xlsx(&dir, "offset.xlsx", &sheet);

    let back = read_sheet(&path).unwrap();
    assert_eq!(back.cell(2, 2).as_str(), Some("first"));
    assert_eq!(back.cell(4, 5), &CellValue::Float(1.5));
    assert!(back.cell(0, 0).is_empty());
    assert_eq!(back.height(), 5);
    assert_eq!(back.width(), 6);
}
