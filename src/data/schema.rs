//! Header-block validation.
//!
//! Every recording starts with an 11-row legend block that names the subject
//! category and spells out the swim class and stroke phase codes. A file is
//! only trusted when that block matches [`HEADER_CHECKS`] cell for cell.

use std::fmt;
use std::path::Path;

use log::debug;
use thiserror::Error;

use super::error::LoadError;
use super::model::CellValue;
use super::sheet::{read_sheet, Sheet};

/// Rows 0..HEADER_ROWS hold the legend block; data starts right after.
pub const HEADER_ROWS: usize = 11;

/// How a header cell is compared against its expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// Exact text, whitespace included.
    Text(&'static str),
    /// A number equal to this integer (`1` and `1.0` both match).
    Integer(i64),
    /// A number, or text holding an integer, that equals this integer once
    /// truncated toward zero.
    TruncatedInteger(i64),
}

impl Expected {
    pub fn matches(&self, cell: &CellValue) -> bool {
        match *self {
            Expected::Text(text) => cell.as_str() == Some(text),
            Expected::Integer(n) => match cell {
                CellValue::Integer(i) => *i == n,
                CellValue::Float(f) => *f == n as f64,
                _ => false,
            },
            Expected::TruncatedInteger(n) => match cell {
                CellValue::Integer(i) => *i == n,
                CellValue::Float(f) => f.is_finite() && f.trunc() == n as f64,
                CellValue::String(s) => s.trim().parse::<i64>() == Ok(n),
                _ => false,
            },
        }
    }

    /// The cell value a conforming sheet stores for this check.
    pub fn to_cell(&self) -> CellValue {
        match *self {
            Expected::Text(text) => CellValue::String(text.to_string()),
            Expected::Integer(n) | Expected::TruncatedInteger(n) => CellValue::Integer(n),
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Text(text) => write!(f, "text {text:?}"),
            Expected::Integer(n) => write!(f, "number {n}"),
            Expected::TruncatedInteger(n) => write!(f, "integer {n}"),
        }
    }
}

/// One expected header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderCheck {
    pub row: usize,
    pub col: usize,
    pub expected: Expected,
}

const fn check(row: usize, col: usize, expected: Expected) -> HeaderCheck {
    HeaderCheck { row, col, expected }
}

/// The legend block, checked top to bottom. Note the trailing space in
/// "Turn event ": recordings carry it and it is part of the convention.
pub const HEADER_CHECKS: &[HeaderCheck] = &[
    check(0, 0, Expected::Text("Category")),
    check(0, 7, Expected::Text("Swimming Classification")),
    check(0, 9, Expected::Integer(1)),
    check(1, 9, Expected::Integer(2)),
    check(2, 9, Expected::Integer(3)),
    check(3, 9, Expected::Integer(4)),
    check(0, 10, Expected::Text("Not Swimming")),
    check(1, 10, Expected::Text("Swimming")),
    check(2, 10, Expected::Text("Push Off Event")),
    check(3, 10, Expected::Text("Turn event ")),
    check(0, 15, Expected::TruncatedInteger(1)),
    check(1, 15, Expected::TruncatedInteger(2)),
    check(2, 15, Expected::TruncatedInteger(3)),
    check(3, 15, Expected::TruncatedInteger(4)),
    check(4, 15, Expected::TruncatedInteger(5)),
    check(5, 15, Expected::TruncatedInteger(6)),
    check(6, 15, Expected::TruncatedInteger(7)),
    check(7, 15, Expected::TruncatedInteger(8)),
    check(0, 16, Expected::Text("R Hand Entry")),
    check(4, 16, Expected::Text("L Hand Entry")),
];

/// A header cell that did not hold its expected value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("header cell at row {row}, column {col}: expected {expected}, found {}", .actual.describe())]
pub struct SchemaMismatch {
    pub row: usize,
    pub col: usize,
    pub expected: Expected,
    pub actual: CellValue,
}

/// Run [`HEADER_CHECKS`] against the header block of `sheet`, stopping at the
/// first mismatch. Rows at or below [`HEADER_ROWS`] are never consulted.
pub fn validate_header(sheet: &Sheet) -> Result<(), SchemaMismatch> {
    validate_with(sheet, HEADER_CHECKS).map(|_| ())
}

/// Run an arbitrary check list against the header block. Returns how many
/// checks were evaluated; checks aimed below the block are skipped.
pub fn validate_with(sheet: &Sheet, checks: &[HeaderCheck]) -> Result<usize, SchemaMismatch> {
    let mut evaluated = 0;
    for c in checks.iter().filter(|c| c.row < HEADER_ROWS) {
        evaluated += 1;
        let actual = sheet.cell(c.row, c.col);
        if !c.expected.matches(actual) {
            return Err(SchemaMismatch {
                row: c.row,
                col: c.col,
                expected: c.expected,
                actual: actual.clone(),
            });
        }
    }
    debug!("header block passed {evaluated} checks");
    Ok(evaluated)
}

/// Read a file and validate its header block without loading any data.
pub fn validate_file(path: &Path) -> Result<(), LoadError> {
    let sheet = read_sheet(path)?;
    validate_header(&sheet)?;
    Ok(())
}

/// A header block that satisfies [`HEADER_CHECKS`], [`HEADER_ROWS`] rows tall.
pub fn legend_block() -> Sheet {
    let mut sheet = Sheet::default();
    for c in HEADER_CHECKS {
        sheet.set(c.row, c.col, c.expected.to_cell());
    }
    // pad to the full block height
    sheet.set(HEADER_ROWS - 1, 0, CellValue::Empty);
    sheet
}
