use std::path::PathBuf;

use thiserror::Error;

use super::schema::SchemaMismatch;
use super::time::TimeFormat;

/// Everything that can abort a load. Row indices are zero-based sheet rows.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("cannot read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("workbook {0} contains no worksheets")]
    NoWorksheet(PathBuf),

    #[error("spreadsheet failed validation: {0}")]
    Schema(#[from] SchemaMismatch),

    #[error("row {row}: cannot parse time {raw:?} as quoted {format} clock time")]
    TimeParse {
        row: usize,
        raw: String,
        format: TimeFormat,
    },

    #[error(transparent)]
    DataQuality(#[from] DataQualityError),
}

/// Problems with the data region itself, found after the header passed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataQualityError {
    #[error("no data rows below the header block")]
    NoDataRows,

    #[error("channel {channel:?} has zero variance and cannot be normalized")]
    ZeroVariance { channel: String },

    #[error("row {row}, column {col}: required {field} cell is empty")]
    MissingCell {
        row: usize,
        col: usize,
        field: String,
    },

    #[error("row {row}, column {col}: {field} value {value:?} is not a number")]
    NotNumeric {
        row: usize,
        col: usize,
        field: String,
        value: String,
    },

    #[error("row {row}, column {col}: {field} code {value} is outside the defined codes")]
    OutOfDomain {
        row: usize,
        col: usize,
        field: String,
        value: String,
    },
}
