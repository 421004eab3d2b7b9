/// Data layer: sheet reading, header validation, series loading.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  sheet    │  first worksheet → Sheet (typed cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  11-row legend block checked cell by cell
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  time axis, channels, labels
///   └──────────┘      │
///        │            └─ normalize: per-channel z-score
///        ▼
///   ┌────────────┐
///   │ TimeSeries │  (T, 12) matrices + label sequences
///   └────────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod schema;
pub mod sheet;
pub mod time;

pub use error::{DataQualityError, LoadError};
pub use loader::{load_series, load_sheet};
pub use model::{CellValue, TimeSeries, GYRO_COLS, STROKE_PHASE_DEF, SWIM_CLASS_DEF};
pub use normalize::ZeroVariancePolicy;
pub use schema::{validate_file, validate_header, SchemaMismatch};
pub use sheet::{read_sheet, Sheet};
pub use time::TimeFormat;
