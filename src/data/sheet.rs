use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::debug;

use super::error::LoadError;
use super::model::CellValue;

static EMPTY_CELL: CellValue = CellValue::Empty;

// ---------------------------------------------------------------------------
// Sheet – a rectangular window of typed cells
// ---------------------------------------------------------------------------

/// The first worksheet of a file as a grid of typed cells.
///
/// Positions are absolute: `(0, 0)` is cell A1 even when the sheet's used
/// range starts further down or right. Cells outside the stored grid read as
/// [`CellValue::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Sheet { rows }
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Set a cell, growing the grid with empty cells as needed.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    /// Append a row below the current last row.
    pub fn push_row(&mut self, cells: Vec<CellValue>) {
        self.rows.push(cells);
    }

    /// Number of rows, counting leading blank rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Write the grid as CSV with no header line, padding every record to
    /// the sheet width.
    pub fn write_csv(&self, path: &Path) -> csv::Result<()> {
        let width = self.width().max(1);
        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
        for row in &self.rows {
            let record: Vec<String> = (0..width)
                .map(|col| row.get(col).map(|c| c.to_string()).unwrap_or_default())
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the first worksheet of a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – via calamine
/// * `.csv` – no header line, cells typed by their content
///
/// The file is fully read and closed before this returns.
pub fn read_sheet(path: &Path) -> Result<Sheet, LoadError> {
    std::fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let sheet = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        "csv" => read_csv(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    debug!(
        "read {} ({} rows x {} columns)",
        path.display(),
        sheet.height(),
        sheet.width()
    );
    Ok(sheet)
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

fn read_workbook(path: &Path) -> Result<Sheet, LoadError> {
    let workbook_err = |source| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet(path.to_path_buf()))?
        .map_err(workbook_err)?;

    let mut sheet = Sheet::default();
    let (row0, col0) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Ok(sheet),
    };
    for (row, col, cell) in range.cells() {
        let value = cell_from_data(cell);
        if !value.is_empty() {
            sheet.set(row0 + row, col0 + col, value);
        }
    }
    Ok(sheet)
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Sheet, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut sheet = Sheet::default();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        sheet.push_row(record.iter().map(guess_cell_type).collect());
    }
    Ok(sheet)
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    // "NaN" and "inf" stay text; only finite values are numbers
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_cells_are_empty() {
        let sheet = Sheet::from_rows(vec![vec![CellValue::Integer(1)]]);
        assert_eq!(sheet.cell(0, 0), &CellValue::Integer(1));
        assert_eq!(sheet.cell(0, 5), &CellValue::Empty);
        assert_eq!(sheet.cell(40, 0), &CellValue::Empty);
    }

    #[test]
    fn set_grows_the_grid() {
        let mut sheet = Sheet::default();
        sheet.set(2, 3, CellValue::String("x".into()));
        assert_eq!(sheet.height(), 3);
        assert_eq!(sheet.width(), 4);
        assert_eq!(sheet.cell(2, 3).as_str(), Some("x"));
        assert!(sheet.cell(2, 0).is_empty());
    }

    #[test]
    fn csv_cells_are_typed_by_content() {
        assert_eq!(guess_cell_type(""), CellValue::Empty);
        assert_eq!(guess_cell_type("4"), CellValue::Integer(4));
        assert_eq!(guess_cell_type("-0.25"), CellValue::Float(-0.25));
        assert_eq!(
            guess_cell_type("'10:00:00.000000'"),
            CellValue::String("'10:00:00.000000'".into())
        );
        assert_eq!(guess_cell_type("NaN"), CellValue::String("NaN".into()));
        assert_eq!(guess_cell_type("inf"), CellValue::String("inf".into()));
        assert_eq!(
            guess_cell_type("Turn event "),
            CellValue::String("Turn event ".into())
        );
    }

    #[test]
    fn workbook_cells_map_to_cell_values() {
        assert_eq!(cell_from_data(&Data::Int(3)), CellValue::Integer(3));
        assert_eq!(cell_from_data(&Data::Float(1.5)), CellValue::Float(1.5));
        assert_eq!(cell_from_data(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(
            cell_from_data(&Data::String("Category".into())),
            CellValue::String("Category".into())
        );
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn csv_round_trip_keeps_positions_and_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");

        let mut sheet = Sheet::default();
        sheet.set(0, 0, CellValue::String("Category".into()));
        sheet.set(1, 4, CellValue::String("Turn event ".into()));
        sheet.set(3, 2, CellValue::Float(0.125));
        sheet.write_csv(&path).unwrap();

        let back = read_sheet(&path).unwrap();
        assert_eq!(back.height(), 4);
        assert_eq!(back.cell(0, 0).as_str(), Some("Category"));
        assert_eq!(back.cell(1, 4).as_str(), Some("Turn event "));
        assert_eq!(back.cell(3, 2), &CellValue::Float(0.125));
        assert!(back.cell(2, 0).is_empty());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.txt");
        std::fs::write(&path, "Category").unwrap();
        assert!(matches!(
            read_sheet(&path),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.xlsx");
        assert!(matches!(read_sheet(&path), Err(LoadError::Io { .. })));
    }
}
