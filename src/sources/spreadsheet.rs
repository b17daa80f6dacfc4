//! Workbook reader (xlsx, xlsm, xls, ods)
//!
//! Reads the first worksheet with calamine. The first non-empty row of the used range is
//! the header row; every other cell is rendered as text.

use crate::error::{ConvertError, Result};
use crate::source::TableSource;
use crate::table::Table;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Largest float rendered without a fractional part.
const MAX_INTEGRAL_FLOAT: f64 = 1e15;

pub struct SpreadsheetSource;

impl TableSource for SpreadsheetSource {
    fn name(&self) -> &str {
        "spreadsheet"
    }

    fn description(&self) -> &str {
        "Excel and OpenDocument workbooks (first sheet)"
    }

    fn extensions(&self) -> &[&str] {
        &["xlsx", "xlsm", "xlsb", "xls", "ods"]
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let spreadsheet_error = |source| ConvertError::Spreadsheet {
            path: path.to_path_buf(),
            source,
        };

        let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ConvertError::EmptySheet {
                path: path.to_path_buf(),
            })?
            .map_err(spreadsheet_error)?;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<String>>())
            .skip_while(|row| row.iter().all(|cell| cell.trim().is_empty()));

        let headers = rows.next().ok_or_else(|| ConvertError::EmptySheet {
            path: path.to_path_buf(),
        })?;

        Ok(Table::new(headers, rows.collect()))
    }
}

/// Render a cell the way it reads in the sheet.
///
/// Integral floats drop their `.0` so numeric ids such as `1` stay `"1"`; error cells read
/// as empty.
pub fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < MAX_INTEGRAL_FLOAT => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
