//! In-memory tabular data
//!
//! Every reader produces a [`Table`]: trimmed header names plus rows of text cells. Cells
//! are already coerced to strings and empty cells are `""`, so the normalizers never deal
//! with spreadsheet value types.

/// A single sheet read fully into memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from a header row and data rows.
    ///
    /// Headers are trimmed. Rows shorter than the header row are padded with `""`, and rows
    /// whose cells are all blank are dropped.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();

        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        Table { headers, rows }
    }

    /// Header names, in column order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows, in sheet order
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cell lookup that tolerates ragged rows.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}
