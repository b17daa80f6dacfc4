//! Delimited text reader (csv, tsv)
//!
//! Handy for sheets exported from a spreadsheet tool and for fixtures: the first record is
//! the header row, ragged records are accepted.

use crate::error::{ConvertError, Result};
use crate::source::TableSource;
use crate::table::Table;
use csv::ReaderBuilder;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

pub struct DelimitedSource {
    name: &'static str,
    delimiter: u8,
    extensions: &'static [&'static str],
}

impl DelimitedSource {
    /// Comma separated values
    pub fn csv() -> Self {
        DelimitedSource {
            name: "csv",
            delimiter: b',',
            extensions: &["csv"],
        }
    }

    /// Tab separated values
    pub fn tsv() -> Self {
        DelimitedSource {
            name: "tsv",
            delimiter: b'\t',
            extensions: &["tsv", "tab"],
        }
    }
}

impl TableSource for DelimitedSource {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Delimited text with a header row"
    }

    fn extensions(&self) -> &[&str] {
        self.extensions
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let delimited_error = |source| ConvertError::Delimited {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(delimited_error)?;

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record.map_err(delimited_error)?;
            records.push(record.iter().map(str::to_string).collect::<Vec<String>>());
        }

        let mut records = records.into_iter();
        let mut headers = records.next().ok_or_else(|| ConvertError::EmptySheet {
            path: path.to_path_buf(),
        })?;
        if let Some(first) = headers.first_mut() {
            if let Some(stripped) = first.strip_prefix(BYTE_ORDER_MARK) {
                *first = stripped.to_string();
            }
        }

        Ok(Table::new(headers, records.collect()))
    }
}
