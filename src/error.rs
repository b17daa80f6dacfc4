//! Error types for govsheet conversions
//!
//! Every failure aborts the whole conversion. Row-level problems (a flat record without an
//! id, an unparseable capability level) are not errors at all: the row is skipped or the
//! value is dropped, so they never show up here.

use std::fmt;
use std::path::PathBuf;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// A required column that no header matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumn {
    /// Canonical name of the column (e.g. `objective_code`)
    pub canonical: String,
    /// Synonyms that were tried, in order
    pub synonyms: Vec<String>,
}

impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.canonical, self.synonyms.join(" | "))
    }
}

/// Errors raised while reading, normalizing, or writing a conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// One or more required columns could not be resolved. All of them are listed.
    #[error("missing required columns: {}", join_missing(.missing))]
    MissingColumns { missing: Vec<MissingColumn> },

    /// No reader handles the input file's extension
    #[error("unsupported input file {}: no reader for extension '{extension}'", .path.display())]
    UnsupportedInput { path: PathBuf, extension: String },

    /// The input has no sheet or no header row
    #[error("input file {} has no header row", .path.display())]
    EmptySheet { path: PathBuf },

    /// IO error reading or writing a file
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Spreadsheet workbook could not be opened or read
    #[error("failed to read spreadsheet {}: {source}", .path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Delimited text file could not be parsed
    #[error("failed to read delimited file {}: {source}", .path.display())]
    Delimited {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON encoding failed
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ConvertError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Canonical names of the missing columns, when this is a `MissingColumns` error.
    pub fn missing_columns(&self) -> Vec<&str> {
        match self {
            ConvertError::MissingColumns { missing } => {
                missing.iter().map(|m| m.canonical.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn join_missing(missing: &[MissingColumn]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_lists_every_column() {
        let err = ConvertError::MissingColumns {
            missing: vec![
                MissingColumn {
                    canonical: "objective_code".to_string(),
                    synonyms: vec!["Codigo OGG".to_string(), "ID Objetivo".to_string()],
                },
                MissingColumn {
                    canonical: "tool".to_string(),
                    synonyms: vec!["Herramienta".to_string()],
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "missing required columns: objective_code [Codigo OGG | ID Objetivo], tool [Herramienta]"
        );
        assert_eq!(err.missing_columns(), vec!["objective_code", "tool"]);
    }

    #[test]
    fn other_errors_report_no_missing_columns() {
        let err = ConvertError::EmptySheet {
            path: PathBuf::from("empty.xlsx"),
        };
        assert!(err.missing_columns().is_empty());
        assert!(err.to_string().contains("empty.xlsx"));
    }
}
