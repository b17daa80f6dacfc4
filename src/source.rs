//! Table source trait definition
//!
//! A table source reads one file into a [`Table`]. Sources are picked by file extension
//! through the [`SourceRegistry`](crate::registry::SourceRegistry), so conversions never
//! care whether the data came from a workbook or a delimited text export.

use crate::error::Result;
use crate::table::Table;
use std::path::Path;

/// Trait for tabular file readers
///
/// Implementors return the first sheet of the file with every cell coerced to text and
/// empty cells as `""`.
///
/// # Examples
///
/// ```ignore
/// struct FixedSource;
///
/// impl TableSource for FixedSource {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["fixed"]
///     }
///
///     fn read(&self, _path: &Path) -> Result<Table> {
///         Ok(Table::new(vec!["Objetivo".into()], vec![]))
///     }
/// }
/// ```
pub trait TableSource: Send + Sync {
    /// The name of this source (e.g., "spreadsheet", "csv")
    fn name(&self) -> &str;

    /// Optional description of this source
    fn description(&self) -> &str {
        ""
    }

    /// File extensions (lowercase, without the dot) handled by this source
    fn extensions(&self) -> &[&str];

    /// Read the file at `path` into a table
    fn read(&self, path: &Path) -> Result<Table>;
}
