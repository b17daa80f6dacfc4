//! Source registry for reader discovery and selection
//!
//! This module provides a centralized registry for all available table sources.
//! Sources are registered once and selected by the extension of the input path.

use crate::error::{ConvertError, Result};
use crate::source::TableSource;
use crate::sources::{DelimitedSource, SpreadsheetSource};
use crate::table::Table;
use std::path::Path;
use tracing::debug;

/// Registry of table sources
///
/// # Examples
///
/// ```ignore
/// let registry = SourceRegistry::with_defaults();
/// let table = registry.read(Path::new("util/cobit2019.xlsx"))?;
/// ```
pub struct SourceRegistry {
    sources: Vec<Box<dyn TableSource>>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        SourceRegistry {
            sources: Vec::new(),
        }
    }

    /// Registry with the workbook and delimited-text readers
    pub fn with_defaults() -> Self {
        let mut registry = SourceRegistry::new();
        registry.register(SpreadsheetSource);
        registry.register(DelimitedSource::csv());
        registry.register(DelimitedSource::tsv());
        registry
    }

    /// Register a source
    ///
    /// If a source with the same name already exists, it will be replaced.
    pub fn register<S: TableSource + 'static>(&mut self, source: S) {
        self.sources.retain(|s| s.name() != source.name());
        self.sources.push(Box::new(source));
    }

    /// Get a source by name
    pub fn get(&self, name: &str) -> Option<&dyn TableSource> {
        self.sources
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Select the source handling the extension of `path`
    pub fn for_path(&self, path: &Path) -> Result<&dyn TableSource> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        self.sources
            .iter()
            .find(|s| s.extensions().contains(&extension.as_str()))
            .map(|s| s.as_ref())
            .ok_or_else(|| ConvertError::UnsupportedInput {
                path: path.to_path_buf(),
                extension,
            })
    }

    /// Read `path` with the matching source
    pub fn read(&self, path: &Path) -> Result<Table> {
        let source = self.for_path(path)?;
        debug!(source = source.name(), path = %path.display(), "reading table");
        source.read(path)
    }

    /// List all available source names (sorted)
    pub fn list_sources(&self) -> Vec<String> {
        let mut names: Vec<_> = self.sources.iter().map(|s| s.name().to_string()).collect();
        names.sort();
        names
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
