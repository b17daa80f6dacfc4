//! Flat record extraction (tools sheet, objectives sheet)
//!
//! Unlike the activities sheet these map one row to one record. Rows without an id are
//! skipped; list-valued cells are split with [`split_list`], using the style each sheet
//! has always used: tool use-cases keep duplicates, objective tool lists drop them.

use crate::columns::ResolvedColumns;
use crate::error::Result;
use crate::table::cell;
use crate::text::{clean, split_list, ListStyle, SENTINEL};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Canonical column names used by the flat sheets.
pub mod column {
    pub const TOOL_ID: &str = "tool_id";
    pub const TOOL_TYPE: &str = "tool_type";
    pub const CATEGORY: &str = "category";
    pub const DESCRIPTION: &str = "description";
    pub const USE_CASES: &str = "use_cases";

    pub const OBJECTIVE_ID: &str = "objective_id";
    pub const NAME: &str = "name";
    pub const PURPOSE: &str = "purpose";
    pub const TOOLS: &str = "tools";
}

/// `tipo` tag of tool records
pub const TOOL_KIND: &str = "herramienta";
/// `tipo` tag of objective records
pub const OBJECTIVE_KIND: &str = "objetivo";

/// A tool, as the graph UI expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub id: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "casos_uso")]
    pub use_cases: Vec<String>,
    #[serde(rename = "tipo_herramienta")]
    pub tool_type: String,
}

/// An objective with the tools that support it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveRecord {
    pub id: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "proposito")]
    pub purpose: String,
    #[serde(rename = "herramientas")]
    pub tools: Vec<String>,
}

/// Records that can be ordered by identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for ToolRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for ObjectiveRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Stable sort by case-insensitive id.
pub fn sort_by_id<R: Identified>(records: &mut [R]) {
    records.sort_by_cached_key(|r| r.id().to_lowercase());
}

/// Re-key objective records by id.
///
/// Keeps the order of `records`; a repeated id keeps its first position and takes the
/// later record.
pub fn index_by_id(records: &[ObjectiveRecord]) -> IndexMap<String, ObjectiveRecord> {
    records
        .iter()
        .map(|record| (record.id.clone(), record.clone()))
        .collect()
}

/// Column positions for the tools sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolColumns {
    id: usize,
    tool_type: usize,
    category: usize,
    description: usize,
    use_cases: usize,
}

impl ToolColumns {
    pub fn from_resolved(resolved: &ResolvedColumns) -> Result<Self> {
        Ok(ToolColumns {
            id: resolved.require(column::TOOL_ID)?,
            tool_type: resolved.require(column::TOOL_TYPE)?,
            category: resolved.require(column::CATEGORY)?,
            description: resolved.require(column::DESCRIPTION)?,
            use_cases: resolved.require(column::USE_CASES)?,
        })
    }

    /// Build the record for one row; `None` when the row has no id.
    pub fn record(&self, row: &[String]) -> Option<ToolRecord> {
        let id = cell(row, self.id).trim();
        if id.is_empty() {
            return None;
        }

        Some(ToolRecord {
            id: id.to_string(),
            kind: TOOL_KIND.to_string(),
            category: clean(Some(cell(row, self.category))),
            description: clean(Some(cell(row, self.description))),
            use_cases: split_list(cell(row, self.use_cases), ListStyle::UseCases),
            tool_type: clean(Some(cell(row, self.tool_type))),
        })
    }
}

/// Column positions for the objectives sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveColumns {
    id: usize,
    name: usize,
    description: usize,
    purpose: usize,
    tools: usize,
}

impl ObjectiveColumns {
    pub fn from_resolved(resolved: &ResolvedColumns) -> Result<Self> {
        Ok(ObjectiveColumns {
            id: resolved.require(column::OBJECTIVE_ID)?,
            name: resolved.require(column::NAME)?,
            description: resolved.require(column::DESCRIPTION)?,
            purpose: resolved.require(column::PURPOSE)?,
            tools: resolved.require(column::TOOLS)?,
        })
    }

    /// Build the record for one row; `None` when the row has no id.
    pub fn record(&self, row: &[String]) -> Option<ObjectiveRecord> {
        let id = cell(row, self.id).trim();
        if id.is_empty() {
            return None;
        }

        let name = cell(row, self.name).trim();
        Some(ObjectiveRecord {
            id: id.to_string(),
            kind: OBJECTIVE_KIND.to_string(),
            name: if name.is_empty() { SENTINEL } else { name }.to_string(),
            description: clean(Some(cell(row, self.description))),
            purpose: clean(Some(cell(row, self.purpose))),
            tools: split_list(cell(row, self.tools), ListStyle::ToolRefs),
        })
    }
}

/// Extract tool records from sheet rows.
pub fn extract_tools<'a, I>(rows: I, columns: &ToolColumns, sort: bool) -> Vec<ToolRecord>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut records = extract(rows, |row| columns.record(row));
    if sort {
        sort_by_id(&mut records);
    }
    records
}

/// Extract objective records from sheet rows.
pub fn extract_objectives<'a, I>(
    rows: I,
    columns: &ObjectiveColumns,
    sort: bool,
) -> Vec<ObjectiveRecord>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut records = extract(rows, |row| columns.record(row));
    if sort {
        sort_by_id(&mut records);
    }
    records
}

fn extract<'a, I, R, F>(rows: I, build: F) -> Vec<R>
where
    I: IntoIterator<Item = &'a Vec<String>>,
    F: Fn(&[String]) -> Option<R>,
{
    let mut records = Vec::new();
    for (index, row) in rows.into_iter().enumerate() {
        match build(row.as_slice()) {
            Some(record) => records.push(record),
            None => debug!(row = index, "skipping row without id"),
        }
    }
    records
}
