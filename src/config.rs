//! Configuration loader
//!
//! `defaults/govsheet.default.toml` is embedded into the binary and is always the bottom
//! layer. A user file (usually `./govsheet.toml`) adds header synonyms for sheets that name
//! their columns differently, or flips the output order; see [`Loader`] for the layering.
//!
//! The not-applicable tokens and bullet glyphs are not configurable; they live in
//! [`crate::text`].

use crate::columns::ColumnSpec;
use crate::convert::ConversionKind;
use crate::hierarchy::{column as hierarchy_column, ObjectiveOrder};
use crate::records::column as record_column;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/govsheet.default.toml");

/// Top-level configuration consumed by the conversions.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub hierarchy: HierarchySettings,
    pub tools: ToolSettings,
    pub objectives: ObjectiveSettings,
}

/// Activities sheet → objective hierarchy.
#[derive(Debug, Clone, Deserialize)]
pub struct HierarchySettings {
    pub order: ObjectiveOrder,
    pub columns: HierarchyColumnNames,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HierarchyColumnNames {
    pub objective_code: Vec<String>,
    pub objective_name: Vec<String>,
    pub practice_id: Vec<String>,
    pub practice_name: Vec<String>,
    pub activity: Vec<String>,
    pub capability: Vec<String>,
    pub tool: Vec<String>,
    pub justification: Vec<String>,
    pub observations: Vec<String>,
    pub integration: Vec<String>,
}

impl HierarchyColumnNames {
    pub fn specs(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::required(hierarchy_column::OBJECTIVE_CODE, &self.objective_code),
            ColumnSpec::required(hierarchy_column::OBJECTIVE_NAME, &self.objective_name),
            ColumnSpec::required(hierarchy_column::PRACTICE_ID, &self.practice_id),
            ColumnSpec::required(hierarchy_column::PRACTICE_NAME, &self.practice_name),
            ColumnSpec::required(hierarchy_column::ACTIVITY, &self.activity),
            ColumnSpec::optional(hierarchy_column::CAPABILITY, &self.capability),
            ColumnSpec::required(hierarchy_column::TOOL, &self.tool),
            ColumnSpec::required(hierarchy_column::JUSTIFICATION, &self.justification),
            ColumnSpec::required(hierarchy_column::OBSERVATIONS, &self.observations),
            ColumnSpec::required(hierarchy_column::INTEGRATION, &self.integration),
        ]
    }
}

/// Tools sheet → tool records.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolSettings {
    pub sort_by_id: bool,
    pub columns: ToolColumnNames,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolColumnNames {
    pub id: Vec<String>,
    pub tool_type: Vec<String>,
    pub category: Vec<String>,
    pub description: Vec<String>,
    pub use_cases: Vec<String>,
}

impl ToolColumnNames {
    pub fn specs(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::required(record_column::TOOL_ID, &self.id),
            ColumnSpec::required(record_column::TOOL_TYPE, &self.tool_type),
            ColumnSpec::required(record_column::CATEGORY, &self.category),
            ColumnSpec::required(record_column::DESCRIPTION, &self.description),
            ColumnSpec::required(record_column::USE_CASES, &self.use_cases),
        ]
    }
}

/// Objectives sheet → objective records.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveSettings {
    pub sort_by_id: bool,
    pub columns: ObjectiveColumnNames,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectiveColumnNames {
    pub id: Vec<String>,
    pub name: Vec<String>,
    pub description: Vec<String>,
    pub purpose: Vec<String>,
    pub tools: Vec<String>,
}

impl ObjectiveColumnNames {
    pub fn specs(&self) -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::required(record_column::OBJECTIVE_ID, &self.id),
            ColumnSpec::required(record_column::NAME, &self.name),
            ColumnSpec::required(record_column::DESCRIPTION, &self.description),
            ColumnSpec::required(record_column::PURPOSE, &self.purpose),
            ColumnSpec::required(record_column::TOOLS, &self.tools),
        ]
    }
}

/// File picked up from the working directory when no `--config` is given.
pub const LOCAL_CONFIG_FILE: &str = "govsheet.toml";

/// Builds [`Settings`] from layered sources, lowest precedence first:
///
/// 1. the embedded `govsheet.default.toml`
/// 2. a user file: `--config <file>` (must exist) or `./govsheet.toml` (if present)
/// 3. order overrides from `--sort-by-id` / `--keep-order`
///
/// A user file only needs the keys it changes; synonym lists it names replace the
/// default list for that column.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    /// Layer the user's file: `explicit` when given, else [`LOCAL_CONFIG_FILE`] if present.
    pub fn with_user_config(self, explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => self.with_file(path),
            None => self.with_optional_file(LOCAL_CONFIG_FILE),
        }
    }

    /// Force the output order of one conversion.
    ///
    /// For the activities sheet `sort_by_id` picks [`ObjectiveOrder::ById`] over
    /// [`ObjectiveOrder::Encounter`]; for the flat sheets it sets `sort_by_id`.
    pub fn with_sort_by_id(
        self,
        kind: ConversionKind,
        sort_by_id: bool,
    ) -> Result<Self, ConfigError> {
        match kind {
            ConversionKind::Activities => {
                let order = if sort_by_id { "by-id" } else { "encounter" };
                self.set_override("hierarchy.order", order)
            }
            ConversionKind::Tools => self.set_override("tools.sort_by_id", sort_by_id),
            ConversionKind::Objectives => self.set_override("objectives.sort_by_id", sort_by_id),
        }
    }

    /// Override a single dotted key, e.g. `tools.sort_by_id`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(file);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}
