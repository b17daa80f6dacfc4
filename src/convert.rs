//! Conversion entry points
//!
//! Each conversion reads one sheet, resolves its columns once, normalizes every row, and
//! writes one JSON document:
//!
//! | conversion                 | input sheet   | output                               |
//! |----------------------------|---------------|--------------------------------------|
//! | [`convert_activities`]     | activities    | `[Objective]` (nested hierarchy)     |
//! | [`convert_tools`]          | tools         | `[ToolRecord]`                       |
//! | [`convert_objectives`]     | objectives    | `[ObjectiveRecord]`, optional id map |
//!
//! The `normalize_*` functions do the same work on an in-memory [`Table`] without touching
//! the filesystem.

use crate::columns::resolve_columns;
use crate::config::{HierarchySettings, ObjectiveSettings, Settings, ToolSettings};
use crate::error::Result;
use crate::hierarchy::{build_hierarchy, ActivityColumns, Objective};
use crate::output::{to_json, write_documents, write_json};
use crate::records::{
    extract_objectives, extract_tools, index_by_id, ObjectiveColumns, ObjectiveRecord,
    ToolColumns, ToolRecord,
};
use crate::registry::SourceRegistry;
use crate::table::Table;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Which conversion produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    Activities,
    Tools,
    Objectives,
}

impl ConversionKind {
    /// What the report's count counts
    pub fn counted(&self) -> &'static str {
        match self {
            ConversionKind::Activities => "objectives",
            ConversionKind::Tools => "tools",
            ConversionKind::Objectives => "objectives",
        }
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub kind: ConversionKind,
    pub output: PathBuf,
    /// Top-level entries written: objectives for the hierarchy, records otherwise
    pub count: usize,
    /// Where the id-keyed objectives document went, if requested
    pub by_id_output: Option<PathBuf>,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON written to {} ({} {})",
            self.output.display(),
            self.count,
            self.kind.counted()
        )?;
        if let Some(by_id) = &self.by_id_output {
            write!(f, "; by id: {}", by_id.display())?;
        }
        Ok(())
    }
}

/// Runs conversions with a given reader registry and settings.
pub struct Converter {
    registry: SourceRegistry,
    settings: Settings,
}

impl Converter {
    pub fn new(settings: Settings) -> Self {
        Converter {
            registry: SourceRegistry::with_defaults(),
            settings,
        }
    }

    /// Replace the reader registry
    pub fn with_registry(mut self, registry: SourceRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Activities sheet → nested objective hierarchy
    pub fn activities(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let table = self.registry.read(input)?;
        let objectives = normalize_activities(&table, &self.settings.hierarchy)?;
        write_json(output, &objectives)?;

        let practices: usize = objectives.iter().map(|o| o.practices.len()).sum();
        let activities: usize = objectives.iter().map(Objective::activity_count).sum();
        info!(
            input = %input.display(),
            output = %output.display(),
            objectives = objectives.len(),
            practices,
            activities,
            "activities converted"
        );

        Ok(ConversionReport {
            kind: ConversionKind::Activities,
            output: output.to_path_buf(),
            count: objectives.len(),
            by_id_output: None,
        })
    }

    /// Tools sheet → flat tool records
    pub fn tools(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        let table = self.registry.read(input)?;
        let tools = normalize_tools(&table, &self.settings.tools)?;
        write_json(output, &tools)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            rows = table.len(),
            tools = tools.len(),
            "tools converted"
        );

        Ok(ConversionReport {
            kind: ConversionKind::Tools,
            output: output.to_path_buf(),
            count: tools.len(),
            by_id_output: None,
        })
    }

    /// Objectives sheet → flat objective records, optionally also keyed by id
    ///
    /// Both documents are encoded and their directories created before either file is
    /// written.
    pub fn objectives(
        &self,
        input: &Path,
        output: &Path,
        by_id: Option<&Path>,
    ) -> Result<ConversionReport> {
        let table = self.registry.read(input)?;
        let objectives = normalize_objectives(&table, &self.settings.objectives)?;

        let mut documents = vec![(output, to_json(&objectives)?)];
        if let Some(by_id) = by_id {
            documents.push((by_id, to_json(&index_by_id(&objectives))?));
        }
        write_documents(&documents)?;

        info!(
            input = %input.display(),
            output = %output.display(),
            rows = table.len(),
            objectives = objectives.len(),
            by_id = by_id.is_some(),
            "objectives converted"
        );

        Ok(ConversionReport {
            kind: ConversionKind::Objectives,
            output: output.to_path_buf(),
            count: objectives.len(),
            by_id_output: by_id.map(Path::to_path_buf),
        })
    }
}

/// Build the objective hierarchy from an activities table.
pub fn normalize_activities(
    table: &Table,
    settings: &HierarchySettings,
) -> Result<Vec<Objective>> {
    let resolved = resolve_columns(table.headers(), &settings.columns.specs())?;
    let columns = ActivityColumns::from_resolved(&resolved)?;
    Ok(build_hierarchy(
        table.rows().iter().map(|row| columns.row(row)),
        settings.order,
    ))
}

/// Extract tool records from a tools table.
pub fn normalize_tools(table: &Table, settings: &ToolSettings) -> Result<Vec<ToolRecord>> {
    let resolved = resolve_columns(table.headers(), &settings.columns.specs())?;
    let columns = ToolColumns::from_resolved(&resolved)?;
    Ok(extract_tools(table.rows(), &columns, settings.sort_by_id))
}

/// Extract objective records from an objectives table.
pub fn normalize_objectives(
    table: &Table,
    settings: &ObjectiveSettings,
) -> Result<Vec<ObjectiveRecord>> {
    let resolved = resolve_columns(table.headers(), &settings.columns.specs())?;
    let columns = ObjectiveColumns::from_resolved(&resolved)?;
    Ok(extract_objectives(
        table.rows(),
        &columns,
        settings.sort_by_id,
    ))
}

/// Convert an activities sheet to the nested objective hierarchy.
pub fn convert_activities(
    input: &Path,
    output: &Path,
    settings: &Settings,
) -> Result<ConversionReport> {
    Converter::new(settings.clone()).activities(input, output)
}

/// Convert a tools sheet to tool records.
pub fn convert_tools(input: &Path, output: &Path, settings: &Settings) -> Result<ConversionReport> {
    Converter::new(settings.clone()).tools(input, output)
}

/// Convert an objectives sheet to objective records, optionally writing an id-keyed copy.
pub fn convert_objectives(
    input: &Path,
    output: &Path,
    by_id: Option<&Path>,
    settings: &Settings,
) -> Result<ConversionReport> {
    Converter::new(settings.clone()).objectives(input, output, by_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_defaults;
    use crate::source::TableSource;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn report_line_names_output_and_count() {
        let report = ConversionReport {
            kind: ConversionKind::Activities,
            output: PathBuf::from("data/actividades.json"),
            count: 3,
            by_id_output: None,
        };
        assert_eq!(
            report.to_string(),
            "JSON written to data/actividades.json (3 objectives)"
        );

        let report = ConversionReport {
            kind: ConversionKind::Objectives,
            output: PathBuf::from("out.json"),
            count: 1,
            by_id_output: Some(PathBuf::from("by_id.json")),
        };
        assert_eq!(
            report.to_string(),
            "JSON written to out.json (1 objectives); by id: by_id.json"
        );
    }

    #[test]
    fn activities_without_capability_column_have_null_levels() {
        let settings = load_defaults().unwrap();
        let table = table(
            &[
                "ID Objetivo",
                "Objetivo",
                "ID Practica",
                "Practica",
                "Actividad",
                "Herramienta",
                "Justificación Tecnica",
                "Observaciones",
                "Integracion con otra Herramienta",
            ],
            &[&["EDM01", "Governance", "EDM01.01", "Evaluate", "1. Review", "GLPI", "", "", ""]],
        );

        let objectives = normalize_activities(&table, &settings.hierarchy).unwrap();
        let activity = &objectives[0].practices[0].activities[0];
        assert_eq!(activity.id, "EDM01-P01-A01");
        assert_eq!(activity.capability_level, None);
        assert_eq!(activity.description, "Review");
    }

    #[test]
    fn converter_reads_through_its_registry() {
        struct FixedSource;

        impl TableSource for FixedSource {
            fn name(&self) -> &str {
                "fixed"
            }

            fn extensions(&self) -> &[&str] {
                &["fixed"]
            }

            fn read(&self, _path: &Path) -> Result<Table> {
                Ok(table(
                    &[
                        "ID (Nombre)",
                        "Tipo de herramienta",
                        "Categoría",
                        "Descripción",
                        "Casos de uso",
                    ],
                    &[&["GLPI", "Open source", "ITSM", "Inventario", "Tickets"]],
                ))
            }
        }

        let mut registry = SourceRegistry::new();
        registry.register(FixedSource);
        let converter = Converter::new(load_defaults().unwrap()).with_registry(registry);
        assert!(converter.settings().tools.sort_by_id);

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("herramientas.json");
        let report = converter.tools(Path::new("sheet.fixed"), &output).unwrap();
        assert_eq!(report.kind, ConversionKind::Tools);
        assert_eq!(report.count, 1);
        assert!(output.exists());

        let err = converter
            .tools(Path::new("sheet.csv"), &output)
            .expect_err("only the fixed source is registered");
        assert!(matches!(err, crate::error::ConvertError::UnsupportedInput { .. }));
    }

    #[test]
    fn missing_columns_abort_normalization() {
        let settings = load_defaults().unwrap();
        let table = table(&["ID (Nombre)", "Categoría"], &[]);

        let err = normalize_tools(&table, &settings.tools).unwrap_err();
        assert_eq!(
            err.missing_columns(),
            vec!["tool_type", "description", "use_cases"]
        );
    }
}
