//! # govsheet
//!
//! Normalizes the spreadsheets describing a governance framework (objectives, practices,
//! activities, and the tools that support them) into the JSON documents read by the graph
//! UI.
//!
//! Three sheets are supported:
//!
//! - the activities sheet, folded into an objective → practice → activity hierarchy
//!   ([`hierarchy`])
//! - the tools sheet and the objectives sheet, one record per row ([`records`])
//!
//! The pipeline is the same for all of them: read a table ([`registry`]), resolve the
//! columns by synonym ([`columns`]), clean every field ([`text`]), write JSON ([`output`]).
//! [`convert`] ties the steps together.

pub mod columns;
pub mod config;
pub mod convert;
pub mod error;
pub mod hierarchy;
pub mod output;
pub mod records;
pub mod registry;
pub mod source;
pub mod sources;
pub mod table;
pub mod text;

pub use config::{load_defaults, Loader, Settings};
pub use convert::{
    convert_activities, convert_objectives, convert_tools, ConversionKind, ConversionReport,
    Converter,
};
pub use error::{ConvertError, MissingColumn, Result};
pub use hierarchy::{Activity, Objective, ObjectiveOrder, Practice};
pub use records::{ObjectiveRecord, ToolRecord};
pub use table::Table;
