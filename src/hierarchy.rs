//! Objective → practice → activity hierarchy
//!
//! The activities sheet has one row per activity, repeating the objective and practice it
//! belongs to. [`build_hierarchy`] folds those rows back into the nested structure the
//! graph UI reads.
//!
//! # The Algorithm
//!
//! 1. Group rows by the exact (objective code, objective name) pair, in first-encounter
//!    order.
//! 2. Inside each objective, group by the exact (practice id, practice name) pair, again in
//!    first-encounter order, numbering the distinct practices from 1.
//! 3. A practice id is `<objective>-P<NN>`: NN is the last digit run of the raw practice
//!    id, or the practice's sequential number when the raw id has no digits. Ids are meant
//!    to be unique within the objective; a repeated one is kept and logged as a warning.
//! 4. Activities are numbered from 1 in row order: `<practice>-A<NN>`. Numbering typed into
//!    the description is ignored (and stripped).
//! 5. Text fields are cleaned with the helpers in [`crate::text`].
//!
//! Grouping uses insertion-ordered maps, never a sort, so output order follows the sheet
//! unless [`ObjectiveOrder::ById`] is requested.

use crate::columns::ResolvedColumns;
use crate::error::Result;
use crate::table::cell;
use crate::text::{clean, last_digit_run, parse_capability, strip_enumeration, SENTINEL};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Canonical column names used by the activities sheet.
pub mod column {
    pub const OBJECTIVE_CODE: &str = "objective_code";
    pub const OBJECTIVE_NAME: &str = "objective_name";
    pub const PRACTICE_ID: &str = "practice_id";
    pub const PRACTICE_NAME: &str = "practice_name";
    pub const ACTIVITY: &str = "activity";
    pub const CAPABILITY: &str = "capability";
    pub const TOOL: &str = "tool";
    pub const JUSTIFICATION: &str = "justification";
    pub const OBSERVATIONS: &str = "observations";
    pub const INTEGRATION: &str = "integration";
}

/// Top-level governance objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "practicas")]
    pub practices: Vec<Practice>,
}

/// A practice under an objective, id `<objective>-P<NN>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practice {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "actividades")]
    pub activities: Vec<Activity>,
}

/// A leaf task under a practice, id `<practice>-A<NN>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    /// `null` in JSON when the sheet has no usable level
    #[serde(rename = "nivel_capacidad")]
    pub capability_level: Option<u8>,
    #[serde(rename = "herramienta")]
    pub tool: String,
    #[serde(rename = "justificacion")]
    pub justification: String,
    #[serde(rename = "observaciones")]
    pub observations: String,
    #[serde(rename = "integracion")]
    pub integration: String,
}

impl Objective {
    pub fn activity_count(&self) -> usize {
        self.practices.iter().map(|p| p.activities.len()).sum()
    }

    /// Practice ids that more than one practice of this objective received, each listed once.
    ///
    /// Ids come straight from the sheet's numbering, so two practices ending in the same
    /// digits (or an unnumbered practice whose position matches a numbered one) collide.
    pub fn duplicate_practice_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for practice in &self.practices {
            let id = practice.id.as_str();
            if !seen.insert(id) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }
}

/// Order of objectives in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveOrder {
    /// First appearance in the sheet
    #[default]
    Encounter,
    /// By objective id, then name
    ById,
}

/// One sheet row, borrowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityRow<'a> {
    pub objective_code: &'a str,
    pub objective_name: &'a str,
    pub practice_id: &'a str,
    pub practice_name: &'a str,
    pub description: &'a str,
    /// `None` when the sheet has no capability column
    pub capability: Option<&'a str>,
    pub tool: &'a str,
    pub justification: &'a str,
    pub observations: &'a str,
    pub integration: &'a str,
}

/// Column positions for [`ActivityRow`], looked up once per sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityColumns {
    objective_code: usize,
    objective_name: usize,
    practice_id: usize,
    practice_name: usize,
    description: usize,
    capability: Option<usize>,
    tool: usize,
    justification: usize,
    observations: usize,
    integration: usize,
}

impl ActivityColumns {
    pub fn from_resolved(resolved: &ResolvedColumns) -> Result<Self> {
        Ok(ActivityColumns {
            objective_code: resolved.require(column::OBJECTIVE_CODE)?,
            objective_name: resolved.require(column::OBJECTIVE_NAME)?,
            practice_id: resolved.require(column::PRACTICE_ID)?,
            practice_name: resolved.require(column::PRACTICE_NAME)?,
            description: resolved.require(column::ACTIVITY)?,
            capability: resolved.index(column::CAPABILITY),
            tool: resolved.require(column::TOOL)?,
            justification: resolved.require(column::JUSTIFICATION)?,
            observations: resolved.require(column::OBSERVATIONS)?,
            integration: resolved.require(column::INTEGRATION)?,
        })
    }

    /// Borrow the activity fields of one sheet row
    pub fn row<'a>(&self, row: &'a [String]) -> ActivityRow<'a> {
        ActivityRow {
            objective_code: cell(row, self.objective_code),
            objective_name: cell(row, self.objective_name),
            practice_id: cell(row, self.practice_id),
            practice_name: cell(row, self.practice_name),
            description: cell(row, self.description),
            capability: self.capability.map(|index| cell(row, index)),
            tool: cell(row, self.tool),
            justification: cell(row, self.justification),
            observations: cell(row, self.observations),
            integration: cell(row, self.integration),
        }
    }
}

type PracticeGroups<'a> = IndexMap<(&'a str, &'a str), Vec<ActivityRow<'a>>>;

/// Fold activity rows into the objective hierarchy.
pub fn build_hierarchy<'a, I>(rows: I, order: ObjectiveOrder) -> Vec<Objective>
where
    I: IntoIterator<Item = ActivityRow<'a>>,
{
    let mut groups: IndexMap<(&'a str, &'a str), PracticeGroups<'a>> = IndexMap::new();
    for row in rows {
        groups
            .entry((row.objective_code, row.objective_name))
            .or_default()
            .entry((row.practice_id, row.practice_name))
            .or_default()
            .push(row);
    }

    let mut objectives: Vec<Objective> = groups
        .into_iter()
        .map(|((code, name), practices)| build_objective(code, name, practices))
        .collect();

    if order == ObjectiveOrder::ById {
        objectives.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.name.cmp(&b.name)));
    }

    objectives
}

fn build_objective(code: &str, name: &str, practices: PracticeGroups<'_>) -> Objective {
    let id = code.trim().to_string();
    let mut issued: HashSet<String> = HashSet::new();
    let practices = practices
        .into_iter()
        .enumerate()
        .map(|(index, ((raw_id, practice_name), rows))| {
            let practice_id = practice_id(&id, raw_id, index + 1);
            if !issued.insert(practice_id.clone()) {
                warn!(
                    objective = %id,
                    practice_id = %practice_id,
                    practice = practice_name,
                    "practice id already issued in this objective"
                );
            }
            let activities = rows
                .iter()
                .enumerate()
                .map(|(position, row)| build_activity(&practice_id, position + 1, row))
                .collect();
            Practice {
                id: practice_id,
                name: or_sentinel(practice_name),
                activities,
            }
        })
        .collect();

    Objective {
        id,
        name: or_sentinel(name),
        practices,
    }
}

fn build_activity(practice_id: &str, position: usize, row: &ActivityRow<'_>) -> Activity {
    Activity {
        id: activity_id(practice_id, position),
        description: strip_enumeration(row.description),
        capability_level: row.capability.and_then(parse_capability),
        tool: clean(Some(row.tool)),
        justification: clean(Some(row.justification)),
        observations: clean(Some(row.observations)),
        integration: clean(Some(row.integration)),
    }
}

/// Compose a practice id.
///
/// The last digit run of `raw_id` gives the number (`"O1.1"` → `01`, `"APO12.3"` → `03`);
/// without digits the 1-based `position` among sibling practices is used. Numbers are
/// zero-padded to two digits; longer numbers are kept whole.
pub fn practice_id(objective_id: &str, raw_id: &str, position: usize) -> String {
    match last_digit_run(raw_id) {
        Some(digits) => {
            let significant = digits.trim_start_matches('0');
            let significant = if significant.is_empty() { "0" } else { significant };
            format!("{objective_id}-P{significant:0>2}")
        }
        None => format!("{objective_id}-P{position:02}"),
    }
}

/// Compose an activity id from its 1-based position in the practice.
pub fn activity_id(practice_id: &str, position: usize) -> String {
    format!("{practice_id}-A{position:02}")
}

fn or_sentinel(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        SENTINEL.to_string()
    } else {
        trimmed.to_string()
    }
}
