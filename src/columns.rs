//! Column resolution
//!
//! Source spreadsheets are edited by hand, so the same column shows up as "Justificación
//! Técnica", "Justificacion tecnica" or "justificación  técnica". Each conversion declares
//! the columns it needs as [`ColumnSpec`]s (a canonical name plus accepted synonyms) and
//! [`resolve_columns`] maps them onto the actual headers once, before any row is read.
//!
//! Matching compares [`fold_header`] keys: accent-insensitive, case-insensitive, and with
//! whitespace runs collapsed.

use crate::error::{ConvertError, MissingColumn, Result};
use crate::text::fold_header;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A column a conversion needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub canonical: &'static str,
    pub synonyms: Vec<String>,
    pub required: bool,
}

impl ColumnSpec {
    /// A column that must be present
    pub fn required<S: AsRef<str>>(canonical: &'static str, synonyms: &[S]) -> Self {
        ColumnSpec {
            canonical,
            synonyms: synonyms.iter().map(|s| s.as_ref().to_string()).collect(),
            required: true,
        }
    }

    /// A column that may be absent from the sheet
    pub fn optional<S: AsRef<str>>(canonical: &'static str, synonyms: &[S]) -> Self {
        ColumnSpec {
            required: false,
            ..ColumnSpec::required(canonical, synonyms)
        }
    }
}

/// A column spec matched to an actual header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub canonical: &'static str,
    pub header: String,
    pub index: usize,
}

/// The outcome of [`resolve_columns`]: canonical name → actual header and position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    columns: Vec<ResolvedColumn>,
}

impl ResolvedColumns {
    /// Position of the column resolved for `canonical`
    pub fn index(&self, canonical: &str) -> Option<usize> {
        self.get(canonical).map(|c| c.index)
    }

    /// Actual header resolved for `canonical`
    pub fn header(&self, canonical: &str) -> Option<&str> {
        self.get(canonical).map(|c| c.header.as_str())
    }

    /// Position of a required column.
    ///
    /// Resolution already rejected sheets that lack required columns, so a miss here means
    /// the caller asked for a name it never declared; it is reported as a missing column.
    pub fn require(&self, canonical: &'static str) -> Result<usize> {
        self.index(canonical)
            .ok_or_else(|| ConvertError::MissingColumns {
                missing: vec![MissingColumn {
                    canonical: canonical.to_string(),
                    synonyms: Vec::new(),
                }],
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedColumn> {
        self.columns.iter()
    }

    fn get(&self, canonical: &str) -> Option<&ResolvedColumn> {
        self.columns.iter().find(|c| c.canonical == canonical)
    }
}

/// Resolve `specs` against the actual `headers`.
///
/// Synonyms are tried in the order given; the first one matching a header wins. When two
/// headers fold to the same key the leftmost one is used. Every required column that no
/// synonym matches is collected and reported in a single
/// [`ConvertError::MissingColumns`].
pub fn resolve_columns<S: AsRef<str>>(
    headers: &[S],
    specs: &[ColumnSpec],
) -> Result<ResolvedColumns> {
    let mut by_key: HashMap<String, usize> = HashMap::new();
    for (index, header) in headers.iter().enumerate() {
        let key = fold_header(header.as_ref());
        if key.is_empty() {
            continue;
        }
        if let Some(first) = by_key.get(&key) {
            warn!(
                header = header.as_ref(),
                kept = headers[*first].as_ref(),
                "duplicate column header ignored"
            );
            continue;
        }
        by_key.insert(key, index);
    }

    let mut columns = Vec::new();
    let mut missing = Vec::new();

    for spec in specs {
        let found = spec
            .synonyms
            .iter()
            .find_map(|synonym| by_key.get(&fold_header(synonym)).copied());

        match found {
            Some(index) => {
                let header = headers[index].as_ref().to_string();
                debug!(column = spec.canonical, header = %header, index, "resolved column");
                columns.push(ResolvedColumn {
                    canonical: spec.canonical,
                    header,
                    index,
                });
            }
            None if spec.required => missing.push(MissingColumn {
                canonical: spec.canonical.to_string(),
                synonyms: spec.synonyms.clone(),
            }),
            None => debug!(column = spec.canonical, "optional column not present"),
        }
    }

    if !missing.is_empty() {
        return Err(ConvertError::MissingColumns { missing });
    }

    Ok(ResolvedColumns { columns })
}
