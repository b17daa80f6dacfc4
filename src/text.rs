//! Free-text cleaning helpers shared by every conversion
//!
//! Spreadsheet cells are filled by hand: they carry manual numbering, bullet glyphs, stray
//! whitespace, and assorted spellings of "not applicable". These helpers map all of that
//! onto a small, predictable vocabulary:
//!
//! - [`clean`] turns empty or not-applicable values into the [`SENTINEL`]
//! - [`strip_enumeration`] drops one leading bullet or outline number
//! - [`split_list`] turns a delimited cell into a list of items
//! - [`parse_capability`] extracts a 0..=10 capability level, leniently
//! - [`fold_header`] is the comparison key for column headers

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Placeholder for missing or not-applicable text fields.
pub const SENTINEL: &str = "-";

/// Values (compared case-insensitively, after trimming) that mean "no value".
pub const NOT_APPLICABLE: [&str; 6] = ["n/a", "na", "none", "null", "-", ""];

/// Glyphs accepted as list bullets.
pub const BULLETS: [char; 5] = ['-', '\u{2013}', '\u{2014}', '\u{2022}', '\u{00B7}'];

/// Highest capability level accepted by [`parse_capability`].
pub const MAX_CAPABILITY: u8 = 10;

static LEADING_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-\x{2013}\x{2014}\x{2022}\x{00B7}]\s*").unwrap());

// 1.  1.1)  01:  2 -  3.2.1.
static LEADING_OUTLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[0-9]+(?:\.[0-9]+)*[.)]?\s*[-\x{2013}\x{2014}:]?\s*").unwrap()
});

static LINE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*[-\x{2013}\x{2014}\x{2022}\x{00B7}][ \t]*").unwrap());

static LIST_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\n;,]+").unwrap());

static LIST_DELIMITERS_WITH_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n;,\x{2022}]+").unwrap());

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Whether `value` means "no value": empty, whitespace-only, or one of [`NOT_APPLICABLE`].
pub fn is_not_applicable(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    NOT_APPLICABLE.contains(&lowered.as_str())
}

/// Normalizes a simple free-text field.
///
/// Absent, empty, whitespace-only, and not-applicable values become [`SENTINEL`];
/// anything else is returned trimmed and otherwise unchanged.
pub fn clean(value: Option<&str>) -> String {
    match value {
        Some(v) if !is_not_applicable(v) => v.trim().to_string(),
        _ => SENTINEL.to_string(),
    }
}

/// Removes one leading bullet marker or, failing that, one leading outline number.
///
/// The removal is not recursive: `"- 1. Foo"` becomes `"1. Foo"`. An empty result is
/// reported as [`SENTINEL`].
pub fn strip_enumeration(text: &str) -> String {
    let stripped = match LEADING_BULLET.find(text) {
        Some(m) => &text[m.end()..],
        None => match LEADING_OUTLINE.find(text) {
            Some(m) => &text[m.end()..],
            None => text,
        },
    };

    let stripped = stripped.trim();
    if stripped.is_empty() {
        SENTINEL.to_string()
    } else {
        stripped.to_string()
    }
}

/// How a delimited cell is split into items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// Tool use-cases: `•` also separates items, duplicates are kept.
    UseCases,
    /// Tools referenced by an objective: duplicates are dropped, first occurrence wins.
    ToolRefs,
}

/// Splits a delimited free-text cell into its items.
///
/// Items are separated by newlines, `;` or `,` (and `•` for [`ListStyle::UseCases`]). A
/// leading bullet on each line is removed first; each item is then trimmed of whitespace
/// and dash/bullet glyphs, and empty items are dropped.
pub fn split_list(value: &str, style: ListStyle) -> Vec<String> {
    if is_not_applicable(value) {
        return Vec::new();
    }

    let debulleted = LINE_BULLET.replace_all(value.trim(), "");
    let delimiters = match style {
        ListStyle::UseCases => &*LIST_DELIMITERS_WITH_BULLET,
        ListStyle::ToolRefs => &*LIST_DELIMITERS,
    };

    let items = delimiters
        .split(&debulleted)
        .map(|piece| piece.trim_matches(|c: char| c.is_whitespace() || BULLETS.contains(&c)))
        .filter(|piece| !piece.is_empty())
        .map(str::to_string);

    match style {
        ListStyle::UseCases => items.collect(),
        ListStyle::ToolRefs => {
            let mut out: Vec<String> = Vec::new();
            for item in items {
                if !out.contains(&item) {
                    out.push(item);
                }
            }
            out
        }
    }
}

/// Extracts a capability level from free text.
///
/// The first run of ASCII digits anywhere in the value is read; it is returned only when
/// it lies in `0..=10`. Out-of-range, unparseable, and not-applicable values all yield
/// `None`.
pub fn parse_capability(value: &str) -> Option<u8> {
    if is_not_applicable(value) {
        return None;
    }

    let digits = DIGIT_RUN.find(value)?.as_str();
    match digits.parse::<u64>() {
        Ok(level) if level <= u64::from(MAX_CAPABILITY) => Some(level as u8),
        _ => None,
    }
}

/// Returns the last run of ASCII digits in `value`, if any.
pub fn last_digit_run(value: &str) -> Option<&str> {
    DIGIT_RUN.find_iter(value).last().map(|m| m.as_str())
}

/// Comparison key for column headers.
///
/// Accents are folded to their base letters (NFD, combining marks dropped), the text is
/// lowercased, and whitespace runs are collapsed to a single space.
pub fn fold_header(header: &str) -> String {
    let folded: String = header
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
