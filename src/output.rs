//! JSON output
//!
//! Documents are encoded fully in memory before the destination is touched, so a failed
//! encoding never leaves a truncated file behind. A conversion that writes several files
//! prepares every destination directory before writing the first one.

use crate::error::{ConvertError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Encode `value` as UTF-8 JSON with two-space indentation.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write `value` as JSON to `path`, creating parent directories as needed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = to_json(value)?;
    write_documents(&[(path, json)])
}

/// Write already-encoded documents that belong to one conversion.
///
/// Every parent directory is created first, so a path that cannot be prepared fails the
/// batch before any file is touched.
pub fn write_documents<P: AsRef<Path>>(documents: &[(P, String)]) -> Result<()> {
    for (path, _) in documents {
        let path: &Path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConvertError::io_error(parent, e))?;
        }
    }

    for (path, json) in documents {
        let path: &Path = path.as_ref();
        fs::write(path, json).map_err(|e| ConvertError::io_error(path, e))?;
    }
    Ok(())
}
