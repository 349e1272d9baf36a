use anyhow::Result;
use csv::StringRecord;

use crate::TableError;

/// Fails if any of the `required` columns aren't in the header.
pub(crate) fn check_columns(headers: &StringRecord, required: &[&str], path: &str) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TableError::MissingColumns {
            path: path.to_string(),
            columns: missing,
        }
        .into());
    }
    Ok(())
}

/// Writes to a sibling temporary file, then renames it over `path`. If anything fails, `path` is
/// untouched.
pub fn write_atomic(path: &str, contents: &[u8]) -> Result<()> {
    let tmp = format!("{path}.tmp");
    if let Err(err) = fs_err::write(&tmp, contents) {
        let _ = fs_err::remove_file(&tmp);
        return Err(err.into());
    }
    if let Err(err) = fs_err::rename(&tmp, path) {
        let _ = fs_err::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}
