//! TLE (Two-Line Element) catalog module.
//!
//! Satellites are looked up by the name line that precedes each element
//! set in a plain-text catalog, the format CelesTrak serves as `FORMAT=TLE`.
//! Name matching ignores case and surrounding whitespace, and accepts the
//! `0 ` prefix used by three-line (3LE) catalogs.

use crate::{LookAngleError, LookAngleResult};
use std::path::Path;

/// One named element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TleRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix("0 ").unwrap_or(trimmed);
    trimmed.trim().to_uppercase()
}

fn is_element_line(line: &str, number: char) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(number) && chars.next() == Some(' ')
}

/// Finds the element set named `name` in catalog text.
///
/// # Errors
/// Returns `LookAngleError::NotFound` when no entry carries that name and
/// `LookAngleError::ParseError` when the entry is not followed by lines 1
/// and 2.
pub fn find_tle_by_name(data: &str, name: &str) -> LookAngleResult<TleRecord> {
    let wanted = normalize_name(name);
    let lines: Vec<&str> = data
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    for (i, line) in lines.iter().enumerate() {
        if is_element_line(line, '1') || is_element_line(line, '2') {
            continue;
        }
        if normalize_name(line) != wanted {
            continue;
        }

        let line1 = lines.get(i + 1).copied();
        let line2 = lines.get(i + 2).copied();
        return match (line1, line2) {
            (Some(l1), Some(l2)) if is_element_line(l1, '1') && is_element_line(l2, '2') => {
                let record = TleRecord {
                    name: line.trim().to_string(),
                    line1: l1.to_string(),
                    line2: l2.to_string(),
                };
                validate_tle(&record)?;
                Ok(record)
            }
            _ => Err(LookAngleError::ParseError(format!(
                "entry {} is not followed by TLE lines 1 and 2",
                line
            ))),
        };
    }

    Err(LookAngleError::NotFound(format!(
        "{} not found in TLE catalog",
        name.trim()
    )))
}

/// Reads a catalog file and finds the element set named `name` in it.
pub fn load_tle_by_name(path: &Path, name: &str) -> LookAngleResult<TleRecord> {
    let data = std::fs::read_to_string(path).map_err(|e| {
        LookAngleError::IoError(format!("Failed to read {}: {e}", path.display()))
    })?;
    find_tle_by_name(&data, name)
}

/// Checks that both element lines refer to the same catalog number.
fn validate_tle(record: &TleRecord) -> LookAngleResult<()> {
    let id1 = record.line1.get(2..7).map(str::trim);
    let id2 = record.line2.get(2..7).map(str::trim);

    match (id1, id2) {
        (Some(a), Some(b)) if a == b => Ok(()),
        (Some(_), Some(_)) => Err(LookAngleError::ParseError(format!(
            "TLE lines for {} carry different catalog numbers",
            record.name
        ))),
        _ => Err(LookAngleError::ParseError(format!(
            "TLE lines for {} are too short",
            record.name
        ))),
    }
}
