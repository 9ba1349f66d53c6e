//! Readers for the primary datasets
//!
//! Each reader turns a file into raw rows and counts what it could not
//! parse in the [`BuildReport`]. Domain rules (frequency thresholds,
//! gender codes, multi-word filtering) are applied by the domain modules.

use crate::index::BuildReport;
use crate::io::{field_str, for_each_record, open, parse_number, split_fields};
use serde::Deserialize;
use std::io;
use std::path::Path;

/// Source tag of noun rows that are always retained
pub const KEYWORD_SOURCE: &str = "keyword";

/// One noun occurrence from the JSONL dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NounRow {
    /// Normalized subject
    pub subject: String,
    pub keyword: bool,
}

#[derive(Debug, Deserialize)]
struct RawNoun {
    subject: Option<String>,
    source: Option<String>,
}

/// Lowercase, trim and collapse internal whitespace. Returns `None` unless
/// the result is made of `a-z`, single spaces and hyphens.
pub fn normalize_subject(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let subject = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    let valid = !subject.is_empty()
        && subject
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == ' ' || c == '-');
    valid.then_some(subject)
}

/// Read noun rows from newline-delimited JSON.
///
/// Lines without a `source` field are question records and are skipped
/// silently. Lines that are not JSON objects count as malformed.
pub fn read_nouns(path: &Path, report: &mut BuildReport) -> io::Result<Vec<NounRow>> {
    let mut rows = Vec::new();
    for_each_record(open(path)?, |line_num, line| {
        let raw: RawNoun = match serde_json::from_slice(line) {
            Ok(raw) => raw,
            Err(e) => {
                report.malformed += 1;
                log::debug!("{}:{line_num}: {e}", path.display());
                return;
            }
        };
        let Some(source) = raw.source else {
            return;
        };
        report.rows_read += 1;
        match raw.subject.as_deref().and_then(normalize_subject) {
            Some(subject) => rows.push(NounRow {
                subject,
                keyword: source == KEYWORD_SOURCE,
            }),
            None => report.filtered += 1,
        }
    })?;
    Ok(rows)
}

/// One row of the first-name table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRow {
    pub name: String,
    pub gender: String,
    pub origin: String,
    /// 0 = unranked
    pub rank_us: u32,
    /// 0 = unranked
    pub rank_world: u32,
}

/// Read `name, gender, origin, rank_us, rank_world` rows
pub fn read_names(path: &Path, report: &mut BuildReport) -> io::Result<Vec<NameRow>> {
    let mut rows = Vec::new();
    for_each_record(open(path)?, |line_num, line| {
        report.rows_read += 1;
        let fields = split_fields(line);
        let parsed = (fields.len() >= 5)
            .then(|| {
                Some(NameRow {
                    name: field_str(fields[0])?.to_lowercase(),
                    gender: field_str(fields[1])?.to_lowercase(),
                    origin: field_str(fields[2])?.to_uppercase(),
                    rank_us: parse_number(fields[3])?,
                    rank_world: parse_number(fields[4])?,
                })
            })
            .flatten()
            .filter(|row| !row.name.is_empty());
        match parsed {
            Some(row) => rows.push(row),
            None => {
                report.malformed += 1;
                log::debug!("{}:{line_num}: malformed name row", path.display());
            }
        }
    })?;
    Ok(rows)
}

/// One row of the place table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRow {
    pub name: String,
    pub place_type: String,
    pub region: String,
    pub population: u64,
}

/// Read `name, place_type, region, population` rows
pub fn read_places(path: &Path, report: &mut BuildReport) -> io::Result<Vec<PlaceRow>> {
    let mut rows = Vec::new();
    for_each_record(open(path)?, |line_num, line| {
        report.rows_read += 1;
        let fields = split_fields(line);
        let parsed = (fields.len() >= 4)
            .then(|| {
                Some(PlaceRow {
                    name: field_str(fields[0])?.to_lowercase(),
                    place_type: field_str(fields[1])?.to_lowercase(),
                    region: field_str(fields[2])?.to_uppercase(),
                    population: parse_number(fields[3])?,
                })
            })
            .flatten()
            .filter(|row| !row.name.is_empty());
        match parsed {
            Some(row) => rows.push(row),
            None => {
                report.malformed += 1;
                log::debug!("{}:{line_num}: malformed place row", path.display());
            }
        }
    })?;
    Ok(rows)
}
