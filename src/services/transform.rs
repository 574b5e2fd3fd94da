// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily TSV export → bitable records.

use crate::error::{AppError, Result};
use crate::models::record::{DestinationRecord, Interest, Link, RecordBatch, SourceRow};
use chrono::NaiveDate;
use std::io::Read;
use std::path::Path;

/// Date format used by the export.
const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Read every row of a headerless, tab-delimited export file.
pub fn read_source_file<P: AsRef<Path>>(path: P) -> Result<Vec<SourceRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::Input(format!("{}: {}", path.display(), e)))?;
    read_source_rows(file)
}

/// Read rows from any reader holding the export format.
pub fn read_source_rows<R: Read>(reader: R) -> Result<Vec<SourceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(reader);

    reader
        .deserialize::<SourceRow>()
        .enumerate()
        .map(|(idx, row)| {
            row.map_err(|e| AppError::Transform {
                row: idx + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Build the batch to push, or `None` when nothing qualifies.
///
/// Only `chosen` rows are kept unless `include_filtered` is set. A single
/// malformed row fails the whole batch.
pub fn transform(rows: &[SourceRow], include_filtered: bool) -> Result<Option<RecordBatch>> {
    let records = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| include_filtered || row.interest == Interest::Chosen)
        .map(|(idx, row)| {
            to_record(row).map_err(|message| AppError::Transform {
                row: idx + 1,
                message,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if records.is_empty() {
        return Ok(None);
    }

    Ok(Some(RecordBatch::new(records)))
}

/// Convert one row.
pub fn to_record(row: &SourceRow) -> std::result::Result<DestinationRecord, String> {
    Ok(DestinationRecord {
        title: row.title.clone(),
        interest: row.interest,
        title_translated: non_empty(&row.title_translated),
        categories: split_categories(&row.categories),
        authors: non_empty(&row.authors),
        primary_link: non_empty(&row.primary_link).map(|url| Link::bare(&url)),
        secondary_link: non_empty(&row.secondary_link).map(|url| Link::bare(&url)),
        first_submitted: parse_date("First Submitted Date", &row.first_submitted)?,
        first_announced: parse_date("First Announced Date", &row.first_announced)?,
        abstract_text: non_empty(&row.abstract_text),
        abstract_translated: non_empty(&row.abstract_translated),
        comments: non_empty(&row.comments),
        note: non_empty(&row.note),
    })
}

/// Split the comma-joined category column into tags, in order.
pub fn split_categories(categories: &str) -> Vec<String> {
    categories
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_date(field: &str, value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT)
        .map_err(|e| format!("{} {:?} is not YYYY-MM-DD: {}", field, value, e))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_categories() {
        assert_eq!(split_categories("cs.CL,cs.AI"), vec!["cs.CL", "cs.AI"]);
        assert_eq!(split_categories(" cs.CL , cs.AI "), vec!["cs.CL", "cs.AI"]);
        assert!(split_categories("").is_empty());
        assert_eq!(split_categories("cs.CL,,"), vec!["cs.CL"]);
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("d", "2024-01-05").is_ok());
        assert!(parse_date("d", "2024/01/05").is_err());
        assert!(parse_date("d", "2024-13-01").is_err());
        assert!(parse_date("d", "").is_err());
    }
}
