// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Input rows and the bitable records built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::schema::fields;

/// Curation tag attached to every input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interest {
    #[serde(rename = "chosen")]
    Chosen,
    #[serde(rename = "CORE")]
    Core,
    #[serde(rename = "PEER")]
    Peer,
    #[serde(rename = "RELATED")]
    Related,
    #[serde(rename = "INTERESTING")]
    Interesting,
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "IRRELEVANT")]
    Irrelevant,
    #[serde(rename = "filtered")]
    Filtered,
}

impl Interest {
    pub const ALL: [Interest; 8] = [
        Interest::Chosen,
        Interest::Core,
        Interest::Peer,
        Interest::Related,
        Interest::Interesting,
        Interest::Normal,
        Interest::Irrelevant,
        Interest::Filtered,
    ];

    /// Label as written in the input file and the single-select option.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interest::Chosen => "chosen",
            Interest::Core => "CORE",
            Interest::Peer => "PEER",
            Interest::Related => "RELATED",
            Interest::Interesting => "INTERESTING",
            Interest::Normal => "NORMAL",
            Interest::Irrelevant => "IRRELEVANT",
            Interest::Filtered => "filtered",
        }
    }
}

/// One line of the daily TSV export, in column order.
///
/// The file has no header; columns are matched by position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceRow {
    pub title: String,
    pub interest: Interest,
    pub title_translated: String,
    /// Comma-joined category codes
    pub categories: String,
    pub authors: String,
    pub primary_link: String,
    pub secondary_link: String,
    /// `YYYY-MM-DD`
    pub first_submitted: String,
    /// `YYYY-MM-DD`
    pub first_announced: String,
    pub abstract_text: String,
    pub abstract_translated: String,
    pub comments: String,
    pub note: String,
}

/// URL cell value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    #[serde(rename = "link")]
    pub url: String,
    pub text: String,
}

impl Link {
    /// Link whose display text is the URL itself.
    pub fn bare(url: &str) -> Self {
        Self {
            url: url.to_string(),
            text: url.to_string(),
        }
    }
}

/// Field values of one bitable record.
///
/// Empty optional cells are left out of the request entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Interest")]
    pub interest: Interest,
    #[serde(rename = "Title Translated", skip_serializing_if = "Option::is_none")]
    pub title_translated: Option<String>,
    #[serde(rename = "Categories", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(rename = "Authors", skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(rename = "Arxiv", skip_serializing_if = "Option::is_none")]
    pub primary_link: Option<Link>,
    #[serde(rename = "PapersCool", skip_serializing_if = "Option::is_none")]
    pub secondary_link: Option<Link>,
    #[serde(rename = "First Submitted Date", serialize_with = "serialize_date")]
    pub first_submitted: NaiveDate,
    #[serde(rename = "First Announced Date", serialize_with = "serialize_date")]
    pub first_announced: NaiveDate,
    #[serde(rename = "Abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(
        rename = "Abstract Translated",
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_translated: Option<String>,
    #[serde(rename = "Comments", skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(rename = "Note", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DestinationRecord {
    /// Categories joined back into the input representation.
    pub fn categories_joined(&self) -> String {
        self.categories.join(",")
    }
}

/// Date cells take epoch milliseconds; UTC midnight of the given day.
pub fn date_to_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// Date as rendered by the table (`yyyy/MM/dd`).
pub fn date_display(date: NaiveDate) -> String {
    date.format(fields::DATE_FORMAT).to_string()
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(date_to_millis(*date))
}

/// Body of a `batch_create` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordBatch {
    pub records: Vec<RecordFields>,
}

/// Wrapper expected by the records API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFields {
    pub fields: DestinationRecord,
}

impl RecordBatch {
    pub fn new(records: Vec<DestinationRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|fields| RecordFields { fields })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestinationRecord> {
        self.records.iter().map(|r| &r.fields)
    }
}
