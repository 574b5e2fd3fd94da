// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Field schema of the monthly paper tables.

use serde::Serialize;

use crate::models::record::Interest;

/// Field names and display settings shared by the schema and the records.
pub mod fields {
    pub const TITLE: &str = "Title";
    pub const INTEREST: &str = "Interest";
    pub const TITLE_TRANSLATED: &str = "Title Translated";
    pub const CATEGORIES: &str = "Categories";
    pub const AUTHORS: &str = "Authors";
    pub const PRIMARY_LINK: &str = "Arxiv";
    pub const SECONDARY_LINK: &str = "PapersCool";
    pub const FIRST_SUBMITTED: &str = "First Submitted Date";
    pub const FIRST_ANNOUNCED: &str = "First Announced Date";
    pub const ABSTRACT: &str = "Abstract";
    pub const ABSTRACT_TRANSLATED: &str = "Abstract Translated";
    pub const COMMENTS: &str = "Comments";
    pub const NOTE: &str = "Note";

    /// chrono pattern equivalent to the table's `yyyy/MM/dd`.
    pub const DATE_FORMAT: &str = "%Y/%m/%d";
    pub const DATE_FORMATTER: &str = "yyyy/MM/dd";
}

/// Category codes offered by the multi-select field.
pub const CATEGORY_VOCABULARY: &[&str] = &[
    "cs.CL",
    "cs.AI",
    "econ.GN",
    "cs.CV",
    "cs.MM",
    "cs.SE",
    "cs.LG",
    "cs.CY",
    "cs.CR",
    "cs.GR",
    "cs.IR",
    "cs.HC",
    "physics.chem-ph",
    "q-bio.BM",
    "cs.RO",
    "eess.SP",
    "cs.SD",
    "eess.AS",
    "cs.DC",
    "cs.PL",
    "cs.MA",
    "cs.NE",
    "cs.SI",
    "cs.AR",
    "cs.DB",
    "cs.LO",
    "cs.CE",
    "cs.IT",
    "math.OC",
    "stat.ML",
    "q-bio.NC",
    "physics.comp-ph",
    "cond-mat.mtrl-sci",
    "q-fin.CP",
    "cs.ET",
    "cs.SC",
    "q-bio.QM",
    "stat.ME",
    "cond-mat.dis-nn",
    "physics.data-an",
    "math.NA",
    "math.PR",
    "astro-ph.IM",
    "cs.NI",
];

/// Bitable field type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    SingleSelect,
    MultiSelect,
    DateTime,
    Url,
}

impl FieldType {
    fn code(self) -> u8 {
        match self {
            FieldType::Text => 1,
            FieldType::SingleSelect => 3,
            FieldType::MultiSelect => 4,
            FieldType::DateTime => 5,
            FieldType::Url => 15,
        }
    }

    fn ui_type(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::SingleSelect => "SingleSelect",
            FieldType::MultiSelect => "MultiSelect",
            FieldType::DateTime => "DateTime",
            FieldType::Url => "Url",
        }
    }
}

/// Field definition as sent with `create_table`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableField {
    pub field_name: &'static str,
    #[serde(rename = "type")]
    pub type_code: u8,
    pub ui_type: &'static str,
    pub is_primary: bool,
    pub property: Option<FieldProperty>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FieldProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_formatter: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_fill: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub name: &'static str,
    pub color: u8,
}

impl TableField {
    fn new(field_name: &'static str, field_type: FieldType) -> Self {
        Self {
            field_name,
            type_code: field_type.code(),
            ui_type: field_type.ui_type(),
            is_primary: false,
            property: None,
        }
    }

    fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.property = Some(FieldProperty {
            options: Some(options),
            ..Default::default()
        });
        self
    }

    fn with_date_format(mut self) -> Self {
        self.property = Some(FieldProperty {
            date_formatter: Some(fields::DATE_FORMATTER),
            auto_fill: Some(false),
            ..Default::default()
        });
        self
    }
}

fn interest_color(interest: Interest) -> u8 {
    match interest {
        Interest::Chosen => 10,
        Interest::Core => 33,
        Interest::Peer => 12,
        Interest::Related => 13,
        Interest::Interesting => 15,
        Interest::Normal => 2,
        Interest::Irrelevant => 0,
        Interest::Filtered => 43,
    }
}

/// Fields of a freshly created monthly table, in display order.
pub fn table_fields() -> Vec<TableField> {
    let interest_options = Interest::ALL
        .iter()
        .map(|i| SelectOption {
            name: i.as_str(),
            color: interest_color(*i),
        })
        .collect();

    let category_options = CATEGORY_VOCABULARY
        .iter()
        .enumerate()
        .map(|(idx, name)| SelectOption {
            name: *name,
            color: (idx % 10) as u8,
        })
        .collect();

    vec![
        TableField::new(fields::TITLE, FieldType::Text).primary(),
        TableField::new(fields::INTEREST, FieldType::SingleSelect).with_options(interest_options),
        TableField::new(fields::TITLE_TRANSLATED, FieldType::Text),
        TableField::new(fields::CATEGORIES, FieldType::MultiSelect).with_options(category_options),
        TableField::new(fields::AUTHORS, FieldType::Text),
        TableField::new(fields::PRIMARY_LINK, FieldType::Url),
        TableField::new(fields::SECONDARY_LINK, FieldType::Url),
        TableField::new(fields::FIRST_SUBMITTED, FieldType::DateTime).with_date_format(),
        TableField::new(fields::FIRST_ANNOUNCED, FieldType::DateTime).with_date_format(),
        TableField::new(fields::ABSTRACT, FieldType::Text),
        TableField::new(fields::ABSTRACT_TRANSLATED, FieldType::Text),
        TableField::new(fields::COMMENTS, FieldType::Text),
        TableField::new(fields::NOTE, FieldType::Text),
    ]
}
