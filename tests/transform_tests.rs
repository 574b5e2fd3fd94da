// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record transformer tests: filtering, field conversion and input parsing.

use feishu_bitable_sync::error::AppError;
use feishu_bitable_sync::models::record::{date_display, Link};
use feishu_bitable_sync::models::Interest;
use feishu_bitable_sync::services::transform::{read_source_rows, split_categories, transform};
use std::collections::HashSet;

mod common;
use common::row;

const SAMPLE_LINE: &str =
    "Paper A\tchosen\t\tcs.CL\tA. Author\thttp://x/1\thttp://y/1\t2024-01-05\t2024-01-06\tabs\t\t\t\n";

#[test]
fn test_sample_row_becomes_one_record() {
    let rows = read_source_rows(SAMPLE_LINE.as_bytes()).expect("row should parse");
    assert_eq!(rows.len(), 1);

    let batch = transform(&rows, false)
        .expect("transform should succeed")
        .expect("one record expected");
    assert_eq!(batch.len(), 1);

    let record = batch.iter().next().unwrap();
    assert_eq!(record.title, "Paper A");
    assert_eq!(record.interest, Interest::Chosen);
    assert_eq!(record.categories, vec!["cs.CL"]);
    assert_eq!(
        record.primary_link,
        Some(Link {
            url: "http://x/1".to_string(),
            text: "http://x/1".to_string(),
        })
    );
    assert_eq!(record.secondary_link, Some(Link::bare("http://y/1")));
    assert_eq!(date_display(record.first_submitted), "2024/01/05");
    assert_eq!(date_display(record.first_announced), "2024/01/06");
    assert_eq!(record.abstract_text.as_deref(), Some("abs"));
    assert!(record.title_translated.is_none());
    assert!(record.note.is_none());
}

#[test]
fn test_only_chosen_rows_kept_in_order() {
    let rows = vec![
        row("one", Interest::Chosen),
        row("two", Interest::Core),
        row("three", Interest::Chosen),
        row("four", Interest::Filtered),
        row("five", Interest::Chosen),
    ];

    let batch = transform(&rows, false).unwrap().unwrap();
    let titles: Vec<_> = batch.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "three", "five"]);
}

#[test]
fn test_include_filtered_keeps_every_row() {
    let rows = vec![
        row("one", Interest::Irrelevant),
        row("two", Interest::Filtered),
        row("three", Interest::Chosen),
    ];

    let batch = transform(&rows, true).unwrap().unwrap();
    let titles: Vec<_> = batch.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[test]
fn test_no_qualifying_rows_is_no_data() {
    let rows = vec![row("one", Interest::Normal), row("two", Interest::Peer)];
    assert!(transform(&rows, false).unwrap().is_none());
    assert!(transform(&[], false).unwrap().is_none());
    assert!(transform(&[], true).unwrap().is_none());
}

#[test]
fn test_bad_date_aborts_whole_batch() {
    let mut bad = row("bad", Interest::Chosen);
    bad.first_announced = "06/01/2024".to_string();
    let rows = vec![
        row("good", Interest::Chosen),
        bad,
        row("also good", Interest::Chosen),
    ];

    match transform(&rows, false) {
        Err(AppError::Transform { row, message }) => {
            assert_eq!(row, 2);
            assert!(message.contains("First Announced Date"), "{}", message);
        }
        other => panic!("expected transform error, got {:?}", other),
    }
}

#[test]
fn test_bad_date_in_skipped_row_is_ignored() {
    let mut bad = row("bad", Interest::Normal);
    bad.first_submitted = "not a date".to_string();
    let rows = vec![bad, row("good", Interest::Chosen)];

    let batch = transform(&rows, false).unwrap().unwrap();
    assert_eq!(batch.len(), 1);
}

#[test]
fn test_categories_round_trip() {
    let source = "cs.CL,cs.AI";
    let mut r = row("p", Interest::Chosen);
    r.categories = source.to_string();

    let batch = transform(&[r], false).unwrap().unwrap();
    let record = batch.iter().next().unwrap();

    assert_eq!(record.categories, split_categories(source));
    let tags: HashSet<String> = record.categories.iter().cloned().collect();
    let expected: HashSet<String> = ["cs.CL", "cs.AI"].iter().map(|s| s.to_string()).collect();
    assert_eq!(tags, expected);
    assert_eq!(record.categories_joined(), source);
}

#[test]
fn test_unknown_interest_is_rejected() {
    let line = SAMPLE_LINE.replace("chosen", "maybe");
    assert!(matches!(
        read_source_rows(line.as_bytes()),
        Err(AppError::Transform { row: 1, .. })
    ));
}

#[test]
fn test_short_row_is_rejected() {
    let line = "Paper A\tchosen\t\tcs.CL\n";
    assert!(matches!(
        read_source_rows(line.as_bytes()),
        Err(AppError::Transform { row: 1, .. })
    ));
}

#[test]
fn test_multiple_rows_read_in_order() {
    let input = format!(
        "{}{}",
        SAMPLE_LINE,
        SAMPLE_LINE
            .replace("Paper A", "Paper B")
            .replace("chosen", "CORE")
    );
    let rows = read_source_rows(input.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].title, "Paper B");
    assert_eq!(rows[1].interest, Interest::Core);
    assert_eq!(rows[0].note, "");
}
