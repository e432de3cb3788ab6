////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Line model tests.
////////////////////////////////////////////////////////////////////////////////

// Internal library imports.
use crate::LineModel;
use crate::Pos;
use crate::Scanner;
use crate::TokenKind;

// External library imports.
use pretty_assertions::assert_eq;
use test_log::test;


fn model(text: &str) -> LineModel {
    LineModel::new(text, Scanner::default())
}

/// Tests `LineModel::len` with and without newlines.
#[test]
#[tracing::instrument]
fn length() {
    assert_eq!(model("").len(), 0);
    assert_eq!(model("abc").len(), 3);
    assert_eq!(model("ab\ncd").len(), 5);
    assert_eq!(model("a\n").len(), 2);
    assert_eq!(model("\n\n").len(), 2);
}

/// Tests `LineModel::offset_for_line`.
#[test]
#[tracing::instrument]
fn offset_for_line() {
    let m = model("ab\ncd\n\nef");

    assert_eq!(m.offset_for_line(0), 0);
    assert_eq!(m.offset_for_line(1), 3);
    assert_eq!(m.offset_for_line(2), 6);
    assert_eq!(m.offset_for_line(3), 7);
    // Past the end clamps to the document length.
    assert_eq!(m.offset_for_line(4), 9);
}

/// Tests `LineModel::offset_to_position`, including past-end clamping.
#[test]
#[tracing::instrument]
fn offset_to_position() {
    let m = model("ab\ncd");

    assert_eq!(m.offset_to_position(0), Pos::new(0, 0));
    assert_eq!(m.offset_to_position(2), Pos::new(0, 2));
    assert_eq!(m.offset_to_position(3), Pos::new(1, 0));
    assert_eq!(m.offset_to_position(5), Pos::new(1, 2));
    assert_eq!(m.offset_to_position(99), Pos::new(1, 2));
}

/// Tests `LineModel::position_to_offset` round trips.
#[test]
#[tracing::instrument]
fn position_to_offset() {
    let m = model("ab\ncd");

    for offset in 0..=m.len() {
        let pos = m.offset_to_position(offset);
        assert_eq!(m.position_to_offset(pos), offset);
    }
    // Columns clamp to the line length.
    assert_eq!(m.position_to_offset(Pos::new(0, 99)), 2);
    assert_eq!(m.position_to_offset(Pos::new(99, 0)), 5);
}

/// Tests `LineModel::get_text` across line boundaries.
#[test]
#[tracing::instrument]
fn get_text() {
    let m = model("ab\ncd\nef");

    assert_eq!(m.get_text(0, 8), "ab\ncd\nef");
    assert_eq!(m.get_text(1, 4), "b\nc");
    assert_eq!(m.get_text(2, 3), "\n");
    assert_eq!(m.get_text(3, 5), "cd");
    assert_eq!(m.get_text(4, 4), "");
    // Out-of-order and out-of-range offsets are clamped.
    assert_eq!(m.get_text(5, 2), "");
    assert_eq!(m.get_text(6, 99), "ef");
}

/// Tests that carriage returns are normalized out of offset arithmetic.
#[test]
#[tracing::instrument]
fn crlf_normalization() {
    let m = model("ab\r\ncd");

    assert_eq!(m.line_count(), 2);
    assert_eq!(m.lines()[0].text(), "ab");
    assert_eq!(m.len(), 5);
    assert_eq!(m.get_text(0, 5), "ab\ncd");
}

/// Tests `LineModel::update` retokenization and version bumps.
#[test]
#[tracing::instrument]
fn update() {
    let mut m = model("(a)");
    assert_eq!(m.version(), 0);

    m.update("(a b)\n(c)");
    assert_eq!(m.version(), 1);
    assert_eq!(m.line_count(), 2);
    assert_eq!(m.get_text(0, m.len()), "(a b)\n(c)");

    let kinds: Vec<_> = m.lines()[1]
        .tokens()
        .iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Open, TokenKind::Id, TokenKind::Close]);
}

/// Tests `LineModel::get_token_cursor` positioning.
#[test]
#[tracing::instrument]
fn token_cursor_positioning() {
    let m = model("(a b)");

    // Offsets resolve to the token with the greatest start not past them.
    assert_eq!(m.get_token_cursor(0).token().unwrap().raw.as_ref(), "(");
    assert_eq!(m.get_token_cursor(1).token().unwrap().raw.as_ref(), "a");
    assert_eq!(m.get_token_cursor(2).token().unwrap().raw.as_ref(), " ");
    assert_eq!(m.get_token_cursor(3).token().unwrap().raw.as_ref(), "b");
    assert_eq!(m.get_token_cursor(4).token().unwrap().raw.as_ref(), ")");
    // The end of the document resolves to the last token.
    assert_eq!(m.get_token_cursor(5).token().unwrap().raw.as_ref(), ")");
    assert_eq!(m.get_token_cursor(99).token().unwrap().raw.as_ref(), ")");
}

/// Tests cursors over empty documents and empty lines.
#[test]
#[tracing::instrument]
fn token_cursor_boundaries() {
    let empty = model("");
    let c = empty.get_token_cursor(0);
    assert!(c.token().is_none());
    assert!(c.at_start());
    assert!(c.at_end());

    let m = model("a\n\nb");
    // The empty line holds no token.
    let mut c = m.get_token_cursor(2);
    assert!(c.token().is_none());
    assert!(c.next());
    assert_eq!(c.token().unwrap().raw.as_ref(), "b");
}

/// Tests the total length invariant against the line contents.
#[test]
#[tracing::instrument]
fn length_invariant() {
    for text in ["", "a", "a\nbc\n", "(a\n (b))", "\n"] {
        let m = model(text);
        let expected: usize = m.lines()
            .iter()
            .map(|l| l.len())
            .sum::<usize>() + m.line_count() - 1;
        assert_eq!(m.len(), expected);
        assert_eq!(m.get_text(0, m.len()).len(), m.len());
    }
}
