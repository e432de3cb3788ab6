////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Lexer tests.
////////////////////////////////////////////////////////////////////////////////
// NOTE: Run the following command to get tracing output:
// RUST_LOG=TRACE cargo test -- --show-output > .trace

// Internal library imports.
use crate::DelimiterPair;
use crate::DelimiterSet;
use crate::LineModel;
use crate::Scanner;
use crate::ScannerState;
use crate::TokenKind;
use crate::TokenKind::*;

// External library imports.
use pretty_assertions::assert_eq;
use test_log::test;


fn kinds(scanner: &Scanner, text: &str) -> Vec<(TokenKind, String)> {
    scanner
        .process_line(text, &ScannerState::new())
        .iter()
        .map(|t| (t.kind, t.raw.to_string()))
        .collect()
}

/// Tests `Scanner::process_line` on empty input.
#[test]
#[tracing::instrument]
fn empty() {
    let scanner = Scanner::default();
    let tokens = scanner.process_line("", &ScannerState::new());

    assert!(tokens.is_empty());
}

/// Tests `Scanner::process_line` on a simple list.
#[test]
#[tracing::instrument]
fn simple_list() {
    let scanner = Scanner::default();
    let actual: Vec<_> = scanner
        .process_line("(foo bar)", &ScannerState::new())
        .iter()
        .map(|t| (t.kind, t.raw.to_string(), t.offset))
        .collect();

    let expected = vec![
        (Open,  "(".to_string(),   0),
        (Id,    "foo".to_string(), 1),
        (Ws,    " ".to_string(),   4),
        (Id,    "bar".to_string(), 5),
        (Close, ")".to_string(),   8),
    ];

    assert_eq!(actual, expected);
}

/// Tests all of the default bracket pairs.
#[test]
#[tracing::instrument]
fn bracket_kinds() {
    let scanner = Scanner::default();
    let actual: Vec<_> = scanner
        .process_line("[{()}]", &ScannerState::new())
        .iter()
        .map(|t| t.kind)
        .collect();

    assert_eq!(actual, vec![Open, Open, Open, Close, Close, Close]);
}

/// Tests that tokens partition their line, with contiguous offsets.
#[test]
#[tracing::instrument]
fn partition_and_offsets() {
    let scanner = Scanner::default();
    let inputs = [
        "(defn f [x] (+ x 1))",
        "  (a \"str\" [b {c}])  ",
        "atom",
        "((((",
        "\"unterminated",
        "a;comment-is-an-atom",
    ];

    for text in inputs {
        let tokens = scanner.process_line(text, &ScannerState::new());
        let joined: String = tokens.iter().map(|t| t.raw.as_ref()).collect();
        assert_eq!(joined, text);

        for pair in tokens.windows(2) {
            assert_eq!(pair[1].offset, pair[0].offset + pair[0].len());
        }
    }
}

/// Tests the whitespace token kinds on raw multi-line input.
#[test]
#[tracing::instrument]
fn whitespace_kinds() {
    let scanner = Scanner::default();

    assert_eq!(
        kinds(&scanner, "a \t b"),
        vec![
            (Id, "a".to_string()),
            (Ws, " \t ".to_string()),
            (Id, "b".to_string()),
        ]);

    assert_eq!(
        kinds(&scanner, "a\n b"),
        vec![
            (Id,   "a".to_string()),
            (WsNl, "\n ".to_string()),
            (Id,   "b".to_string()),
        ]);
}

/// Tests string tokenization on a single line.
#[test]
#[tracing::instrument]
fn string_single_line() {
    let scanner = Scanner::default();
    let tokens = scanner.process_line("\"abc\"", &ScannerState::new());

    let actual: Vec<_> = tokens
        .iter()
        .map(|t| (t.kind, t.raw.to_string()))
        .collect();
    assert_eq!(actual, vec![
        (StrStart,  "\"".to_string()),
        (StrInside, "abc".to_string()),
        (StrEnd,    "\"".to_string()),
    ]);

    let end_state = &tokens.last().unwrap().state;
    assert!(!end_state.in_string);
    assert!(end_state.open_symmetric.is_empty());
}

/// Tests that a backslash escapes the string delimiter.
#[test]
#[tracing::instrument]
fn string_escapes() {
    let scanner = Scanner::default();

    assert_eq!(
        kinds(&scanner, "\"a\\\"b\""),
        vec![
            (StrStart,  "\"".to_string()),
            (StrInside, "a\\\"b".to_string()),
            (StrEnd,    "\"".to_string()),
        ]);

    // A trailing backslash does not escape across the line terminator.
    assert_eq!(
        kinds(&scanner, "\"a\\"),
        vec![
            (StrStart,  "\"".to_string()),
            (StrInside, "a\\".to_string()),
        ]);
}

/// Tests that alternating quotes toggle between str-start and str-end.
#[test]
#[tracing::instrument]
fn symmetric_alternation() {
    let scanner = Scanner::default();
    let quote_kinds: Vec<_> = scanner
        .process_line("a\"b\"c\"d\"e", &ScannerState::new())
        .iter()
        .filter(|t| t.raw.as_ref() == "\"")
        .map(|t| t.kind)
        .collect();

    assert_eq!(quote_kinds, vec![StrStart, StrEnd, StrStart, StrEnd]);
}

/// Tests a symmetric delimiter pair without string semantics.
#[test]
#[tracing::instrument]
fn symmetric_non_quote() {
    let scanner = Scanner::new(DelimiterSet::new([
        DelimiterPair::new('(', ')'),
        DelimiterPair::new('|', '|'),
    ]));
    let tokens = scanner.process_line("|a| (b)", &ScannerState::new());

    let actual: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(actual, vec![Open, Id, Close, Ws, Open, Id, Close]);
    assert!(tokens.iter().all(|t| !t.state.in_string));
}

/// Tests string state threading across lines.
#[test]
#[tracing::instrument]
fn string_across_lines() {
    let model = LineModel::new(
        "(foo \"hello\nworld\" bar)",
        Scanner::default());

    let line0: Vec<_> = model.lines()[0]
        .tokens()
        .iter()
        .map(|t| (t.kind, t.raw.to_string(), t.offset))
        .collect();
    assert_eq!(line0, vec![
        (Open,      "(".to_string(),     0),
        (Id,        "foo".to_string(),   1),
        (Ws,        " ".to_string(),     4),
        (StrStart,  "\"".to_string(),    5),
        (StrInside, "hello".to_string(), 6),
    ]);
    assert!(model.lines()[0].end_state().in_string);

    assert!(model.lines()[1].start_state().in_string);
    let line1: Vec<_> = model.lines()[1]
        .tokens()
        .iter()
        .map(|t| (t.kind, t.raw.to_string(), t.offset))
        .collect();
    assert_eq!(line1, vec![
        (StrInside, "world".to_string(), 0),
        (StrEnd,    "\"".to_string(),    5),
        (Ws,        " ".to_string(),     6),
        (Id,        "bar".to_string(),   7),
        (Close,     ")".to_string(),     10),
    ]);
}

/// Tests that line end states equal the next line's start states.
#[test]
#[tracing::instrument]
fn state_continuity() {
    let inputs = [
        "(a\n (b\n  c))",
        "\"one\ntwo\nthree\"",
        "()\n\n[]\n{}",
        "a \"b\n",
    ];

    for text in inputs {
        let model = LineModel::new(text, Scanner::default());
        for pair in model.lines().windows(2) {
            assert_eq!(pair[0].end_state(), pair[1].start_state());
        }
    }
}

/// Tests tokenization of a line which ends inside a string.
#[test]
#[tracing::instrument]
fn ends_mid_string() {
    let scanner = Scanner::default();
    let tokens = scanner.process_line("(a \"bc", &ScannerState::new());

    let actual: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(actual, vec![Open, Id, Ws, StrStart, StrInside]);
    assert!(tokens.last().unwrap().state.in_string);
    assert_eq!(tokens.last().unwrap().state.string_delimiter, Some('"'));
}
