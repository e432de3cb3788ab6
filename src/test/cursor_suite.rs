////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Token cursor tests.
////////////////////////////////////////////////////////////////////////////////

// Internal library imports.
use crate::LineModel;
use crate::Scanner;
use crate::Span;

// External library imports.
use pretty_assertions::assert_eq;
use test_log::test;


fn model(text: &str) -> LineModel {
    LineModel::new(text, Scanner::default())
}

/// Tests `TokenCursor::next` and `previous` across lines, skipping empty
/// lines.
#[test]
#[tracing::instrument]
fn traversal() {
    let m = model("(a\n\nb)");
    let mut c = m.get_token_cursor(0);
    assert!(c.at_start());

    let mut raws = vec![c.token().unwrap().raw.to_string()];
    while c.next() {
        raws.push(c.token().unwrap().raw.to_string());
    }
    assert_eq!(raws, vec!["(", "a", "b", ")"]);
    assert!(c.at_end());

    let mut back = vec![c.token().unwrap().raw.to_string()];
    while c.previous() {
        back.push(c.token().unwrap().raw.to_string());
    }
    back.reverse();
    assert_eq!(back, vec!["(", "a", "b", ")"]);
    assert!(c.at_start());
}

/// Tests `TokenCursor::offset_start` and `offset_end` across lines.
#[test]
#[tracing::instrument]
fn token_offsets() {
    let m = model("(a\n\nb)");

    let c = m.get_token_cursor(0);
    assert_eq!((c.offset_start(), c.offset_end()), (0, 1));

    let c = m.get_token_cursor(4);
    assert_eq!(c.token().unwrap().raw.as_ref(), "b");
    assert_eq!((c.offset_start(), c.offset_end()), (4, 5));

    let c = m.get_token_cursor(5);
    assert_eq!(c.token().unwrap().raw.as_ref(), ")");
    assert_eq!((c.offset_start(), c.offset_end()), (5, 6));
}

/// Tests `TokenCursor::forward_list` delimiter matching.
#[test]
#[tracing::instrument]
fn forward_list() {
    let m = model("(a (b c) d)");

    let mut c = m.get_token_cursor(0);
    assert!(c.forward_list());
    assert_eq!(c.offset_start(), 10);

    let mut c = m.get_token_cursor(3);
    assert!(c.forward_list());
    assert_eq!(c.offset_start(), 7);

    // Not on an open.
    let mut c = m.get_token_cursor(1);
    assert!(!c.forward_list());
    assert_eq!(c.offset_start(), 1);
}

/// Tests `TokenCursor::forward_list` with an unmatched delimiter.
#[test]
#[tracing::instrument]
fn forward_list_unmatched() {
    let m = model("(a (b");
    let mut c = m.get_token_cursor(0);

    assert!(!c.forward_list());
    // Failure restores the cursor position.
    assert_eq!(c.offset_start(), 0);
}

/// Tests that list matching is pair-specific.
#[test]
#[tracing::instrument]
fn forward_list_pair_specific() {
    let m = model("([x] y)");
    let mut c = m.get_token_cursor(0);

    assert!(c.forward_list());
    assert_eq!(c.token().unwrap().raw.as_ref(), ")");
    assert_eq!(c.offset_start(), 6);
}

/// Tests `TokenCursor::forward_list` over a string.
#[test]
#[tracing::instrument]
fn forward_list_string() {
    let m = model("\"ab\"");
    let mut c = m.get_token_cursor(0);

    assert!(c.forward_list());
    assert_eq!(c.offset_start(), 3);
}

/// Tests `TokenCursor::backward_list`.
#[test]
#[tracing::instrument]
fn backward_list() {
    let m = model("(a (b c) d)");

    let mut c = m.get_token_cursor(10);
    assert!(c.backward_list());
    assert_eq!(c.offset_start(), 0);

    let mut c = m.get_token_cursor(7);
    assert!(c.backward_list());
    assert_eq!(c.offset_start(), 3);
}

/// Tests `TokenCursor::forward_sexp` over lists and atoms.
#[test]
#[tracing::instrument]
fn forward_sexp() {
    let m = model("(a (b c) d)");

    // A whole list is one sexp.
    let mut c = m.get_token_cursor(0);
    assert!(c.forward_sexp(true));
    assert_eq!(c.offset_start(), 10);

    // An atom is one sexp; the cursor steps past it.
    let mut c = m.get_token_cursor(1);
    assert!(c.forward_sexp(true));
    assert_eq!(c.offset_start(), 2);

    // Leading whitespace is skipped.
    let mut c = m.get_token_cursor(2);
    assert!(c.forward_sexp(true));
    assert_eq!(c.offset_start(), 8);
}

/// Tests `TokenCursor::backward_sexp` over lists and atoms.
#[test]
#[tracing::instrument]
fn backward_sexp() {
    let m = model("(a (b c) d)");

    // From the final close, the previous sexp is the atom d.
    let mut c = m.get_token_cursor(10);
    assert!(c.backward_sexp(true));
    assert_eq!(c.offset_start(), 9);

    // From d, the previous sexp is the inner list; the cursor lands on its
    // open.
    assert!(c.backward_sexp(true));
    assert_eq!(c.offset_start(), 3);

    assert!(c.backward_sexp(true));
    assert_eq!(c.offset_start(), 1);
}

/// Tests `TokenCursor::up_list` to successive enclosing opens.
#[test]
#[tracing::instrument]
fn up_list() {
    let m = model("(a (b c))");
    let mut c = m.get_token_cursor(6);

    assert!(c.up_list());
    assert_eq!(c.offset_start(), 3);

    assert!(c.up_list());
    assert_eq!(c.offset_start(), 0);

    assert!(!c.up_list());
    assert_eq!(c.offset_start(), 0);
}

/// Tests `TokenCursor::down_list` to the first child list.
#[test]
#[tracing::instrument]
fn down_list() {
    let m = model("(a (b c) d)");

    let mut c = m.get_token_cursor(0);
    assert!(c.down_list());
    assert_eq!(c.offset_start(), 3);

    let mut c = m.get_token_cursor(1);
    assert!(c.down_list());
    assert_eq!(c.offset_start(), 3);

    // No child list before the close.
    let m = model("(a b)");
    let mut c = m.get_token_cursor(0);
    assert!(!c.down_list());
    assert_eq!(c.offset_start(), 0);
}

/// Tests `TokenCursor::forward_whitespace`.
#[test]
#[tracing::instrument]
fn forward_whitespace() {
    let m = model("a   b");
    let mut c = m.get_token_cursor(1);

    assert!(c.is_whitespace());
    assert!(c.forward_whitespace());
    assert_eq!(c.token().unwrap().raw.as_ref(), "b");
}

/// Tests that `TokenCursor::backward_whitespace` lands on the first
/// non-whitespace token, not one past it.
#[test]
#[tracing::instrument]
fn backward_whitespace_position() {
    let m = model("a   b");
    let mut c = m.get_token_cursor(2);

    assert!(c.is_whitespace());
    assert!(c.backward_whitespace());
    assert_eq!(c.token().unwrap().raw.as_ref(), "a");
}

/// Tests `TokenCursor::range_for_current_form` on each token kind.
#[test]
#[tracing::instrument]
fn range_for_current_form() {
    let m = model("foo bar");
    let c = m.get_token_cursor(1);
    assert_eq!(c.range_for_current_form(), Some(Span::new(0, 3)));

    let m = model("(a b)");
    let c = m.get_token_cursor(0);
    assert_eq!(c.range_for_current_form(), Some(Span::new(0, 5)));
    let c = m.get_token_cursor(4);
    assert_eq!(c.range_for_current_form(), Some(Span::new(0, 5)));

    // Inside a string, the form is the whole string.
    let m = model("\"hello\"");
    let c = m.get_token_cursor(3);
    assert_eq!(c.range_for_current_form(), Some(Span::new(0, 7)));
}

/// Tests `TokenCursor::range_for_current_form` from whitespace.
#[test]
#[tracing::instrument]
fn range_for_current_form_whitespace() {
    // The next form is preferred.
    let m = model("a (b)");
    let c = m.get_token_cursor(1);
    assert_eq!(c.range_for_current_form(), Some(Span::new(2, 5)));

    // With nothing ahead, the previous form is used.
    let m = model("(a) ");
    let c = m.get_token_cursor(3);
    assert_eq!(c.range_for_current_form(), Some(Span::new(0, 3)));

    // An empty list has no current form.
    let m = model("( )");
    let c = m.get_token_cursor(1);
    assert_eq!(c.range_for_current_form(), None);
}

/// Tests `TokenCursor::range_for_defun`.
#[test]
#[tracing::instrument]
fn range_for_defun() {
    let m = model("(a)\n\n(b (c))");

    let c = m.get_token_cursor(9);
    assert_eq!(c.range_for_defun(), Some(Span::new(5, 12)));

    let c = m.get_token_cursor(1);
    assert_eq!(c.range_for_defun(), Some(Span::new(0, 3)));

    // At top level, the current form is the defun.
    let c = m.get_token_cursor(5);
    assert_eq!(c.range_for_defun(), Some(Span::new(5, 12)));
}

/// Tests cursor equality and `set`.
#[test]
#[tracing::instrument]
fn clone_and_set() {
    let m = model("(a b)");
    let a = m.get_token_cursor(0);
    let mut b = a.clone();

    assert_eq!(a, b);
    assert!(b.next());
    assert_ne!(a, b);

    b.set(0, 0);
    assert_eq!(a, b);
}
