////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Structural mutation operations.
////////////////////////////////////////////////////////////////////////////////

// Local imports.
use crate::cursor::TokenCursor;
use crate::document::EditableDocument;
use crate::document::EditHost as _;
use crate::document::EditSet;
use crate::document::ModelEdit;
use crate::document::Selection;
use crate::paredit::range::backward_sexp_range;
use crate::paredit::range::enclosing_list;
use crate::paredit::range::forward_sexp_range;
use crate::paredit::range::skip_trivia_backward;
use crate::paredit::range::skip_trivia_forward;
use crate::span::Span;
use crate::token::TokenKind;

// External library imports.
use tracing::event;
use tracing::Level;
use tracing::span;


/// Returns the absolute end offset of the form starting at the cursor:
/// the matching close for a list or string, the token end for an atom.
/// Returns None on a closing delimiter or an unmatched open.
fn form_end_offset(cursor: &TokenCursor<'_>) -> Option<usize> {
    let kind = cursor.kind()?;
    if kind.is_form_start() {
        let mut close = cursor.clone();
        if close.forward_list() {
            Some(close.offset_end())
        } else {
            None
        }
    } else if kind.is_form_end() {
        None
    } else {
        Some(cursor.offset_end())
    }
}

/// Returns the absolute start offset of the form ending at the cursor:
/// the matching open for a list or string, the token start for an atom.
/// Returns None on an opening delimiter or an unmatched close.
fn form_start_offset(cursor: &TokenCursor<'_>) -> Option<usize> {
    let kind = cursor.kind()?;
    if kind.is_form_end() {
        let mut open = cursor.clone();
        if open.backward_list() {
            Some(open.offset_start())
        } else {
            None
        }
    } else if kind.is_form_start() {
        None
    } else {
        Some(cursor.offset_start())
    }
}


////////////////////////////////////////////////////////////////////////////////
// Slurp and barf.
////////////////////////////////////////////////////////////////////////////////

/// Extends the enclosing list over the next form outside it:
/// `(foo|) bar` becomes `(foo bar|)`. The cursor lands between the slurped
/// text and the moved delimiter. No-op without an enclosing list or a form
/// to slurp.
pub fn slurp_forward(doc: &EditableDocument, offset: usize) -> EditSet {
    let span = span!(Level::DEBUG, "paredit::slurp_forward");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let (_, close) = match enclosing_list(model, offset) {
        Some(found) => found,
        None => {
            event!(Level::DEBUG, "no enclosing list");
            return noop;
        },
    };
    let close_raw = match close.token() {
        Some(t) => t.raw.to_string(),
        None    => return noop,
    };
    let close_start = close.offset_start();
    let close_end = close.offset_end();

    let mut next = close.clone();
    if !next.next() || !skip_trivia_forward(&mut next) {
        event!(Level::DEBUG, "nothing to slurp");
        return noop;
    }
    let sexp_end = match form_end_offset(&next) {
        Some(end) => end,
        None      => return noop,
    };

    let between = model.get_text(close_end, sexp_end);
    let edit = ModelEdit::change(
        Span::new(close_start, sexp_end),
        format!("{}{}", between, close_raw));
    EditSet::single(edit, Selection::cursor(close_start + between.len()))
}

/// Extends the enclosing list over the previous form outside it:
/// `bar (|foo)` becomes `(|bar foo)`. No-op without an enclosing list or a
/// form to slurp.
pub fn slurp_backward(doc: &EditableDocument, offset: usize) -> EditSet {
    let span = span!(Level::DEBUG, "paredit::slurp_backward");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let (open, _) = match enclosing_list(model, offset) {
        Some(found) => found,
        None => {
            event!(Level::DEBUG, "no enclosing list");
            return noop;
        },
    };
    let open_raw = match open.token() {
        Some(t) => t.raw.to_string(),
        None    => return noop,
    };
    let open_start = open.offset_start();
    let open_end = open.offset_end();

    let mut prev = open.clone();
    if !prev.previous() || !skip_trivia_backward(&mut prev) {
        event!(Level::DEBUG, "nothing to slurp");
        return noop;
    }
    let sexp_start = match form_start_offset(&prev) {
        Some(start) => start,
        None        => return noop,
    };

    let between = model.get_text(sexp_start, open_start);
    let edit = ModelEdit::change(
        Span::new(sexp_start, open_end),
        format!("{}{}", open_raw, between));
    EditSet::single(edit, Selection::cursor(sexp_start + open_raw.len()))
}

/// Expels the last form of the enclosing list: `(foo bar baz|)` becomes
/// `(foo bar|) baz`. The cursor is clamped into the shrunken list. No-op
/// without an enclosing list or with an empty one.
pub fn barf_forward(doc: &EditableDocument, offset: usize) -> EditSet {
    let span = span!(Level::DEBUG, "paredit::barf_forward");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let (open, close) = match enclosing_list(model, offset) {
        Some(found) => found,
        None => {
            event!(Level::DEBUG, "no enclosing list");
            return noop;
        },
    };
    let close_raw = match close.token() {
        Some(t) => t.raw.to_string(),
        None    => return noop,
    };

    // Walk back onto the last form of the list.
    let mut last = close.clone();
    if !last.previous() || !skip_trivia_backward(&mut last) {
        return noop;
    }
    if last == open {
        event!(Level::DEBUG, "nothing to barf");
        return noop;
    }
    // Move onto the first token of that form.
    if last.kind().map_or(false, |k| k.is_form_end()) && !last.backward_list()
    {
        return noop;
    }
    while last.is_type(TokenKind::StrInside) {
        if !last.previous() {
            return noop;
        }
    }

    // The close lands after whatever precedes that form.
    let mut before = last.clone();
    if !before.previous() || !skip_trivia_backward(&mut before) {
        return noop;
    }
    let new_close_pos = before.offset_end();
    let old_close_start = close.offset_start();
    let old_close_end = close.offset_end();

    let between = model.get_text(new_close_pos, old_close_start);
    let edit = ModelEdit::change(
        Span::new(new_close_pos, old_close_end),
        format!("{}{}", close_raw, between));
    EditSet::single(edit, Selection::cursor(offset.min(new_close_pos)))
}

/// Expels the first form of the enclosing list: `(|foo bar)` becomes
/// `foo (|bar)`. No-op without an enclosing list or with an empty one.
pub fn barf_backward(doc: &EditableDocument, offset: usize) -> EditSet {
    let span = span!(Level::DEBUG, "paredit::barf_backward");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let (open, close) = match enclosing_list(model, offset) {
        Some(found) => found,
        None => {
            event!(Level::DEBUG, "no enclosing list");
            return noop;
        },
    };
    let open_raw = match open.token() {
        Some(t) => t.raw.to_string(),
        None    => return noop,
    };

    // Walk onto the first form of the list.
    let mut first = open.clone();
    if !first.next() || !skip_trivia_forward(&mut first) {
        return noop;
    }
    if first == close {
        event!(Level::DEBUG, "nothing to barf");
        return noop;
    }
    // Move onto the last token of that form.
    if first.kind().map_or(false, |k| k.is_form_start())
        && !first.forward_list()
    {
        return noop;
    }

    // The open lands before whatever follows that form.
    let mut after = first.clone();
    if !after.next() || !skip_trivia_forward(&mut after) {
        return noop;
    }
    let new_open_pos = if after == close {
        close.offset_start()
    } else {
        after.offset_start()
    };
    let open_start = open.offset_start();
    let open_end = open.offset_end();

    let between = model.get_text(open_end, new_open_pos);
    let edit = ModelEdit::change(
        Span::new(open_start, new_open_pos),
        format!("{}{}", between, open_raw));
    EditSet::single(edit, Selection::cursor(offset.max(new_open_pos)))
}


////////////////////////////////////////////////////////////////////////////////
// Raise, splice, wrap.
////////////////////////////////////////////////////////////////////////////////

/// Replaces the enclosing list with the current form:
/// `(outer (|inner) stuff)` becomes `(outer |inner stuff)`.
pub fn raise(doc: &EditableDocument, offset: usize) -> EditSet {
    let span = span!(Level::DEBUG, "paredit::raise");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let cursor = model.get_token_cursor(offset);
    let current = match cursor.range_for_current_form() {
        Some(range) => range,
        None        => return noop,
    };
    let mut up = cursor.clone();
    if !up.up_list() {
        event!(Level::DEBUG, "no enclosing list");
        return noop;
    }
    let parent = match up.range_for_current_form() {
        Some(range) => range,
        None        => return noop,
    };
    if !parent.encloses(current) {
        return noop;
    }

    let text = model.get_text(current.start, current.end);
    let edit = ModelEdit::change(parent, text);
    EditSet::single(edit, Selection::cursor(parent.start))
}

/// Removes the delimiters of the enclosing list: `(|foo bar)` becomes
/// `|foo bar`.
pub fn splice(doc: &EditableDocument, offset: usize) -> EditSet {
    let span = span!(Level::DEBUG, "paredit::splice");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let (open, close) = match enclosing_list(model, offset) {
        Some(found) => found,
        None => {
            event!(Level::DEBUG, "no enclosing list");
            return noop;
        },
    };
    let open_len = open.token().map_or(0, |t| t.len());
    let open_start = open.offset_start();

    let content = model.get_text(open.offset_end(), close.offset_start());
    let edit = ModelEdit::change(
        Span::new(open_start, close.offset_end()),
        content);
    let active = if offset > open_start {
        offset - open_len
    } else {
        offset
    };
    EditSet::single(edit, Selection::cursor(active))
}

/// Wraps the current form in the given delimiters. The cursor lands after
/// the wrapped content, before the inserted close.
pub fn wrap(doc: &EditableDocument, offset: usize, open: &str, close: &str)
    -> EditSet
{
    let span = span!(Level::DEBUG, "paredit::wrap");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let current = match model
        .get_token_cursor(offset)
        .range_for_current_form()
    {
        Some(range) => range,
        None        => return noop,
    };

    let text = model.get_text(current.start, current.end);
    let edit = ModelEdit::change(
        current,
        format!("{}{}{}", open, text, close));
    EditSet::single(
        edit,
        Selection::cursor(current.start + open.len() + text.len()))
}

/// Replaces the enclosing list's delimiters with the given pair.
pub fn rewrap(doc: &EditableDocument, offset: usize, open: &str, close: &str)
    -> EditSet
{
    let span = span!(Level::DEBUG, "paredit::rewrap");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let (old_open, old_close) = match enclosing_list(model, offset) {
        Some(found) => found,
        None => {
            event!(Level::DEBUG, "no enclosing list");
            return noop;
        },
    };
    let old_open_len = old_open.token().map_or(0, |t| t.len());
    let start = old_open.offset_start();

    let content = model.get_text(
        old_open.offset_end(),
        old_close.offset_start());
    let edit = ModelEdit::change(
        Span::new(start, old_close.offset_end()),
        format!("{}{}{}", open, content, close));
    let active = if offset > start {
        (offset + open.len())
            .saturating_sub(old_open_len)
            .max(start + open.len())
            .min(start + open.len() + content.len())
    } else {
        offset
    };
    EditSet::single(edit, Selection::cursor(active))
}


////////////////////////////////////////////////////////////////////////////////
// Transpose.
////////////////////////////////////////////////////////////////////////////////

/// Swaps the current form with the next one, preserving the whitespace
/// between them. The cursor lands at the end of the moved form. From
/// whitespace, the previous form is transposed with the next.
pub fn transpose(doc: &EditableDocument, offset: usize) -> EditSet {
    let span = span!(Level::DEBUG, "paredit::transpose");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    let model = doc.model();
    let mut cursor = model.get_token_cursor(offset);
    if cursor.is_whitespace() && !cursor.backward_sexp(true) {
        return noop;
    }
    let a = match cursor.range_for_current_form() {
        Some(range) => range,
        None        => return noop,
    };

    let mut next = model.get_token_cursor(a.end);
    if next.token().is_none() || a.end >= next.offset_end() {
        if !next.next() {
            return noop;
        }
    }
    if !skip_trivia_forward(&mut next) {
        return noop;
    }
    if next.kind().map_or(true, |k| k.is_form_end()) {
        event!(Level::DEBUG, "nothing to transpose with");
        return noop;
    }
    let b = match next.range_for_current_form() {
        Some(range) => range,
        None        => return noop,
    };
    if b.start < a.end {
        return noop;
    }

    let a_text = model.get_text(a.start, a.end);
    let ws = model.get_text(a.end, b.start);
    let b_text = model.get_text(b.start, b.end);
    let edit = ModelEdit::change(
        Span::new(a.start, b.end),
        format!("{}{}{}", b_text, ws, a_text));
    EditSet::single(edit, Selection::cursor(b.end))
}


////////////////////////////////////////////////////////////////////////////////
// Kill.
////////////////////////////////////////////////////////////////////////////////

/// Deletes the given range, placing the cursor at its start and carrying
/// the killed text.
pub fn kill_range(doc: &EditableDocument, range: Span) -> EditSet {
    let span = span!(Level::DEBUG, "paredit::kill_range");
    let _enter = span.enter();

    let noop = EditSet::noop(doc.selections());
    if range.is_empty()
        || range.start > range.end
        || range.end > doc.model().len()
    {
        return noop;
    }

    let killed = doc.model().get_text(range.start, range.end);
    EditSet::single(
            ModelEdit::delete(range),
            Selection::cursor(range.start))
        .with_killed(killed)
}

/// Deletes forward over one sexp from the given offset.
pub fn kill_forward_sexp(doc: &EditableDocument, offset: usize) -> EditSet {
    kill_range(doc, forward_sexp_range(doc.model(), offset))
}

/// Deletes backward over one sexp from the given offset.
pub fn kill_backward_sexp(doc: &EditableDocument, offset: usize) -> EditSet {
    kill_range(doc, backward_sexp_range(doc.model(), offset))
}

/// Deletes from the given offset to just inside the closing delimiter of
/// the enclosing list.
pub fn kill_to_end_of_list(doc: &EditableDocument, offset: usize) -> EditSet {
    let noop = EditSet::noop(doc.selections());
    let (_, close) = match enclosing_list(doc.model(), offset) {
        Some(found) => found,
        None        => return noop,
    };
    let end = close.offset_start();
    if end <= offset {
        return noop;
    }
    kill_range(doc, Span::new(offset, end))
}

/// Deletes from just inside the opening delimiter of the enclosing list to
/// the given offset.
pub fn kill_to_start_of_list(doc: &EditableDocument, offset: usize)
    -> EditSet
{
    let noop = EditSet::noop(doc.selections());
    let (open, _) = match enclosing_list(doc.model(), offset) {
        Some(found) => found,
        None        => return noop,
    };
    let start = open.offset_end();
    if start >= offset {
        return noop;
    }
    kill_range(doc, Span::new(start, offset))
}
