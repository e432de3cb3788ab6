////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Pure sexp range computations.
////////////////////////////////////////////////////////////////////////////////

// Local imports.
use crate::cursor::TokenCursor;
use crate::document::Selection;
use crate::lines::LineModel;
use crate::span::Span;
use crate::token::TokenKind;


/// Steps the cursor forward over whitespace, comments, and tokenless
/// (empty-line) positions. Returns false if the document ends first.
pub(crate) fn skip_trivia_forward(cursor: &mut TokenCursor<'_>) -> bool {
    while cursor.is_trivia() || cursor.token().is_none() {
        if !cursor.next() {
            return false;
        }
    }
    true
}

/// Steps the cursor backward over whitespace, comments, and tokenless
/// positions, leaving it on the first non-trivia token. Returns false if
/// the document starts first.
pub(crate) fn skip_trivia_backward(cursor: &mut TokenCursor<'_>) -> bool {
    while cursor.is_trivia() || cursor.token().is_none() {
        if !cursor.previous() {
            return false;
        }
    }
    true
}

/// Locates the list enclosing the given offset, returning cursors on its
/// opening and closing delimiters. Returns None at top level or when the
/// list is unmatched.
pub(crate) fn enclosing_list(model: &LineModel, offset: usize)
    -> Option<(TokenCursor<'_>, TokenCursor<'_>)>
{
    let mut cursor = model.get_token_cursor(offset);
    // A position at or past the resolved token's end lies between tokens;
    // the enclosing list is the next token's.
    if cursor.token().is_none() || offset >= cursor.offset_end() {
        if !cursor.next() {
            return None;
        }
    }
    let mut open = cursor;
    if !open.up_list() {
        return None;
    }
    let mut close = open.clone();
    if !close.forward_list() {
        return None;
    }
    Some((open, close))
}


////////////////////////////////////////////////////////////////////////////////
// Sexp ranges.
////////////////////////////////////////////////////////////////////////////////

/// Returns the range from the given offset to the end of the next sexp.
/// Does not cross the closing delimiter of the enclosing list or string;
/// returns the empty range at the offset when nothing is reachable.
pub fn forward_sexp_range(model: &LineModel, offset: usize) -> Span {
    let offset = offset.min(model.len());
    let noop = Span::new_at(offset);

    let mut cursor = model.get_token_cursor(offset);
    if cursor.token().is_none() || offset >= cursor.offset_end() {
        if !cursor.next() {
            return noop;
        }
    }
    if !skip_trivia_forward(&mut cursor) {
        return noop;
    }

    use TokenKind::*;
    match cursor.kind() {
        Some(Open) | Some(StrStart) => if cursor.forward_list() {
            Span::new(offset, cursor.offset_end())
        } else {
            noop
        },
        Some(StrInside) => {
            // Stop before the closing quote.
            let mut end = cursor.offset_end();
            while cursor.is_type(StrInside) {
                end = cursor.offset_end();
                if !cursor.next() {
                    break;
                }
            }
            Span::new(offset, end)
        },
        Some(Close) | Some(StrEnd) | None => noop,
        Some(_) => Span::new(offset, cursor.offset_end()),
    }
}

/// Returns the range from the start of the previous sexp to the given
/// offset. Does not cross the opening delimiter of the enclosing list or
/// string; returns the empty range at the offset when nothing precedes.
pub fn backward_sexp_range(model: &LineModel, offset: usize) -> Span {
    let offset = offset.min(model.len());
    let noop = Span::new_at(offset);

    let mut cursor = model.get_token_cursor(offset);
    // A position at or before the resolved token's start belongs to the
    // previous sexp.
    if cursor.token().is_none() || offset <= cursor.offset_start() {
        if !cursor.previous() {
            return noop;
        }
    }
    if !skip_trivia_backward(&mut cursor) {
        return noop;
    }

    use TokenKind::*;
    match cursor.kind() {
        Some(Close) | Some(StrEnd) => if cursor.backward_list() {
            Span::new(cursor.offset_start(), offset)
        } else {
            noop
        },
        Some(StrInside) => {
            // Stop after the opening quote.
            let mut start = cursor.offset_start();
            while cursor.is_type(StrInside) {
                start = cursor.offset_start();
                if !cursor.previous() {
                    break;
                }
            }
            Span::new(start, offset)
        },
        Some(Open) | Some(StrStart) | None => noop,
        Some(_) => Span::new(cursor.offset_start(), offset),
    }
}

/// Like `forward_sexp_range`, but when the next token is the closing
/// delimiter of the enclosing list or string, the range extends past it
/// instead of failing.
pub fn forward_sexp_or_up_range(model: &LineModel, offset: usize) -> Span {
    let range = forward_sexp_range(model, offset);
    if !range.is_empty() {
        return range;
    }

    let offset = offset.min(model.len());
    let noop = Span::new_at(offset);
    let mut cursor = model.get_token_cursor(offset);
    if cursor.token().is_none() || offset >= cursor.offset_end() {
        if !cursor.next() {
            return noop;
        }
    }
    if !skip_trivia_forward(&mut cursor) {
        return noop;
    }
    if cursor.kind().map_or(false, |k| k.is_form_end()) {
        Span::new(offset, cursor.offset_end())
    } else {
        noop
    }
}

/// Like `backward_sexp_range`, but when the previous token is the opening
/// delimiter of the enclosing list or string, the range extends past it
/// instead of failing.
pub fn backward_sexp_or_up_range(model: &LineModel, offset: usize) -> Span {
    let range = backward_sexp_range(model, offset);
    if !range.is_empty() {
        return range;
    }

    let offset = offset.min(model.len());
    let noop = Span::new_at(offset);
    let mut cursor = model.get_token_cursor(offset);
    if cursor.token().is_none() || offset <= cursor.offset_start() {
        if !cursor.previous() {
            return noop;
        }
    }
    if !skip_trivia_backward(&mut cursor) {
        return noop;
    }
    if cursor.kind().map_or(false, |k| k.is_form_start()) {
        Span::new(cursor.offset_start(), offset)
    } else {
        noop
    }
}


////////////////////////////////////////////////////////////////////////////////
// List ranges.
////////////////////////////////////////////////////////////////////////////////

/// Returns the range from the given offset to the closing delimiter of the
/// enclosing list, positioned on the close. A cursor exactly on a closing
/// delimiter escapes past it first, so the range reaches the next level
/// out.
pub fn range_to_forward_up_list(model: &LineModel, offset: usize) -> Span {
    let offset = offset.min(model.len());
    let noop = Span::new_at(offset);

    let mut cursor = model.get_token_cursor(offset);
    if cursor.kind().map_or(false, |k| k.is_form_end())
        && offset == cursor.offset_start()
    {
        if !cursor.next() {
            return noop;
        }
    }
    if !cursor.up_list() {
        return noop;
    }
    if !cursor.forward_list() {
        return noop;
    }
    let end = cursor.offset_start();
    if end < offset {
        return noop;
    }
    Span::new(offset, end)
}

/// Returns the range from the opening delimiter of the enclosing list to
/// the given offset.
pub fn range_to_backward_up_list(model: &LineModel, offset: usize) -> Span {
    let offset = offset.min(model.len());
    let noop = Span::new_at(offset);

    let mut cursor = model.get_token_cursor(offset);
    if !cursor.up_list() {
        return noop;
    }
    let start = cursor.offset_start();
    if start > offset {
        return noop;
    }
    Span::new(start, offset)
}

/// Returns the range from the given offset to just inside the next opening
/// delimiter. Returns the empty range if a closing delimiter comes first.
pub fn range_to_forward_down_list(model: &LineModel, offset: usize) -> Span {
    let offset = offset.min(model.len());
    let noop = Span::new_at(offset);

    let mut cursor = model.get_token_cursor(offset);
    if cursor.token().is_none() || offset >= cursor.offset_end() {
        if !cursor.next() {
            return noop;
        }
    }
    loop {
        match cursor.kind() {
            Some(kind) if kind.is_form_start() => {
                return Span::new(offset, cursor.offset_end());
            },
            Some(kind) if kind.is_form_end() => return noop,
            _ => {
                if !cursor.next() {
                    return noop;
                }
            },
        }
    }
}

/// Returns the range from just inside the end of the previous list to the
/// given offset. Returns the empty range if an opening delimiter comes
/// first.
pub fn range_to_backward_down_list(model: &LineModel, offset: usize) -> Span {
    let offset = offset.min(model.len());
    let noop = Span::new_at(offset);

    let mut cursor = model.get_token_cursor(offset);
    if cursor.token().is_none() || offset <= cursor.offset_start() {
        if !cursor.previous() {
            return noop;
        }
    }
    loop {
        match cursor.kind() {
            Some(kind) if kind.is_form_end() => {
                return Span::new(cursor.offset_start(), offset);
            },
            Some(kind) if kind.is_form_start() => return noop,
            _ => {
                if !cursor.previous() {
                    return noop;
                }
            },
        }
    }
}


////////////////////////////////////////////////////////////////////////////////
// Form ranges.
////////////////////////////////////////////////////////////////////////////////

/// Returns the range of the form at the given offset: the whole list or
/// string when on a delimiter, the atom itself otherwise.
pub fn range_for_current_form(model: &LineModel, offset: usize) -> Span {
    let offset = offset.min(model.len());
    model.get_token_cursor(offset)
        .range_for_current_form()
        .unwrap_or_else(|| Span::new_at(offset))
}

/// Returns the range of the top-level form enclosing the given offset.
pub fn range_for_defun(model: &LineModel, offset: usize) -> Span {
    let offset = offset.min(model.len());
    model.get_token_cursor(offset)
        .range_for_defun()
        .unwrap_or_else(|| Span::new_at(offset))
}


////////////////////////////////////////////////////////////////////////////////
// Multi-cursor application.
////////////////////////////////////////////////////////////////////////////////

/// Applies a range computation to the active offset of every selection,
/// each against the same pre-operation model.
pub fn ranges<F>(model: &LineModel, selections: &[Selection], f: F)
    -> Vec<Span>
    where F: Fn(&LineModel, usize) -> Span,
{
    selections
        .iter()
        .map(|s| (f)(model, s.active))
        .collect()
}
