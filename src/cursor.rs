////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Sexp-aware token cursor.
////////////////////////////////////////////////////////////////////////////////

// Local imports.
use crate::lines::LineModel;
use crate::span::Span;
use crate::token::Token;
use crate::token::TokenKind;

// External library imports.
use tracing::Level;
use tracing::span;


////////////////////////////////////////////////////////////////////////////////
// TokenCursor
////////////////////////////////////////////////////////////////////////////////
/// A logical position over a tokenized document, identified by a line index
/// and a token index within the line.
///
/// The cursor borrows its `LineModel`, so it cannot outlive the tokens it
/// walks; any document mutation requires dropping the cursor first. All
/// navigation methods mutate the cursor in place and return `bool` success;
/// on failure the cursor position is left unchanged.
///
/// Single-token stepping and sexp-aware navigation live on this one type;
/// the sexp methods treat a string (`str-start` .. `str-end`) as a list.
#[derive(Clone)]
pub struct TokenCursor<'m> {
    /// The tokenized document.
    model: &'m LineModel,
    /// The line index of the cursor.
    line: usize,
    /// The token index of the cursor within the line.
    token: usize,
}

impl<'m> TokenCursor<'m> {
    /// Constructs a new TokenCursor at the given position.
    pub(crate) fn new(model: &'m LineModel, line: usize, token: usize)
        -> Self
    {
        TokenCursor { model, line, token }
    }

    /// Returns the cursor's line index.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the cursor's token index within its line.
    pub fn token_index(&self) -> usize {
        self.token
    }

    /// Repositions the cursor, clamping to the document.
    pub fn set(&mut self, line: usize, token: usize) {
        self.line = line.min(self.model.line_count() - 1);
        let count = self.line_tokens().len();
        self.token = if count == 0 { 0 } else { token.min(count - 1) };
    }

    /// Returns the tokens of the cursor's line.
    fn line_tokens(&self) -> &'m [Token] {
        let model: &'m LineModel = self.model;
        model
            .line(self.line)
            .map(|l| l.tokens())
            .unwrap_or(&[])
    }

    /// Returns the token under the cursor, if any. A cursor on an empty
    /// line has no token.
    pub fn token(&self) -> Option<&'m Token> {
        self.line_tokens().get(self.token)
    }

    /// Returns the kind of the token under the cursor.
    pub fn kind(&self) -> Option<TokenKind> {
        self.token().map(|t| t.kind)
    }

    /// Returns true if the token under the cursor has the given kind.
    pub fn is_type(&self, kind: TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    /// Returns true if the cursor is on a whitespace token.
    pub fn is_whitespace(&self) -> bool {
        self.kind().map_or(false, |k| k.is_whitespace())
    }

    /// Returns true if the cursor is on a comment token.
    pub fn is_comment(&self) -> bool {
        self.is_type(TokenKind::Comment)
    }

    /// Returns true if the cursor is on a whitespace or comment token.
    pub fn is_trivia(&self) -> bool {
        self.is_whitespace() || self.is_comment()
    }

    /// Returns the absolute byte offset of the start of the current token.
    pub fn offset_start(&self) -> usize {
        self.model.offset_for_line(self.line)
            + self.token().map_or(0, |t| t.offset)
    }

    /// Returns the absolute byte offset one past the end of the current
    /// token.
    pub fn offset_end(&self) -> usize {
        self.model.offset_for_line(self.line)
            + self.token().map_or(0, |t| t.end_offset())
    }

    /// Steps to the next token, crossing line boundaries. Returns false at
    /// the end of the document, leaving the cursor unchanged.
    pub fn next(&mut self) -> bool {
        if self.token + 1 < self.line_tokens().len() {
            self.token += 1;
            return true;
        }
        let mut line = self.line + 1;
        while line < self.model.line_count() {
            if !self.model.line(line).map_or(true, |l| l.tokens().is_empty()) {
                self.line = line;
                self.token = 0;
                return true;
            }
            line += 1;
        }
        false
    }

    /// Steps to the previous token, crossing line boundaries. Returns false
    /// at the start of the document, leaving the cursor unchanged.
    pub fn previous(&mut self) -> bool {
        if self.token > 0 && !self.line_tokens().is_empty() {
            self.token -= 1;
            return true;
        }
        let mut line = self.line;
        while line > 0 {
            line -= 1;
            let count = self.model
                .line(line)
                .map_or(0, |l| l.tokens().len());
            if count > 0 {
                self.line = line;
                self.token = count - 1;
                return true;
            }
        }
        false
    }

    /// Returns true if no token precedes the cursor.
    pub fn at_start(&self) -> bool {
        !self.clone().previous()
    }

    /// Returns true if the cursor is on or past the last token of the
    /// document.
    pub fn at_end(&self) -> bool {
        !self.clone().next()
    }

    /// Restores a saved cursor position.
    fn restore(&mut self, save: (usize, usize)) {
        self.line = save.0;
        self.token = save.1;
    }


    ////////////////////////////////////////////////////////////////////////
    // Sexp-aware navigation.
    ////////////////////////////////////////////////////////////////////////

    /// From an opening delimiter, scans forward to the matching close and
    /// stops on it. Matching is pair-specific: only tokens of the same pair
    /// affect the depth count. Returns false (cursor unchanged) if the
    /// cursor is not on an open or the delimiter is unmatched.
    pub fn forward_list(&mut self) -> bool {
        let span = span!(Level::DEBUG, "TokenCursor::forward_list");
        let _enter = span.enter();

        let save = (self.line, self.token);
        let open = match self.token() {
            Some(t) if t.kind.is_form_start() => t,
            _ => return false,
        };
        let open_char = match open.first_char() {
            Some(c) => c,
            None    => return false,
        };
        let close_char = match self.model.delimiters().matching_close(open_char)
        {
            Some(c) => c,
            None    => return false,
        };

        let mut depth: usize = 0;
        loop {
            if let Some(tok) = self.token() {
                if tok.kind.is_form_start()
                    && tok.first_char() == Some(open_char)
                {
                    depth += 1;
                } else if tok.kind.is_form_end()
                    && tok.first_char() == Some(close_char)
                {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return true;
                    }
                }
            }
            if !self.next() {
                self.restore(save);
                return false;
            }
        }
    }

    /// From a closing delimiter, scans backward to the matching open and
    /// stops on it. Returns false (cursor unchanged) if the cursor is not
    /// on a close or the delimiter is unmatched.
    pub fn backward_list(&mut self) -> bool {
        let span = span!(Level::DEBUG, "TokenCursor::backward_list");
        let _enter = span.enter();

        let save = (self.line, self.token);
        let close = match self.token() {
            Some(t) if t.kind.is_form_end() => t,
            _ => return false,
        };
        let close_char = match close.first_char() {
            Some(c) => c,
            None    => return false,
        };
        let open_char = match self.model.delimiters().matching_open(close_char)
        {
            Some(c) => c,
            None    => return false,
        };

        let mut depth: usize = 0;
        loop {
            if let Some(tok) = self.token() {
                if tok.kind.is_form_end()
                    && tok.first_char() == Some(close_char)
                {
                    depth += 1;
                } else if tok.kind.is_form_start()
                    && tok.first_char() == Some(open_char)
                {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return true;
                    }
                }
            }
            if !self.previous() {
                self.restore(save);
                return false;
            }
        }
    }

    /// Moves forward over one sexp: a whole list or string when on its
    /// opening delimiter, otherwise a single token. Whitespace and comments
    /// before the sexp are skipped when `skip_trivia` is set. Returns false
    /// (cursor unchanged) when nothing remains.
    pub fn forward_sexp(&mut self, skip_trivia: bool) -> bool {
        let save = (self.line, self.token);
        loop {
            let kind = match self.kind() {
                Some(kind) => kind,
                None => {
                    if !self.next() {
                        self.restore(save);
                        return false;
                    }
                    continue;
                },
            };

            use TokenKind::*;
            match kind {
                Ws | WsNl | Comment => {
                    if !skip_trivia || !self.next() {
                        self.restore(save);
                        return false;
                    }
                },
                Open | StrStart => {
                    if !self.forward_list() {
                        self.restore(save);
                        return false;
                    }
                    let _ = self.next();
                    return true;
                },
                Close | StrEnd | StrInside | Id | Junk => {
                    let _ = self.next();
                    return true;
                },
            }
        }
    }

    /// Moves backward over one sexp, stopping on its first token: the
    /// opening delimiter of a list or string, or the atom itself. Returns
    /// false (cursor unchanged) when nothing precedes.
    pub fn backward_sexp(&mut self, skip_trivia: bool) -> bool {
        let save = (self.line, self.token);
        if !self.previous() {
            return false;
        }
        loop {
            let kind = match self.kind() {
                Some(kind) => kind,
                None => {
                    if !self.previous() {
                        self.restore(save);
                        return false;
                    }
                    continue;
                },
            };

            use TokenKind::*;
            match kind {
                Ws | WsNl | Comment => {
                    if !skip_trivia || !self.previous() {
                        self.restore(save);
                        return false;
                    }
                },
                Close | StrEnd => {
                    if self.backward_list() {
                        return true;
                    }
                    self.restore(save);
                    return false;
                },
                StrInside => {
                    while self.is_type(StrInside) {
                        if !self.previous() {
                            self.restore(save);
                            return false;
                        }
                    }
                    return true;
                },
                Open | StrStart | Id | Junk => return true,
            }
        }
    }

    /// Moves backward out of the enclosing list, stopping on its opening
    /// delimiter. Returns false (cursor unchanged) at top level.
    pub fn up_list(&mut self) -> bool {
        let save = (self.line, self.token);
        let mut depth: usize = 0;
        loop {
            if !self.previous() {
                self.restore(save);
                return false;
            }
            match self.kind() {
                Some(kind) if kind.is_form_end() => depth += 1,
                Some(kind) if kind.is_form_start() => {
                    if depth == 0 {
                        return true;
                    }
                    depth -= 1;
                },
                _ => (),
            }
        }
    }

    /// Moves forward to the first child list of the current position,
    /// stopping on its opening delimiter. From an opening delimiter the
    /// search begins inside the list. Returns false (cursor unchanged) if a
    /// closing delimiter is reached first.
    pub fn down_list(&mut self) -> bool {
        let save = (self.line, self.token);
        if self.kind().map_or(false, |k| k.is_form_start()) {
            if !self.next() {
                self.restore(save);
                return false;
            }
        }
        loop {
            match self.kind() {
                Some(kind) if kind.is_form_start() => return true,
                Some(kind) if kind.is_form_end() => {
                    self.restore(save);
                    return false;
                },
                _ => {
                    if !self.next() {
                        self.restore(save);
                        return false;
                    }
                },
            }
        }
    }

    /// Skips forward over whitespace tokens. Returns true if the cursor
    /// ends on a non-whitespace token.
    pub fn forward_whitespace(&mut self) -> bool {
        while self.is_whitespace() {
            if !self.next() {
                return false;
            }
        }
        true
    }

    /// Skips backward over whitespace tokens, leaving the cursor on the
    /// first non-whitespace token encountered. Returns true if the cursor
    /// ends on a non-whitespace token.
    pub fn backward_whitespace(&mut self) -> bool {
        while self.is_whitespace() {
            if !self.previous() {
                return false;
            }
        }
        true
    }

    /// Returns the range of the form at the cursor: the whole list or
    /// string when on a delimiter or string content, the token itself when
    /// on an atom. On whitespace the next form is preferred, falling back
    /// to the previous one. Returns None if no form is resolvable.
    pub fn range_for_current_form(&self) -> Option<Span> {
        let tok = self.token()?;
        use TokenKind::*;
        match tok.kind {
            Open | StrStart => {
                let mut close = self.clone();
                if !close.forward_list() {
                    return None;
                }
                Some(Span::new(self.offset_start(), close.offset_end()))
            },
            Close | StrEnd => {
                let mut open = self.clone();
                if !open.backward_list() {
                    return None;
                }
                Some(Span::new(open.offset_start(), self.offset_end()))
            },
            StrInside => {
                let mut start = self.clone();
                while start.is_type(StrInside) {
                    if !start.previous() {
                        return None;
                    }
                }
                if start.is_type(StrStart) {
                    start.range_for_current_form()
                } else {
                    None
                }
            },
            Ws | WsNl | Comment => {
                let mut fwd = self.clone();
                loop {
                    if !fwd.next() {
                        break;
                    }
                    if fwd.is_trivia() || fwd.token().is_none() {
                        continue;
                    }
                    if fwd.kind().map_or(false, |k| k.is_form_end()) {
                        break;
                    }
                    return fwd.range_for_current_form();
                }
                let mut bck = self.clone();
                loop {
                    if !bck.previous() {
                        return None;
                    }
                    if bck.is_trivia() || bck.token().is_none() {
                        continue;
                    }
                    if bck.kind().map_or(false, |k| k.is_form_start()) {
                        return None;
                    }
                    return bck.range_for_current_form();
                }
            },
            Id | Junk => {
                Some(Span::new(self.offset_start(), self.offset_end()))
            },
        }
    }

    /// Returns the range of the top-level form enclosing the cursor.
    pub fn range_for_defun(&self) -> Option<Span> {
        let mut outer = self.clone();
        loop {
            let mut probe = outer.clone();
            if probe.up_list() {
                outer = probe;
            } else {
                break;
            }
        }
        outer.range_for_current_form()
    }
}

impl<'m> PartialEq for TokenCursor<'m> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.model, other.model)
            && self.line == other.line
            && self.token == other.token
    }
}

impl<'m> std::fmt::Debug for TokenCursor<'m> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCursor")
            .field("line", &self.line)
            .field("token", &self.token)
            .field("version", &self.model.version())
            .finish()
    }
}
