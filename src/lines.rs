////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Line-cached document tokenization.
////////////////////////////////////////////////////////////////////////////////

// Local imports.
use crate::cursor::TokenCursor;
use crate::delimiter::DelimiterSet;
use crate::lexer::Scanner;
use crate::span::Pos;
use crate::token::ScannerState;
use crate::token::Token;

// External library imports.
use tracing::event;
use tracing::Level;
use tracing::span;


////////////////////////////////////////////////////////////////////////////////
// TextLine
////////////////////////////////////////////////////////////////////////////////
/// A single tokenized line of the document.
///
/// Invariants: re-tokenizing `text` with `start_state` yields `tokens`;
/// consuming every token leaves the scanner in `end_state`; and the
/// `end_state` of line `i` equals the `start_state` of line `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    /// The text of the line, without its terminator.
    text: Box<str>,
    /// The tokens of the line.
    tokens: Vec<Token>,
    /// The scanner state inbound to the line.
    start_state: ScannerState,
    /// The scanner state after the line.
    end_state: ScannerState,
}

impl TextLine {
    /// Returns the text of the line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the byte length of the line, excluding its terminator.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the line is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the tokens of the line.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens[..]
    }

    /// Returns the scanner state inbound to the line.
    pub fn start_state(&self) -> &ScannerState {
        &self.start_state
    }

    /// Returns the scanner state after the line.
    pub fn end_state(&self) -> &ScannerState {
        &self.end_state
    }
}


////////////////////////////////////////////////////////////////////////////////
// LineModel
////////////////////////////////////////////////////////////////////////////////
/// A tokenized document, cached line by line.
///
/// Offsets are byte offsets into the LF-normalized text: one byte separates
/// adjacent lines regardless of the terminators in the source. Every
/// mutation retokenizes through `update`, which bumps the version counter;
/// token cursors borrow the model, so no cursor can outlive the tokens it
/// walks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineModel {
    /// The owning scanner.
    scanner: Scanner,
    /// The tokenized lines. Never empty; an empty document has one empty
    /// line.
    lines: Vec<TextLine>,
    /// The version counter, incremented by every `update`.
    version: u64,
}

impl LineModel {
    /// Constructs a new LineModel by tokenizing the given text.
    pub fn new(text: &str, scanner: Scanner) -> Self {
        let lines = tokenize(text, &scanner);
        LineModel {
            scanner,
            lines,
            version: 0,
        }
    }

    /// Returns the model's scanner.
    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Returns the model's delimiter pairs.
    pub fn delimiters(&self) -> &DelimiterSet {
        self.scanner.delimiters()
    }

    /// Returns the tokenized lines.
    pub fn lines(&self) -> &[TextLine] {
        &self.lines[..]
    }

    /// Returns the number of lines in the document.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the line with the given index.
    pub fn line(&self, idx: usize) -> Option<&TextLine> {
        self.lines.get(idx)
    }

    /// Returns the model version. Each `update` increments it.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the total byte length of the document: the sum of the line
    /// lengths plus one byte per line separator.
    pub fn len(&self) -> usize {
        let text_len: usize = self.lines.iter().map(TextLine::len).sum();
        text_len + (self.lines.len() - 1)
    }

    /// Returns true if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the byte offset of the start of the given line. A line index
    /// past the end yields the document length.
    pub fn offset_for_line(&self, line: usize) -> usize {
        if line >= self.lines.len() {
            return self.len();
        }
        self.lines[..line]
            .iter()
            .map(|l| l.len() + 1)
            .sum()
    }

    /// Converts a byte offset into a line/column position. Offsets past the
    /// end clamp to the end of the last line.
    pub fn offset_to_position(&self, offset: usize) -> Pos {
        let mut remaining = offset;
        for (idx, line) in self.lines.iter().enumerate() {
            if remaining <= line.len() {
                return Pos::new(idx, remaining);
            }
            remaining -= line.len() + 1;
        }
        let last = self.lines.len() - 1;
        Pos::new(last, self.lines[last].len())
    }

    /// Converts a line/column position into a byte offset, clamping the
    /// column to the line length.
    pub fn position_to_offset(&self, pos: Pos) -> usize {
        if pos.line >= self.lines.len() {
            return self.len();
        }
        self.offset_for_line(pos.line)
            + pos.column.min(self.lines[pos.line].len())
    }

    /// Returns the text between the given byte offsets, with `\n` between
    /// lines. Offsets are clamped to the document.
    pub fn get_text(&self, start: usize, end: usize) -> String {
        let len = self.len();
        let start = start.min(len);
        let end = end.min(len);
        if start >= end {
            return String::new();
        }

        let s = self.offset_to_position(start);
        let e = self.offset_to_position(end);
        // Columns are clamped to character boundaries.
        let s_col = floor_char_boundary(self.lines[s.line].text(), s.column);
        let e_col = floor_char_boundary(self.lines[e.line].text(), e.column);
        if s.line == e.line {
            return self.lines[s.line].text()[s_col..e_col.max(s_col)]
                .to_string();
        }

        let mut out = String::with_capacity(end - start);
        out.push_str(&self.lines[s.line].text()[s_col..]);
        for line in &self.lines[(s.line + 1)..e.line] {
            out.push('\n');
            out.push_str(line.text());
        }
        out.push('\n');
        out.push_str(&self.lines[e.line].text()[..e_col]);
        out
    }

    /// Returns a token cursor positioned on the token containing the given
    /// byte offset: the token with the greatest in-line offset not
    /// exceeding the offset's column.
    pub fn get_token_cursor(&self, offset: usize) -> TokenCursor<'_> {
        let pos = self.offset_to_position(offset.min(self.len()));
        let tokens = self.lines[pos.line].tokens();
        let token = tokens
            .partition_point(|t| t.offset <= pos.column)
            .saturating_sub(1);
        TokenCursor::new(self, pos.line, token)
    }

    /// Replaces the document text, retokenizing every line and bumping the
    /// version counter.
    // TODO: Retokenize only the lines whose inbound state or text changed.
    pub fn update(&mut self, text: &str) {
        let span = span!(Level::DEBUG, "LineModel::update");
        let _enter = span.enter();

        self.lines = tokenize(text, &self.scanner);
        self.version += 1;
        event!(Level::DEBUG, version = self.version, "model updated");
    }
}


/// Returns the greatest char boundary of `text` not exceeding `idx`.
fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Splits the given text on `\r?\n` and tokenizes each line, threading
/// scanner state across lines.
fn tokenize(text: &str, scanner: &Scanner) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut state = ScannerState::new();
    for part in text.split('\n') {
        let part = part.strip_suffix('\r').unwrap_or(part);
        let tokens = scanner.process_line(part, &state);
        let end_state = tokens
            .last()
            .map(|t| t.state.clone())
            .unwrap_or_else(|| state.clone());
        lines.push(TextLine {
            text: part.into(),
            tokens,
            start_state: state,
            end_state: end_state.clone(),
        });
        state = end_state;
    }
    lines
}
