////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Lexer definitions.
////////////////////////////////////////////////////////////////////////////////

// Local imports.
use crate::delimiter::DelimiterSet;
use crate::token::ScannerState;
use crate::token::Token;
use crate::token::TokenKind;

// External library imports.
use tracing::Level;
use tracing::span;


/// The symmetric delimiter which toggles string state. Other symmetric
/// delimiters open and close through the nesting stack without entering a
/// string.
const STRING_DELIMITER: char = '"';


////////////////////////////////////////////////////////////////////////////////
// Scanner
////////////////////////////////////////////////////////////////////////////////
/// A stateless-per-line tokenizer for a configurable set of delimiter pairs.
///
/// Each call to `process_line` consumes one line of text together with the
/// inbound `ScannerState` and produces tokens which partition the text
/// exactly. String state and the symmetric-delimiter stack are threaded
/// through the state so that strings may span lines.
///
/// The scanner is comment-agnostic: `;`, `#`, `//` and the like are ordinary
/// atom characters. Layers with access to an external grammar may rewrite
/// token spans to `TokenKind::Comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    /// The delimiter pairs to tokenize with.
    delimiters: DelimiterSet,
}

impl Scanner {
    /// Constructs a new Scanner for the given delimiter pairs.
    pub fn new(delimiters: DelimiterSet) -> Self {
        Scanner { delimiters }
    }

    /// Returns the scanner's delimiter pairs.
    pub fn delimiters(&self) -> &DelimiterSet {
        &self.delimiters
    }

    /// Tokenizes a line of text beginning in the given state. The returned
    /// tokens partition the text exactly, and each token carries the
    /// scanner state produced after consuming it.
    ///
    /// Line terminators are normally stripped before this is called; a raw
    /// multi-line string is nonetheless tokenized correctly, with
    /// terminator-bearing whitespace runs emitted as `TokenKind::WsNl`.
    pub fn process_line(&self, text: &str, start: &ScannerState)
        -> Vec<Token>
    {
        let span = span!(Level::TRACE, "Scanner::process_line");
        let _enter = span.enter();

        let mut tokens = Vec::new();
        let mut state = start.clone();
        let mut offset = 0;
        while offset < text.len() {
            let token = self.scan_token(&text[offset..], offset, &mut state);
            if token.is_empty() {
                // Tokens are never empty; stop rather than stall.
                break;
            }
            offset += token.len();
            tokens.push(token);
        }
        tokens
    }

    /// Scans a single token from the start of `rest`.
    fn scan_token(&self, rest: &str, offset: usize, state: &mut ScannerState)
        -> Token
    {
        if state.in_string && state.string_delimiter.is_some() {
            return self.scan_string(rest, offset, state);
        }

        let c = match rest.chars().next() {
            Some(c) => c,
            None    => return Token::new(
                TokenKind::Junk, "", offset, state.clone()),
        };

        if c.is_whitespace() {
            return self.scan_whitespace(rest, offset, state);
        }
        if self.delimiters.is_delimiter(c) {
            return self.scan_delimiter(c, offset, state);
        }
        self.scan_atom(rest, offset, state)
    }

    /// Scans a token while inside a string: either the closing delimiter or
    /// a maximal run of string content. A backslash escapes the following
    /// character regardless of what it is.
    fn scan_string(&self, rest: &str, offset: usize, state: &mut ScannerState)
        -> Token
    {
        let delim = match state.string_delimiter {
            Some(d) => d,
            None    => {
                // Inconsistent state; recover by leaving the string.
                state.in_string = false;
                return self.scan_token(rest, offset, state);
            },
        };

        if rest.starts_with(delim) {
            state.in_string = false;
            state.string_delimiter = None;
            let _ = state.pop_symmetric(delim);
            return Token::new(
                TokenKind::StrEnd, delim.to_string(), offset, state.clone());
        }

        let mut len = 0;
        let mut chars = rest.char_indices();
        while let Some((idx, c)) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some((next_idx, next)) => {
                        len = next_idx + next.len_utf8();
                        continue;
                    },
                    // A trailing backslash cannot escape across the line
                    // terminator; the state struct carries no pending
                    // escape.
                    None => {
                        len = idx + c.len_utf8();
                        break;
                    },
                }
            }
            if c == delim {
                break;
            }
            len = idx + c.len_utf8();
        }
        Token::new(TokenKind::StrInside, &rest[..len], offset, state.clone())
    }

    /// Scans a maximal run of whitespace.
    fn scan_whitespace(
        &self,
        rest: &str,
        offset: usize,
        state: &ScannerState)
        -> Token
    {
        let end = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        let raw = &rest[..end];
        let kind = if raw.chars().any(|c| c == '\n' || c == '\r') {
            TokenKind::WsNl
        } else {
            TokenKind::Ws
        };
        Token::new(kind, raw, offset, state.clone())
    }

    /// Scans a single delimiter character. Symmetric delimiters toggle
    /// open/close through the state's nesting stack; `"` additionally
    /// enters or leaves string state.
    fn scan_delimiter(&self, c: char, offset: usize, state: &mut ScannerState)
        -> Token
    {
        let raw = c.to_string();
        if self.delimiters.is_symmetric(c) {
            if state.pop_symmetric(c) {
                let kind = if c == STRING_DELIMITER {
                    state.in_string = false;
                    state.string_delimiter = None;
                    TokenKind::StrEnd
                } else {
                    TokenKind::Close
                };
                return Token::new(kind, raw, offset, state.clone());
            }

            state.push_symmetric(c);
            let kind = if c == STRING_DELIMITER {
                state.in_string = true;
                state.string_delimiter = Some(c);
                TokenKind::StrStart
            } else {
                TokenKind::Open
            };
            return Token::new(kind, raw, offset, state.clone());
        }

        if self.delimiters.is_open(c) {
            Token::new(TokenKind::Open, raw, offset, state.clone())
        } else {
            Token::new(TokenKind::Close, raw, offset, state.clone())
        }
    }

    /// Scans a maximal run of non-whitespace, non-delimiter characters.
    fn scan_atom(&self, rest: &str, offset: usize, state: &ScannerState)
        -> Token
    {
        let end = rest
            .find(|c: char| c.is_whitespace() || self.delimiters.is_delimiter(c))
            .unwrap_or(rest.len());
        if end == 0 {
            // Safe fallback for a character the dispatcher mis-classified.
            let len = rest.chars().next().map_or(0, char::len_utf8);
            return Token::new(
                TokenKind::Junk, &rest[..len], offset, state.clone());
        }
        Token::new(TokenKind::Id, &rest[..end], offset, state.clone())
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::new(DelimiterSet::default())
    }
}
