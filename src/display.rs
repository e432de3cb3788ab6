////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Document excerpt display helpers.
////////////////////////////////////////////////////////////////////////////////

// Local imports.
use crate::lines::LineModel;
use crate::span::Span;

// External library imports.
use colored::Color;
use colored::Colorize as _;
use unicode_width::UnicodeWidthChar;

// Standard library imports.
use std::borrow::Cow;
use std::fmt::Display;


fn with_color_override<F>(color_enable: bool, f: F) -> std::fmt::Result
    where F: FnOnce() -> std::fmt::Result,
{
    colored::control::set_override(color_enable);
    let res = (f)();
    colored::control::unset_override();
    res
}

/// Returns the display width of the given text, ignoring control
/// characters.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}

/// Returns the greatest char boundary in `text` not exceeding `idx`.
fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}


////////////////////////////////////////////////////////////////////////////////
// MessageType
////////////////////////////////////////////////////////////////////////////////
/// A `DocDisplay`, `DisplayNote`, or `Highlight` message type. Used to
/// determine the color and format of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// An informational message.
    Info,
    /// An error message.
    Error,
    /// A warning message.
    Warning,
    /// A message providing additional info.
    Note,
    /// A message to help in correcting an error or warning.
    Help,
}

/// The rendering of one `MessageType`: its label, its color, and the
/// character its highlights are underlined with. Structural highlights use
/// a plain dash; only problem reports get the caret.
const MESSAGE_STYLES: [(MessageType, &str, Color, char); 5] = [
    (MessageType::Info,    "info",    Color::BrightWhite,  '-'),
    (MessageType::Error,   "error",   Color::BrightRed,    '^'),
    (MessageType::Warning, "warning", Color::BrightYellow, '^'),
    (MessageType::Note,    "note",    Color::BrightBlue,   '-'),
    (MessageType::Help,    "help",    Color::BrightGreen,  '~'),
];

impl MessageType {
    /// Returns the label, color, and underline character for the message
    /// type.
    fn style(&self) -> (&'static str, Color, char) {
        MESSAGE_STYLES
            .iter()
            .find(|(message_type, _, _, _)| message_type == self)
            .map(|&(_, label, color, underline)| (label, color, underline))
            .unwrap_or(("info", Color::BrightWhite, '-'))
    }

    /// Returns the color associated with the message type.
    pub fn color(&self) -> Color {
        self.style().1
    }

    /// Returns the character used to underline highlights of this message
    /// type.
    pub fn underline(&self) -> char {
        self.style().2
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (label, color, _) = self.style();
        // Info is the unremarkable default and is left unstyled.
        if *self == MessageType::Info {
            write!(f, "{}", label)
        } else {
            write!(f, "{}", label.color(color).bold())
        }
    }
}


////////////////////////////////////////////////////////////////////////////////
// Highlight
////////////////////////////////////////////////////////////////////////////////
/// A highlighted subsection of a displayed document excerpt.
#[derive(Debug, Clone)]
pub struct Highlight {
    /// The span to highlight.
    span: Span,
    /// The message to display at the end of the span.
    message: Option<String>,
    /// The message type.
    message_type: MessageType,
}

impl Highlight {
    /// Constructs a new Highlight with the given span and message.
    pub fn new<M>(span: Span, message: M) -> Self
        where M: Into<String>,
    {
        Highlight {
            span,
            message: Some(message.into()),
            message_type: MessageType::Info,
        }
    }

    /// Constructs a new Highlight with the given span and no message.
    pub fn new_silent(span: Span) -> Self {
        Highlight {
            span,
            message: None,
            message_type: MessageType::Info,
        }
    }

    /// Returns the given Highlight with the error MessageType.
    #[must_use]
    pub fn with_error_type(mut self) -> Self {
        self.message_type = MessageType::Error;
        self
    }

    /// Returns the given Highlight with the warning MessageType.
    #[must_use]
    pub fn with_warning_type(mut self) -> Self {
        self.message_type = MessageType::Warning;
        self
    }

    /// Returns the given Highlight with the note MessageType.
    #[must_use]
    pub fn with_note_type(mut self) -> Self {
        self.message_type = MessageType::Note;
        self
    }

    /// Returns the given Highlight with the help MessageType.
    #[must_use]
    pub fn with_help_type(mut self) -> Self {
        self.message_type = MessageType::Help;
        self
    }

    /// Returns the given Highlight with the given MessageType.
    #[must_use]
    pub fn with_message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }
}


////////////////////////////////////////////////////////////////////////////////
// DisplayNote
////////////////////////////////////////////////////////////////////////////////
/// A note which can be attached to a `DocDisplay`.
#[derive(Debug, Clone)]
pub struct DisplayNote {
    /// The message type for the note.
    note_type: MessageType,
    /// The note to display.
    note: String,
}

impl DisplayNote {
    /// Constructs a new DisplayNote with the given message.
    pub fn new<M>(note: M) -> Self
        where M: Into<String>,
    {
        DisplayNote {
            note_type: MessageType::Note,
            note: note.into(),
        }
    }
}

impl Display for DisplayNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.note_type, self.note)
    }
}

impl From<&str> for DisplayNote {
    fn from(note: &str) -> Self {
        DisplayNote::new(note)
    }
}

impl From<String> for DisplayNote {
    fn from(note: String) -> Self {
        DisplayNote::new(note)
    }
}


////////////////////////////////////////////////////////////////////////////////
// DocDisplay
////////////////////////////////////////////////////////////////////////////////
/// A structure for displaying a document excerpt with highlighted spans and
/// notes, in the style of a compiler diagnostic. Useful for showing the
/// range or effect of a structural operation.
#[derive(Debug)]
pub struct DocDisplay<'m, 'msg> {
    /// The tokenized document to excerpt.
    model: &'m LineModel,
    /// The top-level description of the display.
    message: Cow<'msg, str>,
    /// The overall message type.
    message_type: MessageType,
    /// The name of the file or buffer being displayed.
    source_name: Option<Cow<'msg, str>>,
    /// The spans to highlight.
    highlights: Vec<Highlight>,
    /// Notes to append after the excerpt.
    notes: Vec<DisplayNote>,
    /// Whether colors are enabled during writing.
    color_enabled: bool,
}

impl<'m, 'msg> DocDisplay<'m, 'msg> {
    /// Constructs a new info-type DocDisplay with the given description.
    pub fn new<M>(model: &'m LineModel, message: M) -> Self
        where M: Into<Cow<'msg, str>>,
    {
        DocDisplay {
            model,
            message: message.into(),
            message_type: MessageType::Info,
            source_name: None,
            highlights: Vec::with_capacity(1),
            notes: Vec::new(),
            color_enabled: true,
        }
    }

    /// Returns the given DocDisplay with the given color enablement.
    #[must_use]
    pub fn with_color(mut self, color_enabled: bool) -> Self {
        self.color_enabled = color_enabled;
        self
    }

    /// Returns the given DocDisplay with the error MessageType.
    #[must_use]
    pub fn with_error_type(mut self) -> Self {
        self.message_type = MessageType::Error;
        self
    }

    /// Returns the given DocDisplay with the note MessageType.
    #[must_use]
    pub fn with_note_type(mut self) -> Self {
        self.message_type = MessageType::Note;
        self
    }

    /// Returns the given DocDisplay with the given source name.
    #[must_use]
    pub fn with_source_name<M>(mut self, name: M) -> Self
        where M: Into<Cow<'msg, str>>,
    {
        self.source_name = Some(name.into());
        self
    }

    /// Returns the given DocDisplay with the given Highlight attached.
    #[must_use]
    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlights.push(highlight);
        self
    }

    /// Returns the given DocDisplay with the given note attached.
    #[must_use]
    pub fn with_note<N>(mut self, note: N) -> Self
        where N: Into<DisplayNote>,
    {
        self.notes.push(note.into());
        self
    }

    /// Returns the range of lines covered by the highlights, widened to
    /// whole lines.
    fn line_range(&self) -> (usize, usize) {
        let mut first = usize::MAX;
        let mut last = 0;
        for hl in &self.highlights {
            let start = self.model.offset_to_position(hl.span.start).line;
            let end = self.model.offset_to_position(hl.span.end).line;
            first = first.min(start);
            last = last.max(end);
        }
        if first > last {
            (0, 0)
        } else {
            (first, last)
        }
    }

    /// Writes the location line for the highlights.
    fn write_location(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        gutter_width: usize)
        -> std::fmt::Result
    {
        let (source_name, sep) = match &self.source_name {
            Some(name) => (name.as_ref(), ":"),
            None       => ("", ""),
        };
        let span = match self.highlights.first() {
            Some(hl) => hl.span,
            None     => return Ok(()),
        };
        let start = self.model.offset_to_position(span.start);
        let end = self.model.offset_to_position(span.end);

        if span.is_empty() {
            writeln!(f, "{:width$}{} {}{}({}, byte {})",
                "",
                "-->".bright_blue().bold(),
                source_name,
                sep,
                start,
                span.start,
                width=gutter_width)
        } else {
            writeln!(f, "{:width$}{} {}{}({}-{}, {})",
                "",
                "-->".bright_blue().bold(),
                source_name,
                sep,
                start,
                end,
                span,
                width=gutter_width)
        }
    }

    /// Writes the underline row for the given highlight on the given line,
    /// if the highlight has one there.
    fn write_underline(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        hl: &Highlight,
        line: usize,
        gutter_width: usize)
        -> std::fmt::Result
    {
        let line_start = self.model.offset_for_line(line);
        let text = match self.model.line(line) {
            Some(l) => l.text(),
            None    => return Ok(()),
        };
        let line_span = Span::new(line_start, line_start + text.len());

        let start = hl.span.start.max(line_span.start);
        let end = hl.span.end.min(line_span.end);
        if start > end {
            return Ok(());
        }
        let is_first = self.model.offset_to_position(hl.span.start).line
            == line;
        let is_last = self.model.offset_to_position(hl.span.end).line == line;
        if !is_first && !is_last {
            return Ok(());
        }

        write_gutter(f, "", gutter_width)?;
        let from = floor_char_boundary(text, start - line_span.start);
        let to = floor_char_boundary(text, end - line_span.start);
        let indent = display_width(&text[..from]);
        for _ in 0..indent {
            write!(f, " ")?;
        }
        let count = display_width(&text[from..to]).max(1);
        let run: String = hl.message_type
            .underline()
            .to_string()
            .repeat(count);
        write!(f, "{}", run.color(hl.message_type.color()))?;
        match &hl.message {
            Some(msg) if is_last => writeln!(f, " {}", msg
                .color(hl.message_type.color())),
            _ => writeln!(f),
        }
    }
}

impl<'m, 'msg> Display for DocDisplay<'m, 'msg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        with_color_override(self.color_enabled, || {
            writeln!(f, "{}{} {}",
                self.message_type,
                ":".bright_white().bold(),
                self.message.bright_white().bold())?;

            let (first, last) = self.line_range();
            let gutter_width = std::cmp::max(
                ((last + 1) as f32).log10().ceil() as usize, 1);

            self.write_location(f, gutter_width)?;

            // Write empty line to uncramp the display.
            write_gutter(f, "", gutter_width)?;
            writeln!(f)?;

            for line in first..=last {
                let text = match self.model.line(line) {
                    Some(l) => l.text(),
                    None    => continue,
                };
                write_gutter(f, line, gutter_width)?;
                writeln!(f, "{}", text)?;

                for hl in &self.highlights {
                    self.write_underline(f, hl, line, gutter_width)?;
                }
            }

            for note in &self.notes {
                writeln!(f, "{:width$} = {}", "", note, width=gutter_width)?;
            }
            Ok(())
        })
    }
}

fn write_gutter<V>(
    f: &mut std::fmt::Formatter<'_>,
    value: V,
    width: usize)
    -> std::fmt::Result
    where V: Display,
{
    write!(f, "{:>width$} {} ",
        format!("{}", value).bright_blue().bold(),
        "|".bright_blue().bold(),
        width=width)
}
