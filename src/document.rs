////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Editable document and edit descriptions.
////////////////////////////////////////////////////////////////////////////////

// Local imports.
use crate::delimiter::DelimiterSet;
use crate::lexer::Scanner;
use crate::lines::LineModel;
use crate::paredit;
use crate::span::Span;

// External library imports.
use tracing::event;
use tracing::Level;
use tracing::span;

// Standard library imports.
use std::rc::Rc;


////////////////////////////////////////////////////////////////////////////////
// Selection
////////////////////////////////////////////////////////////////////////////////
/// A selection within the document: an anchor offset and an active (cursor)
/// offset. The two are equal for a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    /// The fixed end of the selection.
    pub anchor: usize,
    /// The moving end of the selection.
    pub active: usize,
}

impl Selection {
    /// Constructs a new Selection with the given anchor and active offsets.
    pub fn new(anchor: usize, active: usize) -> Self {
        Selection { anchor, active }
    }

    /// Constructs a new empty Selection at the given offset.
    pub fn cursor(offset: usize) -> Self {
        Selection { anchor: offset, active: offset }
    }

    /// Returns the lesser of the selection's offsets.
    pub fn start(&self) -> usize {
        self.anchor.min(self.active)
    }

    /// Returns the greater of the selection's offsets.
    pub fn end(&self) -> usize {
        self.anchor.max(self.active)
    }

    /// Returns true if the selection is an empty cursor.
    pub fn is_cursor(&self) -> bool {
        self.anchor == self.active
    }

    /// Returns true if the active offset precedes the anchor.
    pub fn is_reversed(&self) -> bool {
        self.anchor > self.active
    }

    /// Returns the selection as a span.
    pub fn as_span(&self) -> Span {
        Span::new_enclosing(self.anchor, self.active)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.anchor, self.active)
    }
}


////////////////////////////////////////////////////////////////////////////////
// ModelEdit
////////////////////////////////////////////////////////////////////////////////
/// A single text replacement within the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEdit {
    /// Inserts text at the given byte offset.
    Insert {
        /// The byte offset to insert at.
        offset: usize,
        /// The text to insert.
        text: Box<str>,
    },
    /// Replaces the text of the given span.
    Change {
        /// The byte range to replace.
        span: Span,
        /// The replacement text.
        text: Box<str>,
    },
    /// Deletes the text of the given span.
    Delete {
        /// The byte range to delete.
        span: Span,
    },
}

impl ModelEdit {
    /// Constructs a new insert edit.
    pub fn insert<S>(offset: usize, text: S) -> Self
        where S: Into<Box<str>>,
    {
        ModelEdit::Insert { offset, text: text.into() }
    }

    /// Constructs a new change edit.
    pub fn change<S>(span: Span, text: S) -> Self
        where S: Into<Box<str>>,
    {
        ModelEdit::Change { span, text: text.into() }
    }

    /// Constructs a new delete edit.
    pub fn delete(span: Span) -> Self {
        ModelEdit::Delete { span }
    }

    /// Returns the byte range the edit replaces.
    pub fn span(&self) -> Span {
        match self {
            ModelEdit::Insert { offset, .. } => Span::new_at(*offset),
            ModelEdit::Change { span, .. }   => *span,
            ModelEdit::Delete { span }       => *span,
        }
    }

    /// Returns the replacement text of the edit.
    pub fn text(&self) -> &str {
        match self {
            ModelEdit::Insert { text, .. } => text,
            ModelEdit::Change { text, .. } => text,
            ModelEdit::Delete { .. }       => "",
        }
    }
}


////////////////////////////////////////////////////////////////////////////////
// EditSet
////////////////////////////////////////////////////////////////////////////////
/// The computed result of a mutation operation: the edits to apply, the
/// replacement selections, and any killed text. An operation whose
/// preconditions fail yields an `EditSet` with no edits and unchanged
/// selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSet {
    /// The edits to apply, in application order.
    pub edits: Vec<ModelEdit>,
    /// The selections after the edits are applied.
    pub selections: Vec<Selection>,
    /// The text removed by a kill operation.
    pub killed: Option<Box<str>>,
}

impl EditSet {
    /// Constructs an EditSet which does nothing, leaving the given
    /// selections in place.
    pub fn noop(selections: &[Selection]) -> Self {
        EditSet {
            edits: Vec::new(),
            selections: selections.to_vec(),
            killed: None,
        }
    }

    /// Constructs an EditSet applying a single edit with a single resulting
    /// selection.
    pub fn single(edit: ModelEdit, selection: Selection) -> Self {
        EditSet {
            edits: vec![edit],
            selections: vec![selection],
            killed: None,
        }
    }

    /// Returns the given EditSet with the given killed text.
    #[must_use]
    pub fn with_killed<S>(mut self, killed: S) -> Self
        where S: Into<Box<str>>,
    {
        self.killed = Some(killed.into());
        self
    }

    /// Returns true if the EditSet does nothing.
    pub fn is_noop(&self) -> bool {
        self.edits.is_empty()
    }
}


////////////////////////////////////////////////////////////////////////////////
// KillSink
////////////////////////////////////////////////////////////////////////////////
/// A target to send killed text to be processed by the application, e.g. a
/// clipboard.
#[derive(Debug)]
#[repr(transparent)]
pub struct KillSink(Rc<KillSinkInner>);

impl KillSink {
    /// Constructs a new `KillSink` that processes killed text via the given
    /// function.
    pub fn new<T>(target: T) -> Self
        where T: Fn(&str) + 'static,
    {
        KillSink(Rc::new(KillSinkInner {
            target: Box::new(target),
        }))
    }

    /// Sends killed text to the sink target.
    pub fn send(&self, killed: &str) {
        (self.0.target)(killed)
    }
}

impl Clone for KillSink {
    fn clone(&self) -> Self {
        KillSink(Rc::clone(&self.0))
    }
}


////////////////////////////////////////////////////////////////////////////////
// KillSinkInner
////////////////////////////////////////////////////////////////////////////////
struct KillSinkInner {
    target: Box<dyn Fn(&str)>,
}

impl std::fmt::Debug for KillSinkInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KillSinkInner")
            .field("target", &"...")
            .finish()
    }
}


////////////////////////////////////////////////////////////////////////////////
// EditHost
////////////////////////////////////////////////////////////////////////////////
/// The surface the structural operations require of an embedder. The
/// in-memory `EditableDocument` implements it directly; an editor
/// integration converts to its own buffer and selection types at this
/// boundary.
pub trait EditHost {
    /// Returns the text between the given byte offsets.
    fn get_text(&self, start: usize, end: usize) -> String;

    /// Applies a single edit to the document. Returns false if the edit is
    /// rejected.
    fn apply_edit(&mut self, edit: &ModelEdit) -> bool;

    /// Returns the current selections.
    fn selections(&self) -> &[Selection];

    /// Replaces the current selections.
    fn set_selections(&mut self, selections: Vec<Selection>);
}


////////////////////////////////////////////////////////////////////////////////
// EditableDocument
////////////////////////////////////////////////////////////////////////////////
/// An in-memory editable document: the tokenized line model plus the
/// current selections.
///
/// Structural operations are two-phase: the `paredit` functions compute a
/// pure [`EditSet`] against the current model, and [`apply`] rewrites the
/// text, retokenizes, and replaces the selections wholesale. The
/// convenience methods below do both, honoring the first selection only for
/// mutations (range and movement operations transform every selection
/// independently against the pre-operation snapshot).
///
/// [`apply`]: EditableDocument::apply
pub struct EditableDocument {
    /// The tokenized document.
    model: LineModel,
    /// The current selections. Never empty.
    selections: Vec<Selection>,
    /// Whether kill operations publish killed text to the sink.
    publish_kills: bool,
    /// The kill sink, if any.
    kill_sink: Option<KillSink>,
}

impl EditableDocument {
    /// Constructs a new EditableDocument over the given text with the
    /// default delimiter pairs and a cursor at offset 0.
    pub fn new(text: &str) -> Self {
        EditableDocument {
            model: LineModel::new(text, Scanner::default()),
            selections: vec![Selection::cursor(0)],
            publish_kills: true,
            kill_sink: None,
        }
    }

    /// Returns the given EditableDocument retokenized with the given
    /// delimiter pairs.
    #[must_use]
    pub fn with_delimiters(mut self, delimiters: DelimiterSet) -> Self {
        let text = self.text();
        self.model = LineModel::new(&text, Scanner::new(delimiters));
        self
    }

    /// Returns the given EditableDocument with the given selections.
    /// Ignored if empty.
    #[must_use]
    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        if !selections.is_empty() {
            self.selections = selections;
        }
        self
    }

    /// Returns the given EditableDocument with a single cursor at the given
    /// offset.
    #[must_use]
    pub fn with_cursor(self, offset: usize) -> Self {
        self.with_selections(vec![Selection::cursor(offset)])
    }

    /// Returns the given EditableDocument with the given kill publishing
    /// policy.
    #[must_use]
    pub fn with_kill_publishing(mut self, publish_kills: bool) -> Self {
        self.publish_kills = publish_kills;
        self
    }

    /// Returns the given EditableDocument with the given kill sink.
    #[must_use]
    pub fn with_kill_sink(mut self, sink: KillSink) -> Self {
        self.kill_sink = Some(sink);
        self
    }

    /// Sets the kill sink to the given function.
    pub fn set_kill_sink_fn<T>(&mut self, target: T)
        where T: Fn(&str) + 'static,
    {
        self.kill_sink = Some(KillSink::new(target));
    }

    /// Returns the document's line model.
    pub fn model(&self) -> &LineModel {
        &self.model
    }

    /// Returns the full document text.
    pub fn text(&self) -> String {
        self.model.get_text(0, self.model.len())
    }

    /// Returns the byte length of the document.
    pub fn len(&self) -> usize {
        self.model.len()
    }

    /// Returns true if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    /// Returns whether kill operations publish killed text.
    pub fn publishes_kills(&self) -> bool {
        self.publish_kills
    }

    /// Applies a computed EditSet: every edit in order, then the
    /// replacement selections, then kill publication. Returns false if any
    /// edit is rejected, leaving the already-applied prefix in place.
    pub fn apply(&mut self, set: &EditSet) -> bool {
        let span = span!(Level::DEBUG, "EditableDocument::apply");
        let _enter = span.enter();

        for edit in &set.edits {
            if !self.apply_edit(edit) {
                return false;
            }
        }
        self.set_selections(set.selections.clone());
        if self.publish_kills {
            if let (Some(sink), Some(killed)) = (&self.kill_sink, &set.killed)
            {
                sink.send(killed);
            }
        }
        true
    }

    /// Computes and applies a mutation on the first selection. Returns
    /// false on a no-op.
    fn apply_op<F>(&mut self, op: F) -> bool
        where F: FnOnce(&Self, usize) -> EditSet,
    {
        let offset = match self.selections.first() {
            Some(s) => s.active,
            None    => return false,
        };
        let set = op(self, offset);
        if set.is_noop() {
            return false;
        }
        self.apply(&set)
    }

    /// Collapses every selection to the cursor produced by the given offset
    /// transform, each computed on the pre-operation snapshot. Returns true
    /// if any selection moved.
    fn move_selections<F>(&mut self, f: F) -> bool
        where F: Fn(&LineModel, usize) -> usize,
    {
        let moved: Vec<Selection> = self.selections
            .iter()
            .map(|s| Selection::cursor(f(&self.model, s.active)))
            .collect();
        let changed = moved != self.selections;
        self.selections = moved;
        changed
    }

    /// Replaces every selection with the result of the given transform,
    /// keeping selections whose transform yields nothing. Returns true if
    /// any selection changed.
    fn map_selections<F>(&mut self, f: F) -> bool
        where F: Fn(&LineModel, Selection) -> Option<Selection>,
    {
        let mapped: Vec<Selection> = self.selections
            .iter()
            .map(|&s| f(&self.model, s).unwrap_or(s))
            .collect();
        let changed = mapped != self.selections;
        self.selections = mapped;
        changed
    }


    ////////////////////////////////////////////////////////////////////////
    // Navigation.
    ////////////////////////////////////////////////////////////////////////

    /// Moves every cursor past the next sexp.
    pub fn forward_sexp(&mut self) -> bool {
        self.move_selections(|m, o| paredit::forward_sexp_range(m, o).end)
    }

    /// Moves every cursor before the previous sexp.
    pub fn backward_sexp(&mut self) -> bool {
        self.move_selections(|m, o| paredit::backward_sexp_range(m, o).start)
    }

    /// Moves every cursor past the next sexp, or out of the enclosing list
    /// when none remains.
    pub fn forward_sexp_or_up(&mut self) -> bool {
        self.move_selections(
            |m, o| paredit::forward_sexp_or_up_range(m, o).end)
    }

    /// Moves every cursor before the previous sexp, or out of the enclosing
    /// list when none precedes.
    pub fn backward_sexp_or_up(&mut self) -> bool {
        self.move_selections(
            |m, o| paredit::backward_sexp_or_up_range(m, o).start)
    }

    /// Moves every cursor inside the next child list.
    pub fn forward_down_list(&mut self) -> bool {
        self.move_selections(
            |m, o| paredit::range_to_forward_down_list(m, o).end)
    }

    /// Moves every cursor inside the end of the previous list.
    pub fn backward_down_list(&mut self) -> bool {
        self.move_selections(
            |m, o| paredit::range_to_backward_down_list(m, o).start)
    }

    /// Moves every cursor to the closing delimiter of its enclosing list.
    pub fn forward_up_list(&mut self) -> bool {
        self.move_selections(
            |m, o| paredit::range_to_forward_up_list(m, o).end)
    }

    /// Moves every cursor to the opening delimiter of its enclosing list.
    pub fn backward_up_list(&mut self) -> bool {
        self.move_selections(
            |m, o| paredit::range_to_backward_up_list(m, o).start)
    }


    ////////////////////////////////////////////////////////////////////////
    // Selection.
    ////////////////////////////////////////////////////////////////////////

    /// Selects the next sexp from every cursor.
    pub fn select_forward_sexp(&mut self) -> bool {
        self.map_selections(|m, s| {
            let r = paredit::forward_sexp_range(m, s.active);
            if r.is_empty() {
                None
            } else {
                Some(Selection::new(r.start, r.end))
            }
        })
    }

    /// Selects the previous sexp from every cursor, reversed.
    pub fn select_backward_sexp(&mut self) -> bool {
        self.map_selections(|m, s| {
            let r = paredit::backward_sexp_range(m, s.active);
            if r.is_empty() {
                None
            } else {
                Some(Selection::new(r.end, r.start))
            }
        })
    }

    /// Selects the form at every cursor.
    pub fn select_current_form(&mut self) -> bool {
        self.map_selections(|m, s| {
            m.get_token_cursor(s.active)
                .range_for_current_form()
                .map(|r| Selection::new(r.start, r.end))
        })
    }

    /// Selects the top-level form enclosing every cursor.
    pub fn select_defun(&mut self) -> bool {
        self.map_selections(|m, s| {
            m.get_token_cursor(s.active)
                .range_for_defun()
                .map(|r| Selection::new(r.start, r.end))
        })
    }


    ////////////////////////////////////////////////////////////////////////
    // Mutation. First selection only.
    ////////////////////////////////////////////////////////////////////////

    /// Extends the enclosing list over the next outside form.
    pub fn slurp_forward(&mut self) -> bool {
        self.apply_op(paredit::slurp_forward)
    }

    /// Extends the enclosing list over the previous outside form.
    pub fn slurp_backward(&mut self) -> bool {
        self.apply_op(paredit::slurp_backward)
    }

    /// Expels the last form of the enclosing list.
    pub fn barf_forward(&mut self) -> bool {
        self.apply_op(paredit::barf_forward)
    }

    /// Expels the first form of the enclosing list.
    pub fn barf_backward(&mut self) -> bool {
        self.apply_op(paredit::barf_backward)
    }

    /// Replaces the enclosing list with the current form.
    pub fn raise(&mut self) -> bool {
        self.apply_op(paredit::raise)
    }

    /// Removes the delimiters of the enclosing list.
    pub fn splice(&mut self) -> bool {
        self.apply_op(paredit::splice)
    }

    /// Wraps the current form in the given delimiters.
    pub fn wrap(&mut self, open: &str, close: &str) -> bool {
        self.apply_op(|doc, o| paredit::wrap(doc, o, open, close))
    }

    /// Replaces the enclosing list's delimiters with the given pair.
    pub fn rewrap(&mut self, open: &str, close: &str) -> bool {
        self.apply_op(|doc, o| paredit::rewrap(doc, o, open, close))
    }

    /// Swaps the current form with the following one.
    pub fn transpose(&mut self) -> bool {
        self.apply_op(paredit::transpose)
    }

    /// Deletes the given range, placing the cursor at its start.
    pub fn kill_range(&mut self, range: Span) -> bool {
        let set = paredit::kill_range(self, range);
        if set.is_noop() {
            return false;
        }
        self.apply(&set)
    }

    /// Deletes forward over one sexp.
    pub fn kill_forward_sexp(&mut self) -> bool {
        self.apply_op(paredit::kill_forward_sexp)
    }

    /// Deletes backward over one sexp.
    pub fn kill_backward_sexp(&mut self) -> bool {
        self.apply_op(paredit::kill_backward_sexp)
    }

    /// Deletes from the cursor to the end of the enclosing list.
    pub fn kill_to_end_of_list(&mut self) -> bool {
        self.apply_op(paredit::kill_to_end_of_list)
    }

    /// Deletes from the start of the enclosing list to the cursor.
    pub fn kill_to_start_of_list(&mut self) -> bool {
        self.apply_op(paredit::kill_to_start_of_list)
    }
}

impl EditHost for EditableDocument {
    fn get_text(&self, start: usize, end: usize) -> String {
        self.model.get_text(start, end)
    }

    fn apply_edit(&mut self, edit: &ModelEdit) -> bool {
        let len = self.model.len();
        let mut text = self.model.get_text(0, len);
        let span = edit.span();
        if span.start > span.end || span.end > len {
            event!(Level::DEBUG, %span, "edit rejected: out of bounds");
            return false;
        }
        if !text.is_char_boundary(span.start)
            || !text.is_char_boundary(span.end)
        {
            event!(Level::DEBUG, %span, "edit rejected: splits a character");
            return false;
        }
        text.replace_range(span.start..span.end, edit.text());
        self.model.update(&text);
        true
    }

    fn selections(&self) -> &[Selection] {
        &self.selections[..]
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        if !selections.is_empty() {
            self.selections = selections;
        }
    }
}

impl std::fmt::Debug for EditableDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditableDocument")
            .field("model", &self.model)
            .field("selections", &self.selections)
            .field("publish_kills", &self.publish_kills)
            .field("kill_sink_set", &self.kill_sink.is_some())
            .finish()
    }
}
