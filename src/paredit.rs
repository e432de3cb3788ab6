////////////////////////////////////////////////////////////////////////////////
// Scoria structural editing library
////////////////////////////////////////////////////////////////////////////////
// Copyright 2022 Skylor R. Schermer
// This code is dual licenced using the MIT or Apache 2 license.
// See licence-mit.md and licence-apache.md for details.
////////////////////////////////////////////////////////////////////////////////
//! Structural editing operations.
////////////////////////////////////////////////////////////////////////////////
//!
//! Two layers over the token cursor:
//!
//! * Range computations (`forward_sexp_range`, ...) are pure: given a model
//!   and an offset they return a [`Span`], with the empty span at the
//!   offset when nothing is reachable.
//! * Mutations (`slurp_forward`, ...) compute an [`EditSet`] against the
//!   current document without applying it; the host (or
//!   [`EditableDocument::apply`]) performs the replacement.
//!
//! Every operation is total: unmet preconditions and malformed documents
//! produce no-ops, never panics, and no mutation ever splits a token or
//! moves anything but whole forms and whole delimiters.
//!
//! [`Span`]: crate::span::Span
//! [`EditSet`]: crate::document::EditSet
//! [`EditableDocument::apply`]: crate::document::EditableDocument::apply

// Internal modules.
mod edit;
mod range;

// Exports.
pub use self::edit::*;
pub use self::range::*;
