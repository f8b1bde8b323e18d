//! Domain models for Jotter.
//!
//! [`Note`] is the only persisted entity: a titled piece of text with
//! optional tags and event scheduling fields. Request bodies get their own
//! input types so that partial-update semantics live in the types rather
//! than in dynamic payload inspection — see [`Patch`] for the
//! absent / null / value distinction that drives `PUT /notes/{id}`.

mod note;

pub use note::*;
