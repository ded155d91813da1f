//! Typed, already-decoded chunk records.
//!
//! The low-level binary reader is an external collaborator; it delivers the
//! stream as a sequence of [`Chunk`] records with type-specific payloads.
//! This module only defines the record types and read-only accessors —
//! decoding the byte format itself is out of scope.

mod record;
mod surface;

pub use record::*;
pub use surface::*;
