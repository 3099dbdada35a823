//! Domain logic for the barangay portal gateway.
//!
//! Everything here is pure: the response envelope, the resource registry,
//! array-field and media-URL rewriting, backend failure classification, and
//! write-body validation. The HTTP layer lives in `barangay-api`.

pub mod array_fields;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod media;
pub mod preview;
pub mod resource;
pub mod upstream;
