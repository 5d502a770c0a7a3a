//! Canonical contact shaping for heterogeneous tabular input.
//!
//! Uploaded lists name their columns every possible way ("E-Mail",
//! "Contact Email", "fname", ...). A synonym table maps those raw column
//! names onto the fixed set of canonical fields the rest of the system
//! understands, and the normalizer derives the missing name parts and cleans
//! email and domain values.

pub mod mapping;
pub mod normalizer;

pub use mapping::{CanonicalField, FieldMapping};
pub use normalizer::{normalize, Contact};
