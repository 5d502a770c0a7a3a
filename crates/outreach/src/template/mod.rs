//! Placeholder-based message personalization.
//!
//! Two placeholder syntaxes are honored at the same time: the curly form
//! (`{{firstName}}`) and the bracket form (`[First_Name]`). The bracket keys
//! are an explicit synonym table, not a case transform of the curly keys.
//! Substitution is a literal find/replace pass per known key; placeholders
//! with no known key are left verbatim. There is no nesting, no conditionals,
//! and no escape for literal braces or brackets that collide with a known
//! key; that limitation is part of the contract.

pub mod context;
pub mod engine;

pub use context::{CompanyContext, CompanyRef, ContactPayload, LocationParts, PersonContext};
pub use engine::{placeholder_catalog, render, TemplateCatalog};
