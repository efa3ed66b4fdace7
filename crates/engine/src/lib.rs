//! Budget allocation engine.
//!
//! Two pure building blocks used by the session handler:
//! - [`classifier`] decides whether text is a category definition (JSON or
//!   YAML) or an amount to split.
//! - [`allocation`] splits an amount across a category set.

pub mod allocation;
pub mod classifier;

pub use allocation::{Allocator, DEFAULT_UNIT, allocate};
pub use classifier::{Classification, DefinitionFormat, classify};
