//! # Budget Split Core
//!
//! Domain types, traits, and error definitions for the budget split
//! assistant. This crate has **no framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping storage backends via configuration
//! - Easy testing with in-memory implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod category;
pub mod channel;
pub mod error;
pub mod split;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use category::{Category, CategorySet, UserId};
pub use channel::{Channel, ChannelMessage};
pub use error::{AllocationError, ChannelError, StoreError};
pub use split::{Portion, SplitResult};
pub use store::CategoryStore;
