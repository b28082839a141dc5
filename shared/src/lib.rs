//! Shared types and pure computations for the agronomic decision engine
//!
//! Everything here is free of I/O so the same code runs in the backend and,
//! via WASM, in the field client.

pub mod aliases;
pub mod catalog;
pub mod forecast;
pub mod models;
pub mod physics;
pub mod types;
pub mod validation;

pub use catalog::{Catalog, KnowledgeBaseMerger, MergeReport};
pub use models::*;
pub use types::*;
pub use validation::*;
