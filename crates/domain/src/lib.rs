//! # Visadesk Domain
//!
//! Business domain types and models for the Visadesk client core.
//!
//! This crate contains:
//! - Domain data types (cases, client links, DS-160 forms, translations)
//! - The error taxonomy shared by every layer and its Result alias
//! - Configuration structures
//! - Domain constants (storage keys, defaults, public paths)
//!
//! ## Architecture
//! - No dependencies on other Visadesk crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
