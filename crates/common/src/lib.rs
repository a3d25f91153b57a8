//! Modular common utilities shared across Visadesk crates.
//!
//! # Modules
//!
//! - [`validation`]: field-level validation run before any request is built
//! - [`privacy`]: redaction helpers for tokens and emails in log output

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod privacy;
pub mod validation;

// Re-export commonly used types and traits for convenience
pub use privacy::{mask_email, mask_link_token, redact_token};
pub use validation::{
    DateRule, DateValidator, EmailValidator, FieldError, FieldValidator, StringValidator,
    ValidationError, ValidationResult, Validator, Violation,
};
