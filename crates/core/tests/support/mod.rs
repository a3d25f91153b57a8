//! Shared test helpers for `visadesk-core` integration tests.
//!
//! Lightweight in-memory ports so lifecycle tests can focus on behaviour
//! instead of boilerplate.

pub mod ports;
