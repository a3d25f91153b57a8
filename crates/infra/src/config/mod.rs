//! Configuration loading
//!
//! Reads [`visadesk_domain::Config`] from `.env`, an optional TOML/JSON file
//! and `VISADESK_*` environment overrides.

pub mod loader;

pub use loader::{apply_overrides, load, load_from_file, discover_config_path, validate};
