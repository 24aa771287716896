// src/config/mod.rs

//! Job file loading and validation for tiledash.
//!
//! Responsibilities:
//! - Define the serde data model (`model.rs`).
//! - Load a job file from disk, TOML or YAML (`loader.rs`).
//! - Validate basic invariants like non-empty commands (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{FileFormat, load_and_validate, load_from_path, parse_str};
pub use model::{JobConfig, JobFile, RawJobFile};
