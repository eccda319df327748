// src/config/mod.rs

//! Build file loading and validation.
//!
//! - `model.rs` holds the TOML-backed data model.
//! - `loader.rs` reads a build file from disk.
//! - `validate.rs` turns a `RawBuildFile` into a checked `BuildFile` and
//!   reports dependency cycles.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_BUILD_FILE, load_and_validate, load_from_path, parse_str};
pub use model::{BuildFile, ProjectSection, RawBuildFile, Step, TargetConfig};
pub use validate::find_cycles;
