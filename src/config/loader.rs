// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{BuildFile, RawBuildFile};
use crate::errors::Result;

/// Read and deserialize a build file without semantic validation.
///
/// Use [`load_and_validate`] for the checked form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawBuildFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

/// Deserialize a build file from an in-memory TOML string.
pub fn parse_str(contents: &str) -> Result<RawBuildFile> {
    let build: RawBuildFile = toml::from_str(contents)?;
    Ok(build)
}

/// Load a build file from disk and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - at least one target,
///   - unknown static or `depends`-step references,
///   - an unknown `[project].default`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BuildFile> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    let build = BuildFile::try_from(raw)?;
    Ok(build.with_source(path))
}

/// Build file used when `--file` is not given.
pub const DEFAULT_BUILD_FILE: &str = "targetdag.toml";
