// src/dag/target.rs

//! Target definitions and per-build target state.

use crate::config::model::{Step, TargetConfig};

/// Name of a target as written in the build file.
pub type TargetName = String;

/// Per-build state of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetState {
    /// Not yet run in this build.
    #[default]
    Pending,
    /// The body is currently running (it is on the in-progress stack).
    InProgress,
    /// The body completed successfully; it never runs again in this build.
    Done,
    /// The body failed; the build was aborted.
    Failed,
}

impl TargetState {
    /// `true` once the body has completed successfully.
    pub fn is_executed(self) -> bool {
        self == TargetState::Done
    }
}

/// Static definition of a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: TargetName,
    /// Statically declared dependencies, in declaration order.
    pub depends: Vec<TargetName>,
    pub description: Option<String>,
    pub steps: Vec<Step>,
    /// Where the target was defined, for diagnostics.
    pub location: String,
}

impl Target {
    /// A target with no body, mostly useful for tests and synthetic graphs.
    pub fn new(name: impl Into<TargetName>, depends: &[&str]) -> Self {
        let name = name.into();
        Self {
            location: format!("[target.{name}]"),
            name,
            depends: depends.iter().map(|d| d.to_string()).collect(),
            description: None,
            steps: Vec::new(),
        }
    }

    pub fn from_config(name: TargetName, cfg: &TargetConfig, source: &str) -> Self {
        Self {
            location: format!("{source} [target.{name}]"),
            name,
            depends: cfg.depends.clone(),
            description: cfg.description.clone(),
            steps: cfg.steps.clone(),
        }
    }
}
