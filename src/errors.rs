// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TargetdagError {
    #[error("{}", unknown_target_message(.name, .required_by.as_deref()))]
    UnknownTarget {
        name: String,
        /// The target whose dependency list named `name`, if any.
        required_by: Option<String>,
    },

    #[error("Circular dependency: {}", .chain.join(" <- "))]
    CircularDependency { chain: Vec<String> },

    #[error("Target '{0}' cannot depend on itself")]
    SelfDependency(String),

    #[error("Target '{target}' failed ({location}): {source:#}")]
    TargetExecution {
        target: String,
        location: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Target '{0}' already failed in this build")]
    PreviouslyFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TargetdagError {
    /// Whether this error was raised by the scheduler itself, as opposed to a
    /// failure inside a target body.
    pub fn is_scheduling_error(&self) -> bool {
        matches!(
            self,
            TargetdagError::UnknownTarget { .. }
                | TargetdagError::CircularDependency { .. }
                | TargetdagError::SelfDependency(_)
                | TargetdagError::TargetExecution { .. }
                | TargetdagError::PreviouslyFailed(_)
        )
    }
}

fn unknown_target_message(name: &str, required_by: Option<&str>) -> String {
    match required_by {
        Some(parent) => format!("Target '{name}' does not exist (required by '{parent}')"),
        None => format!("Target '{name}' does not exist"),
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TargetdagError>;
