// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_BUILD_FILE;

/// Command-line arguments for `targetdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "targetdag",
    version,
    about = "Run build targets in dependency order, each at most once.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the build file (TOML).
    #[arg(
        short = 'f',
        long = "file",
        value_name = "PATH",
        default_value = DEFAULT_BUILD_FILE
    )]
    pub file: String,

    /// Set a build property, overriding `[properties]`.
    #[arg(
        short = 'D',
        long = "define",
        value_name = "NAME=VALUE",
        value_parser = parse_define
    )]
    pub define: Vec<(String, String)>,

    /// List targets with their descriptions and exit.
    #[arg(long)]
    pub list: bool,

    /// Report every dependency cycle in the build file and exit.
    #[arg(long)]
    pub check: bool,

    /// Print the resolved execution order without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TARGETDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Targets to build. Defaults to `[project].default`.
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Parse a `NAME=VALUE` property definition.
pub fn parse_define(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("invalid property definition '{s}' (expected NAME=VALUE)")),
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
