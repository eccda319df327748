// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Build file exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [project]
/// name = "demo"
/// default = "build"
///
/// [properties]
/// out = "dist"
///
/// [target.compile]
/// steps = [{ exec = "echo compiling into ${out}" }]
///
/// [target.build]
/// depends = ["compile"]
/// steps = [{ depends = ["docs"] }, { echo = "done" }]
///
/// [target.docs]
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawBuildFile {
    #[serde(default)]
    pub project: ProjectSection,

    /// Initial build properties from `[properties]`.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,

    /// All targets from `[target.<name>]`, keyed by target name.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectSection {
    #[serde(default)]
    pub name: Option<String>,

    /// Target to run when none is named on the command line.
    #[serde(default)]
    pub default: Option<String>,
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TargetConfig {
    /// Static dependencies, resolved before the body runs.
    #[serde(default)]
    pub depends: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Body of the target, run in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One step of a target body.
///
/// Written as a single-key inline table, e.g. `{ exec = "make" }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Run a shell command; a non-zero exit fails the target.
    Exec(String),
    /// Print a message.
    Echo(String),
    /// Set a build property.
    Property { name: String, value: String },
    /// Resolve and run other targets before continuing with this body.
    Depends(Vec<String>),
}

impl Step {
    pub fn kind(&self) -> &'static str {
        match self {
            Step::Exec(_) => "exec",
            Step::Echo(_) => "echo",
            Step::Property { .. } => "property",
            Step::Depends(_) => "depends",
        }
    }
}

/// A validated build file.
///
/// Only obtainable through `TryFrom<RawBuildFile>` (see `config::validate`)
/// or [`BuildFile::new_unchecked`].
#[derive(Debug, Clone)]
pub struct BuildFile {
    pub project: ProjectSection,
    pub properties: BTreeMap<String, String>,
    pub target: BTreeMap<String, TargetConfig>,
    /// Path the build file was read from, if any.
    pub source: Option<PathBuf>,
}

impl BuildFile {
    pub fn new_unchecked(raw: RawBuildFile) -> Self {
        Self {
            project: raw.project,
            properties: raw.properties,
            target: raw.target,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Display name of the project: `[project].name`, else the file stem.
    pub fn project_name(&self) -> String {
        if let Some(name) = &self.project.name {
            return name.clone();
        }
        self.source
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "targetdag".to_string())
    }

    /// Label used in target locations.
    pub fn source_label(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<inline>".to_string())
    }
}
