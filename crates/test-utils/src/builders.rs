#![allow(dead_code)]

use std::collections::BTreeMap;

use targetdag::config::{BuildFile, ProjectSection, RawBuildFile, Step, TargetConfig};
use targetdag::dag::{Target, TargetGraph};

/// Builder for a `TargetGraph` made of body-less targets.
///
/// ```ignore
/// let graph = GraphBuilder::new()
///     .target("A", &[])
///     .target("B", &["A"])
///     .build();
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    targets: Vec<Target>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(mut self, name: &str, depends: &[&str]) -> Self {
        self.targets.push(Target::new(name, depends));
        self
    }

    pub fn build(self) -> TargetGraph {
        self.targets.into_iter().collect()
    }
}

/// Builder for `BuildFile` to simplify test setup.
pub struct BuildFileBuilder {
    build: RawBuildFile,
}

impl BuildFileBuilder {
    pub fn new() -> Self {
        Self {
            build: RawBuildFile {
                project: ProjectSection::default(),
                properties: BTreeMap::new(),
                target: BTreeMap::new(),
            },
        }
    }

    pub fn with_target(mut self, name: &str, target: TargetConfig) -> Self {
        self.build.target.insert(name.to_string(), target);
        self
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.build
            .properties
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_project_name(mut self, name: &str) -> Self {
        self.build.project.name = Some(name.to_string());
        self
    }

    pub fn with_default(mut self, target: &str) -> Self {
        self.build.project.default = Some(target.to_string());
        self
    }

    /// The unvalidated build file, for exercising validation errors.
    pub fn build_raw(self) -> RawBuildFile {
        self.build
    }

    pub fn build(self) -> BuildFile {
        BuildFile::try_from(self.build).expect("Failed to build valid build file from builder")
    }
}

impl Default for BuildFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    pub fn new() -> Self {
        Self {
            target: TargetConfig {
                depends: vec![],
                description: None,
                steps: vec![],
            },
        }
    }

    pub fn depends(mut self, dep: &str) -> Self {
        self.target.depends.push(dep.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.target.description = Some(text.to_string());
        self
    }

    pub fn exec(mut self, command: &str) -> Self {
        self.target.steps.push(Step::Exec(command.to_string()));
        self
    }

    pub fn echo(mut self, message: &str) -> Self {
        self.target.steps.push(Step::Echo(message.to_string()));
        self
    }

    pub fn property(mut self, name: &str, value: &str) -> Self {
        self.target.steps.push(Step::Property {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn depends_step(mut self, names: &[&str]) -> Self {
        self.target
            .steps
            .push(Step::Depends(names.iter().map(|n| n.to_string()).collect()));
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}

impl Default for TargetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
