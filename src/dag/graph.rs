// src/dag/graph.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::model::BuildFile;
use crate::dag::target::{Target, TargetName};

/// Read-only mapping from target name to its definition.
///
/// Membership never changes once built; per-build state is kept by the
/// [`Scheduler`](crate::dag::Scheduler) next to it. Targets are shared via
/// `Arc` so that a body can hold its own definition while the scheduler is
/// borrowed mutably for nested requests.
#[derive(Debug, Clone, Default)]
pub struct TargetGraph {
    targets: BTreeMap<TargetName, Arc<Target>>,
}

impl TargetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a validated [`BuildFile`].
    pub fn from_build_file(build: &BuildFile) -> Self {
        let source = build.source_label();
        build
            .target
            .iter()
            .map(|(name, cfg)| Target::from_config(name.clone(), cfg, &source))
            .collect()
    }

    /// Add a target, replacing any previous definition with the same name.
    pub fn insert(&mut self, target: Target) {
        self.targets.insert(target.name.clone(), Arc::new(target));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Target>> {
        self.targets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Arc<Target>> {
        self.targets.values()
    }

    /// Immediate static dependencies of a target.
    pub fn dependencies_of(&self, name: &str) -> &[TargetName] {
        self.targets
            .get(name)
            .map(|t| t.depends.as_slice())
            .unwrap_or(&[])
    }

    /// Targets that list `name` in their static dependencies.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.targets
            .values()
            .filter(|t| t.depends.iter().any(|d| d == name))
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<Target> for TargetGraph {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        let mut graph = TargetGraph::new();
        for target in iter {
            graph.insert(target);
        }
        graph
    }
}
