// src/config/validate.rs

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{BuildFile, RawBuildFile, Step};
use crate::errors::{Result, TargetdagError};

impl TryFrom<RawBuildFile> for BuildFile {
    type Error = TargetdagError;

    fn try_from(raw: RawBuildFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_build_file(&raw)?;
        Ok(BuildFile::new_unchecked(raw))
    }
}

/// Semantic checks applied on load.
///
/// Cycles are deliberately not rejected here: a cycle only fails the build
/// when a requested target reaches it. Use [`find_cycles`] to report them
/// up front.
fn validate_raw_build_file(cfg: &RawBuildFile) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_target_names(cfg)?;
    validate_static_dependencies(cfg)?;
    validate_depends_steps(cfg)?;
    validate_default_target(cfg)?;
    Ok(())
}

fn ensure_has_targets(cfg: &RawBuildFile) -> Result<()> {
    if cfg.target.is_empty() {
        return Err(TargetdagError::Config(
            "build file must contain at least one [target.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_target_names(cfg: &RawBuildFile) -> Result<()> {
    for name in cfg.target.keys() {
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(TargetdagError::Config(format!(
                "invalid target name '{name}': names must be non-empty and contain no whitespace"
            )));
        }
    }
    Ok(())
}

fn validate_static_dependencies(cfg: &RawBuildFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        for dep in target.depends.iter() {
            if !cfg.target.contains_key(dep) {
                return Err(TargetdagError::UnknownTarget {
                    name: dep.clone(),
                    required_by: Some(name.clone()),
                });
            }
        }
    }
    Ok(())
}

fn validate_depends_steps(cfg: &RawBuildFile) -> Result<()> {
    for (name, target) in cfg.target.iter() {
        for step in target.steps.iter() {
            if let Step::Depends(requested) = step {
                if let Some(missing) = requested.iter().find(|r| !cfg.target.contains_key(*r)) {
                    return Err(TargetdagError::UnknownTarget {
                        name: missing.clone(),
                        required_by: Some(name.clone()),
                    });
                }
            }
        }
    }
    Ok(())
}

fn validate_default_target(cfg: &RawBuildFile) -> Result<()> {
    if let Some(default) = &cfg.project.default {
        if !cfg.target.contains_key(default) {
            return Err(TargetdagError::Config(format!(
                "[project].default names unknown target '{default}'"
            )));
        }
    }
    Ok(())
}

/// Every dependency cycle among the static `depends` lists.
///
/// Each cycle is reported as the sorted member names of one strongly
/// connected component; a target listing itself counts as a cycle of one.
/// The result is sorted so that output is stable.
pub fn find_cycles(cfg: &BuildFile) -> Vec<Vec<String>> {
    // Edge direction: target -> dependency.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.target.keys() {
        graph.add_node(name.as_str());
    }

    for (name, target) in cfg.target.iter() {
        for dep in target.depends.iter() {
            graph.add_edge(name.as_str(), dep.as_str(), ());
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut names: Vec<String> = component.into_iter().map(str::to_string).collect();
            names.sort();
            names
        })
        .collect();

    cycles.sort();
    cycles
}
