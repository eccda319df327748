// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{BuildFile, find_cycles, load_and_validate};
use crate::dag::{BuildRecorder, Request, Scheduler, TargetGraph, TargetName, topological_order};
use crate::errors::TargetdagError;
use crate::exec::StepRunner;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - build file loading
/// - the `--list` / `--check` / `--dry-run` reports
/// - scheduler, listener and step runner for a real build
pub fn run(args: CliArgs) -> Result<()> {
    let build_path = PathBuf::from(&args.file);
    let build = load_and_validate(&build_path)?;
    debug!(path = %build_path.display(), targets = build.target.len(), "build file loaded");

    if args.list {
        print_target_list(&build);
        return Ok(());
    }

    if args.check {
        return check_cycles(&build);
    }

    let targets = requested_targets(&args.targets, &build)?;

    if args.dry_run {
        print_dry_run(&build, &targets)?;
        return Ok(());
    }

    let mut scheduler = Scheduler::from_build_file(&build);
    let recorder = BuildRecorder::new();
    scheduler.add_listener(recorder.clone());

    let mut runner = StepRunner::from_build_file(&build, &args.define)?;

    info!(project = %build.project_name(), ?targets, "starting build");
    scheduler.execute(&targets, &mut runner, Request::TopLevel)?;

    print_summary(&recorder);
    Ok(())
}

/// Targets named on the command line, else `[project].default`.
pub fn requested_targets(cli_targets: &[String], build: &BuildFile) -> errors::Result<Vec<TargetName>> {
    if !cli_targets.is_empty() {
        return Ok(cli_targets.to_vec());
    }

    match &build.project.default {
        Some(default) => Ok(vec![default.clone()]),
        None => Err(TargetdagError::Config(
            "no target given and the build file has no [project].default".to_string(),
        )),
    }
}

/// Static execution order for `targets`, as a top-level build would walk it.
///
/// Runtime `depends` steps are not taken into account.
pub fn planned_order(graph: &TargetGraph, targets: &[TargetName]) -> errors::Result<Vec<TargetName>> {
    let mut seen: HashSet<TargetName> = HashSet::new();
    let mut plan = Vec::new();

    for target in targets {
        for name in topological_order(target, graph)? {
            if seen.insert(name.clone()) {
                plan.push(name);
            }
        }
    }

    Ok(plan)
}

/// `--check`: report every cycle among static dependencies.
fn check_cycles(build: &BuildFile) -> Result<()> {
    let cycles = find_cycles(build);

    if cycles.is_empty() {
        println!("no dependency cycles found in {}", build.source_label());
        return Ok(());
    }

    println!("dependency cycles ({}):", cycles.len());
    for cycle in cycles.iter() {
        println!("  - {}", cycle.join(", "));
    }

    Err(TargetdagError::Config(format!(
        "{} dependency cycle(s) found in {}",
        cycles.len(),
        build.source_label()
    ))
    .into())
}

/// `--list`: targets, descriptions and static dependencies.
fn print_target_list(build: &BuildFile) {
    let graph = TargetGraph::from_build_file(build);

    println!("project {}", build.project_name());
    if let Some(default) = &build.project.default {
        println!("default target: {default}");
    }
    println!();

    println!("targets ({}):", graph.len());
    for target in graph.targets() {
        match &target.description {
            Some(description) => println!("  {:<20} {}", target.name, description),
            None => println!("  {}", target.name),
        }
        if !target.depends.is_empty() {
            println!("      depends: {}", target.depends.join(", "));
        }
        let dependents = graph.dependents_of(&target.name);
        if !dependents.is_empty() {
            println!("      required by: {}", dependents.join(", "));
        }
    }
}

/// `--dry-run`: resolved order plus the steps each target would run.
fn print_dry_run(build: &BuildFile, targets: &[TargetName]) -> Result<()> {
    let graph = TargetGraph::from_build_file(build);
    let plan = planned_order(&graph, targets)?;

    println!("targetdag dry-run");
    println!("  requested: {}", targets.join(", "));
    println!("  order: {}", plan.join(" -> "));
    println!();

    for name in plan.iter() {
        let Some(target) = graph.get(name) else {
            continue;
        };
        println!("  - {name}");
        for step in target.steps.iter() {
            println!("      {}: {}", step.kind(), describe_step(step));
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}

fn describe_step(step: &config::Step) -> String {
    match step {
        config::Step::Exec(command) => command.clone(),
        config::Step::Echo(message) => message.clone(),
        config::Step::Property { name, value } => format!("{name} = {value}"),
        config::Step::Depends(names) => names.join(", "),
    }
}

fn print_summary(recorder: &BuildRecorder) {
    let timings = recorder.timings();
    if timings.is_empty() {
        return;
    }

    println!();
    println!("BUILD SUCCEEDED ({} target(s))", timings.len());
    for (target, elapsed) in timings {
        println!("  {:<20} {:>8.3}s", target, elapsed.as_secs_f64());
    }
}
