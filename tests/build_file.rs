// tests/build_file.rs

use std::io::Write;

use tempfile::NamedTempFile;
use targetdag::config::{BuildFile, Step, find_cycles, load_and_validate, parse_str};
use targetdag::dag::{Request, Scheduler, TargetGraph};
use targetdag::errors::TargetdagError;
use targetdag::exec::{Properties, StepRunner};
use targetdag_test_utils::builders::{BuildFileBuilder, TargetConfigBuilder};
use targetdag_test_utils::init_tracing;

fn write_build_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_load_full_build_file() {
    let file = write_build_file(
        r#"
[project]
name = "demo"
default = "build"

[properties]
out = "dist"

[target.compile]
description = "Compile sources"
steps = [{ exec = "echo compiling into ${out}" }]

[target.build]
depends = ["compile"]
steps = [
  { depends = ["docs"] },
  { property = { name = "stage", value = "${out}/stage" } },
  { echo = "built ${project.name}" },
]

[target.docs]
"#,
    );

    let build = load_and_validate(file.path()).unwrap();

    assert_eq!(build.project_name(), "demo");
    assert_eq!(build.project.default.as_deref(), Some("build"));
    assert_eq!(build.properties.get("out").map(String::as_str), Some("dist"));
    assert_eq!(build.target.len(), 3);

    let target = &build.target["build"];
    assert_eq!(target.depends, vec!["compile"]);
    assert_eq!(
        target.steps,
        vec![
            Step::Depends(vec!["docs".to_string()]),
            Step::Property {
                name: "stage".to_string(),
                value: "${out}/stage".to_string(),
            },
            Step::Echo("built ${project.name}".to_string()),
        ]
    );
    assert!(build.target["docs"].steps.is_empty());

    let graph = TargetGraph::from_build_file(&build);
    let location = &graph.get("build").unwrap().location;
    assert!(location.ends_with("[target.build]"));
    assert!(location.contains(&file.path().display().to_string()));
}

#[test]
fn test_unknown_static_dependency_is_rejected_on_load() {
    let file = write_build_file(
        r#"
[target.A]
depends = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TargetdagError::UnknownTarget { name, required_by }) => {
            assert_eq!(name, "NonExistent");
            assert_eq!(required_by.as_deref(), Some("A"));
        }
        Err(e) => panic!("Expected UnknownTarget, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_depends_step_is_rejected_on_load() {
    let raw = parse_str(
        r#"
[target.A]
steps = [{ depends = ["ghost"] }]
"#,
    )
    .unwrap();

    match BuildFile::try_from(raw) {
        Err(TargetdagError::UnknownTarget { name, .. }) => assert_eq!(name, "ghost"),
        other => panic!("Expected UnknownTarget, got: {:?}", other),
    }
}

#[test]
fn test_empty_build_file_is_a_config_error() {
    let raw = parse_str("[project]\nname = \"empty\"\n").unwrap();

    match BuildFile::try_from(raw) {
        Err(TargetdagError::Config(msg)) => assert!(msg.contains("at least one")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn test_unknown_default_target_is_a_config_error() {
    let raw = BuildFileBuilder::new()
        .with_target("A", TargetConfigBuilder::new().build())
        .with_default("B")
        .build_raw();

    match BuildFile::try_from(raw) {
        Err(TargetdagError::Config(msg)) => assert!(msg.contains("'B'")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn test_target_names_with_whitespace_or_empty_are_rejected() {
    for bad in ["bad name", "", "tab\tname"] {
        let raw = BuildFileBuilder::new()
            .with_target("ok", TargetConfigBuilder::new().build())
            .with_target(bad, TargetConfigBuilder::new().build())
            .build_raw();

        match BuildFile::try_from(raw) {
            Err(TargetdagError::Config(msg)) => {
                assert!(msg.contains("invalid target name"), "{msg}")
            }
            other => panic!("Expected Config error for {bad:?}, got: {:?}", other),
        }
    }
}

#[test]
fn test_property_expansion_has_no_escape_and_rejects_empty_references() {
    let mut props = Properties::new().unwrap();
    props.set("x", "1");

    assert_eq!(props.expand("$${x}").unwrap(), "$1");
    assert_eq!(props.expand("$$ and $x stay").unwrap(), "$$ and $x stay");
    assert_eq!(props.expand("${x}${x}").unwrap(), "11");

    let err = props.expand("value ${}").unwrap_err();
    assert!(err.to_string().contains("empty property reference"), "{err}");
}

#[test]
fn test_invalid_toml_is_reported() {
    let file = write_build_file("[target.A\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(TargetdagError::Toml(_))
    ));
}

#[test]
fn test_unknown_step_kind_is_a_toml_error() {
    let result = parse_str(
        r#"
[target.A]
steps = [{ copy = "a.txt" }]
"#,
    );

    assert!(matches!(result, Err(TargetdagError::Toml(_))));
}

#[test]
fn test_cycles_are_loaded_but_reported_by_find_cycles() {
    let build = BuildFileBuilder::new()
        .with_target("A", TargetConfigBuilder::new().depends("B").build())
        .with_target("B", TargetConfigBuilder::new().depends("A").build())
        .with_target("C", TargetConfigBuilder::new().depends("C").build())
        .with_target("D", TargetConfigBuilder::new().depends("A").build())
        .build();

    assert_eq!(
        find_cycles(&build),
        vec![vec!["A".to_string(), "B".to_string()], vec!["C".to_string()]]
    );
}

#[test]
fn test_acyclic_build_file_has_no_cycles() {
    let build = BuildFileBuilder::new()
        .with_target("A", TargetConfigBuilder::new().build())
        .with_target("B", TargetConfigBuilder::new().depends("A").build())
        .build();

    assert!(find_cycles(&build).is_empty());
}

#[test]
fn test_step_runner_runs_depends_and_properties() {
    init_tracing();
    let build = BuildFileBuilder::new()
        .with_project_name("demo")
        .with_property("out", "dist")
        .with_target(
            "prepare",
            TargetConfigBuilder::new()
                .property("stage", "${out}/stage")
                .build(),
        )
        .with_target(
            "build",
            TargetConfigBuilder::new()
                .depends("prepare")
                .depends_step(&["docs"])
                .echo("${project.name} in ${stage} from ${target.name}")
                .build(),
        )
        .with_target(
            "docs",
            TargetConfigBuilder::new()
                .property("docs.owner", "${target.name}")
                .build(),
        )
        .build();

    let mut scheduler = Scheduler::from_build_file(&build);
    let mut runner = StepRunner::from_build_file(&build, &[]).unwrap();

    scheduler
        .execute(&["build"], &mut runner, Request::TopLevel)
        .unwrap();

    assert_eq!(scheduler.executed_targets(), ["prepare", "docs", "build"]);
    assert_eq!(runner.properties().get("stage"), Some("dist/stage"));
    assert_eq!(runner.properties().get("docs.owner"), Some("docs"));
    assert_eq!(runner.properties().get("project.name"), Some("demo"));
}

#[test]
fn test_command_line_overrides_win_over_build_properties() {
    let build = BuildFileBuilder::new()
        .with_property("mode", "debug")
        .with_target("A", TargetConfigBuilder::new().build())
        .build();

    let overrides = vec![("mode".to_string(), "release".to_string())];
    let runner = StepRunner::from_build_file(&build, &overrides).unwrap();

    assert_eq!(runner.properties().get("mode"), Some("release"));
}

#[test]
fn test_depends_step_on_itself_fails_the_build() {
    init_tracing();
    let build = BuildFileBuilder::new()
        .with_target(
            "loop",
            TargetConfigBuilder::new()
                .echo("before")
                .depends_step(&["loop"])
                .echo("never printed")
                .build(),
        )
        .build();

    let mut scheduler = Scheduler::from_build_file(&build);
    let mut runner = StepRunner::from_build_file(&build, &[]).unwrap();

    match scheduler.execute(&["loop"], &mut runner, Request::TopLevel) {
        Err(TargetdagError::SelfDependency(name)) => assert_eq!(name, "loop"),
        other => panic!("Expected SelfDependency, got: {:?}", other),
    }
}

#[test]
fn test_undefined_property_fails_with_step_context() {
    init_tracing();
    let build = BuildFileBuilder::new()
        .with_target(
            "A",
            TargetConfigBuilder::new().echo("value is ${nope}").build(),
        )
        .build();

    let mut scheduler = Scheduler::from_build_file(&build);
    let mut runner = StepRunner::from_build_file(&build, &[]).unwrap();

    let err = scheduler
        .execute(&["A"], &mut runner, Request::TopLevel)
        .unwrap_err();

    assert!(matches!(err, TargetdagError::TargetExecution { .. }));
    let msg = err.to_string();
    assert!(msg.contains("step 1 (echo) of target 'A'"), "{msg}");
    assert!(msg.contains("property 'nope' is not defined"), "{msg}");
}

#[cfg(unix)]
#[test]
fn test_exec_step_failure_stops_the_build() {
    init_tracing();
    let build = BuildFileBuilder::new()
        .with_target("ok", TargetConfigBuilder::new().exec("true").build())
        .with_target(
            "broken",
            TargetConfigBuilder::new().depends("ok").exec("exit 3").build(),
        )
        .with_target("after", TargetConfigBuilder::new().depends("broken").build())
        .build();

    let mut scheduler = Scheduler::from_build_file(&build);
    let mut runner = StepRunner::from_build_file(&build, &[]).unwrap();

    let err = scheduler
        .execute(&["after"], &mut runner, Request::TopLevel)
        .unwrap_err();

    match &err {
        TargetdagError::TargetExecution { target, .. } => assert_eq!(target, "broken"),
        other => panic!("Expected TargetExecution, got: {:?}", other),
    }
    assert!(err.to_string().contains("exited with status 3"));
    assert_eq!(scheduler.executed_targets(), ["ok"]);
    assert!(!scheduler.is_executed("after"));
}
