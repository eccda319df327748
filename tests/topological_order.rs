// tests/topological_order.rs

use targetdag::dag::{Target, TargetGraph, topological_order};
use targetdag::errors::TargetdagError;
use targetdag_test_utils::builders::GraphBuilder;

#[test]
fn test_chain_is_ordered_dependencies_first() {
    let graph = GraphBuilder::new()
        .target("A", &[])
        .target("B", &["A"])
        .target("C", &["B"])
        .build();

    let order = topological_order("C", &graph).unwrap();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn test_root_is_last_and_unreachable_targets_are_left_out() {
    let graph = GraphBuilder::new()
        .target("A", &[])
        .target("B", &["A"])
        .target("unrelated", &[])
        .build();

    let order = topological_order("B", &graph).unwrap();
    assert_eq!(order, vec!["A", "B"]);
    assert_eq!(order.last().map(String::as_str), Some("B"));
}

#[test]
fn test_diamond_emits_shared_dependency_once_in_declaration_order() {
    // D depends on B then C; both depend on A.
    let graph = GraphBuilder::new()
        .target("A", &[])
        .target("B", &["A"])
        .target("C", &["A"])
        .target("D", &["B", "C"])
        .build();

    let order = topological_order("D", &graph).unwrap();
    assert_eq!(order, vec!["A", "B", "C", "D"]);
}

#[test]
fn test_declaration_order_decides_between_independent_dependencies() {
    let graph = GraphBuilder::new()
        .target("x", &[])
        .target("y", &[])
        .target("z", &[])
        .target("all", &["z", "x", "y"])
        .build();

    let order = topological_order("all", &graph).unwrap();
    assert_eq!(order, vec!["z", "x", "y", "all"]);
}

#[test]
fn test_two_target_cycle_mentions_both_targets() {
    let graph = GraphBuilder::new()
        .target("A", &["B"])
        .target("B", &["A"])
        .build();

    match topological_order("A", &graph) {
        Err(TargetdagError::CircularDependency { chain }) => {
            assert_eq!(chain, vec!["A", "B", "A"]);
        }
        other => panic!("Expected CircularDependency, got: {:?}", other),
    }
}

#[test]
fn test_cycle_message_carries_full_chain() {
    let graph = GraphBuilder::new()
        .target("A", &["B"])
        .target("B", &["C"])
        .target("C", &["A"])
        .build();

    let err = topological_order("A", &graph).unwrap_err();
    assert_eq!(err.to_string(), "Circular dependency: A <- B <- C <- A");
}

#[test]
fn test_cycle_below_the_root_starts_at_the_revisited_target() {
    let graph = GraphBuilder::new()
        .target("root", &["A"])
        .target("A", &["B"])
        .target("B", &["A"])
        .build();

    match topological_order("root", &graph) {
        Err(TargetdagError::CircularDependency { chain }) => {
            assert_eq!(chain, vec!["A", "B", "A"]);
        }
        other => panic!("Expected CircularDependency, got: {:?}", other),
    }
}

#[test]
fn test_target_depending_on_itself_is_a_cycle() {
    let graph = GraphBuilder::new().target("A", &["A"]).build();

    match topological_order("A", &graph) {
        Err(TargetdagError::CircularDependency { chain }) => {
            assert_eq!(chain, vec!["A", "A"]);
        }
        other => panic!("Expected CircularDependency, got: {:?}", other),
    }
}

#[test]
fn test_unknown_root_is_reported() {
    let graph = GraphBuilder::new().target("A", &[]).build();

    match topological_order("missing", &graph) {
        Err(TargetdagError::UnknownTarget { name, required_by }) => {
            assert_eq!(name, "missing");
            assert_eq!(required_by, None);
        }
        other => panic!("Expected UnknownTarget, got: {:?}", other),
    }
}

#[test]
fn test_unknown_dependency_names_the_requiring_target() {
    let graph = GraphBuilder::new()
        .target("A", &[])
        .target("B", &["A", "ghost"])
        .build();

    let err = topological_order("B", &graph).unwrap_err();
    match &err {
        TargetdagError::UnknownTarget { name, required_by } => {
            assert_eq!(name, "ghost");
            assert_eq!(required_by.as_deref(), Some("B"));
        }
        other => panic!("Expected UnknownTarget, got: {:?}", other),
    }
    assert!(err.to_string().contains("required by 'B'"));
}

#[test]
fn test_very_long_chain_resolves_without_exhausting_the_stack() {
    const LEN: usize = 20_000;
    let graph: TargetGraph = (0..LEN)
        .map(|i| {
            let dep = format!("t{}", i.saturating_sub(1));
            let depends: Vec<&str> = if i == 0 { vec![] } else { vec![dep.as_str()] };
            Target::new(format!("t{i}"), &depends)
        })
        .collect();

    let order = topological_order(&format!("t{}", LEN - 1), &graph).unwrap();

    assert_eq!(order.len(), LEN);
    assert_eq!(order.first().map(String::as_str), Some("t0"));
    assert_eq!(order.last().map(String::as_str), Some("t19999"));
}

#[test]
fn test_cycle_at_the_end_of_a_long_chain_is_reported() {
    const LEN: usize = 5_000;
    let graph: TargetGraph = (0..LEN)
        .map(|i| {
            // t0 closes the loop back to the last target.
            let dep = if i == 0 {
                format!("t{}", LEN - 1)
            } else {
                format!("t{}", i - 1)
            };
            Target::new(format!("t{i}"), &[dep.as_str()])
        })
        .collect();

    match topological_order("t4999", &graph) {
        Err(TargetdagError::CircularDependency { chain }) => {
            assert_eq!(chain.len(), LEN + 1);
            assert_eq!(chain.first(), chain.last());
            assert_eq!(chain[1], "t4998");
        }
        other => panic!("Expected CircularDependency, got: {:?}", other),
    }
}
