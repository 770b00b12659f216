//! Reference scenarios run through all three scorers.
//!
//! - A: leaf/parent pair with one usage edge.
//! - B: two-mission hierarchy cycle.
//! - C: an isolated mission.
//! - Determinism across repeated calls on the same graph.

use missionrank_core::{ErrorCode, GraphPayload, MissionGraph, ScoringConfig, TraversalLimits};
use missionrank_scoring::{bottom_up, criticality, importance};

fn build(payload: &GraphPayload) -> MissionGraph {
    MissionGraph::build(payload, &TraversalLimits::default()).expect("build")
}

fn scenario_a() -> GraphPayload {
    GraphPayload::from_json_str(
        r#"{
            "Mission": [
                {"UUID": "M1", "Name": "M1"},
                {"UUID": "M2", "Name": "M2"}
            ],
            "OperationalData": [
                {"UUID": "D1", "Name": "D1"},
                {"UUID": "D2", "Name": "D2"}
            ],
            "MissionHierarchy": [
                {"ChildMission": "M1", "ParentMission": "M2"}
            ],
            "Mission_OperationalData": [
                {"OperationalData": "D1", "Mission": "M1"}
            ]
        }"#,
    )
    .expect("scenario A parses")
}

fn scenario_b() -> GraphPayload {
    GraphPayload::default()
        .mission("A", "Alpha")
        .mission("B", "Bravo")
        .data_asset("D", "Data")
        .child_of("A", "B")
        .child_of("B", "A")
        .uses("A", "D")
}

fn scenario_c() -> GraphPayload {
    GraphPayload::default()
        .mission("M", "Lonely")
        .data_asset("D", "Unused")
}

// ---------------------------------------------------------------------------
// Scenario A
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_bottom_up_matrix() {
    let graph = build(&scenario_a());
    let report = bottom_up(&graph, &TraversalLimits::default()).expect("acyclic");
    assert_eq!(report.mission_labels, ["M1", "M2"]);
    assert_eq!(report.data_labels, ["D1", "D2"]);
    assert_eq!(report.matrix.row(0), &[100.0, 0.0]);
    assert_eq!(report.matrix.row(1), &[100.0, 0.0]);
}

#[test]
fn scenario_a_criticality() {
    let graph = build(&scenario_a());
    let report = criticality(&graph, &TraversalLimits::default()).expect("acyclic");
    // D1 is used by M1; D2 by nobody.
    assert_eq!(report.breadth["D1"], 1);
    assert_eq!(report.breadth["D2"], 0);
    assert!((report.raw["D1"] - 2.0).abs() < 1e-12);
    assert!((report.raw["D2"] - 1.0).abs() < 1e-12);
    assert!((report.normalized["D1"] - 4.0).abs() < 1e-12);
    assert!((report.normalized["D2"] - 1.0).abs() < 1e-12);
}

#[test]
fn scenario_a_importance() {
    let graph = build(&scenario_a());
    let report = importance(&graph, &ScoringConfig::default()).expect("importance");
    assert!((report.per_mission["M1"]["D1"] - 1.0).abs() < 1e-12);
    assert!((report.per_mission["M2"]["D1"] - 1.0).abs() < 1e-12);
    assert!(!report.per_mission["M1"].contains_key("D2"));
    assert_eq!(report.matrix.get(0, 1), Some(0.0));
}

// ---------------------------------------------------------------------------
// Scenario B
// ---------------------------------------------------------------------------

#[test]
fn scenario_b_bottom_up_rejects_cycle() {
    let graph = build(&scenario_b());
    let err = bottom_up(&graph, &TraversalLimits::default()).expect_err("cycle");
    assert_eq!(err.code(), ErrorCode::CyclicHierarchy);
    assert!(err.to_string().contains('A'));
    assert!(err.to_string().contains('B'));
}

#[test]
fn scenario_b_criticality_rejects_cycle() {
    let graph = build(&scenario_b());
    let err = criticality(&graph, &TraversalLimits::default()).expect_err("cycle");
    assert_eq!(err.code(), ErrorCode::CyclicHierarchy);
}

#[test]
fn scenario_b_cycle_names_component_members() {
    let graph = build(&scenario_b());
    let err = bottom_up(&graph, &TraversalLimits::default()).expect_err("cycle");
    match err {
        missionrank_core::ScoringError::CyclicHierarchy { components } => {
            assert_eq!(components, vec![vec!["A".to_string(), "B".to_string()]]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Scenario C
// ---------------------------------------------------------------------------

#[test]
fn scenario_c_zero_row_and_empty_importance() {
    let graph = build(&scenario_c());
    let usage = bottom_up(&graph, &TraversalLimits::default()).expect("acyclic");
    assert_eq!(usage.matrix.row(0), &[0.0]);

    let report = importance(&graph, &ScoringConfig::default()).expect("importance");
    assert!(report.per_mission["M"].is_empty());
    assert_eq!(report.matrix.row(0), &[0.0]);
    assert!(report.matrix.iter_rows().flatten().all(|v| !v.is_nan()));
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

fn mixed_payload() -> GraphPayload {
    GraphPayload::default()
        .mission("root", "Root")
        .mission("left", "Left")
        .mission("right", "Right")
        .mission("shared", "Shared")
        .data_asset("d0", "D0")
        .data_asset("d1", "D1")
        .data_asset("d2", "D2")
        .child_of("left", "root")
        .child_of("right", "root")
        .child_of("shared", "left")
        .child_of("shared", "right")
        .uses("shared", "d0")
        .uses("right", "d1")
        .uses("left", "d2")
        .uses("shared", "d2")
}

#[test]
fn repeated_runs_are_bit_identical() {
    let graph = build(&mixed_payload());
    let limits = TraversalLimits::default();
    let config = ScoringConfig::default();

    let first = (
        bottom_up(&graph, &limits).expect("bottom-up"),
        criticality(&graph, &limits).expect("criticality"),
        importance(&graph, &config).expect("importance"),
    );
    for _ in 0..5 {
        assert_eq!(bottom_up(&graph, &limits).expect("bottom-up"), first.0);
        assert_eq!(criticality(&graph, &limits).expect("criticality"), first.1);
        assert_eq!(importance(&graph, &config).expect("importance"), first.2);
    }
}

#[test]
fn rebuilt_graph_gives_identical_results() {
    let a = build(&mixed_payload());
    let b = build(&mixed_payload());
    assert_eq!(a.content_hash(), b.content_hash());
    assert_eq!(
        importance(&a, &ScoringConfig::default()).expect("a"),
        importance(&b, &ScoringConfig::default()).expect("b"),
    );
}

#[test]
fn duplicate_edges_do_not_change_bottom_up_mean() {
    let plain = build(&mixed_payload());
    let doubled = build(
        &mixed_payload()
            .child_of("left", "root")
            .uses("shared", "d0"),
    );
    let limits = TraversalLimits::default();
    assert_eq!(
        bottom_up(&plain, &limits).expect("plain").matrix,
        bottom_up(&doubled, &limits).expect("doubled").matrix,
    );
}

#[test]
fn scorers_can_run_on_separate_threads() {
    let graph = build(&mixed_payload());
    let limits = TraversalLimits::default();
    let config = ScoringConfig::default();

    std::thread::scope(|s| {
        let usage = s.spawn(|| bottom_up(&graph, &limits));
        let crit = s.spawn(|| criticality(&graph, &limits));
        let imp = s.spawn(|| importance(&graph, &config));
        assert!(usage.join().expect("join").is_ok());
        assert!(crit.join().expect("join").is_ok());
        assert!(imp.join().expect("join").is_ok());
    });
}

// ---------------------------------------------------------------------------
// Deep hierarchies
// ---------------------------------------------------------------------------

/// `m0 → m1 → … → m{len-1} → d`.
fn chain(len: usize) -> GraphPayload {
    let mut payload = GraphPayload::default().data_asset("d", "D");
    for i in 0..len {
        payload = payload.mission(&format!("m{i}"), &format!("M{i}"));
    }
    for i in 1..len {
        payload = payload.child_of(&format!("m{i}"), &format!("m{}", i - 1));
    }
    payload.uses(&format!("m{}", len - 1), "d")
}

#[test]
fn deep_chain_scores_on_a_small_stack() {
    let graph = build(&chain(5_000));
    let limits = TraversalLimits::default();
    let config = ScoringConfig::default();

    let worker = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let usage = bottom_up(&graph, &limits).expect("bottom-up");
            let crit = criticality(&graph, &limits).expect("criticality");
            let imp = importance(&graph, &config).expect("importance");
            (usage, crit, imp)
        })
        .expect("spawn");
    let (usage, crit, imp) = worker.join().expect("no stack overflow");

    assert!(usage.matrix.iter_rows().all(|row| row == [100.0]));
    assert_eq!(crit.breadth["d"], 1);
    assert!((imp.per_mission["m0"]["d"] - 1.0).abs() < 1e-12);
}
