//! End-to-end engine scenarios over the in-memory provider.

mod common;

use std::sync::{Arc, Mutex};

use posture_core::config::EngineConfig;
use posture_core::errors::EngineError;
use posture_core::events::{AssessmentSavedEvent, PostureEventHandler};
use posture_core::traits::{Cancellable, CancellationToken, ManualClock};
use posture_core::types::ControlStatus;
use posture_engine::ComplianceEngine;

use common::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("posture_engine=debug")
        .try_init();
}

/// One product, two systems, four controls across two functions.
/// System 1 holds the worked scoring example; system 2 is untouched.
fn two_system_fixture() -> MemoryProvider {
    init_tracing();
    let controls = vec![
        control(1, ("ID", "Identify", 1), ("ID.AM", "Asset Management")),
        control(2, ("ID", "Identify", 1), ("ID.AM", "Asset Management")),
        control(3, ("PR", "Protect", 2), ("PR.AC", "Access Control")),
        control(4, ("PR", "Protect", 2), ("PR.AC", "Access Control")),
    ];
    let baselines = vec![entry(100, 1), entry(100, 2), entry(100, 3), entry(100, 4)];
    let tree = vec![centre(
        1,
        "Digital",
        vec![framework(
            10,
            "Security",
            vec![product(
                100,
                "Payments",
                vec![system(1, "Gateway"), system(2, "Ledger")],
            )],
        )],
    )];
    let provider = MemoryProvider::new(controls, baselines, tree);
    provider.seed_assessments(vec![
        assessment(1, 1, 1, ControlStatus::Implemented),
        assessment(2, 1, 2, ControlStatus::Implemented),
        assessment(3, 1, 3, ControlStatus::PartiallyImplemented),
        assessment(4, 1, 4, ControlStatus::NotApplicable),
    ]);
    provider
}

#[test]
fn test_system_and_product_scores_match_worked_example() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    // (1 + 1 + 0.5) / 3 applicable after excluding the N/A slot.
    let score = engine.system_score(1).unwrap();
    assert_eq!(score.score, 83);
    assert_eq!(score.assessed_controls, 3);
    assert_eq!(score.applicable_controls, 4);
    assert_eq!(score.status_breakdown.implemented, 2);
    assert_eq!(score.status_breakdown.not_applicable, 1);

    let untouched = engine.system_score(2).unwrap();
    assert_eq!(untouched.score, 0);
    assert_eq!(untouched.coverage, 0);

    // Product is the union of both systems' slots: 5 half-points over
    // 7 (8 applicable minus one N/A).
    let product = engine.product_compliance(100).unwrap();
    assert_eq!(product.compliance_score, 36);
    assert_eq!(product.applicable_controls, 8);
    assert_eq!(product.assessed_controls, 3);
    assert_eq!(product.coverage, 38);
    assert_eq!(product.system_scores.len(), 2);
    assert_eq!(product.status_breakdown.not_assessed, 4);
}

#[test]
fn test_function_breakdown_groups_by_function_and_category() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    let view = engine.function_compliance(100, None).unwrap();
    assert_eq!(view.functions.len(), 2);

    let identify = &view.functions[0];
    assert_eq!(identify.function_code, "ID");
    // Controls 1 and 2 over two systems: 4 half-points over 4 slots.
    assert_eq!(identify.score, 50);
    assert_eq!(identify.categories.len(), 1);
    assert_eq!(identify.categories[0].category_code, "ID.AM");
    assert_eq!(identify.categories[0].score, 50);

    let protect = &view.functions[1];
    assert_eq!(protect.function_code, "PR");
    // One partial over 3 applicable slots (one N/A excluded).
    assert_eq!(protect.score, 17);

    // Scoped to the untouched system everything is unassessed.
    let scoped = engine.function_compliance(100, Some(2)).unwrap();
    assert_eq!(scoped.system_id, Some(2));
    assert!(scoped.functions.iter().all(|f| f.score == 0));
}

#[test]
fn test_gap_analysis_reports_partial_as_gap() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    let gaps = engine.gap_analysis(100).unwrap();
    assert_eq!(gaps.total_gaps, 1);
    assert_eq!(gaps.gaps[0].control_id, 3);
    assert_eq!(gaps.gaps[0].status, ControlStatus::PartiallyImplemented);
    assert_eq!(gaps.gaps[0].systems_affected, 1);
}

#[test]
fn test_matrix_has_virtual_cells_for_unassessed_pairs() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    let matrix = engine.assessment_matrix(100).unwrap();
    assert_eq!(matrix.rows.len(), 4);
    // Every system 2 cell is virtual.
    assert!(matrix
        .rows
        .iter()
        .all(|row| row.cells[&2].is_virtual()));
    assert_eq!(matrix.rows[0].cells[&1].assessment_id, Some(1));
}

#[test]
fn test_save_invalidates_own_scope_but_not_sibling_system() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider.clone(), EngineConfig::default());

    engine.system_score(1).unwrap();
    engine.system_score(2).unwrap();
    engine.product_compliance(100).unwrap();
    let reads_before = provider.assessment_reads();

    // Cached views are served without touching the provider.
    engine.system_score(1).unwrap();
    engine.product_compliance(100).unwrap();
    assert_eq!(provider.assessment_reads(), reads_before);

    // Upgrade the partial on system 1 to implemented.
    let saved = engine
        .save_assessment(draft(1, 3, ControlStatus::Implemented))
        .unwrap();
    assert_eq!(saved.assessment_id, 3); // update, not create

    // System 1 and the product recompute; system 2 stays cached.
    let score = engine.system_score(1).unwrap();
    assert_eq!(score.score, 100);
    let product = engine.product_compliance(100).unwrap();
    assert_eq!(product.compliance_score, 43);
    let reads_after = provider.assessment_reads();
    engine.system_score(2).unwrap();
    assert_eq!(provider.assessment_reads(), reads_after);
}

#[test]
fn test_save_rejects_system_and_control_outside_baseline() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    let err = engine
        .save_assessment(draft(99, 1, ControlStatus::Implemented))
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownEntity { .. }));

    let err = engine
        .save_assessment(draft(1, 99, ControlStatus::Implemented))
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownEntity { .. }));
}

#[test]
fn test_failed_write_requeues_draft_and_keeps_caches() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider.clone(), EngineConfig::default());

    let before = engine.product_compliance(100).unwrap().compliance_score;
    provider.set_fail_writes(true);

    let err = engine
        .save_assessment(draft(2, 1, ControlStatus::Implemented))
        .unwrap_err();
    assert!(matches!(err, EngineError::Write(_)));

    // Nothing was persisted and the draft awaits re-submission.
    assert_eq!(provider.assessment_count(), 4);
    assert_eq!(engine.autosave_pending(), 1);
    assert_eq!(
        engine.product_compliance(100).unwrap().compliance_score,
        before
    );
}

#[test]
fn test_autosave_persists_after_quiet_period() {
    let provider = two_system_fixture();
    let clock = ManualClock::new(0);
    let engine = ComplianceEngine::with_clock(
        provider.clone(),
        EngineConfig::default(),
        Arc::new(clock.clone()),
    );

    engine.queue_autosave(draft(2, 1, ControlStatus::Implemented));
    assert_eq!(engine.autosave_tick(), 0);
    assert!(provider.status_of(2, 1).is_none());

    clock.advance(3000);
    assert_eq!(engine.autosave_tick(), 1);
    assert_eq!(provider.status_of(2, 1), Some(ControlStatus::Implemented));
    assert_eq!(engine.autosave_pending(), 0);
}

#[test]
fn test_flush_autosave_saves_immediately() {
    let provider = two_system_fixture();
    let clock = ManualClock::new(0);
    let engine = ComplianceEngine::with_clock(
        provider.clone(),
        EngineConfig::default(),
        Arc::new(clock.clone()),
    );

    engine.queue_autosave(draft(2, 2, ControlStatus::PartiallyImplemented));
    let saved = engine.flush_autosave(2, 2).unwrap().unwrap();
    assert_eq!(saved.status, ControlStatus::PartiallyImplemented);
    assert!(engine.flush_autosave(2, 2).is_none());

    // The timer was consumed; a later tick saves nothing more.
    clock.advance(10_000);
    assert_eq!(engine.autosave_tick(), 0);
}

#[test]
fn test_delete_removes_row_and_virtual_delete_is_noop() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider.clone(), EngineConfig::default());

    engine.delete_assessment(1, 1).unwrap();
    assert!(provider.status_of(1, 1).is_none());
    assert_eq!(engine.system_score(1).unwrap().assessed_controls, 2);

    // Pair with no persisted row.
    engine.delete_assessment(2, 1).unwrap();
    assert_eq!(provider.assessment_count(), 3);
}

#[test]
fn test_save_events_carry_create_vs_update_flag() {
    struct Recorder {
        created: Mutex<Vec<bool>>,
    }
    impl PostureEventHandler for Recorder {
        fn on_assessment_saved(&self, event: &AssessmentSavedEvent) {
            self.created.lock().unwrap().push(event.created);
        }
    }

    let provider = two_system_fixture();
    let mut engine = ComplianceEngine::new(provider, EngineConfig::default());
    let recorder = Arc::new(Recorder {
        created: Mutex::new(Vec::new()),
    });
    engine.register_handler(recorder.clone());

    engine
        .save_assessment(draft(2, 1, ControlStatus::Implemented))
        .unwrap();
    engine
        .save_assessment(draft(2, 1, ControlStatus::NotImplemented))
        .unwrap();
    assert_eq!(*recorder.created.lock().unwrap(), vec![true, false]);
}

#[test]
fn test_hierarchy_rollup_and_generation_advance() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());
    let token = CancellationToken::new();

    let view = engine.hierarchy_with_scores(&token).unwrap();
    assert_eq!(view.total_systems, 2);
    assert_eq!(view.centres[0].frameworks[0].products[0].score, 36);
    let g0 = view.generation;

    engine
        .save_assessment(draft(2, 1, ControlStatus::Implemented))
        .unwrap();
    let view = engine.hierarchy_with_scores(&token).unwrap();
    assert!(engine.generation() > g0);
    assert_eq!(view.centres[0].frameworks[0].products[0].assessed_controls, 4);
}

#[test]
fn test_cancelled_hierarchy_returns_error() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());
    let token = CancellationToken::new();
    token.cancel();
    let err = engine.hierarchy_with_scores(&token).unwrap_err();
    assert!(matches!(err, EngineError::Cancelled));
}

#[test]
fn test_frameworks_merge_across_centres_by_case_insensitive_name() {
    let controls = vec![control(1, ("ID", "Identify", 1), ("ID.AM", "Assets"))];
    let baselines = vec![entry(100, 1), entry(200, 1)];
    let tree = vec![
        centre(
            1,
            "Digital",
            vec![framework(
                10,
                "Security",
                vec![product(100, "Payments", vec![system(1, "Gateway")])],
            )],
        ),
        centre(
            2,
            "Retail",
            vec![framework(
                20,
                "security",
                vec![product(200, "Stores", vec![system(2, "POS")])],
            )],
        ),
    ];
    let provider = MemoryProvider::new(controls, baselines, tree);
    provider.seed_assessments(vec![
        assessment(1, 1, 1, ControlStatus::Implemented),
        assessment(2, 2, 1, ControlStatus::PartiallyImplemented),
    ]);
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    let view = engine
        .hierarchy_with_scores(&CancellationToken::new())
        .unwrap();
    assert_eq!(view.framework_summaries.len(), 1);
    let merged = &view.framework_summaries[0];
    assert_eq!(merged.cc_names, vec!["Digital", "Retail"]);
    assert_eq!(merged.product_count, 2);
    assert_eq!(merged.system_count, 2);
    // Unweighted mean of 100 and 50.
    assert_eq!(merged.score, 75);
}

#[test]
fn test_product_without_baseline_errors_but_rolls_up_unassessed() {
    let controls = vec![control(1, ("ID", "Identify", 1), ("ID.AM", "Assets"))];
    // Product 200 has no baseline entries at all.
    let baselines = vec![entry(100, 1)];
    let tree = vec![centre(
        1,
        "Digital",
        vec![framework(
            10,
            "Security",
            vec![
                product(100, "Payments", vec![system(1, "Gateway")]),
                product(200, "Legacy", vec![system(2, "Mainframe")]),
            ],
        )],
    )];
    let provider = MemoryProvider::new(controls, baselines, tree);
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    let err = engine.product_compliance(200).unwrap_err();
    assert!(matches!(
        err,
        EngineError::NoBaselineConfigured { product_id: 200 }
    ));

    let view = engine
        .hierarchy_with_scores(&CancellationToken::new())
        .unwrap();
    let products = &view.centres[0].frameworks[0].products;
    assert!(!products[1].has_baseline);
    assert_eq!(products[1].applicable_controls, 0);
    assert_eq!(view.total_systems, 2);
}

#[test]
fn test_views_serialize_with_display_status_names() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    let matrix = engine.assessment_matrix(100).unwrap();
    let json = serde_json::to_value(&*matrix).unwrap();
    assert_eq!(json["rows"][0]["cells"]["1"]["status"], "Implemented");
    assert_eq!(json["rows"][0]["cells"]["2"]["status"], "Not Assessed");

    let gaps = engine.gap_analysis(100).unwrap();
    let json = serde_json::to_value(&*gaps).unwrap();
    assert_eq!(json["gaps"][0]["status"], "Partially Implemented");
    assert_eq!(json["total_gaps"], 1);
}

#[test]
fn test_risk_summary_counts_products_without_baseline() {
    let provider = two_system_fixture();
    let engine = ComplianceEngine::new(provider, EngineConfig::default());

    let summary = engine.risk_summary().unwrap();
    assert_eq!(summary.total_gaps, 1);
    // The single gap carries the control's default (medium) risk.
    assert_eq!(summary.breakdown.medium, 1);
    assert_eq!(summary.products_without_baseline, 0);
}
