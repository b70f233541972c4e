use mutant_campaign::mutants::{PlanOutcome, SkipReason};
use mutant_campaign::state::{self, CampaignSummary, PlanResult};
use tempfile::TempDir;

fn result(index: usize, outcome: PlanOutcome) -> PlanResult {
    PlanResult {
        index,
        file: "src/app.js".into(),
        line: 3,
        operator: "IfStatement".into(),
        original: "if (a) {}".into(),
        outcome,
    }
}

fn sample() -> CampaignSummary {
    let mut summary = CampaignSummary::new("deadbeef");
    summary.push(result(
        0,
        PlanOutcome::Killed {
            failures: vec!["Q1: works".into()],
        },
    ));
    summary.push(result(1, PlanOutcome::Survived));
    summary.push(result(
        2,
        PlanOutcome::Unreported {
            detail: "no report written".into(),
        },
    ));
    summary.push(result(
        3,
        PlanOutcome::Skipped {
            reason: SkipReason::NodeNotFound(7),
        },
    ));
    summary.duration_ms = 1200;
    summary
}

#[test]
fn push_counts_outcomes() {
    let summary = sample();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.killed, 1);
    assert_eq!(summary.survived, 1);
    assert_eq!(summary.unreported, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.tested(), 3);
    assert!(summary.has_survivors());
    let survivors: Vec<usize> = summary.survivors().map(|r| r.index).collect();
    assert_eq!(survivors, vec![1, 2]);
}

#[test]
fn score_ignores_skipped_plans() {
    let summary = sample();
    assert!((summary.score() - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(CampaignSummary::new("x").score(), 1.0);
}

#[test]
fn outcomes_serialize_with_status_tag() {
    let json = serde_json::to_value(sample()).unwrap();
    assert_eq!(json["run_id"], "deadbeef");
    assert_eq!(json["results"][0]["outcome"]["status"], "killed");
    assert_eq!(json["results"][1]["outcome"]["status"], "survived");
    assert_eq!(json["results"][3]["outcome"]["status"], "skipped");
}

#[test]
fn save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".mutator-state.json");
    state::save_to_path(&sample(), &path).unwrap();

    let loaded = state::load_from_path(&path).unwrap();
    assert_eq!(loaded.run_id, "deadbeef");
    assert_eq!(loaded.total, 4);
    assert_eq!(loaded.duration_ms, 1200);
    assert_eq!(loaded.results[3].outcome, sample().results[3].outcome);
}

#[test]
fn load_missing_returns_none() {
    let dir = TempDir::new().unwrap();
    assert!(state::load_from_path(&dir.path().join("nope.json")).is_none());
}
