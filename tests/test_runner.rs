use mutant_campaign::runner::{self, CommandHarness, HarnessRun, TestHarness};
use tempfile::TempDir;

const FAILING_REPORT: &str = r#"{"stats":{"failures":1},"suites":{"tests":[{"title":"t","fullTitle":"Suite ~A1~ adds numbers.","fail":true}],"suites":[]}}"#;

fn harness(dir: &TempDir, cmd: String) -> CommandHarness {
    CommandHarness::new(cmd, dir.path(), dir.path().join("out").join("report.json"))
}

#[cfg(unix)]
#[test]
fn reads_report_written_by_command() {
    let dir = TempDir::new().unwrap();
    let cmd = format!("mkdir -p out && printf '%s' '{}' > out/report.json", FAILING_REPORT);
    let mut h = harness(&dir, cmd);
    match h.run_tests() {
        HarnessRun::Report(report) => {
            assert_eq!(report.run_result().failing, vec!["A1: adds numbers"]);
        }
        other => panic!("expected a report, got {:?}", other),
    }
    // consumed reports are removed so the next run cannot reuse them
    assert!(!dir.path().join("out").join("report.json").exists());
}

#[cfg(unix)]
#[test]
fn nonzero_exit_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let cmd = format!(
        "mkdir -p out && printf '%s' '{}' > out/report.json; exit 1",
        FAILING_REPORT
    );
    let mut h = harness(&dir, cmd);
    assert!(matches!(h.run_tests(), HarnessRun::Report(_)));
}

#[cfg(unix)]
#[test]
fn missing_report() {
    let dir = TempDir::new().unwrap();
    let mut h = harness(&dir, "exit 2".to_string());
    assert!(matches!(h.run_tests(), HarnessRun::Missing));
}

#[cfg(unix)]
#[test]
fn stale_report_is_discarded_before_running() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("out")).unwrap();
    std::fs::write(dir.path().join("out").join("report.json"), FAILING_REPORT).unwrap();
    let mut h = harness(&dir, "true".to_string());
    assert!(matches!(h.run_tests(), HarnessRun::Missing));
}

#[cfg(unix)]
#[test]
fn unparsable_report() {
    let dir = TempDir::new().unwrap();
    let mut h = harness(&dir, "mkdir -p out && echo 'not json' > out/report.json".to_string());
    assert!(matches!(h.run_tests(), HarnessRun::Unreadable(_)));
}

#[test]
fn closures_are_harnesses() {
    let mut calls = 0;
    let mut fake = || {
        calls += 1;
        HarnessRun::Missing
    };
    fake.run_tests();
    fake.run_tests();
    assert_eq!(calls, 2);
}

#[test]
fn diff_shows_changed_lines() {
    let diff = runner::generate_diff("a\nif (x) {\nb\n", "a\nif (false) {\nb\n");
    assert_eq!(diff, "- if (x) {\n+ if (false) {\n");
}
