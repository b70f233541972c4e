use mutant_campaign::report::{self, TITLE_DELIMITER, TestReport, TitleParts};

const REPORT: &str = r#"{
  "stats": { "suites": 3, "tests": 5, "passes": 2, "pending": 1, "failures": 2, "skipped": 0 },
  "suites": {
    "title": "",
    "tests": [
      { "title": "top", "fullTitle": "~T0~ top level works.", "pass": true, "fail": false, "pending": false, "skipped": false }
    ],
    "suites": [
      {
        "title": "Facade",
        "tests": [
          { "title": "rejects", "fullTitle": "Facade ~Q1~ should reject empty queries.", "pass": false, "fail": true, "pending": false, "skipped": false },
          { "title": "accepts", "fullTitle": "Facade ~Q2~ should accept queries", "pass": true, "fail": false, "pending": false, "skipped": false }
        ],
        "suites": [
          {
            "title": "nested",
            "tests": [
              { "title": "plain", "fullTitle": "nested plain title.", "pass": false, "fail": true, "pending": false, "skipped": false },
              { "title": "todo", "fullTitle": "nested ~T9~ later", "pass": false, "fail": false, "pending": true, "skipped": false }
            ],
            "suites": []
          }
        ]
      }
    ]
  }
}"#;

#[test]
fn flattening_collects_every_test_in_order() {
    let report = TestReport::from_json(REPORT).unwrap();
    let titles: Vec<&str> = report.all_tests().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["top", "rejects", "accepts", "plain", "todo"]);
}

#[test]
fn run_result_partitions_by_flag() {
    let result = TestReport::from_json(REPORT).unwrap().run_result();
    assert_eq!(
        result.failing,
        vec!["Q1: should reject empty queries", "nested plain title"]
    );
    assert_eq!(
        result.passing,
        vec!["T0: top level works", "Q2: should accept queries"]
    );
    assert_eq!(result.pending, vec!["T9: later"]);
    assert!(result.skipped.is_empty());
    assert!(result.is_killed());
}

#[test]
fn all_passing_report_survives() {
    let json = r#"{"stats": {}, "suites": {"tests": [
        {"title": "a", "fullTitle": "a", "pass": true}
    ], "suites": []}}"#;
    let result = TestReport::from_json(json).unwrap().run_result();
    assert!(!result.is_killed());
    assert_eq!(result.passing, vec!["a"]);
}

#[test]
fn empty_report_has_no_tests() {
    let report = TestReport::from_json("{}").unwrap();
    assert!(report.all_tests().is_empty());
    assert!(!report.run_result().is_killed());
}

#[test]
fn malformed_report_is_an_error() {
    assert!(TestReport::from_json("{ not json").is_err());
}

#[test]
fn title_with_name() {
    let parts = report::parse_title("Facade ~Q1~ should reject.", TITLE_DELIMITER);
    assert_eq!(
        parts,
        TitleParts {
            name: "Q1".to_string(),
            description: "should reject".to_string(),
        }
    );
    assert_eq!(report::format_title(&parts), "Q1: should reject");
}

#[test]
fn title_without_delimiters() {
    let parts = report::parse_title("just a description", TITLE_DELIMITER);
    assert_eq!(parts.name, "");
    assert_eq!(report::format_title(&parts), "just a description");
}

#[test]
fn title_with_single_delimiter_keeps_tail() {
    let parts = report::parse_title("prefix ~ tail text.", TITLE_DELIMITER);
    assert_eq!(parts.name, "");
    assert_eq!(parts.description, "tail text");
}

#[test]
fn only_one_trailing_period_is_removed() {
    let parts = report::parse_title("~A~ wait...", TITLE_DELIMITER);
    assert_eq!(report::format_title(&parts), "A: wait..");
}
