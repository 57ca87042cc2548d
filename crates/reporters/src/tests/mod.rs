use crate::{color_risk, color_status, evidence, write_reports, Format, ScanInfo};
use ir::{CheckReport, CheckResult, Risk, Status, Unit};
use std::path::PathBuf;

fn sample_reports() -> Vec<CheckReport> {
    let mut exit = CheckResult::new(Status::Open, "Code uses System.exit method");
    exit.vulnerabilities = vec![Unit::vulnerable("src/App.java", vec![3, 7], "f00d".into())];
    exit.safes = vec![Unit::safe("src/Util.java", "beef".into())];
    vec![
        CheckReport {
            id: "java.uses_system_exit".into(),
            description: "System.exit calls".into(),
            risk: Risk::Low,
            result: exit,
        },
        CheckReport {
            id: "java.uses_md5_hash".into(),
            description: "MD5 hashing".into(),
            risk: Risk::Medium,
            result: CheckResult::new(
                Status::Closed,
                "Code does not use MessageDigest.getInstance(\"MD5\") method",
            ),
        },
    ]
}

fn render(reports: &[CheckReport], fmt: Format, info: Option<&ScanInfo>) -> String {
    let mut buf = Vec::new();
    write_reports(&mut buf, reports, fmt, info).unwrap();
    String::from_utf8(buf).unwrap()
}

fn golden_json() -> serde_json::Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/json/reports.json");
    let expected = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&expected).unwrap()
}

#[test]
fn json_matches_golden() {
    let rendered: serde_json::Value =
        serde_json::from_str(&render(&sample_reports(), Format::Json, None)).unwrap();
    assert_eq!(rendered, golden_json());
}

#[test]
fn json_differs_with_wrong_data() {
    let mut reports = sample_reports();
    reports[0].risk = Risk::High;
    let rendered: serde_json::Value =
        serde_json::from_str(&render(&reports, Format::Json, None)).unwrap();
    assert_ne!(rendered, golden_json());
}

#[test]
fn text_lists_open_checks_with_their_lines() {
    let out = render(&sample_reports(), Format::Text, None);
    assert!(out.contains("java.uses_system_exit"));
    assert!(out.contains("    Code uses System.exit method"));
    assert!(out.contains("↳  src/App.java: 3, 7"));
    assert!(!out.contains("java.uses_md5_hash"));
    assert!(out.contains("Total: 1 open, 1 closed, 0 unknown"));
}

#[test]
fn text_without_findings() {
    let info = ScanInfo {
        checks_run: 2,
        files_read: 4,
        duration_ms: 5,
    };
    let out = render(&sample_reports()[1..], Format::Text, Some(&info));
    assert!(out.contains("│ Scan Status │"));
    assert!(out.contains("Ran 2 checks over 4 files in 5ms"));
    assert!(out.contains("✔ No open findings."));
}

#[test]
fn unknown_results_are_shown() {
    let report = CheckReport {
        id: "text.has_text".into(),
        description: "Bad text present".into(),
        risk: Risk::Low,
        result: CheckResult::unknown("File does not exist"),
    };
    let out = render(&[report], Format::Text, None);
    assert!(out.contains(&color_status(Status::Unknown)));
    assert!(out.contains("File does not exist"));
}

#[test]
fn sarif_has_a_result_per_unit() {
    let rendered: serde_json::Value =
        serde_json::from_str(&render(&sample_reports(), Format::Sarif, None)).unwrap();
    let results = rendered["runs"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["level"], "note");
    assert_eq!(rendered["runs"][0]["tool"]["driver"]["name"], "Asserts");
}

#[test]
fn colors() {
    assert_eq!(color_status(Status::Open), "\x1b[31mOPEN\x1b[0m");
    assert_eq!(color_status(Status::Closed), "\x1b[32mCLOSED\x1b[0m");
    assert_eq!(color_risk(Risk::Medium), "\x1b[33mMEDIUM\x1b[0m");
}

#[test]
fn file_level_evidence_has_no_lines() {
    let unit = Unit::vulnerable("id_rsa", vec![0], String::new());
    assert_eq!(evidence(&unit), "id_rsa");
}
