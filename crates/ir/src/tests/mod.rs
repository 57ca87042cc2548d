use super::*;
use serde_json::{self, json, Value as JsonValue};
// Wire shape of units and results.

#[test]
fn unit_serializes_with_where_key() {
    let unit = Unit::vulnerable("src/A.java", vec![3, 7], "abc".into());
    let v: JsonValue = serde_json::to_value(&unit).unwrap();
    assert_eq!(
        v,
        json!({
            "where": "src/A.java",
            "attribute": "lines",
            "specific": [3, 7],
            "fingerprint": "abc"
        })
    );
}

#[test]
fn safe_unit_has_no_lines() {
    let unit = Unit::safe("B.java", "f00".into());
    assert!(unit.specific.is_empty());
    assert!(!unit.is_vulnerable());
    assert_eq!(unit.attribute, LINES);
}

#[test]
fn status_uses_uppercase_names() {
    assert_eq!(serde_json::to_value(Status::Open).unwrap(), json!("OPEN"));
    assert_eq!(serde_json::to_value(Status::Unknown).unwrap(), json!("UNKNOWN"));
    assert_eq!(Status::Closed.to_string(), "CLOSED");
}

#[test]
fn risk_parses_case_insensitively() {
    assert_eq!("HIGH".parse::<Risk>(), Ok(Risk::High));
    assert_eq!("medium".parse::<Risk>(), Ok(Risk::Medium));
    assert_eq!(
        "severe".parse::<Risk>(),
        Err("unknown risk 'severe'".to_string())
    );
    assert!(Risk::Low < Risk::High);
}

#[test]
fn report_flattens_result() {
    let report = CheckReport {
        id: "java.uses_system_exit".into(),
        description: "Use of System.exit".into(),
        risk: Risk::Low,
        result: CheckResult::unknown("File does not exist"),
    };
    let v: JsonValue = serde_json::to_value(&report).unwrap();
    assert_eq!(v["status"], "UNKNOWN");
    assert_eq!(v["message"], "File does not exist");
    assert_eq!(v["risk"], "low");
    assert_eq!(v["vulnerabilities"], json!([]));

    let back: CheckReport = serde_json::from_value(v).unwrap();
    assert_eq!(back, report);
}
