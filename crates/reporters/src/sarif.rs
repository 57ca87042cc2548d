//! Conversion of check reports to SARIF 2.1.0 specification.

use ir::{CheckReport, Risk, Unit};
use serde_sarif::sarif;

fn location(unit: &Unit, line: Option<usize>) -> sarif::Location {
    let artifact = sarif::ArtifactLocation::builder()
        .uri(unit.location.clone())
        .build();
    let physical = match line {
        Some(line) => sarif::PhysicalLocation::builder()
            .artifact_location(artifact)
            .region(sarif::Region::builder().start_line(line as i64).build())
            .build(),
        None => sarif::PhysicalLocation::builder()
            .artifact_location(artifact)
            .build(),
    };
    sarif::Location::builder().physical_location(physical).build()
}

/// One result per vulnerable unit, one location per matched line. Line 0
/// marks file-level evidence and gets no region.
pub fn to_sarif(reports: &[CheckReport]) -> sarif::Sarif {
    let results: Vec<sarif::Result> = reports
        .iter()
        .flat_map(|r| r.result.vulnerabilities.iter().map(move |u| (r, u)))
        .map(|(r, unit)| {
            let mut locations: Vec<sarif::Location> = unit
                .specific
                .iter()
                .filter(|l| **l > 0)
                .map(|l| location(unit, Some(*l)))
                .collect();
            if locations.is_empty() {
                locations.push(location(unit, None));
            }

            let level = match r.risk {
                Risk::Low => sarif::ResultLevel::Note,
                Risk::Medium => sarif::ResultLevel::Warning,
                Risk::High => sarif::ResultLevel::Error,
            };

            sarif::Result::builder()
                .rule_id(r.id.clone())
                .message(
                    sarif::Message::builder()
                        .text(r.result.message.clone())
                        .build(),
                )
                .level(level)
                .locations(locations)
                .build()
        })
        .collect();

    sarif::Sarif::builder()
        .version(serde_json::json!("2.1.0"))
        .schema(sarif::SCHEMA_URL.to_string())
        .runs(vec![sarif::Run::builder()
            .tool(
                sarif::Tool::builder()
                    .driver(sarif::ToolComponent::builder().name("Asserts").build())
                    .build(),
            )
            .results(results)
            .build()])
        .build()
}
