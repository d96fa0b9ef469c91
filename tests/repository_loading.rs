mod common;

use common::as_of;
use portfolio_insights::loader::{repository_for_path, InMemoryRepository};
use portfolio_insights::{build_portfolio_report, ProjectRepository, ProjectStatus, SeriesOptions};
use pretty_assertions::assert_eq;
use std::io::Write;

const PROJECTS_JSON: &str = r#"[
  {"id": "p-1", "name": "Quality Inspection", "type": "AI System", "status": "Deployed",
   "department": "Manufacturing", "owner": "Ana", "readinessScore": 88,
   "dataSources": [{"type": "camera", "connection": "rtsp://line-1", "authKind": "token"}],
   "startDate": "2025-02-01"},
  {"id": "p-2", "name": "Ticket Routing", "type": "Automation", "status": "Active",
   "department": "Support", "readinessScore": "61"},
  {"id": "p-3", "name": "Spend Cube", "type": "Analytics", "status": "Archived",
   "readinessScore": "unknown"},
  {"id": "p-4", "name": "GPU Cluster", "type": "Infrastructure", "status": "on hold",
   "department": "Support", "readinessScore": 42}
]"#;

fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp file");
    file.write_all(contents.as_bytes()).expect("write fixture");
    file
}

#[test]
fn json_file_flows_through_to_report() {
    let file = temp_file(".json", PROJECTS_JSON);
    let repo = repository_for_path(file.path()).expect("json repository");
    let (records, load_report) = repo.load().expect("load");

    assert_eq!(load_report.total_rows, 4);
    assert_eq!(load_report.status_fallbacks, 1);
    assert_eq!(load_report.defaulted_scores, 1);

    let statuses: Vec<ProjectStatus> = records.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            ProjectStatus::Completed,
            ProjectStatus::InProgress,
            ProjectStatus::Planning,
            ProjectStatus::OnHold,
        ]
    );

    let report = build_portfolio_report(&records, &SeriesOptions::new(as_of()));
    let m = &report.dashboard.metrics;
    assert_eq!(m.total_projects, 4);
    assert_eq!(m.total_data_sources, 1);
    // 88 + 61 + 0 + 42
    assert_eq!(m.overall_readiness, 47.75);
    assert!(report.dashboard.departments.contains_key("Unassigned"));
    assert_eq!(report.dashboard.departments["Support"].count, 2);

    let risks: Vec<&str> = report
        .insights
        .risk_factors
        .iter()
        .map(|r| r.risk.as_str())
        .collect();
    assert_eq!(risks, vec!["Low Average Readiness"]);
}

#[test]
fn csv_file_loads_the_same_portfolio() {
    let csv = "\
Id,Name,Type,Status,Department,Owner,ReadinessScore,DataSources,StartDate
p-1,Quality Inspection,AI System,Deployed,Manufacturing,Ana,88,camera|rtsp://line-1|token,2025-02-01
p-2,Ticket Routing,Automation,Active,Support,,61,,
p-3,Spend Cube,Analytics,Archived,,,unknown,,
p-4,GPU Cluster,Infrastructure,on hold,Support,,42,,
";
    let file = temp_file(".csv", csv);
    let (from_csv, _) = repository_for_path(file.path())
        .expect("csv repository")
        .load()
        .expect("load");

    let json = temp_file(".json", PROJECTS_JSON);
    let (from_json, _) = repository_for_path(json.path())
        .expect("json repository")
        .load()
        .expect("load");

    assert_eq!(from_csv, from_json);
}

#[test]
fn in_memory_repository_feeds_the_engine() {
    let records = common::sample_portfolio();
    let repo = InMemoryRepository::new(records.clone());
    let (loaded, _) = repo.load().expect("load");
    assert_eq!(loaded, records);

    let report = build_portfolio_report(&loaded, &SeriesOptions::new(as_of()).without_forecast());
    assert_eq!(report.dashboard.series.len(), 6);
}
