// Ingestion boundary: turns raw CSV/JSON project exports into clean
// `ProjectRecord`s. Nothing here rejects a row; bad fields are defaulted
// and counted so every input row reaches the engine.
use crate::error::{PortfolioError, Result};
use crate::types::{
    DataSource, ProjectRecord, ProjectStatus, ProjectType, RawProject, RawProjectRow, UNASSIGNED,
    UNTITLED,
};
use crate::util::{non_blank, parse_date_safe, parse_score_safe, score_from_json};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub malformed_rows: usize,
    pub defaulted_scores: usize,
    pub status_fallbacks: usize,
    pub type_fallbacks: usize,
}

/// Source of project records for the engine's callers.
pub trait ProjectRepository {
    fn load(&self) -> Result<(Vec<ProjectRecord>, LoadReport)>;
}

/// Pick a repository from the data file extension.
pub fn repository_for_path(path: &Path) -> Result<Box<dyn ProjectRepository + Send + Sync>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => Ok(Box::new(CsvProjectRepository::new(path))),
        Some("json") => Ok(Box::new(JsonProjectRepository::new(path))),
        _ => Err(PortfolioError::UnsupportedFormat(path.display().to_string())),
    }
}

pub struct CsvProjectRepository {
    path: PathBuf,
}

impl CsvProjectRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvProjectRepository { path: path.into() }
    }
}

impl ProjectRepository for CsvProjectRepository {
    fn load(&self) -> Result<(Vec<ProjectRecord>, LoadReport)> {
        info!(path = %self.path.display(), "loading projects from CSV");
        let file = std::fs::File::open(&self.path)?;
        parse_csv(file)
    }
}

pub struct JsonProjectRepository {
    path: PathBuf,
}

impl JsonProjectRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonProjectRepository { path: path.into() }
    }
}

impl ProjectRepository for JsonProjectRepository {
    fn load(&self) -> Result<(Vec<ProjectRecord>, LoadReport)> {
        info!(path = %self.path.display(), "loading projects from JSON");
        let text = std::fs::read_to_string(&self.path)?;
        parse_json(&text)
    }
}

/// Records that are already materialized, e.g. handed over by a sync layer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Vec<ProjectRecord>,
}

impl InMemoryRepository {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        InMemoryRepository { records }
    }
}

impl ProjectRepository for InMemoryRepository {
    fn load(&self) -> Result<(Vec<ProjectRecord>, LoadReport)> {
        let report = LoadReport {
            total_rows: self.records.len(),
            ..LoadReport::default()
        };
        Ok((self.records.clone(), report))
    }
}

pub fn parse_csv<R: Read>(reader: R) -> Result<(Vec<ProjectRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(reader);
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for (idx, result) in rdr.deserialize::<RawProjectRow>().enumerate() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = idx + 1, error = %e, "malformed CSV row, using defaults");
                report.malformed_rows += 1;
                RawProjectRow::default()
            }
        };
        let fields = RawFields {
            id: non_blank(row.id.as_deref()),
            name: non_blank(row.name.as_deref()),
            project_type: non_blank(row.project_type.as_deref()),
            status: non_blank(row.status.as_deref()),
            department: non_blank(row.department.as_deref()),
            owner: non_blank(row.owner.as_deref()),
            score: parse_score_safe(row.readiness_score.as_deref()),
            data_sources: parse_data_sources(row.data_sources.as_deref()),
            start_date: row.start_date,
        };
        records.push(clean(idx + 1, fields, &mut report));
    }

    debug!(rows = report.total_rows, "CSV ingestion finished");
    Ok((records, report))
}

/// Accepts either a bare array of projects or `{ "projects": [...] }`.
pub fn parse_json(text: &str) -> Result<(Vec<ProjectRecord>, LoadReport)> {
    let doc: serde_json::Value = serde_json::from_str(text)?;
    let items = match doc {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("projects") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Err(PortfolioError::UnexpectedJsonShape),
        },
        _ => return Err(PortfolioError::UnexpectedJsonShape),
    };

    let mut report = LoadReport::default();
    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        report.total_rows += 1;
        let raw = match serde_json::from_value::<RawProject>(item) {
            Ok(r) => r,
            Err(e) => {
                warn!(row = idx + 1, error = %e, "malformed project entry, using defaults");
                report.malformed_rows += 1;
                RawProject::default()
            }
        };
        let data_sources = raw
            .data_sources
            .unwrap_or_default()
            .into_iter()
            .map(|ds| DataSource {
                source_type: non_blank(ds.source_type.as_deref()).unwrap_or_else(|| "unknown".to_string()),
                connection: ds.connection.unwrap_or_default().trim().to_string(),
                auth_kind: non_blank(ds.auth_kind.as_deref()).unwrap_or_else(|| "none".to_string()),
            })
            .collect();
        let fields = RawFields {
            id: raw.id.as_ref().and_then(json_id),
            name: non_blank(raw.name.as_deref()),
            project_type: non_blank(raw.project_type.as_deref()),
            status: non_blank(raw.status.as_deref()),
            department: non_blank(raw.department.as_deref()),
            owner: non_blank(raw.owner.as_deref()),
            score: score_from_json(raw.readiness_score.as_ref()),
            data_sources,
            start_date: raw.start_date,
        };
        records.push(clean(idx + 1, fields, &mut report));
    }

    debug!(rows = report.total_rows, "JSON ingestion finished");
    Ok((records, report))
}

struct RawFields {
    id: Option<String>,
    name: Option<String>,
    project_type: Option<String>,
    status: Option<String>,
    department: Option<String>,
    owner: Option<String>,
    score: Option<u8>,
    data_sources: Vec<DataSource>,
    start_date: Option<String>,
}

fn clean(row: usize, f: RawFields, report: &mut LoadReport) -> ProjectRecord {
    let status = match f.status.as_deref().map(str::parse::<ProjectStatus>) {
        Some(Ok(s)) => s,
        _ => {
            warn!(row, status = ?f.status, "unrecognized status, treating as Planning");
            report.status_fallbacks += 1;
            ProjectStatus::normalize(None)
        }
    };

    // An explicit "Other" is not a fallback.
    let project_type = match f.project_type.as_deref().map(str::parse::<ProjectType>) {
        Some(Ok(t)) => t,
        _ => {
            debug!(row, project_type = ?f.project_type, "unrecognized type, treating as Other");
            report.type_fallbacks += 1;
            ProjectType::normalize(None)
        }
    };

    let readiness_score = f.score.unwrap_or_else(|| {
        report.defaulted_scores += 1;
        0
    });

    ProjectRecord {
        id: f.id.unwrap_or_else(|| format!("project-{}", row)),
        name: f.name.unwrap_or_else(|| UNTITLED.to_string()),
        project_type,
        status,
        department: f.department.unwrap_or_else(|| UNASSIGNED.to_string()),
        owner: f.owner.unwrap_or_else(|| UNASSIGNED.to_string()),
        readiness_score,
        data_sources: f.data_sources,
        start_date: parse_date_safe(f.start_date.as_deref()),
    }
}

fn json_id(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) => non_blank(Some(s)),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `type|connection|auth` entries separated by `;`. Missing parts default.
fn parse_data_sources(raw: Option<&str>) -> Vec<DataSource> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(';')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, '|').map(str::trim);
            DataSource {
                source_type: non_blank(parts.next()).unwrap_or_else(|| "unknown".to_string()),
                connection: parts.next().unwrap_or_default().to_string(),
                auth_kind: non_blank(parts.next()).unwrap_or_else(|| "none".to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const CSV: &str = "\
Id,Name,Type,Status,Department,Owner,ReadinessScore,DataSources,StartDate
p1,Invoice OCR,AI System,Active,Finance,Dana,72,database|postgres://fin/db|password;api|https://erp/api|oauth,2025-03-01
p2,Route Planner,automation,Deployed,,Lee,88.4,,2024-11-15
p3,Churn Model,ml,Shelved,Sales,,n/a,,not-a-date
";

    #[test]
    fn csv_rows_are_normalized_not_dropped() {
        let (records, report) = parse_csv(CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            report,
            LoadReport {
                total_rows: 3,
                malformed_rows: 0,
                defaulted_scores: 1,
                status_fallbacks: 1,
                type_fallbacks: 0,
            }
        );

        assert_eq!(records[0].status, ProjectStatus::InProgress);
        assert_eq!(records[0].project_type, ProjectType::AISystem);
        assert_eq!(records[0].data_sources.len(), 2);
        assert_eq!(records[0].data_sources[1].auth_kind, "oauth");

        assert_eq!(records[1].status, ProjectStatus::Completed);
        assert_eq!(records[1].department, UNASSIGNED);
        assert_eq!(records[1].readiness_score, 88);

        assert_eq!(records[2].status, ProjectStatus::Planning);
        assert_eq!(records[2].readiness_score, 0);
        assert_eq!(records[2].owner, UNASSIGNED);
        assert_eq!(records[2].start_date, None);
    }

    #[test]
    fn json_accepts_wrapped_and_loose_entries() {
        let text = r#"{
            "projects": [
                {"id": 7, "name": "Forecasting", "type": "Analytics", "status": "In Progress",
                 "department": "Ops", "readinessScore": "64",
                 "dataSources": [{"type": "warehouse", "connection": "snowflake://x", "auth": "key"}],
                 "startDate": "2025-01-10"},
                {"name": "", "readinessScore": null},
                "not an object"
            ]
        }"#;

        let (records, report) = parse_json(text).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(report.malformed_rows, 1);
        assert_eq!(report.defaulted_scores, 2);

        assert_eq!(records[0].id, "7");
        assert_eq!(records[0].readiness_score, 64);
        assert_eq!(records[0].data_sources[0].source_type, "warehouse");
        assert_eq!(records[0].start_date, chrono::NaiveDate::from_ymd_opt(2025, 1, 10));

        assert_eq!(records[1].name, UNTITLED);
        assert_eq!(records[1].id, "project-2");
        assert_eq!(records[2].project_type, ProjectType::Other);
    }

    #[test]
    fn json_rejects_non_collection_documents() {
        let result = parse_json(r#"{"name": "lonely"}"#);
        assert!(matches!(result, Err(PortfolioError::UnexpectedJsonShape)));
    }

    #[test]
    fn repository_is_chosen_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let repo = repository_for_path(file.path()).unwrap();
        let (records, _) = repo.load().unwrap();
        assert_eq!(records.len(), 3);

        let err = repository_for_path(Path::new("projects.xlsx")).err();
        assert!(matches!(err, Some(PortfolioError::UnsupportedFormat(_))));
    }

    #[test]
    fn in_memory_repository_hands_back_records() {
        let repo = InMemoryRepository::new(vec![ProjectRecord::new("a", "Alpha")]);
        let (records, report) = repo.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.total_rows, 1);
    }
}
