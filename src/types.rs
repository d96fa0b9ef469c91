use crate::error::LabelError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

pub const UNASSIGNED: &str = "Unassigned";
pub const UNTITLED: &str = "Untitled Project";

/// Kind of initiative a project represents.
///
/// Variant order matters: it is the tie-break order when ranking types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    AISystem,
    Automation,
    Analytics,
    Infrastructure,
    Other,
}

/// Matches a free-form label, ignoring case, spaces, dashes and underscores.
impl FromStr for ProjectType {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "aisystem" | "aisystems" | "ai" | "machinelearning" | "ml" => Ok(ProjectType::AISystem),
            "automation" | "rpa" => Ok(ProjectType::Automation),
            "analytics" | "reporting" | "bi" => Ok(ProjectType::Analytics),
            "infrastructure" | "infra" | "platform" => Ok(ProjectType::Infrastructure),
            "other" => Ok(ProjectType::Other),
            _ => Err(LabelError::UnknownType(s.to_string())),
        }
    }
}

impl ProjectType {
    /// Unknown and missing labels land in `Other`.
    pub fn normalize(label: Option<&str>) -> Self {
        label
            .and_then(|l| l.parse().ok())
            .unwrap_or(ProjectType::Other)
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectType::AISystem => "AI System",
            ProjectType::Automation => "Automation",
            ProjectType::Analytics => "Analytics",
            ProjectType::Infrastructure => "Infrastructure",
            ProjectType::Other => "Other",
        };
        f.write_str(s)
    }
}

/// Lifecycle state of a project after legacy synonyms have been folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Completed,
    OnHold,
}

impl FromStr for ProjectStatus {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "planning" | "planned" | "proposed" | "draft" => Ok(ProjectStatus::Planning),
            "inprogress" | "active" | "development" | "indevelopment" | "pilot" | "ongoing" => {
                Ok(ProjectStatus::InProgress)
            }
            "completed" | "complete" | "deployed" | "done" | "live" | "production" => {
                Ok(ProjectStatus::Completed)
            }
            "onhold" | "paused" | "hold" | "suspended" | "blocked" => Ok(ProjectStatus::OnHold),
            _ => Err(LabelError::UnknownStatus(s.to_string())),
        }
    }
}

impl ProjectStatus {
    /// Unknown and missing labels fall back to `Planning`, so they stay in the open set.
    pub fn normalize(label: Option<&str>) -> Self {
        label
            .and_then(|l| l.parse().ok())
            .unwrap_or(ProjectStatus::Planning)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
        };
        f.write_str(s)
    }
}

fn squash(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub source_type: String,
    pub connection: String,
    pub auth_kind: String,
}

/// A project as the engine sees it: every field present, every enum closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub department: String,
    pub owner: String,
    pub readiness_score: u8,
    pub data_sources: Vec<DataSource>,
    pub start_date: Option<NaiveDate>,
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ProjectRecord {
            id: id.into(),
            name: name.into(),
            project_type: ProjectType::Other,
            status: ProjectStatus::Planning,
            department: UNASSIGNED.to_string(),
            owner: UNASSIGNED.to_string(),
            readiness_score: 0,
            data_sources: Vec::new(),
            start_date: None,
        }
    }

    pub fn with_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Blank department names are stored as `Unassigned`.
    pub fn with_department(mut self, department: &str) -> Self {
        let trimmed = department.trim();
        self.department = if trimmed.is_empty() {
            UNASSIGNED.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    pub fn with_readiness(mut self, score: u8) -> Self {
        self.readiness_score = score.min(100);
        self
    }

    pub fn readiness(&self) -> f64 {
        f64::from(self.readiness_score)
    }
}

/// One CSV row before cleaning. Every column is optional text.
#[derive(Debug, Default, Deserialize)]
pub struct RawProjectRow {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub project_type: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Department")]
    pub department: Option<String>,
    #[serde(rename = "Owner")]
    pub owner: Option<String>,
    #[serde(rename = "ReadinessScore")]
    pub readiness_score: Option<String>,
    /// `type|connection|auth` entries separated by `;`.
    #[serde(rename = "DataSources")]
    pub data_sources: Option<String>,
    #[serde(rename = "StartDate")]
    pub start_date: Option<String>,
}

/// One JSON document before cleaning. Scores and ids may arrive as numbers or strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProject {
    pub id: Option<serde_json::Value>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    pub status: Option<String>,
    pub department: Option<String>,
    pub owner: Option<String>,
    pub readiness_score: Option<serde_json::Value>,
    pub data_sources: Option<Vec<RawDataSource>>,
    pub start_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDataSource {
    #[serde(alias = "type")]
    pub source_type: Option<String>,
    pub connection: Option<String>,
    #[serde(alias = "auth")]
    pub auth_kind: Option<String>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DepartmentRow {
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Projects")]
    #[tabled(rename = "Projects")]
    pub projects: usize,
    #[serde(rename = "AvgReadiness")]
    #[tabled(rename = "AvgReadiness")]
    pub avg_readiness: String,
    #[serde(rename = "Performance")]
    #[tabled(rename = "Performance")]
    pub performance: String,
    #[serde(rename = "TopTypes")]
    #[tabled(rename = "TopTypes")]
    pub top_types: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesRow {
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "Readiness")]
    #[tabled(rename = "Readiness")]
    pub readiness: String,
    #[serde(rename = "Projects")]
    #[tabled(rename = "Projects")]
    pub projects: usize,
    #[serde(rename = "DataQuality")]
    #[tabled(rename = "DataQuality")]
    pub data_quality: String,
    #[serde(rename = "Kind")]
    #[tabled(rename = "Kind")]
    pub kind: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RecommendationRow {
    #[serde(rename = "Priority")]
    #[tabled(rename = "Priority")]
    pub priority: String,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Title")]
    #[tabled(rename = "Title")]
    pub title: String,
    #[serde(rename = "Action")]
    #[tabled(rename = "Action")]
    pub action: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RiskRow {
    #[serde(rename = "Level")]
    #[tabled(rename = "Level")]
    pub level: String,
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Risk")]
    #[tabled(rename = "Risk")]
    pub risk: String,
    #[serde(rename = "Mitigation")]
    #[tabled(rename = "Mitigation")]
    pub mitigation: String,
}
