use crate::types::{ProjectRecord, ProjectStatus, UNASSIGNED};
use crate::util::{average, percentage};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Portfolio-wide figures, recomputed on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub total_projects: usize,
    /// Projects in execution (`InProgress`).
    pub active_projects: usize,
    pub completed_projects: usize,
    pub planning_projects: usize,
    pub on_hold_projects: usize,
    pub total_data_sources: usize,
    /// Unweighted mean readiness; missing scores already count as 0.
    pub overall_readiness: f64,
}

impl AggregateMetrics {
    /// Completed share of the portfolio in percent.
    pub fn completion_rate(&self) -> f64 {
        percentage(self.completed_projects, self.total_projects)
    }

    /// Projects neither completed nor on hold.
    pub fn open_projects(&self) -> usize {
        self.planning_projects + self.active_projects
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentMetrics {
    pub count: usize,
    pub avg_readiness: f64,
    /// Project names in input order.
    pub member_projects: Vec<String>,
}

pub type DepartmentMap = BTreeMap<String, DepartmentMetrics>;

/// Scalar metrics and the department breakdown for a project collection.
pub fn aggregate(records: &[ProjectRecord]) -> (AggregateMetrics, DepartmentMap) {
    let mut metrics = AggregateMetrics {
        total_projects: records.len(),
        ..AggregateMetrics::default()
    };

    #[derive(Default)]
    struct Acc {
        count: usize,
        readiness_sum: f64,
        members: Vec<String>,
    }
    let mut buckets: BTreeMap<String, Acc> = BTreeMap::new();

    for r in records {
        match r.status {
            ProjectStatus::Planning => metrics.planning_projects += 1,
            ProjectStatus::InProgress => metrics.active_projects += 1,
            ProjectStatus::Completed => metrics.completed_projects += 1,
            ProjectStatus::OnHold => metrics.on_hold_projects += 1,
        }
        metrics.total_data_sources += r.data_sources.len();

        let acc = buckets.entry(department_key(r)).or_default();
        acc.count += 1;
        acc.readiness_sum += r.readiness();
        acc.members.push(r.name.clone());
    }

    metrics.overall_readiness = mean_readiness(records);

    let departments = buckets
        .into_iter()
        .map(|(name, acc)| {
            let avg_readiness = acc.readiness_sum / acc.count as f64;
            (
                name,
                DepartmentMetrics {
                    count: acc.count,
                    avg_readiness,
                    member_projects: acc.members,
                },
            )
        })
        .collect::<DepartmentMap>();

    debug!(
        total = metrics.total_projects,
        departments = departments.len(),
        readiness = metrics.overall_readiness,
        "aggregated portfolio metrics"
    );
    (metrics, departments)
}

/// Mean readiness over all records, 0 for an empty collection.
pub fn mean_readiness(records: &[ProjectRecord]) -> f64 {
    average(&records.iter().map(ProjectRecord::readiness).collect::<Vec<_>>())
}

/// Grouping key for a record; blank departments share the `Unassigned` bucket.
pub fn department_key(record: &ProjectRecord) -> String {
    let trimmed = record.department.trim();
    if trimmed.is_empty() {
        UNASSIGNED.to_string()
    } else {
        trimmed.to_string()
    }
}
