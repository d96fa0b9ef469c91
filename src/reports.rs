// Turns engine output into flat, pre-formatted rows for terminal tables
// and CSV export.
use crate::insights::{InsightReport, Priority, RiskLevel};
use crate::series::TimeSeriesPoint;
use crate::types::{DepartmentRow, RecommendationRow, RiskRow, SeriesRow};
use crate::util::format_number;
use std::cmp::Ordering;

/// Departments by project count, then by readiness, both descending.
pub fn department_rows(report: &InsightReport) -> Vec<DepartmentRow> {
    let mut rows: Vec<(usize, f64, DepartmentRow)> = report
        .department_insights
        .iter()
        .map(|(name, d)| {
            let top_types = d
                .top_types
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            (
                d.project_count,
                d.avg_readiness,
                DepartmentRow {
                    department: name.clone(),
                    projects: d.project_count,
                    avg_readiness: format_number(d.avg_readiness, 1),
                    performance: format!("{:?}", d.performance),
                    top_types,
                },
            )
        })
        .collect();

    rows.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
    });
    rows.into_iter().map(|(_, _, row)| row).collect()
}

pub fn series_rows(series: &[TimeSeriesPoint]) -> Vec<SeriesRow> {
    series
        .iter()
        .map(|p| SeriesRow {
            period: p.period_label.clone(),
            readiness: format_number(p.readiness, 1),
            projects: p.project_count,
            data_quality: format_number(p.data_quality, 1),
            kind: if p.is_prediction { "Forecast" } else { "Actual" }.to_string(),
        })
        .collect()
}

pub fn recommendation_rows(report: &InsightReport) -> Vec<RecommendationRow> {
    report
        .recommendations
        .iter()
        .map(|r| RecommendationRow {
            priority: priority_label(r.priority).to_string(),
            category: r.category.clone(),
            title: r.title.clone(),
            action: r.action.clone(),
        })
        .collect()
}

pub fn risk_rows(report: &InsightReport) -> Vec<RiskRow> {
    report
        .risk_factors
        .iter()
        .map(|r| RiskRow {
            level: risk_label(r.level).to_string(),
            category: r.category.clone(),
            risk: r.risk.clone(),
            mitigation: r.mitigation.clone(),
        })
        .collect()
}

fn priority_label(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

fn risk_label(l: RiskLevel) -> &'static str {
    match l {
        RiskLevel::High => "High",
        RiskLevel::Medium => "Medium",
        RiskLevel::Low => "Low",
    }
}
