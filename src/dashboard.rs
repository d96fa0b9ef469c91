use crate::insights::{insights_from_metrics, InsightReport};
use crate::metrics::{aggregate, AggregateMetrics, DepartmentMap};
use crate::series::{build_series, SeriesOptions, TimeSeriesPoint};
use crate::types::ProjectRecord;
use serde::Serialize;

/// Everything the dashboard cards and charts need in one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub metrics: AggregateMetrics,
    pub departments: DepartmentMap,
    pub series: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioReport {
    pub dashboard: DashboardData,
    pub insights: InsightReport,
}

pub fn compose_dashboard(records: &[ProjectRecord], opts: &SeriesOptions) -> DashboardData {
    let (metrics, departments) = aggregate(records);
    DashboardData {
        metrics,
        departments,
        series: build_series(records, opts),
    }
}

/// Dashboard plus insights, aggregating the records once.
pub fn build_portfolio_report(records: &[ProjectRecord], opts: &SeriesOptions) -> PortfolioReport {
    let dashboard = compose_dashboard(records, opts);
    let insights = insights_from_metrics(records, &dashboard.metrics, &dashboard.departments);
    PortfolioReport {
        dashboard,
        insights,
    }
}
