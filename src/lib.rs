// Portfolio analytics and insight engine for AI/automation initiatives.
//
// The engine (`metrics`, `series`, `insights`, `dashboard`) is a set of
// pure functions over already-loaded `ProjectRecord`s. Loading
// records, writing files and printing tables live in `loader`/`output`.
pub mod config;
pub mod dashboard;
pub mod error;
pub mod insights;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod reports;
pub mod series;
pub mod types;
pub mod util;

pub use dashboard::{build_portfolio_report, compose_dashboard, DashboardData, PortfolioReport};
pub use error::{LabelError, PortfolioError, Result};
pub use insights::{generate_insights, InsightReport};
pub use loader::{LoadReport, ProjectRepository};
pub use metrics::{aggregate, AggregateMetrics, DepartmentMetrics};
pub use series::{build_series, SeriesOptions, TimeSeriesPoint};
pub use types::{ProjectRecord, ProjectStatus, ProjectType};
