#![allow(dead_code)]

use chrono::NaiveDate;
use portfolio_insights::{ProjectRecord, ProjectStatus, ProjectType};

pub fn project(name: &str, department: &str, status: ProjectStatus, score: u8) -> ProjectRecord {
    ProjectRecord::new(name.to_lowercase().replace(' ', "-"), name)
        .with_department(department)
        .with_status(status)
        .with_readiness(score)
}

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

/// Five-project portfolio used across the scenario tests.
pub fn sample_portfolio() -> Vec<ProjectRecord> {
    vec![
        project("Demand Forecasting", "Operations", ProjectStatus::Completed, 92)
            .with_type(ProjectType::AISystem),
        project("Support Chatbot", "CustomerService", ProjectStatus::InProgress, 78)
            .with_type(ProjectType::AISystem),
        project("Invoice Matching", "Finance", ProjectStatus::InProgress, 65)
            .with_type(ProjectType::Automation),
        project("Supplier Risk Scoring", "SupplyChain", ProjectStatus::Planning, 45)
            .with_type(ProjectType::Analytics),
        project("Resume Screening", "HumanResources", ProjectStatus::InProgress, 71)
            .with_type(ProjectType::AISystem),
    ]
}
