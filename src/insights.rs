// Rule-based portfolio insights.
//
// Every insight is a fixed threshold rule over the aggregated metrics.
// The rules are evaluated independently and in a fixed order, so the same
// portfolio always produces the same report.
use crate::metrics::{aggregate, department_key, AggregateMetrics, DepartmentMap};
use crate::types::{ProjectRecord, ProjectStatus, ProjectType};
use crate::util::round1;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const EMPTY_SUMMARY: &str =
    "No projects found in your portfolio yet. Add your first AI initiative to start receiving insights.";

const LOW_READINESS: u8 = 50;
const HIGH_READINESS: u8 = 80;
const MAX_NAMED_PROJECTS: usize = 2;
const HEAVY_LOAD_IN_PROGRESS: usize = 5;
const MIN_PORTFOLIO_FOR_DELIVERY_RISK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub title: String,
    pub description: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendItem {
    pub metric: String,
    pub value: String,
    pub direction: TrendDirection,
    pub insight: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPeriodPrediction {
    pub expected_completions: usize,
    pub confidence_level: Confidence,
    pub readiness_trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextQuarterPrediction {
    pub portfolio_growth: String,
    pub readiness_target: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    pub next_period: NextPeriodPrediction,
    pub next_quarter: NextQuarterPrediction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub level: RiskLevel,
    pub category: String,
    pub risk: String,
    pub impact: String,
    pub mitigation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Performance {
    High,
    Medium,
    Low,
}

impl Performance {
    pub fn from_readiness(avg: f64) -> Self {
        if avg >= 70.0 {
            Performance::High
        } else if avg >= 50.0 {
            Performance::Medium
        } else {
            Performance::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInsight {
    pub project_count: usize,
    /// One decimal place.
    pub avg_readiness: f64,
    pub performance: Performance,
    pub top_types: Vec<ProjectType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    pub count: usize,
    /// One decimal place.
    pub avg_readiness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
    pub trends: Vec<TrendItem>,
    /// `None` only for an empty portfolio, serialized as `{}`.
    #[serde(serialize_with = "empty_object_when_none")]
    pub predictions: Option<Predictions>,
    pub risk_factors: Vec<RiskFactor>,
    pub department_insights: BTreeMap<String, DepartmentInsight>,
    pub type_analysis: BTreeMap<ProjectType, TypeSummary>,
}

impl InsightReport {
    pub fn empty() -> Self {
        InsightReport {
            summary: EMPTY_SUMMARY.to_string(),
            recommendations: Vec::new(),
            trends: Vec::new(),
            predictions: None,
            risk_factors: Vec::new(),
            department_insights: BTreeMap::new(),
            type_analysis: BTreeMap::new(),
        }
    }
}

fn empty_object_when_none<S: Serializer>(
    predictions: &Option<Predictions>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match predictions {
        Some(p) => p.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessBand {
    Excellent,
    Good,
    Moderate,
    NeedsImprovement,
}

impl ReadinessBand {
    pub fn classify(avg: f64) -> Self {
        if avg >= 80.0 {
            ReadinessBand::Excellent
        } else if avg >= 60.0 {
            ReadinessBand::Good
        } else if avg >= 40.0 {
            ReadinessBand::Moderate
        } else {
            ReadinessBand::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadinessBand::Excellent => "excellent",
            ReadinessBand::Good => "good",
            ReadinessBand::Moderate => "moderate",
            ReadinessBand::NeedsImprovement => "needs improvement",
        }
    }
}

/// Full insight report for a project collection.
pub fn generate_insights(records: &[ProjectRecord]) -> InsightReport {
    let (metrics, departments) = aggregate(records);
    insights_from_metrics(records, &metrics, &departments)
}

/// Same as [`generate_insights`] for callers that already aggregated.
pub fn insights_from_metrics(
    records: &[ProjectRecord],
    metrics: &AggregateMetrics,
    departments: &DepartmentMap,
) -> InsightReport {
    if records.is_empty() {
        return InsightReport::empty();
    }

    let report = InsightReport {
        summary: summary(metrics),
        recommendations: recommendations(records, departments),
        trends: trends(metrics, departments),
        predictions: Some(predictions(metrics)),
        risk_factors: risk_factors(metrics),
        department_insights: department_insights(records, departments),
        type_analysis: type_analysis(records),
    };
    debug!(
        recommendations = report.recommendations.len(),
        risks = report.risk_factors.len(),
        "generated portfolio insights"
    );
    report
}

fn summary(m: &AggregateMetrics) -> String {
    let avg = m.overall_readiness;
    let completion = m.completion_rate();
    let band = ReadinessBand::classify(avg);

    let outlook = if avg >= 70.0 && completion >= 50.0 {
        "Strong readiness combined with solid delivery shows the portfolio is turning AI investment into results."
    } else if avg >= 60.0 {
        "Readiness is on a healthy track; the next gains come from moving active projects through to completion."
    } else if avg < 50.0 {
        "Low readiness points to foundational gaps that should be closed before scaling further."
    } else {
        "The portfolio is progressing steadily, with room to strengthen readiness on individual projects."
    };

    format!(
        "Your portfolio contains {} AI initiatives with {} active and {} completed. \
         Overall AI readiness is {} at {:.1}%, and {:.1}% of projects are complete. {}",
        m.total_projects,
        m.active_projects,
        m.completed_projects,
        band.label(),
        avg,
        completion,
        outlook
    )
}

fn recommendations(records: &[ProjectRecord], departments: &DepartmentMap) -> Vec<Recommendation> {
    let mut recs = Vec::new();
    let total = records.len();

    let low: Vec<&ProjectRecord> = records
        .iter()
        .filter(|r| r.readiness_score < LOW_READINESS)
        .collect();
    if !low.is_empty() {
        recs.push(Recommendation {
            priority: Priority::High,
            category: "Readiness".to_string(),
            title: "Improve Low-Readiness Projects".to_string(),
            description: format!(
                "{} scored below {}% readiness.",
                name_list(&low),
                LOW_READINESS
            ),
            action: "Review data sources and assign dedicated owners to lift these projects above the threshold."
                .to_string(),
        });
    }

    let on_hold = records
        .iter()
        .filter(|r| r.status == ProjectStatus::OnHold)
        .count();
    if on_hold > 0 {
        recs.push(Recommendation {
            priority: Priority::Medium,
            category: "Execution".to_string(),
            title: "Resolve Stalled Projects".to_string(),
            description: format!("{} currently on hold.", plural(on_hold, "project is", "projects are")),
            action: "Identify the blockers and decide whether each stalled project should resume or be retired."
                .to_string(),
        });
    }

    if departments.len() == 1 {
        if let Some(dept) = departments.keys().next() {
            recs.push(Recommendation {
                priority: Priority::Low,
                category: "Strategy".to_string(),
                title: "Expand AI Adoption Across Departments".to_string(),
                description: format!("All projects sit in the {} department.", dept),
                action: "Look for AI opportunities in other departments to spread adoption.".to_string(),
            });
        }
    }

    let high = records
        .iter()
        .filter(|r| r.readiness_score >= HIGH_READINESS)
        .count();
    if high > 0 && high < total {
        recs.push(Recommendation {
            priority: Priority::Low,
            category: "Knowledge Sharing".to_string(),
            title: "Share Lessons from High Performers".to_string(),
            description: format!(
                "{} at {}% readiness or higher.",
                plural(high, "project is", "projects are"),
                HIGH_READINESS
            ),
            action: "Document what works on these projects and pair their teams with lower-readiness efforts."
                .to_string(),
        });
    }

    let types: BTreeSet<ProjectType> = records.iter().map(|r| r.project_type).collect();
    if types.len() == 1 && total > 2 {
        if let Some(only) = types.iter().next() {
            recs.push(Recommendation {
                priority: Priority::Low,
                category: "Diversification".to_string(),
                title: "Diversify Project Types".to_string(),
                description: format!("All {} projects are {} initiatives.", total, only),
                action: "Consider complementary initiatives of other types to balance the portfolio."
                    .to_string(),
            });
        }
    }

    recs
}

fn trends(m: &AggregateMetrics, departments: &DepartmentMap) -> Vec<TrendItem> {
    let avg = m.overall_readiness;
    let mut items = Vec::new();

    let (direction, insight) = if avg >= 70.0 {
        (TrendDirection::Up, "Portfolio readiness is strong and approaching scale-ready levels.")
    } else if avg >= 50.0 {
        (TrendDirection::Stable, "Readiness is moderate; targeted improvements will lift the overall score.")
    } else {
        (TrendDirection::Down, "Readiness is below target and needs focused attention.")
    };
    items.push(TrendItem {
        metric: "AI Readiness".to_string(),
        value: format!("{:.1}%", avg),
        direction,
        insight: insight.to_string(),
    });

    // Ties go to the first department in name order.
    let mut top: Option<(&String, usize)> = None;
    for (name, d) in departments {
        if top.map_or(true, |(_, best)| d.count > best) {
            top = Some((name, d.count));
        }
    }
    if let Some((name, count)) = top {
        items.push(TrendItem {
            metric: "Department Focus".to_string(),
            value: name.clone(),
            direction: TrendDirection::Neutral,
            insight: format!(
                "{} leads AI adoption with {} of {} projects.",
                name, count, m.total_projects
            ),
        });
    }

    let open = m.open_projects();
    if open > 0 {
        let ratio = m.active_projects as f64 / open as f64 * 100.0;
        items.push(TrendItem {
            metric: "Active Execution".to_string(),
            value: format!("{:.1}%", ratio),
            direction: if m.active_projects > 0 {
                TrendDirection::Up
            } else {
                TrendDirection::Stable
            },
            insight: format!(
                "{} of {} open projects are in progress.",
                m.active_projects, open
            ),
        });
    }

    items
}

fn predictions(m: &AggregateMetrics) -> Predictions {
    let avg = m.overall_readiness;
    let confidence_level = if avg >= 70.0 {
        Confidence::High
    } else if avg >= 50.0 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    Predictions {
        next_period: NextPeriodPrediction {
            // floor(active * 0.3) in integer arithmetic
            expected_completions: (m.active_projects * 3 / 10).max(1),
            confidence_level,
            readiness_trend: if avg >= 60.0 { "improving" } else { "needs attention" }.to_string(),
        },
        next_quarter: NextQuarterPrediction {
            portfolio_growth: if m.active_projects >= 3 { "15-25%" } else { "5-15%" }.to_string(),
            readiness_target: (avg + 10.0).min(100.0),
            recommendation: if avg >= 70.0 {
                "Scale operations"
            } else {
                "Focus on quality improvement"
            }
            .to_string(),
        },
    }
}

fn risk_factors(m: &AggregateMetrics) -> Vec<RiskFactor> {
    let mut risks = Vec::new();

    if m.overall_readiness < f64::from(LOW_READINESS) {
        risks.push(RiskFactor {
            level: RiskLevel::High,
            category: "Readiness".to_string(),
            risk: "Low Average Readiness".to_string(),
            impact: "Projects may stall or underdeliver without stronger data and skills foundations."
                .to_string(),
            mitigation: "Invest in data quality and team training before starting new initiatives."
                .to_string(),
        });
    }

    if m.active_projects > HEAVY_LOAD_IN_PROGRESS {
        risks.push(RiskFactor {
            level: RiskLevel::Medium,
            category: "Resource Management".to_string(),
            risk: "High Concurrent Project Load".to_string(),
            impact: format!(
                "{} projects in progress at once can stretch teams and budgets thin.",
                m.active_projects
            ),
            mitigation: "Prioritize the highest-value projects and stage the rest.".to_string(),
        });
    }

    if m.completed_projects == 0 && m.total_projects >= MIN_PORTFOLIO_FOR_DELIVERY_RISK {
        risks.push(RiskFactor {
            level: RiskLevel::Medium,
            category: "Delivery".to_string(),
            risk: "No Completed Projects".to_string(),
            impact: "Without a finished project the portfolio has no proven value to point to."
                .to_string(),
            mitigation: "Pick the most ready project and drive it to completion as a reference case."
                .to_string(),
        });
    }

    risks
}

fn department_insights(
    records: &[ProjectRecord],
    departments: &DepartmentMap,
) -> BTreeMap<String, DepartmentInsight> {
    let mut type_counts: BTreeMap<String, BTreeMap<ProjectType, usize>> = BTreeMap::new();
    for r in records {
        *type_counts
            .entry(department_key(r))
            .or_default()
            .entry(r.project_type)
            .or_insert(0) += 1;
    }

    departments
        .iter()
        .map(|(name, d)| {
            let top_types = type_counts
                .get(name)
                .map(top_two)
                .unwrap_or_default();
            // Classify the displayed value so the two columns never disagree.
            let avg_readiness = round1(d.avg_readiness);
            (
                name.clone(),
                DepartmentInsight {
                    project_count: d.count,
                    avg_readiness,
                    performance: Performance::from_readiness(avg_readiness),
                    top_types,
                },
            )
        })
        .collect()
}

fn type_analysis(records: &[ProjectRecord]) -> BTreeMap<ProjectType, TypeSummary> {
    let mut acc: BTreeMap<ProjectType, (usize, f64)> = BTreeMap::new();
    for r in records {
        let e = acc.entry(r.project_type).or_insert((0, 0.0));
        e.0 += 1;
        e.1 += r.readiness();
    }
    acc.into_iter()
        .map(|(t, (count, sum))| {
            (
                t,
                TypeSummary {
                    count,
                    avg_readiness: round1(sum / count as f64),
                },
            )
        })
        .collect()
}

// Most frequent first; equal counts keep enum order.
fn top_two(counts: &BTreeMap<ProjectType, usize>) -> Vec<ProjectType> {
    let mut ranked: Vec<(ProjectType, usize)> = counts.iter().map(|(t, c)| (*t, *c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(2).map(|(t, _)| t).collect()
}

fn name_list(projects: &[&ProjectRecord]) -> String {
    let named: Vec<&str> = projects
        .iter()
        .take(MAX_NAMED_PROJECTS)
        .map(|r| r.name.as_str())
        .collect();
    let rest = projects.len().saturating_sub(MAX_NAMED_PROJECTS);
    match rest {
        0 => named.join(" and "),
        n => format!("{} and {}", named.join(", "), plural(n, "other", "others")),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}
