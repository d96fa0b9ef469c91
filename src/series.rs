// Historical/forecast readiness series for the dashboard charts.
//
// History is a straight line from an assumed starting readiness up to
// today's average; the forecast continues it with a fixed monthly step.
// Everything is deterministic so consumers can compare literal values.
use crate::metrics::mean_readiness;
use crate::types::ProjectRecord;
use crate::util::month_label;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_HISTORICAL_PERIODS: usize = 6;
pub const DEFAULT_FORECAST_PERIODS: usize = 2;

/// Readiness assumed at the first historical point never drops below this.
const BASE_READINESS_FLOOR: f64 = 30.0;
const BASE_READINESS_LAG: f64 = 15.0;
const QUALITY_START_OFFSET: f64 = 10.0;
const QUALITY_END_OFFSET: f64 = 5.0;
const FORECAST_QUALITY_OFFSET: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub period_label: String,
    pub readiness: f64,
    pub project_count: usize,
    pub data_quality: f64,
    pub is_prediction: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesOptions {
    pub historical_periods: usize,
    pub forecast_periods: usize,
    /// Any date inside the latest historical period.
    pub as_of: NaiveDate,
}

impl SeriesOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        SeriesOptions {
            historical_periods: DEFAULT_HISTORICAL_PERIODS,
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            as_of,
        }
    }

    pub fn without_forecast(mut self) -> Self {
        self.forecast_periods = 0;
        self
    }
}

/// Chronological points: history first, then forecast.
pub fn build_series(records: &[ProjectRecord], opts: &SeriesOptions) -> Vec<TimeSeriesPoint> {
    let hist = opts.historical_periods;
    let label_for = |i: usize| month_label(opts.as_of, i as i32 - hist as i32 + 1);

    if records.is_empty() {
        return (0..hist)
            .map(|i| TimeSeriesPoint {
                period_label: label_for(i),
                readiness: 0.0,
                project_count: 0,
                data_quality: 0.0,
                is_prediction: false,
            })
            .collect();
    }

    let total = records.len();
    let avg = mean_readiness(records);
    let base = BASE_READINESS_FLOOR.max(avg - BASE_READINESS_LAG);

    let mut points = Vec::with_capacity(hist + opts.forecast_periods);
    for i in 0..hist {
        let progress = if hist > 1 {
            i as f64 / (hist - 1) as f64
        } else {
            1.0
        };
        let readiness = lerp(base, avg, progress).clamp(0.0, 100.0);
        let data_quality = lerp(base + QUALITY_START_OFFSET, avg + QUALITY_END_OFFSET, progress)
            .clamp(0.0, 100.0);
        points.push(TimeSeriesPoint {
            period_label: label_for(i),
            readiness,
            project_count: (total as f64 * progress).floor() as usize + 1,
            data_quality,
            is_prediction: false,
        });
    }

    let step = if avg >= 60.0 { 5.0 } else { 3.0 };
    for j in 1..=opts.forecast_periods {
        let readiness = (avg + step * j as f64).min(100.0);
        points.push(TimeSeriesPoint {
            period_label: month_label(opts.as_of, j as i32),
            readiness,
            // floor(j * 1.2) in integer arithmetic
            project_count: total + j * 6 / 5,
            data_quality: (readiness + FORECAST_QUALITY_OFFSET).min(100.0),
            is_prediction: true,
        });
    }

    debug!(points = points.len(), base, avg, "built readiness series");
    points
}

// Written so that t = 0 and t = 1 return the endpoints exactly.
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectRecord;
    use pretty_assertions::assert_eq;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn scored(scores: &[u8]) -> Vec<ProjectRecord> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| ProjectRecord::new(i.to_string(), format!("p{i}")).with_readiness(*s))
            .collect()
    }

    #[test]
    fn empty_input_gives_zeroed_history_only() {
        let series = build_series(&[], &SeriesOptions::new(as_of()));
        assert_eq!(series.len(), 6);
        assert!(series
            .iter()
            .all(|p| p.readiness == 0.0 && p.project_count == 0 && p.data_quality == 0.0 && !p.is_prediction));
        let labels: Vec<&str> = series.iter().map(|p| p.period_label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["May 2026", "Jun 2026", "Jul 2026", "Aug 2026", "Sep 2026", "Oct 2026"]
        );
    }

    #[test]
    fn history_interpolates_from_base_to_average() {
        // avg 80 -> base 65
        let series = build_series(&scored(&[80, 80]), &SeriesOptions::new(as_of()).without_forecast());
        let expected_readiness = [65.0, 68.0, 71.0, 74.0, 77.0, 80.0];
        let expected_quality = [75.0, 77.0, 79.0, 81.0, 83.0, 85.0];
        for (point, (r, q)) in series.iter().zip(expected_readiness.iter().zip(expected_quality)) {
            assert!((point.readiness - r).abs() < 1e-9, "{} != {}", point.readiness, r);
            assert!((point.data_quality - q).abs() < 1e-9, "{} != {}", point.data_quality, q);
        }
        assert_eq!(series[0].readiness, 65.0);
        assert_eq!(series[5].readiness, 80.0);

        let counts: Vec<usize> = series.iter().map(|p| p.project_count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2, 2, 3]);
    }

    #[test]
    fn base_readiness_has_a_floor() {
        let series = build_series(&scored(&[40]), &SeriesOptions::new(as_of()));
        assert_eq!(series[0].readiness, 30.0);
        assert_eq!(series[5].readiness, 40.0);
    }

    #[test]
    fn forecast_uses_slower_step_below_sixty() {
        let series = build_series(&scored(&[50, 50, 50]), &SeriesOptions::new(as_of()));
        let forecast: Vec<&TimeSeriesPoint> = series.iter().filter(|p| p.is_prediction).collect();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast[0].readiness, 53.0);
        assert_eq!(forecast[1].readiness, 56.0);
        assert_eq!(forecast[0].project_count, 4);
        assert_eq!(forecast[1].project_count, 5);
        assert_eq!(forecast[1].data_quality, 61.0);
        assert_eq!(forecast[0].period_label, "Nov 2026");
        assert_eq!(forecast[1].period_label, "Dec 2026");
    }

    #[test]
    fn forecast_is_capped_at_100() {
        let series = build_series(&scored(&[98]), &SeriesOptions::new(as_of()));
        let last = series.last().unwrap();
        assert!(last.is_prediction);
        assert_eq!(last.readiness, 100.0);
        assert_eq!(last.data_quality, 100.0);
    }

    #[test]
    fn single_historical_period_sits_at_average() {
        let opts = SeriesOptions {
            historical_periods: 1,
            forecast_periods: 0,
            as_of: as_of(),
        };
        let series = build_series(&scored(&[70, 71]), &opts);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].readiness, 70.5);
        assert_eq!(series[0].project_count, 3);
    }
}
