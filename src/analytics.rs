use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar::CalendarEventGenerator;
use crate::dates;
use crate::history;
use crate::metrics;
use crate::models::{AnalyticsResult, CalendarEvent, CycleAnalysis, DailyRecord, PeriodRecord};
use crate::prediction;
use crate::report;
use crate::statistics;

/// Analytics configuration with the fallbacks and thresholds used by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Cycle length assumed until two records exist (default: 28)
    pub default_cycle_length: f64,

    /// Period length assumed until two records exist (default: 5)
    pub default_period_length: f64,

    /// Longest gap between period starts still counted as a cycle (default: 60)
    pub max_cycle_length_days: i64,

    /// Number of cycles per side in trend comparison (default: 6)
    pub trend_window: usize,

    /// Standard deviations beyond which a cycle length is an outlier (default: 2)
    pub outlier_threshold: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            default_cycle_length: 28.0,
            default_period_length: 5.0,
            max_cycle_length_days: 60,
            trend_window: statistics::DEFAULT_TREND_WINDOW,
            outlier_threshold: statistics::DEFAULT_OUTLIER_THRESHOLD,
        }
    }
}

/// Averages the rest of the engine works from
#[derive(Debug, Clone, PartialEq)]
struct CycleAverages {
    cycle_lengths: Vec<f64>,
    period_lengths: Vec<f64>,
    avg_cycle_length: f64,
    avg_period_length: f64,
}

/// Core analytics engine tying statistics, prediction, history and calendar together
pub struct CycleAnalyzer {
    config: AnalyticsConfig,
    as_of: Option<NaiveDate>,
}

impl CycleAnalyzer {
    /// Create new analyzer with default configuration
    pub fn new() -> Self {
        CycleAnalyzer {
            config: AnalyticsConfig::default(),
            as_of: None,
        }
    }

    /// Create new analyzer with custom configuration
    pub fn with_config(config: AnalyticsConfig) -> Self {
        CycleAnalyzer { config, as_of: None }
    }

    /// Pin "today" for phase classification and prediction gating
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.as_of = Some(today);
        self
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(dates::today)
    }

    fn averages(&self, records: &[PeriodRecord]) -> CycleAverages {
        if records.len() < 2 {
            debug!(
                records = records.len(),
                "Insufficient history, using default cycle and period lengths"
            );
            return CycleAverages {
                cycle_lengths: Vec::new(),
                period_lengths: Vec::new(),
                avg_cycle_length: self.config.default_cycle_length,
                avg_period_length: self.config.default_period_length,
            };
        }

        let max_days = self.config.max_cycle_length_days;
        let mut cycle_lengths = Vec::new();
        for length in metrics::cycle_lengths(records) {
            if metrics::is_valid_cycle_length(length, max_days) {
                cycle_lengths.push(length as f64);
            } else {
                warn!(length, max_days, "Excluding anomalous cycle length from statistics");
            }
        }

        // Period lengths are not outlier-filtered
        let period_lengths: Vec<f64> = metrics::period_lengths(records)
            .into_iter()
            .map(|len| len as f64)
            .collect();

        let avg_cycle_length = if cycle_lengths.is_empty() {
            debug!("No valid cycle lengths, using default cycle length");
            self.config.default_cycle_length
        } else {
            statistics::mean(&cycle_lengths)
        };

        CycleAverages {
            avg_period_length: statistics::mean(&period_lengths),
            avg_cycle_length,
            cycle_lengths,
            period_lengths,
        }
    }

    /// Aggregate statistics, scores and predictions for a record snapshot
    pub fn compute_analytics(&self, records: &[PeriodRecord], daily_records: &[DailyRecord]) -> AnalyticsResult {
        let averages = self.averages(records);
        let cycle_lengths = &averages.cycle_lengths;

        let regularity_score = statistics::regularity_score(cycle_lengths);
        let health_score = statistics::health_score(cycle_lengths, &averages.period_lengths, daily_records);
        let risk_factors = statistics::identify_risk_factors(
            cycle_lengths,
            averages.avg_cycle_length,
            averages.avg_period_length,
        );
        let recommendations = statistics::recommendations(regularity_score, health_score, &risk_factors);

        let prediction = prediction::predict(
            records,
            averages.avg_cycle_length,
            averages.avg_period_length,
            cycle_lengths,
        );

        let raw_cycle_lengths = metrics::valid_cycle_lengths(records, self.config.max_cycle_length_days);

        debug!(
            records = records.len(),
            avg_cycle_length = averages.avg_cycle_length,
            avg_period_length = averages.avg_period_length,
            regularity_score,
            health_score,
            "Computed cycle analytics"
        );

        AnalyticsResult {
            record_count: records.len(),
            average_cycle_length: averages.avg_cycle_length,
            average_period_length: averages.avg_period_length,
            cycle_length_variation: statistics::variation_coefficient(cycle_lengths),
            period_length_variation: statistics::variation_coefficient(&averages.period_lengths),
            regularity_score,
            trend: statistics::trend(cycle_lengths, self.config.trend_window),
            next_period_date: prediction.as_ref().map(|p| p.next_period_date),
            predicted_period_end: prediction.as_ref().map(|p| p.predicted_period_end),
            fertile_window: prediction.as_ref().map(|p| p.fertile_window),
            ovulation_date: prediction.as_ref().map(|p| p.ovulation_date),
            prediction_confidence: prediction.as_ref().map(|p| p.confidence),
            health_score,
            risk_factors,
            recommendations,
            shortest_cycle: raw_cycle_lengths.iter().copied().min(),
            longest_cycle: raw_cycle_lengths.iter().copied().max(),
            last_period_start: prediction::latest_record(records).map(|r| r.start_date),
            outlier_cycle_lengths: statistics::identify_outliers(cycle_lengths, self.config.outlier_threshold),
        }
    }

    /// Per-cycle breakdowns, most recent first
    pub fn compute_cycle_analysis(&self, records: &[PeriodRecord], daily_records: &[DailyRecord]) -> Vec<CycleAnalysis> {
        let averages = self.averages(records);
        history::compile_cycle_history(
            records,
            daily_records,
            averages.avg_cycle_length,
            averages.avg_period_length,
            self.today(),
        )
    }

    /// Calendar events within `[from, to]`
    pub fn generate_calendar_events(
        &self,
        records: &[PeriodRecord],
        analytics: &AnalyticsResult,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<CalendarEvent> {
        CalendarEventGenerator::new(analytics)
            .as_of(self.today())
            .generate(records, from, to)
    }

    /// Plain-text digest of analytics and cycle history
    pub fn generate_report(&self, records: &[PeriodRecord], daily_records: &[DailyRecord]) -> String {
        let analytics = self.compute_analytics(records, daily_records);
        let history = self.compute_cycle_analysis(records, daily_records);
        report::render_report(&analytics, &history, self.today())
    }
}

impl Default for CycleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn compute_analytics(records: &[PeriodRecord], daily_records: &[DailyRecord]) -> AnalyticsResult {
    CycleAnalyzer::new().compute_analytics(records, daily_records)
}

pub fn compute_cycle_analysis(records: &[PeriodRecord], daily_records: &[DailyRecord]) -> Vec<CycleAnalysis> {
    CycleAnalyzer::new().compute_cycle_analysis(records, daily_records)
}

pub fn generate_calendar_events(
    records: &[PeriodRecord],
    analytics: &AnalyticsResult,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<CalendarEvent> {
    CycleAnalyzer::new().generate_calendar_events(records, analytics, from, to)
}

pub fn generate_report(records: &[PeriodRecord], daily_records: &[DailyRecord]) -> String {
    CycleAnalyzer::new().generate_report(records, daily_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskFactor, TrendDirection};

    fn make_record(start: &str, end: &str) -> PeriodRecord {
        PeriodRecord::new(
            NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
        )
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Regular series of `count` periods starting 2024-01-01
    fn regular_series(count: usize, cycle: i64, period: i64) -> Vec<PeriodRecord> {
        (0..count)
            .map(|i| {
                let start = dates::add_days(date("2024-01-01"), i as i64 * cycle);
                PeriodRecord::new(start, dates::add_days(start, period - 1))
            })
            .collect()
    }

    #[test]
    fn test_empty_history_uses_defaults() {
        let result = CycleAnalyzer::new().compute_analytics(&[], &[]);
        assert_eq!(result.record_count, 0);
        assert_eq!(result.average_cycle_length, 28.0);
        assert_eq!(result.average_period_length, 5.0);
        assert_eq!(result.regularity_score, 100);
        assert_eq!(result.health_score, 100);
        assert_eq!(result.trend, TrendDirection::Stable);
        assert!(result.next_period_date.is_none());
        assert!(result.fertile_window.is_none());
        assert!(result.risk_factors.is_empty());
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn test_single_record_predicts_with_defaults() {
        let records = vec![make_record("2024-01-01", "2024-01-03")];
        let result = CycleAnalyzer::new().compute_analytics(&records, &[]);
        assert_eq!(result.average_period_length, 5.0);
        assert_eq!(result.next_period_date, Some(date("2024-01-29")));
        assert_eq!(result.prediction_confidence, Some(0.5));
        assert_eq!(result.last_period_start, Some(date("2024-01-01")));
    }

    #[test]
    fn test_two_records() {
        let records = vec![
            make_record("2024-01-01", "2024-01-05"),
            make_record("2024-01-29", "2024-02-02"),
        ];
        let result = CycleAnalyzer::new().compute_analytics(&records, &[]);
        assert_eq!(result.average_cycle_length, 28.0);
        assert_eq!(result.average_period_length, 5.0);
        assert_eq!(result.next_period_date, Some(date("2024-02-26")));
        assert_eq!(result.ovulation_date, Some(date("2024-02-12")));
        assert_eq!(result.shortest_cycle, Some(28));
        assert_eq!(result.longest_cycle, Some(28));
    }

    #[test]
    fn test_anomalous_gap_excluded_from_statistics() {
        let mut records = regular_series(3, 28, 5);
        // a 120-day gap, e.g. a missed entry
        records.push(make_record("2024-06-24", "2024-06-28"));

        let result = CycleAnalyzer::new().compute_analytics(&records, &[]);
        assert_eq!(result.record_count, 4);
        assert_eq!(result.average_cycle_length, 28.0);
        assert_eq!(result.regularity_score, 100);
        assert_eq!(result.longest_cycle, Some(28));
        // prediction still projects from the latest record
        assert_eq!(result.next_period_date, Some(date("2024-07-22")));
    }

    #[test]
    fn test_all_gaps_anomalous_falls_back_to_default_cycle() {
        let records = vec![
            make_record("2024-01-01", "2024-01-04"),
            make_record("2024-06-01", "2024-06-04"),
        ];
        let result = CycleAnalyzer::new().compute_analytics(&records, &[]);
        assert_eq!(result.average_cycle_length, 28.0);
        assert_eq!(result.average_period_length, 4.0);
        assert_eq!(result.shortest_cycle, None);
    }

    #[test]
    fn test_irregular_history_flags_risk() {
        let starts = ["2024-01-01", "2024-01-22", "2024-02-26", "2024-03-18", "2024-04-22"];
        let records: Vec<PeriodRecord> = starts
            .iter()
            .map(|s| PeriodRecord::new(date(s), dates::add_days(date(s), 4)))
            .collect();

        let result = CycleAnalyzer::new().compute_analytics(&records, &[]);
        // cycle lengths 21, 35, 21, 35
        assert_eq!(result.regularity_score, 50);
        assert!((result.cycle_length_variation - 0.25).abs() < 1e-9);
        assert_eq!(result.risk_factors, vec![RiskFactor::IrregularCycle]);
        assert_eq!(result.health_score, 80);
    }

    #[test]
    fn test_trend_uses_configured_window() {
        let mut records = regular_series(4, 28, 5);
        let last_start = records[3].start_date;
        for i in 1..=3 {
            let start = dates::add_days(last_start, i * 32);
            records.push(PeriodRecord::new(start, dates::add_days(start, 4)));
        }

        let default_window = CycleAnalyzer::new().compute_analytics(&records, &[]);
        assert_eq!(default_window.trend, TrendDirection::Stable);

        let analyzer = CycleAnalyzer::with_config(AnalyticsConfig {
            trend_window: 3,
            ..AnalyticsConfig::default()
        });
        assert_eq!(analyzer.compute_analytics(&records, &[]).trend, TrendDirection::Increasing);
    }

    #[test]
    fn test_cycle_analysis_is_reverse_chronological() {
        let records = regular_series(3, 30, 4);
        let analyses = CycleAnalyzer::new()
            .as_of(date("2024-03-02"))
            .compute_cycle_analysis(&records, &[]);

        assert_eq!(analyses.len(), 3);
        assert_eq!(analyses[0].cycle_number, 3);
        assert_eq!(analyses[0].start_date, date("2024-03-01"));
        assert_eq!(analyses[0].cycle_length, 30);
        assert_eq!(analyses[2].cycle_length, 0);
    }

    #[test]
    fn test_report_mentions_key_statistics() {
        let records = regular_series(3, 28, 5);
        let report = CycleAnalyzer::new()
            .as_of(date("2024-03-01"))
            .generate_report(&records, &[]);
        assert!(report.contains("Average cycle length: 28.0 days"));
        assert!(report.contains("Next period: 2024-03-25"));
    }
}
