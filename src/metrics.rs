//! Per-record and per-pair cycle measurements

use chrono::NaiveDate;

use crate::dates::days_between;
use crate::models::{CyclePhase, PeriodRecord};

/// Inclusive count of menstruating days
pub fn period_length(record: &PeriodRecord) -> i64 {
    days_between(record.start_date, record.end_date) + 1
}

/// Days between the previous and current period starts
pub fn cycle_length(current: &PeriodRecord, previous: &PeriodRecord) -> i64 {
    days_between(previous.start_date, current.start_date)
}

/// Records in ascending chronological order of start date
pub fn sorted_by_start(records: &[PeriodRecord]) -> Vec<&PeriodRecord> {
    let mut sorted: Vec<&PeriodRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.start_date);
    sorted
}

/// Gaps between chronologically adjacent records, unfiltered
pub fn cycle_lengths(records: &[PeriodRecord]) -> Vec<i64> {
    sorted_by_start(records)
        .windows(2)
        .map(|w| cycle_length(w[1], w[0]))
        .collect()
}

/// Cycle lengths within `(0, max_days]`; anything else is a data-entry anomaly
pub fn valid_cycle_lengths(records: &[PeriodRecord], max_days: i64) -> Vec<i64> {
    cycle_lengths(records)
        .into_iter()
        .filter(|&len| is_valid_cycle_length(len, max_days))
        .collect()
}

pub fn is_valid_cycle_length(length: i64, max_days: i64) -> bool {
    length > 0 && length <= max_days
}

pub fn period_lengths(records: &[PeriodRecord]) -> Vec<i64> {
    records.iter().map(period_length).collect()
}

/// Upper bounds (in days since period start) for each phase, checked in order
///
/// A date whose offset is at or below a bound belongs to that phase; past the
/// last bound it is luteal. Bounds are not forced to be increasing, so a long
/// average period can leave the follicular window empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseThresholds {
    bounds: [(CyclePhase, f64); 3],
}

impl PhaseThresholds {
    pub fn new(avg_cycle_length: f64, avg_period_length: f64) -> Self {
        let midpoint = avg_cycle_length / 2.0;
        PhaseThresholds {
            bounds: [
                (CyclePhase::Menstrual, avg_period_length),
                (CyclePhase::Follicular, midpoint - 3.0),
                (CyclePhase::Ovulation, midpoint + 3.0),
            ],
        }
    }

    pub fn classify(&self, days_since_start: i64) -> CyclePhase {
        let offset = days_since_start as f64;
        self.bounds
            .iter()
            .find(|(_, bound)| offset <= *bound)
            .map(|(phase, _)| *phase)
            .unwrap_or(CyclePhase::Luteal)
    }

    /// Upper bound for a phase; `None` for luteal, which is open-ended
    pub fn bound(&self, phase: CyclePhase) -> Option<f64> {
        self.bounds
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, bound)| *bound)
    }

    /// True when no whole day can be classified as follicular
    pub fn follicular_is_empty(&self) -> bool {
        let menstrual_end = self.bounds[0].1.floor();
        let follicular_end = self.bounds[1].1.floor();
        follicular_end <= menstrual_end
    }
}

/// Phase of `date` relative to the most recent period start
pub fn phase_at(
    date: NaiveDate,
    last_period_start: NaiveDate,
    avg_cycle_length: f64,
    avg_period_length: f64,
) -> CyclePhase {
    PhaseThresholds::new(avg_cycle_length, avg_period_length)
        .classify(days_between(last_period_start, date))
}
