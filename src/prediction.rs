use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::add_days;
use crate::models::{FertileWindow, PeriodRecord};
use crate::statistics;

/// Days from ovulation to the next period start
///
/// Fixed regardless of the user's average cycle length, so ovulation
/// estimates drift for cycles far from 28 days. Candidate for per-user
/// parameterization once there is a product decision on how to estimate it.
pub const ASSUMED_LUTEAL_PHASE_DAYS: i64 = 14;

pub const FERTILE_DAYS_BEFORE_OVULATION: i64 = 5;
pub const FERTILE_DAYS_AFTER_OVULATION: i64 = 1;

const MIN_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;
const SPARSE_HISTORY_CONFIDENCE: f64 = 0.5;

/// Near-term projection from the latest record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub next_period_date: NaiveDate,
    pub predicted_period_end: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub fertile_window: FertileWindow,
    pub confidence: f64,
}

/// Record with the latest start date
pub fn latest_record(records: &[PeriodRecord]) -> Option<&PeriodRecord> {
    records.iter().max_by_key(|r| r.start_date)
}

pub fn next_period_date(last_record: &PeriodRecord, avg_cycle_length: f64) -> NaiveDate {
    add_days(last_record.start_date, avg_cycle_length.round() as i64)
}

pub fn ovulation_date(next_period_date: NaiveDate) -> NaiveDate {
    add_days(next_period_date, -ASSUMED_LUTEAL_PHASE_DAYS)
}

pub fn fertile_window(ovulation_date: NaiveDate) -> FertileWindow {
    FertileWindow {
        start: add_days(ovulation_date, -FERTILE_DAYS_BEFORE_OVULATION),
        end: add_days(ovulation_date, FERTILE_DAYS_AFTER_OVULATION),
    }
}

/// Last day of the predicted period
pub fn predicted_period_end(next_period_date: NaiveDate, avg_period_length: f64) -> NaiveDate {
    let extra_days = (avg_period_length.round() - 1.0).max(0.0) as i64;
    add_days(next_period_date, extra_days)
}

/// Confidence from cycle-length dispersion; 0.5 with fewer than 2 samples
pub fn confidence(cycle_lengths: &[f64]) -> f64 {
    if cycle_lengths.len() < 2 {
        return SPARSE_HISTORY_CONFIDENCE;
    }
    let avg = statistics::mean(cycle_lengths);
    if avg <= 0.0 {
        return MIN_CONFIDENCE;
    }
    (1.0 - statistics::std_dev(cycle_lengths) / avg).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Full projection, `None` when there is no record to project from
pub fn predict(
    records: &[PeriodRecord],
    avg_cycle_length: f64,
    avg_period_length: f64,
    cycle_lengths: &[f64],
) -> Option<Prediction> {
    let last = latest_record(records)?;

    let next = next_period_date(last, avg_cycle_length);
    let ovulation = ovulation_date(next);

    Some(Prediction {
        next_period_date: next,
        predicted_period_end: predicted_period_end(next, avg_period_length),
        ovulation_date: ovulation,
        fertile_window: fertile_window(ovulation),
        confidence: confidence(cycle_lengths),
    })
}
