//! Structural and range checks for candidate records
//!
//! Validation never fails fast: every violated rule is collected so a form or
//! import step can surface all of them at once.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dates::{self, days_between};
use crate::error::PeriodRsError;
use crate::models::{DailyRecordDraft, PeriodRecord, PeriodRecordDraft};

pub const MIN_PERIOD_LENGTH_DAYS: i64 = 1;
pub const MAX_PERIOD_LENGTH_DAYS: i64 = 14;
pub const MAX_WATER_INTAKE_ML: f64 = 5000.0;
pub const MAX_SLEEP_HOURS: f64 = 24.0;
pub const MAX_NOTES_CHARS: usize = 500;

/// A single violated validation rule
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("Start date is required")]
    MissingStartDate,

    #[error("End date is required")]
    MissingEndDate,

    #[error("Date is required")]
    MissingDate,

    #[error("{field} '{value}' is not a valid YYYY-MM-DD date")]
    MalformedDate { field: String, value: String },

    #[error("Start date must not be after end date")]
    StartAfterEnd,

    #[error("Period length of {days} days is outside {min}-{max} days")]
    PeriodLengthOutOfRange { days: i64, min: i64, max: i64 },

    #[error("Period overlaps an existing record ({start} to {end})")]
    Overlap { start: NaiveDate, end: NaiveDate },

    #[error("Date {date} is in the future")]
    FutureDate { date: NaiveDate },

    #[error("Diet note must not be empty")]
    EmptyDietNote,

    #[error("Water intake of {value} ml is outside 0-{max} ml")]
    WaterIntakeOutOfRange { value: f64, max: f64 },

    #[error("Sleep of {value} hours is outside 0-{max} hours")]
    SleepHoursOutOfRange { value: f64, max: f64 },

    #[error("Notes are {length} characters, maximum is {max}")]
    NotesTooLong { length: usize, max: usize },
}

/// Outcome of validating one candidate record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// Validates candidate records against a fixed reference day
#[derive(Debug, Clone)]
pub struct RecordValidator {
    today: NaiveDate,
}

impl RecordValidator {
    /// Validator using the host's current date
    pub fn new() -> Self {
        RecordValidator {
            today: dates::today(),
        }
    }

    /// Validator pinned to a given reference day
    pub fn as_of(today: NaiveDate) -> Self {
        RecordValidator { today }
    }

    pub fn validate_period_record(&self, draft: &PeriodRecordDraft) -> ValidationResult {
        ValidationResult::from_issues(Self::period_issues(draft).0)
    }

    /// Validate a candidate and check it against the existing collection
    pub fn validate_period_record_against(
        &self,
        draft: &PeriodRecordDraft,
        existing: &[PeriodRecord],
    ) -> ValidationResult {
        let (mut issues, interval) = Self::period_issues(draft);

        if let Some((start, end)) = interval {
            if let Some(conflict) = find_overlap(start, end, existing) {
                issues.push(ValidationIssue::Overlap {
                    start: conflict.start_date,
                    end: conflict.end_date,
                });
            }
        }

        ValidationResult::from_issues(issues)
    }

    /// Collect period issues and the parsed interval when both dates parse
    fn period_issues(
        draft: &PeriodRecordDraft,
    ) -> (Vec<ValidationIssue>, Option<(NaiveDate, NaiveDate)>) {
        let mut issues = Vec::new();

        let start = match draft.start_date.as_deref() {
            None => {
                issues.push(ValidationIssue::MissingStartDate);
                None
            }
            Some(value) => parse_field("Start date", value, &mut issues),
        };
        let end = match draft.end_date.as_deref() {
            None => {
                issues.push(ValidationIssue::MissingEndDate);
                None
            }
            Some(value) => parse_field("End date", value, &mut issues),
        };

        let interval = match (start, end) {
            (Some(start), Some(end)) => {
                if start > end {
                    issues.push(ValidationIssue::StartAfterEnd);
                } else {
                    let days = days_between(start, end) + 1;
                    if !(MIN_PERIOD_LENGTH_DAYS..=MAX_PERIOD_LENGTH_DAYS).contains(&days) {
                        issues.push(ValidationIssue::PeriodLengthOutOfRange {
                            days,
                            min: MIN_PERIOD_LENGTH_DAYS,
                            max: MAX_PERIOD_LENGTH_DAYS,
                        });
                    }
                }
                Some((start, end))
            }
            _ => None,
        };

        (issues, interval)
    }

    pub fn validate_daily_record(&self, draft: &DailyRecordDraft) -> ValidationResult {
        let mut issues = Vec::new();

        match draft.date.as_deref() {
            None => issues.push(ValidationIssue::MissingDate),
            Some(value) => {
                if let Some(date) = parse_field("Date", value, &mut issues) {
                    if date > self.today {
                        issues.push(ValidationIssue::FutureDate { date });
                    }
                }
            }
        }

        if draft.diet.trim().is_empty() {
            issues.push(ValidationIssue::EmptyDietNote);
        }

        if let Some(water) = draft.water_intake_ml {
            if !(0.0..=MAX_WATER_INTAKE_ML).contains(&water) {
                issues.push(ValidationIssue::WaterIntakeOutOfRange {
                    value: water,
                    max: MAX_WATER_INTAKE_ML,
                });
            }
        }

        if let Some(sleep) = draft.sleep_hours {
            if !(0.0..=MAX_SLEEP_HOURS).contains(&sleep) {
                issues.push(ValidationIssue::SleepHoursOutOfRange {
                    value: sleep,
                    max: MAX_SLEEP_HOURS,
                });
            }
        }

        if let Some(notes) = &draft.notes {
            let length = notes.chars().count();
            if length > MAX_NOTES_CHARS {
                issues.push(ValidationIssue::NotesTooLong {
                    length,
                    max: MAX_NOTES_CHARS,
                });
            }
        }

        ValidationResult::from_issues(issues)
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_field(field: &str, value: &str, issues: &mut Vec<ValidationIssue>) -> Option<NaiveDate> {
    match dates::parse_date(value) {
        Ok(date) => Some(date),
        Err(_) => {
            issues.push(ValidationIssue::MalformedDate {
                field: field.to_string(),
                value: value.to_string(),
            });
            None
        }
    }
}

fn find_overlap(start: NaiveDate, end: NaiveDate, existing: &[PeriodRecord]) -> Option<&PeriodRecord> {
    existing
        .iter()
        .find(|record| start <= record.end_date && end >= record.start_date)
}

/// True if `[start, end]` intersects any existing record's interval
pub fn has_overlap(start: NaiveDate, end: NaiveDate, existing: &[PeriodRecord]) -> bool {
    find_overlap(start, end, existing).is_some()
}

/// Validate a period candidate with the host date as reference
pub fn validate_period_record(draft: &PeriodRecordDraft) -> ValidationResult {
    RecordValidator::new().validate_period_record(draft)
}

/// Validate a period candidate against existing records with the host date as reference
pub fn validate_period_record_against(draft: &PeriodRecordDraft, existing: &[PeriodRecord]) -> ValidationResult {
    RecordValidator::new().validate_period_record_against(draft, existing)
}

/// Validate a daily candidate with the host date as reference
pub fn validate_daily_record(draft: &DailyRecordDraft) -> ValidationResult {
    RecordValidator::new().validate_daily_record(draft)
}

impl TryFrom<&PeriodRecordDraft> for PeriodRecord {
    type Error = PeriodRsError;

    fn try_from(draft: &PeriodRecordDraft) -> Result<Self, Self::Error> {
        let (issues, interval) = RecordValidator::period_issues(draft);
        match interval {
            Some((start_date, end_date)) if issues.is_empty() => {
                let now = Utc::now();
                Ok(PeriodRecord {
                    id: Uuid::new_v4(),
                    start_date,
                    end_date,
                    note: draft.note.clone(),
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(PeriodRsError::Validation(issues)),
        }
    }
}
