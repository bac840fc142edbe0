//! Per-cycle breakdowns joining period records with daily logs

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::metrics::{cycle_length, period_length, phase_at, sorted_by_start};
use crate::models::{CycleAnalysis, DailyRecord, FlowLevel, Mood, PeriodRecord, SymptomTag};
use crate::statistics;

/// Averaged flow at or below this is light
const LIGHT_FLOW_CEILING: f64 = 1.3;
/// Averaged flow at or below this (and above light) is medium
const MEDIUM_FLOW_CEILING: f64 = 2.3;

/// Lower-case keywords that mark each symptom in free text
const SYMPTOM_KEYWORDS: &[(SymptomTag, &[&str])] = &[
    (SymptomTag::Cramps, &["cramp", "pain"]),
    (SymptomTag::Headache, &["headache", "migraine"]),
    (SymptomTag::Fatigue, &["fatigue", "tired", "exhausted"]),
    (SymptomTag::Bloating, &["bloat"]),
    (SymptomTag::BreastTenderness, &["breast", "tender"]),
    (SymptomTag::Acne, &["acne", "pimple", "breakout"]),
    (SymptomTag::Nausea, &["nausea", "nauseous", "queasy"]),
];

/// Symptom tags found in a set of notes, in tag order
pub fn extract_symptoms<'a>(notes: impl IntoIterator<Item = &'a str>) -> Vec<SymptomTag> {
    let mut found = BTreeSet::new();

    for note in notes {
        let lowered = note.to_lowercase();
        for (tag, keywords) in SYMPTOM_KEYWORDS {
            if keywords.iter().any(|k| lowered.contains(k)) {
                found.insert(*tag);
            }
        }
    }

    found.into_iter().collect()
}

/// Mean flow weight re-bucketed into a level; `None` if nothing was logged
pub fn average_flow(daily_records: &[&DailyRecord]) -> Option<FlowLevel> {
    let weights: Vec<f64> = daily_records
        .iter()
        .filter_map(|d| d.flow.map(|f| f.weight()))
        .collect();

    if weights.is_empty() {
        return None;
    }

    let avg = statistics::mean(&weights);
    Some(if avg <= LIGHT_FLOW_CEILING {
        FlowLevel::Light
    } else if avg <= MEDIUM_FLOW_CEILING {
        FlowLevel::Medium
    } else {
        FlowLevel::Heavy
    })
}

pub fn distinct_moods(daily_records: &[&DailyRecord]) -> Vec<Mood> {
    daily_records
        .iter()
        .filter_map(|d| d.mood)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One breakdown per period record, most recent first
///
/// `as_of` is the day used for phase classification.
pub fn compile_cycle_history(
    records: &[PeriodRecord],
    daily_records: &[DailyRecord],
    avg_cycle_length: f64,
    avg_period_length: f64,
    as_of: NaiveDate,
) -> Vec<CycleAnalysis> {
    let sorted = sorted_by_start(records);

    let mut logs_by_day: BTreeMap<NaiveDate, Vec<&DailyRecord>> = BTreeMap::new();
    for daily in daily_records {
        logs_by_day.entry(daily.date).or_default().push(daily);
    }

    let mut history: Vec<CycleAnalysis> = sorted
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let in_period: Vec<&DailyRecord> = if record.start_date <= record.end_date {
                logs_by_day
                    .range(record.start_date..=record.end_date)
                    .flat_map(|(_, logs)| logs.iter().copied())
                    .collect()
            } else {
                Vec::new()
            };

            let notes = record
                .note
                .iter()
                .chain(in_period.iter().filter_map(|d| d.notes.as_ref()))
                .map(String::as_str);

            CycleAnalysis {
                cycle_number: index + 1,
                start_date: record.start_date,
                end_date: record.end_date,
                period_length: period_length(record),
                cycle_length: if index == 0 {
                    0
                } else {
                    cycle_length(record, sorted[index - 1])
                },
                phase: phase_at(as_of, record.start_date, avg_cycle_length, avg_period_length),
                symptoms: extract_symptoms(notes),
                average_flow: average_flow(&in_period),
                moods: distinct_moods(&in_period),
            }
        })
        .collect();

    history.reverse();
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CyclePhase;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn daily(day: &str, flow: Option<FlowLevel>, mood: Option<Mood>, notes: Option<&str>) -> DailyRecord {
        DailyRecord {
            flow,
            mood,
            notes: notes.map(str::to_string),
            ..DailyRecord::new(date(day), "regular meals")
        }
    }

    #[test]
    fn test_extract_symptoms() {
        let tags = extract_symptoms(["Bad CRAMPS today", "slight headache, very tired"]);
        assert_eq!(tags, vec![SymptomTag::Cramps, SymptomTag::Headache, SymptomTag::Fatigue]);
        assert!(extract_symptoms(["felt great"]).is_empty());
        assert!(extract_symptoms(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_average_flow_buckets() {
        let light = daily("2024-01-01", Some(FlowLevel::Light), None, None);
        let medium = daily("2024-01-02", Some(FlowLevel::Medium), None, None);
        let heavy = daily("2024-01-03", Some(FlowLevel::Heavy), None, None);
        let none = daily("2024-01-04", None, None, None);

        assert_eq!(average_flow(&[&light, &none]), Some(FlowLevel::Light));
        // (1 + 2 + 3) / 3 = 2.0
        assert_eq!(average_flow(&[&light, &medium, &heavy]), Some(FlowLevel::Medium));
        // (2 + 3) / 2 = 2.5
        assert_eq!(average_flow(&[&medium, &heavy]), Some(FlowLevel::Heavy));
        // (1 + 1 + 2) / 3 = 1.33
        assert_eq!(average_flow(&[&light, &light, &medium]), Some(FlowLevel::Medium));
        assert_eq!(average_flow(&[&none]), None);
        assert_eq!(average_flow(&[]), None);
    }

    #[test]
    fn test_compile_cycle_history() {
        let records = vec![
            PeriodRecord::new(date("2024-01-29"), date("2024-02-02")).with_note("back pain"),
            PeriodRecord::new(date("2024-01-01"), date("2024-01-05")),
        ];
        let daily_records = vec![
            daily("2024-01-01", Some(FlowLevel::Heavy), Some(Mood::Irritable), Some("cramps")),
            daily("2024-01-02", Some(FlowLevel::Heavy), Some(Mood::Sad), None),
            daily("2024-01-03", Some(FlowLevel::Medium), Some(Mood::Irritable), Some("bloated")),
            daily("2024-01-10", Some(FlowLevel::Light), Some(Mood::Happy), Some("headache")),
            daily("2024-01-30", Some(FlowLevel::Light), Some(Mood::Calm), None),
        ];

        let history = compile_cycle_history(&records, &daily_records, 28.0, 5.0, date("2024-02-01"));
        assert_eq!(history.len(), 2);

        let latest = &history[0];
        assert_eq!(latest.cycle_number, 2);
        assert_eq!(latest.start_date, date("2024-01-29"));
        assert_eq!(latest.cycle_length, 28);
        assert_eq!(latest.period_length, 5);
        assert_eq!(latest.phase, CyclePhase::Menstrual);
        assert_eq!(latest.symptoms, vec![SymptomTag::Cramps]);
        assert_eq!(latest.average_flow, Some(FlowLevel::Light));
        assert_eq!(latest.moods, vec![Mood::Calm]);

        let first = &history[1];
        assert_eq!(first.cycle_number, 1);
        assert_eq!(first.cycle_length, 0);
        assert_eq!(first.phase, CyclePhase::Luteal);
        // the headache on 01-10 is outside the period span
        assert_eq!(first.symptoms, vec![SymptomTag::Cramps, SymptomTag::Bloating]);
        // (3 + 3 + 2) / 3 = 2.67
        assert_eq!(first.average_flow, Some(FlowLevel::Heavy));
        assert_eq!(first.moods, vec![Mood::Sad, Mood::Irritable]);
    }

    #[test]
    fn test_several_logs_on_one_day_are_all_counted() {
        let records = vec![PeriodRecord::new(date("2024-03-01"), date("2024-03-03"))];
        let daily_records = vec![
            daily("2024-03-04", Some(FlowLevel::Heavy), Some(Mood::Anxious), Some("nausea")),
            daily("2024-03-02", Some(FlowLevel::Light), Some(Mood::Sad), Some("tired")),
            daily("2024-03-02", Some(FlowLevel::Light), Some(Mood::Calm), Some("acne")),
            daily("2024-02-29", Some(FlowLevel::Heavy), None, Some("headache")),
        ];

        let history = compile_cycle_history(&records, &daily_records, 28.0, 5.0, date("2024-03-02"));
        let cycle = &history[0];
        assert_eq!(cycle.symptoms, vec![SymptomTag::Fatigue, SymptomTag::Acne]);
        assert_eq!(cycle.average_flow, Some(FlowLevel::Light));
        assert_eq!(cycle.moods, vec![Mood::Calm, Mood::Sad]);
    }

    #[test]
    fn test_empty_history() {
        assert!(compile_cycle_history(&[], &[], 28.0, 5.0, date("2024-01-01")).is_empty());
    }
}
