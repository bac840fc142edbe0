//! Calendar-ready events for historical and predicted cycle facts
//!
//! Every event the generator returns lies inside the requested range.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::dates::{self, add_days, is_within};
use crate::models::{
    AnalyticsResult, CalendarEvent, CalendarEventType, DailyRecord, FlowLevel, PeriodRecord,
};

/// Builds calendar events from records and an analytics snapshot
pub struct CalendarEventGenerator<'a> {
    analytics: &'a AnalyticsResult,
    daily_records: &'a [DailyRecord],
    as_of: Option<NaiveDate>,
}

impl<'a> CalendarEventGenerator<'a> {
    pub fn new(analytics: &'a AnalyticsResult) -> Self {
        CalendarEventGenerator {
            analytics,
            daily_records: &[],
            as_of: None,
        }
    }

    /// Attach daily logs so period days carry the logged flow as intensity
    pub fn with_daily_records(mut self, daily_records: &'a [DailyRecord]) -> Self {
        self.daily_records = daily_records;
        self
    }

    /// Reference day deciding whether the predicted period is still upcoming
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.as_of = Some(today);
        self
    }

    /// Events within `[from, to]`, ordered by date then event type
    pub fn generate(&self, records: &[PeriodRecord], from: NaiveDate, to: NaiveDate) -> Vec<CalendarEvent> {
        let mut events = Vec::new();
        if from > to {
            return events;
        }

        let half_cycle = (self.analytics.average_cycle_length / 2.0).floor() as i64;
        let flow_by_day: BTreeMap<NaiveDate, FlowLevel> = self
            .daily_records
            .iter()
            .filter_map(|d| d.flow.map(|flow| (d.date, flow)))
            .collect();

        let mut push = |date: NaiveDate, event_type: CalendarEventType, intensity: Option<FlowLevel>| {
            if is_within(date, from, to) {
                events.push(CalendarEvent::new(date, event_type).with_intensity(intensity));
            }
        };

        for record in records {
            let mut day = record.start_date.max(from);
            let last = record.end_date.min(to);
            while day <= last {
                push(day, CalendarEventType::Period, flow_by_day.get(&day).copied());
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }

            let ovulation = add_days(record.start_date, half_cycle);
            push(ovulation, CalendarEventType::Ovulation, None);
            push(add_days(ovulation, -1), CalendarEventType::Fertile, None);
            push(add_days(ovulation, 1), CalendarEventType::Fertile, None);
        }

        let today = self.as_of.unwrap_or_else(dates::today);
        if let Some(predicted_start) = self.analytics.next_period_date.filter(|d| *d >= today) {
            let period_days = self.analytics.average_period_length.round().max(1.0) as i64;
            for offset in 0..period_days {
                push(add_days(predicted_start, offset), CalendarEventType::PredictedPeriod, None);
            }

            let ovulation = add_days(predicted_start, half_cycle);
            push(ovulation, CalendarEventType::PredictedOvulation, None);
            push(add_days(ovulation, -1), CalendarEventType::PredictedFertile, None);
            push(add_days(ovulation, 1), CalendarEventType::PredictedFertile, None);
        }

        events.sort_by_key(|e| (e.date, e.event_type));
        events.dedup_by(|a, b| a.date == b.date && a.event_type == b.event_type);
        events
    }

    /// Events for one calendar month; empty for an invalid month
    pub fn generate_month(&self, records: &[PeriodRecord], year: i32, month: u32) -> Vec<CalendarEvent> {
        match dates::month_range(year, month) {
            Some((first, last)) => self.generate(records, first, last),
            None => Vec::new(),
        }
    }
}
