//! Human-readable digest of analytics and cycle history

use chrono::NaiveDate;
use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::dates::{format_date, relative_label};
use crate::models::{AnalyticsResult, CycleAnalysis};

#[derive(Tabled)]
struct CycleRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Cycle")]
    cycle: String,
    #[tabled(rename = "Flow")]
    flow: String,
    #[tabled(rename = "Symptoms")]
    symptoms: String,
    #[tabled(rename = "Moods")]
    moods: String,
}

impl From<&CycleAnalysis> for CycleRow {
    fn from(cycle: &CycleAnalysis) -> Self {
        CycleRow {
            number: cycle.cycle_number,
            start: format_date(cycle.start_date),
            end: format_date(cycle.end_date),
            period: format!("{}d", cycle.period_length),
            cycle: if cycle.cycle_length == 0 {
                "-".to_string()
            } else {
                format!("{}d", cycle.cycle_length)
            },
            flow: cycle
                .average_flow
                .map(|f| f.to_string())
                .unwrap_or_else(|| "-".to_string()),
            symptoms: join_or_dash(cycle.symptoms.iter().map(|s| s.to_string())),
            moods: join_or_dash(cycle.moods.iter().map(|m| m.to_string())),
        }
    }
}

fn join_or_dash(items: impl Iterator<Item = String>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

/// Render the report as plain text
pub fn render_report(analytics: &AnalyticsResult, history: &[CycleAnalysis], generated_on: NaiveDate) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, analytics, history, generated_on);
    out
}

fn write_report(
    out: &mut String,
    analytics: &AnalyticsResult,
    history: &[CycleAnalysis],
    generated_on: NaiveDate,
) -> std::fmt::Result {
    writeln!(out, "CYCLE REPORT")?;
    writeln!(out, "============")?;
    writeln!(out, "Generated: {}", format_date(generated_on))?;
    writeln!(out)?;

    writeln!(out, "SUMMARY")?;
    writeln!(out, "-------")?;
    writeln!(out, "Recorded periods: {}", analytics.record_count)?;
    writeln!(out, "Average cycle length: {:.1} days", analytics.average_cycle_length)?;
    writeln!(out, "Average period length: {:.1} days", analytics.average_period_length)?;
    if let (Some(shortest), Some(longest)) = (analytics.shortest_cycle, analytics.longest_cycle) {
        writeln!(out, "Cycle range: {}-{} days", shortest, longest)?;
    }
    writeln!(out, "Cycle variation: {:.1}%", analytics.cycle_length_variation * 100.0)?;
    writeln!(out, "Regularity score: {}/100", analytics.regularity_score)?;
    writeln!(out, "Health score: {}/100", analytics.health_score)?;
    writeln!(out, "Trend: {}", analytics.trend)?;
    writeln!(out)?;

    writeln!(out, "PREDICTIONS")?;
    writeln!(out, "-----------")?;
    match analytics.next_period_date {
        Some(next) => {
            writeln!(
                out,
                "Next period: {} ({})",
                format_date(next),
                relative_label(next, generated_on)
            )?;
            if let Some(ovulation) = analytics.ovulation_date {
                writeln!(out, "Ovulation: {}", format_date(ovulation))?;
            }
            if let Some(window) = analytics.fertile_window {
                writeln!(
                    out,
                    "Fertile window: {} to {}",
                    format_date(window.start),
                    format_date(window.end)
                )?;
            }
            if let Some(confidence) = analytics.prediction_confidence {
                writeln!(out, "Confidence: {:.0}%", confidence * 100.0)?;
            }
        }
        None => writeln!(out, "Not enough data to predict the next period")?,
    }
    writeln!(out)?;

    if !analytics.risk_factors.is_empty() {
        writeln!(out, "RISK FACTORS")?;
        writeln!(out, "------------")?;
        for risk in &analytics.risk_factors {
            writeln!(out, "• {}", risk)?;
        }
        writeln!(out)?;
    }

    if !analytics.recommendations.is_empty() {
        writeln!(out, "RECOMMENDATIONS")?;
        writeln!(out, "---------------")?;
        for recommendation in &analytics.recommendations {
            writeln!(out, "• {}", recommendation)?;
        }
        writeln!(out)?;
    }

    if !history.is_empty() {
        writeln!(out, "CYCLE HISTORY")?;
        writeln!(out, "-------------")?;
        let rows: Vec<CycleRow> = history.iter().map(CycleRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::modern());
        writeln!(out, "{}", table)?;
    }

    Ok(())
}
