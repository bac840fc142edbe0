//! Aggregate statistics, scores and advisory rules over measurement series
//!
//! All functions are total: empty or degenerate input yields a neutral value
//! (0, 100 or `Stable`) rather than `NaN`.

use statrs::statistics::Statistics;

use crate::models::{DailyRecord, RiskFactor, TrendDirection};

/// Default window for trend comparison
pub const DEFAULT_TREND_WINDOW: usize = 6;

/// Default outlier threshold in standard deviations
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 2.0;

/// Variation coefficient above which a cycle counts as irregular
pub const IRREGULARITY_THRESHOLD: f64 = 0.15;

/// Scaling applied to the variation coefficient in the regularity score
pub const REGULARITY_CV_SCALE: f64 = 200.0;

pub const NORMAL_CYCLE_RANGE: (f64, f64) = (21.0, 35.0);
pub const NORMAL_PERIOD_RANGE: (f64, f64) = (3.0, 7.0);

const REGULARITY_WEIGHT: f64 = 0.4;
const MAX_RANGE_PENALTY: f64 = 20.0;
const PERIOD_PENALTY_PER_DAY: f64 = 5.0;
const CYCLE_PENALTY_PER_DAY: f64 = 2.0;

/// Arithmetic mean, 0 for an empty series and exact for a constant one
pub fn mean(values: &[f64]) -> f64 {
    match values.first() {
        None => 0.0,
        Some(first) if is_constant(values) => *first,
        Some(_) => values.iter().mean(),
    }
}

/// Population standard deviation (divisor n)
///
/// Exactly 0 for an empty or constant series; the streaming estimate in
/// statrs leaves rounding residue on constant non-integer input.
pub fn std_dev(values: &[f64]) -> f64 {
    if is_constant(values) {
        return 0.0;
    }
    values.iter().population_std_dev()
}

fn is_constant(values: &[f64]) -> bool {
    match values.split_first() {
        None => true,
        Some((first, rest)) => rest.iter().all(|v| v == first),
    }
}

/// Standard deviation over mean; 0 with fewer than 2 samples or a zero mean
pub fn variation_coefficient(values: &[f64]) -> f64 {
    if values.len() < 2 || is_constant(values) {
        return 0.0;
    }
    let avg = mean(values);
    if avg == 0.0 {
        return 0.0;
    }
    std_dev(values) / avg
}

/// Cycle-length consistency, 0-100; 100 until there are 2 samples
pub fn regularity_score(cycle_lengths: &[f64]) -> u8 {
    if cycle_lengths.len() < 2 {
        return 100;
    }
    let raw = 100.0 - variation_coefficient(cycle_lengths) * REGULARITY_CV_SCALE;
    raw.round().clamp(0.0, 100.0) as u8
}

/// Compare the mean of the last `window` values with the `window` before it
pub fn trend(series: &[f64], window: usize) -> TrendDirection {
    if window == 0 || series.len() < 2 * window {
        return TrendDirection::Stable;
    }

    let recent = &series[series.len() - window..];
    let previous = &series[series.len() - 2 * window..series.len() - window];
    let change = mean(recent) - mean(previous);

    if change.abs() < 1.0 {
        TrendDirection::Stable
    } else if change > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    }
}

/// Values further than `threshold` standard deviations from the mean
pub fn identify_outliers(values: &[f64], threshold: f64) -> Vec<f64> {
    if values.len() < 2 {
        return Vec::new();
    }
    let avg = mean(values);
    let sd = std_dev(values);

    values
        .iter()
        .copied()
        .filter(|v| (v - avg).abs() > threshold * sd)
        .collect()
}

/// Symptom-severity deduction for the health score
///
/// Always 0 until daily logs carry a severity scale.
pub fn symptom_severity(_daily_records: &[DailyRecord]) -> f64 {
    0.0
}

fn range_penalty(value: f64, (low, high): (f64, f64), per_day: f64) -> f64 {
    let distance = if value < low {
        low - value
    } else if value > high {
        value - high
    } else {
        0.0
    };
    (distance * per_day).min(MAX_RANGE_PENALTY)
}

/// Composite 0-100 score from regularity and length sanity
///
/// Empty series contribute no penalty.
pub fn health_score(cycle_lengths: &[f64], period_lengths: &[f64], daily_records: &[DailyRecord]) -> u8 {
    let mut score = 100.0;

    let regularity = f64::from(regularity_score(cycle_lengths));
    score = score * (1.0 - REGULARITY_WEIGHT) + regularity * REGULARITY_WEIGHT;

    if !period_lengths.is_empty() {
        score -= range_penalty(mean(period_lengths), NORMAL_PERIOD_RANGE, PERIOD_PENALTY_PER_DAY);
    }
    if !cycle_lengths.is_empty() {
        score -= range_penalty(mean(cycle_lengths), NORMAL_CYCLE_RANGE, CYCLE_PENALTY_PER_DAY);
    }

    score -= symptom_severity(daily_records);

    score.round().clamp(0.0, 100.0) as u8
}

pub fn identify_risk_factors(cycle_lengths: &[f64], avg_cycle_length: f64, avg_period_length: f64) -> Vec<RiskFactor> {
    let mut risks = Vec::new();

    if variation_coefficient(cycle_lengths) > IRREGULARITY_THRESHOLD {
        risks.push(RiskFactor::IrregularCycle);
    }

    if avg_cycle_length < NORMAL_CYCLE_RANGE.0 {
        risks.push(RiskFactor::ShortCycle);
    } else if avg_cycle_length > NORMAL_CYCLE_RANGE.1 {
        risks.push(RiskFactor::LongCycle);
    }

    if avg_period_length < NORMAL_PERIOD_RANGE.0 {
        risks.push(RiskFactor::ShortPeriod);
    } else if avg_period_length > NORMAL_PERIOD_RANGE.1 {
        risks.push(RiskFactor::LongPeriod);
    }

    risks
}

/// Advisory strings from scores and risk factors
pub fn recommendations(regularity_score: u8, health_score: u8, risk_factors: &[RiskFactor]) -> Vec<String> {
    let mut recommendations: Vec<String> = Vec::new();
    let mut push = |text: &str| {
        if !recommendations.iter().any(|r| r == text) {
            recommendations.push(text.to_string());
        }
    };

    if regularity_score < 60 {
        push("Your cycle lengths vary considerably; keep logging every period to improve predictions");
    } else if regularity_score >= 90 {
        push("Your cycles are very regular; predictions should be reliable");
    }

    if health_score < 60 {
        push("Consider discussing your cycle history with a healthcare provider");
    }

    for risk in risk_factors {
        match risk {
            RiskFactor::IrregularCycle => push(
                "Irregular cycles are often linked to stress, sleep or weight changes; note any recent lifestyle changes",
            ),
            RiskFactor::ShortCycle | RiskFactor::LongCycle => {
                push("Cycles outside 21-35 days are worth mentioning at your next check-up")
            }
            RiskFactor::ShortPeriod | RiskFactor::LongPeriod => {
                push("Periods shorter than 3 or longer than 7 days are worth mentioning at your next check-up")
            }
        }
    }

    push("Maintain a balanced diet and stay well hydrated");
    push("Aim for regular exercise and 7-9 hours of sleep");

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_mean_and_std_dev() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[26.0, 28.0, 30.0]) - 28.0).abs() < EPSILON);
        // Population divisor: sqrt(((−2)² + 0 + 2²) / 3)
        assert!((std_dev(&[26.0, 28.0, 30.0]) - (8.0f64 / 3.0).sqrt()).abs() < EPSILON);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[28.0]), 0.0);
    }

    #[test]
    fn test_variation_coefficient_guards() {
        assert_eq!(variation_coefficient(&[28.0, 28.0, 28.0, 28.0]), 0.0);
        assert_eq!(variation_coefficient(&[28.0]), 0.0);
        assert_eq!(variation_coefficient(&[]), 0.0);
        assert_eq!(variation_coefficient(&[0.0, 0.0]), 0.0);
        assert!((variation_coefficient(&[21.0, 35.0, 21.0, 35.0]) - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_constant_non_integer_series_has_no_spread() {
        let series = [38.936746877265264; 6];
        assert_eq!(mean(&series), 38.936746877265264);
        assert_eq!(std_dev(&series), 0.0);
        assert_eq!(variation_coefficient(&series), 0.0);
        assert_eq!(regularity_score(&series), 100);
        assert!(identify_outliers(&series, 2.0).is_empty());
    }

    #[test]
    fn test_regularity_score() {
        assert_eq!(regularity_score(&[28.0, 28.0, 28.0, 28.0]), 100);
        assert_eq!(regularity_score(&[]), 100);
        assert_eq!(regularity_score(&[45.0]), 100);
        assert_eq!(regularity_score(&[21.0, 35.0, 21.0, 35.0]), 50);
        // cv far above 0.5 clamps to zero
        assert_eq!(regularity_score(&[5.0, 60.0, 5.0, 60.0]), 0);
    }

    #[test]
    fn test_trend() {
        let short = [28.0; 11];
        assert_eq!(trend(&short, 6), TrendDirection::Stable);

        let mut rising = vec![28.0; 6];
        rising.extend([31.0; 6]);
        assert_eq!(trend(&rising, 6), TrendDirection::Increasing);

        let mut falling = vec![32.0; 6];
        falling.extend([29.0; 6]);
        assert_eq!(trend(&falling, 6), TrendDirection::Decreasing);

        let mut small_change = vec![28.0; 6];
        small_change.extend([28.5; 6]);
        assert_eq!(trend(&small_change, 6), TrendDirection::Stable);

        // only the trailing 2 × window entries count
        let mut long = vec![40.0; 5];
        long.extend([28.0; 12]);
        assert_eq!(trend(&long, 6), TrendDirection::Stable);

        assert_eq!(trend(&rising, 0), TrendDirection::Stable);
    }

    #[test]
    fn test_identify_outliers() {
        let values = [28.0, 28.0, 29.0, 27.0, 28.0, 28.0, 29.0, 27.0, 28.0, 45.0];
        assert_eq!(identify_outliers(&values, 2.0), vec![45.0]);
        assert!(identify_outliers(&[28.0; 5], 2.0).is_empty());
        assert!(identify_outliers(&[28.0], 2.0).is_empty());
    }

    #[test]
    fn test_health_score() {
        assert_eq!(health_score(&[28.0, 28.0, 28.0], &[5.0, 5.0, 5.0], &[]), 100);
        assert_eq!(health_score(&[], &[], &[]), 100);

        // regularity 50 -> 60 + 20 = 80
        assert_eq!(health_score(&[21.0, 35.0, 21.0, 35.0], &[5.0; 4], &[]), 80);

        // period average 9 days -> 2 days over -> -10
        assert_eq!(health_score(&[28.0, 28.0], &[9.0, 9.0], &[]), 90);

        // period penalty caps at 20, cycle average 45 -> 10 over -> -20
        assert_eq!(health_score(&[45.0, 45.0], &[14.0, 14.0], &[]), 60);
    }

    #[test]
    fn test_symptom_severity_is_neutral() {
        assert_eq!(symptom_severity(&[]), 0.0);
    }

    #[test]
    fn test_identify_risk_factors() {
        assert!(identify_risk_factors(&[28.0, 28.0], 28.0, 5.0).is_empty());

        let risks = identify_risk_factors(&[21.0, 35.0, 21.0, 35.0], 28.0, 5.0);
        assert_eq!(risks, vec![RiskFactor::IrregularCycle]);

        let risks = identify_risk_factors(&[19.0, 19.0], 19.0, 2.0);
        assert_eq!(risks, vec![RiskFactor::ShortCycle, RiskFactor::ShortPeriod]);

        let risks = identify_risk_factors(&[40.0, 40.0], 40.0, 8.0);
        assert_eq!(risks, vec![RiskFactor::LongCycle, RiskFactor::LongPeriod]);
        assert_eq!(RiskFactor::IrregularCycle.to_string(), "irregular cycle");
    }

    #[test]
    fn test_recommendations_always_include_generic_advice() {
        let recs = recommendations(100, 100, &[]);
        assert_eq!(recs.len(), 3);
        assert!(recs.iter().any(|r| r.contains("balanced diet")));
        assert!(recs.iter().any(|r| r.contains("sleep")));

        let recs = recommendations(40, 50, &[RiskFactor::IrregularCycle, RiskFactor::ShortCycle, RiskFactor::LongCycle]);
        assert!(recs.iter().any(|r| r.contains("healthcare provider")));
        // short and long cycle share one line
        assert_eq!(recs.len(), 6);
    }
}
