use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Menstrual flow intensity logged for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowLevel {
    Light,
    Medium,
    Heavy,
}

impl FlowLevel {
    /// Numeric weight used when averaging flow (Light=1, Medium=2, Heavy=3)
    pub fn weight(&self) -> f64 {
        match self {
            FlowLevel::Light => 1.0,
            FlowLevel::Medium => 2.0,
            FlowLevel::Heavy => 3.0,
        }
    }
}

impl fmt::Display for FlowLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowLevel::Light => write!(f, "Light"),
            FlowLevel::Medium => write!(f, "Medium"),
            FlowLevel::Heavy => write!(f, "Heavy"),
        }
    }
}

/// Mood tag attached to a daily log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Energetic,
    Sensitive,
    Sad,
    Anxious,
    Irritable,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Happy => "Happy",
            Mood::Calm => "Calm",
            Mood::Energetic => "Energetic",
            Mood::Sensitive => "Sensitive",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
            Mood::Irritable => "Irritable",
        };
        write!(f, "{}", label)
    }
}

/// Exercise intensity for the day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseIntensity {
    #[default]
    None,
    Light,
    Moderate,
    Intense,
}

/// One menstrual episode, both dates inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Unique identifier assigned by the owning store
    pub id: Uuid,

    /// First day of bleeding
    pub start_date: NaiveDate,

    /// Last day of bleeding (inclusive)
    pub end_date: NaiveDate,

    /// Optional free-text note
    #[serde(default)]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PeriodRecord {
    /// Create a record with a fresh identifier and timestamps
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let now = Utc::now();
        PeriodRecord {
            id: Uuid::new_v4(),
            start_date,
            end_date,
            note: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// True if `date` falls inside this episode
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// One day's wellness log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,

    #[serde(default)]
    pub flow: Option<FlowLevel>,

    #[serde(default)]
    pub mood: Option<Mood>,

    #[serde(default)]
    pub exercise: ExerciseIntensity,

    /// Free-text diet note
    pub diet: String,

    /// Water intake in millilitres
    #[serde(default)]
    pub water_intake_ml: Option<f64>,

    #[serde(default)]
    pub sleep_hours: Option<f64>,

    #[serde(default)]
    pub sexual_activity: bool,

    #[serde(default)]
    pub notes: Option<String>,
}

impl DailyRecord {
    /// Minimal log for a date; every optional field empty
    pub fn new(date: NaiveDate, diet: impl Into<String>) -> Self {
        DailyRecord {
            date,
            flow: None,
            mood: None,
            exercise: ExerciseIntensity::None,
            diet: diet.into(),
            water_intake_ml: None,
            sleep_hours: None,
            sexual_activity: false,
            notes: None,
        }
    }
}

/// Candidate period record as entered in a form or import row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecordDraft {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Candidate daily record as entered in a form or import row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyRecordDraft {
    pub date: Option<String>,
    #[serde(default)]
    pub diet: String,
    #[serde(default)]
    pub water_intake_ml: Option<f64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Point-in-time position within a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePhase::Menstrual => write!(f, "Menstrual"),
            CyclePhase::Follicular => write!(f, "Follicular"),
            CyclePhase::Ovulation => write!(f, "Ovulation"),
            CyclePhase::Luteal => write!(f, "Luteal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Stable,
    Increasing,
    Decreasing,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Risk indicators derived from cycle statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Cycle-length variation coefficient above 0.15
    IrregularCycle,
    /// Average cycle shorter than 21 days
    ShortCycle,
    /// Average cycle longer than 35 days
    LongCycle,
    /// Average period shorter than 3 days
    ShortPeriod,
    /// Average period longer than 7 days
    LongPeriod,
}

impl RiskFactor {
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::IrregularCycle => "irregular cycle",
            RiskFactor::ShortCycle => "short cycle",
            RiskFactor::LongCycle => "long cycle",
            RiskFactor::ShortPeriod => "short period",
            RiskFactor::LongPeriod => "long period",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Symptom keywords recognised in free-text notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomTag {
    Cramps,
    Headache,
    Fatigue,
    Bloating,
    BreastTenderness,
    Acne,
    Nausea,
}

impl fmt::Display for SymptomTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SymptomTag::Cramps => "cramps",
            SymptomTag::Headache => "headache",
            SymptomTag::Fatigue => "fatigue",
            SymptomTag::Bloating => "bloating",
            SymptomTag::BreastTenderness => "breast tenderness",
            SymptomTag::Acne => "acne",
            SymptomTag::Nausea => "nausea",
        };
        write!(f, "{}", label)
    }
}

/// Fertile window, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertileWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Aggregate statistics and predictions over a record collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    /// Number of period records supplied
    pub record_count: usize,

    /// Average cycle length in days (default when history is insufficient)
    pub average_cycle_length: f64,

    /// Average period length in days (default when history is insufficient)
    pub average_period_length: f64,

    /// Coefficient of variation of valid cycle lengths
    pub cycle_length_variation: f64,

    /// Coefficient of variation of period lengths
    pub period_length_variation: f64,

    /// Cycle-length consistency, 0-100
    pub regularity_score: u8,

    pub trend: TrendDirection,

    pub next_period_date: Option<NaiveDate>,

    /// Last predicted day of the next period
    pub predicted_period_end: Option<NaiveDate>,

    pub fertile_window: Option<FertileWindow>,

    pub ovulation_date: Option<NaiveDate>,

    /// Confidence in the next-period prediction, 0.1-0.95
    pub prediction_confidence: Option<f64>,

    /// Composite health score, 0-100
    pub health_score: u8,

    pub risk_factors: Vec<RiskFactor>,

    pub recommendations: Vec<String>,

    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,

    /// Valid cycle lengths lying beyond the outlier threshold
    pub outlier_cycle_lengths: Vec<f64>,
}

/// Breakdown of one historical cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleAnalysis {
    /// Chronological sequence number, 1 for the earliest record
    pub cycle_number: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_length: i64,
    /// Days since the previous period start, 0 for the first record
    pub cycle_length: i64,
    pub phase: CyclePhase,
    pub symptoms: Vec<SymptomTag>,
    pub average_flow: Option<FlowLevel>,
    pub moods: Vec<Mood>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarEventType {
    Period,
    PredictedPeriod,
    Ovulation,
    PredictedOvulation,
    Fertile,
    PredictedFertile,
}

impl CalendarEventType {
    pub fn is_predicted(&self) -> bool {
        matches!(
            self,
            CalendarEventType::PredictedPeriod
                | CalendarEventType::PredictedOvulation
                | CalendarEventType::PredictedFertile
        )
    }
}

/// A single day's marker for calendar display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: CalendarEventType,
    pub intensity: Option<FlowLevel>,
    pub is_predicted: bool,
}

impl CalendarEvent {
    pub fn new(date: NaiveDate, event_type: CalendarEventType) -> Self {
        CalendarEvent {
            date,
            event_type,
            intensity: None,
            is_predicted: event_type.is_predicted(),
        }
    }

    pub fn with_intensity(mut self, intensity: Option<FlowLevel>) -> Self {
        self.intensity = intensity;
        self
    }
}
