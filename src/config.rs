// src/config.rs
use chrono::Weekday;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;

// Default team allow-lists from the reference planning feed. Team labels are
// exactly as they appear in the export (Latin-1 source, uppercased).
static DEFAULT_ON_CALL_TEAMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "PV IT ASTREINTE",
        "PV A ASTREINTE",
        "PV B ASTREINTE",
        "PV RESEAU ASTREINTE",
    ]
    .into_iter()
    .collect()
});

static DEFAULT_STANDARD_TEAMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "PV A TERRAIN",
        "PV B TERRAIN",
        "PV IT TERRAIN",
        "PV EXPLOITATION",
        "PV CONDUITE",
    ]
    .into_iter()
    .collect()
});

/// One 3x8 shift window. Bounds are compared as exact time-of-day strings
/// against the feed (no tolerance), so they are kept in feed format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: String,
    pub end: String,
}

impl ShiftWindow {
    fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// Immutable configuration for one pipeline run.
///
/// Every component receives this by reference; nothing is read from process
/// globals after construction. Defaults match the production planning feed
/// and should only be tuned deliberately (changing the sick-leave gap or the
/// shift windows changes the statistics).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Teams whose employees are classified `OnCall`.
    pub on_call_teams: HashSet<String>,
    /// Non-astreinte "TIP" teams; `RotatingShift` is carved out of these.
    pub standard_teams: HashSet<String>,
    /// The single organizational root accepted for the `Other` category.
    pub other_org_root: String,
    /// Day names counted as weekend.
    pub weekend_days: HashSet<Weekday>,
    /// Morning / afternoon / night windows, in that order.
    pub shift_windows: [ShiftWindow; 3],
    /// Pay code marking declared overtime.
    pub overtime_code: String,
    /// Pay code for classic sick leave.
    pub classic_sick_code: String,
    /// Pay code for long-duration sick leave.
    pub long_sick_code: String,
    /// Schedule cell value meaning a full working day.
    pub full_day_code: String,
    /// Schedule cell value meaning a half working day.
    pub half_day_code: String,
    /// Maximum gap (in days) between two sick dates of the same period.
    pub sick_leave_gap_days: i64,
    /// Hour equivalent of one declared day unit.
    pub hours_per_day: Decimal,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            on_call_teams: DEFAULT_ON_CALL_TEAMS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            standard_teams: DEFAULT_STANDARD_TEAMS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            other_org_root: "DR ILE DE FRANCE".to_string(),
            weekend_days: [Weekday::Sat, Weekday::Sun].into_iter().collect(),
            shift_windows: [
                ShiftWindow::new("07:30:00", "15:30:00"),
                ShiftWindow::new("15:30:00", "23:30:00"),
                ShiftWindow::new("23:30:00", "07:30:00"),
            ],
            overtime_code: "60".to_string(),
            classic_sick_code: "41".to_string(),
            long_sick_code: "42".to_string(),
            full_day_code: "J".to_string(),
            half_day_code: "D".to_string(),
            sick_leave_gap_days: 3,
            hours_per_day: dec!(8.0),
        }
    }
}

impl PipelineConfig {
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        self.weekend_days.contains(&weekday)
    }
}
