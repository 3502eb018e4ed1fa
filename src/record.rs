// src/record.rs
use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::config::PipelineConfig;

/// Identity of one employee for one team assignment.
///
/// The feed has no stable personnel number; everything downstream keys on
/// surname + first name + team. An employee who changes team
/// mid-year therefore shows up as two distinct employees. That is accepted
/// behavior, not a bug, but call sites must build the composite through
/// [`EmployeeKey::id`] instead of concatenating strings themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EmployeeKey {
    pub surname: String,
    pub first_name: String,
    pub team: String,
}

impl EmployeeKey {
    pub fn new(surname: &str, first_name: &str, team: &str) -> Self {
        Self {
            surname: surname.to_string(),
            first_name: first_name.to_string(),
            team: team.to_string(),
        }
    }

    /// Composite natural key used everywhere downstream.
    pub fn id(&self) -> String {
        format!("{} {} {}", self.surname, self.first_name, self.team)
    }

    /// A record without surname, first name or team cannot be attributed to
    /// anyone and is skipped by classification.
    pub fn is_complete(&self) -> bool {
        !self.surname.trim().is_empty()
            && !self.first_name.trim().is_empty()
            && !self.team.trim().is_empty()
    }
}

/// Schedule cell value: a full or half working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScheduledCode {
    FullDay,
    HalfDay,
}

/// Unit attached to a declared quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeclaredUnit {
    Days,
    Hours,
    Other(String),
}

impl DeclaredUnit {
    /// Maps a feed unit label ("Jour(s)", "Heure(s)", ...) to a unit.
    /// Empty labels yield `None`; unrecognized labels are kept verbatim so
    /// the conversion site can warn about them.
    pub fn parse(label: &str) -> Option<DeclaredUnit> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();
        if lower.contains("jour") {
            Some(DeclaredUnit::Days)
        } else if lower.contains("heure") {
            Some(DeclaredUnit::Hours)
        } else {
            Some(DeclaredUnit::Other(trimmed.to_string()))
        }
    }
}

/// One row of the planning feed: one employee, one calendar day, one
/// schedule/absence code. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimesheetRecord {
    pub employee: EmployeeKey,
    /// Regional direction ("DR ...") the team belongs to.
    pub org_unit: String,
    pub day: NaiveDate,
    pub weekday: Weekday,
    pub is_holiday: bool,
    /// Astreinte duty flag.
    pub is_on_call: bool,
    /// End-of-rotation marker; such days never count as attendance days.
    pub is_cycle_end: bool,
    /// Theoretical schedule code.
    pub scheduled_code: Option<ScheduledCode>,
    /// Modified theoretical schedule code, overrides the theoretical one.
    pub modified_scheduled_code: Option<ScheduledCode>,
    /// Actual schedule code, overrides both of the above.
    pub actual_scheduled_code: Option<ScheduledCode>,
    /// Absence or pay code (overtime, sick leave, other leave).
    pub pay_code: Option<String>,
    pub declared_value: Option<Decimal>,
    pub declared_unit: Option<DeclaredUnit>,
    /// Absence window bounds, also used for shift-pattern detection.
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    /// Theoretical schedule from/to sub-pair.
    pub scheduled_time_start: Option<String>,
    pub scheduled_time_end: Option<String>,
    /// Modified schedule from/to sub-pair.
    pub modified_time_start: Option<String>,
    pub modified_time_end: Option<String>,
}

impl TimesheetRecord {
    pub fn employee_id(&self) -> String {
        self.employee.id()
    }

    pub fn team_code(&self) -> &str {
        &self.employee.team
    }

    /// Resolves the three schedule codes by precedence:
    /// actual > modified > theoretical.
    pub fn resolved_scheduled_code(&self) -> Option<ScheduledCode> {
        self.actual_scheduled_code
            .or(self.modified_scheduled_code)
            .or(self.scheduled_code)
    }

    pub fn is_full_day_scheduled(&self) -> bool {
        self.resolved_scheduled_code() == Some(ScheduledCode::FullDay)
    }

    pub fn has_pay_code(&self, code: &str) -> bool {
        self.pay_code.as_deref() == Some(code)
    }

    /// Converts the declared quantity to hours.
    ///
    /// Day units multiply by the full-day hour constant; hour units pass
    /// through. An unrecognized unit is treated as hours, with a warning,
    /// never a failure. Returns `None` when no quantity is declared.
    pub fn declared_hours(&self, config: &PipelineConfig) -> Option<Decimal> {
        let value = self.declared_value?;
        match &self.declared_unit {
            Some(DeclaredUnit::Days) => Some(value * config.hours_per_day),
            Some(DeclaredUnit::Hours) => Some(value),
            Some(DeclaredUnit::Other(label)) => {
                warn!(
                    "Unknown unit '{}' for {} on {}; treating value {} as hours",
                    label,
                    self.employee_id(),
                    self.day,
                    value
                );
                Some(value)
            }
            None => {
                warn!(
                    "Missing unit for coded day {} of {}; treating value {} as hours",
                    self.day,
                    self.employee_id(),
                    value
                );
                Some(value)
            }
        }
    }

    /// Declared hours, falling back to one full-day equivalent when the coded
    /// record carries no quantity at all.
    pub fn declared_hours_or_full_day(&self, config: &PipelineConfig) -> Decimal {
        self.declared_hours(config)
            .unwrap_or(config.hours_per_day)
    }
}
