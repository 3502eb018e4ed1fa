// src/classification.rs
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::record::{ScheduledCode, TimesheetRecord};
use crate::shift::match_shift;

/// The four mutually exclusive employment-category buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EmployeeCategory {
    /// Astreinte teams.
    OnCall,
    /// Non-astreinte "TIP" teams without a 3x8 rotation.
    StandardShift,
    /// Standard-shift teams whose records exhibit a 3x8 window.
    RotatingShift,
    /// Everything else under the recognized organizational root.
    Other,
}

impl EmployeeCategory {
    pub const ALL: [EmployeeCategory; 4] = [
        EmployeeCategory::OnCall,
        EmployeeCategory::StandardShift,
        EmployeeCategory::RotatingShift,
        EmployeeCategory::Other,
    ];
}

impl fmt::Display for EmployeeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmployeeCategory::OnCall => "Astreinte",
            EmployeeCategory::StandardShift => "Horaire standard",
            EmployeeCategory::RotatingShift => "3x8",
            EmployeeCategory::Other => "Autres",
        };
        write!(f, "{}", label)
    }
}

/// Result of one classification pass: four disjoint record buckets plus
/// lenient-skip counters. Every bucket is present even when empty.
#[derive(Debug, Clone)]
pub struct Classification {
    pub buckets: BTreeMap<EmployeeCategory, Vec<TimesheetRecord>>,
    /// Records missing identity fields, excluded before grouping.
    pub skipped_records: usize,
    /// Employees whose team matched no allow-list and whose org root is not
    /// the recognized one. Deliberate catch-all exclusion, not an error.
    pub dropped_employees: usize,
}

impl Classification {
    pub fn records(&self, category: EmployeeCategory) -> &[TimesheetRecord] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Assigns every employee (all of their records) to one category.
///
/// The team label of the first record decides; all records of one employee
/// share one team label by construction of the composite key. Standard-shift
/// teams are split into `RotatingShift` when any record of the employee
/// matches one of the three 3x8 windows.
pub fn classify(records: &[TimesheetRecord], config: &PipelineConfig) -> Classification {
    let mut by_employee: BTreeMap<String, Vec<&TimesheetRecord>> = BTreeMap::new();
    let mut skipped_records = 0usize;

    for record in records {
        if !record.employee.is_complete() {
            warn!(
                "Skipping record on {} with incomplete identity (surname='{}', team='{}')",
                record.day, record.employee.surname, record.employee.team
            );
            skipped_records += 1;
            continue;
        }
        by_employee
            .entry(record.employee_id())
            .or_default()
            .push(record);
    }

    let mut buckets: BTreeMap<EmployeeCategory, Vec<TimesheetRecord>> = EmployeeCategory::ALL
        .into_iter()
        .map(|category| (category, Vec::new()))
        .collect();
    let mut dropped_employees = 0usize;

    for (employee_id, employee_records) in &by_employee {
        let first = employee_records[0];
        let team = first.team_code();

        let category = if config.on_call_teams.contains(team) {
            EmployeeCategory::OnCall
        } else if config.standard_teams.contains(team) {
            let rotates = employee_records
                .iter()
                .any(|record| match_shift(record, config).is_some());
            if rotates {
                EmployeeCategory::RotatingShift
            } else {
                EmployeeCategory::StandardShift
            }
        } else if first.org_unit == config.other_org_root {
            EmployeeCategory::Other
        } else {
            debug!(
                "Dropping employee {} (team '{}', org unit '{}'): no category",
                employee_id, team, first.org_unit
            );
            dropped_employees += 1;
            continue;
        };

        buckets
            .entry(category)
            .or_default()
            .extend(employee_records.iter().map(|record| (*record).clone()));
    }

    for (category, bucket) in &buckets {
        info!("Category {:?}: {} records", category, bucket.len());
    }
    if skipped_records > 0 {
        info!(
            "Excluded {} records with incomplete identity fields",
            skipped_records
        );
    }

    Classification {
        buckets,
        skipped_records,
        dropped_employees,
    }
}

/// General per-category business-rule predicate.
///
/// Each downstream calculator re-derives eligibility with its own variant;
/// this is the shared baseline of those rules. The asymmetries between
/// categories are intentional business constraints and must not be unified.
pub fn is_eligible(
    record: &TimesheetRecord,
    category: EmployeeCategory,
    config: &PipelineConfig,
) -> bool {
    match category {
        EmployeeCategory::OnCall => {
            if record.is_holiday {
                return false;
            }
            if config.is_weekend(record.weekday) && !record.is_on_call {
                return false;
            }
            record.is_full_day_scheduled() || record.is_on_call
        }
        EmployeeCategory::StandardShift => {
            !record.is_on_call && !record.is_holiday && record.is_full_day_scheduled()
        }
        // Rotating shifts run every day: holidays and weekends stay in.
        EmployeeCategory::RotatingShift => {
            !record.is_on_call && match_shift(record, config).is_some()
        }
        EmployeeCategory::Other => !record.is_on_call && !record.is_holiday,
    }
}

/// Work-time pre-filter: the tightened variant of [`is_eligible`] used by the
/// full/partial day calculator. Holidays, cycle-end days and weekends are out
/// unconditionally; the record must resolve to a full or half day (for
/// on-call employees the astreinte flag also qualifies the day).
pub fn is_attendance_candidate(
    record: &TimesheetRecord,
    category: EmployeeCategory,
    config: &PipelineConfig,
) -> bool {
    if record.is_holiday || record.is_cycle_end || config.is_weekend(record.weekday) {
        return false;
    }
    let scheduled = matches!(
        record.resolved_scheduled_code(),
        Some(ScheduledCode::FullDay) | Some(ScheduledCode::HalfDay)
    );
    match category {
        EmployeeCategory::OnCall => scheduled || record.is_on_call,
        EmployeeCategory::StandardShift => !record.is_on_call && scheduled,
        // Work time is only tracked for the two categories above.
        _ => false,
    }
}
