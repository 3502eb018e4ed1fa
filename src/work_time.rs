// src/work_time.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::classification::{is_attendance_candidate, EmployeeCategory};
use crate::config::PipelineConfig;
use crate::record::TimesheetRecord;

/// Per-employee full/partial attendance rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkTimeStats {
    /// Complete working days: no absence or pay code at all.
    pub full_days: u32,
    /// Days with a non-overtime code and a partial absence.
    pub partial_days: u32,
    /// Hours of absence accumulated over the partial days.
    pub absence_hours: Decimal,
}

/// Classifies each calendar day as full, partial or excluded and sums the
/// results per employee.
///
/// Only `OnCall` and `StandardShift` are in scope; the other two categories
/// yield an empty map. Surviving records are grouped per employee per day.
/// A day carrying the overtime code anywhere is excluded entirely, even when
/// an absence code sits on the same day.
pub fn compute_work_time(
    records: &[TimesheetRecord],
    category: EmployeeCategory,
    config: &PipelineConfig,
) -> BTreeMap<String, WorkTimeStats> {
    let mut per_day: BTreeMap<(String, NaiveDate), Vec<&TimesheetRecord>> = BTreeMap::new();

    if !matches!(
        category,
        EmployeeCategory::OnCall | EmployeeCategory::StandardShift
    ) {
        return BTreeMap::new();
    }

    for record in records {
        if !is_attendance_candidate(record, category, config) {
            continue;
        }
        per_day
            .entry((record.employee_id(), record.day))
            .or_default()
            .push(record);
    }

    let mut totals: BTreeMap<String, WorkTimeStats> = BTreeMap::new();

    for ((employee_id, day), day_records) in per_day {
        let stats = totals.entry(employee_id.clone()).or_default();

        let has_overtime = day_records
            .iter()
            .any(|record| record.has_pay_code(&config.overtime_code));
        if has_overtime {
            debug!("Excluding {} for {}: overtime-coded day", day, employee_id);
            continue;
        }

        let coded: Vec<&&TimesheetRecord> = day_records
            .iter()
            .filter(|record| record.pay_code.is_some())
            .collect();

        if coded.is_empty() {
            stats.full_days += 1;
        } else {
            stats.partial_days += 1;
            let absence: Decimal = coded
                .iter()
                .map(|record| record.declared_hours_or_full_day(config))
                .sum();
            stats.absence_hours += absence;
            debug!(
                "Partial day {} for {}: {}h absence",
                day, employee_id, absence
            );
        }
    }

    totals
}
