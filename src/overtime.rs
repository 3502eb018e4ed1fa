// src/overtime.rs
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::debug;

use crate::classification::EmployeeCategory;
use crate::config::PipelineConfig;
use crate::record::TimesheetRecord;

/// Sums declared overtime hours per employee for one category bucket.
///
/// Overtime is not tracked for the `Other` category. For `OnCall` and
/// `StandardShift` employees an overtime-coded record only counts on a
/// resolved full working day that is neither a weekend nor astreinte-flagged;
/// `RotatingShift` employees have no such restriction: every overtime-coded
/// day counts. These rules differ on purpose from the general eligibility
/// predicate and from the work-time pre-filter.
pub fn compute_overtime(
    records: &[TimesheetRecord],
    category: EmployeeCategory,
    config: &PipelineConfig,
) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    if category == EmployeeCategory::Other {
        return totals;
    }

    for record in records {
        if !record.has_pay_code(&config.overtime_code) {
            continue;
        }
        let Some(value) = record.declared_value else {
            continue;
        };
        if value <= dec!(0.0) {
            continue;
        }
        if category != EmployeeCategory::RotatingShift {
            if !record.is_full_day_scheduled()
                || config.is_weekend(record.weekday)
                || record.is_on_call
            {
                continue;
            }
        }

        let hours = record
            .declared_hours(config)
            .unwrap_or(dec!(0.0));
        debug!(
            "Overtime {}h for {} on {}",
            hours,
            record.employee_id(),
            record.day
        );
        *totals.entry(record.employee_id()).or_insert(dec!(0.0)) += hours;
    }

    totals
}
