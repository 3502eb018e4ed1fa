// src/sick_leave.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::PipelineConfig;
use crate::record::TimesheetRecord;

/// Per-employee sick-leave rollup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SickLeaveStats {
    /// Days coded with the classic sick-leave marker.
    pub classic_days: u32,
    /// Days coded with the long-duration sick-leave marker.
    pub long_days: u32,
    /// Maximal runs of sick dates closer than the gap threshold.
    pub period_count: u32,
    pub total_hours: Decimal,
    pub avg_hours_per_day: Decimal,
}

/// Computes sick-leave statistics per employee.
///
/// Sick records are the two sick-leave codes; each contributes its declared
/// quantity in hours (a coded record with no quantity counts as one full-day
/// equivalent) and its date. Dates are then clustered into periods: sorted,
/// a new period starts whenever the gap to the previous date exceeds the
/// configured threshold. A gap of exactly the threshold stays in the same
/// period. Duplicate dates (gap 0) never split a period.
pub fn compute_sick_leave(
    records: &[TimesheetRecord],
    config: &PipelineConfig,
) -> BTreeMap<String, SickLeaveStats> {
    let mut per_employee: BTreeMap<String, (SickLeaveStats, Vec<NaiveDate>)> = BTreeMap::new();

    for record in records {
        let is_classic = record.has_pay_code(&config.classic_sick_code);
        let is_long = record.has_pay_code(&config.long_sick_code);
        if !is_classic && !is_long {
            continue;
        }

        let entry = per_employee.entry(record.employee_id()).or_default();
        if is_classic {
            entry.0.classic_days += 1;
        } else {
            entry.0.long_days += 1;
        }
        entry.0.total_hours += record.declared_hours_or_full_day(config);
        entry.1.push(record.day);
    }

    per_employee
        .into_iter()
        .map(|(employee_id, (mut stats, mut dates))| {
            stats.period_count = count_periods(&mut dates, config.sick_leave_gap_days);
            let day_count = stats.classic_days + stats.long_days;
            stats.avg_hours_per_day = if day_count == 0 {
                dec!(0.0)
            } else {
                (stats.total_hours / Decimal::from(day_count)).round_dp(2)
            };
            (employee_id, stats)
        })
        .collect()
}

/// Clusters sorted dates into periods using the gap threshold. Input order
/// does not matter; the dates are sorted here.
fn count_periods(dates: &mut [NaiveDate], gap_days: i64) -> u32 {
    dates.sort_unstable();
    let mut periods = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &date in dates.iter() {
        match previous {
            Some(prev) if (date - prev).num_days() <= gap_days => {}
            _ => periods += 1,
        }
        previous = Some(date);
    }
    periods
}
