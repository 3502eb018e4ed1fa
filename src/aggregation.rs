// src/aggregation.rs
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::classification::{classify, is_eligible, Classification, EmployeeCategory};
use crate::config::PipelineConfig;
use crate::overtime::compute_overtime;
use crate::record::TimesheetRecord;
use crate::sick_leave::{compute_sick_leave, SickLeaveStats};
use crate::work_time::{compute_work_time, WorkTimeStats};

/// One output row: one employee within one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeStatistics {
    pub employee_id: String,
    pub team_code: String,
    pub category: EmployeeCategory,
    pub full_days: u32,
    pub partial_days: u32,
    /// Sick-coded days (classic + long).
    pub absent_days: u32,
    pub worked_hours: Decimal,
    pub absence_hours: Decimal,
    /// Full days over the calendar year, as a percentage.
    pub presence_rate: Decimal,
    pub overtime_hours: Decimal,
    pub classic_sick_days: u32,
    pub long_sick_days: u32,
    pub sick_periods: u32,
    pub avg_hours_per_sick_day: Decimal,
}

/// Sums and arithmetic means over all employees of one category or team.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryRow {
    pub employee_count: u32,
    pub full_days_total: u32,
    pub partial_days_total: u32,
    pub absent_days_total: u32,
    pub worked_hours_total: Decimal,
    pub absence_hours_total: Decimal,
    pub overtime_hours_total: Decimal,
    pub sick_periods_total: u32,
    pub mean_full_days: Decimal,
    pub mean_worked_hours: Decimal,
    pub mean_overtime_hours: Decimal,
    pub mean_presence_rate: Decimal,
}

/// Complete output of one pipeline run. Recomputed from scratch on every
/// invocation; deterministic for a given input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub by_category: BTreeMap<EmployeeCategory, BTreeMap<String, EmployeeStatistics>>,
    pub category_summaries: BTreeMap<EmployeeCategory, SummaryRow>,
    pub team_summaries: BTreeMap<String, SummaryRow>,
    pub skipped_records: usize,
    pub dropped_employees: usize,
}

/// Runs classification and the three calculators, then folds everything into
/// per-employee rows and per-category/per-team summaries.
///
/// Classification happens once; each calculator is then invoked per category
/// bucket and applies its own filtering internally. The calculators share no
/// state and their eligibility rules deliberately differ (overtime skips
/// `Other`, work time only covers `OnCall` and `StandardShift`, sick leave
/// covers everyone).
pub fn run_pipeline(records: &[TimesheetRecord], config: &PipelineConfig) -> PipelineReport {
    let classification = classify(records, config);
    build_report(&classification, config)
}

fn build_report(classification: &Classification, config: &PipelineConfig) -> PipelineReport {
    let mut by_category: BTreeMap<EmployeeCategory, BTreeMap<String, EmployeeStatistics>> =
        BTreeMap::new();

    for category in EmployeeCategory::ALL {
        let bucket = classification.records(category);

        let eligible = bucket
            .iter()
            .filter(|record| is_eligible(record, category, config))
            .count();
        info!(
            "Category {:?}: {} records, {} rule-eligible",
            category,
            bucket.len(),
            eligible
        );

        let overtime = compute_overtime(bucket, category, config);
        let sick_leave = compute_sick_leave(bucket, config);
        let work_time = compute_work_time(bucket, category, config);

        let mut teams: BTreeMap<String, String> = BTreeMap::new();
        for record in bucket {
            teams
                .entry(record.employee_id())
                .or_insert_with(|| record.team_code().to_string());
        }

        let rows = teams
            .into_iter()
            .map(|(employee_id, team_code)| {
                let row = build_employee_row(
                    &employee_id,
                    team_code,
                    category,
                    overtime.get(&employee_id),
                    sick_leave.get(&employee_id),
                    work_time.get(&employee_id),
                    config,
                );
                (employee_id, row)
            })
            .collect();
        by_category.insert(category, rows);
    }

    let category_summaries = by_category
        .iter()
        .map(|(category, rows)| (*category, summarize(rows.values())))
        .collect();

    let mut by_team: BTreeMap<String, Vec<&EmployeeStatistics>> = BTreeMap::new();
    for rows in by_category.values() {
        for row in rows.values() {
            by_team.entry(row.team_code.clone()).or_default().push(row);
        }
    }
    let team_summaries = by_team
        .into_iter()
        .map(|(team, rows)| (team, summarize(rows.into_iter())))
        .collect();

    PipelineReport {
        by_category,
        category_summaries,
        team_summaries,
        skipped_records: classification.skipped_records,
        dropped_employees: classification.dropped_employees,
    }
}

fn build_employee_row<'a>(
    employee_id: &str,
    team_code: String,
    category: EmployeeCategory,
    overtime: Option<&Decimal>,
    sick_leave: Option<&'a SickLeaveStats>,
    work_time: Option<&'a WorkTimeStats>,
    config: &PipelineConfig,
) -> EmployeeStatistics {
    let empty_sick = SickLeaveStats::default();
    let empty_work = WorkTimeStats::default();
    let sick = sick_leave.unwrap_or(&empty_sick);
    let work = work_time.unwrap_or(&empty_work);

    let attended_days = Decimal::from(work.full_days + work.partial_days);
    let worked_hours = attended_days * config.hours_per_day - work.absence_hours;
    let presence_rate = (Decimal::from(work.full_days) * dec!(100) / dec!(365)).round_dp(2);

    EmployeeStatistics {
        employee_id: employee_id.to_string(),
        team_code,
        category,
        full_days: work.full_days,
        partial_days: work.partial_days,
        absent_days: sick.classic_days + sick.long_days,
        worked_hours,
        absence_hours: work.absence_hours,
        presence_rate,
        overtime_hours: overtime.copied().unwrap_or_default(),
        classic_sick_days: sick.classic_days,
        long_sick_days: sick.long_days,
        sick_periods: sick.period_count,
        avg_hours_per_sick_day: sick.avg_hours_per_day,
    }
}

/// Folds rows into one summary. An empty iterator yields a zeroed summary;
/// an empty category bucket is a valid result, never an error.
fn summarize<'a>(rows: impl Iterator<Item = &'a EmployeeStatistics>) -> SummaryRow {
    let mut summary = SummaryRow::default();
    let mut presence_sum = dec!(0.0);

    for row in rows {
        summary.employee_count += 1;
        summary.full_days_total += row.full_days;
        summary.partial_days_total += row.partial_days;
        summary.absent_days_total += row.absent_days;
        summary.worked_hours_total += row.worked_hours;
        summary.absence_hours_total += row.absence_hours;
        summary.overtime_hours_total += row.overtime_hours;
        summary.sick_periods_total += row.sick_periods;
        presence_sum += row.presence_rate;
    }

    if summary.employee_count > 0 {
        let count = Decimal::from(summary.employee_count);
        summary.mean_full_days = (Decimal::from(summary.full_days_total) / count).round_dp(2);
        summary.mean_worked_hours = (summary.worked_hours_total / count).round_dp(2);
        summary.mean_overtime_hours = (summary.overtime_hours_total / count).round_dp(2);
        summary.mean_presence_rate = (presence_sum / count).round_dp(2);
    }
    summary
}
