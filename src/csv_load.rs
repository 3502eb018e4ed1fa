// src/csv_load.rs
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::record::{DeclaredUnit, EmployeeKey, ScheduledCode, TimesheetRecord};
use crate::AppError;

// Fixed 42-column layout of the planning export. Only the columns below are
// consumed; the remainder carry payroll details outside this pipeline.
const COL_SURNAME: usize = 0;
const COL_FIRST_NAME: usize = 1;
const COL_TEAM: usize = 2;
const COL_ORG_UNIT: usize = 3;
const COL_DATE: usize = 4;
// Column 5 is the feed's day name; the weekday is derived from the date.
const COL_HOLIDAY: usize = 6;
const COL_ON_CALL: usize = 7;
const COL_CYCLE_END: usize = 8;
const COL_SCHEDULED_CODE: usize = 9;
const COL_SCHEDULED_START: usize = 10;
const COL_SCHEDULED_END: usize = 11;
const COL_MODIFIED_CODE: usize = 12;
const COL_MODIFIED_START: usize = 13;
const COL_MODIFIED_END: usize = 14;
const COL_ACTUAL_CODE: usize = 15;
const COL_PAY_CODE: usize = 16;
const COL_VALUE: usize = 17;
const COL_UNIT: usize = 18;
const COL_TIME_START: usize = 19;
const COL_TIME_END: usize = 20;

const EXPECTED_COLUMNS: usize = 42;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Loads the semicolon-delimited, Latin-1 encoded planning export.
///
/// Rows with an unparseable date or fewer columns than the fixed layout are
/// skipped with a warning. Records sharing an (employee, day) pair are
/// deduplicated, first occurrence wins. Identity fields are not validated
/// here; classification owns that rule.
pub fn load_records(
    path: &Path,
    config: &PipelineConfig,
) -> Result<Vec<TimesheetRecord>, AppError> {
    let bytes = fs::read(path)?;
    let records = parse_records(&bytes, config)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parses the raw export bytes. Separated from [`load_records`] so the
/// parsing rules can be exercised without touching the filesystem.
pub fn parse_records(
    bytes: &[u8],
    config: &PipelineConfig,
) -> Result<Vec<TimesheetRecord>, AppError> {
    let decoded = decode_latin1(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(decoded.as_bytes());

    let mut records = Vec::new();
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();
    let mut skipped_rows = 0usize;
    let mut duplicate_rows = 0usize;

    for (row_index, row) in reader.records().enumerate() {
        let row = row?;
        let line = row_index + 2; // header is line 1

        if row.len() < EXPECTED_COLUMNS {
            warn!(
                "Line {}: {} columns instead of {}; row skipped",
                line,
                row.len(),
                EXPECTED_COLUMNS
            );
            skipped_rows += 1;
            continue;
        }

        let date_cell = field(&row, COL_DATE);
        let day = match NaiveDate::parse_from_str(&date_cell, DATE_FORMAT) {
            Ok(day) => day,
            Err(_) => {
                warn!("Line {}: unparseable date '{}'; row skipped", line, date_cell);
                skipped_rows += 1;
                continue;
            }
        };

        let employee = EmployeeKey::new(
            &field(&row, COL_SURNAME),
            &field(&row, COL_FIRST_NAME),
            &field(&row, COL_TEAM),
        );

        if !seen.insert((employee.id(), day)) {
            duplicate_rows += 1;
            continue;
        }

        let record = TimesheetRecord {
            employee,
            org_unit: field(&row, COL_ORG_UNIT),
            day,
            weekday: day.weekday(),
            is_holiday: !field(&row, COL_HOLIDAY).is_empty(),
            is_on_call: !field(&row, COL_ON_CALL).is_empty(),
            is_cycle_end: !field(&row, COL_CYCLE_END).is_empty(),
            scheduled_code: parse_scheduled_code(&field(&row, COL_SCHEDULED_CODE), config),
            modified_scheduled_code: parse_scheduled_code(&field(&row, COL_MODIFIED_CODE), config),
            actual_scheduled_code: parse_scheduled_code(&field(&row, COL_ACTUAL_CODE), config),
            pay_code: optional(&row, COL_PAY_CODE),
            declared_value: parse_value(&field(&row, COL_VALUE), line),
            declared_unit: DeclaredUnit::parse(&field(&row, COL_UNIT)),
            time_start: optional(&row, COL_TIME_START),
            time_end: optional(&row, COL_TIME_END),
            scheduled_time_start: optional(&row, COL_SCHEDULED_START),
            scheduled_time_end: optional(&row, COL_SCHEDULED_END),
            modified_time_start: optional(&row, COL_MODIFIED_START),
            modified_time_end: optional(&row, COL_MODIFIED_END),
        };
        records.push(record);
    }

    if skipped_rows > 0 || duplicate_rows > 0 {
        info!(
            "Parsed {} records ({} rows skipped, {} duplicates dropped)",
            records.len(),
            skipped_rows,
            duplicate_rows
        );
    }
    Ok(records)
}

/// Latin-1 maps byte-for-byte onto the first 256 Unicode code points.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn field(row: &csv::StringRecord, index: usize) -> String {
    row.get(index).unwrap_or("").trim().to_string()
}

fn optional(row: &csv::StringRecord, index: usize) -> Option<String> {
    let cell = field(row, index);
    if cell.is_empty() {
        None
    } else {
        Some(cell)
    }
}

fn parse_scheduled_code(cell: &str, config: &PipelineConfig) -> Option<ScheduledCode> {
    if cell == config.full_day_code {
        Some(ScheduledCode::FullDay)
    } else if cell == config.half_day_code {
        Some(ScheduledCode::HalfDay)
    } else {
        None
    }
}

/// Parses a declared quantity, normalising the feed's decimal comma.
/// An unparseable value is treated as "no value", never a failure.
fn parse_value(cell: &str, line: usize) -> Option<Decimal> {
    if cell.is_empty() {
        return None;
    }
    let normalised = cell.replace(',', ".");
    match Decimal::from_str(&normalised) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Line {}: unparseable value '{}'; treated as empty", line, cell);
            None
        }
    }
}
