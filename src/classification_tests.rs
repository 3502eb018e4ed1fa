// src/classification_tests.rs

#[cfg(test)]
mod tests {
    use crate::classification::*;
    use crate::config::PipelineConfig;
    use crate::record::{EmployeeKey, ScheduledCode, TimesheetRecord};
    use crate::shift::{match_shift, Shift};
    use chrono::{Datelike, NaiveDate};

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    // Helper to build records in tests: a plain full working day.
    fn build_record(surname: &str, team: &str, date_str: &str) -> TimesheetRecord {
        let day = d(date_str);
        TimesheetRecord {
            employee: EmployeeKey::new(surname, "Jean", team),
            org_unit: "DR NORMANDIE".to_string(),
            day,
            weekday: day.weekday(),
            is_holiday: false,
            is_on_call: false,
            is_cycle_end: false,
            scheduled_code: Some(ScheduledCode::FullDay),
            modified_scheduled_code: None,
            actual_scheduled_code: None,
            pay_code: None,
            declared_value: None,
            declared_unit: None,
            time_start: None,
            time_end: None,
            scheduled_time_start: None,
            scheduled_time_end: None,
            modified_time_start: None,
            modified_time_end: None,
        }
    }

    fn with_window(mut record: TimesheetRecord, start: &str, end: &str) -> TimesheetRecord {
        record.time_start = Some(start.to_string());
        record.time_end = Some(end.to_string());
        record
    }

    // --- Shift matching ---

    #[test]
    fn test_morning_window_matches_exactly() {
        let config = PipelineConfig::default();
        let record = with_window(
            build_record("DUPONT", "PV B TERRAIN", "2024-03-04"),
            "07:30:00",
            "15:30:00",
        );
        assert_eq!(match_shift(&record, &config), Some(Shift::Morning));
    }

    #[test]
    fn test_afternoon_and_night_windows_match() {
        let config = PipelineConfig::default();
        let afternoon = with_window(
            build_record("DUPONT", "PV B TERRAIN", "2024-03-04"),
            "15:30:00",
            "23:30:00",
        );
        let night = with_window(
            build_record("DUPONT", "PV B TERRAIN", "2024-03-04"),
            "23:30:00",
            "07:30:00",
        );
        assert_eq!(match_shift(&afternoon, &config), Some(Shift::Afternoon));
        assert_eq!(match_shift(&night, &config), Some(Shift::Night));
    }

    #[test]
    fn test_off_by_one_minute_never_matches() {
        let config = PipelineConfig::default();
        let record = with_window(
            build_record("DUPONT", "PV B TERRAIN", "2024-03-04"),
            "15:29:00",
            "15:30:00",
        );
        assert_eq!(match_shift(&record, &config), None);
    }

    #[test]
    fn test_missing_bound_never_matches() {
        let config = PipelineConfig::default();
        let mut record = build_record("DUPONT", "PV B TERRAIN", "2024-03-04");
        record.time_start = Some("07:30:00".to_string());
        assert_eq!(match_shift(&record, &config), None);
    }

    #[test]
    fn test_shift_matcher_falls_back_to_schedule_sub_pairs() {
        let config = PipelineConfig::default();
        let mut record = build_record("DUPONT", "PV B TERRAIN", "2024-03-04");
        record.scheduled_time_start = Some("15:30:00".to_string());
        record.scheduled_time_end = Some("23:30:00".to_string());
        assert_eq!(match_shift(&record, &config), Some(Shift::Afternoon));
    }

    // --- Category assignment ---

    #[test]
    fn test_on_call_team_is_classified_on_call() {
        let config = PipelineConfig::default();
        let records = vec![build_record("MARTIN", "PV IT ASTREINTE", "2024-03-04")];
        let classification = classify(&records, &config);
        assert_eq!(classification.records(EmployeeCategory::OnCall).len(), 1);
        assert_eq!(classification.skipped_records, 0);
    }

    #[test]
    fn test_standard_team_without_shift_match_is_standard() {
        let config = PipelineConfig::default();
        let records = vec![build_record("MARTIN", "PV B TERRAIN", "2024-03-04")];
        let classification = classify(&records, &config);
        assert_eq!(
            classification.records(EmployeeCategory::StandardShift).len(),
            1
        );
        assert!(classification
            .records(EmployeeCategory::RotatingShift)
            .is_empty());
    }

    #[test]
    fn test_single_shift_match_moves_all_records_to_rotating() {
        let config = PipelineConfig::default();
        let records = vec![
            build_record("MARTIN", "PV B TERRAIN", "2024-03-04"),
            with_window(
                build_record("MARTIN", "PV B TERRAIN", "2024-03-05"),
                "07:30:00",
                "15:30:00",
            ),
        ];
        let classification = classify(&records, &config);
        assert_eq!(
            classification.records(EmployeeCategory::RotatingShift).len(),
            2,
            "All records of a 3x8 employee belong to the rotating bucket"
        );
        assert!(classification
            .records(EmployeeCategory::StandardShift)
            .is_empty());
    }

    #[test]
    fn test_unknown_team_under_recognized_root_is_other() {
        let config = PipelineConfig::default();
        let mut record = build_record("MARTIN", "SERVICE CLIENT", "2024-03-04");
        record.org_unit = config.other_org_root.clone();
        let classification = classify(&[record], &config);
        assert_eq!(classification.records(EmployeeCategory::Other).len(), 1);
        assert_eq!(classification.dropped_employees, 0);
    }

    #[test]
    fn test_unknown_team_and_root_drops_employee() {
        let config = PipelineConfig::default();
        let records = vec![build_record("MARTIN", "SERVICE CLIENT", "2024-03-04")];
        let classification = classify(&records, &config);
        assert_eq!(classification.dropped_employees, 1);
        for category in EmployeeCategory::ALL {
            assert!(classification.records(category).is_empty());
        }
    }

    #[test]
    fn test_incomplete_identity_is_skipped_not_classified() {
        let config = PipelineConfig::default();
        let mut record = build_record("", "PV IT ASTREINTE", "2024-03-04");
        record.employee.first_name = String::new();
        let classification = classify(&[record], &config);
        assert_eq!(classification.skipped_records, 1);
        assert!(classification.records(EmployeeCategory::OnCall).is_empty());
    }

    #[test]
    fn test_buckets_form_a_partition() {
        let config = PipelineConfig::default();
        let mut records = vec![
            build_record("MARTIN", "PV IT ASTREINTE", "2024-03-04"),
            build_record("MARTIN", "PV IT ASTREINTE", "2024-03-05"),
            build_record("DURAND", "PV B TERRAIN", "2024-03-04"),
            with_window(
                build_record("PETIT", "PV B TERRAIN", "2024-03-04"),
                "23:30:00",
                "07:30:00",
            ),
            build_record("LEROY", "SERVICE CLIENT", "2024-03-04"),
        ];
        records[4].org_unit = config.other_org_root.clone();

        let classification = classify(&records, &config);

        let total: usize = EmployeeCategory::ALL
            .iter()
            .map(|category| classification.records(*category).len())
            .sum();
        assert_eq!(total, records.len(), "Every record lands in exactly one bucket");

        // No employee id appears in two buckets.
        for a in EmployeeCategory::ALL {
            for b in EmployeeCategory::ALL {
                if a == b {
                    continue;
                }
                for record in classification.records(a) {
                    assert!(
                        !classification
                            .records(b)
                            .iter()
                            .any(|other| other.employee_id() == record.employee_id()),
                        "Employee {} found in both {:?} and {:?}",
                        record.employee_id(),
                        a,
                        b
                    );
                }
            }
        }
    }

    // --- Eligibility rules ---

    #[test]
    fn test_on_call_eligibility_excludes_holidays() {
        let config = PipelineConfig::default();
        let mut record = build_record("MARTIN", "PV IT ASTREINTE", "2024-03-04");
        record.is_holiday = true;
        assert!(!is_eligible(&record, EmployeeCategory::OnCall, &config));
    }

    #[test]
    fn test_on_call_weekend_needs_the_astreinte_flag() {
        let config = PipelineConfig::default();
        // 2024-03-09 is a Saturday.
        let mut record = build_record("MARTIN", "PV IT ASTREINTE", "2024-03-09");
        assert!(!is_eligible(&record, EmployeeCategory::OnCall, &config));

        record.is_on_call = true;
        assert!(is_eligible(&record, EmployeeCategory::OnCall, &config));
    }

    #[test]
    fn test_standard_shift_excludes_astreinte_days() {
        let config = PipelineConfig::default();
        let mut record = build_record("MARTIN", "PV B TERRAIN", "2024-03-04");
        assert!(is_eligible(&record, EmployeeCategory::StandardShift, &config));

        record.is_on_call = true;
        assert!(!is_eligible(&record, EmployeeCategory::StandardShift, &config));
    }

    #[test]
    fn test_rotating_shift_keeps_holidays_and_weekends() {
        let config = PipelineConfig::default();
        // Saturday and holiday-flagged; rotations run every day.
        let mut record = with_window(
            build_record("MARTIN", "PV B TERRAIN", "2024-03-09"),
            "23:30:00",
            "07:30:00",
        );
        record.is_holiday = true;
        assert!(is_eligible(&record, EmployeeCategory::RotatingShift, &config));
    }

    #[test]
    fn test_other_excludes_astreinte_and_holidays_only() {
        let config = PipelineConfig::default();
        let mut record = build_record("MARTIN", "SERVICE CLIENT", "2024-03-04");
        record.scheduled_code = None;
        assert!(is_eligible(&record, EmployeeCategory::Other, &config));

        record.is_holiday = true;
        assert!(!is_eligible(&record, EmployeeCategory::Other, &config));
    }

    #[test]
    fn test_modified_code_overrides_theoretical_for_eligibility() {
        let config = PipelineConfig::default();
        let mut record = build_record("MARTIN", "PV B TERRAIN", "2024-03-04");
        record.modified_scheduled_code = Some(ScheduledCode::HalfDay);
        assert!(
            !is_eligible(&record, EmployeeCategory::StandardShift, &config),
            "Modified half-day must override the theoretical full day"
        );
    }
}
