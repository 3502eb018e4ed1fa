// src/shift.rs
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::record::TimesheetRecord;

/// One of the three fixed 8-hour windows of the 3x8 rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

/// Matches a record's time bounds against the three reference shift windows.
///
/// The comparison is exact string equality on the feed literals: a record
/// one minute off never matches. The primary start/end pair is checked first,
/// then the theoretical and modified schedule sub-pairs. Returns `None` when
/// no complete pair matches a window.
pub fn match_shift(record: &TimesheetRecord, config: &PipelineConfig) -> Option<Shift> {
    let pairs = [
        (&record.time_start, &record.time_end),
        (&record.scheduled_time_start, &record.scheduled_time_end),
        (&record.modified_time_start, &record.modified_time_end),
    ];

    for (start, end) in pairs {
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        for (index, window) in config.shift_windows.iter().enumerate() {
            if start == &window.start && end == &window.end {
                return Some(match index {
                    0 => Shift::Morning,
                    1 => Shift::Afternoon,
                    _ => Shift::Night,
                });
            }
        }
    }
    None
}
