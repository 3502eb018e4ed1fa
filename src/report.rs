// src/report.rs
use std::fmt::Write;

use crate::aggregation::{PipelineReport, SummaryRow};
use crate::classification::EmployeeCategory;

/// Renders the plain-text structured summary: one section per category with
/// its employee rows, followed by the per-team rollup.
pub fn render_text_report(report: &PipelineReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Statistiques de pointage ===");
    let _ = writeln!(
        out,
        "Lignes ignorées (identité incomplète) : {} | Agents hors périmètre : {}",
        report.skipped_records, report.dropped_employees
    );

    for category in EmployeeCategory::ALL {
        let rows = match report.by_category.get(&category) {
            Some(rows) => rows,
            None => continue,
        };
        let _ = writeln!(out, "\n--- {} ({} agents) ---", category, rows.len());

        for row in rows.values() {
            let _ = writeln!(
                out,
                "{} | jours complets: {} | jours partiels: {} | heures travaillées: {} | \
                 heures d'absence: {} | présence: {}% | heures sup: {} | \
                 maladie: {}+{} jours sur {} période(s), {} h/jour",
                row.employee_id,
                row.full_days,
                row.partial_days,
                row.worked_hours,
                row.absence_hours,
                row.presence_rate,
                row.overtime_hours,
                row.classic_sick_days,
                row.long_sick_days,
                row.sick_periods,
                row.avg_hours_per_sick_day,
            );
        }

        if let Some(summary) = report.category_summaries.get(&category) {
            write_summary(&mut out, "Synthèse", summary);
        }
    }

    let _ = writeln!(out, "\n--- Synthèse par équipe ---");
    for (team, summary) in &report.team_summaries {
        write_summary(&mut out, team, summary);
    }

    out
}

fn write_summary(out: &mut String, label: &str, summary: &SummaryRow) {
    let _ = writeln!(
        out,
        "{} : {} agents | jours complets: {} (moy {}) | heures travaillées: {} (moy {}) | \
         heures sup: {} (moy {}) | présence moyenne: {}%",
        label,
        summary.employee_count,
        summary.full_days_total,
        summary.mean_full_days,
        summary.worked_hours_total,
        summary.mean_worked_hours,
        summary.overtime_hours_total,
        summary.mean_overtime_hours,
        summary.mean_presence_rate,
    );
}
