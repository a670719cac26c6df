//! Plain-text rendering of an analytics report.

use crate::analytics::AnalyticsReport;
use crate::breakdown::{Breakdown, Enumerated};
use chrono::NaiveDate;
use std::fmt::Write;

const TITLE: &str = "CIVIC ISSUE REPORTING SYSTEM - ANALYTICS REPORT";

/// File name for a report generated on `date`.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("civic-analytics-report-{}.txt", date.format("%Y-%m-%d"))
}

/// Renders `report` as sectioned plain text.
///
/// Percentages and day counts carry one decimal place.
pub fn export_report(report: &AnalyticsReport, generated: NaiveDate) -> String {
    let mut out = String::new();
    render(&mut out, report, generated).expect("writing to a String");
    out
}

fn render(out: &mut String, report: &AnalyticsReport, generated: NaiveDate) -> std::fmt::Result {
    writeln!(out, "{}", TITLE)?;
    writeln!(out, "Generated: {}", generated.format("%Y-%m-%d"))?;

    section(out, "OVERVIEW")?;
    writeln!(out, "Total Issues: {}", report.total_issues)?;
    writeln!(out, "Resolved Issues: {}", report.resolved_issues)?;
    writeln!(out, "Active Issues: {}", report.active_issues)?;
    writeln!(out, "High Priority Issues: {}", report.high_priority_issues)?;
    writeln!(out, "Average Resolution Time: {:.1} days", report.avg_resolution_time)?;

    section(out, "CATEGORY BREAKDOWN")?;
    counts(out, &report.category_breakdown)?;

    section(out, "STATUS BREAKDOWN")?;
    counts(out, &report.status_breakdown)?;

    section(out, "PRIORITY BREAKDOWN")?;
    counts(out, &report.priority_breakdown)?;

    section(out, "DEPARTMENT PERFORMANCE")?;
    for dept in &report.department_performance {
        writeln!(
            out,
            "{}: {:.1}% resolution rate ({}/{} resolved, avg {:.1} days)",
            dept.department,
            dept.resolution_rate,
            dept.resolved_issues,
            dept.total_issues,
            dept.avg_resolution_time
        )?;
    }

    if !report.monthly_trends.is_empty() {
        section(out, "MONTHLY TRENDS")?;
        for trend in &report.monthly_trends {
            writeln!(
                out,
                "{}: {} reported, {} resolved",
                trend.label, trend.reported, trend.resolved
            )?;
        }
    }

    let metrics = &report.response_time_metrics;
    section(out, "RESPONSE METRICS")?;
    writeln!(out, "Average First Response: {:.1} hours", metrics.avg_first_response)?;
    writeln!(out, "Average Resolution: {:.1} days", metrics.avg_resolution)?;
    writeln!(out, "SLA Compliance: {:.1}%", metrics.sla_compliance)?;
    Ok(())
}

fn section(out: &mut String, name: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", name)?;
    writeln!(out, "{}", "=".repeat(name.len()))
}

fn counts<K: Enumerated>(out: &mut String, breakdown: &Breakdown<K>) -> std::fmt::Result {
    for (key, count) in breakdown.iter() {
        writeln!(out, "{}: {}", key.key(), count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{generate_analytics, AnalyticsOptions};
    use crate::storage::seed;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 31).unwrap()
    }

    fn seeded_report() -> String {
        let report = generate_analytics(&seed::issues(), &seed::departments(), &AnalyticsOptions::as_of(date()));
        export_report(&report, date())
    }

    #[test]
    fn file_name_carries_the_date() {
        assert_eq!(report_file_name(date()), "civic-analytics-report-2025-07-31.txt");
    }

    #[test]
    fn report_contains_headline_fields() {
        let text = seeded_report();
        for line in [
            "Generated: 2025-07-31",
            "Total Issues: 3",
            "Resolved Issues: 1",
            "Active Issues: 2",
            "Average Resolution Time: 122.0 days",
            "pothole: 1",
            "graffiti: 0",
            "in-progress: 1",
            "urgent: 0",
            "Public Works: 0.0% resolution rate (0/2 resolved, avg 0.0 days)",
            "Sanitation: 100.0% resolution rate (1/1 resolved, avg 122.0 days)",
            "Transportation: 0.0% resolution rate (0/0 resolved, avg 0.0 days)",
            "Average First Response: 2.4 hours",
            "Average Resolution: 122.0 days",
            "SLA Compliance: 87.5%",
        ] {
            assert!(text.lines().any(|l| l == line), "missing line {line:?}\n{text}");
        }
    }

    #[test]
    fn sections_appear_in_order() {
        let text = seeded_report();
        let positions: Vec<usize> = [
            "OVERVIEW",
            "CATEGORY BREAKDOWN",
            "DEPARTMENT PERFORMANCE",
            "RESPONSE METRICS",
        ]
        .iter()
        .map(|name| text.find(&format!("\n{name}\n")).expect(name))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_report_renders_zeroes() {
        let report = generate_analytics(&[], &seed::departments(), &AnalyticsOptions::as_of(date()));
        let text = export_report(&report, date());
        assert!(text.contains("Total Issues: 0"));
        assert!(text.contains("Average Resolution Time: 0.0 days"));
        assert!(text.contains("Utilities: 0.0% resolution rate"));
        assert!(!text.contains("NaN"));
    }
}
