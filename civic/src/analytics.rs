//! Analytics engine: derives dashboard metrics from a set of issues.
//!
//! Every call recomputes from scratch. Nothing here fails: empty inputs
//! produce a fully populated report with zeroed counts and rates.

use crate::breakdown::{Breakdown, Enumerated};
use crate::types::{Category, Department, Issue, Priority, Status};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TREND_MONTHS: u32 = 6;
/// Widest trend window; larger requests are clamped to it.
pub const MAX_TREND_MONTHS: u32 = 120;

/// ResponsePolicy holds the policy-level response figures.
///
/// These are not derived from issue data; callers supply them from
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponsePolicy {
    /// Hours until an issue first receives a response.
    pub avg_first_response_hours: f64,
    /// Percentage of issues meeting the response-time target.
    pub sla_compliance: f64,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        ResponsePolicy {
            avg_first_response_hours: 2.4,
            sla_compliance: 87.5,
        }
    }
}

/// TrendWindow selects the calendar months covered by monthly trends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindow {
    /// Number of months, ending with (and including) the month of `as_of`.
    pub months: u32,
    pub as_of: NaiveDate,
}

/// AnalyticsOptions bundles the non-data inputs of the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsOptions {
    pub policy: ResponsePolicy,
    pub trends: TrendWindow,
}

impl AnalyticsOptions {
    /// Default policy and a six month trend window ending at `as_of`.
    pub fn as_of(as_of: NaiveDate) -> Self {
        AnalyticsOptions {
            policy: ResponsePolicy::default(),
            trends: TrendWindow {
                months: DEFAULT_TREND_MONTHS,
                as_of,
            },
        }
    }

    pub fn with_policy(mut self, policy: ResponsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_trend_months(mut self, months: u32) -> Self {
        self.trends.months = months;
        self
    }
}

/// AnalyticsReport is the engine's sole output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub total_issues: usize,
    pub resolved_issues: usize,
    /// Issues neither resolved nor closed. Closed issues count toward
    /// neither this nor `resolved_issues`.
    pub active_issues: usize,
    pub high_priority_issues: usize,
    /// Mean whole days from creation to resolution, over issues with a
    /// resolution timestamp.
    pub avg_resolution_time: f64,
    pub category_breakdown: Breakdown<Category>,
    pub status_breakdown: Breakdown<Status>,
    pub priority_breakdown: Breakdown<Priority>,
    pub monthly_trends: Vec<MonthlyTrend>,
    pub department_performance: Vec<DepartmentPerformance>,
    pub response_time_metrics: ResponseTimeMetrics,
}

/// MonthlyTrend counts issues reported and resolved in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub reported: usize,
    pub resolved: usize,
}

/// DepartmentPerformance summarizes issues in the categories a department owns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentPerformance {
    pub department_id: String,
    pub department: String,
    pub total_issues: usize,
    pub resolved_issues: usize,
    pub active_issues: usize,
    pub avg_resolution_time: f64,
    /// Percentage in `0..=100`.
    pub resolution_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseTimeMetrics {
    /// Hours.
    pub avg_first_response: f64,
    /// Days.
    pub avg_resolution: f64,
    /// Percentage.
    pub sla_compliance: f64,
}

/// Running totals for one category, merged per department afterwards.
#[derive(Debug, Clone, Copy, Default)]
struct CategoryStats {
    total: usize,
    resolved: usize,
    active: usize,
    resolution_days: i64,
    resolution_samples: usize,
}

impl CategoryStats {
    fn merge(&mut self, other: &CategoryStats) {
        self.total += other.total;
        self.resolved += other.resolved;
        self.active += other.active;
        self.resolution_days += other.resolution_days;
        self.resolution_samples += other.resolution_samples;
    }
}

/// Computes the analytics report for `issues`.
///
/// Runs in one pass over the issues plus one pass over the departments'
/// category lists.
pub fn generate_analytics(
    issues: &[Issue],
    departments: &[Department],
    options: &AnalyticsOptions,
) -> AnalyticsReport {
    let mut category_breakdown = Breakdown::<Category>::new();
    let mut status_breakdown = Breakdown::<Status>::new();
    let mut priority_breakdown = Breakdown::<Priority>::new();
    let mut per_category = [CategoryStats::default(); Category::ALL.len()];
    let mut trends = TrendBuckets::new(&options.trends);

    let mut resolved_issues = 0;
    let mut active_issues = 0;
    let mut high_priority_issues = 0;
    let mut resolution_days = 0i64;
    let mut resolution_samples = 0usize;

    for issue in issues {
        category_breakdown.record(issue.category);
        status_breakdown.record(issue.status);
        priority_breakdown.record(issue.priority);

        let stats = &mut per_category[issue.category.index()];
        stats.total += 1;

        if issue.is_resolved() {
            resolved_issues += 1;
            stats.resolved += 1;
        }
        if issue.is_active() {
            active_issues += 1;
            stats.active += 1;
        }
        if issue.is_high_priority() {
            high_priority_issues += 1;
        }
        if let Some(days) = issue.resolution_days() {
            resolution_days += days;
            resolution_samples += 1;
            stats.resolution_days += days;
            stats.resolution_samples += 1;
        }

        trends.record_reported(issue.created_at);
        if let Some(resolved_at) = issue.resolved_at {
            trends.record_resolved(resolved_at);
        }
    }

    let avg_resolution_time = mean(resolution_days, resolution_samples);

    let department_performance: Vec<DepartmentPerformance> = departments
        .iter()
        .map(|dept| department_performance(dept, &per_category))
        .collect();

    let report = AnalyticsReport {
        total_issues: issues.len(),
        resolved_issues,
        active_issues,
        high_priority_issues,
        avg_resolution_time,
        category_breakdown,
        status_breakdown,
        priority_breakdown,
        monthly_trends: trends.finish(),
        department_performance,
        response_time_metrics: ResponseTimeMetrics {
            avg_first_response: options.policy.avg_first_response_hours,
            avg_resolution: avg_resolution_time,
            sla_compliance: options.policy.sla_compliance,
        },
    };

    debug!(
        "analytics: total={} resolved={} active={} avg_resolution={:.1}d departments={}",
        report.total_issues,
        report.resolved_issues,
        report.active_issues,
        report.avg_resolution_time,
        report.department_performance.len()
    );

    report
}

fn department_performance(dept: &Department, per_category: &[CategoryStats]) -> DepartmentPerformance {
    let mut seen = [false; Category::ALL.len()];
    let mut stats = CategoryStats::default();
    for category in &dept.categories {
        let idx = category.index();
        if !seen[idx] {
            seen[idx] = true;
            stats.merge(&per_category[idx]);
        }
    }

    DepartmentPerformance {
        department_id: dept.id.clone(),
        department: dept.name.clone(),
        total_issues: stats.total,
        resolved_issues: stats.resolved,
        active_issues: stats.active,
        avg_resolution_time: mean(stats.resolution_days, stats.resolution_samples),
        resolution_rate: percentage(stats.resolved, stats.total),
    }
}

fn mean(sum: i64, samples: usize) -> f64 {
    if samples == 0 {
        0.0
    } else {
        sum as f64 / samples as f64
    }
}

/// `part / whole * 100`, or zero for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Month buckets addressed by `year * 12 + month0`.
struct TrendBuckets {
    first: i64,
    reported: Vec<usize>,
    resolved: Vec<usize>,
}

impl TrendBuckets {
    fn new(window: &TrendWindow) -> Self {
        let len = window.months.min(MAX_TREND_MONTHS) as usize;
        let last = month_ordinal(window.as_of.year(), window.as_of.month0());
        TrendBuckets {
            first: last - len as i64 + 1,
            reported: vec![0; len],
            resolved: vec![0; len],
        }
    }

    fn slot(&self, at: DateTime<Utc>) -> Option<usize> {
        let offset = month_ordinal(at.year(), at.month0()) - self.first;
        if offset >= 0 && (offset as usize) < self.reported.len() {
            Some(offset as usize)
        } else {
            None
        }
    }

    fn record_reported(&mut self, at: DateTime<Utc>) {
        if let Some(slot) = self.slot(at) {
            self.reported[slot] += 1;
        }
    }

    fn record_resolved(&mut self, at: DateTime<Utc>) {
        if let Some(slot) = self.slot(at) {
            self.resolved[slot] += 1;
        }
    }

    fn finish(self) -> Vec<MonthlyTrend> {
        (0..self.reported.len())
            .map(|slot| {
                let ordinal = self.first + slot as i64;
                let year = ordinal.div_euclid(12) as i32;
                let month = ordinal.rem_euclid(12) as u32 + 1;
                let label = match NaiveDate::from_ymd_opt(year, month, 1) {
                    Some(first_day) => first_day.format("%b %Y").to_string(),
                    None => format!("{:04}-{:02}", year, month),
                };
                MonthlyTrend {
                    label,
                    year,
                    month,
                    reported: self.reported[slot],
                    resolved: self.resolved[slot],
                }
            })
            .collect()
    }
}

fn month_ordinal(year: i32, month0: u32) -> i64 {
    year as i64 * 12 + month0 as i64
}
