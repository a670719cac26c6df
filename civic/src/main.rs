use anyhow::{bail, Context, Result};
use chrono::Utc;
use civic::analytics::AnalyticsReport;
use civic::config::Settings;
use civic::display::{format_date, priority_badge, status_badge, time_ago};
use civic::export::{export_report, report_file_name};
use civic::filter::{Choice, IssueFilter, SortOrder};
use civic::live::{EventSource, LiveFeed, SimulatedFeed};
use civic::notifications::{NotificationCenter, SimulatedNotifications};
use civic::storage::Storage;
use civic::types::{Category, Issue, Location, NewIssue, Priority, Status};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::debug;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "civic")]
#[command(about = "Civic issue reporting - track citizen reports and department performance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Dataset JSON file (default: built-in demonstration data)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Settings file (default: ./civic.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dashboard analytics
    Stats,

    /// List issues
    List {
        /// Search title, description and address
        #[arg(short, long, default_value = "")]
        search: String,

        /// Filter by category (or "all")
        #[arg(short, long, default_value = "all")]
        category: Choice<Category>,

        /// Filter by status (or "all")
        #[arg(long, default_value = "all")]
        status: Choice<Status>,

        /// Filter by priority (or "all")
        #[arg(short, long, default_value = "all")]
        priority: Choice<Priority>,

        /// Sort order (newest|oldest|priority)
        #[arg(long, default_value = "newest")]
        sort: SortOrder,

        /// Limit number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show issue details
    Show {
        /// Issue ID
        id: String,
    },

    /// Report a new issue
    Submit {
        /// Issue title
        title: String,

        /// Issue description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Category (pothole|streetlight|trash|graffiti|sidewalk|traffic|water|other)
        #[arg(short, long)]
        category: Category,

        /// Priority (low|medium|high|urgent)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        /// Street address
        #[arg(short, long)]
        address: String,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        lng: f64,

        /// Reporting user ID
        #[arg(long, default_value = "1")]
        reporter: String,
    },

    /// Assign an issue to a staff member
    Assign {
        /// Issue ID
        id: String,

        /// Staff user ID
        staff: String,
    },

    /// Update an issue's status
    #[command(name = "status")]
    SetStatus {
        /// Issue ID
        id: String,

        /// New status (reported|in-progress|resolved|closed)
        status: Status,
    },

    /// List departments and their performance
    Departments,

    /// Write the analytics report to a text file
    Export {
        /// Output file path (default: civic-analytics-report-<date>.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Follow simulated live activity and notifications
    Watch {
        /// Stop after this many updates
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Seed for the simulated activity
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(data) = cli.data {
        settings.data_path = Some(data);
    }
    let storage = settings.storage().open().context("Failed to open issue store")?;
    debug!("using {}", storage.describe());

    let today = Utc::now().date_naive();
    let options = settings.analytics_options(today);

    match cli.command {
        Some(Commands::Stats) => {
            let report = storage.get_statistics(&options)?;
            if cli.json {
                return print_json(&report);
            }
            print_stats(&report);
            Ok(())
        }
        Some(Commands::List { search, category, status, priority, sort, limit }) => {
            let filter = IssueFilter { search, category, status, priority };
            let total = storage.list_issues()?.len();
            let mut issues = storage.search_issues(&filter)?;
            sort.sort(&mut issues);
            if let Some(limit) = limit {
                issues.truncate(limit);
            }
            if cli.json {
                return print_json(&issues);
            }
            println!("Showing {} of {} issues", issues.len(), total);
            for issue in &issues {
                print_issue_line(issue);
            }
            if issues.is_empty() {
                println!("No issues found. Try adjusting your search terms or filters.");
            }
            Ok(())
        }
        Some(Commands::Show { id }) => {
            let Some(issue) = storage.get_issue(&id)? else {
                bail!("Issue not found: {}", id);
            };
            if cli.json {
                return print_json(&issue);
            }
            print_issue_details(&issue);
            Ok(())
        }
        Some(Commands::Submit { title, description, category, priority, address, lat, lng, reporter }) => {
            let new_issue = NewIssue {
                title,
                description,
                category,
                priority,
                location: Location { lat, lng, address },
                image_url: None,
            };
            let issue = storage.create_issue(new_issue, &reporter)?;
            if cli.json {
                return print_json(&issue);
            }
            println!("{} {}", "Reported issue".green(), issue.id.bold());
            print_issue_details(&issue);
            let report = storage.get_statistics(&options)?;
            println!(
                "\nNow tracking {} issues ({} active)",
                report.total_issues, report.active_issues
            );
            Ok(())
        }
        Some(Commands::Assign { id, staff }) => {
            let issue = storage.assign_issue(&id, &staff)?;
            if cli.json {
                return print_json(&issue);
            }
            let name = issue.assigned_to.as_ref().map(|a| a.name.as_str()).unwrap_or_default();
            println!("Assigned issue {} to {}", issue.id.bold(), name);
            Ok(())
        }
        Some(Commands::SetStatus { id, status }) => {
            let issue = storage.update_status(&id, status)?;
            if cli.json {
                return print_json(&issue);
            }
            println!("Issue {} is now {}", issue.id.bold(), status_badge(issue.status));
            Ok(())
        }
        Some(Commands::Departments) => {
            let report = storage.get_statistics(&options)?;
            if cli.json {
                return print_json(&report.department_performance);
            }
            let departments = storage.get_departments()?;
            for (dept, perf) in departments.iter().zip(&report.department_performance) {
                let categories: Vec<&str> = dept.categories.iter().map(|c| c.label()).collect();
                println!("{}", dept.name.bold());
                println!("  Categories: {}", categories.join(", "));
                println!(
                    "  Issues: {} total, {} active, {} resolved ({:.1}%)",
                    perf.total_issues, perf.active_issues, perf.resolved_issues, perf.resolution_rate
                );
                println!("  Avg resolution: {:.1} days", perf.avg_resolution_time);
            }
            Ok(())
        }
        Some(Commands::Export { output }) => {
            let report = storage.get_statistics(&options)?;
            let path = output.unwrap_or_else(|| PathBuf::from(report_file_name(today)));
            std::fs::write(&path, export_report(&report, today))
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            println!("Exported analytics report to {}", path.display());
            Ok(())
        }
        Some(Commands::Watch { count, seed }) => {
            let issues = storage.list_issues()?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(watch(issues, &settings, count, seed, cli.json))
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_stats(report: &AnalyticsReport) {
    println!("{}", "Overview".bold());
    println!("  Total issues:      {}", report.total_issues);
    println!("  Active issues:     {}", report.active_issues);
    println!("  Resolved issues:   {}", report.resolved_issues);
    println!("  High priority:     {}", report.high_priority_issues);
    println!("  Avg resolution:    {:.1} days", report.avg_resolution_time);

    println!("{}", "By category".bold());
    for (category, count) in report.category_breakdown.iter() {
        println!("  {:<18} {}", category.label(), count);
    }
    println!("{}", "By status".bold());
    for (status, count) in report.status_breakdown.iter() {
        println!("  {:<18} {}", status.label(), count);
    }
    println!("{}", "By priority".bold());
    for (priority, count) in report.priority_breakdown.iter() {
        println!("  {:<18} {}", priority.label(), count);
    }

    println!("{}", "Monthly trends".bold());
    for trend in &report.monthly_trends {
        println!("  {:<10} reported {:>3}  resolved {:>3}", trend.label, trend.reported, trend.resolved);
    }

    println!("{}", "Departments".bold());
    for dept in &report.department_performance {
        println!(
            "  {:<18} {:>5.1}% resolved ({}/{})",
            dept.department, dept.resolution_rate, dept.resolved_issues, dept.total_issues
        );
    }

    let metrics = &report.response_time_metrics;
    println!("{}", "Response".bold());
    println!("  First response:    {:.1} hours", metrics.avg_first_response);
    println!("  Resolution:        {:.1} days", metrics.avg_resolution);
    println!("  SLA compliance:    {:.1}%", metrics.sla_compliance);
}

fn print_issue_line(issue: &Issue) {
    println!(
        "{:<16} [{}] [{}] {} - {} ({})",
        issue.id,
        status_badge(issue.status),
        priority_badge(issue.priority),
        issue.title.bold(),
        issue.location.address,
        time_ago(issue.created_at, Utc::now())
    );
}

fn print_issue_details(issue: &Issue) {
    println!("{}", issue.title.bold());
    println!("  ID:          {}", issue.id);
    println!("  Category:    {}", issue.category.label());
    println!("  Status:      {}", status_badge(issue.status));
    println!("  Priority:    {}", priority_badge(issue.priority));
    println!(
        "  Location:    {} ({:.4}, {:.4})",
        issue.location.address, issue.location.lat, issue.location.lng
    );
    println!("  Reported by: {}", issue.reported_by.name);
    if let Some(assignee) = &issue.assigned_to {
        println!("  Assigned to: {} ({})", assignee.name, assignee.department);
    }
    println!("  Created:     {}", format_date(issue.created_at));
    println!("  Updated:     {}", format_date(issue.updated_at));
    if let Some(resolved_at) = issue.resolved_at {
        println!("  Resolved:    {}", format_date(resolved_at));
    }
    if !issue.description.is_empty() {
        println!("\n{}", issue.description);
    }
}

async fn watch(issues: Vec<Issue>, settings: &Settings, count: usize, seed: u64, json: bool) -> Result<()> {
    let mut updates = SimulatedFeed::new(issues, settings.feed_interval(), seed);
    let mut alerts = SimulatedNotifications::new(
        settings.notification_interval(),
        settings.notifications.probability,
        seed.wrapping_add(1),
    );
    let mut feed = LiveFeed::new(settings.feed.capacity);
    let mut center = NotificationCenter::new(settings.notifications.capacity);
    let mut alerts_live = true;

    if !json {
        println!("{} (Ctrl-C to stop)", "Watching live activity".bold());
    }

    while feed.stats().updates_seen < count {
        tokio::select! {
            update = updates.next_event() => match update {
                Some(update) => {
                    if json {
                        println!("{}", serde_json::to_string(&update)?);
                    } else {
                        println!("{} {:<14} {} (issue {})", "*".green(), update.kind.as_str(), update.message, update.issue_id);
                    }
                    feed.record(update);
                }
                None => break,
            },
            alert = alerts.next_event(), if alerts_live => match alert {
                Some(alert) => {
                    if json {
                        println!("{}", serde_json::to_string(&alert)?);
                    } else {
                        println!("{} {}: {}", "!".yellow(), alert.title.bold(), alert.message);
                    }
                    center.push(alert);
                }
                None => alerts_live = false,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if !json {
        let stats = feed.stats();
        println!(
            "\n{} updates, {} new reports, {} unread notifications",
            stats.updates_seen,
            stats.reports_today,
            center.badge().unwrap_or_else(|| "0".to_string())
        );
    }
    Ok(())
}
