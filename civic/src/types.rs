//! Core data structures for civic issue reporting.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Longest accepted title, counted in characters.
pub const MAX_TITLE_CHARS: usize = 500;

/// Issue is a single citizen-reported civic problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    pub reported_by: Reporter,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assigned_to: Option<Assignee>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Validates field values and timestamp ordering.
    ///
    /// A resolved issue without `resolved_at` is tolerated; it simply does
    /// not contribute to resolution-time averages.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id is required".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        let title_len = self.title.chars().count();
        if title_len > MAX_TITLE_CHARS {
            return Err(format!(
                "title must be {} characters or less (got {})",
                MAX_TITLE_CHARS, title_len
            ));
        }
        if !(-90.0..=90.0).contains(&self.location.lat) {
            return Err(format!("latitude out of range: {}", self.location.lat));
        }
        if !(-180.0..=180.0).contains(&self.location.lng) {
            return Err(format!("longitude out of range: {}", self.location.lng));
        }
        if self.updated_at < self.created_at {
            return Err("updated_at precedes created_at".to_string());
        }
        if let Some(resolved_at) = self.resolved_at {
            if resolved_at < self.created_at {
                return Err("resolved_at precedes created_at".to_string());
            }
        }
        Ok(())
    }

    /// Active means neither resolved nor closed.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, Status::Resolved | Status::Closed)
    }

    pub fn is_resolved(&self) -> bool {
        self.status == Status::Resolved
    }

    pub fn is_high_priority(&self) -> bool {
        matches!(self.priority, Priority::High | Priority::Urgent)
    }

    /// Whole days between creation and resolution, floored.
    pub fn resolution_days(&self) -> Option<i64> {
        self.resolved_at.map(|resolved_at| {
            (resolved_at - self.created_at)
                .num_seconds()
                .div_euclid(SECONDS_PER_DAY)
        })
    }
}

/// Location of a reported issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// Reporter identifies the citizen who submitted an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for Reporter {
    fn from(user: &User) -> Self {
        Reporter {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Assignee is the staff member responsible for an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
}

/// Category classifies the kind of civic problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pothole,
    Streetlight,
    Trash,
    Graffiti,
    Sidewalk,
    Traffic,
    Water,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Pothole,
        Category::Streetlight,
        Category::Trash,
        Category::Graffiti,
        Category::Sidewalk,
        Category::Traffic,
        Category::Water,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pothole => "pothole",
            Category::Streetlight => "streetlight",
            Category::Trash => "trash",
            Category::Graffiti => "graffiti",
            Category::Sidewalk => "sidewalk",
            Category::Traffic => "traffic",
            Category::Water => "water",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Pothole => "Pothole",
            Category::Streetlight => "Street Light",
            Category::Trash => "Trash/Sanitation",
            Category::Graffiti => "Graffiti",
            Category::Sidewalk => "Sidewalk",
            Category::Traffic => "Traffic Signal",
            Category::Water => "Water/Utilities",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Priority ranks urgency, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| Error::UnknownPriority(s.to_string()))
    }
}

/// Status represents where an issue is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Reported,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Reported, Status::InProgress, Status::Resolved, Status::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Reported => "reported",
            Status::InProgress => "in-progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Reported => "Reported",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| Error::UnknownStatus(s.to_string()))
    }
}

/// Role of a user in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User is a citizen, administrator or department staff member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub department: Option<String>,
}

/// Department owns a disjoint set of issue categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub categories: Vec<Category>,
}

impl Department {
    pub fn owns(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// NewIssue is a citizen submission before the store assigns identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issue_at(created: DateTime<Utc>, resolved: Option<DateTime<Utc>>) -> Issue {
        Issue {
            id: "1".to_string(),
            title: "Pothole".to_string(),
            description: String::new(),
            category: Category::Pothole,
            priority: Priority::High,
            status: if resolved.is_some() { Status::Resolved } else { Status::Reported },
            location: Location { lat: 0.0, lng: 0.0, address: "Main St".to_string() },
            image_url: None,
            reported_by: Reporter {
                id: "u1".to_string(),
                name: "A".to_string(),
                email: "a@example.com".to_string(),
            },
            assigned_to: None,
            created_at: created,
            updated_at: created,
            resolved_at: resolved,
        }
    }

    #[test]
    fn status_wire_names_are_kebab_case() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"in-progress\"");
        let parsed: Status = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, Status::InProgress);
    }

    #[test]
    fn from_str_accepts_wire_names_and_rejects_unknown() {
        assert_eq!("Streetlight".parse::<Category>().unwrap(), Category::Streetlight);
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!(" urgent ".parse::<Priority>().unwrap(), Priority::Urgent);
        assert!(matches!("lamp".parse::<Category>(), Err(Error::UnknownCategory(_))));
        assert!(matches!("open".parse::<Status>(), Err(Error::UnknownStatus(_))));
    }

    #[test]
    fn resolution_days_floors_partial_days() {
        let created = Utc.with_ymd_and_hms(2025, 3, 13, 16, 45, 0).unwrap();
        let resolved = Utc.with_ymd_and_hms(2025, 3, 16, 16, 44, 59).unwrap();
        assert_eq!(issue_at(created, Some(resolved)).resolution_days(), Some(2));
        assert_eq!(issue_at(created, None).resolution_days(), None);
    }

    #[test]
    fn validate_rejects_resolution_before_creation() {
        let created = Utc.with_ymd_and_hms(2025, 3, 13, 0, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap();
        assert!(issue_at(created, Some(created)).validate().is_ok());
        assert_eq!(
            issue_at(created, Some(earlier)).validate().unwrap_err(),
            "resolved_at precedes created_at"
        );
    }

    #[test]
    fn title_limit_counts_characters() {
        let created = Utc.with_ymd_and_hms(2025, 3, 13, 0, 0, 0).unwrap();
        let mut issue = issue_at(created, None);

        // five chars, fifteen bytes in UTF-8
        issue.title = "गड्ढा".repeat(100);
        assert_eq!(issue.title.chars().count(), 500);
        assert!(issue.validate().is_ok());

        issue.title.push('क');
        assert_eq!(
            issue.validate().unwrap_err(),
            "title must be 500 characters or less (got 501)"
        );
    }

    #[test]
    fn active_excludes_resolved_and_closed() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut issue = issue_at(created, None);
        for (status, active) in [
            (Status::Reported, true),
            (Status::InProgress, true),
            (Status::Resolved, false),
            (Status::Closed, false),
        ] {
            issue.status = status;
            assert_eq!(issue.is_active(), active, "{status}");
        }
    }
}
