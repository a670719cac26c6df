//! Issue filtering and ordering shared by every list view.

use crate::error::Error;
use crate::types::{Category, Issue, Priority, Status};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Choice is either "all" or one specific value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq + Copy> Choice<T> {
    pub fn matches(&self, value: T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => *wanted == value,
        }
    }
}

impl<T: FromStr<Err = Error>> FromStr for Choice<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => write!(f, "all"),
            Choice::Only(value) => write!(f, "{}", value),
        }
    }
}

/// IssueFilter is the conjunction of a text search and three enum choices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    /// Case-insensitive substring of title, description or address.
    pub search: String,
    pub category: Choice<Category>,
    pub status: Choice<Status>,
    pub priority: Choice<Priority>,
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        self.matches_search(issue)
            && self.category.matches(issue.category)
            && self.status.matches(issue.status)
            && self.priority.matches(issue.priority)
    }

    fn matches_search(&self, issue: &Issue) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [&issue.title, &issue.description, &issue.location.address]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Matching issues in input order.
    pub fn apply(&self, issues: &[Issue]) -> Vec<Issue> {
        issues.iter().filter(|issue| self.matches(issue)).cloned().collect()
    }
}

/// SortOrder determines how issue lists are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Most recently created first
    #[default]
    Newest,
    /// Oldest first
    Oldest,
    /// Most urgent first, newest within a priority
    Priority,
}

impl SortOrder {
    pub fn sort(&self, issues: &mut [Issue]) {
        match self {
            SortOrder::Newest => issues.sort_by_key(|issue| Reverse(issue.created_at)),
            SortOrder::Oldest => issues.sort_by_key(|issue| issue.created_at),
            SortOrder::Priority => {
                issues.sort_by_key(|issue| (Reverse(issue.priority), Reverse(issue.created_at)))
            }
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "priority" => Ok(SortOrder::Priority),
            _ => Err(Error::UnknownSortOrder(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed;

    fn pothole_on_main() -> Issue {
        let mut issue = seed::issues().remove(0);
        issue.title = "Pothole on Main St".to_string();
        issue.category = Category::Pothole;
        issue.status = Status::Reported;
        issue
    }

    #[test]
    fn filter_is_a_conjunction() {
        let issue = pothole_on_main();
        let matching = IssueFilter {
            search: "main".to_string(),
            category: Choice::Only(Category::Pothole),
            ..Default::default()
        };
        assert!(matching.matches(&issue));

        let wrong_category = IssueFilter {
            category: Choice::Only(Category::Trash),
            ..matching.clone()
        };
        assert!(!wrong_category.matches(&issue));

        let wrong_status = IssueFilter {
            status: Choice::Only(Status::Closed),
            ..matching
        };
        assert!(!wrong_status.matches(&issue));
    }

    #[test]
    fn search_covers_description_and_address_case_insensitively() {
        let issue = pothole_on_main();
        for term in ["VEHICLES", "ghaziabad", ""] {
            let filter = IssueFilter { search: term.to_string(), ..Default::default() };
            assert!(filter.matches(&issue), "{term:?}");
        }
        let filter = IssueFilter { search: "sahibabad".to_string(), ..Default::default() };
        assert!(!filter.matches(&issue));
    }

    #[test]
    fn choice_parses_all_and_values() {
        assert_eq!("ALL".parse::<Choice<Status>>().unwrap(), Choice::All);
        assert_eq!(
            "in-progress".parse::<Choice<Status>>().unwrap(),
            Choice::Only(Status::InProgress)
        );
        assert!("nope".parse::<Choice<Priority>>().is_err());
    }

    #[test]
    fn apply_preserves_input_order() {
        let issues = seed::issues();
        let filter = IssueFilter { priority: Choice::Only(Priority::Medium), ..Default::default() };
        let ids: Vec<String> = filter.apply(&issues).into_iter().map(|i| i.id).collect();
        assert_eq!(ids, ["2", "3"]);
    }

    #[test]
    fn sort_orders() {
        let mut issues = seed::issues();
        SortOrder::Newest.sort(&mut issues);
        let ids: Vec<&str> = issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["2", "3", "1"]);

        SortOrder::Priority.sort(&mut issues);
        let ids: Vec<&str> = issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);

        SortOrder::Oldest.sort(&mut issues);
        assert_eq!(issues[0].id, "1");
    }
}
