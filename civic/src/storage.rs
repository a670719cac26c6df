//! Issue store interface and implementations

pub mod memory;
pub mod seed;

use crate::analytics::{generate_analytics, AnalyticsOptions, AnalyticsReport};
use crate::error::{Error, Result};
use crate::filter::IssueFilter;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use memory::MemoryStorage;

/// Storage trait defines the read path the views use and the
/// administrative mutations applied to issues
pub trait Storage: Send + Sync {
    // Issues
    fn create_issue(&self, new_issue: NewIssue, reporter_id: &str) -> Result<Issue>;
    fn get_issue(&self, id: &str) -> Result<Option<Issue>>;
    fn list_issues(&self) -> Result<Vec<Issue>>;
    fn update_status(&self, id: &str, status: Status) -> Result<Issue>;
    fn assign_issue(&self, id: &str, staff_id: &str) -> Result<Issue>;

    fn search_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        Ok(filter.apply(&self.list_issues()?))
    }

    // Directory
    fn get_departments(&self) -> Result<Vec<Department>>;
    fn get_users(&self) -> Result<Vec<User>>;

    fn get_staff(&self) -> Result<Vec<User>> {
        Ok(self
            .get_users()?
            .into_iter()
            .filter(|user| user.role == Role::Staff)
            .collect())
    }

    // Statistics
    fn get_statistics(&self, options: &AnalyticsOptions) -> Result<AnalyticsReport> {
        let issues = self.list_issues()?;
        let departments = self.get_departments()?;
        Ok(generate_analytics(&issues, &departments, options))
    }

    /// Human-readable description of where the data comes from
    fn describe(&self) -> String;
}

/// Dataset is the on-disk shape of a full issue collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Dataset {
    /// The built-in demonstration data
    pub fn seeded() -> Self {
        Dataset {
            users: seed::users(),
            departments: seed::departments(),
            issues: seed::issues(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks every issue and rejects duplicate issue ids.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for issue in &self.issues {
            issue.validate().map_err(|reason| Error::InvalidIssue {
                id: issue.id.clone(),
                reason,
            })?;
            if !seen.insert(issue.id.as_str()) {
                return Err(Error::InvalidIssue {
                    id: issue.id.clone(),
                    reason: "duplicate id".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Categories claimed by more than one department.
    pub fn overlapping_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|&category| {
                self.departments
                    .iter()
                    .filter(|dept| dept.owns(category))
                    .count()
                    > 1
            })
            .collect()
    }
}

/// StorageConfig selects the backend and its data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: String,
    pub data_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn memory(data_path: Option<PathBuf>) -> Self {
        StorageConfig {
            backend: "memory".to_string(),
            data_path,
        }
    }

    pub fn open(&self) -> Result<Box<dyn Storage>> {
        let storage = match &self.data_path {
            Some(path) => MemoryStorage::from_dataset_file(path)?,
            None => MemoryStorage::seeded(),
        };
        Ok(Box::new(storage))
    }
}
