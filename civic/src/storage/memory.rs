//! In-memory storage implementation

use crate::error::{Error, Result};
use crate::storage::{Dataset, Storage};
use crate::types::*;
use chrono::{DateTime, Utc};
use log::{info, warn};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const ID_PREFIX: &str = "civic";

struct State {
    dataset: Dataset,
    next_seq: u64,
}

/// In-memory storage over a [`Dataset`]; nothing is written back
pub struct MemoryStorage {
    state: Mutex<State>,
    source: Option<PathBuf>,
}

impl MemoryStorage {
    pub fn new(dataset: Dataset) -> Self {
        for category in dataset.overlapping_categories() {
            warn!("category {} is owned by more than one department", category);
        }
        MemoryStorage {
            state: Mutex::new(State { dataset, next_seq: 0 }),
            source: None,
        }
    }

    /// Storage preloaded with the demonstration dataset
    pub fn seeded() -> Self {
        Self::new(Dataset::seeded())
    }

    /// Load a JSON dataset; every issue is validated
    pub fn from_dataset_file(path: &Path) -> Result<Self> {
        let dataset = Dataset::from_file(path)?;
        info!(
            "loaded {} issues, {} departments, {} users from {}",
            dataset.issues.len(),
            dataset.departments.len(),
            dataset.users.len(),
            path.display()
        );
        let mut storage = Self::new(dataset);
        storage.source = Some(path.to_path_buf());
        Ok(storage)
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| Error::StorePoisoned)
    }
}

impl State {
    fn issue_mut(&mut self, id: &str) -> Result<&mut Issue> {
        self.dataset
            .issues
            .iter_mut()
            .find(|issue| issue.id == id)
            .ok_or_else(|| Error::IssueNotFound(id.to_string()))
    }

    fn user(&self, id: &str) -> Result<&User> {
        self.dataset
            .users
            .iter()
            .find(|user| user.id == id)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }

    /// Derive a short id from the submission content, skipping ids in use.
    fn generate_id(&mut self, title: &str, created_at: DateTime<Utc>) -> String {
        loop {
            self.next_seq += 1;
            let mut hasher = Sha256::new();
            hasher.update(title.as_bytes());
            hasher.update([0u8]);
            hasher.update(created_at.to_rfc3339().as_bytes());
            hasher.update([0u8]);
            hasher.update(self.next_seq.to_be_bytes());
            let digest = hasher.finalize();
            let id = format!("{}-{}", ID_PREFIX, hex::encode(&digest[..4]));
            if !self.dataset.issues.iter().any(|issue| issue.id == id) {
                return id;
            }
        }
    }
}

impl Storage for MemoryStorage {
    fn create_issue(&self, new_issue: NewIssue, reporter_id: &str) -> Result<Issue> {
        let mut state = self.state()?;
        let reporter = Reporter::from(state.user(reporter_id)?);

        let now = Utc::now();
        let id = state.generate_id(&new_issue.title, now);
        let issue = Issue {
            id,
            title: new_issue.title,
            description: new_issue.description,
            category: new_issue.category,
            priority: new_issue.priority,
            status: Status::Reported,
            location: new_issue.location,
            image_url: new_issue.image_url,
            reported_by: reporter,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };
        issue.validate().map_err(|reason| Error::InvalidIssue {
            id: issue.id.clone(),
            reason,
        })?;

        info!("created issue {} ({}) reported by {}", issue.id, issue.category, reporter_id);
        state.dataset.issues.push(issue.clone());
        Ok(issue)
    }

    fn get_issue(&self, id: &str) -> Result<Option<Issue>> {
        let state = self.state()?;
        Ok(state.dataset.issues.iter().find(|issue| issue.id == id).cloned())
    }

    fn list_issues(&self) -> Result<Vec<Issue>> {
        Ok(self.state()?.dataset.issues.clone())
    }

    fn update_status(&self, id: &str, status: Status) -> Result<Issue> {
        let mut state = self.state()?;
        let issue = state.issue_mut(id)?;
        let previous = issue.status;
        let now = Utc::now();

        issue.status = status;
        issue.updated_at = now;
        match status {
            Status::Resolved => {
                issue.resolved_at.get_or_insert(now);
            }
            // closing keeps any resolution timestamp
            Status::Closed => {}
            Status::Reported | Status::InProgress => issue.resolved_at = None,
        }

        info!("issue {} status {} -> {}", id, previous, status);
        Ok(issue.clone())
    }

    fn assign_issue(&self, id: &str, staff_id: &str) -> Result<Issue> {
        let mut state = self.state()?;
        let staff = state.user(staff_id)?;
        if staff.role != Role::Staff {
            return Err(Error::NotStaff(staff_id.to_string()));
        }
        let assignee = Assignee {
            id: staff.id.clone(),
            name: staff.name.clone(),
            department: staff.department.clone().unwrap_or_default(),
        };

        let issue = state.issue_mut(id)?;
        issue.assigned_to = Some(assignee);
        issue.updated_at = Utc::now();

        info!("issue {} assigned to {}", id, staff_id);
        Ok(issue.clone())
    }

    fn get_departments(&self) -> Result<Vec<Department>> {
        Ok(self.state()?.dataset.departments.clone())
    }

    fn get_users(&self) -> Result<Vec<User>> {
        Ok(self.state()?.dataset.users.clone())
    }

    fn describe(&self) -> String {
        match &self.source {
            Some(path) => format!("memory ({})", path.display()),
            None => "memory (built-in dataset)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsOptions;
    use crate::filter::{Choice, IssueFilter};
    use crate::storage::seed;
    use chrono::NaiveDate;
    use std::io::Write;

    fn new_issue(title: &str) -> NewIssue {
        NewIssue {
            title: title.to_string(),
            description: "Graffiti on the underpass wall".to_string(),
            category: Category::Graffiti,
            priority: Priority::Low,
            location: Location {
                lat: 28.67,
                lng: 77.45,
                address: "Raj Nagar Extension, Ghaziabad".to_string(),
            },
            image_url: None,
        }
    }

    #[test]
    fn create_issue_assigns_identity_and_reported_status() {
        let storage = MemoryStorage::seeded();
        let before = Utc::now();
        let issue = storage.create_issue(new_issue("Tagged underpass"), "1").unwrap();

        assert!(issue.id.starts_with("civic-"));
        assert_eq!(issue.id.len(), "civic-".len() + 8);
        assert_eq!(issue.status, Status::Reported);
        assert_eq!(issue.reported_by.name, "Aarnav Jaiswal");
        assert!(issue.created_at >= before);
        assert_eq!(issue.created_at, issue.updated_at);
        assert!(issue.resolved_at.is_none());
        assert_eq!(storage.list_issues().unwrap().len(), 4);
    }

    #[test]
    fn identical_submissions_get_distinct_ids() {
        let storage = MemoryStorage::seeded();
        let a = storage.create_issue(new_issue("Same"), "1").unwrap();
        let b = storage.create_issue(new_issue("Same"), "1").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn create_issue_rejects_unknown_reporter_and_blank_title() {
        let storage = MemoryStorage::seeded();
        assert!(matches!(
            storage.create_issue(new_issue("x"), "99"),
            Err(Error::UserNotFound(_))
        ));
        assert!(matches!(
            storage.create_issue(new_issue("  "), "1"),
            Err(Error::InvalidIssue { .. })
        ));
        assert_eq!(storage.list_issues().unwrap().len(), 3);
    }

    #[test]
    fn status_transitions_manage_resolved_at() {
        let storage = MemoryStorage::seeded();
        let resolved = storage.update_status("1", Status::Resolved).unwrap();
        let stamp = resolved.resolved_at.expect("resolved_at stamped");

        let closed = storage.update_status("1", Status::Closed).unwrap();
        assert_eq!(closed.resolved_at, Some(stamp));

        let reopened = storage.update_status("1", Status::InProgress).unwrap();
        assert!(reopened.resolved_at.is_none());

        // an existing resolution timestamp is kept
        let already = storage.update_status("3", Status::Resolved).unwrap();
        assert_eq!(already.resolved_at, seed::issues()[2].resolved_at);
    }

    #[test]
    fn update_status_of_missing_issue_fails() {
        let storage = MemoryStorage::seeded();
        assert!(matches!(
            storage.update_status("nope", Status::Closed),
            Err(Error::IssueNotFound(_))
        ));
    }

    #[test]
    fn assignment_requires_staff() {
        let storage = MemoryStorage::seeded();
        let issue = storage.assign_issue("1", "3").unwrap();
        let assignee = issue.assigned_to.unwrap();
        assert_eq!(assignee.name, "Aalekh Chaudhary");
        assert_eq!(assignee.department, "Public Works");

        assert!(matches!(storage.assign_issue("1", "2"), Err(Error::NotStaff(_))));
        assert!(matches!(storage.assign_issue("1", "42"), Err(Error::UserNotFound(_))));
    }

    #[test]
    fn statistics_reflect_mutations() {
        let storage = MemoryStorage::seeded();
        let options = AnalyticsOptions::as_of(NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
        assert_eq!(storage.get_statistics(&options).unwrap().resolved_issues, 1);

        storage.update_status("2", Status::Resolved).unwrap();
        let report = storage.get_statistics(&options).unwrap();
        assert_eq!(report.resolved_issues, 2);
        assert_eq!(report.active_issues, 1);
    }

    #[test]
    fn search_issues_applies_filter() {
        let storage = MemoryStorage::seeded();
        let filter = IssueFilter {
            search: "TRASH".to_string(),
            status: Choice::Only(Status::Resolved),
            ..Default::default()
        };
        let found = storage.search_issues(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");
    }

    #[test]
    fn loads_dataset_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string_pretty(&Dataset::seeded()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let storage = MemoryStorage::from_dataset_file(file.path()).unwrap();
        assert_eq!(storage.list_issues().unwrap().len(), 3);
        assert!(storage.describe().starts_with("memory ("));
    }

    #[test]
    fn rejects_invalid_dataset_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"issues\": [{\"id\": 1}]}").unwrap();
        assert!(matches!(
            MemoryStorage::from_dataset_file(file.path()),
            Err(Error::Dataset(_))
        ));
        assert!(matches!(
            MemoryStorage::from_dataset_file(Path::new("/nonexistent/civic.json")),
            Err(Error::Io(_))
        ));
    }
}
