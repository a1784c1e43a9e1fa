//! Deterministic synthetic dataset generation.
//!
//! Every field except the wall-clock timestamps is derived from the record's
//! position, so repeated calls with the same counts produce structurally
//! identical datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed pool cycled through for owner/assignee/author references.
pub const USER_POOL: [&str; 5] = ["user-1", "user-2", "user-3", "user-4", "user-5"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Open,
    InProgress,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub project_id: String,
    pub assignee_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub issue_id: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project with position-derived fields for dataset seeding.
    pub fn with_index(index: usize) -> Self {
        Self {
            id: format!("project-{}", index),
            name: format!("Project {}", index),
            description: format!("Description for project {}", index),
            created_at: Utc::now(),
            owner_id: USER_POOL[index % USER_POOL.len()].to_string(),
        }
    }
}

impl Issue {
    /// Creates an issue referencing `project-<index mod project_count>`.
    /// `project_count` must be nonzero.
    pub fn with_index(index: usize, project_count: usize) -> Self {
        let now = Utc::now();
        Self {
            id: format!("issue-{}", index),
            title: format!("Issue {}", index),
            description: format!("Description for issue {}", index),
            status: match index % 3 {
                0 => IssueStatus::Open,
                1 => IssueStatus::InProgress,
                _ => IssueStatus::Closed,
            },
            priority: match index % 4 {
                0 => IssuePriority::Low,
                1 => IssuePriority::Medium,
                2 => IssuePriority::High,
                _ => IssuePriority::Critical,
            },
            project_id: format!("project-{}", index % project_count),
            assignee_id: USER_POOL[index % USER_POOL.len()].to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Comment {
    /// Creates a comment referencing `issue-<index mod issue_count>`.
    /// `issue_count` must be nonzero.
    pub fn with_index(index: usize, issue_count: usize) -> Self {
        Self {
            id: format!("comment-{}", index),
            content: format!("Comment {} content", index),
            issue_id: format!("issue-{}", index % issue_count),
            author_id: USER_POOL[index % USER_POOL.len()].to_string(),
            created_at: Utc::now(),
        }
    }
}

/// One freshly generated batch of related records.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub projects: Vec<Project>,
    pub issues: Vec<Issue>,
    pub comments: Vec<Comment>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("cannot generate {downstream} records when the {upstream} count is zero")]
    ZeroUpstream { upstream: &'static str, downstream: &'static str },
}

/// Generates `projects`/`issues`/`comments` records with cycling foreign keys.
///
/// A zero count yields an empty vec for that kind, but a nonzero downstream
/// count behind a zero upstream count has no valid modulus and is rejected.
pub fn generate(projects: usize, issues: usize, comments: usize) -> Result<Dataset, GenerateError> {
    if issues > 0 && projects == 0 {
        return Err(GenerateError::ZeroUpstream { upstream: "project", downstream: "issue" });
    }
    if comments > 0 && issues == 0 {
        return Err(GenerateError::ZeroUpstream { upstream: "issue", downstream: "comment" });
    }

    Ok(Dataset {
        projects: (0..projects).map(Project::with_index).collect(),
        issues: (0..issues).map(|i| Issue::with_index(i, projects)).collect(),
        comments: (0..comments).map(|i| Comment::with_index(i, issues)).collect(),
    })
}
