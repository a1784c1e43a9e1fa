//! Collection loading and query construction for the issue-detail workload.

use loam_core::{Collection, CollectionLoader, JoinQuery, QueryBuilder};
use serde::{Deserialize, Serialize};

use crate::grove::generator::{Comment, Dataset, Issue, IssuePriority, IssueStatus, Project};

/// Flattened projection of one issue joined with its project and one comment.
/// Project/comment sides are `None` when the join found no match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDetailRow {
    pub issue_id: String,
    pub issue_title: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub project_owner_id: Option<String>,
    pub comment_id: Option<String>,
    pub comment_content: Option<String>,
    pub comment_author_id: Option<String>,
}

/// Loads the three record kinds into fresh, independently-keyed collections.
/// Comments carry an eager index on `issue_id` to accelerate the child join;
/// issues carry one on `project_id` for parity with the source workload.
pub fn load_collections(dataset: Dataset) -> (Collection<Project>, Collection<Issue>, Collection<Comment>) {
    let projects = Collection::load("projects", |p: &Project| p.id.clone(), dataset.projects);
    let issues = CollectionLoader::new("issues", |i: &Issue| i.id.clone())
        .index_by("project_id", |i| i.project_id.clone())
        .load(dataset.issues);
    let comments = CollectionLoader::new("comments", |c: &Comment| c.id.clone())
        .index_by("issue_id", |c| c.issue_id.clone())
        .load(dataset.comments);
    (projects, issues, comments)
}

/// Builds the three-way left join: issues ⟕ projects on `issue.project_id`,
/// issues ⟕ comments on `comment.issue_id`, projected into [`IssueDetailRow`].
/// Construction touches no collection state.
pub fn issue_detail_query(
    issues: &Collection<Issue>,
    projects: &Collection<Project>,
    comments: &Collection<Comment>,
) -> JoinQuery<Issue, Project, Comment, IssueDetailRow> {
    QueryBuilder::from(issues)
        .left_join_parent(projects, "project_id", |issue: &Issue| issue.project_id.clone())
        .left_join_children(comments, "issue_id", |comment: &Comment| comment.issue_id.clone())
        .select(|issue, project, comment| IssueDetailRow {
            issue_id: issue.id.clone(),
            issue_title: issue.title.clone(),
            status: issue.status,
            priority: issue.priority,
            project_id: project.map(|p| p.id.clone()),
            project_name: project.map(|p| p.name.clone()),
            project_owner_id: project.map(|p| p.owner_id.clone()),
            comment_id: comment.map(|c| c.id.clone()),
            comment_content: comment.map(|c| c.content.clone()),
            comment_author_id: comment.map(|c| c.author_id.clone()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grove::generator;

    #[tokio::test]
    async fn every_issue_appears_and_comments_fan_out() {
        // 200 comments over 50 issues: each issue gets exactly 4 comment rows
        let dataset = generator::generate(10, 50, 200).unwrap();
        let (projects, issues, comments) = load_collections(dataset);
        issues.ready().await.unwrap();
        projects.ready().await.unwrap();
        comments.ready().await.unwrap();

        let query = issue_detail_query(&issues, &projects, &comments);
        query.preload().await.unwrap();

        assert_eq!(query.len(), 200);
        let rows = query.rows();
        assert!(rows.iter().all(|row| row.project_id.is_some() && row.comment_id.is_some()));
    }

    #[tokio::test]
    async fn issues_without_comments_still_appear() {
        let dataset = generator::generate(10, 50, 0).unwrap();
        let (projects, issues, comments) = load_collections(dataset);
        issues.ready().await.unwrap();
        projects.ready().await.unwrap();
        comments.ready().await.unwrap();

        let query = issue_detail_query(&issues, &projects, &comments);
        query.preload().await.unwrap();

        // every issue appears exactly once, with the comment side null
        assert_eq!(query.len(), 50);
        assert!(query.rows().iter().all(|row| row.comment_id.is_none() && row.project_id.is_some()));
    }

    #[tokio::test]
    async fn row_count_is_sum_of_max_one_and_matches() {
        // 3 comments over 5 issues: issues 0..2 get one comment row each,
        // issues 3 and 4 appear once with the comment side null.
        let dataset = generator::generate(2, 5, 3).unwrap();
        let (projects, issues, comments) = load_collections(dataset);
        issues.ready().await.unwrap();
        projects.ready().await.unwrap();
        comments.ready().await.unwrap();

        let query = issue_detail_query(&issues, &projects, &comments);
        query.preload().await.unwrap();

        let rows = query.rows();
        assert_eq!(rows.len(), 5);
        let unmatched = rows.iter().filter(|row| row.comment_id.is_none()).count();
        assert_eq!(unmatched, 2);
    }
}
