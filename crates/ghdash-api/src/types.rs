//! # API Types
//!
//! Display-shaped projections of GitHub entities.
//!
//! Field names follow the GitHub REST API so that responses deserialize
//! directly. Optional or loosely-typed remote fields are normalized here,
//! once, so consumers never see `null` owners or string-only labels.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Color given to labels that arrive without one.
pub const DEFAULT_LABEL_COLOR: &str = "000000";

/// Deserializes `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Account owning a repository or authoring an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Account login.
    #[serde(default, deserialize_with = "null_as_default")]
    pub login: String,
    /// Avatar image URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

/// A repository as listed in search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Numeric repository ID.
    pub id: u64,
    /// Repository name without owner.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Star count.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Primary language.
    #[serde(default)]
    pub language: Option<String>,
    /// Owning account.
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: Owner,
    /// Web URL.
    pub html_url: String,
}

/// A single repository with the extra fields shown on its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryDetail {
    /// Fields shared with search results.
    #[serde(flatten)]
    pub summary: RepositorySummary,
    /// Fork count.
    #[serde(default)]
    pub forks_count: u64,
    /// Open issues plus open pull requests, as counted by GitHub.
    #[serde(default)]
    pub open_issues_count: u64,
    /// Default branch name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_branch: String,
    /// Repository topics.
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Issue or pull request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Open.
    Open,
    /// Closed (including merged pull requests).
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

/// Label shapes GitHub may send.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
}

impl From<RawLabel> for Label {
    fn from(raw: RawLabel) -> Self {
        let (name, color) = match raw {
            RawLabel::Name(name) => (name, None),
            RawLabel::Object { name, color } => (name.unwrap_or_default(), color),
        };

        Self {
            name,
            color: color
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_LABEL_COLOR.to_string()),
        }
    }
}

/// An issue label, normalized to a name and a hex color without `#`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLabel")]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Six-digit hex color.
    pub color: String,
}

impl Label {
    /// Whether the label color is light enough to need dark text.
    ///
    /// Colors that are not valid hex count as dark.
    #[must_use]
    pub fn is_light(&self) -> bool {
        u32::from_str_radix(&self.color, 16).is_ok_and(|v| v > 0x7f_ffff)
    }
}

/// An issue in a repository.
///
/// GitHub's issue listing also returns pull requests; they are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Open or closed.
    pub state: IssueState,
    /// Web URL.
    pub html_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Author, absent for deleted accounts.
    #[serde(default)]
    pub user: Option<Owner>,
    /// Labels.
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,
}

impl Issue {
    /// Whether the issue is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }
}

/// Pull request fields as GitHub sends them.
///
/// The list endpoint omits `merged` and all counters.
#[derive(Deserialize)]
struct RawPullRequest {
    #[serde(flatten)]
    issue: Issue,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    merged: Option<bool>,
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    comments: Option<u64>,
    #[serde(default)]
    review_comments: Option<u64>,
    #[serde(default)]
    commits: Option<u64>,
    #[serde(default)]
    additions: Option<u64>,
    #[serde(default)]
    deletions: Option<u64>,
    #[serde(default)]
    changed_files: Option<u64>,
}

impl From<RawPullRequest> for PullRequest {
    fn from(raw: RawPullRequest) -> Self {
        Self {
            issue: raw.issue,
            draft: raw.draft.unwrap_or(false),
            merged: raw.merged.unwrap_or(false) || raw.merged_at.is_some(),
            comments: raw.comments.unwrap_or(0),
            review_comments: raw.review_comments.unwrap_or(0),
            commits: raw.commits.unwrap_or(0),
            additions: raw.additions.unwrap_or(0),
            deletions: raw.deletions.unwrap_or(0),
            changed_files: raw.changed_files.unwrap_or(0),
        }
    }
}

/// A pull request: the issue fields plus review and diff statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPullRequest")]
pub struct PullRequest {
    /// Fields shared with issues.
    #[serde(flatten)]
    pub issue: Issue,
    /// Draft flag.
    pub draft: bool,
    /// Merged flag.
    pub merged: bool,
    /// Conversation comment count.
    pub comments: u64,
    /// Review comment count.
    pub review_comments: u64,
    /// Commit count.
    pub commits: u64,
    /// Added lines.
    pub additions: u64,
    /// Deleted lines.
    pub deletions: u64,
    /// Changed file count.
    pub changed_files: u64,
}

/// Badge status of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestStatus {
    /// Work in progress.
    Draft,
    /// Merged into its base.
    Merged,
    /// Open for review.
    Open,
    /// Closed without merging.
    Closed,
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Merged => "merged",
            Self::Open => "open",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

impl PullRequest {
    /// Status in display precedence: draft, then merged, then state.
    #[must_use]
    pub fn status(&self) -> PullRequestStatus {
        if self.draft {
            PullRequestStatus::Draft
        } else if self.merged {
            PullRequestStatus::Merged
        } else if self.issue.is_open() {
            PullRequestStatus::Open
        } else {
            PullRequestStatus::Closed
        }
    }
}

/// Profile of the account owning the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID.
    pub id: u64,
    /// Username (login).
    pub login: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Envelope of `GET /search/repositories`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) items: Vec<RepositorySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_json() -> serde_json::Value {
        json!({
            "number": 7,
            "title": "Crash on startup",
            "state": "open",
            "html_url": "https://github.com/acme/widget/issues/7",
            "created_at": "2024-01-02T03:04:05Z",
            "updated_at": "2024-01-03T03:04:05Z",
            "user": { "login": "octocat", "avatar_url": "https://avatars.example/octocat" },
            "labels": []
        })
    }

    #[test]
    fn test_label_from_string() {
        let label: Label = serde_json::from_value(json!("bug")).unwrap();

        assert_eq!(label.name, "bug");
        assert_eq!(label.color, DEFAULT_LABEL_COLOR);
    }

    #[test]
    fn test_label_from_object_missing_fields() {
        let label: Label = serde_json::from_value(json!({ "color": null })).unwrap();

        assert_eq!(label.name, "");
        assert_eq!(label.color, DEFAULT_LABEL_COLOR);

        let label: Label =
            serde_json::from_value(json!({ "name": "enhancement", "color": "a2eeef" })).unwrap();
        assert_eq!(label.name, "enhancement");
        assert_eq!(label.color, "a2eeef");
    }

    #[test]
    fn test_label_empty_color_defaults() {
        let label: Label = serde_json::from_value(json!({ "name": "x", "color": "" })).unwrap();
        assert_eq!(label.color, DEFAULT_LABEL_COLOR);
    }

    #[test]
    fn test_label_is_light() {
        let light = Label {
            name: "docs".into(),
            color: "ffffff".into(),
        };
        let dark = Label {
            name: "bug".into(),
            color: "7fffff".into(),
        };
        let garbage = Label {
            name: "?".into(),
            color: "zzzzzz".into(),
        };

        assert!(light.is_light());
        assert!(!dark.is_light());
        assert!(!garbage.is_light());
    }

    #[test]
    fn test_issue_mixed_labels_and_null_user() {
        let mut value = issue_json();
        value["user"] = serde_json::Value::Null;
        value["labels"] = json!(["wontfix", { "name": "bug", "color": "d73a4a" }]);

        let issue: Issue = serde_json::from_value(value).unwrap();

        assert!(issue.user.is_none());
        assert_eq!(issue.labels.len(), 2);
        assert_eq!(issue.labels[0].color, DEFAULT_LABEL_COLOR);
        assert_eq!(issue.labels[1].name, "bug");
        assert!(issue.is_open());
    }

    #[test]
    fn test_pull_request_from_list_endpoint_defaults_counters() {
        let mut value = issue_json();
        value["state"] = json!("closed");
        value["draft"] = json!(false);
        value["merged_at"] = serde_json::Value::Null;

        let pr: PullRequest = serde_json::from_value(value).unwrap();

        assert!(!pr.merged);
        assert_eq!(pr.commits, 0);
        assert_eq!(pr.changed_files, 0);
        assert_eq!(pr.status(), PullRequestStatus::Closed);
    }

    #[test]
    fn test_pull_request_merged_at_implies_merged() {
        let mut value = issue_json();
        value["state"] = json!("closed");
        value["merged_at"] = json!("2024-02-01T00:00:00Z");

        let pr: PullRequest = serde_json::from_value(value).unwrap();

        assert!(pr.merged);
        assert_eq!(pr.status(), PullRequestStatus::Merged);
    }

    #[test]
    fn test_pull_request_draft_takes_precedence() {
        let mut value = issue_json();
        value["draft"] = json!(true);
        value["merged"] = json!(true);

        let pr: PullRequest = serde_json::from_value(value).unwrap();
        assert_eq!(pr.status(), PullRequestStatus::Draft);
    }

    #[test]
    fn test_repository_summary_null_owner() {
        let repo: RepositorySummary = serde_json::from_value(json!({
            "id": 1,
            "name": "widget",
            "full_name": "acme/widget",
            "description": null,
            "stargazers_count": 3,
            "language": null,
            "owner": null,
            "html_url": "https://github.com/acme/widget"
        }))
        .unwrap();

        assert_eq!(repo.owner, Owner::default());
        assert!(repo.description.is_none());
    }

    #[test]
    fn test_repository_detail_serializes_flat() {
        let detail: RepositoryDetail = serde_json::from_value(json!({
            "id": 1,
            "name": "widget",
            "full_name": "acme/widget",
            "stargazers_count": 3,
            "owner": { "login": "acme", "avatar_url": "" },
            "html_url": "https://github.com/acme/widget",
            "forks_count": 2,
            "default_branch": "main",
            "topics": ["rust"]
        }))
        .unwrap();

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["full_name"], "acme/widget");
        assert_eq!(value["forks_count"], 2);
        assert_eq!(value["topics"][0], "rust");
    }
}
