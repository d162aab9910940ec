//! Data models for the Flavortown and Hackatime APIs.
//!
//! These are plain value types decoded from JSON responses. Unknown
//! fields are ignored and most fields are optional because the upstream
//! services omit them freely.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of remote entity that can be listed and searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    User,
    Project,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::User => write!(f, "users"),
            ResourceKind::Project => write!(f, "projects"),
        }
    }
}

/// A Flavortown user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub slack_id: Option<String>,
    #[serde(default)]
    pub cookies: Option<i64>,
    #[serde(default)]
    pub project_ids: Vec<u64>,
}

impl User {
    pub fn owns_project(&self, project_id: u64) -> bool {
        self.project_ids.contains(&project_id)
    }
}

/// A Flavortown project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub readme_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub devlog_ids: Vec<u64>,
}

impl Project {
    /// Value of an editable field by name.
    pub fn field(&self, field: ProjectField) -> Option<&str> {
        match field {
            ProjectField::Title => self.title.as_deref(),
            ProjectField::Description => self.description.as_deref(),
            ProjectField::RepoUrl => self.repo_url.as_deref(),
            ProjectField::DemoUrl => self.demo_url.as_deref(),
            ProjectField::ReadmeUrl => self.readme_url.as_deref(),
        }
    }
}

/// Shop item cost.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TicketCost {
    #[serde(default)]
    pub base_cost: Option<serde_json::Value>,
}

/// An item in the Flavortown store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ticket_cost: Option<TicketCost>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub limited: Option<bool>,
}

/// Service-reported pagination hints. Any of them may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// `GET /api/v1/users` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// `GET /api/v1/projects` response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectsResponse {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// A listed record of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    User(User),
    Project(Project),
}

impl Record {
    pub fn id(&self) -> u64 {
        match self {
            Record::User(user) => user.id,
            Record::Project(project) => project.id,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Record::User(_) => ResourceKind::User,
            Record::Project(_) => ResourceKind::Project,
        }
    }

    /// Text fields searched for this record, in priority order.
    pub fn search_fields(&self) -> Vec<Option<&str>> {
        match self {
            Record::User(user) => vec![user.display_name.as_deref()],
            Record::Project(project) => {
                vec![project.title.as_deref(), project.description.as_deref()]
            }
        }
    }
}

/// One page of listed records plus its pagination hints.
#[derive(Debug, Clone, Default)]
pub struct ResourcePage {
    pub records: Vec<Record>,
    pub pagination: Pagination,
}

impl From<UsersResponse> for ResourcePage {
    fn from(response: UsersResponse) -> Self {
        Self {
            records: response.users.into_iter().map(Record::User).collect(),
            pagination: response.pagination,
        }
    }
}

impl From<ProjectsResponse> for ResourcePage {
    fn from(response: ProjectsResponse) -> Self {
        Self {
            records: response.projects.into_iter().map(Record::Project).collect(),
            pagination: response.pagination,
        }
    }
}

/// Editable project fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Title,
    Description,
    RepoUrl,
    DemoUrl,
    ReadmeUrl,
}

impl ProjectField {
    pub const ALL: [ProjectField; 5] = [
        ProjectField::Title,
        ProjectField::Description,
        ProjectField::RepoUrl,
        ProjectField::DemoUrl,
        ProjectField::ReadmeUrl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProjectField::Title => "Title",
            ProjectField::Description => "Description",
            ProjectField::RepoUrl => "Repository URL",
            ProjectField::DemoUrl => "Demo URL",
            ProjectField::ReadmeUrl => "README URL",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, ProjectField::Title | ProjectField::Description)
    }
}

/// Body for project create/update requests.
///
/// `None` leaves a field untouched; `Some("")` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProjectFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_url: Option<String>,
}

impl ProjectFields {
    pub fn get(&self, field: ProjectField) -> Option<&str> {
        match field {
            ProjectField::Title => self.title.as_deref(),
            ProjectField::Description => self.description.as_deref(),
            ProjectField::RepoUrl => self.repo_url.as_deref(),
            ProjectField::DemoUrl => self.demo_url.as_deref(),
            ProjectField::ReadmeUrl => self.readme_url.as_deref(),
        }
    }

    pub fn set(&mut self, field: ProjectField, value: Option<String>) {
        let slot = match field {
            ProjectField::Title => &mut self.title,
            ProjectField::Description => &mut self.description,
            ProjectField::RepoUrl => &mut self.repo_url,
            ProjectField::DemoUrl => &mut self.demo_url,
            ProjectField::ReadmeUrl => &mut self.readme_url,
        };
        *slot = value;
    }

    /// True when no field would be sent.
    pub fn is_empty(&self) -> bool {
        ProjectField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Drop fields whose value equals the existing project's value.
    pub fn without_unchanged(mut self, existing: &Project) -> Self {
        for field in ProjectField::ALL {
            let current = existing.field(field).unwrap_or("");
            if self.get(field) == Some(current) {
                self.set(field, None);
            }
        }
        self
    }
}

/// Hackatime `statusbar/today` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodayStatus {
    #[serde(default)]
    pub data: TodayData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodayData {
    #[serde(default)]
    pub grand_total: GrandTotal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrandTotal {
    #[serde(default)]
    pub text: Option<String>,
}

impl TodayStatus {
    pub fn text(&self) -> &str {
        self.data.grand_total.text.as_deref().unwrap_or("0 secs")
    }
}

/// Hackatime `users/{username}/stats` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub data: StatsData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsData {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub human_readable_total: Option<String>,
    #[serde(default)]
    pub human_readable_daily_average: Option<String>,
    #[serde(default)]
    pub languages: Vec<LanguageStat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageStat {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_response_decode() {
        let json = r#"{
            "users": [
                {"id": 1, "display_name": "Ada Lovelace", "slack_id": "U1", "cookies": 12},
                {"id": 2, "display_name": null}
            ],
            "pagination": {"current_page": 1, "total_pages": 4}
        }"#;

        let response: UsersResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.users.len(), 2);
        assert_eq!(response.users[0].cookies, Some(12));
        assert_eq!(response.users[1].display_name, None);
        assert_eq!(response.pagination.total_pages, Some(4));
        assert_eq!(response.pagination.total_count, None);
    }

    #[test]
    fn test_missing_pagination_defaults() {
        let response: ProjectsResponse = serde_json::from_str(r#"{"projects": []}"#).unwrap();
        assert_eq!(response.pagination, Pagination::default());
    }

    #[test]
    fn test_record_search_fields() {
        let project = Record::Project(Project {
            id: 4,
            title: Some("Cookie Clicker".to_string()),
            description: None,
            ..Project::default()
        });
        assert_eq!(project.id(), 4);
        assert_eq!(project.kind(), ResourceKind::Project);
        assert_eq!(project.search_fields(), vec![Some("Cookie Clicker"), None]);
    }

    #[test]
    fn test_project_fields_serialize_skips_unset() {
        let fields = ProjectFields {
            title: Some("New".to_string()),
            repo_url: Some(String::new()),
            ..ProjectFields::default()
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({"title": "New", "repo_url": ""}));
    }

    #[test]
    fn test_without_unchanged() {
        let existing = Project {
            id: 1,
            title: Some("Same".to_string()),
            description: Some("Old".to_string()),
            ..Project::default()
        };
        let fields = ProjectFields {
            title: Some("Same".to_string()),
            description: Some("New".to_string()),
            repo_url: Some(String::new()),
            ..ProjectFields::default()
        };

        let changed = fields.without_unchanged(&existing);
        assert_eq!(changed.title, None);
        assert_eq!(changed.description.as_deref(), Some("New"));
        // Clearing an already empty field is not a change.
        assert_eq!(changed.repo_url, None);
    }

    #[test]
    fn test_today_text_default() {
        let status: TodayStatus = serde_json::from_str(r#"{"data": {}}"#).unwrap();
        assert_eq!(status.text(), "0 secs");
    }
}
