use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A synthetic directory user.
///
/// Identity is a pure function of `(seed, index)`; the account id embeds the
/// index so the reverse mapping is trivial. Both service surfaces must agree
/// on these values for a shared seed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub account_id: String,
    pub account_type: String,
    pub email_address: String,
    pub display_name: String,
    pub active: bool,
    pub time_zone: String,
    pub locale: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCategory {
    pub id: u32,
    pub key: String,
    pub color_name: String,
    pub name: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status_category: StatusCategory,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub id: String,
    pub name: String,
    pub icon_url: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub subtask: bool,
    pub hierarchy_level: i32,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// A project: the top-level container that owns one initiative and a
/// year-scaled number of epics (tasks hang off epics).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub key: String,
    pub name: String,
    pub description: String,
    pub lead: User,
    pub project_type_key: String,
    pub simplified: bool,
    pub style: String,
    pub is_private: bool,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// Abbreviated project reference embedded in issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectRef {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// Single-select custom field value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionValue {
    pub value: String,
}

/// Lightweight parent summary attached to child issues. Never recursive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParentRef {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
    pub fields: ParentFields,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParentFields {
    pub summary: String,
    pub status: Status,
    pub issuetype: IssueType,
}

/// Issue field payload. Custom field names follow the reference instance's
/// field ids so downstream consumers see the shape they expect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueFields {
    pub summary: String,
    pub description: String,
    pub status: Status,
    pub assignee: User,
    pub reporter: User,
    pub priority: Priority,
    pub issuetype: IssueType,
    pub project: ProjectRef,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub duedate: NaiveDate,
    pub labels: Vec<String>,
    /// IT Owner(s)
    #[serde(rename = "customfield_10000")]
    pub it_owners: Vec<User>,
    /// Business Champion(s)
    #[serde(rename = "customfield_10078")]
    pub business_champions: Vec<User>,
    /// Workstream
    #[serde(rename = "customfield_10447")]
    pub workstream: OptionValue,
    /// In-service date
    #[serde(rename = "customfield_10121")]
    pub inservice_date: NaiveDate,
    /// Start date
    #[serde(rename = "customfield_10015")]
    pub start_date: NaiveDate,
    /// End date
    #[serde(rename = "customfield_10685")]
    pub end_date: NaiveDate,
    /// PAR #
    #[serde(rename = "customfield_10132")]
    pub par_number: String,
    /// Health status
    #[serde(rename = "customfield_10451")]
    pub health_status: OptionValue,
    /// Capital/Expense
    #[serde(rename = "customfield_10450")]
    pub capital_expense: OptionValue,
    #[serde(rename = "customfield_fiscalYear")]
    pub fiscal_year: i32,
    #[serde(rename = "customfield_projectEndYear")]
    pub project_end_year: i32,
    #[serde(rename = "customfield_isMultiYear")]
    pub is_multi_year: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
    pub fields: IssueFields,
}

/// The record kinds the generator can realize for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    Initiative,
    Epic,
    Task,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub id: String,
    pub name: String,
    pub to: Status,
    pub has_screen: bool,
    pub is_global: bool,
    pub is_initial: bool,
    pub is_conditional: bool,
}

/// Paginated issue search response. Items are JSON values because persisted
/// override patches are merged in after generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub start_at: u64,
    pub max_results: u64,
    pub total: u64,
    pub is_last: bool,
    pub issues: Vec<serde_json::Value>,
}

/// Paginated flat collection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub values: Vec<T>,
    pub total: u64,
    pub is_last: bool,
}
