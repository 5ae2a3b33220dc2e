use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Projection of a directory user onto the tempo surface.
///
/// Must carry the same `accountId`/`displayName` as the jira surface for the
/// same seed and index; that agreement is the cross-service identity
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TempoUser {
    pub account_id: String,
    pub display_name: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

impl From<&crate::models::jira::User> for TempoUser {
    fn from(user: &crate::models::jira::User) -> Self {
        Self {
            account_id: user.account_id.clone(),
            display_name: user.display_name.clone(),
            self_url: user.self_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorklogIssue {
    pub id: i64,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorklogAttribute {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    pub tempo_worklog_id: i64,
    pub jira_worklog_id: i64,
    pub issue: WorklogIssue,
    pub time_spent_seconds: i64,
    pub billable_seconds: i64,
    pub start_date: NaiveDate,
    pub start_time: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: TempoUser,
    pub attributes: Vec<WorklogAttribute>,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountCategoryType {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountCategory {
    pub id: u32,
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: AccountCategoryType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub key: String,
    pub name: String,
    pub status: String,
    pub global: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_budget: Option<u64>,
    pub lead: TempoUser,
    pub category: AccountCategory,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub summary: String,
    pub lead: TempoUser,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamRole {
    pub id: u32,
    pub name: String,
    pub default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: i64,
    pub commitment_percent: u32,
    pub from: NaiveDate,
    pub role: TeamRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: i64,
    pub team: TeamRef,
    pub member: TempoUser,
    pub membership: Membership,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanApproval {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub seconds_per_day: i64,
    pub include_non_working_days: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub plan_item: PlanItem,
    pub assignee: TempoUser,
    pub plan_approval: PlanApproval,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// Offset/limit page used by the tempo search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffsetPage<T> {
    pub results: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}
