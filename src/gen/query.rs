//! Search, the JQL subset, and flat pagination.
//!
//! Searches never enumerate the dataset: totals are computed from counts
//! and only records whose position lands inside the requested window are
//! realized. Within a project the collection is ordered by descending
//! sequence (epics high to low, then the initiative), and the window is
//! applied to that same order.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::gen::issues::EPIC_SEQ_BASE;
use crate::gen::Generator;
use crate::models::jira::{Issue, IssueKind, PageResponse, Project};

static PROJECT_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)project\s*=\s*([A-Za-z][A-Za-z0-9]*)").expect("static regex"));
static TYPE_LIST_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)issuetype\s+in\s*\(([^)]*)\)").expect("static regex"));
static TYPE_EQ_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)issuetype\s*=\s*"?([A-Za-z0-9\-]+)"?"#).expect("static regex")
});

/// What a search is constrained by. Absent fields mean unfiltered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    pub project_key: Option<String>,
    /// Issue type ids or names; empty admits every kind.
    pub kinds: Vec<String>,
    pub year: Option<i32>,
}

impl SearchFilter {
    /// Extract the supported clauses from a JQL string. Anything the subset
    /// does not understand is ignored; parsing never fails.
    pub fn from_jql(jql: &str) -> Self {
        let project_key = PROJECT_CLAUSE
            .captures(jql)
            .map(|c| c[1].to_uppercase());

        let kinds: Vec<String> = if let Some(c) = TYPE_LIST_CLAUSE.captures(jql) {
            c[1].split(',')
                .map(|t| t.trim().trim_matches('"').trim_matches('\'').to_string())
                .filter(|t| !t.is_empty())
                .collect()
        } else if let Some(c) = TYPE_EQ_CLAUSE.captures(jql) {
            vec![c[1].to_string()]
        } else {
            Vec::new()
        };

        Self {
            project_key,
            kinds,
            year: None,
        }
    }

    fn admits(&self, id: &str, name: &str) -> bool {
        self.kinds.is_empty()
            || self
                .kinds
                .iter()
                .any(|k| k == id || k.eq_ignore_ascii_case(name))
    }

    pub(crate) fn admits_initiatives(&self) -> bool {
        self.admits("10001", "Initiative")
    }

    pub(crate) fn admits_epics(&self) -> bool {
        self.admits("10000", "Epic")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub start_at: u64,
    pub max_results: u64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            start_at: 0,
            max_results: 50,
        }
    }
}

#[derive(Debug)]
pub struct SearchResult {
    pub issues: Vec<Issue>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearStats {
    pub year: i32,
    pub scale: f64,
    pub projects: u64,
    pub initiatives: u64,
    pub estimated_epics: u64,
}

/// Dataset shape summary, served by `/stats` and the CLI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub seed: String,
    pub years: Vec<YearStats>,
    pub total_projects: u64,
    pub total_initiatives: u64,
    pub estimated_epics: u64,
    pub estimated_tasks: u64,
    pub num_users: u64,
    pub num_teams: u64,
}

impl Generator {
    /// Run a windowed search. `total` reflects the filter's kind and project
    /// constraints; the year filter narrows realized items only.
    pub fn search(&self, filter: &SearchFilter, window: &Window) -> SearchResult {
        let empty = SearchResult {
            issues: Vec::new(),
            total: 0,
        };

        let project_range = match &filter.project_key {
            Some(key) => match self.project_index_for_key(key) {
                Ok(index) => index..index + 1,
                Err(_) => {
                    tracing::warn!(key = %key, "search against unknown project key");
                    return empty;
                }
            },
            None => 0..self.years().total_projects(),
        };

        let with_initiative = filter.admits_initiatives();
        let with_epics = filter.admits_epics();

        let window_end = window.start_at.saturating_add(window.max_results);
        let mut issues = Vec::new();
        let mut total = 0u64;
        let mut cursor = 0u64;

        for project_index in project_range {
            let epic_count = if with_epics {
                self.epic_count_for(project_index)
            } else {
                0
            };
            let count = u64::from(with_initiative) + epic_count;
            total += count;

            let lo = cursor.max(window.start_at);
            let hi = (cursor + count).min(window_end);
            for position in lo..hi {
                let local = position - cursor;
                let (seq, kind) = if local < epic_count {
                    (EPIC_SEQ_BASE + epic_count - 1 - local, IssueKind::Epic)
                } else {
                    (1, IssueKind::Initiative)
                };
                let issue = self.issue(project_index, seq, kind);
                if let Some(year) = filter.year {
                    let in_span =
                        issue.fields.fiscal_year <= year && year <= issue.fields.project_end_year;
                    if !in_span {
                        continue;
                    }
                }
                issues.push(issue);
            }
            cursor += count;
        }

        SearchResult { issues, total }
    }

    pub fn project_page(&self, start_at: u64, max_results: u64) -> PageResponse<Project> {
        let total = self.years().total_projects();
        Self::page(total, start_at, max_results, |i| self.project_at(i))
    }

    /// Page over one year's contiguous slice of the project index space.
    /// Years outside the dataset yield an empty page, not an error.
    pub fn projects_by_year(
        &self,
        year: i32,
        start_at: u64,
        max_results: u64,
    ) -> PageResponse<Project> {
        match self.years().slot(year) {
            None => PageResponse {
                values: Vec::new(),
                total: 0,
                is_last: true,
            },
            Some(slot) => {
                let offset = slot.project_offset;
                Self::page(slot.num_projects, start_at, max_results, |i| {
                    self.project_at(offset + i)
                })
            }
        }
    }

    fn page<T>(
        total: u64,
        start_at: u64,
        max_results: u64,
        realize: impl Fn(u64) -> T,
    ) -> PageResponse<T> {
        let lo = start_at.min(total);
        let hi = start_at.saturating_add(max_results).min(total);
        PageResponse {
            values: (lo..hi).map(realize).collect(),
            total,
            is_last: start_at.saturating_add(max_results) >= total,
        }
    }

    /// Analytic dataset summary. Epic totals are estimates from the range
    /// midpoint; exact counts would mean realizing every project.
    pub fn stats(&self) -> DatasetStats {
        let cfg = self.config();
        let epic_midpoint =
            (cfg.epics_per_project_min as f64 + cfg.epics_per_project_max as f64) / 2.0;
        let task_midpoint = (cfg.tasks_per_epic_min as f64 + cfg.tasks_per_epic_max as f64) / 2.0;

        let years: Vec<YearStats> = self
            .years()
            .slots()
            .iter()
            .map(|slot| YearStats {
                year: slot.year,
                scale: slot.scale,
                projects: slot.num_projects,
                initiatives: slot.num_initiatives,
                estimated_epics: (slot.num_projects as f64 * epic_midpoint * slot.scale).round()
                    as u64,
            })
            .collect();

        let estimated_epics: u64 = years.iter().map(|y| y.estimated_epics).sum();
        DatasetStats {
            seed: cfg.seed.clone(),
            estimated_epics,
            estimated_tasks: (estimated_epics as f64 * task_midpoint).round() as u64,
            years,
            total_projects: self.years().total_projects(),
            total_initiatives: self.years().total_initiatives(),
            num_users: cfg.num_users,
            num_teams: cfg.num_teams,
        }
    }
}
