use serde::{Deserialize, Serialize};

/// Generation parameters shared by both service surfaces.
///
/// Everything downstream — year partitions, entity counts, issue envelopes,
/// worklog density — is a pure function of this struct plus an index, so two
/// processes constructed from equal configs produce identical datasets. The
/// jira and tempo services must therefore be launched with the same values
/// (in practice: the same environment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenConfig {
    /// Root of all determinism. Immutable for the process lifetime.
    pub seed: String,
    /// Baseline projects per year, before the year scale factor.
    pub num_projects: u64,
    /// Baseline initiatives per year.
    pub num_initiatives: u64,
    pub epics_per_project_min: u64,
    pub epics_per_project_max: u64,
    pub tasks_per_epic_min: u64,
    pub tasks_per_epic_max: u64,
    pub num_users: u64,
    pub start_year: i32,
    pub current_year: i32,
    pub year_scale_min: f64,
    pub year_scale_max: f64,
    /// Fraction of projects whose span crosses into later calendar years.
    pub multi_year_percentage: f64,

    // Tempo surface
    pub num_teams: u64,
    pub worklogs_per_issue_min: u64,
    pub worklogs_per_issue_max: u64,
    pub plans_per_user_min: u64,
    pub plans_per_user_max: u64,
    pub members_per_team_min: u64,
    pub members_per_team_max: u64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            seed: "capacity-planner-mock-2024".to_string(),
            num_projects: 1500,
            num_initiatives: 1500,
            epics_per_project_min: 200,
            epics_per_project_max: 250,
            tasks_per_epic_min: 100,
            tasks_per_epic_max: 150,
            num_users: 500,
            start_year: 2022,
            current_year: 2026,
            year_scale_min: 0.8,
            year_scale_max: 1.2,
            multi_year_percentage: 0.30,
            num_teams: 20,
            worklogs_per_issue_min: 30,
            worklogs_per_issue_max: 50,
            plans_per_user_min: 2,
            plans_per_user_max: 6,
            members_per_team_min: 15,
            members_per_team_max: 40,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

impl GenConfig {
    /// Load configuration from environment variables, falling back to the
    /// reference defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            seed: std::env::var("DATA_SEED").unwrap_or(d.seed),
            num_projects: env_parse("NUM_PROJECTS", d.num_projects),
            num_initiatives: env_parse("NUM_INITIATIVES", d.num_initiatives),
            epics_per_project_min: env_parse("EPICS_PER_PROJECT_MIN", d.epics_per_project_min),
            epics_per_project_max: env_parse("EPICS_PER_PROJECT_MAX", d.epics_per_project_max),
            tasks_per_epic_min: env_parse("TASKS_PER_EPIC_MIN", d.tasks_per_epic_min),
            tasks_per_epic_max: env_parse("TASKS_PER_EPIC_MAX", d.tasks_per_epic_max),
            num_users: env_parse("NUM_USERS", d.num_users),
            start_year: env_parse("START_YEAR", d.start_year),
            current_year: env_parse("CURRENT_YEAR", d.current_year),
            year_scale_min: env_parse("YEAR_SCALE_MIN", d.year_scale_min),
            year_scale_max: env_parse("YEAR_SCALE_MAX", d.year_scale_max),
            multi_year_percentage: env_parse("MULTI_YEAR_PERCENTAGE", d.multi_year_percentage),
            num_teams: env_parse("NUM_TEAMS", d.num_teams),
            worklogs_per_issue_min: env_parse("WORKLOGS_PER_ISSUE_MIN", d.worklogs_per_issue_min),
            worklogs_per_issue_max: env_parse("WORKLOGS_PER_ISSUE_MAX", d.worklogs_per_issue_max),
            plans_per_user_min: env_parse("PLANS_PER_USER_MIN", d.plans_per_user_min),
            plans_per_user_max: env_parse("PLANS_PER_USER_MAX", d.plans_per_user_max),
            members_per_team_min: env_parse("MEMBERS_PER_TEAM_MIN", d.members_per_team_min),
            members_per_team_max: env_parse("MEMBERS_PER_TEAM_MAX", d.members_per_team_max),
        }
    }

    /// Calendar years covered by the dataset, in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.current_year
    }
}
