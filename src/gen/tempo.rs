//! Tempo-side generation: teams, accounts, worklogs, plans.
//!
//! Everything here is built on the same streams the jira side uses, so the
//! two services agree on users, issues and spans by construction; there is
//! no cross-service call at request time.

use std::collections::HashSet;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::error::{Error, Result};
use crate::gen::catalog::{
    account_category, workstream_account_key, OVERHEAD_ACCOUNTS, PROJECT_PREFIXES,
    TEAM_DEFINITIONS, TEAM_ROLES, WORKLOG_DESCRIPTIONS, WORKSTREAMS,
};
use crate::gen::issues::{midnight, ymd, EPIC_SEQ_BASE};
use crate::gen::Generator;
use crate::models::tempo::{
    Account, Membership, Plan, PlanApproval, PlanItem, Team, TeamMember, TeamRef, TempoUser,
    Worklog, WorklogAttribute, WorklogIssue,
};

/// Hour weights for a single worklog entry; 2-4h days dominate.
const WORKLOG_HOURS: [i64; 13] = [1, 2, 2, 3, 3, 3, 4, 4, 4, 5, 6, 7, 8];
const SECONDS_PER_DAY_CHOICES: [i64; 6] = [2, 4, 4, 6, 6, 8];
const PLAN_APPROVALS: [&str; 4] = ["APPROVED", "APPROVED", "APPROVED", "REQUESTED"];

/// Filters for worklog search. Pagination is left to the caller so created
/// records can be merged in before the window is applied.
#[derive(Debug, Clone, Default)]
pub struct WorklogQuery {
    pub issue_keys: Vec<String>,
    pub project_keys: Vec<String>,
    /// Author account ids.
    pub account_ids: Vec<String>,
    pub account_key: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl WorklogQuery {
    /// Whether a worklog passes the author/account/date filters. Issue and
    /// project scoping happens when candidates are chosen, not here.
    pub fn matches(&self, worklog: &Worklog) -> bool {
        if !self.account_ids.is_empty()
            && !self.account_ids.contains(&worklog.author.account_id)
        {
            return false;
        }
        if let Some(key) = &self.account_key {
            let held = worklog
                .attributes
                .iter()
                .any(|a| a.key == "_Account_" && a.value == *key);
            if !held {
                return false;
            }
        }
        if let Some(from) = self.from {
            if worklog.start_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if worklog.start_date > to {
                return false;
            }
        }
        true
    }
}

impl Generator {
    fn tempo_user(&self, index: u64) -> TempoUser {
        TempoUser::from(&self.user_at(index))
    }

    /// Realize the team at `index`. Names rotate through the definition
    /// table with a numeric suffix once the table is exhausted.
    pub fn team_at(&self, index: u64) -> Team {
        let (name, _, summary) = TEAM_DEFINITIONS[(index as usize) % TEAM_DEFINITIONS.len()];
        let round = index / TEAM_DEFINITIONS.len() as u64;
        let mut s = self.stream(&format!("team-{index}"));
        let lead = self.tempo_user(s.below(self.config().num_users));
        let id = index as i64 + 1;
        Team {
            id,
            name: if round == 0 {
                name.to_string()
            } else {
                format!("{name} {}", round + 1)
            },
            summary: summary.to_string(),
            lead,
            self_url: format!("/4/teams/{id}"),
        }
    }

    pub fn team_by_id(&self, id: i64) -> Result<Team> {
        if id < 1 || id as u64 > self.config().num_teams {
            return Err(Error::UnknownTeam(id));
        }
        Ok(self.team_at(id as u64 - 1))
    }

    pub fn teams(&self) -> Vec<Team> {
        (0..self.config().num_teams).map(|i| self.team_at(i)).collect()
    }

    /// Members of a team. The lead comes first at full commitment; about
    /// 60% of the rest are drawn from people already working the team's
    /// aligned projects, the remainder from the whole directory.
    pub fn team_members(&self, team_id: i64) -> Result<Vec<TeamMember>> {
        let team = self.team_by_id(team_id)?;
        let index = team_id as u64 - 1;
        let (_, prefixes, _) = TEAM_DEFINITIONS[(index as usize) % TEAM_DEFINITIONS.len()];

        // People assigned to or owning the initiatives of aligned projects.
        let mut aligned: Vec<u64> = Vec::new();
        for prefix in prefixes {
            let Ok(base) = self.project_index_for_key(prefix) else {
                continue;
            };
            for round in 0..10 {
                let project_index = base + round * PROJECT_PREFIXES.len() as u64;
                if project_index >= self.years().total_projects() {
                    break;
                }
                let key = format!("{}-1", self.project_key_for(project_index));
                let roles = self.role_draw(&key);
                aligned.push(roles.assignee);
                aligned.extend(roles.it_owners);
            }
        }

        let cfg = self.config();
        let mut s = self.stream(&format!("team-{index}-members"));
        let count = s.range_inclusive(cfg.members_per_team_min, cfg.members_per_team_max);

        let team_ref = TeamRef {
            id: team.id,
            name: team.name.clone(),
            self_url: team.self_url.clone(),
        };
        let lead_index = {
            // The lead draw is the first draw of the team stream.
            let mut ts = self.stream(&format!("team-{index}"));
            ts.below(cfg.num_users)
        };

        let mut members = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(lead_index);
        members.push(TeamMember {
            id: team.id * 100_000,
            team: team_ref.clone(),
            member: self.tempo_user(lead_index),
            membership: Membership {
                id: team.id * 100_000,
                commitment_percent: 100,
                from: ymd(cfg.start_year, 1, 1),
                role: TEAM_ROLES[1].clone(),
            },
            self_url: format!("/4/teams/{}/members/{lead_index}", team.id),
        });

        let year_span = (cfg.current_year - cfg.start_year + 1) as u64;
        let mut attempts = 0;
        while (members.len() as u64) < count && attempts < count * 20 {
            attempts += 1;
            let from_aligned = !aligned.is_empty() && s.chance(0.6);
            let user = if from_aligned {
                aligned[s.below(aligned.len() as u64) as usize]
            } else {
                s.below(cfg.num_users)
            };
            if !seen.insert(user) {
                continue;
            }

            let mut role = s.pick(&TEAM_ROLES[..]).clone();
            if role.name == "Lead" {
                role = TEAM_ROLES[0].clone();
            }
            let commitment = if from_aligned {
                *s.pick(&[50u32, 75, 100])
            } else {
                *s.pick(&[25u32, 50, 75, 100])
            };
            let from = ymd(
                cfg.start_year + s.below(year_span) as i32,
                s.below(12) as u32 + 1,
                1,
            );

            let member_id = team.id * 100_000 + members.len() as i64;
            members.push(TeamMember {
                id: member_id,
                team: team_ref.clone(),
                member: self.tempo_user(user),
                membership: Membership {
                    id: member_id,
                    commitment_percent: commitment,
                    from,
                    role,
                },
                self_url: format!("/4/teams/{}/members/{user}", team.id),
            });
        }

        Ok(members)
    }

    /// The full account catalog: one per workstream, one per project
    /// prefix, plus the fixed overhead/internal set. Built once per
    /// generator.
    pub fn accounts(&self) -> &[Account] {
        self.accounts.get_or_init(|| {
            let users = self.config().num_users;
            let mut accounts = Vec::new();

            for (i, workstream) in WORKSTREAMS.iter().enumerate() {
                let mut s = self.stream(&format!("account-workstream-{i}"));
                let key = workstream_account_key(workstream);
                accounts.push(Account {
                    id: accounts.len() as u64 + 1,
                    self_url: format!("/4/accounts/{key}"),
                    key,
                    name: format!("{workstream} Workstream"),
                    status: "OPEN".to_string(),
                    global: false,
                    monthly_budget: Some(s.range_inclusive(100_000, 500_000)),
                    lead: self.tempo_user(s.below(users)),
                    category: account_category("WORKSTREAM").clone(),
                });
            }

            for (i, prefix) in PROJECT_PREFIXES.iter().enumerate() {
                let mut s = self.stream(&format!("account-project-{i}"));
                let key = format!("PROJ-{prefix}");
                accounts.push(Account {
                    id: accounts.len() as u64 + 1,
                    self_url: format!("/4/accounts/{key}"),
                    key,
                    name: format!("{prefix} Projects"),
                    status: "OPEN".to_string(),
                    global: false,
                    monthly_budget: Some(s.range_inclusive(50_000, 300_000)),
                    lead: self.tempo_user(s.below(users)),
                    category: account_category("PROJECT").clone(),
                });
            }

            for (i, (key, name, category)) in OVERHEAD_ACCOUNTS.iter().enumerate() {
                let mut s = self.stream(&format!("account-overhead-{i}"));
                accounts.push(Account {
                    id: accounts.len() as u64 + 1,
                    self_url: format!("/4/accounts/{key}"),
                    key: key.to_string(),
                    name: name.to_string(),
                    status: "OPEN".to_string(),
                    global: true,
                    monthly_budget: None,
                    lead: self.tempo_user(s.below(users)),
                    category: account_category(category).clone(),
                });
            }

            accounts
        })
    }

    /// Look an account up by key, or by numeric id as a fallback.
    pub fn account_by_key(&self, key: &str) -> Result<Account> {
        let accounts = self.accounts();
        if let Some(account) = accounts.iter().find(|a| a.key == key) {
            return Ok(account.clone());
        }
        if let Ok(id) = key.parse::<u64>() {
            if let Some(account) = accounts.iter().find(|a| a.id == id) {
                return Ok(account.clone());
            }
        }
        Err(Error::UnknownAccount(key.to_string()))
    }

    /// Realize every worklog logged against one issue, newest first.
    pub fn worklogs_for_issue(&self, issue_key: &str) -> Result<Vec<Worklog>> {
        let (project_key, seq) = Self::split_issue_key(issue_key)?;
        let project_index = self
            .project_index_for_key(project_key)
            .map_err(|_| Error::UnknownIssue(issue_key.to_string()))?;
        self.kind_for_sequence(project_index, seq)
            .ok_or_else(|| Error::UnknownIssue(issue_key.to_string()))?;

        let env = self.envelope(issue_key, project_index);
        let roles = self.role_draw(issue_key);
        let workstream = {
            // First draw of the misc stream, same as issue realization.
            let mut misc = self.stream(&format!("{issue_key}/misc"));
            *misc.pick(&WORKSTREAMS)
        };
        let prefix = PROJECT_PREFIXES[(project_index % PROJECT_PREFIXES.len() as u64) as usize];
        let workstream_key = workstream_account_key(workstream);
        let project_account_key = format!("PROJ-{prefix}");

        let cfg = self.config();
        let mut s = self.stream(&format!("worklogs-{issue_key}"));
        let count = s.range_inclusive(cfg.worklogs_per_issue_min, cfg.worklogs_per_issue_max);

        let mut pool = vec![roles.assignee, roles.reporter];
        pool.extend(&roles.it_owners);
        for _ in 0..5 {
            pool.push(s.below(cfg.num_users));
        }

        let total_days = (env.end - env.start).num_days().max(60) as u64;
        let issue_ref = WorklogIssue {
            id: self.issue_id(project_index, seq) as i64,
            key: issue_key.to_string(),
            self_url: format!("/rest/api/3/issue/{issue_key}"),
        };

        let mut worklogs = Vec::with_capacity(count as usize);
        for i in 0..count {
            let mut w = self.stream(&format!("worklog-{issue_key}-{i}"));
            let author = pool[w.below(pool.len() as u64) as usize];

            let mut date = env.start + Days::new(w.below(total_days));
            while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                date = date + Days::new(1);
            }

            let hour = 8 + w.below(4);
            let minute = w.below(4) * 15;
            let seconds = *w.pick(&WORKLOG_HOURS) * 3600;
            let billable = (seconds as f64 * (0.80 + w.next_f64() * 0.15)).round() as i64;
            let id = (1_000_000 + w.below(9_000_000)) as i64;
            let account_key = if w.chance(0.5) {
                workstream_key.clone()
            } else {
                project_account_key.clone()
            };

            worklogs.push(Worklog {
                tempo_worklog_id: id,
                jira_worklog_id: id,
                issue: issue_ref.clone(),
                time_spent_seconds: seconds,
                billable_seconds: billable,
                start_date: date,
                start_time: format!("{hour:02}:{minute:02}:00"),
                description: w.pick(&WORKLOG_DESCRIPTIONS).to_string(),
                created_at: midnight(date),
                updated_at: midnight(date),
                author: self.tempo_user(author),
                attributes: vec![WorklogAttribute {
                    key: "_Account_".to_string(),
                    value: account_key,
                }],
                self_url: format!("/4/worklogs/{id}"),
            });
        }

        worklogs.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.tempo_worklog_id.cmp(&b.tempo_worklog_id)));
        Ok(worklogs)
    }

    /// Candidate issue keys for a worklog search. Worklogs are never
    /// enumerated globally; the scope comes from the query, falling back to
    /// a small fixed sample.
    fn worklog_candidates(&self, query: &WorklogQuery) -> Vec<String> {
        if !query.issue_keys.is_empty() {
            return query.issue_keys.clone();
        }

        let mut keys = Vec::new();
        let mut push_project = |project_index: u64, epics: u64| {
            let project_key = self.project_key_for(project_index);
            keys.push(format!("{project_key}-1"));
            let available = self.epic_count_for(project_index).min(epics);
            for seq in EPIC_SEQ_BASE..EPIC_SEQ_BASE + available {
                keys.push(format!("{project_key}-{seq}"));
            }
        };

        if !query.project_keys.is_empty() {
            for key in &query.project_keys {
                if let Ok(index) = self.project_index_for_key(key) {
                    push_project(index, 20);
                }
            }
        } else if !query.account_ids.is_empty() {
            for index in 0..20.min(self.years().total_projects()) {
                push_project(index, 5);
            }
        } else {
            for index in 0..10.min(self.years().total_projects()) {
                push_project(index, 3);
            }
        }
        keys
    }

    /// Generated worklogs matching a query, newest first, unpaginated.
    pub fn search_worklogs(&self, query: &WorklogQuery) -> Vec<Worklog> {
        let mut hits: Vec<Worklog> = self
            .worklog_candidates(query)
            .iter()
            .filter_map(|key| self.worklogs_for_issue(key).ok())
            .flatten()
            .filter(|w| query.matches(w))
            .collect();
        hits.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.tempo_worklog_id.cmp(&b.tempo_worklog_id)));
        hits
    }

    /// Capacity plans for one user, ordered by start date.
    pub fn plans_for_user(&self, user_index: u64) -> Vec<Plan> {
        let cfg = self.config();
        let user_index = user_index % cfg.num_users;
        let assignee = self.tempo_user(user_index);

        let mut s = self.stream(&format!("plans-user-{user_index}"));
        let count = s.range_inclusive(cfg.plans_per_user_min, cfg.plans_per_user_max);
        let year_span = (cfg.current_year - cfg.start_year + 1) as u64;
        let project_pool = 50.min(self.years().total_projects());

        let mut plans = Vec::with_capacity(count as usize);
        for i in 0..count {
            let mut p = self.stream(&format!("plan-user-{user_index}-{i}"));
            let start = ymd(
                cfg.start_year + p.below(year_span) as i32,
                p.below(12) as u32 + 1,
                1,
            );
            let months = p.range_inclusive(1, 6);
            let end = start + Months::new(months as u32) - Days::new(1);
            let seconds_per_day = *p.pick(&SECONDS_PER_DAY_CHOICES) * 3600;

            let project_index = p.below(project_pool);
            let project_key = self.project_key_for(project_index);
            let id = (100_000 + p.below(900_000)) as i64;

            plans.push(Plan {
                id,
                start_date: start,
                end_date: end,
                seconds_per_day,
                include_non_working_days: false,
                description: format!("Planned work on {project_key}"),
                created_at: midnight(start),
                updated_at: midnight(start),
                plan_item: PlanItem {
                    id: 10_000 + project_index as i64,
                    item_type: "PROJECT".to_string(),
                    self_url: format!("/rest/api/3/project/{project_key}"),
                },
                assignee: assignee.clone(),
                plan_approval: PlanApproval {
                    status: p.pick(&PLAN_APPROVALS).to_string(),
                },
                self_url: format!("/4/plans/{id}"),
            });
        }

        plans.sort_by_key(|p| p.start_date);
        plans
    }

    /// Plans for a set of assignees overlapping a date range, unpaginated.
    pub fn search_plans(
        &self,
        assignee_ids: &[String],
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<Plan> {
        let indices: Vec<u64> = if assignee_ids.is_empty() {
            (0..50.min(self.config().num_users)).collect()
        } else {
            assignee_ids
                .iter()
                .filter_map(|id| self.user_by_account_id(id).ok())
                .filter_map(|u| u.account_id.strip_prefix("user-")?.parse().ok())
                .collect()
        };

        let mut plans: Vec<Plan> = indices
            .into_iter()
            .flat_map(|i| self.plans_for_user(i))
            .filter(|p| {
                from.map_or(true, |from| p.end_date >= from)
                    && to.map_or(true, |to| p.start_date <= to)
            })
            .collect();
        plans.sort_by_key(|p| (p.start_date, p.id));
        plans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenConfig;

    fn generator() -> Generator {
        Generator::new(GenConfig::default())
    }

    #[test]
    fn teams_rotate_through_the_definition_table() {
        let g = generator();
        assert_eq!(g.team_at(0).name, "IT Portfolio Management");
        assert_eq!(g.team_at(20).name, "IT Portfolio Management 2");
        assert_eq!(g.teams().len(), 20);
        assert!(g.team_by_id(0).is_err());
        assert!(g.team_by_id(21).is_err());
        assert_eq!(g.team_by_id(1).unwrap(), g.team_at(0));
    }

    #[test]
    fn team_members_start_with_the_lead_and_never_repeat() {
        let g = generator();
        let team = g.team_by_id(1).unwrap();
        let members = g.team_members(1).unwrap();

        assert!(members.len() >= 15);
        assert_eq!(members[0].member, team.lead);
        assert_eq!(members[0].membership.commitment_percent, 100);
        assert_eq!(members[0].membership.role.name, "Lead");

        let mut ids: Vec<&str> = members.iter().map(|m| m.member.account_id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), members.len());
    }

    #[test]
    fn account_catalog_covers_all_three_families() {
        let g = generator();
        let accounts = g.accounts();
        assert_eq!(accounts.len(), 9 + 15 + 8);

        assert!(accounts.iter().any(|a| a.key == "WS-RUN-THE-BUSINESS"));
        assert!(accounts.iter().any(|a| a.key == "PROJ-ITPM"));
        let pto = g.account_by_key("OVERHEAD-PTO").unwrap();
        assert!(pto.monthly_budget.is_none());
        assert_eq!(pto.category.category_type.name, "NON_BILLABLE");

        let by_id = g.account_by_key("1").unwrap();
        assert_eq!(by_id.id, 1);
        assert!(g.account_by_key("NOPE").is_err());
    }

    #[test]
    fn worklogs_stay_inside_the_issue_envelope() {
        let g = generator();
        let env = g.envelope("ITPM-1", 0);
        let worklogs = g.worklogs_for_issue("ITPM-1").unwrap();

        assert!((30..=50).contains(&(worklogs.len() as u64)));
        for w in &worklogs {
            assert!(w.start_date >= env.start, "{w:?}");
            assert!(!matches!(
                w.start_date.weekday(),
                Weekday::Sat | Weekday::Sun
            ));
            assert!(w.billable_seconds <= w.time_spent_seconds);
            assert!(w.billable_seconds as f64 >= w.time_spent_seconds as f64 * 0.79);
            assert_eq!(w.attributes[0].key, "_Account_");
        }

        // Newest first.
        for pair in worklogs.windows(2) {
            assert!(pair[0].start_date >= pair[1].start_date);
        }
    }

    #[test]
    fn worklogs_are_deterministic_across_generators() {
        let a = generator().worklogs_for_issue("PROD-100").unwrap();
        let b = generator().worklogs_for_issue("PROD-100").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn worklog_authors_come_from_the_issue_pool() {
        let g = generator();
        let roles_key = "ITPM-1";
        let issue = g.issue_by_key(roles_key).unwrap();
        let mut pool: Vec<String> = vec![
            issue.fields.assignee.account_id.clone(),
            issue.fields.reporter.account_id.clone(),
        ];
        pool.extend(issue.fields.it_owners.iter().map(|u| u.account_id.clone()));

        let worklogs = g.worklogs_for_issue(roles_key).unwrap();
        let from_pool = worklogs
            .iter()
            .filter(|w| pool.contains(&w.author.account_id))
            .count();
        // The pool holds the named roles plus five random users, so named
        // roles should author a solid share of entries.
        assert!(from_pool > 0);
    }

    #[test]
    fn worklog_search_filters_by_issue_and_author() {
        let g = generator();
        let by_issue = g.search_worklogs(&WorklogQuery {
            issue_keys: vec!["ITPM-1".to_string()],
            ..Default::default()
        });
        assert!(!by_issue.is_empty());
        assert!(by_issue.iter().all(|w| w.issue.key == "ITPM-1"));

        let author = by_issue[0].author.account_id.clone();
        let by_author = g.search_worklogs(&WorklogQuery {
            issue_keys: vec!["ITPM-1".to_string()],
            account_ids: vec![author.clone()],
            ..Default::default()
        });
        assert!(!by_author.is_empty());
        assert!(by_author.iter().all(|w| w.author.account_id == author));
    }

    #[test]
    fn worklog_search_for_unknown_issue_is_empty() {
        let g = generator();
        let hits = g.search_worklogs(&WorklogQuery {
            issue_keys: vec!["ZZZZ-1".to_string()],
            ..Default::default()
        });
        assert!(hits.is_empty());
    }

    #[test]
    fn plans_are_bounded_and_deterministic() {
        let g = generator();
        let plans = g.plans_for_user(7);
        assert!((2..=6).contains(&(plans.len() as u64)));
        assert_eq!(plans, generator().plans_for_user(7));

        for p in &plans {
            assert!(p.start_date <= p.end_date);
            assert_eq!(p.seconds_per_day % 3600, 0);
            assert_eq!(p.assignee.account_id, "user-000007");
        }
    }

    #[test]
    fn plan_search_respects_the_date_overlap() {
        let g = generator();
        let user = g.user_at(3);
        let all = g.search_plans(&[user.account_id.clone()], None, None);
        assert!(!all.is_empty());

        let from = ymd(2031, 1, 1);
        let none = g.search_plans(&[user.account_id], Some(from), None);
        assert!(none.iter().all(|p| p.end_date >= from));
    }
}
