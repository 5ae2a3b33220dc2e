//! Issue realization.
//!
//! An issue is addressed by `(project_index, sequence)` and every field is
//! derived from per-aspect streams keyed by the issue key, so realizing one
//! aspect (say, worklogs reading the date envelope) never disturbs another.
//!
//! Sequence convention within a project:
//!   1           the initiative
//!   100..       epics, bounded by the project's epic count
//!   10000..     tasks
//! Everything else is out of range and reported as unknown.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, Utc};

use crate::error::{Error, Result};
use crate::gen::catalog::{
    issue_type_named, status_named, transition_targets, BUZZ_ADJECTIVES, BUZZ_NOUNS, BUZZ_VERBS,
    CAPITAL_EXPENSE_OPTIONS, LABELS, PRIORITIES, WORKSTREAMS,
};
use crate::gen::status::{assign_status, health_for};
use crate::gen::Generator;
use crate::models::jira::{
    Issue, IssueFields, IssueKind, OptionValue, ParentFields, ParentRef, ProjectRef, Transition,
};

/// Lowest epic sequence number.
pub const EPIC_SEQ_BASE: u64 = 100;
/// Lowest task sequence number.
pub const TASK_SEQ_BASE: u64 = 10_000;
/// Sequences at or beyond this would collide with the next project's id
/// space.
const SEQ_LIMIT: u64 = 100_000;

/// The temporal span of an issue. `created <= start <= end` always holds,
/// even when the sampled span would have run past its final calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub created: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub updated: NaiveDate,
    pub inservice: NaiveDate,
    /// Calendar year the owning project belongs to.
    pub fiscal_year: i32,
    pub end_year: i32,
    pub is_multi_year: bool,
}

pub(crate) struct RoleDraw {
    pub priority_index: usize,
    pub assignee: u64,
    pub reporter: u64,
    pub it_owners: Vec<u64>,
    pub champions: Vec<u64>,
}

pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("in-range calendar date")
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl Generator {
    /// Years the project at `index` spans, 1..=3. Multi-year projects are a
    /// configured fraction; the rest are single-year.
    pub fn duration_years(&self, project_index: u64) -> i32 {
        let multi = self
            .stream(&format!("project-{project_index}-multiyear"))
            .chance(self.config().multi_year_percentage);
        if !multi {
            return 1;
        }
        self.stream(&format!("project-{project_index}-duration"))
            .range_inclusive(1, 3) as i32
    }

    /// Epics owned by a project, scaled by its year's activity factor.
    pub fn epic_count_for(&self, project_index: u64) -> u64 {
        let year = self.years().year_for(project_index);
        let scale = self
            .years()
            .slot(year)
            .map(|slot| slot.scale)
            .unwrap_or(1.0);
        let lo = (self.config().epics_per_project_min as f64 * scale).round() as u64;
        let hi = (self.config().epics_per_project_max as f64 * scale).round() as u64;
        self.stream(&format!("project-{project_index}-epic-count"))
            .range_inclusive(lo.min(hi), hi.max(lo))
    }

    /// Realize the date envelope for one issue key.
    pub fn envelope(&self, key: &str, project_index: u64) -> Envelope {
        let fiscal_year = self.years().year_for(project_index);
        let duration = self.duration_years(project_index);
        let end_year = (fiscal_year + duration - 1).min(self.config().current_year);
        let is_multi_year = end_year > fiscal_year;

        let mut s = self.stream(&format!("{key}/dates"));
        let created = ymd(fiscal_year, s.below(12) as u32 + 1, 1) + Days::new(s.below(28));
        let start = created + Days::new(s.below(30));

        let months = if is_multi_year {
            let span = (end_year - fiscal_year + 1) as u64 * 12;
            3 + s.below(span - 3)
        } else {
            1 + s.below(11)
        };
        let mut end = start + Months::new(months as u32);

        // Pull overruns back inside the final year, then restore ordering;
        // the clamp can otherwise land before a late-December start.
        let ceiling = ymd(end_year, 12, 31);
        if end > ceiling {
            end = ceiling - Days::new(s.below(30));
        }
        let start = start.min(end);
        let created = created.min(start);

        let updated = (end - Days::new(s.below(30))).max(created);
        let inservice = end + Days::new(s.below(30));

        Envelope {
            created,
            start,
            end,
            updated,
            inservice,
            fiscal_year,
            end_year,
            is_multi_year,
        }
    }

    pub(crate) fn role_draw(&self, key: &str) -> RoleDraw {
        let users = self.config().num_users;
        let mut s = self.stream(&format!("{key}/roles"));
        let priority_index = s.below(PRIORITIES.len() as u64) as usize;
        let assignee = s.below(users);
        let reporter = s.below(users);
        let it_owners = (0..s.range_inclusive(1, 3)).map(|_| s.below(users)).collect();
        let champions = (0..s.range_inclusive(1, 2)).map(|_| s.below(users)).collect();
        RoleDraw {
            priority_index,
            assignee,
            reporter,
            it_owners,
            champions,
        }
    }

    fn labels_for(&self, key: &str, env: &Envelope) -> Vec<String> {
        let mut s = self.stream(&format!("{key}/labels"));
        let mut labels: Vec<String> = (0..s.below(4))
            .map(|_| s.pick(&LABELS).to_string())
            .collect();
        labels.push(format!("fy{}", env.fiscal_year));
        if env.is_multi_year {
            labels.push("multi-year".to_string());
            labels.push(format!("fy{}", env.end_year));
        }
        labels.dedup_in_order();
        labels
    }

    fn summary_for(&self, key: &str, kind: IssueKind, env: &Envelope) -> String {
        let mut s = self.stream(&format!("{key}/summary"));
        let verb = *s.pick(&BUZZ_VERBS);
        let adjective = s.pick(&BUZZ_ADJECTIVES).to_lowercase();
        let noun = *s.pick(&BUZZ_NOUNS);
        let phrase = format!("{verb} the {adjective} {noun}");
        match kind {
            IssueKind::Initiative if env.is_multi_year => {
                format!("[FY{}-{}] {phrase}", env.fiscal_year, env.end_year)
            }
            IssueKind::Initiative => format!("[FY{}] {phrase}", env.fiscal_year),
            IssueKind::Epic => format!("Epic: {phrase}"),
            IssueKind::Task => phrase,
        }
    }

    pub(crate) fn issue_id(&self, project_index: u64, seq: u64) -> u64 {
        100_000 + project_index * SEQ_LIMIT + seq
    }

    /// Abbreviated parent embedded in child issues. Fields mirror what a
    /// full realization of the parent would produce.
    fn parent_ref(&self, project_index: u64, seq: u64, kind: IssueKind) -> ParentRef {
        let key = format!("{}-{seq}", self.project_key_for(project_index));
        let env = self.envelope(&key, project_index);
        let historical = env.end_year < self.config().current_year;
        let mut status_stream = self.stream(&format!("{key}/status"));
        let status = assign_status(historical, &mut status_stream);
        let type_name = match kind {
            IssueKind::Initiative => "Initiative",
            IssueKind::Epic => "Epic",
            IssueKind::Task => "Task",
        };
        ParentRef {
            id: self.issue_id(project_index, seq).to_string(),
            self_url: format!("/rest/api/3/issue/{key}"),
            fields: ParentFields {
                summary: self.summary_for(&key, kind, &env),
                status: status.clone(),
                issuetype: issue_type_named(type_name).clone(),
            },
            key,
        }
    }

    /// Realize a full issue.
    pub fn issue(&self, project_index: u64, seq: u64, kind: IssueKind) -> Issue {
        let project = self.project_at(project_index);
        let key = format!("{}-{seq}", project.key);
        let env = self.envelope(&key, project_index);

        let historical = env.end_year < self.config().current_year;
        let mut status_stream = self.stream(&format!("{key}/status"));
        let status = assign_status(historical, &mut status_stream).clone();
        let health = health_for(&status, &mut status_stream);

        let roles = self.role_draw(&key);
        let labels = self.labels_for(&key, &env);

        let mut misc = self.stream(&format!("{key}/misc"));
        let workstream = *misc.pick(&WORKSTREAMS);
        let capital = *misc.pick(&CAPITAL_EXPENSE_OPTIONS);
        let par_number = format!("PAR-{}-{:05}", env.fiscal_year, misc.below(100_000));

        let summary = self.summary_for(&key, kind, &env);
        let type_name = match kind {
            IssueKind::Initiative => "Initiative",
            IssueKind::Epic => "Epic",
            IssueKind::Task => "Task",
        };

        let parent = match kind {
            IssueKind::Initiative => None,
            IssueKind::Epic => Some(self.parent_ref(project_index, 1, IssueKind::Initiative)),
            IssueKind::Task => {
                let epics = self.epic_count_for(project_index);
                let parent_seq = EPIC_SEQ_BASE + (seq - TASK_SEQ_BASE) % epics;
                Some(self.parent_ref(project_index, parent_seq, IssueKind::Epic))
            }
        };

        Issue {
            id: self.issue_id(project_index, seq).to_string(),
            self_url: format!("/rest/api/3/issue/{key}"),
            fields: IssueFields {
                description: format!("{summary} across the {workstream} workstream."),
                summary,
                status,
                assignee: self.user_at(roles.assignee),
                reporter: self.user_at(roles.reporter),
                priority: PRIORITIES[roles.priority_index].clone(),
                issuetype: issue_type_named(type_name).clone(),
                project: ProjectRef {
                    id: project.id.clone(),
                    key: project.key.clone(),
                    name: project.name.clone(),
                    self_url: project.self_url.clone(),
                },
                created: midnight(env.created),
                updated: midnight(env.updated),
                duedate: env.end,
                labels,
                it_owners: roles.it_owners.iter().map(|&u| self.user_at(u)).collect(),
                business_champions: roles.champions.iter().map(|&u| self.user_at(u)).collect(),
                workstream: OptionValue {
                    value: workstream.to_string(),
                },
                inservice_date: env.inservice,
                start_date: env.start,
                end_date: env.end,
                par_number,
                health_status: OptionValue {
                    value: health.to_string(),
                },
                capital_expense: OptionValue {
                    value: capital.to_string(),
                },
                fiscal_year: env.fiscal_year,
                project_end_year: env.end_year,
                is_multi_year: env.is_multi_year,
                parent,
            },
            key,
        }
    }

    /// Classify a sequence number within a project, validating epic bounds.
    pub(crate) fn kind_for_sequence(&self, project_index: u64, seq: u64) -> Option<IssueKind> {
        match seq {
            1 => Some(IssueKind::Initiative),
            s if (EPIC_SEQ_BASE..TASK_SEQ_BASE).contains(&s) => {
                let epics = self.epic_count_for(project_index);
                (s < EPIC_SEQ_BASE + epics).then_some(IssueKind::Epic)
            }
            s if (TASK_SEQ_BASE..SEQ_LIMIT).contains(&s) => Some(IssueKind::Task),
            _ => None,
        }
    }

    /// Split an issue key into its project key and sequence number.
    pub(crate) fn split_issue_key(key: &str) -> Result<(&str, u64)> {
        let (project_key, digits) = key
            .rsplit_once('-')
            .ok_or_else(|| Error::UnknownIssue(key.to_string()))?;
        let seq = digits
            .parse()
            .map_err(|_| Error::UnknownIssue(key.to_string()))?;
        Ok((project_key, seq))
    }

    /// Resolve an issue key like `ITPM1-104` to the full issue.
    pub fn issue_by_key(&self, key: &str) -> Result<Issue> {
        let (project_key, seq) = Self::split_issue_key(key)?;
        let project_index = self
            .project_index_for_key(project_key)
            .map_err(|_| Error::UnknownIssue(key.to_string()))?;
        let kind = self
            .kind_for_sequence(project_index, seq)
            .ok_or_else(|| Error::UnknownIssue(key.to_string()))?;
        Ok(self.issue(project_index, seq, kind))
    }

    /// Transitions available from the issue's current workflow status.
    pub fn transitions_for(&self, key: &str) -> Result<Vec<Transition>> {
        let issue = self.issue_by_key(key)?;
        Ok(transitions_from_status(&issue.fields.status.name))
    }
}

/// Transitions offered from a given status, per the workflow table.
pub fn transitions_from_status(status_name: &str) -> Vec<Transition> {
    transition_targets(status_name)
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let to = status_named(name).clone();
            Transition {
                id: (11 + i).to_string(),
                name: to.name.clone(),
                to,
                has_screen: false,
                is_global: true,
                is_initial: false,
                is_conditional: false,
            }
        })
        .collect()
}

trait DedupInOrder {
    fn dedup_in_order(&mut self);
}

impl DedupInOrder for Vec<String> {
    fn dedup_in_order(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.retain(|label| seen.insert(label.clone()));
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
    fn envelope_ordering_always_holds() {
        let g = generator();
        for project_index in 0..500 {
            let key = format!("{}-1", g.project_key_for(project_index));
            let env = g.envelope(&key, project_index);
            assert!(env.created <= env.start, "{key}: {env:?}");
            assert!(env.start <= env.end, "{key}: {env:?}");
            assert!(env.created <= env.updated && env.updated <= env.end);
            assert!(env.end <= env.inservice);
        }
    }

    #[test]
    fn envelope_respects_year_partition() {
        use chrono::Datelike;

        let g = generator();
        for project_index in [0, 10, 2000, 5000] {
            let key = format!("{}-1", g.project_key_for(project_index));
            let env = g.envelope(&key, project_index);
            assert_eq!(env.fiscal_year, g.years().year_for(project_index));
            assert!(env.end.year() <= env.end_year);
            assert!(env.end_year <= 2026);
        }
    }

    #[test]
    fn epic_counts_scale_with_the_year() {
        let g = generator();
        for project_index in 0..50 {
            let year = g.years().year_for(project_index);
            let scale = g.years().slot(year).unwrap().scale;
            let lo = (200.0 * scale).round() as u64;
            let hi = (250.0 * scale).round() as u64;
            let count = g.epic_count_for(project_index);
            assert!(count >= lo && count <= hi, "{count} outside [{lo}, {hi}]");
            assert_eq!(count, g.epic_count_for(project_index), "stable per index");
        }
    }

    #[test]
    fn issue_realization_is_deterministic() {
        let a = generator().issue(0, 104, IssueKind::Epic);
        let b = generator().issue(0, 104, IssueKind::Epic);
        assert_eq!(a, b);
        assert_eq!(a.key, "ITPM-104");
        assert_eq!(a.fields.issuetype.name, "Epic");
    }

    #[test]
    fn initiative_summary_carries_fiscal_tags() {
        let g = generator();
        let issue = g.issue(0, 1, IssueKind::Initiative);
        assert!(issue.fields.summary.starts_with("[FY"));
        assert!(issue
            .fields
            .labels
            .contains(&format!("fy{}", issue.fields.fiscal_year)));
        if issue.fields.is_multi_year {
            assert!(issue.fields.labels.contains(&"multi-year".to_string()));
            assert!(issue
                .fields
                .labels
                .contains(&format!("fy{}", issue.fields.project_end_year)));
        }
    }

    #[test]
    fn labels_never_repeat() {
        let g = generator();
        for project_index in 0..100 {
            let issue = g.issue(project_index, 1, IssueKind::Initiative);
            let mut labels = issue.fields.labels.clone();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), issue.fields.labels.len());
        }
    }

    #[test]
    fn epics_point_at_the_initiative() {
        let g = generator();
        let epic = g.issue(3, 100, IssueKind::Epic);
        let parent = epic.fields.parent.expect("epics have a parent");
        assert_eq!(parent.key, "INFRA-1");
        assert_eq!(parent.fields.issuetype.name, "Initiative");

        let initiative = g.issue(3, 1, IssueKind::Initiative);
        assert_eq!(parent.fields.summary, initiative.fields.summary);
        assert_eq!(parent.fields.status, initiative.fields.status);
        assert!(initiative.fields.parent.is_none());
    }

    #[test]
    fn sequence_classification() {
        let g = generator();
        let epics = g.epic_count_for(0);
        assert_eq!(g.kind_for_sequence(0, 1), Some(IssueKind::Initiative));
        assert_eq!(g.kind_for_sequence(0, 100), Some(IssueKind::Epic));
        assert_eq!(
            g.kind_for_sequence(0, 100 + epics - 1),
            Some(IssueKind::Epic)
        );
        assert_eq!(g.kind_for_sequence(0, 100 + epics), None);
        assert_eq!(g.kind_for_sequence(0, 10_000), Some(IssueKind::Task));
        assert_eq!(g.kind_for_sequence(0, 2), None);
        assert_eq!(g.kind_for_sequence(0, 0), None);
    }

    #[test]
    fn issue_key_resolution() {
        let g = generator();
        let issue = g.issue_by_key("ITPM-1").unwrap();
        assert_eq!(issue.fields.issuetype.name, "Initiative");
        assert!(g.issue_by_key("ITPM-99").is_err());
        assert!(g.issue_by_key("NOPE-1").is_err());
        assert!(g.issue_by_key("garbage").is_err());
    }

    #[test]
    fn transitions_follow_the_workflow_table() {
        let g = generator();
        let issue = g.issue_by_key("ITPM-1").unwrap();
        let transitions = g.transitions_for("ITPM-1").unwrap();
        let expected = transition_targets(&issue.fields.status.name);
        let names: Vec<&str> = transitions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn health_complete_iff_done() {
        let g = generator();
        for project_index in 0..200 {
            let issue = g.issue(project_index, 1, IssueKind::Initiative);
            let done = issue.fields.status.name == "Done";
            let complete = issue.fields.health_status.value == "Complete";
            assert_eq!(done, complete, "{}", issue.key);
        }
    }
}
