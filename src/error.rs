use thiserror::Error;

/// Lookup failures surfaced to API callers as 404s.
///
/// Generation itself has no recoverable failure path: given in-range indices
/// it always terminates with a value, and anything else is a logic defect
/// that should propagate rather than be swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("project {0} does not exist")]
    UnknownProject(String),
    #[error("issue {0} does not exist")]
    UnknownIssue(String),
    #[error("user {0} does not exist")]
    UnknownUser(String),
    #[error("team {0} does not exist")]
    UnknownTeam(i64),
    #[error("account {0} does not exist")]
    UnknownAccount(String),
    #[error("worklog {0} does not exist")]
    UnknownWorklog(i64),
    #[error("plan {0} does not exist")]
    UnknownPlan(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
