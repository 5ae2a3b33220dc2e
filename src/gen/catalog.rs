//! Static catalogs backing the generated dataset.
//!
//! Order matters everywhere in this file: streams index into these tables,
//! so reordering or removing entries changes every derived entity. Append
//! only.

use std::sync::LazyLock;

use crate::models::jira::{IssueType, Priority, Status, StatusCategory};
use crate::models::tempo::{AccountCategory, AccountCategoryType, TeamRole};

/// Project key prefixes. Keys rotate through these with a numeric suffix of
/// `index / PROJECT_PREFIXES.len()`, so keys stay unique for unbounded index.
pub const PROJECT_PREFIXES: [&str; 15] = [
    "ITPM", "PROD", "RD", "INFRA", "DATA", "SEC", "OPS", "PLAT", "WEB", "MOB", "API", "SVC",
    "INT", "CRM", "ERP",
];

pub const WORKSTREAMS: [&str; 9] = [
    "Product-Value-Fit",
    "Funnel Optimization",
    "Customer Engagement",
    "Asset Portfolio",
    "Cost & Productivity",
    "Channel Expansion",
    "Fortify the Foundation",
    "Cybersecurity, Compliance, and Risk",
    "Run the Business",
];

pub const HEALTH_STATUSES: [&str; 4] = ["On Track", "At Risk", "Off Track", "Complete"];

pub const CAPITAL_EXPENSE_OPTIONS: [&str; 3] = ["Capital", "Expense", "Mixed"];

pub const LABELS: [&str; 17] = [
    "backend",
    "frontend",
    "api",
    "database",
    "security",
    "performance",
    "ux",
    "mobile",
    "cloud",
    "devops",
    "testing",
    "documentation",
    "refactoring",
    "tech-debt",
    "feature",
    "enhancement",
    "critical",
];

pub const FIRST_NAMES: [&str; 40] = [
    "Ava", "Liam", "Noah", "Emma", "Olivia", "Mason", "Sophia", "Ethan", "Isabella", "Lucas",
    "Mia", "Henry", "Amelia", "Jack", "Harper", "Owen", "Evelyn", "Caleb", "Abigail", "Wyatt",
    "Ella", "Daniel", "Scarlett", "Matthew", "Grace", "Julian", "Chloe", "Leo", "Nora", "Isaac",
    "Riley", "Gabriel", "Zoey", "Anthony", "Hannah", "Dylan", "Lily", "Nathan", "Aria", "Samuel",
];

pub const LAST_NAMES: [&str; 40] = [
    "Anderson", "Bailey", "Campbell", "Dawson", "Ellis", "Foster", "Griffin", "Hayes",
    "Ingram", "Jennings", "Keller", "Lawson", "Mitchell", "Norris", "Osborne", "Parker",
    "Quinn", "Reyes", "Sanders", "Thornton", "Underwood", "Vaughn", "Walsh", "Xiong",
    "Young", "Zimmerman", "Barrett", "Callahan", "Donovan", "Emerson", "Fitzgerald",
    "Galloway", "Harrington", "Irwin", "Jacobson", "Kennedy", "Lindqvist", "McAllister",
    "Navarro", "Ortega",
];

/// Word tables for generated project names and issue summaries.
pub const BUZZ_ADJECTIVES: [&str; 16] = [
    "Adaptive",
    "Automated",
    "Balanced",
    "Centralized",
    "Configurable",
    "Distributed",
    "Enterprise-grade",
    "Extensible",
    "Integrated",
    "Modular",
    "Proactive",
    "Resilient",
    "Scalable",
    "Seamless",
    "Streamlined",
    "Unified",
];

pub const BUZZ_NOUNS: [&str; 16] = [
    "analytics pipeline",
    "approval workflow",
    "billing engine",
    "capacity model",
    "customer portal",
    "data fabric",
    "delivery platform",
    "forecasting service",
    "identity layer",
    "integration hub",
    "knowledge base",
    "migration toolkit",
    "monitoring stack",
    "reporting suite",
    "scheduling service",
    "telemetry mesh",
];

pub const BUZZ_VERBS: [&str; 12] = [
    "Modernize",
    "Consolidate",
    "Accelerate",
    "Stabilize",
    "Instrument",
    "Migrate",
    "Harden",
    "Automate",
    "Optimize",
    "Extend",
    "Re-platform",
    "Decommission",
];

pub const WORKLOG_DESCRIPTIONS: [&str; 30] = [
    "Development work on feature implementation",
    "Code review and pull request feedback",
    "Bug investigation and fix",
    "Unit test development",
    "Integration testing",
    "Documentation updates",
    "Sprint planning session",
    "Daily standup and team sync",
    "Design review meeting",
    "Architecture discussion",
    "Backlog refinement",
    "Sprint retrospective",
    "Deployment and release activities",
    "Production monitoring",
    "Technical debt reduction",
    "Performance optimization",
    "Security review and remediation",
    "Pair programming session",
    "Mentoring and knowledge transfer",
    "Requirements gathering",
    "Stakeholder presentation",
    "Technical specification writing",
    "API design and development",
    "Database schema updates",
    "Infrastructure configuration",
    "CI/CD pipeline maintenance",
    "Incident response",
    "Root cause analysis",
    "Proof of concept development",
    "Vendor integration work",
];

/// Team definitions: display name, aligned project prefixes, summary.
/// Teams beyond this table repeat with a numeric suffix on the name.
pub const TEAM_DEFINITIONS: [(&str, &[&str], &str); 20] = [
    ("IT Portfolio Management", &["ITPM", "INT"], "IT project portfolio and integration management"),
    ("Product Engineering", &["PROD", "WEB", "MOB"], "Core product development for web and mobile"),
    ("Research & Development", &["RD"], "Innovation and R&D initiatives"),
    ("Infrastructure", &["INFRA", "OPS"], "Cloud infrastructure and operations"),
    ("Data Engineering", &["DATA"], "Data pipelines, analytics, and warehousing"),
    ("Security & Compliance", &["SEC"], "Cybersecurity and regulatory compliance"),
    ("Platform Services", &["PLAT", "API", "SVC"], "Platform, APIs, and shared services"),
    ("CRM & ERP Systems", &["CRM", "ERP"], "Enterprise systems and customer relationship management"),
    ("DevOps & SRE", &["OPS", "INFRA"], "Site reliability and DevOps practices"),
    ("Quality Assurance", &["PROD", "WEB", "MOB"], "Testing and quality engineering"),
    ("UX & Design", &["WEB", "MOB", "PROD"], "User experience and design systems"),
    ("Analytics & BI", &["DATA", "CRM"], "Business intelligence and analytics"),
    ("Integration Services", &["INT", "API", "SVC"], "System integration and middleware"),
    ("Cloud Operations", &["INFRA", "OPS", "PLAT"], "Cloud management and optimization"),
    ("Customer Success Tech", &["CRM", "SVC"], "Customer-facing technology solutions"),
    ("Enterprise Architecture", &["ITPM", "PLAT", "INT"], "Architecture governance and standards"),
    ("Mobile Development", &["MOB", "API"], "Native and cross-platform mobile apps"),
    ("Frontend Engineering", &["WEB", "PROD"], "Web frontend and UI development"),
    ("Backend Services", &["API", "SVC", "DATA"], "Backend APIs and microservices"),
    ("Performance Engineering", &["PLAT", "INFRA", "DATA"], "Performance optimization and scalability"),
];

/// Overhead/internal accounts: key, display name, category key.
pub const OVERHEAD_ACCOUNTS: [(&str, &str, &str); 8] = [
    ("OVERHEAD-PTO", "Paid Time Off", "OVERHEAD"),
    ("OVERHEAD-TRAINING", "Training & Development", "OVERHEAD"),
    ("OVERHEAD-MEETINGS", "General Meetings", "OVERHEAD"),
    ("OVERHEAD-ADMIN", "Administrative Tasks", "OVERHEAD"),
    ("OVERHEAD-SUPPORT", "Production Support", "OVERHEAD"),
    ("INTERNAL-HIRING", "Recruiting & Hiring", "INTERNAL"),
    ("INTERNAL-ONBOARD", "Onboarding", "INTERNAL"),
    ("INTERNAL-REVIEW", "Performance Reviews", "INTERNAL"),
];

fn category(id: u32, key: &str, color: &str, name: &str) -> StatusCategory {
    StatusCategory {
        id,
        key: key.to_string(),
        color_name: color.to_string(),
        name: name.to_string(),
        self_url: format!("/rest/api/3/statuscategory/{id}"),
    }
}

fn status(id: &str, name: &str, description: &str, cat: StatusCategory) -> Status {
    Status {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        status_category: cat,
        self_url: format!("/rest/api/3/status/{id}"),
    }
}

fn todo_category() -> StatusCategory {
    category(2, "new", "blue-gray", "To Do")
}

fn in_progress_category() -> StatusCategory {
    category(4, "indeterminate", "yellow", "In Progress")
}

fn done_category() -> StatusCategory {
    category(3, "done", "green", "Done")
}

/// Statuses an in-flight issue can hold. "Open" is the initial one; the
/// carried-forward band of the historical distribution excludes it.
pub static ACTIVE_STATUSES: LazyLock<Vec<Status>> = LazyLock::new(|| {
    vec![
        status("1", "Open", "Issue is open", todo_category()),
        status("2", "In Progress", "Issue is being worked on", in_progress_category()),
        status("4", "Discovery", "Issue is in discovery phase", todo_category()),
        status("5", "Planning", "Issue is being planned", in_progress_category()),
        status("6", "Development", "Issue is in development", in_progress_category()),
        status("7", "Testing", "Issue is being tested", in_progress_category()),
    ]
});

/// Full status set: active statuses followed by the terminal pair.
pub static STATUSES: LazyLock<Vec<Status>> = LazyLock::new(|| {
    let mut all = ACTIVE_STATUSES.clone();
    all.push(status("3", "Done", "Issue is completed", done_category()));
    all.push(status("8", "Cancelled", "Issue has been cancelled", done_category()));
    all
});

pub fn status_named(name: &str) -> &'static Status {
    STATUSES
        .iter()
        .find(|s| s.name == name)
        .unwrap_or_else(|| panic!("status catalog is missing {name}"))
}

/// Allowed status transitions, keyed by current status name.
pub fn transition_targets(from: &str) -> &'static [&'static str] {
    match from {
        "Open" => &["In Progress", "Discovery", "Cancelled"],
        "Discovery" => &["Planning", "Open", "Cancelled"],
        "Planning" => &["Development", "Discovery", "Cancelled"],
        "In Progress" => &["Done", "Testing", "Open"],
        "Development" => &["Testing", "Planning", "Cancelled"],
        "Testing" => &["Done", "Development", "Cancelled"],
        "Done" | "Cancelled" => &["Open"],
        _ => &["Open"],
    }
}

pub static PRIORITIES: LazyLock<Vec<Priority>> = LazyLock::new(|| {
    ["Highest", "High", "Medium", "Low", "Lowest"]
        .iter()
        .enumerate()
        .map(|(i, name)| Priority {
            id: (i + 1).to_string(),
            name: name.to_string(),
            icon_url: format!("/images/icons/priority-{}.svg", name.to_lowercase()),
            self_url: format!("/rest/api/3/priority/{}", i + 1),
        })
        .collect()
});

fn issue_type(id: &str, name: &str, description: &str, subtask: bool, level: i32) -> IssueType {
    IssueType {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon_url: format!("/images/icons/{}.svg", name.to_lowercase().replace('-', "")),
        subtask,
        hierarchy_level: level,
        self_url: format!("/rest/api/3/issuetype/{id}"),
    }
}

pub static ISSUE_TYPES: LazyLock<Vec<IssueType>> = LazyLock::new(|| {
    vec![
        issue_type("10000", "Epic", "A big user story that needs to be broken down", false, 1),
        issue_type("10001", "Initiative", "A collection of epics that together achieve a broader goal", false, 0),
        issue_type("10002", "Story", "A user story", false, 2),
        issue_type("10003", "Task", "A task that needs to be done", false, 2),
        issue_type("10004", "Bug", "A problem which impairs or prevents product functions", false, 2),
        issue_type("10005", "Sub-task", "A subtask of an issue", true, 3),
    ]
});

pub fn issue_type_named(name: &str) -> &'static IssueType {
    ISSUE_TYPES
        .iter()
        .find(|t| t.name == name)
        .unwrap_or_else(|| panic!("issue type catalog is missing {name}"))
}

pub static TEAM_ROLES: LazyLock<Vec<TeamRole>> = LazyLock::new(|| {
    [
        "Member",
        "Lead",
        "Architect",
        "Senior Developer",
        "Developer",
        "Designer",
        "QA Engineer",
        "DevOps Engineer",
        "Product Manager",
        "Scrum Master",
    ]
    .iter()
    .enumerate()
    .map(|(i, name)| TeamRole {
        id: (i + 1) as u32,
        name: name.to_string(),
        default: i == 0,
    })
    .collect()
});

pub static ACCOUNT_CATEGORIES: LazyLock<Vec<AccountCategory>> = LazyLock::new(|| {
    [
        ("WORKSTREAM", "Workstream", "BILLABLE"),
        ("PROJECT", "Project", "BILLABLE"),
        ("OVERHEAD", "Overhead", "NON_BILLABLE"),
        ("INTERNAL", "Internal", "NON_BILLABLE"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (key, name, kind))| AccountCategory {
        id: (i + 1) as u32,
        key: key.to_string(),
        name: name.to_string(),
        category_type: AccountCategoryType {
            name: kind.to_string(),
        },
    })
    .collect()
});

pub fn account_category(key: &str) -> &'static AccountCategory {
    ACCOUNT_CATEGORIES
        .iter()
        .find(|c| c.key == key)
        .unwrap_or_else(|| panic!("account category catalog is missing {key}"))
}

/// Account key for a workstream, e.g. `WS-FUNNEL-OPTIMIZATION`.
pub fn workstream_account_key(workstream: &str) -> String {
    let mut cleaned: String = workstream
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    cleaned.truncate(20);
    format!("WS-{}", cleaned.to_uppercase())
}
