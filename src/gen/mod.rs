//! The deterministic data engine.
//!
//! Everything the two services serve is a pure function of
//! `(GenConfig, index)`: nothing is materialized up front and nothing is
//! stored. A [`Generator`] owns the year planner and per-process memoization
//! caches; two generators built from equal configs produce identical
//! entities, which is what lets the jira and tempo services agree without
//! ever talking to each other.

pub mod catalog;
mod entities;
mod issues;
mod query;
mod status;
pub mod stream;
mod tempo;
pub mod years;

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::config::GenConfig;
use crate::gen::stream::DataStream;
use crate::gen::years::YearPlanner;
use crate::models::jira::{Project, User};
use crate::models::tempo::Account;

pub use issues::{transitions_from_status, Envelope};
pub use query::{DatasetStats, SearchFilter, SearchResult, Window, YearStats};
pub use tempo::WorklogQuery;

pub struct Generator {
    config: GenConfig,
    years: YearPlanner,
    // Read-through caches. Entries are write-once-per-key and idempotent: a
    // race to populate the same key does redundant work but never diverges.
    users: RwLock<HashMap<u64, User>>,
    projects: RwLock<HashMap<u64, Project>>,
    accounts: OnceLock<Vec<Account>>,
}

impl Generator {
    pub fn new(config: GenConfig) -> Self {
        let years = YearPlanner::new(&config);
        Self {
            config,
            years,
            users: RwLock::new(HashMap::new()),
            projects: RwLock::new(HashMap::new()),
            accounts: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    pub fn years(&self) -> &YearPlanner {
        &self.years
    }

    /// Derive an isolated stream for one aspect of one entity.
    pub(crate) fn stream(&self, discriminator: &str) -> DataStream {
        DataStream::derive(&self.config.seed, discriminator)
    }
}
