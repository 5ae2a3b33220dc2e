//! Deterministic mock Jira/Tempo services.
//!
//! A large, realistic project-tracking dataset is derived lazily from a
//! seed: nothing is stored, every record is a pure function of the
//! configuration and an index. Two HTTP services — one shaped like the
//! Jira REST API, one like the Tempo API — serve views of the same
//! dataset and agree with each other because they share this library.

pub mod api;
pub mod config;
pub mod error;
pub mod gen;
pub mod models;
pub mod store;
