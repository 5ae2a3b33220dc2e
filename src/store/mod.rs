//! Mutation overlay for the otherwise pure dataset.
//!
//! The generator never changes; edits made through the write endpoints land
//! here as keyed patches and created records, and the API merges them over
//! generated values as the final step. State lives in memory behind a mutex
//! and is mirrored to a JSON snapshot on every mutation, so a restarted
//! service picks up where it left off.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::tempo::Worklog;

fn first_created_issue_number() -> u64 {
    50_000
}

fn first_created_worklog_id() -> i64 {
    900_000_000
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    /// Issue key → shallow field patch over the generated record.
    issue_patches: BTreeMap<String, Value>,
    /// Issue key → full created-record JSON.
    created_issues: BTreeMap<String, Value>,
    created_worklogs: Vec<Worklog>,
    #[serde(default = "first_created_issue_number")]
    next_issue_number: u64,
    #[serde(default = "first_created_worklog_id")]
    next_worklog_id: i64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            issue_patches: BTreeMap::new(),
            created_issues: BTreeMap::new(),
            created_worklogs: Vec::new(),
            next_issue_number: first_created_issue_number(),
            next_worklog_id: first_created_worklog_id(),
        }
    }
}

#[derive(Clone)]
pub struct OverrideStore {
    inner: Arc<Mutex<Snapshot>>,
    path: Option<PathBuf>,
}

impl OverrideStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let snapshot = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    tracing::warn!(?path, %error, "override snapshot unreadable, starting fresh");
                    Snapshot::default()
                }
            },
            Err(_) => Snapshot::default(),
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(snapshot)),
            path: Some(path),
        })
    }

    /// Snapshot under the platform data directory, one file per service so
    /// the two processes never contend for the same snapshot.
    pub fn open_default(service: &str) -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "tracksim")
            .ok_or_else(|| anyhow::anyhow!("could not determine data directory"))?;
        Self::open(dirs.data_dir().join(format!("{service}-overrides.json")))
    }

    /// Memory-only store for tests; nothing is ever written to disk.
    pub fn open_memory() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Snapshot::default())),
            path: None,
        }
    }

    fn flush(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(path) = &self.path {
            std::fs::write(path, serde_json::to_vec_pretty(snapshot)?)?;
        }
        Ok(())
    }

    pub fn issue_patch(&self, key: &str) -> Option<Value> {
        self.inner
            .lock()
            .expect("override store lock poisoned")
            .issue_patches
            .get(key)
            .cloned()
    }

    /// Record a field patch for a generated issue. Repeated patches to the
    /// same key merge shallowly, last writer wins per field.
    pub fn patch_issue(&self, key: &str, patch: Value) -> Result<()> {
        let mut snapshot = self.inner.lock().expect("override store lock poisoned");
        let entry = snapshot
            .issue_patches
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
        merge_fields(entry, &patch);
        self.flush(&snapshot)
    }

    pub fn created_issue(&self, key: &str) -> Option<Value> {
        self.inner
            .lock()
            .expect("override store lock poisoned")
            .created_issues
            .get(key)
            .cloned()
    }

    /// Store a user-created issue under the next free sequence number for
    /// the project. Returns the full record as it will be served.
    pub fn insert_issue(&self, project_key: &str, fields: Value) -> Result<Value> {
        let mut snapshot = self.inner.lock().expect("override store lock poisoned");
        let number = snapshot.next_issue_number;
        snapshot.next_issue_number += 1;

        let key = format!("{project_key}-{number}");
        let issue = serde_json::json!({
            "id": number.to_string(),
            "key": key.clone(),
            "self": format!("/rest/api/3/issue/{key}"),
            "fields": fields,
        });
        snapshot.created_issues.insert(key, issue.clone());
        self.flush(&snapshot)?;
        Ok(issue)
    }

    /// Merge a patch into a created record's fields. False when the key
    /// holds no created record.
    pub fn patch_created_issue(&self, key: &str, patch: &Value) -> Result<bool> {
        let mut snapshot = self.inner.lock().expect("override store lock poisoned");
        let Some(issue) = snapshot.created_issues.get_mut(key) else {
            return Ok(false);
        };
        if let Some(fields) = issue.get_mut("fields") {
            merge_fields(fields, patch);
        }
        self.flush(&snapshot)?;
        Ok(true)
    }

    pub fn created_worklogs(&self) -> Vec<Worklog> {
        self.inner
            .lock()
            .expect("override store lock poisoned")
            .created_worklogs
            .clone()
    }

    pub fn worklog(&self, id: i64) -> Option<Worklog> {
        self.inner
            .lock()
            .expect("override store lock poisoned")
            .created_worklogs
            .iter()
            .find(|w| w.tempo_worklog_id == id)
            .cloned()
    }

    /// Store a created worklog, assigning it the next id.
    pub fn insert_worklog(&self, mut worklog: Worklog) -> Result<Worklog> {
        let mut snapshot = self.inner.lock().expect("override store lock poisoned");
        let id = snapshot.next_worklog_id;
        snapshot.next_worklog_id += 1;

        worklog.tempo_worklog_id = id;
        worklog.jira_worklog_id = id;
        worklog.self_url = format!("/4/worklogs/{id}");
        snapshot.created_worklogs.push(worklog.clone());
        self.flush(&snapshot)?;
        Ok(worklog)
    }

    pub fn stats(&self) -> StoreStats {
        let snapshot = self.inner.lock().expect("override store lock poisoned");
        StoreStats {
            issue_patches: snapshot.issue_patches.len(),
            created_issues: snapshot.created_issues.len(),
            created_worklogs: snapshot.created_worklogs.len(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub issue_patches: usize,
    pub created_issues: usize,
    pub created_worklogs: usize,
}

/// Shallow merge: top-level fields of `patch` replace those of `base`.
/// Nested objects are replaced wholesale, matching reference behavior.
pub fn merge_fields(base: &mut Value, patch: &Value) {
    let (Value::Object(base), Value::Object(patch)) = (base, patch) else {
        return;
    };
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    use crate::models::tempo::{TempoUser, WorklogIssue};

    fn sample_worklog() -> Worklog {
        Worklog {
            tempo_worklog_id: 0,
            jira_worklog_id: 0,
            issue: WorklogIssue {
                id: 100_001,
                key: "ITPM-1".to_string(),
                self_url: "/rest/api/3/issue/ITPM-1".to_string(),
            },
            time_spent_seconds: 3600,
            billable_seconds: 3600,
            start_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            start_time: "09:00:00".to_string(),
            description: "Development work".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author: TempoUser {
                account_id: "user-000001".to_string(),
                display_name: "Test User".to_string(),
                self_url: "/rest/api/3/user?accountId=user-000001".to_string(),
            },
            attributes: Vec::new(),
            self_url: String::new(),
        }
    }

    #[test]
    fn patches_merge_shallowly() {
        let store = OverrideStore::open_memory();
        store
            .patch_issue("ITPM-1", json!({"summary": "first", "labels": ["a"]}))
            .unwrap();
        store.patch_issue("ITPM-1", json!({"summary": "second"})).unwrap();

        let patch = store.issue_patch("ITPM-1").unwrap();
        assert_eq!(patch["summary"], "second");
        assert_eq!(patch["labels"], json!(["a"]));
        assert!(store.issue_patch("ITPM-2").is_none());
    }

    #[test]
    fn created_issues_get_sequential_keys() {
        let store = OverrideStore::open_memory();
        let first = store.insert_issue("ITPM", json!({"summary": "one"})).unwrap();
        let second = store.insert_issue("PROD", json!({"summary": "two"})).unwrap();

        assert_eq!(first["key"], "ITPM-50000");
        assert_eq!(second["key"], "PROD-50001");
        assert_eq!(store.created_issue("ITPM-50000").unwrap()["fields"]["summary"], "one");

        assert!(store
            .patch_created_issue("ITPM-50000", &json!({"summary": "edited"}))
            .unwrap());
        assert_eq!(
            store.created_issue("ITPM-50000").unwrap()["fields"]["summary"],
            "edited"
        );
        assert!(!store.patch_created_issue("ITPM-1", &json!({})).unwrap());
    }

    #[test]
    fn worklog_ids_are_assigned_by_the_store() {
        let store = OverrideStore::open_memory();
        let a = store.insert_worklog(sample_worklog()).unwrap();
        let b = store.insert_worklog(sample_worklog()).unwrap();

        assert_eq!(a.tempo_worklog_id, 900_000_000);
        assert_eq!(b.tempo_worklog_id, 900_000_001);
        assert_eq!(store.worklog(a.tempo_worklog_id).unwrap(), a);
        assert!(store.worklog(1).is_none());
        assert_eq!(store.created_worklogs().len(), 2);
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");

        {
            let store = OverrideStore::open(path.clone()).unwrap();
            store.patch_issue("ITPM-1", json!({"summary": "edited"})).unwrap();
            store.insert_issue("ITPM", json!({"summary": "new"})).unwrap();
            store.insert_worklog(sample_worklog()).unwrap();
        }

        let reopened = OverrideStore::open(path).unwrap();
        assert_eq!(reopened.issue_patch("ITPM-1").unwrap()["summary"], "edited");
        assert!(reopened.created_issue("ITPM-50000").is_some());
        assert_eq!(reopened.created_worklogs().len(), 1);
        // Counters resume past what was handed out.
        let next = reopened.insert_issue("ITPM", json!({})).unwrap();
        assert_eq!(next["key"], "ITPM-50001");
    }

    #[test]
    fn corrupt_snapshot_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = OverrideStore::open(path).unwrap();
        assert_eq!(store.stats().issue_patches, 0);
    }

    #[test]
    fn merge_replaces_nested_objects_wholesale() {
        let mut base = json!({"status": {"name": "Open"}, "summary": "s"});
        merge_fields(&mut base, &json!({"status": {"name": "Done"}}));
        assert_eq!(base["status"]["name"], "Done");
        assert_eq!(base["summary"], "s");
    }
}
