//! Mock label store implementing the LabelStore trait
//!
//! Keeps labels in memory, seeded from `remote.json`, and writes every
//! successful mutation back to the fixture.

use crate::failures::{Failures, MockError};
use chrono::{DateTime, Utc};
use label_core::{
    LabelDefinition, LabelName, LabelStore, LabelUpdate, RemoteLabel, Result, StoreError,
};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

const REMOTE_FILE: &str = "remote.json";
const FAILURES_FILE: &str = "failures.toml";
const CALL_LOG_FILE: &str = "call_log.jsonl";

/// A label as stored in `remote.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureLabel {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&RemoteLabel> for FixtureLabel {
    fn from(label: &RemoteLabel) -> Self {
        Self {
            name: label.name.to_string(),
            color: label
                .color
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            description: label.description.as_ref().map(|d| d.to_string()),
        }
    }
}

/// A single call log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogEntry {
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,

    /// LabelStore method name
    pub method: String,

    /// Label the call targeted, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Error message (if call failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Simulated response status code
    pub status: u16,

    /// Duration in milliseconds
    pub duration_ms: u64,
}

pub struct MockLabelStore {
    /// Scenario directory; `None` for a purely in-memory store
    scenario_dir: Option<PathBuf>,

    labels: Mutex<Vec<RemoteLabel>>,

    failures: Failures,

    /// Call log file writer
    log_writer: Mutex<Option<BufWriter<File>>>,

    calls: AtomicUsize,
}

impl MockLabelStore {
    /// Load a scenario directory
    pub fn new(scenario_dir: impl AsRef<Path>) -> std::result::Result<Self, MockError> {
        let scenario_dir = scenario_dir.as_ref().to_path_buf();

        let remote_path = scenario_dir.join(REMOTE_FILE);
        let labels = if remote_path.exists() {
            load_fixture(&remote_path)?
        } else {
            Vec::new()
        };

        let failures_path = scenario_dir.join(FAILURES_FILE);
        let failures = if failures_path.exists() {
            Failures::load(&failures_path)?
        } else {
            Failures::default()
        };

        // Open call log file
        let log_writer = OpenOptions::new()
            .create(true)
            .append(true)
            .open(scenario_dir.join(CALL_LOG_FILE))
            .ok()
            .map(BufWriter::new);

        Ok(Self {
            scenario_dir: Some(scenario_dir),
            labels: Mutex::new(labels),
            failures,
            log_writer: Mutex::new(log_writer),
            calls: AtomicUsize::new(0),
        })
    }

    /// A store that lives only in memory (no fixture, no call log)
    pub fn in_memory(labels: Vec<RemoteLabel>) -> Self {
        Self {
            scenario_dir: None,
            labels: Mutex::new(labels),
            failures: Failures::default(),
            log_writer: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failures(mut self, failures: Failures) -> Self {
        self.failures = failures;
        self
    }

    /// Snapshot of the current labels
    pub fn labels(&self) -> Vec<RemoteLabel> {
        self.state().map(|labels| labels.clone()).unwrap_or_default()
    }

    /// Get total number of calls made
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Get the call log entries
    pub fn read_call_log(&self) -> Vec<CallLogEntry> {
        let Some(dir) = &self.scenario_dir else {
            return Vec::new();
        };
        let content = std::fs::read_to_string(dir.join(CALL_LOG_FILE)).unwrap_or_default();

        content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    fn state(&self) -> Result<MutexGuard<'_, Vec<RemoteLabel>>> {
        self.labels
            .lock()
            .map_err(|_| StoreError::Io("mock label state is poisoned".to_string()))
    }

    /// Run one store call: apply failure rules, then the operation, then log it
    fn call<T>(
        &self,
        method: &str,
        label: Option<&str>,
        mutates: bool,
        op: impl FnOnce(&mut Vec<RemoteLabel>) -> Result<T>,
    ) -> Result<T> {
        let start = Instant::now();
        self.calls.fetch_add(1, Ordering::SeqCst);

        let result = match self.failures.find(method, label.unwrap_or("")) {
            Some(rule) if rule.status == 401 => Err(StoreError::Unauthorized),
            Some(rule) => Err(StoreError::Api {
                status: rule.status,
                message: rule.message(),
            }),
            None => self.state().and_then(|mut labels| {
                let value = op(&mut *labels)?;
                if mutates {
                    self.persist(&labels)?;
                }
                Ok(value)
            }),
        };

        let status = match &result {
            Ok(_) => 200,
            Err(StoreError::Api { status, .. }) => *status,
            Err(StoreError::NotFound(_)) => 404,
            Err(StoreError::Unauthorized) => 401,
            Err(_) => 500,
        };
        let error = result.as_ref().err().map(|e| e.to_string());
        self.log_call(method, label, error, status, start);

        result
    }

    fn persist(&self, labels: &[RemoteLabel]) -> Result<()> {
        let Some(dir) = &self.scenario_dir else {
            return Ok(());
        };
        let fixture: Vec<FixtureLabel> = labels.iter().map(FixtureLabel::from).collect();
        let json = serde_json::to_string_pretty(&fixture)
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        std::fs::write(dir.join(REMOTE_FILE), json)
            .map_err(|e| StoreError::Io(format!("Failed to write mock state: {}", e)))
    }

    /// Log a call to the call log file
    fn log_call(
        &self,
        method: &str,
        label: Option<&str>,
        error: Option<String>,
        status: u16,
        start: Instant,
    ) {
        let entry = CallLogEntry {
            timestamp: Utc::now(),
            method: method.to_string(),
            label: label.map(String::from),
            error,
            status,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if let Ok(mut writer) = self.log_writer.lock() {
            if let Some(w) = writer.as_mut() {
                if let Ok(json) = serde_json::to_string(&entry) {
                    let _ = writeln!(w, "{}", json);
                    let _ = w.flush();
                }
            }
        }
    }
}

fn load_fixture(path: &Path) -> std::result::Result<Vec<RemoteLabel>, MockError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| MockError::Io(path.to_path_buf(), e))?;
    let fixture: Vec<FixtureLabel> = serde_json::from_str(&content)
        .map_err(|e| MockError::Parse(path.to_path_buf(), e.to_string()))?;

    fixture
        .iter()
        .map(|l| {
            RemoteLabel::new(&l.name, &l.color, l.description.as_deref())
                .map_err(|e| MockError::InvalidLabel(path.to_path_buf(), e))
        })
        .collect()
}

fn position(labels: &[RemoteLabel], name: &LabelName) -> Option<usize> {
    labels.iter().position(|l| l.name == *name)
}

fn already_exists(name: &LabelName) -> StoreError {
    StoreError::Api {
        status: 422,
        message: format!("Label \"{}\" already exists", name),
    }
}

impl LabelStore for MockLabelStore {
    fn list_labels(&self) -> Result<Vec<RemoteLabel>> {
        self.call("list_labels", None, false, |labels| Ok(labels.clone()))
    }

    fn get_label(&self, name: &LabelName) -> Result<Option<RemoteLabel>> {
        self.call("get_label", Some(name.as_str()), false, |labels| {
            Ok(position(labels, name).map(|i| labels[i].clone()))
        })
    }

    fn create_label(&self, label: &LabelDefinition) -> Result<RemoteLabel> {
        self.call("create_label", Some(label.name.as_str()), true, |labels| {
            if position(labels, &label.name).is_some() {
                return Err(already_exists(&label.name));
            }
            let created = RemoteLabel {
                name: label.name.clone(),
                color: Some(label.color.clone()),
                description: label.description.clone(),
            };
            labels.push(created.clone());
            Ok(created)
        })
    }

    fn update_label(&self, current_name: &LabelName, update: &LabelUpdate) -> Result<RemoteLabel> {
        self.call("update_label", Some(current_name.as_str()), true, |labels| {
            let index = position(labels, current_name)
                .ok_or_else(|| StoreError::NotFound(current_name.to_string()))?;

            if let Some(new_name) = &update.new_name {
                // Renaming onto a different existing label is a conflict
                if let Some(other) = position(labels, new_name) {
                    if other != index {
                        return Err(already_exists(new_name));
                    }
                }
            }

            let label = &mut labels[index];
            if let Some(new_name) = &update.new_name {
                label.name = new_name.clone();
            }
            label.color = Some(update.color.clone());
            label.description = update.description.clone();
            Ok(label.clone())
        })
    }

    fn delete_label(&self, name: &LabelName) -> Result<()> {
        self.call("delete_label", Some(name.as_str()), true, |labels| {
            let index =
                position(labels, name).ok_or_else(|| StoreError::NotFound(name.to_string()))?;
            labels.remove(index);
            Ok(())
        })
    }
}
