//! Snapshot persistence.
//!
//! The manager persists a full snapshot after every successful mutation and reads it back once
//! at startup. [`SnapshotStore`] is the only persistence seam: [`JsonFileStore`] for the real
//! service and [`MemoryStore`] for embedding and tests.

use crate::patient::Patient;
use crate::{PatientError, PatientResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// The persisted document: every record in list order plus the id counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(deserialize_with = "deserialize_valid_patients")]
    pub patients: Vec<Patient>,
    pub next_id: u32,
    #[serde(with = "crate::timestamp")]
    pub saved_at: NaiveDateTime,
}

// Records that break a field rule are dropped one by one so the rest of the file still loads.
fn deserialize_valid_patients<'de, D>(deserializer: D) -> Result<Vec<Patient>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match serde_json::from_value::<Patient>(value) {
            Ok(patient) => Some(patient),
            Err(e) => {
                tracing::warn!(position, error = %e, "skipping invalid patient record in snapshot");
                None
            }
        })
        .collect())
}

pub trait SnapshotStore: Send {
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> PatientResult<Option<Snapshot>>;

    fn save(&self, snapshot: &Snapshot) -> PatientResult<()>;

    /// Deletes the saved snapshot. Removing a missing snapshot succeeds.
    fn remove(&self) -> PatientResult<()>;

    /// Human-readable location of the snapshot, if it exists.
    fn location(&self) -> Option<String>;
}

/// Stores the snapshot as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable snapshot is moved so the next save cannot overwrite it.
    pub fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn quarantine(&self) {
        let target = self.quarantine_path();
        match fs::rename(&self.path, &target) {
            Ok(()) => tracing::warn!(
                path = %target.display(),
                "unreadable patient snapshot moved aside"
            ),
            Err(e) => tracing::warn!(error = %e, "failed to move unreadable patient snapshot aside"),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> PatientResult<Option<Snapshot>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PatientError::FileRead(e)),
        };
        match serde_json::from_str(&contents) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                self.quarantine();
                Err(PatientError::Deserialization(e))
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> PatientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PatientError::StorageDirCreation)?;
        }
        let json = serde_json::to_string_pretty(snapshot).map_err(PatientError::Serialization)?;
        fs::write(&self.path, json).map_err(PatientError::FileWrite)?;
        Ok(())
    }

    fn remove(&self) -> PatientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PatientError::FileRemove(e)),
        }
    }

    fn location(&self) -> Option<String> {
        self.path
            .is_file()
            .then(|| self.path.display().to_string())
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot`, as if a previous run had saved it.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> PatientResult<Option<Snapshot>> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| PatientError::StoreLockPoisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> PatientResult<()> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| PatientError::StoreLockPoisoned)?;
        *guard = Some(snapshot.clone());
        Ok(())
    }

    fn remove(&self) -> PatientResult<()> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| PatientError::StoreLockPoisoned)?;
        *guard = None;
        Ok(())
    }

    fn location(&self) -> Option<String> {
        let guard = self.snapshot.lock().ok()?;
        guard.as_ref().map(|_| "memory".to_string())
    }
}
