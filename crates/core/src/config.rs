//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the manager. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{ACTIVITY_LOG_CAPACITY, INITIAL_PATIENT_ID, PATIENTS_FILENAME};
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_dir: PathBuf,
    activity_capacity: usize,
    initial_patient_id: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with the default initial patient id.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if `activity_capacity` is zero.
    pub fn new(patient_data_dir: PathBuf, activity_capacity: usize) -> PatientResult<Self> {
        if activity_capacity == 0 {
            return Err(PatientError::InvalidInput(
                "activity capacity must be at least 1".into(),
            ));
        }

        Ok(Self {
            patient_data_dir,
            activity_capacity,
            initial_patient_id: INITIAL_PATIENT_ID,
        })
    }

    /// Overrides the first identifier handed out by a fresh manager.
    pub fn with_initial_patient_id(mut self, initial_patient_id: u32) -> PatientResult<Self> {
        if initial_patient_id == 0 {
            return Err(PatientError::InvalidInput(
                "initial patient id must be positive".into(),
            ));
        }
        self.initial_patient_id = initial_patient_id;
        Ok(self)
    }

    pub fn patient_data_dir(&self) -> &Path {
        &self.patient_data_dir
    }

    /// Full path of the JSON snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.patient_data_dir.join(PATIENTS_FILENAME)
    }

    pub fn activity_capacity(&self) -> usize {
        self.activity_capacity
    }

    pub fn initial_patient_id(&self) -> u32 {
        self.initial_patient_id
    }
}

/// Parse the activity log capacity from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default capacity.
pub fn activity_capacity_from_env_value(value: Option<String>) -> PatientResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(ACTIVITY_LOG_CAPACITY);
    };

    match value.parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(PatientError::InvalidInput(format!(
            "activity capacity must be a positive integer, got: '{}'",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_capacity() {
        let err = CoreConfig::new(PathBuf::from("data"), 0).expect_err("zero capacity");
        assert!(matches!(err, PatientError::InvalidInput(_)));
    }

    #[test]
    fn test_snapshot_path_is_inside_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/tmp/pms"), 100).expect("valid config");
        assert_eq!(cfg.snapshot_path(), PathBuf::from("/tmp/pms/patients.json"));
        assert_eq!(cfg.initial_patient_id(), INITIAL_PATIENT_ID);
    }

    #[test]
    fn test_activity_capacity_from_env_value() {
        assert_eq!(
            activity_capacity_from_env_value(None).expect("default"),
            ACTIVITY_LOG_CAPACITY
        );
        assert_eq!(
            activity_capacity_from_env_value(Some("  ".into())).expect("blank"),
            ACTIVITY_LOG_CAPACITY
        );
        assert_eq!(
            activity_capacity_from_env_value(Some(" 25 ".into())).expect("explicit"),
            25
        );
        assert!(activity_capacity_from_env_value(Some("0".into())).is_err());
        assert!(activity_capacity_from_env_value(Some("lots".into())).is_err());
    }

    #[test]
    fn test_with_initial_patient_id_rejects_zero() {
        let cfg = CoreConfig::new(PathBuf::from("data"), 10).expect("valid config");
        assert!(cfg.clone().with_initial_patient_id(0).is_err());
        assert_eq!(
            cfg.with_initial_patient_id(1)
                .expect("positive id")
                .initial_patient_id(),
            1
        );
    }
}
