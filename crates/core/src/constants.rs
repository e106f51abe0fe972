//! Constants used throughout the core crate.
//!
//! Paths, filenames and limits live here so the manager, the snapshot store and the
//! binaries agree on them.

/// Default directory for patient data storage when no explicit directory is configured.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "patient_data";

/// Filename of the persisted snapshot inside the patient data directory.
pub const PATIENTS_FILENAME: &str = "patients.json";

/// First identifier handed out by a fresh manager, and the value `clear_all` resets to.
pub const INITIAL_PATIENT_ID: u32 = 1001;

/// Maximum number of entries retained by the activity log.
pub const ACTIVITY_LOG_CAPACITY: usize = 100;

/// Number of entries returned by "recent activities" when the caller gives no count.
pub const DEFAULT_RECENT_ACTIVITIES: usize = 10;

/// Inclusive upper bound for a patient's age.
pub const MAX_PATIENT_AGE: i64 = 150;

/// Subject name recorded on system-level activity entries (LOAD, SAMPLE, CLEAR).
pub const SYSTEM_SUBJECT_NAME: &str = "System";

/// Format used for every timestamp the service records or emits.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
