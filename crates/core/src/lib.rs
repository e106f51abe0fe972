//! # PMS Core
//!
//! Core business logic for the patient management service.
//!
//! This crate contains the in-memory data structures and the manager that keeps them consistent:
//! - a linked list holding every patient record in insertion order
//! - a binary search tree indexing the same records by id
//! - a bounded activity log and a FIFO appointment queue
//! - JSON snapshot persistence under `PATIENT_DATA_DIR`
//!
//! **No API concerns**: HTTP servers and command-line parsing belong in `api-rest` and `cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod manager;
pub mod patient;
pub mod sample;
pub mod storage;
pub mod structures;
pub mod timestamp;
pub mod validation;

pub use config::{activity_capacity_from_env_value, CoreConfig};
pub use error::{ErrorKind, PatientError, PatientResult, ValidationError};
pub use manager::{
    ExportPayload, ExportStatistics, GenderDistribution, PatientManager, ProcessedAppointment,
    QueuePlacement, Statistics,
};
pub use patient::{Patient, PatientFields};
pub use storage::{JsonFileStore, MemoryStore, Snapshot, SnapshotStore};
pub use structures::{Activity, ActivityAction, Appointment};
