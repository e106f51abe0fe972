//! The patient manager.
//!
//! [`PatientManager`] owns the four in-memory structures and is the only thing allowed to
//! mutate them. Every operation that changes a record touches the list and the index inside the
//! same method call, so after any completed operation both hold exactly the same records.
//!
//! Persistence is best effort: a failed snapshot write is logged and the in-memory change stands.

use crate::config::CoreConfig;
use crate::constants::{ACTIVITY_LOG_CAPACITY, INITIAL_PATIENT_ID};
use crate::patient::{Patient, PatientFields};
use crate::sample::sample_patients;
use crate::storage::{JsonFileStore, MemoryStore, Snapshot, SnapshotStore};
use crate::structures::{
    Activity, ActivityAction, ActivityLog, Appointment, AppointmentQueue, PatientIndex,
    PatientList,
};
use crate::timestamp;
use crate::validation::validate_patient_fields;
use crate::{PatientError, PatientResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

/// Where a patient landed in the appointment queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuePlacement {
    pub patient_id: u32,
    pub patient_name: String,
    pub position: usize,
    pub queue_size: usize,
}

/// The appointment taken off the front of the queue and how many are still waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedAppointment {
    pub appointment: Appointment,
    pub remaining: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderDistribution {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_patients: usize,
    pub queue_size: usize,
    pub activity_count: usize,
    pub bst_height: usize,
    pub next_patient_id: u32,
    pub gender_distribution: GenderDistribution,
    /// Snapshot location, or `None` when nothing has been saved.
    pub data_file: Option<String>,
}

impl Statistics {
    pub fn snapshot_exists(&self) -> bool {
        self.data_file.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatistics {
    pub total_patients: usize,
    pub queue_size: usize,
    pub next_id: u32,
}

/// Point-in-time copy of everything worth exporting, independent of the snapshot store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub patients: Vec<Patient>,
    pub queue: Vec<Appointment>,
    pub statistics: ExportStatistics,
    #[serde(with = "crate::timestamp")]
    pub exported_at: NaiveDateTime,
}

pub struct PatientManager<S: SnapshotStore = JsonFileStore> {
    patients: PatientList,
    index: PatientIndex,
    activities: ActivityLog,
    queue: AppointmentQueue,
    next_id: u32,
    initial_id: u32,
    store: S,
}

impl PatientManager<JsonFileStore> {
    /// Opens the manager over the JSON snapshot in the configured data directory.
    pub fn open(cfg: &CoreConfig) -> Self {
        Self::with_store(JsonFileStore::new(cfg.snapshot_path()), cfg)
    }
}

impl PatientManager<MemoryStore> {
    /// A manager with default settings and no file on disk.
    pub fn in_memory() -> Self {
        Self::build(MemoryStore::new(), ACTIVITY_LOG_CAPACITY, INITIAL_PATIENT_ID)
    }
}

impl<S: SnapshotStore> PatientManager<S> {
    /// Creates a manager over `store` and restores whatever snapshot it holds.
    pub fn with_store(store: S, cfg: &CoreConfig) -> Self {
        Self::build(store, cfg.activity_capacity(), cfg.initial_patient_id())
    }

    fn build(store: S, activity_capacity: usize, initial_id: u32) -> Self {
        let mut manager = Self {
            patients: PatientList::new(),
            index: PatientIndex::new(),
            activities: ActivityLog::with_capacity(activity_capacity),
            queue: AppointmentQueue::new(),
            next_id: initial_id,
            initial_id,
            store,
        };
        manager.restore();
        manager
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn next_patient_id(&self) -> u32 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Registers a new patient under the next free identifier.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` for the first invalid field.
    pub fn add_patient(&mut self, fields: PatientFields) -> PatientResult<Patient> {
        let id = self.next_id;
        let patient = validate_patient_fields(id, fields)?;
        self.next_id = id.checked_add(1).ok_or_else(|| {
            PatientError::InvalidInput("patient identifier space exhausted".into())
        })?;
        self.insert_record(patient.clone())?;

        tracing::debug!(patient_id = id, "patient registered");
        self.record(
            ActivityAction::Add,
            id,
            patient.name(),
            "New patient registered",
        );
        self.persist();
        Ok(patient)
    }

    /// Registers a patient under a caller-chosen identifier.
    ///
    /// The counter moves past `patient_id` so auto-assigned ids never collide with it.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` for a zero id or invalid field, or
    /// `PatientError::DuplicateId` if the id is taken.
    pub fn add_patient_with_id(
        &mut self,
        patient_id: u32,
        fields: PatientFields,
    ) -> PatientResult<Patient> {
        let patient = validate_patient_fields(patient_id, fields)?;
        if self.index.contains(patient_id) {
            return Err(PatientError::DuplicateId(patient_id));
        }
        self.insert_record(patient.clone())?;
        self.next_id = self.next_id.max(patient_id.saturating_add(1));

        tracing::debug!(patient_id, "patient registered with explicit id");
        self.record(
            ActivityAction::Add,
            patient_id,
            patient.name(),
            "Patient registered",
        );
        self.persist();
        Ok(patient)
    }

    /// Looks a patient up by id and records the view.
    pub fn search_by_id(&mut self, patient_id: u32) -> PatientResult<Patient> {
        let patient = self
            .index
            .search(patient_id)
            .cloned()
            .ok_or(PatientError::NotFound(patient_id))?;
        self.record(
            ActivityAction::View,
            patient_id,
            patient.name(),
            "Patient record viewed",
        );
        Ok(patient)
    }

    /// Removes a patient from both structures and returns the removed record.
    ///
    /// A pending appointment for the patient stays in the queue.
    pub fn delete_by_id(&mut self, patient_id: u32) -> PatientResult<Patient> {
        let name = self
            .index
            .search(patient_id)
            .map(|p| p.name().to_string())
            .ok_or(PatientError::NotFound(patient_id))?;

        self.index.delete(patient_id);
        let removed = self
            .patients
            .delete(patient_id)
            .ok_or(PatientError::NotFound(patient_id))?;

        tracing::debug!(patient_id, "patient deleted");
        self.record(
            ActivityAction::Delete,
            patient_id,
            name,
            "Patient record deleted",
        );
        self.persist();
        Ok(removed)
    }

    /// Replaces every field of an existing record; the id and list position are kept.
    pub fn update_by_id(
        &mut self,
        patient_id: u32,
        fields: PatientFields,
    ) -> PatientResult<Patient> {
        if !self.patients.exists(patient_id) {
            return Err(PatientError::NotFound(patient_id));
        }
        let patient = validate_patient_fields(patient_id, fields)?;

        self.patients.update(patient_id, patient.clone());
        self.index.delete(patient_id);
        self.index.insert(patient.clone());

        tracing::debug!(patient_id, "patient updated");
        self.record(
            ActivityAction::Update,
            patient_id,
            patient.name(),
            "Patient record updated",
        );
        self.persist();
        Ok(patient)
    }

    /// All records, most recently added first.
    pub fn list_all(&self) -> Vec<Patient> {
        self.patients.get_all()
    }

    /// All records in ascending id order.
    pub fn list_sorted(&self) -> Vec<Patient> {
        self.index.inorder()
    }

    /// Case-insensitive substring search over names, in list order. An empty query matches nothing.
    pub fn search_by_name(&self, query: &str) -> Vec<Patient> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.patients
            .iter()
            .filter(|p| p.name_contains(&query))
            .cloned()
            .collect()
    }

    /// Puts an existing patient at the back of the appointment queue.
    ///
    /// # Errors
    ///
    /// `PatientError::NotFound` for an unknown id, `PatientError::AlreadyQueued` if the
    /// patient is already waiting.
    pub fn enqueue_appointment(&mut self, patient_id: u32) -> PatientResult<QueuePlacement> {
        let (name, requested) = self
            .index
            .search(patient_id)
            .map(|p| (p.name().to_string(), p.appointment_date().to_string()))
            .ok_or(PatientError::NotFound(patient_id))?;

        if self.queue.is_present(patient_id) {
            return Err(PatientError::AlreadyQueued(name));
        }

        let position = self.queue.enqueue(patient_id, name.clone(), requested);
        self.record(
            ActivityAction::Queue,
            patient_id,
            name.clone(),
            "Added to appointment queue",
        );
        Ok(QueuePlacement {
            patient_id,
            patient_name: name,
            position,
            queue_size: self.queue.len(),
        })
    }

    pub fn process_next_appointment(&mut self) -> PatientResult<ProcessedAppointment> {
        let appointment = self.queue.dequeue().ok_or(PatientError::QueueEmpty)?;
        self.record(
            ActivityAction::Process,
            appointment.patient_id,
            appointment.patient_name.clone(),
            "Appointment processed",
        );
        Ok(ProcessedAppointment {
            appointment,
            remaining: self.queue.len(),
        })
    }

    pub fn peek_next_appointment(&self) -> PatientResult<Appointment> {
        self.queue.peek().cloned().ok_or(PatientError::QueueEmpty)
    }

    /// Queue contents, front first.
    pub fn waiting_list(&self) -> Vec<Appointment> {
        self.queue.get_all()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The `count` newest activity entries, newest first.
    pub fn recent_activities(&self, count: usize) -> Vec<Activity> {
        self.activities.get_recent(count)
    }

    pub fn all_activities(&self) -> Vec<Activity> {
        self.activities.get_all()
    }

    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Pops the newest activity entry. The operation it describes is not reversed.
    pub fn undo_last_activity(&mut self) -> PatientResult<Activity> {
        self.activities.pop().ok_or(PatientError::NoActivities)
    }

    pub fn statistics(&self) -> Statistics {
        let mut genders = GenderDistribution::default();
        for patient in &self.patients {
            match patient.gender().to_lowercase().as_str() {
                "male" => genders.male += 1,
                "female" => genders.female += 1,
                _ => genders.other += 1,
            }
        }

        Statistics {
            total_patients: self.patients.len(),
            queue_size: self.queue.len(),
            activity_count: self.activities.len(),
            bst_height: self.index.height(),
            next_patient_id: self.next_id,
            gender_distribution: genders,
            data_file: self.store.location(),
        }
    }

    /// Adds the demonstration records under fresh ids and returns how many were added.
    ///
    /// Unlike [`PatientManager::add_patient`] this saves once at the end and writes a single
    /// SAMPLE entry rather than one ADD per record.
    ///
    /// # Errors
    ///
    /// Fails without touching any state if the identifiers would run out or one of the
    /// fresh ids is already taken.
    pub fn load_sample_data(&mut self) -> PatientResult<usize> {
        let rows = sample_patients();
        let first = self.next_id;
        let next_id = u32::try_from(rows.len())
            .ok()
            .and_then(|n| first.checked_add(n))
            .ok_or_else(|| {
                PatientError::InvalidInput("patient identifier space exhausted".into())
            })?;

        let patients = (first..next_id)
            .zip(rows)
            .map(|(id, fields)| validate_patient_fields(id, fields).map_err(PatientError::from))
            .collect::<PatientResult<Vec<Patient>>>()?;
        if let Some(taken) = patients.iter().find(|p| self.index.contains(p.patient_id())) {
            return Err(PatientError::DuplicateId(taken.patient_id()));
        }

        let added = patients.len();
        for patient in patients {
            self.insert_record(patient)?;
        }
        self.next_id = next_id;

        tracing::info!(count = added, "sample patients loaded");
        self.record_system(
            ActivityAction::Sample,
            format!("Loaded {} sample patients", added),
        );
        self.persist();
        Ok(added)
    }

    /// Empties every structure, resets the id counter and removes the saved snapshot.
    pub fn clear_all(&mut self) {
        self.patients.clear();
        self.index.clear();
        self.queue.clear();
        self.activities.clear();
        self.next_id = self.initial_id;

        if let Err(e) = self.store.remove() {
            tracing::warn!(error = %e, "failed to remove patient snapshot");
        }
        tracing::info!("all patient data cleared");
        self.record_system(ActivityAction::Clear, "All data cleared");
    }

    pub fn export_snapshot(&self) -> ExportPayload {
        ExportPayload {
            patients: self.patients.get_all(),
            queue: self.queue.get_all(),
            statistics: ExportStatistics {
                total_patients: self.patients.len(),
                queue_size: self.queue.len(),
                next_id: self.next_id,
            },
            exported_at: timestamp::now(),
        }
    }

    // Keeps the list and the index in step: both gain the record or neither does.
    fn insert_record(&mut self, patient: Patient) -> PatientResult<()> {
        let id = patient.patient_id();
        if !self.index.insert(patient.clone()) {
            return Err(PatientError::DuplicateId(id));
        }
        self.patients.add(patient);
        Ok(())
    }

    fn record(
        &mut self,
        action: ActivityAction,
        patient_id: u32,
        patient_name: impl Into<String>,
        details: &str,
    ) {
        self.activities
            .push(Activity::new(action, patient_id, patient_name, details));
    }

    fn record_system(&mut self, action: ActivityAction, details: impl Into<String>) {
        self.activities.push(Activity::system(action, details));
    }

    fn persist(&self) {
        let snapshot = Snapshot {
            patients: self.patients.get_all(),
            next_id: self.next_id,
            saved_at: timestamp::now(),
        };
        match self.store.save(&snapshot) {
            Ok(()) => tracing::debug!(count = snapshot.patients.len(), "snapshot saved"),
            Err(e) => tracing::warn!(error = %e, "failed to persist patient snapshot"),
        }
    }

    fn restore(&mut self) {
        let snapshot = match self.store.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::info!("no patient snapshot found, starting empty");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load patient snapshot, starting empty");
                return;
            }
        };

        // First occurrence wins, matching what a lookup on the saved list would have found.
        let mut seen = HashSet::new();
        let unique: Vec<Patient> = snapshot
            .patients
            .into_iter()
            .filter(|p| {
                let fresh = seen.insert(p.patient_id());
                if !fresh {
                    tracing::warn!(
                        patient_id = p.patient_id(),
                        "skipping duplicate patient id in snapshot"
                    );
                }
                fresh
            })
            .collect();

        // Saved head-first; inserting tail-first at the head rebuilds the same order.
        let mut max_id = 0;
        for patient in unique.into_iter().rev() {
            max_id = max_id.max(patient.patient_id());
            self.index.insert(patient.clone());
            self.patients.add(patient);
        }

        self.next_id = self
            .next_id
            .max(snapshot.next_id)
            .max(max_id.saturating_add(1));

        let count = self.patients.len();
        tracing::info!(count, next_id = self.next_id, "patient snapshot loaded");
        self.record_system(
            ActivityAction::Load,
            format!("Loaded {} patients from file", count),
        );
    }
}
