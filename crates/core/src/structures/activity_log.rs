//! Bounded activity history, read newest-first.
//!
//! Entries are pushed on one end and read from the same end (LIFO). Once the log holds more
//! than its capacity the oldest entry, at the opposite end, is dropped.

use crate::constants::SYSTEM_SUBJECT_NAME;
use crate::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityAction {
    Add,
    View,
    Update,
    Delete,
    Queue,
    Process,
    Load,
    Sample,
    Clear,
}

impl ActivityAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::Add => "ADD",
            ActivityAction::View => "VIEW",
            ActivityAction::Update => "UPDATE",
            ActivityAction::Delete => "DELETE",
            ActivityAction::Queue => "QUEUE",
            ActivityAction::Process => "PROCESS",
            ActivityAction::Load => "LOAD",
            ActivityAction::Sample => "SAMPLE",
            ActivityAction::Clear => "CLEAR",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub action: ActivityAction,
    /// Subject patient, or 0 for system-level events.
    pub patient_id: u32,
    pub patient_name: String,
    pub details: String,
    #[serde(with = "crate::timestamp")]
    pub timestamp: NaiveDateTime,
}

impl Activity {
    /// An entry about one patient, stamped with the current time.
    pub fn new(
        action: ActivityAction,
        patient_id: u32,
        patient_name: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            action,
            patient_id,
            patient_name: patient_name.into(),
            details: details.into(),
            timestamp: timestamp::now(),
        }
    }

    /// A system-level entry (subject id 0).
    pub fn system(action: ActivityAction, details: impl Into<String>) -> Self {
        Self::new(action, 0, SYSTEM_SUBJECT_NAME, details)
    }
}

/// Size-capped LIFO log of [`Activity`] entries.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    // Front is oldest, back is newest.
    entries: VecDeque<Activity>,
    capacity: usize,
}

impl ActivityLog {
    /// Creates an empty log. A `capacity` of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, activity: Activity) {
        self.entries.push_back(activity);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Removes and returns the most recently pushed entry.
    pub fn pop(&mut self) -> Option<Activity> {
        self.entries.pop_back()
    }

    pub fn peek(&self) -> Option<&Activity> {
        self.entries.back()
    }

    /// All entries, newest first.
    pub fn get_all(&self) -> Vec<Activity> {
        self.entries.iter().rev().cloned().collect()
    }

    /// The `n` newest entries, newest first.
    pub fn get_recent(&self, n: usize) -> Vec<Activity> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(crate::constants::ACTIVITY_LOG_CAPACITY)
    }
}
