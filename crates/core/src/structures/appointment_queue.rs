//! FIFO appointment waiting list with live 1-based positions.

use crate::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A patient waiting to be seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub patient_id: u32,
    pub patient_name: String,
    /// Requested time, copied from the patient's appointment date.
    pub appointment_time: String,
    #[serde(with = "crate::timestamp")]
    pub registration_time: NaiveDateTime,
    pub position: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentQueue {
    entries: VecDeque<Appointment>,
}

impl AppointmentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new appointment at the back and returns its position.
    ///
    /// Duplicate subjects are not rejected here; the manager checks
    /// [`AppointmentQueue::is_present`] first.
    pub fn enqueue(
        &mut self,
        patient_id: u32,
        patient_name: impl Into<String>,
        appointment_time: impl Into<String>,
    ) -> usize {
        let position = self.entries.len() + 1;
        self.entries.push_back(Appointment {
            patient_id,
            patient_name: patient_name.into(),
            appointment_time: appointment_time.into(),
            registration_time: timestamp::now(),
            position,
        });
        position
    }

    /// Removes the front appointment and renumbers everyone left, front = 1. O(n).
    pub fn dequeue(&mut self) -> Option<Appointment> {
        let front = self.entries.pop_front()?;
        for (i, appointment) in self.entries.iter_mut().enumerate() {
            appointment.position = i + 1;
        }
        Some(front)
    }

    pub fn peek(&self) -> Option<&Appointment> {
        self.entries.front()
    }

    pub fn is_present(&self, patient_id: u32) -> bool {
        self.entries.iter().any(|a| a.patient_id == patient_id)
    }

    pub fn position_of(&self, patient_id: u32) -> Option<usize> {
        self.entries
            .iter()
            .find(|a| a.patient_id == patient_id)
            .map(|a| a.position)
    }

    /// Front-to-back copy of the waiting list.
    pub fn get_all(&self) -> Vec<Appointment> {
        self.entries.iter().cloned().collect()
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(ids: &[u32]) -> AppointmentQueue {
        let mut queue = AppointmentQueue::new();
        for &id in ids {
            queue.enqueue(id, format!("Patient {id}"), "2024-01-15");
        }
        queue
    }

    fn positions(queue: &AppointmentQueue) -> Vec<(u32, usize)> {
        queue
            .get_all()
            .iter()
            .map(|a| (a.patient_id, a.position))
            .collect()
    }

    #[test]
    fn test_enqueue_assigns_next_position() {
        let mut queue = AppointmentQueue::new();
        assert_eq!(queue.enqueue(10, "A", ""), 1);
        assert_eq!(queue.enqueue(20, "B", ""), 2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.position_of(20), Some(2));
        assert_eq!(queue.position_of(30), None);
    }

    #[test]
    fn test_dequeue_is_fifo_and_renumbers() {
        let mut queue = queue_of(&[10, 20, 30]);

        let front = queue.dequeue().expect("queue has entries");
        assert_eq!(front.patient_id, 10);
        assert_eq!(front.position, 1);
        assert_eq!(positions(&queue), vec![(20, 1), (30, 2)]);
        assert_eq!(queue.peek().map(|a| a.patient_id), Some(20));
    }

    #[test]
    fn test_dequeue_empty_returns_none() {
        let mut queue = AppointmentQueue::new();
        assert!(queue.dequeue().is_none());
        assert!(queue.peek().is_none());
    }

    #[test]
    fn test_positions_stay_contiguous_while_draining() {
        let mut queue = queue_of(&[1, 2, 3, 4, 5, 6]);
        while queue.dequeue().is_some() {
            let expected: Vec<usize> = (1..=queue.len()).collect();
            let actual: Vec<usize> = queue.get_all().iter().map(|a| a.position).collect();
            assert_eq!(actual, expected);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_is_present_and_clear() {
        let mut queue = queue_of(&[7]);
        assert!(queue.is_present(7));
        assert!(!queue.is_present(8));
        queue.clear();
        assert!(!queue.is_present(7));
        assert_eq!(queue.len(), 0);
    }
}
