//! Singly linked list holding the canonical copy of every patient record.
//!
//! New records are pushed at the head, so iteration yields the most recently added record
//! first. Lookups, updates and deletes are linear scans; "not found" is reported through the
//! return value and never as an error.

use crate::patient::Patient;

struct Node {
    patient: Patient,
    next: Link,
}

type Link = Option<Box<Node>>;

/// Insertion-ordered patient store.
#[derive(Default)]
pub struct PatientList {
    head: Link,
    len: usize,
}

impl PatientList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `patient` at the head of the list. O(1).
    pub fn add(&mut self, patient: Patient) {
        let node = Box::new(Node {
            patient,
            next: self.head.take(),
        });
        self.head = Some(node);
        self.len += 1;
    }

    /// Removes the first record with `patient_id`, returning it if one was found.
    pub fn delete(&mut self, patient_id: u32) -> Option<Patient> {
        let mut cursor = &mut self.head;
        loop {
            match cursor {
                None => return None,
                Some(node) if node.patient.patient_id() == patient_id => {
                    let next = node.next.take();
                    let removed = std::mem::replace(cursor, next)?;
                    self.len -= 1;
                    return Some(removed.patient);
                }
                Some(node) => cursor = &mut node.next,
            }
        }
    }

    pub fn get(&self, patient_id: u32) -> Option<&Patient> {
        self.iter().find(|p| p.patient_id() == patient_id)
    }

    /// Replaces the record stored under `patient_id` in place, keeping its list position.
    ///
    /// Returns `false` (and drops `patient`) if no record has that id.
    pub fn update(&mut self, patient_id: u32, patient: Patient) -> bool {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.patient.patient_id() == patient_id {
                node.patient = patient;
                return true;
            }
            cursor = node.next.as_deref_mut();
        }
        false
    }

    /// Clones every record in list order (most recent first).
    pub fn get_all(&self) -> Vec<Patient> {
        self.iter().cloned().collect()
    }

    pub fn exists(&self, patient_id: u32) -> bool {
        self.get(patient_id).is_some()
    }

    pub fn clear(&mut self) {
        self.drain_nodes();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    // Unlinks nodes one at a time; the default recursive drop of `Box<Node>` would use one
    // stack frame per node.
    fn drain_nodes(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl Drop for PatientList {
    fn drop(&mut self) {
        self.drain_nodes();
    }
}

/// Borrowing iterator over a [`PatientList`], head to tail.
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Patient;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            &node.patient
        })
    }
}

impl<'a> IntoIterator for &'a PatientList {
    type Item = &'a Patient;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::test_patient;

    fn ids(list: &PatientList) -> Vec<u32> {
        list.iter().map(Patient::patient_id).collect()
    }

    #[test]
    fn test_add_inserts_at_head() {
        let mut list = PatientList::new();
        assert!(list.is_empty());

        list.add(test_patient(1, "Ahmed Khan"));
        list.add(test_patient(2, "Fatima Ali"));
        list.add(test_patient(3, "Omar Farooq"));

        assert_eq!(ids(&list), vec![3, 2, 1]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_delete_head_middle_and_tail() {
        let mut list = PatientList::new();
        for id in 1..=5 {
            list.add(test_patient(id, "Patient"));
        }

        assert_eq!(list.delete(5).map(|p| p.patient_id()), Some(5));
        assert_eq!(list.delete(3).map(|p| p.patient_id()), Some(3));
        assert_eq!(list.delete(1).map(|p| p.patient_id()), Some(1));
        assert_eq!(ids(&list), vec![4, 2]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_delete_missing_reports_not_found() {
        let mut list = PatientList::new();
        assert!(list.delete(1).is_none());

        list.add(test_patient(1, "Ahmed Khan"));
        assert!(list.delete(2).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut list = PatientList::new();
        list.add(test_patient(1, "Ahmed Khan"));
        list.add(test_patient(2, "Fatima Ali"));

        assert!(list.update(1, test_patient(1, "Ahmed K. Khan")));
        assert_eq!(ids(&list), vec![2, 1], "position should not change");
        assert_eq!(
            list.get(1).map(Patient::name),
            Some("Ahmed K. Khan"),
            "record should be replaced"
        );

        assert!(!list.update(9, test_patient(9, "Nobody")));
        assert!(!list.exists(9));
    }

    #[test]
    fn test_clear_resets_list() {
        let mut list = PatientList::new();
        list.add(test_patient(1, "Ahmed Khan"));
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.get_all().is_empty());
    }

    #[test]
    fn test_long_list_drops_without_overflow() {
        let mut list = PatientList::new();
        for id in 1..=200_000 {
            list.add(test_patient(id, "Patient"));
        }
        assert_eq!(list.len(), 200_000);
        drop(list);
    }
}
