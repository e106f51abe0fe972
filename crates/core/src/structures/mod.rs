//! In-memory containers the manager keeps in step.
//!
//! - [`PatientList`]: canonical storage, most recently added first
//! - [`PatientIndex`]: id-ordered search tree over the same records
//! - [`AppointmentQueue`]: FIFO waiting list
//! - [`ActivityLog`]: bounded LIFO history of operations

pub mod activity_log;
pub mod appointment_queue;
pub mod patient_index;
pub mod patient_list;

pub use activity_log::{Activity, ActivityAction, ActivityLog};
pub use appointment_queue::{Appointment, AppointmentQueue};
pub use patient_index::PatientIndex;
pub use patient_list::PatientList;

#[cfg(test)]
pub(crate) fn test_patient(id: u32, name: &str) -> crate::patient::Patient {
    let fields = crate::patient::PatientFields {
        name: name.into(),
        age: 30,
        gender: "Female".into(),
        disease: "Flu".into(),
        ..Default::default()
    };
    crate::validation::validate_patient_fields(id, fields).expect("test patient is valid")
}
