//! Input validation utilities.
//!
//! Raw [`PatientFields`] become a [`Patient`] only through this module. Checks run in a fixed
//! order (name, age, gender, condition) and the first failure is reported.

use crate::constants::MAX_PATIENT_AGE;
use crate::error::ValidationError;
use crate::patient::{Patient, PatientFields};
use pms_types::{NonEmptyText, PatientName};

/// Validates `fields` and builds the record that will be stored under `patient_id`.
///
/// # Errors
///
/// Returns the first failing [`ValidationError`]:
/// - `InvalidId` if `patient_id` is zero,
/// - `Name` if the trimmed name is shorter than two characters,
/// - `AgeOutOfRange` if age is outside `0..=150`,
/// - `MissingGender` / `MissingCondition` if those fields are blank.
pub fn validate_patient_fields(
    patient_id: u32,
    fields: PatientFields,
) -> Result<Patient, ValidationError> {
    if patient_id == 0 {
        return Err(ValidationError::InvalidId);
    }

    let name = PatientName::new(&fields.name).map_err(ValidationError::Name)?;

    if !(0..=MAX_PATIENT_AGE).contains(&fields.age) {
        return Err(ValidationError::AgeOutOfRange(fields.age));
    }
    let age = u8::try_from(fields.age).map_err(|_| ValidationError::AgeOutOfRange(fields.age))?;

    let gender = NonEmptyText::new(&fields.gender).map_err(|_| ValidationError::MissingGender)?;
    let disease =
        NonEmptyText::new(&fields.disease).map_err(|_| ValidationError::MissingCondition)?;

    Ok(Patient::new(
        patient_id,
        name,
        age,
        gender,
        disease,
        fields.contact_number,
        fields.appointment_date,
        fields.visit_notes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pms_types::TextError;

    fn valid_fields() -> PatientFields {
        PatientFields {
            name: "  Ahmed Khan ".into(),
            age: 45,
            gender: "Male".into(),
            disease: "Diabetes".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_fields_build_trimmed_record() {
        let patient = validate_patient_fields(1001, valid_fields()).expect("valid fields");
        assert_eq!(patient.patient_id(), 1001);
        assert_eq!(patient.name(), "Ahmed Khan");
        assert_eq!(patient.age(), 45);
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        for age in [0, 150] {
            let fields = PatientFields {
                age,
                ..valid_fields()
            };
            assert!(validate_patient_fields(1, fields).is_ok(), "age {age}");
        }
        for age in [-1, 151] {
            let fields = PatientFields {
                age,
                ..valid_fields()
            };
            assert_eq!(
                validate_patient_fields(1, fields),
                Err(ValidationError::AgeOutOfRange(age))
            );
        }
    }

    #[test]
    fn test_first_failing_field_wins() {
        let fields = PatientFields {
            name: "A".into(),
            age: 500,
            gender: String::new(),
            disease: String::new(),
            ..Default::default()
        };
        assert_eq!(
            validate_patient_fields(1, fields),
            Err(ValidationError::Name(TextError::TooShort { min: 2 }))
        );

        let fields = PatientFields {
            gender: " ".into(),
            disease: String::new(),
            ..valid_fields()
        };
        assert_eq!(
            validate_patient_fields(1, fields),
            Err(ValidationError::MissingGender)
        );

        let fields = PatientFields {
            disease: "\t".into(),
            ..valid_fields()
        };
        assert_eq!(
            validate_patient_fields(1, fields),
            Err(ValidationError::MissingCondition)
        );
    }

    #[test]
    fn test_zero_id_is_rejected() {
        assert_eq!(
            validate_patient_fields(0, valid_fields()),
            Err(ValidationError::InvalidId)
        );
    }
}
