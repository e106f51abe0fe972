//! The patient record and the raw field set callers submit to create or update one.

use crate::constants::MAX_PATIENT_AGE;
use pms_types::{NonEmptyText, PatientName};
use serde::{Deserialize, Deserializer, Serialize};

/// One patient's record.
///
/// Instances are only built through [`crate::validation::validate_patient_fields`] or by
/// deserialising a snapshot, so the name, age, gender and condition rules always hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    patient_id: u32,
    name: PatientName,
    #[serde(deserialize_with = "deserialize_age")]
    age: u8,
    gender: NonEmptyText,
    disease: NonEmptyText,
    #[serde(default)]
    contact_number: String,
    #[serde(default)]
    appointment_date: String,
    #[serde(default)]
    visit_notes: String,
}

impl Patient {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        patient_id: u32,
        name: PatientName,
        age: u8,
        gender: NonEmptyText,
        disease: NonEmptyText,
        contact_number: String,
        appointment_date: String,
        visit_notes: String,
    ) -> Self {
        Self {
            patient_id,
            name,
            age,
            gender,
            disease,
            contact_number,
            appointment_date,
            visit_notes,
        }
    }

    pub fn patient_id(&self) -> u32 {
        self.patient_id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> &str {
        self.gender.as_str()
    }

    pub fn disease(&self) -> &str {
        self.disease.as_str()
    }

    pub fn contact_number(&self) -> &str {
        &self.contact_number
    }

    pub fn appointment_date(&self) -> &str {
        &self.appointment_date
    }

    pub fn visit_notes(&self) -> &str {
        &self.visit_notes
    }

    /// Case-insensitive substring match against the patient's name.
    ///
    /// `query_lower` must already be lowercased.
    pub(crate) fn name_contains(&self, query_lower: &str) -> bool {
        self.name.as_str().to_lowercase().contains(query_lower)
    }
}

/// Raw, unvalidated fields for creating or replacing a patient record.
///
/// `age` is signed so out-of-range input from callers surfaces as a validation error rather
/// than a conversion failure at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFields {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub disease: String,
    pub contact_number: String,
    pub appointment_date: String,
    pub visit_notes: String,
}

fn deserialize_age<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let age = i64::deserialize(deserializer)?;
    if !(0..=MAX_PATIENT_AGE).contains(&age) {
        return Err(serde::de::Error::custom(format!(
            "age {} is outside 0..={}",
            age, MAX_PATIENT_AGE
        )));
    }
    u8::try_from(age).map_err(serde::de::Error::custom)
}
