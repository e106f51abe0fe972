//! Fixed demonstration records loaded by `PatientManager::load_sample_data`.

use crate::patient::PatientFields;

struct SampleRow {
    name: &'static str,
    age: i64,
    gender: &'static str,
    disease: &'static str,
    contact_number: &'static str,
    appointment_date: &'static str,
    visit_notes: &'static str,
}

const SAMPLE_ROWS: [SampleRow; 5] = [
    SampleRow {
        name: "Ahmed Khan",
        age: 45,
        gender: "Male",
        disease: "Diabetes",
        contact_number: "03001234567",
        appointment_date: "2024-01-15",
        visit_notes: "Regular checkup",
    },
    SampleRow {
        name: "Fatima Ali",
        age: 32,
        gender: "Female",
        disease: "Migraine",
        contact_number: "03009876543",
        appointment_date: "2024-01-16",
        visit_notes: "Recurring headaches",
    },
    SampleRow {
        name: "Muhammad Hassan",
        age: 28,
        gender: "Male",
        disease: "Flu",
        contact_number: "03005551234",
        appointment_date: "2024-01-17",
        visit_notes: "Seasonal flu symptoms",
    },
    SampleRow {
        name: "Ayesha Siddiqui",
        age: 55,
        gender: "Female",
        disease: "Hypertension",
        contact_number: "03007778899",
        appointment_date: "2024-01-18",
        visit_notes: "Blood pressure monitoring",
    },
    SampleRow {
        name: "Omar Farooq",
        age: 40,
        gender: "Male",
        disease: "Back Pain",
        contact_number: "03003334455",
        appointment_date: "2024-01-19",
        visit_notes: "Lower back pain",
    },
];

/// The demonstration records, in load order.
pub fn sample_patients() -> Vec<PatientFields> {
    SAMPLE_ROWS
        .iter()
        .map(|row| PatientFields {
            name: row.name.to_string(),
            age: row.age,
            gender: row.gender.to_string(),
            disease: row.disease.to_string(),
            contact_number: row.contact_number.to_string(),
            appointment_date: row.appointment_date.to_string(),
            visit_notes: row.visit_notes.to_string(),
        })
        .collect()
}
