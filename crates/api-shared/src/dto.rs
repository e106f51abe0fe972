//! JSON request and response bodies for the patient management API.
//!
//! Field names are camelCase on the wire. Every response that can fail carries `success`, and
//! failures are reported as [`ApiMessage`] with `success: false`.

use pms_core::{
    timestamp, Activity, Appointment, ExportPayload, GenderDistribution, Patient, PatientFields,
    Statistics,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Bare outcome with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub patient_id: u32,
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub disease: String,
    pub contact_number: String,
    pub appointment_date: String,
    pub visit_notes: String,
}

impl From<&Patient> for PatientDto {
    fn from(p: &Patient) -> Self {
        Self {
            patient_id: p.patient_id(),
            name: p.name().to_string(),
            age: p.age(),
            gender: p.gender().to_string(),
            disease: p.disease().to_string(),
            contact_number: p.contact_number().to_string(),
            appointment_date: p.appointment_date().to_string(),
            visit_notes: p.visit_notes().to_string(),
        }
    }
}

impl From<Patient> for PatientDto {
    fn from(p: Patient) -> Self {
        Self::from(&p)
    }
}

/// Body of `POST /api/patient` and `PUT /api/patient/{id}`.
///
/// Missing fields default to empty text (and age 0) so validation, not deserialisation,
/// reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientInputReq {
    /// Explicit identifier for `POST`; ignored by `PUT`.
    pub patient_id: Option<u32>,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub disease: String,
    pub contact_number: String,
    pub appointment_date: String,
    pub visit_notes: String,
}

impl PatientInputReq {
    pub fn into_fields(self) -> PatientFields {
        PatientFields {
            name: self.name,
            age: self.age,
            gender: self.gender,
            disease: self.disease,
            contact_number: self.contact_number,
            appointment_date: self.appointment_date,
            visit_notes: self.visit_notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub success: bool,
    pub patient: PatientDto,
}

/// Result of an add or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SavePatientRes {
    pub success: bool,
    pub message: String,
    pub patient: PatientDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchRes {
    pub success: bool,
    pub count: usize,
    pub patients: Vec<PatientDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueReq {
    pub patient_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueAddRes {
    pub success: bool,
    pub message: String,
    pub position: usize,
    pub queue_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub patient_id: u32,
    pub patient_name: String,
    pub appointment_time: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub registration_time: String,
    pub position: usize,
}

impl From<&Appointment> for AppointmentDto {
    fn from(a: &Appointment) -> Self {
        Self {
            patient_id: a.patient_id,
            patient_name: a.patient_name.clone(),
            appointment_time: a.appointment_time.clone(),
            registration_time: timestamp::format(&a.registration_time),
            position: a.position,
        }
    }
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self::from(&a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRes {
    pub success: bool,
    pub message: String,
    pub appointment: AppointmentDto,
    pub remaining_in_queue: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WaitingListRes {
    pub success: bool,
    pub queue_size: usize,
    pub waiting_list: Vec<AppointmentDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextAppointmentRes {
    pub success: bool,
    pub next_appointment: AppointmentDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    /// One of ADD, VIEW, UPDATE, DELETE, QUEUE, PROCESS, LOAD, SAMPLE, CLEAR.
    pub action: String,
    pub patient_id: u32,
    pub patient_name: String,
    pub details: String,
    pub timestamp: String,
}

impl From<&Activity> for ActivityDto {
    fn from(a: &Activity) -> Self {
        Self {
            action: a.action.to_string(),
            patient_id: a.patient_id,
            patient_name: a.patient_name.clone(),
            details: a.details.clone(),
            timestamp: timestamp::format(&a.timestamp),
        }
    }
}

impl From<Activity> for ActivityDto {
    fn from(a: Activity) -> Self {
        Self::from(&a)
    }
}

/// `count` is the total size of the log, not the number of entries returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ActivitiesRes {
    pub success: bool,
    pub count: usize,
    pub activities: Vec<ActivityDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoppedActivityRes {
    pub success: bool,
    pub popped_activity: ActivityDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenderDistributionDto {
    pub male: usize,
    pub female: usize,
    pub other: usize,
}

impl From<GenderDistribution> for GenderDistributionDto {
    fn from(g: GenderDistribution) -> Self {
        Self {
            male: g.male,
            female: g.female,
            other: g.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRes {
    pub total_patients: usize,
    pub queue_size: usize,
    pub activity_count: usize,
    pub bst_height: usize,
    pub next_patient_id: u32,
    pub gender_distribution: GenderDistributionDto,
    /// Snapshot location, `null` when nothing is saved.
    pub data_file: Option<String>,
}

impl From<Statistics> for StatisticsRes {
    fn from(s: Statistics) -> Self {
        Self {
            total_patients: s.total_patients,
            queue_size: s.queue_size,
            activity_count: s.activity_count,
            bst_height: s.bst_height,
            next_patient_id: s.next_patient_id,
            gender_distribution: s.gender_distribution.into(),
            data_file: s.data_file,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SampleDataRes {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatisticsDto {
    pub total_patients: usize,
    pub queue_size: usize,
    pub next_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportDto {
    pub patients: Vec<PatientDto>,
    pub queue: Vec<AppointmentDto>,
    pub statistics: ExportStatisticsDto,
    pub exported_at: String,
}

impl From<ExportPayload> for ExportDto {
    fn from(e: ExportPayload) -> Self {
        Self {
            patients: e.patients.iter().map(PatientDto::from).collect(),
            queue: e.queue.iter().map(AppointmentDto::from).collect(),
            statistics: ExportStatisticsDto {
                total_patients: e.statistics.total_patients,
                queue_size: e.statistics.queue_size,
                next_id: e.statistics.next_id,
            },
            exported_at: timestamp::format(&e.exported_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiEndpoints {
    pub patients: String,
    pub patient: String,
    pub queue: String,
    pub activities: String,
    pub statistics: String,
    pub export: String,
    pub sample: String,
    pub clear: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub backend: String,
    pub features: Vec<String>,
    pub endpoints: ApiEndpoints,
}

impl ApiInfo {
    pub fn current() -> Self {
        Self {
            name: "Patient Management System API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            backend: "Rust (axum)".into(),
            features: ["File Storage", "Sample Data", "Export", "Search by Name"]
                .into_iter()
                .map(String::from)
                .collect(),
            endpoints: ApiEndpoints {
                patients: "/api/patients".into(),
                patient: "/api/patient/{id}".into(),
                queue: "/api/queue".into(),
                activities: "/api/activities".into(),
                statistics: "/api/statistics".into(),
                export: "/api/export".into(),
                sample: "/api/sample-data".into(),
                clear: "/api/clear".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pms_core::PatientManager;

    #[test]
    fn test_input_defaults_missing_fields() {
        let req: PatientInputReq =
            serde_json::from_str(r#"{"name":"Ahmed Khan","contactNumber":"0300"}"#)
                .expect("partial body");
        assert_eq!(req.patient_id, None);
        assert_eq!(req.age, 0);

        let fields = req.into_fields();
        assert_eq!(fields.name, "Ahmed Khan");
        assert_eq!(fields.contact_number, "0300");
        assert!(fields.gender.is_empty());
    }

    #[test]
    fn test_dtos_use_camel_case() {
        let mut manager = PatientManager::in_memory();
        manager.load_sample_data().expect("sample data");
        manager.enqueue_appointment(1001).expect("enqueue");

        let export = ExportDto::from(manager.export_snapshot());
        let value = serde_json::to_value(&export).expect("serialize");
        assert_eq!(value["patients"][0]["patientId"], 1005);
        assert_eq!(value["queue"][0]["appointmentTime"], "2024-01-15");
        assert_eq!(value["statistics"]["nextId"], 1006);

        let stats = serde_json::to_value(StatisticsRes::from(manager.statistics()))
            .expect("serialize");
        assert_eq!(stats["genderDistribution"]["male"], 3);
        assert_eq!(stats["dataFile"], "memory");

        let activity = ActivityDto::from(&manager.all_activities()[0]);
        assert_eq!(activity.action, "QUEUE");
    }
}
