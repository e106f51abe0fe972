//! Request handlers, one per route.
//!
//! Each handler takes the manager lock once, calls one manager operation and shapes the result
//! into the wire types from `api-shared`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path as AxumPath, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{api_error, bad_request, ApiError, AppState};
use api_shared::{dto, HealthService};
use pms_core::constants::DEFAULT_RECENT_ACTIVITIES;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive part of the patient's name.
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivitiesQuery {
    /// Number of entries to return (default 10).
    pub count: Option<usize>,
}

// Turns a JSON extraction failure into the same `{success, message}` shape as other errors.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(bad_request("Request body is required")),
        Err(rejection) => Err(bad_request(rejection.body_text())),
    }
}

fn path_id(id: Result<AxumPath<u32>, PathRejection>) -> Result<u32, ApiError> {
    match id {
        Ok(AxumPath(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "rejected patient id");
            Err(bad_request("Patient ID must be a positive whole number"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API information", body = dto::ApiInfo)
    )
)]
pub async fn index() -> Json<dto::ApiInfo> {
    Json(dto::ApiInfo::current())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = dto::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// This endpoint is used for monitoring and load balancer health checks.
pub async fn health() -> Json<dto::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "All patients, most recently added first", body = [dto::PatientDto]),
        (status = 500, description = "Internal server error", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<dto::PatientDto>>, ApiError> {
    let manager = state.manager()?;
    Ok(Json(
        manager.list_all().iter().map(dto::PatientDto::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/patients/sorted",
    responses(
        (status = 200, description = "All patients in ascending id order", body = [dto::PatientDto]),
        (status = 500, description = "Internal server error", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn list_patients_sorted(
    State(state): State<AppState>,
) -> Result<Json<Vec<dto::PatientDto>>, ApiError> {
    let manager = state.manager()?;
    Ok(Json(
        manager
            .list_sorted()
            .iter()
            .map(dto::PatientDto::from)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/patients/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Patients whose name contains the query", body = dto::SearchRes),
        (status = 400, description = "Missing name query", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<dto::SearchRes>, ApiError> {
    let name = query
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| bad_request("Name query is required"))?;

    let manager = state.manager()?;
    let patients: Vec<dto::PatientDto> = manager
        .search_by_name(&name)
        .iter()
        .map(dto::PatientDto::from)
        .collect();
    Ok(Json(dto::SearchRes {
        success: true,
        count: patients.len(),
        patients,
    }))
}

#[utoipa::path(
    post,
    path = "/api/patient",
    request_body = dto::PatientInputReq,
    responses(
        (status = 200, description = "Patient added", body = dto::SavePatientRes),
        (status = 400, description = "Invalid patient fields", body = dto::ApiMessage),
        (status = 409, description = "Patient ID already exists", body = dto::ApiMessage)
    )
)]
/// Register a new patient
///
/// The identifier is assigned by the service unless the body carries `patientId`.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<dto::PatientInputReq>, JsonRejection>,
) -> Result<Json<dto::SavePatientRes>, ApiError> {
    let req = json_body(body)?;
    let explicit_id = req.patient_id;
    let fields = req.into_fields();

    let mut manager = state.manager()?;
    let result = match explicit_id {
        Some(id) => manager.add_patient_with_id(id, fields),
        None => manager.add_patient(fields),
    };
    match result {
        Ok(patient) => Ok(Json(dto::SavePatientRes {
            success: true,
            message: "Patient added successfully".into(),
            patient: patient.into(),
        })),
        Err(e) => Err(api_error(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/patient/{id}",
    params(("id" = u32, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient found", body = dto::PatientRes),
        (status = 400, description = "Malformed patient ID", body = dto::ApiMessage),
        (status = 404, description = "Patient not found", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    id: Result<AxumPath<u32>, PathRejection>,
) -> Result<Json<dto::PatientRes>, ApiError> {
    let id = path_id(id)?;
    let mut manager = state.manager()?;
    let patient = manager.search_by_id(id).map_err(api_error)?;
    Ok(Json(dto::PatientRes {
        success: true,
        patient: patient.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/patient/{id}",
    params(("id" = u32, Path, description = "Patient identifier")),
    request_body = dto::PatientInputReq,
    responses(
        (status = 200, description = "Patient updated", body = dto::SavePatientRes),
        (status = 400, description = "Invalid patient fields or malformed ID", body = dto::ApiMessage),
        (status = 404, description = "Patient not found", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    id: Result<AxumPath<u32>, PathRejection>,
    body: Result<Json<dto::PatientInputReq>, JsonRejection>,
) -> Result<Json<dto::SavePatientRes>, ApiError> {
    let id = path_id(id)?;
    let fields = json_body(body)?.into_fields();

    let mut manager = state.manager()?;
    let patient = manager.update_by_id(id, fields).map_err(api_error)?;
    Ok(Json(dto::SavePatientRes {
        success: true,
        message: "Patient updated successfully".into(),
        patient: patient.into(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/patient/{id}",
    params(("id" = u32, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient deleted", body = dto::ApiMessage),
        (status = 400, description = "Malformed patient ID", body = dto::ApiMessage),
        (status = 404, description = "Patient not found", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    id: Result<AxumPath<u32>, PathRejection>,
) -> Result<Json<dto::ApiMessage>, ApiError> {
    let id = path_id(id)?;
    let mut manager = state.manager()?;
    let removed = manager.delete_by_id(id).map_err(api_error)?;
    Ok(Json(dto::ApiMessage::ok(format!(
        "Patient {} deleted successfully",
        removed.name()
    ))))
}

#[utoipa::path(
    get,
    path = "/api/queue",
    responses(
        (status = 200, description = "Waiting list, front first", body = dto::WaitingListRes)
    )
)]
#[axum::debug_handler]
pub async fn get_queue(State(state): State<AppState>) -> Result<Json<dto::WaitingListRes>, ApiError> {
    let manager = state.manager()?;
    let waiting_list: Vec<dto::AppointmentDto> = manager
        .waiting_list()
        .iter()
        .map(dto::AppointmentDto::from)
        .collect();
    Ok(Json(dto::WaitingListRes {
        success: true,
        queue_size: waiting_list.len(),
        waiting_list,
    }))
}

#[utoipa::path(
    post,
    path = "/api/queue",
    request_body = dto::QueueReq,
    responses(
        (status = 200, description = "Patient queued", body = dto::QueueAddRes),
        (status = 404, description = "Patient not found", body = dto::ApiMessage),
        (status = 409, description = "Patient already queued", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn enqueue_patient(
    State(state): State<AppState>,
    body: Result<Json<dto::QueueReq>, JsonRejection>,
) -> Result<Json<dto::QueueAddRes>, ApiError> {
    let req = json_body(body)?;

    let mut manager = state.manager()?;
    let placement = manager
        .enqueue_appointment(req.patient_id)
        .map_err(api_error)?;
    Ok(Json(dto::QueueAddRes {
        success: true,
        message: format!("{} added to queue", placement.patient_name),
        position: placement.position,
        queue_size: placement.queue_size,
    }))
}

#[utoipa::path(
    get,
    path = "/api/queue/next",
    responses(
        (status = 200, description = "Front of the queue", body = dto::NextAppointmentRes),
        (status = 404, description = "Queue is empty", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn peek_next_appointment(
    State(state): State<AppState>,
) -> Result<Json<dto::NextAppointmentRes>, ApiError> {
    let manager = state.manager()?;
    let next = manager.peek_next_appointment().map_err(api_error)?;
    Ok(Json(dto::NextAppointmentRes {
        success: true,
        next_appointment: next.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/queue/process",
    responses(
        (status = 200, description = "Front appointment processed", body = dto::ProcessRes),
        (status = 404, description = "Queue is empty", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn process_next_appointment(
    State(state): State<AppState>,
) -> Result<Json<dto::ProcessRes>, ApiError> {
    let mut manager = state.manager()?;
    let processed = manager.process_next_appointment().map_err(api_error)?;
    Ok(Json(dto::ProcessRes {
        success: true,
        message: format!(
            "Processing appointment for {}",
            processed.appointment.patient_name
        ),
        appointment: processed.appointment.into(),
        remaining_in_queue: processed.remaining,
    }))
}

#[utoipa::path(
    get,
    path = "/api/activities",
    params(ActivitiesQuery),
    responses(
        (status = 200, description = "Newest activity entries first", body = dto::ActivitiesRes)
    )
)]
#[axum::debug_handler]
pub async fn recent_activities(
    State(state): State<AppState>,
    Query(query): Query<ActivitiesQuery>,
) -> Result<Json<dto::ActivitiesRes>, ApiError> {
    let count = query.count.unwrap_or(DEFAULT_RECENT_ACTIVITIES);
    let manager = state.manager()?;
    Ok(Json(dto::ActivitiesRes {
        success: true,
        count: manager.activity_count(),
        activities: manager
            .recent_activities(count)
            .iter()
            .map(dto::ActivityDto::from)
            .collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/activities/all",
    responses(
        (status = 200, description = "Every retained activity entry, newest first", body = dto::ActivitiesRes)
    )
)]
#[axum::debug_handler]
pub async fn all_activities(
    State(state): State<AppState>,
) -> Result<Json<dto::ActivitiesRes>, ApiError> {
    let manager = state.manager()?;
    Ok(Json(dto::ActivitiesRes {
        success: true,
        count: manager.activity_count(),
        activities: manager
            .all_activities()
            .iter()
            .map(dto::ActivityDto::from)
            .collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/activities/pop",
    responses(
        (status = 200, description = "Newest entry removed from the log", body = dto::PoppedActivityRes),
        (status = 404, description = "Activity log is empty", body = dto::ApiMessage)
    )
)]
/// Pop the newest activity entry
///
/// Only the log entry is removed; the operation it describes is not reversed.
#[axum::debug_handler]
pub async fn pop_activity(
    State(state): State<AppState>,
) -> Result<Json<dto::PoppedActivityRes>, ApiError> {
    let mut manager = state.manager()?;
    let popped = manager.undo_last_activity().map_err(api_error)?;
    Ok(Json(dto::PoppedActivityRes {
        success: true,
        popped_activity: popped.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/statistics",
    responses(
        (status = 200, description = "Service statistics", body = dto::StatisticsRes)
    )
)]
#[axum::debug_handler]
pub async fn statistics(
    State(state): State<AppState>,
) -> Result<Json<dto::StatisticsRes>, ApiError> {
    let manager = state.manager()?;
    Ok(Json(manager.statistics().into()))
}

#[utoipa::path(
    post,
    path = "/api/sample-data",
    responses(
        (status = 200, description = "Sample patients added", body = dto::SampleDataRes)
    )
)]
#[axum::debug_handler]
pub async fn load_sample_data(
    State(state): State<AppState>,
) -> Result<Json<dto::SampleDataRes>, ApiError> {
    let mut manager = state.manager()?;
    let count = manager.load_sample_data().map_err(api_error)?;
    Ok(Json(dto::SampleDataRes {
        success: true,
        message: format!("Loaded {} sample patients", count),
        count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/export",
    responses(
        (status = 200, description = "Export document as a JSON attachment", body = dto::ExportDto),
        (status = 500, description = "Internal server error", body = dto::ApiMessage)
    )
)]
#[axum::debug_handler]
pub async fn export_data(State(state): State<AppState>) -> Result<Response, ApiError> {
    let export = dto::ExportDto::from(state.manager()?.export_snapshot());
    let body = serde_json::to_string_pretty(&export).map_err(|e| {
        tracing::error!("Export serialization error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(dto::ApiMessage::failure("Internal error")),
        )
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=patients_export.json",
            ),
        ],
        body,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/clear",
    responses(
        (status = 200, description = "All data cleared", body = dto::ApiMessage)
    )
)]
/// Clear every record, the queue and the activity log, and delete the saved snapshot
#[axum::debug_handler]
pub async fn clear_all_data(
    State(state): State<AppState>,
) -> Result<Json<dto::ApiMessage>, ApiError> {
    let mut manager = state.manager()?;
    manager.clear_all();
    Ok(Json(dto::ApiMessage::ok("All data cleared successfully")))
}
