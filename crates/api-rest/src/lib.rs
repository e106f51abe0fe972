//! # API REST
//!
//! REST API implementation for the patient management service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for wire types and `pms-core` for every operation.

#![warn(rust_2018_idioms)]

mod handlers;

use axum::{
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::dto;
use pms_core::{CoreConfig, ErrorKind, PatientError, PatientManager};

/// Application state for the REST API server
///
/// One manager behind one lock: every handler holds the lock for its whole operation, so no
/// request ever sees the list, index, queue and log half-updated.
#[derive(Clone)]
pub struct AppState {
    manager: Arc<Mutex<PatientManager>>,
}

impl AppState {
    /// Opens the manager over the snapshot in the configured data directory.
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::from_manager(PatientManager::open(cfg))
    }

    pub fn from_manager(manager: PatientManager) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
        }
    }

    pub(crate) fn manager(&self) -> Result<MutexGuard<'_, PatientManager>, ApiError> {
        self.manager.lock().map_err(|_| {
            tracing::error!("patient manager lock poisoned");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(dto::ApiMessage::failure("Internal error")),
            )
        })
    }
}

/// Status code plus `{success: false, message}` body.
pub(crate) type ApiError = (StatusCode, Json<dto::ApiMessage>);

/// Maps a manager failure onto an HTTP status, keeping the manager's message.
pub(crate) fn api_error(err: PatientError) -> ApiError {
    let status = match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound | ErrorKind::Empty => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Patient manager error: {:?}", err);
    } else {
        tracing::debug!(%status, "request rejected: {}", err);
    }
    (status, Json(dto::ApiMessage::failure(err.to_string())))
}

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(dto::ApiMessage::failure(message)),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::index,
        handlers::health,
        handlers::list_patients,
        handlers::list_patients_sorted,
        handlers::search_patients,
        handlers::create_patient,
        handlers::get_patient,
        handlers::update_patient,
        handlers::delete_patient,
        handlers::get_queue,
        handlers::enqueue_patient,
        handlers::peek_next_appointment,
        handlers::process_next_appointment,
        handlers::recent_activities,
        handlers::all_activities,
        handlers::pop_activity,
        handlers::statistics,
        handlers::load_sample_data,
        handlers::export_data,
        handlers::clear_all_data,
    ),
    components(schemas(
        dto::ApiInfo,
        dto::ApiEndpoints,
        dto::HealthRes,
        dto::ApiMessage,
        dto::PatientDto,
        dto::PatientInputReq,
        dto::PatientRes,
        dto::SavePatientRes,
        dto::SearchRes,
        dto::QueueReq,
        dto::QueueAddRes,
        dto::AppointmentDto,
        dto::ProcessRes,
        dto::WaitingListRes,
        dto::NextAppointmentRes,
        dto::ActivityDto,
        dto::ActivitiesRes,
        dto::PoppedActivityRes,
        dto::GenderDistributionDto,
        dto::StatisticsRes,
        dto::SampleDataRes,
        dto::ExportStatisticsDto,
        dto::ExportDto,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST router: API routes, Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/patients", get(handlers::list_patients))
        .route("/api/patients/sorted", get(handlers::list_patients_sorted))
        .route("/api/patients/search", get(handlers::search_patients))
        .route("/api/patient", post(handlers::create_patient))
        .route(
            "/api/patient/:id",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .route(
            "/api/queue",
            get(handlers::get_queue).post(handlers::enqueue_patient),
        )
        .route("/api/queue/next", get(handlers::peek_next_appointment))
        .route(
            "/api/queue/process",
            post(handlers::process_next_appointment),
        )
        .route("/api/activities", get(handlers::recent_activities))
        .route("/api/activities/all", get(handlers::all_activities))
        .route("/api/activities/pop", post(handlers::pop_activity))
        .route("/api/statistics", get(handlers::statistics))
        .route("/api/sample-data", post(handlers::load_sample_data))
        .route("/api/export", get(handlers::export_data))
        .route("/api/clear", post(handlers::clear_all_data))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
