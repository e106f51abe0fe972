use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt; // for `oneshot`

use api_rest::{router, AppState};
use pms_core::CoreConfig;

fn app(temp_dir: &tempfile::TempDir) -> Router {
    let cfg = CoreConfig::new(PathBuf::from(temp_dir.path()), 100).expect("valid config");
    router(AppState::new(&cfg))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn ahmed() -> Value {
    json!({
        "name": "Ahmed Khan",
        "age": 45,
        "gender": "Male",
        "disease": "Diabetes",
        "contactNumber": "03001234567",
        "appointmentDate": "2024-01-15",
        "visitNotes": "Regular checkup"
    })
}

#[tokio::test]
async fn test_index_and_health() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Patient Management System API");
    assert_eq!(body["endpoints"]["patients"], "/api/patients");

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_patient_crud_flow() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);

    let (status, body) = send(&app, "POST", "/api/patient", Some(ahmed())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Patient added successfully");
    assert_eq!(body["patient"]["patientId"], 1001);

    let (status, body) = send(&app, "GET", "/api/patient/1001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["visitNotes"], "Regular checkup");

    let mut update = ahmed();
    update["age"] = json!(46);
    let (status, body) = send(&app, "PUT", "/api/patient/1001", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["age"], 46);

    let (status, body) = send(&app, "GET", "/api/patients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = send(&app, "DELETE", "/api/patient/1001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Patient Ahmed Khan deleted successfully");

    let (status, body) = send(&app, "GET", "/api/patient/1001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Patient with ID 1001 not found");
}

#[tokio::test]
async fn test_validation_and_conflicts_map_to_status_codes() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);

    let mut bad = ahmed();
    bad["age"] = json!(200);
    let (status, body) = send(&app, "POST", "/api/patient", Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Age must be between 0 and 150");

    let (status, body) = send(&app, "POST", "/api/patient", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Request body is required");

    let mut explicit = ahmed();
    explicit["patientId"] = json!(5);
    let (status, _) = send(&app, "POST", "/api/patient", Some(explicit.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "POST", "/api/patient", Some(explicit)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "DELETE", "/api/patient/4242", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_requires_name() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);
    send(&app, "POST", "/api/sample-data", None).await;

    let (status, body) = send(&app, "GET", "/api/patients/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name query is required");

    let (status, _) = send(&app, "GET", "/api/patients/search?name=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/patients/search?name=%20", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);

    let (status, body) = send(&app, "GET", "/api/patients/search?name=ali", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["patients"][0]["name"], "Fatima Ali");

    let (status, body) = send(&app, "GET", "/api/patients/sorted", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["patientId"], 1001);
    assert_eq!(body[4]["patientId"], 1005);
}

#[tokio::test]
async fn test_malformed_patient_id_is_json_bad_request() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);

    for (method, body) in [("GET", None), ("PUT", Some(ahmed())), ("DELETE", None)] {
        let (status, body) = send(&app, method, "/api/patient/abc", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(body["success"], false, "{method}");
        assert_eq!(body["message"], "Patient ID must be a positive whole number");
    }
}

#[tokio::test]
async fn test_queue_flow() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);

    let (status, body) = send(&app, "POST", "/api/queue/process", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No patients in queue");

    send(&app, "POST", "/api/sample-data", None).await;
    for id in [1001, 1002, 1003] {
        let (status, _) = send(&app, "POST", "/api/queue", Some(json!({ "patientId": id }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "POST", "/api/queue", Some(json!({ "patientId": 1001 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Ahmed Khan is already in the queue");

    let (status, _) = send(&app, "POST", "/api/queue", Some(json!({ "patientId": 9999 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/queue/next", None).await;
    assert_eq!(body["nextAppointment"]["patientId"], 1001);

    let (status, body) = send(&app, "POST", "/api/queue/process", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Processing appointment for Ahmed Khan");
    assert_eq!(body["remainingInQueue"], 2);

    let (_, body) = send(&app, "GET", "/api/queue", None).await;
    assert_eq!(body["queueSize"], 2);
    assert_eq!(body["waitingList"][0]["patientId"], 1002);
    assert_eq!(body["waitingList"][0]["position"], 1);
    assert_eq!(body["waitingList"][1]["position"], 2);
}

#[tokio::test]
async fn test_activities_and_pop() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);

    let (status, _) = send(&app, "POST", "/api/activities/pop", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, "POST", "/api/patient", Some(ahmed())).await;
    send(&app, "GET", "/api/patient/1001", None).await;

    let (_, body) = send(&app, "GET", "/api/activities?count=1", None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["activities"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["activities"][0]["action"], "VIEW");

    let (status, body) = send(&app, "POST", "/api/activities/pop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poppedActivity"]["action"], "VIEW");

    let (_, body) = send(&app, "GET", "/api/activities/all", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["activities"][0]["action"], "ADD");
}

#[tokio::test]
async fn test_statistics_export_and_clear() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);

    let (_, body) = send(&app, "GET", "/api/statistics", None).await;
    assert_eq!(body["totalPatients"], 0);
    assert_eq!(body["dataFile"], Value::Null);

    let (_, body) = send(&app, "POST", "/api/sample-data", None).await;
    assert_eq!(body["count"], 5);
    assert_eq!(body["message"], "Loaded 5 sample patients");

    let (_, body) = send(&app, "GET", "/api/statistics", None).await;
    assert_eq!(body["totalPatients"], 5);
    assert_eq!(body["nextPatientId"], 1006);
    assert_eq!(body["genderDistribution"]["female"], 2);
    assert!(body["dataFile"].is_string());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/export")
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(
        disposition.as_deref(),
        Some("attachment; filename=patients_export.json")
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    let export: Value = serde_json::from_slice(&bytes).expect("export is json");
    assert_eq!(export["statistics"]["totalPatients"], 5);
    assert!(export["exportedAt"].is_string());

    let (status, body) = send(&app, "POST", "/api/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All data cleared successfully");

    let (_, body) = send(&app, "GET", "/api/statistics", None).await;
    assert_eq!(body["totalPatients"], 0);
    assert_eq!(body["nextPatientId"], 1001);
    assert_eq!(body["dataFile"], Value::Null);
}

#[tokio::test]
async fn test_state_survives_restart() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    {
        let app = app(&temp_dir);
        send(&app, "POST", "/api/sample-data", None).await;
        send(&app, "DELETE", "/api/patient/1002", None).await;
    }

    let app = app(&temp_dir);
    let (_, body) = send(&app, "GET", "/api/patients", None).await;
    let ids: Vec<u64> = body
        .as_array()
        .map(|a| a.iter().filter_map(|p| p["patientId"].as_u64()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![1005, 1004, 1003, 1001]);

    let (_, body) = send(&app, "GET", "/api/activities", None).await;
    assert_eq!(body["activities"][0]["action"], "LOAD");
    assert_eq!(body["activities"][0]["details"], "Loaded 4 patients from file");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let app = app(&temp_dir);

    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/patient/{id}"].is_object());
}
