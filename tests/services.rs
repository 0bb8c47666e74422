use rollcall::api::client::ApiClient;
use rollcall::api::models::{
    AttendanceRecord, AttendanceStatus, ClassSessionQuery, NewRegistration, RegistrationStatus,
    SignedUploadRequest,
};
use rollcall::core::normalized_error::NormalizedError;
use rollcall::core::services::{
    AttendanceService, BranchService, ClassSessionService, FeatureService, RegistrationService,
    ScoreService, SessionService, UploadService, UserService,
};
use rollcall::error::ApiError;
use rollcall::storage::backend::MemoryBackend;
use rollcall::storage::local_store::LocalStore;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::new(server.uri())
            .unwrap()
            .with_access_token("tok_test".to_string()),
    )
}

fn user_json() -> Value {
    json!({
        "id": 1,
        "email": "coach@example.test",
        "fullName": "Ana Coach",
        "role": "coach",
        "idAccount": 12
    })
}

#[tokio::test]
async fn current_user_unwraps_single_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer tok_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": user_json()})))
        .expect(1)
        .mount(&server)
        .await;

    let user = UserService::new(client_for(&server))
        .current_user()
        .await
        .unwrap();

    assert_eq!(user.full_name, "Ana Coach");
    assert_eq!(user.id_account, Some(12));
}

#[tokio::test]
async fn get_user_substitutes_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {
                "id": 42, "email": "s@example.test", "fullName": "Student"
            }})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = UserService::new(client_for(&server))
        .get_user(42)
        .await
        .unwrap();
    assert_eq!(user.id, 42);
}

#[tokio::test]
async fn list_branches_unwraps_double_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "data": [
                    {"id": 1, "name": "North"},
                    {"id": 2, "name": "South", "address": "2 Main St"}
                ],
                "total": 2
            },
            "message": "ok"
        })))
        .mount(&server)
        .await;

    let branches = BranchService::new(client_for(&server))
        .list_branches()
        .await
        .unwrap();

    assert_eq!(branches.len(), 2);
    assert_eq!(branches[1].address.as_deref(), Some("2 Main St"));
}

#[tokio::test]
async fn list_branches_with_single_envelope_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/branches"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 1, "name": "North"}]})),
        )
        .mount(&server)
        .await;

    let err = BranchService::new(client_for(&server))
        .list_branches()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn class_sessions_send_filter_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/class-sessions"))
        .and(query_param("year", "2026"))
        .and(query_param("quarter", "4"))
        .and(query_param("idAccount", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"data": [{
            "id": 5,
            "name": "U12 Fundamentals",
            "branchId": 2,
            "startTime": "2026-10-19T09:00:00Z",
            "endTime": "2026-10-19T10:30:00Z"
        }]}})))
        .expect(1)
        .mount(&server)
        .await;

    let query = ClassSessionQuery {
        year: 2026,
        quarter: 4,
        id_account: 12,
    };
    let sessions = ClassSessionService::new(client_for(&server))
        .list_class_sessions(&query)
        .await
        .unwrap();

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].branch_id, 2);
}

#[tokio::test]
async fn scores_send_filter_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scores"))
        .and(query_param("year", "2025"))
        .and(query_param("quarter", "1"))
        .and(query_param("idAccount", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"data": [
            {"id": 1, "studentId": 9, "subject": "Dribbling", "value": 8.5, "maxValue": 10.0}
        ]}})))
        .expect(1)
        .mount(&server)
        .await;

    let query = ClassSessionQuery {
        year: 2025,
        quarter: 1,
        id_account: 3,
    };
    let scores = ScoreService::new(client_for(&server))
        .list_scores(&query)
        .await
        .unwrap();

    assert_eq!(scores[0].subject, "Dribbling");
    assert_eq!(scores[0].max_value, Some(10.0));
}

#[tokio::test]
async fn attendance_list_and_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/class-sessions/5/attendances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"data": [
            {"id": 1, "classSessionId": 5, "studentId": 9, "status": "present"}
        ]}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/attendances"))
        .and(body_json(json!({
            "classSessionId": 5,
            "studentId": 10,
            "status": "late",
            "note": "traffic"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {
            "id": 2,
            "classSessionId": 5,
            "studentId": 10,
            "status": "late",
            "note": "traffic"
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let service = AttendanceService::new(client_for(&server));

    let existing = service.list_attendance(5).await.unwrap();
    assert_eq!(existing[0].status, AttendanceStatus::Present);

    let recorded = service
        .record_attendance(&AttendanceRecord {
            class_session_id: 5,
            student_id: 10,
            status: AttendanceStatus::Late,
            note: Some("traffic".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(recorded.id, 2);
    assert_eq!(recorded.note.as_deref(), Some("traffic"));
}

#[tokio::test]
async fn registrations_list_and_create() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/registrations"))
        .and(query_param("idAccount", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"data": [
            {"id": 7, "studentId": 9, "classSessionId": 5, "status": "active"}
        ]}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/registrations"))
        .and(body_json(json!({"studentId": 9, "classSessionId": 6})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {
            "id": 8, "studentId": 9, "classSessionId": 6, "status": "pending"
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let service = RegistrationService::new(client_for(&server));

    let registrations = service.list_registrations(12).await.unwrap();
    assert_eq!(registrations[0].status, RegistrationStatus::Active);

    let created = service
        .create_registration(&NewRegistration {
            student_id: 9,
            class_session_id: 6,
        })
        .await
        .unwrap();
    assert_eq!(created.status, RegistrationStatus::Pending);
}

#[tokio::test]
async fn features_and_flag_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/features"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
            {"key": "scores", "enabled": true},
            {"key": "payments", "enabled": false}
        ]})))
        .mount(&server)
        .await;

    let service = FeatureService::new(client_for(&server));

    assert_eq!(service.list_features().await.unwrap().len(), 2);
    assert!(service.is_enabled("scores").await.unwrap());
    assert!(!service.is_enabled("payments").await.unwrap());
    assert!(!service.is_enabled("unknown").await.unwrap());
}

#[tokio::test]
async fn signed_upload_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/signed-url"))
        .and(body_json(json!({"fileName": "avatar.png", "contentType": "image/png"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {
            "uploadUrl": "https://storage.example.test/put?sig=abc",
            "fileUrl": "https://cdn.example.test/avatar.png"
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let signed = UploadService::new(client_for(&server))
        .create_signed_url(&SignedUploadRequest {
            file_name: "avatar.png".to_string(),
            content_type: "image/png".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(signed.file_url, "https://cdn.example.test/avatar.png");
}

#[tokio::test]
async fn not_found_is_returned_unchanged_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/branches/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let err = BranchService::new(client_for(&server))
        .get_branch(404)
        .await
        .unwrap_err();

    match &err {
        ApiError::Http { status, body, .. } => {
            assert_eq!(*status, 404);
            assert_eq!(body.as_ref(), Some(&json!({"message": "not found"})));
        }
        other => panic!("expected Http error, got {:?}", other),
    }

    let normalized = NormalizedError::from(&err);
    assert_eq!(normalized.status, 404);
    assert_eq!(normalized.message, "not found");
    assert_eq!(normalized.data, Some(json!({"message": "not found"})));
}

#[tokio::test]
async fn session_caches_current_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": user_json()})))
        .mount(&server)
        .await;

    let store = LocalStore::new(Arc::new(MemoryBackend::new()));
    let session = SessionService::new(store.clone());

    let user = UserService::new(client_for(&server))
        .current_user()
        .await
        .unwrap();
    session.remember_user(&user).await;

    assert_eq!(session.cached_user(Some("tok_test")).await, Some(user.clone()));
    assert_eq!(session.cached_user(None).await, None);
    assert!(session.require_cached_user(Some("")).await.is_err());

    let raw: Option<Value> = store.get("current_user").await;
    assert_eq!(raw.unwrap()["fullName"], "Ana Coach");
}
