//! Router tests against a mocked database and in-memory object storage.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bytes::Bytes;
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use folio_api::{AppState, create_router};
use folio_core::auth::AdminAllowlist;
use folio_core::storage::{BlobKind, BlobStore, StorageConfig, StorageService};
use folio_core::upload::{IMAGE_MAX_BYTES, PACKAGE_MAX_BYTES};
use folio_db::entities::{apps, sea_orm_active_enums, users};
use folio_shared::config::UploadConfig;
use folio_shared::{JwtConfig, JwtService};

const SECRET: &str = "router-test-secret-at-least-32-bytes!!";
const BOUNDARY: &str = "folio-test-boundary";

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_token_expires_minutes: 60,
    })
}

fn router(db: DatabaseConnection, storage: StorageService) -> Router {
    create_router(AppState::new(
        Arc::new(db),
        jwt(),
        storage,
        AdminAllowlist::default(),
        UploadConfig::default(),
    ))
}

fn memory_storage() -> StorageService {
    StorageService::from_config(StorageConfig::memory()).unwrap()
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn app_model(id: Uuid) -> apps::Model {
    let now = Utc::now().into();
    apps::Model {
        id,
        title: "Photo Editor Plus".into(),
        description: "Edit photos".into(),
        category: "Photography".into(),
        tags: vec!["iOS".into(), "Android".into()],
        display_order: 1,
        download_link: None,
        file_path: None,
        file_name: None,
        file_size: None,
        file_type: None,
        image_path: None,
        image_url: None,
        download_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn user_model(id: Uuid, role: sea_orm_active_enums::UserRole) -> users::Model {
    let now = Utc::now().into();
    users::Model {
        id,
        email: Some("owner@example.com".into()),
        full_name: None,
        avatar_url: None,
        role,
        created_at: now,
        updated_at: now,
    }
}

fn exec(rows: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: rows,
    }
}

fn bearer(user_id: Uuid) -> String {
    let token = jwt()
        .generate_access_token(user_id, Some("owner@example.com"))
        .unwrap();
    format!("Bearer {token}")
}

fn multipart_body(app_id: Option<Uuid>, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(id) = app_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"appId\"\r\n\r\n{id}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Multipart body with `file` before `appId`, padded with `size` zero bytes.
fn file_first_body(app_id: Uuid, file_name: &str, size: usize) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.resize(body.len() + size, 0);
    body.extend_from_slice(
        format!(
            "\r\n--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"appId\"\r\n\r\n{app_id}\r\n--{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    body
}

fn admin_db(admin_id: Uuid) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(
            admin_id,
            sea_orm_active_enums::UserRole::Admin,
        )]])
        .into_connection()
}

fn upload_request(path: &str, auth: Option<String>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = router(empty_db(), memory_storage())
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_upload_without_token_is_unauthorized() {
    let body = multipart_body(Some(Uuid::now_v7()), "app.apk", b"PK");
    let response = router(empty_db(), memory_storage())
        .oneshot(upload_request("/api/apps/upload", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "Unauthorized");
}

#[tokio::test]
async fn test_upload_by_non_admin_is_forbidden() {
    let user_id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(
            user_id,
            sea_orm_active_enums::UserRole::User,
        )]])
        .into_connection();

    let body = multipart_body(Some(Uuid::now_v7()), "app.apk", b"PK");
    let response = router(db, memory_storage())
        .oneshot(upload_request("/api/apps/upload", Some(bearer(user_id)), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(response).await["error"],
        "Forbidden: Admin access required"
    );
}

#[tokio::test]
async fn test_download_requires_app_id() {
    let response = router(empty_db(), memory_storage())
        .oneshot(Request::get("/api/apps/download").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "App ID is required");
}

#[tokio::test]
async fn test_download_without_artifact_is_not_found() {
    let id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![app_model(id)]])
        .into_connection();

    let response = router(db, memory_storage())
        .oneshot(
            Request::get(format!("/api/apps/download?appId={id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await["error"],
        "No download available for this app"
    );
}

#[tokio::test]
async fn test_download_redirects_to_external_link() {
    let id = Uuid::now_v7();
    let mut model = app_model(id);
    model.download_link = Some("https://play.google.com/store/apps/details?id=x".into());
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .append_exec_results([exec(1)])
        .into_connection();

    let response = router(db, memory_storage())
        .oneshot(
            Request::get(format!("/api/apps/download?appId={id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://play.google.com/store/apps/details?id=x"
    );
}

#[tokio::test]
async fn test_download_streams_stored_package() {
    let id = Uuid::now_v7();
    let path = format!("apps/{id}/1700000000000_my_app.apk");
    let storage = memory_storage();
    storage
        .put(
            BlobKind::Package,
            &path,
            Bytes::from_static(b"PK\x03\x04"),
            "application/vnd.android.package-archive",
        )
        .await
        .unwrap();

    let mut model = app_model(id);
    model.file_path = Some(path);
    model.file_name = Some("my app.apk".into());
    model.file_type = Some(sea_orm_active_enums::FileType::Apk);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .append_exec_results([exec(1)])
        .into_connection();

    let response = router(db, storage)
        .oneshot(
            Request::get(format!("/api/apps/download?appId={id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "application/vnd.android.package-archive"
    );
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"my%20app.apk\""
    );
    assert_eq!(headers[header::CONTENT_LENGTH], "4");
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "public, max-age=31536000, immutable"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"PK\x03\x04");
}

#[tokio::test]
async fn test_image_upload_scenario_photo_png() {
    let admin_id = Uuid::now_v7();
    let app_id = Uuid::now_v7();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(
            admin_id,
            sea_orm_active_enums::UserRole::Admin,
        )]])
        .append_query_results([vec![app_model(app_id)]])
        .append_exec_results([exec(1)])
        .into_connection();

    let data = vec![0u8; 9 * 1024 * 1024];
    let body = multipart_body(Some(app_id), "photo.PNG", &data);
    let response = router(db, memory_storage())
        .oneshot(upload_request(
            "/api/apps/upload-image",
            Some(bearer(admin_id)),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["fileName"], "photo.PNG");
    let path = body["filePath"].as_str().unwrap();
    assert!(path.starts_with(&format!("apps/{app_id}/")));
    assert!(path.ends_with("_photo.PNG"));
    assert!(
        body["publicUrl"]
            .as_str()
            .unwrap()
            .ends_with(&format!("/app-image/{path}"))
    );
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn test_oversized_image_is_rejected() {
    let admin_id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(
            admin_id,
            sea_orm_active_enums::UserRole::Admin,
        )]])
        .into_connection();

    let data = vec![0u8; 11 * 1024 * 1024];
    let body = multipart_body(Some(Uuid::now_v7()), "huge.png", &data);
    let response = router(db, memory_storage())
        .oneshot(upload_request(
            "/api/apps/upload-image",
            Some(bearer(admin_id)),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "File size exceeds 10MB limit"
    );
}

#[tokio::test]
async fn test_oversized_package_is_rejected() {
    let admin_id = Uuid::now_v7();
    let size = usize::try_from(PACKAGE_MAX_BYTES).unwrap() + 1;
    let mut body = multipart_body(Some(Uuid::now_v7()), "big.apk", b"");
    let trailer = format!("\r\n--{BOUNDARY}--\r\n").len();
    let data_end = body.len() - trailer;
    body.splice(data_end..data_end, std::iter::repeat_n(0u8, size));

    let response = router(admin_db(admin_id), memory_storage())
        .oneshot(upload_request(
            "/api/apps/upload",
            Some(bearer(admin_id)),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "File size exceeds 500MB limit"
    );
}

#[tokio::test]
async fn test_oversized_file_before_app_id_reports_size() {
    let admin_id = Uuid::now_v7();
    let size = usize::try_from(IMAGE_MAX_BYTES).unwrap() + 1024 * 1024;
    let body = file_first_body(Uuid::now_v7(), "huge.png", size);

    let response = router(admin_db(admin_id), memory_storage())
        .oneshot(upload_request(
            "/api/apps/upload-image",
            Some(bearer(admin_id)),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "File size exceeds 10MB limit"
    );
}

#[tokio::test]
async fn test_file_before_app_id_within_limit_is_stored() {
    let admin_id = Uuid::now_v7();
    let app_id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(
            admin_id,
            sea_orm_active_enums::UserRole::Admin,
        )]])
        .append_query_results([vec![app_model(app_id)]])
        .append_exec_results([exec(1)])
        .into_connection();

    let body = file_first_body(app_id, "cover.webp", 1024);
    let response = router(db, memory_storage())
        .oneshot(upload_request(
            "/api/apps/upload-image",
            Some(bearer(admin_id)),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["fileName"], "cover.webp");
    assert_eq!(body["fileSize"], 1024);
}

#[tokio::test]
async fn test_upload_without_app_id_is_rejected() {
    let admin_id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(
            admin_id,
            sea_orm_active_enums::UserRole::Admin,
        )]])
        .into_connection();

    let body = multipart_body(None, "app.apk", b"PK");
    let response = router(db, memory_storage())
        .oneshot(upload_request(
            "/api/apps/upload",
            Some(bearer(admin_id)),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "App ID is required. Please save the app first, then upload the file."
    );
}
