//! End-to-end tests for the authenticated request flow
//!
//! These tests drive the real reqwest transport and file-backed session
//! against a mock API server: sign-in, token refresh on 401, failure
//! handling, and a session (refresh cookie included) surviving a restart.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::tempdir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use folio_application::{ApiClient, ApiError, DEFAULT_REFRESH_PATH, SessionStore};
use folio_domain::{LoginRequest, Workspace};
use folio_infrastructure::{FileCredentialStorage, ReqwestTransport};

const WORKSPACES: &str = "/api/workspaces/";
const REFRESH: &str = "/api/auth/user/token/refresh/";

fn user_json() -> serde_json::Value {
    json!({
        "id": "0b8f3c44-4f55-4b51-9d1f-4ab1a0c6b0d2",
        "username": "ada",
        "email": "ada@example.com"
    })
}

fn workspace_json() -> serde_json::Value {
    json!([{
        "id": "a0d7d6a2-3c0f-4a8e-8e0c-2b0c8f1a9e77",
        "name": "Drafts",
        "created_by": "0b8f3c44-4f55-4b51-9d1f-4ab1a0c6b0d2"
    }])
}

async fn client(server: &MockServer, credentials: &Path) -> ApiClient {
    let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let session = client_session(credentials).await;
    let transport = ReqwestTransport::new(base, "Folio/test", Duration::from_secs(5))
        .unwrap()
        .with_session_cookies(session.clone());
    ApiClient::new(Arc::new(transport), session, DEFAULT_REFRESH_PATH)
}

async fn signed_in(server: &MockServer, credentials: &Path) -> ApiClient {
    Mock::given(method("POST"))
        .and(path("/api/auth/user/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refresh_token=R1; Path=/; HttpOnly")
                .set_body_json(json!({ "access": "T1", "refresh": "", "user": user_json() })),
        )
        .mount(server)
        .await;

    let client = client(server, credentials).await;
    client
        .auth()
        .login(&LoginRequest::with_username("ada", "secret"))
        .await
        .unwrap();
    client
}

async fn mock_workspaces(server: &MockServer, token: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(WORKSPACES))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(response)
        .mount(server)
        .await;
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({ "detail": "Given token not valid" }))
}

#[tokio::test]
async fn test_expired_token_is_refreshed_and_request_reissued() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let credentials = dir.path().join("credentials.json");
    let client = signed_in(&server, &credentials).await;

    mock_workspaces(&server, "T1", unauthorized()).await;
    mock_workspaces(
        &server,
        "T2",
        ResponseTemplate::new(200).set_body_json(workspace_json()),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .and(header("cookie", "refresh_token=R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "T2" })))
        .expect(1)
        .mount(&server)
        .await;

    let workspaces: Vec<Workspace> = client.workspaces().list().await.unwrap();

    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0].name, "Drafts");
    assert_eq!(client.session().access_token().await, "T2");

    let restarted = client_session(&credentials).await;
    assert_eq!(restarted.access_token().await, "T2");
}

#[tokio::test]
async fn test_refresh_works_in_a_later_run() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let credentials = dir.path().join("credentials.json");
    drop(signed_in(&server, &credentials).await);

    mock_workspaces(&server, "T1", unauthorized()).await;
    mock_workspaces(
        &server,
        "T2",
        ResponseTemplate::new(200).set_body_json(workspace_json()),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .and(header("cookie", "refresh_token=R1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "T2" })))
        .expect(1)
        .mount(&server)
        .await;

    let later = client(&server, &credentials).await;
    let workspaces: Vec<Workspace> = later.workspaces().list().await.unwrap();

    assert_eq!(workspaces[0].name, "Drafts");
    assert_eq!(later.session().access_token().await, "T2");
    assert!(client_session(&credentials).await.is_authenticated().await);
}

#[tokio::test]
async fn test_failed_refresh_signs_out() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let credentials = dir.path().join("credentials.json");
    let client = signed_in(&server, &credentials).await;

    mock_workspaces(&server, "T1", unauthorized()).await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Token is invalid or expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.workspaces().list().await.unwrap_err();

    assert!(matches!(err, ApiError::RefreshFailed(_)));
    assert_eq!(err.server_message().as_deref(), Some("Token is invalid or expired"));
    assert!(!client.session().is_authenticated().await);
    assert!(!client_session(&credentials).await.is_authenticated().await);
}

#[tokio::test]
async fn test_forbidden_is_not_refreshed() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = signed_in(&server, &dir.path().join("credentials.json")).await;

    mock_workspaces(
        &server,
        "T1",
        ResponseTemplate::new(403).set_body_json(json!({ "detail": "Not a member" })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "T2" })))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.workspaces().list().await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(client.session().access_token().await, "T1");
}

#[tokio::test]
async fn test_second_401_is_returned_without_another_refresh() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = signed_in(&server, &dir.path().join("credentials.json")).await;

    mock_workspaces(&server, "T1", unauthorized()).await;
    mock_workspaces(&server, "T2", unauthorized()).await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "T2" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.workspaces().list().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(!matches!(err, ApiError::RefreshFailed(_)));
    assert_eq!(client.session().access_token().await, "T2");
}

#[tokio::test]
async fn test_concurrent_requests_share_one_refresh() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = signed_in(&server, &dir.path().join("credentials.json")).await;

    mock_workspaces(&server, "T1", unauthorized()).await;
    mock_workspaces(
        &server,
        "T2",
        ResponseTemplate::new(200).set_body_json(workspace_json()),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "T2" }))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client.workspaces();
    let (a, b, c) = tokio::join!(api.list(), api.list(), api.list());

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert!(c.is_ok());
}

#[tokio::test]
async fn test_logout_forgets_stored_session() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let credentials = dir.path().join("credentials.json");
    let client = signed_in(&server, &credentials).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/user/logout/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "detail": "ok" })))
        .expect(2)
        .mount(&server)
        .await;

    assert!(client_session(&credentials).await.is_authenticated().await);
    client.auth().logout().await.unwrap();
    client.auth().logout().await.unwrap();

    let stored = client_session(&credentials).await;
    assert!(!stored.is_authenticated().await);
    assert!(stored.snapshot().await.is_empty());
}

async fn client_session(credentials: &Path) -> SessionStore {
    SessionStore::load(Arc::new(FileCredentialStorage::new(credentials)))
        .await
        .unwrap()
}
