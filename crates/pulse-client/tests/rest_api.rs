//! REST client behaviour against a mock TaskPulse backend.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use pulse_auth::Session;
use pulse_client::wire::{Credentials, NewTask, ProfilePatch};
use pulse_client::{ApiError, PulseClient};
use pulse_core::chat::MessageDraft;
use pulse_core::entities::{AuthState, ReportSubject, Upload};
use pulse_core::enums::{StatusFilter, TaskPriority, TaskStatus, UserRole};
use pulse_core::projection::TaskFilters;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Подготовить отчёт",
        "description": "",
        "priority": "high",
        "status": status,
        "due_at": "2024-05-01T12:00:00Z",
        "creator": 1,
        "assignee": 2
    })
}

fn logged_in(role: UserRole) -> Arc<Session> {
    let session = Session::ephemeral();
    session
        .set(AuthState::new("secret-token", "anna@example.com", role))
        .expect("set session");
    Arc::new(session)
}

fn client_for(server: &MockServer, session: Arc<Session>) -> PulseClient {
    PulseClient::with_base_url(format!("{}/api", server.uri()), session).expect("client builds")
}

#[tokio::test]
async fn login_returns_state_without_sending_a_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({"email": "anna@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh",
            "user": {"id": 1, "email": "anna@example.com", "role": "CREATOR"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(Session::ephemeral()));
    let state = client
        .login(&Credentials {
            email: "anna@example.com".into(),
            password: "pw".into(),
        })
        .await
        .expect("login succeeds");

    assert_eq!(state, AuthState::new("fresh", "anna@example.com", UserRole::Creator));
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn login_failure_surfaces_non_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "non_field_errors": ["Неверный email или пароль."]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(Session::ephemeral()));
    let err = client
        .login(&Credentials {
            email: "anna@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Api { status: 400, ref message } if message == "Неверный email или пароль."
    ));
}

#[tokio::test]
async fn list_tasks_sends_token_and_creator_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .and(header("authorization", "Token secret-token"))
        .and(query_param("status", "in_progress"))
        .and(query_param("only_my", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json(1, "in_progress")])))
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Creator));
    let tasks = client
        .list_tasks(&TaskFilters {
            status: StatusFilter::InProgress,
            only_mine: true,
            assignee: None,
        })
        .await
        .expect("tasks load");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
}

#[tokio::test]
async fn expired_token_is_reported_as_auth_expired() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})))
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Executor));
    let err = client.fetch_profile().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(err.to_string(), "unauthorized (401): Invalid token.");
}

#[tokio::test]
async fn mark_done_then_refetch_shows_done() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/7/"))
        .and(body_json(json!({"status": "done"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(7, "done")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_json(7, "done")])))
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Executor));
    let updated = client
        .set_task_status(7, TaskStatus::Done)
        .await
        .expect("status update");
    assert_eq!(updated.status, TaskStatus::Done);

    let tasks = client.list_tasks(&TaskFilters::default()).await.expect("refetch");
    assert_eq!(tasks[0].status, TaskStatus::Done);
}

#[tokio::test]
async fn create_task_rejects_blank_title_locally() {
    let server = MockServer::start().await;
    let client = client_for(&server, logged_in(UserRole::Creator));
    let err = client
        .create_task(&NewTask {
            title: "   ".into(),
            description: String::new(),
            priority: TaskPriority::Low,
            due_at: None,
            assignee: Some(2),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(server.received_requests().await.expect("recording").is_empty());
}

#[tokio::test]
async fn request_extension_posts_comment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/3/extend-1d/"))
        .and(body_json(json!({"comment": "Нужен ещё день"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(3, "in_progress")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Executor));
    let task = client
        .request_extension(3, "Нужен ещё день")
        .await
        .expect("extension");
    assert_eq!(task.id, 3);
}

#[tokio::test]
async fn text_message_is_sent_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/conversation-messages/"))
        .and(body_json(json!({"user_id": 2, "text": "Готово", "task": 7})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 55,
            "task": 7,
            "sender": 1,
            "sender_name": "Анна",
            "is_from_creator": true,
            "is_from_executor": false,
            "text": "Готово",
            "created_at": "2024-04-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Creator));
    let sent = client
        .send_message(&MessageDraft::text(2, " Готово ").for_task(7))
        .await
        .expect("send");
    assert_eq!(sent.id, 55);
}

#[tokio::test]
async fn message_with_file_is_sent_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/conversation-messages/"))
        .and(body_string_contains("name=\"file\"; filename=\"scan.pdf\""))
        .and(body_string_contains("name=\"user_id\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 56,
            "sender_name": "Анна",
            "is_from_creator": true,
            "is_from_executor": false,
            "file_url": "http://localhost/media/scan.pdf",
            "created_at": "2024-04-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Creator));
    let draft = MessageDraft::text(2, "").with_file(Upload::new("scan.pdf", b"%PDF".to_vec()));
    let sent = client.send_message(&draft).await.expect("send");
    assert_eq!(sent.body(), None);
    assert!(sent.file_url.is_some());
}

#[tokio::test]
async fn password_reset_request_posts_email_without_a_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/password-reset/"))
        .and(body_json(json!({"email": "anna@example.com"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "detail": "Ссылка для сброса пароля отправлена."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(Session::ephemeral()));
    let detail = client
        .request_password_reset("anna@example.com")
        .await
        .expect("reset requested");

    assert_eq!(detail.detail.as_deref(), Some("Ссылка для сброса пароля отправлена."));
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn password_reset_request_surfaces_unknown_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/password-reset/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["Пользователь с таким email не найден."]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(Session::ephemeral()));
    let err = client.request_password_reset("ghost@example.com").await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 400, .. }));
    assert!(err.to_string().contains("не найден"));
}

#[tokio::test]
async fn blank_message_never_reaches_the_network() {
    let server = MockServer::start().await;
    let client = client_for(&server, logged_in(UserRole::Creator));
    let err = client.send_message(&MessageDraft::text(2, "  ")).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(server.received_requests().await.expect("recording").is_empty());
}

#[tokio::test]
async fn telegram_profile_404_means_not_linked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/integrations/telegram/profile/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Executor));
    assert_eq!(client.telegram_profile().await.expect("lookup"), None);
}

#[tokio::test]
async fn monthly_report_passes_month_and_subject() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reports/monthly/"))
        .and(query_param("month", "2024-04"))
        .and(query_param("user", "me"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": 2,
            "month": "2024-04",
            "total": 4,
            "done": 3,
            "done_on_time": 2,
            "done_late": 1,
            "by_priority": [
                {"priority": "high", "total": 2, "done": 2, "done_on_time": 1, "done_late": 1}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reports/monthly/"))
        .and(query_param("format", "csv"))
        .and(query_param("user", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("month,total\n2024-04,4\n"))
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Creator));
    let kpi = client
        .monthly_report("2024-04", ReportSubject::Me)
        .await
        .expect("report");
    assert_eq!(kpi.done, 3);
    assert_eq!(kpi.by_priority[0].priority, TaskPriority::High);

    let csv = client
        .monthly_report_csv("2024-04", ReportSubject::User(9))
        .await
        .expect("csv");
    assert_eq!(csv, b"month,total\n2024-04,4\n".to_vec());

    let err = client
        .monthly_report("April", ReportSubject::Me)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn profile_update_uses_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/auth/profile/"))
        .and(body_string_contains("name=\"position\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "role": "creator",
            "email": "anna@example.com",
            "full_name": "Анна",
            "position": "Директор"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, logged_in(UserRole::Creator));
    let profile = client
        .update_profile(&ProfilePatch {
            position: Some("Директор".into()),
            ..ProfilePatch::default()
        })
        .await
        .expect("update");
    assert_eq!(profile.position.as_deref(), Some("Директор"));
}
