//! Integration tests for the HTTP client core and endpoint groups.

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use tgadmin_client::{
    ApiClient, ApiError, ClientConfig, ErrorKind, MemoryTokenStore, RouteTracker, Session,
    TokenStore,
};
use tgadmin_core::{LoginRequest, Route};

fn client_for(server: &ServerGuard) -> ApiClient {
    ApiClient::new(&ClientConfig::new(server.url())).unwrap()
}

async fn logged_in_client(server: &ServerGuard, token: &str) -> ApiClient {
    let client = client_for(server);
    client.session().begin(token).await.unwrap();
    client
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_with_id_only_stores_bearer_token() {
    let mut server = Server::new_async().await;

    let login = server
        .mock("POST", "/api/v1/auth/login/admin")
        .match_header("content-type", "application/json")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({ "telegram_user_id": 123_456_789 })))
        .with_status(200)
        .with_body(r#"{"access_token":"tok-1","token_type":"bearer"}"#)
        .create_async()
        .await;

    let me = server
        .mock("GET", "/api/v1/auth/me")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_body(r#"{"id":"u1","username":"root","is_admin":true}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let token = client
        .auth()
        .login(&LoginRequest::new(123_456_789))
        .await
        .unwrap();
    assert_eq!(token.access_token, "tok-1");
    assert!(client.session().is_authenticated().await);

    let admin = client.auth().me().await.unwrap();
    assert_eq!(admin.id(), Some("u1"));

    login.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn test_failed_login_keeps_session_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login/admin")
        .with_status(403)
        .with_body(r#"{"detail":"Admin access not granted"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .auth()
        .login(&LoginRequest::new(1).username("someone"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.detail(), Some("Admin access not granted"));
    assert!(!client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_logout_clears_session_and_navigates() {
    let server = Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    let tracker = Arc::new(RouteTracker::default());

    let client = client_for(&server)
        .with_session(Arc::new(Session::new(store.clone())))
        .with_navigator(tracker.clone());
    client.session().begin("tok").await.unwrap();
    assert_eq!(store.load().await.unwrap().as_deref(), Some("tok"));

    client.auth().logout().await.unwrap();

    assert!(!client.session().is_authenticated().await);
    assert!(store.load().await.unwrap().is_none());
    assert_eq!(tracker.current(), Route::Login);
}

// ============================================================================
// 401 Policy
// ============================================================================

#[tokio::test]
async fn test_unauthorized_clears_session_and_navigates_to_login() {
    let mut server = Server::new_async().await;
    let store = Arc::new(MemoryTokenStore::new());
    let tracker = Arc::new(RouteTracker::new(Route::Bots));

    let rejected = server
        .mock("GET", "/api/v1/bots/all")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer expired")
        .with_status(401)
        .with_body(r#"{"detail":"Could not validate credentials"}"#)
        .expect(1)
        .create_async()
        .await;

    let anonymous = server
        .mock("GET", "/api/v1/payments/pending")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .with_body(r#"{"detail":"Not authenticated"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server)
        .with_session(Arc::new(Session::new(store.clone())))
        .with_navigator(tracker.clone());
    client.session().begin("expired").await.unwrap();

    let err = client.bots().list(1, 10).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(err.detail(), Some("Could not validate credentials"));

    assert!(!client.session().is_authenticated().await);
    assert!(store.load().await.unwrap().is_none());
    assert_eq!(tracker.current(), Route::Login);

    // The cleared token is never sent again.
    let err = client.payments().pending().await.unwrap_err();
    assert!(err.is_unauthorized());

    rejected.assert_async().await;
    anonymous.assert_async().await;
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_status_error_carries_detail() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/bots/missing")
        .with_status(404)
        .with_body(r#"{"detail":"Bot not found"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/api/v1/bots/b1/restart")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = logged_in_client(&server, "tok").await;

    let err = client.bots().get("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "HTTP 404: Bot not found");

    let err = client.bots().restart("b1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.detail(), Some("Internal Server Error"));

    // Non-401 failures leave the session alone.
    assert!(client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_undecodable_body_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/subscriptions/expired/list")
        .with_status(200)
        .with_body(r#"{"unexpected":"object"}"#)
        .create_async()
        .await;

    let client = logged_in_client(&server, "tok").await;
    let err = client.subscriptions().expired().await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidResponse(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

// ============================================================================
// Endpoint Groups
// ============================================================================

#[tokio::test]
async fn test_users_list_uses_trailing_slash() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/users/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("size".into(), "10".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({
                "items": [{ "id": "u11", "username": "alice" }],
                "total": 11,
                "page": 2,
                "size": 10,
                "pages": 2
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = logged_in_client(&server, "tok").await;
    let page = client.users().list(2, 10).await.unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(page.page_count(10), 2);
    assert_eq!(page.items[0].str_field("username"), Some("alice"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_payments_list_sends_status_filter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/payments/all")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("size".into(), "10".into()),
            Matcher::UrlEncoded("status_filter".into(), "pending".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"items":[{"id":"p1","status":"pending"}],"total":1}"#)
        .create_async()
        .await;

    let client = logged_in_client(&server, "tok").await;
    let page = client.payments().list(1, 10, Some("pending")).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].status(), Some("pending"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_payment_actions() {
    let mut server = Server::new_async().await;
    let reject = server
        .mock("POST", "/api/v1/payments/p1/reject")
        .match_query(Matcher::UrlEncoded(
            "reason".into(),
            "insufficient proof".into(),
        ))
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_body(r#"{"message":"Payment rejected"}"#)
        .create_async()
        .await;
    let confirm = server
        .mock("POST", "/api/v1/payments/p2/confirm")
        .with_status(200)
        .with_body(r#"{"message":"Payment confirmed"}"#)
        .create_async()
        .await;

    let client = logged_in_client(&server, "tok").await;

    let result = client
        .payments()
        .reject("p1", "insufficient proof")
        .await
        .unwrap();
    assert_eq!(result["message"], "Payment rejected");
    client.payments().confirm("p2").await.unwrap();

    reject.assert_async().await;
    confirm.assert_async().await;
}

#[tokio::test]
async fn test_subscription_extend_and_expiring() {
    let mut server = Server::new_async().await;
    let extend = server
        .mock("POST", "/api/v1/subscriptions/s1/extend")
        .match_query(Matcher::UrlEncoded("days".into(), "30".into()))
        .with_status(200)
        .with_body(r#"{"message":"Subscription extended"}"#)
        .create_async()
        .await;
    let expiring = server
        .mock("GET", "/api/v1/subscriptions/expiring/reminders")
        .match_query(Matcher::UrlEncoded("days".into(), "7".into()))
        .with_status(200)
        .with_body(
            r#"{"expiring_subscriptions":[{"id":"s2","status":"active"}],"count":1,"days":7}"#,
        )
        .create_async()
        .await;

    let client = logged_in_client(&server, "tok").await;
    client.subscriptions().extend("s1", 30).await.unwrap();
    let soon = client.subscriptions().expiring(7).await.unwrap();

    assert_eq!(soon.len(), 1);
    extend.assert_async().await;
    expiring.assert_async().await;
}

#[tokio::test]
async fn test_plan_crud() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/v1/subscriptions/plans")
        .match_body(Matcher::Json(json!({
            "name": "Pro",
            "duration_days": 30,
            "price": "9.99",
            "currency": "USD"
        })))
        .with_status(200)
        .with_body(r#"{"id":"plan1","name":"Pro","is_active":true}"#)
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/api/v1/subscriptions/plans/plan1")
        .match_body(Matcher::Json(json!({ "is_active": false })))
        .with_status(200)
        .with_body(r#"{"id":"plan1","name":"Pro","is_active":false}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/v1/subscriptions/plans/plan1")
        .with_status(200)
        .with_body(r#"{"message":"Plan deleted"}"#)
        .create_async()
        .await;

    let client = logged_in_client(&server, "tok").await;

    let plan = client
        .plans()
        .create(&tgadmin_core::NewPlan {
            name: "Pro".into(),
            description: None,
            duration_days: 30,
            price: "9.99".into(),
            currency: "USD".into(),
        })
        .await
        .unwrap();
    assert_eq!(plan.id(), Some("plan1"));

    let patch = tgadmin_core::PlanPatch {
        is_active: Some(false),
        ..Default::default()
    };
    let plan = client.plans().update("plan1", &patch).await.unwrap();
    assert_eq!(plan.bool_field("is_active"), Some(false));

    client.plans().delete("plan1").await.unwrap();

    create.assert_async().await;
    update.assert_async().await;
    delete.assert_async().await;
}
