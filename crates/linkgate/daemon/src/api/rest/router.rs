//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let api_routes = Router::new()
        // Campaigns and leads
        .route("/campaigns", get(handlers::list_campaigns))
        .route("/campaigns", post(handlers::publish_campaign))
        .route("/campaigns/:id", get(handlers::get_campaign))
        .route("/campaigns/:id/leads", get(handlers::list_leads))
        .route("/campaigns/:id/leads/export", get(handlers::export_leads))
        .route("/campaigns/:id/claim", post(handlers::claim_reward))
        // Verification
        .route("/verify/email/send", post(handlers::send_email_code))
        .route("/verify/email/check", post(handlers::check_email_code))
        .route("/verify/social", post(handlers::verify_social))
        .route("/verify/subscription", post(handlers::verify_subscription))
        // Billing
        .route("/billing/checkout", post(handlers::create_checkout));

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use linkgate_billing::DisabledBilling;
    use linkgate_codes::CodeService;
    use linkgate_email::{RecordingSender, RewardDelivery, DEFAULT_FROM};
    use linkgate_store::{InMemoryCampaignStore, InMemoryLeadStore};
    use linkgate_types::TaskKind;
    use linkgate_verify::{
        AuthCheck, IdentityApi, SoftSessionVerifier, SubscriptionApi, SubscriptionCheck,
        SubscriptionVerifier, VerifierRegistry, VerifyError,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct StubIdentity;

    #[async_trait]
    impl IdentityApi for StubIdentity {
        async fn current_user(&self, token: &str) -> Result<AuthCheck, VerifyError> {
            if token == "valid-token" {
                Ok(AuthCheck::Authorized)
            } else {
                Ok(AuthCheck::Unauthorized)
            }
        }
    }

    struct ToggleSubscription {
        subscribed: AtomicBool,
    }

    #[async_trait]
    impl SubscriptionApi for ToggleSubscription {
        async fn find_subscription(
            &self,
            _token: &str,
            _channel_id: &str,
        ) -> Result<SubscriptionCheck, VerifyError> {
            if self.subscribed.load(Ordering::SeqCst) {
                Ok(SubscriptionCheck::Subscribed)
            } else {
                Ok(SubscriptionCheck::NotSubscribed)
            }
        }
    }

    struct Harness {
        app: Router,
        sender: Arc<RecordingSender>,
        subscription: Arc<ToggleSubscription>,
    }

    fn harness() -> Harness {
        let campaigns = Arc::new(InMemoryCampaignStore::new());
        let leads = Arc::new(InMemoryLeadStore::new());
        let sender = Arc::new(RecordingSender::new());
        let subscription = Arc::new(ToggleSubscription {
            subscribed: AtomicBool::new(false),
        });

        let identity: Arc<dyn IdentityApi> = Arc::new(StubIdentity);
        let mut verifiers = VerifierRegistry::new();
        for kind in [
            TaskKind::XFollow,
            TaskKind::XRepost,
            TaskKind::XLike,
            TaskKind::LinkedinShare,
        ] {
            verifiers.insert(
                kind,
                Arc::new(SoftSessionVerifier::new(identity.clone(), kind)),
            );
        }
        verifiers.insert(
            TaskKind::YtSubscribe,
            Arc::new(SubscriptionVerifier::new(subscription.clone())),
        );

        let codes = Arc::new(CodeService::new(
            leads.clone(),
            sender.clone(),
            DEFAULT_FROM,
        ));
        let rewards = Arc::new(RewardDelivery::new(sender.clone(), DEFAULT_FROM));

        let state = AppState::new(
            campaigns,
            leads,
            codes,
            Arc::new(verifiers),
            rewards,
            Arc::new(DisabledBilling),
        );

        Harness {
            app: create_router(state, true),
            sender,
            subscription,
        }
    }

    async fn send_json(
        app: &Router,
        method: &str,
        uri: &str,
        body: Value,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn get_raw(app: &Router, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let h = harness();
        let (status, body) = get_raw(&h.app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"ok\""));
    }

    #[tokio::test]
    async fn test_publish_rejects_zero_task_campaign() {
        let h = harness();
        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/campaigns",
            json!({
                "title": "Empty gate",
                "destination_url": "https://example.com",
                "delivery_method": "reveal",
                "tasks": []
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at least one task"));
    }

    #[tokio::test]
    async fn test_publish_requires_title() {
        let h = harness();
        let (status, _) = send_json(
            &h.app,
            "POST",
            "/api/v1/campaigns",
            json!({
                "destination_url": "https://example.com",
                "delivery_method": "reveal",
                "tasks": [{"kind": "email"}]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_campaign_is_404() {
        let h = harness();
        let (status, body) = get_raw(
            &h.app,
            "/api/v1/campaigns/00000000-0000-0000-0000-000000000000",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Campaign not found"));
    }

    fn extract_code(html: &str) -> String {
        let start = html.find("<strong>").unwrap() + "<strong>".len();
        let end = html.find("</strong>").unwrap();
        html[start..end].to_string()
    }

    #[tokio::test]
    async fn test_full_gate_flow() {
        let h = harness();

        // Publish a gate with an email task and a subscription task.
        let (status, campaign) = send_json(
            &h.app,
            "POST",
            "/api/v1/campaigns",
            json!({
                "title": "Beta access",
                "description": "Early access drop",
                "destination_url": "https://example.com/beta",
                "delivery_method": "reveal",
                "tasks": [
                    {"kind": "email"},
                    {"kind": "yt_subscribe", "config": {"channel_id": "UC123"}}
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let campaign_id = campaign["id"].as_str().unwrap().to_string();
        let email_task = campaign["tasks"][0]["id"].as_str().unwrap().to_string();
        let yt_task = campaign["tasks"][1]["id"].as_str().unwrap().to_string();

        // Request a verification code.
        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/email/send",
            json!({
                "campaign_id": campaign_id,
                "task_id": email_task,
                "email": "visitor@example.com"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let sent = h.sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "visitor@example.com");
        let code = extract_code(&sent[0].html);

        // A wrong code is rejected without consuming the pending entry.
        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/email/check",
            json!({
                "campaign_id": campaign_id,
                "task_id": email_task,
                "email": "visitor@example.com",
                "code": if code == "000001" { "000002" } else { "000001" }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Invalid code"));

        // The right code verifies.
        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/email/check",
            json!({
                "campaign_id": campaign_id,
                "task_id": email_task,
                "email": "visitor@example.com",
                "code": code
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        // Replaying the consumed code fails.
        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/email/check",
            json!({
                "campaign_id": campaign_id,
                "task_id": email_task,
                "email": "visitor@example.com",
                "code": code
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("No verification pending"));

        // Not subscribed yet: the strict check rejects.
        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/subscription",
            json!({
                "campaign_id": campaign_id,
                "task_id": yt_task,
                "access_token": "valid-token"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not subscribed"));

        // After subscribing, the check passes.
        h.subscription.subscribed.store(true, Ordering::SeqCst);
        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/subscription",
            json!({
                "campaign_id": campaign_id,
                "task_id": yt_task,
                "access_token": "valid-token"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        // Claim the reward: the reveal delivery exposes the destination.
        let (status, body) = send_json(
            &h.app,
            "POST",
            &format!("/api/v1/campaigns/{campaign_id}/claim"),
            json!({"email": "visitor@example.com"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["revealed_url"], json!("https://example.com/beta"));
        assert_eq!(body["emailed"], json!(false));

        // The dashboard shows the closed-out lead.
        let (status, body) = send_json(
            &h.app,
            "GET",
            &format!("/api/v1/campaigns/{campaign_id}/leads"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["email"], json!("visitor@example.com"));
        assert_eq!(body[0]["status"], json!("completed"));

        // CSV export carries the same lead.
        let (status, csv) = get_raw(
            &h.app,
            &format!("/api/v1/campaigns/{campaign_id}/leads/export"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(csv.starts_with("email,status,completed_tasks,total_tasks,created_at"));
        assert!(csv.contains("visitor@example.com"));
    }

    #[tokio::test]
    async fn test_social_verification_requires_valid_session() {
        let h = harness();

        let (_, campaign) = send_json(
            &h.app,
            "POST",
            "/api/v1/campaigns",
            json!({
                "title": "Follow gate",
                "destination_url": "https://example.com",
                "delivery_method": "reveal",
                "tasks": [{"kind": "x_follow", "config": {"username": "creator"}}]
            }),
        )
        .await;
        let campaign_id = campaign["id"].as_str().unwrap().to_string();
        let task_id = campaign["tasks"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/social",
            json!({
                "campaign_id": campaign_id,
                "task_id": task_id,
                "access_token": "stale-token"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().contains("reconnect"));

        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/social",
            json!({
                "campaign_id": campaign_id,
                "task_id": task_id,
                "access_token": "valid-token"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
    }

    #[tokio::test]
    async fn test_social_endpoint_rejects_email_tasks() {
        let h = harness();

        let (_, campaign) = send_json(
            &h.app,
            "POST",
            "/api/v1/campaigns",
            json!({
                "title": "Email gate",
                "destination_url": "https://example.com",
                "delivery_method": "reveal",
                "tasks": [{"kind": "email"}]
            }),
        )
        .await;
        let campaign_id = campaign["id"].as_str().unwrap().to_string();
        let task_id = campaign["tasks"][0]["id"].as_str().unwrap().to_string();

        let (status, _) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/social",
            json!({
                "campaign_id": campaign_id,
                "task_id": task_id,
                "access_token": "valid-token"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_fields_are_bad_requests() {
        let h = harness();
        let (status, body) = send_json(
            &h.app,
            "POST",
            "/api/v1/verify/email/send",
            json!({"email": "a@b.com"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("Missing required fields"));
    }

    #[tokio::test]
    async fn test_checkout_without_billing_provider() {
        let h = harness();
        let (status, _) = send_json(
            &h.app,
            "POST",
            "/api/v1/billing/checkout",
            json!({"user_id": "user-1", "email": "creator@example.com"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
