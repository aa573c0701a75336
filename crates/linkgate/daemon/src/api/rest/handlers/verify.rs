//! Task verification handlers: email one-time codes, social session
//! checks, and the strict subscription check.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, Json};
use linkgate_codes::CodeCheck;
use linkgate_types::{Campaign, CampaignId, TaskDefinition, TaskKind};
use linkgate_verify::Verdict;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: String,
}

impl VerifyResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

async fn load_task(
    state: &AppState,
    campaign_id: Uuid,
    task_id: Uuid,
) -> ApiResult<(Campaign, TaskDefinition)> {
    let campaign_id = CampaignId::from_uuid(campaign_id);
    let campaign = state
        .campaigns
        .get(&campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;
    let task = campaign
        .task(&linkgate_types::TaskId::from_uuid(task_id))
        .cloned()
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    Ok((campaign, task))
}

#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub campaign_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub email: Option<String>,
}

/// Issue a one-time code for an email task and send it to the visitor.
pub async fn send_email_code(
    State(state): State<AppState>,
    Json(payload): Json<SendCodeRequest>,
) -> ApiResult<Json<VerifyResponse>> {
    let (campaign_id, task_id, email) = match (payload.campaign_id, payload.task_id, payload.email)
    {
        (Some(c), Some(t), Some(e)) if !e.trim().is_empty() => (c, t, e),
        _ => return Err(ApiError::BadRequest("Missing required fields".to_string())),
    };

    let (campaign, task) = load_task(&state, campaign_id, task_id).await?;
    if task.kind != TaskKind::Email {
        return Err(ApiError::BadRequest(
            "Task is not an email verification task".to_string(),
        ));
    }

    state.codes.issue(&campaign.id, &task.id, &email).await?;
    Ok(Json(VerifyResponse::ok("Verification code sent")))
}

#[derive(Debug, Deserialize)]
pub struct CheckCodeRequest {
    pub campaign_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub email: Option<String>,
    pub code: Option<String>,
}

/// Check a submitted one-time code. A matching code is consumed and the
/// task marked completed in one atomic step.
pub async fn check_email_code(
    State(state): State<AppState>,
    Json(payload): Json<CheckCodeRequest>,
) -> ApiResult<Json<VerifyResponse>> {
    let (campaign_id, task_id, email, code) = match (
        payload.campaign_id,
        payload.task_id,
        payload.email,
        payload.code,
    ) {
        (Some(c), Some(t), Some(e), Some(code)) if !e.trim().is_empty() && !code.trim().is_empty() => {
            (c, t, e, code)
        }
        _ => return Err(ApiError::BadRequest("Missing required fields".to_string())),
    };

    let (campaign, task) = load_task(&state, campaign_id, task_id).await?;

    match state.codes.check(&campaign.id, &task.id, &email, &code).await? {
        CodeCheck::Verified => Ok(Json(VerifyResponse::ok("Email verified successfully"))),
        CodeCheck::LeadNotFound => Err(ApiError::NotFound("Lead not found".to_string())),
        CodeCheck::NoPending => Err(ApiError::BadRequest(
            "No verification pending for this task".to_string(),
        )),
        CodeCheck::Invalid => Err(ApiError::BadRequest("Invalid code".to_string())),
        CodeCheck::Expired => Err(ApiError::BadRequest(
            "Code expired. Please request a new one.".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct SocialVerifyRequest {
    pub campaign_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub access_token: Option<String>,
}

/// Verify a social task (X follow/repost/like, LinkedIn share) against
/// the visitor's session token.
pub async fn verify_social(
    State(state): State<AppState>,
    Json(payload): Json<SocialVerifyRequest>,
) -> ApiResult<Json<VerifyResponse>> {
    let (campaign_id, task_id, token) =
        match (payload.campaign_id, payload.task_id, payload.access_token) {
            (Some(c), Some(t), Some(token)) if !token.trim().is_empty() => (c, t, token),
            _ => return Err(ApiError::BadRequest("Missing required fields".to_string())),
        };

    let (_, task) = load_task(&state, campaign_id, task_id).await?;
    match task.kind {
        TaskKind::Email => {
            return Err(ApiError::BadRequest(
                "Email tasks are verified with a one-time code".to_string(),
            ))
        }
        TaskKind::YtSubscribe => {
            return Err(ApiError::BadRequest(
                "Subscription tasks use the subscription endpoint".to_string(),
            ))
        }
        _ => {}
    }

    let verifier = state
        .verifiers
        .get(task.kind)
        .ok_or_else(|| ApiError::Internal("No verifier registered for task".to_string()))?;

    match verifier.verify(&token, &task.config).await? {
        Verdict::Verified => Ok(Json(VerifyResponse::ok("Task verified"))),
        Verdict::Unauthorized => Err(ApiError::Unauthorized(
            "Invalid session. Please reconnect.".to_string(),
        )),
        Verdict::NotSubscribed => Err(ApiError::BadRequest(
            "User is not subscribed to the channel".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionVerifyRequest {
    pub campaign_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub access_token: Option<String>,
}

/// Strict check that the visitor's channel subscription exists.
pub async fn verify_subscription(
    State(state): State<AppState>,
    Json(payload): Json<SubscriptionVerifyRequest>,
) -> ApiResult<Json<VerifyResponse>> {
    let (campaign_id, task_id, token) =
        match (payload.campaign_id, payload.task_id, payload.access_token) {
            (Some(c), Some(t), Some(token)) if !token.trim().is_empty() => (c, t, token),
            _ => return Err(ApiError::BadRequest("Missing required fields".to_string())),
        };

    let (_, task) = load_task(&state, campaign_id, task_id).await?;
    if task.kind != TaskKind::YtSubscribe {
        return Err(ApiError::BadRequest(
            "Task is not a subscription task".to_string(),
        ));
    }
    if task.config.channel_id.is_none() {
        return Err(ApiError::BadRequest(
            "Missing access token or channel ID".to_string(),
        ));
    }

    let verifier = state
        .verifiers
        .get(task.kind)
        .ok_or_else(|| ApiError::Internal("No verifier registered for task".to_string()))?;

    match verifier.verify(&token, &task.config).await? {
        Verdict::Verified => Ok(Json(VerifyResponse::ok("Subscription verified"))),
        Verdict::Unauthorized => Err(ApiError::Unauthorized(
            "Invalid session. Please reconnect.".to_string(),
        )),
        Verdict::NotSubscribed => Err(ApiError::BadRequest(
            "User is not subscribed to the channel".to_string(),
        )),
    }
}
