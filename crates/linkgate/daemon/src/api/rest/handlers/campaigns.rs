//! Campaign, lead, and reward handlers.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use linkgate_email::{EmailError, RewardOutcome};
use linkgate_types::{
    Campaign, CampaignId, DeliveryMethod, LeadStatus, TaskConfig, TaskDefinition, TaskKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct PublishTask {
    pub kind: TaskKind,
    #[serde(default)]
    pub config: TaskConfig,
}

#[derive(Debug, Deserialize)]
pub struct PublishCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination_url: Option<String>,
    pub delivery_method: Option<DeliveryMethod>,
    #[serde(default)]
    pub tasks: Vec<PublishTask>,
}

/// Publish a new campaign. Campaigns are immutable afterwards.
pub async fn publish_campaign(
    State(state): State<AppState>,
    Json(payload): Json<PublishCampaignRequest>,
) -> ApiResult<(StatusCode, Json<Campaign>)> {
    let title = payload
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing campaign title".to_string()))?;
    let destination_url = payload
        .destination_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing destination URL".to_string()))?;
    let delivery_method = payload
        .delivery_method
        .ok_or_else(|| ApiError::BadRequest("Missing delivery method".to_string()))?;

    // Zero-task gates are a configuration error, not an auto-unlock.
    if payload.tasks.is_empty() {
        return Err(ApiError::BadRequest(
            "A campaign requires at least one task".to_string(),
        ));
    }

    let tasks: Vec<TaskDefinition> = payload
        .tasks
        .into_iter()
        .map(|t| TaskDefinition::new(t.kind, t.config))
        .collect();

    let campaign = Campaign::new(
        title,
        payload.description.filter(|d| !d.trim().is_empty()),
        destination_url,
        delivery_method,
        tasks,
    );

    state.campaigns.insert(campaign.clone()).await?;
    tracing::info!(campaign = %campaign.id, tasks = campaign.tasks.len(), "campaign published");

    Ok((StatusCode::CREATED, Json(campaign)))
}

/// List all campaigns, newest first.
pub async fn list_campaigns(State(state): State<AppState>) -> ApiResult<Json<Vec<Campaign>>> {
    Ok(Json(state.campaigns.list().await?))
}

/// Fetch one campaign.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Campaign>> {
    let campaign_id = CampaignId::from_uuid(id);
    let campaign = state
        .campaigns
        .get(&campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;
    Ok(Json(campaign))
}

/// Dashboard row for one lead.
#[derive(Debug, Serialize)]
pub struct LeadSummary {
    pub email: String,
    pub status: LeadStatus,
    pub completed_tasks: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// List leads for a campaign, newest first.
pub async fn list_leads(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<LeadSummary>>> {
    let campaign_id = CampaignId::from_uuid(id);
    if state.campaigns.get(&campaign_id).await?.is_none() {
        return Err(ApiError::NotFound("Campaign not found".to_string()));
    }

    let leads = state.leads.list_for_campaign(&campaign_id).await?;
    let summaries = leads
        .into_iter()
        .map(|lead| LeadSummary {
            completed_tasks: lead.completed_tasks(),
            email: lead.email,
            status: lead.status,
            created_at: lead.created_at,
        })
        .collect();
    Ok(Json(summaries))
}

/// Export a campaign's leads as CSV.
pub async fn export_leads(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let campaign_id = CampaignId::from_uuid(id);
    let campaign = state
        .campaigns
        .get(&campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    let leads = state.leads.list_for_campaign(&campaign_id).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["email", "status", "completed_tasks", "total_tasks", "created_at"])
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    for lead in &leads {
        let status = match lead.status {
            LeadStatus::Pending => "pending",
            LeadStatus::Completed => "completed",
        };
        writer
            .write_record([
                lead.email.as_str(),
                status,
                &lead.completed_tasks().to_string(),
                &campaign.tasks.len().to_string(),
                &lead.created_at.to_rfc3339(),
            ])
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let body = String::from_utf8(bytes).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"leads_{}.csv\"", campaign_id.as_uuid()),
            ),
        ],
        body,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub email: Option<String>,
}

/// Deliver the reward for an unlocked gate: reveal the destination URL
/// and/or email it, per the campaign's delivery method.
pub async fn claim_reward(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClaimRequest>,
) -> ApiResult<Json<RewardOutcome>> {
    let campaign_id = CampaignId::from_uuid(id);
    let campaign = state
        .campaigns
        .get(&campaign_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

    let email = payload.email.filter(|e| !e.trim().is_empty());
    let outcome = state
        .rewards
        .deliver(&campaign, email.as_deref())
        .await
        .map_err(|e| match e {
            EmailError::MissingRecipient => ApiError::BadRequest(
                "An email address is required for email delivery".to_string(),
            ),
            other => other.into(),
        })?;

    // Close out the lead record when one exists for this visitor.
    if let Some(email) = email.as_deref() {
        state.leads.complete_lead(&campaign_id, email).await?;
    }

    Ok(Json(outcome))
}
