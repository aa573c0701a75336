//! Campaign and task definitions.

use crate::ids::{CampaignId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the reward reaches the visitor once the gate unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// Reveal the destination URL in place.
    Reveal,
    /// Email the destination to the visitor.
    Email,
    /// Reveal and email.
    Both,
}

impl DeliveryMethod {
    /// The destination URL is exposed to the visitor.
    pub fn reveals(&self) -> bool {
        matches!(self, DeliveryMethod::Reveal | DeliveryMethod::Both)
    }

    /// The reward is dispatched over the email channel.
    pub fn emails(&self) -> bool {
        matches!(self, DeliveryMethod::Email | DeliveryMethod::Both)
    }
}

/// The closed set of task kinds a campaign can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Verify ownership of an email address with a one-time code.
    Email,
    XFollow,
    XRepost,
    XLike,
    LinkedinShare,
    YtSubscribe,
}

impl TaskKind {
    /// Human-readable label shown on the gate page.
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Email => "Verify Email",
            TaskKind::XFollow => "Follow on X",
            TaskKind::XRepost => "Repost on X",
            TaskKind::XLike => "Like on X",
            TaskKind::LinkedinShare => "Share on LinkedIn",
            TaskKind::YtSubscribe => "Subscribe on YouTube",
        }
    }
}

/// Kind-specific task configuration. Only the fields relevant to the kind
/// are populated (e.g. `channel_id` for YouTube, `username` for X follows).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One required action gating the reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: TaskId,
    pub kind: TaskKind,
    #[serde(default)]
    pub config: TaskConfig,
}

impl TaskDefinition {
    pub fn new(kind: TaskKind, config: TaskConfig) -> Self {
        Self {
            id: TaskId::generate(),
            kind,
            config,
        }
    }
}

/// A creator-defined gate: reward destination plus required tasks.
///
/// Immutable after publish. Task order is significant for display only;
/// unlocking requires ALL tasks regardless of order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub destination_url: String,
    pub delivery_method: DeliveryMethod,
    pub tasks: Vec<TaskDefinition>,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        destination_url: impl Into<String>,
        delivery_method: DeliveryMethod,
        tasks: Vec<TaskDefinition>,
    ) -> Self {
        Self {
            id: CampaignId::generate(),
            title: title.into(),
            description,
            destination_url: destination_url.into(),
            delivery_method,
            tasks,
            created_at: Utc::now(),
        }
    }

    /// Look up a task definition by ID.
    pub fn task(&self, id: &TaskId) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|t| t.id == *id)
    }
}
