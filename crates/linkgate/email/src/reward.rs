//! Reward delivery, gated by the unlock evaluator's output.

use linkgate_types::Campaign;
use std::sync::Arc;

use crate::error::EmailError;
use crate::message::reward_email;
use crate::sender::EmailSender;

/// What reward delivery actually did.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RewardOutcome {
    /// Destination URL to expose, when the delivery method reveals.
    pub revealed_url: Option<String>,
    /// Whether the reward email was dispatched.
    pub emailed: bool,
}

/// Delivers the reward according to the campaign's delivery method.
pub struct RewardDelivery {
    sender: Arc<dyn EmailSender>,
    from: String,
}

impl RewardDelivery {
    pub fn new(sender: Arc<dyn EmailSender>, from: impl Into<String>) -> Self {
        Self {
            sender,
            from: from.into(),
        }
    }

    /// Deliver the reward for an unlocked gate. `visitor_email` is required
    /// only when the delivery method emails.
    pub async fn deliver(
        &self,
        campaign: &Campaign,
        visitor_email: Option<&str>,
    ) -> Result<RewardOutcome, EmailError> {
        let revealed_url = campaign
            .delivery_method
            .reveals()
            .then(|| campaign.destination_url.clone());

        let mut emailed = false;
        if campaign.delivery_method.emails() {
            let to = visitor_email.ok_or(EmailError::MissingRecipient)?;
            let email = reward_email(&self.from, to, campaign);
            self.sender.send(&email).await?;
            emailed = true;
        }

        tracing::info!(
            campaign = %campaign.id,
            revealed = revealed_url.is_some(),
            emailed,
            "reward delivered"
        );

        Ok(RewardOutcome {
            revealed_url,
            emailed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::DEFAULT_FROM;
    use crate::sender::RecordingSender;
    use linkgate_types::DeliveryMethod;

    fn campaign(method: DeliveryMethod) -> Campaign {
        Campaign::new(
            "Drop",
            None,
            "https://example.com/secret",
            method,
            vec![],
        )
    }

    #[tokio::test]
    async fn test_reveal_exposes_url_without_email() {
        let sender = Arc::new(RecordingSender::new());
        let delivery = RewardDelivery::new(sender.clone(), DEFAULT_FROM);

        let outcome = delivery
            .deliver(&campaign(DeliveryMethod::Reveal), None)
            .await
            .unwrap();

        assert_eq!(
            outcome.revealed_url.as_deref(),
            Some("https://example.com/secret")
        );
        assert!(!outcome.emailed);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test]
    async fn test_email_delivery_requires_recipient() {
        let sender = Arc::new(RecordingSender::new());
        let delivery = RewardDelivery::new(sender, DEFAULT_FROM);

        let err = delivery
            .deliver(&campaign(DeliveryMethod::Email), None)
            .await
            .unwrap_err();
        assert!(matches!(err, EmailError::MissingRecipient));
    }

    #[tokio::test]
    async fn test_both_reveals_and_emails() {
        let sender = Arc::new(RecordingSender::new());
        let delivery = RewardDelivery::new(sender.clone(), DEFAULT_FROM);

        let outcome = delivery
            .deliver(&campaign(DeliveryMethod::Both), Some("a@b.com"))
            .await
            .unwrap();

        assert!(outcome.revealed_url.is_some());
        assert!(outcome.emailed);
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@b.com");
        assert!(sent[0].html.contains("https://example.com/secret"));
    }
}
