//! Outbound message construction.

use linkgate_types::Campaign;
use serde::{Deserialize, Serialize};

/// Fallback sender address for deployments without a configured domain.
pub const DEFAULT_FROM: &str = "onboarding@resend.dev";

/// A fully composed transactional email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// The verification-code email sent when a code is issued.
pub fn verification_code_email(from: &str, to: &str, code: &str) -> OutboundEmail {
    OutboundEmail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Your Verification Code".to_string(),
        html: format!(
            "<p>Your verification code is: <strong>{}</strong></p>\
             <p>It expires in 15 minutes.</p>",
            code
        ),
    }
}

/// The reward email sent once a gate unlocks with email delivery enabled.
pub fn reward_email(from: &str, to: &str, campaign: &Campaign) -> OutboundEmail {
    OutboundEmail {
        from: from.to_string(),
        to: to.to_string(),
        subject: format!("Your reward: {}", campaign.title),
        html: format!(
            "<p>You completed all actions for <strong>{}</strong>.</p>\
             <p>Here is your reward: <a href=\"{url}\">{url}</a></p>",
            campaign.title,
            url = campaign.destination_url
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkgate_types::DeliveryMethod;

    #[test]
    fn test_verification_email_carries_code() {
        let email = verification_code_email(DEFAULT_FROM, "a@b.com", "123456");
        assert_eq!(email.subject, "Your Verification Code");
        assert!(email.html.contains("123456"));
        assert!(email.html.contains("15 minutes"));
    }

    #[test]
    fn test_reward_email_carries_destination() {
        let campaign = Campaign::new(
            "Beta invite",
            None,
            "https://example.com/beta",
            DeliveryMethod::Email,
            vec![],
        );
        let email = reward_email(DEFAULT_FROM, "a@b.com", &campaign);
        assert!(email.subject.contains("Beta invite"));
        assert!(email.html.contains("https://example.com/beta"));
    }
}
