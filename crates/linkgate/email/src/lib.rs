//! Outbound email channel for LinkGate.
//!
//! The gate subsystem sends exactly two kinds of mail: one-time verification
//! codes and the reward itself (for campaigns delivering by email). The
//! provider sits behind [`EmailSender`]; the default implementation targets
//! a Resend-style transactional HTTP API.

mod error;
mod message;
mod reward;
mod sender;

pub use error::EmailError;
pub use message::{reward_email, verification_code_email, OutboundEmail, DEFAULT_FROM};
pub use reward::{RewardDelivery, RewardOutcome};
pub use sender::{DisabledSender, EmailSender, RecordingSender, ResendSender};
