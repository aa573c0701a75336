//! Core data model for LinkGate.
//!
//! A [`Campaign`] gates a reward destination behind a list of
//! [`TaskDefinition`]s. Server-side visitor progress lives in a [`Lead`];
//! client-side progress is the [`VisitorProgress`] cache. Everything here is
//! plain data; behavior lives in the store, verify, and tracker crates.

mod campaign;
mod ids;
mod lead;
mod progress;

pub use campaign::{Campaign, DeliveryMethod, TaskConfig, TaskDefinition, TaskKind};
pub use ids::{CampaignId, GuestId, LeadId, TaskId};
pub use lead::{Lead, LeadStatus, TaskProgress};
pub use progress::{TaskStatus, VisitorProgress};
