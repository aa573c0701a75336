//! Storage traits and in-memory backends for campaigns and leads.
//!
//! The stores are the only writers of durable gate state. Code consumption
//! is a single conditional update inside [`LeadStore::consume_code`] so a
//! one-time code can never be spent twice, even by concurrent checks.

mod error;
mod memory;
mod traits;

pub use error::{Result, StoreError};
pub use memory::{InMemoryCampaignStore, InMemoryLeadStore};
pub use traits::{CampaignStore, CodeConsumption, LeadStore};
