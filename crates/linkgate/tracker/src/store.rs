//! Local persistence for visitor progress.
//!
//! One record per campaign, keyed by campaign identity: the service-side
//! analog of the browser's `gatepage_<campaign>` localStorage entry.

use dashmap::DashMap;
use linkgate_types::{CampaignId, VisitorProgress};
use std::path::PathBuf;

use crate::error::TrackerError;

/// Synchronous local progress storage.
pub trait ProgressStore {
    fn load(&self, campaign_id: &CampaignId) -> Result<Option<VisitorProgress>, TrackerError>;

    fn save(
        &self,
        campaign_id: &CampaignId,
        progress: &VisitorProgress,
    ) -> Result<(), TrackerError>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for &S {
    fn load(&self, campaign_id: &CampaignId) -> Result<Option<VisitorProgress>, TrackerError> {
        (**self).load(campaign_id)
    }

    fn save(
        &self,
        campaign_id: &CampaignId,
        progress: &VisitorProgress,
    ) -> Result<(), TrackerError> {
        (**self).save(campaign_id, progress)
    }
}

/// In-memory progress store for tests and embedded use.
pub struct InMemoryProgressStore {
    records: DashMap<CampaignId, VisitorProgress>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }
}

impl Default for InMemoryProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for InMemoryProgressStore {
    fn load(&self, campaign_id: &CampaignId) -> Result<Option<VisitorProgress>, TrackerError> {
        Ok(self.records.get(campaign_id).map(|p| p.clone()))
    }

    fn save(
        &self,
        campaign_id: &CampaignId,
        progress: &VisitorProgress,
    ) -> Result<(), TrackerError> {
        self.records.insert(*campaign_id, progress.clone());
        Ok(())
    }
}

/// JSON-file progress store: one `gatepage_<uuid>.json` per campaign under
/// a directory.
pub struct JsonFileProgressStore {
    dir: PathBuf,
}

impl JsonFileProgressStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, campaign_id: &CampaignId) -> PathBuf {
        self.dir.join(format!("gatepage_{}.json", campaign_id.as_uuid()))
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn load(&self, campaign_id: &CampaignId) -> Result<Option<VisitorProgress>, TrackerError> {
        let path = self.path_for(campaign_id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let progress: VisitorProgress = serde_json::from_str(&contents)?;
        Ok(Some(progress))
    }

    fn save(
        &self,
        campaign_id: &CampaignId,
        progress: &VisitorProgress,
    ) -> Result<(), TrackerError> {
        std::fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(progress)?;
        std::fs::write(self.path_for(campaign_id), contents)?;
        Ok(())
    }
}
