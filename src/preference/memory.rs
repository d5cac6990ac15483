//! In-memory preference store using DashMap.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::error::StoreError;

use super::store::PreferenceStore;
use super::types::{NotificationPreference, PreferenceUpdate};

/// In-memory preference store for tests and single-node development.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    preferences: DashMap<i64, NotificationPreference>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get_by_recipient(
        &self,
        recipient_id: i64,
    ) -> Result<Option<NotificationPreference>, StoreError> {
        Ok(self.preferences.get(&recipient_id).map(|p| p.clone()))
    }

    async fn upsert(
        &self,
        recipient_id: i64,
        update: PreferenceUpdate,
    ) -> Result<NotificationPreference, StoreError> {
        let mut entry = self
            .preferences
            .entry(recipient_id)
            .or_insert_with(|| NotificationPreference::permissive(recipient_id));
        update.apply(&mut entry);
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }
}
