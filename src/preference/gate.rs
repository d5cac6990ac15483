//! Category-level preference gate.

use std::sync::Arc;

use crate::catalog::{self, NotificationKind};
use crate::error::StoreError;

use super::store::PreferenceStore;

/// Decides send/suppress for a (recipient, kind) pair from the
/// recipient's stored category toggles.
pub struct PreferenceGate {
    store: Arc<dyn PreferenceStore>,
}

impl PreferenceGate {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Whether a notification of this kind should be created for the
    /// recipient.
    ///
    /// A recipient with no preference row is allowed everything:
    /// absence of preferences must never silently suppress
    /// notifications. Store failures propagate; the engine decides
    /// what to do with them (it fails open).
    pub async fn should_send(
        &self,
        recipient_id: i64,
        kind: NotificationKind,
    ) -> Result<bool, StoreError> {
        let Some(preference) = self.store.get_by_recipient(recipient_id).await? else {
            return Ok(true);
        };
        let template = catalog::lookup(kind);
        Ok(preference.allows(template.category))
    }
}
