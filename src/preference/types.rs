//! Per-recipient notification preferences.
//!
//! One row per recipient, created lazily on first write. Every toggle
//! defaults to true: absence of a preference row must never suppress a
//! notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Category;

/// Channel and category opt-in toggles for one recipient.
///
/// The category toggles gate record creation (see `PreferenceGate`);
/// the channel toggles are stored for the delivery collaborator and
/// are not consulted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPreference {
    pub recipient_id: i64,

    // Channels
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub sms_enabled: bool,
    pub in_app_enabled: bool,

    // Categories
    pub planning_enabled: bool,
    pub booking_enabled: bool,
    pub social_enabled: bool,
    pub performance_enabled: bool,
    pub system_enabled: bool,
    pub commercial_enabled: bool,
    pub personalized_enabled: bool,
    pub urgent_enabled: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationPreference {
    /// The default-permissive row: everything opted in.
    pub fn permissive(recipient_id: i64) -> Self {
        let now = Utc::now();
        Self {
            recipient_id,
            email_enabled: true,
            push_enabled: true,
            sms_enabled: true,
            in_app_enabled: true,
            planning_enabled: true,
            booking_enabled: true,
            social_enabled: true,
            performance_enabled: true,
            system_enabled: true,
            commercial_enabled: true,
            personalized_enabled: true,
            urgent_enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Category toggle lookup used by the gate.
    pub fn allows(&self, category: Category) -> bool {
        match category {
            Category::Planning => self.planning_enabled,
            Category::Booking => self.booking_enabled,
            Category::Social => self.social_enabled,
            Category::Performance => self.performance_enabled,
            Category::System => self.system_enabled,
            Category::Commercial => self.commercial_enabled,
            Category::Personalized => self.personalized_enabled,
            Category::Urgent => self.urgent_enabled,
        }
    }
}

/// Partial preference patch: unset fields keep their current value
/// (or the permissive default on first write).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceUpdate {
    pub email_enabled: Option<bool>,
    pub push_enabled: Option<bool>,
    pub sms_enabled: Option<bool>,
    pub in_app_enabled: Option<bool>,
    pub planning_enabled: Option<bool>,
    pub booking_enabled: Option<bool>,
    pub social_enabled: Option<bool>,
    pub performance_enabled: Option<bool>,
    pub system_enabled: Option<bool>,
    pub commercial_enabled: Option<bool>,
    pub personalized_enabled: Option<bool>,
    pub urgent_enabled: Option<bool>,
}

impl PreferenceUpdate {
    /// Disable a single category, leaving everything else untouched.
    pub fn disable_category(category: Category) -> Self {
        let mut update = Self::default();
        match category {
            Category::Planning => update.planning_enabled = Some(false),
            Category::Booking => update.booking_enabled = Some(false),
            Category::Social => update.social_enabled = Some(false),
            Category::Performance => update.performance_enabled = Some(false),
            Category::System => update.system_enabled = Some(false),
            Category::Commercial => update.commercial_enabled = Some(false),
            Category::Personalized => update.personalized_enabled = Some(false),
            Category::Urgent => update.urgent_enabled = Some(false),
        }
        update
    }

    pub fn apply(&self, preference: &mut NotificationPreference) {
        if let Some(v) = self.email_enabled {
            preference.email_enabled = v;
        }
        if let Some(v) = self.push_enabled {
            preference.push_enabled = v;
        }
        if let Some(v) = self.sms_enabled {
            preference.sms_enabled = v;
        }
        if let Some(v) = self.in_app_enabled {
            preference.in_app_enabled = v;
        }
        if let Some(v) = self.planning_enabled {
            preference.planning_enabled = v;
        }
        if let Some(v) = self.booking_enabled {
            preference.booking_enabled = v;
        }
        if let Some(v) = self.social_enabled {
            preference.social_enabled = v;
        }
        if let Some(v) = self.performance_enabled {
            preference.performance_enabled = v;
        }
        if let Some(v) = self.system_enabled {
            preference.system_enabled = v;
        }
        if let Some(v) = self.commercial_enabled {
            preference.commercial_enabled = v;
        }
        if let Some(v) = self.personalized_enabled {
            preference.personalized_enabled = v;
        }
        if let Some(v) = self.urgent_enabled {
            preference.urgent_enabled = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_allows_every_category() {
        let pref = NotificationPreference::permissive(7);
        for category in Category::ALL {
            assert!(pref.allows(category));
        }
    }

    #[test]
    fn test_apply_touches_only_set_fields() {
        let mut pref = NotificationPreference::permissive(7);
        PreferenceUpdate::disable_category(Category::Planning).apply(&mut pref);

        assert!(!pref.allows(Category::Planning));
        assert!(pref.allows(Category::Social));
        assert!(pref.email_enabled);
    }

    #[test]
    fn test_disable_category_maps_every_variant() {
        for category in Category::ALL {
            let mut pref = NotificationPreference::permissive(1);
            PreferenceUpdate::disable_category(category).apply(&mut pref);
            assert!(!pref.allows(category));
        }
    }
}
