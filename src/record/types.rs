//! Persisted notification record and its value types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::NotificationKind;

/// Priority levels for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Low priority, can be delayed
    Low,
    /// Default priority
    #[default]
    Medium,
    /// Should be delivered promptly
    High,
    /// Immediate delivery required
    Urgent,
}

impl Priority {
    /// Get numeric value for priority comparison
    pub fn as_weight(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(Priority::Low),
            "MEDIUM" => Some(Priority::Medium),
            "HIGH" => Some(Priority::High),
            "URGENT" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_weight().cmp(&other.as_weight())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery lifecycle of a record: PENDING → SENT → READ, with FAILED
/// reachable from PENDING or SENT. This crate only performs the
/// PENDING→READ transition; SENT and FAILED belong to the delivery
/// collaborator and are preserved for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Read,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "PENDING",
            NotificationStatus::Sent => "SENT",
            NotificationStatus::Read => "READ",
            NotificationStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(NotificationStatus::Pending),
            "SENT" => Some(NotificationStatus::Sent),
            "READ" => Some(NotificationStatus::Read),
            "FAILED" => Some(NotificationStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted notification, owned by its recipient.
///
/// The payload keeps the substitution context the record was created
/// with; the repair sweep mines it to fix titles and messages that
/// still carry unsubstituted tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub recipient_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub status: NotificationStatus,
    pub payload: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// "Read" is defined by the read timestamp, not the status, so
    /// records whose status was never advanced still count correctly.
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// Field-level filters applied by `list` and `count`.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub kind: Option<NotificationKind>,
    pub priority: Option<Priority>,
    pub status: Option<NotificationStatus>,
    /// `Some(false)` selects unread records (`read_at` null),
    /// `Some(true)` read ones. Derived from the timestamp, not status.
    pub read: Option<bool>,
}

impl RecordFilter {
    /// The single definition of "unread" shared by the list filter and
    /// the unread counter.
    pub fn unread() -> Self {
        Self {
            read: Some(false),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &NotificationRecord) -> bool {
        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if record.priority != priority {
                return false;
            }
        }
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(read) = self.read {
            if record.is_read() != read {
                return false;
            }
        }
        true
    }
}

/// Pagination and filters for `list`. Limit defaults to the configured
/// page size (50) and offset to 0 when unset.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: RecordFilter,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn record() -> NotificationRecord {
        let now = Utc::now();
        NotificationRecord {
            id: Uuid::new_v4(),
            recipient_id: 7,
            kind: NotificationKind::EventReminder,
            title: "Rappel d'événement".to_string(),
            message: "Votre événement Jazz Night commence dans 2h".to_string(),
            priority: Priority::High,
            status: NotificationStatus::Pending,
            payload: json!({"event_title": "Jazz Night"}),
            read_at: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_priority_wire_round_trip() {
        for p in [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent] {
            assert_eq!(Priority::parse(p.as_str()), Some(p));
            assert_eq!(serde_json::to_string(&p).unwrap(), format!("\"{}\"", p.as_str()));
        }
    }

    #[test]
    fn test_status_wire_round_trip() {
        for s in [
            NotificationStatus::Pending,
            NotificationStatus::Sent,
            NotificationStatus::Read,
            NotificationStatus::Failed,
        ] {
            assert_eq!(NotificationStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn test_read_is_derived_from_timestamp() {
        let mut r = record();
        // status advanced but timestamp never set: still unread
        r.status = NotificationStatus::Read;
        assert!(!r.is_read());
        assert!(RecordFilter::unread().matches(&r));

        r.read_at = Some(Utc::now());
        assert!(r.is_read());
        assert!(!RecordFilter::unread().matches(&r));
    }

    #[test]
    fn test_filter_matches_fields() {
        let r = record();
        let filter = RecordFilter {
            kind: Some(NotificationKind::EventReminder),
            priority: Some(Priority::High),
            status: Some(NotificationStatus::Pending),
            read: Some(false),
        };
        assert!(filter.matches(&r));

        let other_kind = RecordFilter {
            kind: Some(NotificationKind::NewComment),
            ..RecordFilter::default()
        };
        assert!(!other_kind.matches(&r));
    }
}
