//! End-to-end engine tests over the in-memory stores.
//!
//! These exercise the full create/gate/render/store path without a
//! database; the PostgreSQL backends implement the same traits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use event_notifications::preference::MemoryPreferenceStore;
use event_notifications::record::MemoryNotificationStore;
use event_notifications::{
    Category, CreateOutcome, ListQuery, NotificationEngine, NotificationError,
    NotificationKind, NotificationPreference, NotificationRecord, NotificationStatus,
    NotificationStore, PreferenceStore, PreferenceUpdate, Priority, RecordFilter, StoreError,
};

fn engine_with_stores() -> (
    NotificationEngine,
    Arc<MemoryNotificationStore>,
    Arc<MemoryPreferenceStore>,
) {
    let records = Arc::new(MemoryNotificationStore::new());
    let preferences = Arc::new(MemoryPreferenceStore::new());
    let engine = NotificationEngine::new(records.clone(), preferences.clone());
    (engine, records, preferences)
}

fn vars(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

/// A bare record inserted directly into the store, bypassing the
/// engine, so tests can control timestamps and text.
fn raw_record(recipient_id: i64, created_offset_secs: i64) -> NotificationRecord {
    let created_at = Utc::now() + Duration::seconds(created_offset_secs);
    NotificationRecord {
        id: Uuid::new_v4(),
        recipient_id,
        kind: NotificationKind::NewComment,
        title: "Nouveau commentaire".to_string(),
        message: "Ana a commenté votre événement Jazz Night".to_string(),
        priority: Priority::Low,
        status: NotificationStatus::Pending,
        payload: json!({}),
        read_at: None,
        sent_at: None,
        created_at,
        updated_at: created_at,
    }
}

// =============================================================================
// Template rendering
// =============================================================================

#[tokio::test]
async fn test_create_from_template_renders_event_reminder() {
    let (engine, _, _) = engine_with_stores();

    let record = engine
        .create_from_template(
            7,
            NotificationKind::EventReminder,
            &vars(json!({"event_title": "Jazz Night", "time_remaining": "2h"})),
            None,
        )
        .await
        .unwrap();

    assert_eq!(record.recipient_id, 7);
    assert_eq!(record.title, "Rappel d'événement");
    assert_eq!(
        record.message,
        "Votre événement Jazz Night commence dans 2h"
    );
    assert_eq!(record.priority, Priority::High);
    assert_eq!(record.status, NotificationStatus::Pending);
    assert!(record.read_at.is_none());
    // the variables become the stored payload
    assert_eq!(record.payload["event_title"], "Jazz Night");
}

#[tokio::test]
async fn test_create_from_template_keeps_missing_placeholders_verbatim() {
    let (engine, _, _) = engine_with_stores();

    let record = engine
        .create_from_template(
            7,
            NotificationKind::EventReminder,
            &vars(json!({"event_title": "Jazz Night"})),
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        record.message,
        "Votre événement Jazz Night commence dans {time_remaining}"
    );
}

#[tokio::test]
async fn test_create_defaults_to_medium_priority() {
    let (engine, _, _) = engine_with_stores();

    let record = engine
        .create(7, NotificationKind::NewComment, "t", "m", None, None)
        .await
        .unwrap();
    assert_eq!(record.priority, Priority::Medium);

    let explicit = engine
        .create(
            7,
            NotificationKind::NewComment,
            "t",
            "m",
            Some(Priority::Urgent),
            None,
        )
        .await
        .unwrap();
    assert_eq!(explicit.priority, Priority::Urgent);
}

// =============================================================================
// Preference gating
// =============================================================================

#[tokio::test]
async fn test_disabled_category_suppresses_creation() {
    let (engine, records, preferences) = engine_with_stores();
    preferences
        .upsert(7, PreferenceUpdate::disable_category(Category::Planning))
        .await
        .unwrap();

    let outcome = engine
        .create_with_preference_check(
            7,
            NotificationKind::EventReminder,
            &vars(json!({"event_title": "Jazz Night", "time_remaining": "2h"})),
            None,
        )
        .await
        .unwrap();

    assert!(outcome.is_suppressed());
    assert!(records.is_empty(), "suppression must not write a record");

    // a kind from another category still goes through
    let outcome = engine
        .create_with_preference_check(
            7,
            NotificationKind::NewComment,
            &vars(json!({"author_name": "Ana", "event_title": "Jazz Night"})),
            None,
        )
        .await
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Created(_)));
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_recipient_without_preferences_gets_everything() {
    let (engine, _, _) = engine_with_stores();

    let outcome = engine
        .create_with_preference_check(
            99,
            NotificationKind::FlashSale,
            &vars(json!({"discount_percent": 30, "event_title": "Jazz Night", "time_remaining": "1h"})),
            None,
        )
        .await
        .unwrap();

    let record = outcome.into_record().expect("default-allow must create");
    assert_eq!(record.message, "30% sur Jazz Night pendant 1h");
}

/// Preference store double whose lookups always fail.
struct FailingPreferenceStore;

#[async_trait]
impl PreferenceStore for FailingPreferenceStore {
    async fn get_by_recipient(
        &self,
        _recipient_id: i64,
    ) -> Result<Option<NotificationPreference>, StoreError> {
        Err(StoreError::Unavailable("preference lookup down".to_string()))
    }

    async fn upsert(
        &self,
        _recipient_id: i64,
        _update: PreferenceUpdate,
    ) -> Result<NotificationPreference, StoreError> {
        Err(StoreError::Unavailable("preference lookup down".to_string()))
    }
}

// Pins the deliberate fail-open policy: a broken preference store must
// not suppress notifications.
#[tokio::test]
async fn test_preference_check_failure_fails_open() {
    let records = Arc::new(MemoryNotificationStore::new());
    let engine = NotificationEngine::new(records.clone(), Arc::new(FailingPreferenceStore));

    let outcome = engine
        .create_with_preference_check(
            7,
            NotificationKind::EventReminder,
            &vars(json!({"event_title": "Jazz Night", "time_remaining": "2h"})),
            None,
        )
        .await
        .unwrap();

    assert!(matches!(outcome, CreateOutcome::Created(_)));
    assert_eq!(records.len(), 1);
}

// =============================================================================
// Listing, counting, read transitions
// =============================================================================

#[tokio::test]
async fn test_list_orders_newest_first() {
    let (engine, records, _) = engine_with_stores();
    for i in 0..5 {
        records.insert(raw_record(1, i)).await.unwrap();
    }

    let page = engine.list(1, ListQuery::default()).await.unwrap();
    assert_eq!(page.len(), 5);
    for pair in page.windows(2) {
        assert!(pair[0].created_at > pair[1].created_at);
    }
}

#[tokio::test]
async fn test_list_unread_filter_matches_unread_count() {
    let (engine, records, _) = engine_with_stores();
    let mut ids = Vec::new();
    for i in 0..4 {
        let record = records.insert(raw_record(1, i)).await.unwrap();
        ids.push(record.id);
    }
    engine.mark_read(ids[0]).await.unwrap();

    let unread = engine
        .list(
            1,
            ListQuery {
                filter: RecordFilter::unread(),
                ..ListQuery::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(unread.len(), 3);
    assert!(unread.iter().all(|r| r.read_at.is_none()));
    assert_eq!(engine.unread_count(1).await.unwrap(), 3);
}

#[tokio::test]
async fn test_list_filters_by_kind_and_priority() {
    let (engine, records, _) = engine_with_stores();
    records.insert(raw_record(1, 0)).await.unwrap();
    let mut urgent = raw_record(1, 1);
    urgent.kind = NotificationKind::SafetyAlert;
    urgent.priority = Priority::Urgent;
    let urgent = records.insert(urgent).await.unwrap();

    let page = engine
        .list(
            1,
            ListQuery {
                filter: RecordFilter {
                    kind: Some(NotificationKind::SafetyAlert),
                    priority: Some(Priority::Urgent),
                    ..RecordFilter::default()
                },
                ..ListQuery::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, urgent.id);
}

#[tokio::test]
async fn test_list_defaults_to_fifty_and_paginates() {
    let (engine, records, _) = engine_with_stores();
    for i in 0..55 {
        records.insert(raw_record(1, i)).await.unwrap();
    }

    let first_page = engine.list(1, ListQuery::default()).await.unwrap();
    assert_eq!(first_page.len(), 50);

    let second_page = engine
        .list(
            1,
            ListQuery {
                offset: Some(50),
                ..ListQuery::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(second_page.len(), 5);
    // pages do not overlap
    assert!(first_page
        .iter()
        .all(|r| second_page.iter().all(|s| s.id != r.id)));
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let (engine, records, _) = engine_with_stores();
    let record = records.insert(raw_record(1, 0)).await.unwrap();

    let first = engine.mark_read(record.id).await.unwrap();
    assert_eq!(first.status, NotificationStatus::Read);
    let read_at = first.read_at.unwrap();

    let second = engine.mark_read(record.id).await.unwrap();
    assert_eq!(second.read_at, Some(read_at), "re-marking must not move the timestamp");
}

#[tokio::test]
async fn test_mark_read_unknown_id_is_not_found() {
    let (engine, _, _) = engine_with_stores();
    let err = engine.mark_read(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, NotificationError::NotFound(_)));
}

#[tokio::test]
async fn test_mark_all_read_is_idempotent_and_empties_unread() {
    let (engine, records, _) = engine_with_stores();
    for i in 0..3 {
        records.insert(raw_record(1, i)).await.unwrap();
    }
    records.insert(raw_record(2, 0)).await.unwrap();

    assert_eq!(engine.mark_all_read(1).await.unwrap(), 3);
    assert_eq!(engine.mark_all_read(1).await.unwrap(), 0);
    assert_eq!(engine.unread_count(1).await.unwrap(), 0);
    // other recipients untouched
    assert_eq!(engine.unread_count(2).await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_then_fetch_is_not_found() {
    let (engine, records, _) = engine_with_stores();
    let record = records.insert(raw_record(1, 0)).await.unwrap();

    engine.delete(record.id).await.unwrap();
    assert!(records.find_by_id(record.id).await.unwrap().is_none());

    let err = engine.delete(record.id).await.unwrap_err();
    assert!(matches!(err, NotificationError::NotFound(_)));
}

// =============================================================================
// Repair sweep
// =============================================================================

#[tokio::test]
async fn test_repair_resolves_camel_case_payload_keys() {
    let (engine, records, _) = engine_with_stores();

    let mut legacy = raw_record(1, 0);
    legacy.kind = NotificationKind::EventReminder;
    legacy.title = "Rappel d'événement".to_string();
    legacy.message = "Votre événement {event_title} commence dans {time_remaining}".to_string();
    legacy.payload = json!({"eventTitle": "Jazz Night", "timeRemaining": "2h"});
    let legacy = records.insert(legacy).await.unwrap();

    let summary = engine.repair_legacy_records().await.unwrap();
    assert_eq!(summary.scanned, 1);
    assert_eq!(summary.repaired, 1);

    let repaired = records.find_by_id(legacy.id).await.unwrap().unwrap();
    assert_eq!(
        repaired.message,
        "Votre événement Jazz Night commence dans 2h"
    );
}

#[tokio::test]
async fn test_repair_is_idempotent() {
    let (engine, records, _) = engine_with_stores();

    // one repairable record, one that cannot be repaired
    let mut repairable = raw_record(1, 0);
    repairable.kind = NotificationKind::EventReminder;
    repairable.message = "Votre événement {event_title} commence dans 2h".to_string();
    repairable.payload = json!({"event_title": "Jazz Night"});
    let repairable = records.insert(repairable).await.unwrap();

    let mut hopeless = raw_record(1, 1);
    hopeless.kind = NotificationKind::EventReminder;
    hopeless.message = "Votre événement {event_title} commence dans {time_remaining}".to_string();
    hopeless.payload = json!({});
    let hopeless = records.insert(hopeless).await.unwrap();

    let first = engine.repair_legacy_records().await.unwrap();
    assert_eq!(first.repaired, 1);

    let mut texts_after_first = Vec::new();
    for id in [repairable.id, hopeless.id] {
        let r = records.find_by_id(id).await.unwrap().unwrap();
        texts_after_first.push((id, r.title, r.message));
    }

    let second = engine.repair_legacy_records().await.unwrap();
    assert_eq!(second.repaired, 0, "second sweep must change nothing");

    for (id, title, message) in texts_after_first {
        let r = records.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(r.title, title);
        assert_eq!(r.message, message);
    }
}

#[tokio::test]
async fn test_repair_leaves_unresolvable_records_unchanged() {
    let (engine, records, _) = engine_with_stores();

    let mut legacy = raw_record(1, 0);
    legacy.kind = NotificationKind::EventReminder;
    legacy.message = "Votre événement {event_title} commence dans {time_remaining}".to_string();
    legacy.payload = json!({"unrelated": "data"});
    let legacy = records.insert(legacy).await.unwrap();

    let summary = engine.repair_legacy_records().await.unwrap();
    assert_eq!(summary.repaired, 0);
    assert_eq!(summary.skipped, 1);

    let unchanged = records.find_by_id(legacy.id).await.unwrap().unwrap();
    assert_eq!(
        unchanged.message,
        "Votre événement {event_title} commence dans {time_remaining}"
    );
}
