//! Prometheus metrics for the notification core.
//!
//! Counters cover the engine's life events: records created and
//! suppressed (per category), read transitions, repaired legacy
//! records and fail-open preference checks. The surrounding
//! application serves `encode_metrics()` from its metrics endpoint.

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "event_notifications";

lazy_static! {
    /// Notification records created, by category
    pub static ref NOTIFICATIONS_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_created_total", METRIC_PREFIX),
        "Total notification records created",
        &["category"]
    ).unwrap();

    /// Notifications suppressed by recipient preferences, by category
    pub static ref NOTIFICATIONS_SUPPRESSED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_suppressed_total", METRIC_PREFIX),
        "Total notifications suppressed by recipient preferences",
        &["category"]
    ).unwrap();

    /// Records transitioned to READ (single and bulk marks)
    pub static ref NOTIFICATIONS_READ_TOTAL: IntCounter = register_int_counter!(
        format!("{}_read_total", METRIC_PREFIX),
        "Total notification records marked read"
    ).unwrap();

    /// Legacy records rewritten by the repair sweep
    pub static ref NOTIFICATIONS_REPAIRED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_repaired_total", METRIC_PREFIX),
        "Total legacy notification records repaired"
    ).unwrap();

    /// Preference checks that failed and defaulted to allow
    pub static ref PREFERENCE_FAILOPEN_TOTAL: IntCounter = register_int_counter!(
        format!("{}_preference_failopen_total", METRIC_PREFIX),
        "Total preference checks that failed and fell back to allow"
    ).unwrap();
}

/// Encode all registered metrics in the Prometheus text exposition
/// format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_register_and_encode() {
        NOTIFICATIONS_CREATED_TOTAL
            .with_label_values(&["planning"])
            .inc();
        NOTIFICATIONS_READ_TOTAL.inc();

        let text = encode_metrics().unwrap();
        assert!(text.contains("event_notifications_created_total"));
        assert!(text.contains("event_notifications_read_total"));
    }
}
