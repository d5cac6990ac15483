//! Payload-key alias table for the repair sweep.
//!
//! Legacy callers disagreed on payload key naming: some wrote
//! snake_case (`event_title`), others camelCase (`eventTitle`). The
//! table maps each logical template variable to the ordered list of
//! payload keys accepted for it; resolution checks them in order and
//! the first present key wins. Keeping the policy in data rather than
//! control flow lets the repair behavior be tested in isolation.

use serde_json::{Map, Value};

pub(crate) const PAYLOAD_KEY_ALIASES: &[(&str, &[&str])] = &[
    ("amount", &["amount"]),
    ("announcement_excerpt", &["announcement_excerpt", "announcementExcerpt"]),
    ("attendee_count", &["attendee_count", "attendeeCount"]),
    ("author_name", &["author_name", "authorName"]),
    ("category_name", &["category_name", "categoryName"]),
    ("change_date", &["change_date", "changeDate"]),
    ("confirmation_deadline", &["confirmation_deadline", "confirmationDeadline"]),
    ("days_before_event", &["days_before_event", "daysBeforeEvent"]),
    ("delay_duration", &["delay_duration", "delayDuration"]),
    ("device_name", &["device_name", "deviceName"]),
    ("discount_percent", &["discount_percent", "discountPercent"]),
    ("distance", &["distance"]),
    ("duration", &["duration"]),
    ("effective_date", &["effective_date", "effectiveDate"]),
    ("event_count", &["event_count", "eventCount"]),
    ("event_date", &["event_date", "eventDate"]),
    ("event_title", &["event_title", "eventTitle"]),
    ("expiry_date", &["expiry_date", "expiryDate"]),
    ("follower_name", &["follower_name", "followerName"]),
    ("friend_name", &["friend_name", "friendName"]),
    ("issue_summary", &["issue_summary", "issueSummary"]),
    ("login_date", &["login_date", "loginDate"]),
    ("maintenance_date", &["maintenance_date", "maintenanceDate"]),
    ("organizer_name", &["organizer_name", "organizerName"]),
    ("partner_name", &["partner_name", "partnerName"]),
    ("price", &["price"]),
    ("promo_code", &["promo_code", "promoCode"]),
    ("rating", &["rating"]),
    ("reference_event", &["reference_event", "referenceEvent"]),
    ("remaining_tickets", &["remaining_tickets", "remainingTickets"]),
    ("safety_instructions", &["safety_instructions", "safetyInstructions"]),
    ("sales_count", &["sales_count", "salesCount"]),
    ("season_name", &["season_name", "seasonName"]),
    ("start_time", &["start_time", "startTime"]),
    ("ticket_count", &["ticket_count", "ticketCount"]),
    ("time_remaining", &["time_remaining", "timeRemaining"]),
    ("user_name", &["user_name", "userName"]),
    ("venue_name", &["venue_name", "venueName"]),
    ("view_count", &["view_count", "viewCount"]),
    ("waitlist_position", &["waitlist_position", "waitlistPosition"]),
];

/// Resolve a logical variable from a stored payload.
///
/// Variables outside the table fall back to an exact-key lookup.
pub(crate) fn resolve<'a>(logical: &str, payload: &'a Map<String, Value>) -> Option<&'a Value> {
    match PAYLOAD_KEY_ALIASES.iter().find(|(name, _)| *name == logical) {
        Some((_, keys)) => keys.iter().find_map(|key| payload.get(*key)),
        None => payload.get(logical),
    }
}
