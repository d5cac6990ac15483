//! The closed set of notification kinds and their grouping categories.
//!
//! Both enums are frozen at build time. `NotificationKind::ALL` is the
//! canonical enumeration used by the catalog completeness check; adding
//! a variant without extending `ALL` (or the template table) is caught
//! at boot by `catalog::validate`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotificationError;

/// Grouping used purely for preference gating: each category maps to
/// one boolean toggle on the recipient's preference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Planning,
    Booking,
    Social,
    Performance,
    System,
    Commercial,
    Personalized,
    Urgent,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Planning,
        Category::Booking,
        Category::Social,
        Category::Performance,
        Category::System,
        Category::Commercial,
        Category::Personalized,
        Category::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Planning => "planning",
            Category::Booking => "booking",
            Category::Social => "social",
            Category::Performance => "performance",
            Category::System => "system",
            Category::Commercial => "commercial",
            Category::Personalized => "personalized",
            Category::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a notification is about. Closed set, one template per kind.
///
/// The wire and database form is SCREAMING_SNAKE_CASE, e.g.
/// `EVENT_REMINDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    // Planning
    EventReminder,
    EventCreated,
    EventUpdated,
    EventCancelled,
    EventPostponed,
    EventLocationChanged,
    EventTimeChanged,
    DraftExpiring,

    // Booking
    BookingConfirmed,
    BookingCancelled,
    BookingModified,
    TicketIssued,
    WaitlistJoined,
    WaitlistPromoted,
    CheckInOpen,
    BookingExpiring,

    // Social
    NewComment,
    CommentReply,
    NewFollower,
    FriendAttending,
    EventShared,
    MentionedInComment,
    ReviewReceived,
    OrganizerAnnouncement,

    // Performance
    TicketSalesMilestone,
    SelloutApproaching,
    AttendanceSummary,
    ViewsSpike,
    WeeklyReport,
    LowSalesWarning,
    PostEventSummary,

    // System
    AccountCreated,
    EmailVerified,
    PasswordChanged,
    NewLoginDetected,
    ProfileIncomplete,
    TermsUpdated,
    MaintenanceScheduled,
    DataExportReady,

    // Commercial
    PromotionStarted,
    DiscountCode,
    EarlyBirdEnding,
    NewsletterDigest,
    PartnerOffer,
    SeasonPassOffer,
    FlashSale,

    // Personalized
    RecommendedEvent,
    SimilarEventAdded,
    FavoriteOrganizerEvent,
    NearbyEventAdded,
    CategoryDigest,
    WeekendPicks,
    PriceDropAlert,

    // Urgent
    EventCancelledLastMinute,
    VenueChangedLastMinute,
    EventDelayed,
    SafetyAlert,
    WeatherAlert,
    EntryIssue,
    RefundIssued,
}

impl NotificationKind {
    /// Every member of the closed set, in declaration order.
    pub const ALL: [NotificationKind; 60] = [
        NotificationKind::EventReminder,
        NotificationKind::EventCreated,
        NotificationKind::EventUpdated,
        NotificationKind::EventCancelled,
        NotificationKind::EventPostponed,
        NotificationKind::EventLocationChanged,
        NotificationKind::EventTimeChanged,
        NotificationKind::DraftExpiring,
        NotificationKind::BookingConfirmed,
        NotificationKind::BookingCancelled,
        NotificationKind::BookingModified,
        NotificationKind::TicketIssued,
        NotificationKind::WaitlistJoined,
        NotificationKind::WaitlistPromoted,
        NotificationKind::CheckInOpen,
        NotificationKind::BookingExpiring,
        NotificationKind::NewComment,
        NotificationKind::CommentReply,
        NotificationKind::NewFollower,
        NotificationKind::FriendAttending,
        NotificationKind::EventShared,
        NotificationKind::MentionedInComment,
        NotificationKind::ReviewReceived,
        NotificationKind::OrganizerAnnouncement,
        NotificationKind::TicketSalesMilestone,
        NotificationKind::SelloutApproaching,
        NotificationKind::AttendanceSummary,
        NotificationKind::ViewsSpike,
        NotificationKind::WeeklyReport,
        NotificationKind::LowSalesWarning,
        NotificationKind::PostEventSummary,
        NotificationKind::AccountCreated,
        NotificationKind::EmailVerified,
        NotificationKind::PasswordChanged,
        NotificationKind::NewLoginDetected,
        NotificationKind::ProfileIncomplete,
        NotificationKind::TermsUpdated,
        NotificationKind::MaintenanceScheduled,
        NotificationKind::DataExportReady,
        NotificationKind::PromotionStarted,
        NotificationKind::DiscountCode,
        NotificationKind::EarlyBirdEnding,
        NotificationKind::NewsletterDigest,
        NotificationKind::PartnerOffer,
        NotificationKind::SeasonPassOffer,
        NotificationKind::FlashSale,
        NotificationKind::RecommendedEvent,
        NotificationKind::SimilarEventAdded,
        NotificationKind::FavoriteOrganizerEvent,
        NotificationKind::NearbyEventAdded,
        NotificationKind::CategoryDigest,
        NotificationKind::WeekendPicks,
        NotificationKind::PriceDropAlert,
        NotificationKind::EventCancelledLastMinute,
        NotificationKind::VenueChangedLastMinute,
        NotificationKind::EventDelayed,
        NotificationKind::SafetyAlert,
        NotificationKind::WeatherAlert,
        NotificationKind::EntryIssue,
        NotificationKind::RefundIssued,
    ];

    /// Wire/database form of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::EventReminder => "EVENT_REMINDER",
            NotificationKind::EventCreated => "EVENT_CREATED",
            NotificationKind::EventUpdated => "EVENT_UPDATED",
            NotificationKind::EventCancelled => "EVENT_CANCELLED",
            NotificationKind::EventPostponed => "EVENT_POSTPONED",
            NotificationKind::EventLocationChanged => "EVENT_LOCATION_CHANGED",
            NotificationKind::EventTimeChanged => "EVENT_TIME_CHANGED",
            NotificationKind::DraftExpiring => "DRAFT_EXPIRING",
            NotificationKind::BookingConfirmed => "BOOKING_CONFIRMED",
            NotificationKind::BookingCancelled => "BOOKING_CANCELLED",
            NotificationKind::BookingModified => "BOOKING_MODIFIED",
            NotificationKind::TicketIssued => "TICKET_ISSUED",
            NotificationKind::WaitlistJoined => "WAITLIST_JOINED",
            NotificationKind::WaitlistPromoted => "WAITLIST_PROMOTED",
            NotificationKind::CheckInOpen => "CHECK_IN_OPEN",
            NotificationKind::BookingExpiring => "BOOKING_EXPIRING",
            NotificationKind::NewComment => "NEW_COMMENT",
            NotificationKind::CommentReply => "COMMENT_REPLY",
            NotificationKind::NewFollower => "NEW_FOLLOWER",
            NotificationKind::FriendAttending => "FRIEND_ATTENDING",
            NotificationKind::EventShared => "EVENT_SHARED",
            NotificationKind::MentionedInComment => "MENTIONED_IN_COMMENT",
            NotificationKind::ReviewReceived => "REVIEW_RECEIVED",
            NotificationKind::OrganizerAnnouncement => "ORGANIZER_ANNOUNCEMENT",
            NotificationKind::TicketSalesMilestone => "TICKET_SALES_MILESTONE",
            NotificationKind::SelloutApproaching => "SELLOUT_APPROACHING",
            NotificationKind::AttendanceSummary => "ATTENDANCE_SUMMARY",
            NotificationKind::ViewsSpike => "VIEWS_SPIKE",
            NotificationKind::WeeklyReport => "WEEKLY_REPORT",
            NotificationKind::LowSalesWarning => "LOW_SALES_WARNING",
            NotificationKind::PostEventSummary => "POST_EVENT_SUMMARY",
            NotificationKind::AccountCreated => "ACCOUNT_CREATED",
            NotificationKind::EmailVerified => "EMAIL_VERIFIED",
            NotificationKind::PasswordChanged => "PASSWORD_CHANGED",
            NotificationKind::NewLoginDetected => "NEW_LOGIN_DETECTED",
            NotificationKind::ProfileIncomplete => "PROFILE_INCOMPLETE",
            NotificationKind::TermsUpdated => "TERMS_UPDATED",
            NotificationKind::MaintenanceScheduled => "MAINTENANCE_SCHEDULED",
            NotificationKind::DataExportReady => "DATA_EXPORT_READY",
            NotificationKind::PromotionStarted => "PROMOTION_STARTED",
            NotificationKind::DiscountCode => "DISCOUNT_CODE",
            NotificationKind::EarlyBirdEnding => "EARLY_BIRD_ENDING",
            NotificationKind::NewsletterDigest => "NEWSLETTER_DIGEST",
            NotificationKind::PartnerOffer => "PARTNER_OFFER",
            NotificationKind::SeasonPassOffer => "SEASON_PASS_OFFER",
            NotificationKind::FlashSale => "FLASH_SALE",
            NotificationKind::RecommendedEvent => "RECOMMENDED_EVENT",
            NotificationKind::SimilarEventAdded => "SIMILAR_EVENT_ADDED",
            NotificationKind::FavoriteOrganizerEvent => "FAVORITE_ORGANIZER_EVENT",
            NotificationKind::NearbyEventAdded => "NEARBY_EVENT_ADDED",
            NotificationKind::CategoryDigest => "CATEGORY_DIGEST",
            NotificationKind::WeekendPicks => "WEEKEND_PICKS",
            NotificationKind::PriceDropAlert => "PRICE_DROP_ALERT",
            NotificationKind::EventCancelledLastMinute => "EVENT_CANCELLED_LAST_MINUTE",
            NotificationKind::VenueChangedLastMinute => "VENUE_CHANGED_LAST_MINUTE",
            NotificationKind::EventDelayed => "EVENT_DELAYED",
            NotificationKind::SafetyAlert => "SAFETY_ALERT",
            NotificationKind::WeatherAlert => "WEATHER_ALERT",
            NotificationKind::EntryIssue => "ENTRY_ISSUE",
            NotificationKind::RefundIssued => "REFUND_ISSUED",
        }
    }

    /// Parse the wire form. Returns `None` for strings outside the
    /// closed set (legacy database rows, bad external input).
    pub fn parse(s: &str) -> Option<Self> {
        NotificationKind::ALL.iter().find(|k| k.as_str() == s).copied()
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationKind::parse(s).ok_or_else(|| NotificationError::UnknownKind(s.to_string()))
    }
}
