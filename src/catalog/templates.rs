//! The kind-to-template table.
//!
//! One template per kind, built once into an immutable process-wide
//! map. `template_for` is an exhaustive match over the closed enum, so
//! a new kind without a template fails to compile; `validate` is the
//! boot-time assertion that the enumeration table and the map agree.
//! Message text is French, the product's locale; `{variable}` tokens
//! are substituted by `render`.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::record::Priority;

use super::kinds::{Category, NotificationKind};

/// The kind-to-message-pattern binding, including the default priority
/// and the category used for preference gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplate {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub message: &'static str,
    pub priority: Priority,
    pub category: Category,
}

fn template_for(kind: NotificationKind) -> NotificationTemplate {
    // Priority::Urgent and Category::Urgent collide; the urgent
    // category is spelled out below.
    use Category::{Booking, Commercial, Performance, Personalized, Planning, Social, System};
    use NotificationKind::*;
    use Priority::*;

    let (title, message, priority, category) = match kind {
        // Planning
        EventReminder => (
            "Rappel d'événement",
            "Votre événement {event_title} commence dans {time_remaining}",
            High,
            Planning,
        ),
        EventCreated => (
            "Événement publié",
            "Votre événement {event_title} est maintenant en ligne",
            Medium,
            Planning,
        ),
        EventUpdated => (
            "Événement mis à jour",
            "L'événement {event_title} a été modifié par l'organisateur",
            Medium,
            Planning,
        ),
        EventCancelled => (
            "Événement annulé",
            "L'événement {event_title} prévu le {event_date} a été annulé",
            High,
            Planning,
        ),
        EventPostponed => (
            "Événement reporté",
            "L'événement {event_title} est reporté au {event_date}",
            High,
            Planning,
        ),
        EventLocationChanged => (
            "Changement de lieu",
            "L'événement {event_title} se tiendra désormais à {venue_name}",
            High,
            Planning,
        ),
        EventTimeChanged => (
            "Changement d'horaire",
            "L'événement {event_title} commencera à {start_time}",
            High,
            Planning,
        ),
        DraftExpiring => (
            "Brouillon sur le point d'expirer",
            "Votre brouillon {event_title} expire le {expiry_date}",
            Low,
            Planning,
        ),

        // Booking
        BookingConfirmed => (
            "Réservation confirmée",
            "Votre réservation pour {event_title} est confirmée ({ticket_count} place(s))",
            Medium,
            Booking,
        ),
        BookingCancelled => (
            "Réservation annulée",
            "Votre réservation pour {event_title} a été annulée",
            Medium,
            Booking,
        ),
        BookingModified => (
            "Réservation modifiée",
            "Votre réservation pour {event_title} a été mise à jour",
            Medium,
            Booking,
        ),
        TicketIssued => (
            "Billet disponible",
            "Votre billet pour {event_title} est prêt à être téléchargé",
            Medium,
            Booking,
        ),
        WaitlistJoined => (
            "Liste d'attente",
            "Vous êtes en position {waitlist_position} pour {event_title}",
            Low,
            Booking,
        ),
        WaitlistPromoted => (
            "Place disponible",
            "Une place s'est libérée pour {event_title}, confirmez avant {confirmation_deadline}",
            High,
            Booking,
        ),
        CheckInOpen => (
            "Enregistrement ouvert",
            "L'enregistrement pour {event_title} est ouvert",
            Medium,
            Booking,
        ),
        BookingExpiring => (
            "Réservation en attente",
            "Votre panier pour {event_title} expire dans {time_remaining}",
            High,
            Booking,
        ),

        // Social
        NewComment => (
            "Nouveau commentaire",
            "{author_name} a commenté votre événement {event_title}",
            Low,
            Social,
        ),
        CommentReply => (
            "Réponse à votre commentaire",
            "{author_name} a répondu à votre commentaire sur {event_title}",
            Low,
            Social,
        ),
        NewFollower => (
            "Nouvel abonné",
            "{follower_name} s'est abonné à votre profil",
            Low,
            Social,
        ),
        FriendAttending => (
            "Un ami participe",
            "{friend_name} participe à {event_title}",
            Low,
            Social,
        ),
        EventShared => (
            "Événement partagé",
            "{user_name} a partagé votre événement {event_title}",
            Low,
            Social,
        ),
        MentionedInComment => (
            "Vous avez été mentionné",
            "{author_name} vous a mentionné dans un commentaire sur {event_title}",
            Medium,
            Social,
        ),
        ReviewReceived => (
            "Nouvel avis",
            "{author_name} a laissé un avis {rating}/5 sur {event_title}",
            Low,
            Social,
        ),
        OrganizerAnnouncement => (
            "Message de l'organisateur",
            "{organizer_name} : {announcement_excerpt}",
            Medium,
            Social,
        ),

        // Performance
        TicketSalesMilestone => (
            "Palier de ventes atteint",
            "{event_title} a dépassé {sales_count} billets vendus",
            Medium,
            Performance,
        ),
        SelloutApproaching => (
            "Bientôt complet",
            "Il reste {remaining_tickets} places pour {event_title}",
            Medium,
            Performance,
        ),
        AttendanceSummary => (
            "Bilan de participation",
            "{attendee_count} participants ont assisté à {event_title}",
            Low,
            Performance,
        ),
        ViewsSpike => (
            "Pic de consultations",
            "{event_title} a été consulté {view_count} fois aujourd'hui",
            Low,
            Performance,
        ),
        WeeklyReport => (
            "Rapport hebdomadaire",
            "Vos événements ont généré {view_count} vues et {sales_count} ventes cette semaine",
            Low,
            Performance,
        ),
        LowSalesWarning => (
            "Ventes en retrait",
            "{event_title} n'a vendu que {sales_count} billets à {days_before_event} jours de l'événement",
            Medium,
            Performance,
        ),
        PostEventSummary => (
            "Résumé d'après-événement",
            "Votre bilan pour {event_title} est disponible",
            Low,
            Performance,
        ),

        // System
        AccountCreated => (
            "Bienvenue",
            "Bonjour {user_name}, votre compte a bien été créé",
            Medium,
            System,
        ),
        EmailVerified => (
            "Adresse vérifiée",
            "Votre adresse e-mail a été confirmée",
            Low,
            System,
        ),
        PasswordChanged => (
            "Mot de passe modifié",
            "Votre mot de passe a été modifié le {change_date}",
            High,
            System,
        ),
        NewLoginDetected => (
            "Nouvelle connexion",
            "Connexion détectée depuis {device_name} le {login_date}",
            High,
            System,
        ),
        ProfileIncomplete => (
            "Profil incomplet",
            "Complétez votre profil pour améliorer votre visibilité",
            Low,
            System,
        ),
        TermsUpdated => (
            "Conditions mises à jour",
            "Nos conditions d'utilisation évoluent au {effective_date}",
            Low,
            System,
        ),
        MaintenanceScheduled => (
            "Maintenance planifiée",
            "Le service sera indisponible le {maintenance_date} pendant {duration}",
            Medium,
            System,
        ),
        DataExportReady => (
            "Export disponible",
            "Votre export de données est prêt au téléchargement",
            Low,
            System,
        ),

        // Commercial
        PromotionStarted => (
            "Promotion en cours",
            "Profitez de {discount_percent}% de réduction sur {event_title}",
            Low,
            Commercial,
        ),
        DiscountCode => (
            "Code promo",
            "Utilisez le code {promo_code} avant le {expiry_date}",
            Low,
            Commercial,
        ),
        EarlyBirdEnding => (
            "Fin du tarif early bird",
            "Le tarif réduit pour {event_title} se termine dans {time_remaining}",
            Medium,
            Commercial,
        ),
        NewsletterDigest => (
            "Votre sélection du mois",
            "Découvrez {event_count} événements choisis pour vous",
            Low,
            Commercial,
        ),
        PartnerOffer => (
            "Offre partenaire",
            "{partner_name} vous propose une offre exclusive",
            Low,
            Commercial,
        ),
        SeasonPassOffer => (
            "Pass saison",
            "Le pass saison {season_name} est disponible à {price}",
            Low,
            Commercial,
        ),
        FlashSale => (
            "Vente flash",
            "{discount_percent}% sur {event_title} pendant {time_remaining}",
            Medium,
            Commercial,
        ),

        // Personalized
        RecommendedEvent => (
            "Suggestion pour vous",
            "{event_title} pourrait vous plaire",
            Low,
            Personalized,
        ),
        SimilarEventAdded => (
            "Événement similaire",
            "Un événement proche de {reference_event} vient d'être publié : {event_title}",
            Low,
            Personalized,
        ),
        FavoriteOrganizerEvent => (
            "Nouvel événement",
            "{organizer_name} organise {event_title} le {event_date}",
            Medium,
            Personalized,
        ),
        NearbyEventAdded => (
            "Près de chez vous",
            "{event_title} aura lieu à {distance} de chez vous",
            Low,
            Personalized,
        ),
        CategoryDigest => (
            "Nouveautés {category_name}",
            "{event_count} nouveaux événements dans la catégorie {category_name}",
            Low,
            Personalized,
        ),
        WeekendPicks => (
            "Idées pour le week-end",
            "{event_count} événements sélectionnés pour ce week-end",
            Low,
            Personalized,
        ),
        PriceDropAlert => (
            "Baisse de prix",
            "Le tarif de {event_title} est passé à {price}",
            Medium,
            Personalized,
        ),

        // Urgent
        EventCancelledLastMinute => (
            "Annulation de dernière minute",
            "{event_title} prévu aujourd'hui est annulé",
            Urgent,
            Category::Urgent,
        ),
        VenueChangedLastMinute => (
            "Changement de lieu imminent",
            "{event_title} est déplacé à {venue_name}, vérifiez votre billet",
            Urgent,
            Category::Urgent,
        ),
        EventDelayed => (
            "Événement retardé",
            "{event_title} est retardé de {delay_duration}",
            Urgent,
            Category::Urgent,
        ),
        SafetyAlert => (
            "Alerte sécurité",
            "Consigne de sécurité pour {event_title} : {safety_instructions}",
            Urgent,
            Category::Urgent,
        ),
        WeatherAlert => (
            "Alerte météo",
            "Conditions météo défavorables pour {event_title} : {weather_summary}",
            Urgent,
            Category::Urgent,
        ),
        EntryIssue => (
            "Problème d'accès",
            "Un problème d'accès est signalé pour {event_title} : {issue_summary}",
            Urgent,
            Category::Urgent,
        ),
        RefundIssued => (
            "Remboursement émis",
            "Votre remboursement de {amount} pour {event_title} a été traité",
            High,
            Category::Urgent,
        ),
    };

    NotificationTemplate {
        kind,
        title,
        message,
        priority,
        category,
    }
}

lazy_static! {
    static ref CATALOG: HashMap<NotificationKind, NotificationTemplate> = NotificationKind::ALL
        .iter()
        .map(|&kind| (kind, template_for(kind)))
        .collect();
}

/// Look up the template for a kind.
///
/// Total over the enum: the catalog is built from `NotificationKind::ALL`
/// and an exhaustive match, and `validate` asserts completeness at
/// boot. A miss here is a construction fault, not a runtime condition,
/// and panics accordingly.
pub fn lookup(kind: NotificationKind) -> &'static NotificationTemplate {
    CATALOG
        .get(&kind)
        .expect("template catalog must cover every notification kind")
}

/// Iterate over every registered template.
pub fn all() -> impl Iterator<Item = &'static NotificationTemplate> {
    CATALOG.values()
}

/// Boot-time completeness assertion: every enumerated kind resolves to
/// exactly one template bound to that kind. Host applications call this
/// once at start-up so a catalog gap surfaces before any request does.
pub fn validate() -> Result<(), String> {
    for kind in NotificationKind::ALL {
        match CATALOG.get(&kind) {
            None => return Err(format!("no template registered for {kind}")),
            Some(template) if template.kind != kind => {
                return Err(format!("template for {kind} is bound to {}", template.kind));
            }
            Some(_) => {}
        }
    }
    if CATALOG.len() != NotificationKind::ALL.len() {
        return Err(format!(
            "catalog holds {} templates for {} kinds",
            CATALOG.len(),
            NotificationKind::ALL.len()
        ));
    }
    Ok(())
}
