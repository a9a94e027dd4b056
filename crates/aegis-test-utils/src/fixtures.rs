// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared record fixtures for tests.

use chrono::{DateTime, Utc};

use aegis_core::{Subscriber, SubscriberDraft, SubscriberId};

/// A plausible candidate payload for `name`.
pub fn draft(name: &str) -> SubscriberDraft {
    SubscriberDraft {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: 5550001111,
        emergency_phone: None,
        home_address: Some("12 North Rd".to_string()),
        accepted_terms: true,
        subscription_tier: "free".to_string(),
        subscription_expiration: None,
        last_known_location: None,
        is_agent: Some(false),
        is_safe: None,
        profile_picture: None,
        device_ids: None,
    }
}

/// A fully materialized record under `id`.
pub fn subscriber(id: &str, name: &str) -> Subscriber {
    draft(name).into_subscriber(SubscriberId(id.to_string()), Some(fixed_instant()))
}

/// A fixed creation instant so fixtures compare deterministically.
pub fn fixed_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-08-01T10:00:00Z")
        .expect("valid fixture timestamp")
        .with_timezone(&Utc)
}
