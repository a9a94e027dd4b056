// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscriber record types shared across the Aegis workspace.
//!
//! [`Subscriber`] is the canonical wire and in-memory representation of one
//! subscriber record. [`SubscriberDraft`] is a candidate record before the
//! store has assigned an id, and [`SubscriberPatch`] carries a partial-field
//! update where only present fields change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a subscriber record, assigned by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriberId(pub String);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for SubscriberId {
    fn from(value: &str) -> Self {
        SubscriberId(value.to_string())
    }
}

/// A last-known-location coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A subscriber record managed by the console.
///
/// `id` and `created_at` are assigned by the backing store on creation and
/// immutable afterwards. All other fields may change through partial updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub name: String,
    pub email: String,
    pub phone: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    pub accepted_terms: bool,
    pub subscription_tier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_expiration: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_agent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_safe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A candidate subscriber record: everything except the store-assigned
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriberDraft {
    pub name: String,
    pub email: String,
    pub phone: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    #[serde(default)]
    pub accepted_terms: bool,
    pub subscription_tier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_expiration: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_agent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_safe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_ids: Option<Vec<String>>,
}

impl SubscriberDraft {
    /// Materialize the draft into a full record under the given identity.
    ///
    /// `created_at` is `Some` when the store assigns it, `None` for
    /// provisional client-side records awaiting confirmation.
    pub fn into_subscriber(
        self,
        id: SubscriberId,
        created_at: Option<DateTime<Utc>>,
    ) -> Subscriber {
        Subscriber {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            emergency_phone: self.emergency_phone,
            home_address: self.home_address,
            accepted_terms: self.accepted_terms,
            subscription_tier: self.subscription_tier,
            subscription_expiration: self.subscription_expiration,
            last_known_location: self.last_known_location,
            is_agent: self.is_agent,
            is_safe: self.is_safe,
            profile_picture: self.profile_picture,
            device_ids: self.device_ids,
            created_at,
        }
    }
}

/// A partial-field update. Only fields that are `Some` change on merge;
/// everything else is retained. `id` and `created_at` are not patchable.
///
/// Absent means "leave unchanged", so the typed patch cannot clear an
/// optional field back to null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriberPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_terms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_expiration: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_known_location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_agent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_safe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_ids: Option<Vec<String>>,
}

impl SubscriberPatch {
    /// Merge the present fields of this patch into `target`.
    pub fn apply(&self, target: &mut Subscriber) {
        if let Some(name) = &self.name {
            target.name = name.clone();
        }
        if let Some(email) = &self.email {
            target.email = email.clone();
        }
        if let Some(phone) = self.phone {
            target.phone = phone;
        }
        if let Some(emergency) = self.emergency_phone {
            target.emergency_phone = Some(emergency);
        }
        if let Some(address) = &self.home_address {
            target.home_address = Some(address.clone());
        }
        if let Some(accepted) = self.accepted_terms {
            target.accepted_terms = accepted;
        }
        if let Some(tier) = &self.subscription_tier {
            target.subscription_tier = tier.clone();
        }
        if let Some(expiration) = self.subscription_expiration {
            target.subscription_expiration = Some(expiration);
        }
        if let Some(location) = self.last_known_location {
            target.last_known_location = Some(location);
        }
        if let Some(is_agent) = self.is_agent {
            target.is_agent = Some(is_agent);
        }
        if let Some(is_safe) = self.is_safe {
            target.is_safe = Some(is_safe);
        }
        if let Some(picture) = &self.profile_picture {
            target.profile_picture = Some(picture.clone());
        }
        if let Some(devices) = &self.device_ids {
            target.device_ids = Some(devices.clone());
        }
    }

    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        *self == SubscriberPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Subscriber {
        Subscriber {
            id: SubscriberId("sub-1".into()),
            name: "Ann".into(),
            email: "ann@example.com".into(),
            phone: 5550001111,
            emergency_phone: None,
            home_address: Some("12 North Rd".into()),
            accepted_terms: true,
            subscription_tier: "premium".into(),
            subscription_expiration: None,
            last_known_location: Some(GeoPoint {
                latitude: 51.5,
                longitude: -0.12,
            }),
            is_agent: Some(false),
            is_safe: None,
            profile_picture: None,
            device_ids: Some(vec!["dev-a".into()]),
            created_at: None,
        }
    }

    #[test]
    fn patch_changes_only_present_fields() {
        let mut record = sample();
        let patch = SubscriberPatch {
            phone: Some(5559998888),
            home_address: Some("3 South Ln".into()),
            ..Default::default()
        };
        patch.apply(&mut record);

        assert_eq!(record.phone, 5559998888);
        assert_eq!(record.home_address.as_deref(), Some("3 South Ln"));
        // Untouched fields are retained.
        assert_eq!(record.name, "Ann");
        assert_eq!(record.subscription_tier, "premium");
        assert_eq!(record.is_agent, Some(false));
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut record = sample();
        let before = record.clone();
        let patch = SubscriberPatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut record);
        assert_eq!(record, before);
    }

    #[test]
    fn draft_materializes_with_identity() {
        let draft = SubscriberDraft {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            phone: 5550002222,
            emergency_phone: Some(5550009999),
            home_address: None,
            accepted_terms: false,
            subscription_tier: "free".into(),
            subscription_expiration: None,
            last_known_location: None,
            is_agent: None,
            is_safe: None,
            profile_picture: None,
            device_ids: None,
        };
        let record = draft.into_subscriber(SubscriberId("sub-2".into()), None);
        assert_eq!(record.id, SubscriberId("sub-2".into()));
        assert_eq!(record.emergency_phone, Some(5550009999));
        assert!(record.created_at.is_none());
    }

    #[test]
    fn subscriber_round_trips_through_json() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: Subscriber = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
        // Absent optionals are omitted from the wire form entirely.
        assert!(!json.contains("emergency_phone"));
    }

    #[test]
    fn subscriber_tolerates_missing_optionals() {
        let json = r#"{
            "id": "sub-3",
            "name": "Cara",
            "email": "cara@example.com",
            "phone": 5550003333,
            "accepted_terms": false,
            "subscription_tier": "free"
        }"#;
        let parsed: Subscriber = serde_json::from_str(json).unwrap();
        assert!(parsed.last_known_location.is_none());
        assert!(parsed.device_ids.is_none());
        assert!(parsed.is_safe.is_none());
    }
}
