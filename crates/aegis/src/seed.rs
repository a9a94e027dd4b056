// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aegis seed` command implementation.
//!
//! Inserts demo subscriber records directly into the store. This replaces
//! the old habit of substituting canned data when a list call fails: demo
//! data exists only when explicitly asked for.

use aegis_config::model::AegisConfig;
use aegis_core::{AegisError, GeoPoint, SubscriberDraft};
use aegis_storage::SubscriberStore;

struct DemoPerson {
    name: &'static str,
    email: &'static str,
    phone: i64,
    address: &'static str,
    tier: &'static str,
    location: Option<GeoPoint>,
    is_agent: bool,
}

const DEMO_PEOPLE: [DemoPerson; 8] = [
    DemoPerson {
        name: "Maya Ellison",
        email: "maya.ellison@example.com",
        phone: 4475550101,
        address: "14 Harbor Way, Brighton",
        tier: "premium",
        location: Some(GeoPoint {
            latitude: 50.8225,
            longitude: -0.1372,
        }),
        is_agent: false,
    },
    DemoPerson {
        name: "Tomas Riva",
        email: "tomas.riva@example.com",
        phone: 4475550102,
        address: "3 Quarry Lane, Leeds",
        tier: "free",
        location: None,
        is_agent: false,
    },
    DemoPerson {
        name: "Priya Nair",
        email: "priya.nair@example.com",
        phone: 4475550103,
        address: "88 Mill Road, Cambridge",
        tier: "premium",
        location: Some(GeoPoint {
            latitude: 52.2053,
            longitude: 0.1218,
        }),
        is_agent: true,
    },
    DemoPerson {
        name: "Jonas Werner",
        email: "jonas.werner@example.com",
        phone: 4475550104,
        address: "21 Castle View, Edinburgh",
        tier: "family",
        location: None,
        is_agent: false,
    },
    DemoPerson {
        name: "Aisha Balogun",
        email: "aisha.balogun@example.com",
        phone: 4475550105,
        address: "5 Riverside Walk, Bristol",
        tier: "free",
        location: Some(GeoPoint {
            latitude: 51.4545,
            longitude: -2.5879,
        }),
        is_agent: false,
    },
    DemoPerson {
        name: "Ruth Calder",
        email: "ruth.calder@example.com",
        phone: 4475550106,
        address: "40 Station Road, York",
        tier: "premium",
        location: None,
        is_agent: true,
    },
    DemoPerson {
        name: "Leo Marchetti",
        email: "leo.marchetti@example.com",
        phone: 4475550107,
        address: "12 Orchard Close, Oxford",
        tier: "free",
        location: None,
        is_agent: false,
    },
    DemoPerson {
        name: "Hana Suzuki",
        email: "hana.suzuki@example.com",
        phone: 4475550108,
        address: "7 Dockside Court, Liverpool",
        tier: "family",
        location: Some(GeoPoint {
            latitude: 53.4084,
            longitude: -2.9916,
        }),
        is_agent: false,
    },
];

fn demo_draft(index: usize) -> SubscriberDraft {
    let person = &DEMO_PEOPLE[index % DEMO_PEOPLE.len()];
    let round = index / DEMO_PEOPLE.len();
    // Past the first round, suffix identities so emails stay distinct.
    let (name, email) = if round == 0 {
        (person.name.to_string(), person.email.to_string())
    } else {
        (
            format!("{} {}", person.name, round + 1),
            person.email.replacen('@', &format!("+{}@", round + 1), 1),
        )
    };

    SubscriberDraft {
        name,
        email,
        phone: person.phone + (round as i64) * 1000,
        emergency_phone: person.is_agent.then_some(4475550999),
        home_address: Some(person.address.to_string()),
        accepted_terms: true,
        subscription_tier: person.tier.to_string(),
        subscription_expiration: None,
        last_known_location: person.location,
        is_agent: Some(person.is_agent),
        is_safe: person.location.map(|_| true),
        profile_picture: None,
        device_ids: Some(vec![format!("device-{:03}", index + 1)]),
    }
}

/// Run the `aegis seed` command.
pub async fn run_seed(config: &AegisConfig, count: usize) -> Result<(), AegisError> {
    let store = SubscriberStore::open(&config.storage).await?;

    for index in 0..count {
        let record = store.create(&demo_draft(index)).await?;
        println!("seeded {} ({})", record.name, record.id);
    }

    store.close().await?;
    println!(
        "seeded {count} subscriber record{} into {}",
        if count == 1 { "" } else { "s" },
        config.storage.database_path
    );
    Ok(())
}
