// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscriber CRUD operations.
//!
//! Timestamps are stored as RFC 3339 TEXT, `device_ids` as a JSON array in a
//! TEXT column, and `last_known_location` split into latitude/longitude REAL
//! columns.

use aegis_core::{AegisError, GeoPoint, Subscriber, SubscriberId, SubscriberPatch};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::database::{map_tr_err, Database};

const COLUMNS: &str = "id, name, email, phone, emergency_phone, home_address, accepted_terms, \
     subscription_tier, subscription_expiration, latitude, longitude, is_agent, is_safe, \
     profile_picture, device_ids, created_at";

fn parse_timestamp(idx: usize, raw: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_subscriber(row: &Row<'_>) -> Result<Subscriber, rusqlite::Error> {
    let expiration = row
        .get::<_, Option<String>>(8)?
        .map(|raw| parse_timestamp(8, raw))
        .transpose()?;
    let latitude: Option<f64> = row.get(9)?;
    let longitude: Option<f64> = row.get(10)?;
    let device_ids = row
        .get::<_, Option<String>>(14)?
        .map(|raw| {
            serde_json::from_str::<Vec<String>>(&raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    14,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .transpose()?;
    let created_at = parse_timestamp(15, row.get::<_, String>(15)?)?;

    Ok(Subscriber {
        id: SubscriberId(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        emergency_phone: row.get(4)?,
        home_address: row.get(5)?,
        accepted_terms: row.get(6)?,
        subscription_tier: row.get(7)?,
        subscription_expiration: expiration,
        last_known_location: match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        },
        is_agent: row.get(11)?,
        is_safe: row.get(12)?,
        profile_picture: row.get(13)?,
        device_ids,
        created_at: Some(created_at),
    })
}

fn device_ids_json(record: &Subscriber) -> Result<Option<String>, tokio_rusqlite::Error> {
    record
        .device_ids
        .as_ref()
        .map(|ids| serde_json::to_string(ids))
        .transpose()
        .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}

/// List all subscribers, newest first.
pub async fn list_subscribers(db: &Database) -> Result<Vec<Subscriber>, AegisError> {
    db.connection()
        .call(move |conn| -> Result<Vec<Subscriber>, tokio_rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM subscribers ORDER BY created_at DESC, id"
            ))?;
            let rows = stmt.query_map([], row_to_subscriber)?;
            let mut subscribers = Vec::new();
            for row in rows {
                subscribers.push(row?);
            }
            Ok(subscribers)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a subscriber by id.
pub async fn get_subscriber(
    db: &Database,
    id: &SubscriberId,
) -> Result<Option<Subscriber>, AegisError> {
    let id = id.0.clone();
    db.connection()
        .call(
            move |conn| -> Result<Option<Subscriber>, tokio_rusqlite::Error> {
                let mut stmt =
                    conn.prepare(&format!("SELECT {COLUMNS} FROM subscribers WHERE id = ?1"))?;
                let result = stmt.query_row(params![id], row_to_subscriber);
                match result {
                    Ok(subscriber) => Ok(Some(subscriber)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            },
        )
        .await
        .map_err(map_tr_err)
}

/// Insert a fully materialized subscriber row.
pub async fn insert_subscriber(db: &Database, record: &Subscriber) -> Result<(), AegisError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| -> Result<(), tokio_rusqlite::Error> {
            let device_ids = device_ids_json(&record)?;
            conn.execute(
                "INSERT INTO subscribers (id, name, email, phone, emergency_phone, home_address, \
                 accepted_terms, subscription_tier, subscription_expiration, latitude, longitude, \
                 is_agent, is_safe, profile_picture, device_ids, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    record.id.0,
                    record.name,
                    record.email,
                    record.phone,
                    record.emergency_phone,
                    record.home_address,
                    record.accepted_terms,
                    record.subscription_tier,
                    record.subscription_expiration.map(|dt| dt.to_rfc3339()),
                    record.last_known_location.map(|p| p.latitude),
                    record.last_known_location.map(|p| p.longitude),
                    record.is_agent,
                    record.is_safe,
                    record.profile_picture,
                    device_ids,
                    record.created_at.unwrap_or_else(Utc::now).to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update to a subscriber row.
///
/// Read-merge-write inside one transaction so the merge is atomic with
/// respect to other store calls. Returns the stored record after the merge,
/// or `None` when the id is unknown.
pub async fn update_subscriber(
    db: &Database,
    id: &SubscriberId,
    patch: &SubscriberPatch,
) -> Result<Option<Subscriber>, AegisError> {
    let id = id.0.clone();
    let patch = patch.clone();
    db.connection()
        .call(
            move |conn| -> Result<Option<Subscriber>, tokio_rusqlite::Error> {
                let tx = conn.transaction()?;

                let existing = {
                    let mut stmt =
                        tx.prepare(&format!("SELECT {COLUMNS} FROM subscribers WHERE id = ?1"))?;
                    match stmt.query_row(params![id], row_to_subscriber) {
                        Ok(subscriber) => Some(subscriber),
                        Err(rusqlite::Error::QueryReturnedNoRows) => None,
                        Err(e) => return Err(e.into()),
                    }
                };

                let Some(mut record) = existing else {
                    return Ok(None);
                };
                patch.apply(&mut record);

                let device_ids = device_ids_json(&record)?;
                tx.execute(
                    "UPDATE subscribers SET name = ?2, email = ?3, phone = ?4, \
                     emergency_phone = ?5, home_address = ?6, accepted_terms = ?7, \
                     subscription_tier = ?8, subscription_expiration = ?9, latitude = ?10, \
                     longitude = ?11, is_agent = ?12, is_safe = ?13, profile_picture = ?14, \
                     device_ids = ?15 WHERE id = ?1",
                    params![
                        record.id.0,
                        record.name,
                        record.email,
                        record.phone,
                        record.emergency_phone,
                        record.home_address,
                        record.accepted_terms,
                        record.subscription_tier,
                        record.subscription_expiration.map(|dt| dt.to_rfc3339()),
                        record.last_known_location.map(|p| p.latitude),
                        record.last_known_location.map(|p| p.longitude),
                        record.is_agent,
                        record.is_safe,
                        record.profile_picture,
                        device_ids,
                    ],
                )?;
                tx.commit()?;
                Ok(Some(record))
            },
        )
        .await
        .map_err(map_tr_err)
}

/// Delete a subscriber row. Returns `false` when the id is unknown.
pub async fn delete_subscriber(db: &Database, id: &SubscriberId) -> Result<bool, AegisError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| -> Result<bool, tokio_rusqlite::Error> {
            let affected = conn.execute("DELETE FROM subscribers WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
        .map_err(map_tr_err)
}
