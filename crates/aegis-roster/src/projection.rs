// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The view projection: a pure function from (records, query, sort,
//! selection) to the ordered, annotated rows a table surface renders.
//!
//! No hidden state: sort and selection are plain values owned by the
//! caller, so the projection can be exercised independently of the roster.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use strum::{Display, EnumString};

use aegis_core::{Subscriber, SubscriberId};

/// Sortable columns. Sorting semantics follow the field type: numeric
/// fields compare numerically, timestamp fields by instant, everything
/// else as case-sensitive lexicographic strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SortKey {
    Name,
    Email,
    Phone,
    EmergencyPhone,
    HomeAddress,
    SubscriptionTier,
    SubscriptionExpiration,
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort: a key and a direction. `None` at the call site means
/// "unsorted" -- rows keep the collection's own order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Advance the sort state for a header click on `key`.
///
/// Clicking the active key cycles ascending -> descending -> unsorted;
/// clicking a different key starts ascending on it.
pub fn toggle_sort(current: Option<SortState>, key: SortKey) -> Option<SortState> {
    match current {
        Some(state) if state.key == key => match state.direction {
            SortDirection::Ascending => Some(SortState {
                key,
                direction: SortDirection::Descending,
            }),
            SortDirection::Descending => None,
        },
        _ => Some(SortState {
            key,
            direction: SortDirection::Ascending,
        }),
    }
}

/// The set of selected record ids.
///
/// Owned by the presentation layer and passed into [`project`]; the roster
/// never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<SubscriberId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flip one record's membership.
    pub fn toggle(&mut self, id: SubscriberId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Drop a record from the selection (after a delete, for instance).
    pub fn remove(&mut self, id: &SubscriberId) {
        self.ids.remove(id);
    }

    /// Toggle every currently-projected record atomically: all-on if not
    /// all of them were on, else all-off. Ids outside `projected` are left
    /// alone.
    pub fn toggle_all<'a, I>(&mut self, projected: I)
    where
        I: IntoIterator<Item = &'a SubscriberId>,
    {
        let projected: Vec<&SubscriberId> = projected.into_iter().collect();
        let all_on = !projected.is_empty() && projected.iter().all(|id| self.ids.contains(id));
        if all_on {
            for id in projected {
                self.ids.remove(id);
            }
        } else {
            for id in projected {
                self.ids.insert(id.clone());
            }
        }
    }

    /// The selected ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &SubscriberId> {
        self.ids.iter()
    }
}

/// One projected row: the record plus its selection flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRecord {
    pub record: Subscriber,
    pub selected: bool,
}

/// Compute the table view: filter by `query`, sort by `sort`, annotate
/// from `selection`. Pure -- the input collection is untouched.
pub fn project(
    records: &[Subscriber],
    query: &str,
    sort: Option<SortState>,
    selection: &Selection,
) -> Vec<ProjectedRecord> {
    let needle = query.trim().to_lowercase();
    let mut rows: Vec<&Subscriber> = records
        .iter()
        .filter(|record| needle.is_empty() || matches_query(record, &needle))
        .collect();

    if let Some(state) = sort {
        // Vec::sort_by is stable, so tied rows keep their relative order.
        rows.sort_by(|a, b| compare(a, b, state));
    }

    rows.into_iter()
        .map(|record| ProjectedRecord {
            selected: selection.contains(&record.id),
            record: record.clone(),
        })
        .collect()
}

/// Case-insensitive substring match over the searchable fields. Absent
/// fields behave as empty strings and never match a non-empty needle.
fn matches_query(record: &Subscriber, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.email.to_lowercase().contains(needle)
        || record.phone.to_string().contains(needle)
        || record
            .home_address
            .as_deref()
            .is_some_and(|address| address.to_lowercase().contains(needle))
        || record.subscription_tier.to_lowercase().contains(needle)
}

/// The comparable value a record exposes for a sort key.
enum SortValue<'a> {
    Number(i64),
    Instant(DateTime<Utc>),
    Text(&'a str),
}

fn sort_value<'a>(record: &'a Subscriber, key: SortKey) -> Option<SortValue<'a>> {
    match key {
        SortKey::Name => Some(SortValue::Text(&record.name)),
        SortKey::Email => Some(SortValue::Text(&record.email)),
        SortKey::Phone => Some(SortValue::Number(record.phone)),
        SortKey::EmergencyPhone => record.emergency_phone.map(SortValue::Number),
        SortKey::HomeAddress => record.home_address.as_deref().map(SortValue::Text),
        SortKey::SubscriptionTier => Some(SortValue::Text(&record.subscription_tier)),
        SortKey::SubscriptionExpiration => {
            record.subscription_expiration.map(SortValue::Instant)
        }
        SortKey::CreatedAt => record.created_at.map(SortValue::Instant),
    }
}

fn compare(a: &Subscriber, b: &Subscriber, state: SortState) -> Ordering {
    match (sort_value(a, state.key), sort_value(b, state.key)) {
        // Records without a value sort after all valued records, in both
        // directions.
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ordering = match (x, y) {
                (SortValue::Number(x), SortValue::Number(y)) => x.cmp(&y),
                (SortValue::Instant(x), SortValue::Instant(y)) => x.cmp(&y),
                (SortValue::Text(x), SortValue::Text(y)) => x.cmp(y),
                // A key always yields one value shape; mixed pairs cannot
                // occur.
                _ => Ordering::Equal,
            };
            match state.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}
