// SPDX-FileCopyrightText: 2026 Aegis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optimistic collection state management and view projection for the
//! Aegis console.
//!
//! [`Roster`] keeps the session's authoritative in-memory copy of the
//! subscriber collection in sync with the record store through optimistic
//! updates with exact rollback. [`projection`] derives the filtered,
//! sorted, selection-annotated table view as a pure function of that
//! snapshot.

mod journal;
pub mod projection;
pub mod roster;

pub use projection::{
    project, toggle_sort, ProjectedRecord, Selection, SortDirection, SortKey, SortState,
};
pub use roster::Roster;
