// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The selection workflow.
//!
//! Pure helpers between a loaded [`Snapshot`] and whichever frontend is
//! driving the menu: put the entries in display order, and resolve which
//! row should start out selected. Both frontends map the user's choice back
//! to an entry id through the same ordered list, so the picker and the
//! numbered prompt cannot disagree about what ordinal N means.

use crate::store::{BootEntry, CurrentSelection, DisplayOrder, Snapshot};

/// Returns the entries of a snapshot in display order.
///
/// [`DisplayOrder::TitleFolded`] sorts case-insensitively by display name
/// with a stable sort, so entries whose names differ only by case order
/// lexicographically ignoring case, and exact ties keep catalog order.
/// [`DisplayOrder::Declaration`] keeps the catalog untouched.
#[must_use = "Has no effect if the result is unused"]
pub fn ordered(snapshot: &Snapshot, order: DisplayOrder) -> Vec<BootEntry> {
    let mut entries = snapshot.entries.clone();
    if order == DisplayOrder::TitleFolded {
        entries.sort_by_key(|entry| entry.display_name.to_lowercase());
    }
    entries
}

/// Resolves the index of the currently active entry within a display list.
///
/// The temporary-next pointer wins over the ordered default; an unknown
/// selection, or an id no longer present in the catalog, yields [`None`]
/// rather than an error.
#[must_use = "Has no effect if the result is unused"]
pub fn current_index(entries: &[BootEntry], current: &CurrentSelection) -> Option<usize> {
    let id = current.id()?;
    entries.iter().position(|entry| entry.id == id)
}

/// Resolves the display name of the currently active entry, for the
/// "Current entry" line of either frontend.
#[must_use = "Has no effect if the result is unused"]
pub fn current_name<'a>(entries: &'a [BootEntry], current: &CurrentSelection) -> Option<&'a str> {
    current_index(entries, current).map(|i| &*entries[i].display_name)
}
