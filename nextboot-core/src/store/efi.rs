// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The store backed by the `efibootmgr` utility.
//!
//! Example output:
//!
//! ```text
//! BootCurrent: 0001
//! Timeout: 1 seconds
//! BootOrder: 0001,0002
//! BootNext: 0002
//! Boot0001* Windows Boot Manager	HD(1,GPT,...)
//! Boot0002* Ubuntu	HD(1,GPT,...)
//! ```
//!
//! Entry lines carry the id as uppercase hex inside the fixed `Boot####*`
//! prefix (the asterisk marks the entry as enabled and is otherwise
//! ignored), then the display name up to the tab. `BootOrder` gives the
//! ordered default as the first element of its comma list, and `BootNext`
//! gives the one-shot override. Committing runs `efibootmgr -q -n <id>` and
//! trusts nothing but its exit status.

use std::process::Command;

use crate::store::{
    BootEntry, CommitError, CurrentSelection, DisplayOrder, EntryStore, Snapshot, SourceError,
};

/// The utility this store shells out to.
pub(crate) const EFIBOOTMGR: &str = "efibootmgr";

/// The store for UEFI boot variables, by way of `efibootmgr`.
#[derive(Default)]
pub struct EfiStore;

impl EfiStore {
    /// Creates a new [`EfiStore`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn new() -> Self {
        Self
    }
}

impl EntryStore for EfiStore {
    fn load_catalog(&self) -> Result<Snapshot, SourceError> {
        let output = Command::new(EFIBOOTMGR)
            .output()
            .map_err(|source| SourceError::Spawn {
                command: EFIBOOTMGR,
                source,
            })?;

        if !output.status.success() {
            return Err(SourceError::Command {
                command: EFIBOOTMGR,
                status: output.status,
            });
        }

        Ok(parse_listing(&String::from_utf8_lossy(&output.stdout)))
    }

    fn commit_default(&self, id: &str) -> Result<(), CommitError> {
        let status = Command::new(EFIBOOTMGR)
            .args(["-q", "-n", id])
            .status()
            .map_err(|source| CommitError::Spawn {
                command: EFIBOOTMGR,
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommitError::Command {
                command: EFIBOOTMGR,
                status,
            })
        }
    }

    fn display_order(&self) -> DisplayOrder {
        DisplayOrder::TitleFolded
    }
}

/// Parses the full `efibootmgr` listing into a [`Snapshot`].
#[must_use = "Has no effect if the result is unused"]
pub fn parse_listing(output: &str) -> Snapshot {
    let mut entries = Vec::new();
    let mut next = None;
    let mut default = None;

    for line in output.lines() {
        if let Some((id, name)) = entry_line(line) {
            entries.push(BootEntry {
                id,
                display_name: name,
            });
        } else if let Some(order) = line.strip_prefix("BootOrder:") {
            default = order
                .trim_start()
                .split(',')
                .next()
                .filter(|id| !id.is_empty())
                .map(str::to_owned);
        } else if let Some(id) = line.strip_prefix("BootNext:") {
            next = Some(id.trim_start().to_owned());
        }
    }

    Snapshot {
        entries,
        current: CurrentSelection::from_pointers(next, default),
    }
}

/// Parses one `Boot<HEX>* Name<TAB>...` entry line into its id and display
/// name. Lines not matching the fixed shape (including disabled entries
/// without the asterisk) yield [`None`].
fn entry_line(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("Boot")?;
    let star = rest.find('*')?;
    let id = &rest[..star];
    if id.is_empty() || !id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F')) {
        return None;
    }

    let name = rest[star + 1..].strip_prefix(' ')?.trim_start_matches(' ');
    let tab = name.rfind('\t')?;
    Some((id.to_owned(), name[..tab].to_owned()))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const LISTING: &str = "BootCurrent: 0001\n\
        Timeout: 1 seconds\n\
        BootOrder: 0001,0002\n\
        BootNext: 0002\n\
        Boot0001* Windows Boot Manager\tHD(1,GPT,aabbccdd)\n\
        Boot0002* Ubuntu\tHD(1,GPT,aabbccdd)\n";

    #[test]
    fn test_next_takes_priority_over_order() {
        let snapshot = parse_listing(LISTING);
        assert_eq!(snapshot.current, CurrentSelection::Next("0002".to_owned()));
    }

    #[test]
    fn test_order_alone_gives_default() {
        let listing = "BootOrder: 0003,0001\nBoot0003* Fedora\tHD(2,GPT,x)\n";
        let snapshot = parse_listing(listing);
        assert_eq!(
            snapshot.current,
            CurrentSelection::Default("0003".to_owned())
        );
    }

    #[test]
    fn test_no_pointers_is_unknown() {
        let snapshot = parse_listing("Boot0001* Windows\tHD(1,GPT,x)\n");
        assert_eq!(snapshot.current, CurrentSelection::Unknown);
    }

    #[test]
    fn test_entry_ids_and_names() {
        let snapshot = parse_listing(LISTING);
        let pairs: Vec<(&str, &str)> = snapshot
            .entries
            .iter()
            .map(|e| (&*e.id, &*e.display_name))
            .collect();
        assert_eq!(
            pairs,
            [("0001", "Windows Boot Manager"), ("0002", "Ubuntu")]
        );
    }

    #[test]
    fn test_disabled_entries_are_skipped() {
        // no asterisk means the fixed line shape does not match
        let snapshot = parse_listing("Boot0004  Recovery\tHD(1,GPT,x)\n");
        assert!(snapshot.entries.is_empty());
    }

    #[test]
    fn test_id_must_be_uppercase_hex() {
        assert!(entry_line("Boot000a* lower\tx").is_none());
        assert!(entry_line("Bootzzzz* junk\tx").is_none());
        assert_eq!(
            entry_line("Boot001F* ok\tx"),
            Some(("001F".to_owned(), "ok".to_owned()))
        );
    }

    #[test]
    fn test_name_runs_to_the_last_tab() {
        assert_eq!(
            entry_line("Boot0001* Windows Boot Manager\tHD(1)\textra"),
            Some(("0001".to_owned(), "Windows Boot Manager\tHD(1)".to_owned()))
        );
    }

    #[test]
    fn test_line_without_tab_is_skipped() {
        assert!(entry_line("Boot0001* Windows without payload").is_none());
    }

    proptest! {
        #[test]
        fn doesnt_panic(output in any::<String>()) {
            let _ = parse_listing(&output);
        }
    }
}
