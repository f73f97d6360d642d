// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The store backed by the Windows boot configuration registry hive.
//!
//! The BCD is mounted by Windows under `HKLM\BCD00000000`. Every boot
//! object is a GUID-named subkey of `Objects`; the ones relevant to
//! firmware boot carry one of two type codes in `Description\Type`, and
//! their display name lives in the `12000004` (description) element. The
//! firmware boot manager object additionally carries the `24000001`
//! (displayorder) and `24000002` (bootsequence) pointer elements, either of
//! which may be absent.
//!
//! The hive is only ever read. The commit goes through `bcdedit`, which
//! owns the write path, and nothing but its exit status is checked.

use std::{io, process::Command};

use log::warn;
use winreg::{RegKey, enums::HKEY_LOCAL_MACHINE};

use crate::store::{
    BootEntry, CommitError, CurrentSelection, DisplayOrder, EntryStore, Snapshot, SourceError,
};

/// The enumerable container of boot objects.
const OBJECTS_KEY: &str = r"BCD00000000\Objects";

/// The well-known GUID of the `{fwbootmgr}` object.
const FWBOOTMGR: &str = "{a5a30fa2-3d06-4e9f-b5f4-a01df9d1fcba}";

/// The element holding an object's display name.
const DESCRIPTION_ELEMENT: &str = "12000004";

/// The element holding the ordered default (`displayorder`).
const DISPLAYORDER_ELEMENT: &str = "24000001";

/// The element holding the one-shot override (`bootsequence`).
const BOOTSEQUENCE_ELEMENT: &str = "24000002";

/// The utility owning the write path.
const BCDEDIT: &str = "bcdedit";

/// The store for the Windows BCD registry hive.
#[derive(Default)]
pub struct BcdStore;

impl BcdStore {
    /// Creates a new [`BcdStore`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn new() -> Self {
        Self
    }
}

impl EntryStore for BcdStore {
    fn load_catalog(&self) -> Result<Snapshot, SourceError> {
        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let objects = open_required(&hklm, OBJECTS_KEY)?;

        let mut entries = Vec::new();
        for id in objects.enum_keys().filter_map(Result::ok) {
            match firmware_entry(&objects, &id) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => (),
                Err(e) => warn!("skipping boot object {id}: {e}"),
            }
        }

        let fwbootmgr = open_required(&objects, FWBOOTMGR)?;
        let next = pointer_element(&fwbootmgr, BOOTSEQUENCE_ELEMENT);
        let default = pointer_element(&fwbootmgr, DISPLAYORDER_ELEMENT);

        Ok(Snapshot {
            entries,
            current: CurrentSelection::from_pointers(next, default),
        })
    }

    fn commit_default(&self, id: &str) -> Result<(), CommitError> {
        let status = Command::new(BCDEDIT)
            .args(["/set", "{fwbootmgr}", "bootsequence", id])
            .status()
            .map_err(|source| CommitError::Spawn {
                command: BCDEDIT,
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(CommitError::Command {
                command: BCDEDIT,
                status,
            })
        }
    }

    fn display_order(&self) -> DisplayOrder {
        DisplayOrder::TitleFolded
    }
}

/// Checks whether a boot object's type code marks it as firmware-bootable.
///
/// `0x1010_0002` is `{bootmgr}` (the Windows Boot Manager) and
/// `0x101f_ffff` covers the generic firmware entries.
const fn is_firmware_type(object_type: u32) -> bool {
    matches!(object_type, 0x1010_0002 | 0x101f_ffff)
}

/// Opens a subkey that the load cannot proceed without.
fn open_required(parent: &RegKey, key: &str) -> Result<RegKey, SourceError> {
    parent
        .open_subkey(key)
        .map_err(|source| SourceError::Registry {
            key: key.to_owned(),
            source,
        })
}

/// Reads one boot object, returning its entry if it is firmware-bootable.
fn firmware_entry(objects: &RegKey, id: &str) -> Result<Option<BootEntry>, io::Error> {
    let object_type: u32 = objects
        .open_subkey(format!(r"{id}\Description"))?
        .get_value("Type")?;
    if !is_firmware_type(object_type) {
        return Ok(None);
    }

    let display_name: String = objects
        .open_subkey(format!(r"{id}\Elements\{DESCRIPTION_ELEMENT}"))?
        .get_value("Element")?;

    Ok(Some(BootEntry {
        id: id.to_owned(),
        display_name,
    }))
}

/// Reads the first id of an optional pointer element of the `{fwbootmgr}`
/// object. Absence (of the key, the value, or any list content) means
/// "no value", never an error.
fn pointer_element(fwbootmgr: &RegKey, element: &str) -> Option<String> {
    let ids: Vec<String> = fwbootmgr
        .open_subkey(format!(r"Elements\{element}"))
        .ok()?
        .get_value("Element")
        .ok()?;
    ids.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firmware_type_codes() {
        assert!(is_firmware_type(0x1010_0002));
        assert!(is_firmware_type(0x101f_ffff));
        assert!(!is_firmware_type(0x1020_0003)); // a Windows OS loader object
    }
}
