// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The store backed by GRUB's text configuration files.
//!
//! Example `grub.cfg` fragment:
//!
//! ```text
//! menuentry 'Ubuntu' --class ubuntu $menuentry_id_option 'gnulinux-simple' {
//!     ...
//! }
//! menuentry "Windows Boot Manager" {
//!     ...
//! }
//! ```
//!
//! The catalog is the list of `menuentry` declarations in order of
//! appearance, each identified by its 0-based ordinal (the form GRUB itself
//! accepts in `saved_entry`). The current default lives on the
//! `saved_entry=` line of the sibling `grubenv` file, and a commit rewrites
//! exactly that line while leaving every other byte of the file untouched.
//!
//! The line scan is deliberately permissive: declarations inside submenu or
//! conditional blocks are treated identically to top-level ones. That
//! mirrors how the file is actually consumed here and is a documented
//! fidelity limitation, not something to silently fix.

use std::{fs, path::PathBuf};

use crate::store::{
    BootEntry, CommitError, CurrentSelection, DisplayOrder, EntryStore, Snapshot, SourceError,
};

/// The file holding the menu-entry declarations.
const GRUB_CFG: &str = "grub.cfg";

/// The key=value environment file holding the default entry.
const GRUBENV: &str = "grubenv";

/// The mutable key of the environment file.
const SAVED_ENTRY: &str = "saved_entry";

/// The store for a GRUB configuration directory.
pub struct GrubStore {
    /// The directory containing `grub.cfg` and `grubenv`.
    dir: PathBuf,
}

impl GrubStore {
    /// Creates a new [`GrubStore`] rooted at a GRUB directory, usually
    /// `/boot/grub`.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The path of the menu configuration file.
    fn cfg_path(&self) -> PathBuf {
        self.dir.join(GRUB_CFG)
    }

    /// The path of the environment file.
    fn env_path(&self) -> PathBuf {
        self.dir.join(GRUBENV)
    }
}

impl EntryStore for GrubStore {
    fn load_catalog(&self) -> Result<Snapshot, SourceError> {
        let cfg = read(self.cfg_path())?;
        let env = read(self.env_path())?;

        let current = env
            .lines()
            .find_map(saved_entry_value) // only the first match counts
            .map_or(CurrentSelection::Unknown, |value| {
                CurrentSelection::Default(value.to_owned())
            });

        Ok(Snapshot {
            entries: parse_entries(&cfg),
            current,
        })
    }

    fn commit_default(&self, id: &str) -> Result<(), CommitError> {
        let path = self.env_path();
        let env = fs::read_to_string(&path).map_err(|source| CommitError::Write {
            path: path.clone(),
            source,
        })?;

        let Some(rewritten) = rewrite_saved_entry(&env, id) else {
            return Err(CommitError::MissingKey {
                path,
                key: SAVED_ENTRY,
            });
        };

        fs::write(&path, rewritten).map_err(|source| CommitError::Write { path, source })
    }

    fn display_order(&self) -> DisplayOrder {
        // menu position is meaningful to the user here, so no re-sorting
        DisplayOrder::Declaration
    }
}

/// Reads a whole backing file, wrapping failures with the offending path.
fn read(path: PathBuf) -> Result<String, SourceError> {
    fs::read_to_string(&path).map_err(|source| SourceError::Read { path, source })
}

/// Extracts every menu-entry declaration of a `grub.cfg`, in order of
/// appearance, assigning each its ordinal as the id.
#[must_use = "Has no effect if the result is unused"]
pub fn parse_entries(cfg: &str) -> Vec<BootEntry> {
    cfg.lines()
        .filter_map(menu_entry_title)
        .enumerate()
        .map(|(i, title)| BootEntry {
            id: i.to_string(),
            display_name: title.to_owned(),
        })
        .collect()
}

/// Extracts the quoted title of a line starting a menu-entry declaration.
///
/// The keyword must be anchored at line start, immediately followed by a
/// `'` or `"` quoted title. The title ends at the next quote of either
/// kind, matching the best-effort extraction this file has always had.
fn menu_entry_title(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("menuentry ")?;
    let title = rest.strip_prefix(['\'', '"'])?;
    let end = title.find(['\'', '"'])?;
    Some(&title[..end])
}

/// Extracts the value of a `saved_entry = value` line anchored at line
/// start. Spaces are tolerated before the `=` only; the value is taken
/// verbatim.
fn saved_entry_value(line: &str) -> Option<&str> {
    line.strip_prefix(SAVED_ENTRY)?
        .trim_start_matches(' ')
        .strip_prefix('=')
}

/// Rewrites every `saved_entry` line of an environment file to point at
/// `id`, preserving all other lines byte for byte. Returns [`None`] if no
/// line matched, in which case nothing must be written back.
fn rewrite_saved_entry(env: &str, id: &str) -> Option<String> {
    let mut out = String::with_capacity(env.len() + id.len());
    let mut found = false;

    for line in env.split_inclusive('\n') {
        let bare = line
            .strip_suffix('\n')
            .map_or(line, |bare| bare.strip_suffix('\r').unwrap_or(bare));
        if saved_entry_value(bare).is_some() {
            found = true;
            out.push_str(SAVED_ENTRY);
            out.push('=');
            out.push_str(id);
            out.push('\n');
        } else {
            out.push_str(line);
        }
    }

    found.then_some(out)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const CFG: &str = "\
#
# DO NOT EDIT THIS FILE
#
if [ -s $prefix/grubenv ]; then
  load_env
fi
menuentry \"Ubuntu\" --class ubuntu {
	linux /vmlinuz root=/dev/sda2
}
submenu 'Advanced options for Ubuntu' {
	menuentry 'Ubuntu, with Linux 6.8.0' {
		linux /vmlinuz-6.8.0
	}
}
menuentry 'Windows' {
	chainloader +1
}
";

    fn store_with(cfg: &str, env: &str) -> (tempfile::TempDir, GrubStore) {
        let dir = tempfile::tempdir().expect("Failed to create a temporary GRUB directory");
        fs::write(dir.path().join(GRUB_CFG), cfg).expect("Failed to write grub.cfg fixture");
        fs::write(dir.path().join(GRUBENV), env).expect("Failed to write grubenv fixture");
        let store = GrubStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_entries_in_file_order() {
        let entries = parse_entries(CFG);
        let names: Vec<&str> = entries.iter().map(|e| &*e.display_name).collect();
        // the indented nested declaration does not match at line start
        assert_eq!(names, ["Ubuntu", "Windows"]);
        assert_eq!(entries[0].id, "0");
        assert_eq!(entries[1].id, "1");
    }

    #[test]
    fn test_nested_entry_not_special_cased() {
        let cfg = "menuentry 'a' {\nmenuentry 'b' {\n"; // second line not indented
        assert_eq!(parse_entries(cfg).len(), 2);
    }

    #[test]
    fn test_title_must_follow_keyword_at_line_start() {
        assert_eq!(menu_entry_title("menuentry 'Ubuntu' {"), Some("Ubuntu"));
        assert_eq!(menu_entry_title("menuentry \"Windows\" {"), Some("Windows"));
        assert_eq!(menu_entry_title("  menuentry 'indented' {"), None);
        assert_eq!(menu_entry_title("menuentry unquoted {"), None);
        assert_eq!(menu_entry_title("#menuentry 'comment' {"), None);
    }

    #[test]
    fn test_title_ends_at_either_quote() {
        // the historical pattern stops at the first quote of either kind
        assert_eq!(menu_entry_title("menuentry \"it's here\" {"), Some("it"));
    }

    #[test]
    fn test_saved_entry_spacing() {
        assert_eq!(saved_entry_value("saved_entry=2"), Some("2"));
        assert_eq!(saved_entry_value("saved_entry =2"), Some("2"));
        assert_eq!(saved_entry_value("saved_entry"), None);
        assert_eq!(saved_entry_value("# saved_entry=2"), None);
    }

    #[test]
    fn test_load_reports_default() {
        let (_dir, store) = store_with(CFG, "# GRUB Environment Block\nsaved_entry=0\n");
        let snapshot = store.load_catalog().expect("Failed to load fixture store");
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.current, CurrentSelection::Default("0".to_owned()));
    }

    #[test]
    fn test_missing_saved_entry_is_unknown() {
        let (_dir, store) = store_with(CFG, "# GRUB Environment Block\n");
        let snapshot = store.load_catalog().expect("Failed to load fixture store");
        assert_eq!(snapshot.current, CurrentSelection::Unknown);
    }

    #[test]
    fn test_missing_cfg_is_fatal() {
        let dir = tempfile::tempdir().expect("Failed to create a temporary GRUB directory");
        let store = GrubStore::new(dir.path());
        assert!(matches!(
            store.load_catalog(),
            Err(SourceError::Read { .. })
        ));
    }

    #[test]
    fn test_commit_rewrites_only_the_saved_entry_line() {
        let cfg = "menuentry \"Ubuntu\" {\nmenuentry 'Windows' {\n";
        let env = "# GRUB Environment Block\nsaved_entry=0\nboot_success=1\n";
        let (dir, store) = store_with(cfg, env);

        store
            .commit_default("1")
            .expect("Failed to commit on fixture store");

        let written = fs::read_to_string(dir.path().join(GRUBENV))
            .expect("Failed to read back grubenv fixture");
        assert_eq!(
            written,
            "# GRUB Environment Block\nsaved_entry=1\nboot_success=1\n"
        );
    }

    #[test]
    fn test_commit_then_load_round_trip() {
        let (_dir, store) = store_with(CFG, "saved_entry=0\n");
        store
            .commit_default("1")
            .expect("Failed to commit on fixture store");
        let snapshot = store.load_catalog().expect("Failed to load fixture store");
        assert_eq!(snapshot.current, CurrentSelection::Default("1".to_owned()));
    }

    #[test]
    fn test_commit_is_idempotent() {
        let (dir, store) = store_with(CFG, "saved_entry=0\nboot_success=1\n");
        store
            .commit_default("1")
            .expect("Failed to commit on fixture store");
        let once = fs::read_to_string(dir.path().join(GRUBENV))
            .expect("Failed to read back grubenv fixture");
        store
            .commit_default("1")
            .expect("Failed to commit on fixture store");
        let twice = fs::read_to_string(dir.path().join(GRUBENV))
            .expect("Failed to read back grubenv fixture");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_commit_without_key_fails() {
        let (_dir, store) = store_with(CFG, "boot_success=1\n");
        assert!(matches!(
            store.commit_default("1"),
            Err(CommitError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_env_is_written_through_the_store_only() {
        // a write failure must abort the commit, nothing else is touched
        let (dir, store) = store_with(CFG, "saved_entry=0\n");
        let cfg_before = fs::read_to_string(dir.path().join(GRUB_CFG))
            .expect("Failed to read back grub.cfg fixture");
        store
            .commit_default("1")
            .expect("Failed to commit on fixture store");
        let cfg_after = fs::read_to_string(dir.path().join(GRUB_CFG))
            .expect("Failed to read back grub.cfg fixture");
        assert_eq!(cfg_before, cfg_after);
    }

    #[test]
    fn test_crlf_lines_survive_a_commit() {
        let (dir, store) = store_with(CFG, "# header\r\nsaved_entry=0\r\nboot_success=1\r\n");
        store
            .commit_default("1")
            .expect("Failed to commit on fixture store");
        let written = fs::read_to_string(dir.path().join(GRUBENV))
            .expect("Failed to read back grubenv fixture");
        // untouched lines keep their terminators, the rewritten one is LF
        assert_eq!(written, "# header\r\nsaved_entry=1\nboot_success=1\r\n");
    }

    proptest! {
        #[test]
        fn doesnt_panic(cfg in any::<String>(), env in any::<String>()) {
            let _ = parse_entries(&cfg);
            let _ = env.lines().find_map(saved_entry_value);
            let _ = rewrite_saved_entry(&env, "0");
        }

        #[test]
        fn count_equals_declaration_lines(titles in prop::collection::vec("[^'\"\r\n]*", 0..8)) {
            let cfg: String = titles
                .iter()
                .map(|t| format!("menuentry '{t}' {{\n}}\n"))
                .collect();
            let entries = parse_entries(&cfg);
            prop_assert_eq!(entries.len(), titles.len());
            for (entry, title) in entries.iter().zip(&titles) {
                prop_assert_eq!(&entry.display_name, title);
            }
        }
    }
}
