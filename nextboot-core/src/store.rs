// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The boot-entry stores.
//!
//! A store reads a boot-entry catalog from one backing source (a GRUB
//! configuration directory, the Windows boot configuration registry hive, or
//! the `efibootmgr` utility) and exposes a uniform list of entries plus the
//! currently active one. The only mutation a store ever performs is moving
//! the "boot next/default" pointer; entries are never created or deleted.
//!
//! The currently supported backing sources are as follows:
//! - GRUB `grub.cfg` + `grubenv` files
//! - The Windows BCD registry hive (committed through `bcdedit`)
//! - `efibootmgr` line-oriented output

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// The GRUB text-config store.
pub mod grub;

/// The `efibootmgr` external-command store.
pub mod efi;

/// The Windows BCD registry store.
#[cfg(windows)]
pub mod bcd;

/// Errors indicating that a catalog could not be loaded.
///
/// Any of these is fatal to the whole run and is never retried.
#[derive(Error, Debug)]
pub enum SourceError {
    /// A backing file could not be read.
    #[error("cannot read \"{path}\": {source}")]
    Read {
        /// The path of the file that could not be read.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// An external utility could not be executed at all.
    #[error("cannot run \"{command}\": {source}")]
    Spawn {
        /// The name of the utility.
        command: &'static str,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// An external utility ran, but reported failure.
    #[error("\"{command}\" failed: {status}")]
    Command {
        /// The name of the utility.
        command: &'static str,

        /// The exit status of the utility.
        status: ExitStatus,
    },

    /// A registry key required for enumerating boot objects was unreadable.
    #[cfg(windows)]
    #[error("cannot read registry key \"{key}\": {source}")]
    Registry {
        /// The path of the registry key.
        key: String,

        /// The underlying I/O error.
        source: io::Error,
    },
}

/// Errors indicating that a new default entry could not be committed.
///
/// A commit failure aborts the commit, but not the run: the caller surfaces
/// it to the user and still proceeds to the reboot prompt.
#[derive(Error, Debug)]
pub enum CommitError {
    /// The environment file could not be read back or rewritten.
    #[error("cannot write the new default entry to \"{path}\": {source}")]
    Write {
        /// The path of the file that could not be rewritten.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// The environment file had no line holding the default-entry key.
    #[error("\"{path}\" has no {key} line to rewrite")]
    MissingKey {
        /// The path of the environment file.
        path: PathBuf,

        /// The key that was expected on some line.
        key: &'static str,
    },

    /// The boot-configuration utility could not be executed at all.
    #[error("cannot run \"{command}\": {source}")]
    Spawn {
        /// The name of the utility.
        command: &'static str,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// The boot-configuration utility ran, but reported failure.
    #[error("\"{command}\" failed: {status}")]
    Command {
        /// The name of the utility.
        command: &'static str,

        /// The exit status of the utility.
        status: ExitStatus,
    },
}

/// One selectable boot target known to the backing boot manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootEntry {
    /// The store-native identifier of the entry.
    ///
    /// A declaration ordinal for GRUB, an object GUID for the BCD, or a
    /// `Boot####` hex code for `efibootmgr`. Unique within one snapshot.
    pub id: String,

    /// The human-readable name, used for sorting and display only.
    pub display_name: String,
}

/// The entry the boot manager would use on the following boot.
///
/// This is a derived, read-only snapshot computed from the same load pass
/// that built the catalog. A one-shot `Next` override takes priority over
/// the ordered `Default`, and an absent pointer is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurrentSelection {
    /// A temporary-next override is set and will be consumed on the
    /// following boot only.
    Next(String),

    /// No override is set; this is the ordered/default entry.
    Default(String),

    /// Neither pointer could be determined.
    Unknown,
}

impl CurrentSelection {
    /// Builds a selection from the two optional pointers of a store,
    /// preferring the temporary-next one.
    #[must_use = "Has no effect if the result is unused"]
    pub fn from_pointers(next: Option<String>, default: Option<String>) -> Self {
        match (next, default) {
            (Some(id), _) => Self::Next(id),
            (None, Some(id)) => Self::Default(id),
            (None, None) => Self::Unknown,
        }
    }

    /// Returns the id this selection resolves to, if any.
    #[must_use = "Has no effect if the result is unused"]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Next(id) | Self::Default(id) => Some(id),
            Self::Unknown => None,
        }
    }
}

/// One load pass over a backing source: the ordered entry catalog plus the
/// current selection, immutable for the rest of the run.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// The entries in backend-native order.
    pub entries: Vec<BootEntry>,

    /// The currently active entry, as far as it could be determined.
    pub current: CurrentSelection,
}

impl Snapshot {
    /// Looks up an entry of the catalog by its id.
    #[must_use = "Has no effect if the result is unused"]
    pub fn get(&self, id: &str) -> Option<&BootEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

/// How a frontend should order the entries of a store for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayOrder {
    /// Keep the on-disk declaration order. GRUB menu position is meaningful
    /// to the user, so the text-config store must not be re-sorted.
    Declaration,

    /// Sort case-insensitively by display name, keeping catalog order for
    /// ties.
    TitleFolded,
}

/// The capability contract every store implements.
///
/// Frontends only ever talk to this trait, so none of the selection logic
/// branches on the host platform.
pub trait EntryStore {
    /// Reads the backing source into a fresh [`Snapshot`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the backing file or command cannot be read
    /// or executed. This is fatal to the run.
    fn load_catalog(&self) -> Result<Snapshot, SourceError>;

    /// Makes `id` the next/default boot target.
    ///
    /// The id must come from the snapshot that was shown to the user.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the environment file cannot be rewritten or
    /// the boot-configuration utility exits with a failure status.
    fn commit_default(&self, id: &str) -> Result<(), CommitError>;

    /// The display-ordering policy of this store.
    fn display_order(&self) -> DisplayOrder;
}

/// The store variant for the host platform.
///
/// A tagged union rather than trait objects: there are exactly the known
/// variants and no more.
pub enum Backend {
    /// The GRUB text-config store.
    Grub(grub::GrubStore),

    /// The `efibootmgr` external-command store.
    Efi(efi::EfiStore),

    /// The Windows BCD registry store.
    #[cfg(windows)]
    Bcd(bcd::BcdStore),
}

impl EntryStore for Backend {
    fn load_catalog(&self) -> Result<Snapshot, SourceError> {
        match self {
            Self::Grub(store) => store.load_catalog(),
            Self::Efi(store) => store.load_catalog(),
            #[cfg(windows)]
            Self::Bcd(store) => store.load_catalog(),
        }
    }

    fn commit_default(&self, id: &str) -> Result<(), CommitError> {
        match self {
            Self::Grub(store) => store.commit_default(id),
            Self::Efi(store) => store.commit_default(id),
            #[cfg(windows)]
            Self::Bcd(store) => store.commit_default(id),
        }
    }

    fn display_order(&self) -> DisplayOrder {
        match self {
            Self::Grub(store) => store.display_order(),
            Self::Efi(store) => store.display_order(),
            #[cfg(windows)]
            Self::Bcd(store) => store.display_order(),
        }
    }
}

/// Which store fits the host, decided once at startup.
///
/// The GRUB variant is the only one needing extra input (the GRUB directory
/// path), so detection is separate from construction and the bootstrap code
/// resolves that path only when it is actually needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// The GRUB text-config store.
    Grub,

    /// The `efibootmgr` external-command store.
    Efi,

    /// The Windows BCD registry store.
    #[cfg(windows)]
    Bcd,
}

impl BackendKind {
    /// Probes the host platform for the store to use.
    ///
    /// Windows always uses the BCD registry.
    #[cfg(windows)]
    #[must_use = "Has no effect if the result is unused"]
    pub fn detect() -> Self {
        Self::Bcd
    }

    /// Probes the host platform for the store to use.
    ///
    /// `efibootmgr` is preferred when it is on `PATH`, with the GRUB files
    /// as the fallback.
    #[cfg(not(windows))]
    #[must_use = "Has no effect if the result is unused"]
    pub fn detect() -> Self {
        let kind = if command_on_path(efi::EFIBOOTMGR) {
            Self::Efi
        } else {
            Self::Grub
        };
        log::debug!("probed {kind:?} as the store for this host");
        kind
    }
}

/// Checks whether an executable with the given name exists in some `PATH`
/// directory.
#[cfg(not(windows))]
fn command_on_path(name: &str) -> bool {
    std::env::var_os("PATH").is_some_and(|paths| {
        std::env::split_paths(&paths).any(|dir| dir.join(name).is_file())
    })
}
