// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The `nextboot` application.
//!
//! One run-to-completion session: probe a store for the host platform, load
//! its boot-entry catalog, let the user pick an entry (an arrow-key picker
//! on a real terminal, a numbered prompt otherwise), commit the choice, then
//! offer a reboot. Aborting the menu exits immediately with success and
//! commits nothing.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use log::warn;
use nextboot_core::{
    error::StoreError,
    store::{Backend, BackendKind, CommitError, EntryStore, efi::EfiStore, grub::GrubStore},
    workflow,
};
use thiserror::Error;

#[cfg(windows)]
use nextboot_core::store::bcd::BcdStore;

mod app;
mod bootstrap;
mod prompt;
mod reboot;
mod ui;

/// An error that may occur when running the application.
#[derive(Error, Debug)]
pub enum MainError {
    /// An error occurred in the boot-entry store.
    #[error("Store Error: {0}")]
    Store(#[from] StoreError),

    /// An error occurred while running the picker.
    #[error("App Error: {0}")]
    App(#[from] app::AppError),

    /// An error occurred on the terminal itself.
    #[error("I/O Error: {0}")]
    Io(#[from] io::Error),
}

/// Builds the store for the host platform.
///
/// Only the GRUB store needs the path-configuration fact, so the (possibly
/// interactive) bootstrap runs when that store is actually picked.
///
/// # Errors
///
/// May return an `Error` if the GRUB directory had to be asked for and
/// stdin was closed.
fn select_backend() -> Result<Backend, MainError> {
    match BackendKind::detect() {
        #[cfg(windows)]
        BackendKind::Bcd => Ok(Backend::Bcd(BcdStore::new())),
        BackendKind::Efi => Ok(Backend::Efi(EfiStore::new())),
        BackendKind::Grub => Ok(Backend::Grub(GrubStore::new(bootstrap::grub_dir()?))),
    }
}

/// Checks whether the enhanced arrow-key picker can run.
///
/// A capability probe rather than try-and-fall-back: both ends of the
/// terminal must be interactive.
fn enhanced_mode() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// The actual main function of the program, which returns a [`Result`].
///
/// # Errors
///
/// May return an `Error` if the catalog could not be loaded, the catalog
/// was empty, or the terminal failed underneath the menu. A commit failure
/// is deliberately not propagated: it is reported and the run still reaches
/// the reboot prompt.
fn main_func() -> Result<(), MainError> {
    let backend = select_backend()?;
    let snapshot = backend.load_catalog().map_err(StoreError::from)?;

    let entries = workflow::ordered(&snapshot, backend.display_order());
    if entries.is_empty() {
        return Err(app::AppError::NoEntries.into());
    }

    let current = workflow::current_name(&entries, &snapshot.current);
    let preselect = workflow::current_index(&entries, &snapshot.current);

    let chosen = if enhanced_mode() {
        let mut app = app::App::new(&entries, preselect, current);
        app.run()?.map(|i| entries[i].id.clone())
    } else {
        prompt::choose_numbered(&entries, current)?
    };

    let Some(id) = chosen else {
        return Ok(()); // menu abort: exit with success, commit nothing
    };
    let name = snapshot
        .get(&id)
        .map_or(id.as_str(), |entry| entry.display_name.as_str());

    let committed = backend.commit_default(&id);
    if let Err(e) = &committed {
        warn!("{e}");
    }
    println!("{}", commit_message(&committed, name));

    // a failed commit still reaches this prompt
    if prompt::confirm_reboot()? {
        reboot::reboot();
    }

    Ok(())
}

/// The user-facing line reporting a commit outcome.
///
/// A failure produces a warning clearly distinct from the success message;
/// it is the caller who decides that the run continues regardless.
fn commit_message(committed: &Result<(), CommitError>, name: &str) -> String {
    match committed {
        Ok(()) => format!("Default entry successfully set to '{name}'"),
        Err(_) => {
            "\nWarning: an unexpected error occurred, the next-boot entry might not be set."
                .to_owned()
        }
    }
}

/// The main function of the program.
///
/// Fatal errors are printed as a human-readable message and turn into a
/// non-zero exit status; nothing is retried.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match main_func() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_commit_messages_are_distinct() {
        let failed: Result<(), CommitError> = Err(CommitError::Spawn {
            command: "efibootmgr",
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        let success = commit_message(&Ok(()), "Ubuntu");
        let warning = commit_message(&failed, "Ubuntu");

        assert_eq!(success, "Default entry successfully set to 'Ubuntu'");
        assert_ne!(success, warning);
        assert!(warning.contains("Warning"));
    }
}
