// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`StoreError`], which encapsulates other errors

use thiserror::Error;

/// An `Error` resulting from a boot-entry store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The boot-entry catalog could not be loaded from its backing source.
    ///
    /// This is fatal to the whole run.
    #[error("Source Error: {0}")]
    Source(#[from] crate::store::SourceError),

    /// The new default entry could not be committed to the backing store.
    ///
    /// This is reported to the user, but the run continues to the reboot
    /// prompt.
    #[error("Commit Error: {0}")]
    Commit(#[from] crate::store::CommitError),
}
