// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The `nextboot` library crate.
//!
//! This holds everything that is not tied to a terminal: the boot-entry
//! stores for the supported boot managers, the selection workflow that
//! orders entries and resolves the currently active one, and the error
//! taxonomy shared by both.
//!
//! Frontends (such as the reference `nextboot` binary) build a
//! [`store::Backend`] for the host platform, load a snapshot from it, let
//! the user pick an entry however they like, and hand the chosen id back to
//! [`store::EntryStore::commit_default`].
//!
//! ## MSRV
//!
//! The minimum supported rust version is 1.88.0.

/// The primary result type that wraps around [`crate::error::StoreError`].
pub type StoreResult<T> = Result<T, crate::error::StoreError>;

pub mod error;
pub mod store;
pub mod workflow;
