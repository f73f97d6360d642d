// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Fire-and-forget reboot invocation.

use std::process::Command;

use log::warn;

/// Invokes the platform reboot command without waiting for, or validating,
/// its outcome.
pub fn reboot() {
    if let Err(e) = command().spawn() {
        warn!("cannot invoke the reboot command: {e}");
    }
}

/// The reboot command for the host platform.
#[cfg(windows)]
fn command() -> Command {
    let mut command = Command::new("shutdown");
    command.args(["/r", "/t", "00"]);
    command
}

/// The reboot command for the host platform.
#[cfg(not(windows))]
fn command() -> Command {
    Command::new("reboot")
}
