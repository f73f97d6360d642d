// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Resolves the path-configuration fact for the GRUB store.
//!
//! A per-user config file holds a single line: the GRUB directory. When the
//! file is missing the user is asked once, with a sanity check against
//! directories that do not contain a `grub.cfg`, and the answer is saved
//! for the next run. Failing to save is not fatal; the chosen path is still
//! used for the current run.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::warn;

use crate::prompt;

/// The GRUB directory offered when the user just presses ENTER.
const DEFAULT_GRUB_DIR: &str = "/boot/grub/";

/// The name of the file holding the configured GRUB directory.
const CONFIG_FILE: &str = "nextboot.conf";

/// Returns the GRUB directory to use, asking the user if no configured one
/// exists yet.
///
/// # Errors
///
/// May return an `Error` if the path had to be asked for and stdin was
/// closed before an answer arrived.
pub fn grub_dir() -> io::Result<PathBuf> {
    let config_path = config_path();

    if let Ok(content) = fs::read_to_string(&config_path)
        && let Some(line) = content.lines().next()
        && !line.trim().is_empty()
    {
        return Ok(PathBuf::from(line.trim()));
    }

    ask_grub_dir(&config_path)
}

/// The per-user location of the config file.
fn config_path() -> PathBuf {
    ProjectDirs::from("org", "nextboot", "nextboot").map_or_else(
        || PathBuf::from(CONFIG_FILE),
        |dirs| dirs.config_dir().join(CONFIG_FILE),
    )
}

/// Asks the user for the GRUB directory and saves the answer.
fn ask_grub_dir(config_path: &Path) -> io::Result<PathBuf> {
    loop {
        println!(
            "Type the path of the grub folder (which contains grub.cfg and grubenv)\n\
             or press ENTER to use the default path:"
        );
        let Some(line) = prompt::ask(&format!("[{DEFAULT_GRUB_DIR}]: "))? else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while asking for the grub folder",
            ));
        };

        let typed = line.trim().trim_matches(['"', '\'']);
        let dir = PathBuf::from(if typed.is_empty() {
            DEFAULT_GRUB_DIR
        } else {
            typed
        });

        if !dir.join("grub.cfg").exists() && !use_anyway(&dir)? {
            continue; // ask for a path again
        }

        save(config_path, &dir);
        return Ok(dir);
    }
}

/// Confirms a directory without a `grub.cfg`. Only an explicit y or n is
/// accepted here; there is no default.
fn use_anyway(dir: &Path) -> io::Result<bool> {
    loop {
        let Some(line) = prompt::ask(&format!(
            "There is no grub.cfg in \"{}\",\nchoose this path anyway (NOT recommended) ? [y\\n] ",
            dir.display()
        ))?
        else {
            return Ok(false); // stdin closed
        };

        match &*line.trim().to_ascii_lowercase() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => (),
        }
    }
}

/// Saves the chosen directory for the next run. A failure only costs the
/// user this convenience, so it is reported and swallowed.
fn save(config_path: &Path, dir: &Path) {
    let result = config_path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(config_path, dir.display().to_string()));

    if let Err(e) = result {
        warn!(
            "cannot save the grub folder to \"{}\": {e}. \
             You can still choose the default entry for this time.",
            config_path.display()
        );
    }
}
