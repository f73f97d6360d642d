// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Line-oriented prompts for the degraded (no-arrow-keys) mode.
//!
//! Everything here loops on invalid input rather than erroring: a bad menu
//! ordinal or a bad yes/no answer re-prompts and mutates nothing. The only
//! ways out are a valid answer, the explicit abort action, or stdin being
//! closed (treated the same as an abort).

use std::io::{self, BufRead, Write};

use nextboot_core::store::BootEntry;

/// One parsed answer of the numbered menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    /// A valid ordinal, converted to a 0-based index.
    Pick(usize),

    /// The explicit abort action.
    Abort,

    /// Input that was not a number at all.
    NotANumber,

    /// A numeric ordinal outside `[1, N]`.
    OutOfRange(usize),
}

/// Parses one line of menu input against a list of length `len`.
#[must_use = "Has no effect if the result is unused"]
pub fn parse_choice(input: &str, len: usize) -> Choice {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Choice::Abort;
    }

    match input.parse::<usize>() {
        Err(_) => Choice::NotANumber,
        Ok(n) if n == 0 || n > len => Choice::OutOfRange(n),
        Ok(n) => Choice::Pick(n - 1),
    }
}

/// Parses one line of yes/no input. Empty input defaults to "no"; anything
/// other than a y/n answer is [`None`] and must re-prompt.
#[must_use = "Has no effect if the result is unused"]
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match &*input.trim().to_ascii_lowercase() {
        "" | "n" => Some(false),
        "y" => Some(true),
        _ => None,
    }
}

/// The numbered-list menu.
///
/// Prints the entries with 1-based ordinals and the resolved current entry,
/// then loops until a valid ordinal or an abort. Returns the chosen entry
/// id, or [`None`] on abort.
///
/// # Errors
///
/// May return an `Error` if stdin or stdout fail underneath the prompt.
pub fn choose_numbered(entries: &[BootEntry], current: Option<&str>) -> io::Result<Option<String>> {
    println!("-- List of entries --");
    for (i, entry) in entries.iter().enumerate() {
        println!("{:2}. {}", i + 1, entry.display_name);
    }
    println!("\nCurrent entry: {}", current.unwrap_or("none (fallback entry ?)"));

    loop {
        let Some(line) = ask("Type the number of the entry you want as default ('q' to abort): ")?
        else {
            return Ok(None); // stdin closed
        };

        match parse_choice(&line, entries.len()) {
            Choice::Pick(i) => return Ok(Some(entries[i].id.clone())),
            Choice::Abort => return Ok(None),
            Choice::NotANumber => println!("You must type the number of the entry."),
            Choice::OutOfRange(n) => println!("There is no entry {n}."),
        }
    }
}

/// The reboot confirmation prompt. Defaults to "no" on empty input and
/// re-prompts on anything unrecognized.
///
/// # Errors
///
/// May return an `Error` if stdin or stdout fail underneath the prompt.
pub fn confirm_reboot() -> io::Result<bool> {
    loop {
        let Some(line) = ask("Would you like to reboot now ? [y\\N] ")? else {
            return Ok(false); // stdin closed
        };

        if let Some(answer) = parse_yes_no(&line) {
            return Ok(answer);
        }
    }
}

/// Prints a prompt without a trailing newline and reads one answer line.
/// Returns [`None`] once stdin is closed.
pub fn ask(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_map_to_indices() {
        assert_eq!(parse_choice("1", 3), Choice::Pick(0));
        assert_eq!(parse_choice(" 3 \n", 3), Choice::Pick(2));
    }

    #[test]
    fn test_out_of_range_re_prompts() {
        assert_eq!(parse_choice("0", 3), Choice::OutOfRange(0));
        assert_eq!(parse_choice("4", 3), Choice::OutOfRange(4));
        assert_eq!(parse_choice("1", 0), Choice::OutOfRange(1));
    }

    #[test]
    fn test_non_numeric_re_prompts() {
        assert_eq!(parse_choice("ubuntu", 3), Choice::NotANumber);
        assert_eq!(parse_choice("", 3), Choice::NotANumber);
        assert_eq!(parse_choice("-1", 3), Choice::NotANumber);
        assert_eq!(parse_choice("1.5", 3), Choice::NotANumber);
    }

    #[test]
    fn test_abort_action() {
        assert_eq!(parse_choice("q", 3), Choice::Abort);
        assert_eq!(parse_choice("Q\n", 3), Choice::Abort);
    }

    #[test]
    fn test_yes_no_defaults_to_no() {
        assert_eq!(parse_yes_no("\n"), Some(false));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("N"), Some(false));
        assert_eq!(parse_yes_no("y"), Some(true));
        assert_eq!(parse_yes_no("Y\n"), Some(true));
        assert_eq!(parse_yes_no("maybe"), None);
    }
}
