// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Colored rendering for everything the `lang` binary prints.
//!
//! Respects NO_COLOR and FORCE_COLOR; `colored` drops colors on its own
//! when the stream is not a terminal.

use std::fmt::Display;

use colored::{ColoredString, Colorize};
use lang_interp::{InterpretingError, Level};

/// Width of the name column in help listings.
const HELP_COLUMN: usize = 26;

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

// === Errors ===

/// `error: <message>`
pub fn error(message: impl Display) -> String {
    format!("{}: {}", "error".red().bold(), message)
}

/// Report for a script that ended with a positive `$LANG_ERRNO`.
pub fn errno_summary(path: &str, code: i32) -> String {
    let detail = match InterpretingError::from_code(code) {
        Some(e) => format!(" ({}: {})", e.name().yellow(), e),
        None => String::new(),
    };
    error(format!("{} finished with error {}{}", path.underline(), code, detail))
}

/// A parsing error node shown against its source line.
pub fn parse_diagnostic(message: &str, line_num: usize, line: &str, hint: Option<&str>) -> String {
    let gutter = "|".blue();
    let mut out = format!(
        "{}\n  {} line {}\n    {}\n{} {} {}\n    {} {}",
        error(message),
        "-->".blue(),
        line_num,
        gutter,
        line_number(line_num),
        gutter,
        line,
        gutter,
        caret_under(line),
    );
    if let Some(hint) = hint {
        out.push_str(&format!("\n    {}\n    {} {}: {}", gutter, "=".cyan(), "hint".cyan(), hint.dimmed()));
    }
    out
}

fn line_number(n: usize) -> ColoredString {
    format!("{:3}", n).blue().bold()
}

/// Carets under the non-blank part of a source line.
fn caret_under(line: &str) -> ColoredString {
    let indent = line.len() - line.trim_start().len();
    let width = line.trim().chars().count().max(1);
    format!("{}{}", " ".repeat(indent), "^".repeat(width)).red().bold()
}

// === lex / parse ===

/// Header of one logical line in `lang lex`.
pub fn logical_line(n: usize) -> String {
    format!("{} {}", line_number(n), "|".blue())
}

pub fn token_row(start: usize, end: usize, kind: &str, text: &str) -> String {
    format!("    {:4}:{:<3} {} {:?}", start, end, format!("{:<17}", kind).cyan(), text)
}

/// `=== <phase> OK ===`, or `=== <phase> FAILED: n errors ===`.
pub fn phase_banner(phase: &str, errors: usize) -> String {
    let status = match errors {
        0 => format!("{} OK", phase).green().bold(),
        1 => format!("{} FAILED: 1 error", phase).red().bold(),
        n => format!("{} FAILED: {} errors", phase, n).red().bold(),
    };
    format!("{} {} {}", "===".dimmed(), status, "===".dimmed())
}

// === Help ===

pub fn heading(text: &str) -> ColoredString {
    text.yellow().bold()
}

/// `Usage: lang <args>`
pub fn usage(args: &str) -> String {
    format!("{}: {} {}", heading("Usage"), "lang".green(), args.cyan())
}

/// One row of a help listing: command, its arguments, what it does.
pub fn command_row(command: &str, args: &str, description: &str) -> String {
    let width = command.len() + if args.is_empty() { 0 } else { args.len() + 1 };
    let pad = " ".repeat(HELP_COLUMN.saturating_sub(width));
    if args.is_empty() {
        format!("  {}{} {}", command.green(), pad, description)
    } else {
        format!("  {} {}{} {}", command.green(), args.cyan(), pad, description)
    }
}

pub fn option_row(flag: &str, description: &str) -> String {
    let pad = " ".repeat(HELP_COLUMN.saturating_sub(flag.len()));
    format!("  {}{} {}", flag.cyan(), pad, description)
}

pub fn title(name: &str, version: &str) -> String {
    format!("{} {}", name.bold(), version.dimmed())
}

// === Terminal levels ===

pub fn level_label(level: Level) -> ColoredString {
    let label = format!("[{}]", level.name());
    match level {
        Level::NotSet | Level::User => label.normal(),
        Level::Debug | Level::Config => label.dimmed(),
        Level::Info => label.blue(),
        Level::Warning => label.yellow().bold(),
        Level::Error => label.red().bold(),
        Level::Critical => label.on_red().white().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn diagnostic_points_at_the_line() {
        plain();
        let text = parse_diagnostic("Bracket mismatch", 2, "  func.print(a", Some("close the call"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "error: Bracket mismatch");
        assert_eq!(lines[1], "  --> line 2");
        assert_eq!(lines[3], "  2 |   func.print(a");
        assert_eq!(lines[4], "    |   ^^^^^^^^^^^^");
        assert_eq!(lines[6], "    = hint: close the call");
    }

    #[test]
    fn banners_count_errors() {
        plain();
        assert_eq!(phase_banner("Parse", 0), "=== Parse OK ===");
        assert_eq!(phase_banner("Parse", 1), "=== Parse FAILED: 1 error ===");
        assert_eq!(phase_banner("Parse", 3), "=== Parse FAILED: 3 errors ===");
    }

    #[test]
    fn errno_summary_names_the_error() {
        plain();
        assert_eq!(
            errno_summary("a.lang", 14),
            "error: a.lang finished with error 14 (DIV_BY_ZERO: Dividing by 0)"
        );
        assert_eq!(errno_summary("a.lang", 99), "error: a.lang finished with error 99");
    }
}
