// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The embedding boundary: file access, user input and the terminal.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Platform services used by the linker and IO builtins.
pub trait Platform {
    /// Resolve `file` against the directory `base`. Absolute paths are
    /// returned unchanged.
    fn lang_path(&self, base: &Path, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    }

    fn read_lang_file(&self, path: &Path) -> io::Result<String>;

    /// Ask the user for a line of text.
    fn show_input_dialog(&self, prompt: &str) -> io::Result<String>;

    fn write_lang_file(&self, path: &Path, translations: &IndexMap<String, String>) -> io::Result<()>;
}

/// [`Platform`] backed by `std::fs` and the process's standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePlatform;

impl Platform for NativePlatform {
    fn read_lang_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn show_input_dialog(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        if !prompt.is_empty() {
            write!(stdout, "{} ", prompt)?;
        }
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn write_lang_file(&self, path: &Path, translations: &IndexMap<String, String>) -> io::Result<()> {
        std::fs::write(path, format_translation_file(translations))
    }
}

/// Terminal log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    NotSet,
    User,
    Debug,
    Config,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    pub fn from_i32(level: i32) -> Option<Level> {
        Some(match level {
            -1 => Level::NotSet,
            0 => Level::User,
            1 => Level::Debug,
            2 => Level::Config,
            3 => Level::Info,
            4 => Level::Warning,
            5 => Level::Error,
            6 => Level::Critical,
            _ => return None,
        })
    }

    pub fn level(self) -> i32 {
        self as i32 - 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::NotSet => "NOT_SET",
            Level::User => "USER",
            Level::Debug => "DEBUG",
            Level::Config => "CONFIG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }
}

/// A leveled output sink, usually a REPL window.
pub trait Terminal {
    fn log(&mut self, level: Level, text: &str, tag: &str);
}

/// Render a translation table as `key = value` lines.
pub fn format_translation_file(translations: &IndexMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in translations {
        let _ = writeln!(out, "{} = {}", key, value.replace('\n', "\\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_round_trip() {
        for raw in -1..=6 {
            assert_eq!(Level::from_i32(raw).unwrap().level(), raw);
        }
        assert_eq!(Level::from_i32(7), None);
        assert_eq!(Level::Warning.name(), "WARNING");
    }

    #[test]
    fn translation_file_escapes_newlines() {
        let mut table = IndexMap::new();
        table.insert("lang.name".to_string(), "demo".to_string());
        table.insert("greeting".to_string(), "a\nb".to_string());
        assert_eq!(format_translation_file(&table), "lang.name = demo\ngreeting = a\\nb\n");
    }

    #[test]
    fn relative_paths_join_base() {
        let platform = NativePlatform;
        assert_eq!(
            platform.lang_path(Path::new("/scripts"), "lib/util.lang"),
            PathBuf::from("/scripts/lib/util.lang")
        );
        assert_eq!(platform.lang_path(Path::new("/scripts"), "/abs.lang"), PathBuf::from("/abs.lang"));
    }
}
