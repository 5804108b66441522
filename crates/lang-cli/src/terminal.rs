// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal sink that writes leveled script output to stderr.

use lang_interp::{Level, Terminal};

use crate::output;

#[derive(Debug, Default)]
pub struct ConsoleTerminal;

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl Terminal for ConsoleTerminal {
    fn log(&mut self, level: Level, text: &str, tag: &str) {
        tracing::trace!(level = level.name(), tag, "terminal output");
        eprintln!("{} {}", output::level_label(level), text);
    }
}
