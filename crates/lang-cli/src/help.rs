// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use lang_interp::LANG_VERSION;

use crate::output;

pub fn print_usage() {
    println!("{} - Line-oriented scripting language", output::title("Lang", LANG_VERSION));
    println!();
    println!("{}", output::usage("<command> [args]"));
    println!();
    println!("{}", output::heading("Common:"));
    println!("{}", output::command_row("run", "<file>", "Run a Lang script"));
    println!("{}", output::command_row("translations", "<file> [out]", "Run a script and dump its translations"));
    println!("{}", output::command_row("help", "", "Show this help"));
    println!("{}", output::command_row("version", "", "Show version"));

    println!();
    println!("{}", output::heading("Inspection:"));
    println!("{}", output::command_row("lex", "<file>", "Tokenize a file and print tokens"));
    println!("{}", output::command_row("parse", "<file>", "Parse a file and print the AST"));

    println!();
    println!("{}", output::heading("Options:"));
    println!("{}", output::option_row("--max-depth <n>", "Maximum call depth before stack overflow"));
    println!("{}", output::option_row("--no-terminal", "Run without a terminal, logging plain lines to stderr"));
    println!();
    println!("A bare <file>.lang argument runs that file. Set RUST_LOG=lang_interp=debug for interpreter traces.");
}

pub fn print_run_help() {
    println!("{}", output::heading("Run"));
    println!();
    println!("Execute a Lang script. Linked files resolve relative to the script.");
    println!("Exits with 1 when the script ends with a non-zero error code.");
    println!();
    println!("{}", output::usage("run <file.lang> [--max-depth <n>] [--no-terminal]"));
}

pub fn print_translations_help() {
    println!("{}", output::heading("Translations"));
    println!();
    println!("Run a script, then print its translation table as key = value lines.");
    println!("With an output path the table is written to that file instead.");
    println!();
    println!("{}", output::usage("translations <file.lang> [out.lang]"));
}

pub fn print_version() {
    println!(
        "{} (Lang {})",
        output::title("lang", env!("CARGO_PKG_VERSION")),
        LANG_VERSION
    );
}
