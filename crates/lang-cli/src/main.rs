// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lang CLI - script runner and inspection tools.

mod commands;
mod help;
mod output;
mod terminal;

use std::env;
use std::process;
use std::sync::Once;

use commands::run::RunOptions;

static TRACING_INIT: Once = Once::new();

/// Enable with `RUST_LOG=lang_interp=debug`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() {
    output::init();
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        help::print_usage();
        return;
    }

    let (options, positional) = match RunOptions::parse(&args[2..]) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", output::error(message));
            process::exit(2);
        }
    };

    if positional.iter().any(|a| a == "--help" || a == "-h") {
        match args[1].as_str() {
            "run" => help::print_run_help(),
            "translations" => help::print_translations_help(),
            _ => help::print_usage(),
        }
        return;
    }

    match args[1].as_str() {
        "run" => {
            let path = required_file(&positional, "run");
            commands::run::cmd_run(path, &options);
        }
        "lex" => {
            let path = required_file(&positional, "lex");
            commands::inspect::cmd_lex(path);
        }
        "parse" => {
            let path = required_file(&positional, "parse");
            commands::inspect::cmd_parse(path);
        }
        "translations" => {
            let path = required_file(&positional, "translations");
            commands::translations::cmd_translations(path, positional.get(1).map(String::as_str), &options);
        }
        "help" | "--help" | "-h" => help::print_usage(),
        "version" | "--version" | "-V" => help::print_version(),
        // Treat as filename
        other if other.ends_with(".lang") => commands::run::cmd_run(other, &options),
        other => {
            eprintln!("{}", output::error(format!("unknown command: {}", other)));
            help::print_usage();
            process::exit(1);
        }
    }
}

fn required_file<'a>(positional: &'a [String], command: &str) -> &'a str {
    match positional.first() {
        Some(path) => path,
        None => {
            eprintln!("Usage: lang {} <file.lang>", command);
            process::exit(1);
        }
    }
}
