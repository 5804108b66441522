// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Running scripts.

use std::path::Path;
use std::process;
use std::thread;

use lang_interp::{Interpreter, LangConfig};

use crate::output;
use crate::terminal::ConsoleTerminal;

/// Deep Lang recursion is deep Rust recursion; scripts run on a thread
/// with a large stack.
const SCRIPT_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Flags shared by the commands that execute a script.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub max_depth: Option<usize>,
    pub no_terminal: bool,
}

impl RunOptions {
    /// Split flags from positional arguments.
    pub fn parse(args: &[String]) -> Result<(RunOptions, Vec<String>), String> {
        let mut options = RunOptions::default();
        let mut positional = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--max-depth" => {
                    let value = iter.next().ok_or("--max-depth needs a value")?;
                    let depth = value
                        .parse()
                        .map_err(|_| format!("invalid --max-depth value: {}", value))?;
                    options.max_depth = Some(depth);
                }
                "--no-terminal" => options.no_terminal = true,
                _ => positional.push(arg.clone()),
            }
        }
        Ok((options, positional))
    }

    pub fn config(&self) -> LangConfig {
        let config = LangConfig::from_env();
        match self.max_depth {
            Some(depth) => config.with_max_call_depth(depth),
            None => config,
        }
    }

    pub fn interpreter(&self) -> Interpreter {
        let mut interp = Interpreter::with_config(self.config());
        if !self.no_terminal {
            interp.set_terminal(Box::new(ConsoleTerminal::new()));
        }
        interp
    }
}

/// Run `work` on the script thread and return its exit code.
pub fn on_script_thread<F>(work: F) -> i32
where
    F: FnOnce() -> i32 + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name("lang-script".to_string())
        .stack_size(SCRIPT_STACK_SIZE)
        .spawn(work);
    match spawned {
        Ok(handle) => handle.join().unwrap_or_else(|_| {
            eprintln!("{}", output::error("interpreter thread panicked"));
            101
        }),
        Err(e) => {
            eprintln!("{}", output::error(format!("cannot start interpreter thread: {}", e)));
            1
        }
    }
}

pub fn cmd_run(path: &str, options: &RunOptions) {
    let path = path.to_string();
    let options = options.clone();
    let code = on_script_thread(move || {
        let mut interp = options.interpreter();
        run_file(&mut interp, &path)
    });
    if code != 0 {
        process::exit(code);
    }
}

/// Run a file, reporting I/O failures and a final error code on stderr.
/// Returns the process exit code.
pub fn run_file(interp: &mut Interpreter, path: &str) -> i32 {
    match interp.run_file(Path::new(path)) {
        Ok(value) => {
            if let Some(value) = value {
                tracing::debug!(value = %value.to_text(), "script returned");
            }
        }
        Err(e) => {
            eprintln!("{}", output::error(e));
            return 1;
        }
    }

    let errno = interp.errno();
    if errno > 0 {
        eprintln!("{}", output::errno_summary(path, errno));
        return 1;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_anywhere() {
        let (options, positional) =
            RunOptions::parse(&strings(&["a.lang", "--max-depth", "12", "--no-terminal"])).unwrap();
        assert_eq!(options.max_depth, Some(12));
        assert!(options.no_terminal);
        assert_eq!(positional, vec!["a.lang".to_string()]);
    }

    #[test]
    fn rejects_bad_depth() {
        assert!(RunOptions::parse(&strings(&["--max-depth", "deep"])).is_err());
        assert!(RunOptions::parse(&strings(&["--max-depth"])).is_err());
    }
}
