// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Dumping the translation table a script leaves behind.

use std::path::Path;
use std::process;

use lang_interp::format_translation_file;

use super::run::{on_script_thread, run_file, RunOptions};
use crate::output;

pub fn cmd_translations(path: &str, out: Option<&str>, options: &RunOptions) {
    let path = path.to_string();
    let out = out.map(str::to_string);
    let options = options.clone();
    let code = on_script_thread(move || {
        let mut interp = options.interpreter();
        let code = run_file(&mut interp, &path);
        match out {
            Some(out) => {
                if let Err(e) = interp.write_translations(Path::new(&out)) {
                    eprintln!("{}", output::error(e));
                    return 1;
                }
                tracing::debug!(out = %out, count = interp.translations().len(), "translations written");
            }
            None => print!("{}", format_translation_file(interp.translations())),
        }
        code
    });
    if code != 0 {
        process::exit(code);
    }
}
