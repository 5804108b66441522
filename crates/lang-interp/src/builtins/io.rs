// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal and standard stream I/O.

use crate::errors::InterpretingError;
use crate::host::Level;
use crate::interp::Interpreter;
use crate::value::DataObject;

use super::{combined_text, int, split_first, BuiltinRegistry, BuiltinResult};

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("isTerminalAvailable", is_terminal_available);
    registry.add("printTerminal", print_terminal);
    registry.add("printError", print_error);
    registry.add("print", print);
    registry.add("println", println);
    registry.add("input", input);
}

fn is_terminal_available(interp: &mut Interpreter, _args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    Ok(Some(DataObject::bool(interp.terminal.is_some())))
}

/// `func.printTerminal(level, text)`
fn print_terminal(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let (level, text) = split_first(args).ok_or(InterpretingError::InvalidArgCount)?;
    let level = Level::from_i32(int(level)?).ok_or(InterpretingError::InvalidLogLevel)?;
    if !interp.log_terminal(level, &text, "Lang") {
        interp.set_errno(InterpretingError::NoTerminalWarning, scope_id);
    }
    Ok(None)
}

/// Logs the current errno message, prefixed by the argument text.
fn print_error(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let errno = interp.get_errno(scope_id);
    let message = InterpretingError::from_code(errno)
        .map(|error| error.to_string())
        .unwrap_or_default();
    let text = combined_text(args);
    let line = if text.is_empty() {
        message
    } else {
        format!("{}: {}", text, message)
    };
    if !interp.log_terminal(Level::Error, &line, "Lang") {
        interp.set_errno(InterpretingError::NoTerminalWarning, scope_id);
    }
    Ok(None)
}

fn print(interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    interp.write_output(&combined_text(args));
    Ok(None)
}

fn println(interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let mut text = combined_text(args);
    text.push('\n');
    interp.write_output(&text);
    Ok(None)
}

fn input(interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let prompt = combined_text(args);
    match interp.platform.show_input_dialog(&prompt) {
        Ok(line) => Ok(Some(DataObject::text(line))),
        Err(err) => {
            tracing::debug!(error = %err, "input failed");
            Err(InterpretingError::SystemError)
        }
    }
}
