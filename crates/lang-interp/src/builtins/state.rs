// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Variables, errno, translations and code evaluation.

use std::cmp::Ordering;

use crate::errors::InterpretingError;
use crate::interp::Interpreter;
use crate::scope::is_reserved_name;
use crate::value::DataObject;

use super::{arguments, combined_text, expect_count, BuiltinRegistry, BuiltinResult};

const DEPRECATED_IN: &str = "v1.2.0";

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("clearVar", clear_var);
    registry.add("clearAllVars", clear_all_vars);
    registry.add_deprecated("clearAllArrays", clear_all_arrays, DEPRECATED_IN, "func.clearAllVars");
    registry.add("makeFinal", make_final);
    registry.add("getErrorText", get_error_text);
    registry.add_deprecated("getErrorString", get_error_text, DEPRECATED_IN, "func.getErrorText");
    registry.add("getErrno", get_errno);
    registry.add("condition", condition);
    registry.add("exec", exec);
    registry.add("getTranslationValue", get_translation_value);
    registry.add("isLangVersionNewer", is_lang_version_newer);
    registry.add("isLangVersionOlder", is_lang_version_older);
}

/// Name of the variable an argument was read from.
fn variable_name(arg: &DataObject) -> Result<String, InterpretingError> {
    arg.variable_name()
        .map(str::to_string)
        .ok_or(InterpretingError::InvalidArguments)
}

fn clear_var(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 1)?;
    let name = variable_name(args[0])?;
    if is_reserved_name(&name) || args[0].is_final() {
        return Err(InterpretingError::FinalVarChange);
    }
    if let Some(scope) = interp.scope_mut(scope_id) {
        scope.vars.shift_remove(&name);
    }
    Ok(None)
}

fn clear_all_vars(interp: &mut Interpreter, _args: &[DataObject], scope_id: usize) -> BuiltinResult {
    if let Some(scope) = interp.scope_mut(scope_id) {
        scope.vars.retain(|name, _| is_reserved_name(name));
    }
    Ok(None)
}

fn clear_all_arrays(interp: &mut Interpreter, _args: &[DataObject], scope_id: usize) -> BuiltinResult {
    if let Some(scope) = interp.scope_mut(scope_id) {
        scope
            .vars
            .retain(|name, _| !name.starts_with('&') || is_reserved_name(name));
    }
    Ok(None)
}

fn make_final(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 1)?;
    let name = variable_name(args[0])?;
    let cell = interp
        .scope(scope_id)
        .and_then(|scope| scope.get_var(&name))
        .ok_or(InterpretingError::InvalidArguments)?;
    cell.borrow_mut().set_final();
    Ok(None)
}

fn get_error_text(interp: &mut Interpreter, _args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let errno = interp.get_errno(scope_id);
    let text = InterpretingError::from_code(errno)
        .map(|error| error.to_string())
        .unwrap_or_default();
    Ok(Some(DataObject::text(text)))
}

fn get_errno(interp: &mut Interpreter, _args: &[DataObject], scope_id: usize) -> BuiltinResult {
    Ok(Some(DataObject::int(interp.get_errno(scope_id))))
}

fn condition(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let text = combined_text(args);
    let condition = lang_parser::parse_condition(&text, 0)?;
    let result = interp.interpret_condition(&condition, scope_id);
    Ok(Some(DataObject::bool(result)))
}

fn exec(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let code = combined_text(args);
    Ok(Some(interp.exec_code(&code, scope_id)))
}

fn get_translation_value(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let key = combined_text(args);
    let value = interp
        .scope(scope_id)
        .and_then(|scope| scope.translations.get(key.trim()))
        .map_or_else(DataObject::null, DataObject::text);
    Ok(Some(value))
}

fn is_lang_version_newer(interp: &mut Interpreter, _args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let ordering = compare_lang_version(interp, scope_id)?;
    Ok(Some(DataObject::bool(ordering == Ordering::Greater)))
}

fn is_lang_version_older(interp: &mut Interpreter, _args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let ordering = compare_lang_version(interp, scope_id)?;
    Ok(Some(DataObject::bool(ordering == Ordering::Less)))
}

/// The script's `lang.version` translation compared with the interpreter
/// version.
fn compare_lang_version(interp: &Interpreter, scope_id: usize) -> Result<Ordering, InterpretingError> {
    let requested = interp
        .scope(scope_id)
        .and_then(|scope| scope.translations.get("lang.version"))
        .ok_or(InterpretingError::LangReqNotFound)?;
    let requested = parse_version(requested).ok_or(InterpretingError::InvalidArguments)?;
    let current = parse_version(&interp.config.version).ok_or(InterpretingError::SystemError)?;
    Ok(requested.cmp(&current))
}

/// `v1.2.3` as `[1, 2, 3]`.
fn parse_version(text: &str) -> Option<Vec<u32>> {
    text.trim()
        .trim_start_matches('v')
        .split('.')
        .map(|part| part.parse().ok())
        .collect()
}
