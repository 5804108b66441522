// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function pointer helpers and loops.

use std::rc::Rc;

use lang_ast::ParameterKind;

use crate::errors::InterpretingError;
use crate::interp::Interpreter;
use crate::scope::CopyAfterCall;
use crate::value::{DataObject, DataValue, FunctionPointerObject};

use super::{arguments, expect_count, int, BuiltinRegistry, BuiltinResult};

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("copyAfterFP", copy_after_fp);
    registry.add("repeat", repeat);
    registry.add("repeatWhile", repeat_while);
    registry.add("repeatUntil", repeat_until);
}

/// Variable name of an argument; unknown variables arrive as their text.
fn variable_name(arg: &DataObject) -> Option<String> {
    match (arg.variable_name(), arg.value()) {
        (Some(name), _) => Some(name.to_string()),
        (None, DataValue::Text(text)) if ParameterKind::of_name(text).is_some() => Some(text.clone()),
        _ => None,
    }
}

fn function_pointer(arg: &DataObject) -> Result<Rc<FunctionPointerObject>, InterpretingError> {
    arg.as_function_pointer().cloned().ok_or(InterpretingError::InvalidFuncPtr)
}

/// `func.copyAfterFP(to, from)`: when the current call returns, copy
/// `from` of this frame into `to` of the caller.
fn copy_after_fp(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 2)?;
    let to = variable_name(args[0]).ok_or(InterpretingError::InvalidArguments)?;
    let from = variable_name(args[1]).ok_or(InterpretingError::InvalidArguments)?;
    if ParameterKind::of_name(&to) != ParameterKind::of_name(&from) {
        return Err(InterpretingError::InvalidArguments);
    }

    let scope = interp.scope_mut(scope_id).ok_or(InterpretingError::SystemError)?;
    scope.copy_after_call.push(CopyAfterCall { to, from });
    Ok(None)
}

/// `func.repeat(fp, count)` calls `fp(i)` for `i` in `0..count`.
fn repeat(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 2)?;
    let fp = function_pointer(args[0])?;
    let count = int(args[1])?;
    if count < 0 {
        return Err(InterpretingError::NegativeRepeatCount);
    }
    for i in 0..count {
        if interp.is_interrupted() {
            break;
        }
        interp.call_function_pointer(&fp, vec![DataObject::int(i)], scope_id);
    }
    Ok(None)
}

/// `func.repeatWhile(fp, check)` calls `fp()` while `check()` is true.
fn repeat_while(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    repeat_checked(interp, args, scope_id, true)
}

/// `func.repeatUntil(fp, check)` calls `fp()` until `check()` is true.
fn repeat_until(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    repeat_checked(interp, args, scope_id, false)
}

fn repeat_checked(interp: &mut Interpreter, args: &[DataObject], scope_id: usize, run_while: bool) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 2)?;
    let fp = function_pointer(args[0])?;
    let check = function_pointer(args[1])?;
    while !interp.is_interrupted() {
        let result = interp
            .call_function_pointer(&check, Vec::new(), scope_id)
            .map_or(false, |value| value.to_bool());
        if result != run_while {
            break;
        }
        interp.call_function_pointer(&fp, Vec::new(), scope_id);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_passes_index() {
        let (mut interp, output) = Interpreter::with_captured_output();
        interp.run_str("fp.f = ($i) -> { func.print($i) }\nfunc.repeat(fp.f, 4)");
        assert_eq!(output.lock().unwrap().as_str(), "0123");

        interp.run_str("func.repeat(fp.f, -1)");
        assert_eq!(interp.errno(), InterpretingError::NegativeRepeatCount.code());
    }

    #[test]
    fn repeat_while_and_until() {
        let (mut interp, output) = Interpreter::with_captured_output();
        interp.run_str(concat!(
            "$n = 0\n",
            "fp.step = () -> {\nfunc.print(.)\n$n = func.addi($n, 1)\nfunc.copyAfterFP($n, $n)\n}\n",
            "fp.below = () -> { return func.condition($n < 3) }\n",
            "func.repeatWhile(fp.step, fp.below)\n",
            "fp.done = () -> { return func.condition($n >= 5) }\n",
            "func.repeatUntil(fp.step, fp.done)",
        ));
        assert_eq!(output.lock().unwrap().as_str(), ".....");
        assert_eq!(interp.get_var("$n").unwrap().to_text(), "5");
    }

    #[test]
    fn copy_after_fp_checks_sigils() {
        let mut interp = Interpreter::new();
        interp.run_str("$a = 1\nfunc.copyAfterFP($a, &b)");
        assert_eq!(interp.errno(), InterpretingError::InvalidArguments.code());
    }

    #[test]
    fn loops_need_function_pointers() {
        let mut interp = Interpreter::new();
        interp.run_str("func.repeat(nope, 2)");
        assert_eq!(interp.errno(), InterpretingError::InvalidFuncPtr.code());
    }
}
