// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Array functions.
//!
//! Arrays are shared: every binding that holds one sees writes made
//! through any other.

use std::cell::RefCell;
use std::rc::Rc;

use rand::seq::SliceRandom;

use crate::errors::InterpretingError;
use crate::interp::Interpreter;
use crate::scope::is_reserved_name;
use crate::value::{DataObject, DataValue, FunctionPointerObject};

use super::{arguments, expect_count, expect_range, int, BuiltinRegistry, BuiltinResult};

type Array = Rc<RefCell<Vec<DataObject>>>;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("arrayMake", array_make);
    registry.add("arraySet", array_set);
    registry.add("arraySetAll", array_set_all);
    registry.add("arrayGet", array_get);
    registry.add("arrayGetAll", array_get_all);
    registry.add("arrayLength", array_length);
    registry.add("arrayForEach", array_for_each);
    registry.add("arrayEnumerate", array_enumerate);
    registry.add("arrayDelete", array_delete);
    registry.add("arrayClear", array_clear);
    registry.add("randChoice", rand_choice);
}

fn array(arg: &DataObject) -> Result<Array, InterpretingError> {
    arg.as_array().cloned().ok_or(InterpretingError::InvalidArrPtr)
}

fn function_pointer(arg: &DataObject) -> Result<Rc<FunctionPointerObject>, InterpretingError> {
    arg.as_function_pointer().cloned().ok_or(InterpretingError::InvalidFuncPtr)
}

fn index(arg: &DataObject, len: usize) -> Result<usize, InterpretingError> {
    usize::try_from(int(arg)?)
        .ok()
        .filter(|i| *i < len)
        .ok_or(InterpretingError::IndexOutOfBounds)
}

/// Name of an array variable argument, whether or not it exists yet.
fn array_name(arg: &DataObject) -> Option<String> {
    match arg.variable_name() {
        Some(name) => Some(name.to_string()),
        None => match arg.value() {
            DataValue::Text(text) if text.starts_with('&') && text.len() > 1 => Some(text.clone()),
            _ => None,
        },
    }
}

/// `func.arrayMake([&name,] length)`
fn array_make(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_range(&args, 1, 2)?;
    let (name, length) = match args.as_slice() {
        [name, length] => (Some(array_name(name).ok_or(InterpretingError::InvalidArrPtr)?), *length),
        [length] => (None, *length),
        _ => return Err(InterpretingError::InvalidArgCount),
    };

    let length = length.to_number().ok_or(InterpretingError::LengthNan)?.as_i32();
    let length = usize::try_from(length).map_err(|_| InterpretingError::NegativeArrayLen)?;
    let array = DataObject::array(vec![DataObject::null(); length]);

    match name {
        Some(name) => {
            interp.assign_variable(&name, &array, scope_id)?;
            Ok(None)
        }
        None => Ok(Some(array)),
    }
}

/// `func.arraySet(&arr, index, value)`
fn array_set(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 3)?;
    let array = array(args[0])?;
    // Arguments may alias the array, so convert them before borrowing it.
    let len = array.borrow().len();
    let i = index(args[1], len)?;
    let value = args[2].detached();
    array.borrow_mut()[i] = value;
    Ok(None)
}

/// `func.arraySetAll(&arr, value)` fills every element; with more values
/// there must be exactly one per element.
fn array_set_all(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    let (target, values) = args.split_first().ok_or(InterpretingError::InvalidArgCount)?;
    let array = array(target)?;
    let values: Vec<DataObject> = values.iter().map(|value| value.detached()).collect();
    let len = array.borrow().len();
    let filled = match values.as_slice() {
        [] => return Err(InterpretingError::InvalidArgCount),
        [value] => vec![value.clone(); len],
        _ if values.len() == len => values,
        _ => return Err(InterpretingError::ArgCountNotArrLen),
    };
    *array.borrow_mut() = filled;
    Ok(None)
}

/// `func.arrayGet(&arr, index)`
fn array_get(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 2)?;
    let array = array(args[0])?;
    let len = array.borrow().len();
    let i = index(args[1], len)?;
    let element = array.borrow()[i].detached();
    Ok(Some(element))
}

fn array_get_all(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 1)?;
    let array = array(args[0])?;
    let text = array
        .borrow()
        .iter()
        .map(DataObject::to_text)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(Some(DataObject::text(text)))
}

fn array_length(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 1)?;
    let len = array(args[0])?.borrow().len();
    Ok(Some(DataObject::int(len as i32)))
}

/// `func.arrayForEach(&arr, fp)` calls `fp(element)` for each element.
fn array_for_each(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 2)?;
    let elements = array(args[0])?.borrow().clone();
    let fp = function_pointer(args[1])?;
    for element in elements {
        if interp.is_interrupted() {
            break;
        }
        interp.call_function_pointer(&fp, vec![element.detached()], scope_id);
    }
    Ok(None)
}

/// `func.arrayEnumerate(&arr, fp)` calls `fp(index, element)`.
fn array_enumerate(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 2)?;
    let elements = array(args[0])?.borrow().clone();
    let fp = function_pointer(args[1])?;
    for (i, element) in elements.into_iter().enumerate() {
        if interp.is_interrupted() {
            break;
        }
        let call_args = vec![
            DataObject::int(i as i32),
            DataObject::new(DataValue::ArgumentSeparator(", ".to_string())),
            element.detached(),
        ];
        interp.call_function_pointer(&fp, call_args, scope_id);
    }
    Ok(None)
}

/// Set every element to null, keeping the length.
fn array_delete(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 1)?;
    let array = array(args[0])?;
    array.borrow_mut().iter_mut().for_each(|e| *e = DataObject::null());
    Ok(None)
}

/// Remove the array variable from the caller's frame.
fn array_clear(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 1)?;
    array(args[0])?;
    let name = args[0].variable_name().ok_or(InterpretingError::InvalidArguments)?;
    if is_reserved_name(name) || args[0].is_final() {
        return Err(InterpretingError::FinalVarChange);
    }
    if let Some(scope) = interp.scope_mut(scope_id) {
        scope.vars.shift_remove(name);
    }
    Ok(None)
}

/// A random element of one array argument, or a random argument.
fn rand_choice(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    let mut rng = rand::thread_rng();
    let choice = match args.as_slice() {
        [single] if single.as_array().is_some() => {
            let array = array(single)?;
            let elements = array.borrow();
            elements.choose(&mut rng).map(DataObject::detached)
        }
        values => values.choose(&mut rng).map(|value| value.detached()),
    };
    choice.map(Some).ok_or(InterpretingError::EmptyArray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_named_array() {
        let mut interp = Interpreter::new();
        interp.run_str("func.arrayMake(&a, 3)\n$len = func.arrayLength(&a)\n$all = func.arrayGetAll(&a)");
        assert_eq!(interp.get_var("$len").unwrap().to_text(), "3");
        assert_eq!(interp.get_var("$all").unwrap().to_text(), "null, null, null");
    }

    #[test]
    fn make_errors() {
        let mut interp = Interpreter::new();
        interp.run_str("func.arrayMake(&a, -1)");
        assert_eq!(interp.errno(), InterpretingError::NegativeArrayLen.code());
        interp.run_str("func.arrayMake(&a, many)");
        assert_eq!(interp.errno(), InterpretingError::LengthNan.code());
        interp.run_str("func.arrayMake($a, 2)");
        assert_eq!(interp.errno(), InterpretingError::InvalidArrPtr.code());
    }

    #[test]
    fn set_and_get() {
        let mut interp = Interpreter::new();
        interp.run_str(concat!(
            "&a = func.arrayMake(2)\n",
            "func.arraySet(&a, 1, x)\n",
            "$v = func.arrayGet(&a, 1)\n",
            "$bad = func.arrayGet(&a, 2)",
        ));
        assert_eq!(interp.get_var("$v").unwrap().to_text(), "x");
        assert_eq!(interp.get_var("$bad").unwrap().to_text(), "Error 18: Array out of bounds");
        assert_eq!(interp.errno(), 18);
    }

    #[test]
    fn set_all() {
        let mut interp = Interpreter::new();
        interp.run_str("func.arrayMake(&a, 3)\nfunc.arraySetAll(&a, 0)\n$one = func.arrayGetAll(&a)");
        assert_eq!(interp.get_var("$one").unwrap().to_text(), "0, 0, 0");

        interp.run_str("func.arraySetAll(&a, 1, 2, 3)\n$each = func.arrayGetAll(&a)");
        assert_eq!(interp.get_var("$each").unwrap().to_text(), "1, 2, 3");

        interp.run_str("func.arraySetAll(&a, 1, 2)");
        assert_eq!(interp.errno(), InterpretingError::ArgCountNotArrLen.code());
    }

    #[test]
    fn arrays_are_shared() {
        let mut interp = Interpreter::new();
        interp.run_str("func.arrayMake(&a, 1)\n&b = &a\nfunc.arraySet(&b, 0, shared)\n$v = func.arrayGet(&a, 0)");
        assert_eq!(interp.get_var("$v").unwrap().to_text(), "shared");
    }

    #[test]
    fn iteration() {
        let (mut interp, output) = Interpreter::with_captured_output();
        interp.run_str(concat!(
            "func.arrayMake(&a, 2)\n",
            "func.arraySetAll(&a, x, y)\n",
            "fp.show = ($i, $v) -> { func.println($i=$v) }\n",
            "func.arrayEnumerate(&a, fp.show)\n",
            "fp.each = ($v) -> { func.print($v) }\n",
            "func.arrayForEach(&a, fp.each)",
        ));
        assert_eq!(output.lock().unwrap().as_str(), "0=x\n1=y\nxy");
    }

    #[test]
    fn delete_and_clear() {
        let mut interp = Interpreter::new();
        interp.run_str("func.arrayMake(&a, 2)\nfunc.arraySetAll(&a, 1)\nfunc.arrayDelete(&a)\n$all = func.arrayGetAll(&a)");
        assert_eq!(interp.get_var("$all").unwrap().to_text(), "null, null");
        interp.run_str("func.arrayClear(&a)");
        assert!(interp.get_var("&a").is_none());
    }

    #[test]
    fn rand_choice_picks_element() {
        let mut interp = Interpreter::new();
        interp.run_str("func.arrayMake(&a, 2)\nfunc.arraySetAll(&a, 7)\n$c = func.randChoice(&a)");
        assert_eq!(interp.get_var("$c").unwrap().to_text(), "7");
        interp.run_str("func.arrayMake(&e, 0)\nfunc.randChoice(&e)");
        assert_eq!(interp.errno(), InterpretingError::EmptyArray.code());
    }
}
