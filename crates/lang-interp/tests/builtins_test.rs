// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Catalog check: every documented builtin is registered, and nothing
//! undocumented sneaks in.
//!
//! If you add a builtin, add it to the catalog below.

use lang_interp::{Interpreter, InterpretingError};

const STATE: &[&str] = &[
    "clearVar", "clearAllVars", "clearAllArrays", "makeFinal", "getErrorText", "getErrorString",
    "getErrno", "condition", "exec", "getTranslationValue", "isLangVersionNewer", "isLangVersionOlder",
];
const TIME: &[&str] = &["currentTimeMillis", "sleep"];
const IO: &[&str] = &["isTerminalAvailable", "printTerminal", "printError", "print", "println", "input"];
const TEXT: &[&str] = &[
    "len", "toUpper", "toLower", "trim", "replace", "substring", "charAt", "split", "repeatText",
    "toChar", "toNumber", "hexToDez",
];
const MATH: &[&str] = &[
    "addi", "subi", "muli", "divi", "modi", "andi", "ori", "xori", "noti", "lshifti", "rshifti", "rzshifti",
    "addl", "subl", "mull", "divl", "modl", "andl", "orl", "xorl", "notl", "lshiftl", "rshiftl", "rzshiftl",
    "addf", "subf", "mulf", "divf", "addd", "subd", "muld", "divd",
    "itol", "itof", "itod", "ltoi", "ltof", "ltod", "ftoi", "ftol", "ftod", "dtoi", "dtol", "dtof",
    "pow", "sqrt", "rand",
];
const ARRAYS: &[&str] = &[
    "arrayMake", "arraySet", "arraySetAll", "arrayGet", "arrayGetAll", "arrayLength", "arrayForEach",
    "arrayEnumerate", "arrayDelete", "arrayClear", "randChoice",
];
const FUNCTIONS: &[&str] = &["copyAfterFP", "repeat", "repeatWhile", "repeatUntil"];
const LINKER: &[&str] = &["link", "bindLibrary"];

fn catalog() -> Vec<&'static str> {
    [STATE, TIME, IO, TEXT, MATH, ARRAYS, FUNCTIONS].concat()
}

#[test]
fn catalog_is_registered() {
    let interp = Interpreter::new();
    let registered = interp.builtin_names(false);
    for name in catalog() {
        assert!(registered.contains(&name), "func.{} is documented but not registered", name);
    }
    let linker = interp.builtin_names(true);
    for name in LINKER {
        assert!(linker.contains(name), "linker.{} is documented but not registered", name);
    }
}

#[test]
fn registry_has_nothing_undocumented() {
    let interp = Interpreter::new();
    let catalog = catalog();
    for name in interp.builtin_names(false) {
        assert!(catalog.contains(&name), "func.{} is registered but not documented", name);
    }
    assert_eq!(interp.builtin_names(true).len(), LINKER.len());
}

#[test]
fn deprecated_call_warns_and_still_runs() {
    let (mut interp, output) = Interpreter::with_captured_output();
    interp.run_str("$a = 1\nfunc.arrayMake(&arr, 1)\nfunc.clearAllArrays()");
    let output = output.lock().unwrap().clone();
    assert!(output.starts_with("[WARNING] Use of deprecated function \"func.clearAllArrays\""));
    assert!(output.contains("\"v1.2.0\""));
    assert!(output.contains("func.clearAllVars"));
    assert!(interp.get_var("&arr").is_none());
    assert_eq!(interp.get_var("$a").unwrap().to_text(), "1");
    assert_eq!(interp.errno(), InterpretingError::DeprecatedFuncCall.code());
}

#[test]
fn builtins_are_values() {
    let mut interp = Interpreter::new();
    interp.run_str("fp.add = func.addi\n$r = fp.add(20, 22)");
    assert_eq!(interp.get_var("$r").unwrap().to_text(), "42");
}

#[test]
fn builtin_name_prefix_keeps_trailing_text() {
    let mut interp = Interpreter::new();
    interp.run_str("$r = func.printlnx");
    assert_eq!(interp.get_var("$r").unwrap().to_text(), "<Predefined FP func.println>x");
}

#[test]
fn deprecation_warning_is_reported_once_per_name() {
    let (mut interp, output) = Interpreter::with_captured_output();
    interp.run_str("func.clearAllArrays()\nfunc.clearAllArrays()\nfunc.getErrorString()");
    let output = output.lock().unwrap().clone();
    assert_eq!(output.matches("\"func.clearAllArrays\"").count(), 1, "{}", output);
    assert_eq!(output.matches("\"func.getErrorString\"").count(), 1, "{}", output);

    interp.run_str("$LANG_ERRNO = 0\nfunc.clearAllArrays()");
    assert_eq!(interp.errno(), InterpretingError::DeprecatedFuncCall.code());
}

#[test]
fn array_used_as_its_own_index() {
    let mut interp = Interpreter::new();
    interp.run_str(concat!(
        "func.arrayMake(&a, 3)\n",
        "func.arraySet(&a, &a, x)\n",
        "$v = func.arrayGet(&a, &a)\n",
        "$all = func.arrayGetAll(&a)",
    ));
    // An array converts to its length, which is one past the last index.
    assert_eq!(interp.errno(), InterpretingError::IndexOutOfBounds.code());
    assert_eq!(interp.get_var("$v").unwrap().to_text(), "Error 18: Array out of bounds");
    assert_eq!(interp.get_var("$all").unwrap().to_text(), "null, null, null");

    interp.run_str("$LANG_ERRNO = 0\nfunc.arrayMake(&i, 1)\nfunc.arraySet(&a, &i, y)\n$w = func.arrayGet(&a, &i)");
    assert_eq!(interp.errno(), 0);
    assert_eq!(interp.get_var("$w").unwrap().to_text(), "y");
}

#[test]
fn array_set_all_with_aliased_arguments() {
    let mut interp = Interpreter::new();
    interp.run_str("func.arrayMake(&a, 2)\n&b = &a\nfunc.arraySetAll(&a, func.arrayLength(&b))\n$all = func.arrayGetAll(&b)");
    assert_eq!(interp.errno(), 0);
    assert_eq!(interp.get_var("$all").unwrap().to_text(), "2, 2");
}

#[test]
fn negative_array_index() {
    let mut interp = Interpreter::new();
    interp.run_str("func.arrayMake(&a, 2)\n$v = func.arrayGet(&a, -1)");
    assert_eq!(interp.errno(), InterpretingError::IndexOutOfBounds.code());
    assert_eq!(interp.get_var("$v").unwrap().to_text(), "Error 18: Array out of bounds");

    interp.run_str("$LANG_ERRNO = 0\nfunc.arraySet(&a, -1, x)");
    assert_eq!(interp.errno(), InterpretingError::IndexOutOfBounds.code());
}
