// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Text functions.

use regex::Regex;

use crate::errors::InterpretingError;
use crate::interp::Interpreter;
use crate::value::{parse_number, DataObject, DataValue};

use super::{arguments, combined_text, expect_count, expect_range, int, split_first, BuiltinRegistry, BuiltinResult};

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("len", len);
    registry.add("toUpper", to_upper);
    registry.add("toLower", to_lower);
    registry.add("trim", trim);
    registry.add("replace", replace);
    registry.add("substring", substring);
    registry.add("charAt", char_at);
    registry.add("split", split);
    registry.add("repeatText", repeat_text);
    registry.add("toChar", to_char);
    registry.add("toNumber", to_number);
    registry.add("hexToDez", hex_to_dez);
}

fn len(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let count = combined_text(args).chars().count();
    Ok(Some(DataObject::int(count as i32)))
}

fn to_upper(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    Ok(Some(DataObject::text(combined_text(args).to_uppercase())))
}

fn to_lower(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    Ok(Some(DataObject::text(combined_text(args).to_lowercase())))
}

fn trim(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    Ok(Some(DataObject::text(combined_text(args).trim())))
}

fn compile(pattern: &str) -> Result<Regex, InterpretingError> {
    Regex::new(pattern).map_err(|err| {
        tracing::debug!(pattern, error = %err, "invalid regex");
        InterpretingError::InvalidArguments
    })
}

/// `func.replace(text, regex, replacement)`
fn replace(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 3)?;
    let regex = compile(&args[1].to_text())?;
    let replaced = regex.replace_all(&args[0].to_text(), args[2].to_text().as_str()).into_owned();
    Ok(Some(DataObject::text(replaced)))
}

/// `func.substring(text, start[, end])`, in chars.
fn substring(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_range(&args, 2, 3)?;
    let chars: Vec<char> = args[0].to_text().chars().collect();
    let start = int(args[1])?;
    let end = match args.get(2) {
        Some(end) => int(end)?,
        None => chars.len() as i32,
    };
    if start < 0 || end < start || end as usize > chars.len() {
        return Err(InterpretingError::IndexOutOfBounds);
    }
    Ok(Some(DataObject::text(chars[start as usize..end as usize].iter().collect::<String>())))
}

fn char_at(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 2)?;
    let index = int(args[1])?;
    let c = usize::try_from(index)
        .ok()
        .and_then(|i| args[0].to_text().chars().nth(i))
        .ok_or(InterpretingError::IndexOutOfBounds)?;
    Ok(Some(DataObject::new(DataValue::Char(c))))
}

/// `func.split(text, regex)` returns an array of the pieces.
fn split(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 2)?;
    let regex = compile(&args[1].to_text())?;
    let text = args[0].to_text();
    let parts = regex.split(&text).map(DataObject::text).collect();
    Ok(Some(DataObject::array(parts)))
}

/// `func.repeatText(count, text)`
fn repeat_text(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let (count, text) = split_first(args).ok_or(InterpretingError::InvalidArgCount)?;
    let count = int(count)?;
    if count < 0 {
        return Err(InterpretingError::NegativeRepeatCount);
    }
    Ok(Some(DataObject::text(text.repeat(count as usize))))
}

fn to_char(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 1)?;
    let code = int(args[0])?;
    let c = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or(InterpretingError::NoChar)?;
    Ok(Some(DataObject::new(DataValue::Char(c))))
}

fn to_number(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let text = combined_text(args);
    let number = parse_number(&text).ok_or(InterpretingError::NoNum)?;
    Ok(Some(number.into()))
}

/// `0x`-prefixed hex text to Int.
fn hex_to_dez(_interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let text = combined_text(args);
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or(InterpretingError::NoHexNum)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(InterpretingError::NoHexNum);
    }
    // Int only; larger values are not wrapped into negatives.
    let value = i32::from_str_radix(digits, 16).map_err(|_| InterpretingError::NoNum)?;
    Ok(Some(DataObject::int(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expression: &str) -> (String, i32) {
        let mut interp = Interpreter::new();
        interp.run_str(&format!("$r = {}", expression));
        (interp.get_var("$r").unwrap().to_text(), interp.errno())
    }

    #[test]
    fn case_and_length() {
        assert_eq!(eval("func.len(abc, d)").0, "6");
        assert_eq!(eval("func.toUpper(abc)").0, "ABC");
        assert_eq!(eval("func.toLower(AbC)").0, "abc");
    }

    #[test]
    fn regex_functions() {
        assert_eq!(eval("func.replace(a1b22c, [0-9]+, -)").0, "a-b-c");
        assert_eq!(eval("func.split(a1b22c, [0-9]+)").0, "[a, b, c]");
        assert_eq!(eval("func.replace(abc, \\(, x)").1, InterpretingError::InvalidArguments.code());
    }

    #[test]
    fn substring_bounds() {
        assert_eq!(eval("func.substring(hello, 1, 3)").0, "el");
        assert_eq!(eval("func.substring(hello, 2)").0, "llo");
        assert_eq!(eval("func.substring(hello, 2, 9)").1, InterpretingError::IndexOutOfBounds.code());
        assert_eq!(eval("func.charAt(hello, 4)").0, "o");
    }

    #[test]
    fn repeat_text_counts() {
        assert_eq!(eval("func.repeatText(3, ab)").0, "ababab");
        assert_eq!(eval("func.repeatText(-1, ab)").1, InterpretingError::NegativeRepeatCount.code());
    }

    #[test]
    fn conversions() {
        assert_eq!(eval("func.toChar(65)").0, "A");
        assert_eq!(eval("func.toNumber(42)").0, "42");
        assert_eq!(eval("func.toNumber(abc)").1, InterpretingError::NoNum.code());
        assert_eq!(eval("func.hexToDez(0xff)").0, "255");
        assert_eq!(eval("func.hexToDez(ff)").1, InterpretingError::NoHexNum.code());
    }

    #[test]
    fn hex_to_dez_stays_in_int_range() {
        assert_eq!(eval("func.hexToDez(0x7FFFFFFF)").0, "2147483647");
        assert_eq!(eval("func.hexToDez(0xFFFFFFFF)").1, InterpretingError::NoNum.code());
        assert_eq!(eval("func.hexToDez(0x1FFFFFFFFFFFFFFFF)").1, InterpretingError::NoNum.code());
        assert_eq!(eval("func.hexToDez(0xfg)").1, InterpretingError::NoHexNum.code());
    }
}
