// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-width arithmetic.
//!
//! Int and long operations wrap on overflow. The suffix names the result
//! type: `i` Int, `l` Long, `f` Float, `d` Double.

use rand::Rng;

use crate::errors::InterpretingError;
use crate::interp::Interpreter;
use crate::value::{DataObject, DataValue, Number};

use super::{arguments, expect_count, number, BuiltinRegistry, BuiltinResult};

type Op<T> = fn(T, T) -> Result<T, InterpretingError>;

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("addi", |_, args, _| int_op(args, |a, b| Ok(a.wrapping_add(b))));
    registry.add("subi", |_, args, _| int_op(args, |a, b| Ok(a.wrapping_sub(b))));
    registry.add("muli", |_, args, _| int_op(args, |a, b| Ok(a.wrapping_mul(b))));
    registry.add("divi", |_, args, _| int_op(args, |a, b| nonzero(b != 0).map(|_| a.wrapping_div(b))));
    registry.add("modi", |_, args, _| int_op(args, |a, b| nonzero(b != 0).map(|_| a.wrapping_rem(b))));
    registry.add("andi", |_, args, _| int_op(args, |a, b| Ok(a & b)));
    registry.add("ori", |_, args, _| int_op(args, |a, b| Ok(a | b)));
    registry.add("xori", |_, args, _| int_op(args, |a, b| Ok(a ^ b)));
    registry.add("noti", |_, args, _| Ok(Some(DataObject::int(!unary(args)?.as_i32()))));
    registry.add("lshifti", |_, args, _| int_op(args, |a, b| Ok(a.wrapping_shl(b as u32))));
    registry.add("rshifti", |_, args, _| int_op(args, |a, b| Ok(a.wrapping_shr(b as u32))));
    registry.add("rzshifti", |_, args, _| {
        int_op(args, |a, b| Ok((a as u32).wrapping_shr(b as u32) as i32))
    });

    registry.add("addl", |_, args, _| long_op(args, |a, b| Ok(a.wrapping_add(b))));
    registry.add("subl", |_, args, _| long_op(args, |a, b| Ok(a.wrapping_sub(b))));
    registry.add("mull", |_, args, _| long_op(args, |a, b| Ok(a.wrapping_mul(b))));
    registry.add("divl", |_, args, _| long_op(args, |a, b| nonzero(b != 0).map(|_| a.wrapping_div(b))));
    registry.add("modl", |_, args, _| long_op(args, |a, b| nonzero(b != 0).map(|_| a.wrapping_rem(b))));
    registry.add("andl", |_, args, _| long_op(args, |a, b| Ok(a & b)));
    registry.add("orl", |_, args, _| long_op(args, |a, b| Ok(a | b)));
    registry.add("xorl", |_, args, _| long_op(args, |a, b| Ok(a ^ b)));
    registry.add("notl", |_, args, _| Ok(Some(DataObject::long(!unary(args)?.as_i64()))));
    registry.add("lshiftl", |_, args, _| long_op(args, |a, b| Ok(a.wrapping_shl(b as u32))));
    registry.add("rshiftl", |_, args, _| long_op(args, |a, b| Ok(a.wrapping_shr(b as u32))));
    registry.add("rzshiftl", |_, args, _| {
        long_op(args, |a, b| Ok((a as u64).wrapping_shr(b as u32) as i64))
    });

    registry.add("addf", |_, args, _| float_op(args, |a, b| Ok(a + b)));
    registry.add("subf", |_, args, _| float_op(args, |a, b| Ok(a - b)));
    registry.add("mulf", |_, args, _| float_op(args, |a, b| Ok(a * b)));
    registry.add("divf", |_, args, _| float_op(args, |a, b| nonzero(b != 0.0).map(|_| a / b)));

    registry.add("addd", |_, args, _| double_op(args, |a, b| Ok(a + b)));
    registry.add("subd", |_, args, _| double_op(args, |a, b| Ok(a - b)));
    registry.add("muld", |_, args, _| double_op(args, |a, b| Ok(a * b)));
    registry.add("divd", |_, args, _| double_op(args, |a, b| nonzero(b != 0.0).map(|_| a / b)));

    registry.add("itol", |_, args, _| convert(args, |n| Number::Long(n.as_i32() as i64)));
    registry.add("itof", |_, args, _| convert(args, |n| Number::Float(n.as_i32() as f32)));
    registry.add("itod", |_, args, _| convert(args, |n| Number::Double(n.as_i32() as f64)));
    registry.add("ltoi", |_, args, _| convert(args, |n| Number::Int(n.as_i64() as i32)));
    registry.add("ltof", |_, args, _| convert(args, |n| Number::Float(n.as_i64() as f32)));
    registry.add("ltod", |_, args, _| convert(args, |n| Number::Double(n.as_i64() as f64)));
    registry.add("ftoi", |_, args, _| convert(args, |n| Number::Int(n.as_f32() as i32)));
    registry.add("ftol", |_, args, _| convert(args, |n| Number::Long(n.as_f32() as i64)));
    registry.add("ftod", |_, args, _| convert(args, |n| Number::Double(n.as_f32() as f64)));
    registry.add("dtoi", |_, args, _| convert(args, |n| Number::Int(n.as_f64() as i32)));
    registry.add("dtol", |_, args, _| convert(args, |n| Number::Long(n.as_f64() as i64)));
    registry.add("dtof", |_, args, _| convert(args, |n| Number::Float(n.as_f64() as f32)));

    registry.add("pow", |_, args, _| double_op(args, |a, b| Ok(a.powf(b))));
    registry.add("sqrt", |_, args, _| convert(args, |n| Number::Double(n.as_f64().sqrt())));
    registry.add("rand", rand);
}

fn nonzero(ok: bool) -> Result<(), InterpretingError> {
    if ok {
        Ok(())
    } else {
        Err(InterpretingError::DivByZero)
    }
}

fn operands(args: &[DataObject]) -> Result<(Number, Number), InterpretingError> {
    let args = arguments(args);
    expect_count(&args, 2)?;
    Ok((number(args[0])?, number(args[1])?))
}

fn unary(args: &[DataObject]) -> Result<Number, InterpretingError> {
    let args = arguments(args);
    expect_count(&args, 1)?;
    number(args[0])
}

fn int_op(args: &[DataObject], op: Op<i32>) -> BuiltinResult {
    let (a, b) = operands(args)?;
    Ok(Some(DataObject::int(op(a.as_i32(), b.as_i32())?)))
}

fn long_op(args: &[DataObject], op: Op<i64>) -> BuiltinResult {
    let (a, b) = operands(args)?;
    Ok(Some(DataObject::long(op(a.as_i64(), b.as_i64())?)))
}

fn float_op(args: &[DataObject], op: Op<f32>) -> BuiltinResult {
    let (a, b) = operands(args)?;
    Ok(Some(DataObject::new(DataValue::Float(op(a.as_f32(), b.as_f32())?))))
}

fn double_op(args: &[DataObject], op: Op<f64>) -> BuiltinResult {
    let (a, b) = operands(args)?;
    Ok(Some(DataObject::double(op(a.as_f64(), b.as_f64())?)))
}

fn convert(args: &[DataObject], conversion: fn(Number) -> Number) -> BuiltinResult {
    Ok(Some(conversion(unary(args)?).into()))
}

/// Uniform Int in `0..$LANG_RAND_MAX`.
fn rand(interp: &mut Interpreter, _args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let max = interp.config.rand_max.max(1);
    Ok(Some(DataObject::int(rand::thread_rng().gen_range(0..max))))
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
    fn int_arithmetic() {
        assert_eq!(eval("func.addi(2, 3)"), ("5".to_string(), 0));
        assert_eq!(eval("func.subi(2, 3)").0, "-1");
        assert_eq!(eval("func.modi(7, 3)").0, "1");
        assert_eq!(eval("func.addi(2147483647, 1)").0, "-2147483648");
        assert_eq!(eval("func.noti(0)").0, "-1");
        assert_eq!(eval("func.rzshifti(-1, 28)").0, "15");
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(eval("func.divi(4, 0)"), ("Error 14: Dividing by 0".to_string(), 14));
        assert_eq!(eval("func.modl(4, 0)").1, 14);
        assert_eq!(eval("func.divd(1, 0)").1, 14);
    }

    #[test]
    fn non_numbers() {
        assert_eq!(eval("func.addi(a, 1)").1, InterpretingError::NoNum.code());
        assert_eq!(eval("func.addi(1)").1, InterpretingError::InvalidArgCount.code());
    }

    #[test]
    fn widths_and_conversions() {
        assert_eq!(eval("func.addl(2147483647, 1)").0, "2147483648");
        assert_eq!(eval("func.divd(1, 4)").0, "0.25");
        assert_eq!(eval("func.itod(3)").0, "3.0");
        assert_eq!(eval("func.dtoi(3.9)").0, "3");
        assert_eq!(eval("func.pow(2, 10)").0, "1024.0");
        assert_eq!(eval("func.sqrt(16)").0, "4.0");
    }

    #[test]
    fn pure_calls_repeat() {
        let mut interp = Interpreter::new();
        interp.run_str("$a = func.muli(6, 7)\n$b = func.muli(6, 7)");
        let a = interp.get_var("$a").unwrap();
        let b = interp.get_var("$b").unwrap();
        assert!(crate::compare::strict_equals(&a, &b));
    }

    #[test]
    fn rand_respects_bound() {
        let mut interp = Interpreter::new();
        interp.run_str("$r = func.rand()");
        let r = interp.get_var("$r").unwrap().to_number().unwrap().as_i32();
        assert!(r >= 0);
    }
}
