// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Clock and sleep.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::errors::InterpretingError;
use crate::interp::Interpreter;
use crate::value::DataObject;

use super::{arguments, expect_count, number, BuiltinRegistry, BuiltinResult};

/// Longest uninterrupted sleep between interrupt checks.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

pub(super) fn register(registry: &mut BuiltinRegistry) {
    registry.add("currentTimeMillis", current_time_millis);
    registry.add("sleep", sleep);
}

fn current_time_millis(_interp: &mut Interpreter, _args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| InterpretingError::SystemError)?
        .as_millis();
    Ok(Some(DataObject::long(millis as i64)))
}

fn sleep(interp: &mut Interpreter, args: &[DataObject], _scope_id: usize) -> BuiltinResult {
    let args = arguments(args);
    expect_count(&args, 1)?;
    let millis = number(args[0])?.as_i64();
    if millis < 0 {
        return Err(InterpretingError::InvalidArguments);
    }

    let deadline = Instant::now() + Duration::from_millis(millis as u64);
    loop {
        if interp.is_interrupted() {
            return Err(InterpretingError::SystemError);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        std::thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sleep_waits() {
        let mut interp = Interpreter::new();
        let start = Instant::now();
        interp.run_str("func.sleep(20)");
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(interp.errno(), 0);
    }

    #[test]
    fn sleep_rejects_text() {
        let mut interp = Interpreter::new();
        interp.run_str("func.sleep(soon)");
        assert_eq!(interp.errno(), InterpretingError::NoNum.code());
    }

    #[test]
    fn clock_is_positive() {
        let mut interp = Interpreter::new();
        interp.run_str("$t = func.currentTimeMillis()");
        let t = interp.get_var("$t").unwrap().to_number().unwrap().as_i64();
        assert!(t > 0);
    }
}
