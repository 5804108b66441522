// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Assignment: variables, pointer targets and translation keys.

use lang_ast::{Node, ParameterKind};

use crate::errors::InterpretingError;
use crate::scope::{is_reserved_name, LANG_ERRNO};
use crate::value::{DataObject, DataValue};

use super::Interpreter;

/// `&` variables hold arrays and `fp.` variables hold function pointers.
fn check_kind(name: &str, value: &DataObject) -> Result<(), InterpretingError> {
    match (ParameterKind::of_name(name), value.value()) {
        (_, DataValue::Null) => Ok(()),
        (Some(ParameterKind::Array), DataValue::Array(_)) => Ok(()),
        (Some(ParameterKind::Array), _) => Err(InterpretingError::InvalidArrPtr),
        (Some(ParameterKind::FunctionPointer), DataValue::FunctionPointer(_)) => Ok(()),
        (Some(ParameterKind::FunctionPointer), _) => Err(InterpretingError::InvalidFuncPtr),
        _ => Ok(()),
    }
}

fn check_writable(name: &str) -> Result<(), InterpretingError> {
    if is_reserved_name(name) && name != LANG_ERRNO {
        Err(InterpretingError::FinalVarChange)
    } else {
        Ok(())
    }
}

impl Interpreter {
    pub(crate) fn interpret_assignment(
        &mut self,
        lvalue: &Node,
        rvalue: &Node,
        scope_id: usize,
    ) -> Option<DataObject> {
        let value = self.interpret_node(rvalue, scope_id);
        // An interrupted rvalue leaves the target untouched.
        if self.is_stopped() {
            return None;
        }
        let value = value.unwrap_or_else(DataObject::null);

        let result = match lvalue {
            Node::VariableName(name) if name.starts_with("$[") => {
                self.assign_through_pointer(name, &value, scope_id)
            }
            Node::VariableName(name) => self.assign_variable(name, &value, scope_id),
            key => {
                let key = self
                    .interpret_node(key, scope_id)
                    .map(|k| k.to_text())
                    .unwrap_or_default();
                match self.scope_mut(scope_id) {
                    Some(scope) => {
                        scope.translations.insert(key, value.to_text());
                        Ok(())
                    }
                    None => Err(InterpretingError::SystemError),
                }
            }
        };

        match result {
            Ok(()) => None,
            Err(error) => Some(self.error_value(error, scope_id)),
        }
    }

    /// Create or update `name` in place, so pointers to the cell see the
    /// new value.
    pub(crate) fn assign_variable(
        &mut self,
        name: &str,
        value: &DataObject,
        scope_id: usize,
    ) -> Result<(), InterpretingError> {
        check_writable(name)?;
        check_kind(name, value)?;

        let scope = self.scope_mut(scope_id).ok_or(InterpretingError::SystemError)?;
        match scope.get_var(name) {
            Some(cell) => {
                if !cell.borrow_mut().set_data(value) {
                    return Err(InterpretingError::FinalVarChange);
                }
            }
            None => {
                scope.insert_var(name, value.value().clone());
            }
        }
        Ok(())
    }

    /// `$[x] = v` follows at most one pointer per bracket level, stopping
    /// at the first cell that does not hold a pointer, and writes there.
    fn assign_through_pointer(
        &mut self,
        name: &str,
        value: &DataObject,
        scope_id: usize,
    ) -> Result<(), InterpretingError> {
        let depth = name[1..].chars().take_while(|c| *c == '[').count();
        let inner = name.trim_start_matches(['$', '[']).trim_end_matches(']');
        let target = format!("${}", inner);

        let mut cell = self
            .scope(scope_id)
            .and_then(|s| s.get_var(&target))
            .cloned()
            .ok_or(InterpretingError::InvalidPtr)?;

        for _ in 0..depth {
            let next = match cell.borrow().value() {
                DataValue::VarPointer(pointer) => Some(pointer.cell().clone()),
                _ => None,
            };
            match next {
                Some(next) => cell = next,
                None => break,
            }
        }

        let mut target = cell.borrow_mut();
        if let Some(name) = target.variable_name() {
            check_writable(name)?;
            check_kind(name, value)?;
        }
        if !target.set_data(value) {
            return Err(InterpretingError::FinalVarChange);
        }
        Ok(())
    }
}
