// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function calling, `func.exec` and copy-after-call.

use std::cell::RefCell;
use std::rc::Rc;

use lang_ast::{FunctionDefinition, Parameter, ParameterKind};

use crate::errors::InterpretingError;
use crate::host::Level;
use crate::scope::Scope;
use crate::value::{DataObject, DataValue, FunctionPointerObject};

use super::Interpreter;

impl Interpreter {
    /// `func.x(...)`, `linker.x(...)` or `fp.x(...)`.
    pub(crate) fn call_named(
        &mut self,
        name: &str,
        args: Vec<DataObject>,
        scope_id: usize,
    ) -> Option<DataObject> {
        let fp = if let Some(builtin) = name.strip_prefix("func.") {
            self.predefined(builtin, false)
        } else if let Some(builtin) = name.strip_prefix("linker.") {
            self.predefined(builtin, true)
        } else {
            self.scope(scope_id)
                .and_then(|s| s.get_var(name))
                .and_then(|cell| cell.borrow().as_function_pointer().cloned())
                .ok_or(InterpretingError::InvalidFuncPtr)
        };

        match fp {
            Ok(fp) => self.call_function_pointer(&fp, args, scope_id),
            Err(error) => Some(self.error_value(error, scope_id)),
        }
    }

    fn predefined(&self, name: &str, linker: bool) -> Result<Rc<FunctionPointerObject>, InterpretingError> {
        match self.builtins.get(name, linker) {
            Some(_) => Ok(Rc::new(FunctionPointerObject::Predefined {
                name: name.to_string(),
                linker,
            })),
            None => Err(InterpretingError::FunctionNotFound),
        }
    }

    /// Invoke any function pointer. Every call path ends up here.
    pub fn call_function_pointer(
        &mut self,
        fp: &FunctionPointerObject,
        args: Vec<DataObject>,
        scope_id: usize,
    ) -> Option<DataObject> {
        match fp {
            FunctionPointerObject::Normal(definition) => {
                Some(self.call_normal(definition, &args, scope_id))
            }
            FunctionPointerObject::Predefined { name, linker } => {
                self.call_predefined(name, *linker, &args, scope_id)
            }
            FunctionPointerObject::External { name, function } => {
                tracing::trace!(function = %name, scope_id, "calling external function");
                let function = Rc::clone(function);
                function(self, &args, scope_id)
            }
        }
    }

    fn call_normal(&mut self, definition: &FunctionDefinition, args: &[DataObject], caller_id: usize) -> DataObject {
        if caller_id + 1 >= self.config.max_call_depth {
            return self.error_value(InterpretingError::StackOverflow, caller_id);
        }

        let scope_id = self.push_call_frame(caller_id);
        tracing::debug!(scope_id, params = definition.params.len(), "calling function");

        if let Err(error) = self.bind_parameters(&definition.params, args, scope_id) {
            self.scopes.pop();
            return self.error_value(error, caller_id);
        }

        self.interpret_lines(&definition.body, scope_id);
        let result = self.take_return_value();
        self.pop_call_frame(caller_id);
        result.unwrap_or_else(DataObject::void)
    }

    fn call_predefined(
        &mut self,
        name: &str,
        linker: bool,
        args: &[DataObject],
        scope_id: usize,
    ) -> Option<DataObject> {
        let Some(entry) = self.builtins.get(name, linker).copied() else {
            return Some(self.error_value(InterpretingError::FunctionNotFound, scope_id));
        };
        let prefix = if linker { "linker" } else { "func" };

        if let Some(deprecation) = entry.deprecation {
            let full_name = format!("{}.{}", prefix, name);
            let message = format!(
                "Use of deprecated function \"{}\", this function won't be supported in \"{}\"!{}",
                full_name,
                deprecation.remove_version,
                deprecation
                    .replacement
                    .map(|r| format!(" Use \"{}\" instead!", r))
                    .unwrap_or_default(),
            );
            // Reported once per name; the warning errno is set at every call.
            if self.warned_deprecations.insert(full_name) {
                tracing::warn!(function = %name, "{}", message);
                self.log_terminal(Level::Warning, &message, "Deprecation");
            }
            self.set_errno(InterpretingError::DeprecatedFuncCall, scope_id);
        }

        tracing::trace!(function = %name, linker, scope_id, "calling builtin");
        match (entry.func)(self, args, scope_id) {
            Ok(value) => value,
            Err(error) => Some(self.error_value(error, scope_id)),
        }
    }

    /// Bind arguments to parameters in the callee frame. Missing arguments
    /// are `Void`; a trailing varargs parameter takes everything left.
    fn bind_parameters(
        &mut self,
        params: &[Parameter],
        args: &[DataObject],
        scope_id: usize,
    ) -> Result<(), InterpretingError> {
        let positions: Vec<usize> = args
            .iter()
            .enumerate()
            .filter(|(_, arg)| !arg.is_argument_separator())
            .map(|(i, _)| i)
            .collect();

        for (index, param) in params.iter().enumerate() {
            let value = if param.varargs {
                let start = positions.get(index).copied().unwrap_or(args.len());
                let rest = &args[start..];
                match param.kind {
                    ParameterKind::Var => {
                        DataValue::Text(rest.iter().map(DataObject::to_text).collect())
                    }
                    ParameterKind::Array => DataValue::Array(Rc::new(RefCell::new(
                        rest.iter()
                            .filter(|arg| !arg.is_argument_separator())
                            .map(DataObject::detached)
                            .collect(),
                    ))),
                    ParameterKind::FunctionPointer => return Err(InterpretingError::InvalidAstNode),
                }
            } else {
                match positions.get(index) {
                    Some(&i) => args[i].value().clone(),
                    None => DataValue::Void,
                }
            };

            let accepted = match (param.kind, &value) {
                (_, DataValue::Null | DataValue::Void) | (ParameterKind::Var, _) => true,
                (ParameterKind::Array, DataValue::Array(_)) => true,
                (ParameterKind::FunctionPointer, DataValue::FunctionPointer(_)) => true,
                _ => false,
            };
            if !accepted {
                return Err(match param.kind {
                    ParameterKind::Array => InterpretingError::InvalidArrPtr,
                    _ => InterpretingError::InvalidFuncPtr,
                });
            }

            if let Some(scope) = self.scope_mut(scope_id) {
                scope.insert_var(&param.name, value);
            }
        }
        Ok(())
    }

    /// Parse `code` and run it in a new frame set up like a user call.
    pub(crate) fn exec_code(&mut self, code: &str, caller_id: usize) -> DataObject {
        if caller_id + 1 >= self.config.max_call_depth {
            return self.error_value(InterpretingError::StackOverflow, caller_id);
        }
        let ast = lang_parser::parse_str(code);
        let scope_id = self.push_call_frame(caller_id);
        self.interpret_lines(&ast, scope_id);
        let result = self.take_return_value();
        self.pop_call_frame(caller_id);
        result.unwrap_or_else(DataObject::void)
    }

    /// Run the finished frame's `func.copyAfterFP` directives in order.
    pub(crate) fn apply_copy_after_call(&mut self, frame: &Scope, caller_id: usize) {
        for directive in &frame.copy_after_call {
            let Some(cell) = frame.get_var(&directive.from) else {
                continue;
            };
            let value = cell.borrow().clone();
            if value.is_null() {
                continue;
            }
            if let Err(error) = self.assign_variable(&directive.to, &value, caller_id) {
                self.set_errno(error, caller_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::LangConfig;
    use crate::errors::InterpretingError;
    use crate::Interpreter;

    #[test]
    fn user_function_returns_value() {
        let mut interp = Interpreter::new();
        interp.run_str("fp.f = ($a, $b) -> { return func.addi($a, $b) }\n$r = fp.f(2, 3)");
        assert_eq!(interp.get_var("$r").unwrap().to_text(), "5");
    }

    #[test]
    fn missing_arguments_are_void() {
        let mut interp = Interpreter::new();
        interp.run_str("fp.f = ($a, $b) -> {\nreturn [$a|$b]\n}\n$r = fp.f(x)");
        assert_eq!(interp.get_var("$r").unwrap().to_text(), "[x|]");
    }

    #[test]
    fn varargs_text_keeps_separators() {
        let mut interp = Interpreter::new();
        interp.run_str("fp.f = ($first, $rest...) -> { return $rest }\n$r = fp.f(a, b,  c)");
        assert_eq!(interp.get_var("$r").unwrap().to_text(), "b,  c");
    }

    #[test]
    fn varargs_array_collects_values() {
        let mut interp = Interpreter::new();
        interp.run_str("fp.f = (&all...) -> { return &all }\n&r = fp.f(1, 2, 3)");
        assert_eq!(interp.get_var("&r").unwrap().to_text(), "[1, 2, 3]");
    }

    #[test]
    fn callee_changes_do_not_leak() {
        let mut interp = Interpreter::new();
        interp.run_str("$a = 1\nfp.f = () -> {\n$a = 2\n$b = 3\n}\nfp.f()");
        assert_eq!(interp.get_var("$a").unwrap().to_text(), "1");
        assert!(interp.get_var("$b").is_none());
    }

    #[test]
    fn translations_flow_back_to_caller() {
        let mut interp = Interpreter::new();
        interp.run_str("fp.f = () -> { key = value }\nfp.f()");
        assert_eq!(interp.get_translation("key"), Some("value"));
    }

    #[test]
    fn recursion_limit() {
        let mut interp = Interpreter::with_config(LangConfig::default().with_max_call_depth(16));
        interp.run_str("fp.f = () -> { return fp.f() }\n$r = fp.f()");
        assert_eq!(interp.get_var("$r").unwrap().to_text(), "Error 6: Stack overflow");
    }

    #[test]
    fn undefined_function_pointer() {
        let mut interp = Interpreter::new();
        interp.run_str("fp.missing(1)");
        assert_eq!(interp.errno(), InterpretingError::InvalidFuncPtr.code());
        interp.run_str("func.missing(1)");
        assert_eq!(interp.errno(), InterpretingError::FunctionNotFound.code());
    }

    #[test]
    fn previous_value_call_only_for_function_pointers() {
        let mut interp = Interpreter::new();
        interp.run_str("$f = func.addi\n$r = $f(1, 2)\n$t = text(1, 2)");
        assert_eq!(interp.get_var("$r").unwrap().to_text(), "3");
        assert_eq!(interp.get_var("$t").unwrap().to_text(), "text(1, 2)");
    }

    #[test]
    fn copy_after_call() {
        let mut interp = Interpreter::new();
        interp.run_str(
            "$out = 0\nfp.f = () -> {\n$local = 42\nfunc.copyAfterFP($out, $local)\n}\nfp.f()",
        );
        assert_eq!(interp.get_var("$out").unwrap().to_text(), "42");
    }

    #[test]
    fn chained_copy_after_call() {
        let mut interp = Interpreter::new();
        interp.run_str(concat!(
            "$out = 0\n",
            "fp.inner = () -> {\n$mid = 7\nfunc.copyAfterFP($mid, $mid)\n}\n",
            "fp.outer = () -> {\n$mid = 1\nfunc.copyAfterFP($out, $mid)\nfp.inner()\n}\n",
            "fp.outer()",
        ));
        assert_eq!(interp.get_var("$out").unwrap().to_text(), "7");
    }
}
