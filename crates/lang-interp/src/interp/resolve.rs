// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Late-bound name resolution.
//!
//! The parser has no symbol table, so `$abc` might mean the variable
//! `$abc`, the variable `$ab` followed by the text `c`, or just text. The
//! longest live variable name that prefixes the token wins.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::{DataObject, DataValue, FunctionPointerObject, VarPointerObject};

use super::Interpreter;

impl Interpreter {
    pub(crate) fn resolve_name(&mut self, name: &str, scope_id: usize) -> DataObject {
        if let Some(rest) = name.strip_prefix("func.") {
            return self.resolve_builtin(name, rest, false);
        }
        if let Some(rest) = name.strip_prefix("linker.") {
            return self.resolve_builtin(name, rest, true);
        }
        if name.starts_with("$[") {
            return self.resolve_pointer(name, scope_id);
        }

        let Some(scope) = self.scope(scope_id) else {
            return DataObject::text(name);
        };
        // Shortest candidate keeps the sigil plus one character.
        let min_len = if name.starts_with("fp.") { 4 } else { 2 };
        for len in (min_len..=name.len()).rev() {
            if !name.is_char_boundary(len) {
                continue;
            }
            if let Some(cell) = scope.get_var(&name[..len]) {
                let value = cell.borrow().clone();
                return with_trailing_text(value, &name[len..]);
            }
        }
        DataObject::text(name)
    }

    fn resolve_builtin(&self, name: &str, rest: &str, linker: bool) -> DataObject {
        match self.builtins.longest_prefix(rest, linker) {
            Some(builtin) => {
                let fp = FunctionPointerObject::Predefined {
                    name: builtin.to_string(),
                    linker,
                };
                with_trailing_text(DataObject::function_pointer(fp), &rest[builtin.len()..])
            }
            None => DataObject::text(name),
        }
    }

    /// `$[x]` points at the cell of `$x`; each further bracket level wraps
    /// the previous pointer in a new anonymous cell.
    fn resolve_pointer(&self, name: &str, scope_id: usize) -> DataObject {
        let depth = name[1..].chars().take_while(|c| *c == '[').count();
        let inner = name.trim_start_matches(['$', '[']).trim_end_matches(']');
        let target = format!("${}", inner);

        let Some(cell) = self.scope(scope_id).and_then(|s| s.get_var(&target)) else {
            return DataObject::text(name);
        };

        let mut pointer = VarPointerObject::new(Rc::clone(cell));
        for _ in 1..depth {
            let wrapper = DataObject::new(DataValue::VarPointer(pointer));
            pointer = VarPointerObject::new(Rc::new(RefCell::new(wrapper)));
        }
        DataObject::new(DataValue::VarPointer(pointer))
    }
}

fn with_trailing_text(value: DataObject, rest: &str) -> DataObject {
    if rest.is_empty() {
        value
    } else {
        DataObject::text(format!("{}{}", value.to_text(), rest))
    }
}

#[cfg(test)]
mod tests {
    use crate::value::DataValue;
    use crate::Interpreter;

    #[test]
    fn longest_prefix_wins() {
        let mut interp = Interpreter::new();
        interp.run_str("$ab = short\n$abc = long");
        assert_eq!(interp.resolve_name("$abc", 0).to_text(), "long");
        assert_eq!(interp.resolve_name("$abd", 0).to_text(), "shortd");
        assert_eq!(interp.resolve_name("$zzz", 0).to_text(), "$zzz");
    }

    #[test]
    fn full_match_keeps_type_and_name() {
        let mut interp = Interpreter::new();
        interp.run_str("$n = 5");
        let value = interp.resolve_name("$n", 0);
        assert!(matches!(value.value(), DataValue::Int(5)));
        assert_eq!(value.variable_name(), Some("$n"));
    }

    #[test]
    fn builtin_names_resolve_to_function_pointers() {
        let mut interp = Interpreter::new();
        let value = interp.resolve_name("func.addi", 0);
        assert!(value.as_function_pointer().is_some());
        assert_eq!(interp.resolve_name("func.nope", 0).to_text(), "func.nope");
        assert!(interp.resolve_name("linker.link", 0).as_function_pointer().is_some());
        assert_eq!(interp.resolve_name("linker.addi", 0).to_text(), "linker.addi");
    }

    #[test]
    fn pointers_follow_brackets() {
        let mut interp = Interpreter::new();
        interp.run_str("$x = 1");
        assert_eq!(interp.resolve_name("$[x]", 0).to_text(), "VP -> $x");
        assert_eq!(interp.resolve_name("$[[x]]", 0).to_text(), "VP -> VP -> $x");
        assert_eq!(interp.resolve_name("$[y]", 0).to_text(), "$[y]");
    }
}
