// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Scope frames.
//!
//! Every user function call, `func.exec` and linker load runs in its own
//! frame. A frame's index in the stack is its scope id.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::config::LangConfig;
use crate::value::{Cell, DataObject, DataValue};

pub const LANG_COMPILER_VERSION: &str = "$LANG_COMPILER_VERSION";
pub const LANG_PATH: &str = "$LANG_PATH";
pub const LANG_RAND_MAX: &str = "$LANG_RAND_MAX";
pub const LANG_ERRNO: &str = "$LANG_ERRNO";

/// Names starting with `$LANG_` or `&LANG_` belong to the interpreter.
pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with("$LANG_") || name.starts_with("&LANG_")
}

/// A pending `func.copyAfterFP` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyAfterCall {
    /// Variable in the caller frame
    pub to: String,
    /// Variable in this frame
    pub from: String,
}

/// One frame of the scope stack.
#[derive(Debug, Default)]
pub struct Scope {
    pub translations: IndexMap<String, String>,
    pub vars: IndexMap<String, Cell>,
    pub copy_after_call: Vec<CopyAfterCall>,
}

impl Scope {
    /// A frame holding only the reserved variables.
    pub fn new(config: &LangConfig, lang_path: &str) -> Self {
        let mut scope = Scope::default();

        let mut insert_final = |name: &str, value: DataValue| {
            let mut object = DataObject::named(value, name);
            object.set_final();
            scope.vars.insert(name.to_string(), Rc::new(RefCell::new(object)));
        };
        insert_final(LANG_COMPILER_VERSION, DataValue::Text(config.version.clone()));
        insert_final(LANG_PATH, DataValue::Text(lang_path.to_string()));
        insert_final(LANG_RAND_MAX, DataValue::Int(config.rand_max));

        scope.vars.insert(
            LANG_ERRNO.to_string(),
            Rc::new(RefCell::new(DataObject::named(DataValue::Int(0), LANG_ERRNO))),
        );
        scope
    }

    pub fn get_var(&self, name: &str) -> Option<&Cell> {
        self.vars.get(name)
    }

    /// Bind `value` under `name` in a fresh cell.
    pub fn insert_var(&mut self, name: &str, value: DataValue) -> Cell {
        let cell = Rc::new(RefCell::new(DataObject::named(value, name)));
        self.vars.insert(name.to_string(), Rc::clone(&cell));
        cell
    }

    pub fn lang_path(&self) -> String {
        self.vars
            .get(LANG_PATH)
            .map(|cell| cell.borrow().to_text())
            .unwrap_or_default()
    }

    pub fn errno(&self) -> i32 {
        self.vars
            .get(LANG_ERRNO)
            .and_then(|cell| cell.borrow().to_number())
            .map_or(0, |n| n.as_i32())
    }

    /// Copy every non-reserved variable into `target` as new cells.
    pub fn copy_vars_into(&self, target: &mut Scope) {
        for (name, cell) in &self.vars {
            if is_reserved_name(name) {
                continue;
            }
            target
                .vars
                .insert(name.clone(), Rc::new(RefCell::new(cell.borrow().clone())));
        }
    }
}
