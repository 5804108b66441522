// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Loading other `.lang` files into the running program.

use std::path::Path;
use std::rc::Rc;
use std::cell::RefCell;

use crate::errors::InterpretingError;
use crate::scope::{is_reserved_name, Scope};
use crate::value::DataObject;

use super::Interpreter;

/// What a linked file hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkMode {
    /// Translations, except `lang.*` keys
    Link,
    /// Variables, except reserved ones
    BindLibrary,
}

impl Interpreter {
    /// Run `file` in a fresh frame and merge its results into `caller_id`.
    pub(crate) fn link_file(
        &mut self,
        file: &str,
        mode: LinkMode,
        caller_id: usize,
    ) -> Result<DataObject, InterpretingError> {
        if self.link_depth >= self.config.max_link_depth {
            return Err(InterpretingError::ToManyInnerLinks);
        }

        let base = self.scope(caller_id).map(Scope::lang_path).unwrap_or_default();
        let path = self.platform.lang_path(Path::new(&base), file);
        if path.extension().map_or(true, |ext| ext != "lang") {
            return Err(InterpretingError::NoLangFile);
        }
        let source = self.platform.read_lang_file(&path).map_err(|err| {
            tracing::debug!(path = %path.display(), error = %err, "linked file not readable");
            InterpretingError::FileNotFound
        })?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        tracing::debug!(path = %path.display(), ?mode, depth = self.link_depth + 1, "linking file");

        let ast = lang_parser::parse_str(&source);
        self.scopes.push(Scope::new(&self.config, &dir.to_string_lossy()));
        let scope_id = self.scopes.len() - 1;

        self.link_depth += 1;
        self.interpret_lines(&ast, scope_id);
        self.link_depth -= 1;

        let result = self.take_return_value();
        let Some(linked) = self.scopes.pop() else {
            return Ok(result.unwrap_or_else(DataObject::void));
        };

        match mode {
            LinkMode::Link => {
                if let Some(caller) = self.scope_mut(caller_id) {
                    for (key, value) in linked.translations {
                        if !key.starts_with("lang.") {
                            caller.translations.insert(key, value);
                        }
                    }
                }
            }
            LinkMode::BindLibrary => {
                if let Some(caller) = self.scope_mut(caller_id) {
                    bind_variables(caller, &linked);
                }
            }
        }

        Ok(result.unwrap_or_else(DataObject::void))
    }
}

fn bind_variables(caller: &mut Scope, linked: &Scope) {
    for (name, cell) in &linked.vars {
        if is_reserved_name(name) {
            continue;
        }
        let value = cell.borrow().clone();
        match caller.vars.get(name) {
            Some(existing) => {
                let mut existing = existing.borrow_mut();
                if !existing.is_final() {
                    existing.set_data(&value);
                }
            }
            None => {
                caller
                    .vars
                    .insert(name.clone(), Rc::new(RefCell::new(value)));
            }
        }
    }
}
