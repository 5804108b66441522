// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Predefined `func.*` and `linker.*` functions.
//!
//! Every builtin receives the evaluated argument list, argument separators
//! included, and the scope id of the caller. A builtin reports failure by
//! returning an [`InterpretingError`]; the dispatcher turns it into an
//! error value and sets `$LANG_ERRNO`.

mod arrays;
mod functions;
mod io;
mod math;
mod state;
mod text;
mod time;

use indexmap::IndexMap;

use crate::errors::InterpretingError;
use crate::interp::{Interpreter, LinkMode};
use crate::value::{DataObject, Number};

pub(crate) type BuiltinResult = Result<Option<DataObject>, InterpretingError>;
pub(crate) type BuiltinFn = fn(&mut Interpreter, &[DataObject], usize) -> BuiltinResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Deprecation {
    pub remove_version: &'static str,
    pub replacement: Option<&'static str>,
}

#[derive(Clone, Copy)]
pub(crate) struct BuiltinEntry {
    pub func: BuiltinFn,
    pub deprecation: Option<Deprecation>,
}

/// Name to implementation maps for both builtin namespaces.
pub(crate) struct BuiltinRegistry {
    functions: IndexMap<&'static str, BuiltinEntry>,
    linker: IndexMap<&'static str, BuiltinEntry>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: IndexMap::new(),
            linker: IndexMap::new(),
        };
        state::register(&mut registry);
        time::register(&mut registry);
        io::register(&mut registry);
        text::register(&mut registry);
        math::register(&mut registry);
        arrays::register(&mut registry);
        functions::register(&mut registry);

        registry.linker.insert("link", BuiltinEntry { func: link, deprecation: None });
        registry
            .linker
            .insert("bindLibrary", BuiltinEntry { func: bind_library, deprecation: None });
        registry
    }

    pub(crate) fn add(&mut self, name: &'static str, func: BuiltinFn) {
        self.functions.insert(name, BuiltinEntry { func, deprecation: None });
    }

    pub(crate) fn add_deprecated(
        &mut self,
        name: &'static str,
        func: BuiltinFn,
        remove_version: &'static str,
        replacement: &'static str,
    ) {
        let deprecation = Deprecation {
            remove_version,
            replacement: Some(replacement),
        };
        self.functions.insert(name, BuiltinEntry { func, deprecation: Some(deprecation) });
    }

    fn table(&self, linker: bool) -> &IndexMap<&'static str, BuiltinEntry> {
        if linker {
            &self.linker
        } else {
            &self.functions
        }
    }

    pub fn get(&self, name: &str, linker: bool) -> Option<&BuiltinEntry> {
        self.table(linker).get(name)
    }

    /// The longest registered name that `rest` starts with.
    pub fn longest_prefix(&self, rest: &str, linker: bool) -> Option<&'static str> {
        let table = self.table(linker);
        (1..=rest.len())
            .rev()
            .filter(|len| rest.is_char_boundary(*len))
            .find_map(|len| table.get_key_value(&rest[..len]).map(|(name, _)| *name))
    }

    pub fn names(&self, linker: bool) -> impl Iterator<Item = &'static str> + '_ {
        self.table(linker).keys().copied()
    }
}

impl Interpreter {
    /// Registered `func.*` names, or `linker.*` names when `linker` is set.
    pub fn builtin_names(&self, linker: bool) -> Vec<&'static str> {
        self.builtins.names(linker).collect()
    }
}

fn link(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let file = combined_text(args);
    interp.link_file(file.trim(), LinkMode::Link, scope_id).map(Some)
}

fn bind_library(interp: &mut Interpreter, args: &[DataObject], scope_id: usize) -> BuiltinResult {
    let file = combined_text(args);
    interp.link_file(file.trim(), LinkMode::BindLibrary, scope_id).map(Some)
}

// Argument helpers

/// Argument values without separators.
pub(crate) fn arguments(args: &[DataObject]) -> Vec<&DataObject> {
    args.iter().filter(|arg| !arg.is_argument_separator()).collect()
}

pub(crate) fn expect_count(args: &[&DataObject], count: usize) -> Result<(), InterpretingError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(InterpretingError::InvalidArgCount)
    }
}

pub(crate) fn expect_range(args: &[&DataObject], min: usize, max: usize) -> Result<(), InterpretingError> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(InterpretingError::InvalidArgCount)
    }
}

/// All arguments as one text, separators included.
pub(crate) fn combined_text(args: &[DataObject]) -> String {
    args.iter().map(DataObject::to_text).collect()
}

/// The first argument, and the text of everything after the first separator.
pub(crate) fn split_first(args: &[DataObject]) -> Option<(&DataObject, String)> {
    let (first, rest) = args.split_first()?;
    let rest = match rest.split_first() {
        Some((sep, rest)) if sep.is_argument_separator() => rest,
        _ => rest,
    };
    Some((first, combined_text(rest)))
}

pub(crate) fn number(arg: &DataObject) -> Result<Number, InterpretingError> {
    arg.to_number().ok_or(InterpretingError::NoNum)
}

pub(crate) fn int(arg: &DataObject) -> Result<i32, InterpretingError> {
    number(arg).map(Number::as_i32)
}
