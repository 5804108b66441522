// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The interpreter implementation.
//!
//! A tree-walk interpreter over the parsed node list. Variables are not
//! resolved at parse time; every name is looked up in the active frame
//! when its node is evaluated.

use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use indexmap::{IndexMap, IndexSet};

mod assign;
mod call;
mod condition;
mod exec_node;
mod linker;
mod resolve;

pub(crate) use linker::LinkMode;

use crate::builtins::BuiltinRegistry;
use crate::config::LangConfig;
use crate::errors::{InterpretingError, LangError};
use crate::host::{Level, NativePlatform, Platform, Terminal};
use crate::scope::{Scope, LANG_ERRNO, LANG_PATH};
use crate::value::{DataObject, DataValue, ExternalFunction, FunctionPointerObject};

/// The tree-walk interpreter.
pub struct Interpreter {
    /// Frame stack; index = scope id.
    pub(crate) scopes: Vec<Scope>,
    pub(crate) builtins: BuiltinRegistry,
    pub(crate) config: LangConfig,
    pub(crate) platform: Box<dyn Platform>,
    pub(crate) terminal: Option<Box<dyn Terminal>>,
    /// Optional output buffer for capturing stdout (used in tests).
    output_buffer: Option<Arc<Mutex<String>>>,
    interrupt: Arc<AtomicBool>,
    /// Set by `return` until the enclosing call or script picks it up.
    stopped: bool,
    return_value: Option<DataObject>,
    pub(crate) link_depth: usize,
    /// Deprecated builtins already reported, as `func.name`.
    pub(crate) warned_deprecations: IndexSet<String>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(LangConfig::default())
    }

    pub fn with_config(config: LangConfig) -> Self {
        let global = Scope::new(&config, ".");
        Self {
            scopes: vec![global],
            builtins: BuiltinRegistry::new(),
            config,
            platform: Box::new(NativePlatform),
            terminal: None,
            output_buffer: None,
            interrupt: Arc::new(AtomicBool::new(false)),
            stopped: false,
            return_value: None,
            link_depth: 0,
            warned_deprecations: IndexSet::new(),
        }
    }

    /// Returns interpreter and output buffer reference.
    pub fn with_captured_output() -> (Self, Arc<Mutex<String>>) {
        Self::with_config_captured(LangConfig::default())
    }

    pub fn with_config_captured(config: LangConfig) -> (Self, Arc<Mutex<String>>) {
        let buffer = Arc::new(Mutex::new(String::new()));
        let mut interp = Self::with_config(config);
        interp.output_buffer = Some(Arc::clone(&buffer));
        (interp, buffer)
    }

    pub fn set_platform(&mut self, platform: Box<dyn Platform>) {
        self.platform = platform;
    }

    pub fn set_terminal(&mut self, terminal: Box<dyn Terminal>) {
        self.terminal = Some(terminal);
    }

    pub fn config(&self) -> &LangConfig {
        &self.config
    }

    /// Flag that stops execution at the next node boundary when set.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Bind a host callback to `fp.<name>` in the global frame.
    pub fn register_external<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&mut Interpreter, &[DataObject], usize) -> Option<DataObject> + 'static,
    {
        let function: ExternalFunction = Rc::new(function);
        let fp = FunctionPointerObject::External {
            name: name.to_string(),
            function,
        };
        self.scopes[0].insert_var(
            &format!("fp.{}", name),
            DataValue::FunctionPointer(Rc::new(fp)),
        );
    }

    /// Rebase the global frame's `$LANG_PATH`.
    pub fn set_lang_path(&mut self, path: &str) {
        let mut global = Scope::new(&self.config, path);
        let old = std::mem::take(&mut self.scopes[0]);
        for (name, cell) in old.vars {
            if name != LANG_PATH {
                global.vars.insert(name, cell);
            }
        }
        global.translations = old.translations;
        self.scopes[0] = global;
    }

    /// Parse and run a script in the global frame. Returns the value of a
    /// top-level `return`.
    pub fn run_str(&mut self, source: &str) -> Option<DataObject> {
        let ast = lang_parser::parse_str(source);
        self.run_ast(&ast)
    }

    pub fn run_ast(&mut self, ast: &[lang_ast::Node]) -> Option<DataObject> {
        self.interpret_lines(ast, 0);
        self.take_return_value()
    }

    /// Run a `.lang` file in the global frame, with `$LANG_PATH` set to its
    /// directory.
    pub fn run_file(&mut self, path: &Path) -> Result<Option<DataObject>, LangError> {
        if path.extension().map_or(true, |ext| ext != "lang") {
            return Err(LangError::NotLangFile(path.to_path_buf()));
        }
        let source = self.platform.read_lang_file(path).map_err(|source| LangError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        self.set_lang_path(&dir.to_string_lossy());

        tracing::debug!(path = %path.display(), "running file");
        Ok(self.run_str(&source))
    }

    /// Write the global translation table through the platform.
    pub fn write_translations(&self, path: &Path) -> Result<(), LangError> {
        self.platform
            .write_lang_file(path, self.translations())
            .map_err(|source| LangError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    /// `$LANG_ERRNO` of the global frame.
    pub fn errno(&self) -> i32 {
        self.get_errno(0)
    }

    pub fn get_errno(&self, scope_id: usize) -> i32 {
        self.scopes.get(scope_id).map_or(0, Scope::errno)
    }

    /// Value of a variable in the global frame.
    pub fn get_var(&self, name: &str) -> Option<DataObject> {
        self.scopes[0].get_var(name).map(|cell| cell.borrow().clone())
    }

    /// The global translation table.
    pub fn translations(&self) -> &IndexMap<String, String> {
        &self.scopes[0].translations
    }

    pub fn get_translation(&self, key: &str) -> Option<&str> {
        self.scopes[0].translations.get(key).map(String::as_str)
    }

    /// Store an error code in the frame's `$LANG_ERRNO`.
    pub fn set_errno(&mut self, error: InterpretingError, scope_id: usize) {
        tracing::debug!(code = error.code(), error = %error, scope_id, "errno set");
        if let Some(cell) = self.scopes.get(scope_id).and_then(|s| s.get_var(LANG_ERRNO)) {
            cell.borrow_mut().set_value(DataValue::Int(error.code()));
        }
    }

    /// Set errno and build the error value returned in place of a result.
    pub fn error_value(&mut self, error: InterpretingError, scope_id: usize) -> DataObject {
        self.set_errno(error, scope_id);
        DataObject::error(error)
    }

    pub(crate) fn take_return_value(&mut self) -> Option<DataObject> {
        self.stopped = false;
        self.return_value.take()
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped || self.is_interrupted()
    }

    pub(crate) fn write_output(&self, s: &str) {
        if let Some(buf) = &self.output_buffer {
            if let Ok(mut buf) = buf.lock() {
                buf.push_str(s);
            }
        } else {
            print!("{}", s);
        }
    }

    /// Send text to the terminal, or to stderr when there is none.
    /// Returns `false` when the fallback was used.
    pub(crate) fn log_terminal(&mut self, level: Level, text: &str, tag: &str) -> bool {
        match self.terminal.as_mut() {
            Some(terminal) => {
                terminal.log(level, text, tag);
                true
            }
            None => {
                if let Some(buf) = &self.output_buffer {
                    if let Ok(mut buf) = buf.lock() {
                        buf.push_str(&format!("[{}] {}\n", level.name(), text));
                    }
                } else {
                    eprintln!("[{}] {}", level.name(), text);
                }
                false
            }
        }
    }

    pub(crate) fn scope(&self, scope_id: usize) -> Option<&Scope> {
        self.scopes.get(scope_id)
    }

    pub(crate) fn scope_mut(&mut self, scope_id: usize) -> Option<&mut Scope> {
        self.scopes.get_mut(scope_id)
    }

    /// Push a frame for a call made from `caller_id`, copying the caller's
    /// variables and translations. Returns the new scope id.
    pub(crate) fn push_call_frame(&mut self, caller_id: usize) -> usize {
        let lang_path = self.scopes.get(caller_id).map(Scope::lang_path).unwrap_or_default();
        let mut frame = Scope::new(&self.config, &lang_path);
        if let Some(caller) = self.scopes.get(caller_id) {
            caller.copy_vars_into(&mut frame);
            frame.translations = caller.translations.clone();
        }
        self.scopes.push(frame);
        self.scopes.len() - 1
    }

    /// Pop a call frame, merging translations and applying copy-after-call
    /// directives into the caller.
    pub(crate) fn pop_call_frame(&mut self, caller_id: usize) {
        let Some(frame) = self.scopes.pop() else {
            return;
        };
        if let Some(caller) = self.scopes.get_mut(caller_id) {
            caller.translations.extend(frame.translations.clone());
        }
        self.apply_copy_after_call(&frame, caller_id);
    }
}
