// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for the Lang scripting language.
//!
//! Executes the node list produced by `lang-parser` directly. Names are
//! resolved late, against the active scope frame, each time a node runs.

mod builtins;
mod compare;
mod config;
mod errors;
mod host;
mod interp;
mod scope;
mod value;

pub use config::{LangConfig, LANG_VERSION};
pub use errors::{InterpretingError, LangError};
pub use host::{format_translation_file, Level, NativePlatform, Platform, Terminal};
pub use interp::Interpreter;
pub use value::{
    DataObject, DataValue, ErrorObject, ExternalFunction, FunctionPointerObject, Number, VarPointerObject,
};
