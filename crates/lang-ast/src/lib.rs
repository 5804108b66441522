// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the Lang scripting language.
//!
//! This crate defines the nodes shared between the lexer, parser and
//! interpreter. Nodes are built once by the parser and never mutated while
//! a script runs.

pub mod span;
pub mod token;
pub mod node;
pub mod condition;
pub mod error;

pub use condition::{Condition, ConditionOperator};
pub use error::ParsingError;
pub use node::{FunctionDefinition, IfStatementPart, Node, Parameter, ParameterKind};
pub use span::Span;

/// A parsed program: the sequence of top-level nodes.
pub type Ast = Vec<Node>;
