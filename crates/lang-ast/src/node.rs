// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! AST node definitions.

use std::rc::Rc;

use crate::{Condition, ParsingError};

/// A node of the syntax tree.
///
/// Lang does not separate statements from expressions: a script is a list
/// of nodes and every node may produce a value when evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal text
    Text(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Null,
    Void,
    /// `\c`, holding `c`
    EscapeSequence(char),
    /// `$name`, `&name`, `fp.name`, `func.name`, `linker.name` or a
    /// pointer `$[name]`, resolved by longest prefix at run time
    UnprocessedVariableName(String),
    /// A name already known to be a variable (assignment targets)
    VariableName(String),
    /// Composition of several nodes
    List(Vec<Node>),
    /// `fp.x(...)`, `func.x(...)` or `linker.x(...)`
    FunctionCall { name: String, args: Vec<Node> },
    /// `(...)` following any other node; a call only if that node's value
    /// is a function pointer
    FunctionCallPreviousNodeValue { args: Vec<Node> },
    /// `(params) -> { body }`
    FunctionDefinition(Rc<FunctionDefinition>),
    Assignment { lvalue: Box<Node>, rvalue: Box<Node> },
    /// `con.if` ... `con.endif`
    IfStatement(Vec<IfStatementPart>),
    /// Statements between a line ending in `{` and its `}` line, run in
    /// the enclosing frame
    Block(Vec<Node>),
    Return(Option<Box<Node>>),
    Condition(Box<Condition>),
    /// A comma between arguments, holding its original text (e.g. `", "`)
    ArgumentSeparator(String),
    ParsingError {
        error: ParsingError,
        message: String,
        line: usize,
    },
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn parsing_error(error: ParsingError, message: impl Into<String>, line: usize) -> Self {
        Node::ParsingError {
            error,
            message: message.into(),
            line,
        }
    }

    /// Wrap a list of nodes, collapsing single-element and empty lists.
    pub fn from_list(mut nodes: Vec<Node>) -> Self {
        match nodes.len() {
            0 => Node::Void,
            1 => nodes.remove(0),
            _ => Node::List(nodes),
        }
    }

    /// Short name of the variant, used by `lang parse`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Text(_) => "Text",
            Node::Int(_) => "Int",
            Node::Long(_) => "Long",
            Node::Float(_) => "Float",
            Node::Double(_) => "Double",
            Node::Null => "Null",
            Node::Void => "Void",
            Node::EscapeSequence(_) => "EscapeSequence",
            Node::UnprocessedVariableName(_) => "UnprocessedVariableName",
            Node::VariableName(_) => "VariableName",
            Node::List(_) => "List",
            Node::FunctionCall { .. } => "FunctionCall",
            Node::FunctionCallPreviousNodeValue { .. } => "FunctionCallPreviousNodeValue",
            Node::FunctionDefinition(_) => "FunctionDefinition",
            Node::Assignment { .. } => "Assignment",
            Node::IfStatement(_) => "IfStatement",
            Node::Block(_) => "Block",
            Node::Return(_) => "Return",
            Node::Condition(_) => "Condition",
            Node::ArgumentSeparator(_) => "ArgumentSeparator",
            Node::ParsingError { .. } => "ParsingError",
        }
    }
}

/// A function literal: parameters plus a shared body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub params: Vec<Parameter>,
    pub body: Vec<Node>,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Full name including the sigil, without `...`
    pub name: String,
    pub kind: ParameterKind,
    /// Collects all remaining arguments
    pub varargs: bool,
}

impl Parameter {
    /// Parse a parameter declaration like `$a`, `&list...` or `fp.cb`.
    pub fn parse(decl: &str) -> Option<Parameter> {
        let (base, varargs) = match decl.strip_suffix("...") {
            Some(base) => (base, true),
            None => (decl, false),
        };
        let (kind, ident) = if let Some(rest) = base.strip_prefix('$') {
            (ParameterKind::Var, rest)
        } else if let Some(rest) = base.strip_prefix('&') {
            (ParameterKind::Array, rest)
        } else if let Some(rest) = base.strip_prefix("fp.") {
            (ParameterKind::FunctionPointer, rest)
        } else {
            return None;
        };
        if ident.is_empty() || !ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        if varargs && kind == ParameterKind::FunctionPointer {
            return None;
        }
        Some(Parameter {
            name: base.to_string(),
            kind,
            varargs,
        })
    }
}

/// Which sigil a parameter (or variable) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// `$name`
    Var,
    /// `&name`
    Array,
    /// `fp.name`
    FunctionPointer,
}

impl ParameterKind {
    pub fn of_name(name: &str) -> Option<ParameterKind> {
        if name.starts_with('$') {
            Some(ParameterKind::Var)
        } else if name.starts_with('&') {
            Some(ParameterKind::Array)
        } else if name.starts_with("fp.") {
            Some(ParameterKind::FunctionPointer)
        } else {
            None
        }
    }
}

/// One `con.if`/`con.elif`/`con.else` branch. `condition` is `None` for
/// the else branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatementPart {
    pub condition: Option<Condition>,
    pub body: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_parameters() {
        let p = Parameter::parse("$a").unwrap();
        assert_eq!(p.kind, ParameterKind::Var);
        assert!(!p.varargs);

        let p = Parameter::parse("&rest...").unwrap();
        assert_eq!(p.name, "&rest");
        assert_eq!(p.kind, ParameterKind::Array);
        assert!(p.varargs);

        assert_eq!(Parameter::parse("fp.cb").unwrap().kind, ParameterKind::FunctionPointer);
    }

    #[test]
    fn reject_bad_parameters() {
        assert!(Parameter::parse("a").is_none());
        assert!(Parameter::parse("$").is_none());
        assert!(Parameter::parse("$a-b").is_none());
        assert!(Parameter::parse("fp.cb...").is_none());
    }

    #[test]
    fn from_list_collapses() {
        assert_eq!(Node::from_list(vec![]), Node::Void);
        assert_eq!(Node::from_list(vec![Node::Int(1)]), Node::Int(1));
        assert!(matches!(
            Node::from_list(vec![Node::Int(1), Node::text("a")]),
            Node::List(_)
        ));
    }
}
