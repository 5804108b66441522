// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parsing error kinds carried by [`Node::ParsingError`](crate::Node::ParsingError).

/// A malformed construct found while parsing.
///
/// The parser never aborts: each error becomes a node in place of the
/// construct, and the interpreter reports it through the errno channel
/// when the node is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParsingError {
    #[error("Bracket mismatch")]
    BracketMismatch,

    #[error("If statement condition missing")]
    IfConditionMissing,

    #[error("End of file was reached early")]
    Eof,

    #[error("Invalid AST node or AST node order")]
    InvalidAstNode,

    #[error("Invalid function parameter")]
    InvalidParameter,
}
