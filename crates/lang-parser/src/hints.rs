// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.
//!
//! Kept separate from the main parser to avoid clutter.

use lang_ast::ParsingError;

/// Get a hint for a parsing error.
pub fn for_error(error: ParsingError) -> Option<&'static str> {
    match error {
        ParsingError::BracketMismatch => Some("every '(' needs a matching ')'; escape literal parens as '\\('"),
        ParsingError::IfConditionMissing => Some("syntax: con.if(condition)"),
        ParsingError::Eof => Some("close blocks with 'con.endif', '}' or '}}}'"),
        ParsingError::InvalidAstNode => Some("'con.elif', 'con.else', 'con.endif' and '}' must close an open block"),
        ParsingError::InvalidParameter => Some("parameters look like $name, &name or fp.name; only the last may end in '...'"),
    }
}

/// Build the message stored in a parsing error node.
pub fn message(error: ParsingError, detail: &str) -> String {
    if detail.is_empty() {
        error.to_string()
    } else {
        format!("{}: {}", error, detail)
    }
}
