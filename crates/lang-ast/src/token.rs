// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
///
/// Lang has no keywords at the token level: words, punctuation and
/// operators are all plain text until the parser or interpreter decides
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Run of literal text
    Text(String),
    /// Run of spaces and tabs
    Whitespace(String),
    /// `\c` escape sequence, holding `c`
    Escape(char),
    /// `$name` or `&name`
    VarName(String),
    /// `$[name]`, `$[[name]]`, ...
    PointerName(String),
    /// `fp.name`
    FunctionPointerName(String),
    /// `func.name` or `linker.name`
    BuiltinName(String),
    /// `con.name`
    ControlName(String),

    // Delimiters
    LParen,
    RParen,
    Comma,
}

impl TokenKind {
    /// Get a display name for error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Text(_) => "text",
            TokenKind::Whitespace(_) => "whitespace",
            TokenKind::Escape(_) => "escape sequence",
            TokenKind::VarName(_) => "variable name",
            TokenKind::PointerName(_) => "pointer",
            TokenKind::FunctionPointerName(_) => "function pointer",
            TokenKind::BuiltinName(_) => "function name",
            TokenKind::ControlName(_) => "control keyword",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
        }
    }

    /// The source text this token was lexed from.
    pub fn source_text(&self) -> String {
        match self {
            TokenKind::Text(s)
            | TokenKind::Whitespace(s)
            | TokenKind::VarName(s)
            | TokenKind::PointerName(s)
            | TokenKind::FunctionPointerName(s)
            | TokenKind::BuiltinName(s)
            | TokenKind::ControlName(s) => s.clone(),
            TokenKind::Escape(c) => format!("\\{}", c),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Comma => ",".to_string(),
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace(_))
    }
}
