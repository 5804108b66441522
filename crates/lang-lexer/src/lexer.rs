// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use lang_ast::token::{Token, TokenKind};
use lang_ast::Span;
use logos::Logos;

/// Raw token type for logos. Whitespace is significant in Lang text, so
/// nothing is skipped.
#[derive(Logos, Debug, Clone, PartialEq)]
enum RawToken {
    #[regex(r"\\.")]
    Escape,

    // `$[name]`, `$[[name]]`, ...
    #[regex(r"\$\[+[A-Za-z0-9_]+\]+")]
    Pointer,

    #[regex(r"[$&][A-Za-z0-9_]+")]
    Var,

    #[regex(r"fp\.[A-Za-z0-9_]+")]
    FuncPtr,

    #[regex(r"(func|linker)\.[A-Za-z0-9_]+")]
    Builtin,

    #[regex(r"con\.[A-Za-z0-9_]+")]
    Control,

    #[regex(r"[A-Za-z0-9_]+")]
    Word,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,

    #[regex(r"[^A-Za-z0-9_ \t\\(),]")]
    Other,
}

/// The lexer for one line of Lang value text.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenize the whole source. Adjacent text pieces are merged into a
    /// single `Text` token.
    pub fn tokenize(&self) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => convert_token(raw, slice),
                // A lone trailing backslash
                Err(()) => TokenKind::Text(slice.to_string()),
            };

            if let TokenKind::Text(text) = &kind {
                if let Some(Token {
                    kind: TokenKind::Text(prev),
                    span: prev_span,
                }) = tokens.last_mut()
                {
                    if prev_span.end == span.start {
                        prev.push_str(text);
                        prev_span.end = span.end;
                        continue;
                    }
                }
            }

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens
    }
}

/// Tokenize a line of value text.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Escape => match slice.chars().nth(1) {
            Some(c) => TokenKind::Escape(c),
            None => TokenKind::Text(slice.to_string()),
        },
        RawToken::Pointer => {
            let opening = slice.chars().filter(|c| *c == '[').count();
            let closing = slice.chars().filter(|c| *c == ']').count();
            if opening == closing {
                TokenKind::PointerName(slice.to_string())
            } else {
                TokenKind::Text(slice.to_string())
            }
        }
        RawToken::Var => TokenKind::VarName(slice.to_string()),
        RawToken::FuncPtr => TokenKind::FunctionPointerName(slice.to_string()),
        RawToken::Builtin => TokenKind::BuiltinName(slice.to_string()),
        RawToken::Control => TokenKind::ControlName(slice.to_string()),
        RawToken::Whitespace => TokenKind::Whitespace(slice.to_string()),
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Word | RawToken::Other => TokenKind::Text(slice.to_string()),
    }
}
