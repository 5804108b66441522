// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Value text to nodes.

use std::sync::OnceLock;

use lang_ast::token::{Token, TokenKind};
use lang_ast::{Node, ParsingError};
use regex::Regex;

use crate::condition::parse_condition;
use crate::hints;

fn decimal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid decimal regex")
    })
}

/// Whether `text` is decimal number text such as `2.5`, `.5` or `1e10`.
pub fn is_decimal(text: &str) -> bool {
    decimal_regex().is_match(text)
}

/// Parse one piece of value text into a node.
pub fn parse_value(text: &str, line: usize) -> Node {
    let tokens = lang_lexer::tokenize(text);
    parse_slot(&tokens, line)
}

/// Type a single plain-text token.
pub fn parse_literal(text: &str) -> Node {
    if text == "null" {
        return Node::Null;
    }
    if let Ok(i) = text.parse::<i32>() {
        return Node::Int(i);
    }
    if let Ok(l) = text.parse::<i64>() {
        return Node::Long(l);
    }
    if let Some(prefix) = text.strip_suffix(['L', 'l']) {
        if let Ok(l) = prefix.parse::<i64>() {
            return Node::Long(l);
        }
    }
    if let Some(prefix) = text.strip_suffix(['f', 'F']) {
        if is_decimal(prefix) {
            if let Ok(f) = prefix.parse::<f32>() {
                return Node::Float(f);
            }
        }
    }
    if is_decimal(text) {
        if let Ok(d) = text.parse::<f64>() {
            return Node::Double(d);
        }
    }
    Node::Text(text.to_string())
}

fn parse_slot(tokens: &[Token], line: usize) -> Node {
    if let [Token {
        kind: TokenKind::Text(text),
        ..
    }] = tokens
    {
        return parse_literal(text);
    }
    Node::from_list(parse_tokens(tokens, line))
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(prev)) = nodes.last_mut() {
        prev.push_str(text);
    } else {
        nodes.push(Node::text(text));
    }
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn bracket_mismatch(line: usize) -> Node {
    Node::parsing_error(
        ParsingError::BracketMismatch,
        hints::message(ParsingError::BracketMismatch, "missing ')'"),
        line,
    )
}

fn source_text(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.kind.source_text()).collect()
}

fn parse_tokens(tokens: &[Token], line: usize) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i].kind {
            TokenKind::Text(s) | TokenKind::Whitespace(s) => push_text(&mut nodes, s),
            TokenKind::Escape(c) => nodes.push(Node::EscapeSequence(*c)),
            TokenKind::VarName(name) | TokenKind::PointerName(name) => {
                nodes.push(Node::UnprocessedVariableName(name.clone()))
            }
            TokenKind::FunctionPointerName(name) | TokenKind::BuiltinName(name) => {
                if matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::LParen)) {
                    let Some(close) = matching_paren(tokens, i + 1) else {
                        nodes.push(bracket_mismatch(line));
                        return nodes;
                    };
                    nodes.push(Node::FunctionCall {
                        name: name.clone(),
                        args: parse_args(&tokens[i + 2..close], line),
                    });
                    i = close + 1;
                    continue;
                }
                nodes.push(Node::UnprocessedVariableName(name.clone()));
            }
            TokenKind::ControlName(name) => {
                let opens = matches!(tokens.get(i + 1).map(|t| &t.kind), Some(TokenKind::LParen));
                if name == "con.condition" && opens {
                    let Some(close) = matching_paren(tokens, i + 1) else {
                        nodes.push(bracket_mismatch(line));
                        return nodes;
                    };
                    let inner = source_text(&tokens[i + 2..close]);
                    nodes.push(match parse_condition(&inner, line) {
                        Ok(condition) => Node::Condition(Box::new(condition)),
                        Err(error) => Node::parsing_error(error, hints::message(error, &inner), line),
                    });
                    i = close + 1;
                    continue;
                }
                push_text(&mut nodes, name);
            }
            TokenKind::LParen => {
                let Some(close) = matching_paren(tokens, i) else {
                    nodes.push(bracket_mismatch(line));
                    return nodes;
                };
                nodes.push(Node::FunctionCallPreviousNodeValue {
                    args: parse_args(&tokens[i + 1..close], line),
                });
                i = close + 1;
                continue;
            }
            TokenKind::RParen => push_text(&mut nodes, ")"),
            TokenKind::Comma => push_text(&mut nodes, ","),
        }
        i += 1;
    }
    nodes
}

/// Split call arguments at top-level commas.
///
/// Whitespace around a comma belongs to its separator, so `1 , 2` yields
/// `1`, `" , "`, `2`. Empty slots become `Void`.
fn parse_args(tokens: &[Token], line: usize) -> Vec<Node> {
    if tokens.iter().all(|t| t.kind.is_whitespace()) {
        return Vec::new();
    }

    let mut slots: Vec<&[Token]> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                slots.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    slots.push(&tokens[start..]);

    let mut args = Vec::new();
    let mut pending_separator: Option<String> = None;
    let last = slots.len() - 1;
    for (index, slot) in slots.into_iter().enumerate() {
        let lead = slot.iter().take_while(|t| t.kind.is_whitespace()).count();
        let trail = slot[lead..]
            .iter()
            .rev()
            .take_while(|t| t.kind.is_whitespace())
            .count();
        let body = &slot[lead..slot.len() - trail];

        if let Some(mut separator) = pending_separator.take() {
            separator.push_str(&source_text(&slot[..lead]));
            args.push(Node::ArgumentSeparator(separator));
        }

        if body.is_empty() {
            args.push(Node::Void);
        } else {
            args.push(parse_slot(body, line));
        }

        if index < last {
            let mut separator = source_text(&slot[slot.len() - trail..]);
            separator.push(',');
            pending_separator = Some(separator);
        }
    }
    args
}
