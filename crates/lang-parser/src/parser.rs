// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement structure: if-statements, function literals, assignments and
//! returns. Everything else is handed to the value parser.

use std::io::{self, BufRead};
use std::rc::Rc;
use std::sync::OnceLock;

use lang_ast::{Ast, Condition, FunctionDefinition, IfStatementPart, Node, Parameter, ParsingError};
use regex::Regex;

use crate::condition::parse_condition;
use crate::hints;
use crate::line::{LineReader, LogicalLine};
use crate::value::parse_value;

fn variable_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\$|&|fp\.)[A-Za-z0-9_]+$").expect("valid variable regex"))
}

fn pointer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\$\[+[A-Za-z0-9_]+\]+$").expect("valid pointer regex"))
}

fn function_literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\(([^()]*)\)\s*->\s*\{(.*)$").expect("valid function literal regex")
    })
}

/// Whether `name` is a plain variable name such as `$a`, `&list` or `fp.f`.
pub fn is_variable_name(name: &str) -> bool {
    variable_regex().is_match(name)
}

/// Whether `name` is a pointer name such as `$[a]` with balanced brackets.
pub fn is_pointer_name(name: &str) -> bool {
    pointer_regex().is_match(name)
        && name.matches('[').count() == name.matches(']').count()
}

/// Where a block of lines is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    TopLevel,
    FunctionBody,
    IfBody,
    Block,
}

/// The line that ended a block.
enum Terminator {
    Eof,
    CloseBrace(LogicalLine),
    IfPart(LogicalLine),
}

/// The parser for Lang source read line by line.
pub struct Parser<R: BufRead> {
    lines: LineReader<R>,
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
        }
    }

    /// Parse the whole input. Only I/O failures of the reader are errors;
    /// malformed constructs become [`Node::ParsingError`] nodes.
    pub fn parse(&mut self) -> io::Result<Ast> {
        let (nodes, _) = self.parse_lines(Context::TopLevel)?;
        Ok(nodes)
    }

    fn parse_lines(&mut self, context: Context) -> io::Result<(Vec<Node>, Terminator)> {
        let mut nodes = Vec::new();
        while let Some(line) = self.lines.next_line()? {
            if line.unterminated {
                nodes.push(Node::parsing_error(
                    ParsingError::Eof,
                    hints::message(ParsingError::Eof, "'}}}' missing"),
                    line.number,
                ));
                continue;
            }

            let text = line.text.as_str();
            if text.starts_with('}') {
                if context != Context::TopLevel {
                    return Ok((nodes, Terminator::CloseBrace(line)));
                }
                nodes.push(invalid_node(&line));
                continue;
            }
            if text.starts_with("con.elif(") || text == "con.else" || text == "con.endif" {
                if context == Context::IfBody {
                    return Ok((nodes, Terminator::IfPart(line)));
                }
                nodes.push(invalid_node(&line));
                continue;
            }
            if text.starts_with("con.if(") {
                let if_nodes = self.parse_if(line)?;
                nodes.extend(if_nodes);
                continue;
            }

            if let Some(header) = block_header(text) {
                if !header.is_empty() {
                    nodes.push(self.parse_statement(header, line.number)?);
                }
                let (body, terminator) = self.parse_lines(Context::Block)?;
                nodes.push(Node::Block(body));
                if let Terminator::Eof = terminator {
                    nodes.push(Node::parsing_error(
                        ParsingError::Eof,
                        hints::message(ParsingError::Eof, "'}' missing"),
                        line.number,
                    ));
                }
                continue;
            }

            let node = self.parse_statement(&line.text, line.number)?;
            nodes.push(node);
        }
        Ok((nodes, Terminator::Eof))
    }

    fn parse_if(&mut self, first: LogicalLine) -> io::Result<Vec<Node>> {
        let mut parts = Vec::new();
        let mut condition = Some(header_condition(&first.text, "con.if", first.number));
        loop {
            let (body, terminator) = self.parse_lines(Context::IfBody)?;
            parts.push(IfStatementPart { condition, body });

            match terminator {
                Terminator::IfPart(line) if line.text == "con.endif" => {
                    return Ok(vec![Node::IfStatement(parts)]);
                }
                Terminator::IfPart(line) if line.text == "con.else" => condition = None,
                Terminator::IfPart(line) => {
                    condition = Some(header_condition(&line.text, "con.elif", line.number));
                }
                Terminator::CloseBrace(line) => {
                    let number = line.number;
                    self.lines.push_back(line);
                    return Ok(vec![Node::IfStatement(parts), missing_endif(number)]);
                }
                Terminator::Eof => {
                    return Ok(vec![Node::IfStatement(parts), missing_endif(first.number)]);
                }
            }
        }
    }

    fn parse_statement(&mut self, text: &str, line: usize) -> io::Result<Node> {
        if text == "return" {
            return Ok(Node::Return(None));
        }
        if let Some(value) = text.strip_prefix("return ") {
            let value = self.parse_rvalue(value.trim(), line)?;
            return Ok(Node::Return(Some(Box::new(value))));
        }

        if let Some(index) = find_assignment(text) {
            let lvalue = parse_lvalue(&text[..index], line);
            let rvalue = self.parse_rvalue(text[index + 3..].trim(), line)?;
            return Ok(Node::Assignment {
                lvalue: Box::new(lvalue),
                rvalue: Box::new(rvalue),
            });
        }
        if let Some(lvalue) = text.strip_suffix(" =") {
            return Ok(Node::Assignment {
                lvalue: Box::new(parse_lvalue(lvalue.trim_end(), line)),
                rvalue: Box::new(Node::Null),
            });
        }
        if is_variable_name(text) {
            return Ok(Node::Assignment {
                lvalue: Box::new(Node::VariableName(text.to_string())),
                rvalue: Box::new(Node::Null),
            });
        }

        Ok(parse_value(text, line))
    }

    fn parse_rvalue(&mut self, text: &str, line: usize) -> io::Result<Node> {
        let Some(captures) = function_literal_regex().captures(text) else {
            return Ok(parse_value(text, line));
        };
        let params_text = captures.get(1).map_or("", |m| m.as_str());
        let rest = captures.get(2).map_or("", |m| m.as_str()).trim();

        let params = match parse_params(params_text) {
            Ok(params) => params,
            Err(bad) => {
                // The body still has to be consumed.
                if rest.is_empty() {
                    self.parse_lines(Context::FunctionBody)?;
                }
                return Ok(Node::parsing_error(
                    ParsingError::InvalidParameter,
                    hints::message(ParsingError::InvalidParameter, &bad),
                    line,
                ));
            }
        };

        let body = if rest.is_empty() {
            let (body, terminator) = self.parse_lines(Context::FunctionBody)?;
            if let Terminator::Eof = terminator {
                return Ok(Node::parsing_error(
                    ParsingError::Eof,
                    hints::message(ParsingError::Eof, "'}' missing"),
                    line,
                ));
            }
            body
        } else if let Some(inner) = rest.strip_suffix('}') {
            let inner = inner.trim();
            if inner.is_empty() {
                Vec::new()
            } else {
                vec![self.parse_statement(inner, line)?]
            }
        } else {
            return Ok(Node::parsing_error(
                ParsingError::BracketMismatch,
                hints::message(ParsingError::BracketMismatch, "'}' missing"),
                line,
            ));
        };

        Ok(Node::FunctionDefinition(Rc::new(FunctionDefinition { params, body })))
    }
}

/// Parse a whole script held in memory.
pub fn parse_str(source: &str) -> Ast {
    // Reading from a byte slice cannot fail.
    Parser::new(source.as_bytes()).parse().unwrap_or_default()
}

/// Text before the `{` of a line that opens a nested block. Function
/// literal heads (`-> {`) and an escaped `\{` do not open one.
fn block_header(text: &str) -> Option<&str> {
    let header = text.strip_suffix('{')?;
    let backslashes = header.chars().rev().take_while(|c| *c == '\\').count();
    if backslashes % 2 == 1 || header.trim_end().ends_with("->") {
        return None;
    }
    Some(header.trim_end())
}

fn invalid_node(line: &LogicalLine) -> Node {
    Node::parsing_error(
        ParsingError::InvalidAstNode,
        hints::message(ParsingError::InvalidAstNode, &line.text),
        line.number,
    )
}

fn missing_endif(line: usize) -> Node {
    Node::parsing_error(
        ParsingError::Eof,
        hints::message(ParsingError::Eof, "'con.endif' missing"),
        line,
    )
}

/// Condition of a `con.if(...)`/`con.elif(...)` header. Errors become a
/// condition whose value is the parsing error node.
fn header_condition(text: &str, keyword: &str, line: usize) -> Condition {
    let error = |error: ParsingError, detail: &str| {
        Condition::Value(Node::parsing_error(error, hints::message(error, detail), line))
    };

    let after = &text[keyword.len()..];
    let Some(close) = closing_paren(after) else {
        return error(ParsingError::BracketMismatch, text);
    };
    let inner = after[1..close].trim();
    if inner.is_empty() {
        return error(ParsingError::IfConditionMissing, text);
    }
    match parse_condition(inner, line) {
        Ok(condition) => condition,
        Err(e) => error(e, inner),
    }
}

/// Byte index of the `)` matching the `(` that starts `text`.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte index of the first ` = ` outside parentheses.
fn find_assignment(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ' ' if depth == 0 && text[i..].starts_with(" = ") => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_lvalue(text: &str, line: usize) -> Node {
    if is_variable_name(text) || is_pointer_name(text) {
        Node::VariableName(text.to_string())
    } else {
        parse_value(text, line)
    }
}

/// Parse a comma separated parameter list. Returns the offending
/// declaration on failure.
fn parse_params(text: &str) -> Result<Vec<Parameter>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    let decls: Vec<&str> = text.split(',').map(str::trim).collect();
    let last = decls.len() - 1;
    decls
        .iter()
        .enumerate()
        .map(|(i, decl)| match Parameter::parse(decl) {
            Some(param) if !param.varargs || i == last => Ok(param),
            _ => Err(decl.to_string()),
        })
        .collect()
}
