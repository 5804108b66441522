// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `lang lex` and `lang parse`: show what the front end makes of a file.

use std::fs;
use std::io::Cursor;
use std::process;

use lang_ast::{Condition, Node, ParsingError};
use lang_parser::{hints, LineReader};

use crate::output;

fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", output::error(format!("reading {}: {}", path, e)));
            process::exit(1);
        }
    }
}

pub fn cmd_lex(path: &str) {
    let source = read_source(path);
    let mut reader = LineReader::new(Cursor::new(source.as_str()));
    let mut count = 0;

    loop {
        let line = match reader.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("{}", output::error(e));
                process::exit(1);
            }
        };
        println!("{}", output::logical_line(line.number));
        for tok in lang_lexer::tokenize(&line.text) {
            if tok.kind.is_whitespace() {
                continue;
            }
            println!(
                "{}",
                output::token_row(tok.span.start, tok.span.end, tok.kind.display_name(), &tok.kind.source_text())
            );
            count += 1;
        }
    }
    println!("\n{}", output::phase_banner(&format!("Lex: {} tokens", count), 0));
}

pub fn cmd_parse(path: &str) {
    let source = read_source(path);
    let ast = lang_parser::parse_str(&source);

    let mut errors = Vec::new();
    for node in &ast {
        collect_errors(node, &mut errors);
    }
    if !errors.is_empty() {
        for (error, message, line) in &errors {
            show_error(&source, *line, message, hints::for_error(*error));
        }
        eprintln!("\n{}", output::phase_banner("Parse", errors.len()));
        process::exit(1);
    }

    println!("=== AST ({} nodes) ===\n", ast.len());
    for (i, node) in ast.iter().enumerate() {
        println!("--- Node {} ({}) ---", i + 1, node.kind_name());
        println!("{:#?}", node);
        println!();
    }
    println!("{}", output::phase_banner("Parse", 0));
}

/// Every parsing error node, in source order.
fn collect_errors(node: &Node, out: &mut Vec<(ParsingError, String, usize)>) {
    match node {
        Node::ParsingError { error, message, line } => out.push((*error, message.clone(), *line)),
        Node::List(children) | Node::Block(children) => children.iter().for_each(|n| collect_errors(n, out)),
        Node::FunctionCall { args, .. } | Node::FunctionCallPreviousNodeValue { args } => {
            args.iter().for_each(|n| collect_errors(n, out));
        }
        Node::FunctionDefinition(definition) => {
            definition.body.iter().for_each(|n| collect_errors(n, out));
        }
        Node::Assignment { lvalue, rvalue } => {
            collect_errors(lvalue, out);
            collect_errors(rvalue, out);
        }
        Node::IfStatement(parts) => {
            for part in parts {
                if let Some(condition) = &part.condition {
                    collect_condition_errors(condition, out);
                }
                part.body.iter().for_each(|n| collect_errors(n, out));
            }
        }
        Node::Return(Some(value)) => collect_errors(value, out),
        Node::Condition(condition) => collect_condition_errors(condition, out),
        _ => {}
    }
}

fn collect_condition_errors(condition: &Condition, out: &mut Vec<(ParsingError, String, usize)>) {
    match condition {
        Condition::Value(node) => collect_errors(node, out),
        Condition::Not(inner) => collect_condition_errors(inner, out),
        Condition::Binary { left, right, .. } => {
            collect_condition_errors(left, out);
            collect_condition_errors(right, out);
        }
    }
}

/// Show an error with its source line.
fn show_error(source: &str, line_num: usize, message: &str, hint: Option<&str>) {
    let line = source.lines().nth(line_num.saturating_sub(1)).unwrap_or("");
    eprintln!("\n{}", output::parse_diagnostic(message, line_num, line, hint));
}
