// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The condition sub-grammar used by `con.if`, `con.elif`,
//! `con.condition(...)` and `func.condition(...)`.
//!
//! There is no precedence: the text is scanned left to right and the first
//! operator found splits it into a left operand and a right-hand condition
//! parsed from the rest.

use lang_ast::{Condition, ConditionOperator, ParsingError};

use crate::value::parse_value;

/// Parse condition text.
pub fn parse_condition(text: &str, line: usize) -> Result<Condition, ParsingError> {
    let chars: Vec<char> = text.trim().chars().collect();
    parse(&chars, line)
}

fn parse(chars: &[char], line: usize) -> Result<Condition, ParsingError> {
    let mut builder = String::new();
    let mut group: Option<(Condition, String)> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            builder.push(c);
            if let Some(next) = chars.get(i + 1) {
                builder.push(*next);
            }
            i += 2;
            continue;
        }

        if c == '(' {
            let close = matching_paren(chars, i).ok_or(ParsingError::BracketMismatch)?;
            if group.is_none() && builder.trim().is_empty() {
                let inner = parse(&chars[i + 1..close], line)?;
                group = Some((inner, chars[i..=close].iter().collect()));
                builder.clear();
            } else {
                ungroup(&mut group, &mut builder);
                builder.extend(&chars[i..=close]);
            }
            i = close + 1;
            continue;
        }

        if let Some(op) = operator_at(chars, i) {
            let left = match group.take() {
                Some((condition, _)) if builder.trim().is_empty() => condition,
                Some((_, source)) => Condition::Value(parse_value(format!("{}{}", source, builder).trim(), line)),
                None => Condition::Value(parse_value(builder.trim(), line)),
            };
            let rest = &chars[i + op.symbol().len()..];
            let right = parse(trim_start(rest), line)?;
            return Ok(Condition::binary(op, left, right));
        }

        if c == '!' && group.is_none() && builder.trim().is_empty() {
            return Ok(Condition::not(parse(trim_start(&chars[i + 1..]), line)?));
        }

        if group.is_some() && !c.is_whitespace() {
            ungroup(&mut group, &mut builder);
        }
        builder.push(c);
        i += 1;
    }

    match group {
        Some((condition, _)) if builder.trim().is_empty() => Ok(condition),
        Some((_, source)) => Ok(Condition::Value(parse_value(format!("{}{}", source, builder).trim(), line))),
        None => Ok(Condition::Value(parse_value(builder.trim(), line))),
    }
}

/// A group followed by more text is just text.
fn ungroup(group: &mut Option<(Condition, String)>, builder: &mut String) {
    if let Some((_, source)) = group.take() {
        builder.insert_str(0, &source);
    }
}

fn trim_start(chars: &[char]) -> &[char] {
    let skip = chars.iter().take_while(|c| c.is_whitespace()).count();
    &chars[skip..]
}

fn operator_at(chars: &[char], i: usize) -> Option<ConditionOperator> {
    ConditionOperator::SCAN_ORDER.into_iter().find(|op| {
        let symbol = op.symbol();
        let len = symbol.chars().count();
        i + len <= chars.len() && chars[i..i + len].iter().copied().eq(symbol.chars())
    })
}

fn matching_paren(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use lang_ast::Node;

    fn value(node: Node) -> Condition {
        Condition::Value(node)
    }

    #[test]
    fn single_value() {
        assert_eq!(parse_condition("1", 1), Ok(value(Node::Int(1))));
    }

    #[test]
    fn comparison() {
        assert_eq!(
            parse_condition("$a == 1", 1),
            Ok(Condition::binary(
                ConditionOperator::Equals,
                value(Node::UnprocessedVariableName("$a".into())),
                value(Node::Int(1)),
            ))
        );
    }

    #[test]
    fn longer_operators_win() {
        let Ok(Condition::Binary { op, .. }) = parse_condition("a !== b", 1) else {
            panic!("expected binary");
        };
        assert_eq!(op, ConditionOperator::StrictNotEquals);

        let Ok(Condition::Binary { op, .. }) = parse_condition("a <= b", 1) else {
            panic!("expected binary");
        };
        assert_eq!(op, ConditionOperator::LessThanOrEquals);
    }

    #[test]
    fn right_recursive_without_precedence() {
        // a == 1 && b splits at `==` first
        let Ok(Condition::Binary { op, right, .. }) = parse_condition("a == 1 && b", 1) else {
            panic!("expected binary");
        };
        assert_eq!(op, ConditionOperator::Equals);
        assert!(matches!(*right, Condition::Binary { op: ConditionOperator::And, .. }));
    }

    #[test]
    fn groups_and_not() {
        let parsed = parse_condition("!(a == b) || c", 1).unwrap();
        let Condition::Not(inner) = parsed else {
            panic!("expected not");
        };
        assert!(matches!(*inner, Condition::Binary { op: ConditionOperator::Or, .. }));

        let parsed = parse_condition("(a == b) || c", 1).unwrap();
        let Condition::Binary { op, left, .. } = parsed else {
            panic!("expected binary");
        };
        assert_eq!(op, ConditionOperator::Or);
        assert!(matches!(*left, Condition::Binary { op: ConditionOperator::Equals, .. }));
    }

    #[test]
    fn call_parens_belong_to_text() {
        let parsed = parse_condition("func.len($a) > 2", 1).unwrap();
        let Condition::Binary { op, left, .. } = parsed else {
            panic!("expected binary");
        };
        assert_eq!(op, ConditionOperator::GreaterThan);
        assert!(matches!(*left, Condition::Value(Node::FunctionCall { .. })));
    }

    #[test]
    fn escaped_operators_are_text() {
        assert!(matches!(parse_condition(r"a \< b", 1), Ok(Condition::Value(_))));
    }

    #[test]
    fn unmatched_paren() {
        assert_eq!(parse_condition("(a == b", 1), Err(ParsingError::BracketMismatch));
    }
}
