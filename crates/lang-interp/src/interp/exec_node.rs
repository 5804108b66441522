// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Node evaluation.

use lang_ast::{IfStatementPart, Node};

use crate::value::{DataObject, DataValue};

use super::Interpreter;

impl Interpreter {
    /// Evaluate nodes in order until a `return` or an interrupt.
    pub(crate) fn interpret_lines(&mut self, nodes: &[Node], scope_id: usize) {
        for node in nodes {
            if self.is_stopped() {
                break;
            }
            self.interpret_node(node, scope_id);
        }
    }

    /// Evaluate one node. `None` means the node produced no value, which
    /// is not the same as `Void`.
    pub(crate) fn interpret_node(&mut self, node: &Node, scope_id: usize) -> Option<DataObject> {
        if self.is_interrupted() {
            return None;
        }

        match node {
            Node::Text(s) => Some(DataObject::text(s.clone())),
            Node::Int(i) => Some(DataObject::int(*i)),
            Node::Long(l) => Some(DataObject::long(*l)),
            Node::Float(f) => Some(DataObject::new(DataValue::Float(*f))),
            Node::Double(d) => Some(DataObject::double(*d)),
            Node::Null => Some(DataObject::null()),
            Node::Void => Some(DataObject::void()),
            Node::EscapeSequence(c) => Some(escape_sequence(*c)),
            Node::ArgumentSeparator(s) => Some(DataObject::new(DataValue::ArgumentSeparator(s.clone()))),

            Node::UnprocessedVariableName(name) | Node::VariableName(name) => {
                Some(self.resolve_name(name, scope_id))
            }

            Node::List(children) => self.interpret_list(children, scope_id),

            Node::FunctionCall { name, args } => {
                let args = self.interpret_arguments(args, scope_id);
                self.call_named(name, args, scope_id)
            }

            // No preceding value: the parentheses are literal text.
            Node::FunctionCallPreviousNodeValue { args } => {
                let args = self.interpret_arguments(args, scope_id);
                Some(DataObject::text(parenthesized(&args)))
            }

            Node::FunctionDefinition(definition) => Some(DataObject::function_pointer(
                crate::value::FunctionPointerObject::Normal(definition.clone()),
            )),

            Node::Assignment { lvalue, rvalue } => self.interpret_assignment(lvalue, rvalue, scope_id),

            Node::IfStatement(parts) => {
                self.interpret_if(parts, scope_id);
                None
            }

            Node::Block(body) => {
                self.interpret_lines(body, scope_id);
                None
            }

            Node::Return(value) => {
                let value = match value {
                    Some(node) => self.interpret_node(node, scope_id).unwrap_or_else(DataObject::void),
                    None => DataObject::void(),
                };
                self.return_value = Some(value.detached());
                self.stopped = true;
                None
            }

            Node::Condition(condition) => {
                let result = self.interpret_condition(condition, scope_id);
                Some(DataObject::bool(result))
            }

            Node::ParsingError { error, message, line } => {
                tracing::debug!(line, %message, "parsing error reached");
                Some(self.error_value((*error).into(), scope_id))
            }
        }
    }

    /// A composition: one child keeps its value, several are joined as text.
    fn interpret_list(&mut self, children: &[Node], scope_id: usize) -> Option<DataObject> {
        let mut values: Vec<DataObject> = Vec::new();
        for child in children {
            if let Node::FunctionCallPreviousNodeValue { args } = child {
                let args = self.interpret_arguments(args, scope_id);
                let previous_fp = values.last().and_then(|v| v.as_function_pointer()).cloned();
                match previous_fp {
                    Some(fp) => {
                        values.pop();
                        let result = self.call_function_pointer(&fp, args, scope_id);
                        values.push(result.unwrap_or_else(DataObject::void));
                    }
                    None => values.push(DataObject::text(parenthesized(&args))),
                }
                continue;
            }

            if let Some(value) = self.interpret_node(child, scope_id) {
                values.push(value);
            }
            if self.is_stopped() {
                break;
            }
        }

        match values.len() {
            0 => None,
            1 => values.pop(),
            _ => Some(DataObject::text(
                values.iter().map(DataObject::to_text).collect::<String>(),
            )),
        }
    }

    /// Evaluate call arguments. Separators are kept; slots that produce
    /// nothing become `Void`.
    pub(crate) fn interpret_arguments(&mut self, args: &[Node], scope_id: usize) -> Vec<DataObject> {
        args.iter()
            .map(|arg| self.interpret_node(arg, scope_id).unwrap_or_else(DataObject::void))
            .collect()
    }

    fn interpret_if(&mut self, parts: &[IfStatementPart], scope_id: usize) {
        for part in parts {
            let taken = match &part.condition {
                Some(condition) => self.interpret_condition(condition, scope_id),
                None => true,
            };
            if taken {
                self.interpret_lines(&part.body, scope_id);
                return;
            }
            if self.is_stopped() {
                return;
            }
        }
    }
}

fn escape_sequence(c: char) -> DataObject {
    let value = match c {
        'n' => DataValue::Char('\n'),
        't' => DataValue::Char('\t'),
        'r' => DataValue::Char('\r'),
        'f' => DataValue::Char('\u{000C}'),
        '0' => DataValue::Char('\0'),
        's' => DataValue::Char(' '),
        'e' => DataValue::Text(String::new()),
        other => DataValue::Char(other),
    };
    DataObject::new(value)
}

fn parenthesized(args: &[DataObject]) -> String {
    let inner: String = args.iter().map(DataObject::to_text).collect();
    format!("({})", inner)
}
