// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Condition tree produced by the condition sub-grammar.

use crate::Node;

/// A parsed condition.
///
/// Binary conditions are right-recursive: the right operand is everything
/// after the first operator found while scanning left to right.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// A single value expression; true when the value is truthy
    Value(Node),
    /// Unary `!`
    Not(Box<Condition>),
    /// Binary operator
    Binary {
        op: ConditionOperator,
        left: Box<Condition>,
        right: Box<Condition>,
    },
}

impl Condition {
    pub fn binary(op: ConditionOperator, left: Condition, right: Condition) -> Self {
        Condition::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(inner: Condition) -> Self {
        Condition::Not(Box::new(inner))
    }
}

/// Binary condition operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    And,
    Or,
    Equals,
    NotEquals,
    StrictEquals,
    StrictNotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEquals,
    GreaterThanOrEquals,
}

impl ConditionOperator {
    /// Operators in the order they are tried at each scan position.
    /// Longer spellings come before their prefixes.
    pub const SCAN_ORDER: [ConditionOperator; 10] = [
        ConditionOperator::StrictNotEquals,
        ConditionOperator::NotEquals,
        ConditionOperator::And,
        ConditionOperator::Or,
        ConditionOperator::StrictEquals,
        ConditionOperator::Equals,
        ConditionOperator::LessThanOrEquals,
        ConditionOperator::GreaterThanOrEquals,
        ConditionOperator::LessThan,
        ConditionOperator::GreaterThan,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ConditionOperator::And => "&&",
            ConditionOperator::Or => "||",
            ConditionOperator::Equals => "==",
            ConditionOperator::NotEquals => "!=",
            ConditionOperator::StrictEquals => "===",
            ConditionOperator::StrictNotEquals => "!==",
            ConditionOperator::LessThan => "<",
            ConditionOperator::GreaterThan => ">",
            ConditionOperator::LessThanOrEquals => "<=",
            ConditionOperator::GreaterThanOrEquals => ">=",
        }
    }

    /// `&&` and `||` combine truthiness; the rest compare values.
    pub fn is_logical(&self) -> bool {
        matches!(self, ConditionOperator::And | ConditionOperator::Or)
    }
}
