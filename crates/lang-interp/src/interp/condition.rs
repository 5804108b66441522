// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Condition evaluation.

use lang_ast::{Condition, ConditionOperator};

use crate::compare;
use crate::value::DataObject;

use super::Interpreter;

impl Interpreter {
    pub(crate) fn interpret_condition(&mut self, condition: &Condition, scope_id: usize) -> bool {
        match condition {
            Condition::Value(node) => self
                .interpret_node(node, scope_id)
                .map_or(false, |value| value.to_bool()),
            Condition::Not(inner) => !self.interpret_condition(inner, scope_id),
            Condition::Binary { op, left, right } => {
                // No short-circuit: both operands are always evaluated.
                if op.is_logical() {
                    let l = self.interpret_condition(left, scope_id);
                    let r = self.interpret_condition(right, scope_id);
                    return match op {
                        ConditionOperator::And => l && r,
                        _ => l || r,
                    };
                }

                let l = self.condition_operand(left, scope_id);
                let r = self.condition_operand(right, scope_id);
                match op {
                    ConditionOperator::Equals => compare::loose_equals(&l, &r),
                    ConditionOperator::NotEquals => !compare::loose_equals(&l, &r),
                    ConditionOperator::StrictEquals => compare::strict_equals(&l, &r),
                    ConditionOperator::StrictNotEquals => !compare::strict_equals(&l, &r),
                    ConditionOperator::LessThan => compare::less_than(&l, &r),
                    ConditionOperator::GreaterThan => compare::greater_than(&l, &r),
                    ConditionOperator::LessThanOrEquals => compare::less_than_or_equals(&l, &r),
                    ConditionOperator::GreaterThanOrEquals => {
                        compare::greater_than_or_equals(&l, &r)
                    }
                    ConditionOperator::And | ConditionOperator::Or => false,
                }
            }
        }
    }

    /// A plain value operand compares by value; a nested condition compares
    /// as `1` or `0`.
    fn condition_operand(&mut self, condition: &Condition, scope_id: usize) -> DataObject {
        match condition {
            Condition::Value(node) => self
                .interpret_node(node, scope_id)
                .unwrap_or_else(DataObject::void),
            other => DataObject::bool(self.interpret_condition(other, scope_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;

    fn check(condition: &str) -> String {
        let mut interp = Interpreter::new();
        interp.run_str(&format!("$a = 5\n$t = abc\n$r = func.condition({})", condition));
        interp.get_var("$r").unwrap().to_text()
    }

    #[test]
    fn comparisons() {
        assert_eq!(check("$a == 5"), "1");
        assert_eq!(check("$a != 5"), "0");
        assert_eq!(check("$a < 10"), "1");
        assert_eq!(check("$a >= 6"), "0");
        assert_eq!(check("$t == abc"), "1");
    }

    #[test]
    fn strict_equality_checks_type() {
        assert_eq!(check("$a === 5"), "1");
        assert_eq!(check("$a === 5.0"), "0");
        assert_eq!(check("$a == 5.0"), "1");
    }

    #[test]
    fn logical_operators_and_negation() {
        assert_eq!(check("$a == 5 && $t == abc"), "1");
        assert_eq!(check("$a == 4 || $t == abd"), "0");
        assert_eq!(check("!$a == 4"), "1");
    }

    #[test]
    fn if_statement_runs_first_true_branch() {
        let (mut interp, output) = Interpreter::with_captured_output();
        interp.run_str(concat!(
            "$a = 2\n",
            "con.if($a == 1)\nfunc.println(one)\n",
            "con.elif($a == 2)\nfunc.println(two)\n",
            "con.else\nfunc.println(other)\n",
            "con.endif",
        ));
        assert_eq!(output.lock().unwrap().as_str(), "two\n");
    }
}
