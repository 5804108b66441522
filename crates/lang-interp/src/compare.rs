// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Equality and ordering between values, as used by conditions.

use std::cmp::Ordering;
use std::mem::discriminant;
use std::rc::Rc;

use crate::value::{DataObject, DataValue, Number};

/// Both values have a numeric form and at least one is a number or char.
fn numeric_pair(a: &DataObject, b: &DataObject) -> Option<(Number, Number)> {
    if !a.is_numeric_type() && !b.is_numeric_type() {
        return None;
    }
    Some((a.to_number()?, b.to_number()?))
}

fn compare_numbers(a: Number, b: Number) -> Option<Ordering> {
    if a.is_integral() && b.is_integral() {
        Some(a.as_i64().cmp(&b.as_i64()))
    } else {
        a.as_f64().partial_cmp(&b.as_f64())
    }
}

/// `==`
pub fn loose_equals(a: &DataObject, b: &DataObject) -> bool {
    if let Some((x, y)) = numeric_pair(a, b) {
        return compare_numbers(x, y) == Some(Ordering::Equal);
    }

    match (a.value(), b.value()) {
        (DataValue::Text(x), DataValue::Text(y)) => x == y,
        (DataValue::Text(_), DataValue::Char(_)) | (DataValue::Char(_), DataValue::Text(_)) => {
            a.to_text() == b.to_text()
        }
        (DataValue::Array(x), DataValue::Array(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| strict_equals(a, b))
        }
        (DataValue::VarPointer(x), DataValue::VarPointer(y)) => x.ptr_eq(y),
        (DataValue::FunctionPointer(x), DataValue::FunctionPointer(y)) => x == y,
        (DataValue::Error(x), DataValue::Error(y)) => x.code() == y.code(),
        (DataValue::Null, DataValue::Null) | (DataValue::Void, DataValue::Void) => true,
        (DataValue::ArgumentSeparator(x), DataValue::ArgumentSeparator(y)) => x == y,
        _ => false,
    }
}

/// `===`
pub fn strict_equals(a: &DataObject, b: &DataObject) -> bool {
    discriminant(a.value()) == discriminant(b.value()) && loose_equals(a, b)
}

fn ordering(a: &DataObject, b: &DataObject) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.to_number(), b.to_number()) {
        return compare_numbers(x, y);
    }
    match (a.value(), b.value()) {
        (DataValue::Text(x), DataValue::Text(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

pub fn less_than(a: &DataObject, b: &DataObject) -> bool {
    ordering(a, b) == Some(Ordering::Less)
}

pub fn greater_than(a: &DataObject, b: &DataObject) -> bool {
    ordering(a, b) == Some(Ordering::Greater)
}

pub fn less_than_or_equals(a: &DataObject, b: &DataObject) -> bool {
    matches!(ordering(a, b), Some(Ordering::Less | Ordering::Equal))
}

pub fn greater_than_or_equals(a: &DataObject, b: &DataObject) -> bool {
    matches!(ordering(a, b), Some(Ordering::Greater | Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_numeric_equality() {
        assert!(loose_equals(&DataObject::int(5), &DataObject::text("5")));
        assert!(loose_equals(&DataObject::int(5), &DataObject::double(5.0)));
        assert!(loose_equals(&DataObject::new(DataValue::Char('A')), &DataObject::int(65)));
        assert!(!loose_equals(&DataObject::text("5"), &DataObject::text("5.0")));
    }

    #[test]
    fn strict_requires_same_variant() {
        assert!(!strict_equals(&DataObject::int(5), &DataObject::long(5)));
        assert!(strict_equals(&DataObject::int(5), &DataObject::int(5)));
        assert!(strict_equals(&DataObject::null(), &DataObject::null()));
    }

    #[test]
    fn arrays_compare_by_identity_or_elements() {
        let a = DataObject::array(vec![DataObject::int(1)]);
        let b = DataObject::array(vec![DataObject::int(1)]);
        let c = DataObject::array(vec![DataObject::long(1)]);
        assert!(loose_equals(&a, &a.clone()));
        assert!(loose_equals(&a, &b));
        assert!(!loose_equals(&a, &c));
    }

    #[test]
    fn ordering_rules() {
        assert!(less_than(&DataObject::int(2), &DataObject::text("10")));
        assert!(less_than(&DataObject::text("abc"), &DataObject::text("abd")));
        assert!(greater_than_or_equals(&DataObject::double(2.0), &DataObject::int(2)));
        assert!(!less_than(&DataObject::null(), &DataObject::int(1)));
        assert!(!greater_than(&DataObject::null(), &DataObject::int(1)));
    }
}
