// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lang_ast::FunctionDefinition;

use crate::errors::InterpretingError;
use crate::interp::Interpreter;

/// A variable cell. Scope entries and VarPointers share these.
pub type Cell = Rc<RefCell<DataObject>>;

/// Host callback behind an External function pointer. Receives the
/// argument list (separators included) and the caller's scope id.
pub type ExternalFunction = Rc<dyn Fn(&mut Interpreter, &[DataObject], usize) -> Option<DataObject>>;

/// A runtime value together with its binding metadata.
///
/// `Clone` is the copy constructor: every field is duplicated, while
/// arrays, function pointers and var pointers keep sharing their storage.
#[derive(Debug, Clone)]
pub struct DataObject {
    value: DataValue,
    variable_name: Option<String>,
    final_data: bool,
}

/// The payload of a [`DataObject`].
#[derive(Debug, Clone)]
pub enum DataValue {
    Text(String),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Fixed-length, shared between every binding that holds it
    Array(Rc<RefCell<Vec<DataObject>>>),
    VarPointer(VarPointerObject),
    FunctionPointer(Rc<FunctionPointerObject>),
    Error(ErrorObject),
    Null,
    Void,
    /// Comma position in an argument list, holding the original separator
    ArgumentSeparator(String),
}

/// A live reference to another variable cell.
#[derive(Clone)]
pub struct VarPointerObject(pub Cell);

impl VarPointerObject {
    pub fn new(cell: Cell) -> Self {
        Self(cell)
    }

    pub fn cell(&self) -> &Cell {
        &self.0
    }

    pub fn ptr_eq(&self, other: &VarPointerObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Pointer chains can be cyclic, so only the pointee's name is printed.
impl fmt::Debug for VarPointerObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(target) => write!(f, "VarPointer({:?})", target.variable_name()),
            Err(_) => write!(f, "VarPointer(<borrowed>)"),
        }
    }
}

/// A callable value.
#[derive(Clone)]
pub enum FunctionPointerObject {
    /// A function literal. No environment is captured; the body runs
    /// against whatever scope it is called from.
    Normal(Rc<FunctionDefinition>),
    /// A builtin from the registry
    Predefined { name: String, linker: bool },
    /// A host callback
    External { name: String, function: ExternalFunction },
}

impl FunctionPointerObject {
    pub fn text(&self) -> String {
        match self {
            FunctionPointerObject::Normal(_) => "<Normal FP>".to_string(),
            FunctionPointerObject::Predefined { name, linker } => {
                let prefix = if *linker { "linker" } else { "func" };
                format!("<Predefined FP {}.{}>", prefix, name)
            }
            FunctionPointerObject::External { name, .. } => format!("<External FP {}>", name),
        }
    }
}

impl PartialEq for FunctionPointerObject {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FunctionPointerObject::Normal(a), FunctionPointerObject::Normal(b)) => {
                Rc::ptr_eq(a, b) || a == b
            }
            (
                FunctionPointerObject::Predefined { name: a, linker: la },
                FunctionPointerObject::Predefined { name: b, linker: lb },
            ) => a == b && la == lb,
            (
                FunctionPointerObject::External { function: a, .. },
                FunctionPointerObject::External { function: b, .. },
            ) => Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const (),
            _ => false,
        }
    }
}

impl fmt::Debug for FunctionPointerObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// An immutable error code and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorObject {
    error: InterpretingError,
}

impl ErrorObject {
    pub fn new(error: InterpretingError) -> Self {
        Self { error }
    }

    pub fn error(&self) -> InterpretingError {
        self.error
    }

    pub fn code(&self) -> i32 {
        self.error.code()
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// The numeric form of a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Number {
    pub fn as_i32(self) -> i32 {
        match self {
            Number::Int(i) => i,
            Number::Long(l) => l as i32,
            Number::Float(f) => f as i32,
            Number::Double(d) => d as i32,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            Number::Int(i) => i as i64,
            Number::Long(l) => l,
            Number::Float(f) => f as i64,
            Number::Double(d) => d as i64,
        }
    }

    pub fn as_f32(self) -> f32 {
        match self {
            Number::Int(i) => i as f32,
            Number::Long(l) => l as f32,
            Number::Float(f) => f,
            Number::Double(d) => d as f32,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Long(l) => l as f64,
            Number::Float(f) => f as f64,
            Number::Double(d) => d,
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, Number::Int(_) | Number::Long(_))
    }

    pub fn into_value(self) -> DataValue {
        match self {
            Number::Int(i) => DataValue::Int(i),
            Number::Long(l) => DataValue::Long(l),
            Number::Float(f) => DataValue::Float(f),
            Number::Double(d) => DataValue::Double(d),
        }
    }
}

/// Parse text as Int, then Long, then Double.
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i32>() {
        return Some(Number::Int(i));
    }
    if let Ok(l) = text.parse::<i64>() {
        return Some(Number::Long(l));
    }
    if lang_parser::is_decimal(text) {
        return text.parse::<f64>().ok().map(Number::Double);
    }
    None
}

/// Java-style floating point text: `5.0`, `2.5`, `1.0E10`, `NaN`.
pub fn format_double(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let abs = d.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        let text = d.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    } else {
        scientific(format!("{:E}", d))
    }
}

pub fn format_float(f: f32) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let abs = f.abs();
    if abs == 0.0 || (1e-3..1e7).contains(&abs) {
        let text = f.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{}.0", text)
        }
    } else {
        scientific(format!("{:E}", f))
    }
}

/// `1E10` -> `1.0E10`
fn scientific(text: String) -> String {
    match text.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0E{}", mantissa, exponent)
        }
        _ => text,
    }
}

impl DataObject {
    pub fn new(value: DataValue) -> Self {
        Self {
            value,
            variable_name: None,
            final_data: false,
        }
    }

    pub fn named(value: DataValue, name: impl Into<String>) -> Self {
        Self {
            value,
            variable_name: Some(name.into()),
            final_data: false,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(DataValue::Text(text.into()))
    }

    pub fn int(i: i32) -> Self {
        Self::new(DataValue::Int(i))
    }

    pub fn long(l: i64) -> Self {
        Self::new(DataValue::Long(l))
    }

    pub fn double(d: f64) -> Self {
        Self::new(DataValue::Double(d))
    }

    pub fn bool(b: bool) -> Self {
        Self::int(if b { 1 } else { 0 })
    }

    pub fn null() -> Self {
        Self::new(DataValue::Null)
    }

    pub fn void() -> Self {
        Self::new(DataValue::Void)
    }

    pub fn error(error: InterpretingError) -> Self {
        Self::new(DataValue::Error(ErrorObject::new(error)))
    }

    pub fn array(elements: Vec<DataObject>) -> Self {
        Self::new(DataValue::Array(Rc::new(RefCell::new(elements))))
    }

    pub fn function_pointer(fp: FunctionPointerObject) -> Self {
        Self::new(DataValue::FunctionPointer(Rc::new(fp)))
    }

    pub fn value(&self) -> &DataValue {
        &self.value
    }

    pub fn into_value(self) -> DataValue {
        self.value
    }

    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    pub fn set_variable_name(&mut self, name: Option<String>) {
        self.variable_name = name;
    }

    pub fn is_final(&self) -> bool {
        self.final_data
    }

    pub fn set_final(&mut self) {
        self.final_data = true;
    }

    /// Replace the payload. A no-op returning `false` for final data.
    pub fn set_value(&mut self, value: DataValue) -> bool {
        if self.final_data {
            return false;
        }
        self.value = value;
        true
    }

    /// Copy another object's payload (not its name or finality).
    pub fn set_data(&mut self, other: &DataObject) -> bool {
        self.set_value(other.value.clone())
    }

    /// Copy without binding metadata, for storing into a new place.
    pub fn detached(&self) -> DataObject {
        DataObject::new(self.value.clone())
    }

    pub fn type_name(&self) -> &'static str {
        match self.value {
            DataValue::Text(_) => "TEXT",
            DataValue::Char(_) => "CHAR",
            DataValue::Int(_) => "INT",
            DataValue::Long(_) => "LONG",
            DataValue::Float(_) => "FLOAT",
            DataValue::Double(_) => "DOUBLE",
            DataValue::Array(_) => "ARRAY",
            DataValue::VarPointer(_) => "VAR_POINTER",
            DataValue::FunctionPointer(_) => "FUNCTION_POINTER",
            DataValue::Error(_) => "ERROR",
            DataValue::Null => "NULL",
            DataValue::Void => "VOID",
            DataValue::ArgumentSeparator(_) => "ARGUMENT_SEPARATOR",
        }
    }

    pub fn is_argument_separator(&self) -> bool {
        matches!(self.value, DataValue::ArgumentSeparator(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, DataValue::Null)
    }

    pub fn as_function_pointer(&self) -> Option<&Rc<FunctionPointerObject>> {
        match &self.value {
            DataValue::FunctionPointer(fp) => Some(fp),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Rc<RefCell<Vec<DataObject>>>> {
        match &self.value {
            DataValue::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Textual form used by composition and printing.
    pub fn to_text(&self) -> String {
        match &self.value {
            DataValue::Text(s) | DataValue::ArgumentSeparator(s) => s.clone(),
            DataValue::Char(c) => c.to_string(),
            DataValue::Int(i) => i.to_string(),
            DataValue::Long(l) => l.to_string(),
            DataValue::Float(f) => format_float(*f),
            DataValue::Double(d) => format_double(*d),
            DataValue::Array(array) => {
                let elements: Vec<String> = array.borrow().iter().map(DataObject::to_text).collect();
                format!("[{}]", elements.join(", "))
            }
            DataValue::VarPointer(vp) => match vp.cell().try_borrow() {
                Ok(target) => match target.variable_name() {
                    Some(name) => format!("VP -> {}", name),
                    None => format!("VP -> {}", target.to_text()),
                },
                Err(_) => "VP -> <borrowed>".to_string(),
            },
            DataValue::FunctionPointer(fp) => fp.text(),
            DataValue::Error(error) => format!("Error {}: {}", error.code(), error.message()),
            DataValue::Null => "null".to_string(),
            DataValue::Void => String::new(),
        }
    }

    pub fn to_bool(&self) -> bool {
        match &self.value {
            DataValue::Text(s) => !s.is_empty(),
            DataValue::Char(c) => *c != '\0',
            DataValue::Int(i) => *i != 0,
            DataValue::Long(l) => *l != 0,
            DataValue::Float(f) => *f != 0.0,
            DataValue::Double(d) => *d != 0.0,
            DataValue::Array(array) => !array.borrow().is_empty(),
            DataValue::VarPointer(_) | DataValue::FunctionPointer(_) => true,
            DataValue::Error(_)
            | DataValue::Null
            | DataValue::Void
            | DataValue::ArgumentSeparator(_) => false,
        }
    }

    pub fn to_number(&self) -> Option<Number> {
        match &self.value {
            DataValue::Text(s) => parse_number(s),
            DataValue::Char(c) => Some(Number::Int(*c as i32)),
            DataValue::Int(i) => Some(Number::Int(*i)),
            DataValue::Long(l) => Some(Number::Long(*l)),
            DataValue::Float(f) => Some(Number::Float(*f)),
            DataValue::Double(d) => Some(Number::Double(*d)),
            DataValue::Array(array) => Some(Number::Int(array.borrow().len() as i32)),
            _ => None,
        }
    }

    /// Whether the payload itself is a number or a char.
    pub fn is_numeric_type(&self) -> bool {
        matches!(
            self.value,
            DataValue::Char(_)
                | DataValue::Int(_)
                | DataValue::Long(_)
                | DataValue::Float(_)
                | DataValue::Double(_)
        )
    }
}

impl From<Number> for DataObject {
    fn from(number: Number) -> Self {
        DataObject::new(number.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_style_floats() {
        assert_eq!(format_double(5.0), "5.0");
        assert_eq!(format_double(2.5), "2.5");
        assert_eq!(format_double(-0.5), "-0.5");
        assert_eq!(format_double(1e10), "1.0E10");
        assert_eq!(format_double(f64::NAN), "NaN");
        assert_eq!(format_double(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(3.0), "3.0");
    }

    #[test]
    fn text_forms() {
        let array = DataObject::array(vec![DataObject::int(1), DataObject::text("a"), DataObject::null()]);
        assert_eq!(array.to_text(), "[1, a, null]");
        assert_eq!(DataObject::void().to_text(), "");
        assert_eq!(
            DataObject::function_pointer(FunctionPointerObject::Predefined { name: "addi".into(), linker: false }).to_text(),
            "<Predefined FP func.addi>"
        );
        let cell = Rc::new(RefCell::new(DataObject::named(DataValue::Int(1), "$x")));
        assert_eq!(DataObject::new(DataValue::VarPointer(VarPointerObject::new(cell))).to_text(), "VP -> $x");
    }

    #[test]
    fn truthiness() {
        assert!(DataObject::text("a").to_bool());
        assert!(!DataObject::text("").to_bool());
        assert!(!DataObject::new(DataValue::Char('\0')).to_bool());
        assert!(!DataObject::int(0).to_bool());
        assert!(DataObject::double(0.1).to_bool());
        assert!(!DataObject::array(vec![]).to_bool());
        assert!(!DataObject::error(InterpretingError::NoNum).to_bool());
        assert!(!DataObject::null().to_bool());
        assert!(!DataObject::void().to_bool());
    }

    #[test]
    fn numbers() {
        assert_eq!(DataObject::text(" 42 ").to_number(), Some(Number::Int(42)));
        assert_eq!(DataObject::text("5000000000").to_number(), Some(Number::Long(5_000_000_000)));
        assert_eq!(DataObject::text("1.5").to_number(), Some(Number::Double(1.5)));
        assert_eq!(DataObject::text("abc").to_number(), None);
        assert_eq!(DataObject::new(DataValue::Char('A')).to_number(), Some(Number::Int(65)));
        assert_eq!(DataObject::array(vec![DataObject::null(); 3]).to_number(), Some(Number::Int(3)));
        assert_eq!(DataObject::null().to_number(), None);
    }

    #[test]
    fn final_data_blocks_setters() {
        let mut object = DataObject::int(1);
        object.set_final();
        assert!(!object.set_value(DataValue::Int(2)));
        assert!(matches!(object.value(), DataValue::Int(1)));
    }

    #[test]
    fn copies_share_arrays() {
        let original = DataObject::array(vec![DataObject::int(1)]);
        let copy = original.clone();
        copy.as_array().unwrap().borrow_mut()[0] = DataObject::int(9);
        assert_eq!(original.to_text(), "[9]");
    }
}
