//! Runtime values.
//!
//! Unlike the teacher's VM, `Array` and `Instance` can't use copy-on-write
//! `Rc` + `make_mut` here: Ember's evaluator needs true shared-reference
//! semantics (a mutation through one alias of an array or instance must be
//! visible through every other alias of the same value), so both wrap their
//! payload in `Rc<RefCell<_>>` instead.

use ember_compiler::ast::FunctionDecl;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(Rc<str>),
    Bool(bool),
    Nil,
    Array(Rc<RefCell<Vec<Value>>>),
    Callable(Callable),
    Instance(Rc<RefCell<Instance>>),
}

#[derive(Clone)]
pub enum Callable {
    Function(Rc<EmberFunction>),
    Class(Rc<Class>),
}

pub struct EmberFunction {
    pub decl: Rc<FunctionDecl>,
    pub closure: crate::environment::EnvRef,
    pub is_initializer: bool,
}

pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    pub methods: HashMap<String, Rc<EmberFunction>>,
}

pub struct Instance {
    pub class: Rc<Class>,
    pub fields: HashMap<String, Value>,
}

impl Class {
    pub fn find_method(&self, name: &str) -> Option<Rc<EmberFunction>> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        self.superclass.as_ref()?.find_method(name)
    }
}

impl Instance {
    pub fn get(this: &Rc<RefCell<Instance>>, name: &str) -> Option<Value> {
        let borrowed = this.borrow();
        if let Some(value) = borrowed.fields.get(name) {
            return Some(value.clone());
        }
        let class = borrowed.class.clone();
        drop(borrowed);
        class.find_method(name).map(|method| {
            Value::Callable(Callable::Function(Rc::new(method.bind(this.clone()))))
        })
    }
}

impl EmberFunction {
    pub fn bind(&self, instance: Rc<RefCell<Instance>>) -> EmberFunction {
        let env = crate::environment::Environment::child(self.closure.clone());
        env.borrow_mut()
            .define("this", Value::Instance(instance));
        EmberFunction {
            decl: self.decl.clone(),
            closure: env,
            is_initializer: self.is_initializer,
        }
    }

    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }
}

impl Value {
    /// `Bool` returns itself; `Nil` is false; `Number` is false iff zero;
    /// `Array` is false iff empty; everything else (strings, callables,
    /// instances) is true regardless of contents.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Nil => false,
            Value::Number(n) => *n != 0.0,
            Value::Array(items) => !items.borrow().is_empty(),
            Value::String(_) | Value::Callable(_) | Value::Instance(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Array(_) => "array",
            Value::Callable(_) => "function",
            Value::Instance(_) => "instance",
        }
    }

    /// String form used by `print` and string concatenation.
    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Nil => "nil".to_string(),
            Value::Array(items) => {
                let items = items.borrow();
                format!(
                    "[{}]",
                    items
                        .iter()
                        .map(Value::display)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Value::Callable(Callable::Function(f)) => format!(
                "<fn {}({})>",
                f.decl.name.lexeme,
                f.decl
                    .params
                    .iter()
                    .map(|p| p.name.lexeme.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
            Value::Callable(Callable::Class(c)) => c.name.clone(),
            Value::Instance(instance) => {
                format!("<instanceof {}>", instance.borrow().class.name)
            }
        }
    }

    /// Value equality without any implicit coercion between types.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Callable(Callable::Function(a)), Value::Callable(Callable::Function(b))) => {
                Rc::ptr_eq(a, b)
            }
            (Value::Callable(Callable::Class(a)), Value::Callable(Callable::Class(b))) => {
                Rc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Integral floats print without a trailing `.0` (`3` not `3.0`), matching
/// the host language's documented print format rather than the teacher's
/// own `format_float`, which always keeps one decimal place for whole
/// numbers.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_floats_print_without_trailing_zero() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-2.0), "-2");
    }

    #[test]
    fn fractional_floats_keep_their_digits() {
        assert_eq!(format_number(3.5), "3.5");
    }

    #[test]
    fn falsy_values_follow_the_per_variant_rule() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::Number(1.0).is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
        // Strings are truthy even when empty — only Number and Array are
        // content-sensitive.
        assert!(Value::String(Rc::from("")).is_truthy());
    }

    #[test]
    fn arrays_are_falsy_only_when_empty() {
        let empty = Value::Array(Rc::new(RefCell::new(Vec::new())));
        let nonempty = Value::Array(Rc::new(RefCell::new(vec![Value::Nil])));
        assert!(!empty.is_truthy());
        assert!(nonempty.is_truthy());
    }

    #[test]
    fn arrays_compare_by_reference_not_contents() {
        let a = Value::Array(Rc::new(RefCell::new(vec![Value::Number(1.0)])));
        let b = Value::Array(Rc::new(RefCell::new(vec![Value::Number(1.0)])));
        assert!(!a.equals(&b));
        let c = a.clone();
        assert!(a.equals(&c));
    }
}
