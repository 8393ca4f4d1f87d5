//! Environment trees: one `Environment` per block/call scope, linked to its
//! enclosing scope so closures can outlive the call that created them.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type EnvRef = Rc<RefCell<Environment>>;

pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn root() -> EnvRef {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: None,
        }))
    }

    pub fn child(enclosing: EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }))
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Walks `depth` enclosing links up from this environment.
    fn ancestor(env: &EnvRef, depth: usize) -> EnvRef {
        let mut current = env.clone();
        for _ in 0..depth {
            let next = current
                .borrow()
                .enclosing
                .clone()
                .expect("resolver-computed depth exceeds the environment chain");
            current = next;
        }
        current
    }

    pub fn get_at(env: &EnvRef, depth: usize, name: &str) -> Value {
        let target = Self::ancestor(env, depth);
        let borrowed = target.borrow();
        borrowed
            .values
            .get(name)
            .cloned()
            .expect("resolver-computed depth points at a scope that defines this name")
    }

    pub fn assign_at(env: &EnvRef, depth: usize, name: &str, value: Value) {
        let target = Self::ancestor(env, depth);
        target.borrow_mut().values.insert(name.to_string(), value);
    }

    /// Looks up a global (or an unresolved local, per the resolver's truthy
    /// quirk on `Assign`/`Super`) by walking the whole chain to its root.
    pub fn get_global(env: &EnvRef, name: &str) -> Option<Value> {
        let mut current = env.clone();
        loop {
            if let Some(value) = current.borrow().values.get(name) {
                return Some(value.clone());
            }
            let next = current.borrow().enclosing.clone();
            match next {
                Some(next) => current = next,
                None => return None,
            }
        }
    }

    pub fn assign_global(env: &EnvRef, name: &str, value: Value) -> bool {
        let mut current = env.clone();
        loop {
            if current.borrow().values.contains_key(name) {
                current.borrow_mut().values.insert(name.to_string(), value);
                return true;
            }
            let next = current.borrow().enclosing.clone();
            match next {
                Some(next) => current = next,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_scopes_see_enclosing_definitions() {
        let root = Environment::root();
        root.borrow_mut().define("x", Value::Number(1.0));
        let child = Environment::child(root.clone());
        assert!(matches!(
            Environment::get_global(&child, "x"),
            Some(Value::Number(n)) if n == 1.0
        ));
    }

    #[test]
    fn assign_at_depth_mutates_the_right_scope() {
        let root = Environment::root();
        root.borrow_mut().define("x", Value::Number(1.0));
        let child = Environment::child(root.clone());
        Environment::assign_at(&child, 1, "x", Value::Number(2.0));
        assert!(matches!(
            Environment::get_at(&child, 1, "x"),
            Value::Number(n) if n == 2.0
        ));
    }

    #[test]
    fn shared_array_mutations_are_visible_through_every_alias() {
        use std::cell::RefCell as Rfc;
        let arr = Value::Array(Rc::new(Rfc::new(vec![Value::Number(1.0)])));
        let root = Environment::root();
        root.borrow_mut().define("a", arr.clone());
        root.borrow_mut().define("b", arr.clone());
        if let Value::Array(cell) = Environment::get_global(&root, "a").unwrap() {
            cell.borrow_mut().push(Value::Number(2.0));
        }
        if let Value::Array(cell) = Environment::get_global(&root, "b").unwrap() {
            assert_eq!(cell.borrow().len(), 2);
        } else {
            panic!("expected array");
        }
    }
}
