//! The variable environment.

use super::value::Value;
use rustc_hash::FxHashMap;

/// A flat environment for variable bindings.
///
/// There is a single scope: a loop variable lives in the same map as every
/// other variable and is removed when its loop ends.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// The bindings in this environment
    bindings: FxHashMap<String, Value>,
}

impl Environment {
    /// Creates a new, empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a variable. Returns false if the name is already bound.
    pub fn declare(&mut self, name: &str, value: Value) -> bool {
        if self.bindings.contains_key(name) {
            return false;
        }
        self.bindings.insert(name.to_string(), value);
        true
    }

    /// Gets a variable's value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Sets an existing variable's value. Returns false if it is not bound.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.bindings.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Removes a binding, returning its last value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    /// Returns true if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over the bindings in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_once() {
        let mut env = Environment::new();
        assert!(env.declare("❤️", Value::Number(1.0)));
        assert!(!env.declare("❤️", Value::Null));
        assert_eq!(env.get("❤️"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_set_requires_binding() {
        let mut env = Environment::new();
        assert!(!env.set("x", Value::Null));
        env.declare("x", Value::Null);
        assert!(env.set("x", Value::Boolean(true)));
        assert_eq!(env.get("x"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_remove() {
        let mut env = Environment::new();
        env.declare("i", Value::Number(3.0));
        assert_eq!(env.remove("i"), Some(Value::Number(3.0)));
        assert!(!env.contains("i"));
        assert!(env.is_empty());
    }
}
